//! SQLite-backed metadata store.
//!
//! Tables mirror the graph: `users`, `user_groups`, `memberships`, `assets`,
//! `album_assets` and `shared_assets`. Multi-statement operations run in a
//! single transaction so each trait call is atomic.

mod assets;
mod groups;
mod users;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use photoshare_model::{
    AssetRecord, ContactResolution, GroupAlbum, GroupRecord, HashedContacts, MemberInvite,
    NewAsset, NewUser, UserRecord,
};
use rusqlite::{params, Connection, OptionalExtension};

use crate::backend::MetadataStore;
use crate::error::MetadataError;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        subject TEXT NOT NULL UNIQUE,
        phone TEXT,
        email TEXT,
        apple_id TEXT,
        public_key TEXT NOT NULL,
        private_key TEXT NOT NULL,
        schema_version TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_users_phone ON users(phone);
    CREATE INDEX IF NOT EXISTS idx_users_email ON users(email);

    CREATE TABLE IF NOT EXISTS user_groups (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS memberships (
        user_id TEXT NOT NULL,
        group_id TEXT NOT NULL,
        group_key TEXT NOT NULL,
        joined INTEGER NOT NULL,
        PRIMARY KEY (user_id, group_id)
    );
    CREATE INDEX IF NOT EXISTS idx_memberships_group ON memberships(group_id);

    CREATE TABLE IF NOT EXISTS assets (
        id TEXT PRIMARY KEY,
        owner_id TEXT NOT NULL,
        asset_type TEXT NOT NULL,
        remote_path TEXT NOT NULL,
        remote_path_orig TEXT,
        create_date TEXT,
        location TEXT,
        duration TEXT,
        original_filename TEXT,
        original_uti TEXT,
        pixel_width INTEGER NOT NULL,
        pixel_height INTEGER NOT NULL,
        md5 TEXT NOT NULL,
        asset_key TEXT NOT NULL,
        total_size INTEGER
    );
    CREATE INDEX IF NOT EXISTS idx_assets_owner ON assets(owner_id);

    CREATE TABLE IF NOT EXISTS album_assets (
        group_id TEXT NOT NULL,
        asset_id TEXT NOT NULL,
        PRIMARY KEY (group_id, asset_id)
    );

    CREATE TABLE IF NOT EXISTS shared_assets (
        group_id TEXT NOT NULL,
        asset_id TEXT NOT NULL,
        wrapped_key TEXT NOT NULL,
        PRIMARY KEY (group_id, asset_id)
    );
";

/// SQLite-backed metadata store.
pub struct SqliteMetadataStore {
    conn: Mutex<Connection>,
}

impl SqliteMetadataStore {
    /// Open or create a metadata database at the given path.
    ///
    /// # Arguments
    /// * `db_path` - Path to the SQLite database file
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or the schema cannot be created.
    pub fn open(db_path: &Path) -> Result<Self, MetadataError> {
        let conn: Connection = Connection::open(db_path)?;
        Self::with_connection(conn)
    }

    /// Create a store backed by a private in-memory database.
    pub fn open_in_memory() -> Result<Self, MetadataError> {
        let conn: Connection = Connection::open_in_memory()?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, MetadataError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

/// Resolve a caller subject to its user id.
fn caller_id(conn: &Connection, subject: &str) -> Result<String, MetadataError> {
    let id: Option<String> = conn
        .query_row(
            "SELECT id FROM users WHERE subject = ?1",
            params![subject],
            |row| row.get(0),
        )
        .optional()?;
    id.ok_or(MetadataError::NoData)
}

/// Membership state of a user in a group: `None` when not a member at all.
fn membership(
    conn: &Connection,
    user_id: &str,
    group_id: &str,
) -> Result<Option<bool>, MetadataError> {
    let joined: Option<bool> = conn
        .query_row(
            "SELECT joined FROM memberships WHERE user_id = ?1 AND group_id = ?2",
            params![user_id, group_id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(joined)
}

/// Resolve the caller and require that they have joined the group.
fn joined_caller(conn: &Connection, subject: &str, group_id: &str) -> Result<String, MetadataError> {
    let user_id: String = caller_id(conn, subject)?;
    match membership(conn, &user_id, group_id)? {
        Some(true) => Ok(user_id),
        _ => Err(MetadataError::NoData),
    }
}

fn log_failure<T>(op: &str, result: Result<T, MetadataError>) -> Result<T, MetadataError> {
    if let Err(MetadataError::Sqlite(message)) = &result {
        log::warn!("Metadata {} failed: {}", op, message);
    }
    result
}

#[async_trait]
impl MetadataStore for SqliteMetadataStore {
    async fn create_user(&self, user: &NewUser) -> Result<(), MetadataError> {
        let conn = self.conn.lock().unwrap();
        log_failure("create_user", users::create_user(&conn, user))
    }

    async fn get_user(&self, subject: &str) -> Result<UserRecord, MetadataError> {
        let conn = self.conn.lock().unwrap();
        log_failure("get_user", users::get_user(&conn, subject))
    }

    async fn update_user_contact(
        &self,
        subject: &str,
        contacts: &HashedContacts,
    ) -> Result<(), MetadataError> {
        let conn = self.conn.lock().unwrap();
        log_failure(
            "update_user_contact",
            users::update_contact(&conn, subject, contacts),
        )
    }

    async fn get_public_info_for_users(
        &self,
        ids: &[String],
        phone_digests: &[String],
        email_digests: &[String],
    ) -> Result<ContactResolution, MetadataError> {
        let conn = self.conn.lock().unwrap();
        log_failure(
            "get_public_info_for_users",
            users::resolve_contacts(&conn, ids, phone_digests, email_digests),
        )
    }

    async fn verify_identifiers(&self, ids: &[String]) -> Result<Vec<String>, MetadataError> {
        let conn = self.conn.lock().unwrap();
        log_failure("verify_identifiers", users::verify_identifiers(&conn, ids))
    }

    async fn create_group(
        &self,
        subject: &str,
        group_id: &str,
        name: &str,
        wrapped_key: &str,
    ) -> Result<(), MetadataError> {
        let conn = self.conn.lock().unwrap();
        log_failure(
            "create_group",
            groups::create_group(&conn, subject, group_id, name, wrapped_key),
        )
    }

    async fn get_groups(&self, subject: &str) -> Result<HashMap<String, GroupRecord>, MetadataError> {
        let conn = self.conn.lock().unwrap();
        log_failure("get_groups", groups::get_groups(&conn, subject))
    }

    async fn join_group(
        &self,
        subject: &str,
        group_id: &str,
        wrapped_key: &str,
    ) -> Result<(), MetadataError> {
        let conn = self.conn.lock().unwrap();
        log_failure(
            "join_group",
            groups::join_group(&conn, subject, group_id, wrapped_key),
        )
    }

    async fn add_users_to_group(
        &self,
        subject: &str,
        group_id: &str,
        invites: &[MemberInvite],
    ) -> Result<(), MetadataError> {
        let conn = self.conn.lock().unwrap();
        log_failure(
            "add_users_to_group",
            groups::add_users(&conn, subject, group_id, invites),
        )
    }

    async fn get_users_in_group(
        &self,
        subject: &str,
        group_id: &str,
    ) -> Result<HashMap<String, String>, MetadataError> {
        let conn = self.conn.lock().unwrap();
        log_failure(
            "get_users_in_group",
            groups::members(&conn, subject, group_id),
        )
    }

    async fn leave_group(&self, subject: &str, group_id: &str) -> Result<(), MetadataError> {
        let conn = self.conn.lock().unwrap();
        log_failure("leave_group", groups::leave_group(&conn, subject, group_id))
    }

    async fn create_asset(
        &self,
        subject: &str,
        asset: &NewAsset,
        total_size: Option<u64>,
    ) -> Result<(), MetadataError> {
        let conn = self.conn.lock().unwrap();
        log_failure(
            "create_asset",
            assets::create_asset(&conn, subject, asset, total_size),
        )
    }

    async fn delete_assets(
        &self,
        subject: &str,
        asset_ids: &[String],
    ) -> Result<Vec<String>, MetadataError> {
        let conn = self.conn.lock().unwrap();
        log_failure(
            "delete_assets",
            assets::delete_assets(&conn, subject, asset_ids),
        )
    }

    async fn add_path_for_original_asset(
        &self,
        subject: &str,
        asset_id: &str,
        remote_path_orig: &str,
        total_size: u64,
    ) -> Result<(), MetadataError> {
        let conn = self.conn.lock().unwrap();
        log_failure(
            "add_path_for_original_asset",
            assets::set_original_path(&conn, subject, asset_id, remote_path_orig, total_size),
        )
    }

    async fn set_original_filenames(
        &self,
        subject: &str,
        filenames: &HashMap<String, String>,
    ) -> Result<(), MetadataError> {
        let conn = self.conn.lock().unwrap();
        log_failure(
            "set_original_filenames",
            assets::set_original_filenames(&conn, subject, filenames),
        )
    }

    async fn get_assets(&self, subject: &str) -> Result<HashMap<String, AssetRecord>, MetadataError> {
        let conn = self.conn.lock().unwrap();
        log_failure("get_assets", assets::get_assets(&conn, subject))
    }

    async fn add_assets_to_group(
        &self,
        subject: &str,
        group_id: &str,
        asset_ids: &[String],
    ) -> Result<(), MetadataError> {
        let conn = self.conn.lock().unwrap();
        log_failure(
            "add_assets_to_group",
            assets::add_to_album(&conn, subject, group_id, asset_ids),
        )
    }

    async fn remove_assets_from_group(
        &self,
        subject: &str,
        group_id: &str,
        asset_ids: &[String],
    ) -> Result<(), MetadataError> {
        let conn = self.conn.lock().unwrap();
        log_failure(
            "remove_assets_from_group",
            assets::remove_from_album(&conn, subject, group_id, asset_ids),
        )
    }

    async fn share_assets(
        &self,
        subject: &str,
        group_id: &str,
        asset_ids: &[String],
        wrapped_keys: &[String],
    ) -> Result<(), MetadataError> {
        let conn = self.conn.lock().unwrap();
        log_failure(
            "share_assets",
            assets::share(&conn, subject, group_id, asset_ids, wrapped_keys),
        )
    }

    async fn unshare_assets(
        &self,
        subject: &str,
        group_id: &str,
        asset_ids: &[String],
    ) -> Result<(), MetadataError> {
        let conn = self.conn.lock().unwrap();
        log_failure(
            "unshare_assets",
            assets::unshare(&conn, subject, group_id, asset_ids),
        )
    }

    async fn get_assets_for_all_groups(
        &self,
        subject: &str,
    ) -> Result<HashMap<String, GroupAlbum>, MetadataError> {
        let conn = self.conn.lock().unwrap();
        log_failure(
            "get_assets_for_all_groups",
            assets::group_albums(&conn, subject),
        )
    }
}
