//! User rows and contact resolution.

use std::collections::{HashMap, HashSet};

use photoshare_model::{ContactResolution, HashedContacts, NewUser, UserRecord};
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::MetadataError;

pub(super) fn create_user(conn: &Connection, user: &NewUser) -> Result<(), MetadataError> {
    conn.execute(
        "INSERT INTO users
            (id, subject, phone, email, apple_id, public_key, private_key, schema_version)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            user.user_id,
            user.subject,
            user.contacts.phone,
            user.contacts.email,
            user.contacts.apple_id,
            user.public_key,
            user.private_key,
            user.schema_version,
        ],
    )?;
    Ok(())
}

pub(super) fn get_user(conn: &Connection, subject: &str) -> Result<UserRecord, MetadataError> {
    let record: UserRecord = conn.query_row(
        "SELECT id, public_key, private_key, schema_version FROM users WHERE subject = ?1",
        params![subject],
        |row| {
            Ok(UserRecord {
                id: row.get(0)?,
                public_key: row.get(1)?,
                private_key: row.get(2)?,
                schema_version: row.get(3)?,
            })
        },
    )?;
    Ok(record)
}

pub(super) fn update_contact(
    conn: &Connection,
    subject: &str,
    contacts: &HashedContacts,
) -> Result<(), MetadataError> {
    let updated: usize = conn.execute(
        "UPDATE users SET phone = ?1, email = ?2, apple_id = ?3 WHERE subject = ?4",
        params![contacts.phone, contacts.email, contacts.apple_id, subject],
    )?;
    if updated == 0 {
        return Err(MetadataError::NoData);
    }
    Ok(())
}

/// Look up one user by a single column, returning `(id, public_key)`.
fn lookup(
    conn: &Connection,
    column: &str,
    value: &str,
) -> Result<Option<(String, String)>, MetadataError> {
    let sql: String = format!("SELECT id, public_key FROM users WHERE {} = ?1 LIMIT 1", column);
    let found: Option<(String, String)> = conn
        .query_row(&sql, params![value], |row| Ok((row.get(0)?, row.get(1)?)))
        .optional()?;
    Ok(found)
}

pub(super) fn resolve_contacts(
    conn: &Connection,
    ids: &[String],
    phone_digests: &[String],
    email_digests: &[String],
) -> Result<ContactResolution, MetadataError> {
    let mut existing: HashMap<String, String> = HashMap::new();
    let mut unmatched: Vec<String> = Vec::new();
    let mut seen_unmatched: HashSet<&str> = HashSet::new();

    let spaces: [(&str, &[String]); 3] = [
        ("id", ids),
        ("phone", phone_digests),
        ("email", email_digests),
    ];
    for (column, values) in spaces {
        for value in values {
            match lookup(conn, column, value)? {
                Some((id, public_key)) => {
                    existing.insert(id, public_key);
                }
                None => {
                    if seen_unmatched.insert(value.as_str()) {
                        unmatched.push(value.clone());
                    }
                }
            }
        }
    }

    if existing.is_empty() {
        return Err(MetadataError::NoData);
    }
    Ok(ContactResolution { existing, unmatched })
}

pub(super) fn verify_identifiers(
    conn: &Connection,
    ids: &[String],
) -> Result<Vec<String>, MetadataError> {
    let mut verified: Vec<String> = Vec::new();
    for id in ids {
        if lookup(conn, "id", id)?.is_some() && !verified.contains(id) {
            verified.push(id.clone());
        }
    }
    if verified.is_empty() {
        return Err(MetadataError::NoData);
    }
    Ok(verified)
}
