//! Assets, group albums and sharing edges.

use std::collections::HashMap;

use photoshare_model::{AssetRecord, GroupAlbum, NewAsset, SharedAsset};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{caller_id, joined_caller};
use crate::error::MetadataError;

const ASSET_COLUMNS: &str = "a.id, a.owner_id, a.asset_type, a.remote_path, a.remote_path_orig, \
     a.create_date, a.location, a.duration, a.original_filename, a.original_uti, \
     a.pixel_width, a.pixel_height, a.md5, a.asset_key, a.total_size";

fn asset_from_row(row: &Row<'_>) -> rusqlite::Result<AssetRecord> {
    let pixel_width: i64 = row.get(10)?;
    let pixel_height: i64 = row.get(11)?;
    let total_size: Option<i64> = row.get(14)?;
    Ok(AssetRecord {
        asset_id: row.get(0)?,
        owner_id: row.get(1)?,
        asset_type: row.get(2)?,
        remote_path: row.get(3)?,
        remote_path_orig: row.get(4)?,
        create_date: row.get(5)?,
        location: row.get(6)?,
        duration: row.get(7)?,
        original_filename: row.get(8)?,
        original_uti: row.get(9)?,
        pixel_width: pixel_width as u32,
        pixel_height: pixel_height as u32,
        md5: row.get(12)?,
        key: row.get(13)?,
        total_size: total_size.map(|size| size as u64),
    })
}

pub(super) fn create_asset(
    conn: &Connection,
    subject: &str,
    asset: &NewAsset,
    total_size: Option<u64>,
) -> Result<(), MetadataError> {
    let user_id: String = caller_id(conn, subject)?;
    conn.execute(
        "INSERT INTO assets
            (id, owner_id, asset_type, remote_path, remote_path_orig, create_date, location,
             duration, original_filename, original_uti, pixel_width, pixel_height, md5,
             asset_key, total_size)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
        params![
            asset.asset_id,
            user_id,
            asset.effective_type(),
            asset.remote_path,
            asset.original_locator(),
            asset.create_date,
            asset.location,
            asset.duration,
            asset.original_filename,
            asset.original_uti,
            asset.pixel_width as i64,
            asset.pixel_height as i64,
            asset.md5,
            asset.key,
            total_size.map(|size| size as i64),
        ],
    )?;
    Ok(())
}

/// Delete owned assets and every edge pointing at them.
///
/// Returns the non-empty locators of both representations of each deleted
/// asset. Ids the caller does not own are skipped.
pub(super) fn delete_assets(
    conn: &Connection,
    subject: &str,
    asset_ids: &[String],
) -> Result<Vec<String>, MetadataError> {
    let user_id: String = caller_id(conn, subject)?;
    let tx = conn.unchecked_transaction()?;
    let mut locators: Vec<String> = Vec::new();

    for asset_id in asset_ids {
        let paths: Option<(String, Option<String>)> = tx
            .query_row(
                "SELECT remote_path, remote_path_orig FROM assets WHERE id = ?1 AND owner_id = ?2",
                params![asset_id, user_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        let Some((remote_path, remote_path_orig)) = paths else {
            continue;
        };

        tx.execute("DELETE FROM assets WHERE id = ?1", params![asset_id])?;
        tx.execute("DELETE FROM album_assets WHERE asset_id = ?1", params![asset_id])?;
        tx.execute("DELETE FROM shared_assets WHERE asset_id = ?1", params![asset_id])?;

        locators.extend(
            std::iter::once(remote_path)
                .chain(remote_path_orig)
                .filter(|path| !path.is_empty()),
        );
    }

    tx.commit()?;
    Ok(locators)
}

pub(super) fn set_original_path(
    conn: &Connection,
    subject: &str,
    asset_id: &str,
    remote_path_orig: &str,
    total_size: u64,
) -> Result<(), MetadataError> {
    let user_id: String = caller_id(conn, subject)?;
    let updated: usize = conn.execute(
        "UPDATE assets SET remote_path_orig = ?1, total_size = ?2 WHERE id = ?3 AND owner_id = ?4",
        params![remote_path_orig, total_size as i64, asset_id, user_id],
    )?;
    if updated == 0 {
        return Err(MetadataError::NoData);
    }
    Ok(())
}

/// Overwrite filenames of owned assets; unknown ids are ignored.
pub(super) fn set_original_filenames(
    conn: &Connection,
    subject: &str,
    filenames: &HashMap<String, String>,
) -> Result<(), MetadataError> {
    let user_id: String = caller_id(conn, subject)?;
    let tx = conn.unchecked_transaction()?;
    {
        let mut stmt = tx.prepare(
            "UPDATE assets SET original_filename = ?1 WHERE id = ?2 AND owner_id = ?3",
        )?;
        for (asset_id, filename) in filenames {
            stmt.execute(params![filename, asset_id, user_id])?;
        }
    }
    tx.commit()?;
    Ok(())
}

pub(super) fn get_assets(
    conn: &Connection,
    subject: &str,
) -> Result<HashMap<String, AssetRecord>, MetadataError> {
    let user_id: String = caller_id(conn, subject)?;
    let sql: String = format!("SELECT {} FROM assets a WHERE a.owner_id = ?1", ASSET_COLUMNS);
    let mut stmt = conn.prepare(&sql)?;
    let assets = stmt
        .query_map(params![user_id], asset_from_row)?
        .map(|record| record.map(|asset| (asset.asset_id.clone(), asset)))
        .collect::<Result<HashMap<String, AssetRecord>, _>>()?;

    if assets.is_empty() {
        return Err(MetadataError::NoData);
    }
    Ok(assets)
}

pub(super) fn add_to_album(
    conn: &Connection,
    subject: &str,
    group_id: &str,
    asset_ids: &[String],
) -> Result<(), MetadataError> {
    let user_id: String = joined_caller(conn, subject, group_id)?;
    let tx = conn.unchecked_transaction()?;
    {
        let mut stmt = tx.prepare(
            "INSERT OR IGNORE INTO album_assets (group_id, asset_id)
             SELECT ?1, id FROM assets WHERE id = ?2 AND owner_id = ?3",
        )?;
        for asset_id in asset_ids {
            stmt.execute(params![group_id, asset_id, user_id])?;
        }
    }
    tx.commit()?;
    Ok(())
}

/// Remove owned assets from the album; they stop being shared with the group too.
pub(super) fn remove_from_album(
    conn: &Connection,
    subject: &str,
    group_id: &str,
    asset_ids: &[String],
) -> Result<(), MetadataError> {
    let user_id: String = joined_caller(conn, subject, group_id)?;
    let tx = conn.unchecked_transaction()?;
    for asset_id in asset_ids {
        for table in ["album_assets", "shared_assets"] {
            let sql: String = format!(
                "DELETE FROM {} WHERE group_id = ?1 AND asset_id = ?2
                 AND asset_id IN (SELECT id FROM assets WHERE owner_id = ?3)",
                table
            );
            tx.execute(&sql, params![group_id, asset_id, user_id])?;
        }
    }
    tx.commit()?;
    Ok(())
}

/// Share owned assets with a group. Shared assets also join the album.
pub(super) fn share(
    conn: &Connection,
    subject: &str,
    group_id: &str,
    asset_ids: &[String],
    wrapped_keys: &[String],
) -> Result<(), MetadataError> {
    if asset_ids.len() != wrapped_keys.len() {
        return Err(MetadataError::InvalidInput(format!(
            "{} asset ids but {} keys",
            asset_ids.len(),
            wrapped_keys.len()
        )));
    }

    let user_id: String = joined_caller(conn, subject, group_id)?;
    let tx = conn.unchecked_transaction()?;
    for (asset_id, wrapped_key) in asset_ids.iter().zip(wrapped_keys) {
        let owned: bool = tx
            .query_row(
                "SELECT 1 FROM assets WHERE id = ?1 AND owner_id = ?2",
                params![asset_id, user_id],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        if !owned {
            continue;
        }
        tx.execute(
            "INSERT OR REPLACE INTO shared_assets (group_id, asset_id, wrapped_key)
             VALUES (?1, ?2, ?3)",
            params![group_id, asset_id, wrapped_key],
        )?;
        tx.execute(
            "INSERT OR IGNORE INTO album_assets (group_id, asset_id) VALUES (?1, ?2)",
            params![group_id, asset_id],
        )?;
    }
    tx.commit()?;
    Ok(())
}

pub(super) fn unshare(
    conn: &Connection,
    subject: &str,
    group_id: &str,
    asset_ids: &[String],
) -> Result<(), MetadataError> {
    let user_id: String = joined_caller(conn, subject, group_id)?;
    let tx = conn.unchecked_transaction()?;
    {
        let mut stmt = tx.prepare(
            "DELETE FROM shared_assets WHERE group_id = ?1 AND asset_id = ?2
             AND asset_id IN (SELECT id FROM assets WHERE owner_id = ?3)",
        )?;
        for asset_id in asset_ids {
            stmt.execute(params![group_id, asset_id, user_id])?;
        }
    }
    tx.commit()?;
    Ok(())
}

pub(super) fn group_albums(
    conn: &Connection,
    subject: &str,
) -> Result<HashMap<String, GroupAlbum>, MetadataError> {
    let user_id: String = caller_id(conn, subject)?;

    let mut groups_stmt =
        conn.prepare("SELECT group_id FROM memberships WHERE user_id = ?1 AND joined = 1")?;
    let group_ids = groups_stmt
        .query_map(params![user_id], |row| row.get(0))?
        .collect::<Result<Vec<String>, _>>()?;
    if group_ids.is_empty() {
        return Err(MetadataError::NoData);
    }

    let mut album_stmt = conn.prepare(
        "SELECT aa.asset_id FROM album_assets aa JOIN assets a ON a.id = aa.asset_id
         WHERE aa.group_id = ?1 AND a.owner_id = ?2 ORDER BY aa.asset_id",
    )?;
    let shared_sql: String = format!(
        "SELECT {}, s.wrapped_key FROM shared_assets s JOIN assets a ON a.id = s.asset_id
         WHERE s.group_id = ?1 ORDER BY a.id",
        ASSET_COLUMNS
    );
    let mut shared_stmt = conn.prepare(&shared_sql)?;

    let mut albums: HashMap<String, GroupAlbum> = HashMap::with_capacity(group_ids.len());
    for group_id in group_ids {
        let asset_ids = album_stmt
            .query_map(params![group_id, user_id], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        let shared = shared_stmt
            .query_map(params![group_id], |row| {
                Ok(SharedAsset {
                    asset: asset_from_row(row)?,
                    wrapped_key: row.get(15)?,
                })
            })?
            .collect::<Result<Vec<SharedAsset>, _>>()?;
        albums.insert(group_id, GroupAlbum { asset_ids, shared });
    }
    Ok(albums)
}
