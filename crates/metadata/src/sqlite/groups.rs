//! Groups and memberships.

use std::collections::HashMap;

use photoshare_model::{GroupRecord, MemberInvite};
use rusqlite::{params, Connection};

use super::{caller_id, joined_caller, membership};
use crate::error::MetadataError;

pub(super) fn create_group(
    conn: &Connection,
    subject: &str,
    group_id: &str,
    name: &str,
    wrapped_key: &str,
) -> Result<(), MetadataError> {
    let user_id: String = caller_id(conn, subject)?;
    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "INSERT INTO user_groups (id, name) VALUES (?1, ?2)",
        params![group_id, name],
    )?;
    tx.execute(
        "INSERT INTO memberships (user_id, group_id, group_key, joined) VALUES (?1, ?2, ?3, 1)",
        params![user_id, group_id, wrapped_key],
    )?;
    tx.commit()?;
    Ok(())
}

fn member_ids(conn: &Connection, group_id: &str) -> Result<Vec<String>, MetadataError> {
    let mut stmt = conn.prepare(
        "SELECT user_id FROM memberships WHERE group_id = ?1 ORDER BY user_id",
    )?;
    let ids = stmt
        .query_map(params![group_id], |row| row.get(0))?
        .collect::<Result<Vec<String>, _>>()?;
    Ok(ids)
}

pub(super) fn get_groups(
    conn: &Connection,
    subject: &str,
) -> Result<HashMap<String, GroupRecord>, MetadataError> {
    let user_id: String = caller_id(conn, subject)?;
    let mut stmt = conn.prepare(
        "SELECT g.id, g.name, m.group_key, m.joined
         FROM memberships m JOIN user_groups g ON g.id = m.group_id
         WHERE m.user_id = ?1",
    )?;
    let rows = stmt
        .query_map(params![user_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, bool>(3)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    if rows.is_empty() {
        return Err(MetadataError::NoData);
    }

    let mut groups: HashMap<String, GroupRecord> = HashMap::with_capacity(rows.len());
    for (id, name, key, joined) in rows {
        let members: Vec<String> = member_ids(conn, &id)?;
        groups.insert(
            id.clone(),
            GroupRecord {
                id,
                name,
                key,
                joined,
                members,
            },
        );
    }
    Ok(groups)
}

pub(super) fn join_group(
    conn: &Connection,
    subject: &str,
    group_id: &str,
    wrapped_key: &str,
) -> Result<(), MetadataError> {
    let user_id: String = caller_id(conn, subject)?;
    let updated: usize = conn.execute(
        "UPDATE memberships SET group_key = ?1, joined = 1 WHERE user_id = ?2 AND group_id = ?3",
        params![wrapped_key, user_id, group_id],
    )?;
    if updated == 0 {
        return Err(MetadataError::NoData);
    }
    Ok(())
}

/// Invite users; unknown user ids and existing members are skipped.
pub(super) fn add_users(
    conn: &Connection,
    subject: &str,
    group_id: &str,
    invites: &[MemberInvite],
) -> Result<(), MetadataError> {
    joined_caller(conn, subject, group_id)?;
    let tx = conn.unchecked_transaction()?;
    {
        let mut stmt = tx.prepare(
            "INSERT OR IGNORE INTO memberships (user_id, group_id, group_key, joined)
             SELECT id, ?2, ?3, 0 FROM users WHERE id = ?1",
        )?;
        for invite in invites {
            stmt.execute(params![invite.user_id, group_id, invite.group_key])?;
        }
    }
    tx.commit()?;
    Ok(())
}

pub(super) fn members(
    conn: &Connection,
    subject: &str,
    group_id: &str,
) -> Result<HashMap<String, String>, MetadataError> {
    let user_id: String = caller_id(conn, subject)?;
    if membership(conn, &user_id, group_id)?.is_none() {
        return Err(MetadataError::NoData);
    }

    let mut stmt = conn.prepare(
        "SELECT u.id, u.public_key
         FROM memberships m JOIN users u ON u.id = m.user_id
         WHERE m.group_id = ?1",
    )?;
    let members = stmt
        .query_map(params![group_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?
        .collect::<Result<HashMap<String, String>, _>>()?;
    Ok(members)
}

/// Remove the caller's membership together with their album and sharing edges
/// in the group. The group is closed when nobody is left.
pub(super) fn leave_group(
    conn: &Connection,
    subject: &str,
    group_id: &str,
) -> Result<(), MetadataError> {
    let user_id: String = caller_id(conn, subject)?;
    let tx = conn.unchecked_transaction()?;

    let removed: usize = tx.execute(
        "DELETE FROM memberships WHERE user_id = ?1 AND group_id = ?2",
        params![user_id, group_id],
    )?;
    if removed == 0 {
        return Err(MetadataError::NoData);
    }

    for table in ["album_assets", "shared_assets"] {
        let sql: String = format!(
            "DELETE FROM {} WHERE group_id = ?1
             AND asset_id IN (SELECT id FROM assets WHERE owner_id = ?2)",
            table
        );
        tx.execute(&sql, params![group_id, user_id])?;
    }

    let remaining: i64 = tx.query_row(
        "SELECT COUNT(*) FROM memberships WHERE group_id = ?1",
        params![group_id],
        |row| row.get(0),
    )?;
    if remaining == 0 {
        tx.execute("DELETE FROM album_assets WHERE group_id = ?1", params![group_id])?;
        tx.execute("DELETE FROM shared_assets WHERE group_id = ?1", params![group_id])?;
        tx.execute("DELETE FROM user_groups WHERE id = ?1", params![group_id])?;
        log::debug!("Closed group {} after its last member left", group_id);
    }

    tx.commit()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use photoshare_model::{GroupRecord, MemberInvite};

    use super::super::test_support::store_with_users;
    use super::super::SqliteMetadataStore;
    use crate::MetadataStore;

    const GROUP: &str = "7d3f7a66-31f4-4c5e-9d0a-6ad1b0a8f0c1";

    async fn store_with_group() -> SqliteMetadataStore {
        let store: SqliteMetadataStore = store_with_users().await;
        store
            .create_group("sub-alice", GROUP, "Holiday", "gk-alice")
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_create_group_makes_creator_member() {
        let store: SqliteMetadataStore = store_with_group().await;
        let groups: HashMap<String, GroupRecord> = store.get_groups("sub-alice").await.unwrap();
        let group: &GroupRecord = &groups[GROUP];
        assert_eq!(group.name, "Holiday");
        assert_eq!(group.key, "gk-alice");
        assert!(group.joined);
        assert_eq!(group.members, vec!["u-alice".to_string()]);

        assert!(store.get_groups("sub-bob").await.unwrap_err().is_no_data());
    }

    #[tokio::test]
    async fn test_invite_then_join() {
        let store: SqliteMetadataStore = store_with_group().await;
        store
            .add_users_to_group(
                "sub-alice",
                GROUP,
                &[
                    MemberInvite::new("u-bob", "gk-bob-invite"),
                    MemberInvite::new("u-ghost", "gk-ghost"),
                ],
            )
            .await
            .unwrap();

        let bob_view: HashMap<String, GroupRecord> = store.get_groups("sub-bob").await.unwrap();
        assert!(!bob_view[GROUP].joined);
        assert_eq!(bob_view[GROUP].members.len(), 2);

        store.join_group("sub-bob", GROUP, "gk-bob").await.unwrap();
        let bob_view: HashMap<String, GroupRecord> = store.get_groups("sub-bob").await.unwrap();
        assert!(bob_view[GROUP].joined);
        assert_eq!(bob_view[GROUP].key, "gk-bob");

        let members: HashMap<String, String> =
            store.get_users_in_group("sub-alice", GROUP).await.unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(members["u-bob"], "pub-u-bob");
    }

    #[tokio::test]
    async fn test_only_joined_members_invite() {
        let store: SqliteMetadataStore = store_with_group().await;
        let err = store
            .add_users_to_group("sub-bob", GROUP, &[MemberInvite::new("u-bob", "k")])
            .await
            .unwrap_err();
        assert!(err.is_no_data());
    }

    #[tokio::test]
    async fn test_join_without_invite_is_no_data() {
        let store: SqliteMetadataStore = store_with_group().await;
        let err = store.join_group("sub-bob", GROUP, "k").await.unwrap_err();
        assert!(err.is_no_data());
    }

    #[tokio::test]
    async fn test_non_member_cannot_list_members() {
        let store: SqliteMetadataStore = store_with_group().await;
        let err = store.get_users_in_group("sub-bob", GROUP).await.unwrap_err();
        assert!(err.is_no_data());
    }

    #[tokio::test]
    async fn test_last_member_leaving_closes_group() {
        let store: SqliteMetadataStore = store_with_group().await;
        store
            .add_users_to_group("sub-alice", GROUP, &[MemberInvite::new("u-bob", "k")])
            .await
            .unwrap();

        store.leave_group("sub-alice", GROUP).await.unwrap();
        let members: HashMap<String, String> =
            store.get_users_in_group("sub-bob", GROUP).await.unwrap();
        assert_eq!(members.keys().collect::<Vec<_>>(), vec!["u-bob"]);

        store.leave_group("sub-bob", GROUP).await.unwrap();
        assert!(store.get_groups("sub-bob").await.unwrap_err().is_no_data());
        assert!(store
            .leave_group("sub-bob", GROUP)
            .await
            .unwrap_err()
            .is_no_data());

        // The id is free again once the group is closed.
        store
            .create_group("sub-bob", GROUP, "Reborn", "gk")
            .await
            .unwrap();
    }
}
