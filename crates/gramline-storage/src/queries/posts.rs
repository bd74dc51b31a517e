// SPDX-FileCopyrightText: 2026 Gramline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post read/write operations.
//!
//! Posts map an external post id to its owning user; the engine's first
//! pipeline step is the owner lookup.

use gramline_core::GramlineError;
use rusqlite::params;

use crate::database::Database;
use crate::models::Post;

/// Insert a new post.
pub async fn create_post(db: &Database, post: &Post) -> Result<(), GramlineError> {
    let post = post.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO posts (id, user_id, instagram_post_id, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![post.id, post.user_id, post.instagram_post_id, post.created_at],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Resolve the owning user id for an external post id.
pub async fn find_post_owner(
    db: &Database,
    instagram_post_id: &str,
) -> Result<Option<String>, GramlineError> {
    let instagram_post_id = instagram_post_id.to_string();
    db.connection()
        .call(move |conn| {
            let result = conn.query_row(
                "SELECT user_id FROM posts WHERE instagram_post_id = ?1",
                params![instagram_post_id],
                |row| row.get(0),
            );
            match result {
                Ok(user_id) => Ok(Some(user_id)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{User, timestamp_now};
    use crate::queries::users::create_user;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();

        let user = User {
            id: "u1".to_string(),
            username: "jane".to_string(),
            email: "jane@example.com".to_string(),
            instagram_user_id: "ig-1".to_string(),
            instagram_access_token: "token-1".to_string(),
            instagram_business_account_id: None,
            is_active: true,
            created_at: timestamp_now(),
            updated_at: timestamp_now(),
        };
        create_user(&db, &user).await.unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn find_post_owner_resolves_known_post() {
        let (db, _dir) = setup_db().await;
        let post = Post {
            id: "p1".to_string(),
            user_id: "u1".to_string(),
            instagram_post_id: "ig-post-1".to_string(),
            created_at: timestamp_now(),
        };
        create_post(&db, &post).await.unwrap();

        let owner = find_post_owner(&db, "ig-post-1").await.unwrap();
        assert_eq!(owner.as_deref(), Some("u1"));
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn find_post_owner_returns_none_for_unknown_post() {
        let (db, _dir) = setup_db().await;
        assert!(find_post_owner(&db, "ig-post-x").await.unwrap().is_none());
        db.close().await.unwrap();
    }
}
