// SPDX-FileCopyrightText: 2026 Gramline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User read/write operations.

use gramline_core::GramlineError;
use rusqlite::params;

use crate::database::Database;
use crate::models::User;

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        instagram_user_id: row.get(3)?,
        instagram_access_token: row.get(4)?,
        instagram_business_account_id: row.get(5)?,
        is_active: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

const USER_COLUMNS: &str = "id, username, email, instagram_user_id, instagram_access_token,
     instagram_business_account_id, is_active, created_at, updated_at";

/// Insert a new user.
pub async fn create_user(db: &Database, user: &User) -> Result<(), GramlineError> {
    let user = user.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO users (id, username, email, instagram_user_id,
                     instagram_access_token, instagram_business_account_id,
                     is_active, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    user.id,
                    user.username,
                    user.email,
                    user.instagram_user_id,
                    user.instagram_access_token,
                    user.instagram_business_account_id,
                    user.is_active,
                    user.created_at,
                    user.updated_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a user by ID.
pub async fn get_user(db: &Database, id: &str) -> Result<Option<User>, GramlineError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"))?;
            let result = stmt.query_row(params![id], row_to_user);
            match result {
                Ok(user) => Ok(Some(user)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}
