use sqlx::SqlitePool;

use crate::auth::repo_types::{NewUser, User};
use crate::db::StoreError;

impl User {
    /// Insert a user. A taken email surfaces as `StoreError::Conflict`.
    pub async fn create(db: &SqlitePool, new: NewUser<'_>) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (first_name, last_name, email, organization, password_hash)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, first_name, last_name, email, organization, password_hash
            "#,
        )
        .bind(new.first_name)
        .bind(new.last_name)
        .bind(new.email)
        .bind(new.organization)
        .bind(new.password_hash)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    /// Find a user by email, compared exactly as stored.
    pub async fn find_by_email(db: &SqlitePool, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, email, organization, password_hash
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(db: &SqlitePool, id: i64) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, email, organization, password_hash
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn update_profile(
        db: &SqlitePool,
        id: i64,
        first_name: &str,
        last_name: &str,
        organization: &str,
    ) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
               SET first_name = ?, last_name = ?, organization = ?
             WHERE id = ?
            RETURNING id, first_name, last_name, email, organization, password_hash
            "#,
        )
        .bind(first_name)
        .bind(last_name)
        .bind(organization)
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Returns `false` when no such user exists.
    pub async fn update_password(
        db: &SqlitePool,
        id: i64,
        password_hash: &str,
    ) -> Result<bool, StoreError> {
        let res = sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
            .bind(password_hash)
            .bind(id)
            .execute(db)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    pub async fn update_email(
        db: &SqlitePool,
        id: i64,
        email: &str,
    ) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
               SET email = ?
             WHERE id = ?
            RETURNING id, first_name, last_name, email, organization, password_hash
            "#,
        )
        .bind(email)
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Removes the user with their cars and received notifications in one
    /// transaction. Notifications they sent stay in the receivers' inboxes.
    pub async fn delete_account(db: &SqlitePool, id: i64) -> Result<bool, StoreError> {
        let mut tx = db.begin().await?;

        sqlx::query("DELETE FROM cars WHERE user_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM notifications WHERE receiver_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let res = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if res.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }
        tx.commit().await?;
        Ok(true)
    }
}
