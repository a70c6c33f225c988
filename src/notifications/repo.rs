use sqlx::SqlitePool;

use super::repo_types::Notification;
use crate::db::StoreError;

/// Inserts an unread notification. `None` when the receiver does not exist.
pub async fn create(
    db: &SqlitePool,
    sender_id: i64,
    receiver_id: i64,
    message: &str,
    timestamp: i64,
) -> Result<Option<Notification>, StoreError> {
    let row = sqlx::query_as::<_, Notification>(
        r#"
        INSERT INTO notifications (sender_id, receiver_id, message, timestamp, is_read)
        SELECT ?, id, ?, ?, 0
          FROM users
         WHERE id = ?
        RETURNING id, sender_id, receiver_id, message, timestamp, is_read
        "#,
    )
    .bind(sender_id)
    .bind(message)
    .bind(timestamp)
    .bind(receiver_id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

/// Everything addressed to `receiver_id`, newest first.
pub async fn list_for_receiver(
    db: &SqlitePool,
    receiver_id: i64,
) -> Result<Vec<Notification>, StoreError> {
    let rows = sqlx::query_as::<_, Notification>(
        r#"
        SELECT id, sender_id, receiver_id, message, timestamp, is_read
          FROM notifications
         WHERE receiver_id = ?
         ORDER BY timestamp DESC, id DESC
        "#,
    )
    .bind(receiver_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Only the receiver can flip the flag. Repeating the call is harmless.
pub async fn mark_read(
    db: &SqlitePool,
    receiver_id: i64,
    notification_id: i64,
) -> Result<bool, StoreError> {
    let res = sqlx::query("UPDATE notifications SET is_read = 1 WHERE id = ? AND receiver_id = ?")
        .bind(notification_id)
        .bind(receiver_id)
        .execute(db)
        .await?;
    Ok(res.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connect_in_memory;

    async fn seed_user(db: &SqlitePool, email: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(
            "INSERT INTO users (first_name, last_name, email, organization, password_hash) \
             VALUES ('F', 'L', ?, '', 'h') RETURNING id",
        )
        .bind(email)
        .fetch_one(db)
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn receiver_sees_and_marks() {
        let db = connect_in_memory().await.unwrap();
        let alice = seed_user(&db, "a@x.com").await;
        let bob = seed_user(&db, "b@x.com").await;

        let n = create(&db, alice, bob, "hi", 1_700_000_000).await.unwrap().unwrap();
        assert!(!n.is_read);
        assert_eq!(n.sender_id, alice);

        assert!(list_for_receiver(&db, alice).await.unwrap().is_empty());
        assert_eq!(list_for_receiver(&db, bob).await.unwrap().len(), 1);

        assert!(!mark_read(&db, alice, n.id).await.unwrap(), "sender may not mark");
        assert!(mark_read(&db, bob, n.id).await.unwrap());
        assert!(mark_read(&db, bob, n.id).await.unwrap(), "second mark still matches");
        assert!(list_for_receiver(&db, bob).await.unwrap()[0].is_read);
    }

    #[tokio::test]
    async fn unknown_receiver_creates_nothing() {
        let db = connect_in_memory().await.unwrap();
        let alice = seed_user(&db, "a@x.com").await;
        assert!(create(&db, alice, 999, "hi", 0).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn newest_first() {
        let db = connect_in_memory().await.unwrap();
        let alice = seed_user(&db, "a@x.com").await;
        let bob = seed_user(&db, "b@x.com").await;
        create(&db, alice, bob, "old", 100).await.unwrap();
        create(&db, alice, bob, "new", 200).await.unwrap();

        let inbox = list_for_receiver(&db, bob).await.unwrap();
        let messages: Vec<&str> = inbox.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, ["new", "old"]);
    }
}
