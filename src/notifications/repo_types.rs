use serde::Serialize;
use sqlx::FromRow;

/// Notification record. `timestamp` is unix seconds at creation.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Notification {
    pub id: i64,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub message: String,
    pub timestamp: i64,
    pub is_read: bool,
}
