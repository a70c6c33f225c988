use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{info, instrument};

use super::{dto::Inbox, dto::SendNotificationRequest, repo, repo_types::Notification};
use crate::{
    auth::AuthUser,
    dto::MessageResponse,
    error::{AppError, AppResult},
    extract::{ApiJson, ApiPath},
    state::AppState,
};

pub fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(list_notifications).post(send_notification))
        .route("/notifications/:id/mark_read", post(mark_read))
}

#[instrument(skip(state))]
pub async fn list_notifications(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Inbox>> {
    let all = repo::list_for_receiver(&state.db, user_id).await?;
    Ok(Json(all.into()))
}

#[instrument(skip(state, body))]
pub async fn send_notification(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(body): ApiJson<SendNotificationRequest>,
) -> AppResult<Json<Notification>> {
    let now = OffsetDateTime::now_utc().unix_timestamp();
    let notification = repo::create(&state.db, user_id, body.receiver_id, &body.message, now)
        .await?
        .ok_or_else(|| AppError::NotFound("Receiver not found".into()))?;

    info!(
        sender_id = user_id,
        receiver_id = notification.receiver_id,
        notification_id = notification.id,
        "notification sent"
    );
    Ok(Json(notification))
}

#[instrument(skip(state))]
pub async fn mark_read(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<MessageResponse>> {
    if !repo::mark_read(&state.db, user_id, id).await? {
        return Err(AppError::NotFound("Notification not found".into()));
    }
    Ok(Json(MessageResponse::new("Notification marked as read")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(id: i64, is_read: bool) -> Notification {
        Notification {
            id,
            sender_id: 1,
            receiver_id: 2,
            message: "hi".into(),
            timestamp: 0,
            is_read,
        }
    }

    #[test]
    fn inbox_splits_by_flag_and_keeps_order() {
        let inbox = Inbox::from(vec![note(3, false), note(2, true), note(1, false)]);
        let unread: Vec<i64> = inbox.unread.iter().map(|n| n.id).collect();
        let read: Vec<i64> = inbox.read.iter().map(|n| n.id).collect();
        assert_eq!(unread, [3, 1]);
        assert_eq!(read, [2]);
    }

    #[test]
    fn inbox_items_serialize_read_flag() {
        let json = serde_json::to_value(Inbox::from(vec![note(1, false)])).unwrap();
        assert_eq!(json["unread"][0]["is_read"], false);
        assert_eq!(json["read"], serde_json::json!([]));
    }
}
