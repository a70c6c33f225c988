use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{
            ChangeEmailRequest, ChangePasswordRequest, LoginRequest, LoginResponse, PublicUser,
            RegisterRequest, UpdateProfileRequest,
        },
        extractors::AuthUser,
        jwt::JwtKeys,
        password,
        repo_types::{NewUser, User},
        services::{require_email, require_non_empty},
    },
    dto::MessageResponse,
    error::{AppError, AppResult},
    extract::ApiJson,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/profile",
            get(get_profile)
                .put(update_profile)
                .delete(delete_profile),
        )
        .route("/password", put(change_password))
        .route("/email", put(change_email))
}

fn user_not_found() -> AppError {
    AppError::NotFound("User not found".into())
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<PublicUser>)> {
    require_non_empty("first_name", &payload.first_name)?;
    require_non_empty("last_name", &payload.last_name)?;
    require_email(&payload.email)?;
    require_non_empty("password", &payload.password)?;

    let hash = password::hash(payload.password).await?;

    let user = User::create(
        &state.db,
        NewUser {
            first_name: &payload.first_name,
            last_name: &payload.last_name,
            email: &payload.email,
            organization: &payload.organization,
            password_hash: &hash,
        },
    )
    .await
    .map_err(|e| {
        let e = AppError::from(e);
        if matches!(e, AppError::Conflict(_)) {
            warn!(email = %payload.email, "email already registered");
        }
        e
    })?;

    info!(user_id = user.id, email = %user.email, "user registered");
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let Some(user) = User::find_by_email(&state.db, &payload.email).await? else {
        warn!(email = %payload.email, "login unknown email");
        password::verify_decoy(payload.password).await;
        return Err(AppError::Auth("Invalid credentials".into()));
    };

    if !password::verify(payload.password, user.password_hash.clone()).await? {
        warn!(user_id = user.id, "login invalid password");
        return Err(AppError::Auth("Invalid credentials".into()));
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id)?;

    info!(user_id = user.id, "user logged in");
    Ok(Json(LoginResponse {
        token,
        user: user.into(),
    }))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<PublicUser>> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(user_not_found)?;
    Ok(Json(user.into()))
}

#[instrument(skip(state))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(payload): ApiJson<UpdateProfileRequest>,
) -> AppResult<Json<PublicUser>> {
    require_non_empty("first_name", &payload.first_name)?;
    require_non_empty("last_name", &payload.last_name)?;

    let user = User::update_profile(
        &state.db,
        user_id,
        &payload.first_name,
        &payload.last_name,
        &payload.organization,
    )
    .await?
    .ok_or_else(user_not_found)?;

    info!(user_id, "profile updated");
    Ok(Json(user.into()))
}

#[instrument(skip(state))]
pub async fn delete_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<MessageResponse>> {
    if !User::delete_account(&state.db, user_id).await? {
        return Err(user_not_found());
    }
    info!(user_id, "account deleted");
    Ok(Json(MessageResponse::new("Account deleted")))
}

#[instrument(skip(state, payload))]
pub async fn change_password(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(payload): ApiJson<ChangePasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    require_non_empty("password", &payload.password)?;

    let hash = password::hash(payload.password).await?;
    if !User::update_password(&state.db, user_id, &hash).await? {
        return Err(user_not_found());
    }
    info!(user_id, "password changed");
    Ok(Json(MessageResponse::new("Password updated")))
}

#[instrument(skip(state))]
pub async fn change_email(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(payload): ApiJson<ChangeEmailRequest>,
) -> AppResult<Json<PublicUser>> {
    require_email(&payload.email)?;

    let user = User::update_email(&state.db, user_id, &payload.email)
        .await?
        .ok_or_else(user_not_found)?;
    info!(user_id, "email changed");
    Ok(Json(user.into()))
}
