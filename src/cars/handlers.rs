use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::{
    dto::CreateCarRequest,
    repo,
    repo_types::{Car, NewCar},
};
use crate::{
    auth::AuthUser,
    dto::MessageResponse,
    error::{AppError, AppResult},
    extract::{ApiJson, ApiPath},
    state::AppState,
};

pub fn car_routes() -> Router<AppState> {
    Router::new()
        .route("/cars", get(list_cars).post(create_car))
        .route("/cars/:id", get(get_car).delete(delete_car))
}

fn car_not_found() -> AppError {
    AppError::NotFound("Car not found".into())
}

#[instrument(skip(state))]
pub async fn list_cars(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Vec<Car>>> {
    let cars = repo::list_by_owner(&state.db, user_id).await?;
    Ok(Json(cars))
}

#[instrument(skip(state, body), fields(car_name = %body.car_name))]
pub async fn create_car(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(body): ApiJson<CreateCarRequest>,
) -> AppResult<(StatusCode, Json<Car>)> {
    let photo = body.photo.as_deref().unwrap_or_default();
    let car = repo::create(
        &state.db,
        user_id,
        NewCar {
            car_name: &body.car_name,
            year_of_manufacture: &body.year_of_manufacture,
            car_value: &body.car_value,
            photo,
        },
    )
    .await?
    .ok_or_else(|| {
        warn!(user_id, "car owner no longer exists");
        AppError::NotFound("User not found".into())
    })?;

    info!(user_id, car_id = car.id, "car created");
    Ok((StatusCode::CREATED, Json(car)))
}

#[instrument(skip(state))]
pub async fn get_car(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<Car>> {
    let car = repo::find_owned(&state.db, user_id, id)
        .await?
        .ok_or_else(car_not_found)?;
    Ok(Json(car))
}

#[instrument(skip(state))]
pub async fn delete_car(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<MessageResponse>> {
    if !repo::delete_owned(&state.db, user_id, id).await? {
        return Err(car_not_found());
    }
    info!(user_id, car_id = id, "car deleted");
    Ok(Json(MessageResponse::new("Car deleted")))
}
