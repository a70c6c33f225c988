use sqlx::SqlitePool;

use super::repo_types::{Car, NewCar};
use crate::db::StoreError;

pub async fn list_by_owner(db: &SqlitePool, user_id: i64) -> Result<Vec<Car>, StoreError> {
    let rows = sqlx::query_as::<_, Car>(
        r#"
        SELECT id, user_id, car_name, year_of_manufacture, car_value, photo
          FROM cars
         WHERE user_id = ?
         ORDER BY id
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn find_owned(
    db: &SqlitePool,
    user_id: i64,
    car_id: i64,
) -> Result<Option<Car>, StoreError> {
    let row = sqlx::query_as::<_, Car>(
        r#"
        SELECT id, user_id, car_name, year_of_manufacture, car_value, photo
          FROM cars
         WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(car_id)
    .bind(user_id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

/// Insert a car for `user_id`. `None` when that user no longer exists.
pub async fn create(
    db: &SqlitePool,
    user_id: i64,
    new: NewCar<'_>,
) -> Result<Option<Car>, StoreError> {
    let row = sqlx::query_as::<_, Car>(
        r#"
        INSERT INTO cars (user_id, car_name, year_of_manufacture, car_value, photo)
        SELECT id, ?, ?, ?, ?
          FROM users
         WHERE id = ?
        RETURNING id, user_id, car_name, year_of_manufacture, car_value, photo
        "#,
    )
    .bind(new.car_name)
    .bind(new.year_of_manufacture)
    .bind(new.car_value)
    .bind(new.photo)
    .bind(user_id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

/// Deletes only when both id and owner match; `false` covers missing and foreign cars alike.
pub async fn delete_owned(
    db: &SqlitePool,
    user_id: i64,
    car_id: i64,
) -> Result<bool, StoreError> {
    let res = sqlx::query("DELETE FROM cars WHERE id = ? AND user_id = ?")
        .bind(car_id)
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(res.rows_affected() > 0)
}
