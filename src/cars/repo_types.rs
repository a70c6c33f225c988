use serde::Serialize;
use sqlx::FromRow;

/// Car record in the database. Value fields are free text.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Car {
    pub id: i64,
    pub user_id: i64,
    pub car_name: String,
    pub year_of_manufacture: String,
    pub car_value: String,
    pub photo: String,
}

pub struct NewCar<'a> {
    pub car_name: &'a str,
    pub year_of_manufacture: &'a str,
    pub car_value: &'a str,
    pub photo: &'a str,
}
