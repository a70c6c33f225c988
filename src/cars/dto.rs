use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateCarRequest {
    pub car_name: String,
    pub year_of_manufacture: String,
    pub car_value: String,
    #[serde(default)]
    pub photo: Option<String>, // absent or null is stored as ""
}
