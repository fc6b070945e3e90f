//! API request and response models for the Sprout REST API
//!
//! Deserializing into these types is the response-shape check: a payload
//! that does not fit is reported as [`ClientError::InvalidResponse`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

pub const MAX_PLANT_NAME_LEN: usize = 100;
pub const MAX_SPECIES_LEN: usize = 100;
pub const MAX_COMMENT_LEN: usize = 500;
pub const MAX_WATERING_INTERVAL_DAYS: u32 = 366;
pub const MAX_WATER_VOLUME: f64 = 1000.0;

/// Identity returned by `GET /me`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub name: String,
    pub email: String,
    pub photo: Option<String>,
    pub is_guest: bool,
}

/// Profile view of `GET /me`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub name: String,
    pub email: String,
    pub photo: Option<String>,
}

impl UserInfo {
    pub fn validate(&self) -> ClientResult<()> {
        if !looks_like_email(&self.email) {
            return Err(ClientError::invalid_response(format!(
                "'{}' is not an email address",
                self.email
            )));
        }
        Ok(())
    }
}

/// Loose `local@domain.tld` check
pub fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .map(|(host, tld)| !host.is_empty() && !tld.is_empty())
                    .unwrap_or(false)
        }
        None => false,
    }
}

#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// `PATCH /me`; absent fields are sent as null and left unchanged by the server
#[derive(Debug, Default, Serialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub photo: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Named, time-bounded guest permission issued by a plant owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessGrant {
    pub id: i64,
    pub token: String,
    pub name_token: String,
    pub user_id: i64,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Serialize)]
pub struct CreateAccessGrantRequest {
    pub guest_name: String,
    pub end_date: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct RevokeAccessGrantRequest {
    pub token_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct GuestAuthorizeResponse {
    pub guest_token: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Light {
    #[serde(rename = "full sun")]
    FullSun,
    #[serde(rename = "partial shadow")]
    PartialShadow,
    #[serde(rename = "full shadow")]
    FullShadow,
}

impl Light {
    pub fn as_str(&self) -> &'static str {
        match self {
            Light::FullSun => "full sun",
            Light::PartialShadow => "partial shadow",
            Light::FullShadow => "full shadow",
        }
    }
}

impl std::str::FromStr for Light {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], " ").as_str() {
            "full sun" => Ok(Light::FullSun),
            "partial shadow" => Ok(Light::PartialShadow),
            "full shadow" => Ok(Light::FullShadow),
            _ => Err(ClientError::validation(format!("Unknown light level: {}", s))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    South,
    North,
    East,
    West,
    SouthEast,
    SouthWest,
    NorthEast,
    NorthWest,
}

impl Location {
    pub fn as_str(&self) -> &'static str {
        match self {
            Location::South => "south",
            Location::North => "north",
            Location::East => "east",
            Location::West => "west",
            Location::SouthEast => "south_east",
            Location::SouthWest => "south_west",
            Location::NorthEast => "north_east",
            Location::NorthWest => "north_west",
        }
    }
}

impl std::str::FromStr for Location {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', ' '], "_").as_str() {
            "south" => Ok(Location::South),
            "north" => Ok(Location::North),
            "east" => Ok(Location::East),
            "west" => Ok(Location::West),
            "south_east" => Ok(Location::SouthEast),
            "south_west" => Ok(Location::SouthWest),
            "north_east" => Ok(Location::NorthEast),
            "north_west" => Ok(Location::NorthWest),
            _ => Err(ClientError::validation(format!("Unknown location: {}", s))),
        }
    }
}

/// Entry of `GET /my-plants`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MyPlant {
    pub id: u64,
    pub name: String,
    #[serde(rename = "howOftenWatering")]
    pub how_often_watering: u32,
    pub light: Light,
    pub location: Location,
    pub species: Option<String>,
    pub photo_url: Option<String>,
    #[serde(rename = "waterVolume")]
    pub water_volume: f64,
    pub comment: Option<String>,
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub is_healthy: bool,
    pub time_to_water: bool,
}

impl MyPlant {
    pub fn validate(&self) -> ClientResult<()> {
        check_len("name", &self.name, MAX_PLANT_NAME_LEN).map_err(as_response_error)
    }
}

/// `info` block of `GET /my-plants/:id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantRecord {
    pub id: u64,
    pub name: String,
    #[serde(rename = "howOftenWatering")]
    pub how_often_watering: u32,
    pub light: Light,
    pub location: Location,
    pub species: Option<String>,
    pub photo_url: Option<String>,
    #[serde(rename = "waterVolume")]
    pub water_volume: f64,
    pub comment: Option<String>,
    #[serde(rename = "userId")]
    pub user_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WateringLog {
    #[serde(rename = "dateTime")]
    pub date_time: String,
    pub id: u64,
    #[serde(rename = "plantId")]
    pub plant_id: u64,
    #[serde(rename = "waterVolume")]
    pub water_volume: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FertilizingLog {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "dateTime")]
    pub date_time: String,
    pub quantity: f64,
    pub id: u64,
    #[serde(rename = "plantId")]
    pub plant_id: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseLog {
    pub disease_type: String,
    pub id: u64,
    #[serde(rename = "startDate")]
    pub start_date: String,
    #[serde(rename = "plantId")]
    pub plant_id: u64,
    #[serde(rename = "endDate")]
    pub end_date: Option<String>,
    pub treatment: Option<String>,
}

impl DiseaseLog {
    pub fn is_active(&self) -> bool {
        self.end_date.is_none()
    }
}

/// `GET /my-plants/:id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantInfo {
    pub info: PlantRecord,
    pub watering_log: Option<WateringLog>,
    pub fertilizing_log: Option<FertilizingLog>,
    pub disease_log: Option<Vec<Option<DiseaseLog>>>,
}

impl PlantInfo {
    pub fn validate(&self) -> ClientResult<()> {
        check_len("name", &self.info.name, MAX_PLANT_NAME_LEN).map_err(as_response_error)?;
        if let Some(log) = &self.fertilizing_log {
            if log.quantity < 0.0 {
                return Err(ClientError::invalid_response(
                    "fertilizing quantity is negative",
                ));
            }
        }
        Ok(())
    }

    /// Disease entries with the null placeholders dropped
    pub fn diseases(&self) -> impl Iterator<Item = &DiseaseLog> {
        self.disease_log.iter().flatten().flatten()
    }
}

/// Entry of `GET /all-diseases`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disease {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Body of `POST /my-plants` and `PATCH /my-plants/:id`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlantRequest {
    pub name: String,
    pub photo: Option<String>,
    #[serde(rename = "howOftenWatering")]
    pub how_often_watering: u32,
    #[serde(rename = "waterVolume")]
    pub water_volume: f64,
    pub light: Light,
    pub location: Location,
    pub comment: Option<String>,
    pub species: Option<String>,
}

impl PlantRequest {
    /// Form rules applied before anything is sent
    pub fn validate(&self) -> ClientResult<()> {
        check_len("name", &self.name, MAX_PLANT_NAME_LEN)?;
        if self.how_often_watering > MAX_WATERING_INTERVAL_DAYS {
            return Err(ClientError::validation(format!(
                "watering interval must be at most {} days",
                MAX_WATERING_INTERVAL_DAYS
            )));
        }
        if !(0.0..=MAX_WATER_VOLUME).contains(&self.water_volume) {
            return Err(ClientError::validation(format!(
                "water volume must be between 0 and {}",
                MAX_WATER_VOLUME
            )));
        }
        if let Some(species) = &self.species {
            check_len("species", species, MAX_SPECIES_LEN)?;
        }
        if let Some(comment) = &self.comment {
            check_len("comment", comment, MAX_COMMENT_LEN)?;
        }
        Ok(())
    }
}

impl From<&PlantRecord> for PlantRequest {
    fn from(record: &PlantRecord) -> Self {
        Self {
            name: record.name.clone(),
            photo: record.photo_url.clone(),
            how_often_watering: record.how_often_watering,
            water_volume: record.water_volume,
            light: record.light,
            location: record.location,
            comment: record.comment.clone(),
            species: record.species.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FertilisingRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub quantity: f64,
}

impl FertilisingRequest {
    pub fn validate(&self) -> ClientResult<()> {
        if self.kind.trim().is_empty() {
            return Err(ClientError::validation("fertiliser type is required"));
        }
        if self.quantity < 0.0 {
            return Err(ClientError::validation("quantity must not be negative"));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct DiseaseLogRequest {
    #[serde(rename = "diseaseId")]
    pub disease_id: u64,
    #[serde(rename = "startDate")]
    pub start_date: NaiveDate,
    pub treatment: Option<String>,
}

impl DiseaseLogRequest {
    /// A disease cannot start in the future
    pub fn validate(&self, today: NaiveDate) -> ClientResult<()> {
        if self.start_date > today {
            return Err(ClientError::validation("start date is in the future"));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct DiseaseEndRequest {
    pub end_date: NaiveDate,
    pub plant_disease_id: u64,
}

/// Response of the upload endpoints
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadResult {
    pub filename: String,
    pub user_id: i64,
}

fn check_len(field: &str, value: &str, max: usize) -> ClientResult<()> {
    if value.chars().count() > max {
        return Err(ClientError::validation(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}

fn as_response_error(err: ClientError) -> ClientError {
    match err {
        ClientError::Validation(msg) => ClientError::InvalidResponse(msg),
        other => other,
    }
}
