//! Small helpers used when listing plants and grants

use chrono::NaiveDate;

use crate::api::MyPlant;

/// Plants to show: all of them, or only those due for watering
pub fn filter_needing_water(plants: &[MyPlant], only_thirsty: bool) -> Vec<&MyPlant> {
    plants
        .iter()
        .filter(|plant| plant.time_to_water || !only_thirsty)
        .collect()
}

/// Date portion of an ISO date-time string (`2024-05-14T10:00:00Z` -> `2024-05-14`)
pub fn date_part(value: &str) -> &str {
    value.split('T').next().unwrap_or(value)
}

/// `2024-05-14T10:00:00Z` -> `14 May`, or `None` for anything else
pub fn day_and_month(value: &str) -> Option<String> {
    NaiveDate::parse_from_str(date_part(value), "%Y-%m-%d")
        .ok()
        .map(|date| date.format("%-d %B").to_string())
}
