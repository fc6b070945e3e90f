//! Terminal rendering and input parsing for the CLI pages

use chrono::{DateTime, NaiveDate, Utc};
use colored::*;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use sprout_client::api::PlantInfo;
use sprout_client::plants::{date_part, day_and_month};
use sprout_client::share::share_url;
use sprout_client::{AccessGrant, MyPlant, Route};
use url::Url;

use crate::error::{CliError, CliResult};

fn table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

pub fn plants_table(plants: &[&MyPlant]) -> Table {
    let mut t = table(vec!["ID", "Name", "Species", "Water every", "Status"]);
    for plant in plants {
        let mut status = Vec::new();
        if plant.time_to_water {
            status.push("needs water");
        }
        if !plant.is_healthy {
            status.push("sick");
        }
        t.add_row(vec![
            plant.id.to_string(),
            plant.name.clone(),
            plant.species.clone().unwrap_or_else(|| "-".to_string()),
            format!("{} days", plant.how_often_watering),
            if status.is_empty() {
                "ok".to_string()
            } else {
                status.join(", ")
            },
        ]);
    }
    t
}

pub fn grants_table(grants: &[AccessGrant], public_url: &Url) -> Table {
    let mut t = table(vec!["ID", "Guest", "Valid until", "Link"]);
    for grant in grants {
        let link = share_url(public_url, &grant.token)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| "-".to_string());
        let until = day_and_month(&grant.end_date)
            .unwrap_or_else(|| date_part(&grant.end_date).to_string());
        t.add_row(vec![grant.id.to_string(), grant.name_token.clone(), until, link]);
    }
    t
}

pub fn plant_details(info: &PlantInfo) -> String {
    let plant = &info.info;
    let mut lines = vec![
        format!("{} {}", plant.name.bold().green(), format!("#{}", plant.id).dimmed()),
        format!("  Species:   {}", plant.species.as_deref().unwrap_or("-")),
        format!(
            "  Watering:  {} every {} days",
            plant.water_volume, plant.how_often_watering
        ),
        format!("  Light:     {}", plant.light.as_str()),
        format!("  Location:  {}", plant.location.as_str()),
    ];
    if let Some(comment) = &plant.comment {
        lines.push(format!("  Comment:   {}", comment));
    }

    match &info.watering_log {
        Some(log) => lines.push(format!("  Last watered:    {}", date_part(&log.date_time))),
        None => lines.push("  Last watered:    never".to_string()),
    }
    if let Some(log) = &info.fertilizing_log {
        lines.push(format!(
            "  Last fertilised: {} ({} x {})",
            date_part(&log.date_time),
            log.kind,
            log.quantity
        ));
    }

    let diseases: Vec<_> = info.diseases().collect();
    if !diseases.is_empty() {
        lines.push("  Diseases:".to_string());
        for disease in diseases {
            let span = match &disease.end_date {
                Some(end) => format!("{} - {}", date_part(&disease.start_date), date_part(end)),
                None => format!("since {}", date_part(&disease.start_date)).red().to_string(),
            };
            lines.push(format!(
                "    [{}] {} ({}){}",
                disease.id,
                disease.disease_type,
                span,
                disease
                    .treatment
                    .as_deref()
                    .map(|t| format!(", treated with {}", t))
                    .unwrap_or_default()
            ));
        }
    }

    lines.join("\n")
}

/// Accept either a bare access code or a full guest-access link
pub fn parse_access_code(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let path = match Url::parse(input) {
        Ok(url) => url.path().to_string(),
        Err(_) => input.to_string(),
    };
    if path.starts_with('/') {
        return match Route::parse(&path) {
            Some(Route::GuestAccess(code)) | Some(Route::Share(code)) => Some(code),
            _ => None,
        };
    }
    Some(input.to_string())
}

/// `YYYY-MM-DD`, not before `today`, as midnight UTC
pub fn parse_end_date(input: &str, today: NaiveDate) -> CliResult<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| CliError::InvalidInput(format!("'{}' is not a YYYY-MM-DD date", input)))?;
    if date < today {
        return Err(CliError::InvalidInput("end date is in the past".to_string()));
    }
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| CliError::InvalidInput(input.to_string()))?;
    Ok(midnight.and_utc())
}
