//! Plant pages

use chrono::{NaiveDate, Utc};
use clap::{Args, Subcommand};
use colored::*;
use inquire::Confirm;
use sprout_client::api::{
    DiseaseEndRequest, DiseaseLogRequest, FertilisingRequest, Light, Location, PlantRequest,
};
use sprout_client::plants::filter_needing_water;
use sprout_client::SproutClient;
use sprout_cli::pages::{protected_data, require_user};
use sprout_cli::render::{plant_details, plants_table};
use sprout_cli::{CliError, CliResult};
use std::path::{Path, PathBuf};

#[derive(Debug, Subcommand)]
pub enum PlantCommands {
    /// List your plants
    List {
        /// Only plants that are due for watering
        #[arg(long)]
        needs_water: bool,
    },
    /// Show one plant with its care logs
    Show { id: u64 },
    /// Add a plant
    Add(PlantArgs),
    /// Change a plant; omitted options keep their current value
    Edit {
        id: u64,
        #[command(flatten)]
        changes: PlantChanges,
    },
    /// Record a watering
    Water { id: u64 },
    /// Remove a plant
    Delete {
        id: u64,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Record a fertiliser application
    Fertilise {
        id: u64,
        #[arg(long = "type")]
        kind: String,
        #[arg(long)]
        quantity: f64,
    },
    /// Record that a plant got sick
    Disease {
        id: u64,
        /// Disease type, as listed by `sprout diseases`
        #[arg(long)]
        disease: String,
        /// First day of the disease (defaults to today)
        #[arg(long)]
        since: Option<NaiveDate>,
        #[arg(long)]
        treatment: Option<String>,
    },
    /// Mark a disease as over
    Cure {
        id: u64,
        /// Disease log entry id shown by `sprout plants show`
        #[arg(long)]
        disease_log: u64,
        /// Last day of the disease (defaults to today)
        #[arg(long)]
        on: Option<NaiveDate>,
    },
}

#[derive(Debug, Args)]
pub struct PlantArgs {
    #[arg(long)]
    pub name: String,
    /// Watering interval in days
    #[arg(long)]
    pub water_every: u32,
    /// Water per watering
    #[arg(long)]
    pub volume: f64,
    /// full-sun, partial-shadow or full-shadow
    #[arg(long)]
    pub light: Light,
    /// Window direction, e.g. south or north-east
    #[arg(long)]
    pub location: Location,
    #[arg(long)]
    pub species: Option<String>,
    #[arg(long)]
    pub comment: Option<String>,
    /// Photo to upload
    #[arg(long)]
    pub photo: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct PlantChanges {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub water_every: Option<u32>,
    #[arg(long)]
    pub volume: Option<f64>,
    #[arg(long)]
    pub light: Option<Light>,
    #[arg(long)]
    pub location: Option<Location>,
    #[arg(long)]
    pub species: Option<String>,
    #[arg(long)]
    pub comment: Option<String>,
    #[arg(long)]
    pub photo: Option<PathBuf>,
}

impl PlantCommands {
    pub async fn execute(&self, client: &SproutClient) -> CliResult<()> {
        match self {
            PlantCommands::List { needs_water } => list(client, *needs_water).await,
            PlantCommands::Show { id } => show(client, *id).await,
            PlantCommands::Add(args) => add(client, args).await,
            PlantCommands::Edit { id, changes } => edit(client, *id, changes).await,
            PlantCommands::Water { id } => {
                require_user(client).await?;
                client.api.water_plant(*id).await?;
                println!("{} Plant watered", "✓".green().bold());
                Ok(())
            }
            PlantCommands::Delete { id, yes } => delete(client, *id, *yes).await,
            PlantCommands::Fertilise { id, kind, quantity } => {
                require_user(client).await?;
                let request = FertilisingRequest {
                    kind: kind.clone(),
                    quantity: *quantity,
                };
                client.api.log_fertilising(*id, &request).await?;
                println!("{} Fertilising logged", "✓".green().bold());
                Ok(())
            }
            PlantCommands::Disease {
                id,
                disease,
                since,
                treatment,
            } => log_disease(client, *id, disease, *since, treatment.clone()).await,
            PlantCommands::Cure {
                id,
                disease_log,
                on,
            } => {
                require_user(client).await?;
                let request = DiseaseEndRequest {
                    end_date: on.unwrap_or_else(today),
                    plant_disease_id: *disease_log,
                };
                client.api.end_disease(*id, &request).await?;
                println!("{} Disease marked as over", "✓".green().bold());
                Ok(())
            }
        }
    }
}

/// Catalogue used by `plants disease`
pub async fn list_diseases(client: &SproutClient) -> CliResult<()> {
    let (_, diseases) = protected_data(client, || client.api.diseases()).await?;
    for disease in diseases {
        println!("  {}", disease.kind);
    }
    Ok(())
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

async fn list(client: &SproutClient, needs_water: bool) -> CliResult<()> {
    let (_, plants) = protected_data(client, || client.api.my_plants()).await?;

    if plants.is_empty() {
        println!("You have no plants yet");
        return Ok(());
    }
    let shown = filter_needing_water(&plants, needs_water);
    if shown.is_empty() {
        println!("{} Every plant is watered", "✓".green().bold());
        return Ok(());
    }
    println!("{}", plants_table(&shown));
    Ok(())
}

async fn show(client: &SproutClient, id: u64) -> CliResult<()> {
    let (_, info) = protected_data(client, || client.api.plant(id)).await?;
    println!("{}", plant_details(&info));
    Ok(())
}

async fn upload_photo(client: &SproutClient, photo: Option<&Path>) -> CliResult<Option<String>> {
    match photo {
        Some(path) => Ok(Some(client.api.upload_plant_photo(path).await?.filename)),
        None => Ok(None),
    }
}

async fn add(client: &SproutClient, args: &PlantArgs) -> CliResult<()> {
    require_user(client).await?;

    let mut request = PlantRequest {
        name: args.name.clone(),
        photo: None,
        how_often_watering: args.water_every,
        water_volume: args.volume,
        light: args.light,
        location: args.location,
        comment: args.comment.clone(),
        species: args.species.clone(),
    };
    // Catch form errors before spending an upload
    request.validate()?;
    request.photo = upload_photo(client, args.photo.as_deref()).await?;

    client.api.create_plant(&request).await?;
    println!("{} Added {}", "✓".green().bold(), request.name.bold());
    Ok(())
}

async fn edit(client: &SproutClient, id: u64, changes: &PlantChanges) -> CliResult<()> {
    let (_, current) = protected_data(client, || client.api.plant(id)).await?;

    let mut request = PlantRequest::from(&current.info);
    if let Some(name) = &changes.name {
        request.name = name.clone();
    }
    if let Some(days) = changes.water_every {
        request.how_often_watering = days;
    }
    if let Some(volume) = changes.volume {
        request.water_volume = volume;
    }
    if let Some(light) = changes.light {
        request.light = light;
    }
    if let Some(location) = changes.location {
        request.location = location;
    }
    if changes.species.is_some() {
        request.species = changes.species.clone();
    }
    if changes.comment.is_some() {
        request.comment = changes.comment.clone();
    }
    request.validate()?;
    if let Some(photo) = upload_photo(client, changes.photo.as_deref()).await? {
        request.photo = Some(photo);
    }

    client.api.update_plant(id, &request).await?;
    println!("{} Updated {}", "✓".green().bold(), request.name.bold());
    Ok(())
}

async fn delete(client: &SproutClient, id: u64, yes: bool) -> CliResult<()> {
    let (_, info) = protected_data(client, || client.api.plant(id)).await?;

    if !yes {
        let confirmed = Confirm::new(&format!("Delete {}?", info.info.name))
            .with_default(false)
            .prompt()?;
        if !confirmed {
            println!("Kept {}", info.info.name);
            return Ok(());
        }
    }

    client.api.delete_plant(id).await?;
    println!("{} Deleted {}", "✓".green().bold(), info.info.name);
    Ok(())
}

async fn log_disease(
    client: &SproutClient,
    id: u64,
    disease: &str,
    since: Option<NaiveDate>,
    treatment: Option<String>,
) -> CliResult<()> {
    let (_, catalogue) = protected_data(client, || client.api.diseases()).await?;

    let known = catalogue
        .iter()
        .find(|d| d.kind.eq_ignore_ascii_case(disease))
        .ok_or_else(|| CliError::InvalidInput(format!("Unknown disease type: {}", disease)))?;

    let request = DiseaseLogRequest {
        disease_id: known.id,
        start_date: since.unwrap_or_else(today),
        treatment,
    };
    client.api.log_disease(id, &request).await?;
    println!("{} {} logged", "✓".green().bold(), known.kind);
    Ok(())
}
