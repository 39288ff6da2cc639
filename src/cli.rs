//! CLI commands for horis-api.
//!
//! Supports API server mode, offline prediction mode, and store import.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::model::create_shared_model;
use crate::predictor::Predictor;
use crate::storage::{HorseRecord, HorseRepository};
use crate::types::{RaceEntry, RankedHorse};

#[derive(Parser)]
#[command(name = "horis-api")]
#[command(version, about = "Horis: horse race outcome prediction API and CLI", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the API server
    Serve {
        /// Host to bind to
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value_t = 8080)]
        port: u16,
    },

    /// Rank a race from a JSON file of race entries
    Predict {
        /// Path to race entries JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output format (json, table)
        #[arg(short, long, default_value = "json")]
        format: String,

        /// Model path override
        #[arg(short, long)]
        model: Option<PathBuf>,

        /// Horse database path override
        #[arg(short, long)]
        database: Option<PathBuf>,
    },

    /// Load horse records from a JSON dump into the store
    Import {
        /// Path to horse records JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Horse database path override
        #[arg(short, long)]
        database: Option<PathBuf>,
    },
}

/// Run CLI prediction from file.
pub async fn run_predict(
    input: PathBuf,
    format: String,
    model_path: Option<PathBuf>,
    db_path: Option<PathBuf>,
) -> anyhow::Result<()> {
    // Load configuration
    let mut config = AppConfig::load()?;

    // Override paths if provided
    if let Some(path) = model_path {
        config.model.path = path.to_string_lossy().to_string();
    }
    if let Some(path) = db_path {
        config.database.path = path.to_string_lossy().to_string();
    }

    // Load model
    eprintln!("Loading model from: {}", config.model.path);
    let model = create_shared_model(&config.model.path)?;
    eprintln!("Model loaded successfully");

    // Open horse store
    let horses = Arc::new(HorseRepository::open(Path::new(&config.database.path))?);

    // Read input file
    let input_json = std::fs::read_to_string(&input)?;
    let entries: Vec<RaceEntry> = serde_json::from_str(&input_json)?;

    eprintln!("Horses in race: {}", entries.len());

    let predictor = Predictor::new(model, horses);
    let ranked = predictor.predict_race(&entries)?;

    match format.as_str() {
        "table" => print_ranking_table(&ranked),
        _ => println!("{}", serde_json::to_string_pretty(&ranked)?),
    }

    Ok(())
}

/// Run store import from file.
pub async fn run_import(input: PathBuf, db_path: Option<PathBuf>) -> anyhow::Result<()> {
    let mut config = AppConfig::load()?;
    if let Some(path) = db_path {
        config.database.path = path.to_string_lossy().to_string();
    }

    let horses = HorseRepository::open(Path::new(&config.database.path))?;

    let input_json = std::fs::read_to_string(&input)?;
    let records: Vec<HorseRecord> = serde_json::from_str(&input_json)?;

    for record in &records {
        horses.insert_horse(record)?;
    }

    eprintln!(
        "Imported {} horses ({} in store)",
        records.len(),
        horses.horse_count()?
    );

    Ok(())
}

/// Print a ranked race as a table, best predicted finish first.
fn print_ranking_table(ranked: &[RankedHorse]) {
    println!(
        "{:<5} {:<30} {:<5} {:<20} {:>5} {:>12}",
        "Pos", "Name", "Age", "Driver", "Start", "Prediction"
    );
    for (i, horse) in ranked.iter().enumerate() {
        println!(
            "{:<5} {:<30} {:<5} {:<20} {:>5} {:>12.4}",
            i + 1,
            horse.name,
            horse.age,
            horse.driver,
            horse.start,
            horse.prediction
        );
    }
}
