use std::{
    collections::BTreeMap,
    error::Error,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use clap::Parser;
use futures::StreamExt;
use num_format::{Locale, ToFormattedString};
use serde::Serialize;
use simple_logger::SimpleLogger;
use tokio::task::JoinError;

use fuelburn::{
    flights::{load_flights, Flight},
    fuel_flow::{EmissionIndices, ReferenceModels},
    limits::{load_limits, load_limits_from},
    Limits, MissionConfig, MissionOutcome, SearchConfig, WeightPolicy,
};

#[derive(Serialize, Default)]
struct Status {
    flights: usize,
    processed: usize,
    failed: usize,
    /// number of failed flights per kind of error
    errors: BTreeMap<&'static str, usize>,
    fuel_burnt_kg: f64,
    #[serde(rename = "CO2_kg")]
    co2_kg: f64,
}

impl Status {
    /// Counts the result of one flight, returning its outcome if it was computed
    fn record(
        &mut self,
        flight_id: &str,
        result: Result<Result<MissionOutcome, fuelburn::Error>, JoinError>,
    ) -> Option<MissionOutcome> {
        match result {
            Ok(Ok(outcome)) => {
                self.processed += 1;
                self.fuel_burnt_kg += outcome.summary.fuel_burnt_kg;
                self.co2_kg += outcome.summary.co2_kg;
                Some(outcome)
            }
            Ok(Err(e)) => {
                log::warn!("{flight_id} skipped: {e}");
                self.failed += 1;
                *self.errors.entry(e.kind()).or_default() += 1;
                None
            }
            Err(e) => {
                log::error!("{flight_id} panicked: {e}");
                self.failed += 1;
                *self.errors.entry("panic").or_default() += 1;
                None
            }
        }
    }
}

const ABOUT: &'static str = "Computes the fuel burn and emissions of every flight of a waypoints table";

#[derive(Parser, Debug)]
#[command(author, version, about = ABOUT)]
struct Cli {
    /// CSV with `flight_id,latitude,longitude,altitude_ft,time,true_airspeed,segment_length`
    #[arg(long)]
    waypoints: PathBuf,
    /// CSV with `flight_id,aircraft_type`
    #[arg(long)]
    flights: PathBuf,
    /// Where the summary of every computed flight is written
    #[arg(long, default_value = "summary.csv")]
    output: PathBuf,
    /// Where the per-segment fuel burn and emissions are written, if at all
    #[arg(long)]
    segments: Option<PathBuf>,
    /// Where the counts of processed and failed flights are written
    #[arg(long, default_value = "status.json")]
    status: PathBuf,
    /// Limits table replacing the shipped one
    #[arg(long)]
    limits: Option<PathBuf>,
    /// Fraction of the maximum payload carried
    #[arg(long, default_value_t = 0.5)]
    payload_factor: f64,
    /// First fuel factor tried
    #[arg(long, default_value_t = SearchConfig::accurate().seed)]
    seed: f64,
    /// Increment of the fuel factor after running out of trip fuel
    #[arg(long, default_value_t = SearchConfig::accurate().step)]
    step: f64,
    #[arg(long, default_value_t = SearchConfig::accurate().max_tries)]
    max_tries: usize,
    /// Wall-clock limit of the fuel factor search of a single flight
    #[arg(long)]
    max_seconds: Option<f64>,
    /// Fraction of the maximum fuel capacity held as reserve
    #[arg(long, default_value_t = WeightPolicy::default().reserve_fraction)]
    reserve_fraction: f64,
    #[arg(long, default_value_t = WeightPolicy::default().mtow_tolerance)]
    mtow_tolerance: f64,
    /// Number of flights computed in parallel
    #[arg(long, default_value_t = 8)]
    concurrency: usize,
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> MissionConfig {
        MissionConfig {
            payload_factor: self.payload_factor,
            weight: WeightPolicy {
                reserve_fraction: self.reserve_fraction,
                mtow_tolerance: self.mtow_tolerance,
            },
            search: SearchConfig {
                seed: self.seed,
                step: self.step,
                max_tries: self.max_tries,
                max_duration: self.max_seconds.map(Duration::from_secs_f64),
            },
        }
    }
}

fn write_csv(
    items: impl Iterator<Item = impl Serialize>,
    path: &Path,
) -> Result<(), Box<dyn Error>> {
    std::fs::write(path, fuelburn::csv::serialize(items)?)?;
    log::info!("Written {}", path.display());
    Ok(())
}

async fn run(
    flights: Vec<Flight>,
    limits: Arc<Limits>,
    models: Arc<ReferenceModels>,
    config: MissionConfig,
    concurrency: usize,
) -> Result<(Vec<MissionOutcome>, Status), Box<dyn Error>> {
    let mut status = Status {
        flights: flights.len(),
        ..Default::default()
    };

    let tasks = flights.into_iter().map(|flight| {
        let limits = limits.clone();
        let models = models.clone();
        async move {
            let flight_id = flight.flight_id.clone();
            let result = tokio::task::spawn_blocking(move || {
                fuelburn::process_flight(
                    &flight.flight_id,
                    &flight.aircraft_type,
                    &flight.waypoints,
                    &limits,
                    &*models,
                    &config,
                )
            })
            .await;
            (flight_id, result)
        }
    });

    let results = futures::stream::iter(tasks)
        .buffered(concurrency)
        .collect::<Vec<_>>()
        .await;

    let outcomes = results
        .into_iter()
        .filter_map(|(flight_id, result)| status.record(&flight_id, result))
        .collect();
    Ok((outcomes, status))
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    SimpleLogger::new().with_level(level).init()?;

    let config = cli.config();
    let limits = match &cli.limits {
        Some(path) => load_limits_from(path)?,
        None => load_limits()?,
    };
    let models = ReferenceModels::new(EmissionIndices::default())?;

    let flights = load_flights(&cli.waypoints, &cli.flights)?;
    log::info!("flights  : {}", flights.len());

    let (outcomes, status) = run(
        flights,
        Arc::new(limits),
        Arc::new(models),
        config,
        cli.concurrency.max(1),
    )
    .await?;
    log::info!("processed: {}", status.processed);
    log::info!("failed   : {}", status.failed);
    log::info!(
        "total    : {} kg fuel, {} kg CO2",
        (status.fuel_burnt_kg as u64).to_formatted_string(&Locale::en),
        (status.co2_kg as u64).to_formatted_string(&Locale::en),
    );

    write_csv(outcomes.iter().map(|o| &o.summary), &cli.output)?;
    if let Some(path) = &cli.segments {
        write_csv(outcomes.iter().flat_map(|o| o.segments()), path)?;
    }
    std::fs::write(&cli.status, serde_json::to_vec_pretty(&status)?)?;
    log::info!("status written");
    Ok(())
}
