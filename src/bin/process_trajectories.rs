use std::{error::Error, path::PathBuf, sync::Arc};

use clap::Parser;
use itertools::Itertools;
use simple_logger::SimpleLogger;

use fuelburn::{flights::read_waypoints, process_waypoints, Segment};

#[derive(serde::Serialize)]
struct SegmentOut {
    flight_id: Arc<str>,
    index: usize,
    latitude: f64,
    longitude: f64,
    elapsed_time_s: f64,
    true_airspeed_kt: f64,
    altitude_ft: f64,
    rate_of_climb_fpm: f64,
    path_angle_rad: f64,
    path_angle_deg: f64,
    cumulative_distance_nm: f64,
}

impl SegmentOut {
    fn new(flight_id: &Arc<str>, index: usize, segment: &Segment) -> Self {
        Self {
            flight_id: flight_id.clone(),
            index,
            latitude: segment.latitude,
            longitude: segment.longitude,
            elapsed_time_s: segment.elapsed_time_s,
            true_airspeed_kt: segment.true_airspeed_kt,
            altitude_ft: segment.altitude_ft,
            rate_of_climb_fpm: segment.rate_of_climb_fpm,
            path_angle_rad: segment.path_angle_rad,
            path_angle_deg: segment.path_angle_deg(),
            cumulative_distance_nm: segment.cumulative_distance_nmi,
        }
    }
}

const ABOUT: &'static str = "Writes the processed trajectory (elapsed time, speed in knots, rate of climb, path angle and cumulative distance) of every flight of a waypoints table";

#[derive(Parser, Debug)]
#[command(author, version, about = ABOUT)]
struct Cli {
    /// CSV with `flight_id,latitude,longitude,altitude_ft,time,true_airspeed,segment_length`
    #[arg(long)]
    waypoints: PathBuf,
    /// Where the processed trajectories are written
    #[arg(long, default_value = "trajectories.csv")]
    output: PathBuf,
}

fn main() -> Result<(), Box<dyn Error>> {
    SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .init()?;

    let cli = Cli::parse();

    let waypoints = read_waypoints(&std::fs::read(&cli.waypoints)?)?;
    log::info!("flights: {}", waypoints.len());

    let mut rows = vec![];
    for (flight_id, waypoints) in waypoints.into_iter().sorted_by(|a, b| a.0.cmp(&b.0)) {
        match process_waypoints(&waypoints) {
            Ok(trajectory) => rows.extend(
                trajectory
                    .segments()
                    .iter()
                    .enumerate()
                    .map(|(i, segment)| SegmentOut::new(&flight_id, i, segment)),
            ),
            Err(e) => log::warn!("{flight_id} skipped: {e}"),
        }
    }

    std::fs::write(&cli.output, fuelburn::csv::serialize(rows.into_iter())?)?;
    log::info!("Written {}", cli.output.display());
    Ok(())
}
