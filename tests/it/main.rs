use std::cell::RefCell;

use fuelburn::{
    flights::{join, read_flights, read_waypoints},
    fuel_flow::{load_drag_polars, EmissionIndices, ReferenceModels},
    limits::load_limits,
    EmissionModel, Error, FuelFlowModel, MissionConfig, PerformanceLimits, ProcessedTrajectory,
    SearchConfig, Segment, Waypoint, WeightPolicy,
};

fn abs_difference<T: std::ops::Sub<Output = T> + PartialOrd>(x: T, y: T) -> T {
    if x < y {
        y - x
    } else {
        x - y
    }
}

/// The aircraft type "X" used in the examples of the weight budget
fn x_limits() -> PerformanceLimits {
    PerformanceLimits {
        type_code: "X".to_string(),
        mtow: 75000.0,
        mlw: 64000.0,
        oew: 42000.0,
        mfc: 24000.0,
        max_payload: 17000.0,
    }
}

fn waypoint(t: i64, altitude_ft: f64, true_airspeed: f64) -> Waypoint {
    Waypoint {
        latitude: 55.0,
        longitude: 12.0 + t as f64 * 1e-3,
        altitude_ft,
        timestamp: time::OffsetDateTime::from_unix_timestamp(1_700_000_000 + t).unwrap(),
        true_airspeed,
        segment_length: Some(true_airspeed * 60.0),
    }
}

/// A 100 minutes flight sampled every minute: climb to FL350, cruise, descent and parking
fn flight() -> Vec<Waypoint> {
    let climb = (0..=20).map(|i| (1750.0 * i as f64, 80.0 + 7.5 * i as f64));
    let cruise = (1..=60).map(|_| (35000.0, 230.0));
    let descent = (1..=20).map(|i| (35000.0 - 1750.0 * i as f64, 230.0 - 7.5 * i as f64));
    let parked = std::iter::once((0.0, 0.0));
    climb
        .chain(cruise)
        .chain(descent)
        .chain(parked)
        .enumerate()
        .map(|(i, (altitude, tas))| waypoint(i as i64 * 60, altitude, tas))
        .collect()
}

fn cruise_segment(elapsed_time_s: f64) -> Segment {
    Segment {
        latitude: 0.0,
        longitude: 0.0,
        elapsed_time_s,
        true_airspeed_kt: 250.0,
        altitude_ft: 30000.0,
        rate_of_climb_fpm: 0.0,
        path_angle_rad: 0.0,
        cumulative_distance_nmi: 0.0,
    }
}

/// Burns 1 kg/s and remembers the mass of every call
#[derive(Default)]
struct Recording {
    masses: RefCell<Vec<f64>>,
}

impl FuelFlowModel for Recording {
    fn rate(&self, mass_kg: f64, _: f64, _: f64, _: f64) -> f64 {
        self.masses.borrow_mut().push(mass_kg);
        1.0
    }
    fn takeoff_rate(&self, _: f64, _: f64, _: f64) -> f64 {
        1.0
    }
}

impl EmissionModel for Recording {
    fn co2(&self, ff: f64) -> f64 {
        3.16 * ff
    }
    fn h2o(&self, ff: f64) -> f64 {
        1.23 * ff
    }
    fn nox(&self, ff: f64, _: f64, _: f64) -> f64 {
        0.015 * ff
    }
    fn co(&self, ff: f64, _: f64, _: f64) -> f64 {
        0.002 * ff
    }
    fn hc(&self, ff: f64, _: f64, _: f64) -> f64 {
        0.0002 * ff
    }
}

/// Verifies the invariants of a full mission computed with the reference models.
#[test]
fn mission_invariants() -> Result<(), Error> {
    let limits = load_limits()?;
    let models = ReferenceModels::new(EmissionIndices::default())?;
    let config = MissionConfig::default();

    let outcome = fuelburn::process_flight("AB123", "A320", &flight(), &limits, &models, &config)?;
    let a320 = &limits["A320"];
    let series = &outcome.emissions.series;

    // the parked sample is dropped
    assert_eq!(outcome.trajectory.len(), 101);
    assert_eq!(series.len(), 101);

    // mass conservation
    let fuel_burnt = outcome.summary.fuel_burnt_kg;
    let final_mass = *series.mass.last().unwrap();
    assert!(abs_difference(fuel_burnt, outcome.budget.initial_mass - final_mass) < 1e-6);
    assert!(abs_difference(fuel_burnt, series.fuel_burn.iter().sum::<f64>()) < 1e-6);

    // mass is non-increasing and within the limits
    assert!(series.mass.windows(2).all(|w| w[1] <= w[0]));
    assert!(outcome.budget.initial_mass <= a320.mtow);
    assert!(final_mass <= a320.mlw);
    assert!(series.mass.iter().all(|m| *m >= outcome.budget.minimum_mass()));

    // a plausible amount of fuel, all of it from the trip fuel
    assert!(fuel_burnt > 2000.0 && fuel_burnt < 8000.0, "{fuel_burnt}");
    assert!(fuel_burnt <= outcome.summary.trip_fuel_kg);
    assert!(abs_difference(outcome.summary.co2_kg, 3.16 * fuel_burnt) / fuel_burnt < 1e-9);
    assert!(outcome.summary.attempts > 1);
    assert!(
        abs_difference(
            outcome.summary.fuel_factor,
            config.search.fuel_factor(outcome.summary.attempts - 1)
        ) < 1e-12
    );
    Ok(())
}

#[test]
fn processing_is_deterministic() -> Result<(), Error> {
    let waypoints = flight();
    let a = fuelburn::process_waypoints(&waypoints)?;
    let b = fuelburn::process_waypoints(&waypoints)?;
    assert_eq!(a, b);
    Ok(())
}

#[test]
fn stationary_two_waypoints() {
    let waypoints = [waypoint(0, 0.0, 0.0), waypoint(60, 0.0, 0.0)];
    assert!(matches!(
        fuelburn::process_waypoints(&waypoints),
        Err(Error::InsufficientData { usable: 1 })
    ));

    let limits = load_limits().unwrap();
    let models = ReferenceModels::new(EmissionIndices::default()).unwrap();
    let config = MissionConfig::default();
    let r = fuelburn::process_flight("x", "A320", &waypoints, &limits, &models, &config);
    assert!(matches!(r, Err(Error::InsufficientData { .. })));
}

/// A single cruise segment burns the fuel flow at the initial mass for its duration.
#[test]
fn single_segment() -> Result<(), Error> {
    let limits = x_limits();
    let budget = fuelburn::mission_weight(&limits, 0.5, 0.3, &WeightPolicy::default())?;
    assert_eq!(budget.initial_mass, 42000.0 + 8500.0 + 7200.0 + 1200.0);
    assert!(budget.initial_mass <= limits.mtow);

    let fuel_flow = load_drag_polars()?.remove("A320").unwrap();
    let emission = EmissionIndices::default();
    let trajectory = ProcessedTrajectory::new(vec![cruise_segment(60.0)]);

    let result = fuelburn::integrate(&trajectory, &budget, &limits, &fuel_flow, &emission)?;
    let expected = fuel_flow.rate(budget.initial_mass, 250.0, 30000.0, 0.0) * 60.0;
    assert!(abs_difference(result.total_fuel_burn, expected) < 1e-9);
    assert_eq!(result.series.fuel_burn, vec![expected]);
    Ok(())
}

/// Running out of trip fuel at the seed retries exactly once with one more step.
#[test]
fn one_retry() -> Result<(), Error> {
    // 15 minutes at 1 kg/s: 900 kg. 0.03 * 24000 = 720 kg, 0.05 * 24000 = 1200 kg
    let trajectory = ProcessedTrajectory::new((0..15).map(|_| cruise_segment(60.0)).collect());
    let model = Recording::default();
    let config = SearchConfig {
        seed: 0.03,
        step: 0.02,
        max_tries: 100,
        max_duration: None,
    };

    let found = fuelburn::search(
        &trajectory,
        &x_limits(),
        0.5,
        &WeightPolicy::default(),
        &config,
        &model,
        &model,
    )?;
    assert_eq!(found.attempts, 2);
    assert!(abs_difference(found.fuel_factor, 0.05) < 1e-12);
    assert!(abs_difference(found.budget.trip_fuel, 1200.0) < 1e-9);

    // the first try stopped short of the end of the trajectory
    let masses = model.masses.borrow();
    assert!(masses.len() < 2 * trajectory.len());
    let initial_masses = masses
        .iter()
        .zip(masses.iter().skip(1))
        .filter(|(a, b)| b > a)
        .count();
    assert_eq!(initial_masses, 1);
    Ok(())
}

#[test]
fn batch_of_flights() -> Result<(), Error> {
    let waypoints = "flight_id,latitude,longitude,altitude_ft,time,true_airspeed,segment_length
a,55.60,12.60,0,2024-03-01T10:00:00Z,80,
a,55.62,12.62,1000,2024-03-01T10:01:00Z,90,
a,55.64,12.64,2000,2024-03-01T10:02:00Z,100,
b,55.60,12.60,0,2024-03-01T11:00:00Z,0,0
b,55.60,12.60,0,2024-03-01T11:01:00Z,0,0
c,55.60,12.60,0,2024-03-01T12:00:00Z,50,
c,55.61,12.61,500,2024-03-01T12:01:00Z,60,
d,55.60,12.60,0,2024-03-01T13:00:00Z,80,
d,55.62,12.62,1000,2024-03-01T13:01:00Z,90,
";
    let summary = "flight_id,aircraft_type
a,A320
b,A320
c,C172
d,E195
";
    let flights = join(
        read_flights(summary.as_bytes())?,
        read_waypoints(waypoints.as_bytes())?,
    );
    let limits = load_limits()?;
    let models = ReferenceModels::new(EmissionIndices::default())?;
    let config = MissionConfig::default();

    let results = flights
        .iter()
        .map(|f| {
            fuelburn::process_flight(
                &f.flight_id,
                &f.aircraft_type,
                &f.waypoints,
                &limits,
                &models,
                &config,
            )
        })
        .collect::<Vec<_>>();

    let a = results[0].as_ref().unwrap();
    // 150 s at takeoff thrust
    assert!(abs_difference(a.summary.fuel_burnt_kg, 150.0 * 2.4) < 1e-6);
    assert!(a.summary.total_distance_nm > 0.0);
    assert!(matches!(results[1], Err(Error::InsufficientData { .. })));
    assert!(matches!(results[2], Err(Error::UnsupportedAirframe(_))));
    let d = results[3].as_ref().unwrap();
    assert_eq!(d.summary.substituted_by.as_deref(), Some("B737"));
    Ok(())
}
