//! Reading flights from waypoint and flight summary tables.
use std::collections::HashMap;
use std::sync::Arc;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{Error, Waypoint};

/// A record of the waypoints table
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WaypointRecord {
    pub flight_id: Arc<str>,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude_ft: f64,
    /// RFC 3339, `yyyy-mm-dd hh:mm:ss` or epoch seconds
    #[serde(with = "crate::serde::timestamp")]
    pub time: time::OffsetDateTime,
    /// m/s
    pub true_airspeed: f64,
    /// m
    #[serde(default)]
    pub segment_length: Option<f64>,
}

impl From<WaypointRecord> for (Arc<str>, Waypoint) {
    fn from(r: WaypointRecord) -> Self {
        (
            r.flight_id,
            Waypoint {
                latitude: r.latitude,
                longitude: r.longitude,
                altitude_ft: r.altitude_ft,
                timestamp: r.time,
                true_airspeed: r.true_airspeed,
                segment_length: r.segment_length,
            },
        )
    }
}

/// A record of the flight summary table
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FlightRecord {
    pub flight_id: Arc<str>,
    /// The ICAO type designator (e.g. `A319`)
    #[serde(alias = "aircraft_type_icao")]
    pub aircraft_type: String,
}

/// A flight and its waypoints, in recorded order
#[derive(Debug, Clone, PartialEq)]
pub struct Flight {
    pub flight_id: Arc<str>,
    pub aircraft_type: String,
    pub waypoints: Vec<Waypoint>,
}

/// Reads a waypoints table into the waypoints of each flight, keeping the order of the table.
/// # Error
/// Errors if a record cannot be deserialized
pub fn read_waypoints(data: &[u8]) -> Result<HashMap<Arc<str>, Vec<Waypoint>>, Error> {
    Ok(crate::csv::deserialize::<WaypointRecord>(data)
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(<(Arc<str>, Waypoint)>::from)
        .into_group_map())
}

/// Reads a flight summary table
/// # Error
/// Errors if a record cannot be deserialized
pub fn read_flights(data: &[u8]) -> Result<Vec<FlightRecord>, Error> {
    crate::csv::deserialize(data).collect()
}

/// Joins flight records with their waypoints. A flight without waypoints is kept with none,
/// so that it is reported rather than silently dropped.
pub fn join(
    flights: Vec<FlightRecord>,
    mut waypoints: HashMap<Arc<str>, Vec<Waypoint>>,
) -> Vec<Flight> {
    flights
        .into_iter()
        .map(|record| Flight {
            waypoints: waypoints.remove(&record.flight_id).unwrap_or_default(),
            flight_id: record.flight_id,
            aircraft_type: record.aircraft_type,
        })
        .collect()
}

/// Reads and joins the waypoints and flight summary tables at the given paths
pub fn load_flights(
    waypoints: impl AsRef<std::path::Path>,
    summary: impl AsRef<std::path::Path>,
) -> Result<Vec<Flight>, Error> {
    let waypoints = read_waypoints(&std::fs::read(waypoints)?)?;
    let flights = read_flights(&std::fs::read(summary)?)?;
    Ok(join(flights, waypoints))
}

#[cfg(test)]
mod test {
    use super::*;

    static WAYPOINTS: &str = "flight_id,latitude,longitude,altitude_ft,time,true_airspeed,segment_length
a,55.6,12.6,0,2019-01-01 10:00:00,80,0
b,40.0,-3.0,0,1546336800,90,
a,55.7,12.5,1500,2019-01-01 10:01:00,120,9000
b,40.1,-3.1,2000,1546336860,130,
";

    static SUMMARY: &str = "flight_id,aircraft_type_icao
a,A319
b,E195
c,B738
";

    #[test]
    fn group_per_flight() {
        let waypoints = read_waypoints(WAYPOINTS.as_bytes()).unwrap();
        assert_eq!(waypoints.len(), 2);
        let a = &waypoints["a"];
        assert_eq!(a.len(), 2);
        assert_eq!(a[0].altitude_ft, 0.0);
        assert_eq!(a[1].altitude_ft, 1500.0);
        assert_eq!(a[1].segment_length, Some(9000.0));
        assert_eq!(waypoints["b"][1].segment_length, None);
        assert_eq!(
            (a[1].timestamp - a[0].timestamp).whole_seconds(),
            60
        );
    }

    #[test]
    fn join_keeps_summary_order() {
        let waypoints = read_waypoints(WAYPOINTS.as_bytes()).unwrap();
        let flights = read_flights(SUMMARY.as_bytes()).unwrap();
        let flights = join(flights, waypoints);
        assert_eq!(
            flights.iter().map(|f| f.flight_id.as_ref()).collect::<Vec<_>>(),
            vec!["a", "b", "c"]
        );
        assert_eq!(flights[1].aircraft_type, "E195");
        assert!(flights[2].waypoints.is_empty());
    }
}
