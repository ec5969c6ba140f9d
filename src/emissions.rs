use serde::{Deserialize, Serialize};

use crate::{IntegrationResult, SegmentSeries};

/// Mission totals in kg.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EmissionTotals {
    pub fuel_burn: f64,
    pub co2: f64,
    pub h2o: f64,
    pub nox: f64,
    pub co: f64,
    pub hc: f64,
}

/// The totals of a mission and the per-segment series they were summed from.
#[derive(Debug, Clone, PartialEq)]
pub struct MissionEmissions {
    pub totals: EmissionTotals,
    pub series: SegmentSeries,
}

/// Sums the per-segment series of `result`. The fuel burn total is the mass difference of
/// the integration, not the sum of the series.
pub fn aggregate(result: IntegrationResult) -> MissionEmissions {
    let series = result.series;
    let totals = EmissionTotals {
        fuel_burn: result.total_fuel_burn,
        co2: series.co2.iter().sum(),
        h2o: series.h2o.iter().sum(),
        nox: series.nox.iter().sum(),
        co: series.co.iter().sum(),
        hc: series.hc.iter().sum(),
    };
    MissionEmissions { totals, series }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn sums() {
        let result = IntegrationResult {
            initial_mass: 100.0,
            final_mass: 97.0,
            total_fuel_burn: 3.0,
            series: SegmentSeries {
                mass: vec![99.0, 97.0],
                fuel_burn: vec![1.0, 2.0],
                co2: vec![3.16, 6.32],
                h2o: vec![1.0, 1.0],
                nox: vec![0.5, 0.25],
                co: vec![0.0, 0.0],
                hc: vec![0.125, 0.125],
            },
        };
        let emissions = aggregate(result.clone());
        assert_eq!(emissions.totals.fuel_burn, 3.0);
        assert!((emissions.totals.co2 - 9.48).abs() < 1e-12);
        assert_eq!(emissions.totals.h2o, 2.0);
        assert_eq!(emissions.totals.nox, 0.75);
        assert_eq!(emissions.totals.co, 0.0);
        assert_eq!(emissions.totals.hc, 0.25);
        assert_eq!(emissions.series, result.series);
    }

    #[test]
    fn empty() {
        let emissions = aggregate(IntegrationResult {
            initial_mass: 1.0,
            final_mass: 1.0,
            total_fuel_burn: 0.0,
            series: SegmentSeries::default(),
        });
        assert_eq!(emissions.totals, EmissionTotals::default());
    }
}
