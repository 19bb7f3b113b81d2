//! Progressive income tax schedule

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Marginal slab: `rate` applies to income above `above`, up to the next slab
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxSlab {
    pub above: f64,
    pub rate: f64,
}

/// Annual income tax schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxSchedule {
    /// Income at or below this pays no tax at all
    #[serde(default = "default_rebate_limit")]
    pub rebate_limit: f64,

    /// Slabs ordered by descending threshold
    #[serde(default = "default_slabs")]
    pub slabs: Vec<TaxSlab>,
}

fn default_rebate_limit() -> f64 { 700_000.0 }

fn default_slabs() -> Vec<TaxSlab> {
    vec![
        TaxSlab { above: 1_500_000.0, rate: 0.30 },
        TaxSlab { above: 1_200_000.0, rate: 0.20 },
        TaxSlab { above: 1_000_000.0, rate: 0.15 },
        TaxSlab { above: 700_000.0, rate: 0.10 },
    ]
}

impl Default for TaxSchedule {
    fn default() -> Self {
        Self {
            rebate_limit: default_rebate_limit(),
            slabs: default_slabs(),
        }
    }
}

impl TaxSchedule {
    /// Tax on an annual income
    ///
    /// Slabs are taken highest first; each taxes the part of the remaining
    /// balance above its threshold, then the balance drops to that threshold.
    pub fn tax(&self, annual_income: f64) -> f64 {
        if annual_income <= self.rebate_limit {
            return 0.0;
        }

        let mut remaining = annual_income;
        let mut tax = 0.0;
        for slab in &self.slabs {
            if remaining > slab.above {
                tax += (remaining - slab.above) * slab.rate;
                remaining = slab.above;
            }
        }
        tax
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.slabs.windows(2).any(|pair| pair[0].above <= pair[1].above) {
            return Err(ConfigError::Invalid(
                "tax slabs must be ordered by strictly descending threshold".to_string(),
            ));
        }
        if let Some(slab) = self.slabs.iter().find(|s| !(0.0..=1.0).contains(&s.rate)) {
            return Err(ConfigError::Invalid(format!(
                "tax rate {} above {} is outside [0, 1]",
                slab.rate, slab.above
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_rebate_limit() {
        let schedule = TaxSchedule::default();
        assert_eq!(schedule.tax(0.0), 0.0);
        assert_eq!(schedule.tax(600_000.0), 0.0);
        assert_eq!(schedule.tax(700_000.0), 0.0);
    }

    #[test]
    fn test_slab_boundaries() {
        let schedule = TaxSchedule::default();
        assert_abs_diff_eq!(schedule.tax(1_000_000.0), 30_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(schedule.tax(1_200_000.0), 60_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(schedule.tax(1_500_000.0), 120_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_top_slab() {
        // 100k @ 30% + 300k @ 20% + 200k @ 15% + 300k @ 10%
        // The 20% slab spans 1.2M-1.5M (300k wide), hence 150k rather than a 200k-band 130k
        let schedule = TaxSchedule::default();
        assert_abs_diff_eq!(schedule.tax(1_600_000.0), 150_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_just_above_rebate() {
        let schedule = TaxSchedule::default();
        assert_abs_diff_eq!(schedule.tax(700_100.0), 10.0, epsilon = 1e-6);
    }

    #[test]
    fn test_validate_rejects_unordered_slabs() {
        let schedule = TaxSchedule {
            rebate_limit: 0.0,
            slabs: vec![
                TaxSlab { above: 100.0, rate: 0.1 },
                TaxSlab { above: 200.0, rate: 0.2 },
            ],
        };
        assert!(schedule.validate().is_err());
        assert!(TaxSchedule::default().validate().is_ok());
    }
}
