//! Metric model
//!
//! The derived per-set metrics that can be charted over time.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Derived metric computed for each logged set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    BestSet,
    TotalVolume,
    MaxConsecutiveReps,
    OneRepMax,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::BestSet,
        Metric::TotalVolume,
        Metric::MaxConsecutiveReps,
        Metric::OneRepMax,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::BestSet => "best_set",
            Metric::TotalVolume => "total_volume",
            Metric::MaxConsecutiveReps => "max_consecutive_reps",
            Metric::OneRepMax => "one_rep_max",
        }
    }

    /// Name used in chart titles and axis labels
    pub fn display_name(&self) -> &'static str {
        match self {
            Metric::BestSet => "Best Set",
            Metric::TotalVolume => "Total Volume",
            Metric::MaxConsecutiveReps => "Max Consecutive Reps",
            Metric::OneRepMax => "1RM",
        }
    }
}

/// Metric name that matches no known metric
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown metric: {0}")]
pub struct UnknownMetric(pub String);

impl FromStr for Metric {
    type Err = UnknownMetric;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "best_set" | "best set" | "bestset" => Ok(Metric::BestSet),
            "total_volume" | "total volume" | "volume" => Ok(Metric::TotalVolume),
            "max_consecutive_reps" | "max consecutive reps" | "consecutive_reps" => {
                Ok(Metric::MaxConsecutiveReps)
            }
            "one_rep_max" | "one rep max" | "1rm" | "e1rm" => Ok(Metric::OneRepMax),
            _ => Err(UnknownMetric(s.to_string())),
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names_round_trip() {
        for metric in Metric::ALL {
            assert_eq!(metric.as_str().parse::<Metric>(), Ok(metric));
        }
    }

    #[test]
    fn test_metric_aliases() {
        assert_eq!("1RM".parse::<Metric>(), Ok(Metric::OneRepMax));
        assert_eq!(" Best Set ".parse::<Metric>(), Ok(Metric::BestSet));
        assert_eq!(
            "deadlift".parse::<Metric>(),
            Err(UnknownMetric("deadlift".to_string()))
        );
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Metric::OneRepMax.to_string(), "1RM");
        assert_eq!(Metric::TotalVolume.display_name(), "Total Volume");
    }
}
