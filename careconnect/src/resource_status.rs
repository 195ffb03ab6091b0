use std::fmt;

use crate::{facility::Facility, hospital::Hospital};

pub const CRITICAL_THRESHOLD: f64 = 0.10;
pub const LOW_THRESHOLD: f64 = 0.40;

/// Facility ids whose availability decides a hospital's overall status.
pub const CRITICAL_FACILITIES: [&str; 3] = ["beds", "icu", "doctors"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub enum ResourceStatus {
    Good,
    Low,
    Critical,
}

impl ResourceStatus {
    pub fn from_ratio(ratio: f64) -> ResourceStatus {
        if ratio < CRITICAL_THRESHOLD {
            ResourceStatus::Critical
        } else if ratio < LOW_THRESHOLD {
            ResourceStatus::Low
        } else {
            ResourceStatus::Good
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceStatus::Good => "Good",
            ResourceStatus::Low => "Low",
            ResourceStatus::Critical => "Critical",
        }
    }
}

impl fmt::Display for ResourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Missing or zero-capacity facilities count as fully available.
fn availability_ratio(facility: Option<&Facility>) -> f64 {
    match facility {
        Some(f) if f.total > 0 => f.available as f64 / f.total as f64,
        _ => 1.0,
    }
}

/// The lowest availability ratio across beds, ICU and doctors.
pub fn critical_metric(hospital: &Hospital) -> f64 {
    CRITICAL_FACILITIES
        .iter()
        .map(|id| availability_ratio(hospital.facility(id)))
        .fold(1.0, f64::min)
}

pub fn classify(hospital: &Hospital) -> ResourceStatus {
    ResourceStatus::from_ratio(critical_metric(hospital))
}
