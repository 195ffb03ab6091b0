//! Mock hospitals the registry starts with.

use chrono::Utc;

use crate::{coordinates::Coordinates, facility::Facility, hospital::Hospital};

/// Where the demo assumes the user is (downtown Los Angeles).
pub const USER_COORDINATES: Coordinates = Coordinates { lat: 34.0522, lon: -118.2437 };

pub const RESOURCE_FACILITIES: [(&str, &str); 7] = [
    ("beds", "Beds"),
    ("icu", "ICU Beds"),
    ("ventilators", "Ventilators"),
    ("oxygen", "Oxygen (Liters)"),
    ("doctors", "Doctors"),
    ("medicines", "Medicines (%)"),
    ("attendants", "Attendants"),
];

pub const CAPABILITY_FACILITIES: [(&str, &str); 4] = [
    ("surgery", "Surgery Capability"),
    ("blood_bank", "Blood Bank"),
    ("trauma", "Trauma Care"),
    ("pediatric_icu", "Pediatric & Neonatal ICU"),
];

struct Seed {
    id: u32,
    name: &'static str,
    address: &'static str,
    phone: &'static str,
    email: &'static str,
    location: Coordinates,
    // (available, total), in RESOURCE_FACILITIES order
    resources: [(u32, u32); 7],
    // in CAPABILITY_FACILITIES order
    capabilities: [bool; 4],
}

const SEEDS: [Seed; 4] = [
    Seed {
        id: 1,
        name: "St. Mary's Medical Center",
        address: "123 Health St, Los Angeles, CA",
        phone: "555-0101",
        email: "emergency@stmarys.org",
        location: Coordinates { lat: 34.0622, lon: -118.2537 },
        resources: [(25, 50), (5, 10), (3, 8), (4000, 10000), (12, 20), (80, 100), (30, 40)],
        capabilities: [true, true, true, false],
    },
    Seed {
        id: 2,
        name: "City General Hospital",
        address: "456 Wellness Ave, Los Angeles, CA",
        phone: "555-0102",
        email: "contact@citygeneral.org",
        location: Coordinates { lat: 34.0422, lon: -118.2337 },
        resources: [(8, 40), (1, 8), (1, 5), (1500, 8000), (5, 15), (30, 100), (15, 30)],
        capabilities: [true, false, true, true],
    },
    Seed {
        id: 3,
        name: "Community Health Clinic",
        address: "789 Hope Blvd, Los Angeles, CA",
        phone: "555-0103",
        email: "info@communityhealth.org",
        location: Coordinates { lat: 34.0555, lon: -118.2699 },
        resources: [(45, 60), (9, 12), (8, 10), (9500, 12000), (18, 22), (95, 100), (38, 45)],
        capabilities: [true, true, true, true],
    },
    Seed {
        id: 4,
        name: "Metro Central Hospital",
        address: "101 Downtown Cir, Los Angeles, CA",
        phone: "555-0104",
        email: "ops@metrocentral.org",
        location: Coordinates { lat: 34.0500, lon: -118.2400 },
        resources: [(3, 30), (0, 5), (0, 5), (500, 5000), (1, 10), (15, 100), (5, 20)],
        capabilities: [false, false, true, false],
    },
];

fn seed_facilities(seed: &Seed) -> Vec<Facility> {
    let resources = RESOURCE_FACILITIES.iter().zip(seed.resources)
        .map(|(&(id, name), (available, total))| Facility { id: id.into(), name: name.into(), available, total });
    let capabilities = CAPABILITY_FACILITIES.iter().zip(seed.capabilities)
        .map(|(&(id, name), present)| Facility { id: id.into(), name: name.into(), available: present as u32, total: 1 });
    resources.chain(capabilities).collect()
}

pub fn mock_hospitals() -> Vec<Hospital> {
    let now = Utc::now();
    SEEDS.iter()
        .map(|seed| Hospital {
            id: seed.id,
            name: seed.name.to_string(),
            address: seed.address.to_string(),
            phone: seed.phone.to_string(),
            email: seed.email.to_string(),
            location: seed.location,
            facilities: seed_facilities(seed),
            last_updated: now,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource_status::{classify, ResourceStatus};

    #[test]
    fn test_every_hospital_has_eleven_facilities() {
        for h in mock_hospitals() {
            assert_eq!(h.facilities.len(), 11, "{}", h.name);
            assert_eq!(h.facilities.iter().filter(|f| f.is_capability()).count(), 4);
            for f in &h.facilities {
                assert!(f.available <= f.total, "{} {}", h.name, f.id);
            }
        }
    }

    #[test]
    fn test_seeded_statuses() {
        let statuses: Vec<_> = mock_hospitals().iter().map(classify).collect();
        assert_eq!(statuses, vec![
            ResourceStatus::Good,
            ResourceStatus::Low,
            ResourceStatus::Good,
            ResourceStatus::Critical,
        ]);
    }
}
