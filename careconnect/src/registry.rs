use chrono::Utc;
use tracing::debug;

use crate::{coordinates::Coordinates, hospital::{Hospital, HospitalId, NewHospital}};

/// All known hospitals, in insertion order.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Registry {
    hospitals: Vec<Hospital>,
}

impl Registry {
    pub fn new() -> Registry {
        Registry { hospitals: Vec::new() }
    }

    pub fn from_hospitals(hospitals: Vec<Hospital>) -> Registry {
        Registry { hospitals }
    }

    pub fn len(&self) -> usize {
        self.hospitals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hospitals.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Hospital> {
        self.hospitals.iter()
    }

    pub fn get(&self, id: HospitalId) -> Option<&Hospital> {
        self.hospitals.iter().find(|h| h.id == id)
    }

    /// The hospital staff manage; every role manages the first one.
    pub fn first(&self) -> Option<&Hospital> {
        self.hospitals.first()
    }

    /// Swaps in `updated` for the hospital with `id`, stamping it with the
    /// current time. An unknown id leaves the registry untouched; the return
    /// value only says whether a record was replaced.
    pub fn replace(&mut self, id: HospitalId, updated: Hospital) -> bool {
        let Some(slot) = self.hospitals.iter_mut().find(|h| h.id == id) else {
            debug!("replace ignored, no hospital with id {id}");
            return false;
        };
        *slot = Hospital { id, last_updated: Utc::now(), ..updated };
        true
    }

    /// Appends a new hospital with the next free id and every facility fully available.
    pub fn register(&mut self, new_hospital: NewHospital) -> HospitalId {
        let id = self.hospitals.iter().map(|h| h.id).max().map_or(1, |max| max + 1);
        let facilities = new_hospital.facilities.into_iter()
            .map(|mut f| {
                f.available = f.total;
                f
            })
            .collect();
        self.hospitals.push(Hospital {
            id,
            name: new_hospital.name,
            address: new_hospital.address,
            phone: new_hospital.phone,
            email: new_hospital.email,
            location: new_hospital.location,
            facilities,
            last_updated: Utc::now(),
        });
        id
    }

    /// Hospitals paired with their distance from `origin`, nearest first.
    pub fn ranked_by_distance(&self, origin: &Coordinates) -> Vec<(&Hospital, f64)> {
        let mut ranked = self.hospitals.iter()
            .map(|h| (h, origin.distance_km(&h.location)))
            .collect::<Vec<_>>();
        ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
        ranked
    }
}
