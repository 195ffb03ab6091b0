use chrono::{DateTime, Utc};

use crate::{coordinates::Coordinates, facility::Facility};

pub type HospitalId = u32;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hospital {
    pub id: HospitalId,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub location: Coordinates,
    pub facilities: Vec<Facility>,
    pub last_updated: DateTime<Utc>,
}

/// A hospital as submitted for registration, before it has an id or timestamp.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NewHospital {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub location: Coordinates,
    pub facilities: Vec<Facility>,
}

/// The contact block an administrator can edit.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HospitalDetails {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub location: Coordinates,
}

// Every edit below returns a new record; the registry only sees it once it is
// submitted through `Registry::replace`. Unknown facility ids leave the record
// unchanged.
impl Hospital {
    pub fn facility(&self, id: &str) -> Option<&Facility> {
        self.facilities.iter().find(|f| f.id == id)
    }

    pub fn details(&self) -> HospitalDetails {
        HospitalDetails {
            name: self.name.clone(),
            address: self.address.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            location: self.location,
        }
    }

    fn map_facility(&self, id: &str, f: impl Fn(&Facility) -> Facility) -> Hospital {
        let facilities = self.facilities.iter()
            .map(|facility| if facility.id == id { f(facility) } else { facility.clone() })
            .collect();
        Hospital { facilities, ..self.clone() }
    }

    pub fn set_available(&self, facility_id: &str, value: i64) -> Hospital {
        self.map_facility(facility_id, |f| Facility { available: f.clamp_available(value), ..f.clone() })
    }

    /// Only capability facilities (`total == 1`) are touched.
    pub fn set_capability(&self, facility_id: &str, present: bool) -> Hospital {
        self.map_facility(facility_id, |f| {
            if f.is_capability() {
                Facility { available: present as u32, ..f.clone() }
            } else {
                f.clone()
            }
        })
    }

    pub fn add_facility(&self, name: &str, total: u32) -> Hospital {
        let mut facilities = self.facilities.clone();
        facilities.push(Facility::custom(name, total));
        Hospital { facilities, ..self.clone() }
    }

    /// Renames and resizes a facility. `available` is left as is, so it may
    /// exceed the new total.
    pub fn edit_facility(&self, facility_id: &str, name: &str, total: u32) -> Hospital {
        self.map_facility(facility_id, |f| Facility { name: name.to_string(), total, ..f.clone() })
    }

    pub fn delete_facility(&self, facility_id: &str) -> Hospital {
        let facilities = self.facilities.iter()
            .filter(|f| f.id != facility_id)
            .cloned()
            .collect();
        Hospital { facilities, ..self.clone() }
    }

    pub fn with_details(&self, details: HospitalDetails) -> Hospital {
        Hospital {
            name: details.name,
            address: details.address,
            phone: details.phone,
            email: details.email,
            location: details.location,
            ..self.clone()
        }
    }
}
