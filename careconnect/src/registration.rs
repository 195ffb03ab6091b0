//! The hospital sign-up form and its coercion into a [`NewHospital`].

use std::collections::BTreeMap;

use serde_json::Value;

use crate::{
    coordinates::Coordinates,
    error::CareError,
    facility::Facility,
    hospital::NewHospital,
    seed::{CAPABILITY_FACILITIES, RESOURCE_FACILITIES},
};

/// Raw form input. Numbers may arrive as JSON numbers or as typed text.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RegistrationForm {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub lat: Value,
    pub lon: Value,
    /// Total capacity per resource id (`beds`, `icu`, ...).
    pub totals: BTreeMap<String, Value>,
    /// Ids of the emergency capabilities that were ticked.
    pub capabilities: Vec<String>,
}

fn required(field: &'static str, value: &str) -> Result<String, CareError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CareError::MissingField(field));
    }
    Ok(value.to_string())
}

fn coordinate(field: &'static str, value: &Value) -> Result<f64, CareError> {
    let parsed = match value {
        Value::Null => return Err(CareError::MissingField(field)),
        Value::String(s) if s.trim().is_empty() => return Err(CareError::MissingField(field)),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    };
    match parsed {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(CareError::InvalidCoordinate { field, value: value.to_string() }),
    }
}

/// Reads a capacity, falling back to zero for anything that is not a
/// non-negative integer.
pub fn coerce_count(value: Option<&Value>) -> u32 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.unwrap_or(0).clamp(0, u32::MAX as i64) as u32
}

impl RegistrationForm {
    pub fn into_new_hospital(self) -> Result<NewHospital, CareError> {
        let name = required("name", &self.name)?;
        let address = required("address", &self.address)?;
        let phone = required("phone", &self.phone)?;
        let email = required("email", &self.email)?;
        let location = Coordinates::new(coordinate("lat", &self.lat)?, coordinate("lon", &self.lon)?);

        let resources = RESOURCE_FACILITIES.iter()
            .map(|&(id, label)| Facility { id: id.into(), name: label.into(), available: 0, total: coerce_count(self.totals.get(id)) });
        let capabilities = CAPABILITY_FACILITIES.iter()
            .map(|&(id, label)| {
                let total = self.capabilities.iter().any(|c| c == id) as u32;
                Facility { id: id.into(), name: label.into(), available: 0, total }
            });

        Ok(NewHospital {
            name,
            address,
            phone,
            email,
            location,
            facilities: resources.chain(capabilities).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn form() -> RegistrationForm {
        serde_json::from_value(json!({
            "name": "Harbor Clinic",
            "address": "9 Pier Rd",
            "phone": "555-0110",
            "email": "desk@harbor.org",
            "lat": "34.01",
            "lon": -118.3,
            "totals": { "beds": "20", "icu": 4, "doctors": "abc", "oxygen": -50 },
            "capabilities": ["trauma"]
        }))
        .unwrap()
    }

    #[test]
    fn test_builds_all_default_facilities() {
        let hospital = form().into_new_hospital().unwrap();
        assert_eq!(hospital.facilities.len(), 11);
        assert_eq!(hospital.location, Coordinates::new(34.01, -118.3));
    }

    #[test]
    fn test_numeric_coercion() {
        let hospital = form().into_new_hospital().unwrap();
        let total = |id: &str| hospital.facilities.iter().find(|f| f.id == id).unwrap().total;
        assert_eq!(total("beds"), 20);
        assert_eq!(total("icu"), 4);
        assert_eq!(total("doctors"), 0);
        assert_eq!(total("oxygen"), 0);
        assert_eq!(total("ventilators"), 0);
    }

    #[test]
    fn test_capabilities_become_flags() {
        let hospital = form().into_new_hospital().unwrap();
        let total = |id: &str| hospital.facilities.iter().find(|f| f.id == id).unwrap().total;
        assert_eq!(total("trauma"), 1);
        assert_eq!(total("surgery"), 0);
        assert_eq!(total("blood_bank"), 0);
    }

    #[test]
    fn test_required_fields() {
        let mut missing_email = form();
        missing_email.email = "  ".to_string();
        assert_eq!(missing_email.into_new_hospital(), Err(CareError::MissingField("email")));

        let mut missing_lat = form();
        missing_lat.lat = Value::Null;
        assert_eq!(missing_lat.into_new_hospital(), Err(CareError::MissingField("lat")));
    }

    #[test]
    fn test_non_numeric_coordinate_is_rejected() {
        let mut bad = form();
        bad.lon = json!("west");
        assert!(matches!(bad.into_new_hospital(), Err(CareError::InvalidCoordinate { field: "lon", .. })));
    }
}
