use crate::resource_status::ResourceStatus;

pub type FacilityId = String;

/// A countable resource, or a capability flag when `total == 1`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Facility {
    pub id: FacilityId,
    pub name: String,
    pub available: u32,
    pub total: u32,
}

impl Facility {
    pub fn new(id: impl Into<FacilityId>, name: impl Into<String>, total: u32) -> Facility {
        Facility { id: id.into(), name: name.into(), available: total, total }
    }

    /// A fresh facility with a generated `custom-` id and full availability.
    pub fn custom(name: impl Into<String>, total: u32) -> Facility {
        let id = format!("custom-{}", uuid::Uuid::new_v4().simple());
        Facility::new(id, name, total)
    }

    pub fn is_capability(&self) -> bool {
        self.total == 1
    }

    pub fn is_available(&self) -> bool {
        self.available > 0
    }

    /// Fraction of capacity still free; zero when there is no capacity at all.
    pub fn ratio(&self) -> f64 {
        if self.total > 0 {
            self.available as f64 / self.total as f64
        } else {
            0.0
        }
    }

    pub fn percentage(&self) -> f64 {
        self.ratio() * 100.0
    }

    pub fn status(&self) -> ResourceStatus {
        ResourceStatus::from_ratio(self.ratio())
    }

    /// Clamps `value` into `[0, total]`.
    pub fn clamp_available(&self, value: i64) -> u32 {
        value.clamp(0, self.total as i64) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_available() {
        let beds = Facility::new("beds", "Beds", 50);
        assert_eq!(beds.clamp_available(-5), 0);
        assert_eq!(beds.clamp_available(999), 50);
        assert_eq!(beds.clamp_available(17), 17);
    }

    #[test]
    fn test_capability() {
        let trauma = Facility::new("trauma", "Trauma Care", 1);
        assert!(trauma.is_capability());
        assert!(!Facility::new("beds", "Beds", 50).is_capability());
        assert!(!Facility::new("surgery", "Surgery Capability", 0).is_capability());
    }

    #[test]
    fn test_custom_ids_are_unique() {
        let a = Facility::custom("MRI Machines", 3);
        let b = Facility::custom("MRI Machines", 3);
        assert!(a.id.starts_with("custom-"));
        assert_ne!(a.id, b.id);
        assert_eq!(a.available, 3);
    }

    #[test]
    fn test_row_status_uses_zero_for_empty_capacity() {
        let empty = Facility { id: "x".into(), name: "X".into(), available: 0, total: 0 };
        assert_eq!(empty.percentage(), 0.0);
        assert_eq!(empty.status(), ResourceStatus::Critical);

        let oxygen = Facility { id: "oxygen".into(), name: "Oxygen".into(), available: 1500, total: 8000 };
        assert_eq!(oxygen.status(), ResourceStatus::Low);
    }
}
