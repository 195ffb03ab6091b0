//! Plain-text screens. Every function here is pure: it takes the data to show
//! and returns the text to print.

use std::fmt::Write;

use careconnect::{
    resource_status::classify,
    seed::{CAPABILITY_FACILITIES, RESOURCE_FACILITIES},
    Coordinates, Facility, Hospital, Registry, UserRole,
};
use chrono::{DateTime, Utc};

use crate::geolocation::GeolocationError;

const BAR_WIDTH: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Login,
    Register,
    Portal,
}

/// The management screen a role is allowed to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortalView {
    /// Hospital details and the facility list can be changed.
    FacilityAdmin,
    /// Only availability values and capability flags can be changed.
    AvailabilityEditor,
}

pub fn portal_view(role: UserRole) -> PortalView {
    match role {
        UserRole::Admin => PortalView::FacilityAdmin,
        UserRole::Doctor | UserRole::Coordinator => PortalView::AvailabilityEditor,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    Idle,
    Saving,
    Saved,
}

pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds().max(0);
    let (amount, unit) = match seconds {
        s if s < 5 => return "just now".to_string(),
        s if s < 60 => (s, "second"),
        s if s < 3600 => (s / 60, "minute"),
        s if s < 86_400 => (s / 3600, "hour"),
        s => (s / 86_400, "day"),
    };
    let plural = if amount == 1 { "" } else { "s" };
    format!("{amount} {unit}{plural} ago")
}

fn bar(facility: &Facility) -> String {
    let filled = ((facility.ratio() * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
    format!("[{}{}]", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

fn facility_row(facility: &Facility) -> String {
    if facility.is_capability() {
        let mark = if facility.is_available() { "x" } else { " " };
        let state = if facility.is_available() { "Available" } else { "Unavailable" };
        format!("  [{mark}] {:<28} {state}  ({})", facility.name, facility.id)
    } else {
        format!(
            "  {:<32} {:>6} / {:<6} {} {} ({:.0}%)  ({})",
            facility.name,
            facility.available,
            facility.total,
            bar(facility),
            facility.status(),
            facility.percentage(),
            facility.id,
        )
    }
}

pub fn render_header(role: Option<UserRole>) -> String {
    match role {
        Some(role) => format!("== CareConnect ==  [{role}]  (logout)"),
        None => "== CareConnect ==".to_string(),
    }
}

pub fn render_login(error: Option<&str>) -> String {
    let mut out = String::new();
    writeln!(out, "Staff login").unwrap();
    let roles = UserRole::ALL.iter().map(|r| r.as_str()).collect::<Vec<_>>().join(", ");
    writeln!(out, "  roles: {roles}").unwrap();
    writeln!(out, "  login <role> <username> <password>").unwrap();
    writeln!(out, "  register          new hospital sign-up").unwrap();
    writeln!(out, "  nearby | hospitals   public hospital lists").unwrap();
    if let Some(error) = error {
        writeln!(out, "  ! {error}").unwrap();
    }
    out
}

pub fn render_registration_form() -> String {
    let mut out = String::new();
    writeln!(out, "Register a hospital").unwrap();
    writeln!(out, "  register {{\"name\", \"address\", \"phone\", \"email\", \"lat\", \"lon\", \"totals\": {{..}}, \"capabilities\": [..]}}").unwrap();
    writeln!(out, "  Total resource capacity (totals):").unwrap();
    for (id, name) in RESOURCE_FACILITIES {
        writeln!(out, "    {id:<12} {name}").unwrap();
    }
    writeln!(out, "  Emergency capabilities (capabilities):").unwrap();
    for (id, name) in CAPABILITY_FACILITIES {
        writeln!(out, "    {id:<14} {name}").unwrap();
    }
    writeln!(out, "  back              return to login").unwrap();
    out
}

pub fn render_registered(hospital: &Hospital) -> String {
    format!("Registration successful. {} is now listed (id {}).\nBack to login.\n", hospital.name, hospital.id)
}

fn render_contact(out: &mut String, hospital: &Hospital) {
    writeln!(out, "{}", hospital.name).unwrap();
    writeln!(out, "  address: {}", hospital.address).unwrap();
    writeln!(out, "  phone:   {}", hospital.phone).unwrap();
    writeln!(out, "  email:   {}", hospital.email).unwrap();
}

fn render_footer(out: &mut String, last_updated: DateTime<Utc>, save_status: SaveStatus, now: DateTime<Utc>) {
    write!(out, "Last updated: {}", time_ago(last_updated, now)).unwrap();
    match save_status {
        SaveStatus::Idle => writeln!(out).unwrap(),
        SaveStatus::Saving => writeln!(out, "   Saving...").unwrap(),
        SaveStatus::Saved => writeln!(out, "   All changes saved").unwrap(),
    }
}

/// `last_updated` is the registry's timestamp; `hospital` may be an unsaved draft.
pub fn render_admin_portal(hospital: &Hospital, last_updated: DateTime<Utc>, save_status: SaveStatus, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    render_contact(&mut out, hospital);
    writeln!(out, "  edit-info <json>          edit hospital information").unwrap();
    writeln!(out, "Facilities Management").unwrap();
    for facility in &hospital.facilities {
        writeln!(out, "{}", facility_row(facility)).unwrap();
    }
    writeln!(out, "  set <id> <n> | flag <id> on|off").unwrap();
    writeln!(out, "  add-facility <total> <name> | edit-facility <id> <total> <name> | delete-facility <id>").unwrap();
    render_footer(&mut out, last_updated, save_status, now);
    out
}

pub fn render_staff_portal(hospital: &Hospital, last_updated: DateTime<Utc>, save_status: SaveStatus, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    render_contact(&mut out, hospital);
    writeln!(out, "Facilities").unwrap();
    for facility in &hospital.facilities {
        writeln!(out, "{}", facility_row(facility)).unwrap();
    }
    writeln!(out, "  set <id> <n> | flag <id> on|off").unwrap();
    render_footer(&mut out, last_updated, save_status, now);
    out
}

pub fn render_portal(role: UserRole, hospital: &Hospital, last_updated: DateTime<Utc>, save_status: SaveStatus, now: DateTime<Utc>) -> String {
    match portal_view(role) {
        PortalView::FacilityAdmin => render_admin_portal(hospital, last_updated, save_status, now),
        PortalView::AvailabilityEditor => render_staff_portal(hospital, last_updated, save_status, now),
    }
}

pub fn render_hospital_card(hospital: &Hospital, distance_km: Option<f64>) -> String {
    let mut out = String::new();
    write!(out, "{}  [{}]", hospital.name, classify(hospital)).unwrap();
    match distance_km {
        Some(d) => writeln!(out, "  {d:.1} km away").unwrap(),
        None => writeln!(out).unwrap(),
    }
    writeln!(out, "  {} | {} | {}", hospital.address, hospital.phone, hospital.email).unwrap();
    let resources = RESOURCE_FACILITIES.iter()
        .map(|(id, name)| match hospital.facility(id) {
            Some(f) => format!("{name} {}/{}", f.available, f.total),
            None => format!("{name} 0/0"),
        })
        .collect::<Vec<_>>();
    writeln!(out, "  {}", resources.join(", ")).unwrap();
    let capabilities = CAPABILITY_FACILITIES.iter()
        .map(|(id, name)| {
            let present = hospital.facility(id).is_some_and(|f| f.is_available());
            format!("{}{name}", if present { "+" } else { "-" })
        })
        .collect::<Vec<_>>();
    writeln!(out, "  {}", capabilities.join("  ")).unwrap();
    out
}

pub fn render_patient_portal(registry: &Registry, position: &Result<Coordinates, GeolocationError>) -> String {
    let mut out = String::new();
    writeln!(out, "Find Nearby Hospitals").unwrap();
    match position {
        Ok(origin) => {
            writeln!(out, "Showing results sorted by distance from your location.").unwrap();
            for (hospital, distance) in registry.ranked_by_distance(origin) {
                out.push_str(&render_hospital_card(hospital, Some(distance)));
            }
        }
        Err(e) => {
            writeln!(out, "! Could not get your location").unwrap();
            writeln!(out, "  {e}. Please enable location services.").unwrap();
        }
    }
    out
}

pub fn render_driver_portal(registry: &Registry) -> String {
    let mut out = String::new();
    writeln!(out, "Ambulance view: all hospitals").unwrap();
    for hospital in registry.iter() {
        out.push_str(&render_hospital_card(hospital, None));
    }
    out
}
