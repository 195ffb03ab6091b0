use std::io::stdin;
use std::thread;

use anyhow::{bail, Context};
use careconnect::{
    registration::{coerce_count, RegistrationForm},
    HospitalDetails, UserRole,
};
use serde_json::Value;
use tokio::sync::mpsc::{self, Receiver};
use tracing::{error, info};

use crate::{context::AppContextRef, geolocation::current_position, views::{self, View}};

pub const HELP: &str = "\
commands:
  hospitals                              all hospitals, registry order
  nearby                                 hospitals sorted by distance from you
  status                                 registry as json
  view                                   redraw the current screen
  login <role> <username> <password>     role: admin | doctor | coordinator
  logout
  register [<json form>]                 hospital sign-up
  back                                   leave the sign-up form
  set <facility> <value>                 change available count
  flag <facility> on|off                 toggle a capability
  add-facility <total> <name>            admin only
  edit-facility <facility> <total> <name>  admin only
  delete-facility <facility>             admin only, asks for confirm/cancel
  edit-info <json details>               admin only
  quit";

pub fn console_input_thread() -> Receiver<String> {
    let (sender, receiver) = mpsc::channel(100);
    thread::spawn(move || {
        pollster::block_on(console_input_loop(sender))
    });
    receiver
}

pub async fn console_input_loop(sender: mpsc::Sender<String>) {
    loop {
        let mut input = String::new();
        match stdin().read_line(&mut input) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                error!("could not read console input: {e}");
                break;
            }
        }
        if sender.send(input).await.is_err() {
            break;
        }
    }
}

pub enum ConsoleResponse {
    Reply(String),
    Render,
    Quit,
    Nothing,
}

fn split_first(input: &str) -> (&str, &str) {
    match input.find(' ') {
        Some(i) => (&input[..i], input[i + 1..].trim()),
        None => (input, ""),
    }
}

// Mirrors number inputs: anything that is not an integer reads as zero.
fn coerce_value(raw: &str) -> i64 {
    raw.trim().parse::<i64>().unwrap_or(0)
}

pub async fn process_console_input(input: &str, context_ref: &AppContextRef) -> anyhow::Result<ConsoleResponse> {
    use ConsoleResponse::*;

    let (message_type, rem) = split_first(input);

    if !matches!(message_type, "confirm" | "cancel") {
        context_ref.write().await.pending_delete = None;
    }

    Ok(match message_type {
        "" => Nothing,
        "help" => Reply(HELP.to_string()),
        "view" => Render,
        "quit" | "exit" => Quit,
        "status" => {
            let context = context_ref.read().await;
            Reply(serde_json::to_string_pretty(&context.registry)?)
        }
        "hospitals" => {
            let context = context_ref.read().await;
            Reply(views::render_driver_portal(&context.registry))
        }
        "nearby" => {
            let (setting, timeout) = {
                let context = context_ref.read().await;
                (context.config.location.clone(), context.config.location_timeout())
            };
            let position = current_position(&setting, timeout).await;
            if let Err(e) = &position {
                info!("location unavailable: {e}");
            }
            let context = context_ref.read().await;
            Reply(views::render_patient_portal(&context.registry, &position))
        }
        "login" => {
            let args: Vec<&str> = rem.split_whitespace().collect();
            let [role, username, password] = args[..] else { bail!("usage: login <role> <username> <password>") };
            let role = role.parse::<UserRole>()?;
            let mut context = context_ref.write().await;
            match context.login(role, username, password) {
                Ok(()) => Render,
                Err(_) if context.login_error.is_some() => Render,
                Err(e) => return Err(e),
            }
        }
        "logout" => {
            context_ref.write().await.logout()?;
            Render
        }
        "register" => {
            let mut context = context_ref.write().await;
            if context.role.is_some() {
                bail!("log out before registering a new hospital");
            }
            if rem.is_empty() {
                context.view = View::Register;
                return Ok(Render);
            }
            let form = serde_json::from_str::<RegistrationForm>(rem).context("could not read registration form")?;
            let id = context.register(form)?;
            let hospital = context.registry.get(id).context("registered hospital missing")?;
            Reply(views::render_registered(hospital))
        }
        "back" => {
            let mut context = context_ref.write().await;
            if context.view == View::Register {
                context.view = View::Login;
            }
            Render
        }
        "set" => {
            let (facility_id, value) = split_first(rem);
            let mut context = context_ref.write().await;
            context.logged_in_role()?;
            let hospital = context.managed_hospital()?;
            hospital.facility(facility_id).with_context(|| format!("could not find facility {facility_id}"))?;
            let edited = hospital.set_available(facility_id, coerce_value(value));
            context.submit_edit(edited);
            Render
        }
        "flag" => {
            let (facility_id, state) = split_first(rem);
            let present = match state {
                "on" => true,
                "off" => false,
                _ => bail!("usage: flag <facility> on|off"),
            };
            let mut context = context_ref.write().await;
            context.logged_in_role()?;
            let hospital = context.managed_hospital()?;
            let facility = hospital.facility(facility_id).with_context(|| format!("could not find facility {facility_id}"))?;
            if !facility.is_capability() {
                bail!("{} is not a capability, use set", facility.name);
            }
            let edited = hospital.set_capability(facility_id, present);
            context.submit_edit(edited);
            Render
        }
        "add-facility" => {
            let (total, name) = split_first(rem);
            if name.is_empty() {
                bail!("usage: add-facility <total> <name>");
            }
            let mut context = context_ref.write().await;
            context.require_admin()?;
            let total = coerce_count(Some(&Value::String(total.to_string())));
            let edited = context.managed_hospital()?.add_facility(name, total);
            context.submit_edit(edited);
            Render
        }
        "edit-facility" => {
            let (facility_id, rem) = split_first(rem);
            let (total, name) = split_first(rem);
            if name.is_empty() {
                bail!("usage: edit-facility <facility> <total> <name>");
            }
            let mut context = context_ref.write().await;
            context.require_admin()?;
            let hospital = context.managed_hospital()?;
            hospital.facility(facility_id).with_context(|| format!("could not find facility {facility_id}"))?;
            let total = coerce_count(Some(&Value::String(total.to_string())));
            let edited = hospital.edit_facility(facility_id, name, total);
            context.submit_edit(edited);
            Render
        }
        "delete-facility" => {
            let mut context = context_ref.write().await;
            context.require_admin()?;
            let facility = context.managed_hospital()?
                .facility(rem)
                .with_context(|| format!("could not find facility {rem}"))?;
            let prompt = format!(
                "Are you sure you want to delete {}? This action cannot be undone. (confirm / cancel)",
                facility.name,
            );
            context.pending_delete = Some(rem.to_string());
            Reply(prompt)
        }
        "confirm" => {
            let mut context = context_ref.write().await;
            let facility_id = context.pending_delete.take().context("nothing to confirm")?;
            context.require_admin()?;
            let edited = context.managed_hospital()?.delete_facility(&facility_id);
            info!("deleting facility {facility_id}");
            context.submit_edit(edited);
            Render
        }
        "cancel" => {
            context_ref.write().await.pending_delete = None;
            Render
        }
        "edit-info" => {
            let details = serde_json::from_str::<HospitalDetails>(rem).context("could not read hospital details")?;
            if [&details.name, &details.address, &details.phone, &details.email].iter().any(|s| s.trim().is_empty()) {
                bail!("name, address, phone and email are required");
            }
            if !details.location.lat.is_finite() || !details.location.lon.is_finite() {
                bail!("invalid location");
            }
            let mut context = context_ref.write().await;
            context.require_admin()?;
            let edited = context.managed_hospital()?.with_details(details);
            context.submit_edit(edited);
            Render
        }
        _ => Reply("input not recognized, try help".to_string()),
    })
}
