use std::sync::Arc;

use anyhow::{bail, Context};
use careconnect::{
    credentials::authenticate,
    facility::FacilityId,
    registration::RegistrationForm,
    CareError, Hospital, HospitalId, Registry, UserRole,
};
use chrono::Utc;
use tokio::sync::{mpsc, RwLock};
use tracing::{info, warn};

use crate::{
    config::PortalConfig,
    debounce::Debouncer,
    storage::{LocalStorage, ROLE_KEY},
    views::{self, SaveStatus, View},
};

/// Everything the running portal knows. Console commands and debounced
/// saves are the only writers.
pub struct AppContext {
    pub config: PortalConfig,
    pub registry: Registry,
    pub storage: LocalStorage,
    pub role: Option<UserRole>,
    pub view: View,
    /// The managed hospital as edited on screen, ahead of the registry while a save is pending.
    pub draft: Option<Hospital>,
    pub save_status: SaveStatus,
    /// Facility waiting for `confirm` before it is deleted.
    pub pending_delete: Option<FacilityId>,
    /// Shown on the login screen until the next attempt.
    pub login_error: Option<String>,
    debouncer: Debouncer<Hospital>,
}

pub type AppContextRef = Arc<RwLock<AppContext>>;

impl AppContext {
    pub fn new(config: PortalConfig, registry: Registry, to_main: mpsc::Sender<Hospital>) -> AppContext {
        let storage = LocalStorage::new(&config.storage_path);
        let debouncer = Debouncer::new(config.debounce(), to_main);
        AppContext {
            config,
            registry,
            storage,
            role: None,
            view: View::Login,
            draft: None,
            save_status: SaveStatus::Idle,
            pending_delete: None,
            login_error: None,
            debouncer,
        }
    }

    /// Restores a saved session, if any.
    pub fn load(&mut self) -> anyhow::Result<()> {
        let Some(saved) = self.storage.get_item(ROLE_KEY)? else {
            self.view = View::Login;
            return Ok(());
        };
        match saved.parse::<UserRole>() {
            Ok(role) => {
                info!("restored session for {role}");
                self.role = Some(role);
                self.view = View::Portal;
            }
            Err(e) => {
                warn!("ignoring saved session: {e}");
                self.view = View::Login;
            }
        }
        Ok(())
    }

    pub fn login(&mut self, role: UserRole, username: &str, password: &str) -> anyhow::Result<()> {
        if let Some(current) = self.role {
            bail!("already logged in as {current}");
        }
        self.login_error = None;
        if let Err(e) = authenticate(role, username, password) {
            warn!("failed login for {role} as {username:?}");
            self.login_error = Some(e.to_string());
            return Err(e.into());
        }
        self.storage.set_item(ROLE_KEY, role.as_str())?;
        info!("{role} logged in");
        self.role = Some(role);
        self.view = View::Portal;
        Ok(())
    }

    /// Clears the session. A save that is already scheduled still lands.
    pub fn logout(&mut self) -> anyhow::Result<()> {
        self.storage.remove_item(ROLE_KEY)?;
        if let Some(role) = self.role.take() {
            info!("{role} logged out");
        }
        self.view = View::Login;
        self.draft = None;
        self.pending_delete = None;
        self.login_error = None;
        self.save_status = SaveStatus::Idle;
        Ok(())
    }

    pub fn logged_in_role(&self) -> anyhow::Result<UserRole> {
        self.role.context("log in first")
    }

    pub fn require_admin(&self) -> anyhow::Result<()> {
        let role = self.logged_in_role()?;
        if !role.is_admin() {
            bail!("{role} cannot change hospital or facility details");
        }
        Ok(())
    }

    pub fn managed_hospital(&self) -> anyhow::Result<&Hospital> {
        self.draft.as_ref()
            .or_else(|| self.registry.first())
            .context("there is no hospital to manage")
    }

    /// Shows `hospital` right away and schedules it to be written to the registry.
    pub fn submit_edit(&mut self, hospital: Hospital) {
        self.draft = Some(hospital.clone());
        self.save_status = SaveStatus::Saving;
        self.debouncer.schedule(hospital);
    }

    /// Writes a debounced edit into the registry. A newer edit may already be
    /// scheduled, in which case the draft and the indicator stay ahead.
    pub fn commit(&mut self, hospital: Hospital) {
        let id = hospital.id;
        if self.registry.replace(id, hospital) {
            info!("saved hospital {id}");
        }
        if self.debouncer.is_pending() {
            self.save_status = SaveStatus::Saving;
        } else {
            self.save_status = SaveStatus::Saved;
            self.draft = self.registry.get(id).cloned();
        }
    }

    pub fn register(&mut self, form: RegistrationForm) -> Result<HospitalId, CareError> {
        let new_hospital = form.into_new_hospital()?;
        let id = self.registry.register(new_hospital);
        info!("registered hospital {id}");
        self.view = View::Login;
        Ok(id)
    }

    pub fn render(&self) -> String {
        let header = views::render_header(self.role);
        let body = match (self.view, self.role) {
            (View::Portal, Some(role)) => match self.managed_hospital() {
                Ok(hospital) => {
                    let last_updated = self.registry.get(hospital.id).map_or(hospital.last_updated, |h| h.last_updated);
                    views::render_portal(role, hospital, last_updated, self.save_status, Utc::now())
                }
                Err(e) => format!("{e}\n"),
            },
            (View::Register, _) => views::render_registration_form(),
            _ => views::render_login(self.login_error.as_deref()),
        };
        format!("{header}\n{body}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use careconnect::seed::mock_hospitals;
    use std::time::Duration;

    fn context(dir: &tempfile::TempDir) -> (AppContext, mpsc::Receiver<Hospital>) {
        let config = PortalConfig {
            storage_path: dir.path().join("storage.json").to_string_lossy().into_owned(),
            ..PortalConfig::default()
        };
        let (tx, rx) = mpsc::channel(10);
        (AppContext::new(config, Registry::from_hospitals(mock_hospitals()), tx), rx)
    }

    #[tokio::test]
    async fn test_login_persists_across_reload() {
        let dir = tempfile::tempdir().unwrap();
        let (mut first, _rx) = context(&dir);
        first.login(UserRole::Doctor, "doctor", "123").unwrap();
        assert_eq!(first.view, View::Portal);

        let (mut reloaded, _rx) = context(&dir);
        reloaded.load().unwrap();
        assert_eq!(reloaded.role, Some(UserRole::Doctor));
        assert_eq!(reloaded.view, View::Portal);
    }

    #[tokio::test]
    async fn test_failed_login_shows_error_on_login_screen() {
        let dir = tempfile::tempdir().unwrap();
        let (mut ctx, _rx) = context(&dir);
        let err = ctx.login(UserRole::Admin, "admin", "wrong").unwrap_err();
        assert_eq!(err.to_string(), "Invalid credentials. Please try again.");
        assert_eq!(ctx.role, None);
        assert_eq!(ctx.view, View::Login);
        assert_eq!(ctx.storage.get_item(ROLE_KEY).unwrap(), None);
        assert!(ctx.render().contains("! Invalid credentials. Please try again."));

        ctx.login(UserRole::Admin, "admin", "123").unwrap();
        assert_eq!(ctx.login_error, None);
    }

    #[tokio::test]
    async fn test_login_overwrites_corrupt_storage() {
        let dir = tempfile::tempdir().unwrap();
        let (mut ctx, _rx) = context(&dir);
        std::fs::write(dir.path().join("storage.json"), "garbage").unwrap();
        ctx.load().unwrap();
        assert_eq!(ctx.view, View::Login);

        ctx.login(UserRole::Admin, "admin", "123").unwrap();
        assert_eq!(ctx.role, Some(UserRole::Admin));
        ctx.logout().unwrap();

        let (mut reloaded, _rx) = context(&dir);
        reloaded.load().unwrap();
        assert_eq!(reloaded.role, None);
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let dir = tempfile::tempdir().unwrap();
        let (mut ctx, _rx) = context(&dir);
        ctx.login(UserRole::Admin, "admin", "123").unwrap();
        ctx.logout().unwrap();
        assert_eq!(ctx.role, None);
        assert_eq!(ctx.view, View::Login);

        let (mut reloaded, _rx) = context(&dir);
        reloaded.load().unwrap();
        assert_eq!(reloaded.role, None);
    }

    #[tokio::test]
    async fn test_unknown_saved_role_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let (mut ctx, _rx) = context(&dir);
        ctx.storage.set_item(ROLE_KEY, "Janitor").unwrap();
        ctx.load().unwrap();
        assert_eq!(ctx.role, None);
        assert_eq!(ctx.view, View::Login);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_edits_commit_only_last_value() {
        let dir = tempfile::tempdir().unwrap();
        let (mut ctx, mut rx) = context(&dir);
        ctx.login(UserRole::Doctor, "doctor", "123").unwrap();

        for value in [20, 15, 9] {
            let edited = ctx.managed_hospital().unwrap().set_available("beds", value);
            ctx.submit_edit(edited);
            tokio::time::sleep(Duration::from_millis(300)).await;
            assert_eq!(ctx.registry.first().unwrap().facility("beds").unwrap().available, 25);
        }
        assert_eq!(ctx.save_status, SaveStatus::Saving);
        assert_eq!(ctx.managed_hospital().unwrap().facility("beds").unwrap().available, 9);

        let committed = rx.recv().await.unwrap();
        ctx.commit(committed);
        assert_eq!(ctx.registry.first().unwrap().facility("beds").unwrap().available, 9);
        assert_eq!(ctx.save_status, SaveStatus::Saved);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_commit_keeps_saving_while_edit_pending() {
        let dir = tempfile::tempdir().unwrap();
        let (mut ctx, mut rx) = context(&dir);
        ctx.login(UserRole::Doctor, "doctor", "123").unwrap();

        let first = ctx.managed_hospital().unwrap().set_available("beds", 20);
        ctx.submit_edit(first);
        tokio::time::sleep(Duration::from_millis(1600)).await;
        let delivered = rx.try_recv().unwrap();

        let second = ctx.managed_hospital().unwrap().set_available("beds", 7);
        ctx.submit_edit(second);
        ctx.commit(delivered);
        assert_eq!(ctx.save_status, SaveStatus::Saving);
        assert_eq!(ctx.registry.first().unwrap().facility("beds").unwrap().available, 20);
        assert_eq!(ctx.managed_hospital().unwrap().facility("beds").unwrap().available, 7);

        let latest = rx.recv().await.unwrap();
        ctx.commit(latest);
        assert_eq!(ctx.save_status, SaveStatus::Saved);
        assert_eq!(ctx.registry.first().unwrap().facility("beds").unwrap().available, 7);
    }

    #[tokio::test]
    async fn test_staff_cannot_manage_facilities() {
        let dir = tempfile::tempdir().unwrap();
        let (mut ctx, _rx) = context(&dir);
        assert!(ctx.require_admin().is_err());
        ctx.login(UserRole::Coordinator, "coordinator", "123").unwrap();
        assert!(ctx.require_admin().is_err());
        ctx.logout().unwrap();
        ctx.login(UserRole::Admin, "admin", "123").unwrap();
        assert!(ctx.require_admin().is_ok());
    }

    #[tokio::test]
    async fn test_register_returns_to_login() {
        let dir = tempfile::tempdir().unwrap();
        let (mut ctx, _rx) = context(&dir);
        ctx.view = View::Register;
        let form: RegistrationForm = serde_json::from_str(
            r#"{"name": "Bayside", "address": "3 Dock St", "phone": "555-0111", "email": "a@b.org", "lat": 34.0, "lon": -118.4}"#,
        ).unwrap();
        assert_eq!(ctx.register(form).unwrap(), 5);
        assert_eq!(ctx.view, View::Login);
        assert_eq!(ctx.registry.len(), 5);
    }

    #[tokio::test]
    async fn test_render_follows_view() {
        let dir = tempfile::tempdir().unwrap();
        let (mut ctx, _rx) = context(&dir);
        assert!(ctx.render().contains("Staff login"));
        ctx.login(UserRole::Admin, "admin", "123").unwrap();
        let screen = ctx.render();
        assert!(screen.contains("[Admin]"));
        assert!(screen.contains("St. Mary's Medical Center"));
        assert!(screen.contains("Facilities Management"));
    }
}
