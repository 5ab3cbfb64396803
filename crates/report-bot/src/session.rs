//! Registration session engine.
//!
//! A user's selection moves from no session, through `Selecting`, to
//! either a finalized registration (finish or preset) or nothing (cancel
//! or reset). Every operation reloads state from the store and writes it
//! back immediately.

use crate::catalog::{Catalog, Preset};
use crate::error::AppResult;
use line_client::{LineClient, Profile};
use report_store::{RegistrationSession, ReportStore, Toggle, Unit, UserRegistration};
use std::future::Future;
use tracing::{info, warn};

/// Profile fields copied into a registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileInfo {
    pub display_name: String,
    pub picture_url: String,
}

impl ProfileInfo {
    pub fn unknown() -> Self {
        Self {
            display_name: "Unknown".into(),
            picture_url: String::new(),
        }
    }

    /// Fetch a profile, falling back to placeholders when the lookup fails.
    pub async fn fetch(line: &LineClient, user_id: &str) -> Self {
        match line.get_profile(user_id).await {
            Ok(profile) => profile.into(),
            Err(e) => {
                warn!("Profile lookup failed for {}: {}", user_id, e);
                Self::unknown()
            }
        }
    }
}

impl From<Profile> for ProfileInfo {
    fn from(profile: Profile) -> Self {
        Self {
            display_name: profile.display_name,
            picture_url: profile.picture_url.unwrap_or_default(),
        }
    }
}

/// Result of starting registration.
#[derive(Debug, Clone, PartialEq)]
pub struct Started {
    pub session: RegistrationSession,
    /// An earlier session was picked up instead of creating one.
    pub resumed: bool,
}

/// Result of a finish command.
#[derive(Debug, Clone, PartialEq)]
pub enum FinishOutcome {
    Committed(UserRegistration),
    /// Nothing selected; any session is left as it was.
    EmptySelection,
}

/// Result of applying a preset.
#[derive(Debug, Clone, PartialEq)]
pub enum PresetOutcome {
    Committed(UserRegistration),
    /// None of the preset's units exist in the catalog.
    NoUnits,
}

/// Drives per-user registration sessions against the store.
#[derive(Clone)]
pub struct SessionEngine {
    store: ReportStore,
}

impl SessionEngine {
    pub fn new(store: ReportStore) -> Self {
        Self { store }
    }

    /// Create an empty session unless one is already in progress.
    pub async fn start(&self, user_id: &str) -> AppResult<Started> {
        if let Some(session) = self.store.session(user_id).await? {
            return Ok(Started {
                session,
                resumed: true,
            });
        }

        let session = RegistrationSession::new();
        self.store.save_session(user_id, &session).await?;
        info!("Started registration session for {}", user_id);

        Ok(Started {
            session,
            resumed: false,
        })
    }

    /// Toggle a unit, creating the session if needed, and persist it.
    pub async fn toggle(&self, user_id: &str, unit: &Unit) -> AppResult<(RegistrationSession, Toggle)> {
        let session = self.store.session(user_id).await?.unwrap_or_default();
        let (session, toggle) = session.toggle(unit);

        self.store.save_session(user_id, &session).await?;
        info!(
            "{:?} unit {} for {} ({} selected)",
            toggle,
            unit.id,
            user_id,
            session.selected_units().len()
        );

        Ok((session, toggle))
    }

    /// Commit the current selection as the user's registration. `profile`
    /// is only awaited when there is something to commit.
    pub async fn finish(
        &self,
        user_id: &str,
        profile: impl Future<Output = ProfileInfo>,
    ) -> AppResult<FinishOutcome> {
        let units = match self.store.session(user_id).await? {
            Some(session) if !session.is_empty() => session.selected_units().to_vec(),
            _ => return Ok(FinishOutcome::EmptySelection),
        };

        let profile = profile.await;
        let registration = self.commit(user_id, &profile, units, None).await?;
        Ok(FinishOutcome::Committed(registration))
    }

    /// Register the preset's units directly, bypassing toggling.
    pub async fn apply_preset(
        &self,
        user_id: &str,
        preset: &Preset,
        catalog: &Catalog,
        profile: impl Future<Output = ProfileInfo>,
    ) -> AppResult<PresetOutcome> {
        let units = catalog.preset_units(preset);
        if units.is_empty() {
            warn!("Preset {} matches no catalog units", preset.label);
            return Ok(PresetOutcome::NoUnits);
        }

        let profile = profile.await;
        let registration = self
            .commit(user_id, &profile, units, Some(preset.label.clone()))
            .await?;
        Ok(PresetOutcome::Committed(registration))
    }

    /// Drop the session, keeping any finalized registration. Returns
    /// whether a session existed.
    pub async fn cancel(&self, user_id: &str) -> AppResult<bool> {
        let existed = self.store.session(user_id).await?.is_some();
        self.store.delete_session(user_id).await?;
        Ok(existed)
    }

    /// Drop both the session and the registration.
    pub async fn reset(&self, user_id: &str) -> AppResult<()> {
        self.store.delete_session(user_id).await?;
        self.store.delete_registration(user_id).await?;
        info!("Reset registration for {}", user_id);
        Ok(())
    }

    pub async fn registration(&self, user_id: &str) -> AppResult<Option<UserRegistration>> {
        Ok(self.store.registration(user_id).await?)
    }

    async fn commit(
        &self,
        user_id: &str,
        profile: &ProfileInfo,
        units: Vec<Unit>,
        role: Option<String>,
    ) -> AppResult<UserRegistration> {
        let registration = UserRegistration::new(
            profile.display_name.clone(),
            profile.picture_url.clone(),
            units,
            role,
        );

        self.store.save_registration(user_id, &registration).await?;
        self.store.delete_session(user_id).await?;
        info!(
            "Registered {} for {} unit(s)",
            user_id,
            registration.units.len()
        );

        Ok(registration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{default_presets, default_units, MatchPolicy};
    use std::sync::atomic::{AtomicBool, Ordering};

    fn engine() -> (SessionEngine, ReportStore) {
        let store = ReportStore::memory();
        (SessionEngine::new(store.clone()), store)
    }

    fn profile() -> ProfileInfo {
        ProfileInfo {
            display_name: "Somchai".into(),
            picture_url: "https://example.com/p.png".into(),
        }
    }

    fn ids(units: &[Unit]) -> Vec<u32> {
        units.iter().map(|u| u.id).collect()
    }

    #[tokio::test]
    async fn test_start_creates_then_resumes() {
        let (engine, _) = engine();

        let first = engine.start("U1").await.unwrap();
        assert!(!first.resumed);
        assert!(first.session.is_empty());

        engine.toggle("U1", &Unit::new(4, "Warehouse")).await.unwrap();

        let second = engine.start("U1").await.unwrap();
        assert!(second.resumed);
        assert_eq!(ids(second.session.selected_units()), vec![4]);
    }

    #[tokio::test]
    async fn test_toggle_without_session_creates_one() {
        let (engine, store) = engine();

        let (session, toggle) = engine.toggle("U1", &Unit::new(1, "A")).await.unwrap();
        assert_eq!(toggle, Toggle::Added);
        assert_eq!(store.session("U1").await.unwrap(), Some(session));
    }

    #[tokio::test]
    async fn test_toggle_reorders_readded_unit() {
        let (engine, store) = engine();
        let a = Unit::new(1, "A");
        let b = Unit::new(2, "B");

        engine.toggle("U1", &a).await.unwrap();
        engine.toggle("U1", &b).await.unwrap();
        engine.toggle("U1", &a).await.unwrap();
        engine.toggle("U1", &a).await.unwrap();

        let session = store.session("U1").await.unwrap().unwrap();
        assert_eq!(ids(session.selected_units()), vec![2, 1]);
    }

    #[tokio::test]
    async fn test_finish_empty_keeps_session() {
        let (engine, store) = engine();
        engine.start("U1").await.unwrap();

        let outcome = engine.finish("U1", async { profile() }).await.unwrap();
        assert_eq!(outcome, FinishOutcome::EmptySelection);
        assert!(store.session("U1").await.unwrap().is_some());
        assert!(store.registration("U1").await.unwrap().is_none());

        // Absent session is rejected the same way
        let outcome = engine.finish("U2", async { profile() }).await.unwrap();
        assert_eq!(outcome, FinishOutcome::EmptySelection);
    }

    #[tokio::test]
    async fn test_empty_finish_skips_profile_lookup() {
        let (engine, _) = engine();
        let looked_up = AtomicBool::new(false);
        engine.start("U1").await.unwrap();

        let outcome = engine
            .finish("U1", async {
                looked_up.store(true, Ordering::SeqCst);
                profile()
            })
            .await
            .unwrap();

        assert_eq!(outcome, FinishOutcome::EmptySelection);
        assert!(!looked_up.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_finish_commits_and_clears_session() {
        let (engine, store) = engine();
        engine.toggle("U1", &Unit::new(5, "Logistics")).await.unwrap();
        engine.toggle("U1", &Unit::new(4, "Warehouse")).await.unwrap();

        let FinishOutcome::Committed(registration) = engine.finish("U1", async { profile() }).await.unwrap() else {
            panic!("expected a committed registration");
        };

        assert_eq!(ids(&registration.units), vec![5, 4]);
        assert_eq!(registration.display_name, "Somchai");
        assert!(registration.is_active());
        assert!(registration.role.is_none());
        assert!(store.session("U1").await.unwrap().is_none());
        assert_eq!(store.registration("U1").await.unwrap(), Some(registration));
    }

    #[tokio::test]
    async fn test_reregistration_overwrites() {
        let (engine, store) = engine();
        let catalog = Catalog::new(default_units(), default_presets(), MatchPolicy::FirstMatch);
        let preset = catalog.preset("production manager").unwrap().clone();

        engine
            .apply_preset("U1", &preset, &catalog, async { profile() })
            .await
            .unwrap();

        engine.toggle("U1", &Unit::new(22, "Canteen")).await.unwrap();
        engine.finish("U1", async { ProfileInfo::unknown() }).await.unwrap();

        let registration = store.registration("U1").await.unwrap().unwrap();
        assert_eq!(ids(&registration.units), vec![22]);
        assert!(registration.role.is_none());
        assert_eq!(registration.display_name, "Unknown");
    }

    #[tokio::test]
    async fn test_preset_skips_missing_units() {
        let (engine, store) = engine();
        let units: Vec<Unit> = default_units().into_iter().filter(|u| u.id != 21).collect();
        let catalog = Catalog::new(units, default_presets(), MatchPolicy::FirstMatch);
        let preset = catalog.preset("maintenance supervisor").unwrap().clone();

        let outcome = engine
            .apply_preset("U1", &preset, &catalog, async { profile() })
            .await
            .unwrap();

        let PresetOutcome::Committed(registration) = outcome else {
            panic!("expected a committed registration");
        };
        assert_eq!(ids(&registration.units), vec![8, 9, 10]);
        assert_eq!(registration.role.as_deref(), Some("Maintenance Supervisor"));
        assert_eq!(store.registration("U1").await.unwrap(), Some(registration));
    }

    #[tokio::test]
    async fn test_preset_with_no_units_writes_nothing() {
        let (engine, store) = engine();
        let catalog = Catalog::new(vec![Unit::new(99, "Other")], default_presets(), MatchPolicy::FirstMatch);
        let preset = catalog.preset("safety officer").unwrap().clone();

        let outcome = engine
            .apply_preset("U1", &preset, &catalog, async { profile() })
            .await
            .unwrap();

        assert_eq!(outcome, PresetOutcome::NoUnits);
        assert!(store.registration("U1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_cancel_keeps_registration() {
        let (engine, store) = engine();
        engine.toggle("U1", &Unit::new(4, "Warehouse")).await.unwrap();
        engine.finish("U1", async { profile() }).await.unwrap();
        engine.toggle("U1", &Unit::new(5, "Logistics")).await.unwrap();

        assert!(engine.cancel("U1").await.unwrap());
        assert!(!engine.cancel("U1").await.unwrap());

        assert!(store.session("U1").await.unwrap().is_none());
        let registration = store.registration("U1").await.unwrap().unwrap();
        assert_eq!(ids(&registration.units), vec![4]);
    }

    #[tokio::test]
    async fn test_reset_from_any_state() {
        let (engine, store) = engine();

        engine.reset("U1").await.unwrap();

        engine.toggle("U1", &Unit::new(4, "Warehouse")).await.unwrap();
        engine.finish("U1", async { profile() }).await.unwrap();
        engine.toggle("U1", &Unit::new(5, "Logistics")).await.unwrap();
        engine.reset("U1").await.unwrap();

        assert!(store.session("U1").await.unwrap().is_none());
        assert!(store.registration("U1").await.unwrap().is_none());
    }
}
