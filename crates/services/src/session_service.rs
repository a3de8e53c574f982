use std::sync::Arc;
use std::time::Duration;

use prep_core::model::{CourseId, Learner, LearnerId, Progress};
use storage::repository::{KeyValueStore, StorageError};
use storage::session_codec;
use tokio::sync::Mutex;

use crate::Clock;
use crate::config::AppConfig;
use crate::error::SessionError;

/// Step applied by [`SessionService::continue_learning`].
pub const CONTINUE_STEP: u8 = 10;

/// Result of an enrollment request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollOutcome {
    Enrolled,
    AlreadyEnrolled,
    /// Nobody is signed in; nothing changed.
    NotSignedIn,
}

/// Result of a progress update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressOutcome {
    /// Stored value after clamping.
    Updated(Progress),
    /// The course is not enrolled; the update was ignored.
    NotEnrolled,
    /// Nobody is signed in; nothing changed.
    NotSignedIn,
}

/// Owns the active learner session and keeps it mirrored to storage.
///
/// Every mutation writes the full learner before the in-memory copy is
/// replaced, so a failed write leaves the previous state in place.
pub struct SessionService {
    clock: Clock,
    kv: Arc<dyn KeyValueStore>,
    key: String,
    latency: Duration,
    current: Mutex<Option<Learner>>,
}

impl SessionService {
    /// Rehydrate the session from storage.
    ///
    /// A missing key means anonymous. Malformed text is logged and treated as
    /// anonymous; removing it is attempted but a failed removal is only logged.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the key cannot be read.
    pub async fn restore(
        clock: Clock,
        config: &AppConfig,
        kv: Arc<dyn KeyValueStore>,
    ) -> Result<Self, SessionError> {
        let key = config.session_key.clone();
        let current = match kv.get(&key).await? {
            None => None,
            Some(raw) => match session_codec::decode(&raw) {
                Ok(learner) => {
                    tracing::debug!(learner_id = %learner.id(), "restored session");
                    Some(learner)
                }
                Err(StorageError::Serialization(reason)) => {
                    tracing::warn!(%key, %reason, "discarding malformed persisted session");
                    if let Err(err) = kv.remove(&key).await {
                        tracing::warn!(%key, error = %err, "could not remove malformed session");
                    }
                    None
                }
                Err(other) => return Err(other.into()),
            },
        };

        Ok(Self {
            clock,
            kv,
            key,
            latency: config.login_latency,
            current: Mutex::new(current),
        })
    }

    /// Snapshot of the signed-in learner, if any.
    pub async fn current(&self) -> Option<Learner> {
        self.current.lock().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.current.lock().await.is_some()
    }

    /// Sign in with the demo identity. No credentials are checked.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the session cannot be persisted.
    pub async fn login(&self, email: &str) -> Result<Learner, SessionError> {
        self.simulate_round_trip().await;

        let mut learner = Learner::new(LearnerId::new("1"), "John Doe", email);
        learner.enroll(CourseId::new("1"));
        learner.enroll(CourseId::new("2"));
        learner.set_progress(&CourseId::new("1"), Progress::clamped(45));
        learner.set_progress(&CourseId::new("2"), Progress::clamped(20));

        let mut guard = self.current.lock().await;
        self.persist(&learner).await?;
        *guard = Some(learner.clone());
        tracing::info!(learner_id = %learner.id(), email, "logged in");
        Ok(learner)
    }

    /// Create a fresh learner with no enrollments and sign it in.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the session cannot be persisted.
    pub async fn signup(&self, name: &str, email: &str) -> Result<Learner, SessionError> {
        self.simulate_round_trip().await;

        let learner = Learner::new(LearnerId::from_millis(self.clock.now_millis()), name, email);

        let mut guard = self.current.lock().await;
        self.persist(&learner).await?;
        *guard = Some(learner.clone());
        tracing::info!(learner_id = %learner.id(), email, "signed up");
        Ok(learner)
    }

    /// Drop the session and its persisted copy.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the persisted key cannot be removed.
    pub async fn logout(&self) -> Result<(), SessionError> {
        let mut guard = self.current.lock().await;
        self.kv.remove(&self.key).await?;
        if let Some(previous) = guard.take() {
            tracing::info!(learner_id = %previous.id(), "logged out");
        }
        Ok(())
    }

    /// Enroll the signed-in learner in a course. Repeating the call is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the updated session cannot be persisted.
    pub async fn enroll_in_course(&self, course_id: &str) -> Result<EnrollOutcome, SessionError> {
        let mut guard = self.current.lock().await;
        let Some(current) = guard.as_ref() else {
            tracing::debug!(course_id, "enroll ignored: not signed in");
            return Ok(EnrollOutcome::NotSignedIn);
        };

        let mut updated = current.clone();
        if !updated.enroll(CourseId::new(course_id)) {
            return Ok(EnrollOutcome::AlreadyEnrolled);
        }

        self.persist(&updated).await?;
        tracing::info!(learner_id = %updated.id(), course_id, "enrolled");
        *guard = Some(updated);
        Ok(EnrollOutcome::Enrolled)
    }

    /// Set progress for an enrolled course, clamped to `0..=100`.
    ///
    /// Updates for courses the learner is not enrolled in are ignored.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the updated session cannot be persisted.
    pub async fn update_progress(
        &self,
        course_id: &str,
        value: i64,
    ) -> Result<ProgressOutcome, SessionError> {
        self.apply_progress(course_id, |_| Progress::clamped(value)).await
    }

    /// Advance progress for an enrolled course by [`CONTINUE_STEP`], capped at 100.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the updated session cannot be persisted.
    pub async fn continue_learning(
        &self,
        course_id: &str,
    ) -> Result<ProgressOutcome, SessionError> {
        self.apply_progress(course_id, |current| current.advanced_by(CONTINUE_STEP))
            .await
    }

    async fn apply_progress(
        &self,
        course_id: &str,
        next: impl FnOnce(Progress) -> Progress,
    ) -> Result<ProgressOutcome, SessionError> {
        let mut guard = self.current.lock().await;
        let Some(current) = guard.as_ref() else {
            tracing::debug!(course_id, "progress ignored: not signed in");
            return Ok(ProgressOutcome::NotSignedIn);
        };
        if !current.is_enrolled(course_id) {
            tracing::debug!(course_id, "progress ignored: not enrolled");
            return Ok(ProgressOutcome::NotEnrolled);
        }

        let progress = next(current.progress_for(course_id));
        let mut updated = current.clone();
        updated.set_progress(&CourseId::new(course_id), progress);

        self.persist(&updated).await?;
        tracing::info!(learner_id = %updated.id(), course_id, %progress, "progress updated");
        *guard = Some(updated);
        Ok(ProgressOutcome::Updated(progress))
    }

    async fn persist(&self, learner: &Learner) -> Result<(), SessionError> {
        let encoded = session_codec::encode(learner)?;
        self.kv.set(&self.key, &encoded).await?;
        Ok(())
    }

    async fn simulate_round_trip(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use prep_core::time::{fixed_clock, fixed_now};
    use storage::repository::InMemoryRepository;

    async fn service_with(repo: &InMemoryRepository) -> SessionService {
        SessionService::restore(fixed_clock(), &AppConfig::instant(), Arc::new(repo.clone()))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn starts_anonymous_without_key() {
        let repo = InMemoryRepository::new();
        let service = service_with(&repo).await;
        assert!(!service.is_authenticated().await);
        assert!(service.current().await.is_none());
    }

    #[tokio::test]
    async fn login_installs_demo_identity() {
        let repo = InMemoryRepository::new();
        let service = service_with(&repo).await;

        let learner = service.login("me@x.com").await.unwrap();
        assert_eq!(learner.name(), "John Doe");
        assert_eq!(learner.email(), "me@x.com");
        assert_eq!(learner.progress_for("1").percent(), 45);
        assert_eq!(learner.progress_for("2").percent(), 20);

        let raw = repo.get("user").await.unwrap().unwrap();
        assert_eq!(session_codec::decode(&raw).unwrap(), learner);
    }

    #[tokio::test]
    async fn signup_uses_clock_millis_for_id() {
        let repo = InMemoryRepository::new();
        let service = service_with(&repo).await;

        let learner = service.signup("A", "a@x.com").await.unwrap();
        assert_eq!(
            learner.id().as_str(),
            fixed_now().timestamp_millis().to_string()
        );
        assert!(learner.enrolled().is_empty());
        assert!(learner.progress().is_empty());
    }

    #[tokio::test]
    async fn mutators_are_noops_when_anonymous() {
        let repo = InMemoryRepository::new();
        let service = service_with(&repo).await;

        assert_eq!(
            service.enroll_in_course("3").await.unwrap(),
            EnrollOutcome::NotSignedIn
        );
        assert_eq!(
            service.update_progress("3", 50).await.unwrap(),
            ProgressOutcome::NotSignedIn
        );
        assert_eq!(
            service.continue_learning("3").await.unwrap(),
            ProgressOutcome::NotSignedIn
        );
        assert!(repo.get("user").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn enroll_twice_matches_enroll_once() {
        let repo = InMemoryRepository::new();
        let service = service_with(&repo).await;
        service.signup("A", "a@x.com").await.unwrap();

        assert_eq!(
            service.enroll_in_course("4").await.unwrap(),
            EnrollOutcome::Enrolled
        );
        let once = service.current().await.unwrap();
        let persisted_once = repo.get("user").await.unwrap();

        assert_eq!(
            service.enroll_in_course("4").await.unwrap(),
            EnrollOutcome::AlreadyEnrolled
        );
        assert_eq!(service.current().await.unwrap(), once);
        assert_eq!(repo.get("user").await.unwrap(), persisted_once);
    }

    #[tokio::test]
    async fn update_progress_clamps() {
        let repo = InMemoryRepository::new();
        let service = service_with(&repo).await;
        service.signup("A", "a@x.com").await.unwrap();
        service.enroll_in_course("1").await.unwrap();

        for (input, stored) in [(-10, 0), (150, 100), (42, 42)] {
            let outcome = service.update_progress("1", input).await.unwrap();
            assert_eq!(outcome, ProgressOutcome::Updated(Progress::clamped(stored)));
            let learner = service.current().await.unwrap();
            assert_eq!(i64::from(learner.progress_for("1").percent()), stored);
        }
    }

    #[tokio::test]
    async fn update_progress_ignores_unenrolled_course() {
        let repo = InMemoryRepository::new();
        let service = service_with(&repo).await;
        service.signup("A", "a@x.com").await.unwrap();

        assert_eq!(
            service.update_progress("6", 30).await.unwrap(),
            ProgressOutcome::NotEnrolled
        );
        assert!(service.current().await.unwrap().progress().is_empty());
    }

    #[tokio::test]
    async fn continue_learning_steps_and_caps() {
        let repo = InMemoryRepository::new();
        let service = service_with(&repo).await;
        service.login("me@x.com").await.unwrap();

        assert_eq!(
            service.continue_learning("1").await.unwrap(),
            ProgressOutcome::Updated(Progress::clamped(55))
        );
        service.update_progress("2", 95).await.unwrap();
        assert_eq!(
            service.continue_learning("2").await.unwrap(),
            ProgressOutcome::Updated(Progress::COMPLETE)
        );
    }

    #[tokio::test]
    async fn logout_clears_memory_and_storage() {
        let repo = InMemoryRepository::new();
        let service = service_with(&repo).await;
        service.login("me@x.com").await.unwrap();

        service.logout().await.unwrap();
        assert!(service.current().await.is_none());
        assert!(repo.get("user").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn malformed_state_falls_back_to_anonymous() {
        let repo = InMemoryRepository::new();
        repo.set("user", "{\"id\":").await.unwrap();

        let service = service_with(&repo).await;
        assert!(!service.is_authenticated().await);
        assert!(repo.get("user").await.unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn login_waits_for_configured_latency() {
        let repo = InMemoryRepository::new();
        let config = AppConfig::default();
        let service = SessionService::restore(fixed_clock(), &config, Arc::new(repo))
            .await
            .unwrap();

        let started = tokio::time::Instant::now();
        service.login("me@x.com").await.unwrap();
        assert!(started.elapsed() >= config.login_latency);
    }
}
