use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use prep_core::model::Progress;
use prep_core::time::fixed_clock;
use services::{AppConfig, AppServices, EnrollOutcome, ProgressOutcome, SessionService};
use storage::repository::{InMemoryRepository, KeyValueStore, Storage, StorageError};

#[tokio::test]
async fn signup_survives_restart() {
    let storage = Storage::in_memory();
    let config = AppConfig::instant();

    let first = AppServices::with_storage(&config, fixed_clock(), &storage)
        .await
        .expect("boot");
    first.session().signup("A", "a@x.com").await.expect("signup");
    drop(first);

    let restarted = AppServices::with_storage(&config, fixed_clock(), &storage)
        .await
        .expect("reboot");
    let learner = restarted.session().current().await.expect("restored");
    assert_eq!(learner.name(), "A");
    assert_eq!(learner.email(), "a@x.com");
    assert!(learner.enrolled().is_empty());
}

#[tokio::test]
async fn enroll_then_progress_feeds_dashboard() {
    let storage = Storage::in_memory();
    let app = AppServices::with_storage(&AppConfig::instant(), fixed_clock(), &storage)
        .await
        .expect("boot");
    let session = app.session();
    session.signup("A", "a@x.com").await.unwrap();

    assert_eq!(
        session.enroll_in_course("3").await.unwrap(),
        EnrollOutcome::Enrolled
    );
    assert_eq!(
        session.update_progress("3", 55).await.unwrap(),
        ProgressOutcome::Updated(Progress::clamped(55))
    );

    let learner = session.current().await.unwrap();
    let enrolled: Vec<_> = learner.enrolled().iter().map(ToString::to_string).collect();
    assert_eq!(enrolled, vec!["3"]);
    assert_eq!(learner.progress_for("3").percent(), 55);

    let catalog = app.catalog();
    let dashboard = catalog.dashboard(&learner);
    assert_eq!(dashboard.average_progress(), 55);
    assert_eq!(dashboard.in_progress().len(), 1);
    assert!(dashboard.completed().is_empty());

    let detail = catalog.course_detail("3", Some(&learner)).expect("course 3");
    assert!(detail.is_enrolled());
}

#[tokio::test]
async fn logout_leaves_no_persisted_key() {
    let storage = Storage::in_memory();
    let app = AppServices::with_storage(&AppConfig::instant(), fixed_clock(), &storage)
        .await
        .expect("boot");
    app.session().login("me@x.com").await.unwrap();
    assert!(storage.kv.get("user").await.unwrap().is_some());

    app.session().logout().await.unwrap();
    assert!(app.session().current().await.is_none());
    assert!(storage.kv.get("user").await.unwrap().is_none());

    let restarted = AppServices::with_storage(&AppConfig::instant(), fixed_clock(), &storage)
        .await
        .expect("reboot");
    assert!(!restarted.session().is_authenticated().await);
}

#[tokio::test]
async fn custom_session_key_is_honoured() {
    let storage = Storage::in_memory();
    let config = AppConfig {
        session_key: "learner".into(),
        ..AppConfig::instant()
    };
    let app = AppServices::with_storage(&config, fixed_clock(), &storage)
        .await
        .expect("boot");
    app.session().signup("B", "b@x.com").await.unwrap();

    assert!(storage.kv.get("learner").await.unwrap().is_some());
    assert!(storage.kv.get("user").await.unwrap().is_none());
}

#[tokio::test]
async fn sqlite_backed_session_restores() {
    let config = AppConfig {
        db_url: "sqlite:file:memdb_session_flow?mode=memory&cache=shared".into(),
        ..AppConfig::instant()
    };
    let first = AppServices::new_sqlite(&config, fixed_clock())
        .await
        .expect("sqlite boot");
    first.session().login("me@x.com").await.unwrap();
    first.session().enroll_in_course("6").await.unwrap();

    let second = AppServices::new_sqlite(&config, fixed_clock())
        .await
        .expect("sqlite reboot");
    let learner = second.session().current().await.expect("restored");
    assert!(learner.is_enrolled("6"));
    assert_eq!(learner.progress_for("1").percent(), 45);
}

/// Store whose writes can be switched off to simulate a failing backend.
#[derive(Clone, Default)]
struct FlakyStore {
    inner: InMemoryRepository,
    fail_writes: Arc<AtomicBool>,
}

#[async_trait]
impl KeyValueStore for FlakyStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Connection("disk full".into()));
        }
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(key).await
    }
}

#[tokio::test]
async fn failed_write_keeps_previous_state() {
    let store = FlakyStore::default();
    let session =
        SessionService::restore(fixed_clock(), &AppConfig::instant(), Arc::new(store.clone()))
            .await
            .unwrap();
    session.signup("A", "a@x.com").await.unwrap();
    let before = session.current().await.unwrap();

    store.fail_writes.store(true, Ordering::SeqCst);
    assert!(session.enroll_in_course("2").await.is_err());

    assert_eq!(session.current().await.unwrap(), before);
    let raw = store.get("user").await.unwrap().unwrap();
    assert_eq!(storage::session_codec::decode(&raw).unwrap(), before);
}

/// Store that can be read and written but refuses deletes.
#[derive(Clone, Default)]
struct NoDeleteStore {
    inner: InMemoryRepository,
}

#[async_trait]
impl KeyValueStore for NoDeleteStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner.set(key, value).await
    }

    async fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Connection("read-only".into()))
    }
}

#[tokio::test]
async fn malformed_state_is_anonymous_even_when_cleanup_fails() {
    let store = NoDeleteStore::default();
    store.set("user", "{not json").await.unwrap();

    let session =
        SessionService::restore(fixed_clock(), &AppConfig::instant(), Arc::new(store.clone()))
            .await
            .expect("restore falls back to anonymous");
    assert!(!session.is_authenticated().await);

    // A later sign-in overwrites the leftover text.
    session.login("me@x.com").await.unwrap();
    let raw = store.get("user").await.unwrap().unwrap();
    assert!(storage::session_codec::decode(&raw).is_ok());
}
