use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::catalog_service::CatalogService;
use crate::config::AppConfig;
use crate::contact_service::ContactService;
use crate::error::AppServicesError;
use crate::session_service::SessionService;

/// Assembles the app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    catalog: Arc<CatalogService>,
    session: Arc<SessionService>,
    contact: Arc<ContactService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage at `config.db_url`.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or session restore fails.
    pub async fn new_sqlite(config: &AppConfig, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(&config.db_url).await?;
        Self::with_storage(config, clock, &storage).await
    }

    /// Build services over an existing storage bundle.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the persisted session cannot be read.
    pub async fn with_storage(
        config: &AppConfig,
        clock: Clock,
        storage: &Storage,
    ) -> Result<Self, AppServicesError> {
        let session = SessionService::restore(clock, config, Arc::clone(&storage.kv)).await?;

        Ok(Self {
            catalog: Arc::new(CatalogService::seeded()),
            session: Arc::new(session),
            contact: Arc::new(ContactService::new(clock, config.contact_latency)),
        })
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<CatalogService> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn session(&self) -> Arc<SessionService> {
        Arc::clone(&self.session)
    }

    #[must_use]
    pub fn contact(&self) -> Arc<ContactService> {
        Arc::clone(&self.contact)
    }
}
