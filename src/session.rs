//! Portal session.
//!
//! One [`Session`] holds everything the query hooks and the wizard share:
//! backend client, query cache, local storage, translations, the UI event
//! bus and the page error collector. The hosting shell creates it once and
//! calls the lifecycle hooks as the user navigates.

use crate::config::PortalConfig;
use crate::db;
use crate::error::AppError;
use crate::i18n::Translations;
use crate::routes::{self, paths};
use crate::services::events::{EventBus, UiEvent};
use crate::services::{BackendClient, LocalStorage, PageErrors, QueryCache, StorageKey};
use serde::Serialize;
use std::sync::{PoisonError, RwLock};
use tokio::sync::mpsc;

/// What the page layout shows around the page content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutState {
    /// Terms of service replace the page until approved.
    pub show_terms_of_service: bool,
}

pub struct Session {
    client: BackendClient,
    cache: QueryCache,
    storage: LocalStorage,
    events: EventBus,
    translations: Translations,
    page_errors: PageErrors,
    locale: String,
    /// Current route including its query string.
    route: RwLock<String>,
}

impl Session {
    pub fn new(
        client: BackendClient,
        storage: LocalStorage,
        translations: Translations,
        events: EventBus,
    ) -> Self {
        let locale = translations.locale().to_string();
        Self {
            client,
            cache: QueryCache::new(),
            storage,
            events,
            translations,
            page_errors: PageErrors::new(),
            locale,
            route: RwLock::new(paths::HOME.to_string()),
        }
    }

    /// Open storage, load translations and build the client from config.
    ///
    /// Returns the session and the receiver the shell drains UI events from.
    pub async fn open(
        config: &PortalConfig,
    ) -> Result<(Self, mpsc::UnboundedReceiver<UiEvent>), AppError> {
        let pool = db::initialize(&db::get_db_path(&config.storage_path)).await?;
        let storage = LocalStorage::new(pool);

        let translations = match &config.translations_path {
            Some(path) => Translations::load_file(config.locale.clone(), path)?,
            None => {
                log::warn!("No translations configured, keys are shown as-is");
                Translations::new(config.locale.clone())
            }
        };

        let client = BackendClient::new(config.backend_client_config())?;
        if let Some(token) = storage.get(StorageKey::CsrfToken).await? {
            client.set_csrf_token(token).await;
        }

        let (events, rx) = EventBus::channel();
        log::info!("Session opened against {}", config.backend_url);
        Ok((Self::new(client, storage, translations, events), rx))
    }

    pub fn client(&self) -> &BackendClient {
        &self.client
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn storage(&self) -> &LocalStorage {
        &self.storage
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn translations(&self) -> &Translations {
        &self.translations
    }

    pub fn page_errors(&self) -> &PageErrors {
        &self.page_errors
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Current route including its query string.
    pub fn current_route(&self) -> String {
        self.route
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Current route without its query string.
    pub fn route_path(&self) -> String {
        let route = self.current_route();
        match route.split_once('?') {
            Some((path, _)) => path.to_string(),
            None => route,
        }
    }

    /// Whether the user is on the login page finishing a logout.
    pub fn is_logout_route(&self) -> bool {
        self.route_path() == paths::LOGIN && self.current_route().contains("logout=true")
    }

    pub fn is_unauthenticated_route(&self) -> bool {
        routes::is_unauthenticated_route(&self.route_path())
    }

    /// Page entered: record the route, forget the previous page's errors and
    /// scroll to the top.
    pub fn on_page_enter(&self, route: &str) {
        *self.route.write().unwrap_or_else(PoisonError::into_inner) = route.to_string();
        self.page_errors.clear();
        self.events.emit(UiEvent::ScrollToTop);
        log::debug!("Entered {}", route);
    }

    /// Layout state for the current user, read from local storage.
    pub async fn layout_state(&self, is_authenticated: bool) -> Result<LayoutState, AppError> {
        let approved = self
            .storage
            .is_flag_set(StorageKey::IsTermsOfServiceApproved)
            .await?;
        Ok(LayoutState {
            show_terms_of_service: is_authenticated && !approved,
        })
    }
}
