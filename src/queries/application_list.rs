//! Application list query.

use crate::error::AppError;
use crate::models::ApplicationRecord;
use crate::routes;
use crate::services::backend_client::ApplicationsQuery;
use crate::services::{EventBus, QueryCache, QueryKey, QueryState, UiEvent};
use crate::session::Session;
use crate::view_models::application_list::{order_by_for, ApplicationListView};

/// Cache name of the application list; mutations invalidate it.
pub const APPLICATIONS_LIST_QUERY: &str = "applicationsList";

pub fn applications_list_key(statuses: &[String]) -> QueryKey {
    QueryKey::new(APPLICATIONS_LIST_QUERY, statuses)
}

/// Drop every cached application list and tell the shell to refetch.
pub async fn invalidate_application_list(cache: &QueryCache, events: &EventBus) {
    let removed = cache.invalidate(APPLICATIONS_LIST_QUERY).await;
    log::debug!("Dropped {} cached application lists", removed);
    events.emit(UiEvent::QueryInvalidated {
        query: APPLICATIONS_LIST_QUERY.to_string(),
    });
}

/// Fetch applications with the given statuses, served from the cache when
/// a previous fetch succeeded.
pub async fn fetch_applications(
    session: &Session,
    statuses: &[String],
) -> Result<Vec<ApplicationRecord>, AppError> {
    let query = ApplicationsQuery::new(statuses, order_by_for(statuses));
    session
        .cache()
        .fetch(applications_list_key(statuses), || {
            session.client().list_applications(&query)
        })
        .await
}

/// Run the list query and build the list view.
///
/// Show [`ApplicationListView::loading`] until this resolves. Failures never
/// escape: they are handed to [`handle_list_error`] and the view renders
/// without items.
pub async fn application_list(session: &Session, statuses: &[String]) -> ApplicationListView {
    let state: QueryState<Vec<ApplicationRecord>> =
        fetch_applications(session, statuses).await.into();

    if let Some(error) = state.error() {
        handle_list_error(session, error);
    }

    ApplicationListView::from_state(session.translations(), &state)
}

/// Send the user to the login page on auth failures; collect other errors
/// once on the page.
pub fn handle_list_error(session: &Session, error: &AppError) {
    if error.is_auth_failure() {
        if !session.is_unauthenticated_route() {
            session
                .events()
                .redirect(routes::login_path(session.locale(), false));
        }
        return;
    }

    if session.page_errors().add(error) {
        log::warn!("Application list failed: {}", error);
    }
}
