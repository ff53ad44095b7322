//! Current-user query and the background check that keeps the session alive.

use crate::error::AppError;
use crate::models::User;
use crate::routes;
use crate::services::events::Notification;
use crate::services::StorageKey;
use crate::session::Session;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time;

/// How often the background check confirms the session is still valid.
pub const USER_REFRESH_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Fetch the signed-in user and install their CSRF token.
///
/// Asks for the terms of service unless they are already approved locally.
/// Returns `None` without a request while a logout is being finished.
pub async fn fetch_current_user(session: &Session) -> Result<Option<User>, AppError> {
    if session.is_logout_route() {
        log::debug!("Logout in progress, skipping user query");
        return Ok(None);
    }

    let storage = session.storage();
    let terms_approved = storage
        .is_flag_set(StorageKey::IsTermsOfServiceApproved)
        .await?;

    let user = match session.client().get_current_user(!terms_approved).await {
        Ok(user) => user,
        Err(e) => {
            handle_user_error(session, &e);
            return Err(e);
        }
    };

    storage.set(StorageKey::CsrfToken, &user.csrf_token).await?;
    session.client().set_csrf_token(user.csrf_token.clone()).await;
    if user.id.is_some() && user.terms_of_service_approval_needed {
        storage
            .set_flag(StorageKey::IsTermsOfServiceApproved, false)
            .await?;
    }

    Ok(Some(user))
}

/// React to a failed user query.
///
/// During logout the user is sent back to the logout page. 401/403 send the
/// user to login unless the page works without signing in. Anything else
/// shows the generic error.
pub fn handle_user_error(session: &Session, error: &AppError) {
    let locale = session.locale();

    if session.is_logout_route() {
        session.events().redirect(routes::login_path(locale, true));
    } else if error.is_auth_failure() {
        if session.is_unauthenticated_route() {
            return;
        }
        log::info!("Session expired, redirecting to login");
        session.events().redirect(routes::login_path(locale, false));
    } else {
        log::error!("User query failed: {}", error);
        let t = session.translations();
        session.events().notify(Notification::error(
            t.t("common:error.generic.label"),
            t.t("common:error.generic.text"),
        ));
    }
}

/// Record that the user approved the terms of service.
pub async fn approve_terms(session: &Session) -> Result<(), AppError> {
    session
        .storage()
        .set_flag(StorageKey::IsTermsOfServiceApproved, true)
        .await?;
    log::info!("Terms of service approved");
    Ok(())
}

/// Commands for the background user check.
#[derive(Debug)]
enum RefreshCommand {
    RefreshNow,
    Stop,
}

/// Handle to the background user check.
#[derive(Debug, Clone)]
pub struct UserRefreshHandle {
    command_tx: mpsc::Sender<RefreshCommand>,
}

impl UserRefreshHandle {
    /// Re-check the user immediately.
    pub async fn refresh_now(&self) -> Result<(), AppError> {
        self.send(RefreshCommand::RefreshNow).await
    }

    pub async fn stop(&self) -> Result<(), AppError> {
        self.send(RefreshCommand::Stop).await
    }

    async fn send(&self, command: RefreshCommand) -> Result<(), AppError> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| AppError::internal("User refresh task has stopped"))
    }
}

/// Start re-checking the user every `every`, the first check right away.
pub fn start_user_refresh(session: Arc<Session>, every: Duration) -> UserRefreshHandle {
    let (tx, mut rx) = mpsc::channel::<RefreshCommand>(8);

    tokio::spawn(async move {
        let mut interval = time::interval(every);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = fetch_current_user(&session).await {
                        log::debug!("Periodic user check failed: {}", e);
                    }
                }
                command = rx.recv() => match command {
                    Some(RefreshCommand::RefreshNow) => {
                        if let Err(e) = fetch_current_user(&session).await {
                            log::debug!("User check failed: {}", e);
                        }
                    }
                    Some(RefreshCommand::Stop) | None => break,
                },
            }
        }
        log::debug!("User refresh stopped");
    });

    UserRefreshHandle { command_tx: tx }
}
