//! Batch completion mutation.
//!
//! Moves a batch to its decided status, sending the decision details the
//! handler typed in. The decision date is typed as `d.M.yyyy` and stored as
//! `yyyy-MM-dd`.

use super::application_list::invalidate_application_list;
use crate::error::AppError;
use crate::format;
use crate::models::{BatchCompletionDetails, BatchStatus, BatchStatusChange};
use crate::services::backend_client::BatchStatusChangeRequest;
use crate::services::events::Notification;
use crate::session::Session;
use reqwest::StatusCode;

const NOTIFICATIONS_BASE: &str = "common:batches.notifications";

/// Convert the decision date to the backend format.
///
/// Dates already in `yyyy-MM-dd` pass through unchanged.
pub fn format_completion_details(
    form: BatchCompletionDetails,
) -> Result<BatchCompletionDetails, AppError> {
    let raw = form.decision_date.trim();
    let decision_date = match format::ui_date_to_backend(raw) {
        Some(date) => date,
        None if chrono::NaiveDate::parse_from_str(raw, format::BACKEND_DATE_FORMAT).is_ok() => {
            raw.to_string()
        }
        None => {
            return Err(AppError::invalid_input_field(
                format!("Invalid decision date: {}", form.decision_date),
                "decision_date",
            ))
        }
    };

    Ok(BatchCompletionDetails {
        decision_date,
        ..form
    })
}

/// Change a batch's status and report the outcome to the user.
///
/// On success the application list cache is invalidated so list views
/// refetch. Every failure produces an error notification.
pub async fn complete_batch(
    session: &Session,
    id: &str,
    status: BatchStatus,
    form: Option<BatchCompletionDetails>,
) -> Result<BatchStatusChange, AppError> {
    let result = change_status(session, id, status, form).await;

    match &result {
        Ok(change) => {
            log::info!("Batch {} is now {}", id, change.status);
            session.events().notify(Notification::success(
                session.translations().t(&format!(
                    "{}.registerToAhjo.{}",
                    NOTIFICATIONS_BASE, change.status
                )),
                "",
            ));
            invalidate_application_list(session.cache(), session.events()).await;
        }
        Err(e) => handle_batch_error(session, e),
    }

    result
}

async fn change_status(
    session: &Session,
    id: &str,
    status: BatchStatus,
    form: Option<BatchCompletionDetails>,
) -> Result<BatchStatusChange, AppError> {
    let details = form.map(format_completion_details).transpose()?;
    let body = BatchStatusChangeRequest { status, details };
    session.client().change_batch_status(id, &body).await
}

/// Error notification for a failed batch change.
///
/// A 406 rejection with an error key gets the message for that key; all
/// other failures get the generic fetch error.
pub fn batch_error_notification(session: &Session, error: &AppError) -> Notification {
    let t = session.translations();
    match (error.status_code(), error.error_key()) {
        (Some(code), Some(key)) if code == StatusCode::NOT_ACCEPTABLE.as_u16() => {
            Notification::error(
                t.t(&format!("{}.errors.{}.title", NOTIFICATIONS_BASE, key)),
                t.t(&format!("{}.errors.{}.message", NOTIFICATIONS_BASE, key)),
            )
        }
        _ => Notification::error(
            t.t("common:applications.list.errors.fetch.label"),
            t.t_with(
                "common:applications.list.errors.fetch.text",
                &[("status", "unknown error")],
            ),
        ),
    }
}

pub fn handle_batch_error(session: &Session, error: &AppError) {
    log::error!("Batch status change failed: {}", error);
    session
        .events()
        .notify(batch_error_notification(session, error));
}
