//! Application form persistence and wizard setup.

use super::application_list::invalidate_application_list;
use crate::error::AppError;
use crate::forms::{benefit_application_steps, FormState, StepPersistence, Wizard};
use crate::models::{ApplicationStatus, ApplicationStep};
use crate::services::{BackendClient, EventBus, QueryCache};
use crate::session::Session;
use serde_json::Value;
use tokio::sync::RwLock;

/// Saves wizard steps to the applications endpoint.
///
/// The first save of a new application creates it; later saves update it.
/// Every change invalidates the application lists.
pub struct BackendStepPersistence {
    client: BackendClient,
    cache: QueryCache,
    events: EventBus,
    application_id: RwLock<Option<String>>,
}

impl BackendStepPersistence {
    pub fn new(
        client: BackendClient,
        cache: QueryCache,
        events: EventBus,
        application_id: Option<String>,
    ) -> Self {
        Self {
            client,
            cache,
            events,
            application_id: RwLock::new(application_id),
        }
    }

    pub async fn application_id(&self) -> Option<String> {
        self.application_id.read().await.clone()
    }

    async fn store(&self, body: Value) -> Result<(), AppError> {
        let mut id = self.application_id.write().await;
        let saved = self.client.save_application(id.as_deref(), &body).await?;

        if id.is_none() {
            let created = saved
                .get("id")
                .and_then(Value::as_str)
                .ok_or_else(|| AppError::api("Created application has no id"))?;
            log::info!("Created application {}", created);
            *id = Some(created.to_string());
        }

        // Lists show the step and status, so they are stale now.
        invalidate_application_list(&self.cache, &self.events).await;
        Ok(())
    }
}

fn with_field(values: &Value, name: &str, value: &str) -> Value {
    let mut body = values.clone();
    if let Value::Object(map) = &mut body {
        map.insert(name.to_string(), Value::String(value.to_string()));
    }
    body
}

impl StepPersistence for BackendStepPersistence {
    async fn save(&self, step: ApplicationStep, values: &Value) -> Result<(), AppError> {
        log::debug!("Saving {}", step);
        self.store(with_field(values, "application_step", step.as_str()))
            .await
    }

    async fn submit(&self, values: &Value) -> Result<(), AppError> {
        let body = with_field(
            &with_field(values, "application_step", ApplicationStep::TermsAndSend.as_str()),
            "status",
            ApplicationStatus::Received.as_str(),
        );
        self.store(body).await
    }

    async fn delete(&self) -> Result<(), AppError> {
        let mut id = self.application_id.write().await;
        let Some(current) = id.as_deref() else {
            log::debug!("Nothing to delete, application was never saved");
            return Ok(());
        };

        self.client.delete_application(current).await?;
        log::info!("Deleted application {}", current);
        *id = None;
        invalidate_application_list(&self.cache, &self.events).await;
        Ok(())
    }
}

/// Open the benefit application wizard, loading an existing application
/// and resuming at its saved step.
pub async fn open_application_wizard(
    session: &Session,
    application_id: Option<&str>,
) -> Result<Wizard<BackendStepPersistence>, AppError> {
    let (form, step) = match application_id {
        Some(id) => {
            let values = session.client().get_application(id).await?;
            let step = values
                .get("application_step")
                .cloned()
                .and_then(|v| serde_json::from_value::<ApplicationStep>(v).ok())
                .unwrap_or_default();
            (FormState::from_values(values), step)
        }
        None => (FormState::new(), ApplicationStep::default()),
    };

    let persistence = BackendStepPersistence::new(
        session.client().clone(),
        session.cache().clone(),
        session.events().clone(),
        application_id.map(str::to_string),
    );

    let wizard = Wizard::new(
        benefit_application_steps(),
        form,
        persistence,
        session.events().clone(),
        session.translations().clone(),
    )?
    .resume_at(step);

    Ok(wizard)
}
