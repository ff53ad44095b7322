//! Application list view-model.
//!
//! Reshapes application records into list items. Which dated fields an item
//! carries depends on the application status and is modelled as
//! [`ListItemVariant`], so exactly one shape exists per item.

use crate::format::{self, EMPTY_PLACEHOLDER};
use crate::i18n::Translations;
use crate::models::{ApplicationRecord, ApplicationStatus, BatchReference};
use crate::routes;
use crate::services::QueryState;
use serde::Serialize;

const TRANSLATION_LIST_BASE: &str = "common:applications.list";
const TRANSLATION_STATUS_BASE: &str = "common:applications.statuses";

/// Theme color of the avatar circle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AvatarColor {
    /// Neutral grey.
    #[serde(rename = "black40")]
    Neutral,
    #[serde(rename = "alert")]
    Alert,
    #[serde(rename = "info")]
    Info,
    #[serde(rename = "success")]
    Success,
    #[serde(rename = "error")]
    Error,
}

impl From<ApplicationStatus> for AvatarColor {
    fn from(status: ApplicationStatus) -> Self {
        match status {
            ApplicationStatus::AdditionalInformationNeeded => Self::Alert,
            ApplicationStatus::Received => Self::Info,
            ApplicationStatus::Accepted => Self::Success,
            ApplicationStatus::Rejected => Self::Error,
            ApplicationStatus::Draft
            | ApplicationStatus::Handling
            | ApplicationStatus::Cancelled
            | ApplicationStatus::Unknown => Self::Neutral,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Avatar {
    pub color: AvatarColor,
    pub initials: String,
}

/// Icon shown next to an action label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionIcon {
    Edit,
}

/// What the user can do with a list item, and where it leads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowedAction {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<ActionIcon>,
    /// Application the action navigates to.
    pub application_id: String,
}

impl AllowedAction {
    /// Navigation target, optionally opening the message drawer.
    pub fn href(&self, open_drawer: bool) -> String {
        routes::application_form_path(&self.application_id, open_drawer)
    }
}

/// Status-dependent fields of a list item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ListItemVariant {
    Draft {
        /// Last modification, with time.
        modified_at_with_time: Option<String>,
        application_num: Option<i64>,
    },
    InfoRequired {
        submitted_at: String,
        application_num: Option<i64>,
        /// Deadline for the requested information.
        #[serde(skip_serializing_if = "Option::is_none")]
        edit_end_date: Option<String>,
    },
    Submitted {
        submitted_at: String,
        application_num: Option<i64>,
        status_text: String,
    },
}

/// One row of the applicant's application list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationListItem {
    pub id: String,
    pub name: String,
    pub avatar: Avatar,
    pub status: ApplicationStatus,
    /// Last modification date, without time.
    pub modified_at: Option<String>,
    pub unread_messages_count: u32,
    pub batch: Option<BatchReference>,
    pub allowed_action: AllowedAction,
    #[serde(flatten)]
    pub variant: ListItemVariant,
}

/// Everything a list page needs to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationListView {
    pub list: Vec<ApplicationListItem>,
    pub should_show_skeleton: bool,
    pub should_hide_list: bool,
}

/// Server-side ordering for a status filter.
pub fn order_by_for(statuses: &[String]) -> &'static str {
    if statuses.iter().any(|s| s == ApplicationStatus::Draft.as_str()) {
        "-modified_at"
    } else {
        "-submitted_at"
    }
}

/// Employee display name, `"-"` when both parts are empty.
pub fn employee_full_name(first_name: Option<&str>, last_name: Option<&str>) -> String {
    let name = format!("{} {}", first_name.unwrap_or(""), last_name.unwrap_or(""));
    if name == " " {
        EMPTY_PLACEHOLDER.to_string()
    } else {
        name
    }
}

/// Action allowed for an application in the given status.
pub fn allowed_action(t: &Translations, id: &str, status: ApplicationStatus) -> AllowedAction {
    let (label_key, icon) = if status.is_applicant_editable() {
        ("edit", Some(ActionIcon::Edit))
    } else {
        ("check", None)
    };

    AllowedAction {
        label: t.t(&format!("{}.common.{}", TRANSLATION_LIST_BASE, label_key)),
        icon,
        application_id: id.to_string(),
    }
}

/// Localized status label.
pub fn status_text(t: &Translations, status: ApplicationStatus) -> String {
    t.t(&format!("{}.{}", TRANSLATION_STATUS_BASE, status.translation_key()))
}

/// Map one record to its list item.
pub fn map_application(t: &Translations, record: &ApplicationRecord) -> ApplicationListItem {
    let employee = record.employee.as_ref();
    let name = employee_full_name(
        employee.and_then(|e| e.first_name.as_deref()),
        employee.and_then(|e| e.last_name.as_deref()),
    );

    let avatar = Avatar {
        color: record.status.into(),
        initials: format::initials(&name),
    };

    let submitted_at = record
        .submitted_at
        .as_deref()
        .and_then(format::to_ui_date)
        .unwrap_or_else(|| EMPTY_PLACEHOLDER.to_string());
    let modified_at = record.modified_at.as_deref().and_then(format::to_ui_date);
    let application_num = record.application_number;

    let variant = match record.status {
        ApplicationStatus::Draft => ListItemVariant::Draft {
            modified_at_with_time: record
                .modified_at
                .as_deref()
                .and_then(format::to_ui_date_and_time),
            application_num,
        },
        ApplicationStatus::AdditionalInformationNeeded => ListItemVariant::InfoRequired {
            submitted_at,
            application_num,
            edit_end_date: record
                .additional_information_needed_by
                .as_deref()
                .and_then(format::to_ui_date),
        },
        ApplicationStatus::Received
        | ApplicationStatus::Handling
        | ApplicationStatus::Accepted
        | ApplicationStatus::Rejected
        | ApplicationStatus::Cancelled
        | ApplicationStatus::Unknown => ListItemVariant::Submitted {
            submitted_at,
            application_num,
            status_text: status_text(t, record.status),
        },
    };

    ApplicationListItem {
        id: record.id.clone(),
        name,
        avatar,
        status: record.status,
        modified_at,
        unread_messages_count: record.unread_messages_count.unwrap_or(0),
        batch: record.batch.clone(),
        allowed_action: allowed_action(t, &record.id, record.status),
        variant,
    }
}

/// Map records to list items, preserving input order.
pub fn map_application_list(
    t: &Translations,
    records: &[ApplicationRecord],
) -> Vec<ApplicationListItem> {
    records.iter().map(|record| map_application(t, record)).collect()
}

impl ApplicationListView {
    /// View shown while the first fetch of a list is running.
    pub fn loading() -> Self {
        Self {
            list: Vec::new(),
            should_show_skeleton: true,
            should_hide_list: false,
        }
    }

    /// Build the view from the list query's state.
    pub fn from_state(t: &Translations, state: &QueryState<Vec<ApplicationRecord>>) -> Self {
        let should_show_skeleton = state.is_loading();
        let records = state.data().map(Vec::as_slice).unwrap_or(&[]);

        Self {
            list: map_application_list(t, records),
            should_show_skeleton,
            should_hide_list: !should_show_skeleton
                && state.data().is_some_and(|data| data.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::Employee;
    use serde_json::json;

    fn translations() -> Translations {
        Translations::new("en").with_namespace(
            "common",
            &json!({
                "applications": {
                    "statuses": { "received": "Received", "accepted": "Accepted" },
                    "list": { "common": { "edit": "Edit", "check": "Check" } }
                }
            }),
        )
    }

    fn record(status: ApplicationStatus) -> ApplicationRecord {
        let mut record = ApplicationRecord::new("app-1", status);
        record.employee = Some(Employee {
            first_name: Some("Aino".into()),
            last_name: Some("Virtanen".into()),
            ..Default::default()
        });
        record.application_number = Some(125);
        record.submitted_at = Some("2024-03-05T10:15:00+02:00".into());
        record.modified_at = Some("2024-03-04T08:30:00+02:00".into());
        record
    }

    #[test]
    fn test_draft_variant() {
        let item = map_application(&translations(), &record(ApplicationStatus::Draft));
        assert_eq!(
            item.variant,
            ListItemVariant::Draft {
                modified_at_with_time: Some("4.3.2024. 08:30".into()),
                application_num: Some(125),
            }
        );
        assert_eq!(item.allowed_action.label, "Edit");
        assert_eq!(item.allowed_action.icon, Some(ActionIcon::Edit));
        assert_eq!(item.avatar.color, AvatarColor::Neutral);

        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("submittedAt").is_none());
        assert!(json.get("statusText").is_none());
        assert_eq!(json["kind"], "draft");
        assert_eq!(json["modifiedAt"], "4.3.2024");
        assert_eq!(json["modifiedAtWithTime"], "4.3.2024. 08:30");
    }

    #[test]
    fn test_info_required_variant() {
        let mut rec = record(ApplicationStatus::AdditionalInformationNeeded);
        rec.additional_information_needed_by = Some("2024-04-01".into());
        let item = map_application(&translations(), &rec);
        assert_eq!(
            item.variant,
            ListItemVariant::InfoRequired {
                submitted_at: "5.3.2024".into(),
                application_num: Some(125),
                edit_end_date: Some("1.4.2024".into()),
            }
        );
        assert_eq!(item.avatar.color, AvatarColor::Alert);
        assert_eq!(item.allowed_action.icon, Some(ActionIcon::Edit));
    }

    #[test]
    fn test_info_required_without_deadline() {
        let item = map_application(
            &translations(),
            &record(ApplicationStatus::AdditionalInformationNeeded),
        );
        match item.variant {
            ListItemVariant::InfoRequired { edit_end_date, .. } => assert!(edit_end_date.is_none()),
            other => panic!("unexpected variant {:?}", other),
        }
    }

    #[test]
    fn test_submitted_variant() {
        let item = map_application(&translations(), &record(ApplicationStatus::Accepted));
        assert_eq!(
            item.variant,
            ListItemVariant::Submitted {
                submitted_at: "5.3.2024".into(),
                application_num: Some(125),
                status_text: "Accepted".into(),
            }
        );
        assert_eq!(item.avatar.color, AvatarColor::Success);
        assert_eq!(item.allowed_action.label, "Check");
        assert!(item.allowed_action.icon.is_none());
    }

    #[test]
    fn test_unknown_status_uses_submitted_shape() {
        let item = map_application(&translations(), &record(ApplicationStatus::Unknown));
        assert!(matches!(item.variant, ListItemVariant::Submitted { .. }));
        assert_eq!(item.avatar.color, AvatarColor::Neutral);
    }

    #[test]
    fn test_missing_fields_degrade() {
        let rec = ApplicationRecord::new("", ApplicationStatus::Received);
        let item = map_application(&translations(), &rec);
        assert_eq!(item.name, "-");
        assert_eq!(item.avatar.initials, "");
        assert_eq!(item.unread_messages_count, 0);
        match item.variant {
            ListItemVariant::Submitted { submitted_at, application_num, .. } => {
                assert_eq!(submitted_at, "-");
                assert!(application_num.is_none());
            }
            other => panic!("unexpected variant {:?}", other),
        }
    }

    #[test]
    fn test_employee_full_name() {
        assert_eq!(employee_full_name(Some(""), Some("")), "-");
        assert_eq!(employee_full_name(None, None), "-");
        assert_eq!(employee_full_name(Some("A"), Some("")), "A ");
        assert_eq!(employee_full_name(Some("Aino"), Some("Virtanen")), "Aino Virtanen");
    }

    #[test]
    fn test_avatar_initials() {
        let item = map_application(&translations(), &record(ApplicationStatus::Rejected));
        assert_eq!(item.avatar.initials, "AV");
        assert_eq!(item.avatar.color, AvatarColor::Error);
    }

    #[test]
    fn test_order_by() {
        assert_eq!(order_by_for(&["draft".to_string()]), "-modified_at");
        assert_eq!(
            order_by_for(&["received".to_string(), "handling".to_string()]),
            "-submitted_at"
        );
        assert_eq!(order_by_for(&[]), "-submitted_at");
    }

    #[test]
    fn test_action_href() {
        let action = allowed_action(&translations(), "app-1", ApplicationStatus::Draft);
        assert_eq!(action.href(false), "/new-application?id=app-1");
        assert_eq!(action.href(true), "/new-application?id=app-1&openDrawer=1");
    }

    #[test]
    fn test_list_preserves_order() {
        let mut first = record(ApplicationStatus::Received);
        first.id = "b".into();
        let mut second = record(ApplicationStatus::Draft);
        second.id = "a".into();

        let items = map_application_list(&translations(), &[first, second]);
        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_view_from_state() {
        let t = translations();
        let loading = ApplicationListView::from_state(&t, &QueryState::Loading);
        assert!(loading.should_show_skeleton);
        assert!(!loading.should_hide_list);
        assert_eq!(loading, ApplicationListView::loading());

        let empty = ApplicationListView::from_state(&t, &QueryState::Success(vec![]));
        assert!(!empty.should_show_skeleton);
        assert!(empty.should_hide_list);

        let failed =
            ApplicationListView::from_state(&t, &QueryState::Error(AppError::network("offline")));
        assert!(failed.list.is_empty());
        assert!(!failed.should_hide_list);
    }
}
