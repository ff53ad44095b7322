//! Step definitions of the benefit application form.

use super::validation::{FieldSchema, Rule, WORKING_HOURS};
use super::wizard::StepDefinition;
use crate::models::ApplicationStep;
use serde_json::{json, Value};

/// Benefit types an application can be made for.
pub mod benefit_types {
    pub const EMPLOYMENT: &str = "employment_benefit";
    pub const SALARY: &str = "salary_benefit";
    pub const COMMISSION: &str = "commission_benefit";
}

fn commission() -> Value {
    json!(benefit_types::COMMISSION)
}

fn company_details() -> Vec<FieldSchema> {
    let alternative = |id: &str| {
        FieldSchema::new(id)
            .required()
            .visible_when("use_alternative_address", json!(true))
    };

    vec![
        FieldSchema::new("company_contact_person_first_name").required(),
        FieldSchema::new("company_contact_person_last_name").required(),
        FieldSchema::new("company_contact_person_phone_number")
            .required()
            .rule(Rule::PhoneNumber),
        FieldSchema::new("company_contact_person_email")
            .required()
            .rule(Rule::Email),
        alternative("alternative_company_street_address"),
        alternative("alternative_company_postcode").rule(Rule::MaxLength(5)),
        alternative("alternative_company_city"),
        FieldSchema::new("company_bank_account_number").required(),
        FieldSchema::new("de_minimis_aid").required(),
        FieldSchema::new("co_operation_negotiations").required(),
    ]
}

fn employee_details() -> Vec<FieldSchema> {
    vec![
        FieldSchema::new("employee.first_name").required(),
        FieldSchema::new("employee.last_name").required(),
        FieldSchema::new("employee.social_security_number").required(),
        FieldSchema::new("employee.phone_number").rule(Rule::PhoneNumber),
        FieldSchema::new("employee.email").rule(Rule::Email),
        FieldSchema::new("benefit_type").required(),
        FieldSchema::new("start_date").required().rule(Rule::Date),
        FieldSchema::new("end_date").required().rule(Rule::Date),
        FieldSchema::new("employee.job_title")
            .required()
            .hidden_when("benefit_type", commission()),
        FieldSchema::new("employee.working_hours")
            .required()
            .rule(Rule::Min(WORKING_HOURS.0))
            .rule(Rule::Max(WORKING_HOURS.1))
            .hidden_when("benefit_type", commission()),
        FieldSchema::new("employee.monthly_pay")
            .required()
            .rule(Rule::Min(0.0))
            .hidden_when("benefit_type", commission()),
        FieldSchema::new("employee.commission_description")
            .required()
            .rule(Rule::MaxLength(256))
            .visible_when("benefit_type", commission()),
        FieldSchema::new("employee.employee_commission_amount")
            .required()
            .rule(Rule::Min(0.0))
            .visible_when("benefit_type", commission()),
    ]
}

/// The six steps of the benefit application, in order.
pub fn benefit_application_steps() -> Vec<StepDefinition> {
    vec![
        StepDefinition::new(ApplicationStep::CompanyDetails, company_details()),
        StepDefinition::new(ApplicationStep::EmployeeDetails, employee_details()),
        StepDefinition::new(ApplicationStep::Attachments, vec![]),
        StepDefinition::new(ApplicationStep::Summary, vec![]),
        StepDefinition::new(ApplicationStep::PowerOfAttorney, vec![]),
        StepDefinition::new(
            ApplicationStep::TermsAndSend,
            vec![FieldSchema::new("approve_terms").rule(Rule::Checked)],
        ),
    ]
}
