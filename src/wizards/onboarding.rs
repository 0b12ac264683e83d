//! Employee onboarding wizard.

use super::{references_list, visa};
use crate::form::{validators, FieldCell, FieldGroup, FormSection, ListManager, Section};
use std::sync::Arc;

pub const COLLECTION: &str = "onboarding";

pub fn sections() -> Vec<Box<dyn Section>> {
    vec![
        Box::new(personal()),
        Box::new(visa::section("work_authorization", "Work Authorization")),
        Box::new(education()),
        Box::new(employment()),
        Box::new(
            FormSection::new("references", "References").list(references_list(2, Some(5))),
        ),
    ]
}

fn personal() -> FormSection {
    FormSection::new("personal", "Personal Details")
        .field(
            FieldCell::text("first_name")
                .label("First name")
                .required()
                .transform_on_commit(validators::trim()),
        )
        .field(
            FieldCell::text("last_name")
                .label("Last name")
                .required()
                .transform_on_commit(validators::trim()),
        )
        .field(
            FieldCell::text("email")
                .label("Email")
                .required()
                .validate(validators::email()),
        )
        .field(
            FieldCell::text("phone")
                .label("Phone")
                .required()
                .validate(validators::phone())
                .transform_on_commit(validators::group_phone()),
        )
        .field(
            FieldCell::text("date_of_birth")
                .label("Date of birth")
                .validate(validators::date()),
        )
}

fn university_template() -> FieldGroup {
    FieldGroup::new(vec![
        FieldCell::text("university").label("University").required(),
        FieldCell::text("degree").label("Degree").required(),
        FieldCell::text("field_of_study").label("Field of study"),
        FieldCell::text("graduation_year")
            .label("Graduation year")
            .validate(validators::year())
            .transform_on_commit(validators::round_to_integer()),
    ])
}

fn education() -> FormSection {
    FormSection::new("education", "Education").list(ListManager::initialize(
        "universities",
        &[],
        Arc::new(university_template),
        1,
        Some(4),
    ))
}

fn employer_template() -> FieldGroup {
    FieldGroup::new(vec![
        FieldCell::text("employer").label("Employer").required(),
        FieldCell::text("title").label("Title").required(),
        FieldCell::text("start_date")
            .label("Start date")
            .required()
            .validate(validators::date()),
        FieldCell::text("end_date")
            .label("End date")
            .validate(validators::date()),
        FieldCell::text("experience_years")
            .label("Years of experience")
            .validate(validators::number_in_range(0.0, 60.0))
            .transform_on_commit(validators::round_to_integer()),
    ])
}

fn employment() -> FormSection {
    FormSection::new("employment", "Employment History").list(ListManager::initialize(
        "employers",
        &[],
        Arc::new(employer_template),
        0,
        Some(10),
    ))
}
