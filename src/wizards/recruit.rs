//! Recruiter candidate submission wizard.

use super::{references_list, visa};
use crate::form::{validators, FieldCell, FormSection, Section};

pub const COLLECTION: &str = "submissions";

pub const RATE_TYPES: [&str; 2] = ["hourly", "annual"];

pub fn sections() -> Vec<Box<dyn Section>> {
    vec![
        Box::new(candidate()),
        Box::new(visa::section("visa", "Visa")),
        Box::new(engagement()),
        Box::new(
            FormSection::new("references", "References").list(references_list(2, Some(5))),
        ),
    ]
}

fn candidate() -> FormSection {
    FormSection::new("candidate", "Candidate")
        .field(
            FieldCell::text("full_name")
                .label("Full name")
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
            FieldCell::text("experience_years")
                .label("Years of experience")
                .required()
                .validate(validators::number_in_range(0.0, 60.0))
                .transform_on_commit(validators::round_to_integer()),
        )
        .field(
            FieldCell::text("primary_skills")
                .label("Primary skills")
                .required()
                .transform_on_commit(validators::trim()),
        )
}

fn engagement() -> FormSection {
    FormSection::new("engagement", "Engagement")
        .field(FieldCell::text("client").label("Client").required())
        .field(FieldCell::text("vendor").label("Vendor"))
        .field(FieldCell::text("job_title").label("Job title").required())
        .field(
            FieldCell::text("rate")
                .label("Rate")
                .required()
                .validate(validators::positive_number()),
        )
        .field(
            FieldCell::text("rate_type")
                .label("Rate type")
                .required()
                .validate(validators::one_of(&RATE_TYPES)),
        )
        .field(
            FieldCell::text("notes")
                .label("Notes")
                .validate(validators::max_length(500)),
        )
}
