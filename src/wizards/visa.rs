//! Work authorization fields and the visa rule table.

use crate::form::{
    validators, ConditionalRule, FieldCell, FieldGroup, FormSection, ListManager, Requirement,
    RuleSet, VisaStatus,
};
use std::sync::Arc;

pub const TRIGGER: &str = "visa_status";
pub const VISA_EXPIRY: &str = "visa_expiry";
pub const EAD_NUMBER: &str = "ead_number";
pub const I94_NUMBER: &str = "i94_number";
pub const PASSPORT_NUMBER: &str = "passport_number";
pub const SEVIS_NUMBER: &str = "sevis_number";
pub const STAY_ADDRESSES: &str = "stay_addresses";

/// Targets each status requires or allows. Targets not named stay hidden.
///
pub fn requirements_for(status: VisaStatus) -> Vec<(Requirement, Vec<&'static str>)> {
    use Requirement::*;
    match status {
        VisaStatus::Citizen => vec![],
        VisaStatus::GreenCard => vec![(Optional, vec![PASSPORT_NUMBER])],
        VisaStatus::GcEad => vec![
            (Required, vec![VISA_EXPIRY, EAD_NUMBER]),
            (Optional, vec![PASSPORT_NUMBER]),
        ],
        VisaStatus::H1b | VisaStatus::L1 => vec![(
            Required,
            vec![VISA_EXPIRY, I94_NUMBER, PASSPORT_NUMBER, STAY_ADDRESSES],
        )],
        VisaStatus::H4Ead | VisaStatus::L2Ead => vec![
            (Required, vec![VISA_EXPIRY, EAD_NUMBER]),
            (Optional, vec![I94_NUMBER, PASSPORT_NUMBER]),
        ],
        VisaStatus::F1Opt | VisaStatus::StemOpt => vec![
            (
                Required,
                vec![VISA_EXPIRY, EAD_NUMBER, SEVIS_NUMBER, STAY_ADDRESSES],
            ),
            (Optional, vec![PASSPORT_NUMBER]),
        ],
        VisaStatus::Tn => vec![(Required, vec![VISA_EXPIRY, PASSPORT_NUMBER, I94_NUMBER])],
    }
}

/// Rule set for the visa trigger, one rule per status and requirement.
///
pub fn rule_set() -> RuleSet {
    let mut rules = vec![];
    for status in VisaStatus::ALL.iter() {
        for (effect, targets) in requirements_for(*status) {
            rules.push(ConditionalRule::new(&[*status], effect, &targets));
        }
    }
    RuleSet::new(TRIGGER, rules)
}

fn address_template() -> FieldGroup {
    FieldGroup::new(vec![
        FieldCell::text("street")
            .label("Street")
            .required()
            .transform_on_commit(validators::trim()),
        FieldCell::text("city").label("City").required(),
        FieldCell::text("state").label("State").required(),
        FieldCell::text("zip")
            .label("ZIP")
            .required()
            .validate(validators::zip_code()),
    ])
}

/// Work authorization section with the given name and title.
///
pub fn section(name: &str, title: &str) -> FormSection {
    FormSection::new(name, title)
        .field(
            FieldCell::text(TRIGGER)
                .label("Visa status")
                .required()
                .validate(validators::visa_status()),
        )
        .field(
            FieldCell::text(VISA_EXPIRY)
                .label("Visa expiry")
                .validate(validators::date()),
        )
        .field(FieldCell::text(EAD_NUMBER).label("EAD number"))
        .field(FieldCell::text(I94_NUMBER).label("I-94 number"))
        .field(FieldCell::text(PASSPORT_NUMBER).label("Passport number"))
        .field(FieldCell::text(SEVIS_NUMBER).label("SEVIS number"))
        .list(ListManager::initialize(
            STAY_ADDRESSES,
            &[],
            Arc::new(address_template),
            1,
            Some(5),
        ))
        .rules(rule_set())
}
