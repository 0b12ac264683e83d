//! Conditional requirement rules.
//!
//! A [`RuleSet`] maps the live value of a trigger field onto a requirement
//! for each of its targets. Evaluation is pure; resetting dependent cells
//! when the trigger changes is the section's job.

use super::error::FormError;
use super::field::FieldValue;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// How a field or list takes part in its section.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Requirement {
    Required,
    Optional,
    Hidden,
}

/// Immigration status of a candidate; the trigger for work authorization
/// rules.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum VisaStatus {
    Citizen,
    GreenCard,
    GcEad,
    H1b,
    H4Ead,
    L1,
    L2Ead,
    F1Opt,
    StemOpt,
    Tn,
}

impl VisaStatus {
    pub const ALL: [VisaStatus; 10] = [
        VisaStatus::Citizen,
        VisaStatus::GreenCard,
        VisaStatus::GcEad,
        VisaStatus::H1b,
        VisaStatus::H4Ead,
        VisaStatus::L1,
        VisaStatus::L2Ead,
        VisaStatus::F1Opt,
        VisaStatus::StemOpt,
        VisaStatus::Tn,
    ];

    pub fn label(self) -> &'static str {
        match self {
            VisaStatus::Citizen => "US Citizen",
            VisaStatus::GreenCard => "Green Card",
            VisaStatus::GcEad => "GC EAD",
            VisaStatus::H1b => "H1B",
            VisaStatus::H4Ead => "H4 EAD",
            VisaStatus::L1 => "L1",
            VisaStatus::L2Ead => "L2 EAD",
            VisaStatus::F1Opt => "F1 OPT",
            VisaStatus::StemOpt => "STEM OPT",
            VisaStatus::Tn => "TN",
        }
    }
}

impl fmt::Display for VisaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for VisaStatus {
    type Err = FormError;

    /// Parses labels case-insensitively, ignoring spaces and punctuation, so
    /// "H-1B", "h1b" and "H1B" are the same status.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "citizen" | "uscitizen" => Ok(VisaStatus::Citizen),
            "greencard" | "gc" => Ok(VisaStatus::GreenCard),
            "gcead" => Ok(VisaStatus::GcEad),
            "h1b" => Ok(VisaStatus::H1b),
            "h4ead" => Ok(VisaStatus::H4Ead),
            "l1" => Ok(VisaStatus::L1),
            "l2ead" => Ok(VisaStatus::L2Ead),
            "opt" | "f1opt" => Ok(VisaStatus::F1Opt),
            "stemopt" => Ok(VisaStatus::StemOpt),
            "tn" => Ok(VisaStatus::Tn),
            _ => Err(FormError::UnknownVisaStatus(s.to_string())),
        }
    }
}

/// One row of a rule table.
///
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalRule {
    pub when_value_in: HashSet<VisaStatus>,
    pub effect: Requirement,
    pub targets: Vec<String>,
}

impl ConditionalRule {
    pub fn new(when_value_in: &[VisaStatus], effect: Requirement, targets: &[&str]) -> Self {
        ConditionalRule {
            when_value_in: when_value_in.iter().copied().collect(),
            effect,
            targets: targets.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// Requirements decided for one evaluation of a rule set.
///
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Requirements(HashMap<String, Requirement>);

impl Requirements {
    /// Requirement for the named target, or the fallback if no rule covers it.
    ///
    pub fn get_or(&self, name: &str, fallback: Requirement) -> Requirement {
        self.0.get(name).copied().unwrap_or(fallback)
    }

    pub fn get(&self, name: &str) -> Option<Requirement> {
        self.0.get(name).copied()
    }

    pub fn set(&mut self, name: &str, requirement: Requirement) {
        self.0.insert(name.to_string(), requirement);
    }
}

/// A trigger field bound to its ordered rule table.
///
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSet {
    trigger: String,
    rules: Vec<ConditionalRule>,
}

impl RuleSet {
    pub fn new(trigger: &str, rules: Vec<ConditionalRule>) -> Self {
        RuleSet {
            trigger: trigger.to_string(),
            rules,
        }
    }

    pub fn trigger(&self) -> &str {
        &self.trigger
    }

    /// Every field or list any rule can affect.
    ///
    pub fn targets(&self) -> Vec<&str> {
        let mut targets: Vec<&str> = vec![];
        for rule in self.rules.iter() {
            for target in rule.targets.iter() {
                if !targets.contains(&target.as_str()) {
                    targets.push(target.as_str());
                }
            }
        }
        targets
    }

    /// Visa status a trigger value stands for, if any.
    ///
    pub fn status_of(trigger_value: &FieldValue) -> Option<VisaStatus> {
        trigger_value.to_string().parse::<VisaStatus>().ok()
    }

    /// Evaluate against the trigger's current value.
    ///
    /// Every target starts Hidden; matching rules apply in table order, the
    /// last match winning. A blank or unrecognised trigger leaves all targets
    /// Hidden.
    pub fn evaluate(&self, trigger_value: &FieldValue) -> Requirements {
        let mut requirements = Requirements::default();
        for target in self.targets() {
            requirements.set(target, Requirement::Hidden);
        }
        let status = match Self::status_of(trigger_value) {
            Some(status) => status,
            None => return requirements,
        };
        for rule in self.rules.iter() {
            if rule.when_value_in.contains(&status) {
                for target in rule.targets.iter() {
                    requirements.set(target, rule.effect);
                }
            }
        }
        requirements
    }
}
