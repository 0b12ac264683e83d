//! Multi-section intake wizards for recruiting and onboarding records.
//!
//! A wizard is an ordered list of sections. Each section validates its own
//! fields and repeating lists, and is saved to the record API as soon as it
//! is submitted. Conditional rules keyed on visa status decide which work
//! authorization details are required, optional or hidden.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod form;
pub mod logger;
pub mod notify;
pub mod state;
pub mod utils;
pub mod wizards;
