//! Event handling module.
//!
//! This module contains handlers for network events: saving wizard sections
//! and loading saved records through the record API.

pub mod network;
