//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate model and store calls into use-case level APIs.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod roster_service;
