//! Presenza service library: configuration, domain model, application
//! services, infrastructure adapters, and presentation views.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
pub mod util;
