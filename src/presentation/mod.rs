//! Presentation layer: view models and templates.

pub mod views;
