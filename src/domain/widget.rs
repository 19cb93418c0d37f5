//! Host-facing widget settings.
//!
//! The host page owns and persists one of these per widget instance; the
//! service only ever reads them, in the wire form they resolve to.

use std::num::NonZeroU64;

use thiserror::Error;

use super::fields::FieldFlags;
use super::roster::{Dimension, Mode, RosterQuery};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WidgetSettingsError {
    #[error("organization id is required for the organization roster mode")]
    MissingOrganization,
}

/// Per-instance widget configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetSettings {
    pub title: String,
    pub mode: Mode,
    pub dimension: Dimension,
    pub organization: Option<NonZeroU64>,
    pub fields: FieldFlags,
}

impl WidgetSettings {
    /// Cross-field invariant: the organization roster needs an id.
    pub fn validate(&self) -> Result<(), WidgetSettingsError> {
        if self.mode == Mode::Organization && self.organization.is_none() {
            return Err(WidgetSettingsError::MissingOrganization);
        }
        Ok(())
    }

    /// Wire query these settings resolve to.
    pub fn to_query(&self) -> RosterQuery {
        RosterQuery {
            mode: self.mode.code(),
            dimension: self.dimension,
            organization: self
                .organization
                .map_or(0, |organization| organization.get() as i64),
            fields: self.fields,
        }
    }
}
