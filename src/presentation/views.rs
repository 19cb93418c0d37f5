//! Roster table rendering.
//!
//! Row values are transformed to display text up front; the template applies
//! HTML escaping exactly once, on output, and never to the static markup.

use askama::{Error as AskamaError, Template};
use thiserror::Error;

use crate::domain::fields::{Field, FieldFlags};
use crate::domain::roster::{Mode, RosterRow};
use crate::util::duration::format_duration;

#[derive(Debug, Error)]
#[error("roster table rendering failed")]
pub struct RenderError {
    #[source]
    error: AskamaError,
}

/// One data row, with cell text in column order.
pub struct RosterRowView {
    pub css_class: &'static str,
    pub cells: Vec<String>,
}

/// Fully-prepared table data handed to the template.
pub struct RosterTableView {
    pub mode_class: &'static str,
    pub headers: Vec<&'static str>,
    pub rows: Vec<RosterRowView>,
}

#[derive(Template)]
#[template(path = "roster_table.html")]
struct RosterTableTemplate {
    table: RosterTableView,
}

/// Render the roster table fragment for one widget request.
///
/// The organization roster never carries channel data, so that column is
/// dropped from the selection before headers are built.
pub fn render_roster_table(
    mode: Mode,
    fields: FieldFlags,
    rows: &[RosterRow],
) -> Result<String, RenderError> {
    let selection = match mode {
        Mode::Online => fields,
        Mode::Organization => fields.difference(FieldFlags::CHANNEL_NAME),
    };
    let columns: Vec<Field> = selection.columns().collect();

    let table = RosterTableView {
        mode_class: mode.as_str(),
        headers: columns.iter().map(|field| field.label()).collect(),
        rows: rows
            .iter()
            .enumerate()
            .map(|(index, row)| RosterRowView {
                css_class: if index % 2 == 0 { "odd" } else { "even" },
                cells: columns.iter().map(|field| cell_text(*field, row)).collect(),
            })
            .collect(),
    };

    RosterTableTemplate { table }
        .render()
        .map_err(|error| RenderError { error })
}

fn cell_text(field: Field, row: &RosterRow) -> String {
    match field {
        Field::Name => row.name.clone(),
        Field::Country => row.country.clone(),
        Field::IdleTime => format_duration(row.idle_time),
        Field::Ingame => if row.ingame { "Yes" } else { "No" }.to_string(),
        Field::ChannelName => row.channel_name.clone().unwrap_or_default(),
    }
}
