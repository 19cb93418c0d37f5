use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;

use crate::application::widget::{WidgetPayload, WidgetService};
use crate::domain::fields::FieldFlags;
use crate::domain::roster::{Dimension, RosterQuery};

#[derive(Clone)]
pub struct WidgetState {
    pub widget: Arc<WidgetService>,
}

pub fn build_router(state: WidgetState) -> Router {
    Router::new()
        .route("/request", get(widget_request))
        .route("/_health", get(health))
        .route("/static/public/{*path}", get(crate::infra::assets::serve_public))
        .with_state(state)
}

/// Raw inbound widget query.
///
/// Every parameter is optional text; integers are parsed permissively so that
/// garbage input degrades to a harmless selection instead of failing the
/// request. This endpoint is public and unauthenticated and must never
/// answer a render request with an error status.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WidgetQueryParams {
    mode: Option<String>,
    dim: Option<String>,
    org: Option<String>,
    fields: Option<String>,
}

impl WidgetQueryParams {
    fn to_query(&self) -> RosterQuery {
        RosterQuery {
            mode: parse_or_zero(self.mode.as_deref()),
            dimension: Dimension::from_code(parse_or_zero(self.dim.as_deref())),
            organization: parse_or_zero(self.org.as_deref()),
            fields: FieldFlags::from_mask(
                u32::try_from(parse_or_zero(self.fields.as_deref())).unwrap_or(0),
            ),
        }
    }
}

fn parse_or_zero(value: Option<&str>) -> i64 {
    value
        .and_then(|raw| raw.trim().parse::<i64>().ok())
        .unwrap_or(0)
}

async fn widget_request(
    State(state): State<WidgetState>,
    Query(params): Query<WidgetQueryParams>,
) -> Json<WidgetPayload> {
    Json(state.widget.handle(params.to_query()).await)
}

async fn health() -> StatusCode {
    StatusCode::NO_CONTENT
}
