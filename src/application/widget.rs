//! Widget request orchestration.
//!
//! One pipeline per inbound request: permissively-parsed selection, cache
//! lookup, remote fetch on miss, cache store, table render. Every failure
//! along the way degrades to an empty roster; the response envelope is
//! always well-formed and the endpoint never errors at the HTTP level.

use std::sync::Arc;

use metrics::counter;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::roster::{Mode, RosterQuery, RosterResult, RosterRow};
use crate::infra::cache::{CacheKey, FileCache};
use crate::infra::telemetry::METRIC_UPSTREAM_FAILED;
use crate::infra::upstream::RosterClient;
use crate::presentation::views::render_roster_table;

/// JSON envelope returned to the browser dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetPayload {
    pub html: String,
}

/// Coordinates one widget request against the roster client and the
/// response cache. A `None` cache means caching is disabled; the pipeline is
/// correct either way.
pub struct WidgetService {
    client: RosterClient,
    cache: Option<Arc<FileCache>>,
}

impl WidgetService {
    pub fn new(client: RosterClient, cache: Option<Arc<FileCache>>) -> Self {
        Self { client, cache }
    }

    /// Run the full pipeline for one inbound selection.
    pub async fn handle(&self, query: RosterQuery) -> WidgetPayload {
        let key = CacheKey::from_query(&query);

        let rows = match self.cached_rows(&key).await {
            Some(rows) => rows,
            None => self.fetch_and_store(&query, &key).await,
        };

        WidgetPayload {
            html: self.render(&query, &rows),
        }
    }

    async fn cached_rows(&self, key: &CacheKey) -> Option<RosterResult> {
        let cache = self.cache.as_ref()?;
        let payload = cache.get(key).await?;

        match serde_json::from_value(payload) {
            Ok(rows) => Some(rows),
            Err(err) => {
                debug!(
                    target: "presenza::widget",
                    key = key.as_str(),
                    error = %err,
                    "cached payload no longer decodes as roster rows; refetching"
                );
                let _ = cache.delete(key).await;
                None
            }
        }
    }

    async fn fetch_and_store(&self, query: &RosterQuery, key: &CacheKey) -> RosterResult {
        let rows = match self.client.fetch(query).await {
            Ok(rows) => rows,
            Err(err) => {
                counter!(METRIC_UPSTREAM_FAILED).increment(1);
                warn!(
                    target: "presenza::widget",
                    error = %err,
                    mode = query.mode,
                    "roster fetch failed; rendering empty result"
                );
                return RosterResult::new();
            }
        };

        if let Some(cache) = &self.cache {
            match serde_json::to_value(&rows) {
                Ok(payload) => {
                    if let Err(err) = cache.set(key, &payload).await {
                        debug!(
                            target: "presenza::widget",
                            key = key.as_str(),
                            error = %err,
                            "response cache write failed; continuing uncached"
                        );
                    }
                }
                Err(err) => {
                    debug!(
                        target: "presenza::widget",
                        error = %err,
                        "roster rows could not be encoded for the cache"
                    );
                }
            }
        }

        rows
    }

    fn render(&self, query: &RosterQuery, rows: &[RosterRow]) -> String {
        // Unknown mode codes take the organization path, which is also the
        // stricter column set.
        let mode = Mode::from_code(query.mode).unwrap_or(Mode::Organization);

        match render_roster_table(mode, query.fields, rows) {
            Ok(html) => html,
            Err(err) => {
                warn!(
                    target: "presenza::widget",
                    error = %err,
                    "table rendering failed; returning empty fragment"
                );
                String::new()
            }
        }
    }
}
