use std::{process, sync::Arc};

use presenza::{
    application::{error::AppError, widget::WidgetService},
    config,
    infra::{
        cache::FileCache,
        error::InfraError,
        http::{WidgetState, build_router},
        telemetry,
        upstream::RosterClient,
    },
};
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let upstream_url = settings
        .upstream
        .url
        .clone()
        .ok_or_else(|| InfraError::configuration("upstream url is not configured"))?;

    let client = RosterClient::new(upstream_url, settings.upstream.timeout)
        .map_err(|err| AppError::unexpected(format!("failed to build roster client: {err}")))?;

    let cache = build_cache(&settings.cache);
    let widget = Arc::new(WidgetService::new(client, cache));
    let router = build_router(WidgetState { widget });

    let listener = tokio::net::TcpListener::bind(settings.server.public_addr)
        .await
        .map_err(InfraError::Bind)?;

    info!(
        target = "presenza::serve",
        addr = %settings.server.public_addr,
        "serving widget endpoint"
    );

    axum::serve(listener, router.into_make_service())
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    Ok(())
}

/// Open the response cache, degrading to cache-less operation when the store
/// is disabled or unavailable.
fn build_cache(settings: &presenza::config::CacheSettings) -> Option<Arc<FileCache>> {
    if !settings.enabled {
        info!(target = "presenza::serve", "response cache disabled by configuration");
        return None;
    }

    match FileCache::open(settings.directory.clone(), settings.timeout) {
        Ok(cache) => Some(Arc::new(cache)),
        Err(err) => {
            warn!(
                target = "presenza::serve",
                directory = %settings.directory.display(),
                error = %err,
                "response cache unavailable; continuing without caching"
            );
            None
        }
    }
}
