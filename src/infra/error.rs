use thiserror::Error;

/// Startup wiring failures. Request-time trouble (upstream, cache) never
/// lands here; those paths degrade instead of failing.
#[derive(Debug, Error)]
pub enum InfraError {
    #[error("failed to bind public listener: {0}")]
    Bind(#[source] std::io::Error),
    #[error("telemetry initialization failed: {0}")]
    Telemetry(String),
    #[error("configuration error: {message}")]
    Configuration { message: String },
}

impl InfraError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn telemetry(message: impl Into<String>) -> Self {
        Self::Telemetry(message.into())
    }
}
