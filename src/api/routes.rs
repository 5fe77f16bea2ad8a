//! HTTP route handlers.

use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::generate::{self, GenerateError};
use crate::llm::{CompletionClient, HfClient};

use super::types::*;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    /// The completion client, present only when credentials are configured.
    /// `None` makes the misconfiguration impossible to miss: there is no
    /// client to call, so no upstream request can ever be made.
    pub client: Option<Arc<dyn CompletionClient>>,
}

/// Start the HTTP server.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let client = match config.credentials() {
        Some((model, token)) => {
            let hf: Arc<dyn CompletionClient> =
                Arc::new(HfClient::new(model, token, config.upstream_timeout)?);
            Some(hf)
        }
        None => None,
    };

    let state = Arc::new(AppState {
        config: config.clone(),
        client,
    });

    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Build the router. Separate from [`serve`] so tests can drive it directly.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/generate-items", post(generate_items))
        // The web front-end calls from another origin
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Wait for SIGTERM/SIGINT.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Health check endpoint.
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model_configured: state.client.is_some(),
    })
}

/// Decompose a task into subtasks.
///
/// All pipeline failures come back as an error envelope; configuration and
/// upstream failures map to 5xx since they are server-side, never the
/// caller's fault.
async fn generate_items(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GenerateItemsRequest>,
) -> (StatusCode, Json<ResponseEnvelope>) {
    let title = request.title.trim();
    if title.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ResponseEnvelope::error("title must not be empty")),
        );
    }

    let Some(client) = state.client.as_deref() else {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ResponseEnvelope::error(
                GenerateError::NotConfigured.to_string(),
            )),
        );
    };

    match generate::generate_items(client, title).await {
        Ok(generated) => (
            StatusCode::OK,
            Json(ResponseEnvelope::success(
                "Task items successfully generated",
                generated.items,
            )),
        ),
        Err(error) => {
            tracing::error!("Generation failed for title {:?}: {}", title, error);
            (
                StatusCode::BAD_GATEWAY,
                Json(ResponseEnvelope::error(error.to_string())),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{ChatMessage, GenerationOptions, LlmError};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Stub client answering with a fixed completion.
    struct StubClient {
        calls: Arc<AtomicU32>,
        response: Result<&'static str, u16>,
    }

    #[async_trait]
    impl CompletionClient for StubClient {
        async fn complete(
            &self,
            _messages: &[ChatMessage],
            _options: GenerationOptions,
        ) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.response {
                Ok(text) => Ok(text.to_string()),
                Err(status) => Err(LlmError::server_error(status, "boom".to_string())),
            }
        }
    }

    fn state_with_stub(response: Result<&'static str, u16>) -> (Arc<AppState>, Arc<AtomicU32>) {
        let calls = Arc::new(AtomicU32::new(0));
        let stub: Arc<dyn CompletionClient> = Arc::new(StubClient {
            calls: Arc::clone(&calls),
            response,
        });
        let state = Arc::new(AppState {
            config: Config::new(
                Some("org/model".to_string()),
                Some("hf_test".to_string()),
            ),
            client: Some(stub),
        });
        (state, calls)
    }

    #[tokio::test]
    async fn end_to_end_success() {
        let (state, _) = state_with_stub(Ok("['Paso uno', 'Paso dos']"));
        let (status, Json(envelope)) = generate_items(
            State(state),
            Json(GenerateItemsRequest {
                title: "Aprender inglés".to_string(),
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(envelope.status, ResponseStatus::Success);
        assert_eq!(
            envelope.data,
            Some(vec![
                SubtaskItem { content: "Paso uno".to_string() },
                SubtaskItem { content: "Paso dos".to_string() },
            ])
        );
    }

    #[tokio::test]
    async fn missing_credentials_short_circuit() {
        let state = Arc::new(AppState {
            config: Config::new(None, None),
            client: None,
        });

        let (status, Json(envelope)) = generate_items(
            State(state),
            Json(GenerateItemsRequest {
                title: "Aprender inglés".to_string(),
            }),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(envelope.status, ResponseStatus::Error);
        assert_eq!(
            envelope.message,
            "Hugging Face credentials are not configured"
        );
        assert!(envelope.data.is_none());
    }

    #[tokio::test]
    async fn upstream_failure_maps_to_bad_gateway() {
        let (state, calls) = state_with_stub(Err(503));
        let (status, Json(envelope)) = generate_items(
            State(state),
            Json(GenerateItemsRequest {
                title: "Aprender inglés".to_string(),
            }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(envelope.status, ResponseStatus::Error);
        assert!(envelope.message.starts_with("Error after 3 attempts."));
        assert!(envelope.data.is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn empty_title_is_rejected_without_upstream_call() {
        let (state, calls) = state_with_stub(Ok("['Paso uno']"));
        let (status, Json(envelope)) = generate_items(
            State(state),
            Json(GenerateItemsRequest {
                title: "   ".to_string(),
            }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(envelope.status, ResponseStatus::Error);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn health_reports_configuration_without_echoing_it() {
        let (state, _) = state_with_stub(Ok("[]"));
        let Json(health) = health(State(state)).await;
        assert_eq!(health.status, "ok");
        assert!(health.model_configured);
    }
}
