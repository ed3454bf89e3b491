//! A small HTTP service that turns an image and a prompt into a video.

use crate::client::ApiframeClient;
use crate::error::{ApiframeError, ErrorKind};
use crate::operation::Operation;
use crate::poller::PollConfig;
use crate::types::{VideoRequest, VideoResult};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared application state.
pub struct AppState {
    pub client: ApiframeClient,
    /// Poll budget applied to every request.
    pub poll: PollConfig,
}

impl AppState {
    pub fn new(client: ApiframeClient) -> Self {
        Self {
            client,
            poll: VideoRequest::default_config(),
        }
    }

    pub fn with_poll_config(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }
}

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
    kind: &'static str,
}

/// The HTTP status reported for each failure kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Timeout => StatusCode::REQUEST_TIMEOUT,
        ErrorKind::Submission => StatusCode::BAD_GATEWAY,
        ErrorKind::RetriesExhausted => StatusCode::GATEWAY_TIMEOUT,
        ErrorKind::MissingResult => StatusCode::FAILED_DEPENDENCY,
        ErrorKind::UnexpectedStatus => StatusCode::INTERNAL_SERVER_ERROR,
        // Not produced by the poll loop; the service itself is misconfigured or degraded.
        ErrorKind::Fetch | ErrorKind::Configuration | ErrorKind::Io => {
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

impl IntoResponse for ApiframeError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let body = ErrorBody {
            detail: self.to_string(),
            kind: kind.as_str(),
        };
        (status_for(kind), Json(body)).into_response()
    }
}

async fn generate_video(
    State(state): State<Arc<AppState>>,
    Json(request): Json<VideoRequest>,
) -> Result<Json<VideoResult>, ApiframeError> {
    match state.client.run(&request, &state.poll).await {
        Ok(done) => Ok(Json(done.output)),
        Err(e) => {
            tracing::error!(error = %e, "video generation failed");
            Err(e)
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/generate_video", post(generate_video))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves the router on `listener` until the process is stopped.
pub async fn serve(listener: tokio::net::TcpListener, state: Arc<AppState>) -> std::io::Result<()> {
    tracing::info!(addr = ?listener.local_addr().ok(), "video server listening");
    axum::serve(listener, router(state)).await
}
