//! Ingress: `POST /code` accepts a segment and queues it, nothing more.

use std::future::Future;

use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use hamlink_core::Segment;
use tokio::net::TcpListener;

use crate::dispatch::{DispatchError, DispatchHandle};
use crate::wire::CodeRequest;

#[derive(Clone)]
pub struct IngressState {
    dispatcher: DispatchHandle,
}

impl IngressState {
    pub fn new(dispatcher: DispatchHandle) -> Self {
        Self { dispatcher }
    }
}

/// Reasons a segment is refused at the door
#[derive(Debug, thiserror::Error)]
pub enum IngressError {
    #[error("Can't read request body: {0}")]
    Validation(String),
    #[error("Can't accept segment: {0}")]
    Unavailable(#[from] DispatchError),
}

impl IntoResponse for IngressError {
    fn into_response(self) -> Response {
        let status = match &self {
            IngressError::Validation(_) => StatusCode::BAD_REQUEST,
            IngressError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        (status, self.to_string()).into_response()
    }
}

pub fn router(state: IngressState, body_limit: usize) -> Router {
    Router::new()
        .route(
            "/code",
            post(handle_code).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/health", get(handle_health))
        .with_state(state)
}

/// Serve until `shutdown` resolves.
pub async fn serve<S>(listener: TcpListener, app: Router, shutdown: S) -> anyhow::Result<()>
where
    S: Future<Output = ()> + Send + 'static,
{
    tracing::info!(addr = %listener.local_addr()?, "ingress listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

pub async fn handle_code(
    State(state): State<IngressState>,
    body: Result<Json<CodeRequest>, JsonRejection>,
) -> Result<StatusCode, IngressError> {
    let Json(req) = body.map_err(|e| {
        tracing::info!(error = %e, "rejected malformed segment");
        IngressError::Validation(e.body_text())
    })?;

    let segment = validate(req)?;
    let (sender, seg_num, len) = (
        segment.meta.sender.clone(),
        segment.meta.seg_num,
        segment.payload.len(),
    );

    state.dispatcher.dispatch(segment).map_err(|e| {
        tracing::warn!(%sender, seg_num, error = %e, "segment not accepted");
        IngressError::from(e)
    })?;

    tracing::debug!(%sender, seg_num, bytes = len, "segment accepted");
    Ok(StatusCode::OK)
}

pub async fn handle_health() -> StatusCode {
    StatusCode::OK
}

fn validate(req: CodeRequest) -> Result<Segment, IngressError> {
    if req.meta.sender.trim().is_empty() {
        return Err(IngressError::Validation("sender must not be empty".into()));
    }
    Ok(Segment::from(req))
}
