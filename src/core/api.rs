//! HTTP + WebSocket API for CompanionMind
//!
//! Endpoints:
//! - GET /                          - Service status (default subject)
//! - GET /health                    - Health check
//! - GET /stats                     - Dashboard for the default subject
//! - POST /subjects                 - Register subject
//! - DELETE /subjects/{id}          - Remove subject
//! - GET /subjects/{id}/stats       - Dashboard for a subject
//! - POST /subjects/{id}/utterance  - Send an utterance, get reply + metadata
//! - POST /subjects/{id}/sensors    - Push one sensor event
//! - WS /ws/client                  - Device stream for the default subject
//! - WS /ws/{id}                    - Device stream for a subject
//! - WS /ws/{id}/updates            - Live risk updates

use axum::{
    extract::{Path, State, WebSocketUpgrade, ws::{Message, WebSocket}},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{delete, get, post},
    Router,
};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::broadcast;
use tower_http::cors::CorsLayer;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::core::{CompanionService, ReplyGenerator, DEFAULT_SUBJECT};
use crate::error::{Error, Result};
use crate::types::{
    CombinedRisk, DashboardStats, InboundMessage, RiskUpdate, SensorEvent, ServerMessage,
    ServiceStatus,
};

/// App state
pub type AppState = Arc<CompanionService>;

/// Register subject request
#[derive(Debug, Default, Deserialize)]
pub struct NewSubjectRequest {
    pub id: Option<String>,
}

/// Register subject response
#[derive(Debug, Serialize, Deserialize)]
pub struct NewSubjectResponse {
    pub subject_id: String,
    pub websocket_url: String,
    pub updates_url: String,
}

/// Health response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub subjects_active: usize,
}

/// Utterance request
#[derive(Debug, Deserialize)]
pub struct UtteranceRequest {
    pub content: String,
}

/// Sensor push response
#[derive(Debug, Serialize, Deserialize)]
pub struct SensorResponse {
    pub subject_id: String,
    pub kind: String,
    pub acknowledgement: Option<ServerMessage>,
    pub combined_risk: CombinedRisk,
}

/// Create the API router
pub fn create_router(service: AppState) -> Router {
    Router::new()
        .route("/", get(status))
        .route("/health", get(health))
        .route("/stats", get(default_stats))
        .route("/subjects", post(create_subject))
        .route("/subjects/:id", delete(delete_subject))
        .route("/subjects/:id/stats", get(subject_stats))
        .route("/subjects/:id/utterance", post(post_utterance))
        .route("/subjects/:id/sensors", post(post_sensor))
        .route("/ws/client", get(default_websocket_handler))
        .route("/ws/:id", get(websocket_handler))
        .route("/ws/:id/updates", get(updates_handler))
        .layer(CorsLayer::permissive())
        .with_state(service)
}

/// Map a boundary error onto an HTTP status
fn status_for(err: &Error) -> StatusCode {
    match err {
        Error::SubjectNotFound(_) => StatusCode::NOT_FOUND,
        Error::SubjectExists(_) | Error::SubjectPinned(_) => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn reject(err: Error) -> StatusCode {
    debug!(error = %err, "Request rejected");
    status_for(&err)
}

/// Service status endpoint
async fn status(State(service): State<AppState>) -> std::result::Result<Json<ServiceStatus>, StatusCode> {
    let handle = service.registry().get(DEFAULT_SUBJECT).await.map_err(reject)?;
    let subject = handle.lock().await;
    Ok(Json(subject.status(service.model())))
}

/// Health check endpoint
async fn health(State(service): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        subjects_active: service.registry().len().await,
    })
}

async fn default_stats(State(service): State<AppState>) -> std::result::Result<Json<DashboardStats>, StatusCode> {
    dashboard_for(&service, DEFAULT_SUBJECT).await
}

async fn subject_stats(
    State(service): State<AppState>,
    Path(id): Path<String>,
) -> std::result::Result<Json<DashboardStats>, StatusCode> {
    dashboard_for(&service, &id).await
}

async fn dashboard_for(service: &CompanionService, id: &str) -> std::result::Result<Json<DashboardStats>, StatusCode> {
    let handle = service.registry().get(id).await.map_err(reject)?;
    let subject = handle.lock().await;
    Ok(Json(subject.dashboard()))
}

/// Register a subject
async fn create_subject(
    State(service): State<AppState>,
    Json(req): Json<NewSubjectRequest>,
) -> std::result::Result<(StatusCode, Json<NewSubjectResponse>), StatusCode> {
    let subject_id = service.registry().register(req.id).await.map_err(reject)?;

    Ok((
        StatusCode::CREATED,
        Json(NewSubjectResponse {
            websocket_url: format!("/ws/{}", subject_id),
            updates_url: format!("/ws/{}/updates", subject_id),
            subject_id,
        }),
    ))
}

/// Remove a subject
async fn delete_subject(
    State(service): State<AppState>,
    Path(id): Path<String>,
) -> std::result::Result<StatusCode, StatusCode> {
    service.registry().remove(&id).await.map_err(reject)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Send one utterance; blank content is a bad request
async fn post_utterance(
    State(service): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UtteranceRequest>,
) -> std::result::Result<Json<ServerMessage>, StatusCode> {
    let reply = service
        .handle_utterance(&id, &req.content)
        .await
        .map_err(reject)?;
    reply.map(Json).ok_or(StatusCode::BAD_REQUEST)
}

/// Push one sensor event; the body is a tagged device payload
async fn post_sensor(
    State(service): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> std::result::Result<Json<SensorResponse>, StatusCode> {
    let kind = body.get("type").and_then(Value::as_str).unwrap_or_default();
    let event = SensorEvent::from_tagged(kind, &body).ok_or(StatusCode::BAD_REQUEST)?;

    let outcome = service.handle_sensor(&id, &event).await.map_err(reject)?;

    Ok(Json(SensorResponse {
        subject_id: id,
        kind: event.kind().to_string(),
        acknowledgement: outcome.acknowledgement,
        combined_risk: outcome.combined_risk,
    }))
}

// =============================================================================
// WEBSOCKETS
// =============================================================================

async fn default_websocket_handler(
    State(service): State<AppState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_device_socket(socket, service, DEFAULT_SUBJECT.to_string()))
}

/// Device stream for a subject
async fn websocket_handler(
    State(service): State<AppState>,
    Path(id): Path<String>,
    ws: WebSocketUpgrade,
) -> std::result::Result<impl IntoResponse, StatusCode> {
    service.registry().get(&id).await.map_err(reject)?;
    Ok(ws.on_upgrade(move |socket| handle_device_socket(socket, service, id)))
}

/// Live risk updates for a subject
async fn updates_handler(
    State(service): State<AppState>,
    Path(id): Path<String>,
    ws: WebSocketUpgrade,
) -> std::result::Result<impl IntoResponse, StatusCode> {
    let handle = service.registry().get(&id).await.map_err(reject)?;
    let rx = handle.lock().await.subscribe();
    Ok(ws.on_upgrade(move |socket| handle_updates_socket(socket, rx)))
}

/// Handle a device connection: one inbound frame at a time, in order
async fn handle_device_socket(mut socket: WebSocket, service: AppState, id: String) {
    info!(subject = %id, "Client connected");

    while let Some(Ok(msg)) = socket.recv().await {
        let text = match msg {
            Message::Text(text) => text,
            Message::Close(_) => break,
            _ => continue,
        };

        let reply = match handle_frame(&service, &id, &text).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(subject = %id, error = %e, "Closing connection");
                break;
            }
        };

        if let Some(json) = reply {
            if socket.send(Message::Text(json)).await.is_err() {
                break;
            }
        }
    }

    info!(subject = %id, "Client disconnected");
}

/// Process one device text frame and return the encoded reply, if any.
/// Malformed JSON is skipped; an error means the connection should close.
pub async fn handle_frame(service: &CompanionService, id: &str, text: &str) -> Result<Option<String>> {
    let data: Value = match serde_json::from_str(text) {
        Ok(data) => data,
        Err(e) => {
            warn!(subject = %id, error = %e, "Malformed frame skipped");
            return Ok(None);
        }
    };

    match service.handle_inbound(id, InboundMessage::from_json(&data)).await? {
        Some(reply) => Ok(Some(serde_json::to_string(&reply)?)),
        None => Ok(None),
    }
}

/// Forward broadcast risk updates until either side goes away
async fn handle_updates_socket(socket: WebSocket, mut rx: broadcast::Receiver<RiskUpdate>) {
    let (mut sender, mut receiver) = socket.split();

    loop {
        tokio::select! {
            update = rx.recv() => match update {
                Ok(update) => {
                    let json = serde_json::to_string(&update).unwrap_or_default();
                    if sender.send(Message::Text(json)).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!(skipped, "Update subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            incoming = receiver.next() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }
}

/// Run the API server
pub async fn run_server(config: &Config, reply: Arc<dyn ReplyGenerator>) -> Result<()> {
    let service = Arc::new(CompanionService::new(reply, &config.reply));
    let router = create_router(service);
    let addr = config.server.addr.as_str();
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(addr = %addr, model = %config.reply.model, "{} v{} running", crate::SERVICE_NAME, crate::VERSION);
    info!("  GET    /                        - Status");
    info!("  GET    /health                  - Health check");
    info!("  GET    /stats                   - Default dashboard");
    info!("  POST   /subjects                - Register subject");
    info!("  DELETE /subjects/:id            - Remove subject");
    info!("  GET    /subjects/:id/stats      - Dashboard");
    info!("  POST   /subjects/:id/utterance  - Send utterance");
    info!("  POST   /subjects/:id/sensors    - Push sensor event");
    info!("  WS     /ws/client               - Default device stream");
    info!("  WS     /ws/:id                  - Device stream");
    info!("  WS     /ws/:id/updates          - Live risk updates");

    axum::serve(listener, router).await?;
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
