//! # Handlers HTTP — A API do Chatbot
//!
//! Cada função pública é um handler Axum, mapeado a uma rota em
//! [`super::create_router()`]. Todas as respostas são JSON com envelope
//! `{ "success": bool, ... }`, no formato que o widget da loja consome.
//!
//! | Handler | Método | Uso |
//! |---------|--------|-----|
//! | `message` | POST | Processa mensagem e responde |
//! | `feedback` | POST | Registra feedback best-effort |
//! | `analytics` | GET | Sumário agregado |
//! | `stats` | GET | Sumário + status do serviço |
//! | `health` | GET | Liveness |
//! | `sse_events` | GET | Stream de eventos do motor |

use std::convert::Infallible;
use std::time::{Duration, Instant};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::sse::{Event as SseEvent, KeepAlive, Sse};
use axum::Json;
use chrono::Utc;
use futures_util::stream::StreamExt;
use serde::{Deserialize, Serialize};
use tokio_stream::wrappers::BroadcastStream;

use super::state::AppState;
use crate::analytics::AnalyticsSummary;
use crate::engine::HandledMessage;
use crate::nlu::taxonomy::Intent;
use crate::web::events::EngineEvent;

/// Corpo de `POST /api/chatbot/message`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRequest {
    /// Texto digitado pelo usuário.
    pub message: String,
    /// Chave opaca da sessão do widget.
    pub session_id: String,
    /// Usuário autenticado, se houver.
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Resposta de `POST /api/chatbot/message`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    /// Sempre `true` em sucesso.
    pub success: bool,
    /// Texto da resposta.
    pub response: String,
    /// Confiança reportada.
    pub confidence: f64,
    /// Intenção classificada.
    pub intent: Intent,
    /// Ações de follow-up para o widget.
    pub suggested_actions: Vec<String>,
    /// Origem da resposta.
    pub source: &'static str,
    /// Entrada de conhecimento usada, se houve hit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub knowledge_id: Option<String>,
}

/// Envelope de erro da API.
#[derive(Serialize)]
pub struct ErrorResponse {
    /// Sempre `false`.
    pub success: bool,
    /// Mensagem legível para o cliente.
    pub message: String,
}

fn bad_request(message: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            success: false,
            message: message.to_string(),
        }),
    )
}

/// POST `/api/chatbot/message` — processa uma mensagem do widget.
///
/// Valida a borda (mensagem e sessionId obrigatórios), delega ao motor e
/// emite um [`EngineEvent::MessageHandled`] no canal SSE.
pub async fn message(
    State(state): State<AppState>,
    Json(req): Json<MessageRequest>,
) -> Result<Json<MessageResponse>, (StatusCode, Json<ErrorResponse>)> {
    if req.message.trim().is_empty() || req.session_id.trim().is_empty() {
        return Err(bad_request("Message and sessionId are required"));
    }

    let t0 = Instant::now();
    let handled: HandledMessage = state
        .engine
        .handle_message(&req.session_id, req.user_id.as_deref(), &req.message)
        .map_err(|e| bad_request(&e.to_string()))?;
    let elapsed_ms = t0.elapsed().as_millis() as u64;

    // Evento para dashboards — receptores lentos apenas perdem eventos
    let _ = state.events_tx.send(EngineEvent::MessageHandled {
        session_id: req.session_id.clone(),
        intent: handled.intent,
        confidence: handled.confidence,
        source: handled.source.to_string(),
        knowledge_id: handled.knowledge_id.clone(),
        elapsed_ms,
    });

    Ok(Json(MessageResponse {
        success: true,
        response: handled.answer,
        confidence: handled.confidence,
        intent: handled.intent,
        suggested_actions: handled.suggested_actions,
        source: handled.source,
        knowledge_id: handled.knowledge_id,
    }))
}

/// Corpo de `POST /api/chatbot/feedback`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    /// Entrada de conhecimento avaliada.
    pub knowledge_id: String,
    /// A resposta ajudou?
    pub helpful: bool,
    /// Nota opcional 1–5.
    #[serde(default)]
    pub rating: Option<u8>,
    /// Comentário livre opcional.
    #[serde(default)]
    pub comment: Option<String>,
}

/// Resposta de `POST /api/chatbot/feedback`.
#[derive(Serialize)]
pub struct FeedbackResponse {
    /// Requisição bem formada e processada.
    pub success: bool,
    /// `false` quando o knowledgeId não existe (no-op best-effort).
    pub accepted: bool,
    /// Mensagem legível.
    pub message: &'static str,
}

/// POST `/api/chatbot/feedback` — registra feedback best-effort.
///
/// Id desconhecido não é erro HTTP: a resposta sai 200 com
/// `accepted: false`, preservando a semântica de aceitação-falha no-op.
pub async fn feedback(
    State(state): State<AppState>,
    Json(req): Json<FeedbackRequest>,
) -> Json<FeedbackResponse> {
    let accepted =
        state
            .engine
            .record_feedback(&req.knowledge_id, req.helpful, req.rating, req.comment);

    let _ = state.events_tx.send(EngineEvent::FeedbackReceived {
        knowledge_id: req.knowledge_id,
        helpful: req.helpful,
        accepted,
    });

    Json(FeedbackResponse {
        success: true,
        accepted,
        message: if accepted {
            "Feedback recorded successfully"
        } else {
            "Unknown knowledgeId — feedback ignored"
        },
    })
}

/// Resposta de `GET /api/chatbot/analytics`.
#[derive(Serialize)]
pub struct AnalyticsResponse {
    /// Sempre `true`.
    pub success: bool,
    /// Sumário agregado sob demanda.
    pub analytics: AnalyticsSummary,
}

/// GET `/api/chatbot/analytics` — sumário agregado.
pub async fn analytics(State(state): State<AppState>) -> Json<AnalyticsResponse> {
    Json(AnalyticsResponse {
        success: true,
        analytics: state.engine.analytics(),
    })
}

/// Resposta de `GET /api/chatbot/stats`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    /// Sempre `true`.
    pub success: bool,
    /// Sumário agregado.
    pub analytics: AnalyticsSummary,
    /// Status do serviço — "active" quando o processo responde.
    pub service_status: &'static str,
}

/// GET `/api/chatbot/stats` — sumário + status do serviço.
pub async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        success: true,
        analytics: state.engine.analytics(),
        service_status: "active",
    })
}

/// Resposta de `GET /api/chatbot/health`.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Sempre `true`.
    pub success: bool,
    /// Mensagem de liveness.
    pub message: &'static str,
    /// Timestamp ISO-8601 da resposta.
    pub timestamp: String,
}

/// GET `/api/chatbot/health` — liveness simples.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        message: "Chatbot service is running",
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// GET `/api/chatbot/events` — stream SSE de eventos do motor.
///
/// Cria um subscriber no canal broadcast e serializa cada
/// [`EngineEvent`] como JSON. Keep-alive a cada 15s para atravessar
/// proxies que fecham conexões idle; receptores atrasados perdem
/// eventos silenciosamente (filter_map retorna `None`).
pub async fn sse_events(
    State(state): State<AppState>,
) -> Sse<impl futures_util::Stream<Item = Result<SseEvent, Infallible>>> {
    let rx = state.events_tx.subscribe();
    let stream = BroadcastStream::new(rx).filter_map(|result| async move {
        match result {
            Ok(event) => {
                let data = serde_json::to_string(&event).ok()?;
                Some(Ok(SseEvent::default().data(data)))
            }
            Err(_) => None, // mensagens atrasadas são descartadas
        }
    });
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}
