//! # Módulo Web — O Transporte do Motor de Atendimento
//!
//! Camada HTTP construída com **Axum** + **SSE**, servindo a API JSON que
//! o widget de chat da loja consome.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ Widget de chat (outra origem → CORS permissivo)          │
//! ├──────────────────────────────────────────────────────────┤
//! │ Axum Router (este módulo)                                │
//! │  ├── POST /api/chatbot/message   → processar mensagem    │
//! │  ├── POST /api/chatbot/feedback  → feedback best-effort  │
//! │  ├── GET  /api/chatbot/analytics → sumário agregado      │
//! │  ├── GET  /api/chatbot/stats     → sumário + status      │
//! │  ├── GET  /api/chatbot/health    → liveness              │
//! │  └── GET  /api/chatbot/events    → SSE (dashboards)      │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! | Módulo | Responsabilidade |
//! |--------|------------------|
//! | [`state`] | Estado compartilhado (`AppState`) |
//! | [`events`] | Enum de eventos SSE do motor |
//! | [`handlers`] | Handlers Axum para cada rota |

pub mod events;
pub mod handlers;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use state::AppState;

/// Cria o router Axum com todas as rotas da API.
///
/// CORS permissivo: o widget é embarcado nas páginas da loja em outra
/// origem, e a API não usa cookies/credenciais.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/chatbot/message", post(handlers::message))
        .route("/api/chatbot/feedback", post(handlers::feedback))
        .route("/api/chatbot/analytics", get(handlers::analytics))
        .route("/api/chatbot/stats", get(handlers::stats))
        .route("/api/chatbot/health", get(handlers::health))
        .route("/api/chatbot/events", get(handlers::sse_events))
        .layer(cors)
        .with_state(state)
}
