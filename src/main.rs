#![allow(dead_code)]
//! # Suporte Chat — Motor de Atendimento da Loja
//!
//! **Ponto de entrada principal** do motor de conversas de suporte que
//! atende o widget de chat da loja.
//!
//! ## Fluxo de Inicialização
//!
//! ```text
//! main()
//!   ├── Configura tracing/logging (RUST_LOG, default info)
//!   ├── Carrega o corpus de conhecimento (data/knowledge.json ou seed)
//!   ├── Cria o SessionStore limitado (eviction LRU)
//!   ├── Cria broadcast channel para SSE
//!   ├── Monta ChatEngine + AppState + Router
//!   └── Inicia servidor TCP (porta 3000)
//! ```
//!
//! Não há fase de background: o pipeline é scoring determinístico de
//! keywords, pronto no instante do boot.
//!
//! ## Exemplo de Uso
//!
//! ```bash
//! # Executar com logs padrão (info)
//! cargo run
//!
//! # Executar com logs detalhados
//! RUST_LOG=debug cargo run
//!
//! # Testar uma mensagem
//! curl -s localhost:3000/api/chatbot/message \
//!   -H 'content-type: application/json' \
//!   -d '{"message":"How can I return a product?","sessionId":"abc"}'
//! ```

/// Módulo `analytics` — sumário agregado de conversas e conhecimento.
mod analytics;

/// Módulo `core` — tipos fundamentais: KnowledgeBase, sessões, stores.
mod core;

/// Módulo `engine` — o pipeline classify → retrieve-or-compose → append.
mod engine;

/// Módulo `nlu` — taxonomia declarativa e classificador de intenção.
mod nlu;

/// Módulo `persistence` — carregamento do corpus de conhecimento.
mod persistence;

/// Módulo `responder` — respostas de fallback modeladas por intenção.
mod responder;

/// Módulo `retrieval` — busca em camadas na base de conhecimento.
mod retrieval;

/// Módulo `web` — servidor axum, handlers JSON e SSE.
mod web;

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;

use crate::core::session::DEFAULT_MAX_SESSIONS;
use crate::core::SessionStore;
use crate::engine::ChatEngine;
use crate::nlu::Taxonomy;
use crate::web::events::EngineEvent;
use crate::web::state::AppState;

/// Função principal do motor de atendimento.
///
/// # Erros
///
/// Retorna erro se o corpus em disco estiver corrompido, se não conseguir
/// fazer bind na porta 3000, ou se o servidor axum falhar.
#[tokio::main]
async fn main() -> Result<()> {
    // Aceita a variável de ambiente RUST_LOG para configurar o nível.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("💬 Suporte Chat — Starting...");

    // Corpus de conhecimento: arquivo em disco, senão seed embutido.
    let kb = Arc::new(persistence::load_knowledge()?);
    tracing::info!(entries = kb.len(), "Corpus de conhecimento pronto");

    // Store de sessões limitado — eviction LRU quando lota.
    let sessions = Arc::new(SessionStore::new(DEFAULT_MAX_SESSIONS));

    // Canal broadcast para eventos SSE (dashboards de operação).
    // Capacidade de 256 eventos — receptores lentos perdem os antigos.
    let (events_tx, _) = broadcast::channel::<EngineEvent>(256);

    let engine = Arc::new(ChatEngine::new(kb, sessions, Taxonomy::default()));

    let state = AppState {
        engine,
        events_tx: Arc::new(events_tx),
    };
    let app = web::create_router(state);

    let addr = "0.0.0.0:3000";
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("🚀 Server running at http://localhost:3000");

    axum::serve(listener, app).await?;

    Ok(())
}
