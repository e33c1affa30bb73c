//! # Estado da Aplicação Web
//!
//! Estado compartilhado entre todos os handlers Axum. Diferente de um
//! sistema com modelo ML, aqui não há fase de carregamento em background —
//! o motor fica pronto no boot, antes do bind do servidor.

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::engine::ChatEngine;
use crate::web::events::EngineEvent;

/// Estado compartilhado da aplicação Axum.
#[derive(Clone)]
pub struct AppState {
    /// Motor de atendimento — imutável, thread-safe.
    pub engine: Arc<ChatEngine>,
    /// Canal broadcast para eventos SSE do motor.
    pub events_tx: Arc<broadcast::Sender<EngineEvent>>,
}
