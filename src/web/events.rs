//! # Eventos SSE do Motor de Atendimento
//!
//! Define o enum [`EngineEvent`] — eventos emitidos a cada operação do
//! motor, enviados em tempo real a dashboards de operação via
//! Server-Sent Events.
//!
//! ## Serialização
//!
//! Usa `#[serde(tag = "type")]` para produzir JSON com discriminador:
//!
//! ```json
//! { "type": "MessageHandled", "intent": "shipping", "source": "knowledge_base" }
//! ```

use serde::Serialize;

use crate::nlu::taxonomy::Intent;

/// Evento emitido pelo transporte após cada operação do motor.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type")]
pub enum EngineEvent {
    /// Uma troca de mensagens foi processada.
    MessageHandled {
        /// Sessão da troca.
        session_id: String,
        /// Intenção classificada.
        intent: Intent,
        /// Confiança reportada ao widget.
        confidence: f64,
        /// Origem da resposta ("knowledge_base" ou "fallback").
        source: String,
        /// Entrada de conhecimento usada, se houve hit.
        knowledge_id: Option<String>,
        /// Tempo de processamento (ms).
        elapsed_ms: u64,
    },

    /// Feedback recebido para uma resposta anterior.
    FeedbackReceived {
        /// Entrada de conhecimento avaliada.
        knowledge_id: String,
        /// A resposta ajudou?
        helpful: bool,
        /// `false` quando o id era desconhecido (no-op).
        accepted: bool,
    },
}
