//! # Módulo Core — Tipos Fundamentais do Domínio
//!
//! Agrupa os tipos que formam a base do motor de atendimento:
//!
//! - [`KnowledgeEntry`] / [`KnowledgeBase`] — corpus curado de pergunta/resposta
//! - [`Message`] / [`ConversationSession`] — histórico de uma conversa do widget
//! - [`SessionStore`] — todas as sessões do processo, com eviction LRU
//!
//! Ambos os stores são singletons de vida de processo, construídos uma vez
//! no boot e injetados por referência (`Arc`) no motor — sem globais.

/// Sub-módulo do corpus de conhecimento curado.
pub mod knowledge;

/// Sub-módulo das sessões de conversa e seu store.
pub mod session;

// Re-exports para conveniência.
pub use knowledge::{KnowledgeBase, KnowledgeEntry};
pub use session::{ConversationSession, Message, MessageRole, SessionStore};
