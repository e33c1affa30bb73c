//! # Sessões de Conversa — Histórico Append-Only
//!
//! Uma [`ConversationSession`] é o log ordenado de mensagens trocadas em
//! uma aba do widget de chat, identificada por um `sessionId` opaco
//! fornecido pelo cliente. O [`SessionStore`] guarda todas as sessões do
//! processo em memória.
//!
//! ## Invariantes
//!
//! - Mensagens sempre entram em **pares**: uma `user` seguida imediatamente
//!   da `assistant` correspondente — após N trocas completas a sessão tem
//!   exatamente 2N mensagens.
//! - Nunca há reordenação, deduplicação ou merge entre sessões.
//! - `updated_at` é atualizado a cada append.
//!
//! ## Concorrência
//!
//! ```text
//! RwLock<HashMap<sessionId, Arc<Mutex<ConversationSession>>>>
//!   ├── lock do mapa: curto (lookup/criação/eviction)
//!   └── mutex por sessão: serializa appends da MESMA sessão
//!       → sessões diferentes não se bloqueiam durante o append
//! ```
//!
//! ## Crescimento Limitado
//!
//! O store é **limitado**: ao criar uma sessão além de `max_sessions`, a
//! sessão menos recentemente atualizada é descartada (eviction LRU por
//! `updated_at`).

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::nlu::taxonomy::Intent;

/// Limite padrão de sessões simultâneas em memória.
pub const DEFAULT_MAX_SESSIONS: usize = 1024;

/// Remetente de uma mensagem no histórico.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Mensagem digitada pelo usuário.
    User,
    /// Resposta produzida pelo motor.
    Assistant,
}

/// Uma mensagem do histórico de uma sessão.
///
/// Tanto a mensagem `user` quanto a `assistant` carregam a intenção e a
/// confiança **do classificador** — a resposta herda a classificação que
/// a produziu.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Identificador único da mensagem.
    pub id: Uuid,
    /// Remetente.
    pub role: MessageRole,
    /// Texto bruto.
    pub content: String,
    /// Intenção classificada para a troca.
    pub intent: Intent,
    /// Confiança do classificador para a troca.
    pub confidence: f64,
    /// Momento da criação.
    pub timestamp: DateTime<Utc>,
}

/// Uma conversa contínua do widget, criada lazy no primeiro append.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSession {
    /// Chave opaca fornecida pelo cliente — nunca validada quanto ao formato.
    pub session_id: String,
    /// Usuário autenticado, se houver (anônimo → `None`).
    pub user_id: Option<String>,
    /// Mensagens em ordem de inserção.
    pub messages: Vec<Message>,
    /// Criação da sessão.
    pub created_at: DateTime<Utc>,
    /// Último append.
    pub updated_at: DateTime<Utc>,
}

/// Store in-memory de sessões, limitado, com serialização por sessão.
pub struct SessionStore {
    /// Mapa sessionId → sessão. O `Arc<Mutex<_>>` interno permite soltar
    /// o lock do mapa antes de mutar a sessão.
    sessions: RwLock<HashMap<String, Arc<Mutex<ConversationSession>>>>,
    /// Limite de sessões — acima disso, eviction LRU por `updated_at`.
    max_sessions: usize,
}

impl SessionStore {
    /// Cria um store vazio com limite de sessões.
    pub fn new(max_sessions: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_sessions: max_sessions.max(1),
        }
    }

    /// Anexa um par de mensagens (`user` + `assistant`) à sessão.
    ///
    /// Cria a sessão no primeiro append para um `session_id` inédito.
    /// A intenção/confiança é a do classificador e vale para as duas
    /// mensagens do par.
    pub fn append(
        &self,
        session_id: &str,
        user_id: Option<&str>,
        user_text: &str,
        assistant_text: &str,
        intent: Intent,
        confidence: f64,
    ) {
        let session = self.get_or_create(session_id, user_id);
        let now = Utc::now();

        // Mutex da sessão serializa appends concorrentes no MESMO sessionId
        let mut s = session.lock();
        s.messages.push(Message {
            id: Uuid::new_v4(),
            role: MessageRole::User,
            content: user_text.to_string(),
            intent,
            confidence,
            timestamp: now,
        });
        s.messages.push(Message {
            id: Uuid::new_v4(),
            role: MessageRole::Assistant,
            content: assistant_text.to_string(),
            intent,
            confidence,
            timestamp: now,
        });
        s.updated_at = now;
        tracing::debug!(
            session = %session_id,
            total = s.messages.len(),
            intent = %intent,
            "sessão: par de mensagens anexado"
        );
    }

    /// Snapshot de uma sessão (clone), ou `None` se não existe.
    pub fn get(&self, session_id: &str) -> Option<ConversationSession> {
        let map = self.sessions.read();
        map.get(session_id).map(|s| s.lock().clone())
    }

    /// Snapshot de todas as sessões — usado pelo agregador de analytics.
    pub fn snapshot(&self) -> Vec<ConversationSession> {
        let map = self.sessions.read();
        map.values().map(|s| s.lock().clone()).collect()
    }

    /// Número de sessões atualmente em memória.
    pub fn session_count(&self) -> usize {
        self.sessions.read().len()
    }

    /// Remove todas as sessões. Hook de limpeza para testes.
    pub fn clear(&self) {
        self.sessions.write().clear();
    }

    /// Lookup ou criação lazy da sessão, com eviction quando o store lota.
    ///
    /// O write lock do mapa é segurado apenas durante lookup/criação —
    /// a mutação do histórico acontece fora, sob o mutex da sessão.
    fn get_or_create(
        &self,
        session_id: &str,
        user_id: Option<&str>,
    ) -> Arc<Mutex<ConversationSession>> {
        let mut map = self.sessions.write();
        if let Some(existing) = map.get(session_id) {
            return existing.clone();
        }

        // Store cheio → descarta a sessão menos recentemente atualizada
        if map.len() >= self.max_sessions {
            if let Some(oldest) = map
                .iter()
                .min_by_key(|(_, s)| s.lock().updated_at)
                .map(|(k, _)| k.clone())
            {
                map.remove(&oldest);
                tracing::warn!(evicted = %oldest, "sessão: eviction LRU (store cheio)");
            }
        }

        let now = Utc::now();
        let session = Arc::new(Mutex::new(ConversationSession {
            session_id: session_id.to_string(),
            user_id: user_id.map(|u| u.to_string()),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }));
        map.insert(session_id.to_string(), session.clone());
        tracing::debug!(session = %session_id, "sessão: criada lazy no primeiro append");
        session
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SESSIONS)
    }
}
