//! # Motor de Atendimento — O Pipeline de Decisão
//!
//! O [`ChatEngine`] coordena o ciclo completo de uma troca de suporte:
//!
//! ```text
//! Mensagem do usuário
//!   ├── 1. IntentClassifier → intenção + confiança
//!   ├── 2. KnowledgeRetriever → resposta autoritativa?
//!   │      ├── Sim → Reply::Answered (uso incrementado, confiança da entrada)
//!   │      └── Não → ResponseComposer → Reply::Fallback (confiança do classificador)
//!   ├── 3. SessionStore.append → par user/assistant no histórico
//!   └── 4. HandledMessage → resposta composta para o transporte
//! ```
//!
//! O motor expõe exatamente três operações ao transporte:
//! [`handle_message`](ChatEngine::handle_message),
//! [`record_feedback`](ChatEngine::record_feedback) e
//! [`analytics`](ChatEngine::analytics).
//!
//! ## Concorrência
//!
//! O motor é imutável (`&self`) após criação — thread-safe para uso
//! concorrente. As únicas mutações compartilhadas (contador de uso,
//! append de sessão, log de feedback) são protegidas nos próprios stores.
//!
//! ## Erros
//!
//! A taxonomia de erros é estreita: só [`EngineError::InvalidInput`] na
//! borda (sessionId vazio). Miss de recuperação **não é erro** — vira
//! fallback. Feedback com id desconhecido é aceitação-falha (`false`),
//! não falha. Nenhuma requisição malformada corrompe a base ou o
//! histórico de outra sessão.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use uuid::Uuid;

use crate::analytics::{AnalyticsAggregator, AnalyticsSummary};
use crate::core::{KnowledgeBase, SessionStore};
use crate::nlu::taxonomy::Intent;
use crate::nlu::{IntentClassifier, Taxonomy};
use crate::responder::ResponseComposer;
use crate::retrieval::{KnowledgeRetriever, SOURCE_KNOWLEDGE_BASE};

/// Origem de uma resposta de fallback.
pub const SOURCE_FALLBACK: &str = "fallback";

/// Erros do motor — rejeitados na borda, antes do pipeline.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Entrada inválida do transporte (ex: sessionId vazio).
    #[error("entrada inválida: {0}")]
    InvalidInput(&'static str),
}

/// Resposta interna do pipeline — variante etiquetada por origem.
///
/// `Answered` carrega o id da entrada de conhecimento; `Fallback` não tem
/// id. Ambas expõem a mesma visão `{texto, confiança}` para o chamador.
#[derive(Clone, Debug)]
pub enum Reply {
    /// Resposta autoritativa da base de conhecimento.
    Answered {
        /// Texto da entrada selecionada.
        text: String,
        /// Confiança da recuperação (estática ou 0.9 no override).
        confidence: f64,
        /// Id da entrada (ex: "kb1").
        knowledge_id: String,
    },
    /// Fallback modelado por intenção.
    Fallback {
        /// Parágrafo canned da intenção.
        text: String,
        /// Confiança do classificador.
        confidence: f64,
    },
}

impl Reply {
    /// Texto exibível da resposta.
    pub fn text(&self) -> &str {
        match self {
            Reply::Answered { text, .. } | Reply::Fallback { text, .. } => text,
        }
    }

    /// Confiança reportada ao chamador.
    pub fn confidence(&self) -> f64 {
        match self {
            Reply::Answered { confidence, .. } | Reply::Fallback { confidence, .. } => *confidence,
        }
    }

    /// Id de conhecimento, presente apenas em `Answered`.
    pub fn knowledge_id(&self) -> Option<&str> {
        match self {
            Reply::Answered { knowledge_id, .. } => Some(knowledge_id),
            Reply::Fallback { .. } => None,
        }
    }

    /// Tag de origem para a API (`knowledge_base` ou `fallback`).
    pub fn source(&self) -> &'static str {
        match self {
            Reply::Answered { .. } => SOURCE_KNOWLEDGE_BASE,
            Reply::Fallback { .. } => SOURCE_FALLBACK,
        }
    }
}

/// Resultado composto de [`ChatEngine::handle_message`], pronto para o
/// transporte serializar.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandledMessage {
    /// Texto da resposta (autoritativa ou fallback).
    pub answer: String,
    /// Confiança reportada: da recuperação num hit, do classificador no fallback.
    pub confidence: f64,
    /// Intenção classificada.
    pub intent: Intent,
    /// Ações de follow-up sugeridas para o widget.
    pub suggested_actions: Vec<String>,
    /// Id da entrada de conhecimento — `None` em fallback.
    pub knowledge_id: Option<String>,
    /// Origem: `knowledge_base` ou `fallback`.
    pub source: &'static str,
}

/// Registro de feedback sobre uma resposta anterior.
///
/// Feedback é **apenas registrado** — nunca realimenta o ranking. A
/// ordenação de recuperação depende só de confiança estática e contagem
/// de uso.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRecord {
    /// Identificador do registro.
    pub id: Uuid,
    /// Entrada de conhecimento avaliada.
    pub knowledge_id: String,
    /// A resposta ajudou?
    pub helpful: bool,
    /// Nota opcional 1–5 do widget.
    pub rating: Option<u8>,
    /// Comentário livre opcional.
    pub comment: Option<String>,
    /// Momento do registro.
    pub timestamp: DateTime<Utc>,
}

/// Motor de atendimento — singleton de vida de processo.
///
/// Os stores são injetados no boot (`Arc`), sem globais escondidos —
/// testes constroem motores isolados com stores próprios.
pub struct ChatEngine {
    /// Corpus curado de pergunta/resposta.
    kb: Arc<KnowledgeBase>,
    /// Histórico de todas as sessões.
    sessions: Arc<SessionStore>,
    /// Classificador determinístico de intenção.
    classifier: IntentClassifier,
    /// Log append-only de feedback recebido.
    feedback: Mutex<Vec<FeedbackRecord>>,
}

impl ChatEngine {
    /// Monta o motor sobre stores já construídos e uma taxonomia.
    pub fn new(kb: Arc<KnowledgeBase>, sessions: Arc<SessionStore>, taxonomy: Taxonomy) -> Self {
        Self {
            kb,
            sessions,
            classifier: IntentClassifier::new(taxonomy),
            feedback: Mutex::new(Vec::new()),
        }
    }

    /// Processa uma mensagem: classifica, recupera ou compõe, registra na
    /// sessão e devolve o resultado composto.
    ///
    /// A dica de intenção só vai ao retriever quando a classificação
    /// pontuou (confiança > 0) — um `general` de score zero é default, não
    /// evidência, e não deve casar entradas por intenção.
    ///
    /// # Erros
    ///
    /// [`EngineError::InvalidInput`] para `session_id` vazio/whitespace.
    pub fn handle_message(
        &self,
        session_id: &str,
        user_id: Option<&str>,
        text: &str,
    ) -> Result<HandledMessage, EngineError> {
        if session_id.trim().is_empty() {
            return Err(EngineError::InvalidInput("sessionId vazio"));
        }

        let classification = self.classifier.classify(text);
        let intent = classification.intent;

        let intent_hint = (classification.confidence > 0.0).then_some(intent);
        let reply = match KnowledgeRetriever::retrieve(&self.kb, text, intent_hint) {
            Some(retrieved) => Reply::Answered {
                text: retrieved.answer,
                confidence: retrieved.confidence,
                knowledge_id: retrieved.knowledge_id,
            },
            None => Reply::Fallback {
                text: ResponseComposer::fallback_text(intent).to_string(),
                confidence: classification.confidence,
            },
        };

        // O par registrado na sessão carrega a classificação da troca —
        // a confiança de recuperação fica só na resposta ao chamador.
        self.sessions.append(
            session_id,
            user_id,
            text,
            reply.text(),
            intent,
            classification.confidence,
        );

        tracing::info!(
            session = %session_id,
            intent = %intent,
            source = reply.source(),
            confidence = %format!("{:.2}", reply.confidence()),
            "mensagem processada"
        );

        Ok(HandledMessage {
            answer: reply.text().to_string(),
            confidence: reply.confidence(),
            intent,
            suggested_actions: ResponseComposer::suggested_actions(intent),
            knowledge_id: reply.knowledge_id().map(|s| s.to_string()),
            source: reply.source(),
        })
    }

    /// Registra feedback best-effort sobre uma resposta anterior.
    ///
    /// Retorna `true` se aceito; `false` (sem erro) quando o
    /// `knowledge_id` não existe na base — aceitação-falha no-op.
    pub fn record_feedback(
        &self,
        knowledge_id: &str,
        helpful: bool,
        rating: Option<u8>,
        comment: Option<String>,
    ) -> bool {
        if self.kb.get(knowledge_id).is_none() {
            tracing::warn!(id = %knowledge_id, "feedback para entrada desconhecida ignorado");
            return false;
        }
        let record = FeedbackRecord {
            id: Uuid::new_v4(),
            knowledge_id: knowledge_id.to_string(),
            helpful,
            rating,
            comment,
            timestamp: Utc::now(),
        };
        tracing::info!(id = %record.knowledge_id, helpful, "feedback registrado");
        self.feedback.lock().push(record);
        true
    }

    /// Quantidade de registros de feedback acumulados.
    pub fn feedback_count(&self) -> usize {
        self.feedback.lock().len()
    }

    /// Sumário de analytics sob demanda (ver [`AnalyticsAggregator`]).
    pub fn analytics(&self) -> AnalyticsSummary {
        AnalyticsAggregator::summarize(&self.sessions, &self.kb)
    }

    /// Snapshot de uma sessão — exposto para o transporte e testes.
    pub fn session(&self, session_id: &str) -> Option<crate::core::ConversationSession> {
        self.sessions.get(session_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence;

    fn engine() -> ChatEngine {
        ChatEngine::new(
            Arc::new(persistence::builtin_knowledge().unwrap()),
            Arc::new(SessionStore::default()),
            Taxonomy::default(),
        )
    }

    // ─── cenários do pipeline ──────────────────────────────────

    #[test]
    fn delivery_delay_scenario() {
        let e = engine();
        let r = e
            .handle_message("s1", None, "What happens if delivery takes more than 10 days?")
            .unwrap();
        assert_eq!(r.intent, Intent::Shipping);
        assert_eq!(r.confidence, 0.9);
        assert!(r.answer.contains("contact our support team"));
        assert_eq!(r.knowledge_id.as_deref(), Some("kb1"));
        assert_eq!(r.source, "knowledge_base");
    }

    #[test]
    fn return_scenario_hits_returns_entry() {
        let e = engine();
        let r = e.handle_message("s1", None, "How can I return a product?").unwrap();
        assert_eq!(r.intent, Intent::Returns);
        assert_eq!(r.knowledge_id.as_deref(), Some("kb3"));
        assert_eq!(r.confidence, 0.8);
    }

    #[test]
    fn gibberish_scenario_falls_back_to_general() {
        let e = engine();
        let r = e.handle_message("s1", None, "asdkjasdkj").unwrap();
        assert_eq!(r.intent, Intent::General);
        assert_eq!(r.confidence, 0.0);
        assert_eq!(r.knowledge_id, None);
        assert_eq!(r.source, "fallback");
        assert_eq!(r.answer, ResponseComposer::fallback_text(Intent::General));
        assert_eq!(
            r.suggested_actions,
            ResponseComposer::suggested_actions(Intent::General)
        );
    }

    // ─── borda e invariantes ───────────────────────────────────

    #[test]
    fn empty_session_id_rejected_at_boundary() {
        let e = engine();
        let err = e.handle_message("  ", None, "hello").unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
        // Nada foi registrado
        assert_eq!(e.analytics().total_conversations, 0);
    }

    #[test]
    fn total_messages_is_twice_the_number_of_calls() {
        let e = engine();
        e.handle_message("a", None, "hello").unwrap();
        e.handle_message("a", None, "shipping policy").unwrap();
        e.handle_message("b", None, "how do I pay?").unwrap();
        let summary = e.analytics();
        assert_eq!(summary.total_conversations, 2);
        assert_eq!(summary.total_messages, 6);
    }

    #[test]
    fn usage_monotonic_and_isolated_across_calls() {
        let e = engine();
        e.handle_message("s", None, "delivery takes more than 10 days").unwrap();
        e.handle_message("s", None, "delivery takes more than 10 days").unwrap();
        assert_eq!(e.kb.get("kb1").unwrap().usage_count(), 2);
        for other in ["kb2", "kb3", "kb4", "kb5", "kb6", "kb7"] {
            assert_eq!(e.kb.get(other).unwrap().usage_count(), 0, "{other}");
        }
    }

    #[test]
    fn session_messages_carry_classifier_confidence_on_hits() {
        let e = engine();
        // Hit de kb1 com override 0.9, mas o classificador satura em 1.0
        e.handle_message("s", None, "delivery takes more than 10 days").unwrap();
        let session = e.session("s").unwrap();
        assert_eq!(session.messages[0].confidence, 1.0);
        assert_eq!(session.messages[1].confidence, 1.0);
    }

    // ─── feedback ──────────────────────────────────────────────

    #[test]
    fn feedback_for_known_entry_is_accepted() {
        let e = engine();
        assert!(e.record_feedback("kb1", true, Some(5), None));
        assert_eq!(e.feedback_count(), 1);
    }

    #[test]
    fn feedback_for_unknown_entry_is_noop() {
        let e = engine();
        assert!(!e.record_feedback("kb99", false, None, Some("??".into())));
        assert_eq!(e.feedback_count(), 0);
    }

    #[test]
    fn feedback_does_not_change_future_ranking() {
        let e = engine();
        let before = e.handle_message("s", None, "shipping policy").unwrap();
        e.record_feedback(before.knowledge_id.as_deref().unwrap(), false, Some(1), None);
        let after = e.handle_message("s", None, "shipping policy").unwrap();
        assert_eq!(before.knowledge_id, after.knowledge_id);
    }

    // ─── concorrência ──────────────────────────────────────────

    #[test]
    fn concurrent_handles_on_same_session_keep_all_messages() {
        let e = Arc::new(engine());
        let a = {
            let e = e.clone();
            std::thread::spawn(move || e.handle_message("shared", None, "hello").unwrap())
        };
        let b = {
            let e = e.clone();
            std::thread::spawn(move || {
                e.handle_message("shared", None, "how can I return a product?").unwrap()
            })
        };
        a.join().unwrap();
        b.join().unwrap();
        let session = e.session("shared").unwrap();
        assert_eq!(session.messages.len(), 4);
    }
}
