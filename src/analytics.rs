//! # Analytics — Sumário Agregado de Conversas e Conhecimento
//!
//! O [`AnalyticsAggregator`] computa, **sob demanda**, estatísticas
//! agregadas sobre o [`SessionStore`] e a [`KnowledgeBase`]:
//!
//! | Métrica | Fonte |
//! |---------|-------|
//! | `totalConversations` | sessões distintas no store |
//! | `totalMessages` | soma dos tamanhos dos históricos |
//! | `intentDistribution` | mensagens de role `user` por intenção |
//! | `knowledgeStats` | tamanho da base, média de confiança e de uso |
//!
//! Nada é cacheado e nenhum store é mutado. A distribuição de intenções
//! sai **ordenada** (contagem desc, label asc no empate) para que a saída
//! seja estável em testes e dashboards.

use std::collections::HashMap;

use serde::Serialize;

use crate::core::{KnowledgeBase, MessageRole, SessionStore};
use crate::nlu::taxonomy::Intent;

/// Contagem de mensagens de usuário para uma intenção.
#[derive(Clone, Debug, Serialize)]
pub struct IntentCount {
    /// Intenção contada.
    pub intent: Intent,
    /// Ocorrências em mensagens de role `user`.
    pub count: u64,
}

/// Estatísticas da base de conhecimento no momento da chamada.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeStats {
    /// Número de entradas na base.
    pub total_knowledge: usize,
    /// Média das confianças curadas.
    pub avg_confidence: f64,
    /// Média dos contadores de uso — cresce ao longo do processo.
    pub avg_usage: f64,
}

/// Sumário completo retornado por [`AnalyticsAggregator::summarize`].
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    /// Sessões distintas atualmente no store.
    pub total_conversations: usize,
    /// Total de mensagens somando todos os históricos.
    pub total_messages: usize,
    /// Distribuição de intenções, ordenada (count desc, label asc).
    pub intent_distribution: Vec<IntentCount>,
    /// Estatísticas da base de conhecimento.
    pub knowledge_stats: KnowledgeStats,
}

/// Agregador on-demand — sem estado próprio.
pub struct AnalyticsAggregator;

impl AnalyticsAggregator {
    /// Computa o sumário a partir de um snapshot das sessões.
    ///
    /// A distribuição conta apenas mensagens de role `user` — a mensagem
    /// `assistant` do par herda a mesma intenção e contaria em dobro.
    pub fn summarize(store: &SessionStore, kb: &KnowledgeBase) -> AnalyticsSummary {
        let sessions = store.snapshot();

        let total_conversations = sessions.len();
        let total_messages: usize = sessions.iter().map(|s| s.messages.len()).sum();

        let mut tally: HashMap<Intent, u64> = HashMap::new();
        for session in &sessions {
            for message in &session.messages {
                if message.role == MessageRole::User {
                    *tally.entry(message.intent).or_default() += 1;
                }
            }
        }
        let mut intent_distribution: Vec<IntentCount> = tally
            .into_iter()
            .map(|(intent, count)| IntentCount { intent, count })
            .collect();
        // Ordem estável: contagem desc, label asc no empate
        intent_distribution.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.intent.label().cmp(b.intent.label()))
        });

        AnalyticsSummary {
            total_conversations,
            total_messages,
            intent_distribution,
            knowledge_stats: KnowledgeStats {
                total_knowledge: kb.len(),
                avg_confidence: kb.avg_confidence(),
                avg_usage: kb.avg_usage(),
            },
        }
    }
}
