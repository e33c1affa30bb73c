//! # KnowledgeBase — Corpus de Respostas Curadas
//!
//! A [`KnowledgeBase`] é o corpus estático de pares pergunta/resposta do
//! atendimento. Cada [`KnowledgeEntry`] carrega a pergunta canônica, a
//! resposta exibida ao usuário, a intenção associada, keywords-gatilho,
//! uma confiança curada e um contador de uso.
//!
//! ## Armazenamento
//!
//! Entradas em um `Vec` **na ordem do seed** (kb1..kb7) — esta ordem é o
//! desempate determinístico do ranking de recuperação quando confiança e
//! uso empatam. Nenhuma entrada é criada ou removida em runtime; apenas o
//! contador de uso muda.
//!
//! ## Concorrência
//!
//! A base é imutável após o boot, exceto `usage_count`, que é um
//! [`AtomicU64`] — dois retrievals concorrentes na mesma entrada nunca
//! perdem um incremento, sem lock nenhum.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::nlu::taxonomy::Intent;

/// Par pergunta/resposta curado com metadados de recuperação.
///
/// | Campo | Papel |
/// |-------|-------|
/// | `question` | Texto canônico — usado no match por substring |
/// | `answer` | Resposta devolvida ao usuário |
/// | `intent` | Intenção da taxonomia associada |
/// | `keywords` | Frases-gatilho (comparação case-insensitive) |
/// | `confidence` | Confiança curada, estática, em [0, 1] |
/// | `usage_count` | Quantas vezes a entrada foi selecionada |
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeEntry {
    /// Identificador único (ex: "kb1").
    pub id: String,
    /// Pergunta canônica.
    pub question: String,
    /// Resposta exibida ao usuário.
    pub answer: String,
    /// Intenção da taxonomia.
    pub intent: Intent,
    /// Frases-gatilho em lowercase.
    pub keywords: Vec<String>,
    /// Confiança curada — não muda durante a vida do processo.
    pub confidence: f64,
    /// Contador de seleções — monotonicamente não-decrescente.
    #[serde(default)]
    usage_count: AtomicU64,
}

impl KnowledgeEntry {
    /// Leitura do contador de uso no momento da chamada.
    pub fn usage_count(&self) -> u64 {
        self.usage_count.load(Ordering::Relaxed)
    }

    /// Incrementa o contador de uso em exatamente 1.
    ///
    /// Chamado pelo retriever quando esta entrada é selecionada.
    pub fn record_usage(&self) {
        self.usage_count.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(id = %self.id, usage = self.usage_count(), "KB: uso registrado");
    }
}

/// Corpus de conhecimento in-memory, estático após o boot.
///
/// No servidor vive em `Arc<KnowledgeBase>` — leitura compartilhada sem
/// lock; a única mutação (contador de uso) é atômica por entrada.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnowledgeBase {
    /// Entradas na ordem do seed.
    entries: Vec<KnowledgeEntry>,
}

impl KnowledgeBase {
    /// Cria a base a partir das entradas do seed, preservando a ordem.
    pub fn from_entries(entries: Vec<KnowledgeEntry>) -> Self {
        tracing::info!(total = entries.len(), "KB: base de conhecimento montada");
        Self { entries }
    }

    /// Número de entradas na base.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` se a base está vazia.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Busca uma entrada por id. Usada na validação de feedback.
    pub fn get(&self, id: &str) -> Option<&KnowledgeEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Itera as entradas na ordem do seed.
    pub fn iter(&self) -> impl Iterator<Item = &KnowledgeEntry> {
        self.entries.iter()
    }

    /// Média aritmética das confianças curadas (0.0 para base vazia).
    pub fn avg_confidence(&self) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.entries.iter().map(|e| e.confidence).sum();
        sum / self.entries.len() as f64
    }

    /// Média aritmética dos contadores de uso **no momento da chamada**.
    ///
    /// Este valor cresce durante a vida do processo conforme o retriever
    /// registra seleções.
    pub fn avg_usage(&self) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }
        let sum: u64 = self.entries.iter().map(|e| e.usage_count()).sum();
        sum as f64 / self.entries.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence;

    // ─── contadores de uso ─────────────────────────────────────

    #[test]
    fn usage_starts_at_zero_and_increments_by_one() {
        let kb = persistence::builtin_knowledge().unwrap();
        let entry = kb.get("kb1").unwrap();
        assert_eq!(entry.usage_count(), 0);
        entry.record_usage();
        entry.record_usage();
        assert_eq!(entry.usage_count(), 2);
    }

    #[test]
    fn usage_is_isolated_per_entry() {
        let kb = persistence::builtin_knowledge().unwrap();
        kb.get("kb3").unwrap().record_usage();
        assert_eq!(kb.get("kb3").unwrap().usage_count(), 1);
        assert_eq!(kb.get("kb2").unwrap().usage_count(), 0);
    }

    // ─── seed e estatísticas ───────────────────────────────────

    #[test]
    fn seed_preserves_order_and_size() {
        let kb = persistence::builtin_knowledge().unwrap();
        assert_eq!(kb.len(), 7);
        let ids: Vec<&str> = kb.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["kb1", "kb2", "kb3", "kb4", "kb5", "kb6", "kb7"]);
    }

    #[test]
    fn avg_confidence_over_seed() {
        let kb = persistence::builtin_knowledge().unwrap();
        // (0.9 + 0.8×5 + 0.7) / 7
        let expected = (0.9 + 0.8 * 5.0 + 0.7) / 7.0;
        assert!((kb.avg_confidence() - expected).abs() < 1e-9);
    }

    #[test]
    fn avg_usage_reflects_recorded_usage() {
        let kb = persistence::builtin_knowledge().unwrap();
        assert_eq!(kb.avg_usage(), 0.0);
        kb.get("kb1").unwrap().record_usage();
        assert!((kb.avg_usage() - 1.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn empty_base_averages_are_zero() {
        let kb = KnowledgeBase::from_entries(Vec::new());
        assert_eq!(kb.avg_confidence(), 0.0);
        assert_eq!(kb.avg_usage(), 0.0);
    }

    #[test]
    fn unknown_id_is_none() {
        let kb = persistence::builtin_knowledge().unwrap();
        assert!(kb.get("kb99").is_none());
    }
}
