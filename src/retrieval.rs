//! # Recuperação de Conhecimento — Busca em Camadas
//!
//! O [`KnowledgeRetriever`] procura na [`KnowledgeBase`] a melhor resposta
//! autoritativa para uma mensagem, em três camadas:
//!
//! ```text
//! Mensagem (lowercase)
//!   ├── 1. Override de atraso de entrega
//!   │      "delivery" + "more than" + "days" presentes?
//!   │      → entrada cuja pergunta contém "delivery" e "more than"
//!   │      → retorna com confiança FIXA 0.9, ignorando a intenção
//!   ├── 2. Filtro geral (qualquer um basta):
//!   │      (a) pergunta contém a mensagem inteira como substring
//!   │      (b) alguma keyword da entrada está na mensagem
//!   │      (c) intenção da entrada == intenção do classificador
//!   └── 3. Ranking: confiança desc, empate por uso desc
//!          (sort estável → empate total mantém a ordem do seed)
//! ```
//!
//! O override existe porque perguntas de atraso de entrega são críticas
//! para o negócio e não podem ser roubadas por matches genéricos de
//! shipping mais fracos.
//!
//! `None` não é erro — é o resultado esperado que aciona o
//! [`ResponseComposer`](crate::responder::ResponseComposer).

use crate::core::KnowledgeBase;
use crate::nlu::taxonomy::Intent;

/// Confiança fixa do override de atraso de entrega.
const DELIVERY_OVERRIDE_CONFIDENCE: f64 = 0.9;

/// Tag de origem para respostas vindas da base de conhecimento.
pub const SOURCE_KNOWLEDGE_BASE: &str = "knowledge_base";

/// Resposta recuperada da base, com a confiança reportada ao chamador.
///
/// A confiança é a estática da entrada, exceto no override de atraso de
/// entrega, onde é fixa em 0.9.
#[derive(Clone, Debug)]
pub struct RetrievedAnswer {
    /// Id da entrada selecionada (ex: "kb1").
    pub knowledge_id: String,
    /// Texto da resposta.
    pub answer: String,
    /// Confiança reportada ao chamador.
    pub confidence: f64,
    /// Origem — sempre [`SOURCE_KNOWLEDGE_BASE`].
    pub source: &'static str,
}

/// Motor de recuperação stateless sobre a [`KnowledgeBase`].
pub struct KnowledgeRetriever;

impl KnowledgeRetriever {
    /// Busca a melhor entrada para a mensagem; incrementa o uso da vencedora.
    ///
    /// `intent` é a dica do classificador para o filtro (c). O motor só a
    /// passa quando a classificação pontuou de fato (confiança > 0) — um
    /// `general` de score zero é chute, não evidência.
    ///
    /// A regra (a) só se aplica a mensagens não-vazias após trim: uma
    /// mensagem vazia é substring de qualquer pergunta e casaria com a
    /// base inteira.
    ///
    /// Efeito colateral único: `record_usage()` na entrada retornada.
    /// Nunca falha — entrada malformada só passa por normalização de caixa.
    pub fn retrieve(
        kb: &KnowledgeBase,
        message: &str,
        intent: Option<Intent>,
    ) -> Option<RetrievedAnswer> {
        let lower = message.to_lowercase();

        // ─── Camada 1: override de atraso de entrega ───────────
        if lower.contains("delivery") && lower.contains("more than") && lower.contains("days") {
            let delay_entry = kb.iter().find(|e| {
                let q = e.question.to_lowercase();
                q.contains("delivery") && q.contains("more than")
            });
            if let Some(entry) = delay_entry {
                entry.record_usage();
                tracing::info!(id = %entry.id, "retrieval: override de atraso de entrega");
                return Some(RetrievedAnswer {
                    knowledge_id: entry.id.clone(),
                    answer: entry.answer.clone(),
                    confidence: DELIVERY_OVERRIDE_CONFIDENCE,
                    source: SOURCE_KNOWLEDGE_BASE,
                });
            }
        }

        // ─── Camada 2: filtro geral ────────────────────────────
        let trimmed_nonempty = !lower.trim().is_empty();
        let mut matches: Vec<_> = kb
            .iter()
            .filter(|e| {
                let question_match =
                    trimmed_nonempty && e.question.to_lowercase().contains(&lower);
                let keyword_match = e.keywords.iter().any(|k| lower.contains(k.as_str()));
                let intent_match = intent.is_some_and(|i| e.intent == i);
                question_match || keyword_match || intent_match
            })
            .collect();

        // ─── Camada 3: ranking ─────────────────────────────────
        // Sort estável: empate total em (confiança, uso) mantém a ordem do seed
        matches.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.usage_count().cmp(&a.usage_count()))
        });

        let best = matches.first()?;
        best.record_usage();
        tracing::debug!(
            id = %best.id,
            confidence = best.confidence,
            candidates = matches.len(),
            "retrieval: melhor entrada selecionada"
        );
        Some(RetrievedAnswer {
            knowledge_id: best.id.clone(),
            answer: best.answer.clone(),
            confidence: best.confidence,
            source: SOURCE_KNOWLEDGE_BASE,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence;

    fn kb() -> KnowledgeBase {
        persistence::builtin_knowledge().unwrap()
    }

    // ─── override de atraso de entrega ─────────────────────────

    #[test]
    fn delivery_override_returns_fixed_confidence() {
        let kb = kb();
        let r = KnowledgeRetriever::retrieve(&kb, "DELIVERY takes MORE THAN 10 Days!", None)
            .unwrap();
        assert_eq!(r.knowledge_id, "kb1");
        assert_eq!(r.confidence, 0.9);
        assert_eq!(r.source, "knowledge_base");
    }

    #[test]
    fn delivery_override_ignores_classifier_intent() {
        let kb = kb();
        let r = KnowledgeRetriever::retrieve(
            &kb,
            "delivery took more than 15 days",
            Some(Intent::Payment),
        )
        .unwrap();
        assert_eq!(r.knowledge_id, "kb1");
        assert_eq!(r.confidence, 0.9);
    }

    #[test]
    fn override_increments_usage() {
        let kb = kb();
        KnowledgeRetriever::retrieve(&kb, "delivery more than 10 days", None).unwrap();
        assert_eq!(kb.get("kb1").unwrap().usage_count(), 1);
    }

    // ─── filtro geral ──────────────────────────────────────────

    #[test]
    fn keyword_match_selects_returns_entry() {
        let kb = kb();
        let r = KnowledgeRetriever::retrieve(&kb, "how can i return a product?", Some(Intent::Returns))
            .unwrap();
        assert_eq!(r.knowledge_id, "kb3");
        assert_eq!(r.confidence, 0.8);
    }

    #[test]
    fn question_substring_match() {
        let kb = kb();
        // A mensagem inteira é substring da pergunta canônica de kb6
        let r = KnowledgeRetriever::retrieve(&kb, "create an account", None).unwrap();
        assert_eq!(r.knowledge_id, "kb6");
    }

    #[test]
    fn intent_hint_alone_matches_entries_of_that_intent() {
        let kb = kb();
        // Nenhuma keyword/substring casa, mas a dica de intenção sim.
        // kb1 (0.9) vence kb2/kb4 (0.8) no ranking por confiança.
        let r = KnowledgeRetriever::retrieve(&kb, "zzzz", Some(Intent::Shipping)).unwrap();
        assert_eq!(r.knowledge_id, "kb1");
    }

    #[test]
    fn no_match_returns_none() {
        let kb = kb();
        assert!(KnowledgeRetriever::retrieve(&kb, "asdkjasdkj", None).is_none());
    }

    #[test]
    fn empty_message_does_not_match_everything() {
        let kb = kb();
        assert!(KnowledgeRetriever::retrieve(&kb, "   ", None).is_none());
    }

    // ─── ranking e desempate ───────────────────────────────────

    #[test]
    fn ranking_prefers_higher_confidence() {
        let kb = kb();
        // "delivery" casa keywords de kb1 (0.9) e kb2 (0.8) — sem override
        // porque falta "more than"/"days"
        let r = KnowledgeRetriever::retrieve(&kb, "delivery", None).unwrap();
        assert_eq!(r.knowledge_id, "kb1");
    }

    #[test]
    fn confidence_tie_broken_by_usage_count() {
        let kb = kb();
        // "return track" casa kb3 e kb4, ambos 0.8. Com uso zerado, o sort
        // estável mantém kb3 (ordem do seed).
        let first = KnowledgeRetriever::retrieve(&kb, "return track", None).unwrap();
        assert_eq!(first.knowledge_id, "kb3");
        // Tornando kb4 mais usado, o empate vira para ele.
        kb.get("kb4").unwrap().record_usage();
        kb.get("kb4").unwrap().record_usage();
        let second = KnowledgeRetriever::retrieve(&kb, "return track", None).unwrap();
        assert_eq!(second.knowledge_id, "kb4");
    }

    #[test]
    fn ranking_is_idempotent_without_interleaved_usage() {
        let kb = kb();
        let a = KnowledgeRetriever::retrieve(&kb, "shipping policy", None).unwrap();
        let b = KnowledgeRetriever::retrieve(&kb, "shipping policy", None).unwrap();
        // kb2 acumulou uso entre as chamadas, mas já liderava — mesma seleção
        assert_eq!(a.knowledge_id, b.knowledge_id);
    }

    #[test]
    fn usage_increments_exactly_one_per_hit_and_only_on_winner() {
        let kb = kb();
        KnowledgeRetriever::retrieve(&kb, "shipping policy", None).unwrap();
        KnowledgeRetriever::retrieve(&kb, "shipping policy", None).unwrap();
        assert_eq!(kb.get("kb2").unwrap().usage_count(), 2);
        assert_eq!(kb.get("kb1").unwrap().usage_count(), 0);
        assert_eq!(kb.get("kb3").unwrap().usage_count(), 0);
    }
}
