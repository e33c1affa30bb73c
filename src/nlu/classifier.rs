//! # Classificador de Intenção do Usuário
//!
//! O [`IntentClassifier`] determina a **intenção** de uma mensagem por
//! scoring determinístico de keywords — sem embeddings, sem modelo.
//!
//! ## Algoritmo
//!
//! ```text
//! Mensagem do usuário
//!   ├── 1. lowercase
//!   ├── 2. Para cada intenção, na ordem da taxonomia:
//!   │      score = Σ (+1 por keyword presente, uma vez por keyword)
//!   │              + Σ (bônus das regras de boost que disparam)
//!   ├── 3. Melhor intenção: maior score com `>` estrito
//!   │      → empates mantêm a primeira na ordem da taxonomia
//!   ├── 4. Se ninguém pontuou e a mensagem cita dispositivo/plataforma
//!   │      → `general` com score 1 (fallback "loose")
//!   └── 5. confidence = min(score / 3, 1)  — satura em 3 hits
//! ```
//!
//! Função pura do texto e da [`Taxonomy`] — sem efeitos colaterais.

use super::taxonomy::{Intent, Taxonomy};

/// Score de uma intenção individual em uma classificação.
///
/// Ephemeral — existe apenas no resultado de um `classify()`. O `score`
/// já inclui os bônus de boost; `matched_keywords` lista apenas as
/// keywords que dispararam (boosts não entram na lista).
#[derive(Clone, Debug)]
pub struct IntentScore {
    /// Intenção pontuada.
    pub intent: Intent,
    /// Score bruto acumulado (keywords + boosts).
    pub score: u32,
    /// Keywords que dispararam (cada uma no máximo uma vez).
    pub matched_keywords: Vec<String>,
    /// `min(score / 3, 1)` aplicado ao score desta intenção.
    pub confidence: f64,
}

/// Resultado completo de uma classificação.
#[derive(Clone, Debug)]
pub struct Classification {
    /// Melhor intenção — exatamente uma por chamada.
    pub intent: Intent,
    /// Confiança da melhor intenção, sempre em [0, 1].
    pub confidence: f64,
    /// Breakdown por intenção, na ordem da taxonomia.
    pub scores: Vec<IntentScore>,
}

/// Classificador determinístico de intenção por keywords e boosts.
///
/// Imutável após criação — thread-safe para uso concorrente em múltiplas
/// requisições sem lock.
pub struct IntentClassifier {
    /// Taxonomia declarativa: intenções ordenadas, keywords, boosts.
    taxonomy: Taxonomy,
}

/// Saturação da confiança: 3 hits valem confiança total.
fn saturated_confidence(score: u32) -> f64 {
    (f64::from(score) / 3.0).min(1.0)
}

impl IntentClassifier {
    /// Cria o classificador sobre uma taxonomia (normalmente [`Taxonomy::default()`]).
    pub fn new(taxonomy: Taxonomy) -> Self {
        Self { taxonomy }
    }

    /// Classifica a intenção de uma mensagem.
    ///
    /// A melhor intenção é rastreada com `>` estrito durante a varredura:
    /// uma intenção posterior com score **igual** não desbanca a anterior,
    /// o que fixa o desempate first-match-wins na ordem da taxonomia.
    /// Mensagem vazia (ou sem nenhum hit) resulta em `general` com score 0.
    ///
    /// Caso especial ("loose fallback"): se nenhuma intenção pontuou mas a
    /// mensagem contém uma palavra de dispositivo (`mobile`, `app`,
    /// `responsive`), o resultado vira `general` com score 1 — a confiança
    /// sobe de 0 para 0.33, mas o breakdown em `scores` não é alterado.
    pub fn classify(&self, message: &str) -> Classification {
        let lower = message.to_lowercase();

        let mut best_intent = Intent::General;
        let mut best_score = 0u32;
        let mut scores = Vec::with_capacity(self.taxonomy.intents.len());

        for def in &self.taxonomy.intents {
            let mut score = 0u32;
            let mut matched = Vec::new();

            // +1 por keyword presente — uma vez por keyword, não por ocorrência
            for keyword in &def.keywords {
                if lower.contains(keyword.as_str()) {
                    score += 1;
                    matched.push(keyword.clone());
                }
            }

            // Bônus aditivos das regras de boost desta intenção
            for rule in &self.taxonomy.boosts {
                if rule.intent == def.intent && rule.matches(&lower) {
                    score += rule.bonus;
                }
            }

            scores.push(IntentScore {
                intent: def.intent,
                score,
                matched_keywords: matched,
                confidence: saturated_confidence(score),
            });

            // `>` estrito: empate mantém a intenção vista primeiro
            if score > best_score {
                best_score = score;
                best_intent = def.intent;
            }
        }

        // Fallback "loose": nada pontuou, mas a mensagem cita dispositivo/plataforma
        if best_score == 0
            && self
                .taxonomy
                .device_words
                .iter()
                .any(|w| lower.contains(w.as_str()))
        {
            best_intent = Intent::General;
            best_score = 1;
        }

        let confidence = saturated_confidence(best_score);
        tracing::debug!(
            intent = %best_intent,
            score = best_score,
            confidence = %format!("{:.2}", confidence),
            "classificação concluída"
        );

        Classification {
            intent: best_intent,
            confidence,
            scores,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> IntentClassifier {
        IntentClassifier::new(Taxonomy::default())
    }

    // ─── cenários principais ───────────────────────────────────

    #[test]
    fn delivery_delay_scores_shipping_with_full_confidence() {
        let c = classifier().classify("What happens if delivery takes more than 10 days?");
        // "delivery" + "more than" + "days" = 3, boost +3 = 6 → saturado em 1.0
        assert_eq!(c.intent, Intent::Shipping);
        assert_eq!(c.confidence, 1.0);
        let shipping = c.scores.iter().find(|s| s.intent == Intent::Shipping).unwrap();
        assert_eq!(shipping.score, 6);
    }

    #[test]
    fn return_question_gets_returns_boost() {
        let c = classifier().classify("How can I return a product?");
        // "return" (+1, também conta como keyword de products: "product")
        // boost returns +2 → returns = 3 > products = 1
        assert_eq!(c.intent, Intent::Returns);
        assert_eq!(c.confidence, 1.0);
    }

    #[test]
    fn payment_boost_applied() {
        let c = classifier().classify("how do I pay?");
        assert_eq!(c.intent, Intent::Payment);
        let payment = c.scores.iter().find(|s| s.intent == Intent::Payment).unwrap();
        // "pay" keyword +1, boost +2
        assert_eq!(payment.score, 3);
    }

    // ─── defaults e fallbacks ──────────────────────────────────

    #[test]
    fn empty_message_defaults_to_general_with_zero() {
        let c = classifier().classify("   ");
        assert_eq!(c.intent, Intent::General);
        assert_eq!(c.confidence, 0.0);
    }

    #[test]
    fn gibberish_scores_zero() {
        let c = classifier().classify("asdkjasdkj");
        assert_eq!(c.intent, Intent::General);
        assert_eq!(c.confidence, 0.0);
        assert!(c.scores.iter().all(|s| s.score == 0));
    }

    #[test]
    fn device_word_triggers_loose_fallback() {
        // "responsive" não é keyword de nenhuma intenção, mas é device word
        let c = classifier().classify("responsive?");
        assert_eq!(c.intent, Intent::General);
        assert!((c.confidence - 1.0 / 3.0).abs() < 1e-9);
        // O breakdown NÃO é alterado pelo fallback
        let general = c.scores.iter().find(|s| s.intent == Intent::General).unwrap();
        assert_eq!(general.score, 0);
    }

    // ─── desempate e saturação ─────────────────────────────────

    #[test]
    fn tie_keeps_first_intent_in_taxonomy_order() {
        // "track" → shipping +1; "item" → products +1; empate em 1
        let c = classifier().classify("track my item");
        assert_eq!(c.intent, Intent::Shipping);
    }

    #[test]
    fn duplicate_keyword_counts_once() {
        let c = classifier().classify("return return return");
        let returns = c.scores.iter().find(|s| s.intent == Intent::Returns).unwrap();
        // keyword "return" 1x + boost 2 = 3
        assert_eq!(returns.score, 3);
        assert_eq!(returns.matched_keywords, vec!["return".to_string()]);
    }

    #[test]
    fn confidence_always_in_unit_interval() {
        for msg in [
            "",
            "hello",
            "delivery more than days late delayed delivery track shipping",
            "payment pay card upi billing wallet",
            "ASDKJ qwerty 123",
        ] {
            let c = classifier().classify(msg);
            assert!((0.0..=1.0).contains(&c.confidence), "msg={msg:?}");
            for s in &c.scores {
                assert!((0.0..=1.0).contains(&s.confidence));
                assert_eq!(s.confidence, (f64::from(s.score) / 3.0).min(1.0));
            }
        }
    }

    #[test]
    fn breakdown_covers_whole_taxonomy() {
        let c = classifier().classify("hello");
        assert_eq!(c.scores.len(), 7);
    }

    #[test]
    fn case_insensitive_matching() {
        let c = classifier().classify("HOW CAN I RETURN A PRODUCT?");
        assert_eq!(c.intent, Intent::Returns);
    }
}
