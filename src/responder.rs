//! # Compositor de Fallback — Respostas Modeladas por Intenção
//!
//! Quando a recuperação não encontra resposta autoritativa, o
//! [`ResponseComposer`] produz a resposta canned da intenção e a lista de
//! ações sugeridas para o widget. Puro e determinístico — a confiança
//! reportada ao chamador nesse caso é a do classificador, não algo
//! produzido aqui.
//!
//! A taxonomia é um enum fechado, então não existe braço "intenção
//! desconhecida": o `match` é total por construção.

use crate::nlu::taxonomy::Intent;

/// Resposta de fallback composta para uma intenção.
#[derive(Clone, Debug)]
pub struct ComposedResponse {
    /// Parágrafo canned da intenção.
    pub text: String,
    /// Rótulos de ações de follow-up para o widget (2–3 por intenção).
    pub suggested_actions: Vec<String>,
}

/// Compositor puro de respostas de fallback.
pub struct ResponseComposer;

impl ResponseComposer {
    /// Compõe o fallback completo (texto + ações) para a intenção.
    pub fn compose(intent: Intent) -> ComposedResponse {
        ComposedResponse {
            text: Self::fallback_text(intent).to_string(),
            suggested_actions: Self::suggested_actions(intent),
        }
    }

    /// Parágrafo canned da intenção.
    pub fn fallback_text(intent: Intent) -> &'static str {
        match intent {
            Intent::Shipping => {
                "I understand you're asking about shipping. For detailed shipping information, \
                 please check our shipping policy or contact our support team at \
                 support@fashionforward.com."
            }
            Intent::Returns => {
                "I can help you with returns and exchanges. You can initiate a return through \
                 your account or contact our support team for assistance."
            }
            Intent::Products => {
                "I'd be happy to help you find products. You can browse our categories or use \
                 the search function. If you need specific product information, please let me know!"
            }
            Intent::Account => {
                "I can help you with account-related questions. You can manage your account \
                 settings, view order history, or contact support for account issues."
            }
            Intent::Payment => {
                "For payment-related questions, please check our payment methods page or \
                 contact our billing support team."
            }
            Intent::General => {
                "I'm here to help! Could you please provide more details about what you're \
                 looking for? I can assist with orders, products, shipping, returns, and more."
            }
            Intent::Technical => {
                "I understand you're experiencing a technical issue. Please contact our \
                 technical support team at tech@fashionforward.com for immediate assistance."
            }
        }
    }

    /// Ações de follow-up sugeridas para a intenção, em ordem de exibição.
    pub fn suggested_actions(intent: Intent) -> Vec<String> {
        let actions: &[&str] = match intent {
            Intent::Shipping => &["Track Order", "Shipping Policy", "Contact Support"],
            Intent::Returns => &["Return Policy", "Start Return", "Contact Support"],
            Intent::Products => &["Browse Products", "Search", "View Categories"],
            Intent::Account => &["My Account", "Order History", "Contact Support"],
            Intent::Payment => &["Payment Methods", "Billing Support", "Contact Support"],
            Intent::General => &["Browse Products", "Contact Support", "Help Center"],
            Intent::Technical => &["Contact Support", "Report Issue", "Help Center"],
        };
        actions.iter().map(|a| a.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_INTENTS: [Intent; 7] = [
        Intent::Shipping,
        Intent::Returns,
        Intent::Products,
        Intent::Account,
        Intent::Payment,
        Intent::General,
        Intent::Technical,
    ];

    #[test]
    fn every_intent_has_text_and_two_to_three_actions() {
        for intent in ALL_INTENTS {
            let composed = ResponseComposer::compose(intent);
            assert!(!composed.text.is_empty());
            assert!((2..=3).contains(&composed.suggested_actions.len()), "{intent}");
        }
    }

    #[test]
    fn composition_is_deterministic() {
        let a = ResponseComposer::compose(Intent::Shipping);
        let b = ResponseComposer::compose(Intent::Shipping);
        assert_eq!(a.text, b.text);
        assert_eq!(a.suggested_actions, b.suggested_actions);
    }

    #[test]
    fn general_fallback_mentions_what_the_bot_can_do() {
        let composed = ResponseComposer::compose(Intent::General);
        assert!(composed.text.contains("I'm here to help"));
        assert_eq!(
            composed.suggested_actions,
            vec!["Browse Products", "Contact Support", "Help Center"]
        );
    }
}
