//! # Taxonomia de Intenções — Configuração Declarativa
//!
//! Define a taxonomia **fechada e ordenada** de intenções da loja e os
//! dados que alimentam o [`IntentClassifier`](super::classifier::IntentClassifier):
//! listas de keywords, regras de boost e palavras de dispositivo.
//!
//! | Intent | Tópico | Exemplo de mensagem |
//! |--------|--------|---------------------|
//! | [`Shipping`](Intent::Shipping) | Entrega e rastreio | "when will my order arrive?" |
//! | [`Returns`](Intent::Returns) | Devoluções e reembolso | "how can I return a product?" |
//! | [`Products`](Intent::Products) | Catálogo e estoque | "is this item available in blue?" |
//! | [`Account`](Intent::Account) | Conta e login | "I forgot my password" |
//! | [`Payment`](Intent::Payment) | Pagamento e cobrança | "which cards do you accept?" |
//! | [`General`](Intent::General) | Tudo o mais (default) | "hello, I need help" |
//! | [`Technical`](Intent::Technical) | Erros no site | "the page is not loading" |
//!
//! ## Taxonomia como Dado, não como Código
//!
//! Keywords e boosts vivem em uma estrutura [`Taxonomy`] desserializável —
//! o algoritmo de scoring nunca muda quando a curadoria ajusta as listas.
//! A **ordem de declaração** em [`Taxonomy::default()`] é o desempate
//! oficial: em caso de empate de score, vence a intenção que aparece
//! primeiro na lista (first-match-wins).

use serde::{Deserialize, Serialize};

/// Intenção de uma mensagem do usuário — taxonomia fechada da loja.
///
/// Serializa em lowercase (`"shipping"`, `"returns"`, ...) para casar com
/// o formato do seed de conhecimento e com a API JSON.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    /// Entrega, prazo, rastreio de pedidos.
    Shipping,
    /// Devolução, troca, reembolso, cancelamento.
    Returns,
    /// Produtos, tamanhos, estoque, preço.
    Products,
    /// Conta, login, senha, cadastro.
    Account,
    /// Pagamento, cartão, cobrança.
    Payment,
    /// Saudações, dúvidas genéricas — o **default** da taxonomia.
    General,
    /// Bugs, erros, lentidão do site.
    Technical,
}

impl Intent {
    /// Label textual em lowercase, igual ao valor serializado.
    pub fn label(&self) -> &'static str {
        match self {
            Intent::Shipping => "shipping",
            Intent::Returns => "returns",
            Intent::Products => "products",
            Intent::Account => "account",
            Intent::Payment => "payment",
            Intent::General => "general",
            Intent::Technical => "technical",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Uma intenção da taxonomia com sua lista ordenada de keywords-gatilho.
///
/// A comparação é sempre por substring case-insensitive — a mensagem é
/// colocada em lowercase e cada keyword conta **no máximo uma vez**,
/// independente de quantas ocorrências existam.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IntentDef {
    /// Intenção que esta definição pontua.
    pub intent: Intent,
    /// Frases-gatilho (lowercase). Duplicatas são inofensivas.
    pub keywords: Vec<String>,
}

/// Regra de boost aditiva — bônus quando combinações de frases aparecem.
///
/// A regra dispara quando **todas** as frases de `all_of` estão presentes
/// e, se `any_of` não estiver vazio, **pelo menos uma** delas também.
/// O `bonus` é somado ao score da intenção alvo.
///
/// As três regras padrão vêm da operação da loja:
/// - "delivery" + "more than" → `shipping` +3 (atraso de entrega é crítico)
/// - "return" ou "refund" → `returns` +2
/// - "payment" ou "pay" → `payment` +2
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BoostRule {
    /// Intenção que recebe o bônus.
    pub intent: Intent,
    /// Frases que precisam estar TODAS presentes na mensagem.
    #[serde(default)]
    pub all_of: Vec<String>,
    /// Frases das quais pelo menos UMA precisa estar presente (se não vazio).
    #[serde(default)]
    pub any_of: Vec<String>,
    /// Bônus aditivo ao score.
    pub bonus: u32,
}

impl BoostRule {
    /// Verifica se a regra dispara para a mensagem (já em lowercase).
    pub fn matches(&self, lower_message: &str) -> bool {
        let all_ok = self.all_of.iter().all(|p| lower_message.contains(p.as_str()));
        let any_ok = self.any_of.is_empty()
            || self.any_of.iter().any(|p| lower_message.contains(p.as_str()));
        all_ok && any_ok
    }
}

/// Taxonomia completa — intenções ordenadas, boosts e palavras de dispositivo.
///
/// Construída uma vez no boot (via [`Default`]) e entregue ao classificador.
/// Pode ser desserializada de JSON para testes ou curadoria futura.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Taxonomy {
    /// Intenções em ordem de prioridade — fixa o desempate first-match-wins.
    pub intents: Vec<IntentDef>,
    /// Regras de boost aditivas.
    pub boosts: Vec<BoostRule>,
    /// Palavras de dispositivo/plataforma para o fallback "loose":
    /// se nada pontuou e a mensagem contém uma delas, vira `general` com score 1.
    pub device_words: Vec<String>,
}

impl Default for Taxonomy {
    /// Taxonomia padrão da loja — listas e ordem herdadas da operação.
    fn default() -> Self {
        fn def(intent: Intent, keywords: &[&str]) -> IntentDef {
            IntentDef {
                intent,
                keywords: keywords.iter().map(|k| k.to_string()).collect(),
            }
        }
        fn words(ws: &[&str]) -> Vec<String> {
            ws.iter().map(|w| w.to_string()).collect()
        }

        Taxonomy {
            intents: vec![
                def(Intent::Shipping, &[
                    "shipping", "delivery", "dispatch", "track", "courier", "logistics",
                    "when will", "how long", "delivery time", "shipping time",
                    "delayed delivery", "late delivery", "delivery delay",
                    "more than", "days", "weeks",
                ]),
                def(Intent::Returns, &[
                    "return", "refund", "exchange", "cancel", "order cancellation",
                    "money back", "send back", "take back",
                ]),
                def(Intent::Products, &[
                    "product", "item", "size", "color", "available", "stock",
                    "price", "cost", "buy", "purchase", "order",
                ]),
                def(Intent::Account, &[
                    "account", "profile", "login", "password", "sign up",
                    "register", "forgot", "username", "email",
                ]),
                def(Intent::Payment, &[
                    "payment", "pay", "billing", "card", "wallet", "upi",
                    "cash on delivery", "cod", "credit card", "debit card",
                ]),
                def(Intent::General, &[
                    "hello", "hi", "help", "support", "contact", "information",
                    "website", "mobile", "app",
                ]),
                def(Intent::Technical, &[
                    "bug", "error", "issue", "problem", "not working", "broken",
                    "fix", "technical", "slow", "loading",
                ]),
            ],
            boosts: vec![
                BoostRule {
                    intent: Intent::Shipping,
                    all_of: words(&["delivery", "more than"]),
                    any_of: Vec::new(),
                    bonus: 3,
                },
                BoostRule {
                    intent: Intent::Returns,
                    all_of: Vec::new(),
                    any_of: words(&["return", "refund"]),
                    bonus: 2,
                },
                BoostRule {
                    intent: Intent::Payment,
                    all_of: Vec::new(),
                    any_of: words(&["payment", "pay"]),
                    bonus: 2,
                },
            ],
            device_words: words(&["mobile", "app", "responsive"]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ─── ordem e conteúdo da taxonomia padrão ──────────────────

    #[test]
    fn default_taxonomy_order_is_fixed() {
        let tax = Taxonomy::default();
        let order: Vec<Intent> = tax.intents.iter().map(|d| d.intent).collect();
        assert_eq!(
            order,
            vec![
                Intent::Shipping,
                Intent::Returns,
                Intent::Products,
                Intent::Account,
                Intent::Payment,
                Intent::General,
                Intent::Technical,
            ]
        );
    }

    #[test]
    fn boost_all_of_requires_every_phrase() {
        let rule = &Taxonomy::default().boosts[0];
        assert!(rule.matches("delivery takes more than ten days"));
        assert!(!rule.matches("delivery is late"));
    }

    #[test]
    fn boost_any_of_requires_one_phrase() {
        let rule = &Taxonomy::default().boosts[1];
        assert!(rule.matches("i want a refund"));
        assert!(rule.matches("return this"));
        assert!(!rule.matches("where is my order"));
    }

    #[test]
    fn intent_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Intent::Shipping).unwrap(), "\"shipping\"");
        let back: Intent = serde_json::from_str("\"returns\"").unwrap();
        assert_eq!(back, Intent::Returns);
    }
}
