//! # Módulo NLU — Classificação Determinística de Intenção
//!
//! Camada de "compreensão" de linguagem do motor de atendimento. Aqui não
//! há modelo estatístico nem embeddings — a classificação é scoring
//! determinístico de keywords sobre uma taxonomia fechada, o que a torna
//! barata (~0ms), previsível e testável byte a byte.
//!
//! | Módulo | Responsabilidade |
//! |--------|------------------|
//! | [`taxonomy`] | Taxonomia declarativa: intenções, keywords, boosts |
//! | [`classifier`] | Scoring, desempate e saturação de confiança |

/// Sub-módulo da taxonomia declarativa de intenções.
pub mod taxonomy;

/// Sub-módulo do classificador por keywords.
pub mod classifier;

// Re-exports para conveniência.
pub use classifier::{Classification, IntentClassifier, IntentScore};
pub use taxonomy::{Intent, Taxonomy};
