//! # Persistência — Carregamento do Corpus de Conhecimento
//!
//! Carrega as entradas da [`KnowledgeBase`] de `data/knowledge.json`
//! quando o arquivo existe, ou do **seed embutido no binário**
//! (`data/seed_knowledge.json`, via `include_str!`) quando não.
//!
//! O formato é um array JSON de entradas em camelCase — a curadoria edita
//! o JSON, nunca o código. O contador `usageCount` é opcional no arquivo
//! (default 0) e não é persistido de volta: a base é estática durante a
//! vida do processo e o uso recomeça do zero a cada boot.

use std::path::Path;

use anyhow::{Context, Result};

use crate::core::{KnowledgeBase, KnowledgeEntry};

/// Caminho do corpus editável (relativo à raiz do projeto).
const KNOWLEDGE_PATH: &str = "data/knowledge.json";

/// Seed embutido no binário — as sete entradas originais da loja.
const SEED_JSON: &str = include_str!("../data/seed_knowledge.json");

/// Carrega a base de conhecimento: arquivo em disco, senão seed embutido.
///
/// # Erros
///
/// Retorna erro se o arquivo existir mas estiver corrompido ou
/// incompatível com [`KnowledgeEntry`].
pub fn load_knowledge() -> Result<KnowledgeBase> {
    let path = Path::new(KNOWLEDGE_PATH);
    if !path.exists() {
        tracing::info!("Nenhum {} encontrado, usando seed embutido", KNOWLEDGE_PATH);
        return builtin_knowledge();
    }
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Falha ao ler {KNOWLEDGE_PATH}"))?;
    let entries: Vec<KnowledgeEntry> = serde_json::from_str(&json)
        .with_context(|| format!("Falha ao desserializar {KNOWLEDGE_PATH}"))?;
    tracing::info!(total = entries.len(), "Corpus carregado do disco");
    Ok(KnowledgeBase::from_entries(entries))
}

/// Monta a base a partir do seed embutido (kb1..kb7, ordem preservada).
///
/// Também é o corpus padrão dos testes — sempre parte de uso zerado.
pub fn builtin_knowledge() -> Result<KnowledgeBase> {
    let entries: Vec<KnowledgeEntry> =
        serde_json::from_str(SEED_JSON).context("Seed embutido inválido")?;
    Ok(KnowledgeBase::from_entries(entries))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_seed_parses_with_seven_entries() {
        let kb = builtin_knowledge().unwrap();
        assert_eq!(kb.len(), 7);
    }

    #[test]
    fn builtin_seed_usage_defaults_to_zero() {
        let kb = builtin_knowledge().unwrap();
        assert!(kb.iter().all(|e| e.usage_count() == 0));
    }

    #[test]
    fn builtin_seed_confidences_in_unit_interval() {
        let kb = builtin_knowledge().unwrap();
        assert!(kb.iter().all(|e| (0.0..=1.0).contains(&e.confidence)));
    }
}
