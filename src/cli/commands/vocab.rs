//! Vocab command implementation

use super::shared::RunSummary;
use crate::app::services::vocabulary::{VocabularyId, VocabularyRegistry};
use crate::cli::args::VocabArgs;
use crate::constants::VOCABULARY_VERSION;
use colored::*;

/// List vocabularies, or print every entry of one
pub async fn run_vocab(args: VocabArgs) -> anyhow::Result<RunSummary> {
    let registry = VocabularyRegistry::builtin();

    match args.vocabulary()? {
        None => {
            println!(
                "{} {}",
                "Vocabularies".bright_green().bold(),
                format!("(version {})", VOCABULARY_VERSION).dimmed()
            );
            for &id in VocabularyId::ALL {
                println!("  {:<18} {:>3} entries", id.name(), registry.get(id).len());
            }
        }
        Some(id) => {
            let vocabulary = registry.get(id);
            println!(
                "{} {}",
                id.name().bright_green().bold(),
                format!("(version {}, {} entries)", VOCABULARY_VERSION, vocabulary.len()).dimmed()
            );
            for entry in vocabulary.entries() {
                if entry.aliases.is_empty() {
                    println!("  {:>4}  {}", entry.code, entry.label);
                } else {
                    println!(
                        "  {:>4}  {}  {}",
                        entry.code,
                        entry.label,
                        format!("[{}]", entry.aliases.join(", ")).dimmed()
                    );
                }
            }
        }
    }

    Ok(RunSummary::default())
}
