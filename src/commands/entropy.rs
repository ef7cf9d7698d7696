//! `loopscore entropy` command

use std::path::Path;

use loopscore_core::entropy::analyze_entropy_profile;
use loopscore_core::error::Result;
use loopscore_core::format::OutputFormat;

use super::input::{read_response, yes_no};
use crate::cli::Cli;

/// Execute the entropy command
pub fn execute(cli: &Cli, file: Option<&Path>) -> Result<()> {
    let response = read_response(file)?;
    let profile = analyze_entropy_profile(&response);

    match cli.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
        OutputFormat::Human => {
            println!("quality ratio: {:.3}", profile.entropy_quality_ratio);
            if cli.quiet {
                return Ok(());
            }
            println!("words: {}", profile.word_count);
            println!("token entropy: {:.3}", profile.token_entropy);
            println!("char entropy: {:.3}", profile.char_entropy);
            println!("bigram entropy: {:.3}", profile.bigram_entropy);
            println!("trigram entropy: {:.3}", profile.trigram_entropy);
            println!(
                "vocabulary: {} unique of {}, diversity {:.3}",
                profile.vocabulary.unique_words,
                profile.vocabulary.total_words,
                profile.vocabulary.vocab_diversity
            );
            println!(
                "repetitive: {} (ratio {:.3}, {} local drops, trend {})",
                yes_no(profile.patterns.has_repetitive_patterns),
                profile.patterns.repetition_ratio,
                profile.patterns.local_entropy_drops,
                profile.patterns.entropy_trend
            );
        }
    }

    Ok(())
}
