//! Generate command implementation.

use super::open_store;
use crate::cli::GenerateArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use cardsmith_domain::traits::{DeckStore, InferenceEngine};
use cardsmith_domain::{DeckId, Flashcard};
use cardsmith_generator::{ChatTemplate, FlashcardGenerator, GeneratorError};
use cardsmith_ingest::{extract_batch, InputFile, OcrConfig, TextExtractor};
use cardsmith_llm::LazyEngine;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// Where to save the generated deck.
pub struct SaveTarget<'a, S> {
    /// Deck store
    pub store: &'a mut S,
    /// Owner username
    pub owner: &'a str,
    /// Deck name
    pub name: &'a str,
    /// Save what was generated before an engine failure or Ctrl-C
    pub save_partial: bool,
}

/// Execute the generate command.
pub fn execute_generate(args: GenerateArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    // Check the session before doing any slow work
    let owner = match &args.save {
        Some(_) => Some(config.session.require_user()?.to_string()),
        None => None,
    };

    let effective = apply_overrides(&args, config)?;
    let text = extract_inputs(&args, &effective.ocr, formatter)?;

    let interrupted = Arc::new(AtomicBool::new(false));
    if let Err(e) = watch_interrupt(Arc::clone(&interrupted)) {
        warn!("Ctrl-C will not stop generation: {}", e);
    }

    let generator = FlashcardGenerator::new(LazyEngine::ollama(effective.engine), effective.generator)?
        .with_abort_flag(interrupted);

    match (&args.save, owner) {
        (Some(name), Some(owner)) => {
            let mut store = open_store(config)?;
            let target = SaveTarget {
                store: &mut store,
                owner: &owner,
                name,
                save_partial: args.save_partial,
            };
            generate_deck(&generator, &text, Some(target), formatter)?;
        }
        _ => {
            generate_deck::<_, cardsmith_store::SqliteStore>(&generator, &text, None, formatter)?;
        }
    }
    Ok(())
}

/// The configuration with command-line overrides applied, validated.
fn apply_overrides(args: &GenerateArgs, config: &Config) -> Result<Config> {
    let mut effective = config.clone();
    if let Some(size) = args.chunk_size {
        effective.generator.max_chunk_size = size;
    }
    if args.dedupe {
        effective.generator.deduplicate = true;
    }
    if let Some(name) = &args.template {
        effective.generator.template = ChatTemplate::preset(name).ok_or_else(|| {
            CliError::InvalidInput(format!(
                "Unknown template '{}' (expected phi3, chatml or llama3)",
                name
            ))
        })?;
    }
    if let Some(model) = &args.model {
        effective.engine.model = model.clone();
    }

    effective.validate()?;
    Ok(effective)
}

/// Set `flag` on the first Ctrl-C so generation stops after the current chunk.
fn watch_interrupt(flag: Arc<AtomicBool>) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    std::thread::Builder::new()
        .name("ctrl-c".to_string())
        .spawn(move || {
            runtime.block_on(async {
                if tokio::signal::ctrl_c().await.is_ok() {
                    flag.store(true, Ordering::SeqCst);
                }
            });
        })?;
    Ok(())
}

/// Read every input file into one text, reporting files that fail.
fn extract_inputs(args: &GenerateArgs, ocr: &OcrConfig, formatter: &Formatter) -> Result<String> {
    let mut inputs = Vec::with_capacity(args.files.len());
    for path in &args.files {
        match InputFile::from_path(path) {
            Ok(input) => inputs.push(input),
            Err(e) => eprintln!(
                "{}",
                formatter.warning(&format!("Skipping {}: {}", path.display(), e))
            ),
        }
    }

    let batch = extract_batch(&TextExtractor::new(ocr.clone()), &inputs);
    for failure in &batch.failures {
        eprintln!(
            "{}",
            formatter.warning(&format!("Error processing {}: {}", failure.name, failure.reason))
        );
    }
    for doc in &batch.documents {
        info!("{}: {} chars", doc.name, doc.chars);
    }

    if batch.is_blank() {
        return Err(CliError::InvalidInput(
            "No text could be extracted from the given files".to_string(),
        ));
    }
    Ok(batch.text)
}

/// Run generation with a progress bar, print the cards and optionally save them.
///
/// On an engine failure the cards generated so far are reported, saved when
/// the target allows partial saves, and the error is returned. An
/// interrupted run is treated the same way but is not an error.
pub fn generate_deck<E, S>(
    generator: &FlashcardGenerator<E>,
    text: &str,
    target: Option<SaveTarget<'_, S>>,
    formatter: &Formatter,
) -> Result<Option<DeckId>>
where
    E: InferenceEngine,
    E::Error: std::fmt::Display,
    S: DeckStore,
    CliError: From<S::Error>,
{
    let progress = ProgressBar::new(0);
    progress.set_style(
        ProgressStyle::with_template("{spinner} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
    );
    progress.set_message(format!("with {}", generator.engine().model_name()));

    let outcome = generator.generate_with_progress(text, |p| {
        progress.set_length(p.chunks_total as u64);
        progress.set_position(p.chunks_processed as u64);
    });
    progress.finish_and_clear();

    match outcome {
        Ok(result) => {
            eprintln!("{}", formatter.generation_summary(&result));
            println!("{}", formatter.format_flashcards(&result.flashcards)?);

            match target {
                Some(target) if !result.metadata.aborted || target.save_partial => {
                    save(target, &result.flashcards, formatter)
                }
                Some(_) => {
                    eprintln!(
                        "{}",
                        formatter.info("Interrupted; re-run with --save-partial to keep these cards")
                    );
                    Ok(None)
                }
                None => Ok(None),
            }
        }
        Err(err) => {
            let partial = err.partial().map(|p| p.flashcards.clone()).unwrap_or_default();
            if let GeneratorError::Engine { .. } = err {
                eprintln!(
                    "{}",
                    formatter.error(&format!(
                        "{} flashcard(s) were generated before the failure",
                        partial.len()
                    ))
                );
                if !partial.is_empty() {
                    println!("{}", formatter.format_flashcards(&partial)?);
                }

                match target {
                    Some(target) if target.save_partial => {
                        save(target, &partial, formatter)?;
                    }
                    Some(_) if !partial.is_empty() => {
                        eprintln!(
                            "{}",
                            formatter.info("Re-run with --save-partial to keep them")
                        );
                    }
                    _ => {}
                }
            }
            Err(err.into())
        }
    }
}

fn save<S>(target: SaveTarget<'_, S>, cards: &[Flashcard], formatter: &Formatter) -> Result<Option<DeckId>>
where
    S: DeckStore,
    CliError: From<S::Error>,
{
    if cards.is_empty() {
        eprintln!("{}", formatter.warning("No flashcards to save"));
        return Ok(None);
    }

    let id = target.store.save_deck(target.owner, target.name, cards)?;
    eprintln!(
        "{}",
        formatter.success(&format!(
            "Saved {} cards as '{}' ({})",
            cards.len(),
            target.name.trim(),
            id
        ))
    );
    Ok(Some(id))
}
