//! Batch driver: run every input record through the pipeline.
//!
//! Inputs are processed one at a time in file-name order. A failing record
//! is logged, recorded in the [`BatchReport`] and skipped; only problems with
//! the input or output directory themselves abort the run.

use crate::config::GeneratorConfig;
use crate::error::{CardGenError, RecordError};
use crate::output::{input_id, BatchReport, BatchStats, CardResult};
use crate::pipeline::input::{self, DOCUMENT_EXTENSION};
use crate::pipeline::page::{render_page, CardTemplate};
use crate::pipeline::{encode, filename, record, vcard};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Generate a contact card for every record in `config.input_dir`.
///
/// # Returns
/// `Ok(BatchReport)` once every input has been attempted, even if some
/// failed (check `report.stats.failed`).
///
/// # Errors
/// Returns `Err(CardGenError)` only for fatal errors:
/// - input directory unreadable or without `*.json` files
/// - output directory cannot be created
/// - custom template cannot be read
pub fn generate(config: &GeneratorConfig) -> Result<BatchReport, CardGenError> {
    let start = Instant::now();
    info!(
        "Generating cards: {} → {}",
        config.input_dir.display(),
        config.output_dir.display()
    );

    // ── Step 1: Resolve template ─────────────────────────────────────────
    let template = match config.template_path {
        Some(ref path) => CardTemplate::from_file(path)?,
        None => CardTemplate::builtin(),
    };

    // ── Step 2: Discover inputs ──────────────────────────────────────────
    let inputs = input::discover_inputs(&config.input_dir)?;
    let total = inputs.len();
    info!("Found {} record file(s)", total);

    // ── Step 3: Prepare output directory ─────────────────────────────────
    std::fs::create_dir_all(&config.output_dir).map_err(|e| CardGenError::OutputWriteFailed {
        path: config.output_dir.clone(),
        source: e,
    })?;

    let mut taken = if config.overwrite {
        HashSet::new()
    } else {
        input::existing_output_names(&config.output_dir)?
    };
    debug!("{} output name(s) already taken", taken.len());

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_start(total);
    }

    // ── Step 4: Process each record ──────────────────────────────────────
    let mut cards = Vec::with_capacity(total);
    for (i, path) in inputs.iter().enumerate() {
        let index = i + 1;
        let id = input_id(path);
        if let Some(ref cb) = config.progress_callback {
            cb.on_card_start(index, total, &id);
        }

        let result = generate_card(path, &mut taken, config, &template);

        match &result.error {
            None => {
                let written = result
                    .output
                    .as_deref()
                    .and_then(Path::file_name)
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                info!("[{}/{}] {} → {}", index, total, id, written);
                if let Some(ref cb) = config.progress_callback {
                    cb.on_card_complete(index, total, &written);
                }
            }
            Some(e) => {
                warn!("[{}/{}] {} failed: {}", index, total, id, e);
                if let Some(ref cb) = config.progress_callback {
                    cb.on_card_error(index, total, &id, &e.to_string());
                }
            }
        }
        cards.push(result);
    }

    // ── Step 5: Compute stats ────────────────────────────────────────────
    let generated = cards.iter().filter(|c| c.is_success()).count();
    let stats = BatchStats {
        total_inputs: total,
        generated,
        failed: total - generated,
        duration_ms: start.elapsed().as_millis() as u64,
    };

    info!(
        "Batch complete: {}/{} cards, {}ms",
        stats.generated, stats.total_inputs, stats.duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_complete(total, generated);
    }

    Ok(BatchReport { cards, stats })
}

/// Run one record file through the pipeline and write its document.
///
/// A name is reserved in `taken` only once the record has loaded and its QR
/// payload has been built, so failed records never consume a name.
pub fn generate_card(
    path: &Path,
    taken: &mut HashSet<String>,
    config: &GeneratorConfig,
    template: &CardTemplate,
) -> CardResult {
    let mut result = CardResult {
        input: path.to_path_buf(),
        output: None,
        name: None,
        error: None,
    };

    match build_card(path, taken, config, template, &mut result) {
        Ok(output) => result.output = Some(output),
        Err(e) => result.error = Some(e),
    }
    result
}

fn build_card(
    path: &Path,
    taken: &mut HashSet<String>,
    config: &GeneratorConfig,
    template: &CardTemplate,
    result: &mut CardResult,
) -> Result<PathBuf, RecordError> {
    let card = record::load_record(path)?;
    result.name = Some(card.name.clone());

    let vcard = vcard::to_vcard(&card);
    debug!("vCard for '{}' is {} bytes", card.name, vcard.len());

    let payload = encode::build_payload(&vcard, &config.payload_options())?;
    let html = render_page(&card, &payload, template);

    let stem = filename::resolve_output_name(&card.name, &input_id(path), taken);
    let output = config
        .output_dir
        .join(format!("{stem}.{DOCUMENT_EXTENSION}"));
    write_atomic(&output, &html)?;
    Ok(output)
}

/// Write `contents` to a temp file beside `path`, then rename it into place.
fn write_atomic(path: &Path, contents: &str) -> Result<(), RecordError> {
    let failed = |e: std::io::Error| RecordError::WriteFailed {
        path: path.to_path_buf(),
        detail: e.to_string(),
    };

    let tmp_path = path.with_extension("html.tmp");
    std::fs::write(&tmp_path, contents).map_err(failed)?;
    std::fs::rename(&tmp_path, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp_path);
        failed(e)
    })
}
