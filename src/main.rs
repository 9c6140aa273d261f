use std::error::Error;
use std::io::{self, BufRead, Write};

use doctail::{DoctailConfig, InMemoryPositionStore, Input, TailPipeline};
use tracing_subscriber::EnvFilter;

/// Reads newline-delimited JSON from stdin and writes the canonical documents
/// to stdout, tracking the configured increasing field as it goes.
///
/// The bookmark store lives only for this run: every run starts from the
/// beginning and the final bookmark is reported in the `tailer_finished` log
/// record rather than kept.
fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .json()
        .init();

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: doctail <config.yaml> < documents.ndjson");
        eprintln!("the bookmark is not kept between runs; it is logged at exit");
        std::process::exit(2);
    };

    let config = DoctailConfig::from_file(&path)?;
    let mut pipeline = TailPipeline::from_config(&config)?;

    tracing::info!(
        config = %path,
        name = ?config.name,
        increasing_field = %pipeline.tracker().config().increasing_field(),
        object_mapper = pipeline.normalizer().capability().is_available(),
        "tailer_started"
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let (mut emitted, mut dropped) = (0usize, 0usize);

    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match pipeline.process(Input::Text(&line)) {
            Some(document) => {
                serde_json::to_writer(&mut out, &document)?;
                out.write_all(b"\n")?;
                emitted += 1;
            }
            None => dropped += 1,
        }
    }
    out.flush()?;

    let store = InMemoryPositionStore::new();
    pipeline.checkpoint(&store)?;
    tracing::info!(
        emitted,
        dropped,
        bookmark = ?pipeline.tracker().last_value().map(|value| value.as_value()),
        key = %pipeline.tracker().config().persistence_key(),
        "tailer_finished"
    );

    Ok(())
}
