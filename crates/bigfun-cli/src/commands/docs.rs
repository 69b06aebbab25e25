//! Documentation commands

use anyhow::{Context, Result};
use bigfun_core::{DefinitionWatcher, DocsGenerator};
use tokio::process::Command;

/// Address `mkdocs serve` listens on by default
pub const PREVIEW_URL: &str = "http://localhost:8000";

/// Generate markdown pages once
pub async fn generate(folder: &str, output: &str) -> Result<()> {
    let generator = DocsGenerator::new(folder, output);
    let written = generator
        .generate()
        .context("Failed to generate documentation")?;

    for path in &written {
        tracing::debug!("Wrote {}", path.display());
    }
    Ok(())
}

/// Serve docs locally, regenerating pages whenever a definition changes
pub async fn serve(folder: &str, output: &str) -> Result<()> {
    let generator = DocsGenerator::new(folder, output);
    // Keep serving; the watch regenerates once the definition is fixed.
    generate_or_log(&generator);

    let watcher = DefinitionWatcher::start(folder)
        .with_context(|| format!("Failed to watch {}", folder))?;

    // The preview server is left to exit with the terminal session.
    let _server = Command::new("mkdocs")
        .arg("serve")
        .spawn()
        .context("Failed to start `mkdocs serve` (is mkdocs installed?)")?;
    tracing::info!("Serving docs on {} (press Ctrl+C to stop)", PREVIEW_URL);

    let shutdown = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("Received shutdown signal"),
            Err(e) => tracing::error!("Failed to listen for Ctrl+C: {}", e),
        }
    };

    tokio::select! {
        handled = watcher.run(move |_| generator.generate().map(|_| ())) => {
            tracing::warn!("Watcher stopped after {} regeneration(s)", handled);
        }
        _ = shutdown => {}
    }

    Ok(())
}

/// Generate pages, logging a failure instead of returning it.
///
/// Returns whether generation succeeded.
fn generate_or_log(generator: &DocsGenerator) -> bool {
    match generator.generate() {
        Ok(written) => {
            tracing::debug!("Wrote {} page(s)", written.len());
            true
        }
        Err(e) => {
            tracing::error!("Failed to generate documentation: {}", e);
            false
        }
    }
}
