use std::sync::Arc;

use bagforge_engine::compat::DowngradeOutcome;
use bagforge_engine::{GenerationSummary, SystemClock, generate, humble_registry};

use super::config::Effective;
use super::error::GenError;
use super::storages::{load_encoder, load_storages};

// ═══════════════════════════════════════════════════════════════
//  Main dispatch
// ═══════════════════════════════════════════════════════════════

pub async fn run(eff: &Effective) -> Result<(), GenError> {
    let registry = Arc::new(humble_registry()?);

    if eff.list_types {
        for (type_name, topic) in registry.published() {
            println!("{type_name}\t{topic}");
        }
        return Ok(());
    }

    let encoder = load_encoder(&eff.config)?;
    let plugins = load_storages(&eff.config)?;
    let summary = generate(&eff.config, registry, encoder, &plugins, Arc::new(SystemClock)).await?;

    if eff.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }

    if !summary.verified() {
        return Err(GenError::Unverified(summary.verification_failures.len()));
    }
    Ok(())
}

fn print_summary(summary: &GenerationSummary) {
    for artifact in &summary.artifacts {
        let downgrade = match artifact.downgrade {
            Some(DowngradeOutcome::Rewritten { from, to }) => format!("metadata v{from} -> v{to}"),
            Some(DowngradeOutcome::AlreadyAtOrBelow { version }) => format!("metadata v{version}"),
            Some(DowngradeOutcome::Untouched) => "metadata untouched".to_string(),
            None => "metadata missing".to_string(),
        };
        let verified = if artifact.verification.is_some() { ", verified" } else { "" };
        println!(
            "{}: {} messages on {} topics ({downgrade}{verified})",
            artifact.bag.display(),
            artifact.message_count,
            artifact.topic_count
        );
    }
    for ty in &summary.skipped_types {
        println!("skipped {ty}: no sample rule");
    }
    for failure in &summary.verification_failures {
        println!("FAILED {}: {}", failure.bag.display(), failure.reason);
    }
}
