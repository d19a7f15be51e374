use std::path::PathBuf;
use std::sync::Arc;

use bagforge_api::format::MessageEncoder;
use bagforge_api::metadata::BagMetadata;
use bagforge_api::schema::Registry;
use bagforge_api::storage::StoragePlugin;
use serde::Serialize;

use crate::compat::{self, DowngradeOutcome};
use crate::config::GenConfig;
use crate::error::EngineError;
use crate::synth::{Clock, Synthesizer};
use crate::verify::{self, VerifyOptions, VerifyReport};
use crate::writer::{BagWriter, METADATA_FILE, WriterOptions};

/// One finished bag.
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactSummary {
    pub storage: String,
    pub bag: PathBuf,
    pub message_count: u64,
    pub topic_count: usize,
    /// `(topic, type, count)` in connection order.
    pub topic_counts: Vec<(String, String, u64)>,
    /// `None` when the metadata file was missing after close.
    pub downgrade: Option<DowngradeOutcome>,
    pub verification: Option<VerifyReport>,
    /// Metadata as written before any downgrade.
    #[serde(skip)]
    pub metadata: BagMetadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerificationFailure {
    pub bag: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationSummary {
    pub artifacts: Vec<ArtifactSummary>,
    /// Types left out under the `skip` unruled policy.
    pub skipped_types: Vec<String>,
    pub verification_failures: Vec<VerificationFailure>,
}

impl GenerationSummary {
    pub fn verified(&self) -> bool {
        self.verification_failures.is_empty()
    }
}

/// Everything one artifact needs, shareable across blocking tasks.
struct Job {
    plugin: Arc<dyn StoragePlugin>,
    bag: PathBuf,
    corpus: Arc<Vec<(String, String)>>,
    synth: Arc<Synthesizer>,
    encoder: Arc<dyn MessageEncoder>,
    options: WriterOptions,
    repetitions: u32,
    base_ns: u64,
    interval_ns: u64,
    target_version: u32,
}

// ═══════════════════════════════════════════════════════════════
//  Run
// ═══════════════════════════════════════════════════════════════

/// Produce one bag per configured storage, downgrade each bag's metadata, and
/// optionally verify the result with an external inspector.
///
/// Every artifact gets the same corpus, order and timestamps. Any error
/// outside the downgrade and verification steps aborts the run.
pub async fn generate(
    config: &GenConfig,
    registry: Arc<Registry>,
    encoder: Arc<dyn MessageEncoder>,
    plugins: &[Arc<dyn StoragePlugin>],
    clock: Arc<dyn Clock>,
) -> Result<GenerationSummary, EngineError> {
    config.validate()?;
    let selected = select_plugins(config, plugins)?;

    let synth = Arc::new(Synthesizer::new(registry.clone(), clock.clone(), config.unruled));
    let (corpus, skipped_types) = build_corpus(config, &registry, &synth)?;
    let corpus = Arc::new(corpus);
    let base_ns = clock.now_ns();

    tracing::info!(
        types = corpus.len(),
        storages = selected.len(),
        repetitions = config.repetitions,
        base_ns,
        "generating bags"
    );

    std::fs::create_dir_all(&config.output_dir)?;

    let jobs: Vec<Job> = selected
        .into_iter()
        .map(|plugin| Job {
            bag: config.bag_dir(plugin.identifier()),
            plugin,
            corpus: corpus.clone(),
            synth: synth.clone(),
            encoder: encoder.clone(),
            options: WriterOptions {
                version: config.native_version,
                serialization_format: encoder.format_name().to_string(),
                offer_default_qos: config.offer_default_qos,
                custom_data: config.custom_data.clone(),
                ..WriterOptions::default()
            },
            repetitions: config.repetitions,
            base_ns,
            interval_ns: config.interval_ns,
            target_version: config.target_version,
        })
        .collect();

    let mut artifacts = Vec::with_capacity(jobs.len());
    if config.parallel {
        let handles: Vec<_> = jobs
            .into_iter()
            .map(|job| tokio::task::spawn_blocking(move || write_artifact(&job)))
            .collect();
        // Join every task before reporting, so no writer is still running on return.
        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            results.push(handle.await);
        }
        for result in results {
            artifacts.push(result??);
        }
    } else {
        for job in jobs {
            artifacts.push(tokio::task::spawn_blocking(move || write_artifact(&job)).await??);
        }
    }

    let mut summary = GenerationSummary { artifacts, skipped_types, verification_failures: Vec::new() };
    if config.verify.enabled {
        verify_artifacts(&mut summary, &VerifyOptions::from(&config.verify)).await?;
    }
    Ok(summary)
}

/// Plugins in `config.storages` order.
fn select_plugins(
    config: &GenConfig,
    plugins: &[Arc<dyn StoragePlugin>],
) -> Result<Vec<Arc<dyn StoragePlugin>>, EngineError> {
    config
        .storages
        .iter()
        .map(|id| {
            plugins
                .iter()
                .find(|p| p.identifier() == id.as_str())
                .cloned()
                .ok_or_else(|| EngineError::Config(format!("unknown storage `{id}`")))
        })
        .collect()
}

/// `(type, topic)` pairs in catalog order, after the unruled-type policy.
fn build_corpus(
    config: &GenConfig,
    registry: &Registry,
    synth: &Synthesizer,
) -> Result<(Vec<(String, String)>, Vec<String>), EngineError> {
    let candidates = match &config.types {
        Some(names) => registry.select(names)?,
        None => registry.published(),
    };

    let mut corpus = Vec::with_capacity(candidates.len());
    let mut skipped = Vec::new();
    for (type_name, topic) in candidates {
        if synth.admit(type_name)? {
            corpus.push((type_name.to_string(), topic.to_string()));
        } else {
            skipped.push(type_name.to_string());
        }
    }
    Ok((corpus, skipped))
}

// ═══════════════════════════════════════════════════════════════
//  One artifact
// ═══════════════════════════════════════════════════════════════

fn write_artifact(job: &Job) -> Result<ArtifactSummary, EngineError> {
    let storage = job.plugin.identifier();
    let registry = job.synth.registry();
    let mut writer = BagWriter::create(&job.bag, job.plugin.as_ref(), job.options.clone())?;

    let mut connections = Vec::with_capacity(job.corpus.len());
    for (type_name, topic) in job.corpus.iter() {
        let definition = registry.message_definition(type_name)?;
        let id = writer.add_connection(topic, type_name, &definition)?;
        connections.push((id, type_name.as_str(), topic.as_str()));
    }

    let mut ordinal: u64 = 0;
    for _ in 0..job.repetitions {
        for &(id, type_name, topic) in &connections {
            let timestamp = ordinal
                .checked_mul(job.interval_ns)
                .and_then(|offset| job.base_ns.checked_add(offset))
                .ok_or_else(|| EngineError::Config(format!("record {ordinal} timestamp overflows u64")))?;

            let data = job
                .synth
                .synthesize(type_name)
                .and_then(|message| Ok(job.encoder.encode(&message, registry)?))
                .inspect_err(|e| tracing::error!(storage, type_name, topic, error = %e, "cannot produce record"))?;

            writer.write(id, timestamp, data)?;
            tracing::debug!(storage, topic, timestamp, "record written");
            ordinal += 1;
        }
    }

    let metadata = writer.close()?;
    drop(writer);

    let downgrade = match compat::downgrade(&job.bag.join(METADATA_FILE), job.target_version) {
        Ok(outcome) => Some(outcome),
        Err(e) if e.is_recoverable() => {
            tracing::warn!(bag = %job.bag.display(), error = %e, "downgrade skipped");
            None
        }
        Err(e) => return Err(e),
    };

    let info = metadata.info();
    Ok(ArtifactSummary {
        storage: storage.to_string(),
        bag: job.bag.clone(),
        message_count: info.message_count,
        topic_count: info.topics_with_message_count.len(),
        topic_counts: metadata
            .topic_counts()
            .into_iter()
            .map(|(topic, type_name, count)| (topic.to_string(), type_name.to_string(), count))
            .collect(),
        downgrade,
        verification: None,
        metadata,
    })
}

async fn verify_artifacts(summary: &mut GenerationSummary, options: &VerifyOptions) -> Result<(), EngineError> {
    for artifact in &mut summary.artifacts {
        let result = verify::verify_bag(&artifact.bag, options).await.and_then(|report| {
            match report.mismatch(&artifact.metadata) {
                Some(reason) => Err(EngineError::Verification { bag: artifact.bag.clone(), reason }),
                None => Ok(report),
            }
        });
        match result {
            Ok(report) => artifact.verification = Some(report),
            Err(EngineError::Verification { bag, reason }) => {
                tracing::warn!(bag = %bag.display(), reason, "verification failed");
                summary.verification_failures.push(VerificationFailure { bag, reason });
            }
            Err(e) => return Err(e),
        }
    }
    Ok(())
}
