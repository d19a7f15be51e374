use std::path::{Path, PathBuf};

use bagforge_engine::GenConfig;
use clap::Args;

use super::error::GenError;

const DEFAULT_CONFIG: &str = "bagforge.toml";

// ═══════════════════════════════════════════════════════════════
//  CLI args
// ═══════════════════════════════════════════════════════════════

#[derive(Args, Clone, Debug)]
pub struct GenArgs {
    /// Path to bagforge.toml
    #[arg(long, default_value = DEFAULT_CONFIG, env = "BAGFORGE_CONFIG")]
    pub config: String,

    /// Directory the bag directories are created in
    #[arg(long, short = 'o', env = "BAGFORGE_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Bag directory prefix
    #[arg(long)]
    pub prefix: Option<String>,

    /// Storage to write (repeatable): sqlite3, mcap
    #[arg(long = "storage")]
    pub storages: Vec<String>,

    /// Restrict the corpus to this type (repeatable), e.g. std_msgs/msg/Bool
    #[arg(long = "type")]
    pub types: Vec<String>,

    /// Passes over the connection list
    #[arg(long)]
    pub repetitions: Option<u32>,

    /// Metadata version after the downgrade
    #[arg(long)]
    pub target_version: Option<u32>,

    /// Offer the default publisher QoS on every topic
    #[arg(long)]
    pub offer_default_qos: bool,

    /// Run the inspector over each bag
    #[arg(long)]
    pub verify: bool,

    /// Shell snippet run before the inspector, e.g. ". /opt/ros/humble/setup.sh"
    #[arg(long, env = "BAGFORGE_VERIFY_SETUP")]
    pub verify_setup: Option<String>,

    /// Write one storage at a time
    #[arg(long)]
    pub sequential: bool,

    /// Print the published types and their topics, then exit
    #[arg(long)]
    pub list_types: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,
}

// ═══════════════════════════════════════════════════════════════
//  Effective: merged config
// ═══════════════════════════════════════════════════════════════

/// Final configuration: bagforge.toml < env/CLI.
pub struct Effective {
    pub config: GenConfig,
    pub list_types: bool,
    pub json: bool,
}

impl Effective {
    pub fn new(args: &GenArgs) -> Result<Self, GenError> {
        let mut config = if Path::new(&args.config).exists() {
            GenConfig::load(&args.config)?
        } else if args.config == DEFAULT_CONFIG {
            tracing::debug!(path = %args.config, "no config file, using defaults");
            GenConfig::default()
        } else {
            return Err(GenError::Config(format!("config file {} not found", args.config)));
        };

        if let Some(dir) = &args.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(prefix) = &args.prefix {
            config.bag_prefix = prefix.clone();
        }
        if !args.storages.is_empty() {
            config.storages = args.storages.clone();
        }
        if !args.types.is_empty() {
            config.types = Some(args.types.clone());
        }
        if let Some(n) = args.repetitions {
            config.repetitions = n;
        }
        if let Some(v) = args.target_version {
            config.target_version = v;
        }
        config.offer_default_qos |= args.offer_default_qos;
        config.verify.enabled |= args.verify;
        if let Some(setup) = &args.verify_setup {
            config.verify.setup = Some(setup.clone());
        }
        if args.sequential {
            config.parallel = false;
        }

        config.validate()?;
        Ok(Self { config, list_types: args.list_types, json: args.json })
    }
}
