//! Deterministic rosbag2 test-fixture generation: sample synthesis, bag
//! writing, metadata downgrade and external verification.

pub mod catalog;
pub mod compat;
pub mod config;
pub mod error;
pub mod generate;
pub mod rules;
pub mod synth;
pub mod verify;
pub mod writer;

pub use catalog::humble_registry;
pub use config::{GenConfig, UnruledPolicy, VerifyConfig};
pub use error::EngineError;
pub use generate::{ArtifactSummary, GenerationSummary, generate};
pub use synth::{Clock, FixedClock, Synthesizer, SystemClock};
pub use writer::{BagWriter, WriterOptions};
