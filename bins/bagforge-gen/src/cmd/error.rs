use bagforge_api::error::PluginError;
use bagforge_engine::EngineError;

#[derive(Debug, thiserror::Error)]
pub enum GenError {
    #[error("{0}")]
    Config(String),

    #[error("{0}")]
    Plugin(#[from] PluginError),

    #[error("{0}")]
    Engine(#[from] EngineError),

    #[error("{0} bag(s) failed verification")]
    Unverified(usize),

    #[error("cannot write summary: {0}")]
    Output(#[from] serde_json::Error),
}
