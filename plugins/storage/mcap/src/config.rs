// ════════════════════════════════════════════════════════════════
//  Configuration
// ════════════════════════════════════════════════════════════════

/// Chunk compression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum McapCompression {
    #[default]
    Zstd,
    Lz4,
    None,
}

impl McapCompression {
    pub(crate) fn to_mcap(self) -> Option<mcap::Compression> {
        match self {
            McapCompression::Zstd => Some(mcap::Compression::Zstd),
            McapCompression::Lz4 => Some(mcap::Compression::Lz4),
            McapCompression::None => None,
        }
    }
}

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default)]
pub struct McapConfig {
    pub compression: McapCompression,
    /// Target uncompressed chunk size in bytes.
    pub chunk_size: u64,
}

impl Default for McapConfig {
    fn default() -> Self {
        Self {
            compression: McapCompression::Zstd,
            chunk_size: 1024 * 1024,
        }
    }
}
