// ════════════════════════════════════════════════════════════════
//  Configuration
// ════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default)]
pub struct SqliteConfig {
    /// Rows buffered before a transaction is committed.
    pub batch_size: usize,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self { batch_size: 100 }
    }
}
