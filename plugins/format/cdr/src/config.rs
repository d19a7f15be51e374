// ════════════════════════════════════════════════════════════════
//  Configuration
// ════════════════════════════════════════════════════════════════

/// Byte order of the CDR stream. Selects the encapsulation header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ByteOrder {
    /// `CDR_LE`, header `00 01 00 00`.
    #[default]
    Little,
    /// `CDR_BE`, header `00 00 00 00`.
    Big,
}

impl ByteOrder {
    pub(crate) fn header(self) -> [u8; 4] {
        match self {
            ByteOrder::Little => [0x00, 0x01, 0x00, 0x00],
            ByteOrder::Big => [0x00, 0x00, 0x00, 0x00],
        }
    }
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(default)]
pub struct CdrConfig {
    pub byte_order: ByteOrder,
}
