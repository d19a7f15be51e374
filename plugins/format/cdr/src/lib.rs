mod config;
mod encoder;
mod writer;

pub use config::{ByteOrder, CdrConfig};
pub use encoder::CdrEncoder;
