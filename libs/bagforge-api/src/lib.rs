pub mod error;
pub mod format;
pub mod metadata;
pub mod qos;
pub mod record;
pub mod schema;
pub mod storage;
pub mod value;
