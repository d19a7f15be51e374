use std::collections::HashSet;
use std::path::{Path, PathBuf};

use bagforge_api::error::PluginError;
use bagforge_api::record::{BagRecord, Connection};
use bagforge_api::storage::StorageBackend;
use rusqlite::params;

/// rosbag2 sqlite3 schema version 4, as written by rosbags.
const SCHEMA: &str = r#"
CREATE TABLE schema(
    schema_version INTEGER PRIMARY KEY,
    ros_distro TEXT NOT NULL
);
CREATE TABLE metadata(
    id INTEGER PRIMARY KEY,
    metadata_version INTEGER NOT NULL,
    metadata TEXT NOT NULL
);
CREATE TABLE topics(
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    type TEXT NOT NULL,
    serialization_format TEXT NOT NULL,
    offered_qos_profiles TEXT NOT NULL,
    type_description_hash TEXT NOT NULL
);
CREATE TABLE message_definitions(
    id INTEGER PRIMARY KEY,
    topic_type TEXT NOT NULL,
    encoding TEXT NOT NULL,
    encoded_message_definition TEXT NOT NULL,
    type_description_hash TEXT NOT NULL
);
CREATE TABLE messages(
    id INTEGER PRIMARY KEY,
    topic_id INTEGER NOT NULL,
    timestamp INTEGER NOT NULL,
    data BLOB NOT NULL
);
CREATE INDEX timestamp_idx ON messages (timestamp ASC);
INSERT INTO schema(schema_version, ros_distro) VALUES (4, 'rosbags');
"#;

fn db(ctx: &'static str) -> impl Fn(rusqlite::Error) -> PluginError {
    move |e| PluginError::io(format!("sqlite {ctx}: {e}"))
}

// ════════════════════════════════════════════════════════════════
//  SqliteStorage
// ════════════════════════════════════════════════════════════════

/// Row-log backend: topics index table + `(topic_id, timestamp, data)` rows,
/// committed in transactions of `batch_size` rows.
pub struct SqliteStorage {
    path: PathBuf,
    conn: Option<rusqlite::Connection>,
    topics: HashSet<u32>,
    defined_types: HashSet<String>,
    pending: Vec<BagRecord>,
    batch_size: usize,
}

impl SqliteStorage {
    /// Create the database file and its schema. Fails if the file exists.
    pub fn create(path: &Path, batch_size: usize) -> Result<Self, PluginError> {
        if path.exists() {
            return Err(PluginError::io(format!("{} already exists", path.display())));
        }
        let conn = rusqlite::Connection::open(path).map_err(db("open"))?;
        conn.execute_batch(SCHEMA).map_err(db("create schema"))?;

        tracing::debug!(path = %path.display(), "sqlite storage created");
        Ok(Self {
            path: path.to_path_buf(),
            conn: Some(conn),
            topics: HashSet::new(),
            defined_types: HashSet::new(),
            pending: Vec::new(),
            batch_size: batch_size.max(1),
        })
    }

    fn conn(&self) -> Result<&rusqlite::Connection, PluginError> {
        self.conn
            .as_ref()
            .ok_or_else(|| PluginError::io(format!("{} is closed", self.path.display())))
    }

    /// Commit all pending rows in one transaction.
    fn flush(&mut self) -> Result<(), PluginError> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let conn = self
            .conn
            .as_mut()
            .ok_or_else(|| PluginError::io(format!("{} is closed", self.path.display())))?;

        let tx = conn.transaction().map_err(db("begin"))?;
        {
            let mut stmt = tx
                .prepare_cached("INSERT INTO messages(topic_id, timestamp, data) VALUES (?1, ?2, ?3)")
                .map_err(db("prepare insert"))?;
            for record in &self.pending {
                let ts = i64::try_from(record.timestamp).map_err(|_| {
                    PluginError::format(format!("timestamp {} exceeds INTEGER range", record.timestamp))
                })?;
                stmt.execute(params![record.connection_id, ts, record.data])
                    .map_err(db("insert message"))?;
            }
        }
        tx.commit().map_err(db("commit"))?;

        tracing::trace!(rows = self.pending.len(), "sqlite batch committed");
        self.pending.clear();
        Ok(())
    }
}

impl StorageBackend for SqliteStorage {
    fn add_connection(
        &mut self,
        connection: &Connection,
        offered_qos_profiles: &str,
    ) -> Result<(), PluginError> {
        if self.topics.contains(&connection.id) {
            return Err(PluginError::duplicate_connection(&connection.topic, &connection.type_name));
        }

        let conn = self.conn()?;
        if !self.defined_types.contains(&connection.type_name) {
            conn.execute(
                "INSERT INTO message_definitions(topic_type, encoding, encoded_message_definition, type_description_hash) \
                 VALUES (?1, 'ros2msg', ?2, ?3)",
                params![
                    connection.type_name,
                    connection.message_definition,
                    connection.type_description_hash
                ],
            )
            .map_err(db("insert message definition"))?;
        }
        conn.execute(
            "INSERT INTO topics(id, name, type, serialization_format, offered_qos_profiles, type_description_hash) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                connection.id,
                connection.topic,
                connection.type_name,
                connection.serialization_format,
                offered_qos_profiles,
                connection.type_description_hash
            ],
        )
        .map_err(db("insert topic"))?;

        self.defined_types.insert(connection.type_name.clone());
        self.topics.insert(connection.id);
        Ok(())
    }

    fn write(&mut self, record: BagRecord) -> Result<(), PluginError> {
        if !self.topics.contains(&record.connection_id) {
            return Err(PluginError::unknown_connection(record.connection_id));
        }
        if i64::try_from(record.timestamp).is_err() {
            return Err(PluginError::format(format!(
                "timestamp {} exceeds INTEGER range",
                record.timestamp
            )));
        }
        self.pending.push(record);
        if self.pending.len() >= self.batch_size {
            self.flush()?;
        }
        Ok(())
    }

    fn close(&mut self, version: u32, metadata_yaml: &str) -> Result<(), PluginError> {
        if self.conn.is_none() {
            return Ok(());
        }
        let flushed = self.flush();

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO metadata(metadata_version, metadata) VALUES (?1, ?2)",
            params![version, metadata_yaml],
        )
        .map_err(db("insert metadata"))?;

        if let Some(conn) = self.conn.take() {
            conn.close().map_err(|(_, e)| db("close")(e))?;
        }
        tracing::debug!(path = %self.path.display(), "sqlite storage closed");
        flushed
    }
}

#[cfg(test)]
mod tests {
    use bagforge_api::error::ErrorKind;

    use super::*;

    fn connection(id: u32, topic: &str) -> Connection {
        Connection {
            id,
            topic: topic.into(),
            type_name: "std_msgs/msg/Bool".into(),
            serialization_format: "cdr".into(),
            offered_qos_profiles: vec![],
            type_description_hash: String::new(),
            message_definition: "bool data".into(),
        }
    }

    fn record(id: u32, ts: u64) -> BagRecord {
        BagRecord { connection_id: id, timestamp: ts, data: vec![0, 1, 0, 0, 1] }
    }

    #[test]
    fn rows_topics_and_metadata_are_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bag.db3");
        let mut storage = SqliteStorage::create(&path, 2).unwrap();
        storage.add_connection(&connection(1, "/a"), "").unwrap();
        storage.add_connection(&connection(2, "/b"), "").unwrap();
        for ts in 1..=5 {
            storage.write(record(if ts % 2 == 0 { 2 } else { 1 }, ts)).unwrap();
        }
        storage.close(8, "meta: 1").unwrap();
        storage.close(8, "meta: 1").unwrap();

        let conn = rusqlite::Connection::open(&path).unwrap();
        let rows: i64 = conn.query_row("SELECT COUNT(*) FROM messages", [], |r| r.get(0)).unwrap();
        assert_eq!(rows, 5);
        let defs: i64 = conn
            .query_row("SELECT COUNT(*) FROM message_definitions", [], |r| r.get(0))
            .unwrap();
        assert_eq!(defs, 1);
        let (version, text): (i64, String) = conn
            .query_row("SELECT metadata_version, metadata FROM metadata", [], |r| Ok((r.get(0)?, r.get(1)?)))
            .unwrap();
        assert_eq!((version, text.as_str()), (8, "meta: 1"));
        let schema: i64 = conn.query_row("SELECT schema_version FROM schema", [], |r| r.get(0)).unwrap();
        assert_eq!(schema, 4);
    }

    #[test]
    fn contract_violations_carry_their_kind() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = SqliteStorage::create(&dir.path().join("bag.db3"), 100).unwrap();
        storage.add_connection(&connection(1, "/a"), "").unwrap();

        let err = storage.add_connection(&connection(1, "/a"), "").unwrap_err();
        assert_eq!(err.kind, ErrorKind::DuplicateConnection);
        let err = storage.write(record(9, 1)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnknownConnection);
    }

    #[test]
    fn out_of_range_timestamp_is_refused_and_earlier_rows_survive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bag.db3");
        let mut storage = SqliteStorage::create(&path, 100).unwrap();
        storage.add_connection(&connection(1, "/a"), "").unwrap();
        storage.write(record(1, 1)).unwrap();
        storage.write(record(1, 2)).unwrap();

        let err = storage.write(record(1, i64::MAX as u64 + 1)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Format);
        storage.close(8, "meta: 1").unwrap();

        let conn = rusqlite::Connection::open(&path).unwrap();
        let rows: i64 = conn.query_row("SELECT COUNT(*) FROM messages", [], |r| r.get(0)).unwrap();
        assert_eq!(rows, 2);
    }
}
