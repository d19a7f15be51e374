//! Runs an external bag inspector over a finished artifact and checks its
//! report against the metadata the writer produced.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use bagforge_api::metadata::BagMetadata;
use serde::Serialize;
use tokio::process::Command;

use crate::config::VerifyConfig;
use crate::error::EngineError;

#[derive(Debug, Clone)]
pub struct VerifyOptions {
    /// Shell command template; `{bag}` is replaced by the quoted bag path.
    pub command: String,
    /// Run first, joined with `&&`.
    pub setup: Option<String>,
    pub timeout: Duration,
}

impl From<&VerifyConfig> for VerifyOptions {
    fn from(config: &VerifyConfig) -> Self {
        Self {
            command: config.command.clone(),
            setup: config.setup.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicReport {
    pub topic: String,
    pub type_name: String,
    pub count: u64,
    pub serialization_format: String,
}

/// What the inspector said about one bag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VerifyReport {
    pub topics: Vec<TopicReport>,
    pub total_messages: Option<u64>,
}

impl VerifyReport {
    pub fn matches(&self, metadata: &BagMetadata) -> bool {
        self.mismatch(metadata).is_none()
    }

    /// First disagreement between the report and `metadata`, if any.
    ///
    /// An empty report (inspector printed nothing parseable) matches anything.
    pub fn mismatch(&self, metadata: &BagMetadata) -> Option<String> {
        let info = metadata.info();
        if let Some(total) = self.total_messages {
            if total != info.message_count {
                return Some(format!("reported {total} messages, metadata has {}", info.message_count));
            }
        }
        if self.topics.is_empty() {
            return None;
        }

        let mut expected: Vec<(&str, &str, u64)> = metadata.topic_counts();
        let mut reported: Vec<(&str, &str, u64)> = self
            .topics
            .iter()
            .map(|t| (t.topic.as_str(), t.type_name.as_str(), t.count))
            .collect();
        expected.sort_unstable();
        reported.sort_unstable();
        if expected.len() != reported.len() {
            return Some(format!("reported {} topics, metadata has {}", reported.len(), expected.len()));
        }
        expected
            .iter()
            .zip(&reported)
            .find(|(e, r)| e != r)
            .map(|(e, r)| format!("topic {} ({}) count {}: reported {} ({}) count {}", e.0, e.1, e.2, r.0, r.1, r.2))
    }
}

/// Parse `ros2 bag info` style output.
///
/// Reads the `Messages:` total (else the sum of counts) and every `Topic: … | Type: … | Count: … |
/// Serialization Format: …` line; everything else is ignored.
pub fn parse_info_report(stdout: &str) -> VerifyReport {
    let mut report = VerifyReport::default();
    for line in stdout.lines() {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix("Messages:") {
            report.total_messages = rest.trim().parse().ok();
            continue;
        }
        let Some(start) = line.find("Topic:") else { continue };
        if let Some(topic) = parse_topic_line(&line[start..]) {
            report.topics.push(topic);
        }
    }
    if report.total_messages.is_none() && !report.topics.is_empty() {
        report.total_messages = Some(report.topics.iter().map(|t| t.count).sum());
    }
    report
}

fn parse_topic_line(line: &str) -> Option<TopicReport> {
    let mut topic = None;
    let mut type_name = None;
    let mut count = None;
    let mut format = String::new();
    for field in line.split('|') {
        let (key, value) = field.split_once(':')?;
        let value = value.trim();
        match key.trim() {
            "Topic" => topic = Some(value.to_string()),
            "Type" => type_name = Some(value.to_string()),
            "Count" => count = value.parse().ok(),
            "Serialization Format" => format = value.to_string(),
            _ => {}
        }
    }
    Some(TopicReport {
        topic: topic?,
        type_name: type_name?,
        count: count?,
        serialization_format: format,
    })
}

/// Single-quote `path` for `sh`.
fn shell_quote(path: &Path) -> String {
    format!("'{}'", path.to_string_lossy().replace('\'', r"'\''"))
}

fn script_for(bag: &Path, options: &VerifyOptions) -> String {
    let command = options.command.replace("{bag}", &shell_quote(bag));
    match &options.setup {
        Some(setup) => format!("{setup} && {command}"),
        None => command,
    }
}

/// Run the inspector on `bag` under `sh -c`.
///
/// A non-zero exit, a spawn failure and a timeout are all `Verification`
/// errors; a timed-out child is killed.
pub async fn verify_bag(bag: &Path, options: &VerifyOptions) -> Result<VerifyReport, EngineError> {
    let script = script_for(bag, options);
    let fail = |reason: String| EngineError::Verification { bag: PathBuf::from(bag), reason };

    tracing::debug!(bag = %bag.display(), script, "running inspector");
    let child = Command::new("sh")
        .arg("-c")
        .arg(&script)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| fail(format!("cannot spawn sh: {e}")))?;

    let output = match tokio::time::timeout(options.timeout, child.wait_with_output()).await {
        Ok(result) => result.map_err(|e| fail(format!("inspector i/o: {e}")))?,
        Err(_) => return Err(fail(format!("timed out after {:?}", options.timeout))),
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(fail(format!("{}: {}", output.status, stderr.trim())));
    }

    let report = parse_info_report(&String::from_utf8_lossy(&output.stdout));
    tracing::info!(bag = %bag.display(), topics = report.topics.len(), "inspector passed");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    const INFO: &str = "
Files:             test_bag_sqlite3.db3
Bag size:          52.0 KiB
Storage id:        sqlite3
Duration:          0.100000000s
Messages:          3
Topic information: Topic: /test/std_msgs/bool | Type: std_msgs/msg/Bool | Count: 2 | Serialization Format: cdr
                   Topic: /test/std_msgs/empty | Type: std_msgs/msg/Empty | Count: 1 | Serialization Format: cdr
";

    #[test]
    fn info_output_parses() {
        let report = parse_info_report(INFO);
        assert_eq!(report.total_messages, Some(3));
        assert_eq!(report.topics.len(), 2);
        assert_eq!(
            report.topics[1],
            TopicReport {
                topic: "/test/std_msgs/empty".into(),
                type_name: "std_msgs/msg/Empty".into(),
                count: 1,
                serialization_format: "cdr".into(),
            }
        );
    }

    #[test]
    fn total_falls_back_to_topic_sum() {
        let report = parse_info_report(&INFO.replace("Messages:          3\n", ""));
        assert_eq!(report.total_messages, Some(3));
    }

    #[test]
    fn unrelated_lines_are_ignored() {
        let report = parse_info_report("hello\nTopic: broken\n");
        assert_eq!(report, VerifyReport::default());
    }

    #[test]
    fn bag_path_is_quoted_and_setup_prepended() {
        let options = VerifyOptions {
            command: "ros2 bag info {bag}".into(),
            setup: Some(". /opt/ros/humble/setup.sh".into()),
            timeout: Duration::from_secs(1),
        };
        let script = script_for(Path::new("/tmp/it's here"), &options);
        assert_eq!(script, r". /opt/ros/humble/setup.sh && ros2 bag info '/tmp/it'\''s here'");
    }
}
