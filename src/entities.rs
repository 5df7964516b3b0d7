//! Listable records shown by the dashboard tables.
//!
//! Every record kind names its attributes through a closed [`Field`] enum, so a
//! sort key is checked once when it is parsed instead of being looked up by name
//! on every comparison.

use chrono::{DateTime, Utc};
use color_eyre::eyre::{eyre, Report, Result};
use serde::Deserialize;
use std::fmt::Debug;
use std::hash::Hash;
use std::str::FromStr;

/// Format a duration in seconds into a human-readable string (e.g. "2m 5s").
pub fn format_duration(secs: u64) -> String {
    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}

/// A closed set of named attributes of one record kind.
pub trait Field: Copy + Eq + Hash + Debug + FromStr<Err = Report> + 'static {
    /// Every attribute, in column order.
    const ALL: &'static [Self];

    /// Machine name, as accepted by `FromStr`.
    fn name(self) -> &'static str;

    /// Column header.
    fn label(self) -> &'static str;
}

/// Resolve an attribute by its machine name.
pub fn field_from_name<F: Field>(name: &str) -> Result<F> {
    F::ALL
        .iter()
        .copied()
        .find(|f| f.name() == name)
        .ok_or_else(|| {
            let known: Vec<&str> = F::ALL.iter().map(|f| f.name()).collect();
            eyre!("Unknown sort key '{name}' (expected one of: {})", known.join(", "))
        })
}

/// A record that can be listed, sorted and searched.
pub trait Listable: Clone {
    type Field: Field;

    /// Textual representation of one attribute.
    fn field_text(&self, field: Self::Field) -> String;

    /// Short name for dialogs.
    fn title(&self) -> String;

    /// Attributes consulted by the default search.
    fn searchable_fields() -> &'static [Self::Field] {
        <Self::Field as Field>::ALL
    }

    /// `query` is already lowercased and non-empty.
    fn matches_search(&self, query: &str) -> bool {
        Self::searchable_fields()
            .iter()
            .any(|&field| self.field_text(field).to_lowercase().contains(query))
    }

    /// Label/value pairs for the detail dialog.
    fn detail_lines(&self) -> Vec<(String, String)> {
        <Self::Field as Field>::ALL
            .iter()
            .map(|&field| (field.label().to_string(), self.field_text(field)))
            .collect()
    }
}

// ── Pipeline runs (chat-bots, agents, tasks) ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Success,
    Failed,
    Running,
    Pending,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    pub const ALL: [RunStatus; 6] = [
        RunStatus::Success,
        RunStatus::Failed,
        RunStatus::Running,
        RunStatus::Pending,
        RunStatus::Cancelled,
        RunStatus::Unknown,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::Success => "success",
            RunStatus::Failed => "failed",
            RunStatus::Running => "running",
            RunStatus::Pending => "pending",
            RunStatus::Cancelled => "cancelled",
            RunStatus::Unknown => "unknown",
        }
    }

    pub fn is_active(self) -> bool {
        matches!(self, RunStatus::Running | RunStatus::Pending)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PipelineRun {
    pub pipeline: String,
    pub workflow: String,
    pub status: RunStatus,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "duration")]
    pub duration_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunField {
    Pipeline,
    Workflow,
    Status,
    Timestamp,
    Duration,
}

impl Field for RunField {
    const ALL: &'static [Self] = &[
        RunField::Pipeline,
        RunField::Workflow,
        RunField::Status,
        RunField::Timestamp,
        RunField::Duration,
    ];

    fn name(self) -> &'static str {
        match self {
            RunField::Pipeline => "pipeline",
            RunField::Workflow => "workflow",
            RunField::Status => "status",
            RunField::Timestamp => "timestamp",
            RunField::Duration => "duration",
        }
    }

    fn label(self) -> &'static str {
        match self {
            RunField::Pipeline => "Pipeline",
            RunField::Workflow => "Workflow",
            RunField::Status => "Status",
            RunField::Timestamp => "Timestamp",
            RunField::Duration => "Duration",
        }
    }
}

impl FromStr for RunField {
    type Err = Report;

    fn from_str(s: &str) -> Result<Self> {
        field_from_name(s)
    }
}

impl Listable for PipelineRun {
    type Field = RunField;

    fn field_text(&self, field: RunField) -> String {
        match field {
            RunField::Pipeline => self.pipeline.clone(),
            RunField::Workflow => self.workflow.clone(),
            RunField::Status => self.status.as_str().to_string(),
            RunField::Timestamp => self.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            RunField::Duration => format_duration(self.duration_secs),
        }
    }

    fn title(&self) -> String {
        format!("{} / {}", self.pipeline, self.workflow)
    }
}

// ── Connectors ──

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Connector {
    pub name: String,
    #[serde(rename = "type")]
    pub connector_type: String,
    #[serde(default, rename = "data")]
    pub connector_data: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectorField {
    Name,
    ConnectorType,
}

impl Field for ConnectorField {
    const ALL: &'static [Self] = &[ConnectorField::Name, ConnectorField::ConnectorType];

    fn name(self) -> &'static str {
        match self {
            ConnectorField::Name => "name",
            ConnectorField::ConnectorType => "connector_type",
        }
    }

    fn label(self) -> &'static str {
        match self {
            ConnectorField::Name => "Name",
            ConnectorField::ConnectorType => "Type",
        }
    }
}

impl FromStr for ConnectorField {
    type Err = Report;

    fn from_str(s: &str) -> Result<Self> {
        field_from_name(s)
    }
}

impl Listable for Connector {
    type Field = ConnectorField;

    fn field_text(&self, field: ConnectorField) -> String {
        match field {
            ConnectorField::Name => self.name.clone(),
            ConnectorField::ConnectorType => self.connector_type.clone(),
        }
    }

    fn title(&self) -> String {
        self.name.clone()
    }

    // Connector data may hold hostnames and credentials; only name and type are searchable.
    fn matches_search(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(query)
            || self.connector_type.to_lowercase().contains(query)
    }

    fn detail_lines(&self) -> Vec<(String, String)> {
        let mut lines = vec![
            ("Name".to_string(), self.name.clone()),
            ("Type".to_string(), self.connector_type.clone()),
        ];
        for (key, value) in &self.connector_data {
            let text = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            lines.push((key.clone(), text));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(pipeline: &str, status: RunStatus, duration_secs: u64) -> PipelineRun {
        PipelineRun {
            pipeline: pipeline.to_string(),
            workflow: "Nightly".to_string(),
            status,
            timestamp: DateTime::from_timestamp(1_717_236_000, 0).unwrap(),
            duration_secs,
        }
    }

    fn connector(name: &str, kind: &str) -> Connector {
        let mut data = serde_json::Map::new();
        data.insert("host".to_string(), serde_json::json!("vectors.internal"));
        data.insert("port".to_string(), serde_json::json!(8000));
        Connector {
            name: name.to_string(),
            connector_type: kind.to_string(),
            connector_data: data,
        }
    }

    #[test]
    fn duration_formats() {
        assert_eq!(format_duration(0), "0s");
        assert_eq!(format_duration(59), "59s");
        assert_eq!(format_duration(125), "2m 5s");
        assert_eq!(format_duration(3720), "1h 2m");
    }

    #[test]
    fn run_field_parses_known_names() {
        assert_eq!("pipeline".parse::<RunField>().unwrap(), RunField::Pipeline);
        assert_eq!("duration".parse::<RunField>().unwrap(), RunField::Duration);
    }

    #[test]
    fn run_field_rejects_unknown_name() {
        let err = "owner".parse::<RunField>().unwrap_err();
        assert!(err.to_string().contains("owner"));
        assert!(err.to_string().contains("pipeline"));
    }

    #[test]
    fn field_names_round_trip() {
        for &f in RunField::ALL {
            assert_eq!(f.name().parse::<RunField>().unwrap(), f);
        }
        for &f in ConnectorField::ALL {
            assert_eq!(f.name().parse::<ConnectorField>().unwrap(), f);
        }
    }

    #[test]
    fn run_field_text() {
        let r = run("ingest", RunStatus::Failed, 125);
        assert_eq!(r.field_text(RunField::Status), "failed");
        assert_eq!(r.field_text(RunField::Timestamp), "2024-06-01 10:00:00");
        assert_eq!(r.field_text(RunField::Duration), "2m 5s");
    }

    #[test]
    fn run_search_covers_every_attribute() {
        let r = run("Ingest", RunStatus::Running, 125);
        assert!(r.matches_search("ingest"));
        assert!(r.matches_search("nightly"));
        assert!(r.matches_search("running"));
        assert!(r.matches_search("2024-06"));
        assert!(r.matches_search("2m"));
        assert!(!r.matches_search("deploy"));
    }

    #[test]
    fn connector_search_uses_name_and_type_only() {
        let c = connector("Docs store", "chromadb");
        assert!(c.matches_search("docs"));
        assert!(c.matches_search("chroma"));
        assert!(!c.matches_search("vectors"));
    }

    #[test]
    fn connector_detail_includes_data() {
        let c = connector("Docs store", "chromadb");
        let lines = c.detail_lines();
        assert_eq!(lines[0], ("Name".to_string(), "Docs store".to_string()));
        assert!(lines.contains(&("host".to_string(), "vectors.internal".to_string())));
        assert!(lines.contains(&("port".to_string(), "8000".to_string())));
    }

    #[test]
    fn unknown_status_deserializes() {
        let json = r#"{"pipeline":"p","workflow":"w","status":"exploded","timestamp":"2024-06-01T10:00:00Z","duration":3}"#;
        let r: PipelineRun = serde_json::from_str(json).unwrap();
        assert_eq!(r.status, RunStatus::Unknown);
        assert_eq!(r.duration_secs, 3);
    }

    #[test]
    fn active_statuses() {
        assert!(RunStatus::Running.is_active());
        assert!(RunStatus::Pending.is_active());
        assert!(!RunStatus::Success.is_active());
        assert!(!RunStatus::Unknown.is_active());
    }
}
