//! Where list data comes from.
//!
//! A source always returns a complete [`Dataset`]; the list views replace their
//! items wholesale with whatever it returns.

use crate::entities::{Connector, PipelineRun, RunStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use color_eyre::eyre::{eyre, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Everything the dashboard lists, one collection per listing page.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Dataset {
    pub chatbots: Vec<PipelineRun>,
    pub agents: Vec<PipelineRun>,
    pub tasks: Vec<PipelineRun>,
    pub connectors: Vec<Connector>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.chatbots.len() + self.agents.len() + self.tasks.len() + self.connectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn parse_dataset(json: &str) -> Result<Dataset> {
    serde_json::from_str(json).map_err(|e| eyre!("Invalid dataset: {e}"))
}

#[async_trait]
pub trait ItemSource: Send + Sync {
    /// Human-readable origin, shown on the overview page.
    fn describe(&self) -> String;
    async fn fetch(&self) -> Result<Dataset>;
}

/// Reads a JSON dataset from disk on every fetch.
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ItemSource for JsonFileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<Dataset> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| eyre!("Failed to read {:?}: {e}", self.path))?;
        let dataset = parse_dataset(&text)?;
        tracing::debug!(path = ?self.path, items = dataset.len(), "dataset read");
        Ok(dataset)
    }
}

/// Built-in demo data for running without a backend.
pub struct SampleSource;

#[async_trait]
impl ItemSource for SampleSource {
    fn describe(&self) -> String {
        "built-in sample".to_string()
    }

    async fn fetch(&self) -> Result<Dataset> {
        Ok(sample_dataset())
    }
}

// 2024-06-01T09:00:00Z
const SAMPLE_EPOCH: i64 = 1_717_232_400;

const STATUS_CYCLE: [RunStatus; 7] = [
    RunStatus::Success,
    RunStatus::Success,
    RunStatus::Running,
    RunStatus::Failed,
    RunStatus::Success,
    RunStatus::Pending,
    RunStatus::Cancelled,
];

fn sample_runs(pipelines: &[&str], workflows: &[&str], count: usize, spacing_secs: i64) -> Vec<PipelineRun> {
    (0..count)
        .map(|i| {
            let step = i64::try_from(i).unwrap_or(i64::MAX);
            PipelineRun {
                pipeline: pipelines[i % pipelines.len()].to_string(),
                workflow: workflows[(i / pipelines.len()) % workflows.len()].to_string(),
                status: STATUS_CYCLE[i % STATUS_CYCLE.len()],
                timestamp: DateTime::<Utc>::from_timestamp(
                    SAMPLE_EPOCH.saturating_add(step.saturating_mul(spacing_secs)),
                    0,
                )
                .unwrap_or_default(),
                duration_secs: 7 + (i as u64 * 37) % 900,
            }
        })
        .collect()
}

fn sample_connector(name: &str, connector_type: &str, data: serde_json::Value) -> Connector {
    Connector {
        name: name.to_string(),
        connector_type: connector_type.to_string(),
        connector_data: match data {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        },
    }
}

/// Deterministic: the same call always yields the same data.
pub fn sample_dataset() -> Dataset {
    Dataset {
        chatbots: sample_runs(
            &["support-bot", "sales-assistant", "onboarding-guide"],
            &["answer", "escalate"],
            9,
            1_800,
        ),
        agents: sample_runs(
            &["researcher", "code-reviewer", "summarizer", "scheduler"],
            &["plan", "execute", "report"],
            16,
            2_700,
        ),
        tasks: sample_runs(
            &["ingest-docs", "embed-corpus", "nightly-eval", "sync-crm", "prune-index"],
            &["daily", "on-demand", "weekly"],
            30,
            900,
        ),
        connectors: vec![
            sample_connector(
                "Knowledge base",
                "chromadb",
                serde_json::json!({"host": "localhost", "port": 8000, "collection": "docs"}),
            ),
            sample_connector(
                "Ticket archive",
                "postgres",
                serde_json::json!({"host": "db.internal", "database": "tickets"}),
            ),
            sample_connector(
                "Team chat",
                "slack",
                serde_json::json!({"workspace": "craft", "channels": ["#support", "#ops"]}),
            ),
            sample_connector(
                "Product docs",
                "chromadb",
                serde_json::json!({"host": "vectors.internal", "port": 8000, "collection": "product"}),
            ),
            sample_connector("Web search", "http", serde_json::json!({"base_url": "https://search.example.com"})),
        ],
    }
}
