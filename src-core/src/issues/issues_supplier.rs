use std::path::{Path, PathBuf};
use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result, ValidationError};
use crate::issues::issues_model::{validate_issues, Issue};
use crate::issues::issues_traits::IssueSupplierTrait;
use crate::issues::project_items::{normalize_project_items, ProjectData};

/// Layout of a snapshot file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueSourceFormat {
    /// A JSON array of already normalized issues
    #[default]
    Issues,
    /// A GitHub Projects (v2) export, raw GraphQL response or bare project
    GithubProject,
}

impl FromStr for IssueSourceFormat {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "issues" => Ok(IssueSourceFormat::Issues),
            "github-project" | "github" => Ok(IssueSourceFormat::GithubProject),
            other => Err(ValidationError::InvalidInput(format!(
                "Unknown issue source format '{}', expected 'issues' or 'github-project'",
                other
            ))),
        }
    }
}

/// Reads an issue snapshot from a JSON file on every fetch.
#[derive(Debug, Clone)]
pub struct JsonFileIssueSupplier {
    path: PathBuf,
    format: IssueSourceFormat,
}

impl JsonFileIssueSupplier {
    pub fn new(path: impl Into<PathBuf>, format: IssueSourceFormat) -> Self {
        JsonFileIssueSupplier {
            path: path.into(),
            format,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse snapshot text in the configured format and validate it.
    pub fn parse(&self, raw: &str) -> Result<Vec<Issue>> {
        let issues = match self.format {
            IssueSourceFormat::Issues => serde_json::from_str::<Vec<Issue>>(raw)?,
            IssueSourceFormat::GithubProject => {
                let project = ProjectData::from_json(raw)?;
                log::debug!(
                    "Normalizing {} items of project '{}'",
                    project.items.nodes.len(),
                    project.title
                );
                normalize_project_items(&project, Utc::now())
            }
        };
        validate_issues(&issues)?;
        Ok(issues)
    }
}

#[async_trait]
impl IssueSupplierTrait for JsonFileIssueSupplier {
    async fn fetch_issues(&self) -> Result<Vec<Issue>> {
        let raw = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            Error::Supplier(format!("Failed to read {}: {}", self.path.display(), e))
        })?;
        let issues = self.parse(&raw)?;
        log::info!("Loaded {} issues from {}", issues.len(), self.path.display());
        Ok(issues)
    }

    fn describe(&self) -> String {
        format!("file:{} ({:?})", self.path.display(), self.format)
    }
}

/// Fixed in-memory snapshot, handy for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticIssueSupplier {
    issues: Vec<Issue>,
}

impl StaticIssueSupplier {
    pub fn new(issues: Vec<Issue>) -> Self {
        StaticIssueSupplier { issues }
    }
}

#[async_trait]
impl IssueSupplierTrait for StaticIssueSupplier {
    async fn fetch_issues(&self) -> Result<Vec<Issue>> {
        validate_issues(&self.issues)?;
        Ok(self.issues.clone())
    }

    fn describe(&self) -> String {
        format!("static ({} issues)", self.issues.len())
    }
}
