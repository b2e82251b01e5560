//! Field resolution for GitHub Projects (v2) exports.
//!
//! Project items carry their story points, status and iteration as loosely
//! typed custom fields whose names differ between projects and locales. This
//! module maps them onto [`Issue`] once, at the supplier boundary.

use std::collections::BTreeSet;

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ValidationError};
use crate::issues::issues_model::{Issue, IssueState, Sprint};

const STORY_POINT_FIELD_NAMES: &[&str] = &["story points", "ストーリーポイント", "sp", "points", "point"];
const STATUS_FIELD_NAMES: &[&str] = &["status", "ステータス", "状態", "done", "completed", "完了"];
const DONE_STATUS_VALUES: &[&str] = &["done", "完了", "closed", "completed"];

const DEFAULT_STORY_POINTS: f64 = 1.0;
const DEFAULT_ITERATION_DAYS: u64 = 11;

const SINGLE_SELECT_VALUE: &str = "ProjectV2ItemFieldSingleSelectValue";
const ITERATION_VALUE: &str = "ProjectV2ItemFieldIterationValue";
const NUMBER_VALUE: &str = "ProjectV2ItemFieldNumberValue";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectData {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub items: Connection<ProjectItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection<T> {
    #[serde(default = "Vec::new")]
    pub nodes: Vec<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectItem {
    pub id: String,
    #[serde(default)]
    pub content: Option<ItemContent>,
    #[serde(default)]
    pub field_values: Option<Connection<FieldValue>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemContent {
    #[serde(rename = "__typename")]
    pub typename: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub labels: Option<Connection<LabelNode>>,
    #[serde(default)]
    pub assignees: Option<Connection<AssigneeNode>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelNode {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssigneeNode {
    pub login: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldValue {
    #[serde(rename = "__typename", default)]
    pub typename: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub duration: Option<u64>,
    #[serde(default)]
    pub number: Option<f64>,
    #[serde(default)]
    pub field: Option<FieldRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldRef {
    #[serde(default)]
    pub name: Option<String>,
}

impl ProjectData {
    /// Accepts either the full GraphQL response
    /// (`data.organization.projectV2`) or the bare project object.
    pub fn from_json(raw: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        let nested = value.pointer("/data/organization/projectV2").cloned();
        let project = if let Some(project) = nested {
            project
        } else if value.get("items").is_some() {
            value
        } else {
            return Err(
                ValidationError::InvalidInput("Project not found in snapshot".to_string()).into(),
            );
        };
        Ok(serde_json::from_value(project)?)
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    let haystack = haystack.to_lowercase();
    needles.iter().any(|needle| haystack.contains(needle))
}

impl FieldValue {
    fn field_name(&self) -> Option<&str> {
        self.field.as_ref().and_then(|f| f.name.as_deref())
    }

    fn is_status(&self) -> bool {
        self.typename == SINGLE_SELECT_VALUE
            && self.name.is_some()
            && (self.name.as_deref().is_some_and(|n| contains_any(n, STATUS_FIELD_NAMES))
                || self.field_name().is_some_and(|n| contains_any(n, STATUS_FIELD_NAMES)))
    }

    fn is_story_points(&self) -> bool {
        self.typename == NUMBER_VALUE
            && self
                .field_name()
                .is_some_and(|n| contains_any(n, STORY_POINT_FIELD_NAMES))
    }

    fn as_sprint(&self) -> Option<Sprint> {
        if self.typename != ITERATION_VALUE {
            return None;
        }
        let title = self.title.clone()?;
        let start = self.start_date?;
        let duration = self.duration.unwrap_or(DEFAULT_ITERATION_DAYS);
        Some(Sprint {
            id: title.clone(),
            title,
            start_date: Some(start),
            end_date: start.checked_add_days(Days::new(duration)),
        })
    }
}

/// Normalize project items into issues. Items that are neither issues nor
/// pull requests (draft notes, redacted content) are dropped, as are items
/// missing a creation timestamp. A done item
/// without a close timestamp is treated as closed at `now`.
pub fn normalize_project_items(project: &ProjectData, now: DateTime<Utc>) -> Vec<Issue> {
    project
        .items
        .nodes
        .iter()
        .filter_map(|item| normalize_item(item, now))
        .collect()
}

fn normalize_item(item: &ProjectItem, now: DateTime<Utc>) -> Option<Issue> {
    let content = item.content.as_ref()?;
    if content.typename != "Issue" && content.typename != "PullRequest" {
        return None;
    }
    let created_at = content.created_at?;
    let state = content.state.as_deref().unwrap_or_default();

    let fields: &[FieldValue] = item
        .field_values
        .as_ref()
        .map(|c| c.nodes.as_slice())
        .unwrap_or_default();

    let status = fields.iter().find(|f| f.is_status());
    let story_points = fields
        .iter()
        .find(|f| f.is_story_points())
        .and_then(|f| f.number)
        .unwrap_or(DEFAULT_STORY_POINTS);
    let sprint = fields.iter().find_map(FieldValue::as_sprint);

    let closed_by_state =
        state.eq_ignore_ascii_case("closed") || state.eq_ignore_ascii_case("merged");
    let done_by_status = status
        .and_then(|f| f.name.as_deref())
        .is_some_and(|n| contains_any(n, DONE_STATUS_VALUES));
    let is_done = closed_by_state || done_by_status;

    let closed_at = if is_done {
        Some(content.closed_at.unwrap_or(now).max(created_at))
    } else {
        None
    };

    Some(Issue {
        id: item.id.clone(),
        title: content.title.clone().unwrap_or_default(),
        state: if is_done {
            IssueState::Closed
        } else {
            IssueState::Open
        },
        story_points,
        created_at,
        closed_at,
        assignee: content
            .assignees
            .as_ref()
            .and_then(|a| a.nodes.first())
            .map(|a| a.login.clone()),
        labels: content
            .labels
            .as_ref()
            .map(|l| l.nodes.iter().map(|n| n.name.clone()).collect())
            .unwrap_or_else(BTreeSet::new),
        sprint,
    })
}
