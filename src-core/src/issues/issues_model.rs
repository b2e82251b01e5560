use std::collections::BTreeSet;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    #[serde(alias = "OPEN")]
    Open,
    #[serde(alias = "CLOSED")]
    Closed,
}

/// Iteration an issue belongs to. Descriptive only; never used in forecasts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sprint {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

/// Immutable snapshot of one tracked issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: String,
    pub title: String,
    pub state: IssueState,
    #[serde(default)]
    pub story_points: f64,
    pub created_at: DateTime<Utc>,
    /// Present iff the issue is closed
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub labels: BTreeSet<String>,
    #[serde(default)]
    pub sprint: Option<Sprint>,
}

impl Issue {
    pub fn is_closed(&self) -> bool {
        self.state == IssueState::Closed
    }

    /// Calendar day the issue was created on, in the given offset.
    pub fn created_on(&self, offset: &FixedOffset) -> NaiveDate {
        self.created_at.with_timezone(offset).date_naive()
    }

    /// Calendar day the issue was closed on, in the given offset.
    pub fn closed_on(&self, offset: &FixedOffset) -> Option<NaiveDate> {
        self.closed_at
            .map(|closed_at| closed_at.with_timezone(offset).date_naive())
    }

    pub fn validate(&self) -> Result<()> {
        if self.story_points < 0.0 || self.story_points.is_nan() {
            return Err(ValidationError::NegativeStoryPoints {
                id: self.id.clone(),
                points: self.story_points,
            }
            .into());
        }

        match (self.state, self.closed_at) {
            (IssueState::Closed, None) => {
                Err(ValidationError::MissingClosedAt(self.id.clone()).into())
            }
            (IssueState::Open, Some(_)) => {
                Err(ValidationError::UnexpectedClosedAt(self.id.clone()).into())
            }
            (IssueState::Closed, Some(closed_at)) if closed_at < self.created_at => {
                Err(ValidationError::ClosedBeforeCreated(self.id.clone()).into())
            }
            _ => Ok(()),
        }
    }
}

/// Reject a snapshot containing any malformed issue.
pub fn validate_issues(issues: &[Issue]) -> Result<()> {
    issues.iter().try_for_each(Issue::validate)
}
