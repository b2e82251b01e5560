use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::issues::issues_model::{Issue, Sprint};

/// Selection criteria applied to a snapshot before forecasting.
///
/// A `None` criterion (or the literal `"all"`) matches every issue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueFilter {
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub sprint: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
}

fn criterion(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
}

impl IssueFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    pub fn with_sprint(mut self, sprint: impl Into<String>) -> Self {
        self.sprint = Some(sprint.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn is_unfiltered(&self) -> bool {
        criterion(&self.assignee).is_none()
            && criterion(&self.sprint).is_none()
            && criterion(&self.label).is_none()
    }

    pub fn matches(&self, issue: &Issue) -> bool {
        if let Some(assignee) = criterion(&self.assignee) {
            if issue.assignee.as_deref() != Some(assignee) {
                return false;
            }
        }
        if let Some(sprint) = criterion(&self.sprint) {
            match &issue.sprint {
                Some(s) if s.title == sprint || s.id == sprint => {}
                _ => return false,
            }
        }
        if let Some(label) = criterion(&self.label) {
            if !issue.labels.contains(label) {
                return false;
            }
        }
        true
    }

    pub fn apply(&self, issues: &[Issue]) -> Vec<Issue> {
        issues
            .iter()
            .filter(|issue| self.matches(issue))
            .cloned()
            .collect()
    }
}

/// Distinct sprints referenced by the issues, ordered by start date.
/// Sprints without a start date sort last.
pub fn extract_sprints(issues: &[Issue]) -> Vec<Sprint> {
    let by_id: BTreeMap<&str, &Sprint> = issues
        .iter()
        .filter_map(|issue| issue.sprint.as_ref())
        .map(|sprint| (sprint.id.as_str(), sprint))
        .collect();

    let mut sprints: Vec<Sprint> = by_id.into_values().cloned().collect();
    sprints.sort_by(|a, b| match (a.start_date, b.start_date) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.title.cmp(&b.title)),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.title.cmp(&b.title),
    });
    sprints
}

/// Distinct assignee logins, sorted.
pub fn extract_assignees(issues: &[Issue]) -> Vec<String> {
    issues
        .iter()
        .filter_map(|issue| issue.assignee.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
