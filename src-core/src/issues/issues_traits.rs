use async_trait::async_trait;

use crate::errors::Result;
use crate::issues::issues_model::Issue;

/// Source of issue snapshots (remote tracker, exported file, fixtures).
///
/// Implementations normalize whatever shape they read into [`Issue`] and
/// validate it before returning; the forecast engine trusts its input.
#[async_trait]
pub trait IssueSupplierTrait: Send + Sync {
    async fn fetch_issues(&self) -> Result<Vec<Issue>>;

    /// Short description used in logs.
    fn describe(&self) -> String;
}
