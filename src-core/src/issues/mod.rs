pub mod issues_filter;
pub mod issues_model;
pub mod issues_supplier;
pub mod issues_traits;
pub mod project_items;

pub use issues_filter::{extract_assignees, extract_sprints, IssueFilter};
pub use issues_model::{validate_issues, Issue, IssueState, Sprint};
pub use issues_supplier::{IssueSourceFormat, JsonFileIssueSupplier, StaticIssueSupplier};
pub use issues_traits::IssueSupplierTrait;
pub use project_items::{normalize_project_items, ProjectData};
