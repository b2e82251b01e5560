pub mod burndown;
pub mod export;
pub mod forecast_model;
pub mod forecast_service;
pub mod sprint_stats;
pub mod velocity;

pub use burndown::build_burndown;
pub use export::{burndown_to_csv, velocity_to_csv, write_burndown_csv, write_velocity_csv};
pub use forecast_model::{
    BurndownPoint, DashboardSnapshot, ForecastSettings, SprintStats, VelocityPoint,
};
pub use forecast_service::ForecastService;
pub use sprint_stats::{compute_sprint_stats, series_start};
pub use velocity::build_velocity_series;
