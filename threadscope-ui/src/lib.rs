pub mod analytics;
pub mod api;
pub mod components;
pub mod dashboard;
pub mod interop;
pub mod launch;
pub mod palette;
pub mod panels;
pub mod traces;

pub use analytics::AnalyticsPage;
pub use components::*;
pub use dashboard::DashboardPage;
pub use launch::LaunchPage;
