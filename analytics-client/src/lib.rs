//! Client-side data layer for the thread-dump analytics service.
//!
//! Everything here is single-threaded: state machines are updated from one
//! task, and async drivers borrow them mutably across a fetch. Results for a
//! key that has since changed are dropped, never applied.

pub mod aggregate;
pub mod client;
pub mod comparison;
pub mod dashboard;
pub mod error;
pub mod fetch;
pub mod paginator;
pub mod panels;
pub mod selection;
pub mod summary;
pub mod upload;

/// In-memory transport for tests; enabled by the `testing` feature.
#[cfg(any(test, feature = "testing"))]
pub mod testing;

#[cfg(not(target_arch = "wasm32"))]
pub mod config;
#[cfg(not(target_arch = "wasm32"))]
pub mod http;

pub use aggregate::Aggregator;
pub use client::{AnalyticsClient, Endpoint, HttpRequest, HttpResponse, Transport, UploadOutcome};
pub use comparison::{ComparisonTable, RankedPool, ThreadStateRow};
pub use dashboard::DashboardState;
pub use error::{ApiError, SelectionError};
pub use fetch::{Applied, FetchState, FetchStatus, Query, Ticket};
pub use paginator::{PageOutcome, PageRequest, Paginator, PaginatorPhase, TraceKey};
pub use panels::{DrillDown, DrillKind, MinutePanel};
pub use selection::{AnalyticsView, MinutePicker, Panel, Selection, ViewController};
pub use summary::SummaryLoader;
pub use upload::{ConflictDecision, UploadAttempt, UploadFlow, UploadPhase};
