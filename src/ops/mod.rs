//! High-level operations.
//!
//! This module loads integration plans and turns umbrella targets into
//! reports. Unlike the engine in `aggregate`, it performs file I/O.

pub mod plan;
pub mod report;

pub use plan::{load_plan, parse_plan, IntegrationPlan, PlanError, PLAN_FILE_NAME};
pub use report::{build_report, host_warning, render_json, render_text, Report, TargetReport};
