//! Build pipeline for the Charon Sans font family.
//!
//! Drives the upstream generator, post-processes the raw TTFs for
//! distribution, and verifies the results.

pub mod io;
pub mod parallel;
pub mod pipeline;
pub mod plan;

pub use pipeline::{PipelineContext, build_plan};
pub use plan::{BuildPlan, parse_build_plans};
