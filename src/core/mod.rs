//! Core components of the crew execution system
//!
//! This module contains:
//! - Agent and task definitions
//! - Dependency graph validation
//! - The sequential pipeline and its crew memory
//! - Extraction of the final artifact

mod agent;
mod dag;
mod extractor;
mod memory;
mod pipeline;
mod task;
mod task_context;
mod task_state;

pub use agent::*;
pub use extractor::*;
pub use pipeline::*;
pub use task::*;
