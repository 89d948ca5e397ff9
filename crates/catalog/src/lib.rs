//! Catalog domain module: the job descriptions a company can be billed for.
//!
//! Each company keeps its own ordered list of job templates; invoice lines
//! reference a template and only store text that deviates from it.

pub mod job;

pub use job::{APPEND_SORT_ORDER, JobDescription, JobDescriptionId};
