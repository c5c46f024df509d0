//! Workflow state machine
//!
//! Sequences the steps from upload to download:
//! - Step definitions and the route table (which action leads where)
//! - Session data collected along the way
//! - The machine itself, which issues collaborator calls as tickets
//!   and applies their completions

mod machine;
mod session;
mod step;

pub use machine::*;
pub use session::*;
pub use step::*;
