//! Quiz session state.
//!
//! [`SessionState`] owns navigation, selections and submission for one
//! attempt; [`review`] derives the read-only result projection from it.

mod review;
mod state;

pub use review::{derive_review, ResultSummary, ReviewEntry};
pub use state::{AnswerRecord, Rejection, SessionState, SessionStatus, Transition};
