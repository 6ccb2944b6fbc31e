//! Scrawl Core
//!
//! Transcript model, presenter contract, evaluator seam, and the REPL
//! controller shared by every Scrawl front-end.

pub mod controller;
pub mod presenter;
pub mod transcript;

pub use controller::{
    ControllerError, Evaluator, PendingEval, Progress, ReplController, Submission,
};
pub use presenter::Presenter;
pub use transcript::{Entry, Outcome, Transcript};
