//! Submission sequencing: append a pending entry, hand the snippet to the
//! evaluator, resolve the entry in place when the outcome comes back.
//!
//! `submit` never blocks on evaluation. It appends the entry, fires the
//! insert notification, dispatches the snippet, and returns a
//! [`PendingEval`] handle. The front-end decides when to wait on that
//! handle ([`ReplController::complete`]) or poll it
//! ([`ReplController::try_complete`]), which keeps the interactive thread
//! free while the interpreter runs.

use std::sync::mpsc;

use crate::presenter::Presenter;
use crate::transcript::{Entry, Outcome, Transcript};

/// Dispatches evaluations without blocking the caller.
///
/// The returned channel delivers the terminal outcome exactly once. How
/// the work is scheduled is the implementor's business; the controller
/// only requires that dispatch itself returns immediately.
pub trait Evaluator {
    fn begin_eval(&mut self, code: &str) -> mpsc::Receiver<Outcome>;
}

/// Handle to one in-flight evaluation, tied to a fixed transcript index.
#[derive(Debug)]
pub struct PendingEval {
    index: usize,
    outcome: mpsc::Receiver<Outcome>,
}

impl PendingEval {
    /// Index of the transcript entry this evaluation will resolve.
    pub fn index(&self) -> usize {
        self.index
    }
}

/// What [`ReplController::submit`] did with the raw text.
#[derive(Debug)]
pub enum Submission {
    /// Empty or all-whitespace input: no entry was created.
    Ignored,
    /// An entry was appended and its evaluation dispatched.
    Accepted(PendingEval),
}

/// Result of a non-blocking completion attempt.
#[derive(Debug)]
pub enum Progress {
    /// The entry at this index resolved and its row update fired.
    Done(usize),
    /// Still evaluating; the handle comes back for a later attempt.
    StillPending(PendingEval),
}

#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    /// The evaluator hung up without delivering an outcome.
    #[error("evaluator shut down before entry {0} finished")]
    EvaluatorGone(usize),
}

/// Sequences the submit → evaluate → resolve lifecycle over an append-only
/// transcript.
///
/// The controller exclusively owns the transcript, the evaluator handle,
/// and the presenter. Per submitted entry it fires exactly one
/// `row_inserted` (synchronously, in submission order) and at most one
/// `row_updated` (in completion order), each scoped to that entry's own
/// fixed index; concurrent pending evaluations never touch each other's
/// rows.
pub struct ReplController<E, P> {
    transcript: Transcript,
    evaluator: E,
    presenter: P,
}

impl<E: Evaluator, P: Presenter> ReplController<E, P> {
    pub fn new(evaluator: E, presenter: P) -> Self {
        ReplController {
            transcript: Transcript::new(),
            evaluator,
            presenter,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn evaluator_mut(&mut self) -> &mut E {
        &mut self.evaluator
    }

    /// Handle one raw submission.
    ///
    /// Whitespace-only input creates nothing; the last entry, if any, is
    /// scrolled back into view. Anything else is stored verbatim as a
    /// pending entry at the transcript's current length and handed to the
    /// evaluator.
    pub fn submit(&mut self, raw: &str) -> Submission {
        if raw.trim().is_empty() {
            if let Some(last) = self.transcript.len().checked_sub(1) {
                self.presenter.scroll_to(last);
            }
            return Submission::Ignored;
        }

        let index = self.transcript.push(Entry::pending(raw));
        self.presenter.row_inserted(index, self.transcript.at(index));
        self.presenter.scroll_to(index);

        let outcome = self.evaluator.begin_eval(raw);
        Submission::Accepted(PendingEval { index, outcome })
    }

    /// Block until the evaluation finishes, then resolve its entry and
    /// fire the row update. Returns the entry's index.
    pub fn complete(&mut self, pending: PendingEval) -> Result<usize, ControllerError> {
        let PendingEval { index, outcome } = pending;
        let outcome = outcome
            .recv()
            .map_err(|_| ControllerError::EvaluatorGone(index))?;
        self.apply(index, outcome);
        Ok(index)
    }

    /// Non-blocking variant of [`ReplController::complete`].
    pub fn try_complete(&mut self, pending: PendingEval) -> Result<Progress, ControllerError> {
        match pending.outcome.try_recv() {
            Ok(outcome) => {
                let index = pending.index;
                self.apply(index, outcome);
                Ok(Progress::Done(index))
            }
            Err(mpsc::TryRecvError::Empty) => Ok(Progress::StillPending(pending)),
            Err(mpsc::TryRecvError::Disconnected) => {
                Err(ControllerError::EvaluatorGone(pending.index))
            }
        }
    }

    fn apply(&mut self, index: usize, outcome: Outcome) {
        self.transcript.resolve(index, outcome);
        self.presenter.row_updated(index, self.transcript.at(index));
    }
}
