//! Serialized evaluation worker.
//!
//! All evaluations for one session run on a single dedicated thread, one
//! at a time, in dispatch order. Serializing through one worker keeps the
//! shared scope single-threaded while the interactive thread stays free
//! during long evaluations. There is no cancellation: once dispatched, a
//! job runs until the interpreter returns or raises.

use std::sync::mpsc;
use std::thread;

use scrawl_core::{Evaluator, Outcome};

use crate::session::Session;

struct Job {
    code: String,
    reply: mpsc::Sender<Outcome>,
}

/// Front half of the evaluation worker.
///
/// Implements [`Evaluator`] for the REPL controller. The session itself
/// lives on the worker thread and is created lazily on the first dispatch,
/// so a screen that never evaluates anything never starts an interpreter.
#[derive(Default)]
pub struct SessionHandle {
    jobs: Option<mpsc::Sender<Job>>,
}

impl SessionHandle {
    pub fn new() -> Self {
        SessionHandle { jobs: None }
    }

    /// Drop the current session, if any. The worker drains its queue and
    /// exits; the next dispatch starts a fresh session with an empty scope.
    pub fn reset(&mut self) {
        self.jobs = None;
    }

    fn jobs(&mut self) -> &mpsc::Sender<Job> {
        self.jobs.get_or_insert_with(|| {
            let (tx, rx) = mpsc::channel::<Job>();
            thread::spawn(move || worker_loop(rx));
            tx
        })
    }
}

fn worker_loop(jobs: mpsc::Receiver<Job>) {
    let mut session = Session::new();
    for job in jobs {
        let outcome = match session.eval(&job.code) {
            Ok(Some(text)) => Outcome::Value(text),
            Ok(None) => Outcome::NoValue,
            Err(err) => Outcome::Value(err.to_string()),
        };
        // The receiver may already be gone (front-end shut down mid-eval).
        let _ = job.reply.send(outcome);
    }
}

impl Evaluator for SessionHandle {
    fn begin_eval(&mut self, code: &str) -> mpsc::Receiver<Outcome> {
        let (reply, outcome) = mpsc::channel();
        let job = Job {
            code: code.to_string(),
            reply,
        };
        if self.jobs().send(job).is_err() {
            // Worker died; respawn on the next dispatch. The returned
            // receiver reports the disconnect to the controller.
            self.jobs = None;
        }
        outcome
    }
}
