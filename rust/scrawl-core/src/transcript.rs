//! Append-only transcript of submitted snippets and their outcomes.
//!
//! The transcript is the single source of truth for what the user typed and
//! what the interpreter said back. Entries land at a stable index and never
//! move; the only mutation allowed after insertion is the one-time
//! transition of an entry's outcome out of [`Outcome::Pending`].

use serde::{Deserialize, Serialize};

/// In-flight or terminal state of one evaluation.
///
/// `Pending` and `NoValue` are distinct states: a pending entry is still
/// being evaluated, while a `NoValue` entry finished and simply produced
/// nothing displayable (the interpreter's unit value).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "text", rename_all = "snake_case")]
pub enum Outcome {
    /// Evaluation dispatched but not finished.
    Pending,
    /// Finished with a displayable textual representation. Interpreter
    /// error messages land here too and render exactly like results.
    Value(String),
    /// Finished with nothing to display.
    NoValue,
}

impl Outcome {
    pub fn is_pending(&self) -> bool {
        matches!(self, Outcome::Pending)
    }
}

/// One transcript entry: a submitted snippet plus its (possibly pending)
/// rendered outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Submitted source text, verbatim. Never empty or all-whitespace.
    pub code: String,
    /// Evaluation outcome. Leaves `Pending` exactly once.
    pub outcome: Outcome,
}

impl Entry {
    /// A freshly-submitted entry awaiting evaluation.
    pub fn pending(code: impl Into<String>) -> Self {
        Entry {
            code: code.into(),
            outcome: Outcome::Pending,
        }
    }

    /// The rendered transcript line: `code = result` when there is a
    /// displayable result, the bare code otherwise.
    pub fn display_line(&self) -> String {
        match &self.outcome {
            Outcome::Value(result) => format!("{} = {}", self.code, result),
            Outcome::Pending | Outcome::NoValue => self.code.clone(),
        }
    }
}

/// Ordered, append-only sequence of [`Entry`] values.
///
/// Length only grows and indices are stable, so a presenter may address
/// rows by the index it was handed at insertion time for the rest of the
/// session.
#[derive(Debug, Default)]
pub struct Transcript {
    entries: Vec<Entry>,
}

impl Transcript {
    pub fn new() -> Self {
        Transcript {
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append an entry, returning its final, stable index.
    pub fn push(&mut self, entry: Entry) -> usize {
        self.entries.push(entry);
        self.entries.len() - 1
    }

    /// Entry at `index`.
    ///
    /// # Panics
    ///
    /// Out-of-range access means a presenter and the transcript have
    /// desynchronized, which the append-only discipline rules out short of
    /// a bug. Panics rather than papering over it.
    pub fn at(&self, index: usize) -> &Entry {
        let len = self.entries.len();
        match self.entries.get(index) {
            Some(entry) => entry,
            None => panic!("transcript index {index} out of range (len {len})"),
        }
    }

    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    /// Record the terminal outcome for the entry at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `outcome` is still `Pending`, if `index` is out of range,
    /// or if the entry already has a terminal outcome. All three indicate
    /// controller bugs, not runtime conditions.
    pub fn resolve(&mut self, index: usize, outcome: Outcome) {
        assert!(!outcome.is_pending(), "resolve requires a terminal outcome");
        let len = self.entries.len();
        let entry = match self.entries.get_mut(index) {
            Some(entry) => entry,
            None => panic!("transcript index {index} out of range (len {len})"),
        };
        assert!(
            entry.outcome.is_pending(),
            "transcript entry {index} already resolved"
        );
        entry.outcome = outcome;
    }
}
