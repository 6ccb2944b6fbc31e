//! Line-oriented presenter for a scrollback terminal.

use scrawl_core::{Entry, Outcome, Presenter};

use crate::colors::gray;

/// Prints resolved transcript lines to stdout.
///
/// Insertion is silent — the line editor has already echoed the code the
/// user typed — and scrolling is meaningless in a scrollback terminal, so
/// the only visible event is the single row update with the full
/// `code = result` line. Entries that finished with no displayable value
/// print nothing, matching how the transcript renders them (code alone).
#[derive(Default)]
pub struct LinePresenter;

impl LinePresenter {
    /// The text a row update prints, if any. Split out so it can be
    /// asserted on without capturing stdout.
    pub fn render_update(entry: &Entry) -> Option<String> {
        match &entry.outcome {
            Outcome::Value(_) => Some(gray(&entry.display_line())),
            Outcome::Pending | Outcome::NoValue => None,
        }
    }
}

impl Presenter for LinePresenter {
    fn row_inserted(&mut self, _index: usize, _entry: &Entry) {}

    fn row_updated(&mut self, _index: usize, entry: &Entry) {
        if let Some(line) = Self::render_update(entry) {
            println!("{}", line);
        }
    }

    fn scroll_to(&mut self, _index: usize) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_renders_code_and_result() {
        let entry = Entry {
            code: "1 + 2".to_string(),
            outcome: Outcome::Value("3".to_string()),
        };
        let line = LinePresenter::render_update(&entry).unwrap();
        assert!(line.contains("1 + 2 = 3"));
    }

    #[test]
    fn test_no_value_and_pending_render_nothing() {
        let finished = Entry {
            code: "let x = 1".to_string(),
            outcome: Outcome::NoValue,
        };
        assert_eq!(LinePresenter::render_update(&finished), None);
        assert_eq!(LinePresenter::render_update(&Entry::pending("x")), None);
    }
}
