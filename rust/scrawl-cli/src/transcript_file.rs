//! Saved-transcript format: pretty-printed JSON with a timestamp header.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use scrawl_core::{Entry, Transcript};

#[derive(Debug, thiserror::Error)]
pub enum TranscriptFileError {
    #[error("cannot access '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed transcript file: {0}")]
    Format(#[from] serde_json::Error),
}

/// On-disk snapshot of a transcript. Pending entries are saved as pending;
/// a transcript is a record of what happened, not a resumable session.
#[derive(Debug, Serialize, Deserialize)]
pub struct SavedTranscript {
    pub saved_at: DateTime<Utc>,
    pub entries: Vec<Entry>,
}

impl SavedTranscript {
    pub fn capture(transcript: &Transcript) -> Self {
        SavedTranscript {
            saved_at: Utc::now(),
            entries: transcript.entries().to_vec(),
        }
    }

    pub fn to_json(&self) -> Result<String, TranscriptFileError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, TranscriptFileError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Write the transcript to `path` as JSON.
pub fn save(path: &Path, transcript: &Transcript) -> Result<(), TranscriptFileError> {
    let json = SavedTranscript::capture(transcript).to_json()?;
    std::fs::write(path, json).map_err(|source| TranscriptFileError::Io {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrawl_core::Outcome;

    #[test]
    fn test_saved_transcript_round_trips() {
        let mut transcript = Transcript::new();
        let i = transcript.push(Entry::pending("1 + 2"));
        transcript.resolve(i, Outcome::Value("3".to_string()));
        transcript.push(Entry::pending("slow()"));

        let saved = SavedTranscript::capture(&transcript);
        let json = saved.to_json().unwrap();
        let loaded = SavedTranscript::from_json(&json).unwrap();

        assert_eq!(loaded.entries.len(), 2);
        assert_eq!(loaded.entries[0].display_line(), "1 + 2 = 3");
        assert_eq!(loaded.entries[1].outcome, Outcome::Pending);
        assert_eq!(loaded.saved_at, saved.saved_at);
    }

    #[test]
    fn test_malformed_json_is_a_format_error() {
        let err = SavedTranscript::from_json("{ not json").unwrap_err();
        assert!(matches!(err, TranscriptFileError::Format(_)));
    }
}
