//! The one local session: board, Daily Focus, pasted input and language.

use serde::{Deserialize, Serialize};

use crate::board::{Board, TaskId};
use crate::heuristic::parse_lines;
use crate::{focus, Bucket, Buckets, ClassificationResult, DailyFocusItem, Locale};

/// Persisted form of a [`Session`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub buckets: Buckets,
    #[serde(default)]
    pub daily_focus: Vec<DailyFocusItem>,
    #[serde(default)]
    pub input_text: String,
    #[serde(default)]
    pub language: Locale,
    #[serde(default)]
    pub has_organized: bool,
}

/// Bucket entry as it may appear on disk. Older builds stored
/// `{ "text": ..., ... }` objects instead of plain strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredTask {
    Text(String),
    Legacy { text: String },
    Other(serde_json::Value),
}

impl StoredTask {
    fn into_text(self) -> (String, bool) {
        match self {
            StoredTask::Text(s) => (s, false),
            StoredTask::Legacy { text } => (text, true),
            StoredTask::Other(serde_json::Value::String(s)) => (s, true),
            StoredTask::Other(v) => (v.to_string(), true),
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct StoredBuckets {
    core: Vec<StoredTask>,
    growth: Vec<StoredTask>,
    optional: Vec<StoredTask>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSnapshot {
    #[serde(default)]
    buckets: StoredBuckets,
    #[serde(default)]
    daily_focus: Vec<DailyFocusItem>,
    #[serde(default)]
    input_text: String,
    #[serde(default)]
    language: Locale,
    #[serde(default)]
    has_organized: bool,
}

impl SessionSnapshot {
    /// Parse a stored snapshot, upgrading legacy bucket entries. The flag is
    /// true when anything had to be upgraded.
    pub fn parse(raw: &str) -> Result<(Self, bool), serde_json::Error> {
        let stored: StoredSnapshot = serde_json::from_str(raw)?;
        let mut upgraded = false;
        let mut lane = |entries: Vec<StoredTask>| -> Vec<String> {
            entries
                .into_iter()
                .map(|entry| {
                    let (text, legacy) = entry.into_text();
                    upgraded |= legacy;
                    text
                })
                .collect()
        };
        let buckets = Buckets {
            core: lane(stored.buckets.core),
            growth: lane(stored.buckets.growth),
            optional: lane(stored.buckets.optional),
        };
        let snapshot = Self {
            buckets,
            daily_focus: stored.daily_focus,
            input_text: stored.input_text,
            language: stored.language,
            has_organized: stored.has_organized,
        };
        Ok((snapshot, upgraded))
    }

    /// Apply a positional transform to the buckets. Refreshes Daily Focus
    /// when the buckets changed and the session has been organized.
    pub fn apply(&mut self, transform: impl FnOnce(&Buckets) -> Buckets) -> bool {
        let next = transform(&self.buckets);
        if next == self.buckets {
            return false;
        }
        self.buckets = next;
        if self.has_organized {
            self.daily_focus = focus::derive(&self.buckets);
        }
        true
    }
}

/// Live session state behind the HTTP surface. Tasks carry [`TaskId`]s
/// that stay valid across moves and deletions of other tasks.
#[derive(Debug, Clone, Default)]
pub struct Session {
    board: Board,
    daily_focus: Vec<DailyFocusItem>,
    input_text: String,
    language: Locale,
    has_organized: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: SessionSnapshot) -> Self {
        Self {
            board: Board::from_buckets(&snapshot.buckets),
            daily_focus: snapshot.daily_focus,
            input_text: snapshot.input_text,
            language: snapshot.language,
            has_organized: snapshot.has_organized,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            buckets: self.board.to_buckets(),
            daily_focus: self.daily_focus.clone(),
            input_text: self.input_text.clone(),
            language: self.language,
            has_organized: self.has_organized,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn buckets(&self) -> Buckets {
        self.board.to_buckets()
    }

    pub fn daily_focus(&self) -> &[DailyFocusItem] {
        &self.daily_focus
    }

    pub fn input_text(&self) -> &str {
        &self.input_text
    }

    pub fn language(&self) -> Locale {
        self.language
    }

    pub fn has_organized(&self) -> bool {
        self.has_organized
    }

    /// Non-empty trimmed lines of the pasted input.
    pub fn lines(&self) -> Vec<String> {
        parse_lines(&self.input_text)
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input_text = text.into();
    }

    pub fn set_language(&mut self, language: Locale) {
        self.language = language;
    }

    /// Replace the board with a classification result. A supplied Daily
    /// Focus is kept only if it is consistent with the new buckets.
    pub fn organize(&mut self, result: ClassificationResult) {
        self.board.replace_from(&result.buckets);
        self.daily_focus = if !result.daily_focus.is_empty()
            && focus::is_consistent(&result.daily_focus, &result.buckets)
        {
            result.daily_focus
        } else {
            focus::derive(&result.buckets)
        };
        self.has_organized = true;
    }

    fn refocus(&mut self) {
        if self.has_organized {
            self.daily_focus = focus::derive(&self.board.to_buckets());
        }
    }

    fn changed(&mut self, changed: bool) -> bool {
        if changed {
            self.refocus();
        }
        changed
    }

    pub fn move_task(&mut self, id: TaskId, to: Bucket) -> bool {
        let changed = self.board.move_task(id, to);
        self.changed(changed)
    }

    pub fn reorder(&mut self, lane: Bucket, from: TaskId, to: TaskId) -> bool {
        let changed = self.board.reorder(lane, from, to);
        self.changed(changed)
    }

    pub fn remove(&mut self, id: TaskId) -> bool {
        let changed = self.board.remove(id);
        self.changed(changed)
    }

    pub fn update(&mut self, id: TaskId, text: impl Into<String>) -> bool {
        let changed = self.board.update(id, text);
        self.changed(changed)
    }

    /// Clear everything except the language.
    pub fn reset(&mut self) {
        self.board.replace_from(&Buckets::default());
        self.daily_focus.clear();
        self.input_text.clear();
        self.has_organized = false;
    }
}
