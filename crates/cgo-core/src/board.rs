//! Bucket lanes whose tasks carry stable ids.
//!
//! Positional keys shift whenever something above them moves, so a live
//! session hands out a [`TaskId`] per task at insertion time and resolves it
//! to an index only when a mutation runs. The actual work is done by the
//! positional transforms in [`crate::bucket`].

use serde::{Deserialize, Serialize};

use crate::bucket::{self, ItemRef};
use crate::{Bucket, Buckets};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    schemars::JsonSchema,
)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct Board {
    lanes: Buckets<Task>,
    next_id: u64,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a board from plain buckets, numbering tasks in display order.
    pub fn from_buckets(buckets: &Buckets) -> Self {
        let mut board = Self::new();
        for (b, text) in buckets.iter() {
            board.push(b, text.clone());
        }
        board
    }

    /// Swap in new contents. Ids keep counting from where they were, so an
    /// id from before the swap never resolves to one of the new tasks.
    pub fn replace_from(&mut self, buckets: &Buckets) {
        self.lanes = Buckets::default();
        for (b, text) in buckets.iter() {
            self.push(b, text.clone());
        }
    }

    pub fn push(&mut self, bucket: Bucket, text: impl Into<String>) -> TaskId {
        self.next_id += 1;
        let id = TaskId(self.next_id);
        self.lanes.get_mut(bucket).push(Task {
            id,
            text: text.into(),
        });
        id
    }

    pub fn lanes(&self) -> &Buckets<Task> {
        &self.lanes
    }

    pub fn to_buckets(&self) -> Buckets {
        self.lanes.map(|t| t.text.clone())
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        let at = self.locate(id)?;
        self.lanes.get(at.bucket).get(at.index)
    }

    /// Current position of `id`.
    pub fn locate(&self, id: TaskId) -> Option<ItemRef> {
        Bucket::ALL.into_iter().find_map(|b| {
            self.lanes
                .get(b)
                .iter()
                .position(|t| t.id == id)
                .map(|index| ItemRef::new(b, index))
        })
    }

    /// Move a task to the end of `to`. Returns whether anything changed.
    pub fn move_task(&mut self, id: TaskId, to: Bucket) -> bool {
        match self.locate(id) {
            Some(at) if at.bucket != to => {
                self.lanes = bucket::move_to(&self.lanes, at, to);
                true
            }
            _ => false,
        }
    }

    /// Move `from` to the slot currently held by `to`. Both must be in `lane`.
    pub fn reorder(&mut self, lane: Bucket, from: TaskId, to: TaskId) -> bool {
        match (self.locate(from), self.locate(to)) {
            (Some(a), Some(b)) if a.bucket == lane && b.bucket == lane && a != b => {
                self.lanes = bucket::reorder_within(&self.lanes, lane, a.index, b.index);
                true
            }
            _ => false,
        }
    }

    pub fn remove(&mut self, id: TaskId) -> bool {
        match self.locate(id) {
            Some(at) => {
                self.lanes = bucket::remove_at(&self.lanes, at);
                true
            }
            None => false,
        }
    }

    pub fn update(&mut self, id: TaskId, text: impl Into<String>) -> bool {
        match self.locate(id) {
            Some(at) => {
                let task = Task {
                    id,
                    text: text.into(),
                };
                self.lanes = bucket::replace_at(&self.lanes, at, task);
                true
            }
            None => false,
        }
    }
}
