use std::collections::VecDeque;

/// Opaque item identifier, allocated by the item store.
pub type ItemId = String;

/// Opaque session identifier, allocated by the session store.
pub type SessionId = String;

/// An ordered run of item IDs, already sorted among themselves (most preferred first).
pub type Run = Vec<ItemId>;

/// An item to be ranked.
///
/// Sessions only ever hold the `id`; titles and descriptions are resolved
/// from the item store when a pair or a ranking is presented.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    pub description: String,
}

/// Which run of the active merge an item came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Two item IDs awaiting a human decision.
///
/// `a` is always the left run's element at its cursor, `b` the right run's.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pair {
    pub a: ItemId,
    pub b: ItemId,
}

/// A single recorded human decision.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Decision {
    pub winner: ItemId,
    pub loser: ItemId,
}

/// In-progress interleaving of two runs.
///
/// `merged` holds `left[..i]` and `right[..j]` in the order the decisions
/// were made, so it is always a sorted run on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MergeTask {
    pub left: Run,
    pub right: Run,
    pub i: usize,
    pub j: usize,
    pub merged: Run,
}

impl MergeTask {
    pub fn new(left: Run, right: Run) -> Self {
        let capacity = left.len() + right.len();
        MergeTask {
            left,
            right,
            i: 0,
            j: 0,
            merged: Vec::with_capacity(capacity),
        }
    }

    /// One side is exhausted: no further decisions are needed.
    pub fn is_resolvable(&self) -> bool {
        self.i >= self.left.len() || self.j >= self.right.len()
    }

    /// The pair under the cursors, or `None` once resolvable.
    pub fn current_pair(&self) -> Option<Pair> {
        match (self.left.get(self.i), self.right.get(self.j)) {
            (Some(a), Some(b)) => Some(Pair {
                a: a.clone(),
                b: b.clone(),
            }),
            _ => None,
        }
    }

    /// Emit the element under `side`'s cursor into `merged` and step past it.
    pub(crate) fn take(&mut self, side: Side) {
        match side {
            Side::Left => {
                self.merged.push(self.left[self.i].clone());
                self.i += 1;
            }
            Side::Right => {
                self.merged.push(self.right[self.j].clone());
                self.j += 1;
            }
        }
    }

    /// Finish the merge: append whatever remains on either side, in order.
    pub fn into_run(self) -> Run {
        let MergeTask {
            left,
            right,
            i,
            j,
            mut merged,
        } = self;
        merged.extend(left.into_iter().skip(i));
        merged.extend(right.into_iter().skip(j));
        merged
    }

    /// All IDs the task still owns: merged output plus both unconsumed tails.
    pub fn ids(&self) -> impl Iterator<Item = &ItemId> {
        self.merged
            .iter()
            .chain(self.left.iter().skip(self.i))
            .chain(self.right.iter().skip(self.j))
    }
}

/// Ranking status of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Status {
    InProgress,
    Completed,
}

/// The complete, serializable state of one ranking.
///
/// Every engine operation is a method on this value; nothing about a
/// ranking lives anywhere else between calls.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Session {
    pub item_refs: Vec<ItemId>,
    pub work_queue: VecDeque<Run>,
    pub current_task: Option<MergeTask>,
    pub status: Status,
    #[cfg_attr(feature = "serde", serde(default))]
    pub history: Vec<Decision>,
}

/// What the caller should do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Ask the human to choose between these two items.
    Compare(Pair),
    /// Ranking finished; IDs most preferred first.
    Done(Run),
}

impl Step {
    pub fn is_done(&self) -> bool {
        matches!(self, Step::Done(_))
    }
}

/// A pair or a final ranking, resolved to full item records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Next {
    Compare { item_a: Item, item_b: Item },
    Done { sorted: Vec<Item> },
}

/// Current ranking of a session, resolved to items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rankings {
    pub items: Vec<Item>,
    /// `false` while the session is in progress: the order is then best-effort only.
    pub complete: bool,
    pub comparisons: usize,
}
