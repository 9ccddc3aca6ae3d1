/// Merge-rank engine: a resumable bottom-up merge sort whose compare step
/// is answered by a human.
///
/// All state lives in the `Session` value. Callers load it, call `advance()`
/// or `apply_choice()`, and write it back. No call ever blocks waiting for
/// the human; the next decision arrives as a separate call on a reloaded session.
use std::collections::{HashMap, HashSet};

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::types::{Decision, ItemId, MergeTask, Run, Session, Side, Status, Step};

impl Session {
    /// Build the initial state: one singleton run per ID, in submitted order.
    pub fn new(item_ids: &[ItemId]) -> Result<Self> {
        if item_ids.is_empty() {
            return Err(Error::EmptyInput);
        }
        let mut seen = HashSet::with_capacity(item_ids.len());
        for id in item_ids {
            if !seen.insert(id) {
                return Err(Error::DuplicateItem(id.clone()));
            }
        }

        Ok(Session {
            item_refs: item_ids.to_vec(),
            work_queue: item_ids.iter().map(|id| vec![id.clone()]).collect(),
            current_task: None,
            status: Status::InProgress,
            history: Vec::new(),
        })
    }

    /// Same items, no decisions.
    pub fn restarted(&self) -> Self {
        Session {
            item_refs: self.item_refs.clone(),
            work_queue: self.item_refs.iter().map(|id| vec![id.clone()]).collect(),
            current_task: None,
            status: Status::InProgress,
            history: Vec::new(),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == Status::Completed
    }

    /// Number of human decisions recorded so far.
    pub fn comparisons(&self) -> usize {
        self.history.len()
    }

    /// Move to the next pair that needs a human, folding any finished merges
    /// on the way.
    ///
    /// Calling this again without an intervening `apply_choice()` returns the
    /// same pair.
    pub fn advance(&mut self) -> Step {
        loop {
            if self.is_completed() {
                return Step::Done(self.sorted_run());
            }

            let task = match self.current_task.take() {
                Some(task) => task,
                None => match self.start_next_task() {
                    Some(task) => task,
                    None => {
                        self.complete();
                        continue;
                    }
                },
            };

            if task.is_resolvable() {
                self.fold(task);
                continue;
            }

            match task.current_pair() {
                Some(pair) => {
                    debug!(a = %pair.a, b = %pair.b, "serving pair");
                    self.current_task = Some(task);
                    return Step::Compare(pair);
                }
                None => self.fold(task),
            }
        }
    }

    /// Record that the human prefers `winner` over `loser`.
    ///
    /// The two IDs must be the pending pair, in either order. The winner is
    /// emitted into the merged run first. Returns the next step so the
    /// caller gets a new pair (or the final ranking) in the same round trip.
    pub fn apply_choice(&mut self, winner: &str, loser: &str) -> Result<Step> {
        if self.is_completed() {
            return Ok(Step::Done(self.sorted_run()));
        }

        let pair = match self.advance() {
            Step::Compare(pair) => pair,
            Step::Done(_) => {
                return Err(Error::InvalidChoice(
                    "no comparison is pending for this session".to_string(),
                ));
            }
        };

        let side = if winner == pair.a && loser == pair.b {
            Side::Left
        } else if winner == pair.b && loser == pair.a {
            Side::Right
        } else {
            return Err(Error::InvalidChoice(format!(
                "expected a decision between {} and {}, got winner {} and loser {}",
                pair.a, pair.b, winner, loser
            )));
        };

        let Some(mut task) = self.current_task.take() else {
            return Err(Error::InvalidChoice(
                "no merge is active for this session".to_string(),
            ));
        };
        task.take(side);
        self.history.push(Decision {
            winner: winner.to_string(),
            loser: loser.to_string(),
        });

        if task.is_resolvable() {
            self.fold(task);
        } else {
            self.current_task = Some(task);
        }

        Ok(self.advance())
    }

    /// Current order of all item IDs, most preferred first.
    ///
    /// Authoritative only once completed. While in progress: the active
    /// merge's output, then its unconsumed left and right tails, then every
    /// queued run in queue order.
    pub fn ranking_order(&self) -> Run {
        let mut order = Vec::with_capacity(self.item_refs.len());
        if let Some(task) = &self.current_task {
            order.extend(task.ids().cloned());
        }
        for run in &self.work_queue {
            order.extend(run.iter().cloned());
        }
        order
    }

    /// Check the structural invariants of a session read back from storage.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.item_refs.is_empty() {
            return Err("session has no items".to_string());
        }
        if self.work_queue.iter().any(|run| run.is_empty()) {
            return Err("work queue contains an empty run".to_string());
        }

        if let Some(task) = &self.current_task {
            if task.left.is_empty() || task.right.is_empty() {
                return Err("active merge has an empty side".to_string());
            }
            if task.i > task.left.len() || task.j > task.right.len() {
                return Err("active merge cursor is out of bounds".to_string());
            }
            if task.merged.len() != task.i + task.j {
                return Err(format!(
                    "active merge output has {} items, cursors account for {}",
                    task.merged.len(),
                    task.i + task.j
                ));
            }
        }

        if self.is_completed() && (self.work_queue.len() != 1 || self.current_task.is_some()) {
            return Err("completed session must hold exactly one run".to_string());
        }

        let mut expected: HashMap<&str, usize> = HashMap::new();
        for id in &self.item_refs {
            let count = expected.entry(id.as_str()).or_default();
            if *count > 0 {
                return Err(format!("item {id} is listed more than once"));
            }
            *count += 1;
        }
        let mut actual: HashMap<&str, usize> = HashMap::new();
        let queued = self.work_queue.iter().flatten();
        let in_task = self.current_task.iter().flat_map(|task| task.ids());
        for id in queued.chain(in_task) {
            *actual.entry(id.as_str()).or_default() += 1;
        }
        if expected != actual {
            return Err("runs do not account for every item exactly once".to_string());
        }

        Ok(())
    }

    fn start_next_task(&mut self) -> Option<MergeTask> {
        if self.work_queue.len() < 2 {
            return None;
        }
        let left = self.work_queue.pop_front()?;
        let right = self.work_queue.pop_front()?;
        debug!(left = left.len(), right = right.len(), "starting merge");
        Some(MergeTask::new(left, right))
    }

    fn fold(&mut self, task: MergeTask) {
        let run = task.into_run();
        debug!(len = run.len(), queued = self.work_queue.len(), "folding merge");
        self.work_queue.push_back(run);
        if self.work_queue.len() == 1 {
            self.complete();
        }
    }

    fn complete(&mut self) {
        if !self.is_completed() {
            info!(
                items = self.item_refs.len(),
                comparisons = self.history.len(),
                "ranking completed"
            );
        }
        self.status = Status::Completed;
    }

    fn sorted_run(&self) -> Run {
        self.work_queue.front().cloned().unwrap_or_default()
    }
}

/// Worst-case number of decisions to fully rank `n` items.
pub fn max_comparisons(n: usize) -> usize {
    if n < 2 {
        return 0;
    }
    let levels = ceil_log2(n);
    n * levels - (1usize << levels) + 1
}

/// Smallest `k` with `2^k >= n`.
pub fn ceil_log2(n: usize) -> usize {
    if n <= 1 {
        0
    } else {
        (usize::BITS - (n - 1).leading_zeros()) as usize
    }
}

/// All IDs the session currently owns, queued and in-task, sorted.
#[cfg(test)]
fn owned_ids(session: &Session) -> Vec<ItemId> {
    let mut ids = session.ranking_order();
    ids.sort();
    ids
}
