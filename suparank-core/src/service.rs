/// Ranking service: wires the engine to the two stores.
///
/// Every mutating operation is load → transform in memory → one save. A
/// failed save is returned to the caller as-is, so a decision is never
/// reported as accepted unless it was written.
use tracing::info;

use crate::error::{Error, Result};
use crate::store::{ItemStore, SessionStore, resolve_items};
use crate::types::{Item, ItemId, Next, Rankings, Session, SessionId, Step};
use crate::wire::Choice;

pub struct RankingService<S, I> {
    sessions: S,
    items: I,
}

impl<S: SessionStore, I: ItemStore> RankingService<S, I> {
    pub fn new(sessions: S, items: I) -> Self {
        RankingService { sessions, items }
    }

    pub fn sessions(&self) -> &S {
        &self.sessions
    }

    pub fn items(&self) -> &I {
        &self.items
    }

    /// Start ranking the given items. Every ID must exist in the item store.
    pub fn start_session(&mut self, item_ids: &[ItemId]) -> Result<SessionId> {
        let session = Session::new(item_ids)?;
        resolve_items(&self.items, item_ids)?;
        let id = self.sessions.create(&session)?;
        info!(session = %id, items = item_ids.len(), "started ranking session");
        Ok(id)
    }

    /// Start ranking every item currently in the item store.
    pub fn start_session_all(&mut self) -> Result<SessionId> {
        let ids: Vec<ItemId> = self.items.list_all()?.into_iter().map(|item| item.id).collect();
        self.start_session(&ids)
    }

    /// The pending pair, or the final ranking.
    pub fn next(&mut self, session_id: &str) -> Result<Next> {
        let mut session = self.sessions.load(session_id)?;
        let before = session.clone();
        let step = session.advance();
        if session != before {
            self.sessions.save(session_id, &session)?;
        }
        self.resolve_step(step)
    }

    /// Apply an "A"/"B" answer to the pending pair.
    pub fn choose(&mut self, session_id: &str, choice: Choice) -> Result<Next> {
        let mut session = self.sessions.load(session_id)?;
        if session.is_completed() {
            return self.resolve_step(session.advance());
        }
        let Step::Compare(pair) = session.advance() else {
            return Err(Error::InvalidChoice(
                "no comparison is pending for this session".to_string(),
            ));
        };
        let (winner, loser) = choice.resolve(&pair);
        let step = session.apply_choice(winner, loser)?;
        self.sessions.save(session_id, &session)?;
        self.resolve_step(step)
    }

    /// Record that `winner` beats `loser` in the pending pair.
    pub fn apply_choice(&mut self, session_id: &str, winner: &str, loser: &str) -> Result<Next> {
        let mut session = self.sessions.load(session_id)?;
        let was_completed = session.is_completed();
        let step = session.apply_choice(winner, loser)?;
        if !was_completed {
            self.sessions.save(session_id, &session)?;
        }
        self.resolve_step(step)
    }

    /// The final ranking. Fails with `NotComplete` while decisions remain.
    pub fn result(&self, session_id: &str) -> Result<Vec<Item>> {
        let session = self.sessions.load(session_id)?;
        if !session.is_completed() {
            return Err(Error::NotComplete);
        }
        resolve_items(&self.items, &session.ranking_order())
    }

    /// Best-effort ranking at any point in the session.
    pub fn rankings(&self, session_id: &str) -> Result<Rankings> {
        let session = self.sessions.load(session_id)?;
        Ok(Rankings {
            items: resolve_items(&self.items, &session.ranking_order())?,
            complete: session.is_completed(),
            comparisons: session.comparisons(),
        })
    }

    /// Throw away every decision and start over with the same items.
    pub fn reset(&mut self, session_id: &str) -> Result<()> {
        let session = self.sessions.load(session_id)?;
        self.sessions.save(session_id, &session.restarted())?;
        info!(session = %session_id, "ranking session reset");
        Ok(())
    }

    pub fn drop_session(&mut self, session_id: &str) -> Result<()> {
        self.sessions.delete(session_id)
    }

    /// Add an item. Sessions already in progress are not affected.
    pub fn add_item(&mut self, title: &str, description: &str) -> Result<Item> {
        self.items.create(title, description)
    }

    pub fn list_items(&self) -> Result<Vec<Item>> {
        self.items.list_all()
    }

    pub fn delete_item(&mut self, item_id: &str) -> Result<()> {
        self.items.delete(item_id)
    }

    fn resolve_step(&self, step: Step) -> Result<Next> {
        match step {
            Step::Compare(pair) => Ok(Next::Compare {
                item_a: self.items.get(&pair.a)?,
                item_b: self.items.get(&pair.b)?,
            }),
            Step::Done(order) => Ok(Next::Done {
                sorted: resolve_items(&self.items, &order)?,
            }),
        }
    }
}
