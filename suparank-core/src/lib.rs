/// suparank-core: Resumable merge-sort ranking driven by human choices.
///
/// A list of items → a series of "which of these two?" questions → a total
/// order. The merge sort is bottom-up over a queue of sorted runs, and every
/// bit of progress lives in a plain `Session` value, so the question and its
/// answer can arrive in two unrelated calls (two HTTP requests, two CLI runs).
/// No IO here: persistence goes through the `SessionStore` and `ItemStore` traits.
///
/// # Quick start
///
/// ```rust
/// use suparank_core::{Session, Step};
///
/// let ids: Vec<String> = ["tea", "coffee", "cocoa"].iter().map(|s| s.to_string()).collect();
/// let mut session = Session::new(&ids).unwrap();
///
/// let order = loop {
///     match session.advance() {
///         Step::Compare(pair) => {
///             // Ask a human. Here: alphabetical order wins.
///             let (winner, loser) =
///                 if pair.a < pair.b { (pair.a, pair.b) } else { (pair.b, pair.a) };
///             session.apply_choice(&winner, &loser).unwrap();
///         }
///         Step::Done(order) => break order,
///     }
/// };
///
/// assert_eq!(order, vec!["cocoa", "coffee", "tea"]);
/// ```

pub mod engine;
pub mod error;
pub mod service;
pub mod store;
pub mod types;
pub mod wire;

// Re-export primary public API at crate root.
pub use engine::{ceil_log2, max_comparisons};
pub use error::{Entity, Error, Result, Transience};
pub use service::RankingService;
pub use store::{ItemStore, MemoryItemStore, MemorySessionStore, SessionStore, resolve_items};
pub use types::{
    Decision, Item, ItemId, MergeTask, Next, Pair, Rankings, Run, Session, SessionId, Side,
    Status, Step,
};
pub use wire::{
    Choice, ChoiceRequest, ChoiceResponse, NextResponse, ResultResponse, StartRequest,
    StartResponse,
};
