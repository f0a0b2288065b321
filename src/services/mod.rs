pub mod history;
pub mod loader;
pub mod lookup;

pub use history::HistoryStore;
pub use lookup::{KPolicy, LookupEngine, SelfExclusion};
