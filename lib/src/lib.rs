mod bloom;
mod data;
mod dictionary;
mod engine;
mod exhaustive;
mod incremental;
mod persist;
mod results;

pub use data::Alphabet;
pub use data::Board;
pub use data::Cell;
pub use data::WordBank;
pub use data::RUSSIAN_LETTERS;
pub use dictionary::*;
pub use engine::{play_game, Guesser};
pub use exhaustive::ExhaustiveSearch;
pub use incremental::IncrementalSearch;
pub use persist::*;
pub use results::*;

/// Building blocks that are useful when inspecting the search state.
pub mod details {
    pub use crate::bloom::BloomFilter;
    pub use crate::engine::PathEnd;
    pub use crate::incremental::{Completion, Root, Route};
}
