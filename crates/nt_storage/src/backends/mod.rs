pub mod memory;

pub use memory::{InMemoryArticleStore, InMemorySignalStore, ReadEvent, UserSignals};
