//! Secondary indexes over questions. Each index is independent and incrementally updateable.

pub mod author_index;
pub mod category_index;
pub mod temporal_index;

pub use author_index::AuthorIndex;
pub use category_index::CategoryIndex;
pub use temporal_index::TemporalIndex;
