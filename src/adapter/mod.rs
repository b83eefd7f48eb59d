//! Turns differently shaped source tables into one stream of raw records.

pub mod structured;
pub mod tuples;
pub mod types;
pub mod unified;
pub mod wide_year;

pub use tuples::{adapt_tuples, ShareTuple};
pub use types::{AdaptOutput, RawTable};
pub use unified::{adapt_text, detect_shape, SourceAdapter};
