//! Reading tabular source files.

mod parser;
mod row;
mod source;

pub use parser::{ReaderConfig, TableReader};
pub use row::RawRow;
pub use source::{RawTable, SourceMetadata};
