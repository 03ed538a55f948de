pub mod elemental;
pub mod tree;
pub mod visitor;

pub use elemental::*;
pub use tree::*;
pub use visitor::*;

pub use elemental_schema::{AttrMap, Mark, MarkKind, MarkSet, StyleFlags};
