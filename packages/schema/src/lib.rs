pub mod attrs;
pub mod marks;
pub mod registry;

pub use attrs::{AttrDefault, AttrIssue, AttrKind, AttrMap, AttrSpec};
pub use marks::{Mark, MarkKind, MarkSet, StyleFlags};
pub use registry::{NodeKind, NodeSchema, RepairedAttrs, SchemaRegistry};
