//! ProjGraph Viz: turns a project neighbourhood into what the dashboard
//! draws: a styled node-link graph, metric values and a raw table.

pub mod mapping;
pub mod style;
pub mod summary;
pub mod view;

pub use mapping::{build_vis_graph, VisEdge, VisGraph, VisNode};
pub use style::{classify, NodeKind, NodeStyle};
pub use summary::{raw_rows, summarize, RawRow, Summary};
pub use view::{build_view, GraphView};
