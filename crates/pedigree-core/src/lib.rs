pub mod error;
pub mod id;
pub mod layout;
pub mod metrics;
pub mod model;
pub mod positions;

pub use error::{PedigreeError, Result};
pub use id::{Identify, NodeId, resolve_id};
pub use layout::{LayoutConfig, Layering, PedigreeLayout, assign_layers, compute_layout};
pub use metrics::{NodeMetrics, SizeTable};
pub use model::*;
pub use positions::PositionStore;

// Re-export petgraph types so downstream crates don't need a direct dependency
pub use petgraph::graph::NodeIndex;
