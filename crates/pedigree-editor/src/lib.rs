pub mod align;
pub mod commands;
pub mod controller;
pub mod hit;
pub mod input;
pub mod selection;
pub mod shortcuts;
pub mod viewport;

pub use align::{Alignment, Distribution, NodeMove, PositionAccessor, StoreAccessor};
pub use commands::{Command, CommandStack, MoveNodeCommand, MoveNodesCommand};
pub use controller::PedigreeEditor;
pub use input::{InputEvent, Modifiers};
pub use selection::{BoundsProvider, Selection, StoreBounds};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use viewport::Viewport;
