//! Undo/Redo command stack.
//!
//! Every position change is wrapped in a reversible `Command` that can be
//! undone. Commands are pushed to a stack; undo pops and applies the
//! inverse. The stack is generic over the target it mutates; the editor
//! runs it against a `PositionStore`.
//!
//! Execute and undo report whether anything changed instead of raising a
//! global dirty flag. Repainting is the caller's decision.

use crate::align::NodeMove;
use pedigree_core::{NodeId, Point, PositionStore};
use smallvec::SmallVec;

/// A reversible mutation of `T`.
pub trait Command<T> {
    /// Apply the mutation. Returns `true` if `target` changed.
    fn execute(&mut self, target: &mut T) -> bool;
    /// Revert the mutation. Returns `true` if `target` changed.
    fn undo(&mut self, target: &mut T) -> bool;
    fn description(&self) -> &str;
}

/// Manages undo/redo stacks.
pub struct CommandStack<T> {
    undo_stack: Vec<Box<dyn Command<T>>>,
    redo_stack: Vec<Box<dyn Command<T>>>,
    /// Maximum undo depth.
    max_depth: usize,
}

impl<T> Default for CommandStack<T> {
    fn default() -> Self {
        Self::new(100)
    }
}

impl<T> CommandStack<T> {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Execute `cmd` against `target` and push it to the undo stack.
    /// Clears the redo stack. Returns whatever `cmd.execute` reported.
    pub fn execute(&mut self, target: &mut T, cmd: impl Command<T> + 'static) -> bool {
        self.execute_boxed(target, Box::new(cmd))
    }

    pub fn execute_boxed(&mut self, target: &mut T, mut cmd: Box<dyn Command<T>>) -> bool {
        let changed = cmd.execute(target);
        log::trace!("execute {:?} (changed: {changed})", cmd.description());

        self.undo_stack.push(cmd);
        if self.undo_stack.len() > self.max_depth {
            self.undo_stack.remove(0);
        }

        // Clear redo stack on new action
        self.redo_stack.clear();
        changed
    }

    /// Undo the last command, returning its description and whether
    /// `target` changed. `None` when there is nothing to undo.
    pub fn undo(&mut self, target: &mut T) -> Option<(String, bool)> {
        let mut cmd = self.undo_stack.pop()?;
        let changed = cmd.undo(target);
        let desc = cmd.description().to_string();
        log::trace!("undo {desc:?} (changed: {changed})");
        self.redo_stack.push(cmd);
        Some((desc, changed))
    }

    /// Redo the last undone command by executing it again.
    pub fn redo(&mut self, target: &mut T) -> Option<(String, bool)> {
        let mut cmd = self.redo_stack.pop()?;
        let changed = cmd.execute(target);
        let desc = cmd.description().to_string();
        log::trace!("redo {desc:?} (changed: {changed})");
        self.undo_stack.push(cmd);
        Some((desc, changed))
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Undo history, oldest first.
    pub fn undo_descriptions(&self) -> Vec<&str> {
        self.undo_stack.iter().map(|c| c.description()).collect()
    }

    /// Redo history, oldest first; the last entry is redone next.
    pub fn redo_descriptions(&self) -> Vec<&str> {
        self.redo_stack.iter().map(|c| c.description()).collect()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

/// Side effect fired after a node lands at a new position, e.g. to sync an
/// external model. Errors are logged and never block the move.
pub type MoveCallback = Box<dyn FnMut(NodeId, Point) -> Result<(), String>>;

fn notify(callback: &mut Option<MoveCallback>, id: NodeId, at: Point) {
    if let Some(cb) = callback {
        if let Err(err) = cb(id, at) {
            log::warn!("move callback for {id} failed: {err}");
        }
    }
}

fn place(store: &mut PositionStore, id: NodeId, at: Point) -> bool {
    let changed = store.get(id) != Some(at);
    store.set_point(id, at);
    changed
}

/// Move one node from its captured origin to a target position.
pub struct MoveNodeCommand {
    id: NodeId,
    from: Point,
    to: Point,
    description: String,
    callback: Option<MoveCallback>,
}

impl MoveNodeCommand {
    /// Capture the current position of `id` as the undo target.
    /// `None` if `id` has no position yet.
    pub fn new(store: &PositionStore, id: NodeId, to: Point) -> Option<Self> {
        let from = store.get(id)?;
        Some(Self::between(id, from, to))
    }

    /// Explicit origin, for drags where the node already sits at `to`.
    pub fn between(id: NodeId, from: Point, to: Point) -> Self {
        Self {
            id,
            from,
            to,
            description: format!("Move {id}"),
            callback: None,
        }
    }

    pub fn with_callback(mut self, callback: MoveCallback) -> Self {
        self.callback = Some(callback);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

impl Command<PositionStore> for MoveNodeCommand {
    fn execute(&mut self, store: &mut PositionStore) -> bool {
        let changed = place(store, self.id, self.to);
        notify(&mut self.callback, self.id, self.to);
        changed
    }

    fn undo(&mut self, store: &mut PositionStore) -> bool {
        let changed = place(store, self.id, self.from);
        notify(&mut self.callback, self.id, self.from);
        changed
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Move several nodes as one undo step (multi-drag, align, distribute).
pub struct MoveNodesCommand {
    moves: SmallVec<[NodeMove; 8]>,
    description: String,
    callback: Option<MoveCallback>,
}

impl MoveNodesCommand {
    pub fn new(moves: impl IntoIterator<Item = NodeMove>, description: impl Into<String>) -> Self {
        Self {
            moves: moves.into_iter().collect(),
            description: description.into(),
            callback: None,
        }
    }

    pub fn with_callback(mut self, callback: MoveCallback) -> Self {
        self.callback = Some(callback);
        self
    }

    pub fn moves(&self) -> &[NodeMove] {
        &self.moves
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

impl Command<PositionStore> for MoveNodesCommand {
    fn execute(&mut self, store: &mut PositionStore) -> bool {
        let mut changed = false;
        for mv in &self.moves {
            changed |= place(store, mv.id, mv.to);
            notify(&mut self.callback, mv.id, mv.to);
        }
        changed
    }

    fn undo(&mut self, store: &mut PositionStore) -> bool {
        let mut changed = false;
        // Reverse order so a node listed twice ends at its first origin.
        for mv in self.moves.iter().rev() {
            changed |= place(store, mv.id, mv.from);
            notify(&mut self.callback, mv.id, mv.from);
        }
        changed
    }

    fn description(&self) -> &str {
        &self.description
    }
}
