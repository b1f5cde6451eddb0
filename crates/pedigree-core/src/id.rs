use crate::error::{PedigreeError, Result};
use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

/// Global string interner for person and family ids.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Interned identifier of an individual or a family node.
/// Internally a `Spur` index: 4 bytes, `Copy`, hashed in O(1).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(Spur);

impl NodeId {
    /// Intern a string as a NodeId, or return the existing handle.
    pub fn intern(s: &str) -> Self {
        NodeId(INTERNER.get_or_intern(s))
    }

    /// Intern `s`, rejecting empty or all-whitespace ids.
    pub fn parse(s: &str) -> Result<Self> {
        if s.trim().is_empty() {
            return Err(PedigreeError::invalid("node id must not be empty"));
        }
        Ok(Self::intern(s))
    }

    /// Resolve back to a string slice.
    pub fn as_str(&self) -> &'static str {
        INTERNER.resolve(&self.0)
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.as_str())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        NodeId::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Anything that can name the node it stands for.
///
/// Embedders hand arbitrary UI objects to the selection model; only those
/// that can produce an id are selectable.
pub trait Identify {
    fn node_id(&self) -> Option<NodeId>;
}

impl Identify for NodeId {
    fn node_id(&self) -> Option<NodeId> {
        Some(*self)
    }
}

impl Identify for str {
    fn node_id(&self) -> Option<NodeId> {
        NodeId::parse(self).ok()
    }
}

impl Identify for String {
    fn node_id(&self) -> Option<NodeId> {
        self.as_str().node_id()
    }
}

/// Resolve an optional object to an id.
///
/// Fails with `InvalidArgument` when the object is absent or cannot name a node.
pub fn resolve_id<T: Identify + ?Sized>(obj: Option<&T>) -> Result<NodeId> {
    let obj = obj.ok_or_else(|| PedigreeError::invalid("selection target is null"))?;
    obj.node_id()
        .ok_or_else(|| PedigreeError::invalid("selection target has no node id"))
}
