use crate::scene::transform::Transform;
use crate::scene::{MeshKey, NodeHandle, SkinKey};

/// A scene node: hierarchy links, transform and component links.
///
/// # Hierarchy
///
/// Nodes form a forest through parent-child relationships:
/// - `parent`: non-owning back-reference used only for lookups (None for roots)
/// - `children`: ordered child handles; removing a node removes its subtree
///
/// # Components
///
/// Mesh and skin data live in the owning [`Scene`](crate::scene::Scene)'s
/// component maps; the node only stores keys into them.
#[derive(Debug, Clone)]
pub struct Node {
    // === Identity ===
    /// Stable source index (e.g. the node's position in the asset file).
    pub index: usize,
    /// Optional name, for diagnostics and lookup.
    pub name: Option<String>,

    // === Core Hierarchy ===
    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,

    // === Core Spatial Data ===
    pub transform: Transform,

    // === Components ===
    pub(crate) mesh: Option<MeshKey>,
    pub(crate) skin: Option<SkinKey>,
}

impl Node {
    /// Creates a new node with identity transform.
    #[must_use]
    pub fn new(index: usize) -> Self {
        Self {
            index,
            name: None,
            parent: None,
            children: Vec::new(),
            transform: Transform::new(),
            mesh: None,
            skin: None,
        }
    }

    #[must_use]
    pub fn with_name(index: usize, name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Self::new(index)
        }
    }

    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the parent node handle, if any.
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    /// Returns a read-only slice of child node handles.
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    #[inline]
    #[must_use]
    pub fn mesh(&self) -> Option<MeshKey> {
        self.mesh
    }

    #[inline]
    #[must_use]
    pub fn skin(&self) -> Option<SkinKey> {
        self.skin
    }
}
