use glam::Mat4;
use rustc_hash::FxHashMap;
use slotmap::SlotMap;

use crate::animation::{self, Animation};
use crate::errors::{Result, RigError};
use crate::scene::mesh::Mesh;
use crate::scene::node::Node;
use crate::scene::skin::Skin;
use crate::scene::transform_system;
use crate::scene::{MeshKey, NodeHandle, SkinKey};

/// Scene graph container
///
/// Owns the node arena and the mesh, skin and animation stores populated by
/// the loader. Per frame, the playback driver calls
/// [`apply_animation`](Self::apply_animation) followed by
/// [`update`](Self::update); the renderer then reads each mesh's uniform block.
#[derive(Debug, Default)]
pub struct Scene {
    nodes: SlotMap<NodeHandle, Node>,
    pub(crate) root_nodes: Vec<NodeHandle>,

    // ==== Component stores ====
    meshes: SlotMap<MeshKey, Mesh>,
    skins: SlotMap<SkinKey, Skin>,
    animations: Vec<Animation>,

    /// Stable source index -> handle
    index_lookup: FxHashMap<usize, NodeHandle>,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Hierarchy
    // ========================================================================

    /// Adds a node as a new root.
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        let index = node.index;
        let handle = self.nodes.insert(node);
        self.register_index(index, handle);
        self.root_nodes.push(handle);
        handle
    }

    /// Adds a node as the last child of `parent`.
    pub fn add_to_parent(&mut self, mut child: Node, parent: NodeHandle) -> Result<NodeHandle> {
        if !self.nodes.contains_key(parent) {
            return Err(RigError::NodeNotFound(format!("parent of node {}", child.index)));
        }

        let index = child.index;
        child.parent = Some(parent);
        let handle = self.nodes.insert(child);
        self.register_index(index, handle);
        self.nodes[parent].children.push(handle);

        Ok(handle)
    }

    /// Maps a stable index to its handle. A duplicate index keeps the newest
    /// node reachable through [`node_by_index`](Self::node_by_index).
    fn register_index(&mut self, index: usize, handle: NodeHandle) {
        if self.index_lookup.insert(index, handle).is_some() {
            log::warn!("Duplicate node index {index}, lookup now resolves to the newest node");
        }
    }

    /// Re-parents `child` under `parent`, detaching it from its previous
    /// parent (or from the root list).
    pub fn attach(&mut self, child: NodeHandle, parent: NodeHandle) {
        if child == parent {
            log::warn!("Cannot attach node to itself!");
            return;
        }
        if !self.nodes.contains_key(child) || !self.nodes.contains_key(parent) {
            log::warn!("Node not found during attach!");
            return;
        }
        if self.is_ancestor(child, parent) {
            log::warn!("Cannot attach node to its own descendant!");
            return;
        }

        // 1. Detach from old
        self.detach_from_parent(child);

        // 2. Attach to new
        self.nodes[parent].children.push(child);
        self.nodes[child].parent = Some(parent);

        // 3. The whole subtree now has a different chain of ancestors
        transform_system::invalidate_subtree(&mut self.nodes, child);
    }

    /// Removes a node and its whole subtree, along with the meshes owned by
    /// the removed nodes (see [`set_mesh`](Self::set_mesh)). Skins are shared
    /// and stay in the scene.
    pub fn remove_node(&mut self, handle: NodeHandle) {
        if !self.nodes.contains_key(handle) {
            return;
        }

        self.detach_from_parent(handle);

        let mut stack = vec![handle];
        let mut removed = 0usize;
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.remove(current) else {
                continue;
            };
            if let Some(mesh_key) = node.mesh {
                self.meshes.remove(mesh_key);
            }
            if self.index_lookup.get(&node.index) == Some(&current) {
                self.index_lookup.remove(&node.index);
            }
            stack.extend(node.children);
            removed += 1;
        }

        log::debug!("Removed subtree of {removed} nodes");
    }

    /// Unlinks `handle` from its parent's child list or from the root list.
    fn detach_from_parent(&mut self, handle: NodeHandle) {
        match self.nodes.get(handle).and_then(Node::parent) {
            Some(parent) => {
                if let Some(p) = self.nodes.get_mut(parent)
                    && let Some(i) = p.children.iter().position(|&x| x == handle)
                {
                    p.children.remove(i);
                }
            }
            None => {
                if let Some(i) = self.root_nodes.iter().position(|&x| x == handle) {
                    self.root_nodes.remove(i);
                }
            }
        }
        if let Some(node) = self.nodes.get_mut(handle) {
            node.parent = None;
        }
    }

    /// Whether `ancestor` lies on the parent chain of `node` (or is `node`).
    fn is_ancestor(&self, ancestor: NodeHandle, node: NodeHandle) -> bool {
        let mut current = Some(node);
        while let Some(handle) = current {
            if handle == ancestor {
                return true;
            }
            current = self.nodes.get(handle).and_then(Node::parent);
        }
        false
    }

    // ========================================================================
    // Node queries
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    /// Mutable access, e.g. for writing TRS. Writes are picked up by the
    /// next [`update`](Self::update).
    #[inline]
    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    #[inline]
    #[must_use]
    pub fn root_nodes(&self) -> &[NodeHandle] {
        &self.root_nodes
    }

    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeHandle, &Node)> {
        self.nodes.iter()
    }

    /// Looks a node up by its stable source index.
    #[must_use]
    pub fn node_by_index(&self, index: usize) -> Option<NodeHandle> {
        self.index_lookup.get(&index).copied()
    }

    /// Depth-first search for a node named `name` in the subtree of `root`.
    #[must_use]
    pub fn find_node_by_name(&self, root: NodeHandle, name: &str) -> Option<NodeHandle> {
        let node = self.nodes.get(root)?;
        if node.name() == Some(name) {
            return Some(root);
        }
        node.children
            .iter()
            .find_map(|&child| self.find_node_by_name(child, name))
    }

    // ========================================================================
    // Components
    // ========================================================================

    pub fn add_mesh(&mut self, mesh: Mesh) -> MeshKey {
        self.meshes.insert(mesh)
    }

    /// Links a mesh to a node, which then owns it.
    ///
    /// A mesh belongs to one node only, since [`update`](Self::update) writes
    /// the node's world matrix into it.
    pub fn set_mesh(&mut self, node: NodeHandle, mesh: MeshKey) -> Result<()> {
        if !self.meshes.contains_key(mesh) {
            return Err(RigError::ComponentNotFound("mesh for node link".to_string()));
        }
        if let Some((_, owner)) = self
            .nodes
            .iter()
            .find(|&(handle, n)| handle != node && n.mesh == Some(mesh))
        {
            return Err(RigError::MeshAlreadyLinked { owner: owner.index });
        }
        let node = self
            .nodes
            .get_mut(node)
            .ok_or_else(|| RigError::NodeNotFound("mesh target".to_string()))?;
        node.mesh = Some(mesh);
        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn mesh(&self, key: MeshKey) -> Option<&Mesh> {
        self.meshes.get(key)
    }

    /// Adds a skin after checking that every joint and the skeleton root
    /// exist in this scene.
    pub fn add_skin(&mut self, skin: Skin) -> Result<SkinKey> {
        if let Some(pos) = skin.joints().iter().position(|&j| !self.nodes.contains_key(j)) {
            return Err(RigError::NodeNotFound(format!("joint {pos} of skin '{}'", skin.name)));
        }
        if let Some(root) = skin.skeleton_root()
            && !self.nodes.contains_key(root)
        {
            return Err(RigError::NodeNotFound(format!("skeleton root of skin '{}'", skin.name)));
        }

        log::debug!("Added skin '{}' with {} joints", skin.name, skin.joints().len());
        Ok(self.skins.insert(skin))
    }

    /// Links a skin to a node. The palette is only produced when the node
    /// also carries a mesh.
    pub fn set_skin(&mut self, node: NodeHandle, skin: SkinKey) -> Result<()> {
        if !self.skins.contains_key(skin) {
            return Err(RigError::ComponentNotFound("skin for node link".to_string()));
        }
        let node = self
            .nodes
            .get_mut(node)
            .ok_or_else(|| RigError::NodeNotFound("skin target".to_string()))?;
        node.skin = Some(skin);
        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn skin(&self, key: SkinKey) -> Option<&Skin> {
        self.skins.get(key)
    }

    // ========================================================================
    // Animations
    // ========================================================================

    /// Adds an animation after checking that every channel targets a node of
    /// this scene. Returns the animation's index.
    pub fn add_animation(&mut self, animation: Animation) -> Result<usize> {
        if let Some(pos) = animation
            .channels()
            .iter()
            .position(|c| !self.nodes.contains_key(c.target))
        {
            return Err(RigError::NodeNotFound(format!(
                "target of channel {pos} in animation '{}'",
                animation.name
            )));
        }

        log::debug!(
            "Added animation '{}' ({} channels, {:.3}s..{:.3}s)",
            animation.name,
            animation.channels().len(),
            animation.start(),
            animation.end()
        );
        self.animations.push(animation);
        Ok(self.animations.len() - 1)
    }

    #[inline]
    #[must_use]
    pub fn animations(&self) -> &[Animation] {
        &self.animations
    }

    #[must_use]
    pub fn animation_index(&self, name: &str) -> Option<usize> {
        self.animations.iter().position(|a| a.name == name)
    }

    /// Applies animation `index` at `time` to its target nodes' TRS.
    ///
    /// Call [`update`](Self::update) afterwards to propagate the new pose.
    pub fn apply_animation(&mut self, index: usize, time: f32) -> Result<()> {
        let clip = self
            .animations
            .get(index)
            .ok_or(RigError::AnimationIndexOutOfBounds {
                index,
                count: self.animations.len(),
            })?;

        animation::apply_animation(&mut self.nodes, clip, time);
        Ok(())
    }

    // ========================================================================
    // Transforms
    // ========================================================================

    /// Memoized local matrix of a node.
    pub fn local_matrix(&mut self, handle: NodeHandle) -> Option<Mat4> {
        transform_system::local_matrix(&mut self.nodes, handle)
    }

    /// Memoized world matrix of a node.
    pub fn world_matrix(&mut self, handle: NodeHandle) -> Option<Mat4> {
        transform_system::world_matrix(&mut self.nodes, handle)
    }

    /// Marks one node's cached matrices stale.
    pub fn invalidate(&mut self, handle: NodeHandle) {
        if let Some(node) = self.nodes.get_mut(handle) {
            node.transform.invalidate();
        }
    }

    /// Forced propagation of one subtree.
    ///
    /// The subtree is invalidated up front so skinned meshes never read a
    /// joint below them that has not been refreshed yet.
    pub fn update_node(&mut self, handle: NodeHandle) {
        transform_system::invalidate_subtree(&mut self.nodes, handle);
        transform_system::update_node(&mut self.nodes, &mut self.meshes, &self.skins, handle);
    }

    /// Forced propagation of every root, refreshing mesh matrices and joint
    /// palettes. Run once per frame after animations were applied.
    pub fn update(&mut self) {
        transform_system::invalidate_all(&mut self.nodes);
        transform_system::update_hierarchy(&mut self.nodes, &mut self.meshes, &self.skins, &self.root_nodes);
    }
}
