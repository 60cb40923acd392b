//! Transform System
//!
//! Memoized matrix queries and the forced per-frame propagation pass over the
//! node arena. Decoupled from [`Scene`](crate::scene::Scene) so that only the
//! node, mesh and skin stores are borrowed, never the whole scene.
//!
//! # Two entry points
//!
//! - [`world_matrix`] reads with memoization: the first call after an
//!   invalidation walks the parent chain, later calls return the cache.
//! - [`update_hierarchy`] forces a fresh frame: every visited node is
//!   invalidated, recomputed, pushes its matrix into its mesh (and joint
//!   palette when skinned), then recurses into its children in order.
//!
//! A child's update always runs after its parent's world matrix for the frame
//! has been computed.

use glam::Mat4;
use slotmap::SlotMap;

use crate::scene::mesh::Mesh;
use crate::scene::node::Node;
use crate::scene::skin::Skin;
use crate::scene::{MeshKey, NodeHandle, SkinKey};

/// Returns the node's local matrix, rebuilding it if the node's cache is stale.
pub fn local_matrix(nodes: &mut SlotMap<NodeHandle, Node>, handle: NodeHandle) -> Option<Mat4> {
    nodes.get_mut(handle).map(|node| node.transform.local_matrix())
}

/// Returns the node's world matrix.
///
/// On a cache miss the product of local matrices is accumulated from the node
/// up to its root. Ancestors contribute only their local matrices, so their
/// own world caches are neither required nor touched.
pub fn world_matrix(nodes: &mut SlotMap<NodeHandle, Node>, handle: NodeHandle) -> Option<Mat4> {
    let node = nodes.get_mut(handle)?;
    if let Some(world) = node.transform.cached_world() {
        return Some(world);
    }

    let mut world = node.transform.local_matrix();
    let mut parent = node.parent;

    while let Some(parent_handle) = parent {
        let Some(ancestor) = nodes.get_mut(parent_handle) else {
            break;
        };
        world = ancestor.transform.local_matrix() * world;
        parent = ancestor.parent;
    }

    if let Some(node) = nodes.get_mut(handle) {
        node.transform.store_world(world);
    }
    Some(world)
}

/// Marks a node and all of its descendants stale.
pub fn invalidate_subtree(nodes: &mut SlotMap<NodeHandle, Node>, root: NodeHandle) {
    let mut stack: Vec<NodeHandle> = Vec::with_capacity(64);
    stack.push(root);

    while let Some(handle) = stack.pop() {
        let Some(node) = nodes.get_mut(handle) else {
            continue;
        };
        node.transform.invalidate();
        stack.extend_from_slice(&node.children);
    }
}

/// Marks every node in the arena stale.
pub fn invalidate_all(nodes: &mut SlotMap<NodeHandle, Node>) {
    for (_, node) in nodes.iter_mut() {
        node.transform.invalidate();
    }
}

/// Forced propagation for every root, in order.
pub fn update_hierarchy(
    nodes: &mut SlotMap<NodeHandle, Node>,
    meshes: &mut SlotMap<MeshKey, Mesh>,
    skins: &SlotMap<SkinKey, Skin>,
    roots: &[NodeHandle],
) {
    for &root_handle in roots {
        update_node(nodes, meshes, skins, root_handle);
    }
}

/// Forced propagation for one node and its subtree.
///
/// Joints of a skin attached to this node are read through [`world_matrix`];
/// callers that need joints below this node to be fresh must invalidate the
/// subtree first (see [`Scene::update_node`](crate::scene::Scene::update_node)).
pub fn update_node(
    nodes: &mut SlotMap<NodeHandle, Node>,
    meshes: &mut SlotMap<MeshKey, Mesh>,
    skins: &SlotMap<SkinKey, Skin>,
    handle: NodeHandle,
) {
    // Phase 1: this node
    let (mesh_key, skin_key, child_count) = {
        let Some(node) = nodes.get_mut(handle) else {
            return;
        };
        node.transform.invalidate();
        (node.mesh, node.skin, node.children.len())
    };

    let Some(world) = world_matrix(nodes, handle) else {
        return;
    };

    if let Some(mesh) = mesh_key.and_then(|key| meshes.get_mut(key)) {
        let uniform = mesh.uniform_mut();
        uniform.matrix = world;

        if let Some(skin) = skin_key.and_then(|key| skins.get(key)) {
            skin.compute_joint_matrices(nodes, world, uniform);
        }
    }

    // Phase 2: children, re-reading the list to avoid cloning it
    for i in 0..child_count {
        let Some(&child) = nodes.get(handle).and_then(|n| n.children.get(i)) else {
            break;
        };
        update_node(nodes, meshes, skins, child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_hierarchy_update() {
        let mut nodes: SlotMap<NodeHandle, Node> = SlotMap::with_key();
        let mut meshes: SlotMap<MeshKey, Mesh> = SlotMap::with_key();
        let skins: SlotMap<SkinKey, Skin> = SlotMap::with_key();

        let mut parent = Node::new(0);
        parent.transform.translation = Vec3::new(1.0, 0.0, 0.0);
        let parent_handle = nodes.insert(parent);

        let mut child = Node::new(1);
        child.transform.translation = Vec3::new(0.0, 1.0, 0.0);
        child.parent = Some(parent_handle);
        let child_handle = nodes.insert(child);

        nodes[parent_handle].children.push(child_handle);

        update_hierarchy(&mut nodes, &mut meshes, &skins, &[parent_handle]);

        let child_world_pos = nodes[child_handle]
            .transform
            .cached_world()
            .unwrap()
            .w_axis
            .truncate();
        assert!((child_world_pos - Vec3::new(1.0, 1.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn world_matrix_does_not_require_valid_ancestors() {
        let mut nodes: SlotMap<NodeHandle, Node> = SlotMap::with_key();

        let mut root = Node::new(0);
        root.transform.scale = Vec3::splat(2.0);
        let root_handle = nodes.insert(root);

        let mut leaf = Node::new(1);
        leaf.transform.translation = Vec3::X;
        leaf.parent = Some(root_handle);
        let leaf_handle = nodes.insert(leaf);
        nodes[root_handle].children.push(leaf_handle);

        let world = world_matrix(&mut nodes, leaf_handle).unwrap();
        assert!((world.w_axis.truncate() - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-6);

        // Only the queried node was cached
        assert!(nodes[leaf_handle].transform.is_cache_valid());
        assert!(!nodes[root_handle].transform.is_cache_valid());
    }

    #[test]
    fn invalidate_subtree_reaches_all_descendants() {
        let mut nodes: SlotMap<NodeHandle, Node> = SlotMap::with_key();
        let a = nodes.insert(Node::new(0));
        let b = nodes.insert(Node::new(1));
        let c = nodes.insert(Node::new(2));
        nodes[a].children.push(b);
        nodes[b].parent = Some(a);
        nodes[b].children.push(c);
        nodes[c].parent = Some(b);

        for h in [a, b, c] {
            world_matrix(&mut nodes, h);
            assert!(nodes[h].transform.is_cache_valid());
        }

        invalidate_subtree(&mut nodes, b);
        assert!(nodes[a].transform.is_cache_valid());
        assert!(!nodes[b].transform.is_cache_valid());
        assert!(!nodes[c].transform.is_cache_valid());
    }
}
