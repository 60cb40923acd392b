use glam::Mat4;
use slotmap::SlotMap;

use crate::errors::{Result, RigError};
use crate::scene::mesh::{MAX_JOINTS, MeshUniform};
use crate::scene::transform_system;
use crate::scene::{Node, NodeHandle};

#[derive(Debug, Clone)]
pub struct Skin {
    pub name: String,

    // === Core Data ===
    // Joint list: ordered array, corresponds to joint index in shader.
    // joints[i] corresponds to jointMatrix[i] in shader.
    // Joints are owned by the scene graph, not the skin.
    joints: Vec<NodeHandle>,

    // Inverse Bind Matrices
    // Static data from the asset; one per joint.
    // Purpose: transforms vertices from mesh space to joint local space
    inverse_bind_matrices: Vec<Mat4>,

    skeleton_root: Option<NodeHandle>,
}

impl Skin {
    pub fn new(
        name: &str,
        joints: Vec<NodeHandle>,
        inverse_bind_matrices: Vec<Mat4>,
        skeleton_root: Option<NodeHandle>,
    ) -> Result<Self> {
        if joints.len() != inverse_bind_matrices.len() {
            return Err(RigError::InverseBindCountMismatch {
                joints: joints.len(),
                matrices: inverse_bind_matrices.len(),
            });
        }

        if joints.len() > MAX_JOINTS {
            log::warn!(
                "Skin '{name}' has {} joints; only the first {MAX_JOINTS} are used",
                joints.len()
            );
        }

        Ok(Self {
            name: name.to_string(),
            joints,
            inverse_bind_matrices,
            skeleton_root,
        })
    }

    #[inline]
    #[must_use]
    pub fn joints(&self) -> &[NodeHandle] {
        &self.joints
    }

    #[inline]
    #[must_use]
    pub fn inverse_bind_matrices(&self) -> &[Mat4] {
        &self.inverse_bind_matrices
    }

    #[inline]
    #[must_use]
    pub fn skeleton_root(&self) -> Option<NodeHandle> {
        self.skeleton_root
    }

    /// Number of palette entries this skin produces (capped at [`MAX_JOINTS`]).
    #[inline]
    #[must_use]
    pub fn joint_count(&self) -> usize {
        self.joints.len().min(MAX_JOINTS)
    }

    /// Updates the joint palette of a skinned mesh.
    ///
    /// # Arguments
    /// * `nodes`: Global node storage; each joint's world matrix is read
    ///   through the memoized [`transform_system::world_matrix`]
    /// * `mesh_world`: World matrix of the node carrying the skinned mesh
    ///   (its inverse brings joint transforms back to mesh space)
    /// * `output`: The mesh uniform block receiving the palette
    pub fn compute_joint_matrices(
        &self,
        nodes: &mut SlotMap<NodeHandle, Node>,
        mesh_world: Mat4,
        output: &mut MeshUniform,
    ) {
        let inverse_mesh_world = mesh_world.inverse();
        let count = self.joint_count();

        for (i, (&joint, ibm)) in self
            .joints
            .iter()
            .zip(&self.inverse_bind_matrices)
            .take(count)
            .enumerate()
        {
            // A joint removed after load falls back to an identity world transform
            let joint_world = transform_system::world_matrix(nodes, joint).unwrap_or(Mat4::IDENTITY);

            // Apply IBM (to joint local), then the joint's current world
            // transform, then cancel the mesh's own transform
            output.joint_matrix[i] = inverse_mesh_world * joint_world * *ibm;
        }

        output.joint_count = count as u32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatched_inverse_bind_count_is_rejected() {
        let mut nodes: SlotMap<NodeHandle, Node> = SlotMap::with_key();
        let a = nodes.insert(Node::new(0));
        let b = nodes.insert(Node::new(1));

        let err = Skin::new("skin", vec![a, b], vec![Mat4::IDENTITY], None).unwrap_err();
        assert_eq!(
            err,
            RigError::InverseBindCountMismatch {
                joints: 2,
                matrices: 1
            }
        );
    }

    #[test]
    fn joint_count_is_capped() {
        let mut nodes: SlotMap<NodeHandle, Node> = SlotMap::with_key();
        let joints: Vec<_> = (0..70).map(|i| nodes.insert(Node::new(i))).collect();
        let skin = Skin::new("big", joints, vec![Mat4::IDENTITY; 70], None).unwrap();

        assert_eq!(skin.joints().len(), 70);
        assert_eq!(skin.joint_count(), MAX_JOINTS);
    }
}
