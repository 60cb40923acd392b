use bytemuck::{Pod, Zeroable};
use glam::Mat4;

/// Capacity of the joint palette uploaded per skinned mesh.
pub const MAX_JOINTS: usize = 64;

/// GPU-facing per-mesh uniform block.
///
/// Layout matches a std140 block of `mat4 matrix; mat4 jointMatrix[64]; uint jointCount;`
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct MeshUniform {
    /// World transform of the owning node
    pub matrix: Mat4,
    /// Skinning palette; entries past `joint_count` are unspecified
    pub joint_matrix: [Mat4; MAX_JOINTS],
    pub joint_count: u32,
    _padding: [u32; 3],
}

impl Default for MeshUniform {
    fn default() -> Self {
        Self {
            matrix: Mat4::IDENTITY,
            joint_matrix: [Mat4::IDENTITY; MAX_JOINTS],
            joint_count: 0,
            _padding: [0; 3],
        }
    }
}

/// Mesh instance as seen by the transform core.
///
/// Geometry and GPU buffers belong to the renderer; this only carries the
/// per-frame matrices the renderer reads for draw submission.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub name: Option<String>,
    uniform: MeshUniform,
}

impl Mesh {
    #[must_use]
    pub fn new(name: Option<&str>) -> Self {
        Self {
            name: name.map(str::to_string),
            uniform: MeshUniform::default(),
        }
    }

    #[inline]
    #[must_use]
    pub fn uniform(&self) -> &MeshUniform {
        &self.uniform
    }

    #[inline]
    pub(crate) fn uniform_mut(&mut self) -> &mut MeshUniform {
        &mut self.uniform
    }

    /// World matrix written by the last propagation pass.
    #[inline]
    #[must_use]
    pub fn matrix(&self) -> &Mat4 {
        &self.uniform.matrix
    }

    #[inline]
    #[must_use]
    pub fn joint_count(&self) -> usize {
        self.uniform.joint_count as usize
    }

    /// The active part of the joint palette.
    #[inline]
    #[must_use]
    pub fn joint_matrices(&self) -> &[Mat4] {
        &self.uniform.joint_matrix[..self.joint_count()]
    }

    /// Raw bytes of the uniform block, ready for a buffer upload.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(&self.uniform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_size_matches_std140_block() {
        // 65 mat4 + uint padded to 16 bytes
        assert_eq!(std::mem::size_of::<MeshUniform>(), 65 * 64 + 16);
        assert_eq!(Mesh::new(None).as_bytes().len(), 65 * 64 + 16);
    }

    #[test]
    fn new_mesh_has_empty_palette() {
        let mesh = Mesh::new(Some("body"));
        assert_eq!(mesh.joint_count(), 0);
        assert!(mesh.joint_matrices().is_empty());
        assert_eq!(*mesh.matrix(), Mat4::IDENTITY);
    }
}
