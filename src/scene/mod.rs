//! Scene graph module
//!
//! Manages the node hierarchy and its components:
//! - Node: scene node (parent/child links, transform, component keys)
//! - Transform: TRS with memoized local/world matrices
//! - Mesh: GPU-facing world matrix and joint palette
//! - Skin: joint list and inverse bind matrices
//! - Scene: arena container, load-time validation, animation entry point
//! - transform_system: memoized queries and forced propagation

pub mod mesh;
pub mod node;
#[allow(clippy::module_inception)]
pub mod scene;
pub mod skin;
pub mod transform;
pub mod transform_system;

pub use mesh::{MAX_JOINTS, Mesh, MeshUniform};
pub use node::Node;
pub use scene::Scene;
pub use skin::Skin;
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeHandle;
    pub struct MeshKey;
    pub struct SkinKey;
}
