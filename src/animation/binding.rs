use crate::scene::NodeHandle;

/// Defines the target property for animation data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetPath {
    Translation, // Maps to transform.translation
    Rotation,    // Maps to transform.rotation
    Scale,       // Maps to transform.scale
}

/// Binds one sampler of an [`Animation`](crate::animation::Animation) to one
/// property of one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnimationChannel {
    pub path: TargetPath,
    /// Non-owning reference into the scene's node arena
    pub target: NodeHandle,
    /// Index into the owning animation's sampler list
    pub sampler_index: usize,
}

impl AnimationChannel {
    #[must_use]
    pub fn new(path: TargetPath, target: NodeHandle, sampler_index: usize) -> Self {
        Self {
            path,
            target,
            sampler_index,
        }
    }
}
