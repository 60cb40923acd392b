//! # Myth Rig
//!
//! Runtime transform and animation core: a node hierarchy with memoized
//! world matrices, skinning joint palettes and keyframe animation evaluation.
//!
//! One frame is:
//!
//! ```rust,ignore
//! scene.apply_animation(walk, time)?; // mutate TRS of target nodes
//! scene.update();                     // propagate matrices and joint palettes
//! upload(scene.mesh(body).unwrap().as_bytes());
//! ```

pub mod animation;
pub mod errors;
pub mod scene;

pub use animation::{
    Animation, AnimationChannel, AnimationSampler, InterpolationMode, KeyframeTrack, TargetPath,
};
pub use errors::{Result, RigError};
pub use scene::{MAX_JOINTS, Mesh, MeshKey, Node, NodeHandle, Scene, Skin, SkinKey, Transform};
