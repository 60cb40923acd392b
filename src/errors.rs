//! Error Types
//!
//! This module defines the error types used throughout the crate.
//!
//! # Overview
//!
//! The main error type [`RigError`] covers load-time data-integrity failures:
//! - Malformed keyframe data (empty, non-increasing or non-finite times)
//! - Mismatched keyframe/value counts
//! - Dangling channel, sampler, joint or node references
//!
//! Per-frame evaluation assumes validated data and does not produce errors,
//! with the exception of an unknown animation index supplied by the playback
//! driver.
//!
//! # Usage
//!
//! ```rust,ignore
//! use myth_rig::errors::{RigError, Result};
//!
//! fn build_track() -> Result<()> {
//!     // Construction returns an error instead of producing wrong poses
//!     Ok(())
//! }
//! ```

use thiserror::Error;

use crate::animation::TargetPath;

/// The main error type for the rig core.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RigError {
    // ========================================================================
    // Keyframe Data Errors
    // ========================================================================
    /// A sampler was constructed without any keyframe times.
    #[error("Keyframe track has no keyframes")]
    EmptyKeyframes,

    /// Keyframe times must be strictly increasing.
    #[error("Keyframe times are not strictly increasing at index {index}")]
    NonIncreasingKeyframes {
        /// Index of the first offending keyframe
        index: usize,
    },

    /// Keyframe times must be finite.
    #[error("Keyframe time at index {index} is not finite")]
    NonFiniteKeyframe {
        /// Index of the offending keyframe
        index: usize,
    },

    /// The value track length does not match the keyframe count and stride.
    #[error("Keyframe value count mismatch: expected {expected}, got {actual}")]
    KeyframeCountMismatch {
        /// Expected number of values
        expected: usize,
        /// Provided number of values
        actual: usize,
    },

    // ========================================================================
    // Animation Binding Errors
    // ========================================================================
    /// A channel references a sampler that does not exist.
    #[error("Channel {channel} references sampler {index}, but only {count} samplers exist")]
    SamplerIndexOutOfBounds {
        /// Channel position in the animation
        channel: usize,
        /// The invalid sampler index
        index: usize,
        /// Number of samplers in the animation
        count: usize,
    },

    /// A channel's target path does not accept the sampler's value shape.
    #[error("Channel {channel} targets {path:?} with an incompatible sampler")]
    ChannelShapeMismatch {
        /// Channel position in the animation
        channel: usize,
        /// The channel's target path
        path: TargetPath,
    },

    /// The playback driver asked for an animation that does not exist.
    #[error("Animation index out of bounds: {index} (count: {count})")]
    AnimationIndexOutOfBounds {
        /// The invalid index
        index: usize,
        /// Number of animations in the scene
        count: usize,
    },

    // ========================================================================
    // Scene Graph Errors
    // ========================================================================
    /// A node reference is not present in the scene.
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// A mesh or skin key is not present in the scene.
    #[error("Component not found: {0}")]
    ComponentNotFound(String),

    /// Each mesh is owned by a single node.
    #[error("Mesh is already linked to node {owner}")]
    MeshAlreadyLinked {
        /// Stable index of the node that owns the mesh
        owner: usize,
    },

    /// A skin must carry one inverse bind matrix per joint.
    #[error("Skin has {joints} joints but {matrices} inverse bind matrices")]
    InverseBindCountMismatch {
        /// Number of joints
        joints: usize,
        /// Number of inverse bind matrices
        matrices: usize,
    },
}

/// Alias for `Result<T, RigError>`.
pub type Result<T> = std::result::Result<T, RigError>;
