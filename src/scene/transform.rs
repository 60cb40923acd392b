use glam::{Mat4, Quat, Vec3};

/// Transform component
///
/// Holds a node's local TRS, an optional baseline matrix and the memoized
/// local/world matrices guarded by a single validity flag.
///
/// `local = T(translation) * R(rotation) * S(scale) * base_matrix`
///
/// The public TRS fields may be written freely (the animation evaluator does
/// so every frame); writes are only observed by the cached matrices after the
/// cache is invalidated, which the forced propagation pass does for every
/// node it visits.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transform {
    // === Public TRS ===
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,

    /// Raw matrix supplied by the source asset instead of TRS.
    /// Identity when the source used TRS.
    base_matrix: Mat4,

    // === Matrix cache ===
    cached_local: Mat4,
    cached_world: Mat4,
    cache_valid: bool,

    /// Number of times the world matrix was rebuilt from scratch.
    #[cfg_attr(feature = "serde", serde(skip))]
    world_computations: u64,
}

impl Transform {
    #[must_use]
    pub fn new() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            base_matrix: Mat4::IDENTITY,

            cached_local: Mat4::IDENTITY,
            cached_world: Mat4::IDENTITY,
            cache_valid: false,

            world_computations: 0,
        }
    }

    /// Creates a transform from TRS components.
    #[must_use]
    pub fn from_trs(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
            ..Self::new()
        }
    }

    /// Creates a transform whose local matrix is exactly `matrix`.
    ///
    /// Unlike decomposing into TRS this keeps shear and projective terms.
    #[must_use]
    pub fn from_matrix(matrix: Mat4) -> Self {
        let mut transform = Self::new();
        transform.set_base_matrix(matrix);
        transform
    }

    // ========================================================================
    // Matrix composition
    // ========================================================================

    /// Builds the local matrix from the current TRS and base matrix,
    /// bypassing the cache.
    #[must_use]
    pub fn compose(&self) -> Mat4 {
        Mat4::from_translation(self.translation)
            * Mat4::from_quat(self.rotation)
            * Mat4::from_scale(self.scale)
            * self.base_matrix
    }

    /// Returns the memoized local matrix, rebuilding it while the cache is
    /// stale.
    ///
    /// Does not set the validity flag: that flag also covers the world
    /// matrix, which only the hierarchy walk can produce.
    pub fn local_matrix(&mut self) -> Mat4 {
        if !self.cache_valid {
            self.cached_local = self.compose();
        }
        self.cached_local
    }

    /// Returns the cached world matrix if the cache is valid.
    #[inline]
    #[must_use]
    pub fn cached_world(&self) -> Option<Mat4> {
        self.cache_valid.then_some(self.cached_world)
    }

    /// Stores a freshly computed world matrix and marks the cache valid.
    pub(crate) fn store_world(&mut self, world: Mat4) {
        self.cached_world = world;
        self.cache_valid = true;
        self.world_computations += 1;
    }

    // ========================================================================
    // Cache state
    // ========================================================================

    /// Marks both cached matrices stale.
    #[inline]
    pub fn invalidate(&mut self) {
        self.cache_valid = false;
    }

    #[inline]
    #[must_use]
    pub fn is_cache_valid(&self) -> bool {
        self.cache_valid
    }

    /// Diagnostic counter: how many times the world matrix was recomputed.
    #[inline]
    #[must_use]
    pub fn world_computations(&self) -> u64 {
        self.world_computations
    }

    // ========================================================================
    // Getters & Helpers
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn base_matrix(&self) -> &Mat4 {
        &self.base_matrix
    }

    /// Sets the baseline matrix (used by loaders whose source node carries a
    /// matrix instead of TRS) and invalidates the cache.
    pub fn set_base_matrix(&mut self, matrix: Mat4) {
        self.base_matrix = matrix;
        self.invalidate();
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compose_applies_scale_then_rotation_then_translation() {
        let t = Transform::from_trs(
            Vec3::new(1.0, 2.0, 3.0),
            Quat::from_rotation_z(std::f32::consts::FRAC_PI_2),
            Vec3::splat(2.0),
        );

        // X axis: scaled to 2, rotated onto +Y, then translated
        let p = t.compose().transform_point3(Vec3::X);
        assert!((p - Vec3::new(1.0, 4.0, 3.0)).length() < 1e-5, "got {p}");
    }

    #[test]
    fn base_matrix_is_applied_last() {
        let mut t = Transform::from_matrix(Mat4::from_translation(Vec3::X));
        t.scale = Vec3::splat(3.0);

        let p = t.compose().transform_point3(Vec3::ZERO);
        assert!((p - Vec3::new(3.0, 0.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn local_matrix_is_memoized_while_valid() {
        let mut t = Transform::new();
        t.translation = Vec3::X;
        let first = t.local_matrix();
        t.store_world(first);

        // TRS write without invalidation is not observed
        t.translation = Vec3::Y;
        assert_eq!(t.local_matrix(), first);

        t.invalidate();
        assert_eq!(t.local_matrix(), Mat4::from_translation(Vec3::Y));
    }
}
