use glam::{Quat, Vec3, Vec4};

/// A value that can be carried by a keyframe track.
pub trait Interpolatable: Copy + Sized {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self;

    /// Cubic Hermite interpolation over an interval of length `dt`.
    ///
    /// `tangent` is the in-tangent of the interval's first keyframe, stored per
    /// unit time and scaled by `dt`. It feeds both the `h10` and `h11` terms;
    /// baked animation data depends on this exact blend.
    fn interpolate_cubic(v0: Self, tangent: Self, v1: Self, t: f32, dt: f32) -> Self;
}

/// Hermite basis `(h00, h10, h01, h11)` at `t`.
#[inline]
fn hermite_basis(t: f32) -> (f32, f32, f32, f32) {
    let t2 = t * t;
    let t3 = t2 * t;

    let h01 = -2.0 * t3 + 3.0 * t2;
    let h11 = t3 - t2;
    let h00 = 1.0 - h01;
    let h10 = h11 - t2 + t;

    (h00, h10, h01, h11)
}

impl Interpolatable for Vec3 {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start.lerp(end, t)
    }

    fn interpolate_cubic(v0: Self, tangent: Self, v1: Self, t: f32, dt: f32) -> Self {
        let (h00, h10, h01, h11) = hermite_basis(t);

        let m0 = tangent * dt;

        v0 * h00 + m0 * h10 + v1 * h01 + m0 * h11
    }
}

impl Interpolatable for Quat {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        // Renormalize to counter drift
        start.slerp(end, t).normalize()
    }

    fn interpolate_cubic(v0: Self, tangent: Self, v1: Self, t: f32, dt: f32) -> Self {
        let (h00, h10, h01, h11) = hermite_basis(t);

        let v0_v = Vec4::from(v0);
        let v1_v = Vec4::from(v1);
        let m0_v = Vec4::from(tangent) * dt;

        let result = v0_v * h00 + m0_v * h10 + v1_v * h01 + m0_v * h11;

        Quat::from_vec4(result).normalize()
    }
}
