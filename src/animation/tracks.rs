use crate::animation::values::Interpolatable;
use crate::errors::{Result, RigError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InterpolationMode {
    Linear,
    Step,
    CubicSpline,
}

impl InterpolationMode {
    /// Number of stored values per keyframe.
    #[inline]
    #[must_use]
    pub fn stride(self) -> usize {
        match self {
            InterpolationMode::CubicSpline => 3,
            InterpolationMode::Linear | InterpolationMode::Step => 1,
        }
    }
}

/// Keyframe times plus a value track and an interpolation rule.
///
/// Construction validates the data, so sampling never fails. Deserialized
/// tracks go through the same checks.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        try_from = "KeyframeTrackData<T>",
        bound(deserialize = "T: serde::Deserialize<'de>")
    )
)]
pub struct KeyframeTrack<T: Interpolatable> {
    times: Vec<f32>,
    /// For CubicSpline, length is `times.len() * 3`, laid out as
    /// `[in_tangent, value, out_tangent]` per keyframe.
    values: Vec<T>,
    interpolation: InterpolationMode,
}

/// Unvalidated wire form of a [`KeyframeTrack`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct KeyframeTrackData<T> {
    times: Vec<f32>,
    values: Vec<T>,
    interpolation: InterpolationMode,
}

#[cfg(feature = "serde")]
impl<T: Interpolatable> TryFrom<KeyframeTrackData<T>> for KeyframeTrack<T> {
    type Error = RigError;

    fn try_from(data: KeyframeTrackData<T>) -> Result<Self> {
        Self::new(data.times, data.values, data.interpolation)
    }
}

impl<T: Interpolatable> KeyframeTrack<T> {
    pub fn new(times: Vec<f32>, values: Vec<T>, interpolation: InterpolationMode) -> Result<Self> {
        if times.is_empty() {
            return Err(RigError::EmptyKeyframes);
        }

        if let Some(index) = times.iter().position(|t| !t.is_finite()) {
            return Err(RigError::NonFiniteKeyframe { index });
        }

        if let Some(index) = times.windows(2).position(|w| w[1] <= w[0]) {
            return Err(RigError::NonIncreasingKeyframes { index: index + 1 });
        }

        let expected = times.len() * interpolation.stride();
        if values.len() != expected {
            return Err(RigError::KeyframeCountMismatch {
                expected,
                actual: values.len(),
            });
        }

        Ok(Self {
            times,
            values,
            interpolation,
        })
    }

    #[inline]
    #[must_use]
    pub fn times(&self) -> &[f32] {
        &self.times
    }

    #[inline]
    #[must_use]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    #[inline]
    #[must_use]
    pub fn interpolation(&self) -> InterpolationMode {
        self.interpolation
    }

    /// First keyframe time.
    #[inline]
    #[must_use]
    pub fn start_time(&self) -> f32 {
        self.times[0]
    }

    /// Last keyframe time.
    #[inline]
    #[must_use]
    pub fn end_time(&self) -> f32 {
        self.times[self.times.len() - 1]
    }

    /// Locates the keyframe interval `[times[index], times[index + 1])`
    /// containing `time`.
    ///
    /// Times before the first key map to interval 0, times at or past the
    /// last key map to the final interval. A single-keyframe track always
    /// returns 0.
    #[must_use]
    pub fn interval(&self, time: f32) -> usize {
        let len = self.times.len();
        if len < 2 {
            return 0;
        }
        // partition_point finds the first index where t > time, i.e. next_index
        let next_idx = self.times.partition_point(|&t| t <= time);
        next_idx.saturating_sub(1).min(len - 2)
    }

    /// Evaluates the track at `time` inside the interval starting at `index`.
    ///
    /// The interpolation parameter is clamped to `[0, 1]`, which gives hold
    /// semantics before the first and after the last keyframe.
    #[must_use]
    pub fn evaluate(&self, index: usize, time: f32) -> T {
        let len = self.times.len();

        // Degenerate track: no interval to interpolate across
        if len < 2 {
            return self.value_at(0);
        }

        let index = index.min(len - 2);
        let next_idx = index + 1;
        let t0 = self.times[index];
        let t1 = self.times[next_idx];
        let delta = t1 - t0;

        let u = ((time - t0).max(0.0) / delta).clamp(0.0, 1.0);

        match self.interpolation {
            InterpolationMode::Step => {
                if u >= 1.0 {
                    self.value_at(next_idx)
                } else {
                    self.value_at(index)
                }
            }
            InterpolationMode::Linear => {
                T::interpolate_linear(self.value_at(index), self.value_at(next_idx), u)
            }
            InterpolationMode::CubicSpline => {
                let i_prev = index * 3;
                let i_next = next_idx * 3;

                // The first keyframe's in-tangent drives both tangent terms
                let tangent = self.values[i_prev];
                let v0 = self.values[i_prev + 1];
                let v1 = self.values[i_next + 1];

                T::interpolate_cubic(v0, tangent, v1, u, delta)
            }
        }
    }

    /// Samples the track at an arbitrary time.
    #[must_use]
    pub fn sample(&self, time: f32) -> T {
        self.evaluate(self.interval(time), time)
    }

    /// Unified value accessor.
    /// For Linear/Step, the index is used directly.
    /// For CubicSpline, the value is at index * 3 + 1.
    fn value_at(&self, index: usize) -> T {
        match self.interpolation {
            InterpolationMode::CubicSpline => self.values[index * 3 + 1],
            InterpolationMode::Linear | InterpolationMode::Step => self.values[index],
        }
    }
}
