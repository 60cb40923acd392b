use glam::{Quat, Vec3};

use crate::animation::binding::{AnimationChannel, TargetPath};
use crate::animation::tracks::{InterpolationMode, KeyframeTrack};
use crate::errors::{Result, RigError};

/// One interpolation source, tagged by value shape.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AnimationSampler {
    /// Translation or scale keys
    Vector3(KeyframeTrack<Vec3>),
    /// Rotation keys (unit quaternions)
    Quaternion(KeyframeTrack<Quat>),
}

/// A value produced by sampling an [`AnimationSampler`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampledValue {
    Vector3(Vec3),
    Quaternion(Quat),
}

impl AnimationSampler {
    pub fn vector3(times: Vec<f32>, values: Vec<Vec3>, interpolation: InterpolationMode) -> Result<Self> {
        KeyframeTrack::new(times, values, interpolation).map(Self::Vector3)
    }

    pub fn quaternion(times: Vec<f32>, values: Vec<Quat>, interpolation: InterpolationMode) -> Result<Self> {
        KeyframeTrack::new(times, values, interpolation).map(Self::Quaternion)
    }

    #[must_use]
    pub fn interpolation(&self) -> InterpolationMode {
        match self {
            Self::Vector3(track) => track.interpolation(),
            Self::Quaternion(track) => track.interpolation(),
        }
    }

    /// Keyframe times.
    #[must_use]
    pub fn inputs(&self) -> &[f32] {
        match self {
            Self::Vector3(track) => track.times(),
            Self::Quaternion(track) => track.times(),
        }
    }

    /// Whether a channel targeting `path` can consume this sampler's values.
    #[must_use]
    pub fn accepts(&self, path: TargetPath) -> bool {
        matches!(
            (self, path),
            (Self::Vector3(_), TargetPath::Translation | TargetPath::Scale)
                | (Self::Quaternion(_), TargetPath::Rotation)
        )
    }

    /// Locates the keyframe interval containing `time`.
    #[must_use]
    pub fn interval(&self, time: f32) -> usize {
        match self {
            Self::Vector3(track) => track.interval(time),
            Self::Quaternion(track) => track.interval(time),
        }
    }

    /// Evaluates the interval starting at `index` at `time`.
    #[must_use]
    pub fn evaluate(&self, index: usize, time: f32) -> SampledValue {
        match self {
            Self::Vector3(track) => SampledValue::Vector3(track.evaluate(index, time)),
            Self::Quaternion(track) => SampledValue::Quaternion(track.evaluate(index, time)),
        }
    }

    #[must_use]
    pub fn sample(&self, time: f32) -> SampledValue {
        self.evaluate(self.interval(time), time)
    }
}

/// Channels, samplers and the derived time bounds of one animation.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "AnimationData"))]
pub struct Animation {
    pub name: String,
    channels: Vec<AnimationChannel>,
    samplers: Vec<AnimationSampler>,
    #[cfg_attr(feature = "serde", serde(skip_serializing))]
    start: f32,
    #[cfg_attr(feature = "serde", serde(skip_serializing))]
    end: f32,
}

/// Unvalidated wire form of an [`Animation`]. Time bounds are re-derived.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct AnimationData {
    name: String,
    channels: Vec<AnimationChannel>,
    samplers: Vec<AnimationSampler>,
}

#[cfg(feature = "serde")]
impl TryFrom<AnimationData> for Animation {
    type Error = RigError;

    fn try_from(data: AnimationData) -> Result<Self> {
        Self::new(&data.name, data.samplers, data.channels)
    }
}

impl Animation {
    /// Builds an animation, checking that every channel references an
    /// existing sampler of a compatible shape.
    ///
    /// Target nodes are checked when the animation is added to a
    /// [`Scene`](crate::scene::Scene).
    pub fn new(name: &str, samplers: Vec<AnimationSampler>, channels: Vec<AnimationChannel>) -> Result<Self> {
        for (channel_idx, channel) in channels.iter().enumerate() {
            let sampler = samplers.get(channel.sampler_index).ok_or(RigError::SamplerIndexOutOfBounds {
                channel: channel_idx,
                index: channel.sampler_index,
                count: samplers.len(),
            })?;

            if !sampler.accepts(channel.path) {
                return Err(RigError::ChannelShapeMismatch {
                    channel: channel_idx,
                    path: channel.path,
                });
            }
        }

        let (start, end) = if samplers.is_empty() {
            (0.0, 0.0)
        } else {
            samplers.iter().fold((f32::MAX, f32::MIN), |(start, end), sampler| {
                let inputs = sampler.inputs();
                (start.min(inputs[0]), end.max(inputs[inputs.len() - 1]))
            })
        };

        Ok(Self {
            name: name.to_string(),
            channels,
            samplers,
            start,
            end,
        })
    }

    #[inline]
    #[must_use]
    pub fn channels(&self) -> &[AnimationChannel] {
        &self.channels
    }

    #[inline]
    #[must_use]
    pub fn samplers(&self) -> &[AnimationSampler] {
        &self.samplers
    }

    /// Earliest keyframe time over all samplers.
    #[inline]
    #[must_use]
    pub fn start(&self) -> f32 {
        self.start
    }

    /// Latest keyframe time over all samplers.
    #[inline]
    #[must_use]
    pub fn end(&self) -> f32 {
        self.end
    }

    #[inline]
    #[must_use]
    pub fn duration(&self) -> f32 {
        self.end - self.start
    }
}
