pub mod binding;
pub mod clip;
pub mod evaluator;
pub mod tracks;
pub mod values;

pub use binding::{AnimationChannel, TargetPath};
pub use clip::{Animation, AnimationSampler, SampledValue};
pub use evaluator::apply_animation;
pub use tracks::{InterpolationMode, KeyframeTrack};
pub use values::Interpolatable;
