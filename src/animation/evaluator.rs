use slotmap::SlotMap;

use crate::animation::binding::TargetPath;
use crate::animation::clip::{Animation, SampledValue};
use crate::scene::{Node, NodeHandle};

/// Applies one time sample of `animation` to its target nodes.
///
/// Each channel's value is written into the matching TRS field of its target
/// and the target's matrix cache is marked stale. No matrices are recomputed
/// here; run the propagation pass on the affected roots afterwards.
///
/// `time` outside `[animation.start(), animation.end()]` holds the first or
/// last keyframe. Looping is the caller's concern.
pub fn apply_animation(nodes: &mut SlotMap<NodeHandle, Node>, animation: &Animation, time: f32) {
    let samplers = animation.samplers();

    for channel in animation.channels() {
        let sampler = &samplers[channel.sampler_index];
        let Some(node) = nodes.get_mut(channel.target) else {
            continue;
        };

        let index = sampler.interval(time);
        let transform = &mut node.transform;

        match (sampler.evaluate(index, time), channel.path) {
            (SampledValue::Vector3(v), TargetPath::Translation) => transform.translation = v,
            (SampledValue::Vector3(v), TargetPath::Scale) => transform.scale = v,
            (SampledValue::Quaternion(q), TargetPath::Rotation) => transform.rotation = q,
            // Rejected when the animation was built
            _ => continue,
        }

        transform.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::binding::AnimationChannel;
    use crate::animation::clip::AnimationSampler;
    use crate::animation::tracks::InterpolationMode;
    use glam::{Quat, Vec3};

    #[test]
    fn writes_each_path_and_invalidates_target() {
        let mut nodes: SlotMap<NodeHandle, Node> = SlotMap::with_key();
        let node = nodes.insert(Node::new(0));

        let samplers = vec![
            AnimationSampler::vector3(vec![0.0, 1.0], vec![Vec3::ZERO, Vec3::X], InterpolationMode::Linear).unwrap(),
            AnimationSampler::quaternion(
                vec![0.0, 1.0],
                vec![Quat::IDENTITY, Quat::from_rotation_y(1.0)],
                InterpolationMode::Step,
            )
            .unwrap(),
            AnimationSampler::vector3(vec![0.0], vec![Vec3::splat(3.0)], InterpolationMode::Step).unwrap(),
        ];
        let channels = vec![
            AnimationChannel::new(TargetPath::Translation, node, 0),
            AnimationChannel::new(TargetPath::Rotation, node, 1),
            AnimationChannel::new(TargetPath::Scale, node, 2),
        ];
        let animation = Animation::new("walk", samplers, channels).unwrap();

        crate::scene::transform_system::world_matrix(&mut nodes, node);
        assert!(nodes[node].transform.is_cache_valid());

        apply_animation(&mut nodes, &animation, 0.5);

        let transform = &nodes[node].transform;
        assert!(!transform.is_cache_valid());
        assert!((transform.translation - Vec3::new(0.5, 0.0, 0.0)).length() < 1e-6);
        assert_eq!(transform.rotation, Quat::IDENTITY);
        assert_eq!(transform.scale, Vec3::splat(3.0));
    }
}
