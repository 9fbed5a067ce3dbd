//! Initial placement of a flock

use crate::{sin_cos, Agent, Role, Vector2D, LEADER_INDEX};

/// Agents evenly spaced on a circle of `radius` around `center`, starting at
/// the bottom of the circle (+y) and going counter-clockwise in screen space.
/// Agent 0 is the leader. Headings start at zero and `spin_for(i)` supplies
/// each spin rate.
pub fn circle<F>(
    count: usize,
    center: Vector2D,
    radius: f32,
    mut spin_for: F,
) -> impl Iterator<Item = Agent>
where
    F: FnMut(usize) -> f32,
{
    (0..count).map(move |i| {
        let theta = i as f32 * 2.0 * core::f32::consts::PI / count as f32;
        let (sin, cos) = sin_cos(theta);
        let position = Vector2D::new(center.x + radius * sin, center.y + radius * cos);
        let role = if i == LEADER_INDEX {
            Role::Leader
        } else {
            Role::Follower
        };
        Agent::new(position, 0.0, spin_for(i), role)
    })
}

/// Spin rate drawn uniformly from `[-range / 2, range / 2)`
#[cfg(feature = "std")]
pub fn random_spin<R: rand::Rng + ?Sized>(rng: &mut R, range: f32) -> f32 {
    (rng.gen::<f32>() - 0.5) * range
}
