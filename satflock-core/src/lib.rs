#![cfg_attr(not(feature = "std"), no_std)]

pub mod formation;
mod report;

pub use report::{BoundedReport, InteractionSink, Link};
#[cfg(feature = "std")]
pub use report::InteractionReport;

/// Index of the single agent exempt from flocking forces
pub const LEADER_INDEX: usize = 0;

fn sqrt(v: f32) -> f32 {
    #[cfg(feature = "std")]
    {
        v.sqrt()
    }
    #[cfg(not(feature = "std"))]
    {
        libm::sqrtf(v)
    }
}

fn sin_cos(angle: f32) -> (f32, f32) {
    #[cfg(feature = "std")]
    {
        angle.sin_cos()
    }
    #[cfg(not(feature = "std"))]
    {
        (libm::sinf(angle), libm::cosf(angle))
    }
}

/// A 2D vector used for positions and steering
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2D {
    pub x: f32,
    pub y: f32,
}

impl Vector2D {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Unit vector pointing along `angle` (radians)
    pub fn from_angle(angle: f32) -> Self {
        let (sin, cos) = sin_cos(angle);
        Self { x: cos, y: sin }
    }

    pub fn magnitude(&self) -> f32 {
        sqrt(self.x * self.x + self.y * self.y)
    }

    /// Unit vector in the same direction. A zero-length vector stays zero.
    pub fn normalize(&self) -> Self {
        let mag = self.magnitude();
        if mag > 0.0 {
            Self {
                x: self.x / mag,
                y: self.y / mag,
            }
        } else {
            Self::zero()
        }
    }

    pub fn distance(&self, other: &Vector2D) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        sqrt(dx * dx + dy * dy)
    }
}

impl core::ops::Add for Vector2D {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl core::ops::Sub for Vector2D {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl core::ops::Mul<f32> for Vector2D {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

impl core::ops::Div<f32> for Vector2D {
    type Output = Self;

    fn div(self, scalar: f32) -> Self {
        Self {
            x: self.x / scalar,
            y: self.y / scalar,
        }
    }
}

impl core::ops::AddAssign for Vector2D {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Leader,
    Follower,
}

/// A single satellite
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    pub position: Vector2D,
    /// Heading in radians
    pub heading: f32,
    pub role: Role,
    spin_rate: f32,
}

impl Agent {
    pub fn new(position: Vector2D, heading: f32, spin_rate: f32, role: Role) -> Self {
        Self {
            position,
            heading,
            role,
            spin_rate,
        }
    }

    pub fn leader(position: Vector2D, spin_rate: f32) -> Self {
        Self::new(position, 0.0, spin_rate, Role::Leader)
    }

    pub fn follower(position: Vector2D, spin_rate: f32) -> Self {
        Self::new(position, 0.0, spin_rate, Role::Follower)
    }

    /// Angular velocity in radians per tick, fixed at creation
    pub fn spin_rate(&self) -> f32 {
        self.spin_rate
    }

    pub fn is_leader(&self) -> bool {
        self.role == Role::Leader
    }
}

/// How a follower turns its neighbour scan into a steering nudge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SteeringPolicy {
    /// Steer away from avoidance obstacles; cohesion neighbours are recorded
    /// but never pull.
    #[default]
    AvoidOnly,
    /// Avoidance still wins outright. With no obstacles, steer toward the
    /// centroid of cohesion neighbours.
    AvoidThenCohere,
}

/// Configuration for the flock, fixed for a run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlockParams {
    pub neighbor_radius: f32,
    /// Must be smaller than `neighbor_radius`
    pub avoid_radius: f32,
    /// Forward crawl along +x per tick
    pub drift_speed: f32,
    /// Magnitude of the heading-aligned spiral drift per tick
    pub spiral_drift: f32,
    /// Width of the interval spin rates are drawn from, centred on zero
    pub spin_jitter_range: f32,
    pub world_width: f32,
    pub world_height: f32,
    pub steering: SteeringPolicy,
}

impl Default for FlockParams {
    fn default() -> Self {
        Self {
            neighbor_radius: 100.0,
            avoid_radius: 70.0,
            drift_speed: 0.1,
            spiral_drift: 0.05,
            spin_jitter_range: 0.1,
            world_width: 1490.0,
            world_height: 745.0,
            steering: SteeringPolicy::AvoidOnly,
        }
    }
}

/// Distance band a neighbour falls in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    None,
    Cohesion,
    Avoidance,
}

impl Band {
    pub fn classify(distance: f32, params: &FlockParams) -> Self {
        if distance >= params.neighbor_radius {
            Band::None
        } else if distance > params.avoid_radius {
            Band::Cohesion
        } else {
            Band::Avoidance
        }
    }
}

/// Per-agent rules making up one tick
pub mod behavior {
    use super::*;

    /// Scan every other agent from the read-only snapshot `agents` and return
    /// the steering nudge for `agents[index]`. Pairs found are pushed into
    /// `sink`. The agent at `LEADER_INDEX` never steers and records nothing,
    /// whatever its `role` says.
    pub fn steering<S: InteractionSink>(
        agents: &[Agent],
        index: usize,
        params: &FlockParams,
        sink: &mut S,
    ) -> Vector2D {
        if index == LEADER_INDEX {
            return Vector2D::zero();
        }
        let agent = &agents[index];

        let mut obstacle_sum = Vector2D::zero();
        let mut obstacles = 0usize;
        let mut neighbor_sum = Vector2D::zero();
        let mut neighbors = 0usize;

        for (j, other) in agents.iter().enumerate() {
            if j == index {
                continue;
            }
            let distance = agent.position.distance(&other.position);
            let link = Link {
                from_index: index,
                to_index: j,
                from: agent.position,
                to: other.position,
            };
            match Band::classify(distance, params) {
                Band::None => {}
                Band::Cohesion => {
                    neighbor_sum += other.position;
                    neighbors += 1;
                    sink.record_link(link);
                }
                Band::Avoidance => {
                    obstacle_sum += other.position;
                    obstacles += 1;
                    sink.record_avoid(link);
                }
            }
        }

        if obstacles > 0 {
            let centroid = obstacle_sum / obstacles as f32;
            return (agent.position - centroid).normalize();
        }

        match params.steering {
            SteeringPolicy::AvoidThenCohere if neighbors > 0 => {
                let centroid = neighbor_sum / neighbors as f32;
                (centroid - agent.position).normalize()
            }
            _ => Vector2D::zero(),
        }
    }

    /// Baseline drift: spin the heading, then crawl forward plus a small
    /// heading-aligned spiral.
    pub fn drift(agent: &mut Agent, params: &FlockParams) {
        agent.heading += agent.spin_rate;
        let forward = Vector2D::new(params.drift_speed, 0.0);
        agent.position += forward + Vector2D::from_angle(agent.heading) * params.spiral_drift;
    }

    /// Single horizontal wrap into `[0, world_width)`. The vertical axis is
    /// left unbounded.
    pub fn wrap(agent: &mut Agent, world_width: f32) {
        if agent.position.x >= world_width {
            agent.position.x -= world_width;
        } else if agent.position.x < 0.0 {
            agent.position.x += world_width;
            // -tiny + width can round up to width itself
            if agent.position.x >= world_width {
                agent.position.x = 0.0;
            }
        }
    }

    pub fn advance(agent: &mut Agent, steer: Vector2D, params: &FlockParams) {
        drift(agent, params);
        agent.position += steer;
        wrap(agent, params.world_width);
    }
}

/// Advance every agent by one tick.
///
/// Reads happen against tick-start state only: every steering vector is
/// computed into `steer` before any agent is moved, so the result does not
/// depend on iteration order.
///
/// # Panics
///
/// If `steer` is shorter than `agents`.
pub fn step_into<S: InteractionSink>(
    agents: &mut [Agent],
    steer: &mut [Vector2D],
    params: &FlockParams,
    sink: &mut S,
) {
    assert!(
        steer.len() >= agents.len(),
        "steer buffer holds {} vectors for {} agents",
        steer.len(),
        agents.len()
    );

    for (index, slot) in steer.iter_mut().enumerate().take(agents.len()) {
        *slot = behavior::steering(agents, index, params, sink);
    }

    for (agent, nudge) in agents.iter_mut().zip(steer.iter()) {
        behavior::advance(agent, *nudge, params);
    }
}

/// Advance every agent by one tick and report the pairs found
#[cfg(feature = "std")]
pub fn step(agents: &mut [Agent], params: &FlockParams) -> InteractionReport {
    let mut report = InteractionReport::default();
    let mut steer = vec![Vector2D::zero(); agents.len()];
    step_into(agents, &mut steer, params, &mut report);
    log::trace!(
        "stepped {} agents: {} links, {} avoids",
        agents.len(),
        report.link_pairs.len(),
        report.avoid_pairs.len()
    );
    report
}

/// A flock for embedded (no_std) environments
pub struct Flock<const N: usize> {
    pub agents: heapless::Vec<Agent, N>,
    pub params: FlockParams,
}

impl<const N: usize> Flock<N> {
    /// Place `count` agents on a circle. `None` if `count` exceeds `N`.
    pub fn new<F>(
        count: usize,
        center: Vector2D,
        radius: f32,
        params: FlockParams,
        spin_for: F,
    ) -> Option<Self>
    where
        F: FnMut(usize) -> f32,
    {
        if count > N {
            return None;
        }
        let mut agents = heapless::Vec::new();
        for agent in formation::circle(count, center, radius, spin_for) {
            agents.push(agent).ok()?;
        }
        Some(Self { agents, params })
    }

    pub fn step<S: InteractionSink>(&mut self, sink: &mut S) {
        let mut steer = [Vector2D::zero(); N];
        step_into(&mut self.agents, &mut steer, &self.params, sink);
        log::trace!("stepped {} agents", self.agents.len());
    }

    pub fn leader(&self) -> Option<&Agent> {
        self.agents.get(LEADER_INDEX)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.params.world_width = width;
        self.params.world_height = height;
    }
}

/// A flock for std environments
#[cfg(feature = "std")]
pub struct FlockStd {
    pub agents: Vec<Agent>,
    pub params: FlockParams,
}

#[cfg(feature = "std")]
impl FlockStd {
    /// Place `count` agents on a circle with spin rates drawn from `rng`
    pub fn new<R: rand::Rng>(
        count: usize,
        center: Vector2D,
        radius: f32,
        params: FlockParams,
        rng: &mut R,
    ) -> Self {
        let range = params.spin_jitter_range;
        let agents =
            formation::circle(count, center, radius, |_| formation::random_spin(rng, range))
                .collect();
        Self { agents, params }
    }

    /// Take ownership of prebuilt agents. Roles are reassigned by index so
    /// only `LEADER_INDEX` is the leader.
    pub fn from_agents(mut agents: Vec<Agent>, params: FlockParams) -> Self {
        for (i, agent) in agents.iter_mut().enumerate() {
            agent.role = if i == LEADER_INDEX {
                Role::Leader
            } else {
                Role::Follower
            };
        }
        Self { agents, params }
    }

    pub fn step(&mut self) -> InteractionReport {
        step(&mut self.agents, &self.params)
    }

    pub fn leader(&self) -> Option<&Agent> {
        self.agents.get(LEADER_INDEX)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.params.world_width = width;
        self.params.world_height = height;
    }
}
