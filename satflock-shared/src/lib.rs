#![cfg_attr(not(feature = "std"), no_std)]

use satflock_core::{Agent, FlockParams, Link, Role, SteeringPolicy, Vector2D};
use serde::{Deserialize, Serialize};

/// A 2D position in screen coordinates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<Vector2D> for Position {
    fn from(v: Vector2D) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<Position> for Vector2D {
    fn from(p: Position) -> Self {
        Vector2D::new(p.x, p.y)
    }
}

/// What a renderer needs to place and rotate one satellite sprite
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AgentState {
    pub position: Position,
    pub heading: f32,
    pub leader: bool,
}

impl From<&Agent> for AgentState {
    fn from(agent: &Agent) -> Self {
        Self {
            position: agent.position.into(),
            heading: agent.heading,
            leader: agent.role == Role::Leader,
        }
    }
}

/// Indicator line between two satellites
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LinkSegment {
    pub from: Position,
    pub to: Position,
}

impl From<&Link> for LinkSegment {
    fn from(link: &Link) -> Self {
        Self {
            from: link.from.into(),
            to: link.to.into(),
        }
    }
}

/// Everything drawn for one tick
#[cfg(feature = "std")]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FrameSnapshot {
    pub tick: u64,
    pub agents: Vec<AgentState>,
    pub links: Vec<LinkSegment>,
    pub avoids: Vec<LinkSegment>,
    /// Centre of the leader marker
    pub leader: Option<Position>,
}

#[cfg(feature = "std")]
impl FrameSnapshot {
    pub fn capture(tick: u64, agents: &[Agent], report: &satflock_core::InteractionReport) -> Self {
        Self {
            tick,
            agents: agents.iter().map(AgentState::from).collect(),
            links: report.link_pairs.iter().map(LinkSegment::from).collect(),
            avoids: report.avoid_pairs.iter().map(LinkSegment::from).collect(),
            leader: agents
                .get(satflock_core::LEADER_INDEX)
                .map(|a| a.position.into()),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Initial circle the flock is placed on
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FormationSettings {
    pub count: usize,
    pub radius: f32,
    pub center: Position,
}

impl Default for FormationSettings {
    fn default() -> Self {
        Self {
            count: 10,
            radius: 130.0,
            center: Position::new(800.0, 400.0),
        }
    }
}

/// Flock simulation configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationSettings {
    pub neighbor_radius: f32,
    pub avoid_radius: f32,
    pub drift_speed: f32,
    pub spiral_drift: f32,
    pub spin_jitter_range: f32,
    pub world_width: f32,
    pub world_height: f32,
    /// Pull toward cohesion neighbours when nothing is too close
    pub cohesion: bool,
    pub seed: u64,
    pub formation: FormationSettings,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        let params = FlockParams::default();
        Self {
            neighbor_radius: params.neighbor_radius,
            avoid_radius: params.avoid_radius,
            drift_speed: params.drift_speed,
            spiral_drift: params.spiral_drift,
            spin_jitter_range: params.spin_jitter_range,
            world_width: params.world_width,
            world_height: params.world_height,
            cohesion: false,
            seed: 0,
            formation: FormationSettings::default(),
        }
    }
}

impl SimulationSettings {
    pub fn flock_params(&self) -> FlockParams {
        FlockParams {
            neighbor_radius: self.neighbor_radius,
            avoid_radius: self.avoid_radius,
            drift_speed: self.drift_speed,
            spiral_drift: self.spiral_drift,
            spin_jitter_range: self.spin_jitter_range,
            world_width: self.world_width,
            world_height: self.world_height,
            steering: if self.cohesion {
                SteeringPolicy::AvoidThenCohere
            } else {
                SteeringPolicy::AvoidOnly
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use satflock_core::InteractionReport;

    #[test]
    fn test_default_settings_match_params() {
        let settings = SimulationSettings::default();
        assert_eq!(settings.flock_params(), FlockParams::default());
        assert_eq!(settings.formation.count, 10);
    }

    #[test]
    fn test_cohesion_flag_selects_policy() {
        let settings = SimulationSettings {
            cohesion: true,
            ..SimulationSettings::default()
        };
        assert_eq!(
            settings.flock_params().steering,
            SteeringPolicy::AvoidThenCohere
        );
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let settings: SimulationSettings =
            serde_json::from_str(r#"{"avoid_radius": 40.0, "formation": {"count": 3}}"#).unwrap();
        assert_eq!(settings.avoid_radius, 40.0);
        assert_eq!(settings.neighbor_radius, 100.0);
        assert_eq!(settings.formation.count, 3);
        assert_eq!(settings.formation.radius, 130.0);
    }

    #[test]
    fn test_frame_capture() {
        let agents = vec![
            Agent::leader(Vector2D::new(1.0, 2.0), 0.0),
            Agent::follower(Vector2D::new(3.0, 4.0), 0.0),
        ];
        let report = InteractionReport {
            link_pairs: vec![],
            avoid_pairs: vec![Link {
                from_index: 1,
                to_index: 0,
                from: Vector2D::new(3.0, 4.0),
                to: Vector2D::new(1.0, 2.0),
            }],
        };

        let frame = FrameSnapshot::capture(7, &agents, &report);

        assert_eq!(frame.tick, 7);
        assert!(frame.agents[0].leader);
        assert!(!frame.agents[1].leader);
        assert_eq!(frame.leader, Some(Position::new(1.0, 2.0)));
        assert_eq!(frame.avoids[0].to, Position::new(1.0, 2.0));
        assert!(frame.to_json().unwrap().contains("\"tick\":7"));
    }
}
