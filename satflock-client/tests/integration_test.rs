use satflock_client::{load_settings, Driver};
use satflock_shared::{FrameSnapshot, SimulationSettings};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(json.as_bytes()).expect("write config");
    file
}

fn parse_frames(output: &[u8]) -> Vec<FrameSnapshot> {
    std::str::from_utf8(output)
        .expect("utf8 output")
        .lines()
        .map(|line| serde_json::from_str(line).expect("frame json"))
        .collect()
}

#[test]
fn test_config_file_overrides_defaults() {
    let file = write_config(r#"{"seed": 11, "formation": {"count": 4, "radius": 50.0}}"#);

    let settings = load_settings(Some(file.path())).unwrap();

    assert_eq!(settings.seed, 11);
    assert_eq!(settings.formation.count, 4);
    assert_eq!(settings.formation.radius, 50.0);
    assert_eq!(settings.neighbor_radius, 100.0);
}

#[test]
fn test_missing_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_settings(Some(&dir.path().join("nope.json"))).unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}

#[test]
fn test_malformed_config_is_an_error() {
    let file = write_config("{ not json");
    let err = load_settings(Some(file.path())).unwrap_err();
    assert!(err.to_string().contains("Invalid config file"));
}

#[test]
fn test_run_writes_every_nth_frame() {
    let mut driver = Driver::new(&SimulationSettings::default()).unwrap();
    let mut output = Vec::new();

    let summary = driver.run(30, 10, &mut output).unwrap();

    let frames = parse_frames(&output);
    assert_eq!(summary.ticks, 30);
    assert_eq!(summary.frames_written, 3);
    assert_eq!(
        frames.iter().map(|f| f.tick).collect::<Vec<_>>(),
        vec![10, 20, 30]
    );
    for frame in &frames {
        assert_eq!(frame.agents.len(), 10);
        assert_eq!(frame.agents.iter().filter(|a| a.leader).count(), 1);
        assert!(frame.agents[0].leader);
    }
}

#[test]
fn test_frames_stay_inside_world_width() {
    let settings = SimulationSettings {
        drift_speed: 5.0,
        ..SimulationSettings::default()
    };
    let mut driver = Driver::new(&settings).unwrap();
    let mut output = Vec::new();

    driver.run(400, 1, &mut output).unwrap();

    for frame in parse_frames(&output) {
        for agent in &frame.agents {
            assert!(agent.position.x >= 0.0 && agent.position.x < settings.world_width);
        }
    }
}

#[test]
fn test_same_seed_same_output() {
    let settings = SimulationSettings {
        seed: 1234,
        ..SimulationSettings::default()
    };
    let run = || {
        let mut driver = Driver::new(&settings).unwrap();
        let mut output = Vec::new();
        driver.run(120, 1, &mut output).unwrap();
        output
    };

    assert_eq!(run(), run());
}

#[test]
fn test_tight_formation_reports_avoidance() {
    let mut settings = SimulationSettings::default();
    settings.formation.radius = 30.0;
    let mut driver = Driver::new(&settings).unwrap();

    let frame = driver.advance();

    assert!(!frame.avoids.is_empty());
    assert!(frame.links.is_empty());
}

#[test]
fn test_invalid_settings_rejected() {
    let settings = SimulationSettings {
        world_width: 0.0,
        ..SimulationSettings::default()
    };
    assert!(Driver::new(&settings).is_err());
}

#[test]
fn test_shipped_config_matches_defaults() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../config/default.json");
    let settings = load_settings(Some(&path)).unwrap();
    assert_eq!(settings, SimulationSettings::default());
}
