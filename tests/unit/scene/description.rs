use super::*;

const MINIMAL: &str = r#"{
    "nodes": [
        { "id": "hip", "x": 0.0, "y": 0.0, "w": 10.0 },
        { "id": "knee", "x": 0.0, "y": 50.0, "w": 8.0, "mass": 3.0,
          "motion": { "kind": "Swing", "params": { "x": 1.0, "y": 0.0 } } }
    ],
    "constraints": [
        { "n0": "hip", "n1": "knee", "art": "thigh" }
    ],
    "art": {
        "thigh": "<svg xmlns='http://www.w3.org/2000/svg' width='10' height='50'/>"
    }
}"#;

#[test]
fn defaults_fill_optional_fields() {
    let d = RigDescription::from_json_str(MINIMAL).unwrap();
    assert_eq!(d.nodes.len(), 2);
    assert_eq!(d.nodes[0].mass, 1.0);
    assert!(d.nodes[0].motion.is_none());
    assert_eq!(d.nodes[1].mass, 3.0);
    assert_eq!(d.nodes[1].motion, Motion::Swing { x: 1.0, y: 0.0 });

    let c = &d.constraints[0];
    assert_eq!((c.x, c.y, c.a), (0.0, 0.0, 0.0));
    assert_eq!(c.art.as_deref(), Some("thigh"));
    assert!(d.opts.is_none());
    d.validate().unwrap();
}

#[test]
fn partial_opts_block_keeps_other_defaults() {
    let d = RigDescription::from_json_str(
        r#"{ "nodes": [], "constraints": [], "opts": { "pace_idle": 40 } }"#,
    )
    .unwrap();
    let opts = d.opts.unwrap();
    assert_eq!(opts.pace_idle, 40);
    assert_eq!(opts.pace_excited, RigOpts::default().pace_excited);
}

#[test]
fn node_index_follows_declaration_order() {
    let d = RigDescription::from_json_str(MINIMAL).unwrap();
    assert_eq!(d.node_index("hip"), Some(0));
    assert_eq!(d.node_index("knee"), Some(1));
    assert_eq!(d.node_index("ankle"), None);
}

#[test]
fn malformed_json_is_serde_error() {
    let err = RigDescription::from_json_str("{ \"nodes\": 3 }").unwrap_err();
    assert!(matches!(err, MarionetteError::Serde(_)));
}

#[test]
fn pretty_json_parses_back() {
    let d = RigDescription::from_json_str(MINIMAL).unwrap();
    let s = d.to_json_pretty().unwrap();
    assert_eq!(RigDescription::from_json_str(&s).unwrap(), d);
}

#[test]
fn missing_file_is_validation_error() {
    let err = RigDescription::from_path("does/not/exist.json").unwrap_err();
    assert!(matches!(err, MarionetteError::Validation(_)));
}
