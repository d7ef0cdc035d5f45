use super::*;
use crate::physics::motion::Motion;
use crate::render::surface::SurfaceOpts;

const LIMB: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="40"><rect width="10" height="40" fill="#c0c0c0"/></svg>"##;

fn two_limbs(art_b: &str) -> RigDescription {
    let json = format!(
        r#"{{
        "nodes": [
            {{ "id": "a", "x": 0.0, "y": 100.0, "w": 10.0 }},
            {{ "id": "b", "x": 0.0, "y": 150.0, "w": 10.0 }},
            {{ "id": "c", "x": 0.0, "y": 200.0, "w": 10.0,
               "motion": {{ "kind": "Swing", "params": {{ "x": 1.0, "y": 0.0 }} }} }}
        ],
        "constraints": [
            {{ "n0": "a", "n1": "b", "art": "upper", "x": -5.0 }},
            {{ "n0": "a", "n1": "c" }},
            {{ "n0": "b", "n1": "c", "art": "lower", "x": -5.0 }}
        ],
        "art": {{ "upper": {limb:?}, "lower": {art_b:?} }}
    }}"#,
        limb = LIMB,
        art_b = art_b,
    );
    RigDescription::from_json_str(&json).unwrap()
}

fn vp() -> Viewport {
    Viewport::new(1100, 1100).unwrap()
}

fn ready_rig() -> Rig {
    let mut rig = Rig::new(RigId(1), &two_limbs(LIMB), DecodeMode::Inline).unwrap();
    assert!(rig.load(vp()).unwrap());
    rig
}

#[test]
fn builds_arena_in_declaration_order() {
    let desc = two_limbs(LIMB);
    let opts = RigOpts::default().with_anchor_x(40.0);
    let rig = Rig::with_opts(RigId(0), &desc, opts, DecodeMode::Inline).unwrap();
    assert_eq!(rig.nodes().len(), 3);
    assert_eq!(rig.nodes()[1].pos, Point::new(40.0, 150.0));
    assert_eq!(rig.nodes()[1].prev, rig.nodes()[1].pos);
    assert_eq!(rig.nodes()[2].force, opts.force_idle);
    assert_eq!(rig.drawables(), &[0, 2]);
    assert_eq!(rig.constraints()[1].n0, 0);
    assert_eq!(rig.constraints()[1].n1, 2);
    assert_eq!(rig.constraints()[0].rest_dist_sq(), 2500.0);
}

#[test]
fn dangling_reference_is_fatal() {
    let mut desc = two_limbs(LIMB);
    desc.constraints[1].n1 = "zz".to_string();
    let err = Rig::new(RigId(0), &desc, DecodeMode::Inline).unwrap_err();
    assert!(matches!(err, MarionetteError::Validation(_)));
}

#[test]
fn becomes_ready_once_all_art_decoded() {
    let mut rig = Rig::new(RigId(1), &two_limbs(LIMB), DecodeMode::Inline).unwrap();
    assert_eq!(rig.state(), RigState::Loading);
    assert!(rig.load(vp()).unwrap());
    assert_eq!(rig.state(), RigState::Ready);

    let status = rig.load_status();
    assert_eq!((status.loaded, status.total), (2, 2));
    assert!(!status.is_stuck());
    for &ci in rig.drawables() {
        let bm = rig.constraints()[ci].art().unwrap().bitmap().unwrap();
        assert_eq!((bm.width(), bm.height()), (11, 41));
    }
}

#[test]
fn background_decode_reaches_ready() {
    let mut rig = Rig::new(RigId(1), &two_limbs(LIMB), DecodeMode::Background).unwrap();
    assert!(rig.finish_loading(vp()).unwrap());
    assert!(rig.is_ready());
}

#[test]
fn failed_art_keeps_rig_loading_and_is_reported() {
    let mut rig = Rig::new(RigId(1), &two_limbs("<svg"), DecodeMode::Inline).unwrap();
    assert!(!rig.load(vp()).unwrap());
    assert_eq!(rig.state(), RigState::Loading);

    let status = rig.load_status();
    assert_eq!((status.loaded, status.total), (1, 2));
    assert!(status.is_stuck());
    assert_eq!(status.failed[0].0, 2);
    assert_eq!(status.failed[0].1, "lower");

    // Ticking still works and only the decoded limb is painted.
    let mut surface = Surface::new(vp(), SurfaceOpts::default());
    let mut input = InteractionState::new();
    surface.clear();
    rig.tick(&mut surface, &mut input).unwrap();
    assert_eq!(surface.draw_count(), 1);
    assert_eq!(rig.state(), RigState::Loading);
}

#[test]
fn rig_without_art_is_ready_on_first_load() {
    let mut desc = two_limbs(LIMB);
    for c in &mut desc.constraints {
        c.art = None;
    }
    let mut rig = Rig::new(RigId(1), &desc, DecodeMode::Inline).unwrap();
    assert!(rig.load(vp()).unwrap());
}

#[test]
fn resize_regenerates_every_bitmap() {
    let mut rig = ready_rig();
    rig.resize(Viewport::new(550, 800).unwrap()).unwrap();
    for &ci in rig.drawables() {
        let bm = rig.constraints()[ci].art().unwrap().bitmap().unwrap();
        assert_eq!((bm.width(), bm.height()), (6, 21));
    }

    // Zero-sized surface keeps what we had.
    rig.resize(Viewport::new(0, 800).unwrap()).unwrap();
    let bm = rig.constraints()[0].art().unwrap().bitmap().unwrap();
    assert_eq!((bm.width(), bm.height()), (6, 21));
}

#[test]
fn direction_flips_every_pace_frames() {
    let mut rig = ready_rig();
    let mut input = InteractionState::new();
    for _ in 0..27 {
        rig.step(vp(), &mut input);
    }
    assert_eq!(rig.direction(), 1.0);
    rig.step(vp(), &mut input);
    assert_eq!(rig.direction(), -1.0);

    rig.down();
    assert_eq!(rig.pace(), 10);
    // frame 28 -> next multiple of 10 is 30
    rig.step(vp(), &mut input);
    assert_eq!(rig.direction(), -1.0);
    rig.step(vp(), &mut input);
    assert_eq!(rig.direction(), 1.0);
}

#[test]
fn down_and_up_switch_mode_parameters() {
    let mut rig = ready_rig();
    rig.down();
    assert_eq!(rig.mode(), Mode::Excited);
    assert_eq!(rig.friction(), 0.99);
    assert_eq!(rig.pace(), 10);
    assert!(rig.nodes().iter().all(|n| n.force == 2.0));

    rig.up();
    assert_eq!(rig.mode(), Mode::Idle);
    assert_eq!(rig.friction(), 1.0);
    assert_eq!(rig.pace(), 28);
    assert!(rig.nodes().iter().all(|n| n.force == 0.6));
}

#[test]
fn relax_pulls_perturbed_link_back() {
    let mut rig = ready_rig();
    rig.nodes_mut()[1].pos = Point::new(0.0, 180.0);
    let before = (rig.nodes()[1].pos - rig.nodes()[0].pos).hypot();
    rig.relax();
    let after = (rig.nodes()[1].pos - rig.nodes()[0].pos).hypot();
    assert!((after - 50.0).abs() < (before - 50.0).abs());
}

#[test]
fn press_claims_node_then_drag_follows_pointer() {
    let mut rig = ready_rig();
    let mut input = InteractionState::new();
    // Node "a" sits at (0, 100) -> (550, 100) px at scale 1.
    input.press_at(560.0, 100.0);
    rig.step(vp(), &mut input);
    assert_eq!(
        input.drag(),
        Some(DragTarget {
            rig: RigId(1),
            node: 0
        })
    );

    input.move_to(750.0, 100.0);
    let x0 = rig.nodes()[0].pos.x;
    for _ in 0..5 {
        rig.step(vp(), &mut input);
    }
    assert!(rig.nodes()[0].pos.x > x0 + 20.0);

    input.release();
    rig.step(vp(), &mut input);
    assert_eq!(input.drag(), None);
}

#[test]
fn own_drag_freezes_scripted_motion() {
    let mut rig = ready_rig();
    let mut input = InteractionState::new();
    input.press_at(-9000.0, -9000.0);
    input.claim(DragTarget {
        rig: RigId(1),
        node: 0,
    });
    let nodes = rig.nodes().to_vec();
    let mut opts = *rig.opts();
    opts.drag_rate = 0.0;
    rig.opts = opts;
    rig.step(vp(), &mut input);
    assert_eq!(rig.nodes(), nodes.as_slice());
    assert!(matches!(rig.nodes()[2].motion, Motion::Swing { .. }));
}

#[test]
fn other_rig_drag_makes_nodes_follow() {
    let mut rig = ready_rig();
    let mut input = InteractionState::new();
    input.press_at(1050.0, 100.0);
    input.claim(DragTarget {
        rig: RigId(99),
        node: 0,
    });
    let x0 = rig.nodes()[0].pos.x;
    rig.step(vp(), &mut input);
    assert!(rig.nodes()[0].pos.x > x0);

    // With following disabled a foreign drag changes nothing compared to no drag at all.
    let mut still = ready_rig();
    still.opts = still.opts().with_follow_rate(0.0);
    let mut input = InteractionState::new();
    input.press_at(1050.0, 100.0);
    input.claim(DragTarget {
        rig: RigId(99),
        node: 0,
    });
    let mut reference = ready_rig();
    let mut idle_input = InteractionState::new();
    for _ in 0..3 {
        still.step(vp(), &mut input);
        reference.step(vp(), &mut idle_input);
    }
    assert_eq!(still.nodes(), reference.nodes());
}

#[test]
fn tick_paints_in_declaration_order() {
    let mut rig = ready_rig();
    let mut surface = Surface::new(vp(), SurfaceOpts::default());
    let mut input = InteractionState::new();
    surface.clear();
    rig.tick(&mut surface, &mut input).unwrap();
    assert_eq!(surface.draw_count(), 2);
    assert_eq!(rig.frame(), 1);
}

#[test]
fn tick_picks_up_surface_resize() {
    let mut rig = ready_rig();
    let mut surface = Surface::new(Viewport::new(2200, 2200).unwrap(), SurfaceOpts::default());
    let mut input = InteractionState::new();
    surface.clear();
    rig.tick(&mut surface, &mut input).unwrap();
    let bm = rig.constraints()[0].art().unwrap().bitmap().unwrap();
    assert_eq!((bm.width(), bm.height()), (21, 81));
}

#[test]
fn set_force_applies_to_every_node_until_mode_switch() {
    let mut rig = ready_rig();
    rig.set_force(1.25);
    assert!(rig.nodes().iter().all(|n| n.force == 1.25));
    rig.down();
    assert!(rig.nodes().iter().all(|n| n.force == rig.opts().force_excited));
}

#[test]
fn failed_resize_keeps_every_bitmap_and_retries_on_tick() {
    let tall = r##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10000"><rect width="10" height="10000" fill="#808080"/></svg>"##;
    let mut rig = Rig::new(RigId(1), &two_limbs(tall), DecodeMode::Inline).unwrap();
    assert!(rig.load(vp()).unwrap());
    let dims = |rig: &Rig| -> Vec<(u32, u32)> {
        rig.drawables()
            .iter()
            .map(|&ci| {
                let bm = rig.constraints()[ci].art().unwrap().bitmap().unwrap();
                (bm.width(), bm.height())
            })
            .collect()
    };
    assert_eq!(dims(&rig), vec![(11, 41), (11, 10001)]);

    // Scale 2 pushes the tall limb past the raster size limit.
    let big = Viewport::new(2200, 2200).unwrap();
    assert!(rig.resize(big).is_err());
    assert_eq!(dims(&rig), vec![(11, 41), (11, 10001)]);

    let mut surface = Surface::new(big, SurfaceOpts::default());
    let mut input = InteractionState::new();
    assert!(rig.tick(&mut surface, &mut input).is_err());
    assert_eq!(dims(&rig), vec![(11, 41), (11, 10001)]);

    // Back at a scale that fits, ticking succeeds.
    let mut surface = Surface::new(vp(), SurfaceOpts::default());
    rig.tick(&mut surface, &mut input).unwrap();
    assert_eq!(surface.draw_count(), 2);
}
