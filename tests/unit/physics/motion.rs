use super::*;

#[test]
fn none_never_moves() {
    assert_eq!(apply(Motion::None, 1.0, 2.0), Vec2::ZERO);
    assert_eq!(apply(Motion::None, -1.0, 0.6), Vec2::ZERO);
}

#[test]
fn swing_mirrors_on_direction_flip() {
    let m = Motion::Swing { x: 1.5, y: -0.5 };
    let a = apply(m, 1.0, 2.0);
    let b = apply(m, -1.0, 2.0);
    assert_eq!(a, Vec2::new(3.0, -1.0));
    assert_eq!(b, -a);
}

#[test]
fn bob_keeps_vertical_push() {
    let m = Motion::Bob { x: 1.0, y: 0.5 };
    assert_eq!(apply(m, 1.0, 2.0), Vec2::new(2.0, 1.0));
    assert_eq!(apply(m, -1.0, 2.0), Vec2::new(-2.0, 1.0));
}

#[test]
fn push_ignores_direction() {
    let m = Motion::Push { x: 0.0, y: 4.0 };
    assert_eq!(apply(m, 1.0, 0.5), apply(m, -1.0, 0.5));
}

#[test]
fn serde_uses_kind_and_params() {
    let m: Motion =
        serde_json::from_str(r#"{"kind":"Swing","params":{"x":2.0,"y":0.0}}"#).unwrap();
    assert_eq!(m, Motion::Swing { x: 2.0, y: 0.0 });
    let none: Motion = serde_json::from_str(r#"{"kind":"None"}"#).unwrap();
    assert!(none.is_none());
}
