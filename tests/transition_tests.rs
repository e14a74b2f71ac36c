// Host-side tests for the transition state machine and its timeline.
// The main crate is wasm-only, so we include the pure-Rust module directly.

#![allow(dead_code)]
mod core {
    pub mod transition {
        include!("../src/core/transition.rs");
    }
}

use crate::core::transition::{
    ease_in_out_cubic, NodeTween, Phase, Timeline, TransitionEvent, TransitionMachine,
};
use glam::{Quat, Vec3};

fn tween(index: usize, from: Vec3, to: Vec3) -> NodeTween {
    NodeTween {
        index,
        from_position: from,
        to_position: to,
        from_rotation: Quat::from_rotation_z(0.4),
    }
}

fn run_to_completion(machine: &mut TransitionMachine, nodes: &mut [Vec3]) -> TransitionEvent {
    for _ in 0..600 {
        let event = machine.tick(1.0 / 60.0, |i, p, _| nodes[i] = p);
        if let Some(event) = event {
            return event;
        }
    }
    panic!("timeline never completed");
}

#[test]
fn trigger_requires_hover() {
    let mut machine = TransitionMachine::new();
    assert!(!machine.trigger(false, || Timeline::new(vec![], 0.5)));
    assert_eq!(machine.phase(), Phase::Active);
    assert!(machine.is_idle());
}

#[test]
fn trigger_while_busy_is_discarded() {
    let mut machine = TransitionMachine::new();
    assert!(machine.trigger(true, || Timeline::new(vec![], 0.5)));
    assert_eq!(machine.phase(), Phase::TransitioningOut);

    // A second trigger mid-flight must not alter the current target state.
    assert!(!machine.trigger(true, || Timeline::new(vec![], 0.5)));
    assert_eq!(machine.phase(), Phase::TransitioningOut);
}

#[test]
fn clip_guard_blocks_retrigger_until_finished() {
    let mut machine = TransitionMachine::new();
    machine.clip_started();
    assert!(!machine.trigger(true, || Timeline::new(vec![], 0.5)));
    machine.clip_finished();
    assert!(machine.trigger(true, || Timeline::new(vec![], 0.5)));
}

#[test]
fn out_transition_completes_into_inactive() {
    let mut machine = TransitionMachine::new();
    let mut nodes = vec![Vec3::new(1.4, 0.2, 0.0)];
    assert!(machine.trigger(true, || {
        Timeline::new(vec![tween(0, Vec3::new(1.4, 0.2, 0.0), Vec3::X)], 0.5)
    }));

    let event = run_to_completion(&mut machine, &mut nodes);
    assert_eq!(event, TransitionEvent::BecameInactive);
    assert_eq!(machine.phase(), Phase::Inactive);
    assert!(machine.is_idle());
    assert!(nodes[0].distance(Vec3::X) < 1e-6, "node must land on rest");
}

#[test]
fn round_trip_returns_every_node_to_rest() {
    // TransitioningOut followed by TransitioningIn leaves the rest snapshot
    // untouched and the nodes back on it.
    let rest = [Vec3::new(1.0, 0.0, 0.0), Vec3::new(-0.5, 0.8, 0.2)];
    let mut nodes = [Vec3::new(1.3, 0.1, 0.0), Vec3::new(-0.9, 0.9, 0.4)];
    let mut machine = TransitionMachine::new();

    let build = |nodes: &[Vec3; 2]| {
        Timeline::new(
            vec![tween(0, nodes[0], rest[0]), tween(1, nodes[1], rest[1])],
            0.5,
        )
    };

    assert!(machine.trigger(true, || build(&nodes)));
    assert_eq!(
        run_to_completion(&mut machine, &mut nodes),
        TransitionEvent::BecameInactive
    );

    // Drift the nodes while inactive, then come back.
    nodes[0] += Vec3::splat(0.05);
    assert!(machine.trigger(true, || build(&nodes)));
    assert_eq!(
        run_to_completion(&mut machine, &mut nodes),
        TransitionEvent::BecameActive
    );

    for (node, rest) in nodes.iter().zip(&rest) {
        assert!(node.distance(*rest) < 1e-6);
    }
}

#[test]
fn tick_without_timeline_is_inert() {
    let mut machine = TransitionMachine::new();
    let event = machine.tick(1.0, |_, _, _| panic!("no tween should be applied"));
    assert!(event.is_none());
    assert_eq!(machine.phase(), Phase::Active);
}

#[test]
fn ease_is_bounded_and_symmetric() {
    assert_eq!(ease_in_out_cubic(0.0), 0.0);
    assert_eq!(ease_in_out_cubic(1.0), 1.0);
    assert!((ease_in_out_cubic(0.5) - 0.5).abs() < 1e-6);
    for i in 0..=10 {
        let t = i as f32 / 10.0;
        let v = ease_in_out_cubic(t);
        assert!((0.0..=1.0).contains(&v));
    }
}

#[test]
fn rotations_settle_on_identity() {
    let mut machine = TransitionMachine::new();
    let mut rotation = Quat::from_rotation_z(0.4);
    assert!(machine.trigger(true, || {
        Timeline::new(vec![tween(0, Vec3::ZERO, Vec3::ZERO)], 0.5)
    }));
    for _ in 0..600 {
        if machine.tick(1.0 / 60.0, |_, _, r| rotation = r).is_some() {
            break;
        }
    }
    assert!(rotation.angle_between(Quat::IDENTITY) < 1e-3);
}
