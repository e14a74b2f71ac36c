// Host-side tests for keyframe sampling and one-shot clip playback.
// The main crate is wasm-only, so we include the pure-Rust module directly.

#![allow(dead_code)]
mod core {
    pub mod clip {
        include!("../src/core/clip.rs");
    }
}

use crate::core::clip::{
    Clip, ClipPlayer, ClipTrack, Interpolation, KeyframeTrack, Sampled, TargetPath, TrackData,
};
use glam::{Quat, Vec3};
use smallvec::smallvec;

fn translation_track(node: &str, times: Vec<f32>, values: Vec<Vec3>) -> ClipTrack {
    ClipTrack {
        node: node.to_owned(),
        path: TargetPath::Translation,
        data: TrackData::Vec3(KeyframeTrack::new(times, values, Interpolation::Linear)),
    }
}

fn two_key_clip(name: &str, node: &str, end: Vec3, duration: f32) -> Clip {
    Clip::new(
        name.to_owned(),
        smallvec![translation_track(
            node,
            vec![0.0, duration],
            vec![Vec3::ZERO, end]
        )],
    )
}

#[test]
fn track_sampling_clamps_at_both_ends() {
    let track = KeyframeTrack::new(
        vec![1.0, 2.0],
        vec![Vec3::ZERO, Vec3::X],
        Interpolation::Linear,
    );
    assert_eq!(track.sample(0.0), Some(Vec3::ZERO));
    assert_eq!(track.sample(1.0), Some(Vec3::ZERO));
    assert_eq!(track.sample(5.0), Some(Vec3::X));
}

#[test]
fn linear_interpolation_hits_midpoints() {
    let track = KeyframeTrack::new(
        vec![0.0, 2.0],
        vec![Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0)],
        Interpolation::Linear,
    );
    let mid = track.sample(1.0).expect("non-empty track");
    assert!((mid - Vec3::X).length() < 1e-6);
}

#[test]
fn step_interpolation_holds_previous_key() {
    let track = KeyframeTrack::new(
        vec![0.0, 1.0, 2.0],
        vec![0.0_f32, 10.0, 20.0],
        Interpolation::Step,
    );
    assert_eq!(track.sample(0.5), Some(0.0));
    assert_eq!(track.sample(1.5), Some(10.0));
    assert_eq!(track.sample(2.5), Some(20.0));
}

#[test]
fn empty_track_samples_none() {
    let track: KeyframeTrack<f32> = KeyframeTrack::new(vec![], vec![], Interpolation::Linear);
    assert_eq!(track.sample(0.0), None);
}

#[test]
fn clip_duration_is_longest_track() {
    let clip = Clip::new(
        "intro".to_owned(),
        smallvec![
            translation_track("a", vec![0.0, 0.5], vec![Vec3::ZERO, Vec3::X]),
            translation_track("b", vec![0.0, 1.25], vec![Vec3::ZERO, Vec3::Y]),
        ],
    );
    assert!((clip.duration - 1.25).abs() < 1e-6);
}

#[test]
fn one_shot_finish_fires_exactly_once() {
    let clips = vec![two_key_clip("intro", "rock", Vec3::X, 0.5)];
    let mut player = ClipPlayer::default();
    player.play(0);
    assert!(player.is_playing());

    let mut finishes = 0;
    for _ in 0..120 {
        if player.tick(&clips, 1.0 / 60.0) {
            finishes += 1;
        }
    }
    assert_eq!(finishes, 1);
    assert!(!player.is_playing());
}

#[test]
fn out_of_range_clip_index_stops_quietly() {
    let clips = vec![two_key_clip("intro", "rock", Vec3::X, 0.5)];
    let mut player = ClipPlayer::default();
    player.play(7);
    assert!(!player.tick(&clips, 1.0 / 60.0));
    assert!(!player.is_playing());
}

#[test]
fn sample_into_routes_values_by_node_and_path() {
    let rotation = Quat::from_rotation_y(1.0);
    let clip = Clip::new(
        "intro".to_owned(),
        smallvec![
            translation_track("rock", vec![0.0, 1.0], vec![Vec3::ZERO, Vec3::X]),
            ClipTrack {
                node: "rock".to_owned(),
                path: TargetPath::Rotation,
                data: TrackData::Quat(KeyframeTrack::new(
                    vec![0.0, 1.0],
                    vec![rotation, rotation],
                    Interpolation::Linear,
                )),
            },
        ],
    );
    let clips = vec![clip];
    let mut player = ClipPlayer::default();
    player.play(0);
    player.tick(&clips, 0.5);

    let mut seen_translation = None;
    let mut seen_rotation = None;
    player.sample_into(&clips, |node, path, value| {
        assert_eq!(node, "rock");
        match (path, value) {
            (TargetPath::Translation, Sampled::Vec3(v)) => seen_translation = Some(v),
            (TargetPath::Rotation, Sampled::Quat(q)) => seen_rotation = Some(q),
            other => panic!("unexpected sample {other:?}"),
        }
    });
    let translation = seen_translation.expect("translation sampled");
    assert!((translation - Vec3::new(0.5, 0.0, 0.0)).length() < 1e-6);
    let sampled_rotation = seen_rotation.expect("rotation sampled");
    assert!(sampled_rotation.angle_between(rotation) < 1e-5);
}
