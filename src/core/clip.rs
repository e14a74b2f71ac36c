use glam::{Quat, Vec3};
use smallvec::SmallVec;

/// Keyframe sampling for the stone's two authored clips. The asset carries
/// exactly `[intro, outro]`; both are played one-shot, never looped.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interpolation {
    Linear,
    Step,
}

pub trait Interpolate: Copy {
    fn interpolate(a: Self, b: Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    fn interpolate(a: Self, b: Self, t: f32) -> Self {
        a + (b - a) * t
    }
}

impl Interpolate for Vec3 {
    fn interpolate(a: Self, b: Self, t: f32) -> Self {
        a.lerp(b, t)
    }
}

impl Interpolate for Quat {
    fn interpolate(a: Self, b: Self, t: f32) -> Self {
        a.slerp(b, t)
    }
}

#[derive(Clone, Debug)]
pub struct KeyframeTrack<T: Interpolate> {
    pub times: Vec<f32>,
    pub values: Vec<T>,
    pub interpolation: Interpolation,
}

impl<T: Interpolate> KeyframeTrack<T> {
    pub fn new(times: Vec<f32>, values: Vec<T>, interpolation: Interpolation) -> Self {
        Self {
            times,
            values,
            interpolation,
        }
    }

    pub fn duration(&self) -> f32 {
        self.times.last().copied().unwrap_or(0.0)
    }

    /// Sample at `time`, clamped to the track's ends. `None` only for an
    /// empty track.
    pub fn sample(&self, time: f32) -> Option<T> {
        let first = *self.times.first()?;
        if time <= first || self.times.len() == 1 {
            return self.values.first().copied();
        }
        let last = *self.times.last()?;
        if time >= last {
            return self.values.last().copied();
        }
        // First index with t > time; the sampled span is [next - 1, next].
        let next = self.times.partition_point(|&t| t <= time);
        let (t0, t1) = (self.times[next - 1], self.times[next]);
        let a = *self.values.get(next - 1)?;
        match self.interpolation {
            Interpolation::Step => Some(a),
            Interpolation::Linear => {
                let b = *self.values.get(next)?;
                let span = (t1 - t0).max(1e-6);
                Some(T::interpolate(a, b, (time - t0) / span))
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetPath {
    Translation,
    Rotation,
    Scale,
}

#[derive(Clone, Debug)]
pub enum TrackData {
    Vec3(KeyframeTrack<Vec3>),
    Quat(KeyframeTrack<Quat>),
}

impl TrackData {
    fn duration(&self) -> f32 {
        match self {
            TrackData::Vec3(t) => t.duration(),
            TrackData::Quat(t) => t.duration(),
        }
    }
}

/// One animated property of one named node.
#[derive(Clone, Debug)]
pub struct ClipTrack {
    pub node: String,
    pub path: TargetPath,
    pub data: TrackData,
}

#[derive(Clone, Debug)]
pub struct Clip {
    pub name: String,
    pub duration: f32,
    pub tracks: SmallVec<[ClipTrack; 8]>,
}

impl Clip {
    pub fn new(name: String, tracks: SmallVec<[ClipTrack; 8]>) -> Self {
        let duration = tracks
            .iter()
            .map(|t| t.data.duration())
            .fold(0.0_f32, f32::max);
        Self {
            name,
            duration,
            tracks,
        }
    }
}

/// A value sampled from a clip track, ready to apply to a node pose.
#[derive(Clone, Copy, Debug)]
pub enum Sampled {
    Vec3(Vec3),
    Quat(Quat),
}

/// One-shot playback over the clip list.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClipPlayer {
    time: f32,
    playing: Option<usize>,
}

impl ClipPlayer {
    pub fn play(&mut self, index: usize) {
        self.playing = Some(index);
        self.time = 0.0;
    }

    pub fn is_playing(&self) -> bool {
        self.playing.is_some()
    }

    /// Advance playback. Returns `true` exactly once, on the tick the clip
    /// finishes.
    pub fn tick(&mut self, clips: &[Clip], dt: f32) -> bool {
        let Some(index) = self.playing else {
            return false;
        };
        let Some(clip) = clips.get(index) else {
            self.playing = None;
            return false;
        };
        self.time += dt;
        if self.time >= clip.duration {
            self.playing = None;
            return true;
        }
        false
    }

    /// Sample every track of the playing clip at the current time.
    pub fn sample_into(&self, clips: &[Clip], mut apply: impl FnMut(&str, TargetPath, Sampled)) {
        let Some(clip) = self.playing.and_then(|i| clips.get(i)) else {
            return;
        };
        for track in &clip.tracks {
            let value = match &track.data {
                TrackData::Vec3(t) => t.sample(self.time).map(Sampled::Vec3),
                TrackData::Quat(t) => t.sample(self.time).map(Sampled::Quat),
            };
            if let Some(value) = value {
                apply(&track.node, track.path, value);
            }
        }
    }
}
