use glam::{Quat, Vec3};

/// The stone's display lifecycle. At most one transition runs at a time;
/// triggers arriving while busy or unhovered are discarded, never queued.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Active,
    TransitioningOut,
    Inactive,
    TransitioningIn,
}

/// One node's synchronized return-to-rest interpolation. Every tween in a
/// timeline starts at schedule position zero; rest rotation is always
/// identity.
#[derive(Clone, Copy, Debug)]
pub struct NodeTween {
    pub index: usize,
    pub from_position: Vec3,
    pub to_position: Vec3,
    pub from_rotation: Quat,
}

/// Scripted batch of property interpolations over a fixed duration.
#[derive(Clone, Debug)]
pub struct Timeline {
    tweens: Vec<NodeTween>,
    duration: f32,
    elapsed: f32,
}

impl Timeline {
    pub fn new(tweens: Vec<NodeTween>, duration: f32) -> Self {
        Self {
            tweens,
            duration: duration.max(1e-3),
            elapsed: 0.0,
        }
    }

    fn tick(&mut self, dt: f32) -> bool {
        self.elapsed += dt.max(0.0);
        self.elapsed >= self.duration
    }

    fn progress(&self) -> f32 {
        ease_in_out_cubic((self.elapsed / self.duration).clamp(0.0, 1.0))
    }
}

pub fn ease_in_out_cubic(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let u = -2.0 * t + 2.0;
        1.0 - u * u * u / 2.0
    }
}

/// Emitted at most once per completed timeline; the frame driver applies the
/// side effects (clip playback, visibility, cloth reveal/conceal).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionEvent {
    BecameInactive,
    BecameActive,
}

pub struct TransitionMachine {
    phase: Phase,
    timeline: Option<Timeline>,
    clip_playing: bool,
}

impl Default for TransitionMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl TransitionMachine {
    pub fn new() -> Self {
        Self {
            phase: Phase::Active,
            timeline: None,
            clip_playing: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Idle means no timeline running and no clip playing; both must clear
    /// before a new trigger is accepted.
    pub fn is_idle(&self) -> bool {
        self.timeline.is_none() && !self.clip_playing
    }

    pub fn clip_started(&mut self) {
        self.clip_playing = true;
    }

    pub fn clip_finished(&mut self) {
        self.clip_playing = false;
    }

    /// Request a transition. The timeline is only built when the trigger is
    /// accepted; a trigger while busy or unhovered is a silent no-op and
    /// leaves the current target state untouched.
    pub fn trigger(&mut self, hovered: bool, build: impl FnOnce() -> Timeline) -> bool {
        if !hovered || !self.is_idle() {
            return false;
        }
        let next = match self.phase {
            Phase::Active => Phase::TransitioningOut,
            Phase::Inactive => Phase::TransitioningIn,
            _ => return false,
        };
        self.phase = next;
        self.timeline = Some(build());
        true
    }

    /// Advance the running timeline, writing the sampled pose of every tween
    /// through `apply`. While a timeline runs, this is the only writer of
    /// node positions; the displacement evaluator must not run in the same
    /// tick.
    pub fn tick(
        &mut self,
        dt: f32,
        mut apply: impl FnMut(usize, Vec3, Quat),
    ) -> Option<TransitionEvent> {
        let finished = self.timeline.as_mut()?.tick(dt);
        let timeline = self.timeline.as_ref()?;
        let k = timeline.progress();
        for tween in &timeline.tweens {
            let position = tween.from_position.lerp(tween.to_position, k);
            let rotation = tween.from_rotation.slerp(Quat::IDENTITY, k);
            apply(tween.index, position, rotation);
        }
        if !finished {
            return None;
        }
        self.timeline = None;
        match self.phase {
            Phase::TransitioningOut => {
                self.phase = Phase::Inactive;
                Some(TransitionEvent::BecameInactive)
            }
            Phase::TransitioningIn => {
                self.phase = Phase::Active;
                Some(TransitionEvent::BecameActive)
            }
            _ => None,
        }
    }
}
