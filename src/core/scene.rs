use fnv::FnvHashMap;
use glam::{Mat4, Quat, Vec2, Vec3};

use super::bounds::frustum_size_at;
use super::camera::Camera;
use super::clip::{Clip, ClipPlayer};
use super::cloth::ClothBridge;
use super::constants::{CAMERA_Z, STONE_POSITION, STONE_SCALE, STONE_TILT_X};
use super::params::TunableParams;
use super::pointer::PointerState;
use super::project::{camera_ray, project, Hit, InteractionPlane, RaycastMesh, Target};
use super::transition::TransitionMachine;

/// One node of the stone hierarchy. Mesh-bearing nodes reference a GPU mesh
/// slot; pure group nodes carry only their transform.
#[derive(Clone, Debug)]
pub struct StoneNode {
    pub name: String,
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    pub mesh: Option<usize>,
}

pub struct StoneState {
    pub nodes: Vec<StoneNode>,
    /// Name -> rest position, captured exactly once at construction and
    /// never mutated afterwards.
    pub rest: FnvHashMap<String, Vec3>,
    /// Authored clips in asset order: `[intro, outro]`.
    pub clips: Vec<Clip>,
    pub player: ClipPlayer,
    /// Collision proxy: full geometric snapshot, never rendered.
    pub proxy: RaycastMesh,
    pub position: Vec3,
    pub scale: f32,
    /// Smoothed pitch/yaw following the pointer.
    pub rotation: Vec2,
    pub rotation_target: Vec2,
    pub active: bool,
    pub hovered: bool,
    pub visible: bool,
}

pub const INTRO_CLIP: usize = 0;
pub const OUTRO_CLIP: usize = 1;

impl StoneState {
    /// Build the stone at its fixed placement and snapshot rest positions.
    pub fn new(nodes: Vec<StoneNode>, clips: Vec<Clip>, proxy: RaycastMesh) -> Self {
        let rest = nodes
            .iter()
            .map(|n| (n.name.clone(), n.position))
            .collect::<FnvHashMap<_, _>>();
        let rotation = Vec2::new(STONE_TILT_X, 0.0);
        Self {
            nodes,
            rest,
            clips,
            player: ClipPlayer::default(),
            proxy,
            position: STONE_POSITION,
            scale: STONE_SCALE,
            rotation,
            rotation_target: rotation,
            active: true,
            hovered: false,
            visible: true,
        }
    }

    pub fn rest_of(&self, name: &str) -> Option<Vec3> {
        self.rest.get(name).copied()
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position)
            * Mat4::from_rotation_x(self.rotation.x)
            * Mat4::from_rotation_y(self.rotation.y)
            * Mat4::from_scale(Vec3::splat(self.scale))
    }

    pub fn node_matrix(&self, node: &StoneNode) -> Mat4 {
        self.model_matrix()
            * Mat4::from_scale_rotation_translation(node.scale, node.rotation, node.position)
    }
}

pub struct ClothSurface {
    pub mesh: usize,
    /// Pick shape for UV feedback while the stone is inactive.
    pub raycast: RaycastMesh,
    /// Derived from the stone's resolved transform at load time.
    pub position: Vec3,
    pub bridge: ClothBridge,
}

impl ClothSurface {
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position) * Mat4::from_scale(Vec3::splat(self.bridge.scale))
    }
}

/// Everything the frame scheduler owns and threads through the components.
pub struct SceneContext {
    pub camera: Camera,
    pub plane: InteractionPlane,
    pub pointer: PointerState,
    pub params: TunableParams,
    pub machine: TransitionMachine,
    pub stone: Option<StoneState>,
    pub cloth: Option<ClothSurface>,
    /// Flips only after both asset stages complete; gates mesh raycasting
    /// and all per-frame interaction work.
    pub ready: bool,
}

impl SceneContext {
    pub fn new(aspect: f32) -> Self {
        let camera = Camera::new(aspect);
        let plane = InteractionPlane {
            center: Vec3::ZERO,
            half_extent: frustum_size_at(camera.fovy_radians, aspect, CAMERA_Z) * 0.5,
        };
        Self {
            camera,
            plane,
            pointer: PointerState::default(),
            params: TunableParams::default(),
            machine: TransitionMachine::new(),
            stone: None,
            cloth: None,
            ready: false,
        }
    }

    /// Viewport resize. Updates the projection aspect and the derived plane
    /// extents; pointer smoothing, hover and transition state are untouched.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.camera.set_aspect(width, height);
        self.plane.half_extent =
            frustum_size_at(self.camera.fovy_radians, self.camera.aspect, CAMERA_Z) * 0.5;
    }

    /// Project the pointer against the contextual target set. Before
    /// readiness the invisible plane guarantees a contact point; afterwards
    /// the stone's proxy is tested, plus the cloth while the stone is
    /// inactive. Returns the nearest hit and the hover flag.
    pub fn project_pointer(&self, ndc: Vec2) -> (Option<Hit>, bool) {
        let ray = camera_ray(&self.camera, ndc);
        let stone = match &self.stone {
            Some(s) if self.ready => s,
            _ => return (self.plane.intersect(&ray), false),
        };
        let mut targets: Vec<Target> = Vec::with_capacity(2);
        targets.push(Target::Mesh(&stone.proxy));
        if !stone.active {
            if let Some(cloth) = &self.cloth {
                targets.push(Target::Mesh(&cloth.raycast));
            }
        }
        match project(&ray, &targets) {
            Some((_, hit)) => (Some(hit), true),
            None => (None, false),
        }
    }
}
