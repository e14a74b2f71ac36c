use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use instant::Instant;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::core::clip::{Sampled, TargetPath};
use crate::core::constants::{CURSOR_DOT_ALPHA, POINTER_SMOOTH_ALPHA, ROTATION_BASE_X};
use crate::core::displace::displace_target;
use crate::core::scene::{SceneContext, INTRO_CLIP, OUTRO_CLIP};
use crate::core::smoothing::{approach_vec2, approach_vec3, frame_alpha};
use crate::core::transition::TransitionEvent;
use crate::dom;
use crate::render::GpuState;

/// The per-frame driver. Owns the scene context and renderer handle; runs
/// once per display refresh and reschedules itself until page teardown.
pub struct FrameContext {
    pub scene: Rc<RefCell<SceneContext>>,
    pub gpu: Rc<RefCell<Option<GpuState<'static>>>>,
    pub canvas: web::HtmlCanvasElement,
    pub cursor_dot: Option<web::HtmlElement>,
    pub last_instant: Instant,
}

impl FrameContext {
    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt = (now - self.last_instant).as_secs_f32();
        self.last_instant = now;

        {
            let mut scene = self.scene.borrow_mut();

            // Pointer and cursor-indicator smoothing run before any scene work.
            let alpha = frame_alpha(POINTER_SMOOTH_ALPHA, dt);
            scene.pointer.ndc = approach_vec2(scene.pointer.ndc, scene.pointer.ndc_target, alpha);
            let dot_alpha = frame_alpha(CURSOR_DOT_ALPHA, dt);
            scene.pointer.cursor_dot =
                approach_vec2(scene.pointer.cursor_dot, scene.pointer.screen_px, dot_alpha);
            if let Some(dot) = &self.cursor_dot {
                dom::set_translate(dot, scene.pointer.cursor_dot.x, scene.pointer.cursor_dot.y);
            }

            // Before readiness frames still render; they just carry no
            // interaction or deformation work.
            if scene.ready {
                advance_scene(&mut scene, dt);
            }
        }

        if let Some(gpu) = self.gpu.borrow_mut().as_mut() {
            gpu.resize_if_needed(self.canvas.width(), self.canvas.height());
            if let Err(e) = gpu.render(&self.scene.borrow()) {
                log::error!("render error: {:?}", e);
            }
        }
    }
}

fn advance_scene(scene: &mut SceneContext, dt: f32) {
    let SceneContext {
        machine,
        stone,
        cloth,
        params,
        pointer,
        ..
    } = scene;
    let Some(stone) = stone.as_mut() else {
        return;
    };

    // The rotation target derives from the smoothed pointer coordinates,
    // with tunable per-axis sensitivity around the resting tilt.
    stone.rotation_target = Vec2::new(
        ROTATION_BASE_X + params.rotation_x.value * -pointer.ndc.y,
        params.rotation_y.value * pointer.ndc.x,
    );

    // Clip playback time advances every tick; the "finished" signal releases
    // the trigger guard, and a finished outro is when the stone disappears.
    if stone.player.is_playing() {
        let finished = stone.player.tick(&stone.clips, dt);
        if finished {
            machine.clip_finished();
            if !stone.active {
                stone.visible = false;
            }
            log::info!("[clip] finished");
        }
        let player = stone.player;
        let clips = &stone.clips;
        let nodes = &mut stone.nodes;
        player.sample_into(clips, |name, path, value| {
            if let Some(node) = nodes.iter_mut().find(|n| n.name == name) {
                match (path, value) {
                    (TargetPath::Translation, Sampled::Vec3(v)) => node.position = v,
                    (TargetPath::Rotation, Sampled::Quat(q)) => node.rotation = q,
                    (TargetPath::Scale, Sampled::Vec3(v)) => node.scale = v,
                    _ => {}
                }
            }
        });
    }

    // Whole-model rotation chases the pointer-derived target every frame.
    let rot_alpha = frame_alpha(params.rotation_lerp_alpha.value, dt);
    stone.rotation = approach_vec2(stone.rotation, stone.rotation_target, rot_alpha);

    if machine.is_idle() {
        // The displacement field owns node positions this tick. Contact
        // arrives in world space; compare in the rest-pose frame.
        let node_alpha = frame_alpha(params.lerp_alpha.value, dt);
        let radius = params.radius.value;
        let strength = params.displace_strength.value;
        let contact = stone
            .model_matrix()
            .inverse()
            .transform_point3(pointer.contact_point);
        let rest = &stone.rest;
        for node in stone.nodes.iter_mut() {
            // Nodes missing from the snapshot are skipped, never an error.
            let Some(&rest_pos) = rest.get(&node.name) else {
                continue;
            };
            let target = displace_target(rest_pos, contact, radius, strength);
            node.position = approach_vec3(node.position, target, node_alpha);
        }
        // Keep the collision proxy aligned with the rendered stone.
        let model = stone.model_matrix();
        stone.proxy.set_transform(model);
    } else {
        // A running timeline is the only writer of node poses this tick.
        let nodes = &mut stone.nodes;
        let event = machine.tick(dt, |index, position, rotation| {
            if let Some(node) = nodes.get_mut(index) {
                node.position = position;
                node.rotation = rotation;
            }
        });
        match event {
            Some(TransitionEvent::BecameInactive) => {
                stone.active = false;
                stone.player.play(OUTRO_CLIP);
                machine.clip_started();
                if let Some(cloth) = cloth.as_mut() {
                    cloth.bridge.begin_reveal();
                }
                log::info!("[transition] stone inactive, cloth revealing");
            }
            Some(TransitionEvent::BecameActive) => {
                stone.active = true;
                stone.visible = true;
                stone.player.play(INTRO_CLIP);
                machine.clip_started();
                log::info!("[transition] stone active");
            }
            None => {}
        }
    }

    if let Some(cloth) = cloth.as_mut() {
        cloth
            .bridge
            .advance(dt, pointer.contact_point, pointer.contact_uv, pointer.hovering);
    }
}

pub async fn init_gpu(canvas: &web::HtmlCanvasElement) -> Option<GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match GpuState::new(leaked_canvas).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx_tick.borrow_mut().frame();
        if let Some(w) = web::window() {
            if let Some(cb) = tick_clone.borrow().as_ref() {
                _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
            }
        }
    }) as Box<dyn FnMut()>));
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
