use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::core::constants::TRANSITION_DURATION_SEC;
use crate::core::project::screen_to_ndc;
use crate::core::scene::SceneContext;
use crate::core::transition::{NodeTween, Phase, Timeline};

#[derive(Clone)]
pub struct InputWiring {
    pub canvas: web::HtmlCanvasElement,
    pub scene: Rc<RefCell<SceneContext>>,
}

pub fn wire_input_handlers(w: InputWiring) {
    wire_pointermove(&w);
    wire_pointerup(&w);
}

/// Pointer client coordinates relative to the canvas, in CSS pixels.
#[inline]
fn pointer_canvas_css(ev: &web::PointerEvent, canvas: &web::HtmlCanvasElement) -> (Vec2, Vec2) {
    let rect = canvas.get_bounding_client_rect();
    let pos = Vec2::new(
        ev.client_x() as f32 - rect.left() as f32,
        ev.client_y() as f32 - rect.top() as f32,
    );
    let size = Vec2::new(rect.width() as f32, rect.height() as f32);
    (pos, size)
}

fn wire_pointermove(w: &InputWiring) {
    let w = w.clone();
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let (pos, size) = pointer_canvas_css(&ev, &w.canvas);
        let mut scene = w.scene.borrow_mut();

        scene.pointer.screen_px = pos;
        let ndc = screen_to_ndc(pos.x, pos.y, size.x, size.y);
        scene.pointer.ndc_target = ndc;

        // Projection happens at event granularity; a miss retains the
        // previous contact point.
        let (hit, hovering) = scene.project_pointer(ndc);
        scene.pointer.apply_hit(hit, hovering);
        if let Some(stone) = scene.stone.as_mut() {
            stone.hovered = hovering;
        }
    }) as Box<dyn FnMut(_)>);

    if let Some(wnd) = web::window() {
        _ = wnd.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}

fn wire_pointerup(w: &InputWiring) {
    let w = w.clone();
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        ev.prevent_default();
        let mut scene = w.scene.borrow_mut();
        if !scene.ready {
            return;
        }
        let SceneContext {
            machine,
            stone,
            cloth,
            ..
        } = &mut *scene;
        let Some(stone) = stone.as_mut() else {
            return;
        };

        // Triggers while busy or unhovered are silently discarded by the
        // machine; the timeline closure only runs for accepted ones.
        let hovered = stone.hovered;
        let stone_ref = &*stone;
        let accepted = machine.trigger(hovered, || {
            let tweens = stone_ref
                .nodes
                .iter()
                .enumerate()
                .filter_map(|(index, node)| {
                    stone_ref.rest_of(&node.name).map(|to_position| NodeTween {
                        index,
                        from_position: node.position,
                        to_position,
                        from_rotation: node.rotation,
                    })
                })
                .collect();
            Timeline::new(tweens, TRANSITION_DURATION_SEC)
        });

        if accepted {
            match machine.phase() {
                Phase::TransitioningOut => log::info!("[click] transition out"),
                Phase::TransitioningIn => {
                    // The cloth starts shrinking the moment the trigger lands.
                    if let Some(cloth) = cloth.as_mut() {
                        cloth.bridge.begin_conceal();
                    }
                    log::info!("[click] transition in");
                }
                _ => {}
            }
        }
    }) as Box<dyn FnMut(_)>);

    if let Some(wnd) = web::window() {
        _ = wnd.add_event_listener_with_callback("pointerup", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}
