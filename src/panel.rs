use std::cell::RefCell;
use std::rc::Rc;

use web_sys as web;

use crate::core::params::TunableParams;
use crate::core::scene::SceneContext;
use crate::dom;

/// Bind the six tuning knobs to the page's range sliders. The panel is a
/// collaborator, not a dependency: absent elements are skipped, and knob
/// writes land between frames without any coordination beyond the shared
/// scene context.
pub fn wire_panel(document: &web::Document, scene: &Rc<RefCell<SceneContext>>) {
    let params = scene.borrow().params;
    for id in TunableParams::IDS {
        if let Some(knob) = params.knob(id) {
            dom::init_range_input(document, id, knob.min, knob.max, knob.step, knob.value);
        }
        let scene = scene.clone();
        dom::add_input_listener(document, id, move |value| {
            if let Some(knob) = scene.borrow_mut().params.knob_mut(id) {
                knob.set(value as f32);
            }
        });
    }
}
