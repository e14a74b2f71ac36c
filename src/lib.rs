#![cfg(target_arch = "wasm32")]
use std::cell::RefCell;
use std::rc::Rc;

use instant::Instant;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod assets;
mod constants;
mod core;
mod dom;
mod events;
mod frame;
mod panel;
mod render;

use crate::constants::{CANVAS_ID, CURSOR_DOT_ID};
use crate::core::scene::SceneContext;

fn wire_canvas_resize(canvas: &web::HtmlCanvasElement, scene: Rc<RefCell<SceneContext>>) {
    let canvas_resize = canvas.clone();
    let resize_closure = Closure::wrap(Box::new(move || {
        dom::sync_canvas_backing_size(&canvas_resize);
        // Aspect only; pointer smoothing, hover and transition state stay put.
        scene
            .borrow_mut()
            .resize(canvas_resize.width() as f32, canvas_resize.height() as f32);
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window
            .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref());
    }
    resize_closure.forget();
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("stone-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas_el = document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{CANVAS_ID}"))?;
    let canvas: web::HtmlCanvasElement = canvas_el
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    dom::sync_canvas_backing_size(&canvas);

    let scene = Rc::new(RefCell::new(SceneContext::new(
        canvas.width() as f32 / canvas.height().max(1) as f32,
    )));

    wire_canvas_resize(&canvas, scene.clone());
    panel::wire_panel(&document, &scene);
    events::wire_input_handlers(events::InputWiring {
        canvas: canvas.clone(),
        scene: scene.clone(),
    });

    let gpu = Rc::new(RefCell::new(frame::init_gpu(&canvas).await));

    // Two-stage asset pipeline; `ready` flips once both assets are in.
    spawn_local(assets::load_scene(scene.clone(), gpu.clone()));

    let cursor_dot = document
        .get_element_by_id(CURSOR_DOT_ID)
        .and_then(|el| el.dyn_into::<web::HtmlElement>().ok());

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        scene,
        gpu,
        canvas,
        cursor_dot,
        last_instant: Instant::now(),
    }));
    frame::start_loop(frame_ctx);

    Ok(())
}
