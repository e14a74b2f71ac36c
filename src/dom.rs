use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) {
    if let Some(w) = web::window() {
        let dpr = w.device_pixel_ratio();
        let rect = canvas.get_bounding_client_rect();
        let w_px = (rect.width() * dpr) as u32;
        let h_px = (rect.height() * dpr) as u32;
        canvas.set_width(w_px.max(1));
        canvas.set_height(h_px.max(1));
    }
}

/// Move the cursor-indicator element; a missing element is simply skipped.
#[inline]
pub fn set_translate(el: &web::HtmlElement, x: f32, y: f32) {
    _ = el
        .style()
        .set_property("transform", &format!("translate({x:.1}px, {y:.1}px)"));
}

/// Wire an `input` listener to a range slider by element id. Elements the
/// page does not provide are skipped silently.
pub fn add_input_listener(
    document: &web::Document,
    element_id: &str,
    mut handler: impl FnMut(f64) + 'static,
) {
    let Some(el) = document.get_element_by_id(element_id) else {
        return;
    };
    let Ok(input) = el.dyn_into::<web::HtmlInputElement>() else {
        return;
    };
    let reader = input.clone();
    let closure = wasm_bindgen::closure::Closure::wrap(
        Box::new(move || handler(reader.value_as_number())) as Box<dyn FnMut()>,
    );
    _ = input.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
    closure.forget();
}

/// Initialize a range slider's declared range and current value.
pub fn init_range_input(document: &web::Document, element_id: &str, min: f32, max: f32, step: f32, value: f32) {
    let Some(el) = document.get_element_by_id(element_id) else {
        return;
    };
    let Ok(input) = el.dyn_into::<web::HtmlInputElement>() else {
        return;
    };
    input.set_min(&min.to_string());
    input.set_max(&max.to_string());
    input.set_step(&step.to_string());
    input.set_value_as_number(value as f64);
}
