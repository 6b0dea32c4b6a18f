//! Slider override surface for the model placement.
//!
//! Each range input writes exactly one `ModelPlacement` field and updates its
//! paired readout. Controls are independent: touching one never recomputes or
//! resets the others, and an override replaces the normalizer's value for
//! that field from then on. Range limits live in the markup; only numeric
//! parsing happens here.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

use showroom_core::ModelPlacement;

const CONTROLS: [(&str, fn(&mut ModelPlacement, f32)); 5] = [
    ("pos-x", |p, v| p.position.x = v),
    ("pos-y", |p, v| p.position.y = v),
    ("pos-z", |p, v| p.position.z = v),
    ("scale", |p, v| p.scale = v),
    // slider works in degrees, placement stores radians
    ("rot-y", |p, v| p.rotation_y = v.to_radians()),
];

pub fn wire_placement_controls(
    document: &web::Document,
    placement: Rc<RefCell<ModelPlacement>>,
) {
    for (id, apply) in CONTROLS {
        let Some(el) = document.get_element_by_id(id) else {
            log::warn!("[ui] missing control #{id}");
            continue;
        };
        let Ok(input) = el.dyn_into::<web::HtmlInputElement>() else {
            log::warn!("[ui] #{id} is not an <input>");
            continue;
        };

        let placement = placement.clone();
        let document = document.clone();
        let input_for_read = input.clone();
        let closure = Closure::wrap(Box::new(move || {
            let v = input_for_read.value_as_number();
            if !v.is_finite() {
                return;
            }
            let v = v as f32;
            apply(&mut placement.borrow_mut(), v);
            set_readout(&document, id, v);
        }) as Box<dyn FnMut()>);
        let _ = input.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

/// Push the current placement into the sliders and readouts, used once after
/// the normalizer has placed the model.
pub fn sync_controls_to_placement(document: &web::Document, placement: &ModelPlacement) {
    let values = [
        ("pos-x", placement.position.x),
        ("pos-y", placement.position.y),
        ("pos-z", placement.position.z),
        ("scale", placement.scale),
        ("rot-y", placement.rotation_y.to_degrees()),
    ];
    for (id, v) in values {
        if let Some(input) = document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<web::HtmlInputElement>().ok())
        {
            input.set_value_as_number(v as f64);
        }
        set_readout(document, id, v);
    }
}

fn set_readout(document: &web::Document, id: &str, v: f32) {
    let readout_id = format!("{id}-value");
    if let Some(el) = document.get_element_by_id(&readout_id) {
        el.set_text_content(Some(&format!("{v:.2}")));
    }
}
