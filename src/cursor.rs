use dioxus::prelude::*;
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;

const EASING: f64 = 0.1;
#[cfg(target_arch = "wasm32")]
const FRAME_MS: u32 = 16;

/// Custom cursor that trails the pointer and turns to face the direction of
/// travel.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CursorTrail {
    pub pointer: (f64, f64),
    pub position: (f64, f64),
    last_pointer: (f64, f64),
    pub angle_deg: f64,
}

impl CursorTrail {
    pub fn on_pointer(&mut self, x: f64, y: f64) {
        let dx = x - self.last_pointer.0;
        let dy = y - self.last_pointer.1;
        self.angle_deg = dy.atan2(dx).to_degrees();
        self.pointer = (x, y);
        self.last_pointer = (x, y);
    }

    /// One animation frame: close a tenth of the remaining gap.
    pub fn step(&mut self) {
        self.position.0 += (self.pointer.0 - self.position.0) * EASING;
        self.position.1 += (self.pointer.1 - self.position.1) * EASING;
    }

    pub fn style(&self, color: &str, celebrating: bool) -> String {
        let background = if celebrating { "transparent" } else { color };
        format!(
            "left: {:.1}px; top: {:.1}px; transform: rotate({:.1}deg); background: {background};",
            self.position.0, self.position.1, self.angle_deg
        )
    }
}

#[cfg(target_arch = "wasm32")]
struct CursorListeners {
    on_move: Rc<wasm_bindgen::closure::Closure<dyn FnMut(web_sys::MouseEvent)>>,
    _frames: gloo_timers::callback::Interval,
}

#[component]
pub fn CustomCursor(color: String, celebrating: bool) -> Element {
    let trail = use_signal(CursorTrail::default);
    #[cfg(target_arch = "wasm32")]
    let mut listeners = use_signal(|| None::<CursorListeners>);

    #[cfg(target_arch = "wasm32")]
    {
        use_effect(move || {
            if listeners.peek().is_some() {
                return;
            }
            let Some(window) = web_sys::window() else {
                return;
            };
            let mut trail_for_move = trail;
            let on_move = Rc::new(wasm_bindgen::closure::Closure::wrap(Box::new(
                move |event: web_sys::MouseEvent| {
                    trail_for_move
                        .write()
                        .on_pointer(event.client_x() as f64, event.client_y() as f64);
                },
            )
                as Box<dyn FnMut(_)>));
            if window
                .add_event_listener_with_callback("mousemove", on_move.as_ref().as_ref().unchecked_ref())
                .is_err()
            {
                tracing::debug!("cursor: pointer tracking unavailable");
                return;
            }
            let mut trail_for_frames = trail;
            let frames = gloo_timers::callback::Interval::new(FRAME_MS, move || {
                trail_for_frames.write().step();
            });
            listeners.set(Some(CursorListeners {
                on_move,
                _frames: frames,
            }));
        });

        use_drop(move || {
            let Some(active) = listeners.write().take() else {
                return;
            };
            if let Some(window) = web_sys::window() {
                let _ = window.remove_event_listener_with_callback(
                    "mousemove",
                    active.on_move.as_ref().as_ref().unchecked_ref(),
                );
            }
        });
    }

    let style = trail.read().style(&color, celebrating);
    rsx! {
        div { id: "cursor", class: "cursor", style: "{style}",
            if celebrating { "🚀" }
        }
    }
}
