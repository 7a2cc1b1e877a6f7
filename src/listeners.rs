use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

/// A DOM event listener that detaches itself when dropped. Keep it in a hook
/// so it lives exactly as long as the component that registered it.
pub struct EventListener {
    target: web_sys::EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(web_sys::Event)>,
}

impl EventListener {
    pub fn on(
        target: &web_sys::EventTarget,
        event: &'static str,
        handler: impl FnMut(web_sys::Event) + 'static,
    ) -> Option<Self> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web_sys::Event)>);
        target
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .ok()?;
        Some(Self {
            target: target.clone(),
            event,
            closure,
        })
    }

    pub fn window(event: &'static str, handler: impl FnMut(web_sys::Event) + 'static) -> Option<Self> {
        let window = web_sys::window()?;
        Self::on(window.as_ref(), event, handler)
    }

    pub fn document(event: &'static str, handler: impl FnMut(web_sys::Event) + 'static) -> Option<Self> {
        let document = web_sys::window()?.document()?;
        Self::on(document.as_ref(), event, handler)
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}

type ViewportCallback = dyn FnMut(js_sys::Array, web_sys::IntersectionObserver);

/// Intersection observer on a single element. Disconnects when dropped.
pub struct ViewportWatch {
    observer: web_sys::IntersectionObserver,
    _callback: Closure<ViewportCallback>,
}

impl ViewportWatch {
    /// Calls `on_enter` whenever the element with `id` starts intersecting
    /// the viewport by at least `threshold`.
    pub fn element(
        id: &str,
        threshold: f64,
        root_margin: &str,
        mut on_enter: impl FnMut() + 'static,
    ) -> Option<Self> {
        let element = web_sys::window()?.document()?.get_element_by_id(id)?;
        let callback = Closure::wrap(Box::new(
            move |entries: js_sys::Array, _observer: web_sys::IntersectionObserver| {
                let entered = entries.iter().any(|entry| {
                    entry
                        .unchecked_into::<web_sys::IntersectionObserverEntry>()
                        .is_intersecting()
                });
                if entered {
                    on_enter();
                }
            },
        ) as Box<ViewportCallback>);
        let options = web_sys::IntersectionObserverInit::new();
        options.set_threshold(&wasm_bindgen::JsValue::from_f64(threshold));
        options.set_root_margin(root_margin);
        let observer = web_sys::IntersectionObserver::new_with_options(
            callback.as_ref().unchecked_ref(),
            &options,
        )
        .ok()?;
        observer.observe(&element);
        Some(Self {
            observer,
            _callback: callback,
        })
    }
}

impl Drop for ViewportWatch {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

/// True when the event came from a text field, where arrow keys and letters
/// belong to the user's typing.
pub fn from_text_field(event: &web_sys::Event) -> bool {
    event
        .target()
        .and_then(|target| target.dyn_into::<web_sys::Element>().ok())
        .map(|element| matches!(element.tag_name().as_str(), "INPUT" | "TEXTAREA" | "SELECT"))
        .unwrap_or(false)
}

/// Locks or restores page scrolling, e.g. while a dialog or the mobile menu is open.
pub fn set_body_scroll_locked(locked: bool) {
    let Some(body) = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.body())
    else {
        return;
    };
    let value = if locked { "hidden" } else { "auto" };
    let _ = body.style().set_property("overflow", value);
}
