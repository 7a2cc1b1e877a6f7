use std::cell::RefCell;
use std::rc::Rc;

#[cfg(target_arch = "wasm32")]
use std::collections::HashMap;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{closure::Closure, JsCast};

use super::controller::{ColorSchemeSource, CrossFade, OverlayId, ThemeController, ThemeSurface};
use super::tokens::{ThemeName, ThemeTokens};

#[cfg(target_arch = "wasm32")]
use super::controller::{FADE_OUT_MS, SWAP_DELAY_MS};

pub const TOGGLE_ICON_ID: &str = "theme-toggle-icon";
const DARK_QUERY: &str = "(prefers-color-scheme: dark)";
#[cfg(target_arch = "wasm32")]
const FRAME_MS: u32 = 16;

/// Controller shared between the toggle button, the platform watcher and the
/// cross-fade timers. Theme subscribers run while it is mutably borrowed and
/// must not borrow it themselves.
pub type SharedTheme = Rc<RefCell<ThemeController<DocumentSurface>>>;

/// Writes theme state onto the live document.
pub struct DocumentSurface {
    next_overlay: u32,
    #[cfg(target_arch = "wasm32")]
    overlays: HashMap<OverlayId, web_sys::HtmlElement>,
}

impl DocumentSurface {
    pub fn attach() -> Self {
        Self {
            next_overlay: 0,
            #[cfg(target_arch = "wasm32")]
            overlays: HashMap::new(),
        }
    }

    fn allocate_overlay(&mut self) -> OverlayId {
        let id = OverlayId(self.next_overlay);
        self.next_overlay = self.next_overlay.wrapping_add(1);
        id
    }
}

#[cfg(target_arch = "wasm32")]
fn document() -> Option<web_sys::Document> {
    web_sys::window().and_then(|window| window.document())
}

#[cfg(target_arch = "wasm32")]
fn overlay_css(background: &str) -> String {
    format!(
        "position: fixed; top: 0; left: 0; width: 100%; height: 100%; background: {background}; \
         z-index: 9999; opacity: 0; pointer-events: none; transition: opacity 0.3s ease;"
    )
}

#[cfg(target_arch = "wasm32")]
fn replace_theme_class(body: &web_sys::HtmlElement, theme: ThemeName) {
    let classes = body.class_list();
    let stale: Vec<String> = (0..classes.length())
        .filter_map(|index| classes.item(index))
        .filter(|class| class.starts_with("theme-"))
        .collect();
    for class in stale {
        let _ = classes.remove_1(&class);
    }
    let _ = classes.add_1(&theme.body_class());
}

#[cfg(target_arch = "wasm32")]
fn create_overlay(background: &str) -> Result<web_sys::HtmlElement, String> {
    let document = document().ok_or("document unavailable")?;
    let overlay = document
        .create_element("div")
        .map_err(|_| "overlay create failed")?
        .dyn_into::<web_sys::HtmlElement>()
        .map_err(|_| "overlay cast failed")?;
    overlay.set_class_name("theme-transition-overlay");
    overlay
        .set_attribute("style", &overlay_css(background))
        .map_err(|_| "overlay style failed")?;
    document
        .body()
        .ok_or("document body missing")?
        .append_child(&overlay)
        .map_err(|_| "overlay append failed")?;
    Ok(overlay)
}

#[cfg(target_arch = "wasm32")]
fn ensure_theme_color_meta(document: &web_sys::Document) -> Result<web_sys::Element, String> {
    if let Ok(Some(existing)) = document.query_selector("meta[name=\"theme-color\"]") {
        return Ok(existing);
    }
    let meta = document
        .create_element("meta")
        .map_err(|_| "meta create failed")?;
    meta.set_attribute("name", "theme-color")
        .map_err(|_| "meta name failed")?;
    document
        .head()
        .ok_or("document head missing")?
        .append_child(&meta)
        .map_err(|_| "meta append failed")?;
    Ok(meta)
}

impl ThemeSurface for DocumentSurface {
    fn apply_tokens(&mut self, theme: ThemeName, tokens: &ThemeTokens) {
        #[cfg(target_arch = "wasm32")]
        {
            let Some(document) = document() else {
                return;
            };
            if let Some(root) = document
                .document_element()
                .and_then(|root| root.dyn_into::<web_sys::HtmlElement>().ok())
            {
                let style = root.style();
                for (property, value) in tokens.css_properties() {
                    let _ = style.set_property(property, value);
                }
            }
            if let Some(body) = document.body() {
                replace_theme_class(&body, theme);
                let _ = body.style().set_property("background", tokens.background);
            }
            tracing::debug!("theme: applied {theme}");
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = (theme, tokens);
        }
    }

    fn set_toggle_icon(&mut self, icon: &str) {
        #[cfg(target_arch = "wasm32")]
        if let Some(element) = document().and_then(|document| document.get_element_by_id(TOGGLE_ICON_ID)) {
            element.set_text_content(Some(icon));
        }
        #[cfg(not(target_arch = "wasm32"))]
        let _ = icon;
    }

    fn set_chrome_color(&mut self, color: &str) {
        #[cfg(target_arch = "wasm32")]
        {
            let Some(document) = document() else {
                return;
            };
            match ensure_theme_color_meta(&document) {
                Ok(meta) => {
                    let _ = meta.set_attribute("content", color);
                }
                Err(message) => tracing::warn!("theme: {message}"),
            }
        }
        #[cfg(not(target_arch = "wasm32"))]
        let _ = color;
    }

    fn show_overlay(&mut self, background: &str) -> OverlayId {
        let id = self.allocate_overlay();
        #[cfg(target_arch = "wasm32")]
        match create_overlay(background) {
            Ok(element) => {
                self.overlays.insert(id, element);
            }
            Err(message) => tracing::warn!("theme: {message}"),
        }
        #[cfg(not(target_arch = "wasm32"))]
        let _ = background;
        id
    }

    fn set_overlay_opacity(&mut self, overlay: OverlayId, opacity: f32) {
        #[cfg(target_arch = "wasm32")]
        if let Some(element) = self.overlays.get(&overlay) {
            let _ = element.style().set_property("opacity", &opacity.to_string());
        }
        #[cfg(not(target_arch = "wasm32"))]
        let _ = (overlay, opacity);
    }

    fn remove_overlay(&mut self, overlay: OverlayId) {
        #[cfg(target_arch = "wasm32")]
        if let Some(element) = self.overlays.remove(&overlay) {
            element.remove();
        }
        #[cfg(not(target_arch = "wasm32"))]
        let _ = overlay;
    }
}

/// `matchMedia("(prefers-color-scheme: dark)")`.
#[derive(Clone, Copy, Debug, Default)]
pub struct MediaQueryScheme;

impl ColorSchemeSource for MediaQueryScheme {
    fn prefers_dark(&self) -> Option<bool> {
        #[cfg(target_arch = "wasm32")]
        {
            let window = web_sys::window()?;
            let query = window.match_media(DARK_QUERY).ok().flatten()?;
            Some(query.matches())
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = DARK_QUERY;
            None
        }
    }
}

/// Runs the staged cross-fade on the page's timers: fade in on the next
/// frame, swap tokens after the delay, remove the overlay once faded out.
/// Off the browser every stage runs immediately.
pub fn run_cross_fade(shared: SharedTheme, fade: CrossFade) {
    #[cfg(target_arch = "wasm32")]
    wasm_bindgen_futures::spawn_local(async move {
        use gloo_timers::future::TimeoutFuture;

        TimeoutFuture::new(FRAME_MS).await;
        shared.borrow_mut().fade_in(&fade);
        TimeoutFuture::new(SWAP_DELAY_MS).await;
        shared.borrow_mut().finish_transition(&fade);
        TimeoutFuture::new(FADE_OUT_MS).await;
        shared.borrow_mut().discard_overlay(&fade);
    });
    #[cfg(not(target_arch = "wasm32"))]
    {
        let mut controller = shared.borrow_mut();
        controller.fade_in(&fade);
        controller.finish_transition(&fade);
        controller.discard_overlay(&fade);
    }
}

/// Toggle handler for the theme button.
pub fn toggle_theme(shared: &SharedTheme) {
    let fade = shared.borrow_mut().toggle();
    match fade {
        Ok(fade) => run_cross_fade(Rc::clone(shared), fade),
        Err(err) => tracing::warn!("theme: toggle ignored: {err}"),
    }
}

/// Live `change` listener on the platform color-scheme query. Dropping it
/// detaches the listener.
pub struct SchemeWatch {
    #[cfg(target_arch = "wasm32")]
    query: web_sys::MediaQueryList,
    #[cfg(target_arch = "wasm32")]
    closure: Closure<dyn FnMut(web_sys::MediaQueryListEvent)>,
}

impl Drop for SchemeWatch {
    fn drop(&mut self) {
        #[cfg(target_arch = "wasm32")]
        {
            let _ = self
                .query
                .remove_event_listener_with_callback("change", self.closure.as_ref().unchecked_ref());
        }
    }
}

/// Subscribes the controller to platform scheme changes. Returns `None` when
/// the platform has no `matchMedia`.
pub fn watch_platform_scheme(shared: &SharedTheme) -> Option<SchemeWatch> {
    #[cfg(target_arch = "wasm32")]
    {
        let window = web_sys::window()?;
        let query = window.match_media(DARK_QUERY).ok().flatten()?;
        let shared = Rc::clone(shared);
        let closure = Closure::wrap(Box::new(move |event: web_sys::MediaQueryListEvent| {
            shared.borrow_mut().on_platform_scheme_change(event.matches());
        }) as Box<dyn FnMut(_)>);
        if query
            .add_event_listener_with_callback("change", closure.as_ref().unchecked_ref())
            .is_err()
        {
            tracing::warn!("theme: platform scheme listener unavailable");
            return None;
        }
        Some(SchemeWatch { query, closure })
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = shared;
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Emitter;
    use crate::theme::{MemoryStore, PreferenceSlot};
    use pretty_assertions::assert_eq;

    fn shared() -> SharedTheme {
        Rc::new(RefCell::new(ThemeController::initialize(
            PreferenceSlot::new("portfolio-theme", Box::new(MemoryStore::default())),
            &MediaQueryScheme,
            DocumentSurface::attach(),
            Emitter::new(),
        )))
    }

    #[test]
    fn headless_toggle_completes_immediately() {
        let shared = shared();
        assert_eq!(shared.borrow().current_theme(), ThemeName::Dark);

        toggle_theme(&shared);

        let controller = shared.borrow();
        assert_eq!(controller.current_theme(), ThemeName::Light);
        assert_eq!(controller.live_overlays(), 0);
    }

    #[test]
    fn no_platform_watch_off_the_browser() {
        assert!(watch_platform_scheme(&shared()).is_none());
    }
}
