use std::collections::VecDeque;

use dioxus::prelude::*;

#[cfg(target_arch = "wasm32")]
use crate::listeners::{from_text_field, set_body_scroll_locked, EventListener};
#[cfg(target_arch = "wasm32")]
use crate::timers::after_update;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;

/// Page sections in document order: `(element id, nav label)`.
pub const SECTIONS: [(&str, &str); 6] = [
    ("home", "Home"),
    ("about", "About"),
    ("skills", "Skills"),
    ("projects", "Projects"),
    ("achievements", "Achievements"),
    ("contact", "Contact"),
];

/// Height of the fixed nav bar, subtracted when scrolling to a section.
pub const NAV_OFFSET_PX: f64 = 80.0;
const SCROLLED_AFTER_PX: f64 = 100.0;
const HIDE_AFTER_PX: f64 = 200.0;
#[cfg(target_arch = "wasm32")]
const EASTER_EGG_MS: u32 = 3000;

const KONAMI: [&str; 10] = [
    "ArrowUp",
    "ArrowUp",
    "ArrowDown",
    "ArrowDown",
    "ArrowLeft",
    "ArrowRight",
    "ArrowLeft",
    "ArrowRight",
    "KeyB",
    "KeyA",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavKey {
    Next,
    Previous,
}

impl NavKey {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowRight" | "ArrowDown" => Some(NavKey::Next),
            "ArrowLeft" | "ArrowUp" => Some(NavKey::Previous),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SectionNav {
    active: usize,
}

impl SectionNav {
    pub fn active(&self) -> usize {
        self.active
    }

    pub fn active_id(&self) -> &'static str {
        SECTIONS[self.active].0
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active_id() == id
    }

    /// Activates `id`. Unknown ids are ignored.
    pub fn show(&mut self, id: &str) -> bool {
        match SECTIONS.iter().position(|(section, _)| *section == id) {
            Some(index) => {
                self.active = index;
                true
            }
            None => false,
        }
    }

    pub fn step(&mut self, key: NavKey) -> &'static str {
        let len = SECTIONS.len();
        self.active = match key {
            NavKey::Next => (self.active + 1) % len,
            NavKey::Previous => (self.active + len - 1) % len,
        };
        self.active_id()
    }

    pub fn set_index(&mut self, index: usize) {
        if index < SECTIONS.len() {
            self.active = index;
        }
    }
}

/// Index of the last section whose top edge has scrolled under the nav bar.
/// `tops` are document offsets in section order.
pub fn scroll_spy(tops: &[f64], scroll_y: f64) -> usize {
    let probe = scroll_y + NAV_OFFSET_PX;
    tops.iter().rposition(|top| *top <= probe).unwrap_or(0)
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NavbarState {
    pub scrolled: bool,
    pub hidden: bool,
}

/// Shrinks the bar once the page scrolls, hides it while scrolling down and
/// brings it back on any upward scroll.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NavbarScroll {
    last_y: f64,
    state: NavbarState,
}

impl NavbarScroll {
    pub fn update(&mut self, scroll_y: f64) -> NavbarState {
        self.state = NavbarState {
            scrolled: scroll_y > SCROLLED_AFTER_PX,
            hidden: scroll_y > self.last_y && scroll_y > HIDE_AFTER_PX,
        };
        self.last_y = scroll_y;
        self.state
    }

    pub fn state(&self) -> NavbarState {
        self.state
    }
}

/// Sliding window over the last key codes, matched against the Konami code.
#[derive(Clone, Debug, Default)]
pub struct KonamiTracker {
    recent: VecDeque<String>,
}

impl KonamiTracker {
    /// Records `code` and returns `true` when it completes the sequence.
    pub fn push(&mut self, code: &str) -> bool {
        self.recent.push_back(code.to_string());
        if self.recent.len() > KONAMI.len() {
            self.recent.pop_front();
        }
        let matched = self.recent.len() == KONAMI.len()
            && self.recent.iter().zip(KONAMI.iter()).all(|(seen, want)| seen == want);
        if matched {
            self.recent.clear();
        }
        matched
    }
}

/// Offset of floating icon `index` for a pointer at the given viewport
/// percentages.
pub fn parallax_offset(index: usize, x_pct: f64, y_pct: f64) -> (f64, f64) {
    let speed = (index + 1) as f64 * 0.5;
    ((x_pct - 50.0) * speed * 0.1, (y_pct - 50.0) * speed * 0.1)
}

#[cfg(target_arch = "wasm32")]
fn scroll_to_section(id: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(element) = window
        .document()
        .and_then(|document| document.get_element_by_id(id))
        .and_then(|element| element.dyn_into::<web_sys::HtmlElement>().ok())
    else {
        return;
    };
    let options = web_sys::ScrollToOptions::new();
    options.set_top(element.offset_top() as f64 - NAV_OFFSET_PX);
    options.set_behavior(web_sys::ScrollBehavior::Smooth);
    window.scroll_to_with_scroll_to_options(&options);
    if let Ok(history) = window.history() {
        let _ = history.push_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&format!("#{id}")));
    }
}

#[cfg(target_arch = "wasm32")]
fn section_tops() -> Vec<f64> {
    let Some(document) = web_sys::window().and_then(|window| window.document()) else {
        return Vec::new();
    };
    SECTIONS
        .iter()
        .map(|(id, _)| {
            document
                .get_element_by_id(id)
                .and_then(|element| element.dyn_into::<web_sys::HtmlElement>().ok())
                .map(|element| element.offset_top() as f64)
                .unwrap_or(f64::MAX)
        })
        .collect()
}

#[component]
pub fn NavBar(celebrating: Signal<bool>) -> Element {
    let mut nav = use_signal(SectionNav::default);
    let navbar = use_signal(NavbarScroll::default);
    let mut menu_open = use_signal(|| false);

    #[cfg(target_arch = "wasm32")]
    use_hook(move || {
        let mut nav = nav;
        let mut navbar = navbar;
        let mut celebrating = celebrating;
        let mut konami = KonamiTracker::default();
        let on_key = EventListener::window("keydown", move |event| {
            let Some(key_event) = event.dyn_ref::<web_sys::KeyboardEvent>() else {
                return;
            };
            if konami.push(&key_event.code()) {
                tracing::info!("navigation: konami code");
                celebrating.set(true);
                after_update(EASTER_EGG_MS, celebrating, |celebrating| *celebrating = false);
            }
            if from_text_field(&event) {
                return;
            }
            if let Some(step) = NavKey::from_key(&key_event.key()) {
                let id = nav.write().step(step);
                scroll_to_section(id);
            }
        });
        let on_scroll = EventListener::window("scroll", move |_event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let scroll_y = window.scroll_y().unwrap_or(0.0);
            navbar.write().update(scroll_y);
            let index = scroll_spy(&section_tops(), scroll_y);
            if nav.peek().active() != index {
                nav.write().set_index(index);
            }
        });
        let on_outside_click = EventListener::document("click", move |event| {
            let inside_nav = event
                .target()
                .and_then(|target| target.dyn_into::<web_sys::Element>().ok())
                .and_then(|element| element.closest("nav").ok().flatten())
                .is_some();
            if !inside_nav && *menu_open.peek() {
                menu_open.set(false);
                set_body_scroll_locked(false);
            }
        });
        std::rc::Rc::new([on_key, on_scroll, on_outside_click])
    });

    let state = navbar.read().state();
    let mut nav_class = String::from("main-nav");
    if state.scrolled {
        nav_class.push_str(" scrolled");
    }
    if state.hidden {
        nav_class.push_str(" nav-hidden");
    }
    let links_class = if menu_open() { "nav-links active" } else { "nav-links" };
    let toggle_class = if menu_open() { "mobile-toggle active" } else { "mobile-toggle" };

    rsx! {
        nav { id: "main-nav", class: "{nav_class}",
            div { class: "nav-brand glitch-text", "data-text": "PORTFOLIO", "PORTFOLIO" }
            button {
                id: "mobile-menu",
                r#type: "button",
                class: "{toggle_class}",
                aria_label: "Toggle navigation",
                onclick: move |_| {
                    let open = !menu_open();
                    menu_open.set(open);
                    #[cfg(target_arch = "wasm32")]
                    set_body_scroll_locked(open);
                },
                span {}
                span {}
                span {}
            }
            ul { class: "{links_class}",
                for (id, label) in SECTIONS {
                    li { key: "{id}",
                        a {
                            href: "#{id}",
                            "data-section": id,
                            class: if nav.read().is_active(id) { "active" } else { "" },
                            onclick: move |event| {
                                event.prevent_default();
                                if nav.write().show(id) {
                                    #[cfg(target_arch = "wasm32")]
                                    scroll_to_section(id);
                                }
                                menu_open.set(false);
                                #[cfg(target_arch = "wasm32")]
                                set_body_scroll_locked(false);
                            },
                            "{label}"
                        }
                    }
                }
            }
        }
    }
}

/// Decorative icons that drift against the pointer.
#[component]
pub fn FloatingIcons(icons: Vec<&'static str>) -> Element {
    let mut pointer = use_signal(|| (50.0f64, 50.0f64));
    let count = icons.len();
    rsx! {
        div {
            class: "floating-icons",
            onmousemove: move |event| {
                let coords = event.client_coordinates();
                #[cfg(target_arch = "wasm32")]
                {
                    let Some(window) = web_sys::window() else {
                        return;
                    };
                    let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(1.0).max(1.0);
                    let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(1.0).max(1.0);
                    pointer.set((coords.x / width * 100.0, coords.y / height * 100.0));
                }
                #[cfg(not(target_arch = "wasm32"))]
                {
                    pointer.set((coords.x, coords.y));
                }
            },
            for (index, icon, style) in icons.into_iter().enumerate().map(|(index, icon)| {
                let (x_pct, y_pct) = pointer();
                let (dx, dy) = parallax_offset(index, x_pct, y_pct);
                (index, icon, format!("transform: translate({dx:.1}px, {dy:.1}px) rotate({dx:.1}deg);"))
            }) {
                span { key: "{index}-{count}", class: "floating-icon", style: "{style}", "{icon}" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn show_ignores_unknown_sections() {
        let mut nav = SectionNav::default();
        assert!(nav.show("projects"));
        assert_eq!(nav.active_id(), "projects");
        assert!(!nav.show("blog"));
        assert_eq!(nav.active_id(), "projects");
    }

    #[test]
    fn arrow_keys_wrap_both_ways() {
        let mut nav = SectionNav::default();
        assert_eq!(nav.step(NavKey::Previous), "contact");
        assert_eq!(nav.step(NavKey::Next), "home");
        assert_eq!(nav.step(NavKey::Next), "about");
        assert_eq!(NavKey::from_key("ArrowDown"), Some(NavKey::Next));
        assert_eq!(NavKey::from_key("ArrowUp"), Some(NavKey::Previous));
        assert_eq!(NavKey::from_key("Enter"), None);
    }

    #[test]
    fn scroll_spy_picks_section_under_the_bar() {
        let tops = [0.0, 800.0, 1600.0, 2400.0];
        assert_eq!(scroll_spy(&tops, 0.0), 0);
        assert_eq!(scroll_spy(&tops, 719.0), 0);
        assert_eq!(scroll_spy(&tops, 720.0), 1);
        assert_eq!(scroll_spy(&tops, 5000.0), 3);
        assert_eq!(scroll_spy(&[], 100.0), 0);
    }

    #[test]
    fn navbar_hides_on_scroll_down_and_returns_on_scroll_up() {
        let mut navbar = NavbarScroll::default();
        assert_eq!(navbar.update(50.0), NavbarState { scrolled: false, hidden: false });
        assert_eq!(navbar.update(150.0), NavbarState { scrolled: true, hidden: false });
        assert_eq!(navbar.update(300.0), NavbarState { scrolled: true, hidden: true });
        assert_eq!(navbar.update(250.0), NavbarState { scrolled: true, hidden: false });
    }

    #[test]
    fn konami_code_matches_on_a_sliding_window() {
        let mut tracker = KonamiTracker::default();
        assert!(!tracker.push("KeyX"));
        let mut hits = 0;
        for code in KONAMI {
            if tracker.push(code) {
                hits += 1;
            }
        }
        assert_eq!(hits, 1);
        assert!(!tracker.push("KeyA"));
    }

    #[test]
    fn parallax_grows_with_index() {
        assert_eq!(parallax_offset(0, 50.0, 50.0), (0.0, 0.0));
        assert_eq!(parallax_offset(0, 100.0, 0.0), (2.5, -2.5));
        assert_eq!(parallax_offset(1, 100.0, 0.0), (5.0, -5.0));
    }
}
