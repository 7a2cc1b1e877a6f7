use dioxus::prelude::*;

#[cfg(target_arch = "wasm32")]
use crate::listeners::ViewportWatch;

/// Gap between neighbouring items as they slide in.
pub const STAGGER_STEP_MS: u32 = 100;
#[cfg(target_arch = "wasm32")]
const TYPE_START_MS: u32 = 1000;
#[cfg(target_arch = "wasm32")]
const TYPE_CHAR_MS: u32 = 50;

/// Flips once the splash screen is gone and the sections may slide in.
#[derive(Clone, Copy)]
pub struct SectionsRevealed(pub Signal<bool>);

/// Inline custom property that delays the entrance of item `index`.
pub fn stagger_style(index: usize) -> String {
    format!("--stagger-delay: {}ms;", index as u32 * STAGGER_STEP_MS)
}

/// `true` once the element with `id` has scrolled into view. Stays `true`.
/// Without an intersection observer the element counts as seen right away.
pub fn use_in_view(id: String, threshold: f64, root_margin: &'static str) -> Signal<bool> {
    let seen = use_signal(|| cfg!(not(target_arch = "wasm32")));

    #[cfg(target_arch = "wasm32")]
    {
        let mut seen = seen;
        let mut watch = use_signal(|| None::<ViewportWatch>);
        use_effect(move || {
            if watch.peek().is_some() || *seen.peek() {
                return;
            }
            let observer = ViewportWatch::element(&id, threshold, root_margin, move || {
                if !*seen.peek() {
                    seen.set(true);
                }
            });
            match observer {
                Some(observer) => watch.set(Some(observer)),
                None => {
                    tracing::debug!("reveal: cannot observe #{id}, showing it");
                    seen.set(true);
                }
            }
        });
    }
    #[cfg(not(target_arch = "wasm32"))]
    let _ = (id, threshold, root_margin);

    seen
}

/// Types `text` out one character at a time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Typewriter {
    text: &'static str,
    shown: usize,
}

impl Typewriter {
    pub fn new(text: &'static str) -> Self {
        Self { text, shown: 0 }
    }

    pub fn visible(&self) -> &'static str {
        &self.text[..self.shown]
    }

    pub fn is_done(&self) -> bool {
        self.shown == self.text.len()
    }

    /// Reveals the next character. `false` once everything is shown.
    pub fn tick(&mut self) -> bool {
        match self.text[self.shown..].chars().next() {
            Some(next) => {
                self.shown += next.len_utf8();
                true
            }
            None => false,
        }
    }
}

/// Hero line that starts typing a second after the page is revealed.
#[component]
pub fn TypewriterText(text: &'static str) -> Element {
    let SectionsRevealed(revealed) = use_context::<SectionsRevealed>();
    let mut typed = use_signal(|| Typewriter::new(text));
    let mut started = use_signal(|| false);

    use_effect(move || {
        if !revealed() || *started.peek() {
            return;
        }
        started.set(true);
        spawn(async move {
            #[cfg(target_arch = "wasm32")]
            gloo_timers::future::TimeoutFuture::new(TYPE_START_MS).await;
            while typed.write().tick() {
                #[cfg(target_arch = "wasm32")]
                gloo_timers::future::TimeoutFuture::new(TYPE_CHAR_MS).await;
            }
        });
    });

    let typing = typed.read();
    let visible = typing.visible();
    let class = if typing.is_done() { "hero-subtitle typewriter done" } else { "hero-subtitle typewriter" };
    rsx! {
        p { class: "{class}", aria_label: text,
            "{visible}"
            span { class: "typewriter-caret", aria_hidden: "true" }
        }
    }
}
