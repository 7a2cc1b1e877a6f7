use dioxus::prelude::*;

use crate::config::RuntimeConfig;
use crate::events::{ContentLoaded, Emitter};

pub const LOADING_STEPS: [&str; 6] = [
    "Initializing systems...",
    "Loading assets...",
    "Rendering components...",
    "Optimizing performance...",
    "Finalizing setup...",
    "Ready to launch!",
];
pub const STEP_INTERVAL_MS: u32 = 800;
pub const PROGRESS_TICKS: u32 = 100;
/// Pause between a full bar and the fade-out.
pub const SETTLE_MS: u32 = 500;
pub const FADE_MS: u32 = 1000;

pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadingPhase {
    Progress,
    FadingOut,
    Hidden,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LoadingSequence {
    tick: u32,
    tick_ms: u32,
    elapsed_ms: u32,
    eased_pct: f64,
    phase: LoadingPhase,
    announced: bool,
}

impl LoadingSequence {
    pub fn new(duration_ms: u32) -> Self {
        Self {
            tick: 0,
            tick_ms: (duration_ms / PROGRESS_TICKS).max(1),
            elapsed_ms: 0,
            eased_pct: 0.0,
            phase: LoadingPhase::Progress,
            announced: false,
        }
    }

    pub fn tick_ms(&self) -> u32 {
        self.tick_ms
    }

    pub fn phase(&self) -> LoadingPhase {
        self.phase
    }

    pub fn width_pct(&self) -> f64 {
        self.eased_pct
    }

    pub fn percent_label(&self) -> String {
        format!("{}%", self.eased_pct.round() as u32)
    }

    pub fn message(&self) -> &'static str {
        let index = (self.elapsed_ms / STEP_INTERVAL_MS) as usize;
        LOADING_STEPS[index.min(LOADING_STEPS.len() - 1)]
    }

    /// Advances the bar one tick. Returns `false` once the bar is full and the
    /// sequence should move on to the fade.
    pub fn tick(&mut self) -> bool {
        if self.phase != LoadingPhase::Progress || self.tick > PROGRESS_TICKS {
            return false;
        }
        self.eased_pct = ease_out_cubic(self.tick as f64 / PROGRESS_TICKS as f64) * 100.0;
        self.tick += 1;
        self.elapsed_ms = self.elapsed_ms.saturating_add(self.tick_ms);
        true
    }

    pub fn begin_fade(&mut self) {
        if self.phase == LoadingPhase::Progress {
            self.phase = LoadingPhase::FadingOut;
        }
    }

    /// Hides the screen. Returns `true` exactly once per page, when
    /// `ContentLoaded` should fire.
    pub fn finish(&mut self) -> bool {
        self.phase = LoadingPhase::Hidden;
        if self.announced {
            return false;
        }
        self.announced = true;
        true
    }

    /// Starts the bar over, e.g. when the tab becomes visible mid-load.
    pub fn restart(&mut self) {
        if self.phase == LoadingPhase::Hidden {
            return;
        }
        let announced = self.announced;
        *self = Self::new(self.tick_ms * PROGRESS_TICKS);
        self.announced = announced;
    }
}

/// Delay before section `index` slides in after the splash is gone.
pub fn reveal_delay_ms(index: usize) -> u32 {
    200 + index as u32 * 100
}

#[component]
pub fn LoadingScreen(revealed: Signal<bool>) -> Element {
    let config = use_context::<RuntimeConfig>();
    let loaded = use_context::<Emitter<ContentLoaded>>();
    let sequence = use_signal(|| LoadingSequence::new(config.loading_duration_ms));

    use_future(move || {
        let loaded = loaded.clone();
        let mut sequence = sequence;
        let mut revealed = revealed;
        async move {
            #[cfg(target_arch = "wasm32")]
            {
                use gloo_timers::future::TimeoutFuture;

                loop {
                    let tick_ms = sequence.peek().tick_ms();
                    if !sequence.write().tick() {
                        break;
                    }
                    TimeoutFuture::new(tick_ms).await;
                }
                TimeoutFuture::new(SETTLE_MS).await;
                sequence.write().begin_fade();
                TimeoutFuture::new(FADE_MS).await;
            }
            #[cfg(not(target_arch = "wasm32"))]
            while sequence.write().tick() {}

            if sequence.write().finish() {
                revealed.set(true);
                tracing::info!("loading: content loaded");
                loaded.emit(&ContentLoaded);
            }
        }
    });

    #[cfg(target_arch = "wasm32")]
    use_visibility_restart(sequence);

    let state = sequence.read().clone();
    if state.phase() == LoadingPhase::Hidden {
        return rsx! {};
    }
    let class = match state.phase() {
        LoadingPhase::FadingOut => "loading-screen fade-out",
        _ => "loading-screen",
    };
    let fill_style = format!("width: {:.2}%;", state.width_pct());
    let percent = state.percent_label();
    rsx! {
        div { id: "loading-screen", class: "{class}", role: "progressbar",
            aria_valuemin: "0", aria_valuemax: "100", aria_valuetext: "{percent}",
            div { class: "loading-logo glitch-text", "LOADING" }
            div { class: "progress-bar",
                div { class: "progress-fill", style: "{fill_style}" }
            }
            span { class: "progress-percentage", "{percent}" }
            div { class: "loading-text",
                p { "{state.message()}" }
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn use_visibility_restart(sequence: Signal<LoadingSequence>) {
    use std::rc::Rc;
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::JsCast;

    let listener = use_hook(move || {
        let document = web_sys::window().and_then(|window| window.document())?;
        let mut sequence = sequence;
        let watched = document.clone();
        let closure = Rc::new(Closure::wrap(Box::new(move |_event: web_sys::Event| {
            if watched.visibility_state() == web_sys::VisibilityState::Visible {
                tracing::debug!("loading: tab visible again, restarting");
                sequence.write().restart();
            }
        }) as Box<dyn FnMut(_)>));
        document
            .add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().as_ref().unchecked_ref(),
            )
            .ok()?;
        Some(closure)
    });

    use_drop(move || {
        let Some(closure) = listener.as_ref() else {
            return;
        };
        if let Some(document) = web_sys::window().and_then(|window| window.document()) {
            let _ = document.remove_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().as_ref().unchecked_ref(),
            );
        }
    });
}
