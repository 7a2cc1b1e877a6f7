use dioxus::prelude::*;

use super::controller::ThemeChanged;
use super::dom::SharedTheme;
use super::tokens::ThemeTokens;
use crate::cursor::CustomCursor;
use crate::rng::roll;

const PARTICLE_COUNT: usize = 20;
#[cfg(target_arch = "wasm32")]
const GLITCH_HOLD_MS: u32 = 1000;

/// `#rrggbb` to `rgba(r, g, b, alpha)`. Anything else renders as black.
pub fn hex_to_rgba(hex: &str, alpha: f32) -> String {
    let (r, g, b) = parse_hex(hex).unwrap_or((0, 0, 0));
    format!("rgba({r}, {g}, {b}, {alpha})")
}

fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

pub fn particle_background(tokens: &ThemeTokens) -> String {
    let first = hex_to_rgba(tokens.primary, 0.5);
    let second = hex_to_rgba(tokens.secondary, 0.5);
    let third = hex_to_rgba(tokens.accent, 0.5);
    [
        format!("radial-gradient(2px 2px at 20px 30px, {first}, transparent)"),
        format!("radial-gradient(2px 2px at 40px 70px, {second}, transparent)"),
        format!("radial-gradient(1px 1px at 90px 40px, {third}, transparent)"),
        format!("radial-gradient(1px 1px at 130px 80px, {first}, transparent)"),
        format!("radial-gradient(2px 2px at 160px 30px, {second}, transparent)"),
    ]
    .join(", ")
}

pub fn glitch_css(tokens: &ThemeTokens) -> String {
    format!(
        ".glitch-text::before {{ color: {} !important; }} .glitch-text::after {{ color: {} !important; }}",
        tokens.secondary, tokens.accent
    )
}

/// Colors the decorative layers derive from a theme broadcast.
#[derive(Clone, Debug, PartialEq)]
pub struct ThemeStyles {
    pub particles: String,
    pub cursor: String,
}

impl ThemeStyles {
    pub fn from_tokens(tokens: &ThemeTokens) -> Self {
        Self {
            particles: particle_background(tokens),
            cursor: tokens.secondary.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FloatingParticle {
    pub duration_s: f64,
    pub delay_s: f64,
    pub left_pct: f64,
    pub top_pct: f64,
}

impl FloatingParticle {
    pub fn style(&self) -> String {
        format!(
            "animation: floatParticle {:.2}s linear infinite; animation-delay: {:.2}s; left: {:.2}%; top: {:.2}%;",
            self.duration_s, self.delay_s, self.left_pct, self.top_pct
        )
    }
}

pub fn floating_particles(count: usize, mut roll: impl FnMut() -> f64) -> Vec<FloatingParticle> {
    (0..count)
        .map(|_| FloatingParticle {
            duration_s: 5.0 + roll() * 10.0,
            left_pct: roll() * 100.0,
            top_pct: roll() * 100.0,
            delay_s: roll() * 5.0,
        })
        .collect()
}

/// Particle background, floating particles, glitch accents and the custom
/// cursor. Restyles itself only from `ThemeChanged` payloads.
#[component]
pub fn ThemeEffectsLayer(celebrating: bool) -> Element {
    let shared = use_context::<SharedTheme>();
    let mut styles = use_signal(|| ThemeStyles::from_tokens(shared.borrow().theme_colors()));
    let mut glitch = use_signal(|| None::<(u64, String)>);
    let particles = use_hook(|| floating_particles(PARTICLE_COUNT, roll));

    let subscription = use_hook({
        let shared = shared.clone();
        move || {
            let emitter = shared.borrow().changes().clone();
            let mut generation = 0u64;
            emitter.subscribe(move |change: &ThemeChanged| {
                generation += 1;
                styles.set(ThemeStyles::from_tokens(&change.tokens));
                glitch.set(Some((generation, glitch_css(&change.tokens))));
                #[cfg(target_arch = "wasm32")]
                {
                    let current = generation;
                    crate::timers::after_update(GLITCH_HOLD_MS, glitch, move |glitch| {
                        if matches!(glitch, Some((id, _)) if *id == current) {
                            *glitch = None;
                        }
                    });
                }
            })
        }
    });

    use_drop(move || {
        if let Ok(controller) = shared.try_borrow() {
            controller.changes().unsubscribe(subscription);
        }
    });

    let current = styles();
    rsx! {
        div { class: "particles", style: "background: {current.particles};" }
        div { class: "theme-particles",
            for (index, particle) in particles.iter().enumerate() {
                div { key: "{index}", class: "theme-particle", style: "{particle.style()}" }
            }
        }
        if let Some((_, css)) = glitch() {
            style { "{css}" }
        }
        CustomCursor { color: current.cursor.clone(), celebrating }
    }
}
