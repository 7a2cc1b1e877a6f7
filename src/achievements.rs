use dioxus::prelude::*;

use crate::config::RuntimeConfig;
use crate::events::{ContentLoaded, Emitter};
use crate::reveal::stagger_style;
use crate::rng::roll;
use crate::timers::{after, after_update};

#[cfg(target_arch = "wasm32")]
use crate::listeners::EventListener;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;

const REACT_ABOVE: f64 = 0.7;
const AUTO_FLIP_ABOVE: f64 = 0.8;
const HINT_ABOVE: f64 = 0.7;
const FREQUENT_FLIPS: u32 = 3;

const GLOW_MS: u32 = 2000;
const NUDGE_MS: u32 = 300;
const FLIP_ALL_STAGGER_MS: u32 = 200;
const RESET_ALL_STAGGER_MS: u32 = 100;
#[cfg(target_arch = "wasm32")]
const MOTION_PULSE_MS: u32 = 600;
#[cfg(target_arch = "wasm32")]
const AUTO_FLIP_DELAY_MS: u32 = 300;
#[cfg(target_arch = "wasm32")]
const KEY_PAUSE_MS: u32 = 2000;
const DEMO_DELAY_MS: u32 = 5000;
const DEMO_HOLD_MS: u32 = 3000;
#[cfg(target_arch = "wasm32")]
const HINT_EVERY_MS: u32 = 15_000;
#[cfg(target_arch = "wasm32")]
const SLIDE_EVERY_MS: u32 = 4000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Achievement {
    pub emoji: &'static str,
    pub title: &'static str,
    pub summary: &'static str,
    pub details: &'static str,
}

pub static ACHIEVEMENTS: [Achievement; 4] = [
    Achievement {
        emoji: "🏆",
        title: "Hackathon Champion",
        summary: "First place, national agri-tech hackathon",
        details: "Built the first crop detection prototype in 36 hours with a team of four.",
    },
    Achievement {
        emoji: "🚀",
        title: "Open Source Contributor",
        summary: "Merged patches across rendering and tooling projects",
        details: "Fixed physics and rendering bugs and wrote docs that new contributors still use.",
    },
    Achievement {
        emoji: "📜",
        title: "Research Publication",
        summary: "Paper on early crop disease detection",
        details: "Presented a lightweight vision model that runs on low-cost field hardware.",
    },
    Achievement {
        emoji: "⚡",
        title: "Competitive Programmer",
        summary: "Top ranks in regional contests",
        details: "Hundreds of solved problems, with a soft spot for graph algorithms.",
    },
];

/// Frequency sweep played when a card turns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlipTone {
    Flip,
    FlipBack,
}

impl FlipTone {
    pub const DURATION_S: f64 = 0.1;

    /// `(start_hz, end_hz)`
    pub fn sweep(self) -> (f32, f32) {
        match self {
            FlipTone::Flip => (800.0, 400.0),
            FlipTone::FlipBack => (400.0, 800.0),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CardState {
    pub flipped: bool,
    pub flip_count: u32,
    glow: Option<u64>,
    nudge: Option<u64>,
    motion: Option<u64>,
}

impl CardState {
    pub fn is_glowing(&self) -> bool {
        self.glow.is_some()
    }

    pub fn is_nudged(&self) -> bool {
        self.nudge.is_some()
    }

    pub fn has_motion(&self) -> bool {
        self.motion.is_some()
    }

    pub fn class(&self) -> String {
        let mut class = String::from("achievement-flip-card");
        for (on, name) in [
            (self.flipped, " flipped"),
            (self.is_glowing(), " frequent-flipper"),
            (self.is_nudged(), " nudged"),
            (self.has_motion(), " motion-detected"),
        ] {
            if on {
                class.push_str(name);
            }
        }
        class
    }
}

/// What a flip changed. Each transient effect carries the token that clears it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlipOutcome {
    pub index: usize,
    pub flipped: bool,
    pub flip_count: u32,
    pub tone: FlipTone,
    pub glow: Option<u64>,
    pub neighbors: Vec<(usize, u64)>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reaction {
    pub index: usize,
    pub auto_flip: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlipDeck {
    cards: Vec<CardState>,
    seq: u64,
}

impl FlipDeck {
    pub fn new(len: usize) -> Self {
        Self {
            cards: vec![CardState::default(); len],
            seq: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn card(&self, index: usize) -> Option<&CardState> {
        self.cards.get(index)
    }

    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    pub fn flip(&mut self, index: usize) -> Option<FlipOutcome> {
        let card = self.cards.get_mut(index)?;
        card.flipped = !card.flipped;
        card.flip_count += 1;
        let (flipped, flip_count) = (card.flipped, card.flip_count);

        let glow = if flipped && flip_count > FREQUENT_FLIPS {
            let token = self.next_seq();
            self.cards[index].glow = Some(token);
            Some(token)
        } else {
            None
        };

        let lo = index.saturating_sub(1);
        let hi = (index + 1).min(self.cards.len() - 1);
        let mut neighbors = Vec::new();
        for neighbor in (lo..=hi).filter(|n| *n != index) {
            let token = self.next_seq();
            self.cards[neighbor].nudge = Some(token);
            neighbors.push((neighbor, token));
        }

        Some(FlipOutcome {
            index,
            flipped,
            flip_count,
            tone: if flipped { FlipTone::Flip } else { FlipTone::FlipBack },
            glow,
            neighbors,
        })
    }

    pub fn clear_glow(&mut self, index: usize, token: u64) {
        if let Some(card) = self.cards.get_mut(index) {
            if card.glow == Some(token) {
                card.glow = None;
            }
        }
    }

    pub fn clear_nudge(&mut self, index: usize, token: u64) {
        if let Some(card) = self.cards.get_mut(index) {
            if card.nudge == Some(token) {
                card.nudge = None;
            }
        }
    }

    pub fn pulse(&mut self, index: usize) -> Option<u64> {
        let token = self.next_seq();
        let card = self.cards.get_mut(index)?;
        card.motion = Some(token);
        Some(token)
    }

    pub fn clear_pulse(&mut self, index: usize, token: u64) {
        if let Some(card) = self.cards.get_mut(index) {
            if card.motion == Some(token) {
                card.motion = None;
            }
        }
    }

    /// Rolls for each in-view card: react above 0.7, then auto-flip an
    /// unflipped card above 0.8.
    pub fn plan_reactions(&self, in_view: &[bool], mut roll: impl FnMut() -> f64) -> Vec<Reaction> {
        let mut reactions = Vec::new();
        for (index, card) in self.cards.iter().enumerate() {
            if !in_view.get(index).copied().unwrap_or(false) || roll() <= REACT_ABOVE {
                continue;
            }
            let auto_flip = roll() > AUTO_FLIP_ABOVE && !card.flipped;
            reactions.push(Reaction { index, auto_flip });
        }
        reactions
    }

    /// Every card, staggered by its position.
    pub fn flip_all_schedule(&self) -> Vec<(usize, u32)> {
        (0..self.cards.len())
            .map(|index| (index, index as u32 * FLIP_ALL_STAGGER_MS))
            .collect()
    }

    /// Only flipped cards, staggered by their position in the deck.
    pub fn reset_all_schedule(&self) -> Vec<(usize, u32)> {
        self.cards
            .iter()
            .enumerate()
            .filter(|(_, card)| card.flipped)
            .map(|(index, _)| (index, index as u32 * RESET_ALL_STAGGER_MS))
            .collect()
    }
}

/// Card for the load-time demo flip.
pub fn pick_index(len: usize, sample: f64) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(((sample * len as f64) as usize).min(len - 1))
}

/// The periodic hint pulses one visible card, sometimes.
pub fn pick_hint(visible: &[usize], mut roll: impl FnMut() -> f64) -> Option<usize> {
    if visible.is_empty() || roll() <= HINT_ABOVE {
        return None;
    }
    pick_index(visible.len(), roll()).map(|slot| visible[slot])
}

/// Pointer travel detector. A move farther than the threshold from the
/// anchor fires and re-anchors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionDetector {
    threshold: f64,
    anchor: Option<(f64, f64)>,
    active: bool,
}

impl MotionDetector {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            anchor: None,
            active: true,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The first move only sets the anchor.
    pub fn on_move(&mut self, x: f64, y: f64) -> bool {
        if !self.active {
            return false;
        }
        let Some((ax, ay)) = self.anchor else {
            self.anchor = Some((x, y));
            return false;
        };
        if (x - ax).hypot(y - ay) > self.threshold {
            self.anchor = Some((x, y));
            return true;
        }
        false
    }

    pub fn pause(&mut self) {
        self.active = false;
    }

    pub fn resume(&mut self) {
        self.active = true;
    }
}

/// Cycling fallback for when flip animations are unwanted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Carousel {
    current: usize,
    len: usize,
}

impl Carousel {
    pub fn new(len: usize) -> Self {
        Self { current: 0, len }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn advance(&mut self, direction: i32) -> usize {
        if self.len == 0 {
            return 0;
        }
        let len = self.len as i64;
        self.current = (self.current as i64 + direction as i64).rem_euclid(len) as usize;
        self.current
    }
}

/// Returns the cached value, creating it on first use. A failed creation is
/// not cached, so the next call tries again.
#[cfg(any(test, target_arch = "wasm32"))]
fn shared_or_init<T: Clone, E>(
    cell: &once_cell::unsync::OnceCell<T>,
    create: impl FnOnce() -> Result<T, E>,
) -> Result<T, E> {
    cell.get_or_try_init(create).cloned()
}

#[cfg(target_arch = "wasm32")]
thread_local! {
    // Shared by every flip.
    static AUDIO: once_cell::unsync::OnceCell<web_sys::AudioContext> =
        once_cell::unsync::OnceCell::new();
}

#[cfg(target_arch = "wasm32")]
fn play_tone(tone: FlipTone) -> Result<(), String> {
    let context = AUDIO
        .with(|cell| shared_or_init(cell, web_sys::AudioContext::new))
        .map_err(|_| "no audio context")?;
    if context.state() == web_sys::AudioContextState::Suspended {
        let _ = context.resume();
    }
    let oscillator = context
        .create_oscillator()
        .map_err(|_| "oscillator unavailable")?;
    let gain = context.create_gain().map_err(|_| "gain unavailable")?;
    oscillator
        .connect_with_audio_node(&gain)
        .map_err(|_| "connect failed")?;
    gain.connect_with_audio_node(&context.destination())
        .map_err(|_| "connect failed")?;

    let now = context.current_time();
    let end = now + FlipTone::DURATION_S;
    let (start_hz, end_hz) = tone.sweep();
    let frequency = oscillator.frequency();
    frequency
        .set_value_at_time(start_hz, now)
        .and_then(|_| frequency.exponential_ramp_to_value_at_time(end_hz, end))
        .map_err(|_| "frequency ramp failed")?;
    let volume = gain.gain();
    volume
        .set_value_at_time(0.1, now)
        .and_then(|_| volume.exponential_ramp_to_value_at_time(0.01, end))
        .map_err(|_| "gain ramp failed")?;
    oscillator
        .start_with_when(now)
        .and_then(|_| oscillator.stop_with_when(end))
        .map_err(|_| "oscillator start failed")?;
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn play_tone(_tone: FlipTone) -> Result<(), String> {
    Err("no audio context".to_string())
}

/// Also runs from timers, so an unmounted deck is skipped rather than written.
fn flip_card(mut deck: Signal<FlipDeck>, index: usize) {
    let Some(outcome) = deck.try_write().ok().and_then(|mut deck| deck.flip(index)) else {
        return;
    };
    tracing::debug!(
        "achievements: card {} flipped ({} times)",
        outcome.index + 1,
        outcome.flip_count
    );
    if let Err(message) = play_tone(outcome.tone) {
        tracing::debug!("achievements: silent flip, {message}");
    }
    if let Some(token) = outcome.glow {
        after_update(GLOW_MS, deck, move |deck| deck.clear_glow(index, token));
    }
    for (neighbor, token) in outcome.neighbors {
        after_update(NUDGE_MS, deck, move |deck| deck.clear_nudge(neighbor, token));
    }
}

#[cfg(target_arch = "wasm32")]
fn pulse_card(mut deck: Signal<FlipDeck>, index: usize) {
    let Some(token) = deck.write().pulse(index) else {
        return;
    };
    after_update(MOTION_PULSE_MS, deck, move |deck| deck.clear_pulse(index, token));
}

fn card_dom_id(index: usize) -> String {
    format!("achievement-card-{index}")
}

#[cfg(target_arch = "wasm32")]
fn cards_in_view(len: usize) -> Vec<bool> {
    let Some(window) = web_sys::window() else {
        return vec![false; len];
    };
    let height = window
        .inner_height()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(0.0);
    let document = window.document();
    (0..len)
        .map(|index| {
            document
                .as_ref()
                .and_then(|document| document.get_element_by_id(&card_dom_id(index)))
                .map(|element| {
                    let rect = element.get_bounding_client_rect();
                    rect.top() < height && rect.bottom() > 0.0
                })
                .unwrap_or(false)
        })
        .collect()
}

#[cfg(target_arch = "wasm32")]
fn prefers_reduced_motion() -> bool {
    web_sys::window()
        .and_then(|window| window.match_media("(prefers-reduced-motion: reduce)").ok().flatten())
        .map(|query| query.matches())
        .unwrap_or(false)
}

#[cfg(not(target_arch = "wasm32"))]
fn prefers_reduced_motion() -> bool {
    false
}

#[component]
pub fn AchievementsSection() -> Element {
    let config = use_context::<RuntimeConfig>();
    let reduced_motion = use_hook(prefers_reduced_motion);
    if reduced_motion {
        return rsx! { AchievementSlider {} };
    }
    rsx! { FlipCards { motion_threshold_px: config.motion_threshold_px } }
}

#[component]
fn FlipCards(motion_threshold_px: f64) -> Element {
    let deck = use_signal(|| FlipDeck::new(ACHIEVEMENTS.len()));
    let detector = use_signal(|| MotionDetector::new(motion_threshold_px));

    #[cfg(target_arch = "wasm32")]
    use_hook(move || {
        let mut detector = detector;
        let on_move = EventListener::document("mousemove", move |event| {
            let Some(mouse) = event.dyn_ref::<web_sys::MouseEvent>() else {
                return;
            };
            if !detector.write().on_move(mouse.client_x() as f64, mouse.client_y() as f64) {
                return;
            }
            let in_view = cards_in_view(deck.peek().len());
            let reactions = deck.peek().plan_reactions(&in_view, roll);
            for reaction in reactions {
                pulse_card(deck, reaction.index);
                if reaction.auto_flip {
                    after(AUTO_FLIP_DELAY_MS, move || flip_card(deck, reaction.index));
                }
            }
        });
        let on_key = EventListener::document("keydown", move |_event| {
            detector.write().pause();
            after_update(KEY_PAUSE_MS, detector, MotionDetector::resume);
        });
        let on_press = EventListener::document("mousedown", move |_event| {
            detector.write().resume();
        });
        std::rc::Rc::new([on_move, on_key, on_press])
    });

    let loaded = use_context::<Emitter<ContentLoaded>>();
    let demo = use_hook({
        let loaded = loaded.clone();
        move || {
            loaded.subscribe(move |_: &ContentLoaded| {
                let Some(index) = pick_index(deck.peek().len(), roll()) else {
                    return;
                };
                after(DEMO_DELAY_MS, move || {
                    tracing::debug!("achievements: demo flip on card {}", index + 1);
                    flip_card(deck, index);
                    after(DEMO_HOLD_MS, move || flip_card(deck, index));
                });
            })
        }
    });
    use_drop(move || {
        loaded.unsubscribe(demo);
    });

    #[cfg(target_arch = "wasm32")]
    use_future(move || async move {
        loop {
            gloo_timers::future::TimeoutFuture::new(HINT_EVERY_MS).await;
            let visible: Vec<usize> = cards_in_view(deck.peek().len())
                .into_iter()
                .enumerate()
                .filter_map(|(index, seen)| seen.then_some(index))
                .collect();
            if let Some(index) = pick_hint(&visible, roll) {
                pulse_card(deck, index);
            }
        }
    });

    let cards = deck.read().clone();
    rsx! {
        div { class: "achievements-controls",
            button {
                r#type: "button",
                class: "btn",
                onclick: move |_| {
                    for (index, delay) in deck.peek().flip_all_schedule() {
                        after(delay, move || flip_card(deck, index));
                    }
                },
                "Flip all"
            }
            button {
                r#type: "button",
                class: "btn",
                onclick: move |_| {
                    for (index, delay) in deck.peek().reset_all_schedule() {
                        after(delay, move || flip_card(deck, index));
                    }
                },
                "Reset"
            }
        }
        div { class: "achievements-grid",
            for (index, achievement) in ACHIEVEMENTS.iter().enumerate() {
                div {
                    key: "{index}",
                    id: card_dom_id(index),
                    class: format!("{} stagger-item", cards.card(index).map(CardState::class).unwrap_or_default()),
                    style: stagger_style(index),
                    tabindex: "0",
                    role: "button",
                    aria_pressed: cards.card(index).map(|card| card.flipped).unwrap_or(false).to_string(),
                    onclick: move |_| flip_card(deck, index),
                    onkeydown: move |event| {
                        if matches!(event.key(), Key::Enter) || event.key() == Key::Character(" ".to_string()) {
                            event.prevent_default();
                            flip_card(deck, index);
                        }
                    },
                    div { class: "achievement-flip-inner",
                        div { class: "achievement-front",
                            span { class: "achievement-emoji", "{achievement.emoji}" }
                            h3 { "{achievement.title}" }
                            p { "{achievement.summary}" }
                            span { class: "flip-indicator", "Click to flip" }
                        }
                        div { class: "achievement-back",
                            h3 { "{achievement.title}" }
                            p { "{achievement.details}" }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn AchievementSlider() -> Element {
    let mut carousel = use_signal(|| Carousel::new(ACHIEVEMENTS.len()));

    #[cfg(target_arch = "wasm32")]
    use_future(move || async move {
        loop {
            gloo_timers::future::TimeoutFuture::new(SLIDE_EVERY_MS).await;
            carousel.write().advance(1);
        }
    });

    let current = carousel.read().current();
    rsx! {
        div { class: "achievements-slider",
            button {
                r#type: "button",
                class: "slider-btn prev",
                aria_label: "Previous achievement",
                onclick: move |_| {
                    carousel.write().advance(-1);
                },
                "‹"
            }
            for (index, achievement) in ACHIEVEMENTS.iter().enumerate() {
                div {
                    key: "{index}",
                    class: if index == current { "achievement-card active" } else { "achievement-card" },
                    span { class: "achievement-emoji", "{achievement.emoji}" }
                    h3 { "{achievement.title}" }
                    p { "{achievement.summary}" }
                }
            }
            button {
                r#type: "button",
                class: "slider-btn next",
                aria_label: "Next achievement",
                onclick: move |_| {
                    carousel.write().advance(1);
                },
                "›"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn audio_context_is_created_once_and_retried_after_failure() {
        let cell = once_cell::unsync::OnceCell::new();
        let attempts = std::cell::Cell::new(0);
        let failing = shared_or_init(&cell, || {
            attempts.set(attempts.get() + 1);
            Err::<u32, &str>("blocked")
        });
        assert_eq!(failing, Err("blocked"));

        for _ in 0..3 {
            let context = shared_or_init(&cell, || {
                attempts.set(attempts.get() + 1);
                Ok::<u32, &str>(7)
            });
            assert_eq!(context, Ok(7));
        }
        assert_eq!(attempts.get(), 2);
    }

    fn rolls(values: &[f64]) -> impl FnMut() -> f64 + '_ {
        let mut iter = values.iter().copied();
        move || iter.next().unwrap_or(0.0)
    }

    #[test]
    fn flip_toggles_and_counts() {
        let mut deck = FlipDeck::new(4);
        let first = deck.flip(1).unwrap();
        assert!(first.flipped);
        assert_eq!(first.tone, FlipTone::Flip);
        assert_eq!(first.tone.sweep(), (800.0, 400.0));
        let second = deck.flip(1).unwrap();
        assert!(!second.flipped);
        assert_eq!(second.flip_count, 2);
        assert_eq!(second.tone.sweep(), (400.0, 800.0));
        assert!(deck.flip(9).is_none());
    }

    #[test]
    fn neighbors_within_one_are_nudged() {
        let mut deck = FlipDeck::new(4);
        let middle = deck.flip(1).unwrap();
        let nudged: Vec<_> = middle.neighbors.iter().map(|(index, _)| *index).collect();
        assert_eq!(nudged, vec![0, 2]);
        let edge = deck.flip(3).unwrap();
        let nudged: Vec<_> = edge.neighbors.iter().map(|(index, _)| *index).collect();
        assert_eq!(nudged, vec![2]);
        assert!(!deck.card(3).unwrap().is_nudged());

        let (index, token) = middle.neighbors[0];
        deck.clear_nudge(index, token);
        assert!(!deck.card(0).unwrap().is_nudged());

        let pulse = deck.pulse(2).unwrap();
        assert!(deck.card(2).unwrap().class().contains("motion-detected"));
        deck.clear_pulse(2, pulse);
        assert!(!deck.card(2).unwrap().has_motion());
        assert_eq!(deck.pulse(7), None);
    }

    #[test]
    fn frequent_flipper_glows_on_the_fifth_flip() {
        let mut deck = FlipDeck::new(1);
        for _ in 0..4 {
            assert_eq!(deck.flip(0).unwrap().glow, None);
        }
        let fifth = deck.flip(0).unwrap();
        let token = fifth.glow.expect("glow on fifth flip");
        assert!(deck.card(0).unwrap().class().contains("frequent-flipper"));

        deck.flip(0);
        let seventh = deck.flip(0).unwrap().glow.unwrap();
        deck.clear_glow(0, token);
        assert!(deck.card(0).unwrap().is_glowing(), "stale timer keeps newer glow");
        deck.clear_glow(0, seventh);
        assert!(!deck.card(0).unwrap().is_glowing());
    }

    #[test]
    fn motion_needs_travel_past_threshold_and_reanchors() {
        let mut detector = MotionDetector::new(50.0);
        assert!(!detector.on_move(0.0, 0.0));
        assert!(!detector.on_move(30.0, 40.0));
        assert!(detector.on_move(40.0, 40.0));
        assert!(!detector.on_move(60.0, 40.0));
        detector.pause();
        assert!(!detector.on_move(500.0, 500.0));
        detector.resume();
        assert!(detector.on_move(500.0, 500.0));
    }

    #[test]
    fn reactions_roll_per_visible_card() {
        let mut deck = FlipDeck::new(3);
        deck.flip(2);
        let in_view = [true, false, true];
        let reactions = deck.plan_reactions(&in_view, rolls(&[0.9, 0.95, 0.8, 0.9]));
        assert_eq!(
            reactions,
            vec![
                Reaction { index: 0, auto_flip: true },
                Reaction { index: 2, auto_flip: false },
            ]
        );
        assert!(deck.plan_reactions(&in_view, rolls(&[0.7, 0.1])).is_empty());
    }

    #[test]
    fn stagger_schedules() {
        let mut deck = FlipDeck::new(4);
        assert_eq!(deck.flip_all_schedule(), vec![(0, 0), (1, 200), (2, 400), (3, 600)]);
        deck.flip(1);
        deck.flip(3);
        assert_eq!(deck.reset_all_schedule(), vec![(1, 100), (3, 300)]);
    }

    #[test]
    fn hints_and_demo_picks() {
        assert_eq!(pick_index(4, 0.99), Some(3));
        assert_eq!(pick_index(0, 0.5), None);
        assert_eq!(pick_hint(&[1, 3], rolls(&[0.9, 0.6])), Some(3));
        assert_eq!(pick_hint(&[1, 3], rolls(&[0.5])), None);
        assert_eq!(pick_hint(&[], rolls(&[0.9])), None);
    }

    #[test]
    fn carousel_wraps_both_ways() {
        let mut carousel = Carousel::new(4);
        assert_eq!(carousel.advance(-1), 3);
        assert_eq!(carousel.advance(1), 0);
        assert_eq!(carousel.advance(1), 1);
        assert_eq!(Carousel::new(0).advance(1), 0);
    }

    #[test]
    fn tone_is_silent_without_audio() {
        assert!(play_tone(FlipTone::Flip).is_err());
    }
}
