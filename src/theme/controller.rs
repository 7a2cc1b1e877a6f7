use serde::Serialize;

use super::storage::PreferenceSlot;
use super::tokens::{ThemeName, ThemeTokens};
use super::ThemeError;
use crate::events::Emitter;

/// Opacity the overlay is faded to before the tokens are swapped underneath.
pub const OVERLAY_PEAK_OPACITY: f32 = 0.5;
/// Delay between the overlay fade-in and the token swap.
pub const SWAP_DELAY_MS: u32 = 150;
/// Time the overlay needs to fade out before it can be removed.
pub const FADE_OUT_MS: u32 = 300;

/// Broadcast after a theme's tokens have been applied to the page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ThemeChanged {
    pub theme: ThemeName,
    pub tokens: ThemeTokens,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OverlayId(pub u32);

/// Where the active theme becomes visible: CSS custom properties, the body
/// marker class, the toggle icon, the browser-chrome hint and the transition
/// overlay.
pub trait ThemeSurface {
    fn apply_tokens(&mut self, theme: ThemeName, tokens: &ThemeTokens);
    fn set_toggle_icon(&mut self, icon: &str);
    fn set_chrome_color(&mut self, color: &str);
    fn show_overlay(&mut self, background: &str) -> OverlayId;
    fn set_overlay_opacity(&mut self, overlay: OverlayId, opacity: f32);
    fn remove_overlay(&mut self, overlay: OverlayId);
}

/// Platform light/dark signal. `None` when the platform cannot tell.
pub trait ColorSchemeSource {
    fn prefers_dark(&self) -> Option<bool>;
}

impl ColorSchemeSource for Option<bool> {
    fn prefers_dark(&self) -> Option<bool> {
        *self
    }
}

/// An animated theme switch that has been committed but whose tokens are not
/// yet applied. Drive it with [`ThemeController::fade_in`],
/// [`ThemeController::finish_transition`] and
/// [`ThemeController::discard_overlay`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CrossFade {
    pub overlay: OverlayId,
    pub theme: ThemeName,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Lifecycle {
    Active,
    TornDown,
}

pub struct ThemeController<S: ThemeSurface> {
    current: ThemeName,
    preference: PreferenceSlot,
    surface: S,
    changes: Emitter<ThemeChanged>,
    overlays: Vec<OverlayId>,
    lifecycle: Lifecycle,
}

/// Persisted preference wins; otherwise the platform signal; otherwise dark.
/// Unrecognized persisted values are ignored.
pub fn resolve_initial_theme(persisted: Option<&str>, prefers_dark: Option<bool>) -> ThemeName {
    if let Some(theme) = persisted.and_then(|value| value.parse::<ThemeName>().ok()) {
        return theme;
    }
    prefers_dark
        .map(ThemeName::from_prefers_dark)
        .unwrap_or(ThemeName::Dark)
}

impl<S: ThemeSurface> ThemeController<S> {
    /// Resolves the starting theme and applies it without animation. Nothing
    /// is persisted here, so a platform-derived theme keeps following the
    /// platform until the user picks one.
    pub fn initialize(
        mut preference: PreferenceSlot,
        scheme: &dyn ColorSchemeSource,
        surface: S,
        changes: Emitter<ThemeChanged>,
    ) -> Self {
        let persisted = preference.read();
        let prefers_dark = scheme.prefers_dark();
        if prefers_dark.is_none() {
            tracing::debug!("theme: platform color scheme unavailable");
        }
        let current = resolve_initial_theme(persisted.as_deref(), prefers_dark);
        tracing::info!(
            "theme: initialize {current} (persisted: {})",
            persisted.as_deref().unwrap_or("none")
        );

        let mut controller = Self {
            current,
            preference,
            surface,
            changes,
            overlays: Vec::new(),
            lifecycle: Lifecycle::Active,
        };
        controller.show_indicators(current);
        controller.apply_and_announce(current);
        controller
    }

    pub fn current_theme(&self) -> ThemeName {
        self.current
    }

    pub fn theme_colors(&self) -> &'static ThemeTokens {
        self.current.tokens()
    }

    pub fn changes(&self) -> &Emitter<ThemeChanged> {
        &self.changes
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn is_active(&self) -> bool {
        self.lifecycle == Lifecycle::Active
    }

    pub fn has_explicit_preference(&mut self) -> bool {
        self.preference.is_set()
    }

    pub fn live_overlays(&self) -> usize {
        self.overlays.len()
    }

    /// Re-sends the toggle icon and chrome color, e.g. once the toggle button
    /// has mounted after initialization.
    pub fn refresh_indicators(&mut self) {
        if self.is_active() {
            self.show_indicators(self.current);
        }
    }

    /// Switches to `name`. Unknown names are rejected and leave everything
    /// untouched. With `animate`, the returned [`CrossFade`] must be driven to
    /// completion for the tokens to land.
    pub fn set_theme(&mut self, name: &str, animate: bool) -> Result<Option<CrossFade>, ThemeError> {
        let theme = name.parse::<ThemeName>()?;
        self.select(theme, animate)
    }

    pub fn select(&mut self, theme: ThemeName, animate: bool) -> Result<Option<CrossFade>, ThemeError> {
        if !self.is_active() {
            return Err(ThemeError::TornDown);
        }
        self.current = theme;
        self.preference.write(theme.as_str());
        self.show_indicators(theme);

        if !animate {
            self.apply_and_announce(theme);
            return Ok(None);
        }

        let overlay = self.surface.show_overlay(theme.tokens().background);
        self.overlays.push(overlay);
        tracing::debug!("theme: cross-fade to {theme} started");
        Ok(Some(CrossFade { overlay, theme }))
    }

    pub fn toggle(&mut self) -> Result<CrossFade, ThemeError> {
        let next = self.current.toggled();
        self.select(next, true)?.ok_or(ThemeError::TornDown)
    }

    pub fn fade_in(&mut self, fade: &CrossFade) {
        if self.owns(fade) {
            self.surface
                .set_overlay_opacity(fade.overlay, OVERLAY_PEAK_OPACITY);
        }
    }

    /// Applies the active theme's tokens underneath the overlay, announces
    /// them, then starts fading the overlay out. A later switch made while
    /// this fade was pending wins over `fade.theme`.
    pub fn finish_transition(&mut self, fade: &CrossFade) {
        if !self.owns(fade) {
            return;
        }
        self.apply_and_announce(self.current);
        self.surface.set_overlay_opacity(fade.overlay, 0.0);
    }

    pub fn discard_overlay(&mut self, fade: &CrossFade) {
        if !self.owns(fade) {
            return;
        }
        self.overlays.retain(|overlay| *overlay != fade.overlay);
        self.surface.remove_overlay(fade.overlay);
        tracing::debug!("theme: cross-fade to {} finished", fade.theme);
    }

    /// Follows a live platform change only while the user has never chosen a
    /// theme. Returns whether the page changed.
    pub fn on_platform_scheme_change(&mut self, prefers_dark: bool) -> bool {
        if !self.is_active() || self.preference.is_set() {
            return false;
        }
        let theme = ThemeName::from_prefers_dark(prefers_dark);
        tracing::info!("theme: following platform scheme {theme}");
        self.current = theme;
        self.show_indicators(theme);
        self.apply_and_announce(theme);
        true
    }

    /// Removes in-flight overlays and drops every subscriber. Later calls are
    /// rejected and pending transition steps do nothing.
    pub fn teardown(&mut self) {
        if !self.is_active() {
            return;
        }
        for overlay in self.overlays.drain(..) {
            self.surface.remove_overlay(overlay);
        }
        self.changes.clear();
        self.lifecycle = Lifecycle::TornDown;
        tracing::debug!("theme: torn down");
    }

    /// Gives back the preference slot so a later controller can start from
    /// the same storage.
    #[cfg(test)]
    pub fn into_preference(self) -> PreferenceSlot {
        self.preference
    }

    fn owns(&self, fade: &CrossFade) -> bool {
        self.is_active() && self.overlays.contains(&fade.overlay)
    }

    fn show_indicators(&mut self, theme: ThemeName) {
        let tokens = theme.tokens();
        self.surface.set_toggle_icon(tokens.icon);
        self.surface.set_chrome_color(tokens.primary);
    }

    fn apply_and_announce(&mut self, theme: ThemeName) {
        let tokens = theme.tokens();
        self.surface.apply_tokens(theme, tokens);
        self.changes.emit(&ThemeChanged {
            theme,
            tokens: tokens.clone(),
        });
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    pub enum SurfaceOp {
        Apply(ThemeName, ThemeTokens),
        Icon(String),
        Chrome(String),
        ShowOverlay(OverlayId, String),
        Opacity(OverlayId, f32),
        RemoveOverlay(OverlayId),
    }

    #[derive(Default)]
    pub struct RecordingSurface {
        pub ops: Vec<SurfaceOp>,
        next_overlay: u32,
    }

    impl RecordingSurface {
        pub fn applied(&self) -> Vec<(ThemeName, ThemeTokens)> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    SurfaceOp::Apply(theme, tokens) => Some((*theme, tokens.clone())),
                    _ => None,
                })
                .collect()
        }

        pub fn last_applied(&self) -> Option<ThemeName> {
            self.applied().last().map(|(theme, _)| *theme)
        }
    }

    impl ThemeSurface for RecordingSurface {
        fn apply_tokens(&mut self, theme: ThemeName, tokens: &ThemeTokens) {
            self.ops.push(SurfaceOp::Apply(theme, tokens.clone()));
        }

        fn set_toggle_icon(&mut self, icon: &str) {
            self.ops.push(SurfaceOp::Icon(icon.to_string()));
        }

        fn set_chrome_color(&mut self, color: &str) {
            self.ops.push(SurfaceOp::Chrome(color.to_string()));
        }

        fn show_overlay(&mut self, background: &str) -> OverlayId {
            let id = OverlayId(self.next_overlay);
            self.next_overlay += 1;
            self.ops.push(SurfaceOp::ShowOverlay(id, background.to_string()));
            id
        }

        fn set_overlay_opacity(&mut self, overlay: OverlayId, opacity: f32) {
            self.ops.push(SurfaceOp::Opacity(overlay, opacity));
        }

        fn remove_overlay(&mut self, overlay: OverlayId) {
            self.ops.push(SurfaceOp::RemoveOverlay(overlay));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::test_support::{RecordingSurface, SurfaceOp};
    use super::*;
    use crate::theme::storage::test_support::BrokenStore;
    use crate::theme::storage::MemoryStore;
    use pretty_assertions::assert_eq;

    const KEY: &str = "portfolio-theme";

    fn slot(persisted: Option<&str>) -> PreferenceSlot {
        let store = match persisted {
            Some(value) => MemoryStore::with_value(KEY, value),
            None => MemoryStore::default(),
        };
        PreferenceSlot::new(KEY, Box::new(store))
    }

    fn controller(
        persisted: Option<&str>,
        prefers_dark: Option<bool>,
    ) -> ThemeController<RecordingSurface> {
        ThemeController::initialize(
            slot(persisted),
            &prefers_dark,
            RecordingSurface::default(),
            Emitter::new(),
        )
    }

    fn record_changes(emitter: &Emitter<ThemeChanged>) -> Rc<RefCell<Vec<ThemeChanged>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        emitter.subscribe(move |change: &ThemeChanged| sink.borrow_mut().push(change.clone()));
        seen
    }

    #[test]
    fn platform_dark_without_preference_starts_dark() {
        let controller = controller(None, Some(true));
        assert_eq!(controller.current_theme(), ThemeName::Dark);
        assert_eq!(controller.surface().last_applied(), Some(ThemeName::Dark));
    }

    #[test]
    fn platform_light_without_preference_starts_light() {
        let controller = controller(None, Some(false));
        assert_eq!(controller.current_theme(), ThemeName::Light);
    }

    #[test]
    fn persisted_preference_beats_platform() {
        let controller = controller(Some("light"), Some(true));
        assert_eq!(controller.current_theme(), ThemeName::Light);
    }

    #[test]
    fn missing_platform_signal_defaults_to_dark() {
        let controller = controller(None, None);
        assert_eq!(controller.current_theme(), ThemeName::Dark);
    }

    #[test]
    fn garbage_persisted_value_falls_back_to_platform() {
        let controller = controller(Some("sepia"), Some(false));
        assert_eq!(controller.current_theme(), ThemeName::Light);
    }

    #[test]
    fn initialize_applies_without_overlay_or_persisting() {
        let mut controller = controller(None, Some(false));
        assert!(!controller
            .surface()
            .ops
            .iter()
            .any(|op| matches!(op, SurfaceOp::ShowOverlay(..))));
        assert!(!controller.has_explicit_preference());
        assert!(controller.surface().ops.contains(&SurfaceOp::Icon("☀️".to_string())));
        assert!(controller
            .surface()
            .ops
            .contains(&SurfaceOp::Chrome("#2d5a87".to_string())));
    }

    #[test]
    fn unknown_names_change_nothing() {
        let mut controller = controller(None, Some(true));
        let seen = record_changes(controller.changes());
        let ops_before = controller.surface().ops.len();

        for name in ["", "Light", "solarized", "dark ", "DARK"] {
            let result = controller.set_theme(name, false);
            assert_eq!(result, Err(ThemeError::UnknownTheme(name.to_string())));
            let result = controller.set_theme(name, true);
            assert!(result.is_err());
        }

        assert_eq!(controller.current_theme(), ThemeName::Dark);
        assert_eq!(controller.surface().ops.len(), ops_before);
        assert!(seen.borrow().is_empty());
        assert!(!controller.has_explicit_preference());
    }

    #[test]
    fn set_theme_persists_and_fresh_start_reproduces_it() {
        let mut controller = controller(None, Some(true));
        controller.set_theme("light", false).unwrap();
        assert_eq!(controller.current_theme(), ThemeName::Light);

        let mut preference = controller.into_preference();
        assert_eq!(preference.read().as_deref(), Some("light"));

        let restarted = ThemeController::initialize(
            preference,
            &None::<bool>,
            RecordingSurface::default(),
            Emitter::new(),
        );
        assert_eq!(restarted.current_theme(), ThemeName::Light);
    }

    #[test]
    fn every_event_matches_the_tokens_applied() {
        let emitter = Emitter::new();
        let seen = record_changes(&emitter);
        let mut controller = ThemeController::initialize(
            slot(None),
            &Some(true),
            RecordingSurface::default(),
            emitter,
        );

        controller.set_theme("light", false).unwrap();
        let fade = controller.toggle().unwrap();
        controller.fade_in(&fade);
        controller.finish_transition(&fade);
        controller.discard_overlay(&fade);

        let applied = controller.surface().applied();
        let emitted: Vec<_> = seen
            .borrow()
            .iter()
            .map(|change| (change.theme, change.tokens.clone()))
            .collect();
        assert_eq!(emitted, applied);
        assert_eq!(emitted.len(), 3);
        for (theme, tokens) in emitted {
            assert_eq!(&tokens, theme.tokens());
        }
    }

    #[test]
    fn double_toggle_round_trips() {
        for start in [Some(true), Some(false)] {
            let mut controller = controller(None, start);
            let initial = controller.current_theme();
            for _ in 0..2 {
                let fade = controller.toggle().unwrap();
                controller.fade_in(&fade);
                controller.finish_transition(&fade);
                controller.discard_overlay(&fade);
            }
            assert_eq!(controller.current_theme(), initial);
            assert_eq!(controller.surface().last_applied(), Some(initial));
            assert_eq!(controller.live_overlays(), 0);
        }
    }

    #[test]
    fn cross_fade_runs_in_stages() {
        let mut controller = controller(None, Some(true));
        controller.set_theme("dark", false).unwrap();
        let start = controller.surface().ops.len();

        let fade = controller.toggle().unwrap();
        assert_eq!(fade.theme, ThemeName::Light);
        assert_eq!(controller.current_theme(), ThemeName::Light);
        assert_eq!(controller.surface().last_applied(), Some(ThemeName::Dark));

        controller.fade_in(&fade);
        controller.finish_transition(&fade);
        controller.discard_overlay(&fade);

        let overlay = fade.overlay;
        assert_eq!(
            controller.surface().ops[start..].to_vec(),
            vec![
                SurfaceOp::Icon("☀️".to_string()),
                SurfaceOp::Chrome("#2d5a87".to_string()),
                SurfaceOp::ShowOverlay(overlay, ThemeName::Light.tokens().background.to_string()),
                SurfaceOp::Opacity(overlay, OVERLAY_PEAK_OPACITY),
                SurfaceOp::Apply(ThemeName::Light, ThemeName::Light.tokens().clone()),
                SurfaceOp::Opacity(overlay, 0.0),
                SurfaceOp::RemoveOverlay(overlay),
            ]
        );
    }

    #[test]
    fn event_is_not_emitted_until_tokens_land() {
        let mut controller = controller(None, Some(true));
        let seen = record_changes(controller.changes());

        let fade = controller.toggle().unwrap();
        controller.fade_in(&fade);
        assert!(seen.borrow().is_empty());

        controller.finish_transition(&fade);
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(seen.borrow()[0].theme, ThemeName::Light);
    }

    #[test]
    fn rapid_toggles_layer_overlays_and_last_one_wins() {
        let mut controller = controller(None, Some(true));
        let seen = record_changes(controller.changes());

        let first = controller.toggle().unwrap();
        let second = controller.toggle().unwrap();
        assert_ne!(first.overlay, second.overlay);
        assert_eq!(controller.live_overlays(), 2);
        assert_eq!(controller.current_theme(), ThemeName::Dark);

        controller.fade_in(&first);
        controller.fade_in(&second);
        controller.finish_transition(&first);
        controller.finish_transition(&second);
        controller.discard_overlay(&first);
        controller.discard_overlay(&second);

        let themes: Vec<_> = seen.borrow().iter().map(|change| change.theme).collect();
        assert_eq!(themes, vec![ThemeName::Dark, ThemeName::Dark]);
        assert_eq!(controller.surface().last_applied(), Some(ThemeName::Dark));
        assert_eq!(controller.live_overlays(), 0);
    }

    #[test]
    fn pending_fade_lands_the_theme_chosen_after_it() {
        let mut controller = controller(None, Some(true));
        let seen = record_changes(controller.changes());

        let fade = controller.toggle().unwrap();
        controller.set_theme("dark", false).unwrap();
        controller.fade_in(&fade);
        controller.finish_transition(&fade);
        controller.discard_overlay(&fade);

        assert_eq!(controller.current_theme(), ThemeName::Dark);
        assert_eq!(controller.surface().last_applied(), Some(ThemeName::Dark));
        let last = seen.borrow().last().cloned().map(|change| change.theme);
        assert_eq!(last, Some(ThemeName::Dark));
        assert!(seen.borrow().iter().all(|change| change.theme == ThemeName::Dark));
    }

    #[test]
    fn platform_change_followed_only_without_preference() {
        let mut controller = controller(None, Some(true));
        assert!(controller.on_platform_scheme_change(false));
        assert_eq!(controller.current_theme(), ThemeName::Light);
        assert!(controller.on_platform_scheme_change(true));
        assert_eq!(controller.current_theme(), ThemeName::Dark);

        controller.set_theme("light", false).unwrap();
        assert!(!controller.on_platform_scheme_change(true));
        assert_eq!(controller.current_theme(), ThemeName::Light);
    }

    #[test]
    fn platform_change_ignored_when_preference_was_persisted_earlier() {
        let mut controller = controller(Some("dark"), Some(true));
        assert!(!controller.on_platform_scheme_change(false));
        assert_eq!(controller.current_theme(), ThemeName::Dark);
    }

    #[test]
    fn broken_storage_keeps_theme_for_the_session() {
        let mut controller = ThemeController::initialize(
            PreferenceSlot::new(KEY, Box::new(BrokenStore)),
            &Some(true),
            RecordingSurface::default(),
            Emitter::new(),
        );
        controller.set_theme("light", false).unwrap();
        assert_eq!(controller.current_theme(), ThemeName::Light);
        assert!(controller.has_explicit_preference());
        assert!(!controller.on_platform_scheme_change(true));
    }

    #[test]
    fn teardown_removes_overlays_and_rejects_later_calls() {
        let mut controller = controller(None, Some(true));
        let seen = record_changes(controller.changes());
        let fade = controller.toggle().unwrap();

        controller.teardown();
        assert!(controller
            .surface()
            .ops
            .contains(&SurfaceOp::RemoveOverlay(fade.overlay)));
        assert!(controller.changes().is_empty());

        let ops = controller.surface().ops.len();
        controller.finish_transition(&fade);
        controller.discard_overlay(&fade);
        assert_eq!(controller.surface().ops.len(), ops);
        assert!(seen.borrow().is_empty());
        assert_eq!(controller.set_theme("light", false), Err(ThemeError::TornDown));
        assert!(!controller.on_platform_scheme_change(false));
    }

    #[test]
    fn refresh_indicators_resends_icon_until_torn_down() {
        let mut controller = controller(None, Some(true));
        let before = controller.surface().ops.len();
        controller.refresh_indicators();
        assert_eq!(
            controller.surface().ops[before..].to_vec(),
            vec![
                SurfaceOp::Icon("🌙".to_string()),
                SurfaceOp::Chrome(ThemeName::Dark.tokens().primary.to_string()),
            ]
        );
        controller.teardown();
        let after = controller.surface().ops.len();
        controller.refresh_indicators();
        assert_eq!(controller.surface().ops.len(), after);
    }
}
