use std::cell::RefCell;
use std::rc::Rc;

use dioxus::prelude::*;
use dioxus_router::{Link, Routable, Router};

use crate::achievements::AchievementsSection;
use crate::config::{use_runtime_config, RuntimeConfig};
use crate::contact::ContactSection;
use crate::events::{ContentLoaded, Emitter};
use crate::loading::{reveal_delay_ms, LoadingScreen};
use crate::navigation::{FloatingIcons, NavBar, SECTIONS};
use crate::projects::ProjectGrid;
use crate::reveal::{use_in_view, SectionsRevealed, TypewriterText};
use crate::skills::SkillsGrid;
use crate::theme::dom::{
    toggle_theme, watch_platform_scheme, DocumentSurface, MediaQueryScheme, SharedTheme,
    TOGGLE_ICON_ID,
};
use crate::theme::effects::ThemeEffectsLayer;
use crate::theme::{BrowserStorage, PreferenceSlot, ThemeChanged, ThemeController};

const MAIN_CSS: Asset = asset!("/assets/main.css");

const HERO_ICONS: [&str; 5] = ["⚛️", "🐍", "🦀", "🎮", "🌱"];

#[component]
pub fn App() -> Element {
    let config_resource = use_runtime_config();
    let Some(config) = config_resource() else {
        return rsx! {
            document::Title { "Portfolio" }
            div { class: "page loading",
                h1 { "Loading config..." }
            }
        };
    };

    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }
        PortfolioShell { config }
    }
}

/// Owns the page-wide services: config, the theme controller and the
/// load-complete emitter. Everything below reads them from context.
#[component]
fn PortfolioShell(config: RuntimeConfig) -> Element {
    let storage_key = config.theme_storage_key.clone();
    use_context_provider(|| config);
    let loaded = use_context_provider(Emitter::<ContentLoaded>::new);
    let shared: SharedTheme = use_context_provider(|| {
        let preference = PreferenceSlot::new(storage_key, Box::new(BrowserStorage));
        Rc::new(RefCell::new(ThemeController::initialize(
            preference,
            &MediaQueryScheme,
            DocumentSurface::attach(),
            Emitter::<ThemeChanged>::new(),
        )))
    });

    let _platform_watch = use_hook({
        let shared = shared.clone();
        move || Rc::new(watch_platform_scheme(&shared))
    });
    use_drop({
        let shared = shared.clone();
        move || {
            loaded.clear();
            if let Ok(mut controller) = shared.try_borrow_mut() {
                controller.teardown();
            }
        }
    });

    let celebrating = use_signal(|| false);
    let revealed = use_signal(|| false);
    use_context_provider(|| SectionsRevealed(revealed));

    rsx! {
        LoadingScreen { revealed }
        ThemeEffectsLayer { celebrating: celebrating() }
        NavBar { celebrating }
        ThemeToggle {}
        if celebrating() {
            div { class: "easter-egg", role: "status", "🎉 You found the secret! 🎉" }
        }
        Router::<Route> {}
    }
}

#[component]
fn ThemeToggle() -> Element {
    let shared = use_context::<SharedTheme>();
    // The icon text is owned by the theme surface, which writes it by id.
    use_effect({
        let shared = shared.clone();
        move || {
            if let Ok(mut controller) = shared.try_borrow_mut() {
                controller.refresh_indicators();
            }
        }
    });
    rsx! {
        button {
            id: "theme-toggle",
            r#type: "button",
            class: "theme-toggle",
            aria_label: "Toggle color theme",
            onclick: move |_| toggle_theme(&shared),
            span { id: TOGGLE_ICON_ID }
        }
    }
}

#[derive(Clone, PartialEq, Routable)]
pub enum Route {
    #[route("/")]
    Home {},
    #[route("/:..route")]
    NotFound { route: Vec<String> },
}

#[component]
fn Home() -> Element {
    let SectionsRevealed(revealed) = use_context::<SectionsRevealed>();
    rsx! {
        document::Title { "Portfolio" }
        document::Meta { name: "description", content: "Projects, achievements and a way to get in touch." }
        main { class: "sections",
            for (index, (section, label)) in SECTIONS.into_iter().enumerate() {
                PageSection { key: "{section}", index, section, label, revealed: revealed() }
            }
        }
    }
}

#[component]
fn PageSection(index: usize, section: &'static str, label: &'static str, revealed: bool) -> Element {
    let in_view = use_in_view(section.to_string(), 0.1, "0px 0px -100px 0px");
    let mut class = String::from("section");
    if revealed {
        class.push_str(" revealed");
    }
    if in_view() {
        class.push_str(" animate-in");
    }
    let delay = format!("transition-delay: {}ms;", reveal_delay_ms(index));
    rsx! {
        section { id: "{section}", class: "{class}", style: "{delay}",
            {match section {
                "home" => rsx! {
                    div { class: "hero",
                        h1 { class: "glitch-text", "data-text": "Hi, I build things", "Hi, I build things" }
                        TypewriterText { text: "Agri-tech, machine learning and game engines." }
                        a { class: "btn", href: "#projects", "See my work" }
                        FloatingIcons { icons: HERO_ICONS.to_vec() }
                    }
                },
                "about" => rsx! {
                    h2 { class: "section-title", "{label}" }
                    p { "I like hard problems that end up in someone's hands: a farmer's phone, a player's screen, a researcher's notebook." }
                },
                "skills" => rsx! {
                    h2 { class: "section-title", "{label}" }
                    SkillsGrid {}
                },
                "projects" => rsx! {
                    h2 { class: "section-title", "{label}" }
                    ProjectGrid {}
                },
                "achievements" => rsx! {
                    h2 { class: "section-title", "{label}" }
                    AchievementsSection {}
                },
                "contact" => rsx! {
                    h2 { class: "section-title", "{label}" }
                    ContactSection {}
                },
                _ => rsx! {},
            }}
        }
    }
}

#[component]
fn NotFound(route: Vec<String>) -> Element {
    let path = route.join("/");
    rsx! {
        document::Title { "Not Found | Portfolio" }
        div { class: "page not-found",
            h1 { class: "glitch-text", "data-text": "404", "404" }
            p { "Nothing lives at /{path}." }
            Link { to: Route::Home {}, class: "btn", "Back home" }
        }
    }
}
