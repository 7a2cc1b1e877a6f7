use dioxus::prelude::*;

use crate::reveal::stagger_style;

#[cfg(target_arch = "wasm32")]
use crate::listeners::{set_body_scroll_locked, EventListener};
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Project {
    pub id: &'static str,
    pub title: &'static str,
    pub tags: &'static [&'static str],
    pub description: &'static str,
    pub features: &'static [&'static str],
    pub technologies: &'static [&'static str],
    pub github_url: &'static str,
    pub demo_url: &'static str,
}

pub static PROJECTS: [Project; 3] = [
    Project {
        id: "speed-racer",
        title: "AI-Driven Crop Detection System",
        tags: &["Python", "OpenCV", "TensorFlow", "AI/ML"],
        description: "An innovative agricultural technology solution that leverages computer vision and machine learning to help farmers monitor crop health in real-time. The system can detect diseases, nutrient deficiencies, and pest infestations early, enabling proactive farming decisions.",
        features: &[
            "Real-time crop health analysis using computer vision",
            "Disease detection with 94% accuracy rate",
            "Automated pest identification and alert system",
            "Weather integration for predictive analytics",
            "Mobile app for field data collection",
            "Detailed reporting and analytics dashboard",
            "Multi-crop support (wheat, rice, corn, vegetables)",
            "Cloud-based processing for scalability",
        ],
        technologies: &["Python", "TensorFlow", "OpenCV", "Flask", "PostgreSQL", "AWS", "React Native", "Docker"],
        github_url: "#",
        demo_url: "#",
    },
    Project {
        id: "farmer-support",
        title: "Farmer Query Support & Advisory System",
        tags: &["Python", "NLP", "Flask", "MySQL"],
        description: "An intelligent advisory system that provides personalized farming guidance to farmers through natural language processing. The system answers farming queries, provides weather-based recommendations, and offers expert advice tailored to specific crops and regions.",
        features: &[
            "Natural language query processing",
            "Personalized farming recommendations",
            "Weather-based advisory alerts",
            "Multilingual support (Hindi, English)",
            "Expert consultation scheduling",
            "Market price integration",
            "Crop calendar and planning tools",
            "SMS and WhatsApp integration",
        ],
        technologies: &["Python", "NLTK", "Spacy", "Flask", "MySQL", "Redis", "Twilio API", "Bootstrap"],
        github_url: "#",
        demo_url: "#",
    },
    Project {
        id: "game-engine",
        title: "Custom 2D Game Engine",
        tags: &["C++", "OpenGL", "Physics", "Engine"],
        description: "A lightweight, high-performance 2D game engine built from scratch in C++. Features include advanced physics simulation, efficient rendering pipeline, audio system, and comprehensive developer tools for rapid game development.",
        features: &[
            "Custom physics engine with collision detection",
            "OpenGL-based rendering system",
            "Entity-Component-System architecture",
            "Audio system with spatial sound",
            "Built-in scripting support (Lua)",
            "Level editor with visual tools",
            "Cross-platform compatibility",
            "Performance profiling tools",
        ],
        technologies: &["C++", "OpenGL", "GLFW", "OpenAL", "Lua", "CMake", "Box2D", "ImGui"],
        github_url: "#",
        demo_url: "#",
    },
];

pub fn find_project(id: &str) -> Option<&'static Project> {
    PROJECTS.iter().find(|project| project.id == id)
}

/// Which project, if any, the detail dialog is showing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ModalState {
    open: Option<&'static Project>,
}

impl ModalState {
    pub fn current(&self) -> Option<&'static Project> {
        self.open
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Unknown ids leave the dialog as it was.
    pub fn open(&mut self, id: &str) -> bool {
        match find_project(id) {
            Some(project) => {
                self.open = Some(project);
                true
            }
            None => {
                tracing::debug!("projects: no project named {id}");
                false
            }
        }
    }

    pub fn close(&mut self) -> bool {
        self.open.take().is_some()
    }

    /// Escape closes the dialog only while it is showing.
    pub fn on_key(&mut self, key: &str) -> bool {
        key == "Escape" && self.close()
    }
}

/// `(rotate_x, rotate_y)` in degrees for a pointer at `(x, y)` inside a card
/// of `width` by `height`.
pub fn tilt(x: f64, y: f64, width: f64, height: f64) -> (f64, f64) {
    ((y - height / 2.0) / 10.0, (width / 2.0 - x) / 10.0)
}

/// Viewport box of a card, as reported by `getBoundingClientRect`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Tilt for a pointer at viewport coordinates. Measured against the card box
/// so that hovering a child element gives the same result.
pub fn tilt_at(client_x: f64, client_y: f64, card: CardBox) -> (f64, f64) {
    tilt(client_x - card.left, client_y - card.top, card.width, card.height)
}

pub fn tilt_transform(tilt: Option<(f64, f64)>) -> String {
    match tilt {
        Some((rotate_x, rotate_y)) => format!(
            "perspective(1000px) rotateX({rotate_x:.2}deg) rotateY({rotate_y:.2}deg) translateZ(20px)"
        ),
        None => "perspective(1000px) rotateX(0deg) rotateY(0deg) translateZ(0px)".to_string(),
    }
}

#[component]
pub fn ProjectGrid() -> Element {
    let mut modal = use_signal(ModalState::default);

    #[cfg(target_arch = "wasm32")]
    {
        let _escape = use_hook(move || {
            std::rc::Rc::new(EventListener::document("keydown", move |event| {
                let Some(key_event) = event.dyn_ref::<web_sys::KeyboardEvent>() else {
                    return;
                };
                if !modal.peek().is_open() {
                    return;
                }
                if modal.write().on_key(&key_event.key()) {
                    set_body_scroll_locked(false);
                }
            }))
        });
        use_drop(|| set_body_scroll_locked(false));
    }

    rsx! {
        div { class: "projects-grid",
            for (index, project) in PROJECTS.iter().enumerate() {
                ProjectCard {
                    key: "{project.id}",
                    project: *project,
                    index,
                    on_open: move |id: &'static str| {
                        if modal.write().open(id) {
                            #[cfg(target_arch = "wasm32")]
                            set_body_scroll_locked(true);
                        }
                    },
                }
            }
        }
        ProjectModal { modal }
    }
}

#[component]
fn ProjectCard(project: Project, index: usize, on_open: EventHandler<&'static str>) -> Element {
    let mut tilted = use_signal(|| None::<(f64, f64)>);
    let mut shine = use_signal(|| false);
    let transform = tilt_transform(tilted());
    let shine_class = if shine() { "card-shine shine-active" } else { "card-shine" };
    let card_id = format!("project-card-{}", project.id);
    let entrance = stagger_style(index);

    rsx! {
        div {
            id: "{card_id}",
            class: "project-card stagger-item",
            "data-project": project.id,
            style: "transform: {transform}; {entrance}",
            onmouseenter: move |_| shine.set(true),
            onmousemove: move |event| {
                let pointer = event.client_coordinates();
                #[cfg(target_arch = "wasm32")]
                {
                    let Some(card) = web_sys::window()
                        .and_then(|window| window.document())
                        .and_then(|document| document.get_element_by_id(&format!("project-card-{}", project.id)))
                    else {
                        return;
                    };
                    let rect = card.get_bounding_client_rect();
                    let card = CardBox {
                        left: rect.left(),
                        top: rect.top(),
                        width: rect.width(),
                        height: rect.height(),
                    };
                    tilted.set(Some(tilt_at(pointer.x, pointer.y, card)));
                }
                #[cfg(not(target_arch = "wasm32"))]
                let _ = pointer;
            },
            onmouseleave: move |_| {
                tilted.set(None);
                shine.set(false);
            },
            div { class: "{shine_class}" }
            div { class: "project-content",
                h3 { "{project.title}" }
                div { class: "project-tags",
                    for tag in project.tags.iter() {
                        span { key: "{tag}", class: "tag", "{tag}" }
                    }
                }
            }
            div { class: "project-overlay",
                button {
                    r#type: "button",
                    class: "view-details-btn",
                    onclick: move |event| {
                        event.prevent_default();
                        on_open.call(project.id);
                    },
                    "View Details"
                }
            }
        }
    }
}

#[component]
fn ProjectModal(modal: Signal<ModalState>) -> Element {
    let Some(project) = modal.read().current() else {
        return rsx! {
            div { id: "project-modal", class: "modal" }
        };
    };

    rsx! {
        div {
            id: "project-modal",
            class: "modal show",
            role: "dialog",
            aria_modal: "true",
            onclick: move |_| close_modal(modal),
            div {
                class: "modal-content",
                onclick: move |event| event.stop_propagation(),
                button {
                    r#type: "button",
                    class: "close-modal",
                    aria_label: "Close",
                    onclick: move |_| close_modal(modal),
                    "×"
                }
                div { class: "modal-header",
                    h2 { id: "modal-title", "{project.title}" }
                    div { id: "modal-tags", class: "modal-tags",
                        for tag in project.tags.iter() {
                            span { key: "{tag}", class: "tag", "{tag}" }
                        }
                    }
                }
                div { id: "modal-description", class: "modal-description",
                    p { "{project.description}" }
                }
                div { class: "modal-features",
                    h3 { "Key Features" }
                    ul { id: "modal-features-list",
                        for feature in project.features.iter() {
                            li { key: "{feature}", "{feature}" }
                        }
                    }
                }
                div { class: "modal-tech",
                    h3 { "Technologies" }
                    div { id: "modal-tech-list", class: "tech-list",
                        for tech in project.technologies.iter() {
                            div { key: "{tech}", class: "tech-item", "{tech}" }
                        }
                    }
                }
                div { class: "modal-links",
                    a { id: "modal-github", href: "{project.github_url}", class: "btn", "GitHub" }
                    a { id: "modal-demo", href: "{project.demo_url}", class: "btn", "Live Demo" }
                }
            }
        }
    }
}

fn close_modal(mut modal: Signal<ModalState>) {
    if modal.write().close() {
        #[cfg(target_arch = "wasm32")]
        set_body_scroll_locked(false);
    }
}
