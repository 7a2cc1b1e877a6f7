use dioxus::prelude::*;

use crate::reveal::{stagger_style, use_in_view};
use crate::rng::roll;

const GRID_ID: &str = "skills-grid";
/// Share of the grid that must be visible before the bars fill.
const FILL_THRESHOLD: f64 = 0.5;
/// Upper bound of the random delay each bar waits before filling.
const FILL_JITTER_MS: f64 = 500.0;

pub const SKILL_GROUPS: [(&str, &[(&str, u8)]); 3] = [
    ("Languages", &[("Rust", 85), ("Python", 90), ("C++", 80), ("JavaScript", 75)]),
    ("Machine Learning", &[("TensorFlow", 80), ("OpenCV", 75), ("NLTK", 65), ("spaCy", 70)]),
    ("Tooling", &[("Docker", 80), ("AWS", 70), ("PostgreSQL", 75), ("CMake", 65)]),
];

/// Progress bar for one skill. Empty until it is filled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SkillMeter {
    level: u8,
    filled: bool,
}

impl SkillMeter {
    pub fn new(level: u8) -> Self {
        Self {
            level: level.min(100),
            filled: false,
        }
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn fill(&mut self) {
        self.filled = true;
    }

    pub fn width_pct(&self) -> u8 {
        if self.filled {
            self.level
        } else {
            0
        }
    }

    pub fn style(&self) -> String {
        format!("width: {}%;", self.width_pct())
    }
}

pub fn all_meters() -> Vec<SkillMeter> {
    SKILL_GROUPS
        .iter()
        .flat_map(|(_, skills)| skills.iter().map(|(_, level)| SkillMeter::new(*level)))
        .collect()
}

/// Delay for a bar given a uniform sample in `[0, 1)`.
pub fn fill_delay_ms(sample: f64) -> u32 {
    (sample.clamp(0.0, 1.0) * FILL_JITTER_MS) as u32
}

#[component]
pub fn SkillsGrid() -> Element {
    let mut meters = use_signal(all_meters);
    let mut started = use_signal(|| false);
    let in_view = use_in_view(GRID_ID.to_string(), FILL_THRESHOLD, "0px");

    use_effect(move || {
        if !in_view() || *started.peek() {
            return;
        }
        started.set(true);
        let count = meters.peek().len();
        for index in 0..count {
            let delay = fill_delay_ms(roll());
            spawn(async move {
                #[cfg(target_arch = "wasm32")]
                gloo_timers::future::TimeoutFuture::new(delay).await;
                #[cfg(not(target_arch = "wasm32"))]
                let _ = delay;
                if let Some(meter) = meters.write().get_mut(index) {
                    meter.fill();
                }
            });
        }
        tracing::debug!("skills: filling {count} bars");
    });

    let current = meters.read().clone();
    let mut offset = 0;
    let groups: Vec<_> = SKILL_GROUPS
        .iter()
        .enumerate()
        .map(|(group_index, (group, skills))| {
            let rows: Vec<_> = skills
                .iter()
                .zip(&current[offset..])
                .map(|((name, _), meter)| (*name, meter.level(), meter.style()))
                .collect();
            offset += skills.len();
            (*group, stagger_style(group_index), rows)
        })
        .collect();

    rsx! {
        div { id: GRID_ID, class: "skills-grid",
            for (group, entrance, rows) in groups {
                div { key: "{group}", class: "skill-group stagger-item", style: "{entrance}",
                    h3 { "{group}" }
                    for (name, level, fill) in rows {
                        div { key: "{name}", class: "skill-item",
                            div { class: "skill-info",
                                span { class: "skill-name", "{name}" }
                                span { class: "skill-level", "{level}%" }
                            }
                            div { class: "skill-bar",
                                div { class: "skill-fill", "data-skill": "{level}", style: "{fill}" }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn meters_start_empty_and_fill_to_their_level() {
        let mut meter = SkillMeter::new(85);
        assert_eq!(meter.style(), "width: 0%;");
        meter.fill();
        assert_eq!(meter.width_pct(), 85);
        assert_eq!(meter.style(), "width: 85%;");
        assert_eq!(SkillMeter::new(140).level(), 100);
    }

    #[test]
    fn one_meter_per_listed_skill() {
        let listed: usize = SKILL_GROUPS.iter().map(|(_, skills)| skills.len()).sum();
        let meters = all_meters();
        assert_eq!(meters.len(), listed);
        assert_eq!(meters[0].level(), 85);
        assert!(meters.iter().all(|meter| meter.width_pct() == 0));
    }

    #[test]
    fn fill_delay_stays_within_jitter() {
        assert_eq!(fill_delay_ms(0.0), 0);
        assert_eq!(fill_delay_ms(0.5), 250);
        assert_eq!(fill_delay_ms(7.0), 500);
    }
}
