mod achievements;
mod config;
mod contact;
mod cursor;
mod events;
#[cfg(target_arch = "wasm32")]
mod listeners;
mod loading;
mod navigation;
mod projects;
mod reveal;
mod rng;
mod routes;
mod skills;
mod theme;
mod timers;

fn main() {
    dioxus::launch(routes::App);
}
