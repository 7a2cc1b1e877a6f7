//! Light/dark theme: the token table, the persisted preference, the
//! controller that owns the active theme, and the subscribers that restyle
//! themselves from its `ThemeChanged` broadcasts.

mod controller;
pub mod dom;
pub mod effects;
mod storage;
mod tokens;

use thiserror::Error;

pub use controller::{ThemeChanged, ThemeController};
pub use storage::{BrowserStorage, PreferenceSlot};
#[cfg(test)]
pub use storage::MemoryStore;
#[cfg(test)]
pub use tokens::ThemeName;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ThemeError {
    #[error("unknown theme `{0}`")]
    UnknownTheme(String),
    #[error("theme controller has been torn down")]
    TornDown,
}
