/// Uniform sample in `[0, 1)` for cosmetic randomness.
#[cfg(target_arch = "wasm32")]
pub fn roll() -> f64 {
    js_sys::Math::random()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn roll() -> f64 {
    0.5
}
