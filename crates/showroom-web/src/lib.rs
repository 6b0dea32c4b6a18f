// Asset decoding is pure and compiles on any target (host tests parse
// in-memory glTF through it); everything else touches the DOM or WebGPU
// surface creation and only exists on wasm32.
pub mod assets;

#[cfg(target_arch = "wasm32")]
pub mod app;
#[cfg(target_arch = "wasm32")]
pub mod dom;
#[cfg(target_arch = "wasm32")]
pub mod frame;
#[cfg(target_arch = "wasm32")]
pub mod render;
#[cfg(target_arch = "wasm32")]
pub mod tracking;
#[cfg(target_arch = "wasm32")]
pub mod ui;
