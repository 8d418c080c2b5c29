//! Canvas 2D rendering module
//!
//! The scene is built as a plain draw list; the wasm backend replays it on a
//! `CanvasRenderingContext2d`.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod colors;
pub mod scene;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
pub use scene::{DrawCmd, Font, SceneOptions, TextAlign, build_scene};
