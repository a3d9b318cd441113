//! Browser front end. Markup lives in [`view`]; the DOM/event glue is only
//! compiled for `wasm32`.

pub mod view;

#[cfg(target_arch = "wasm32")]
mod app;

#[cfg(target_arch = "wasm32")]
pub use app::start_app;
