//! BoardCheck Web App (Leptos + WASM)

mod app;
mod components;
mod logging;

pub mod api;
pub mod storage;

use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    logging::init();

    if let Err(err) = boardcheck_common::validate_catalog() {
        tracing::error!(error = %err, "Translation catalog is invalid, falling back to keys");
    }

    leptos::mount::mount_to_body(app::App);
}
