//! Todoissimus Frontend Entry Point

mod api;
mod app;
mod components;
mod context;
mod external;
mod models;
mod storage;

use app::App;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    register_service_worker();
    mount_to_body(App);
}

/// Offline support is optional; a failed registration is only logged
fn register_service_worker() {
    let Some(win) = web_sys::window() else {
        return;
    };
    let promise = win
        .navigator()
        .service_worker()
        .register("/service-worker.js");
    wasm_bindgen_futures::spawn_local(async move {
        match wasm_bindgen_futures::JsFuture::from(promise).await {
            Ok(_) => web_sys::console::log_1(&"[APP] service worker registered".into()),
            Err(e) => web_sys::console::log_2(&"[APP] service worker registration failed".into(), &e),
        }
    });
}
