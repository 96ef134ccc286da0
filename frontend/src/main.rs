mod app;
mod dashboard;

use dioxus::prelude::*;

#[cfg(target_arch = "wasm32")]
fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

#[cfg(not(target_arch = "wasm32"))]
fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    init_panic_hook();

    // Web launch (wasm)
    launch(app::App);
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    init_logging();
    let cfg = dioxus_desktop::Config::new().with_window(
        dioxus_desktop::WindowBuilder::new().with_title("Nodeboard"),
    );
    LaunchBuilder::desktop().with_cfg(cfg).launch(app::App);
}
