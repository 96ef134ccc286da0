// frontend/src/dashboard/mod.rs

macro_rules! log {
    ($($t:tt)*) => {{
        let s = format!($($t)*);
        crate::dashboard::log(&s);
    }}
}

mod chart;
mod node_card;
mod socket;

use dioxus::prelude::*;
use dioxus_signals::Signal;
use nodeboard_shared::{DashboardSettings, NodeDirectory, endpoint};
use once_cell::sync::Lazy;
use serde::Deserialize;

use node_card::NodeCard;
pub use socket::Connection;

/// Bumped on window focus; every card drops its charted history when it moves.
#[derive(Clone, Copy)]
pub struct FocusEpoch(pub Signal<u64>);

static SETTINGS: Lazy<DashboardSettings> = Lazy::new(|| {
    #[cfg(not(target_arch = "wasm32"))]
    {
        DashboardSettings::default().with_overrides(|k| std::env::var(k).ok())
    }

    #[cfg(target_arch = "wasm32")]
    {
        DashboardSettings::default()
    }
});

pub fn dashboard_settings() -> DashboardSettings {
    SETTINGS.clone()
}

// Remembered between runs: localStorage on web, a JSON file on desktop.
mod persist {
    use serde::{Deserialize, Serialize};

    #[derive(Default, Serialize, Deserialize)]
    pub struct Stored {
        #[serde(default)]
        pub base_url: Option<String>,
        #[serde(default)]
        pub user_id: Option<String>,
    }

    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &str = "nodeboard";

    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Stored {
        web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .and_then(|ls| ls.get_item(STORAGE_KEY).ok().flatten())
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    #[cfg(target_arch = "wasm32")]
    fn save(stored: &Stored) -> Result<(), String> {
        let raw = serde_json::to_string(stored).map_err(|e| e.to_string())?;
        let ls = web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or("localStorage unavailable")?;
        ls.set_item(STORAGE_KEY, &raw).map_err(|e| format!("{e:?}"))
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn path() -> std::path::PathBuf {
        dirs::data_local_dir()
            .or_else(dirs::data_dir)
            .unwrap_or_else(std::env::temp_dir)
            .join("nodeboard")
            .join("storage.json")
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Stored {
        std::fs::read(path())
            .ok()
            .and_then(|bytes| serde_json::from_slice(&bytes).ok())
            .unwrap_or_default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn save(stored: &Stored) -> Result<(), String> {
        let path = path();
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| e.to_string())?;
        }
        let bytes = serde_json::to_vec_pretty(stored).map_err(|e| e.to_string())?;
        std::fs::write(path, bytes).map_err(|e| e.to_string())
    }

    pub fn update(f: impl FnOnce(&mut Stored)) {
        let mut stored = load();
        f(&mut stored);
        if let Err(e) = save(&stored) {
            log!("[persist] save failed: {e}");
        }
    }
}

pub use nodeboard_shared::endpoint::normalize_base_url;

/// Prefixes a server path with the configured base URL.
pub fn abs_http(path: &str) -> String {
    endpoint::join(&UrlConfig::base_http(), path)
}

/// Where the server lives. Web builds default to the page's own origin.
pub struct UrlConfig;

impl UrlConfig {
    pub fn set_base_url_and_persist(url: String) {
        let clean = normalize_base_url(&url);
        persist::update(|s| s.base_url = Some(clean));
    }

    pub fn stored_base_url() -> Option<String> {
        persist::load()
            .base_url
            .map(|u| normalize_base_url(&u))
            .filter(|u| !u.is_empty())
    }

    /// Empty on web when nothing is stored, so requests stay relative.
    pub fn base_http() -> String {
        let base = Self::stored_base_url().unwrap_or_default();

        #[cfg(not(target_arch = "wasm32"))]
        if base.is_empty() {
            return "http://localhost:3000".to_string();
        }

        base
    }

    /// `ws[s]://host[:port]` for the configured server.
    pub fn base_ws() -> String {
        let base = Self::base_http();

        #[cfg(target_arch = "wasm32")]
        if base.is_empty() {
            let loc = web_sys::window().map(|w| w.location());
            let protocol = loc.as_ref().and_then(|l| l.protocol().ok());
            let host = loc
                .and_then(|l| l.host().ok())
                .unwrap_or_else(|| "localhost:3000".to_string());
            let scheme = if protocol.as_deref() == Some("https:") { "https" } else { "http" };
            return endpoint::ws_origin(&format!("{scheme}://{host}"));
        }

        endpoint::ws_origin(&base)
    }
}

// ---------- Web vs Native logging ----------
pub fn log(msg: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::log_1(&msg.into());

    #[cfg(not(target_arch = "wasm32"))]
    tracing::info!("{msg}");
}

// ---------- Clocks ----------

/// Wall-clock milliseconds; used to stamp samples.
pub fn wall_clock_ms() -> i64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now() as i64
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        chrono::Utc::now().timestamp_millis()
    }
}

#[cfg(not(target_arch = "wasm32"))]
static FRAME_CLOCK_START: Lazy<std::time::Instant> = Lazy::new(std::time::Instant::now);

/// Frame timestamp fed to the redraw throttle.
pub fn frame_clock_ms() -> f64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now()
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        FRAME_CLOCK_START.elapsed().as_secs_f64() * 1000.0
    }
}

pub async fn sleep_ms(ms: u32) {
    #[cfg(target_arch = "wasm32")]
    gloo_timers::future::TimeoutFuture::new(ms).await;

    #[cfg(not(target_arch = "wasm32"))]
    tokio::time::sleep(std::time::Duration::from_millis(ms as u64)).await;
}

// ---------- HTTP helpers ----------
#[cfg(target_arch = "wasm32")]
async fn http_get_json<T: for<'de> Deserialize<'de>>(path: &str) -> Result<T, String> {
    use gloo_net::http::Request;

    let url = abs_http(path);
    Request::get(&url)
        .send()
        .await
        .map_err(|e| e.to_string())?
        .json::<T>()
        .await
        .map_err(|e| e.to_string())
}

#[cfg(not(target_arch = "wasm32"))]
async fn http_get_json<T: for<'de> Deserialize<'de>>(path: &str) -> Result<T, String> {
    let url = abs_http(path);
    reqwest::get(url)
        .await
        .map_err(|e| e.to_string())?
        .json::<T>()
        .await
        .map_err(|e| e.to_string())
}

async fn load_directory() -> Result<NodeDirectory, String> {
    let mut dir = http_get_json::<NodeDirectory>("/api/nodes").await?;
    if dir.user_id.trim().is_empty() {
        dir.user_id = persist::load().user_id.unwrap_or_default();
    } else {
        let user_id = dir.user_id.clone();
        persist::update(|s| s.user_id = Some(user_id));
    }
    log!("[UI] node list received ({} nodes)", dir.nodes.len());
    Ok(dir)
}

#[cfg(target_arch = "wasm32")]
fn install_focus_listener(
    epoch: Signal<u64>,
) -> Option<std::rc::Rc<wasm_bindgen::closure::Closure<dyn FnMut()>>> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen::closure::Closure;

    let window = web_sys::window()?;
    let on_focus: Closure<dyn FnMut()> = Closure::new(move || {
        log!("[UI] window focused; resetting chart data");
        let mut epoch = epoch;
        *epoch.write() += 1;
    });
    window
        .add_event_listener_with_callback("focus", on_focus.as_ref().unchecked_ref())
        .ok()?;
    Some(std::rc::Rc::new(on_focus))
}

#[cfg(target_arch = "wasm32")]
fn remove_focus_listener(cb: &wasm_bindgen::closure::Closure<dyn FnMut()>) {
    use wasm_bindgen::JsCast;

    if let Some(window) = web_sys::window() {
        let _ = window.remove_event_listener_with_callback("focus", cb.as_ref().unchecked_ref());
    }
}

fn connection_badge(conn: &Connection) -> (String, &'static str) {
    match conn {
        Connection::Idle => ("Idle".to_string(), "#64748b"),
        Connection::Connecting => ("Connecting…".to_string(), "#f59e0b"),
        Connection::Open => ("Live".to_string(), "#22c55e"),
        Connection::Closed(reason) => (format!("Disconnected: {reason}"), "#ef4444"),
    }
}

#[component]
pub fn NodeDashboard() -> Element {
    let directory = use_resource(|| async move { load_directory().await });
    let connection = use_signal(|| Connection::Idle);
    let focus_epoch = use_signal(|| 0u64);
    use_context_provider(|| FocusEpoch(focus_epoch));

    // One socket per mount; the task (and the socket) go away with the component.
    use_hook(move || {
        spawn(async move {
            if let Err(e) = socket::run_connection(connection).await {
                log!("[WS] {e}");
            }
        })
    });

    #[cfg(target_arch = "wasm32")]
    {
        let focus_cb = use_hook(move || install_focus_listener(focus_epoch));
        use_drop(move || {
            if let Some(cb) = &focus_cb {
                remove_focus_listener(cb);
            }
        });
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        use dioxus_desktop::tao::event::{Event, WindowEvent};

        let mut epoch = focus_epoch;
        dioxus_desktop::use_wry_event_handler(move |event, _| {
            if let Event::WindowEvent {
                event: WindowEvent::Focused(true),
                ..
            } = event
            {
                log!("[UI] window focused; resetting chart data");
                *epoch.write() += 1;
            }
        });
    }

    let (badge_text, badge_color) = connection_badge(&connection.read());
    let dir_state = (*directory.read()).clone();

    rsx! {
        div {
            style: "min-height:100vh; padding:16px; font-family:system-ui; color:#e5e7eb; background:#020617;",

            div {
                style: "display:flex; align-items:center; justify-content:space-between; margin-bottom:16px;",
                h1 { style: "margin:0; font-size:20px;", "Nodes" }
                div {
                    style: "display:flex; align-items:center; gap:8px; font-size:13px; color:#94a3b8;",
                    span { style: "width:10px; height:10px; border-radius:50%; background:{badge_color};" }
                    "{badge_text}"
                }
            }

            match dir_state {
                None => rsx! {
                    div { style: "color:#64748b;", "Loading node list…" }
                },
                Some(Err(e)) => rsx! {
                    div {
                        style: "padding:12px; border:1px solid #7f1d1d; border-radius:12px; background:#1f0b0b; color:#fecaca;",
                        "Failed to load nodes: {e}"
                    }
                },
                Some(Ok(dir)) if dir.nodes.is_empty() => rsx! {
                    div { style: "color:#64748b;", "No nodes registered." }
                },
                Some(Ok(dir)) => rsx! {
                    div {
                        style: "display:grid; grid-template-columns: repeat(auto-fit, minmax(420px, 1fr)); gap:16px;",
                        for info in dir.nodes.iter() {
                            NodeCard {
                                key: "{info.id}",
                                info: info.clone(),
                                user_id: dir.user_id.clone(),
                            }
                        }
                    }
                },
            }
        }
    }
}
