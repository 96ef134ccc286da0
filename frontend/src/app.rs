// frontend/src/app.rs
//
// Routing shell. On the web the dashboard is served by the same host that
// feeds it, so it mounts directly. Native builds first ask for the backend URL
// (Connect screen) and remember it.
#[cfg(not(target_arch = "wasm32"))]
const CONNECTION_TIMEOUT_MS: u64 = 4000;
#[cfg(not(target_arch = "wasm32"))]
const WS_TIMEOUT_MS: u64 = 4500;

use dioxus::prelude::*;
use dioxus_router::{Routable, Router};

#[allow(unused_imports)]
use crate::dashboard::UrlConfig;
#[cfg(not(target_arch = "wasm32"))]
use dioxus_router::use_navigator;

// --- global css ---
const GLOBAL_CSS: &str = r#"
html, body {
    margin: 0;
    padding: 0;
    width: 100%;
    min-height: 100%;
    background: #020617;
}

:root, html {
    color-scheme: dark;
}

#main {
    width: 100%;
    min-height: 100%;
    background: #020617;
}

* { box-sizing: border-box; }
"#;

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[route("/")]
    Root {},

    #[route("/dashboard")]
    Dashboard {},

    #[cfg(not(target_arch = "wasm32"))]
    #[route("/connect")]
    Connect {},
}

// -------------------------
// URL parsing / probing (native)
// -------------------------
#[cfg(not(target_arch = "wasm32"))]
#[derive(Clone, Debug)]
struct ParsedBaseUrl {
    scheme: String, // "http" or "https"
    host: String,
    port: u16,
}

#[cfg(not(target_arch = "wasm32"))]
fn parse_base_url(url: &str) -> Result<ParsedBaseUrl, String> {
    let u = url.trim();
    let (scheme, rest) = if let Some(x) = u.strip_prefix("http://") {
        ("http".to_string(), x)
    } else if let Some(x) = u.strip_prefix("https://") {
        ("https".to_string(), x)
    } else {
        return Err("URL must start with http:// or https://".to_string());
    };

    let hostport = rest.split('/').next().unwrap_or(rest);
    let mut parts = hostport.split(':');
    let host = parts.next().unwrap_or("").trim().to_string();

    if host.is_empty() {
        return Err("Missing host in URL".to_string());
    }

    let port = parts
        .next()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or_else(|| if scheme == "https" { 443 } else { 80 });

    Ok(ParsedBaseUrl { scheme, host, port })
}

#[cfg(not(target_arch = "wasm32"))]
fn ws_origin_for_base(parsed: &ParsedBaseUrl) -> String {
    let ws_scheme = if parsed.scheme == "https" {
        "wss"
    } else {
        "ws"
    };
    format!("{ws_scheme}://{}:{}", parsed.host, parsed.port)
}

#[cfg(not(target_arch = "wasm32"))]
async fn probe_node_list(base: &str) -> Result<String, String> {
    let url = format!("{base}/api/nodes");
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_millis(CONNECTION_TIMEOUT_MS))
        .build()
        .map_err(|e| format!("build client failed: {e}"))?;

    let resp = client
        .get(&url)
        .send()
        .await
        .map_err(|e| format!("GET {url} failed: {e}"))?;
    let status = resp.status();
    if !status.is_success() {
        return Err(format!("GET {url} returned {status}"));
    }

    let dir = resp
        .json::<nodeboard_shared::NodeDirectory>()
        .await
        .map_err(|e| format!("node list did not parse: {e}"))?;
    Ok(format!("Node list OK ({} nodes)", dir.nodes.len()))
}

#[cfg(not(target_arch = "wasm32"))]
async fn ws_connect_probe(parsed: &ParsedBaseUrl) -> Result<String, String> {
    use tokio::time::timeout;
    use tokio_tungstenite::connect_async;

    let ws_url = format!("{}/ws", ws_origin_for_base(parsed));

    // Real handshake, time-bounded so it can't hang.
    let res = timeout(
        std::time::Duration::from_millis(WS_TIMEOUT_MS),
        connect_async(ws_url.clone()),
    )
    .await;

    match res {
        Err(_) => Err(format!("WebSocket connect timed out ({ws_url})")),
        Ok(Ok((_stream, resp))) => Ok(format!("WebSocket OK ({ws_url}, HTTP {})", resp.status())),
        Ok(Err(e)) => Err(format!("WebSocket connect failed ({ws_url}): {e}")),
    }
}

// -------------------------
// App
// -------------------------
#[component]
pub fn App() -> Element {
    rsx! {
        document::Style { "{GLOBAL_CSS}" }
        document::Meta { name: "viewport", content: "width=device-width, initial-scale=1" }

        div {
            style: "min-height: 100vh; width: 100%; background: #020617; color: #e5e7eb;",
            Router::<Route> {}
        }
    }
}

#[component]
pub fn Root() -> Element {
    #[cfg(target_arch = "wasm32")]
    {
        return rsx! { Dashboard {} };
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let nav = use_navigator();

        use_effect(move || {
            if UrlConfig::stored_base_url().is_some() {
                let _ = nav.replace(Route::Dashboard {});
            } else {
                let _ = nav.replace(Route::Connect {});
            }
        });

        rsx! { div {} }
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[component]
pub fn Connect() -> Element {
    let nav = use_navigator();

    let initial =
        UrlConfig::stored_base_url().unwrap_or_else(|| "http://localhost:3000".to_string());

    let mut url_edit = use_signal(|| initial);
    let mut test_status = use_signal(String::new);
    let mut testing = use_signal(|| false);

    let btn = "padding:10px 14px; border-radius:12px; border:1px solid #334155; background:#0f172a; color:#e5e7eb; cursor:pointer;";

    rsx! {
        div {
            style: "height:100vh; display:flex; align-items:center; justify-content:center; background:#020617; color:#e5e7eb; font-family:system-ui;",
            div {
                style: "width:min(720px, 94vw); padding:24px; border:1px solid #334155; border-radius:16px; background:#0b1220; box-shadow:0 12px 30px rgba(0,0,0,0.5);",

                h1 { style: "margin:0 0 12px 0; font-size:20px;", "Nodeboard" }

                p { style: "margin:0 0 16px 0; color:#94a3b8;",
                    "Enter the server URL (including http:// or https://). Example: ",
                    code { "http://localhost:3000" }
                }

                input {
                    style: "width:100%; padding:12px; border-radius:12px; border:1px solid #334155; background:#020617; color:#e5e7eb; outline:none;",
                    value: "{url_edit()}",
                    oninput: move |evt| {
                        url_edit.set(evt.value());
                        test_status.set(String::new());
                    },
                }

                if !test_status().is_empty() {
                    pre {
                        style: "margin:14px 0 0 0; padding:12px; border-radius:12px; border:1px solid #334155; background:#020617; color:#cbd5e1; font-size:12px; white-space:pre-wrap;",
                        "{test_status()}"
                    }
                }

                div { style: "display:flex; gap:12px; margin-top:16px; justify-content:flex-end;",
                    button {
                        style: "{btn}",
                        disabled: testing(),
                        onclick: move |_| {
                            let base = crate::dashboard::normalize_base_url(&url_edit());
                            let parsed = match parse_base_url(&base) {
                                Ok(p) => p,
                                Err(e) => {
                                    test_status.set(e);
                                    return;
                                }
                            };

                            testing.set(true);
                            test_status.set("Testing connection...".to_string());

                            spawn(async move {
                                let (http, ws) =
                                    futures_util::join!(probe_node_list(&base), ws_connect_probe(&parsed));
                                let line = |r: Result<String, String>| match r {
                                    Ok(s) => format!("OK    {s}"),
                                    Err(e) => format!("FAIL  {e}"),
                                };
                                testing.set(false);
                                test_status.set(format!("{}\n{}", line(http), line(ws)));
                            });
                        },
                        if testing() { "Testing..." } else { "Test Connection" }
                    }

                    button {
                        style: "{btn}",
                        onclick: move |_| {
                            let base = crate::dashboard::normalize_base_url(&url_edit());
                            if let Err(e) = parse_base_url(&base) {
                                test_status.set(e);
                                return;
                            }
                            UrlConfig::set_base_url_and_persist(base);
                            let _ = nav.replace(Route::Dashboard {});
                        },
                        "Connect"
                    }
                }
            }
        }
    }
}

#[component]
pub fn Dashboard() -> Element {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if UrlConfig::stored_base_url().is_none() {
            return rsx! {
                div {
                    style: "height:100vh; display:flex; align-items:center; justify-content:center; background:#020617; color:#e5e7eb; font-family:system-ui;",
                    div {
                        style: "width:min(560px, 92vw); padding:24px; border:1px solid #334155; border-radius:16px; background:#0b1220;",
                        h1 { style: "margin:0 0 12px 0; font-size:18px;", "Not connected" }
                        p { style: "margin:0; color:#94a3b8;", "Please configure the server URL on the Connect screen." }
                    }
                }
            };
        }
    }

    rsx! { crate::dashboard::NodeDashboard {} }
}
