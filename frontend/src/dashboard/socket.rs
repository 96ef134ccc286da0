// frontend/src/dashboard/socket.rs
//
// One websocket per dashboard mount. Inbound text frames go through the shared
// WebSocketManager, which fans them out to the node cards; outbound commands
// are serialized by the same manager. Everything here runs on the UI thread.

use std::cell::RefCell;
use std::rc::Rc;

use dioxus::prelude::*;
use nodeboard_shared::{Error, HandlerId, Message, NodeState, Transport, WebSocketManager};

use super::wall_clock_ms;

#[derive(Clone, Debug, PartialEq)]
pub enum Connection {
    Idle,
    Connecting,
    Open,
    Closed(String),
}

// ---------- Cross-platform WS handle ----------
#[derive(Clone)]
pub struct WsSender {
    #[cfg(target_arch = "wasm32")]
    ws: web_sys::WebSocket,

    #[cfg(not(target_arch = "wasm32"))]
    tx: tokio::sync::mpsc::UnboundedSender<String>,
}

impl Transport for WsSender {
    fn send_text(&self, text: String) -> nodeboard_shared::Result<()> {
        #[cfg(target_arch = "wasm32")]
        {
            self.ws
                .send_with_str(&text)
                .map_err(|e| Error::Transport(format!("{e:?}")))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            self.tx.send(text).map_err(|_| Error::Closed)
        }
    }
}

thread_local! {
    static MANAGER: RefCell<WebSocketManager<WsSender>> = RefCell::new(WebSocketManager::new());
}

fn with_manager<R>(f: impl FnOnce(&mut WebSocketManager<WsSender>) -> R) -> R {
    MANAGER.with(|m| f(&mut m.borrow_mut()))
}

/// Routes feed frames for this node into its state. If the socket is already
/// open the node is announced right away; otherwise it is announced on open.
pub fn subscribe(node: Rc<RefCell<NodeState>>) -> HandlerId {
    let owner = node.borrow().id().clone();
    let register = node.borrow().register();

    with_manager(move |m| {
        let id = m.add_handler(owner, move |frame| {
            node.borrow_mut().on_message(frame, wall_clock_ms());
        });
        if m.is_attached()
            && let Err(e) = m.send(&register)
        {
            log!("[WS] failed to register node {}: {e}", register.id);
        }
        id
    })
}

pub fn unsubscribe(id: HandlerId) {
    // the thread-local may already be gone during teardown
    let _ = MANAGER.try_with(|m| {
        if let Ok(mut m) = m.try_borrow_mut() {
            m.remove_handler(id);
        }
    });
}

pub fn send(message: &Message) {
    if let Err(e) = with_manager(|m| m.send(message)) {
        log!("[WS] send {} '{}' for node {} failed: {e}", message.kind, message.data, message.id);
    }
}

fn attach(sender: WsSender) {
    with_manager(|m| {
        m.attach(sender);
        match m.announce_owners() {
            Ok(n) => log!("[WS] open; registered {n} nodes"),
            Err(e) => log!("[WS] open; node registration failed: {e}"),
        }
    });
}

fn dispatch(text: &str) {
    if let Err(e) = with_manager(|m| m.dispatch_text(text)) {
        log!("[WS] dropping frame: {e}");
    }
}

/// Detaches the transport when the connection future ends or is dropped.
struct Attachment;

impl Drop for Attachment {
    fn drop(&mut self) {
        let _ = MANAGER.try_with(|m| {
            if let Ok(mut m) = m.try_borrow_mut() {
                m.detach();
            }
        });
    }
}

/// Runs a single connection until the server closes it. There is no
/// reconnect: the badge shows the close reason and the page must be reloaded.
pub async fn run_connection(connection: Signal<Connection>) -> Result<(), String> {
    let mut connection = connection;
    let ws_url = format!("{}/ws", super::UrlConfig::base_ws());

    log!("[WS] connecting to {ws_url}");
    connection.set(Connection::Connecting);

    let res = {
        #[cfg(target_arch = "wasm32")]
        {
            connect_once_wasm(&ws_url, connection).await
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            connect_once_native(&ws_url, connection).await
        }
    };

    let reason = match &res {
        Ok(()) => "closed by server".to_string(),
        Err(e) => e.clone(),
    };
    log!("[WS] {reason}");
    connection.set(Connection::Closed(reason));
    res
}

#[cfg(target_arch = "wasm32")]
async fn connect_once_wasm(ws_url: &str, connection: Signal<Connection>) -> Result<(), String> {
    use futures_channel::oneshot;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::closure::Closure;
    use web_sys::{CloseEvent, ErrorEvent, Event, MessageEvent, WebSocket};

    /// Unhooks the JS callbacks and closes the socket before the closures drop.
    struct SocketGuard(WebSocket);

    impl Drop for SocketGuard {
        fn drop(&mut self) {
            self.0.set_onopen(None);
            self.0.set_onmessage(None);
            self.0.set_onerror(None);
            self.0.set_onclose(None);
            let _ = self.0.close();
        }
    }

    let ws = WebSocket::new(ws_url).map_err(|_| "failed to create websocket".to_string())?;

    let (closed_tx, closed_rx) = oneshot::channel::<String>();
    let closed_tx = Rc::new(RefCell::new(Some(closed_tx)));

    let onopen: Closure<dyn FnMut(Event)> = {
        let ws = ws.clone();
        Closure::new(move |_e: Event| {
            let mut connection = connection;
            connection.set(Connection::Open);
            attach(WsSender { ws: ws.clone() });
        })
    };

    let onmessage: Closure<dyn FnMut(MessageEvent)> = Closure::new(move |e: MessageEvent| {
        if let Some(s) = e.data().as_string() {
            dispatch(&s);
        }
    });

    let onerror: Closure<dyn FnMut(ErrorEvent)> = {
        let closed_tx = closed_tx.clone();
        Closure::new(move |e: ErrorEvent| {
            log!("[WS] error: {}", e.message());
            if let Some(tx) = closed_tx.borrow_mut().take() {
                let _ = tx.send("websocket error".to_string());
            }
        })
    };

    let onclose: Closure<dyn FnMut(CloseEvent)> = {
        let closed_tx = closed_tx.clone();
        Closure::new(move |e: CloseEvent| {
            if let Some(tx) = closed_tx.borrow_mut().take() {
                let _ = tx.send(format!("close code={} reason='{}'", e.code(), e.reason()));
            }
        })
    };

    ws.set_onopen(Some(onopen.as_ref().unchecked_ref()));
    ws.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));
    ws.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    ws.set_onclose(Some(onclose.as_ref().unchecked_ref()));

    // Drop order: detach first, then unhook callbacks, then the closures.
    let _guard = SocketGuard(ws);
    let _attachment = Attachment;

    match closed_rx.await {
        Ok(reason) => Err(reason),
        Err(_) => Err("websocket closed".to_string()),
    }
}

#[cfg(not(target_arch = "wasm32"))]
async fn connect_once_native(ws_url: &str, connection: Signal<Connection>) -> Result<(), String> {
    use futures_util::{SinkExt, StreamExt};
    use tokio_tungstenite::tungstenite::Message as WsMessage;

    let mut connection = connection;

    let (ws_stream, _) = tokio_tungstenite::connect_async(ws_url)
        .await
        .map_err(|e| format!("connect failed: {e}"))?;

    let (mut write, mut read) = ws_stream.split();
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<String>();

    // Ends once the manager drops its sender (detach) or the socket fails.
    let writer = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if write.send(WsMessage::Text(msg.into())).await.is_err() {
                break;
            }
        }
        let _ = write.close().await;
    });

    let _attachment = Attachment;
    connection.set(Connection::Open);
    attach(WsSender { tx });

    let mut result = Ok(());
    while let Some(item) = read.next().await {
        match item {
            Ok(WsMessage::Text(s)) => dispatch(&s),
            Ok(WsMessage::Close(frame)) => {
                if let Some(f) = frame {
                    result = Err(format!("close code={} reason='{}'", u16::from(f.code), f.reason));
                }
                break;
            }
            Ok(_) => {}
            Err(e) => {
                result = Err(format!("read error: {e}"));
                break;
            }
        }
    }

    drop(_attachment);
    let _ = writer.await;
    result
}
