use crate::error::{Error, Result};
use crate::message::{InboundFrame, Message, NodeId};

/// Text-frame sink for one open socket.
pub trait Transport {
    fn send_text(&self, text: String) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(u64);

type Handler = Box<dyn FnMut(&InboundFrame)>;

struct Registration {
    id: HandlerId,
    owner: NodeId,
    handler: Handler,
}

/// Fans inbound frames out to subscribers and serializes outbound messages.
///
/// Handlers run in registration order. They must not call back into the
/// manager that is dispatching to them.
pub struct WebSocketManager<T> {
    transport: Option<T>,
    handlers: Vec<Registration>,
    next_id: u64,
}

impl<T> Default for WebSocketManager<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> WebSocketManager<T> {
    pub fn new() -> Self {
        Self {
            transport: None,
            handlers: Vec::new(),
            next_id: 0,
        }
    }

    pub fn attach(&mut self, transport: T) {
        self.transport = Some(transport);
    }

    pub fn detach(&mut self) -> Option<T> {
        self.transport.take()
    }

    pub fn is_attached(&self) -> bool {
        self.transport.is_some()
    }

    pub fn add_handler<F>(&mut self, owner: NodeId, handler: F) -> HandlerId
    where
        F: FnMut(&InboundFrame) + 'static,
    {
        let id = HandlerId(self.next_id);
        self.next_id += 1;
        self.handlers.push(Registration {
            id,
            owner,
            handler: Box::new(handler),
        });
        id
    }

    pub fn remove_handler(&mut self, id: HandlerId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|r| r.id != id);
        self.handlers.len() != before
    }

    /// Drops every handler registered for `owner`; returns how many went.
    pub fn remove_owner(&mut self, owner: &NodeId) -> usize {
        let before = self.handlers.len();
        self.handlers.retain(|r| &r.owner != owner);
        before - self.handlers.len()
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Distinct owners in registration order.
    pub fn owners(&self) -> Vec<NodeId> {
        let mut out: Vec<NodeId> = Vec::new();
        for r in &self.handlers {
            if !out.contains(&r.owner) {
                out.push(r.owner.clone());
            }
        }
        out
    }

    /// Parses one inbound text frame and hands it to every handler.
    /// Returns the number of handlers invoked.
    pub fn dispatch_text(&mut self, text: &str) -> Result<usize> {
        let frame: InboundFrame = serde_json::from_str(text).map_err(Error::MalformedFrame)?;
        Ok(self.dispatch(&frame))
    }

    pub fn dispatch(&mut self, frame: &InboundFrame) -> usize {
        for r in self.handlers.iter_mut() {
            (r.handler)(frame);
        }
        self.handlers.len()
    }
}

impl<T: Transport> WebSocketManager<T> {
    pub fn send(&self, message: &Message) -> Result<()> {
        let transport = self.transport.as_ref().ok_or(Error::Closed)?;
        let text = serde_json::to_string(message).map_err(Error::Encode)?;
        transport.send_text(text)
    }

    /// Sends a registration message for every subscribed node.
    pub fn announce_owners(&self) -> Result<usize> {
        let owners = self.owners();
        for id in &owners {
            self.send(&Message::register(id.clone()))?;
        }
        Ok(owners.len())
    }
}
