//! Platform-independent core of the node dashboard.
//!
//! Everything here runs on the UI thread of whichever shell hosts it (wasm32
//! or desktop) and has no I/O of its own; sockets are plugged in through
//! [`socket::Transport`].

pub mod endpoint;
pub mod error;
pub mod message;
pub mod metric;
pub mod node;
pub mod plot;
pub mod series;
pub mod settings;
pub mod socket;
pub mod throttle;

pub use error::{Error, Result};
pub use message::{InboundFrame, Message, NodeDirectory, NodeId, NodeInfo};
pub use metric::Metric;
pub use node::NodeState;
pub use series::{Sample, Series};
pub use settings::DashboardSettings;
pub use socket::{HandlerId, Transport, WebSocketManager};
pub use throttle::FrameThrottle;
