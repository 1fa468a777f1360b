pub mod channel;
pub mod events;
pub mod transport;
pub mod unread;

pub use channel::{ChannelUpdate, EventChannel, Toast};
pub use events::{OrderEvent, OrderEventKind};
pub use transport::{
    ChannelError, EventTransport, InboundMessage, OutboundMessage, TcpLineTransport,
    TransportSignal,
};
pub use unread::UnreadTracker;
