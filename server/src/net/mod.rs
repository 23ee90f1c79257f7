pub mod connection;
pub mod handler;
pub mod inbox;
pub mod listener;

pub use connection::ConnectionId;
pub use handler::ConnectionHandler;
pub use inbox::{INBOX_CAPACITY, InboxReceiver, InboxSender, create_inbox};
pub use listener::create_tcp_listener;
