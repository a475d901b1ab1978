//! Remote execution: a worker connects out to a peer, receives one job and streams progress back
//! as newline-delimited JSON commands.

pub mod protocol;
pub mod sink;
pub mod worker;

pub use self::protocol::Command;
pub use self::sink::NetworkSink;
pub use self::worker::run_network_worker;
