//! Raw-sample telemetry: datagram codec and best-effort sender.

pub mod codec;
pub mod sender;
