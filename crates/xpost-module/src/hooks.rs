use tracing::warn;
use xpost_types::{Packet, PostPayload};

/// Observer notified of acknowledgements that carry no state change.
///
/// An error acknowledgement leaves every store untouched. The observer is
/// where the counterparty's message goes instead of being dropped.
pub trait AckObserver: Send + Sync {
    fn on_error_acknowledgement(&self, packet: &Packet, payload: &PostPayload, message: &str);
}

/// Logs error acknowledgements at `warn`.
pub struct TracingAckObserver;

impl AckObserver for TracingAckObserver {
    fn on_error_acknowledgement(&self, packet: &Packet, payload: &PostPayload, message: &str) {
        warn!(
            packet = %packet.id(),
            chain = %packet.destination_chain(),
            creator = %payload.creator,
            title = %payload.title,
            error = message,
            "counterparty rejected post"
        );
    }
}
