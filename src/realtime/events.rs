use serde_json::Value;

use crate::realtime::transport::InboundMessage;

pub const EVENT_DISPATCHED: &str = "vendor_order_dispatched";
pub const EVENT_DECLINED: &str = "vendor_order_declined";

// Older backend builds emit camelCase event names.
const EVENT_DISPATCHED_ALIAS: &str = "vendorOrderDispatched";
const EVENT_DECLINED_ALIAS: &str = "vendorOrderDeclined";

/// Candidate payload fields for the correlated order id, in priority order.
/// The event schema is not strictly versioned; the first present field wins.
pub const ORDER_ID_FIELDS: &[&str] = &["vendorOrderId", "id", "_id", "orderId"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderEventKind {
    Dispatched,
    Declined,
}

impl OrderEventKind {
    /// Canonical listing page for this event's domain. Visiting it resets
    /// the unread set.
    pub fn listing_path(&self) -> &'static str {
        "/dashboard/vendor-orders"
    }

    fn default_message(&self) -> &'static str {
        match self {
            OrderEventKind::Dispatched => "A vendor order was dispatched",
            OrderEventKind::Declined => "A vendor order was declined",
        }
    }
}

/// A decoded dispatch/decline push event.
#[derive(Debug, Clone)]
pub struct OrderEvent {
    pub kind: OrderEventKind,
    pub message: String,
    pub order_id: Option<String>,
}

/// Pull the correlated order id out of an event payload.
///
/// Single place where the fallback chain lives; call sites never probe
/// fields themselves.
pub fn resolve_order_id(payload: &Value) -> Option<String> {
    let object = payload.as_object()?;
    for field in ORDER_ID_FIELDS {
        match object.get(*field) {
            Some(Value::String(s)) if !s.is_empty() => return Some(s.clone()),
            Some(Value::Number(n)) => return Some(n.to_string()),
            _ => {}
        }
    }
    None
}

/// Decode an inbound message into a typed order event, or `None` for event
/// kinds this subsystem does not track.
pub fn decode_order_event(message: &InboundMessage) -> Option<OrderEvent> {
    let kind = match message.event.as_str() {
        EVENT_DISPATCHED | EVENT_DISPATCHED_ALIAS => OrderEventKind::Dispatched,
        EVENT_DECLINED | EVENT_DECLINED_ALIAS => OrderEventKind::Declined,
        _ => return None,
    };

    let text = message
        .payload
        .get("message")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| kind.default_message().to_string());

    Some(OrderEvent { kind, message: text, order_id: resolve_order_id(&message.payload) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn inbound(event: &str, payload: Value) -> InboundMessage {
        InboundMessage { event: event.to_string(), payload }
    }

    #[test]
    fn first_present_field_wins() {
        let payload = json!({ "orderId": "low", "vendorOrderId": "top" });
        assert_eq!(resolve_order_id(&payload).as_deref(), Some("top"));

        let payload = json!({ "_id": "mid", "orderId": "low" });
        assert_eq!(resolve_order_id(&payload).as_deref(), Some("mid"));
    }

    #[test]
    fn numeric_ids_are_stringified() {
        let payload = json!({ "id": 4711 });
        assert_eq!(resolve_order_id(&payload).as_deref(), Some("4711"));
    }

    #[test]
    fn empty_strings_are_skipped() {
        let payload = json!({ "vendorOrderId": "", "orderId": "o-1" });
        assert_eq!(resolve_order_id(&payload).as_deref(), Some("o-1"));
    }

    #[test]
    fn missing_id_is_none() {
        assert_eq!(resolve_order_id(&json!({ "message": "hi" })), None);
        assert_eq!(resolve_order_id(&json!("not an object")), None);
    }

    #[test]
    fn decodes_both_event_name_conventions() {
        let a = decode_order_event(&inbound(EVENT_DISPATCHED, json!({ "id": "x" }))).unwrap();
        let b = decode_order_event(&inbound("vendorOrderDispatched", json!({ "id": "x" }))).unwrap();
        assert_eq!(a.kind, OrderEventKind::Dispatched);
        assert_eq!(b.kind, OrderEventKind::Dispatched);

        let c = decode_order_event(&inbound("vendorOrderDeclined", json!({}))).unwrap();
        assert_eq!(c.kind, OrderEventKind::Declined);
    }

    #[test]
    fn unrelated_events_are_ignored() {
        assert!(decode_order_event(&inbound("complaint_created", json!({ "id": "c1" }))).is_none());
    }

    #[test]
    fn message_falls_back_to_default_text() {
        let event = decode_order_event(&inbound(EVENT_DECLINED, json!({ "id": "x" }))).unwrap();
        assert_eq!(event.message, "A vendor order was declined");

        let event =
            decode_order_event(&inbound(EVENT_DECLINED, json!({ "id": "x", "message": "nope" })))
                .unwrap();
        assert_eq!(event.message, "nope");
    }
}
