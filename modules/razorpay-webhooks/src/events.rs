//! The closed set of webhook events and the entity categories they belong to.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WebhookError;

// --- Entity categories ---

/// Groups related events. The snake_case name doubles as the key of the
/// embedded object in the envelope's `payload` map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Order,
    Payment,
    Refund,
    Dispute,
    Invoice,
    Subscription,
    Settlement,
    VirtualAccount,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Self::Order,
        Self::Payment,
        Self::Refund,
        Self::Dispute,
        Self::Invoice,
        Self::Subscription,
        Self::Settlement,
        Self::VirtualAccount,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Order => "order",
            Self::Payment => "payment",
            Self::Refund => "refund",
            Self::Dispute => "dispute",
            Self::Invoice => "invoice",
            Self::Subscription => "subscription",
            Self::Settlement => "settlement",
            Self::VirtualAccount => "virtual_account",
        }
    }

    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "order" => Some(Self::Order),
            "payment" => Some(Self::Payment),
            "refund" => Some(Self::Refund),
            "dispute" => Some(Self::Dispute),
            "invoice" => Some(Self::Invoice),
            "subscription" => Some(Self::Subscription),
            "settlement" => Some(Self::Settlement),
            "virtual_account" => Some(Self::VirtualAccount),
            _ => None,
        }
    }

    /// Events belonging to this category, in declaration order.
    pub fn events(&self) -> impl Iterator<Item = EventType> + '_ {
        EventType::ALL
            .into_iter()
            .filter(move |event| event.category() == *self)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Event types ---

/// Every event the router understands. Anything else arriving on the wire is
/// reported as unsupported at dispatch time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventType {
    #[serde(rename = "order.paid")]
    OrderPaid,
    #[serde(rename = "payment.authorized")]
    PaymentAuthorized,
    #[serde(rename = "payment.captured")]
    PaymentCaptured,
    #[serde(rename = "payment.failed")]
    PaymentFailed,
    #[serde(rename = "refund.created")]
    RefundCreated,
    #[serde(rename = "payment.dispute.created")]
    DisputeCreated,
    #[serde(rename = "payment.dispute.won")]
    DisputeWon,
    #[serde(rename = "payment.dispute.lost")]
    DisputeLost,
    #[serde(rename = "payment.dispute.closed")]
    DisputeClosed,
    #[serde(rename = "invoice.partially_paid")]
    InvoicePartiallyPaid,
    #[serde(rename = "invoice.paid")]
    InvoicePaid,
    #[serde(rename = "invoice.expired")]
    InvoiceExpired,
    #[serde(rename = "subscription.activated")]
    SubscriptionActivated,
    #[serde(rename = "subscription.charged")]
    SubscriptionCharged,
    #[serde(rename = "subscription.completed")]
    SubscriptionCompleted,
    #[serde(rename = "subscription.updated")]
    SubscriptionUpdated,
    #[serde(rename = "subscription.pending")]
    SubscriptionPending,
    #[serde(rename = "subscription.halted")]
    SubscriptionHalted,
    #[serde(rename = "subscription.cancelled")]
    SubscriptionCancelled,
    #[serde(rename = "settlement.processed")]
    SettlementProcessed,
    #[serde(rename = "virtual_account.created")]
    VirtualAccountCreated,
    #[serde(rename = "virtual_account.credited")]
    VirtualAccountCredited,
    #[serde(rename = "virtual_account.closed")]
    VirtualAccountClosed,
}

impl EventType {
    pub const COUNT: usize = 23;

    pub const ALL: [EventType; Self::COUNT] = [
        Self::OrderPaid,
        Self::PaymentAuthorized,
        Self::PaymentCaptured,
        Self::PaymentFailed,
        Self::RefundCreated,
        Self::DisputeCreated,
        Self::DisputeWon,
        Self::DisputeLost,
        Self::DisputeClosed,
        Self::InvoicePartiallyPaid,
        Self::InvoicePaid,
        Self::InvoiceExpired,
        Self::SubscriptionActivated,
        Self::SubscriptionCharged,
        Self::SubscriptionCompleted,
        Self::SubscriptionUpdated,
        Self::SubscriptionPending,
        Self::SubscriptionHalted,
        Self::SubscriptionCancelled,
        Self::SettlementProcessed,
        Self::VirtualAccountCreated,
        Self::VirtualAccountCredited,
        Self::VirtualAccountClosed,
    ];

    /// Parse the wire form (e.g. `"payment.captured"`). Exact match only.
    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "order.paid" => Some(Self::OrderPaid),
            "payment.authorized" => Some(Self::PaymentAuthorized),
            "payment.captured" => Some(Self::PaymentCaptured),
            "payment.failed" => Some(Self::PaymentFailed),
            "refund.created" => Some(Self::RefundCreated),
            "payment.dispute.created" => Some(Self::DisputeCreated),
            "payment.dispute.won" => Some(Self::DisputeWon),
            "payment.dispute.lost" => Some(Self::DisputeLost),
            "payment.dispute.closed" => Some(Self::DisputeClosed),
            "invoice.partially_paid" => Some(Self::InvoicePartiallyPaid),
            "invoice.paid" => Some(Self::InvoicePaid),
            "invoice.expired" => Some(Self::InvoiceExpired),
            "subscription.activated" => Some(Self::SubscriptionActivated),
            "subscription.charged" => Some(Self::SubscriptionCharged),
            "subscription.completed" => Some(Self::SubscriptionCompleted),
            "subscription.updated" => Some(Self::SubscriptionUpdated),
            "subscription.pending" => Some(Self::SubscriptionPending),
            "subscription.halted" => Some(Self::SubscriptionHalted),
            "subscription.cancelled" => Some(Self::SubscriptionCancelled),
            "settlement.processed" => Some(Self::SettlementProcessed),
            "virtual_account.created" => Some(Self::VirtualAccountCreated),
            "virtual_account.credited" => Some(Self::VirtualAccountCredited),
            "virtual_account.closed" => Some(Self::VirtualAccountClosed),
            _ => None,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OrderPaid => "order.paid",
            Self::PaymentAuthorized => "payment.authorized",
            Self::PaymentCaptured => "payment.captured",
            Self::PaymentFailed => "payment.failed",
            Self::RefundCreated => "refund.created",
            Self::DisputeCreated => "payment.dispute.created",
            Self::DisputeWon => "payment.dispute.won",
            Self::DisputeLost => "payment.dispute.lost",
            Self::DisputeClosed => "payment.dispute.closed",
            Self::InvoicePartiallyPaid => "invoice.partially_paid",
            Self::InvoicePaid => "invoice.paid",
            Self::InvoiceExpired => "invoice.expired",
            Self::SubscriptionActivated => "subscription.activated",
            Self::SubscriptionCharged => "subscription.charged",
            Self::SubscriptionCompleted => "subscription.completed",
            Self::SubscriptionUpdated => "subscription.updated",
            Self::SubscriptionPending => "subscription.pending",
            Self::SubscriptionHalted => "subscription.halted",
            Self::SubscriptionCancelled => "subscription.cancelled",
            Self::SettlementProcessed => "settlement.processed",
            Self::VirtualAccountCreated => "virtual_account.created",
            Self::VirtualAccountCredited => "virtual_account.credited",
            Self::VirtualAccountClosed => "virtual_account.closed",
        }
    }

    pub const fn category(&self) -> Category {
        match self {
            Self::OrderPaid => Category::Order,
            Self::PaymentAuthorized | Self::PaymentCaptured | Self::PaymentFailed => {
                Category::Payment
            }
            Self::RefundCreated => Category::Refund,
            Self::DisputeCreated | Self::DisputeWon | Self::DisputeLost | Self::DisputeClosed => {
                Category::Dispute
            }
            Self::InvoicePartiallyPaid | Self::InvoicePaid | Self::InvoiceExpired => {
                Category::Invoice
            }
            Self::SubscriptionActivated
            | Self::SubscriptionCharged
            | Self::SubscriptionCompleted
            | Self::SubscriptionUpdated
            | Self::SubscriptionPending
            | Self::SubscriptionHalted
            | Self::SubscriptionCancelled => Category::Subscription,
            Self::SettlementProcessed => Category::Settlement,
            Self::VirtualAccountCreated
            | Self::VirtualAccountCredited
            | Self::VirtualAccountClosed => Category::VirtualAccount,
        }
    }

    /// The occurrence within the category: the last dot-separated segment of
    /// the wire form (`"won"` for `payment.dispute.won`).
    pub fn sub_event(&self) -> &'static str {
        let s = self.as_str();
        match s.rfind('.') {
            Some(idx) => &s[idx + 1..],
            None => s,
        }
    }

    /// Resolve a (category, sub-event) key. `None` outside the closed key space.
    pub fn from_parts(category: Category, sub_event: &str) -> Option<Self> {
        category.events().find(|event| event.sub_event() == sub_event)
    }

    /// Stable slot index in `0..COUNT`, matching the order of `ALL`.
    pub(crate) const fn index(&self) -> usize {
        *self as usize
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = WebhookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s).ok_or_else(|| WebhookError::UnsupportedEvent(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_event_round_trips_through_its_wire_string() {
        for event in EventType::ALL {
            assert_eq!(EventType::parse_str(event.as_str()), Some(event));
        }
    }

    #[test]
    fn slot_index_matches_declaration_order() {
        for (i, event) in EventType::ALL.iter().enumerate() {
            assert_eq!(event.index(), i);
        }
    }

    #[test]
    fn dispute_events_live_under_payment_prefix() {
        assert_eq!(EventType::DisputeWon.as_str(), "payment.dispute.won");
        assert_eq!(EventType::DisputeWon.category(), Category::Dispute);
        assert_eq!(EventType::DisputeWon.sub_event(), "won");
    }

    #[test]
    fn from_parts_resolves_only_known_keys() {
        assert_eq!(
            EventType::from_parts(Category::Invoice, "partially_paid"),
            Some(EventType::InvoicePartiallyPaid)
        );
        assert_eq!(
            EventType::from_parts(Category::VirtualAccount, "credited"),
            Some(EventType::VirtualAccountCredited)
        );
        assert_eq!(EventType::from_parts(Category::Refund, "processed"), None);
        assert_eq!(EventType::from_parts(Category::Order, "captured"), None);
    }

    #[test]
    fn parse_is_exact() {
        assert_eq!(EventType::parse_str("Payment.Captured"), None);
        assert_eq!(EventType::parse_str("payment.captured "), None);
        assert_eq!(EventType::parse_str("unknown.event"), None);
        assert!(matches!(
            "refund.processed".parse::<EventType>(),
            Err(WebhookError::UnsupportedEvent(s)) if s == "refund.processed"
        ));
    }

    #[test]
    fn category_event_counts() {
        let count = |c: Category| c.events().count();
        assert_eq!(count(Category::Order), 1);
        assert_eq!(count(Category::Payment), 3);
        assert_eq!(count(Category::Refund), 1);
        assert_eq!(count(Category::Dispute), 4);
        assert_eq!(count(Category::Invoice), 3);
        assert_eq!(count(Category::Subscription), 7);
        assert_eq!(count(Category::Settlement), 1);
        assert_eq!(count(Category::VirtualAccount), 3);
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&EventType::SubscriptionHalted).unwrap();
        assert_eq!(json, "\"subscription.halted\"");
        let category: Category = serde_json::from_str("\"virtual_account\"").unwrap();
        assert_eq!(category, Category::VirtualAccount);
    }
}
