//! API surface tests: registration styles, table inspection, typed entities.

use std::sync::Arc;

use razorpay_webhooks::{
    Category, EventDispatcher, EventPayload, EventType, Handler, HandlerRegistry, Payment,
    Subscription,
};
use serde_json::{json, Value};

const SUBSCRIPTION_CHARGED: &str = r#"{
  "entity": "event",
  "account_id": "acc_BFQ7uQEaa7j2z7",
  "event": "subscription.charged",
  "contains": ["subscription", "payment"],
  "payload": {
    "subscription": {
      "entity": {
        "id": "sub_8RlLljfA4AnDVx",
        "entity": "subscription",
        "plan_id": "plan_8RlLM6RSkpS3Zc",
        "customer_id": "cust_8RlLkTtMhRvc5x",
        "status": "active",
        "current_start": 1516069800,
        "current_end": 1518748200,
        "charge_at": 1518748200,
        "total_count": 6,
        "paid_count": 1,
        "remaining_count": 5,
        "notes": []
      }
    },
    "payment": {
      "entity": {
        "id": "pay_8RlLljfA4AnDVx",
        "entity": "payment",
        "amount": 100000,
        "currency": "INR",
        "status": "captured",
        "invoice_id": "inv_8RlLljfA4AnDVx",
        "method": "card",
        "captured": true,
        "created_at": 1516069825
      }
    }
  },
  "created_at": 1516069825
}"#;

#[tokio::test]
async fn subscription_charge_exposes_both_entities() {
    let dispatcher: EventDispatcher =
        EventDispatcher::from_slice(SUBSCRIPTION_CHARGED.as_bytes()).unwrap();

    dispatcher.handler().on_subscription_charged(|event| async move {
        let subscription: Subscription = event.typed_entity()?.expect("subscription entity");
        let payment: Payment = event.typed_entity()?.expect("payment entity");
        Ok::<_, anyhow::Error>(json!({
            "subscription": subscription.id,
            "paid_count": subscription.paid_count,
            "payment": payment.id,
            "amount": payment.amount,
            "remaining": subscription.extra.get("remaining_count").cloned(),
        }))
    });

    let outcome = dispatcher.execute().await.unwrap();
    assert_eq!(
        outcome,
        json!({
            "subscription": "sub_8RlLljfA4AnDVx",
            "paid_count": 1,
            "payment": "pay_8RlLljfA4AnDVx",
            "amount": 100000,
            "remaining": 5,
        })
    );
}

#[test]
fn envelope_helpers() {
    let payload = EventPayload::from_slice(SUBSCRIPTION_CHARGED.as_bytes()).unwrap();
    assert_eq!(payload.event().unwrap(), EventType::SubscriptionCharged);
    assert!(payload.contains(Category::Subscription));
    assert!(payload.contains(Category::Payment));
    assert!(!payload.contains(Category::Invoice));
    assert_eq!(
        payload.created_at_utc().unwrap().to_rfc3339(),
        "2018-01-16T02:30:25+00:00"
    );
}

#[tokio::test]
async fn string_keyed_and_typed_registration_hit_the_same_slot() {
    let registry: Arc<HandlerRegistry> = Arc::new(HandlerRegistry::new());

    registry
        .register_parts(
            "dispute",
            "lost",
            Handler::new(|_| async { Ok(json!("by parts")) }),
        )
        .unwrap();
    assert!(!registry.handler(EventType::DisputeLost).is_noop());

    let payload = EventPayload::builder()
        .event_type("payment.dispute.lost")
        .build();
    let dispatcher = EventDispatcher::with_registry(payload.clone(), registry.clone());
    assert_eq!(dispatcher.execute().await.unwrap(), json!("by parts"));

    registry.register(
        EventType::DisputeLost,
        Handler::new(|_| async { Ok(json!("typed")) }),
    );
    let dispatcher = EventDispatcher::with_registry(payload, registry);
    assert_eq!(dispatcher.execute().await.unwrap(), json!("typed"));
}

#[test]
fn handlers_table_groups_by_category() {
    let registry: HandlerRegistry = HandlerRegistry::new();
    registry
        .on_payment_captured(|_| async { Ok(Value::Null) })
        .on_payment_dispute_closed(|_| async { Ok(Value::Null) })
        .on_virtual_account_closed(|_| async { Ok(Value::Null) });

    let table = registry.handlers();

    let payment: Vec<&str> = table.category(Category::Payment).map(|(name, _)| name).collect();
    assert_eq!(payment, vec!["authorized", "captured", "failed"]);

    let dispute: Vec<&str> = table
        .category(Category::Dispute)
        .filter(|(_, h)| !h.is_noop())
        .map(|(name, _)| name)
        .collect();
    assert_eq!(dispute, vec!["closed"]);

    assert_eq!(
        table.registered(),
        vec![
            EventType::PaymentCaptured,
            EventType::DisputeClosed,
            EventType::VirtualAccountClosed,
        ]
    );

    let total: usize = Category::ALL
        .iter()
        .map(|c| table.category(*c).count())
        .sum();
    assert_eq!(total, EventType::COUNT);
}
