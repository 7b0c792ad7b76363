//! Read models for the objects embedded in an envelope's `payload`.
//!
//! Only commonly used fields are typed. Everything else is kept in `extra`,
//! so nothing Razorpay sends is lost. Amounts are in the smallest currency
//! unit (paise for INR); timestamps are seconds since the Unix epoch.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::events::Category;

/// An embedded object with a fixed category key.
pub trait Entity: DeserializeOwned {
    const CATEGORY: Category;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub amount: Option<i64>,
    pub amount_paid: Option<i64>,
    pub amount_due: Option<i64>,
    pub currency: Option<String>,
    pub receipt: Option<String>,
    pub status: Option<String>,
    pub attempts: Option<u32>,
    pub created_at: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub amount: Option<i64>,
    pub currency: Option<String>,
    pub status: Option<String>,
    pub order_id: Option<String>,
    pub invoice_id: Option<String>,
    pub method: Option<String>,
    pub captured: Option<bool>,
    pub email: Option<String>,
    pub contact: Option<String>,
    pub error_code: Option<String>,
    pub error_description: Option<String>,
    pub created_at: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Refund {
    pub id: String,
    pub payment_id: Option<String>,
    pub amount: Option<i64>,
    pub currency: Option<String>,
    pub status: Option<String>,
    pub speed_processed: Option<String>,
    pub created_at: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dispute {
    pub id: String,
    pub payment_id: Option<String>,
    pub amount: Option<i64>,
    pub currency: Option<String>,
    pub reason_code: Option<String>,
    pub status: Option<String>,
    pub phase: Option<String>,
    pub respond_by: Option<i64>,
    pub created_at: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: String,
    pub order_id: Option<String>,
    pub payment_id: Option<String>,
    pub customer_id: Option<String>,
    pub subscription_id: Option<String>,
    pub status: Option<String>,
    pub amount: Option<i64>,
    pub amount_paid: Option<i64>,
    pub amount_due: Option<i64>,
    pub currency: Option<String>,
    pub short_url: Option<String>,
    pub paid_at: Option<i64>,
    pub expired_at: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    pub plan_id: Option<String>,
    pub customer_id: Option<String>,
    pub status: Option<String>,
    pub current_start: Option<i64>,
    pub current_end: Option<i64>,
    pub charge_at: Option<i64>,
    pub total_count: Option<i64>,
    pub paid_count: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub id: String,
    pub amount: Option<i64>,
    pub status: Option<String>,
    pub fees: Option<i64>,
    pub tax: Option<i64>,
    pub utr: Option<String>,
    pub created_at: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VirtualAccount {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub customer_id: Option<String>,
    pub status: Option<String>,
    pub amount_paid: Option<i64>,
    pub close_by: Option<i64>,
    pub closed_at: Option<i64>,
    pub created_at: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity for Order {
    const CATEGORY: Category = Category::Order;
}

impl Entity for Payment {
    const CATEGORY: Category = Category::Payment;
}

impl Entity for Refund {
    const CATEGORY: Category = Category::Refund;
}

impl Entity for Dispute {
    const CATEGORY: Category = Category::Dispute;
}

impl Entity for Invoice {
    const CATEGORY: Category = Category::Invoice;
}

impl Entity for Subscription {
    const CATEGORY: Category = Category::Subscription;
}

impl Entity for Settlement {
    const CATEGORY: Category = Category::Settlement;
}

impl Entity for VirtualAccount {
    const CATEGORY: Category = Category::VirtualAccount;
}
