//! Order fixtures handed to interpreters as the `order` binding.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub order_id: String,
    pub store_number: String,
    pub store_name: String,
    /// Epoch millis
    pub timestamp: i64,
    pub items: Vec<OrderItem>,
    pub subtotal: f64,
    pub tax_rate: f64,
    pub tax_amount: f64,
    pub total_amount: f64,
    #[serde(default)]
    pub item_promotions: Vec<ItemPromotion>,
    #[serde(default)]
    pub order_promotions: Vec<OrderPromotion>,
    #[serde(default)]
    pub customer_info: Option<CustomerInfo>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub split_payments: Vec<SplitPayment>,
    #[serde(default)]
    pub table_info: Option<TableInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub name: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub total_price: f64,
    pub sku: String,
    pub category: String,
    #[serde(default)]
    pub modifiers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemPromotion {
    pub item_sku: String,
    pub promotion_name: String,
    pub discount_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderPromotion {
    pub promotion_name: String,
    pub discount_amount: f64,
    /// `FIXED` or `PERCENTAGE`
    pub promotion_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub customer_id: String,
    pub name: String,
    pub member_status: String,
    pub loyalty_points: i64,
    pub member_since: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitPayment {
    pub payer_name: String,
    pub amount: f64,
    pub method: String,
    #[serde(default)]
    pub tip: f64,
    #[serde(default)]
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableInfo {
    pub table_number: String,
    pub server_name: String,
    pub guest_count: i64,
    pub service_rating: i64,
}

impl OrderItem {
    pub fn new(
        name: &str,
        quantity: i64,
        unit_price: f64,
        total_price: f64,
        sku: &str,
        category: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            quantity,
            unit_price,
            total_price,
            sku: sku.to_string(),
            category: category.to_string(),
            modifiers: Vec::new(),
        }
    }

    pub fn with_modifiers(mut self, modifiers: &[&str]) -> Self {
        self.modifiers = modifiers.iter().map(|m| m.to_string()).collect();
        self
    }
}

/// Lookup of the order used for a given round.
pub trait FixtureSource: Send + Sync {
    /// `None` when the round has no order (practice round or out of range).
    fn get_fixture(&self, round: u32) -> Option<Fixture>;
}
