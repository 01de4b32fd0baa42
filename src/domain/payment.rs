use serde::{Deserialize, Serialize};

/// What the engine asks the gateway to collect.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRequest {
    /// Amount in the currency's minor unit.
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
}

impl OrderRequest {
    pub fn receipt_for(expense_id: u32) -> String {
        format!("expense-{expense_id}")
    }
}

/// An order created by the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentOrder {
    pub order_id: String,
    pub amount: i64,
    pub currency: String,
}

/// Signed confirmation the gateway hands back once the payer completes an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentConfirmation {
    pub order_id: String,
    pub payment_id: String,
    pub signature: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Created,
    Captured,
}

/// Payment state attached to an approved expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub order: PaymentOrder,
    pub status: PaymentStatus,
    pub payment_id: Option<String>,
}

impl PaymentRecord {
    pub fn created(order: PaymentOrder) -> Self {
        Self {
            order,
            status: PaymentStatus::Created,
            payment_id: None,
        }
    }
}
