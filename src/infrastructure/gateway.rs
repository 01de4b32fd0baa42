//! Payment gateway adapters.
//!
//! Both adapters share the same confirmation scheme: the gateway signs
//! `"<order_id>|<payment_id>"` with HMAC-SHA256 under the merchant's key
//! secret and hands back the hex digest.

use crate::domain::payment::{OrderRequest, PaymentConfirmation, PaymentOrder};
use crate::domain::ports::PaymentGateway;
use crate::error::{ExpenseError, Result};
use async_trait::async_trait;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use std::time::Duration;

type HmacSha256 = Hmac<Sha256>;

const REQUEST_TIMEOUT_SECS: u64 = 30;
const CONNECT_TIMEOUT_SECS: u64 = 10;

fn payment_mac(secret: &str, order_id: &str, payment_id: &str) -> Result<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| ExpenseError::InternalError(e.to_string().into()))?;
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());
    Ok(mac)
}

/// Hex signature the gateway attaches to a completed payment.
pub fn sign_payment(secret: &str, order_id: &str, payment_id: &str) -> Result<String> {
    let mac = payment_mac(secret, order_id, payment_id)?;
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Constant-time check of a confirmation's signature.
pub fn verify_signature(secret: &str, confirmation: &PaymentConfirmation) -> bool {
    let Ok(expected) = hex::decode(confirmation.signature.trim()) else {
        return false;
    };
    match payment_mac(secret, &confirmation.order_id, &confirmation.payment_id) {
        Ok(mac) => mac.verify_slice(&expected).is_ok(),
        Err(_) => false,
    }
}

#[derive(Debug, Deserialize)]
struct OrderResponse {
    id: String,
    amount: i64,
    currency: String,
}

impl From<OrderResponse> for PaymentOrder {
    fn from(response: OrderResponse) -> Self {
        Self {
            order_id: response.id,
            amount: response.amount,
            currency: response.currency,
        }
    }
}

/// Client for an orders REST API authenticated with key id / key secret.
pub struct HttpPaymentGateway {
    http: reqwest::Client,
    base_url: String,
    key_id: String,
    key_secret: String,
}

impl HttpPaymentGateway {
    pub fn new(base_url: &str, key_id: &str, key_secret: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| ExpenseError::GatewayError(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            key_id: key_id.to_string(),
            key_secret: key_secret.to_string(),
        })
    }

    fn orders_url(&self) -> String {
        format!("{}/orders", self.base_url)
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn create_order(&self, request: &OrderRequest) -> Result<PaymentOrder> {
        let response = self
            .http
            .post(self.orders_url())
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(request)
            .send()
            .await
            .map_err(|e| ExpenseError::GatewayError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExpenseError::GatewayError(format!(
                "order creation returned {status}: {body}"
            )));
        }

        let order: OrderResponse = response
            .json()
            .await
            .map_err(|e| ExpenseError::GatewayError(e.to_string()))?;
        Ok(order.into())
    }

    fn verify(&self, confirmation: &PaymentConfirmation) -> bool {
        verify_signature(&self.key_secret, confirmation)
    }
}

/// Offline gateway with deterministic order ids (`order_<receipt>`).
///
/// Signatures use the same scheme as the real gateway, so confirmations
/// produced with [`sign_payment`] and the same secret verify.
pub struct SandboxGateway {
    key_secret: String,
}

impl SandboxGateway {
    pub fn new(key_secret: &str) -> Self {
        Self {
            key_secret: key_secret.to_string(),
        }
    }

    pub fn order_id_for(receipt: &str) -> String {
        format!("order_{receipt}")
    }
}

#[async_trait]
impl PaymentGateway for SandboxGateway {
    async fn create_order(&self, request: &OrderRequest) -> Result<PaymentOrder> {
        tracing::debug!(receipt = %request.receipt, amount = request.amount, "sandbox order created");
        Ok(PaymentOrder {
            order_id: Self::order_id_for(&request.receipt),
            amount: request.amount,
            currency: request.currency.clone(),
        })
    }

    fn verify(&self, confirmation: &PaymentConfirmation) -> bool {
        verify_signature(&self.key_secret, confirmation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn confirmation(signature: String) -> PaymentConfirmation {
        PaymentConfirmation {
            order_id: "order_expense-1".to_string(),
            payment_id: "pay_1".to_string(),
            signature,
        }
    }

    #[test]
    fn test_sign_payment_is_hex_sha256() {
        let signature = sign_payment("secret", "order_expense-1", "pay_1").unwrap();
        assert_eq!(signature.len(), 64);
        assert!(signature.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_verify_signature_accepts_valid() {
        let signature = sign_payment("secret", "order_expense-1", "pay_1").unwrap();
        assert!(verify_signature("secret", &confirmation(signature)));
    }

    #[test]
    fn test_verify_signature_rejects_tampering() {
        let signature = sign_payment("secret", "order_expense-1", "pay_2").unwrap();
        assert!(!verify_signature("secret", &confirmation(signature)));

        let signature = sign_payment("other", "order_expense-1", "pay_1").unwrap();
        assert!(!verify_signature("secret", &confirmation(signature)));

        assert!(!verify_signature("secret", &confirmation("not-hex".to_string())));
    }

    #[tokio::test]
    async fn test_sandbox_order_ids_are_deterministic() {
        let gateway = SandboxGateway::new("secret");
        let request = OrderRequest {
            amount: 12050,
            currency: "INR".to_string(),
            receipt: OrderRequest::receipt_for(1),
        };
        let order = gateway.create_order(&request).await.unwrap();
        assert_eq!(order.order_id, "order_expense-1");
        assert_eq!(order.amount, 12050);
        assert_eq!(order.currency, "INR");
    }

    #[test]
    fn test_order_request_body() {
        let request = OrderRequest {
            amount: 500,
            currency: "INR".to_string(),
            receipt: "expense-4".to_string(),
        };
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"amount": 500, "currency": "INR", "receipt": "expense-4"})
        );
    }

    #[test]
    fn test_order_response_parsing() {
        let json = r#"{"id":"order_abc","entity":"order","amount":500,"currency":"INR","status":"created"}"#;
        let response: OrderResponse = serde_json::from_str(json).unwrap();
        let order: PaymentOrder = response.into();
        assert_eq!(order.order_id, "order_abc");
        assert_eq!(order.amount, 500);
    }

    #[test]
    fn test_http_gateway_trims_base_url() {
        let gateway = HttpPaymentGateway::new("https://gateway.example/v1/", "key", "secret").unwrap();
        assert_eq!(gateway.orders_url(), "https://gateway.example/v1/orders");
    }
}
