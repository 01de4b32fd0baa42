use super::expense::Expense;
use super::notification::Notification;
use super::payment::{OrderRequest, PaymentConfirmation, PaymentOrder};
use super::policy::{Category, Policy};
use super::user::User;
use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait ExpenseStore: Send + Sync {
    async fn store(&self, expense: Expense) -> Result<()>;
    async fn get(&self, expense_id: u32) -> Result<Option<Expense>>;
    async fn exists(&self, expense_id: u32) -> Result<bool>;
    async fn get_all(&self) -> Result<Vec<Expense>>;
}

#[async_trait]
pub trait PolicyStore: Send + Sync {
    async fn store(&self, policy: Policy) -> Result<()>;
    async fn get(&self, category: &Category) -> Result<Option<Policy>>;
    /// Returns `false` when no policy existed for `category`.
    async fn remove(&self, category: &Category) -> Result<bool>;
    async fn get_all(&self) -> Result<Vec<Policy>>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn store(&self, user: User) -> Result<()>;
    async fn get(&self, user_id: u32) -> Result<Option<User>>;
}

/// Mail transport.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<()>;
}

/// Third-party payment gateway.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_order(&self, request: &OrderRequest) -> Result<PaymentOrder>;
    /// Checks the gateway's signature over the confirmation.
    fn verify(&self, confirmation: &PaymentConfirmation) -> bool;
}

pub type ExpenseStoreBox = Box<dyn ExpenseStore>;
pub type PolicyStoreBox = Box<dyn PolicyStore>;
pub type UserStoreBox = Box<dyn UserStore>;
pub type MailerBox = Box<dyn Mailer>;
pub type PaymentGatewayBox = Box<dyn PaymentGateway>;
