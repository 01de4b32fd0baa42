use crate::domain::expense::Expense;
use crate::domain::notification::Notification;
use crate::domain::policy::{Category, Policy};
use crate::domain::ports::{ExpenseStore, Mailer, PolicyStore, UserStore};
use crate::domain::user::User;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory store for expense claims.
///
/// Uses `Arc<RwLock<HashMap<u32, Expense>>>` to allow shared concurrent access.
/// Ideal for testing or one-shot replays where persistence is not required.
#[derive(Default, Clone)]
pub struct InMemoryExpenseStore {
    expenses: Arc<RwLock<HashMap<u32, Expense>>>,
}

impl InMemoryExpenseStore {
    /// Creates a new, empty in-memory expense store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ExpenseStore for InMemoryExpenseStore {
    async fn store(&self, expense: Expense) -> Result<()> {
        let mut expenses = self.expenses.write().await;
        expenses.insert(expense.id, expense);
        Ok(())
    }

    async fn get(&self, expense_id: u32) -> Result<Option<Expense>> {
        let expenses = self.expenses.read().await;
        Ok(expenses.get(&expense_id).cloned())
    }

    async fn exists(&self, expense_id: u32) -> Result<bool> {
        let expenses = self.expenses.read().await;
        Ok(expenses.contains_key(&expense_id))
    }

    async fn get_all(&self) -> Result<Vec<Expense>> {
        let expenses = self.expenses.read().await;
        Ok(expenses.values().cloned().collect())
    }
}

/// In-memory category policies.
#[derive(Default, Clone)]
pub struct InMemoryPolicyStore {
    policies: Arc<RwLock<HashMap<Category, Policy>>>,
}

impl InMemoryPolicyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PolicyStore for InMemoryPolicyStore {
    async fn store(&self, policy: Policy) -> Result<()> {
        let mut policies = self.policies.write().await;
        policies.insert(policy.category.clone(), policy);
        Ok(())
    }

    async fn get(&self, category: &Category) -> Result<Option<Policy>> {
        let policies = self.policies.read().await;
        Ok(policies.get(category).cloned())
    }

    async fn remove(&self, category: &Category) -> Result<bool> {
        let mut policies = self.policies.write().await;
        Ok(policies.remove(category).is_some())
    }

    async fn get_all(&self) -> Result<Vec<Policy>> {
        let policies = self.policies.read().await;
        Ok(policies.values().cloned().collect())
    }
}

/// In-memory user directory.
#[derive(Default, Clone)]
pub struct InMemoryUserStore {
    users: Arc<RwLock<HashMap<u32, User>>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn store(&self, user: User) -> Result<()> {
        let mut users = self.users.write().await;
        users.insert(user.id, user);
        Ok(())
    }

    async fn get(&self, user_id: u32) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&user_id).cloned())
    }
}

/// Mailer that keeps every message in memory instead of delivering it.
///
/// Clones share the same outbox, so a test can hand one clone to the engine
/// and inspect the other.
#[derive(Default, Clone)]
pub struct Outbox {
    sent: Arc<RwLock<Vec<Notification>>>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn messages(&self) -> Vec<Notification> {
        self.sent.read().await.clone()
    }
}

#[async_trait]
impl Mailer for Outbox {
    async fn send(&self, notification: &Notification) -> Result<()> {
        self.sent.write().await.push(notification.clone());
        Ok(())
    }
}
