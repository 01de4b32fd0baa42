use crate::domain::expense::Expense;
use crate::domain::policy::{Category, Policy};
use crate::domain::ports::{ExpenseStore, PolicyStore, UserStore};
use crate::domain::user::User;
use crate::error::{ExpenseError, Result};
use ::rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, IteratorMode, Options};
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;

/// Column Family for storing expense claims.
pub const CF_EXPENSES: &str = "expenses";
/// Column Family for storing category policies.
pub const CF_POLICIES: &str = "policies";
/// Column Family for storing users.
pub const CF_USERS: &str = "users";

/// A persistent store implementation using RocksDB.
///
/// Handles storage for `Expense`, `Policy` and `User` entities using separate
/// Column Families, with JSON-encoded values.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
}

fn internal(message: String) -> ExpenseError {
    ExpenseError::InternalError(Box::new(std::io::Error::other(message)))
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the required column families exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let families = [CF_EXPENSES, CF_POLICIES, CF_USERS]
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()));

        let db = DB::open_cf_descriptors(&opts, path, families)?;

        Ok(Self { db: Arc::new(db) })
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| internal(format!("Column family '{name}' not found")))
    }

    fn put<T: Serialize>(&self, family: &str, key: &[u8], value: &T) -> Result<()> {
        let cf = self.cf(family)?;
        let bytes = serde_json::to_vec(value)
            .map_err(|e| internal(format!("Serialization error: {e}")))?;
        self.db.put_cf(cf, key, bytes)?;
        Ok(())
    }

    fn read<T: DeserializeOwned>(&self, family: &str, key: &[u8]) -> Result<Option<T>> {
        let cf = self.cf(family)?;
        match self.db.get_cf(cf, key)? {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|e| internal(format!("Deserialization error: {e}"))),
            None => Ok(None),
        }
    }

    fn read_all<T: DeserializeOwned>(&self, family: &str) -> Result<Vec<T>> {
        let cf = self.cf(family)?;
        let mut values = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_key, value) = item?;
            let value = serde_json::from_slice(&value)
                .map_err(|e| internal(format!("Deserialization error: {e}")))?;
            values.push(value);
        }
        Ok(values)
    }
}

#[async_trait]
impl ExpenseStore for RocksDBStore {
    async fn store(&self, expense: Expense) -> Result<()> {
        self.put(CF_EXPENSES, &expense.id.to_be_bytes(), &expense)
    }

    async fn get(&self, expense_id: u32) -> Result<Option<Expense>> {
        self.read(CF_EXPENSES, &expense_id.to_be_bytes())
    }

    async fn exists(&self, expense_id: u32) -> Result<bool> {
        let cf = self.cf(CF_EXPENSES)?;
        // Check the key without deserializing the value
        Ok(self.db.get_pinned_cf(cf, expense_id.to_be_bytes())?.is_some())
    }

    async fn get_all(&self) -> Result<Vec<Expense>> {
        self.read_all(CF_EXPENSES)
    }
}

#[async_trait]
impl PolicyStore for RocksDBStore {
    async fn store(&self, policy: Policy) -> Result<()> {
        self.put(CF_POLICIES, policy.category.as_str().as_bytes(), &policy)
    }

    async fn get(&self, category: &Category) -> Result<Option<Policy>> {
        self.read(CF_POLICIES, category.as_str().as_bytes())
    }

    async fn remove(&self, category: &Category) -> Result<bool> {
        let cf = self.cf(CF_POLICIES)?;
        let key = category.as_str().as_bytes();
        if self.db.get_pinned_cf(cf, key)?.is_none() {
            return Ok(false);
        }
        self.db.delete_cf(cf, key)?;
        Ok(true)
    }

    async fn get_all(&self) -> Result<Vec<Policy>> {
        self.read_all(CF_POLICIES)
    }
}

#[async_trait]
impl UserStore for RocksDBStore {
    async fn store(&self, user: User) -> Result<()> {
        self.put(CF_USERS, &user.id.to_be_bytes(), &user)
    }

    async fn get(&self, user_id: u32) -> Result<Option<User>> {
        self.read(CF_USERS, &user_id.to_be_bytes())
    }
}
