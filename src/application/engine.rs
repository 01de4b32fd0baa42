use super::command::Command;
use super::notifier::NotificationDispatcher;
use crate::domain::expense::{Expense, ExpenseStatus, ExpenseSubmission};
use crate::domain::money::Amount;
use crate::domain::notification::ExpenseEvent;
use crate::domain::payment::{OrderRequest, PaymentConfirmation, PaymentOrder};
use crate::domain::policy::{self, Category, Policy, PolicyDecision};
use crate::domain::ports::{ExpenseStoreBox, PaymentGatewayBox, PolicyStoreBox, UserStoreBox};
use crate::domain::user::{Role, User};
use crate::error::{ExpenseError, Result};
use crate::infrastructure::in_memory::{
    InMemoryExpenseStore, InMemoryPolicyStore, InMemoryUserStore,
};
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Storage backends the engine persists into.
pub struct Stores {
    pub expenses: ExpenseStoreBox,
    pub policies: PolicyStoreBox,
    pub users: UserStoreBox,
}

impl Stores {
    pub fn in_memory() -> Self {
        Self {
            expenses: Box::new(InMemoryExpenseStore::new()),
            policies: Box::new(InMemoryPolicyStore::new()),
            users: Box::new(InMemoryUserStore::new()),
        }
    }
}

/// The main entry point for the expense workflow.
///
/// `ExpenseEngine` evaluates submissions against category policies, drives
/// each claim through `pending -> approved | rejected -> paid`, notifies the
/// people involved, and talks to the payment gateway. Every read-modify-write
/// runs under one workflow lock, so two decisions on the same claim are
/// applied one after the other and the second sees the first's result.
pub struct ExpenseEngine {
    stores: Stores,
    notifier: NotificationDispatcher,
    gateway: PaymentGatewayBox,
    currency: String,
    workflow: Mutex<()>,
}

impl ExpenseEngine {
    /// Creates a new `ExpenseEngine` instance.
    ///
    /// # Arguments
    ///
    /// * `stores` - Persistence for expenses, policies and users.
    /// * `notifier` - Status-change mail dispatcher.
    /// * `gateway` - Payment gateway used for reimbursements.
    /// * `currency` - ISO currency code for payment orders.
    pub fn new(
        stores: Stores,
        notifier: NotificationDispatcher,
        gateway: PaymentGatewayBox,
        currency: &str,
    ) -> Self {
        Self {
            stores,
            notifier,
            gateway,
            currency: currency.to_string(),
            workflow: Mutex::new(()),
        }
    }

    /// Applies a single workflow command.
    pub async fn execute(&self, command: Command) -> Result<()> {
        match command {
            Command::RegisterAdmin { id, email } => {
                self.register_admin(id, &email).await?;
            }
            Command::RegisterManager { admin, id, email } => {
                self.register_manager(admin, id, &email).await?;
            }
            Command::DeactivateManager { admin, id } => {
                self.deactivate_manager(admin, id).await?;
            }
            Command::RegisterEmployee { id, manager, email } => {
                self.register_employee(id, manager, &email).await?;
            }
            Command::SetPolicy {
                admin,
                category,
                limit,
            } => {
                self.set_policy(admin, category, limit).await?;
            }
            Command::RemovePolicy { admin, category } => {
                self.remove_policy(admin, &category).await?;
            }
            Command::Submit {
                employee,
                submission,
            } => {
                self.submit(employee, submission).await?;
            }
            Command::Approve { manager, expense } => {
                self.approve(manager, expense).await?;
            }
            Command::Reject {
                manager,
                expense,
                reason,
            } => {
                self.reject(manager, expense, &reason).await?;
            }
            Command::InitiatePayment { manager, expense } => {
                self.initiate_payment(manager, expense).await?;
            }
            Command::VerifyPayment {
                expense,
                confirmation,
            } => {
                self.verify_payment(expense, confirmation).await?;
            }
        }
        Ok(())
    }

    async fn require_user(&self, user_id: u32) -> Result<User> {
        self.stores
            .users
            .get(user_id)
            .await?
            .ok_or(ExpenseError::UserNotFound(user_id))
    }

    async fn require_role(&self, user_id: u32, role: Role) -> Result<User> {
        let user = self.require_user(user_id).await?;
        if user.is_active_as(role) {
            Ok(user)
        } else {
            Err(ExpenseError::Unauthorized(format!(
                "user {user_id} is not an active {role}"
            )))
        }
    }

    async fn require_expense(&self, expense_id: u32) -> Result<Expense> {
        self.stores
            .expenses
            .get(expense_id)
            .await?
            .ok_or(ExpenseError::ExpenseNotFound(expense_id))
    }

    /// Checks that `manager_id` may decide on `expense` and returns the
    /// submitting employee.
    async fn authorize_reviewer(&self, manager_id: u32, expense: &Expense) -> Result<User> {
        self.require_role(manager_id, Role::Manager).await?;
        let employee = self.require_user(expense.employee).await?;
        if let Some(assigned) = employee.manager
            && assigned != manager_id
        {
            return Err(ExpenseError::Unauthorized(format!(
                "manager {manager_id} does not review claims of employee {}",
                employee.id
            )));
        }
        Ok(employee)
    }

    async fn notify_user(&self, user_id: u32, event: ExpenseEvent, expense: &Expense) {
        match self.stores.users.get(user_id).await {
            Ok(Some(user)) => {
                self.notifier.dispatch(event, expense, &user.email).await;
            }
            Ok(None) => {
                tracing::warn!(user = user_id, expense = expense.id, "no recipient for notification");
            }
            Err(e) => {
                tracing::warn!(user = user_id, expense = expense.id, error = %e, "recipient lookup failed");
            }
        }
    }

    /// Bootstraps an admin account.
    pub async fn register_admin(&self, id: u32, email: &str) -> Result<User> {
        let _guard = self.workflow.lock().await;
        if self.stores.users.get(id).await?.is_some() {
            return Err(ExpenseError::ValidationError(format!(
                "user {id} already exists"
            )));
        }
        let admin = User::new(id, email, Role::Admin)?;
        self.stores.users.store(admin.clone()).await?;
        tracing::info!(user = id, "admin registered");
        Ok(admin)
    }

    /// Creates a manager account, or reactivates a deactivated one.
    pub async fn register_manager(&self, admin: u32, id: u32, email: &str) -> Result<User> {
        let _guard = self.workflow.lock().await;
        self.require_role(admin, Role::Admin).await?;
        if let Some(existing) = self.stores.users.get(id).await?
            && existing.role != Role::Manager
        {
            return Err(ExpenseError::ValidationError(format!(
                "user {id} is already registered as {}",
                existing.role
            )));
        }
        let manager = User::new(id, email, Role::Manager)?;
        self.stores.users.store(manager.clone()).await?;
        tracing::info!(user = id, admin, "manager registered");
        Ok(manager)
    }

    /// Disables a manager account. An inactive manager can no longer decide
    /// on or pay claims.
    pub async fn deactivate_manager(&self, admin: u32, id: u32) -> Result<User> {
        let _guard = self.workflow.lock().await;
        self.require_role(admin, Role::Admin).await?;
        let mut manager = self.require_user(id).await?;
        if manager.role != Role::Manager {
            return Err(ExpenseError::ValidationError(format!(
                "user {id} is not a manager"
            )));
        }
        manager.active = false;
        self.stores.users.store(manager.clone()).await?;
        tracing::info!(user = id, admin, "manager deactivated");
        Ok(manager)
    }

    pub async fn register_employee(
        &self,
        id: u32,
        manager: Option<u32>,
        email: &str,
    ) -> Result<User> {
        let _guard = self.workflow.lock().await;
        if self.stores.users.get(id).await?.is_some() {
            return Err(ExpenseError::ValidationError(format!(
                "user {id} already exists"
            )));
        }
        if let Some(manager) = manager {
            self.require_role(manager, Role::Manager).await?;
        }
        let employee = User::new(id, email, Role::Employee)?.with_manager(manager);
        self.stores.users.store(employee.clone()).await?;
        tracing::info!(user = id, manager = ?manager, "employee registered");
        Ok(employee)
    }

    /// Creates or replaces the spending limit for `category`.
    pub async fn set_policy(&self, admin: u32, category: Category, limit: Amount) -> Result<Policy> {
        let _guard = self.workflow.lock().await;
        self.require_role(admin, Role::Admin).await?;
        let policy = Policy::new(category, limit);
        self.stores.policies.store(policy.clone()).await?;
        tracing::info!(category = %policy.category, limit = %policy.limit, "policy set");
        Ok(policy)
    }

    pub async fn remove_policy(&self, admin: u32, category: &Category) -> Result<()> {
        let _guard = self.workflow.lock().await;
        self.require_role(admin, Role::Admin).await?;
        if !self.stores.policies.remove(category).await? {
            return Err(ExpenseError::PolicyNotFound(category.to_string()));
        }
        tracing::info!(category = %category, "policy removed");
        Ok(())
    }

    /// Records a new claim.
    ///
    /// Claims over their category's limit are stored as rejected and the
    /// employee is told why; the call still succeeds. Other claims are stored
    /// as pending and the employee's manager is asked to review them.
    pub async fn submit(&self, employee_id: u32, submission: ExpenseSubmission) -> Result<Expense> {
        let guard = self.workflow.lock().await;
        let employee = self.require_role(employee_id, Role::Employee).await?;
        if self.stores.expenses.exists(submission.id).await? {
            return Err(ExpenseError::DuplicateExpense(submission.id));
        }

        let category_policy = self.stores.policies.get(&submission.category).await?;
        let decision = policy::evaluate(category_policy.as_ref(), submission.amount);
        tracing::debug!(expense = submission.id, ?decision, "policy evaluated");

        let mut expense = Expense::new(employee_id, submission);
        let event = match decision {
            PolicyDecision::ExceedsLimit { limit, excess } => {
                let reason = format!(
                    "exceeds the {} limit of {limit} by {excess}",
                    expense.category
                );
                expense.reject(None, &reason)?;
                Some(ExpenseEvent::PolicyRejected { limit })
            }
            PolicyDecision::Unrestricted | PolicyDecision::WithinLimit { .. } => None,
        };
        self.stores.expenses.store(expense.clone()).await?;
        drop(guard);

        tracing::info!(
            expense = expense.id,
            employee = employee_id,
            amount = %expense.amount,
            status = %expense.status,
            "expense submitted"
        );
        match (event, employee.manager) {
            (Some(event), _) => self.notify_user(employee_id, event, &expense).await,
            (None, Some(manager)) => {
                self.notify_user(manager, ExpenseEvent::Submitted, &expense)
                    .await;
            }
            (None, None) => {}
        }
        Ok(expense)
    }

    pub async fn approve(&self, manager: u32, expense_id: u32) -> Result<Expense> {
        let guard = self.workflow.lock().await;
        let mut expense = self.require_expense(expense_id).await?;
        let employee = self.authorize_reviewer(manager, &expense).await?;
        expense.approve(manager)?;
        self.stores.expenses.store(expense.clone()).await?;
        drop(guard);

        tracing::info!(expense = expense_id, manager, "expense approved");
        self.notifier
            .dispatch(ExpenseEvent::Approved, &expense, &employee.email)
            .await;
        Ok(expense)
    }

    pub async fn reject(&self, manager: u32, expense_id: u32, reason: &str) -> Result<Expense> {
        let guard = self.workflow.lock().await;
        let mut expense = self.require_expense(expense_id).await?;
        let employee = self.authorize_reviewer(manager, &expense).await?;
        expense.reject(Some(manager), reason)?;
        self.stores.expenses.store(expense.clone()).await?;
        drop(guard);

        tracing::info!(expense = expense_id, manager, "expense rejected");
        let reason = expense.rejection_reason.clone().unwrap_or_default();
        self.notifier
            .dispatch(ExpenseEvent::Rejected { reason }, &expense, &employee.email)
            .await;
        Ok(expense)
    }

    /// Creates a gateway order for an approved claim.
    ///
    /// Calling this again for a claim that already has an order returns that
    /// order without contacting the gateway.
    ///
    /// The workflow lock is held across the gateway call, so other commands
    /// wait for order creation (bounded by the gateway's request timeout).
    pub async fn initiate_payment(&self, manager: u32, expense_id: u32) -> Result<PaymentOrder> {
        let _guard = self.workflow.lock().await;
        let mut expense = self.require_expense(expense_id).await?;
        self.authorize_reviewer(manager, &expense).await?;
        if expense.status != ExpenseStatus::Approved {
            return Err(ExpenseError::InvalidTransition {
                id: expense_id,
                from: expense.status,
                action: "pay",
            });
        }
        if let Some(payment) = &expense.payment {
            tracing::debug!(expense = expense_id, order = %payment.order.order_id, "payment order already exists");
            return Ok(payment.order.clone());
        }

        let request = OrderRequest {
            amount: expense.amount.to_minor_units()?,
            currency: self.currency.clone(),
            receipt: OrderRequest::receipt_for(expense_id),
        };
        let order = self.gateway.create_order(&request).await?;
        expense.attach_order(order.clone())?;
        self.stores.expenses.store(expense).await?;

        tracing::info!(expense = expense_id, manager, order = %order.order_id, "payment initiated");
        Ok(order)
    }

    /// Settles a claim once the gateway confirms its order was paid.
    pub async fn verify_payment(
        &self,
        expense_id: u32,
        confirmation: PaymentConfirmation,
    ) -> Result<Expense> {
        let guard = self.workflow.lock().await;
        let mut expense = self.require_expense(expense_id).await?;
        if expense.status != ExpenseStatus::Approved {
            return Err(ExpenseError::InvalidTransition {
                id: expense_id,
                from: expense.status,
                action: "settle",
            });
        }
        if expense.order_id() != Some(confirmation.order_id.as_str()) {
            return Err(ExpenseError::ValidationError(format!(
                "order {} does not belong to expense {expense_id}",
                confirmation.order_id
            )));
        }
        if !self.gateway.verify(&confirmation) {
            tracing::warn!(expense = expense_id, order = %confirmation.order_id, "payment signature rejected");
            return Err(ExpenseError::PaymentVerificationFailed(expense_id));
        }
        expense.mark_paid(&confirmation.payment_id)?;
        self.stores.expenses.store(expense.clone()).await?;
        drop(guard);

        tracing::info!(expense = expense_id, payment = %confirmation.payment_id, "expense paid");
        let event = ExpenseEvent::Paid {
            payment_id: confirmation.payment_id,
        };
        self.notify_user(expense.employee, event, &expense).await;
        Ok(expense)
    }

    pub async fn expense(&self, expense_id: u32) -> Result<Option<Expense>> {
        self.stores.expenses.get(expense_id).await
    }

    /// All claims, ordered by id.
    pub async fn expenses(&self) -> Result<Vec<Expense>> {
        let mut expenses = self.stores.expenses.get_all().await?;
        expenses.sort_by_key(|e| e.id);
        Ok(expenses)
    }

    pub async fn expenses_for_employee(&self, employee: u32) -> Result<Vec<Expense>> {
        let mut expenses = self.expenses().await?;
        expenses.retain(|e| e.employee == employee);
        Ok(expenses)
    }

    /// Pending claims whose submitter reports to `manager`.
    pub async fn pending_for_manager(&self, manager: u32) -> Result<Vec<Expense>> {
        let mut reports_to: HashMap<u32, Option<u32>> = HashMap::new();
        let mut pending = Vec::new();
        for expense in self.expenses().await? {
            if expense.status != ExpenseStatus::Pending {
                continue;
            }
            let assigned = match reports_to.get(&expense.employee) {
                Some(assigned) => *assigned,
                None => {
                    let assigned = self
                        .stores
                        .users
                        .get(expense.employee)
                        .await?
                        .and_then(|u| u.manager);
                    reports_to.insert(expense.employee, assigned);
                    assigned
                }
            };
            if assigned == Some(manager) {
                pending.push(expense);
            }
        }
        Ok(pending)
    }

    /// Configured policies, ordered by category.
    pub async fn policies(&self) -> Result<Vec<Policy>> {
        let mut policies = self.stores.policies.get_all().await?;
        policies.sort_by(|a, b| a.category.cmp(&b.category));
        Ok(policies)
    }
}
