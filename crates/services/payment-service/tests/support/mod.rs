//! Shared fixtures: a Unit of Work over arbitrary repositories and a
//! stateful in-memory store with the same conditional-update semantics as
//! the database.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{
    Actor, Payment, PaymentDecision, PaymentStats, Profile, SubmitPayment, SubscriptionTier,
    UserRole, METHOD_BANK_TRANSFER,
};
use payment_service_lib::infra::{TransactionContext, TxFuture, UnitOfWork};
use payment_service_lib::repository::{
    PaymentFilter, PaymentRepository, ProfileRepository, SortOrder,
};

/// Unit of Work over injected repositories; transactions are unsupported.
pub struct TestUnitOfWork {
    payments: Arc<dyn PaymentRepository>,
    profiles: Arc<dyn ProfileRepository>,
}

impl TestUnitOfWork {
    pub fn new(payments: Arc<dyn PaymentRepository>, profiles: Arc<dyn ProfileRepository>) -> Self {
        Self { payments, profiles }
    }

    pub fn over(store: &Arc<InMemoryStore>) -> Self {
        Self::new(store.clone(), store.clone())
    }
}

#[async_trait]
impl UnitOfWork for TestUnitOfWork {
    fn payments(&self) -> Arc<dyn PaymentRepository> {
        self.payments.clone()
    }

    fn profiles(&self) -> Arc<dyn ProfileRepository> {
        self.profiles.clone()
    }

    async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        // Transaction not supported in test mock
        Err(AppError::internal("Transactions not supported in test mock"))
    }
}

/// Both repositories backed by process memory.
#[derive(Default)]
pub struct InMemoryStore {
    payments: Mutex<HashMap<Uuid, Payment>>,
    profiles: Mutex<HashMap<Uuid, Profile>>,
    fail_subscription_writes: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_profile(&self, profile: Profile) -> Profile {
        self.profiles
            .lock()
            .unwrap()
            .insert(profile.id, profile.clone());
        profile
    }

    pub fn add_payment(&self, payment: Payment) -> Payment {
        self.payments
            .lock()
            .unwrap()
            .insert(payment.id, payment.clone());
        payment
    }

    pub fn payment(&self, id: Uuid) -> Payment {
        self.payments.lock().unwrap()[&id].clone()
    }

    pub fn profile(&self, id: Uuid) -> Profile {
        self.profiles.lock().unwrap()[&id].clone()
    }

    pub fn payment_count(&self) -> usize {
        self.payments.lock().unwrap().len()
    }

    /// Make every subsequent `apply_subscription` fail until cleared
    pub fn fail_subscription_writes(&self, fail: bool) {
        self.fail_subscription_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl PaymentRepository for InMemoryStore {
    async fn insert(&self, payment: Payment) -> AppResult<Payment> {
        Ok(self.add_payment(payment))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Payment>> {
        Ok(self.payments.lock().unwrap().get(&id).cloned())
    }

    async fn list(&self, filter: PaymentFilter) -> AppResult<Vec<Payment>> {
        let mut payments: Vec<Payment> = self
            .payments
            .lock()
            .unwrap()
            .values()
            .filter(|p| filter.status.map_or(true, |s| p.status == s))
            .filter(|p| filter.user_id.map_or(true, |u| p.user_id == u))
            .cloned()
            .collect();

        payments.sort_by_key(|p| (p.created_at, p.id));
        if filter.order == SortOrder::NewestFirst {
            payments.reverse();
        }
        Ok(payments)
    }

    async fn mark_decided(&self, id: Uuid, decision: PaymentDecision) -> AppResult<Option<Payment>> {
        let mut payments = self.payments.lock().unwrap();
        match payments.get_mut(&id) {
            Some(payment) if payment.status.is_pending() => {
                payment.apply(&decision);
                Ok(Some(payment.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn update_notes(&self, id: Uuid, notes: Option<String>) -> AppResult<Payment> {
        let mut payments = self.payments.lock().unwrap();
        let payment = payments
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("Payment"))?;
        payment.admin_notes = notes;
        Ok(payment.clone())
    }

    async fn count_by_status(&self) -> AppResult<PaymentStats> {
        let payments = self.payments.lock().unwrap();
        Ok(PaymentStats::from_payments(payments.values()))
    }
}

#[async_trait]
impl ProfileRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Profile>> {
        Ok(self.profiles.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<Profile>> {
        let profiles = self.profiles.lock().unwrap();
        Ok(ids.iter().filter_map(|id| profiles.get(id).cloned()).collect())
    }

    async fn apply_subscription(
        &self,
        id: Uuid,
        tier: SubscriptionTier,
        expiry: DateTime<Utc>,
    ) -> AppResult<Profile> {
        if self.fail_subscription_writes.load(Ordering::SeqCst) {
            return Err(AppError::collaborator("profiles table unavailable"));
        }

        let mut profiles = self.profiles.lock().unwrap();
        let profile = profiles
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("User"))?;
        profile.subscription_tier = tier;
        profile.subscription_expiry = Some(expiry);
        profile.updated_at = Utc::now();
        Ok(profile.clone())
    }

    async fn list_pending_registrations(&self) -> AppResult<Vec<Profile>> {
        let mut pending: Vec<Profile> = self
            .profiles
            .lock()
            .unwrap()
            .values()
            .filter(|p| !p.is_active && !p.is_admin())
            .cloned()
            .collect();
        pending.sort_by_key(|p| p.created_at);
        Ok(pending)
    }

    async fn set_active(&self, id: Uuid, active: bool) -> AppResult<Profile> {
        let mut profiles = self.profiles.lock().unwrap();
        let profile = profiles
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("User"))?;
        profile.is_active = active;
        Ok(profile.clone())
    }
}

pub fn create_test_profile(role: UserRole) -> Profile {
    let now = Utc::now();
    Profile {
        id: Uuid::new_v4(),
        business_name: format!("Test {}", role),
        role,
        email: format!("{}@example.dz", Uuid::new_v4().simple()),
        phone: None,
        address: None,
        wilaya: Some("Alger".to_string()),
        is_active: true,
        subscription_tier: SubscriptionTier::None,
        subscription_expiry: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn actor_for(profile: &Profile) -> Actor {
    Actor::new(profile.id, profile.role)
}

pub fn bank_transfer(amount: i64, plan: &str, receipt: &str) -> SubmitPayment {
    SubmitPayment {
        amount,
        plan_type: plan.to_string(),
        method: METHOD_BANK_TRANSFER.to_string(),
        bank_name: Some("CPA".to_string()),
        receipt_ref: Some(receipt.to_string()),
    }
}

/// A pending payment already on file for `owner`
pub fn pending_payment(owner: &Profile, plan: &str) -> Payment {
    Payment::submit(owner.id, bank_transfer(5000, plan, "receipt-1"), Utc::now())
        .expect("valid submission")
}
