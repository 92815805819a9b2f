//! Payment repository implementation.
//!
//! Payments are append-only: rows are inserted once, stamped once by an admin
//! decision, and afterwards only `admin_notes` may change.

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    FromQueryResult, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::entities::payment::{self, ActiveModel, Entity as PaymentEntity};
use common::{AppError, AppResult};
use domain::{
    Payment, PaymentDecision, PaymentStats, PaymentStatus, STATUS_APPROVED, STATUS_PENDING,
    STATUS_REJECTED,
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Listing order by submission time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

/// Filter for payment listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaymentFilter {
    pub status: Option<PaymentStatus>,
    pub user_id: Option<Uuid>,
    pub order: SortOrder,
}

impl PaymentFilter {
    /// Pending payments, earliest submission first
    pub fn pending_queue() -> Self {
        Self {
            status: Some(PaymentStatus::Pending),
            user_id: None,
            order: SortOrder::OldestFirst,
        }
    }

    /// Full history of one user, newest first
    pub fn for_user(user_id: Uuid) -> Self {
        Self {
            user_id: Some(user_id),
            ..Self::default()
        }
    }

    pub fn with_status(status: Option<PaymentStatus>) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }
}

/// Payment repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Persist a newly submitted payment
    async fn insert(&self, payment: Payment) -> AppResult<Payment>;

    /// Find payment by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Payment>>;

    /// List payments matching the filter
    async fn list(&self, filter: PaymentFilter) -> AppResult<Vec<Payment>>;

    /// Stamp a decision only if the stored status is still `pending`.
    ///
    /// Returns `None` when no pending row matched (already decided or absent).
    async fn mark_decided(&self, id: Uuid, decision: PaymentDecision) -> AppResult<Option<Payment>>;

    /// Replace admin notes; allowed in any status
    async fn update_notes(&self, id: Uuid, notes: Option<String>) -> AppResult<Payment>;

    /// Count payments per status
    async fn count_by_status(&self) -> AppResult<PaymentStats>;
}

/// Concrete implementation of PaymentRepository
pub struct PaymentStore {
    db: DatabaseConnection,
}

impl PaymentStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PaymentRepository for PaymentStore {
    async fn insert(&self, payment: Payment) -> AppResult<Payment> {
        queries::insert(&self.db, &payment).await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Payment>> {
        queries::find_by_id(&self.db, id).await
    }

    async fn list(&self, filter: PaymentFilter) -> AppResult<Vec<Payment>> {
        queries::list(&self.db, filter).await
    }

    async fn mark_decided(&self, id: Uuid, decision: PaymentDecision) -> AppResult<Option<Payment>> {
        queries::mark_decided(&self.db, id, &decision).await
    }

    async fn update_notes(&self, id: Uuid, notes: Option<String>) -> AppResult<Payment> {
        queries::update_notes(&self.db, id, notes).await
    }

    async fn count_by_status(&self) -> AppResult<PaymentStats> {
        queries::count_by_status(&self.db).await
    }
}

/// Queries shared by the pooled store and the transaction-scoped repository.
pub(crate) mod queries {
    use super::*;

    #[derive(Debug, FromQueryResult)]
    struct StatusCount {
        status: String,
        count: i64,
    }

    pub(crate) async fn insert<C: ConnectionTrait>(conn: &C, payment: &Payment) -> AppResult<Payment> {
        let model = ActiveModel::from(payment).insert(conn).await?;
        Payment::try_from(model)
    }

    pub(crate) async fn find_by_id<C: ConnectionTrait>(conn: &C, id: Uuid) -> AppResult<Option<Payment>> {
        PaymentEntity::find_by_id(id)
            .one(conn)
            .await?
            .map(Payment::try_from)
            .transpose()
    }

    pub(crate) async fn list<C: ConnectionTrait>(conn: &C, filter: PaymentFilter) -> AppResult<Vec<Payment>> {
        let mut query = PaymentEntity::find();

        if let Some(status) = filter.status {
            query = query.filter(payment::Column::Status.eq(status.as_str()));
        }
        if let Some(user_id) = filter.user_id {
            query = query.filter(payment::Column::UserId.eq(user_id));
        }

        query = match filter.order {
            SortOrder::OldestFirst => query
                .order_by_asc(payment::Column::CreatedAt)
                .order_by_asc(payment::Column::Id),
            SortOrder::NewestFirst => query
                .order_by_desc(payment::Column::CreatedAt)
                .order_by_desc(payment::Column::Id),
        };

        query
            .all(conn)
            .await?
            .into_iter()
            .map(Payment::try_from)
            .collect()
    }

    /// Compare-and-set on `status = 'pending'`; exactly one concurrent caller wins.
    pub(crate) async fn mark_decided<C: ConnectionTrait>(
        conn: &C,
        id: Uuid,
        decision: &PaymentDecision,
    ) -> AppResult<Option<Payment>> {
        if decision.status.is_pending() {
            return Err(AppError::internal("a decision cannot leave a payment pending"));
        }

        let result = PaymentEntity::update_many()
            .col_expr(payment::Column::Status, Expr::value(decision.status.as_str()))
            .col_expr(payment::Column::ProcessedBy, Expr::value(Some(decision.processed_by)))
            .col_expr(payment::Column::ProcessedAt, Expr::value(Some(decision.processed_at)))
            .col_expr(payment::Column::AdminNotes, Expr::value(decision.admin_notes.clone()))
            .filter(payment::Column::Id.eq(id))
            .filter(payment::Column::Status.eq(STATUS_PENDING))
            .exec(conn)
            .await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        find_by_id(conn, id).await
    }

    pub(crate) async fn update_notes<C: ConnectionTrait>(
        conn: &C,
        id: Uuid,
        notes: Option<String>,
    ) -> AppResult<Payment> {
        let model = PaymentEntity::find_by_id(id)
            .one(conn)
            .await?
            .ok_or_else(|| AppError::not_found("Payment"))?;

        let mut active: ActiveModel = model.into();
        active.admin_notes = Set(notes);

        let model = active.update(conn).await?;
        Payment::try_from(model)
    }

    pub(crate) async fn count_by_status<C: ConnectionTrait>(conn: &C) -> AppResult<PaymentStats> {
        let rows = PaymentEntity::find()
            .select_only()
            .column(payment::Column::Status)
            .column_as(Expr::col(payment::Column::Id).count(), "count")
            .group_by(payment::Column::Status)
            .into_model::<StatusCount>()
            .all(conn)
            .await?;

        let (mut pending, mut approved, mut rejected) = (0u64, 0u64, 0u64);
        for row in rows {
            let count = u64::try_from(row.count).unwrap_or(0);
            match row.status.as_str() {
                STATUS_PENDING => pending = count,
                STATUS_APPROVED => approved = count,
                STATUS_REJECTED => rejected = count,
                other => tracing::warn!(status = other, "ignoring unknown payment status in counts"),
            }
        }

        Ok(PaymentStats::from_counts(pending, approved, rejected))
    }
}
