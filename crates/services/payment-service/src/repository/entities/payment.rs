//! Payment database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use common::AppError;
use domain::Payment;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: i64,
    pub plan_type: String,
    pub payment_method: String,
    pub bank_name: Option<String>,
    pub receipt_ref: Option<String>,
    pub status: String,
    pub admin_notes: Option<String>,
    pub processed_by: Option<Uuid>,
    pub processed_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub expires_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl TryFrom<Model> for Payment {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let id = model.id;
        let corrupt = move |e: domain::DomainError| {
            AppError::internal(format!("payment {} has invalid stored data: {}", id, e))
        };

        Ok(Payment {
            id: model.id,
            user_id: model.user_id,
            amount: model.amount,
            plan_type: model.plan_type.parse().map_err(corrupt)?,
            payment_method: model.payment_method.parse().map_err(corrupt)?,
            status: model.status.parse().map_err(corrupt)?,
            bank_name: model.bank_name,
            receipt_ref: model.receipt_ref,
            admin_notes: model.admin_notes,
            processed_by: model.processed_by,
            processed_at: model.processed_at,
            created_at: model.created_at,
            expires_at: model.expires_at,
        })
    }
}

/// Build an insertable row from a freshly submitted payment
impl From<&Payment> for ActiveModel {
    fn from(payment: &Payment) -> Self {
        ActiveModel {
            id: Set(payment.id),
            user_id: Set(payment.user_id),
            amount: Set(payment.amount),
            plan_type: Set(payment.plan_type.as_str().to_string()),
            payment_method: Set(payment.payment_method.as_str().to_string()),
            bank_name: Set(payment.bank_name.clone()),
            receipt_ref: Set(payment.receipt_ref.clone()),
            status: Set(payment.status.as_str().to_string()),
            admin_notes: Set(payment.admin_notes.clone()),
            processed_by: Set(payment.processed_by),
            processed_at: Set(payment.processed_at),
            created_at: Set(payment.created_at),
            expires_at: Set(payment.expires_at),
        }
    }
}
