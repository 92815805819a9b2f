//! Profile database entity for SeaORM.

use sea_orm::entity::prelude::*;

use common::AppError;
use domain::Profile;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub business_name: String,
    pub role: String,
    #[sea_orm(unique)]
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub wilaya: Option<String>,
    pub is_active: bool,
    pub subscription_tier: String,
    pub subscription_expiry: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl TryFrom<Model> for Profile {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let id = model.id;
        let corrupt = move |e: domain::DomainError| {
            AppError::internal(format!("profile {} has invalid stored data: {}", id, e))
        };

        Ok(Profile {
            id: model.id,
            role: model.role.parse().map_err(corrupt)?,
            subscription_tier: model.subscription_tier.parse().map_err(corrupt)?,
            business_name: model.business_name,
            email: model.email,
            phone: model.phone,
            address: model.address,
            wilaya: model.wilaya,
            is_active: model.is_active,
            subscription_expiry: model.subscription_expiry,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
