//! Payment and profile service unit tests against mocked repositories.

mod support;

use std::sync::Arc;

use mockall::predicate::eq;
use uuid::Uuid;

use common::AppError;
use domain::{Actor, PaymentStatus, SubmitPayment, UserRole, METHOD_CARD};
use payment_service_lib::repository::{MockPaymentRepository, MockProfileRepository, PaymentFilter};
use payment_service_lib::service::{PaymentManager, PaymentService, ProfileManager, ProfileService};

use support::{actor_for, bank_transfer, create_test_profile, pending_payment, TestUnitOfWork};

fn payment_service(
    payments: MockPaymentRepository,
    profiles: MockProfileRepository,
) -> PaymentManager<TestUnitOfWork> {
    PaymentManager::new(Arc::new(TestUnitOfWork::new(
        Arc::new(payments),
        Arc::new(profiles),
    )))
}

fn profile_service(profiles: MockProfileRepository) -> ProfileManager<TestUnitOfWork> {
    ProfileManager::new(Arc::new(TestUnitOfWork::new(
        Arc::new(MockPaymentRepository::new()),
        Arc::new(profiles),
    )))
}

#[tokio::test]
async fn test_card_payment_never_reaches_storage() {
    let mut payments = MockPaymentRepository::new();
    payments.expect_insert().never();
    let mut profiles = MockProfileRepository::new();
    profiles.expect_find_by_id().never();

    let service = payment_service(payments, profiles);
    let input = SubmitPayment {
        method: METHOD_CARD.to_string(),
        ..bank_transfer(12000, "or", "r1")
    };
    let err = service
        .submit_payment(Actor::new(Uuid::new_v4(), UserRole::Pharmacist), input)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::MethodUnavailable(_)));
}

#[tokio::test]
async fn test_bank_transfer_requires_receipt() {
    let mut payments = MockPaymentRepository::new();
    payments.expect_insert().never();

    let service = payment_service(payments, MockProfileRepository::new());
    let input = SubmitPayment {
        receipt_ref: None,
        ..bank_transfer(8000, "argent", "unused")
    };
    let err = service
        .submit_payment(Actor::new(Uuid::new_v4(), UserRole::Supplier), input)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_submit_stores_pending_payment_for_caller() {
    let pharmacist = create_test_profile(UserRole::Pharmacist);
    let owner = pharmacist.clone();

    let mut profiles = MockProfileRepository::new();
    profiles
        .expect_find_by_id()
        .with(eq(pharmacist.id))
        .returning(move |_| Ok(Some(owner.clone())));
    let mut payments = MockPaymentRepository::new();
    payments.expect_insert().times(1).returning(Ok);

    let service = payment_service(payments, profiles);
    let payment = service
        .submit_payment(actor_for(&pharmacist), bank_transfer(12000, "or", "r1"))
        .await
        .unwrap();

    assert_eq!(payment.user_id, pharmacist.id);
    assert_eq!(payment.status, PaymentStatus::Pending);
    assert_eq!(payment.amount, 12000);
    assert_eq!(payment.receipt_ref.as_deref(), Some("r1"));
}

#[tokio::test]
async fn test_admin_cannot_submit_payment() {
    let mut payments = MockPaymentRepository::new();
    payments.expect_insert().never();

    let service = payment_service(payments, MockProfileRepository::new());
    let err = service
        .submit_payment(
            Actor::new(Uuid::new_v4(), UserRole::Admin),
            bank_transfer(12000, "or", "r1"),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Forbidden));
}

#[tokio::test]
async fn test_submit_for_missing_profile_is_not_found() {
    let mut profiles = MockProfileRepository::new();
    profiles.expect_find_by_id().returning(|_| Ok(None));

    let service = payment_service(MockPaymentRepository::new(), profiles);
    let err = service
        .submit_payment(
            Actor::new(Uuid::new_v4(), UserRole::Supplier),
            bank_transfer(3000, "bronze", "r2"),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(entity) if entity == "User"));
}

#[tokio::test]
async fn test_get_payment_hidden_from_other_users() {
    let owner = create_test_profile(UserRole::Pharmacist);
    let stored = pending_payment(&owner, "or");
    let payment_id = stored.id;

    let mut payments = MockPaymentRepository::new();
    payments
        .expect_find_by_id()
        .with(eq(payment_id))
        .returning(move |_| Ok(Some(stored.clone())));

    let service = payment_service(payments, MockProfileRepository::new());

    let stranger = Actor::new(Uuid::new_v4(), UserRole::Supplier);
    assert!(matches!(
        service.get_payment(stranger, payment_id).await,
        Err(AppError::Forbidden)
    ));
    assert!(service.get_payment(actor_for(&owner), payment_id).await.is_ok());
}

#[tokio::test]
async fn test_pending_list_keeps_payments_with_missing_owner() {
    let owner = create_test_profile(UserRole::Supplier);
    let known = pending_payment(&owner, "or");
    let orphan = pending_payment(&create_test_profile(UserRole::Pharmacist), "bronze");
    let listed = vec![known.clone(), orphan.clone()];
    let owner_row = owner.clone();

    let mut payments = MockPaymentRepository::new();
    payments
        .expect_list()
        .withf(|filter| *filter == PaymentFilter::pending_queue())
        .times(1)
        .returning(move |_| Ok(listed.clone()));
    let mut profiles = MockProfileRepository::new();
    profiles
        .expect_find_by_ids()
        .returning(move |_| Ok(vec![owner_row.clone()]));

    let service = payment_service(payments, profiles);
    let pending = service
        .list_pending(Actor::new(Uuid::new_v4(), UserRole::Admin))
        .await
        .unwrap();

    assert_eq!(pending.len(), 2);
    assert_eq!(pending[0].owner_name.as_deref(), Some(owner.business_name.as_str()));
    assert_eq!(pending[1].payment.id, orphan.id);
    assert!(pending[1].owner_name.is_none());
}

#[tokio::test]
async fn test_activation_refuses_admin_targets() {
    let target = create_test_profile(UserRole::Admin);
    let stored = target.clone();

    let mut profiles = MockProfileRepository::new();
    profiles
        .expect_find_by_id()
        .returning(move |_| Ok(Some(stored.clone())));
    profiles.expect_set_active().never();

    let service = profile_service(profiles);
    let err = service
        .deactivate(Actor::new(Uuid::new_v4(), UserRole::Admin), target.id)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_activate_pending_registration() {
    let mut target = create_test_profile(UserRole::Pharmacist);
    target.is_active = false;
    let target_id = target.id;
    let stored = target.clone();

    let mut profiles = MockProfileRepository::new();
    profiles
        .expect_find_by_id()
        .returning(move |_| Ok(Some(stored.clone())));
    profiles
        .expect_set_active()
        .with(eq(target_id), eq(true))
        .times(1)
        .returning(move |_, active| {
            let mut activated = target.clone();
            activated.is_active = active;
            Ok(activated)
        });

    let service = profile_service(profiles);
    let profile = service
        .activate(Actor::new(Uuid::new_v4(), UserRole::Admin), target_id)
        .await
        .unwrap();

    assert!(profile.is_active);
}
