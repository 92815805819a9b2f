//! Router tests for the HTTP API.
//!
//! Services are mocked behind the `ServiceContainer`, so no database is needed.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use mockall::predicate::eq;
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use common::AppError;
use domain::{Payment, SubmitPayment, UserRole, CARD_UNAVAILABLE_MESSAGE, METHOD_BANK_TRANSFER};
use gateway_lib::middleware::Claims;
use gateway_lib::routes::create_router;
use gateway_lib::state::AppState;
use payment_service_lib::infra::Database;
use payment_service_lib::service::{
    ApprovalQueueService, MockApprovalQueueService, MockPaymentService, MockProfileService,
    MockServiceContainer, MockSubscriptionService, PaymentService, ProfileService,
    SubscriptionService,
};

const SECRET: &str = "gateway-test-secret-key-at-least-32-chars";

// =============================================================================
// Fixtures
// =============================================================================

#[derive(Default)]
struct Mocks {
    payments: MockPaymentService,
    subscriptions: MockSubscriptionService,
    queue: MockApprovalQueueService,
    profiles: MockProfileService,
}

fn app(mocks: Mocks) -> Router {
    let payments: Arc<dyn PaymentService> = Arc::new(mocks.payments);
    let subscriptions: Arc<dyn SubscriptionService> = Arc::new(mocks.subscriptions);
    let queue: Arc<dyn ApprovalQueueService> = Arc::new(mocks.queue);
    let profiles: Arc<dyn ProfileService> = Arc::new(mocks.profiles);

    let mut container = MockServiceContainer::new();
    container
        .expect_payments()
        .returning(move || payments.clone());
    container
        .expect_subscriptions()
        .returning(move || subscriptions.clone());
    container.expect_queue().returning(move || queue.clone());
    container
        .expect_profiles()
        .returning(move || profiles.clone());

    let state = AppState::new(
        Arc::new(container),
        SECRET.as_bytes(),
        Database::from(DatabaseConnection::Disconnected),
    );
    create_router(state)
}

fn token(user_id: Uuid, role: UserRole) -> String {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        role: role.to_string(),
        exp: now + 3600,
        iat: now,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

fn request(method: &str, uri: &str, bearer: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(bearer) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", bearer));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn sample_payment(user_id: Uuid) -> Payment {
    Payment::submit(
        user_id,
        SubmitPayment {
            amount: 12000,
            plan_type: "or".to_string(),
            method: METHOD_BANK_TRANSFER.to_string(),
            bank_name: None,
            receipt_ref: Some("r1".to_string()),
        },
        Utc::now(),
    )
    .unwrap()
}

// =============================================================================
// Identity
// =============================================================================

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let response = app(Mocks::default())
        .oneshot(request("GET", "/payments/mine", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_garbage_token_is_unauthorized() {
    let response = app(Mocks::default())
        .oneshot(request("GET", "/payments/mine", Some("not-a-jwt"), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_identity_becomes_actor() {
    let user_id = Uuid::new_v4();
    let mut mocks = Mocks::default();
    mocks
        .payments
        .expect_list_by_user()
        .withf(move |actor, owner| {
            actor.user_id == user_id && actor.role == UserRole::Supplier && *owner == user_id
        })
        .times(1)
        .returning(|_, owner| Ok(vec![sample_payment(owner)]));

    let bearer = token(user_id, UserRole::Supplier);
    let response = app(mocks)
        .oneshot(request("GET", "/payments/mine", Some(&bearer), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["status"], "pending");
    assert_eq!(body[0]["plan_type"], "or");
}

// =============================================================================
// Payments
// =============================================================================

#[tokio::test]
async fn test_submit_payment_created() {
    let user_id = Uuid::new_v4();
    let mut mocks = Mocks::default();
    mocks
        .payments
        .expect_submit_payment()
        .withf(|_, input| input.amount == 12000 && input.receipt_ref.as_deref() == Some("r1"))
        .returning(|actor, _| Ok(sample_payment(actor.user_id)));

    let bearer = token(user_id, UserRole::Pharmacist);
    let body = json!({
        "amount": 12000,
        "plan_type": "or",
        "method": "bank_transfer",
        "receipt_ref": "r1"
    });
    let response = app(mocks)
        .oneshot(request("POST", "/payments", Some(&bearer), Some(body)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["user_id"], user_id.to_string());
    assert_eq!(body["payment_method"], "bank_transfer");
}

#[tokio::test]
async fn test_card_submission_is_unprocessable() {
    let mut mocks = Mocks::default();
    mocks
        .payments
        .expect_submit_payment()
        .returning(|_, _| Err(AppError::MethodUnavailable(CARD_UNAVAILABLE_MESSAGE.to_string())));

    let bearer = token(Uuid::new_v4(), UserRole::Pharmacist);
    let body = json!({ "amount": 12000, "plan_type": "or", "method": "card" });
    let response = app(mocks)
        .oneshot(request("POST", "/payments", Some(&bearer), Some(body)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "METHOD_UNAVAILABLE");
    assert_eq!(body["error"]["message"], CARD_UNAVAILABLE_MESSAGE);
}

#[tokio::test]
async fn test_submit_with_missing_fields_is_bad_request() {
    let mut mocks = Mocks::default();
    mocks.payments.expect_submit_payment().never();

    let bearer = token(Uuid::new_v4(), UserRole::Pharmacist);
    let response = app(mocks)
        .oneshot(request(
            "POST",
            "/payments",
            Some(&bearer),
            Some(json!({ "amount": 100, "plan_type": "", "method": "bank_transfer" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"]["code"], "VALIDATION_ERROR");
}

// =============================================================================
// Admin decisions
// =============================================================================

#[tokio::test]
async fn test_approve_already_decided_is_conflict() {
    let payment_id = Uuid::new_v4();
    let mut mocks = Mocks::default();
    mocks
        .subscriptions
        .expect_approve()
        .withf(move |actor, id, notes| actor.is_admin() && *id == payment_id && notes.is_none())
        .returning(|_, id, _| {
            Err(AppError::invalid_state(format!(
                "Payment {} has already been decided",
                id
            )))
        });

    let bearer = token(Uuid::new_v4(), UserRole::Admin);
    let response = app(mocks)
        .oneshot(request(
            "POST",
            &format!("/admin/payments/{}/approve", payment_id),
            Some(&bearer),
            Some(json!({})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(json_body(response).await["error"]["code"], "INVALID_STATE");
}

#[tokio::test]
async fn test_approve_without_body_reaches_service() {
    let payment_id = Uuid::new_v4();
    let mut mocks = Mocks::default();
    mocks
        .subscriptions
        .expect_approve()
        .withf(move |_, id, notes| *id == payment_id && notes.is_none())
        .times(1)
        .returning(|_, _, _| Err(AppError::not_found("User")));

    let bearer = token(Uuid::new_v4(), UserRole::Admin);
    let response = app(mocks)
        .oneshot(request(
            "POST",
            &format!("/admin/payments/{}/approve", payment_id),
            Some(&bearer),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_reject_without_body_succeeds() {
    let payment = sample_payment(Uuid::new_v4());
    let payment_id = payment.id;
    let mut mocks = Mocks::default();
    mocks
        .subscriptions
        .expect_reject()
        .withf(move |_, id, notes| *id == payment_id && notes.is_none())
        .times(1)
        .returning(move |_, _, _| Ok(payment.clone()));

    let bearer = token(Uuid::new_v4(), UserRole::Admin);
    let response = app(mocks)
        .oneshot(request(
            "POST",
            &format!("/admin/payments/{}/reject", payment_id),
            Some(&bearer),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["id"], payment_id.to_string());
}

#[tokio::test]
async fn test_decision_with_invalid_json_is_bad_request() {
    let mut mocks = Mocks::default();
    mocks.subscriptions.expect_approve().never();

    let bearer = token(Uuid::new_v4(), UserRole::Admin);
    let request = Request::builder()
        .method("POST")
        .uri(format!("/admin/payments/{}/approve", Uuid::new_v4()))
        .header(header::AUTHORIZATION, format!("Bearer {}", bearer))
        .body(Body::from("notes=ok"))
        .unwrap();
    let response = app(mocks).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_partial_apply_hides_collaborator_detail() {
    let owner = Uuid::new_v4();
    let mut mocks = Mocks::default();
    mocks.subscriptions.expect_approve().returning(move |_, id, _| {
        Err(AppError::PartialApply {
            payment_id: id,
            user_id: owner,
            source: Box::new(AppError::collaborator("connection reset by peer")),
        })
    });

    let bearer = token(Uuid::new_v4(), UserRole::Admin);
    let response = app(mocks)
        .oneshot(request(
            "POST",
            &format!("/admin/payments/{}/approve", Uuid::new_v4()),
            Some(&bearer),
            Some(json!({ "notes": "ok" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "PARTIAL_APPLY");
    assert!(!body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("connection reset"));
}

#[tokio::test]
async fn test_non_admin_reject_is_forbidden() {
    let mut mocks = Mocks::default();
    mocks
        .subscriptions
        .expect_reject()
        .returning(|_, _, _| Err(AppError::Forbidden));

    let bearer = token(Uuid::new_v4(), UserRole::Supplier);
    let response = app(mocks)
        .oneshot(request(
            "POST",
            &format!("/admin/payments/{}/reject", Uuid::new_v4()),
            Some(&bearer),
            Some(json!({ "notes": "no" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_list_payments_with_unknown_status_is_bad_request() {
    let mut mocks = Mocks::default();
    mocks.payments.expect_list_all().never();

    let bearer = token(Uuid::new_v4(), UserRole::Admin);
    let response = app(mocks)
        .oneshot(request("GET", "/admin/payments?status=refunded", Some(&bearer), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_payments_filters_by_status() {
    let mut mocks = Mocks::default();
    mocks
        .payments
        .expect_list_all()
        .withf(|_, status| *status == Some(domain::PaymentStatus::Approved))
        .times(1)
        .returning(|_, _| Ok(vec![]));

    let bearer = token(Uuid::new_v4(), UserRole::Admin);
    let response = app(mocks)
        .oneshot(request("GET", "/admin/payments?status=approved", Some(&bearer), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_activate_user_forwards_target() {
    let target = Uuid::new_v4();
    let mut mocks = Mocks::default();
    mocks
        .profiles
        .expect_activate()
        .with(mockall::predicate::always(), eq(target))
        .times(1)
        .returning(|_, _| Err(AppError::not_found("User")));

    let bearer = token(Uuid::new_v4(), UserRole::Admin);
    let response = app(mocks)
        .oneshot(request(
            "POST",
            &format!("/admin/users/{}/activate", target),
            Some(&bearer),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["error"]["message"], "User not found");
}
