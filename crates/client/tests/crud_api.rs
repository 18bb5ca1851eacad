//! CRUD round trips through the generic service against the mock API.

mod common;

use assert_matches::assert_matches;
use serde_json::json;
use sitebook_client::services::{ExpenseService, LabourService, TransactionService};
use sitebook_client::{get_error_message, ApiError};
use sitebook_core::error::CoreError;
use sitebook_core::models::{CreateLabourer, SkillLevel, TransactionKind, UpdateLabourer};
use sitebook_core::optimistic::OptimisticList;

fn new_labourer(name: &str) -> CreateLabourer {
    CreateLabourer {
        name: name.to_string(),
        phone: "9876543210".to_string(),
        address: None,
        skill_level: SkillLevel::SemiSkilled,
        base_salary: 18000.0,
        project: Some("proj-1".to_string()),
        joining_date: None,
    }
}

// ---------------------------------------------------------------------------
// Test: create, list, get, update, delete a labourer
// ---------------------------------------------------------------------------

#[tokio::test]
async fn labour_crud_round_trip() {
    let backend = common::spawn().await;
    let labour = LabourService::new(backend.client(Some("tok")));

    let created = labour.create(&new_labourer("Ravi Kumar")).await.unwrap();
    assert_eq!(created.name, "Ravi Kumar");
    assert_eq!(created.skill_level, Some(SkillLevel::SemiSkilled));
    assert_eq!(created.project.as_ref().map(|p| p.id()), Some("proj-1"));

    let all = labour.list().await.unwrap();
    assert_eq!(all.len(), 1);

    let fetched = labour.get(&created.id).await.unwrap();
    assert_eq!(fetched, created);

    let patch = UpdateLabourer {
        base_salary: Some(21000.0),
        ..Default::default()
    };
    let updated = labour.update(&created.id, &patch).await.unwrap();
    assert_eq!(updated.base_salary, 21000.0);
    assert_eq!(updated.name, "Ravi Kumar");

    labour.delete(&created.id).await.unwrap();
    assert!(labour.list().await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Test: the three list envelopes all decode
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_envelopes_are_normalized() {
    let backend = common::spawn().await;
    backend.state().seed(
        "transactions",
        vec![json!({
            "_id": "t1", "project": "proj-1", "type": "income",
            "category": "Other", "amount": 5000, "date": "2024-03-01"
        })],
    );
    backend.state().seed(
        "expenses",
        vec![json!({
            "_id": "e1", "project": { "_id": "proj-1", "name": "Riverside Tower" },
            "category": "Fuel", "amount": 300, "date": "2024-03-02T10:00:00.000Z"
        })],
    );
    let client = backend.client(Some("tok"));

    let transactions = TransactionService::new(client.clone()).list().await.unwrap();
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0].kind, TransactionKind::Income);

    let expenses = ExpenseService::new(client).list().await.unwrap();
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0].project.as_ref().and_then(|p| p.name()), Some("Riverside Tower"));
}

// ---------------------------------------------------------------------------
// Test: invalid forms never reach the network
// ---------------------------------------------------------------------------

#[tokio::test]
async fn invalid_form_is_rejected_locally() {
    let backend = common::spawn().await;
    let labour = LabourService::new(backend.client(Some("tok")));

    let mut form = new_labourer("Ravi Kumar");
    form.phone = "12345".to_string();

    let err = labour.create(&form).await.unwrap_err();
    assert_matches!(err, ApiError::Core(CoreError::Validation(_)));
    assert!(get_error_message(&err).contains("phone"));
    assert_eq!(backend.state().request_count(), 0);
}

// ---------------------------------------------------------------------------
// Test: server errors surface their message
// ---------------------------------------------------------------------------

#[tokio::test]
async fn not_found_uses_server_message() {
    let backend = common::spawn().await;
    let labour = LabourService::new(backend.client(Some("tok")));

    let err = labour.get("missing").await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(get_error_message(&err), "labour missing not found");
}

// ---------------------------------------------------------------------------
// Test: optimistic create resolves or rolls back
// ---------------------------------------------------------------------------

#[tokio::test]
async fn optimistic_create_replaces_placeholder() {
    let backend = common::spawn().await;
    let labour = LabourService::new(backend.client(Some("tok")));
    let mut list = OptimisticList::default();

    let record = labour
        .create_optimistic(&mut list, new_labourer("Meena Devi"))
        .await
        .unwrap();

    assert_eq!(list.pending_count(), 0);
    assert_eq!(list.len(), 1);
    assert_eq!(list.saved().next().map(|l| l.id.as_str()), Some(record.id.as_str()));
    assert!(list.last_error().is_none());
}

#[tokio::test]
async fn optimistic_create_rolls_back_on_failure() {
    let backend = common::spawn().await;
    backend.state().seed(
        "labour",
        vec![json!({ "_id": "lab-1", "name": "Existing Worker", "baseSalary": 15000 })],
    );
    backend.state().reject_creates = Some("Phone number already registered".to_string());
    let labour = LabourService::new(backend.client(Some("tok")));
    let mut list = OptimisticList::from_records(labour.list().await.unwrap());

    let err = labour
        .create_optimistic(&mut list, new_labourer("Meena Devi"))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(400));
    assert_eq!(list.pending_count(), 0);
    assert_eq!(list.len(), 1);
    assert_eq!(list.last_error(), Some("Phone number already registered"));
}
