//! Integration tests for activity CRUD, permissions, and associations.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, get, post_json, seed_encadrant, seed_etudiant, send_json, token_for};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn create_activite_uppercases_code(pool: PgPool) {
    let prof = seed_encadrant(&pool, "prof@example.org", "a-password-here").await;
    let token = token_for(prof.id, &prof.role);
    let app = common::build_test_app(pool);

    let response = post_json(
        app,
        "/api/activites",
        Some(&token),
        json!({
            "code": "quiz42",
            "titre": "Cardiologie",
            "type_affirmation_requise": 4,
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "QUIZ42");
    assert_eq!(json["type_affirmation_requise"], 4);
    assert_eq!(json["is_published"], false);
    assert_eq!(json["nbr_affirmations_associe"], 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_activite_duplicate_code_is_409(pool: PgPool) {
    let prof = seed_encadrant(&pool, "prof@example.org", "a-password-here").await;
    let token = token_for(prof.id, &prof.role);

    let app = common::build_test_app(pool.clone());
    let first = post_json(
        app,
        "/api/activites",
        Some(&token),
        json!({"code": "QUIZ1", "titre": "Premier"}),
    )
    .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let app = common::build_test_app(pool);
    let second = post_json(
        app,
        "/api/activites",
        Some(&token),
        json!({"code": "quiz1", "titre": "Doublon"}),
    )
    .await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_activite_invalid_code_is_400(pool: PgPool) {
    let prof = seed_encadrant(&pool, "prof@example.org", "a-password-here").await;
    let token = token_for(prof.id, &prof.role);
    let app = common::build_test_app(pool);

    // Too short (the minimum is 3 characters).
    let response = post_json(
        app,
        "/api/activites",
        Some(&token),
        json!({"code": "AB", "titre": "Trop court"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_activite_provisions_students_from_emails(pool: PgPool) {
    let prof = seed_encadrant(&pool, "prof@example.org", "a-password-here").await;
    let existing = seed_etudiant(&pool, "known@example.org").await;
    let token = token_for(prof.id, &prof.role);
    let app = common::build_test_app(pool.clone());

    let response = post_json(
        app,
        "/api/activites",
        Some(&token),
        json!({
            "code": "QUIZ1",
            "titre": "Quiz",
            "etudiants_emails": "known@example.org, new@example.org, not-an-email",
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let etudiants = json["etudiants_autorises"].as_array().unwrap();
    assert_eq!(etudiants.len(), 2, "invalid email must be skipped");

    // The unknown email got a fresh student account.
    let emails: Vec<&str> = etudiants
        .iter()
        .map(|e| e["email"].as_str().unwrap())
        .collect();
    assert!(emails.contains(&"known@example.org"));
    assert!(emails.contains(&"new@example.org"));
    assert!(etudiants
        .iter()
        .any(|e| e["id"].as_i64().unwrap() == existing.id));
}

// ---------------------------------------------------------------------------
// Permissions and listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn etudiant_cannot_create_activite(pool: PgPool) {
    let student = seed_etudiant(&pool, "student@example.org").await;
    let token = token_for(student.id, &student.role);
    let app = common::build_test_app(pool);

    let response = post_json(
        app,
        "/api/activites",
        Some(&token),
        json!({"code": "QUIZ1", "titre": "Interdit"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn etudiant_sees_only_published_authorized_activities(pool: PgPool) {
    let prof = seed_encadrant(&pool, "prof@example.org", "a-password-here").await;
    let student = seed_etudiant(&pool, "student@example.org").await;
    let prof_token = token_for(prof.id, &prof.role);

    // One published + authorized, one unpublished + authorized, one published
    // but not authorized.
    for (code, published, authorize) in [
        ("OPEN1", true, true),
        ("DRAFT1", false, true),
        ("OTHER1", true, false),
    ] {
        let app = common::build_test_app(pool.clone());
        let mut body = json!({"code": code, "titre": code, "is_published": published});
        if authorize {
            body["etudiants_autorises_ids"] = json!([student.id]);
        }
        let response = post_json(app, "/api/activites", Some(&prof_token), body).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let student_token = token_for(student.id, &student.role);
    let app = common::build_test_app(pool);
    let response = get(app, "/api/activites", Some(&student_token)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let codes: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["code"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["OPEN1"]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn detail_preserves_affirmation_order(pool: PgPool) {
    let prof = seed_encadrant(&pool, "prof@example.org", "a-password-here").await;
    let token = token_for(prof.id, &prof.role);

    // Author three affirmations.
    let mut ids = Vec::new();
    for texte in ["Premier", "Deuxième", "Troisième"] {
        let app = common::build_test_app(pool.clone());
        let response = post_json(
            app,
            "/api/affirmations",
            Some(&token),
            json!({
                "affirmation": texte,
                "nbr_reponses": 2,
                "is_correct_vf": false,
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        ids.push(body_json(response).await["id"].as_i64().unwrap());
    }

    // Associate them in reverse order.
    let reversed: Vec<i64> = ids.iter().rev().copied().collect();
    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/activites",
        Some(&token),
        json!({"code": "QUIZ1", "titre": "Ordre", "affirmations_associes_ids": reversed}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let app = common::build_test_app(pool);
    let response = get(app, "/api/activites/QUIZ1", Some(&token)).await;
    let json = body_json(response).await;
    let returned: Vec<i64> = json["affirmations_associes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_i64().unwrap())
        .collect();
    assert_eq!(returned, reversed, "detail must follow association order");
}

// ---------------------------------------------------------------------------
// Update / delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn update_rejects_other_encadrant(pool: PgPool) {
    let owner = seed_encadrant(&pool, "owner@example.org", "a-password-here").await;
    let other = seed_encadrant(&pool, "other@example.org", "a-password-here").await;
    let owner_token = token_for(owner.id, &owner.role);

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/activites",
        Some(&owner_token),
        json!({"code": "QUIZ1", "titre": "Original"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let other_token = token_for(other.id, &other.role);
    let app = common::build_test_app(pool);
    let response = send_json(
        app,
        Method::PUT,
        "/api/activites/QUIZ1",
        Some(&other_token),
        json!({"titre": "Pirate"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn delete_removes_activity(pool: PgPool) {
    let prof = seed_encadrant(&pool, "prof@example.org", "a-password-here").await;
    let token = token_for(prof.id, &prof.role);

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/activites",
        Some(&token),
        json!({"code": "QUIZ1", "titre": "Ephémère"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let app = common::build_test_app(pool.clone());
    let response = send_json(
        app,
        Method::DELETE,
        "/api/activites/QUIZ1",
        Some(&token),
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let response = get(app, "/api/activites/QUIZ1", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
