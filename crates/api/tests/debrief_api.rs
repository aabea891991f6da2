//! Integration tests for the debrief workflow.

mod common;

use axum::http::StatusCode;
use common::{body_json, post_json, seed_encadrant, seed_etudiant, token_for};
use serde_json::json;
use sqlx::PgPool;
use troublemaker_core::types::DbId;
use troublemaker_db::models::affirmation::CreateAffirmation;
use troublemaker_db::models::reponse::UpsertReponse;
use troublemaker_db::repositories::{ActiviteRepo, AffirmationRepo, ReponseRepo};

/// Seed an activity, one affirmation, and one stored student response.
/// Returns the response id.
async fn seed_reponse(pool: &PgPool, code: &str, encadrant_id: DbId, etudiant_id: DbId) -> DbId {
    sqlx::query(
        "INSERT INTO activites (code, titre, encadrant_id, is_published)
         VALUES ($1, 'Quiz', $2, TRUE)",
    )
    .bind(code)
    .bind(encadrant_id)
    .execute(pool)
    .await
    .unwrap();

    let affirmation = AffirmationRepo::create(
        pool,
        &CreateAffirmation {
            affirmation: "Texte".to_string(),
            explication: None,
            nbr_reponses: 2,
            is_correct_vf: false,
            reponse_correcte_qcm: None,
            activity_code: None,
        },
        encadrant_id,
    )
    .await
    .unwrap();
    ActiviteRepo::set_affirmations(pool, code, &[affirmation.id])
        .await
        .unwrap();
    ActiviteRepo::set_etudiants(pool, code, &[etudiant_id])
        .await
        .unwrap();

    let reponse = ReponseRepo::upsert(
        pool,
        &UpsertReponse {
            activite_code: code.to_string(),
            affirmation_id: affirmation.id,
            etudiant_id,
            reponse_vf: Some(true),
            reponse_choisie_qcm: None,
            justification: Some("Parce que.".to_string()),
        },
    )
    .await
    .unwrap();

    reponse.id
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_debrief_succeeds(pool: PgPool) {
    let prof = seed_encadrant(&pool, "prof@example.org", "a-password-here").await;
    let student = seed_etudiant(&pool, "student@example.org").await;
    let reponse_id = seed_reponse(&pool, "QUIZ1", prof.id, student.id).await;
    let token = token_for(prof.id, &prof.role);

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/debriefs",
        Some(&token),
        json!({"reponse_id": reponse_id, "feedback": "Bonne justification."}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["reponse_id"].as_i64().unwrap(), reponse_id);
    assert_eq!(json["feedback"], "Bonne justification.");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn second_debrief_for_same_response_is_409(pool: PgPool) {
    let prof = seed_encadrant(&pool, "prof@example.org", "a-password-here").await;
    let student = seed_etudiant(&pool, "student@example.org").await;
    let reponse_id = seed_reponse(&pool, "QUIZ1", prof.id, student.id).await;
    let token = token_for(prof.id, &prof.role);

    let app = common::build_test_app(pool.clone());
    let first = post_json(
        app,
        "/api/debriefs",
        Some(&token),
        json!({"reponse_id": reponse_id, "feedback": "Premier."}),
    )
    .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let app = common::build_test_app(pool);
    let second = post_json(
        app,
        "/api/debriefs",
        Some(&token),
        json!({"reponse_id": reponse_id, "feedback": "Deuxième."}),
    )
    .await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn debrief_on_unowned_activity_is_403(pool: PgPool) {
    let owner = seed_encadrant(&pool, "owner@example.org", "a-password-here").await;
    let other = seed_encadrant(&pool, "other@example.org", "a-password-here").await;
    let student = seed_etudiant(&pool, "student@example.org").await;
    let reponse_id = seed_reponse(&pool, "QUIZ1", owner.id, student.id).await;
    let token = token_for(other.id, &other.role);

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/debriefs",
        Some(&token),
        json!({"reponse_id": reponse_id, "feedback": "Pas à moi."}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn etudiant_cannot_create_debrief(pool: PgPool) {
    let prof = seed_encadrant(&pool, "prof@example.org", "a-password-here").await;
    let student = seed_etudiant(&pool, "student@example.org").await;
    let reponse_id = seed_reponse(&pool, "QUIZ1", prof.id, student.id).await;
    let token = token_for(student.id, &student.role);

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/debriefs",
        Some(&token),
        json!({"reponse_id": reponse_id, "feedback": "Interdit."}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
