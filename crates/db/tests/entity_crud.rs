//! Integration tests for entity CRUD operations.
//!
//! Exercises the repository layer against a real database:
//! - Create full hierarchy (encadrant -> activity -> affirmations -> students)
//! - Ordered affirmation association
//! - Unique constraint violations
//! - Cascade delete behaviour

use sqlx::PgPool;
use troublemaker_db::models::activite::{CreateActivite, UpdateActivite};
use troublemaker_db::models::affirmation::CreateAffirmation;
use troublemaker_db::models::categorie::CreateCategorie;
use troublemaker_db::models::user::CreateUser;
use troublemaker_db::repositories::{
    ActiviteRepo, AffirmationRepo, CategorieRepo, UserRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_user(username: &str, role: &str) -> CreateUser {
    CreateUser {
        username: username.to_string(),
        email: format!("{username}@example.org"),
        password_hash: None,
        first_name: None,
        last_name: None,
        role: role.to_string(),
    }
}

fn new_activite(code: &str) -> CreateActivite {
    CreateActivite {
        code: code.to_string(),
        titre: "Quiz de test".to_string(),
        presentation_publique: None,
        description: None,
        type_affirmation_requise: None,
        type_apprenant: None,
        destine_a: None,
        is_published: None,
        etudiants_autorises_ids: vec![],
        etudiants_emails: None,
        affirmations_associes_ids: vec![],
    }
}

fn new_affirmation(texte: &str) -> CreateAffirmation {
    CreateAffirmation {
        affirmation: texte.to_string(),
        explication: None,
        nbr_reponses: 2,
        is_correct_vf: false,
        reponse_correcte_qcm: None,
        activity_code: None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_activity_defaults(pool: PgPool) {
    let prof = UserRepo::create(&pool, &new_user("prof", "encadrant"))
        .await
        .unwrap();

    let activite = ActiviteRepo::create(&pool, "QUIZ1", &new_activite("QUIZ1"), prof.id)
        .await
        .unwrap();

    assert_eq!(activite.code, "QUIZ1");
    assert_eq!(activite.type_affirmation_requise, 2);
    assert_eq!(activite.type_apprenant, "interne");
    assert!(!activite.is_published);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_affirmation_association_preserves_order(pool: PgPool) {
    let prof = UserRepo::create(&pool, &new_user("prof", "encadrant"))
        .await
        .unwrap();
    ActiviteRepo::create(&pool, "QUIZ1", &new_activite("QUIZ1"), prof.id)
        .await
        .unwrap();

    let mut ids = Vec::new();
    for texte in ["a", "b", "c"] {
        let aff = AffirmationRepo::create(&pool, &new_affirmation(texte), prof.id)
            .await
            .unwrap();
        ids.push(aff.id);
    }

    // Associate in an order different from insertion order.
    let order = vec![ids[2], ids[0], ids[1]];
    ActiviteRepo::set_affirmations(&pool, "QUIZ1", &order)
        .await
        .unwrap();

    let listed = ActiviteRepo::list_affirmations(&pool, "QUIZ1")
        .await
        .unwrap();
    let listed_ids: Vec<i64> = listed.iter().map(|a| a.id).collect();
    assert_eq!(listed_ids, order);

    // Re-associating replaces the previous set and order.
    let reordered = vec![ids[1], ids[2]];
    ActiviteRepo::set_affirmations(&pool, "QUIZ1", &reordered)
        .await
        .unwrap();
    let listed = ActiviteRepo::list_affirmations(&pool, "QUIZ1")
        .await
        .unwrap();
    let listed_ids: Vec<i64> = listed.iter().map(|a| a.id).collect();
    assert_eq!(listed_ids, reordered);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_append_affirmation_takes_next_position(pool: PgPool) {
    let prof = UserRepo::create(&pool, &new_user("prof", "encadrant"))
        .await
        .unwrap();
    ActiviteRepo::create(&pool, "QUIZ1", &new_activite("QUIZ1"), prof.id)
        .await
        .unwrap();

    let first = AffirmationRepo::create(&pool, &new_affirmation("a"), prof.id)
        .await
        .unwrap();
    let second = AffirmationRepo::create(&pool, &new_affirmation("b"), prof.id)
        .await
        .unwrap();

    ActiviteRepo::set_affirmations(&pool, "QUIZ1", &[first.id])
        .await
        .unwrap();
    ActiviteRepo::add_affirmation(&pool, "QUIZ1", second.id)
        .await
        .unwrap();

    let listed = ActiviteRepo::list_affirmations(&pool, "QUIZ1")
        .await
        .unwrap();
    let listed_ids: Vec<i64> = listed.iter().map(|a| a.id).collect();
    assert_eq!(listed_ids, vec![first.id, second.id]);

    // Appending again is a no-op.
    ActiviteRepo::add_affirmation(&pool, "QUIZ1", second.id)
        .await
        .unwrap();
    let listed = ActiviteRepo::list_affirmations(&pool, "QUIZ1")
        .await
        .unwrap();
    assert_eq!(listed.len(), 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_category_name_violates_unique(pool: PgPool) {
    CategorieRepo::create(
        &pool,
        &CreateCategorie {
            nom: "PACES".to_string(),
        },
    )
    .await
    .unwrap();

    let result = CategorieRepo::create(
        &pool,
        &CreateCategorie {
            nom: "PACES".to_string(),
        },
    )
    .await;

    match result {
        Err(sqlx::Error::Database(db_err)) => {
            assert_eq!(db_err.constraint(), Some("uq_categories_nom"));
        }
        other => panic!("expected unique violation, got {other:?}"),
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_activity_update_applies_only_provided_fields(pool: PgPool) {
    let prof = UserRepo::create(&pool, &new_user("prof", "encadrant"))
        .await
        .unwrap();
    ActiviteRepo::create(&pool, "QUIZ1", &new_activite("QUIZ1"), prof.id)
        .await
        .unwrap();

    let update = UpdateActivite {
        titre: Some("Nouveau titre".to_string()),
        presentation_publique: None,
        description: None,
        type_apprenant: None,
        destine_a: None,
        is_published: Some(true),
        etudiants_autorises_ids: None,
        etudiants_emails: None,
        affirmations_associes_ids: None,
    };
    let updated = ActiviteRepo::update(&pool, "QUIZ1", &update)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.titre, "Nouveau titre");
    assert!(updated.is_published);
    // Untouched fields keep their defaults.
    assert_eq!(updated.type_apprenant, "interne");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_deleting_activity_cascades_associations(pool: PgPool) {
    let prof = UserRepo::create(&pool, &new_user("prof", "encadrant"))
        .await
        .unwrap();
    let student = UserRepo::create(&pool, &new_user("student", "etudiant"))
        .await
        .unwrap();
    ActiviteRepo::create(&pool, "QUIZ1", &new_activite("QUIZ1"), prof.id)
        .await
        .unwrap();
    let aff = AffirmationRepo::create(&pool, &new_affirmation("a"), prof.id)
        .await
        .unwrap();
    ActiviteRepo::set_affirmations(&pool, "QUIZ1", &[aff.id])
        .await
        .unwrap();
    ActiviteRepo::set_etudiants(&pool, "QUIZ1", &[student.id])
        .await
        .unwrap();

    assert!(ActiviteRepo::delete(&pool, "QUIZ1").await.unwrap());

    let joins: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM activite_affirmations")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(joins.0, 0);

    // The affirmation itself survives; only the association is gone.
    assert!(AffirmationRepo::find_by_id(&pool, aff.id)
        .await
        .unwrap()
        .is_some());
}
