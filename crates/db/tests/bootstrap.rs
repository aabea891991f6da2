use sqlx::PgPool;

/// Full bootstrap test: connect, migrate, verify schema.
#[sqlx::test(migrations = "./migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    // Health check
    troublemaker_db::health_check(&pool).await.unwrap();

    // Verify all entity tables exist (empty but queryable).
    let tables = [
        "users",
        "sessions",
        "categories",
        "activites",
        "activite_etudiants",
        "affirmations",
        "activite_affirmations",
        "reponses",
        "debriefs",
    ];

    for table in tables {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, 0, "{table} should start empty");
    }
}

/// The activity code CHECK rejects malformed codes at the database level.
#[sqlx::test(migrations = "./migrations")]
async fn test_activity_code_check_constraint(pool: PgPool) {
    sqlx::query("INSERT INTO users (username, email, role) VALUES ('p', 'p@x.org', 'encadrant')")
        .execute(&pool)
        .await
        .unwrap();

    let result = sqlx::query(
        "INSERT INTO activites (code, titre, encadrant_id)
         SELECT 'bad-code', 'Titre', id FROM users",
    )
    .execute(&pool)
    .await;

    assert!(result.is_err(), "lowercase/hyphen code must be rejected");
}

/// A response may not carry both payload formats at once.
#[sqlx::test(migrations = "./migrations")]
async fn test_single_format_check_constraint(pool: PgPool) {
    sqlx::query("INSERT INTO users (username, email, role) VALUES ('p', 'p@x.org', 'encadrant')")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("INSERT INTO users (username, email, role) VALUES ('s', 's@x.org', 'etudiant')")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query(
        "INSERT INTO activites (code, titre, encadrant_id)
         SELECT 'QUIZ1', 'Titre', id FROM users WHERE role = 'encadrant'",
    )
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO affirmations (affirmation, nbr_reponses, is_correct_vf)
         VALUES ('Texte', 2, FALSE)",
    )
    .execute(&pool)
    .await
    .unwrap();

    let result = sqlx::query(
        "INSERT INTO reponses (activite_code, affirmation_id, etudiant_id,
                               reponse_vf, reponse_choisie_qcm)
         SELECT 'QUIZ1', a.id, u.id, TRUE, 2
         FROM affirmations a, users u WHERE u.role = 'etudiant'",
    )
    .execute(&pool)
    .await;

    assert!(
        result.is_err(),
        "both reponse_vf and reponse_choisie_qcm set must be rejected"
    );
}
