use super::*;
use crate::test_utils::{global, ledger_versions, make_project, write_users_migrations};

fn status(version: i64, name: &str, applied: bool, known: bool) -> MigrationStatus {
    MigrationStatus {
        version,
        name: name.to_string(),
        applied,
        known,
    }
}

#[test]
fn test_status_rows() {
    let rows = status_rows(&[
        status(1, "create_users", true, true),
        status(2, "dropped_file", true, false),
        status(3, "add_email_column", false, true),
    ]);

    assert_eq!(
        rows,
        vec![
            vec!["001".to_string(), "create_users".to_string(), "applied".to_string()],
            vec![
                "002".to_string(),
                "dropped_file".to_string(),
                "applied (missing file)".to_string()
            ],
            vec!["003".to_string(), "add_email_column".to_string(), "pending".to_string()],
        ]
    );
}

#[test]
fn test_status_serializes_to_json() {
    let json = serde_json::to_value([status(1, "create_users", true, true)]).unwrap();
    assert_eq!(
        json,
        serde_json::json!([
            {"version": 1, "name": "create_users", "applied": true, "known": true}
        ])
    );
}

#[test]
fn test_current_version_from_statuses() {
    assert_eq!(current_version(&[]), 0);
    assert_eq!(
        current_version(&[
            status(1, "create_users", true, true),
            status(2, "dropped_file", true, false),
            status(3, "add_email_column", false, true),
        ]),
        2
    );
}

#[tokio::test]
async fn test_status_on_fresh_project() {
    let project = make_project();
    write_users_migrations(project.path());

    execute(&StatusArgs { json: false }, &global(project.path()))
        .await
        .unwrap();
    execute(&StatusArgs { json: true }, &global(project.path()))
        .await
        .unwrap();

    assert!(!project.path().join("app.duckdb").exists());
}

#[tokio::test]
async fn test_status_reads_migrated_database() {
    let project = make_project();
    write_users_migrations(project.path());
    let global = global(project.path());
    crate::commands::migrate::execute(&crate::cli::MigrateArgs { dry_run: false }, &global)
        .await
        .unwrap();

    execute(&StatusArgs { json: true }, &global).await.unwrap();

    assert_eq!(
        ledger_versions(&project.path().join("app.duckdb"), "schema_migrations"),
        vec![1, 2]
    );
}
