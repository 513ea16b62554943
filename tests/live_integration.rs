use std::{
    fs,
    time::{SystemTime, UNIX_EPOCH},
};

use serde::Deserialize;
use turso_http::{
    decode, encode, pipeline_url_from_database_url, PlatformClient, Query, SqlClient, SqlError,
    Statement, StatementOutcome,
};

#[derive(Debug, Deserialize)]
struct SecretsFile {
    #[serde(rename = "TURSO_DATABASE_URL")]
    database_url: Option<String>,
    #[serde(rename = "TURSO_AUTH_TOKEN")]
    auth_token: Option<String>,
}

fn load_live_database() -> Result<SqlClient, String> {
    if let Ok(client) = SqlClient::from_env() {
        return Ok(client);
    }

    let content = fs::read_to_string("secrets.json").map_err(|_| {
        "TURSO_DATABASE_URL/TURSO_AUTH_TOKEN env or secrets.json is required".to_owned()
    })?;
    let parsed: SecretsFile = serde_json::from_str(&content)
        .map_err(|err| format!("secrets.json could not be parsed: {err}"))?;

    let url = parsed
        .database_url
        .ok_or_else(|| "missing TURSO_DATABASE_URL in secrets.json".to_owned())?;
    let token = parsed
        .auth_token
        .ok_or_else(|| "missing TURSO_AUTH_TOKEN in secrets.json".to_owned())?;

    Ok(SqlClient::new(pipeline_url_from_database_url(&url), token))
}

fn unique_suffix() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock must be after epoch")
        .as_millis()
}

#[tokio::test]
async fn live_roundtrip_and_batch_error_propagation() {
    let db = match load_live_database() {
        Ok(db) => db,
        Err(_) => {
            eprintln!("skipping live test: credentials not found in env or secrets.json");
            return;
        }
    };
    let table = format!("users_live_{}", unique_suffix());

    db.execute(Statement::new(
        format!("CREATE TABLE IF NOT EXISTS {table} (id INTEGER PRIMARY KEY, name TEXT NOT NULL)"),
        [],
    ))
    .await
    .expect("table creation must succeed");

    let inserted = db
        .execute(Statement::new(
            format!("INSERT INTO {table} (name) VALUES (:name)"),
            [encode::text("name", "Kit")],
        ))
        .await
        .expect("insert must succeed");
    assert_eq!(inserted.affected_row_count, 1);

    let name = db
        .query_one(Query::new(
            format!("SELECT id, name FROM {table} WHERE name = :name"),
            [encode::text("name", "Kit")],
            decode::string("name"),
        ))
        .await
        .expect("query must succeed");
    assert_eq!(name.data, "Kit");

    let batch = db
        .execute_batch([
            Statement::new(
                format!("INSERT INTO {table} (name) VALUES (:name)"),
                [encode::text("name", "BatchA")],
            ),
            Statement::new(
                format!("INSER INTO {table} (name) VALUES (:name)"),
                [encode::text("name", "BatchB")],
            ),
            Statement::new(format!("SELECT COUNT(*) FROM {table}"), []),
        ])
        .await
        .expect("batch must return outcomes");

    assert_eq!(batch.outcomes.len(), 3);
    assert!(batch.outcomes[0].is_success());
    assert!(matches!(
        batch.outcomes[1],
        StatementOutcome::Failed {
            request_index: 1,
            error: SqlError::SqlParseError,
            ..
        }
    ));
    assert!(batch.outcomes[2].is_success());

    db.execute(Statement::new(format!("DROP TABLE IF EXISTS {table}"), []))
        .await
        .expect("cleanup must succeed");
}

#[tokio::test]
async fn live_platform_lists_databases() {
    let platform = match PlatformClient::from_env() {
        Ok(platform) => platform,
        Err(err) => {
            eprintln!("skipping live platform test: {err}");
            return;
        }
    };

    let validation = platform
        .validate_api_token()
        .await
        .expect("token must validate");
    if let Some(expires_at) = validation.expires_at() {
        assert!(expires_at > chrono::Utc::now());
    }

    platform
        .list_databases()
        .await
        .expect("listing databases must succeed");
}
