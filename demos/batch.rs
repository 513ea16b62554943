use turso_http::{encode, SqlClient, Statement, StatementOutcome};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let db = SqlClient::from_env()?;

    let batch = db
        .execute_batch([
            Statement::new(
                "CREATE TABLE IF NOT EXISTS batch_users (id INTEGER PRIMARY KEY, name TEXT NOT NULL)",
                [],
            ),
            Statement::new(
                "INSERT INTO batch_users (name) VALUES (:name)",
                [encode::text("name", "Alice")],
            ),
            Statement::new("INSER INTO batch_users (name) VALUES ('typo')", []),
        ])
        .await?;

    for outcome in batch.outcomes {
        match outcome {
            StatementOutcome::Success(exec) => println!(
                "exec: affected={}, last_insert_rowid={:?}",
                exec.affected_row_count, exec.last_insert_rowid
            ),
            StatementOutcome::Failed {
                request_index,
                error,
                message,
            } => {
                eprintln!("sql error at index {request_index}: {error} ({message})");
            }
        }
    }

    Ok(())
}
