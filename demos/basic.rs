use turso_http::{decode, encode, Query, SqlClient, Statement};

#[derive(Debug)]
struct User {
    id: i64,
    name: String,
    active: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let db = SqlClient::from_env()?;

    db.execute(Statement::new(
        "CREATE TABLE IF NOT EXISTS users (id INTEGER PRIMARY KEY, name TEXT NOT NULL, active INTEGER NOT NULL)",
        [],
    ))
    .await?;

    let inserted = db
        .execute(Statement::new(
            "INSERT INTO users (name, active) VALUES (:name, :active)",
            [encode::text("name", "Kit"), encode::bool("active", true)],
        ))
        .await?;
    println!("inserted rowid {:?}", inserted.last_insert_rowid);

    let users = db
        .query_all(Query::new(
            "SELECT id, name, active FROM users WHERE name = :name",
            [encode::text("name", "Kit")],
            decode::map3(
                |id, name, active| User { id, name, active },
                decode::int("id"),
                decode::string("name"),
                decode::bool("active"),
            ),
        ))
        .await?;

    for user in users.data {
        println!("{user:?}");
    }

    Ok(())
}
