use turso_http::{
    platform::{TokenAuthorization, TokenOptions},
    PlatformClient, PlatformError,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let platform = PlatformClient::from_env()?;

    for group in platform.list_groups().await? {
        println!("group {} in {:?}", group.name, group.locations);
    }

    for database in platform.list_databases().await? {
        let usage = platform.database_usage(&database.name).await?;
        println!(
            "{} ({}): {} rows read, {} bytes stored",
            database.name, database.hostname, usage.total.rows_read, usage.total.storage_bytes
        );
    }

    let name = std::env::args().nth(1).unwrap_or_else(|| "app".to_owned());
    match platform.retrieve_database(&name).await {
        Ok(database) => {
            let token = platform
                .create_database_token(
                    &database.name,
                    &TokenOptions {
                        expiration: "1d".to_owned(),
                        authorization: TokenAuthorization::ReadOnly,
                    },
                )
                .await?;
            println!("read-only token for {}: {} chars", database.name, token.len());
        }
        Err(PlatformError::DatabaseNotFound(name)) => eprintln!("no database named {name}"),
        Err(err) => return Err(err.into()),
    }

    Ok(())
}
