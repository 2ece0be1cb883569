use bson::doc;
use mongodb::{Client, Database, error::Result, options::ClientOptions};
use realty_config::{DatabaseSettings, Settings};
use tracing::info;

const APP_NAME: &str = "realty-api";

/// Driver options for `db`. Pool bounds left unset in settings fall back to
/// whatever the connection string (or the driver) says.
pub async fn client_options(db: &DatabaseSettings) -> Result<ClientOptions> {
    let mut options = ClientOptions::parse(&db.url).await?;
    options.app_name = Some(APP_NAME.to_string());
    options.max_pool_size = db.max_pool_size.or(options.max_pool_size);
    options.min_pool_size = db.min_pool_size.or(options.min_pool_size);
    Ok(options)
}

/// Handle on the configured database. Does not talk to the server.
pub async fn open(db: &DatabaseSettings) -> Result<Database> {
    let client = Client::with_options(client_options(db).await?)?;
    Ok(client.database(&db.name))
}

/// Opens the database and fails fast when the server does not answer a ping.
pub async fn connect(settings: &Settings) -> Result<Database> {
    let db = open(&settings.database).await?;
    db.run_command(doc! { "ping": 1 }).await?;

    info!(db = %db.name(), app = APP_NAME, "Connected to MongoDB");
    Ok(db)
}
