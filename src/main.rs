use anyhow::Result;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use uuid::Uuid;

use cql_users_demo::{demo, Cluster, CqlUserStore, DemoConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = DemoConfig::from_env();
    let user_id = Uuid::new_v4();
    info!("running CRUD demo with user id {user_id}");

    let cluster = Cluster::connect(&config).await?;
    if let Some(version) = cluster.release_version().await? {
        info!("server release {version}");
    }
    cluster.ensure_schema(&config).await?;

    let store = CqlUserStore::new(cluster.session());
    demo::run_to_completion(&store, user_id, || cluster.shutdown()).await?;

    info!("demo complete");
    Ok(())
}
