use users_service::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    init_tracing(&config)?;

    let store: Arc<dyn DocumentStore> = Arc::new(MemoryCollection::new());
    let state = AppState::new(config.clone(), store);

    Server::new(config).serve(router(state)).await?;

    shutdown_tracing();
    Ok(())
}
