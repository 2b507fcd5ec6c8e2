//! Example: Issuing and checking bearer tokens backed by Redis
//!
//! Run with: cargo run --example token_lifecycle_demo -p tk_infra

use tk_core::domain::Token;
use tk_core::errors::TokenError;
use tk_shared::{init_tracing, AppConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    init_tracing(&config.logging)?;

    let services = tk_infra::initialize(&config).await?;
    let manager = &services.token_manager;

    let token = manager.create("u1").await?;
    println!("Created token for {} expiring at {}", token.id, token.expire_at);

    manager.authenticate(&token).await?;
    println!("Token authenticated");

    match manager.authenticate(&Token::credentials("u1", "wrong")).await {
        Err(TokenError::InvalidToken) => println!("Wrong value rejected"),
        other => println!("Unexpected result: {:?}", other),
    }

    let same = manager.get_or_create("u1").await?;
    println!("get_or_create kept the token: {}", same.value == token.value);

    manager.invalidate("u1").await?;
    println!("Token invalidated, lookup now yields: {:?}", manager.get("u1").await.err());

    Ok(())
}
