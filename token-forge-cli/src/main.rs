//! `token-forge`: build and sign identity tokens from the command line.
//!
//! Reads a JSON token description, applies TOML token options, and prints a
//! compact EdDSA-signed JWT (or the unsigned payload) to stdout.
//!
//! # Environment Variables
//!
//! - `TOKEN_FORGE_SIGNING_KEY`: base64 Ed25519 seed
//! - `TOKEN_FORGE_CONFIG`: path to token options
//! - `LOG_FORMAT`: `json` or `pretty` (default: `pretty`)
//! - `RUST_LOG`: log filter (default: `info`)

mod cli;
mod observability;

use clap::Parser;
use token_forge::{
    TokenCreationService,
    clock::SystemClock,
    payload::build_payload,
    signing::{InMemoryKeyProvider, JwsSigner, SigningCredential},
};
use tracing::{error, info};

use crate::{cli::Cli, observability::init_observability};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_observability(cli.log_format, &cli.log_level);

    run(&cli).await.inspect_err(|e| error!(error = %e, "token-forge failed"))
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    if cli.payload_only {
        let token = cli.token()?;
        let payload = build_payload(&token, &SystemClock, &cli.options()?)?;
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    let credential = SigningCredential::ed25519(cli.signing_key()?);
    info!(kid = credential.key_id(), alg = credential.algorithm(), "Signing key loaded");
    let keys = InMemoryKeyProvider::new(vec![credential]);

    if cli.print_jwks {
        println!("{}", keys.jwks().to_json()?);
        return Ok(());
    }

    let token = cli.token()?;
    let service = TokenCreationService::new(keys, JwsSigner).with_options(cli.options()?);
    let jwt = service.create_token(&token).await?;
    println!("{jwt}");
    Ok(())
}
