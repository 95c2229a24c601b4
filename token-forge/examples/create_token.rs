//! Token creation example.
//!
//! Builds an access token with scopes, authentication methods and a
//! proof-of-possession confirmation, signs it, and prints the JWKS a resource
//! server needs to verify it.

#![allow(clippy::print_stdout, reason = "examples need output")]

use ed25519_dalek::SigningKey;
use token_forge::{
    TokenCreationService,
    claims::{Claim, ClaimValueType},
    config::TokenOptions,
    signing::{InMemoryKeyProvider, JwsSigner, SigningCredential},
    token::{Token, TokenType},
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Token Forge: Token Creation Example\n");

    // In production: load the key from secure storage
    let credential = SigningCredential::ed25519(SigningKey::from_bytes(&[0u8; 32]));
    let keys = InMemoryKeyProvider::new(vec![credential]);
    let jwks = keys.jwks();

    let service = TokenCreationService::new(keys, JwsSigner)
        .with_options(TokenOptions::default().with_space_delimited_scopes(true));

    let token = Token::new(TokenType::AccessToken, "https://identity.example.com", 3600)
        .with_audience("orders-api")
        .with_client_id("web-app")
        .with_confirmation(r#"{"jkt":"0ZcOCORZNYy-DWpqq30jZyJGHTN0d2HglBV3uiguA4I"}"#)
        .with_claims([
            Claim::new("sub", "alice"),
            Claim::new("scope", "orders.read"),
            Claim::new("scope", "orders.write"),
            Claim::new("amr", "pwd"),
            Claim::new("amr", "otp"),
            Claim::new("auth_time", "1700000000").with_value_type(ClaimValueType::Integer64),
        ]);

    let jwt = service.create_token(&token).await?;
    println!("Access token:\n{jwt}\n");

    println!("JWKS for /.well-known/jwks.json:");
    println!("{}", jwks.to_json()?);

    Ok(())
}
