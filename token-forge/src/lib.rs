//! Token Forge: typed JWT payload assembly for identity tokens.
//!
//! A library that turns a token description (issuer, lifetime, audiences,
//! typed claims, optional proof-of-possession confirmation) into a JWT payload
//! and signs it as a compact JWS.
//!
//! # What is in the box?
//!
//! - **Value coercion**: claim values travel as strings tagged with a value
//!   type (`boolean`, `integer64`, `json`, ...). [`coerce()`] parses them
//!   strictly (errors surface) or leniently (unparsable values stay strings).
//! - **Claim aggregation**: [`aggregate()`] collapses a claim list into a
//!   type-keyed map, one scalar or a list per type.
//! - **Payload building**: [`payload::build_payload`] lays out `iss`, `nbf`,
//!   `exp`, `aud`, `cnf`, `scope`, `amr` and the remaining claims in a fixed
//!   order with the RFC 7519 cardinality rules.
//! - **Signing**: [`service::TokenCreationService`] pairs a
//!   [`signing::KeyProvider`] with a [`signing::Signer`] to produce the final
//!   token. Ed25519 (`EdDSA`) is bundled.
//!
//! # Pipeline
//!
//! ```text
//! ┌────────────┐   build_payload   ┌───────────┐  to_json_string  ┌────────────┐
//! │   Token    │──────────────────▶│  Payload  │─────────────────▶│  JwsSigner │──▶ header.payload.sig
//! │  (claims)  │  coerce (strict)  │ (ordered) │                  │  (EdDSA)   │
//! └────────────┘                   └───────────┘                  └────────────┘
//!                                                                       ▲
//!                                                   KeyProvider ────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use ed25519_dalek::SigningKey;
//! use token_forge::{
//!     claims::Claim,
//!     config::TokenOptions,
//!     service::TokenCreationService,
//!     signing::{InMemoryKeyProvider, JwsSigner, SigningCredential},
//!     token::{Token, TokenType},
//! };
//!
//! # async fn example() -> token_forge::Result<()> {
//! // In production, load key material from secure storage
//! let credential = SigningCredential::ed25519(SigningKey::from_bytes(&[0u8; 32]));
//! let service = TokenCreationService::new(InMemoryKeyProvider::new(vec![credential]), JwsSigner)
//!     .with_options(TokenOptions::default().with_space_delimited_scopes(true));
//!
//! let token = Token::new(TokenType::AccessToken, "https://issuer.example.com", 3600)
//!     .with_audience("api1")
//!     .with_claim(Claim::new("sub", "alice"))
//!     .with_claim(Claim::new("scope", "read"))
//!     .with_claim(Claim::new("scope", "write"));
//!
//! let jwt = service.create_token(&token).await?;
//! println!("{jwt}");
//! # Ok(())
//! # }
//! ```
//!
//! # Building a payload without signing
//!
//! ```rust
//! use token_forge::{
//!     claims::{Claim, ClaimValueType},
//!     clock::FixedClock,
//!     config::TokenOptions,
//!     payload::build_payload,
//!     token::{Token, TokenType},
//! };
//!
//! let token = Token::new(TokenType::IdToken, "https://issuer.example.com", 300)
//!     .with_claim(Claim::new("email_verified", "true").with_value_type(ClaimValueType::Boolean));
//!
//! let payload = build_payload(&token, &FixedClock::new(1_700_000_000), &TokenOptions::default())
//!     .unwrap();
//! assert_eq!(
//!     payload.to_json_string().unwrap(),
//!     r#"{"iss":"https://issuer.example.com","nbf":1700000000,"exp":1700000300,"email_verified":true}"#
//! );
//! ```
//!
//! # Error Handling
//!
//! Payload assembly fails atomically with [`error::BuildError`]; no partial
//! payload is produced. Token creation wraps it in [`TokenError`] alongside
//! configuration and signing failures. Every failure is logged through
//! `tracing` with the token's issuer, type and client before it is returned.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod aggregate;
pub mod claims;
pub mod clock;
pub mod coerce;
pub mod config;
pub mod error;
pub mod payload;
pub mod service;
pub mod signing;
pub mod token;
pub mod value;

pub use aggregate::aggregate;
pub use coerce::{CoercionMode, coerce};
pub use error::{BuildError, FormatError, Result, TokenError};
pub use service::TokenCreationService;
