//! Command-line arguments and input loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use base64::{
    Engine as _,
    engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD},
};
use clap::Parser;
use ed25519_dalek::SigningKey;
use token_forge::{config::TokenOptions, token::Token};
use zeroize::Zeroizing;

use crate::observability::LogFormat;

/// Build and sign JWTs from JSON token descriptions.
#[derive(Debug, Parser)]
#[command(name = "token-forge", version, about)]
pub struct Cli {
    /// Token description (JSON). Use `-` for stdin.
    #[arg(long, value_name = "PATH", required_unless_present = "print_jwks")]
    pub token: Option<PathBuf>,

    /// Token options (TOML). Defaults apply when omitted.
    #[arg(long, value_name = "PATH", env = "TOKEN_FORGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Base64 (standard or url-safe) Ed25519 seed, 32 bytes.
    #[arg(
        long,
        value_name = "BASE64",
        env = "TOKEN_FORGE_SIGNING_KEY",
        hide_env_values = true,
        conflicts_with = "key_file"
    )]
    pub signing_key: Option<String>,

    /// File holding a base64 Ed25519 seed.
    #[arg(long, value_name = "PATH")]
    pub key_file: Option<PathBuf>,

    /// Print the unsigned payload JSON instead of a signed token.
    #[arg(long)]
    pub payload_only: bool,

    /// Print the JWK set for the signing key and exit.
    #[arg(long, conflicts_with_all = ["token", "payload_only"])]
    pub print_jwks: bool,

    /// Log output format.
    #[arg(long, value_enum, env = "LOG_FORMAT", default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// Log level used when `RUST_LOG` is unset.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Cli {
    /// Loads token options from `--config`, or defaults.
    pub fn options(&self) -> anyhow::Result<TokenOptions> {
        match &self.config {
            Some(path) => Ok(TokenOptions::from_file(path)?),
            None => Ok(TokenOptions::default()),
        }
    }

    /// Reads and parses the token description.
    pub fn token(&self) -> anyhow::Result<Token> {
        let Some(path) = &self.token else {
            bail!("--token is required");
        };
        let text = if path == Path::new("-") {
            std::io::read_to_string(std::io::stdin()).context("cannot read token from stdin")?
        } else {
            std::fs::read_to_string(path)
                .with_context(|| format!("cannot read token '{}'", path.display()))?
        };
        serde_json::from_str(&text).context("invalid token description")
    }

    /// Resolves the signing key from `--signing-key` or `--key-file`.
    pub fn signing_key(&self) -> anyhow::Result<SigningKey> {
        let encoded = Zeroizing::new(match (&self.signing_key, &self.key_file) {
            (Some(encoded), _) => encoded.clone(),
            (None, Some(path)) => std::fs::read_to_string(path)
                .with_context(|| format!("cannot read key file '{}'", path.display()))?,
            (None, None) => {
                bail!("no signing key: set TOKEN_FORGE_SIGNING_KEY or pass --key-file")
            }
        });
        decode_seed(&encoded)
    }
}

/// Accepts standard or url-safe base64, padded or not.
fn decode_seed(encoded: &str) -> anyhow::Result<SigningKey> {
    let encoded = encoded.trim();
    let bytes = Zeroizing::new(
        STANDARD
            .decode(encoded)
            .or_else(|_| URL_SAFE_NO_PAD.decode(encoded.trim_end_matches('=')))
            .context("signing key is not valid base64")?,
    );
    let seed = Zeroizing::new(<[u8; 32]>::try_from(bytes.as_slice()).map_err(|_| {
        anyhow::anyhow!("signing key must be 32 bytes, got {}", bytes.len())
    })?);
    Ok(SigningKey::from_bytes(&seed))
}
