use crate::error::{HarnessError, Result};
use solana_address::Address;
use solana_commitment_config::CommitmentConfig;
use solana_keypair::Keypair;
use solana_signer::Signer;
use std::fs;
use std::path::{Path, PathBuf};

pub const PROVIDER_URL_ENV: &str = "ANCHOR_PROVIDER_URL";
pub const WALLET_ENV: &str = "ANCHOR_WALLET";

/// Connection context: cluster endpoint, fee payer and commitment.
///
/// Built once per run and only read afterwards.
pub struct Provider {
    url: String,
    payer: Keypair,
    commitment: CommitmentConfig,
}

impl Provider {
    pub fn new(url: impl Into<String>, payer: Keypair, commitment: CommitmentConfig) -> Self {
        Self {
            url: url.into(),
            payer,
            commitment,
        }
    }

    /// Reads `ANCHOR_PROVIDER_URL` and `ANCHOR_WALLET` from the process
    /// environment.
    pub fn env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Provider::env`] with a caller-supplied variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let url = required(&lookup, PROVIDER_URL_ENV)?;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(HarnessError::Configuration(format!(
                "{PROVIDER_URL_ENV} must be an http(s) URL, got {url}"
            )));
        }

        let wallet = required(&lookup, WALLET_ENV)?;
        let payer = read_wallet(&expand_home(&wallet, &lookup))?;

        Ok(Self::new(url, payer, CommitmentConfig::processed()))
    }

    pub fn with_commitment(mut self, commitment: CommitmentConfig) -> Self {
        self.commitment = commitment;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn payer(&self) -> &Keypair {
        &self.payer
    }

    pub fn payer_address(&self) -> Address {
        self.payer.pubkey()
    }

    pub fn commitment(&self) -> CommitmentConfig {
        self.commitment
    }
}

pub fn parse_commitment(value: &str) -> Result<CommitmentConfig> {
    match value {
        "processed" => Ok(CommitmentConfig::processed()),
        "confirmed" => Ok(CommitmentConfig::confirmed()),
        "finalized" => Ok(CommitmentConfig::finalized()),
        other => Err(HarnessError::Configuration(format!(
            "unknown commitment level {other}"
        ))),
    }
}

/// Loads a keypair stored as a JSON array of 64 bytes.
pub fn read_wallet(path: &Path) -> Result<Keypair> {
    let content = fs::read_to_string(path).map_err(|e| {
        HarnessError::Configuration(format!("failed reading wallet {}: {e}", path.display()))
    })?;
    let bytes: Vec<u8> = serde_json::from_str(&content).map_err(|e| {
        HarnessError::Configuration(format!("invalid wallet JSON in {}: {e}", path.display()))
    })?;
    Keypair::try_from(bytes.as_slice()).map_err(|e| {
        HarnessError::Configuration(format!("invalid keypair bytes in {}: {e}", path.display()))
    })
}

fn required(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String> {
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(HarnessError::Configuration(format!("{key} is not set"))),
    }
}

fn expand_home(path: &str, lookup: &impl Fn(&str) -> Option<String>) -> PathBuf {
    match (path.strip_prefix("~/"), lookup("HOME")) {
        (Some(rest), Some(home)) => Path::new(&home).join(rest),
        _ => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commitment_levels_parse() {
        assert_eq!(parse_commitment("confirmed").unwrap(), CommitmentConfig::confirmed());
        assert_eq!(parse_commitment("finalized").unwrap(), CommitmentConfig::finalized());
        assert!(matches!(
            parse_commitment("recent"),
            Err(HarnessError::Configuration(_))
        ));
    }

    #[test]
    fn home_prefix_expands() {
        let lookup = |key: &str| (key == "HOME").then(|| "/home/dev".to_string());
        assert_eq!(
            expand_home("~/.config/solana/id.json", &lookup),
            PathBuf::from("/home/dev/.config/solana/id.json")
        );
        assert_eq!(expand_home("/tmp/id.json", &lookup), PathBuf::from("/tmp/id.json"));
    }
}
