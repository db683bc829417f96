use solana_signer::SignerError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, HarnessError>;

/// Failures of a harness run. None of them are retried.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Connection details missing or malformed.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// Program not found in the IDL workspace, or its descriptor does not
    /// match the compiled interface.
    #[error("resolution error: {0}")]
    Resolution(String),
    /// The cluster rejected or failed to confirm the transaction.
    #[error("remote call error: {0}")]
    RemoteCall(String),
    /// The transaction could not be signed with the given keypairs.
    #[error("signing error: {0}")]
    Signing(#[from] SignerError),
}
