use anchor_lang::prelude::*;

#[error_code]
pub enum AixblockError {
    #[msg("Invalid impact level.")]
    InvalidImpact,
    #[msg("No contributions to distribute rewards.")]
    NoContributions,
    #[msg("Contributor registry is full.")]
    ContributorLimitReached,
    #[msg("Contributor is not registered in the global state.")]
    ContributorNotRegistered,
    #[msg("Arithmetic overflow.")]
    MathOverflow,
    #[msg("Reward vault does not hold the reward mint or is not owned by the global state.")]
    VaultMismatch,
    #[msg("Recipient token accounts do not match the registered contributors.")]
    RecipientMismatch,
}
