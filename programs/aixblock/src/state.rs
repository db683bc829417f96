use anchor_lang::prelude::*;

use crate::error::AixblockError;

pub const GLOBAL_STATE_SEED: &[u8] = b"global";
pub const CONTRIBUTOR_SEED: &[u8] = b"contributor";

/// Upper bound on registered contributors.
pub const MAX_CONTRIBUTORS: usize = 32;

#[account]
#[derive(InitSpace)]
pub struct GlobalState {
    pub authority: Pubkey,
    pub reward_mint: Pubkey,
    pub bump: u8,
    #[max_len(MAX_CONTRIBUTORS)]
    pub contributors: Vec<ContributorEntry>,
}

impl GlobalState {
    pub fn entry_mut(&mut self, wallet: &Pubkey) -> Result<&mut ContributorEntry> {
        self.contributors
            .iter_mut()
            .find(|entry| entry.wallet == *wallet)
            .ok_or_else(|| AixblockError::ContributorNotRegistered.into())
    }

    pub fn total_points(&self) -> Result<u64> {
        self.contributors
            .iter()
            .try_fold(0u64, |acc, entry| acc.checked_add(entry.total_points))
            .ok_or_else(|| AixblockError::MathOverflow.into())
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, InitSpace)]
pub struct ContributorEntry {
    pub wallet: Pubkey,
    pub total_points: u64,
}

/// Per-wallet record. Only the latest contribution is kept; the history is
/// reduced to a count.
#[account]
#[derive(InitSpace)]
pub struct Contributor {
    pub wallet: Pubkey,
    pub total_points: u64,
    pub contribution_count: u64,
    pub last_contribution: Option<Contribution>,
    pub bump: u8,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, InitSpace)]
pub struct Contribution {
    pub category: ContributionType,
    pub impact: u8,
    pub timestamp: i64,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub enum ContributionType {
    BugFix,
    FeatureDev,
    CodeOptimization,
    BugReport,
    TestContribution,
}

impl ContributionType {
    pub fn assign_points(&self, impact: u8) -> Result<u64> {
        let points = match self {
            ContributionType::BugFix | ContributionType::BugReport => match impact {
                1..=2 => 1,
                3..=5 => 3,
                6..=8 => 6,
                9..=10 => 9,
                _ => return err!(AixblockError::InvalidImpact),
            },
            ContributionType::FeatureDev => match impact {
                2..=4 => 2,
                5..=7 => 5,
                8..=10 => 8,
                _ => return err!(AixblockError::InvalidImpact),
            },
            ContributionType::CodeOptimization => match impact {
                1..=2 => 1,
                3..=5 => 3,
                6..=8 => 6,
                _ => return err!(AixblockError::InvalidImpact),
            },
            ContributionType::TestContribution => match impact {
                2..=4 => 2,
                5..=7 => 5,
                _ => return err!(AixblockError::InvalidImpact),
            },
        };
        Ok(points)
    }
}
