use anchor_lang::prelude::*;
use anchor_spl::token::{self, Mint, Token, TokenAccount, Transfer};

pub mod error;
pub mod rewards;
pub mod state;

use error::AixblockError;
use state::*;

declare_id!("HXYeNBMbc5SXSsqgeJDiKZZ3wsG6i8VPjZn3NGr4aHXw");

#[program]
pub mod aixblock {
    use super::*;

    pub fn initialize(ctx: Context<Initialize>) -> Result<()> {
        let global_state = &mut ctx.accounts.global_state;
        global_state.authority = ctx.accounts.authority.key();
        global_state.reward_mint = Pubkey::default();
        global_state.bump = ctx.bumps.global_state;
        global_state.contributors = Vec::new();

        msg!("Greetings from: {:?}", ctx.program_id);
        Ok(())
    }

    pub fn register_contributor(ctx: Context<RegisterContributor>) -> Result<()> {
        let wallet = ctx.accounts.wallet.key();
        let global_state = &mut ctx.accounts.global_state;
        require!(
            global_state.contributors.len() < MAX_CONTRIBUTORS,
            AixblockError::ContributorLimitReached
        );
        global_state.contributors.push(ContributorEntry {
            wallet,
            total_points: 0,
        });

        let contributor = &mut ctx.accounts.contributor;
        contributor.wallet = wallet;
        contributor.total_points = 0;
        contributor.contribution_count = 0;
        contributor.last_contribution = None;
        contributor.bump = ctx.bumps.contributor;
        Ok(())
    }

    pub fn log_contribution(
        ctx: Context<LogContribution>,
        category: ContributionType,
        impact: u8,
    ) -> Result<()> {
        require!(impact <= 10, AixblockError::InvalidImpact);
        let points = category.assign_points(impact)?;

        let contributor = &mut ctx.accounts.contributor;
        contributor.total_points = contributor
            .total_points
            .checked_add(points)
            .ok_or(AixblockError::MathOverflow)?;
        contributor.contribution_count = contributor
            .contribution_count
            .checked_add(1)
            .ok_or(AixblockError::MathOverflow)?;
        let timestamp = Clock::get()?.unix_timestamp;
        contributor.last_contribution = Some(Contribution {
            category,
            impact,
            timestamp,
        });

        let entry = ctx.accounts.global_state.entry_mut(&contributor.wallet)?;
        entry.total_points = contributor.total_points;

        emit!(ContributionLogged {
            wallet: contributor.wallet,
            category,
            impact,
            points,
            total_points: contributor.total_points,
            timestamp,
        });
        Ok(())
    }

    pub fn set_reward_mint(ctx: Context<SetRewardMint>) -> Result<()> {
        ctx.accounts.global_state.reward_mint = ctx.accounts.reward_mint.key();
        Ok(())
    }

    pub fn distribute_rewards<'info>(
        ctx: Context<'_, '_, 'info, 'info, DistributeRewards<'info>>,
        monthly_pool: u64,
    ) -> Result<()> {
        let global_state = &ctx.accounts.global_state;
        require!(
            ctx.remaining_accounts.len() == global_state.contributors.len(),
            AixblockError::RecipientMismatch
        );

        let points: Vec<u64> = global_state
            .contributors
            .iter()
            .map(|entry| entry.total_points)
            .collect();
        let total_points = global_state.total_points()?;
        let rewards = rewards::reward_shares(&points, total_points, monthly_pool)?;

        let bump = [global_state.bump];
        let signer_seeds: &[&[&[u8]]] = &[&[GLOBAL_STATE_SEED, &bump]];

        for ((entry, amount), recipient_info) in global_state
            .contributors
            .iter()
            .zip(rewards)
            .zip(ctx.remaining_accounts.iter())
        {
            let recipient = Account::<TokenAccount>::try_from(recipient_info)?;
            require_keys_eq!(recipient.owner, entry.wallet, AixblockError::RecipientMismatch);
            require_keys_eq!(
                recipient.mint,
                global_state.reward_mint,
                AixblockError::RecipientMismatch
            );
            if amount == 0 {
                continue;
            }

            let cpi_accounts = Transfer {
                from: ctx.accounts.reward_vault.to_account_info(),
                to: recipient_info.clone(),
                authority: global_state.to_account_info(),
            };
            token::transfer(
                CpiContext::new_with_signer(
                    ctx.accounts.token_program.to_account_info(),
                    cpi_accounts,
                    signer_seeds,
                ),
                amount,
            )?;
            msg!("Rewarded {} with {}", entry.wallet, amount);
        }

        Ok(())
    }
}

#[derive(Accounts)]
pub struct Initialize<'info> {
    #[account(
        init,
        payer = authority,
        space = 8 + GlobalState::INIT_SPACE,
        seeds = [GLOBAL_STATE_SEED],
        bump
    )]
    pub global_state: Account<'info, GlobalState>,
    #[account(mut)]
    pub authority: Signer<'info>,
    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct RegisterContributor<'info> {
    #[account(mut, seeds = [GLOBAL_STATE_SEED], bump = global_state.bump)]
    pub global_state: Account<'info, GlobalState>,
    #[account(
        init,
        payer = wallet,
        space = 8 + Contributor::INIT_SPACE,
        seeds = [CONTRIBUTOR_SEED, wallet.key().as_ref()],
        bump
    )]
    pub contributor: Account<'info, Contributor>,
    #[account(mut)]
    pub wallet: Signer<'info>,
    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct LogContribution<'info> {
    #[account(
        mut,
        seeds = [CONTRIBUTOR_SEED, contributor.wallet.as_ref()],
        bump = contributor.bump
    )]
    pub contributor: Account<'info, Contributor>,
    #[account(
        mut,
        seeds = [GLOBAL_STATE_SEED],
        bump = global_state.bump,
        has_one = authority
    )]
    pub global_state: Account<'info, GlobalState>,
    pub authority: Signer<'info>,
}

#[derive(Accounts)]
pub struct SetRewardMint<'info> {
    #[account(
        mut,
        seeds = [GLOBAL_STATE_SEED],
        bump = global_state.bump,
        has_one = authority
    )]
    pub global_state: Account<'info, GlobalState>,
    pub authority: Signer<'info>,
    pub reward_mint: Account<'info, Mint>,
}

#[derive(Accounts)]
pub struct DistributeRewards<'info> {
    #[account(seeds = [GLOBAL_STATE_SEED], bump = global_state.bump, has_one = authority)]
    pub global_state: Account<'info, GlobalState>,
    pub authority: Signer<'info>,
    #[account(
        mut,
        constraint = reward_vault.mint == global_state.reward_mint @ AixblockError::VaultMismatch,
        constraint = reward_vault.owner == global_state.key() @ AixblockError::VaultMismatch
    )]
    pub reward_vault: Account<'info, TokenAccount>,
    pub token_program: Program<'info, Token>,
}

#[event]
pub struct ContributionLogged {
    pub wallet: Pubkey,
    pub category: ContributionType,
    pub impact: u8,
    pub points: u64,
    pub total_points: u64,
    pub timestamp: i64,
}
