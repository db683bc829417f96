use crate::error::{HarnessError, Result};
use crate::provider::Provider;
use crate::workspace::ProgramHandle;
use aixblock::state::{ContributionType, CONTRIBUTOR_SEED, GLOBAL_STATE_SEED};
use anchor_lang::prelude::Pubkey;
use anchor_lang::{InstructionData, ToAccountMetas};
use solana_address::Address;
use solana_instruction::{account_meta::AccountMeta, Instruction};

/// A built but not yet submitted program call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodCall {
    pub method: &'static str,
    pub program_id: Address,
    pub data: Vec<u8>,
    pub accounts: Vec<AccountMeta>,
}

impl MethodCall {
    pub fn remaining_accounts(mut self, metas: impl IntoIterator<Item = AccountMeta>) -> Self {
        self.accounts.extend(metas);
        self
    }

    pub fn instruction(&self) -> Instruction {
        Instruction {
            program_id: self.program_id,
            accounts: self.accounts.clone(),
            data: self.data.clone(),
        }
    }
}

/// Typed call builders for the `aixblock` program, one per instruction.
///
/// Default accounts come from the provider: the payer signs as authority or
/// wallet, and PDAs are derived from the resolved program address.
pub struct Methods<'a> {
    program: &'a ProgramHandle,
    payer: Address,
}

impl<'a> Methods<'a> {
    pub fn new(program: &'a ProgramHandle, provider: &Provider) -> Self {
        Self {
            program,
            payer: provider.payer_address(),
        }
    }

    pub fn initialize(&self) -> Result<MethodCall> {
        self.call(
            "initialize",
            aixblock::instruction::Initialize {},
            aixblock::accounts::Initialize {
                global_state: pubkey(&self.global_state()),
                authority: pubkey(&self.payer),
                system_program: anchor_lang::system_program::ID,
            },
        )
    }

    pub fn register_contributor(&self, wallet: Address) -> Result<MethodCall> {
        self.call(
            "register_contributor",
            aixblock::instruction::RegisterContributor {},
            aixblock::accounts::RegisterContributor {
                global_state: pubkey(&self.global_state()),
                contributor: pubkey(&self.contributor(&wallet)),
                wallet: pubkey(&wallet),
                system_program: anchor_lang::system_program::ID,
            },
        )
    }

    pub fn log_contribution(
        &self,
        wallet: Address,
        category: ContributionType,
        impact: u8,
    ) -> Result<MethodCall> {
        self.call(
            "log_contribution",
            aixblock::instruction::LogContribution { category, impact },
            aixblock::accounts::LogContribution {
                contributor: pubkey(&self.contributor(&wallet)),
                global_state: pubkey(&self.global_state()),
                authority: pubkey(&self.payer),
            },
        )
    }

    pub fn set_reward_mint(&self, mint: Address) -> Result<MethodCall> {
        self.call(
            "set_reward_mint",
            aixblock::instruction::SetRewardMint {},
            aixblock::accounts::SetRewardMint {
                global_state: pubkey(&self.global_state()),
                authority: pubkey(&self.payer),
                reward_mint: pubkey(&mint),
            },
        )
    }

    /// `recipients` are token accounts in the order contributors were
    /// registered.
    pub fn distribute_rewards(
        &self,
        monthly_pool: u64,
        reward_vault: Address,
        recipients: &[Address],
    ) -> Result<MethodCall> {
        let call = self.call(
            "distribute_rewards",
            aixblock::instruction::DistributeRewards { monthly_pool },
            aixblock::accounts::DistributeRewards {
                global_state: pubkey(&self.global_state()),
                authority: pubkey(&self.payer),
                reward_vault: pubkey(&reward_vault),
                token_program: anchor_spl::token::ID,
            },
        )?;
        Ok(call.remaining_accounts(
            recipients
                .iter()
                .map(|recipient| AccountMeta::new(*recipient, false)),
        ))
    }

    pub fn global_state(&self) -> Address {
        global_state_address(&self.program.address)
    }

    pub fn contributor(&self, wallet: &Address) -> Address {
        contributor_address(&self.program.address, wallet)
    }

    fn call<I, A>(&self, method: &'static str, args: I, accounts: A) -> Result<MethodCall>
    where
        I: InstructionData,
        A: ToAccountMetas,
    {
        let spec = self.program.method(method).ok_or_else(|| {
            HarnessError::Resolution(format!(
                "{} does not expose method {method}",
                self.program.name
            ))
        })?;
        if spec.discriminator.as_slice() != I::DISCRIMINATOR {
            return Err(HarnessError::Resolution(format!(
                "{}.{method} discriminator {:?} does not match the compiled interface {:?}",
                self.program.name,
                spec.discriminator,
                I::DISCRIMINATOR
            )));
        }

        Ok(MethodCall {
            method,
            program_id: self.program.address,
            data: args.data(),
            accounts: accounts
                .to_account_metas(None)
                .into_iter()
                .map(|meta| AccountMeta {
                    pubkey: Address::from(meta.pubkey.to_bytes()),
                    is_signer: meta.is_signer,
                    is_writable: meta.is_writable,
                })
                .collect(),
        })
    }
}

pub fn global_state_address(program_id: &Address) -> Address {
    let (pda, _) = Pubkey::find_program_address(&[GLOBAL_STATE_SEED], &pubkey(program_id));
    Address::from(pda.to_bytes())
}

pub fn contributor_address(program_id: &Address, wallet: &Address) -> Address {
    let wallet = wallet.to_bytes();
    let (pda, _) = Pubkey::find_program_address(&[CONTRIBUTOR_SEED, &wallet], &pubkey(program_id));
    Address::from(pda.to_bytes())
}

fn pubkey(address: &Address) -> Pubkey {
    Pubkey::new_from_array(address.to_bytes())
}
