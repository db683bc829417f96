#![allow(dead_code)]

use aixblock_harness::{HarnessError, LiteSvmTransport, Result, Transport};
use anchor_lang::solana_program::program_pack::Pack;
use anchor_lang::Discriminator;
use anchor_spl::token::spl_token;
use serde_json::{json, Value};
use solana_account::Account;
use solana_address::Address;
use solana_hash::Hash;
use solana_keypair::Keypair;
use solana_signer::Signer;
use solana_signature::Signature;
use solana_transaction::Transaction;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub fn program_id() -> Address {
    Address::from(aixblock::ID.to_bytes())
}

/// Descriptor entries for every aixblock instruction, with the compiled
/// discriminators.
pub fn aixblock_instructions() -> Vec<Value> {
    vec![
        instruction(
            "initialize",
            aixblock::instruction::Initialize::DISCRIMINATOR,
            &["global_state", "authority", "system_program"],
        ),
        instruction(
            "register_contributor",
            aixblock::instruction::RegisterContributor::DISCRIMINATOR,
            &["global_state", "contributor", "wallet", "system_program"],
        ),
        instruction(
            "log_contribution",
            aixblock::instruction::LogContribution::DISCRIMINATOR,
            &["contributor", "global_state", "authority"],
        ),
        instruction(
            "set_reward_mint",
            aixblock::instruction::SetRewardMint::DISCRIMINATOR,
            &["global_state", "authority", "reward_mint"],
        ),
        instruction(
            "distribute_rewards",
            aixblock::instruction::DistributeRewards::DISCRIMINATOR,
            &["global_state", "authority", "reward_vault", "token_program"],
        ),
    ]
}

pub fn instruction(name: &str, discriminator: &[u8], accounts: &[&str]) -> Value {
    json!({
        "name": name,
        "discriminator": discriminator,
        "accounts": accounts.iter().map(|a| json!({ "name": a })).collect::<Vec<_>>(),
        "args": []
    })
}

/// An Anchor project root holding `target/idl/<file_stem>.json`.
pub fn workspace_with_idl(file_stem: &str, instructions: Vec<Value>) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let idl_dir = dir.path().join("target").join("idl");
    fs::create_dir_all(&idl_dir).unwrap();
    let idl = json!({
        "address": program_id().to_string(),
        "metadata": { "name": file_stem, "version": "0.1.0", "spec": "0.1.0" },
        "instructions": instructions
    });
    fs::write(
        idl_dir.join(format!("{file_stem}.json")),
        serde_json::to_string_pretty(&idl).unwrap(),
    )
    .unwrap();
    dir
}

pub fn aixblock_workspace() -> TempDir {
    workspace_with_idl("aixblock", aixblock_instructions())
}

pub fn write_wallet(dir: &Path, keypair: &Keypair) -> PathBuf {
    let path = dir.join("id.json");
    fs::write(&path, serde_json::to_string(&keypair.to_bytes().to_vec()).unwrap()).unwrap();
    path
}

/// Accepts or rejects every transaction without a cluster, keeping what it
/// was sent.
pub struct RecordingTransport {
    pub blockhash_requests: usize,
    pub sent: Vec<Transaction>,
    pub reject_with: Option<String>,
}

impl RecordingTransport {
    pub fn accepting() -> Self {
        Self {
            blockhash_requests: 0,
            sent: Vec::new(),
            reject_with: None,
        }
    }

    pub fn rejecting(message: &str) -> Self {
        Self {
            reject_with: Some(message.to_string()),
            ..Self::accepting()
        }
    }
}

impl Transport for RecordingTransport {
    async fn latest_blockhash(&mut self) -> Result<Hash> {
        self.blockhash_requests += 1;
        Ok(Hash::new_from_array([self.blockhash_requests as u8; 32]))
    }

    async fn send_and_confirm(&mut self, transaction: &Transaction) -> Result<Signature> {
        if let Some(message) = &self.reject_with {
            return Err(HarnessError::RemoteCall(message.clone()));
        }
        self.sent.push(transaction.clone());
        Ok(transaction.signatures[0])
    }
}

/// The built program, if `anchor build` has produced it.
pub fn deployed_program() -> Option<Vec<u8>> {
    let workspace_so = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../target/deploy/aixblock.so");
    let local_so = PathBuf::from("target/deploy/aixblock.so");
    let program_path = if workspace_so.exists() { workspace_so } else { local_so };
    match fs::read(&program_path) {
        Ok(bytes) => Some(bytes),
        Err(_) => {
            println!(
                "skipping: {} not built (run `anchor build`)",
                program_path.display()
            );
            None
        }
    }
}

const TOKEN_ACCOUNT_LAMPORTS: u64 = 2_039_280;
const MINT_LAMPORTS: u64 = 1_461_600;

fn token_program_id() -> Address {
    Address::from(spl_token::ID.to_bytes())
}

/// Writes an initialized SPL mint with no authority at a fresh address.
pub fn create_mint(transport: &mut LiteSvmTransport, decimals: u8) -> Address {
    let mint = Keypair::new().pubkey();
    let state = spl_token::state::Mint {
        decimals,
        is_initialized: true,
        ..Default::default()
    };
    let mut data = vec![0u8; spl_token::state::Mint::LEN];
    state.pack_into_slice(&mut data);
    transport
        .set_account(
            mint,
            Account {
                lamports: MINT_LAMPORTS,
                data,
                owner: token_program_id(),
                executable: false,
                rent_epoch: 0,
            },
        )
        .unwrap();
    mint
}

/// Writes an initialized token account for `mint` owned by `owner` holding
/// `amount` at a fresh address.
pub fn create_token_account(
    transport: &mut LiteSvmTransport,
    mint: &Address,
    owner: &Address,
    amount: u64,
) -> Address {
    let address = Keypair::new().pubkey();
    let state = spl_token::state::Account {
        mint: anchor_lang::prelude::Pubkey::new_from_array(mint.to_bytes()),
        owner: anchor_lang::prelude::Pubkey::new_from_array(owner.to_bytes()),
        amount,
        state: spl_token::state::AccountState::Initialized,
        ..Default::default()
    };
    let mut data = vec![0u8; spl_token::state::Account::LEN];
    state.pack_into_slice(&mut data);
    transport
        .set_account(
            address,
            Account {
                lamports: TOKEN_ACCOUNT_LAMPORTS,
                data,
                owner: token_program_id(),
                executable: false,
                rent_epoch: 0,
            },
        )
        .unwrap();
    address
}

pub fn token_balance(transport: &LiteSvmTransport, address: &Address) -> u64 {
    let data = transport.account_data(address).unwrap();
    spl_token::state::Account::unpack(&data).unwrap().amount
}
