use crate::error::{HarnessError, Result};
use crate::methods::MethodCall;
use crate::provider::Provider;
use anchor_lang::AccountDeserialize;
use litesvm::LiteSVM;
use solana_account::Account;
use solana_address::Address;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_hash::Hash;
use solana_keypair::Keypair;
use solana_message::Message;
use solana_signature::Signature;
use solana_signer::Signer;
use solana_transaction::Transaction;

/// Where transactions go. Implementations make exactly one attempt per call.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn latest_blockhash(&mut self) -> Result<Hash>;

    /// Submits `transaction` and waits until the cluster confirms or rejects it.
    async fn send_and_confirm(&mut self, transaction: &Transaction) -> Result<Signature>;
}

/// Signs `call` with the provider's payer plus `extra_signers`, submits it
/// and waits for confirmation.
pub async fn submit<T: Transport>(
    transport: &mut T,
    provider: &Provider,
    call: &MethodCall,
    extra_signers: &[&Keypair],
) -> Result<Signature> {
    let blockhash = transport.latest_blockhash().await?;
    let payer = provider.payer();
    let msg = Message::new_with_blockhash(&[call.instruction()], Some(&payer.pubkey()), &blockhash);

    let mut signers: Vec<&Keypair> = Vec::with_capacity(1 + extra_signers.len());
    signers.push(payer);
    signers.extend_from_slice(extra_signers);

    let mut tx = Transaction::new_unsigned(msg);
    tx.try_sign(&signers, blockhash)?;
    transport.send_and_confirm(&tx).await
}

/// A live cluster reached over JSON-RPC.
pub struct RpcTransport {
    client: RpcClient,
}

impl RpcTransport {
    pub fn new(provider: &Provider) -> Self {
        Self {
            client: RpcClient::new_with_commitment(
                provider.url().to_string(),
                provider.commitment(),
            ),
        }
    }
}

impl Transport for RpcTransport {
    async fn latest_blockhash(&mut self) -> Result<Hash> {
        self.client
            .get_latest_blockhash()
            .await
            .map_err(|e| HarnessError::RemoteCall(format!("failed to fetch blockhash: {e}")))
    }

    async fn send_and_confirm(&mut self, transaction: &Transaction) -> Result<Signature> {
        self.client
            .send_and_confirm_transaction(transaction)
            .await
            .map_err(|e| HarnessError::RemoteCall(e.to_string()))
    }
}

/// An in-process cluster backed by LiteSVM.
pub struct LiteSvmTransport {
    svm: LiteSVM,
}

impl LiteSvmTransport {
    pub fn new(program_id: Address, program_bytes: &[u8]) -> Result<Self> {
        let mut svm = LiteSVM::new();
        svm.add_program(program_id, program_bytes)
            .map_err(|e| HarnessError::RemoteCall(format!("add_program failed: {e:?}")))?;
        Ok(Self { svm })
    }

    pub fn airdrop(&mut self, address: &Address, lamports: u64) -> Result<()> {
        self.svm
            .airdrop(address, lamports)
            .map(|_| ())
            .map_err(|e| HarnessError::RemoteCall(format!("airdrop failed: {:?}", e.err)))
    }

    /// Writes `account` at `address`, replacing whatever was there.
    pub fn set_account(&mut self, address: Address, account: Account) -> Result<()> {
        self.svm
            .set_account(address, account)
            .map_err(|e| HarnessError::RemoteCall(format!("set_account failed: {e:?}")))
    }

    /// Raw data of the account at `address`, `None` if it does not exist.
    pub fn account_data(&self, address: &Address) -> Option<Vec<u8>> {
        self.svm.get_account(address).map(|account| account.data)
    }

    /// Reads and decodes an Anchor account, `None` if it does not exist or
    /// does not decode as `T`.
    pub fn account<T: AccountDeserialize>(&self, address: &Address) -> Option<T> {
        let account = self.svm.get_account(address)?;
        T::try_deserialize(&mut account.data.as_slice()).ok()
    }
}

impl Transport for LiteSvmTransport {
    async fn latest_blockhash(&mut self) -> Result<Hash> {
        // A fresh blockhash per submission keeps repeated calls distinct.
        self.svm.expire_blockhash();
        Ok(self.svm.latest_blockhash())
    }

    async fn send_and_confirm(&mut self, transaction: &Transaction) -> Result<Signature> {
        self.svm
            .send_transaction(transaction.clone())
            .map(|meta| meta.signature)
            .map_err(|e| {
                HarnessError::RemoteCall(format!(
                    "transaction failed: {:?}\n{}",
                    e.err,
                    e.meta.logs.join("\n")
                ))
            })
    }
}
