use crate::error::Result;
use crate::methods::Methods;
use crate::provider::Provider;
use crate::transport::{submit, Transport};
use crate::workspace::Workspace;
use solana_signature::Signature;

/// Workspace name of the program under test.
pub const PROGRAM_NAME: &str = "Aixblock";

/// Resolves the program, calls `initialize` once and logs the signature.
pub async fn initialize<T: Transport>(
    provider: &Provider,
    workspace: &Workspace,
    transport: &mut T,
) -> Result<Signature> {
    let program = workspace.program(PROGRAM_NAME)?;
    let call = Methods::new(&program, provider).initialize()?;
    let signature = submit(transport, provider, &call, &[]).await?;
    println!("Your transaction signature {}", signature);
    Ok(signature)
}

/// Acquires the provider, opens a transport for it with `connect` and runs
/// [`initialize`]. `connect` is not called when the provider cannot be
/// acquired, so a configuration error never reaches the cluster.
pub async fn run<A, C, T>(acquire: A, workspace: &Workspace, connect: C) -> Result<Signature>
where
    A: FnOnce() -> Result<Provider>,
    C: FnOnce(&Provider) -> T,
    T: Transport,
{
    let provider = acquire()?;
    let mut transport = connect(&provider);
    initialize(&provider, workspace, &mut transport).await
}
