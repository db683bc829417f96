use crate::report::{write_report, CheckResult};
use aixblock_harness::provider::{parse_commitment, PROVIDER_URL_ENV, WALLET_ENV};
use aixblock_harness::{
    smoke, HarnessError, LiteSvmTransport, Provider, RpcTransport, Transport, Workspace,
};
use anyhow::{bail, Context, Result};
use solana_commitment_config::CommitmentConfig;
use solana_keypair::Keypair;
use solana_signer::Signer;
use std::fs;
use std::path::Path;

const LOCAL_AIRDROP_LAMPORTS: u64 = 10_000_000_000;

/// Connection flags; unset values fall back to the `ANCHOR_*` environment.
pub struct ClusterSettings {
    pub url: Option<String>,
    pub wallet: Option<String>,
    pub commitment: Option<String>,
}

pub async fn run_cluster_smoke(project_dir: &str, settings: &ClusterSettings) -> Result<()> {
    let project_root = Path::new(project_dir);
    let workspace = Workspace::new(project_root);
    let mut checks = Vec::new();

    println!("Running aixblock-suite smoke");
    println!("{:-^60}", " Provider ");
    let commitment = match settings.commitment.as_deref().map(parse_commitment).transpose() {
        Ok(commitment) => commitment,
        Err(e) => {
            checks.push(CheckResult::fail(
                "commitment",
                e.to_string(),
                "Pass --commitment processed, confirmed or finalized".to_string(),
            ));
            return finish(project_root, "cluster", &checks, None);
        }
    };

    let outcome = smoke::run(
        || {
            let provider = cluster_provider(settings)?;
            Ok(match commitment {
                Some(commitment) => provider.with_commitment(commitment),
                None => provider,
            })
        },
        &workspace,
        |provider| {
            checks.push(CheckResult::pass(
                "provider",
                format!("{} as {}", provider.url(), provider.payer_address()),
            ));
            println!("{:-^60}", " Initialize ");
            RpcTransport::new(provider)
        },
    )
    .await;

    let signature = match outcome {
        Ok(signature) => {
            checks.push(CheckResult::pass(
                "initialize",
                format!("initialize confirmed: {}", signature),
            ));
            Some(signature.to_string())
        }
        Err(e @ HarnessError::Configuration(_)) => {
            checks.push(CheckResult::fail("provider", e.to_string(), hint(&e)));
            None
        }
        Err(e) => {
            checks.push(CheckResult::fail("initialize", e.to_string(), hint(&e)));
            None
        }
    };

    finish(project_root, "cluster", &checks, signature.as_deref())
}

pub async fn run_local_smoke(project_dir: &str) -> Result<()> {
    let project_root = Path::new(project_dir);
    let workspace = Workspace::new(project_root);
    let mut checks = Vec::new();

    println!("Running aixblock-suite local");
    println!("{:-^60}", " Preflight ");
    let program = match workspace.program(smoke::PROGRAM_NAME) {
        Ok(program) => {
            checks.push(CheckResult::pass(
                "program_resolved",
                format!("{} at {}", program.name, program.address),
            ));
            program
        }
        Err(e) => {
            checks.push(CheckResult::fail("program_resolved", e.to_string(), hint(&e)));
            return finish(project_root, "local", &checks, None);
        }
    };

    let deploy_so = workspace.deploy_dir().join("aixblock.so");
    if !deploy_so.exists() {
        checks.push(CheckResult::fail(
            "program_artifact_exists",
            format!("missing program artifact: {}", deploy_so.display()),
            "Run `anchor build` first".to_string(),
        ));
        return finish(project_root, "local", &checks, None);
    }
    checks.push(CheckResult::pass(
        "program_artifact_exists",
        format!("program artifact found: {}", deploy_so.display()),
    ));

    let program_bytes = fs::read(&deploy_so)
        .with_context(|| format!("Failed to read {}", deploy_so.display()))?;
    let payer = Keypair::new();
    let payer_address = payer.pubkey();
    let provider = Provider::new("litesvm", payer, CommitmentConfig::processed());

    let mut transport = LiteSvmTransport::new(program.address, &program_bytes)?;
    transport.airdrop(&payer_address, LOCAL_AIRDROP_LAMPORTS)?;

    run_initialize(project_root, "local", &workspace, &provider, &mut transport, checks).await
}

pub fn list_methods(project_dir: &str, program_name: &str) -> Result<()> {
    let workspace = Workspace::new(project_dir);
    let program = workspace.program(program_name)?;

    println!("Program: {} | Address: {}", program.name, program.address);
    println!("Found {} methods:", program.methods.len());
    println!("{:-^60}", " Methods ");
    for method in &program.methods {
        println!(
            "Method: {} | Discriminator: {:?} | Accounts: {:?}",
            method.name, method.discriminator, method.accounts
        );
    }

    Ok(())
}

async fn run_initialize<T: Transport>(
    project_root: &Path,
    mode: &str,
    workspace: &Workspace,
    provider: &Provider,
    transport: &mut T,
    mut checks: Vec<CheckResult>,
) -> Result<()> {
    println!("{:-^60}", " Initialize ");
    let signature = match smoke::initialize(provider, workspace, transport).await {
        Ok(signature) => {
            checks.push(CheckResult::pass(
                "initialize",
                format!("initialize confirmed: {}", signature),
            ));
            Some(signature.to_string())
        }
        Err(e) => {
            checks.push(CheckResult::fail("initialize", e.to_string(), hint(&e)));
            None
        }
    };

    finish(project_root, mode, &checks, signature.as_deref())
}

fn cluster_provider(settings: &ClusterSettings) -> aixblock_harness::Result<Provider> {
    if settings.url.is_none() && settings.wallet.is_none() {
        return Provider::env();
    }

    Provider::from_lookup(|key| {
        let flag = match key {
            PROVIDER_URL_ENV => settings.url.clone(),
            WALLET_ENV => settings.wallet.clone(),
            _ => None,
        };
        flag.or_else(|| std::env::var(key).ok())
    })
}

fn hint(error: &HarnessError) -> String {
    match error {
        HarnessError::Configuration(_) => {
            format!("Set {PROVIDER_URL_ENV} and {WALLET_ENV} or pass --url and --wallet")
        }
        HarnessError::Resolution(_) => "Run `anchor build` first".to_string(),
        HarnessError::RemoteCall(_) => {
            "Is the program deployed and not yet initialized on this cluster?".to_string()
        }
        HarnessError::Signing(_) => "Check the wallet keypair".to_string(),
    }
}

fn finish(
    project_root: &Path,
    mode: &str,
    checks: &[CheckResult],
    signature: Option<&str>,
) -> Result<()> {
    let report_path = write_report(project_root, mode, checks, signature)?;
    println!("report: {}", report_path.display());

    let failed = checks.iter().filter(|c| !c.ok).count();
    println!("{:-^60}", " Summary ");
    println!("passed: {}", checks.len() - failed);
    println!("failed: {}", failed);

    if failed > 0 {
        bail!("Smoke test failed");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[tokio::test]
    async fn unknown_commitment_gets_its_own_check_and_hint() {
        let dir = tempfile::tempdir().unwrap();
        let settings = ClusterSettings {
            url: Some("http://127.0.0.1:8899".to_string()),
            wallet: Some(dir.path().join("id.json").display().to_string()),
            commitment: Some("fastest".to_string()),
        };

        let result = run_cluster_smoke(&dir.path().display().to_string(), &settings).await;
        assert!(result.is_err());

        let report_path = dir.path().join("target/aixblock-suite/report.json");
        let report: Value = serde_json::from_str(&fs::read_to_string(report_path).unwrap()).unwrap();
        assert_eq!(report["summary"]["failed"], 1);
        assert_eq!(report["checks"][0]["name"], "commitment");
        assert_eq!(
            report["checks"][0]["hint"],
            "Pass --commitment processed, confirmed or finalized"
        );
        assert!(report["checks"][0]["detail"]
            .as_str()
            .unwrap()
            .contains("unknown commitment level fastest"));
    }

    #[test]
    fn missing_provider_settings_point_at_the_environment() {
        let hint = hint(&HarnessError::Configuration("ANCHOR_WALLET is not set".to_string()));
        assert!(hint.contains(PROVIDER_URL_ENV));
        assert!(hint.contains("--wallet"));
    }
}
