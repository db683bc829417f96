use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct CheckResult {
    pub name: &'static str,
    pub ok: bool,
    pub detail: String,
    pub hint: Option<String>,
}

impl CheckResult {
    pub fn pass(name: &'static str, detail: String) -> Self {
        println!("PASS  {}", detail);
        Self {
            name,
            ok: true,
            detail,
            hint: None,
        }
    }

    pub fn fail(name: &'static str, detail: String, hint: String) -> Self {
        println!("FAIL  {} ({})", detail, hint);
        Self {
            name,
            ok: false,
            detail,
            hint: Some(hint),
        }
    }
}

pub fn write_report(
    project_root: &Path,
    mode: &str,
    checks: &[CheckResult],
    signature: Option<&str>,
) -> Result<PathBuf> {
    let report_dir = project_root.join("target").join("aixblock-suite");
    fs::create_dir_all(&report_dir)
        .with_context(|| format!("Failed to create {}", report_dir.display()))?;
    let report_path = report_dir.join("report.json");

    let checks_json: Vec<Value> = checks
        .iter()
        .map(|c| {
            json!({
                "name": c.name,
                "ok": c.ok,
                "detail": c.detail,
                "hint": c.hint
            })
        })
        .collect();

    let report = json!({
        "tool": "aixblock-suite",
        "mode": mode,
        "summary": {
            "passed": checks.iter().filter(|c| c.ok).count(),
            "failed": checks.iter().filter(|c| !c.ok).count()
        },
        "checks": checks_json,
        "signature": signature
    });

    let report_string =
        serde_json::to_string_pretty(&report).context("Failed to serialize JSON report")?;
    fs::write(&report_path, report_string)
        .with_context(|| format!("Failed to write {}", report_path.display()))?;

    Ok(report_path)
}
