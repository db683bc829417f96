use crate::error::{HarnessError, Result};
use serde_json::Value;
use solana_address::Address;
use std::fs;
use std::path::{Path, PathBuf};

/// Anchor project root. Program descriptors are read from `target/idl`.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

/// A deployed program bound to its interface descriptor.
#[derive(Debug, Clone)]
pub struct ProgramHandle {
    pub name: String,
    pub address: Address,
    pub idl_path: PathBuf,
    pub methods: Vec<MethodSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSpec {
    pub name: String,
    pub discriminator: Vec<u8>,
    pub accounts: Vec<String>,
}

impl ProgramHandle {
    pub fn method(&self, name: &str) -> Option<&MethodSpec> {
        self.methods.iter().find(|m| m.name == name)
    }
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn idl_dir(&self) -> PathBuf {
        self.root.join("target").join("idl")
    }

    pub fn deploy_dir(&self) -> PathBuf {
        self.root.join("target").join("deploy")
    }

    /// Resolves a program by name. `Aixblock`, `aixblock` and `aix-block`
    /// all name the same program. Descriptors of other programs that fail to
    /// load are skipped.
    pub fn program(&self, name: &str) -> Result<ProgramHandle> {
        let wanted = normalize(name);
        let mut broken = None;
        for path in self.idl_paths()? {
            let stem_matches = path
                .file_stem()
                .and_then(|s| s.to_str())
                .is_some_and(|stem| normalize(stem) == wanted);
            match load_idl(&path) {
                Ok(program) if stem_matches || normalize(&program.name) == wanted => {
                    return Ok(program)
                }
                Ok(_) => {}
                Err(e) if stem_matches => broken = Some(e),
                Err(_) => {}
            }
        }

        Err(broken.unwrap_or_else(|| {
            HarnessError::Resolution(format!(
                "program {name} not found in {}",
                self.idl_dir().display()
            ))
        }))
    }

    /// Every descriptor in `target/idl` that loads, sorted by file name.
    pub fn programs(&self) -> Result<Vec<ProgramHandle>> {
        Ok(self
            .idl_paths()?
            .iter()
            .filter_map(|path| load_idl(path).ok())
            .collect())
    }

    fn idl_paths(&self) -> Result<Vec<PathBuf>> {
        let idl_dir = self.idl_dir();
        if !idl_dir.exists() {
            return Err(HarnessError::Resolution(format!(
                "No IDL directory found at {}. Run `anchor build` first.",
                idl_dir.display()
            )));
        }

        let entries = fs::read_dir(&idl_dir).map_err(|e| {
            HarnessError::Resolution(format!("failed reading {}: {e}", idl_dir.display()))
        })?;
        let mut paths: Vec<PathBuf> = entries
            .filter_map(|e| e.ok().map(|x| x.path()))
            .filter(|p| p.extension().and_then(|s| s.to_str()) == Some("json"))
            .collect();
        paths.sort();
        Ok(paths)
    }
}

fn load_idl(path: &Path) -> Result<ProgramHandle> {
    let content = fs::read_to_string(path).map_err(|e| {
        HarnessError::Resolution(format!("failed reading {}: {e}", path.display()))
    })?;
    let idl: Value = serde_json::from_str(&content)
        .map_err(|e| HarnessError::Resolution(format!("invalid JSON in {}: {e}", path.display())))?;
    parse_idl(path, &idl)
}

fn parse_idl(path: &Path, idl: &Value) -> Result<ProgramHandle> {
    let address_str = idl["address"]
        .as_str()
        .or_else(|| idl["metadata"]["address"].as_str())
        .ok_or_else(|| {
            HarnessError::Resolution(format!("{} has no program address", path.display()))
        })?;
    let address: Address = address_str.parse().map_err(|_| {
        HarnessError::Resolution(format!(
            "{} has an invalid program address {address_str}",
            path.display()
        ))
    })?;

    let name = idl["metadata"]["name"]
        .as_str()
        .or_else(|| idl["name"].as_str())
        .or_else(|| path.file_stem().and_then(|s| s.to_str()))
        .unwrap_or("<unknown>")
        .to_string();

    let methods = match idl["instructions"].as_array() {
        Some(ixs) => ixs
            .iter()
            .map(|ix| parse_method(path, ix))
            .collect::<Result<Vec<_>>>()?,
        None => Vec::new(),
    };

    Ok(ProgramHandle {
        name,
        address,
        idl_path: path.to_path_buf(),
        methods,
    })
}

fn parse_method(path: &Path, ix: &Value) -> Result<MethodSpec> {
    let name = ix["name"]
        .as_str()
        .ok_or_else(|| {
            HarnessError::Resolution(format!("{} has an unnamed instruction", path.display()))
        })?
        .to_string();
    let discriminator = parse_discriminator(&ix["discriminator"]).ok_or_else(|| {
        HarnessError::Resolution(format!(
            "{} has a malformed discriminator for {name}",
            path.display()
        ))
    })?;
    let accounts = ix["accounts"]
        .as_array()
        .map(|accs| {
            accs.iter()
                .filter_map(|a| a["name"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();

    Ok(MethodSpec {
        name,
        discriminator,
        accounts,
    })
}

/// A non-empty array of byte values. Anything else is `None`.
fn parse_discriminator(value: &Value) -> Option<Vec<u8>> {
    let bytes = value
        .as_array()?
        .iter()
        .map(|v| v.as_u64().and_then(|n| u8::try_from(n).ok()))
        .collect::<Option<Vec<u8>>>()?;
    (!bytes.is_empty()).then_some(bytes)
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn names_compare_without_case_or_separators() {
        assert_eq!(normalize("Aixblock"), normalize("aixblock"));
        assert_eq!(normalize("AixBlock"), normalize("aix_block"));
        assert_ne!(normalize("Aixblock"), normalize("aixblocks"));
    }

    #[test]
    fn legacy_metadata_address_is_accepted() {
        let idl = json!({
            "name": "aixblock",
            "metadata": { "address": "HXYeNBMbc5SXSsqgeJDiKZZ3wsG6i8VPjZn3NGr4aHXw" },
            "instructions": [
                { "name": "initialize", "discriminator": [1, 2, 3, 4, 5, 6, 7, 8], "accounts": [] }
            ]
        });
        let handle = parse_idl(Path::new("aixblock.json"), &idl).unwrap();
        assert_eq!(handle.name, "aixblock");
        assert_eq!(handle.method("initialize").unwrap().discriminator, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn missing_address_is_a_resolution_error() {
        let idl = json!({ "metadata": { "name": "aixblock" }, "instructions": [] });
        assert!(matches!(
            parse_idl(Path::new("aixblock.json"), &idl),
            Err(HarnessError::Resolution(_))
        ));
    }

    #[test]
    fn malformed_discriminators_are_rejected() {
        assert_eq!(parse_discriminator(&json!([0, 255, 7])), Some(vec![0, 255, 7]));
        assert_eq!(parse_discriminator(&json!([1, 256, 3])), None);
        assert_eq!(parse_discriminator(&json!([1, "2", 3])), None);
        assert_eq!(parse_discriminator(&json!([1, -2, 3])), None);
        assert_eq!(parse_discriminator(&json!([])), None);
        assert_eq!(parse_discriminator(&Value::Null), None);
    }

    #[test]
    fn descriptor_with_truncated_discriminator_does_not_load() {
        let idl = json!({
            "address": "HXYeNBMbc5SXSsqgeJDiKZZ3wsG6i8VPjZn3NGr4aHXw",
            "metadata": { "name": "aixblock" },
            "instructions": [
                { "name": "initialize", "discriminator": [175, 300, 21, 252, 24, 84, 28, 191], "accounts": [] }
            ]
        });
        match parse_idl(Path::new("aixblock.json"), &idl) {
            Err(HarnessError::Resolution(msg)) => {
                assert!(msg.contains("malformed discriminator for initialize"), "{msg}")
            }
            other => panic!("expected a resolution error, got {other:?}"),
        }
    }
}
