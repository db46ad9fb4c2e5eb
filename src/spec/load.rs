use anyhow::{bail, Context};
use serde_json::{Map, Number, Value};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use super::registry::SchemaRegistry;

/// The parsed API contract.
///
/// Built once at startup and shared read-only (`Arc<ContractDocument>`) by
/// every request. Only `paths` and `components` are consumed.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractDocument {
    root: Value,
}

impl ContractDocument {
    /// Wrap an already decoded tree. The root must be a mapping.
    pub fn from_value(root: Value) -> anyhow::Result<Self> {
        if !root.is_object() {
            bail!("contract root must be a mapping");
        }
        Ok(Self { root })
    }

    pub fn from_yaml_str(content: &str) -> anyhow::Result<Self> {
        let yaml: serde_yaml::Value =
            serde_yaml::from_str(content).context("failed to parse YAML contract")?;
        Self::from_value(yaml_to_json(yaml)?)
    }

    pub fn from_json_str(content: &str) -> anyhow::Result<Self> {
        let value: Value = serde_json::from_str(content).context("failed to parse JSON contract")?;
        Self::from_value(value)
    }

    #[must_use]
    pub fn root(&self) -> &Value {
        &self.root
    }

    #[must_use]
    pub fn paths(&self) -> Option<&Map<String, Value>> {
        self.root.get("paths").and_then(Value::as_object)
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.root.pointer("/info/title").and_then(Value::as_str)
    }

    #[must_use]
    pub fn registry(&self) -> SchemaRegistry<'_> {
        SchemaRegistry::new(&self.root)
    }
}

/// Load a contract from disk. `.yaml`/`.yml` files are parsed as YAML,
/// everything else as JSON.
pub fn load_contract(path: impl AsRef<Path>) -> anyhow::Result<Arc<ContractDocument>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read contract {}", path.display()))?;
    let is_yaml = path
        .extension()
        .map(|ext| ext == "yaml" || ext == "yml")
        .unwrap_or(false);
    let document = if is_yaml {
        ContractDocument::from_yaml_str(&content)
    } else {
        ContractDocument::from_json_str(&content)
    }
    .with_context(|| format!("invalid contract {}", path.display()))?;

    info!(
        path = %path.display(),
        title = document.title().unwrap_or("<untitled>"),
        paths = document.paths().map(Map::len).unwrap_or(0),
        "Contract loaded"
    );
    Ok(Arc::new(document))
}

/// Convert a YAML tree into JSON, turning non-string keys (`200:`) into strings.
fn yaml_to_json(value: serde_yaml::Value) -> anyhow::Result<Value> {
    use serde_yaml::Value as Y;
    Ok(match value {
        Y::Null => Value::Null,
        Y::Bool(b) => Value::Bool(b),
        Y::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                n.as_f64()
                    .and_then(Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or(Value::Null)
            }
        }
        Y::String(s) => Value::String(s),
        Y::Sequence(seq) => Value::Array(
            seq.into_iter()
                .map(yaml_to_json)
                .collect::<anyhow::Result<Vec<_>>>()?,
        ),
        Y::Mapping(mapping) => {
            let mut object = Map::with_capacity(mapping.len());
            for (key, val) in mapping {
                object.insert(yaml_key(key)?, yaml_to_json(val)?);
            }
            Value::Object(object)
        }
        Y::Tagged(tagged) => yaml_to_json(tagged.value)?,
    })
}

fn yaml_key(key: serde_yaml::Value) -> anyhow::Result<String> {
    use serde_yaml::Value as Y;
    match key {
        Y::String(s) => Ok(s),
        Y::Number(n) => Ok(n.to_string()),
        Y::Bool(b) => Ok(b.to_string()),
        Y::Null => Ok("null".to_string()),
        other => bail!("unsupported mapping key in contract: {other:?}"),
    }
}
