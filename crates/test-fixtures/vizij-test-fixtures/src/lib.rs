use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Result<Manifest, String>> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).map_err(|e| format!("fixtures manifest should parse: {e}"))
});

#[derive(Debug, Deserialize)]
struct Manifest {
    curves: HashMap<String, CurveEntry>,
}

#[derive(Debug, Deserialize)]
struct CurveEntry {
    kind: String,
    path: String,
}

fn manifest() -> Result<&'static Manifest> {
    MANIFEST.as_ref().map_err(|e| anyhow!("{e}"))
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn load_json<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let text = read_to_string(rel)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse JSON fixture {rel}"))
}

fn lookup<'a, T>(map: &'a HashMap<String, T>, kind: &str, name: &str) -> Result<&'a T> {
    map.get(name)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

/// Curve fixtures: a point definition plus the providers and samples that
/// exercise it.
pub mod curves {
    use super::*;

    pub fn keys() -> Result<Vec<String>> {
        let mut keys: Vec<String> = manifest()?.curves.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }

    /// Value kind the fixture is written for (`float`, `vector3`, `vector4`, `quaternion`).
    pub fn kind(name: &str) -> Result<String> {
        let entry = lookup(&manifest()?.curves, "curve", name)?;
        Ok(entry.kind.clone())
    }

    pub fn json(name: &str) -> Result<String> {
        let entry = lookup(&manifest()?.curves, "curve", name)?;
        read_to_string(&entry.path)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let entry = lookup(&manifest()?.curves, "curve", name)?;
        super::load_json(&entry.path)
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        let entry = lookup(&manifest()?.curves, "curve", name)?;
        Ok(resolve_path(&entry.path))
    }
}
