use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use scenelink_schema::{CodegenConfig, Generator, Registry};

fn schema_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn main() -> Result<()> {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let schema_dir = manifest_dir.join("schema");
    let config_path = manifest_dir.join("codegen.json");
    println!("cargo:rerun-if-changed={}", schema_dir.display());
    println!("cargo:rerun-if-changed={}", config_path.display());

    let mut registry = Registry::default();
    for path in schema_files(&schema_dir)? {
        println!("cargo:rerun-if-changed={}", path.display());
        let part = Registry::load(&path).with_context(|| format!("loading {}", path.display()))?;
        registry.merge(part);
    }

    let config = CodegenConfig::load_or_default(&config_path)?;
    let source = Generator::new(config)
        .generate(&registry)
        .context("generating bindings")?;

    let out = PathBuf::from(env::var("OUT_DIR")?).join("bindings.rs");
    fs::write(&out, source).with_context(|| format!("writing {}", out.display()))?;
    Ok(())
}
