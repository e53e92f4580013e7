//! Shared helpers for CLI commands.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use redwire_hdl::{HdlOptions, Registry, build_default_registry, compile_debug};
use redwire_ir::DebugCircuit;
use tracing::debug;

use crate::config::Config;

/// File extension of DSL sources.
pub const SOURCE_EXTENSION: &str = "rw";

/// Compiles DSL files, loading library cells on demand.
pub struct Session {
    registry: Registry,
    library: Vec<PathBuf>,
    options: HdlOptions,
}

impl Session {
    /// Create a session with the bundled cells and the configured library.
    pub fn new(config: &Config) -> Result<Self> {
        let registry = build_default_registry().context("Failed to build standard cells")?;
        Ok(Self {
            registry,
            library: config.library.clone(),
            options: config.hdl_options(),
        })
    }

    /// The circuits registered so far.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Library directories searched for missing cells.
    pub fn library(&self) -> &[PathBuf] {
        &self.library
    }

    /// Read and compile a DSL file.
    pub fn compile_file(&mut self, path: &str) -> Result<DebugCircuit> {
        let source = read_source(path)?;
        let mut loading = Vec::new();
        self.compile_source(&source, path, &mut loading)
    }

    /// Compile `source`, registering `<name>.rw` from the library whenever a
    /// cell is missing, then retrying.
    fn compile_source(
        &mut self,
        source: &str,
        origin: &str,
        loading: &mut Vec<String>,
    ) -> Result<DebugCircuit> {
        loop {
            let err = match compile_debug(source, &self.registry, &self.options) {
                Ok(circuit) => return Ok(circuit),
                Err(err) => err,
            };
            let Some(name) = err.missing_dependency().map(str::to_string) else {
                return Err(err).with_context(|| format!("Failed to compile {origin}"));
            };
            let Some(path) = find_library_cell(&self.library, &name) else {
                return Err(err).with_context(|| format!("Failed to compile {origin}"));
            };
            if loading.contains(&name) {
                anyhow::bail!(
                    "Circular library dependency: {} -> {name}",
                    loading.join(" -> ")
                );
            }

            debug!(cell = %name, path = %path.display(), "loading library cell");
            let path = path.display().to_string();
            let dependency = read_source(&path)?;
            loading.push(name.clone());
            let circuit = self.compile_source(&dependency, &path, loading)?;
            loading.pop();
            self.registry.register(name, circuit.into_circuit())?;
        }
    }
}

/// Locate `<name>.rw` in the first library directory that has it.
pub fn find_library_cell(library: &[PathBuf], name: &str) -> Option<PathBuf> {
    library
        .iter()
        .map(|dir| dir.join(name).with_extension(SOURCE_EXTENSION))
        .find(|path| path.is_file())
}

/// Names of all `.rw` files in the library directories.
pub fn library_cells(library: &[PathBuf]) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for dir in library {
        let entries =
            fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))?;
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION) {
                if let Some(stem) = path.file_stem() {
                    names.push(stem.to_string_lossy().into_owned());
                }
            }
        }
    }
    names.sort();
    names.dedup();
    Ok(names)
}

/// Read a DSL source file.
pub fn read_source(path: &str) -> Result<String> {
    if !Path::new(path).exists() {
        anyhow::bail!("File not found: {path}");
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))
}

/// Parse a bit string such as `0110`, ignoring `_` separators.
pub fn parse_bits(text: &str) -> Result<Vec<bool>> {
    text.chars()
        .filter(|&c| c != '_')
        .map(|c| match c {
            '0' => Ok(false),
            '1' => Ok(true),
            other => Err(anyhow::anyhow!("Invalid bit '{other}' in '{text}'")),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with_library(dir: &Path) -> Session {
        let config = Config {
            library: vec![dir.to_path_buf()],
            ..Config::default()
        };
        Session::new(&config).unwrap()
    }

    #[test]
    fn test_parse_bits() {
        assert_eq!(parse_bits("10_1").unwrap(), vec![true, false, true]);
        assert!(parse_bits("").unwrap().is_empty());
        assert!(parse_bits("102").is_err());
    }

    #[test]
    fn test_library_cell_loaded_on_demand() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("xnor.rw"), "a b\nx = not (xor a b)\nx").unwrap();
        fs::write(dir.path().join("eq.rw"), "a b\ne = xnor a b\ne").unwrap();
        let top = dir.path().join("top.rw");
        fs::write(&top, "p q\nr = eq p q\nr").unwrap();

        let mut session = session_with_library(dir.path());
        let circuit = session.compile_file(top.to_str().unwrap()).unwrap();
        assert_eq!(circuit.circuit().total_input_width(), 2);
        assert!(session.registry().contains("xnor"));
        assert!(session.registry().contains("eq"));
        assert_eq!(
            library_cells(session.library()).unwrap(),
            vec!["eq", "top", "xnor"]
        );
    }

    #[test]
    fn test_missing_cell_reported() {
        let dir = tempfile::tempdir().unwrap();
        let top = dir.path().join("top.rw");
        fs::write(&top, "a\nb = mystery a\nb").unwrap();
        let mut session = session_with_library(dir.path());
        let err = session.compile_file(top.to_str().unwrap()).unwrap_err();
        assert!(format!("{err:#}").contains("mystery"));
    }

    #[test]
    fn test_circular_library() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ping.rw"), "a\nb = pong a\nb").unwrap();
        fs::write(dir.path().join("pong.rw"), "a\nb = ping a\nb").unwrap();
        let top = dir.path().join("top.rw");
        fs::write(&top, "a\nb = ping a\nb").unwrap();
        let mut session = session_with_library(dir.path());
        let err = session.compile_file(top.to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("Circular"));
    }
}
