//! Directory-backed opcode library

use crate::error::{CompilerError, CompilerResult};
use crate::module::{build_module, DEFAULT_MEMORY_PAGES};
use crate::traits::OpcodeCompiler;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Name of the manifest inside a library directory
pub const MANIFEST_FILE: &str = "manifest.json";

/// Library manifest
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    /// Import declarations by name
    #[serde(default)]
    pub imports: BTreeMap<String, String>,
    /// Functions by name
    pub functions: BTreeMap<String, FunctionEntry>,
}

/// Manifest entry for one function
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FunctionEntry {
    /// Other library functions this one calls
    #[serde(default)]
    pub deps: Vec<String>,
    /// Names of the imports this one calls
    #[serde(default)]
    pub imports: Vec<String>,
}

/// Opcode implementations loaded from `manifest.json` plus one
/// `<name>.wast` file per function
#[derive(Debug, Clone)]
pub struct OpcodeLibrary {
    manifest: Manifest,
    bodies: BTreeMap<String, String>,
    memory_pages: u32,
}

impl OpcodeLibrary {
    /// Library shipped with this crate
    pub fn default_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("wasm")
    }

    /// Load a library directory
    pub fn load(dir: impl AsRef<Path>) -> CompilerResult<Self> {
        let dir = dir.as_ref();
        let text = std::fs::read_to_string(dir.join(MANIFEST_FILE))?;
        let manifest: Manifest = serde_json::from_str(&text)?;

        let mut bodies = BTreeMap::new();
        for name in manifest.functions.keys() {
            let path = dir.join(format!("{}.wast", name));
            if !path.is_file() {
                return Err(CompilerError::MissingBody {
                    name: name.clone(),
                    path: path.display().to_string(),
                });
            }
            bodies.insert(name.clone(), std::fs::read_to_string(&path)?);
        }

        tracing::debug!(dir = %dir.display(), functions = bodies.len(), "opcode library loaded");
        Self::from_parts(manifest, bodies)
    }

    /// Build a library from an in-memory manifest and bodies
    pub fn from_parts(
        manifest: Manifest,
        bodies: BTreeMap<String, String>,
    ) -> CompilerResult<Self> {
        for (name, entry) in &manifest.functions {
            if !bodies.contains_key(name) {
                return Err(CompilerError::MissingBody {
                    name: name.clone(),
                    path: format!("{}.wast", name),
                });
            }
            let undeclared = entry.imports.iter().find(|i| !manifest.imports.contains_key(*i));
            if let Some(import) = undeclared {
                return Err(CompilerError::UnknownImport {
                    function: name.clone(),
                    import: import.clone(),
                });
            }
        }
        Ok(Self {
            manifest,
            bodies,
            memory_pages: DEFAULT_MEMORY_PAGES,
        })
    }

    /// Set the memory size of assembled modules
    pub fn with_memory_pages(mut self, pages: u32) -> Self {
        self.memory_pages = pages;
        self
    }

    /// Depth-first walk placing dependencies before their dependents
    fn visit<'a>(
        &'a self,
        name: &'a str,
        seen: &mut BTreeSet<&'a str>,
        order: &mut Vec<&'a str>,
    ) -> CompilerResult<()> {
        if !seen.insert(name) {
            return Ok(());
        }
        let entry = self
            .manifest
            .functions
            .get(name)
            .ok_or_else(|| CompilerError::UnknownFunction(name.to_string()))?;
        for dep in &entry.deps {
            self.visit(dep, seen, order)?;
        }
        order.push(name);
        Ok(())
    }
}

impl OpcodeCompiler for OpcodeLibrary {
    fn resolve_functions(
        &self,
        names: &BTreeSet<String>,
    ) -> CompilerResult<(Vec<String>, Vec<String>)> {
        let mut seen = BTreeSet::new();
        let mut order = Vec::new();
        for name in names {
            self.visit(name, &mut seen, &mut order)?;
        }

        let mut funcs = Vec::with_capacity(order.len());
        let mut import_names: Vec<&str> = Vec::new();
        for name in order {
            funcs.push(self.bodies[name].clone());
            for import in &self.manifest.functions[name].imports {
                if !import_names.contains(&import.as_str()) {
                    import_names.push(import);
                }
            }
        }
        let imports = import_names
            .into_iter()
            .map(|name| self.manifest.imports[name].clone())
            .collect();
        Ok((funcs, imports))
    }

    fn build_module(
        &self,
        funcs: &[String],
        imports: &[String],
        exports: &[String],
    ) -> CompilerResult<String> {
        build_module(funcs, imports, exports, self.memory_pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn tiny_library() -> OpcodeLibrary {
        let manifest: Manifest = serde_json::from_str(
            r#"{
                "imports": {
                    "useGas": "(import \"ethereum\" \"useGas\" (func $useGas (param i64)))",
                    "getCaller": "(import \"ethereum\" \"getCaller\" (func $getCaller (param i32)))"
                },
                "functions": {
                    "A": { "deps": ["helper"], "imports": ["useGas"] },
                    "B": { "deps": ["helper"], "imports": ["useGas", "getCaller"] },
                    "helper": {}
                }
            }"#,
        )
        .unwrap();
        let bodies = [
            ("A", "(func $A (result i32) (call $helper) (global.get $sp))"),
            ("B", "(func $B (result i32) (call $helper) (global.get $sp))"),
            ("helper", "(func $helper)"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        OpcodeLibrary::from_parts(manifest, bodies).unwrap()
    }

    #[test]
    fn test_resolve_transitive_dedup() {
        let library = tiny_library();
        let (funcs, imports) = library.resolve_functions(&names(&["A", "B"])).unwrap();

        assert_eq!(
            funcs,
            vec![
                "(func $helper)".to_string(),
                "(func $A (result i32) (call $helper) (global.get $sp))".to_string(),
                "(func $B (result i32) (call $helper) (global.get $sp))".to_string(),
            ]
        );
        assert_eq!(imports.len(), 2);
        assert!(imports[0].contains("\"useGas\""));
        assert!(imports[1].contains("\"getCaller\""));
    }

    #[test]
    fn test_resolve_unknown() {
        let library = tiny_library();
        assert!(matches!(
            library.resolve_functions(&names(&["NOPE"])),
            Err(CompilerError::UnknownFunction(name)) if name == "NOPE"
        ));
    }

    #[test]
    fn test_undeclared_import_rejected() {
        let manifest: Manifest =
            serde_json::from_str(r#"{"functions": {"A": {"imports": ["getAddress"]}}}"#).unwrap();
        let bodies = BTreeMap::from([("A".to_string(), "(func $A)".to_string())]);
        assert!(matches!(
            OpcodeLibrary::from_parts(manifest, bodies),
            Err(CompilerError::UnknownImport { .. })
        ));
    }

    #[test]
    fn test_load_missing_body() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MANIFEST_FILE), r#"{"functions": {"A": {}}}"#).unwrap();
        assert!(matches!(
            OpcodeLibrary::load(dir.path()),
            Err(CompilerError::MissingBody { name, .. }) if name == "A"
        ));
    }

    #[test]
    fn test_load_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MANIFEST_FILE), r#"{"functions": {"A": {}}}"#).unwrap();
        let body = "(func $A (result i32) (global.get $sp))";
        std::fs::write(dir.path().join("A.wast"), body).unwrap();

        let library = OpcodeLibrary::load(dir.path()).unwrap().with_memory_pages(1);
        let (funcs, imports) = library.resolve_functions(&names(&["A"])).unwrap();
        let text = library.build_module(&funcs, &imports, &["A".to_string()]).unwrap();
        assert!(text.contains("(memory 1)"));
    }

    #[test]
    fn test_load_bad_manifest() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MANIFEST_FILE), "{").unwrap();
        assert!(matches!(OpcodeLibrary::load(dir.path()), Err(CompilerError::Json(_))));

        let empty = tempfile::tempdir().unwrap();
        assert!(matches!(OpcodeLibrary::load(empty.path()), Err(CompilerError::Io(_))));
    }

    #[test]
    fn test_shipped_library_assembles() {
        let library = OpcodeLibrary::load(OpcodeLibrary::default_dir()).unwrap();
        for op in ["ADD", "POP", "MSTORE", "CALLDATASIZE", "CALLER", "RETURN", "INVALID"] {
            let (funcs, imports) = library.resolve_functions(&names(&[op])).unwrap();
            let text = library.build_module(&funcs, &imports, &[op.to_string()]).unwrap();
            assert!(wat::parse_str(&text).is_ok(), "{} does not parse:\n{}", op, text);
        }
    }
}
