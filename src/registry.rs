//! Schema selection: load a directory of schema files, resolve message
//! names to schema objects, and enumerate what is available.
//!
//! A name that matches nothing is an empty result, not an error — batch
//! and listing callers decide whether that is fatal.

use crate::loader::{self, SchemaError};
use crate::schema::MessageSchema;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}: {source}")]
    Schema {
        path: PathBuf,
        #[source]
        source: SchemaError,
    },
    #[error("duplicate message name: {0}")]
    DuplicateName(String),
}

/// An in-memory set of message schemas, indexed by name.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: Vec<MessageSchema>,
    by_name: HashMap<String, usize>,
}

impl SchemaRegistry {
    /// Load every `*.json` file in a directory, in file-name order.
    pub fn load_dir(dir: &Path) -> Result<SchemaRegistry, RegistryError> {
        let entries = std::fs::read_dir(dir).map_err(|source| RegistryError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let mut paths: Vec<PathBuf> = entries
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| p.extension().map_or(false, |ext| ext == "json"))
            .collect();
        paths.sort();

        let mut schemas = Vec::with_capacity(paths.len());
        for path in paths {
            let source = std::fs::read_to_string(&path).map_err(|source| RegistryError::Io {
                path: path.clone(),
                source,
            })?;
            let schema = loader::parse_message(&source)
                .map_err(|source| RegistryError::Schema { path, source })?;
            schemas.push(schema);
        }
        SchemaRegistry::from_schemas(schemas)
    }

    pub fn from_schemas(schemas: Vec<MessageSchema>) -> Result<SchemaRegistry, RegistryError> {
        let mut by_name = HashMap::new();
        for (i, s) in schemas.iter().enumerate() {
            if by_name.insert(s.name.clone(), i).is_some() {
                return Err(RegistryError::DuplicateName(s.name.clone()));
            }
        }
        Ok(SchemaRegistry { schemas, by_name })
    }

    /// All message names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self.schemas.iter().map(|s| s.name.as_str()).collect();
        out.sort_unstable();
        out
    }

    pub fn get(&self, name: &str) -> Option<&MessageSchema> {
        self.by_name.get(name).map(|&i| &self.schemas[i])
    }

    /// Resolve a (possibly partial) message name to zero or more schemas:
    /// an exact match wins, otherwise every name starting with the query,
    /// in name order.
    pub fn find(&self, query: &str) -> Vec<&MessageSchema> {
        if let Some(exact) = self.get(query) {
            return vec![exact];
        }
        let mut matches: Vec<&MessageSchema> = self
            .schemas
            .iter()
            .filter(|s| s.name.starts_with(query))
            .collect();
        matches.sort_by(|a, b| a.name.cmp(&b.name));
        matches
    }

    pub fn iter(&self) -> impl Iterator<Item = &MessageSchema> {
        self.schemas.iter()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_schema(dir: &Path, file: &str, name: &str) {
        let body = format!(
            r#"{{"name": "{}", "class_id": 1, "message_id": 2,
                "fields": [{{"name": "x", "data_type": "U1"}}]}}"#,
            name
        );
        fs::write(dir.join(file), body).expect("write schema");
    }

    #[test]
    fn loads_directory_and_lists_names() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_schema(dir.path(), "b.json", "MON-RXBUF");
        write_schema(dir.path(), "a.json", "MON-TXBUF");
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let registry = SchemaRegistry::load_dir(dir.path()).expect("load");
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["MON-RXBUF", "MON-TXBUF"]);
    }

    #[test]
    fn find_prefers_exact_then_prefix() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_schema(dir.path(), "a.json", "NAV-PVT");
        write_schema(dir.path(), "b.json", "NAV-PVT-EXT");
        write_schema(dir.path(), "c.json", "NAV-POSLLH");

        let registry = SchemaRegistry::load_dir(dir.path()).expect("load");
        let exact = registry.find("NAV-PVT");
        assert_eq!(exact.len(), 1);
        assert_eq!(exact[0].name, "NAV-PVT");

        let prefix = registry.find("NAV-P");
        let names: Vec<&str> = prefix.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["NAV-POSLLH", "NAV-PVT", "NAV-PVT-EXT"]);
    }

    #[test]
    fn unmatched_name_is_empty_not_error() {
        let registry = SchemaRegistry::from_schemas(Vec::new()).expect("empty");
        assert!(registry.find("MISSING").is_empty());
    }

    #[test]
    fn malformed_schema_reports_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("bad.json"), r#"{"name": "X"}"#).unwrap();
        let err = SchemaRegistry::load_dir(dir.path()).unwrap_err();
        assert!(err.to_string().contains("bad.json"));
    }
}
