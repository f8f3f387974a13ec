//! Alias table and its persistent store.
//!
//! The table maps a whole stage string to a replacement. Substitution is an
//! exact match on the full, whitespace-normalized stage: with `ll -> ls -la`,
//! the stage `ll` becomes `ls -la` but `ll /tmp` is left alone.

use crate::errors::{ShellError, ShellResult};
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default alias file name, relative to the home directory
pub const DEFAULT_ALIAS_FILE: &str = ".eshrc";

pub type AliasTable = BTreeMap<String, String>;

/// Table written when no alias file exists yet
pub fn default_table() -> AliasTable {
    AliasTable::from([("ll".to_string(), "ls -la".to_string())])
}

/// Backing storage for the alias table. `save` replaces the whole table.
pub trait AliasStore {
    fn load(&self) -> ShellResult<AliasTable>;
    fn save(&self, table: &AliasTable) -> ShellResult<()>;
}

/// JSON object stored at a fixed per-user path
#[derive(Debug, Clone)]
pub struct JsonAliasStore {
    path: PathBuf,
}

impl JsonAliasStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_home(home: &Path) -> Self {
        Self::new(home.join(DEFAULT_ALIAS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the default table if the file does not exist yet.
    pub fn ensure_exists(&self) -> ShellResult<()> {
        if self.path.exists() {
            return Ok(());
        }
        info!(path = %self.path.display(), "creating alias file");
        self.save(&default_table())
    }

    fn io_error(&self, source: io::Error) -> ShellError {
        ShellError::AliasStore {
            path: self.path.clone(),
            source,
        }
    }
}

impl AliasStore for JsonAliasStore {
    fn load(&self) -> ShellResult<AliasTable> {
        let content = fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        serde_json::from_str(&content).map_err(|source| ShellError::AliasFormat {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, table: &AliasTable) -> ShellResult<()> {
        let mut json = serde_json::to_string(table).map_err(|source| ShellError::AliasFormat {
            path: self.path.clone(),
            source,
        })?;
        json.push('\n');

        // Full overwrite through a sibling file so readers never see half a table.
        let tmp = self.path.with_extension("tmp");
        let mut file = fs::File::create(&tmp).map_err(|e| self.io_error(e))?;
        file.write_all(json.as_bytes())
            .and_then(|()| file.sync_all())
            .map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))
    }
}

/// Store held in memory: `load` returns a fixed table and `save` discards
/// what it is given. Sessions under test run against it.
#[derive(Debug, Clone, Default)]
pub struct MemoryAliasStore {
    initial: AliasTable,
}

impl MemoryAliasStore {
    pub fn new(initial: AliasTable) -> Self {
        Self { initial }
    }
}

impl AliasStore for MemoryAliasStore {
    fn load(&self) -> ShellResult<AliasTable> {
        Ok(self.initial.clone())
    }

    fn save(&self, _table: &AliasTable) -> ShellResult<()> {
        Ok(())
    }
}

/// In-memory alias table bound to the store it is persisted in.
pub struct Aliases<S> {
    table: AliasTable,
    store: S,
}

impl<S: AliasStore> Aliases<S> {
    pub fn load(store: S) -> ShellResult<Self> {
        let table = store.load()?;
        debug!(count = table.len(), "loaded aliases");
        Ok(Self { table, store })
    }

    /// Replace the whole stage when it matches a key exactly.
    pub fn resolve<'a>(&'a self, stage: &'a str) -> &'a str {
        match self.table.get(stage) {
            Some(replacement) => {
                debug!(stage, replacement = %replacement, "alias substituted");
                replacement
            }
            None => stage,
        }
    }

    /// Store `key -> value` and persist the whole table.
    pub fn define(&mut self, key: &str, value: &str) -> ShellResult<()> {
        self.table.insert(key.to_string(), value.to_string());
        self.store.save(&self.table)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.table.iter()
    }

    pub fn table(&self) -> &AliasTable {
        &self.table
    }
}
