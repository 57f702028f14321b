//! Per-statement name scopes: alias map and CTE registry.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::catalog::{CatalogColumn, CatalogTable, SearchKeys};

use super::extract::{UnboundColumn, UnboundTable};

/// What an alias stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AliasTarget {
    /// A catalog table, looked up again by its keys.
    Table(SearchKeys),
    /// A common table expression of the same statement.
    Cte(String),
}

/// Alias scope for one statement or one CTE body.
#[derive(Debug, Clone, Default)]
pub struct AliasMap {
    /// Alias -> what it stands for.
    aliases: HashMap<String, AliasTarget>,
}

impl AliasMap {
    /// Creates a new empty alias map.
    #[must_use]
    pub fn new() -> Self {
        AliasMap {
            aliases: HashMap::new(),
        }
    }

    /// Adds an alias. Returns false, leaving the map unchanged, if the alias
    /// is already defined in this scope.
    pub fn insert(&mut self, alias: impl Into<String>, target: AliasTarget) -> bool {
        match self.aliases.entry(alias.into()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(target);
                true
            }
        }
    }

    /// Looks up an alias.
    #[must_use]
    pub fn lookup(&self, alias: &str) -> Option<&AliasTarget> {
        self.aliases.get(alias)
    }

    /// Returns true if the alias is defined.
    #[must_use]
    pub fn contains(&self, alias: &str) -> bool {
        self.aliases.contains_key(alias)
    }

    /// Returns all alias names.
    #[must_use]
    pub fn aliases(&self) -> Vec<&str> {
        self.aliases.keys().map(String::as_str).collect()
    }
}

/// A CTE body resolved without the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCte {
    pub name: String,
    pub tables: Vec<UnboundTable>,
    pub columns: Vec<UnboundColumn>,
}

/// CTEs of one statement, in definition order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CteRegistry {
    ctes: Vec<ResolvedCte>,
}

impl CteRegistry {
    #[must_use]
    pub fn new() -> Self {
        CteRegistry { ctes: Vec::new() }
    }

    /// Registers a CTE. Returns false, leaving the registry unchanged, if the
    /// name is already taken.
    pub fn register(&mut self, cte: ResolvedCte) -> bool {
        if self.contains(&cte.name) {
            return false;
        }
        self.ctes.push(cte);
        true
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ResolvedCte> {
        self.ctes.iter().find(|cte| cte.name == name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResolvedCte> {
        self.ctes.iter()
    }

    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.ctes.iter().map(|cte| cte.name.as_str()).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ctes.is_empty()
    }
}

/// A CTE body bound against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundCte {
    pub tables: Vec<CatalogTable>,
    pub columns: Vec<CatalogColumn>,
}
