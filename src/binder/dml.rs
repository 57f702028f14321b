//! DML binding: Collected -> Resolved -> Bound.
//!
//! [`DmlBinder`] holds the raw references a statement visitor collected.
//! [`DmlBinder::resolve`] turns them into unbound identities and substitutes
//! CTE names without touching the catalog. [`ResolvedBinder::bind`] resolves
//! everything against a [`MetadataCatalog`] and produces a [`BindingResult`].

use std::collections::HashMap;
use std::fmt;

use log::{debug, trace};

use crate::ast::{ColumnRef, RangeVar};
use crate::catalog::{CatalogColumn, CatalogTable, MetadataCatalog, SearchKeys};

use super::error::BindError;
use super::extract::{ColumnTarget, SourceRefs, UnboundColumn, UnboundTable};
use super::result::BindingResult;
use super::scope::{AliasMap, AliasTarget, BoundCte, CteRegistry, ResolvedCte};
use super::statement::DmlKind;
use super::{AmbiguityCheck, BinderConfig};

/// References collected from one statement.
#[derive(Debug, Clone)]
pub struct DmlBinder {
    name: String,
    kind: DmlKind,
    target_table: Option<RangeVar>,
    target_columns: Vec<String>,
    source_tables: Vec<RangeVar>,
    source_columns: Vec<ColumnRef>,
    /// (CTE name, references of its body) in definition order.
    ctes: Vec<(String, SourceRefs)>,
}

impl DmlBinder {
    /// Creates an empty binder for the statement called `name`.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: DmlKind) -> Self {
        DmlBinder {
            name: name.into(),
            kind,
            target_table: None,
            target_columns: Vec::new(),
            source_tables: Vec::new(),
            source_columns: Vec::new(),
            ctes: Vec::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn kind(&self) -> DmlKind {
        self.kind
    }

    #[must_use]
    pub fn target_table(&self) -> Option<&RangeVar> {
        self.target_table.as_ref()
    }

    #[must_use]
    pub fn target_columns(&self) -> &[String] {
        &self.target_columns
    }

    #[must_use]
    pub fn source_tables(&self) -> &[RangeVar] {
        &self.source_tables
    }

    #[must_use]
    pub fn source_columns(&self) -> &[ColumnRef] {
        &self.source_columns
    }

    #[must_use]
    pub fn cte_names(&self) -> Vec<&str> {
        self.ctes.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub(crate) fn set_target_table(&mut self, node: &RangeVar) {
        self.target_table = Some(node.clone());
    }

    pub(crate) fn push_target_column(&mut self, name: &str) {
        self.target_columns.push(name.to_string());
    }

    pub(crate) fn set_sources(&mut self, refs: SourceRefs) {
        self.source_tables = refs.tables;
        self.source_columns = refs.columns;
    }

    pub(crate) fn add_cte(&mut self, name: &str, refs: SourceRefs) {
        self.ctes.push((name.to_string(), refs));
    }

    /// Converts collected references into unbound identities and
    /// substitutes references to CTEs. Does not contact the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement has no target, a column reference
    /// is malformed, or a CTE is defined twice or references another CTE.
    pub fn resolve(self) -> Result<ResolvedBinder, BindError> {
        let target = self.target_table.as_ref().ok_or(BindError::MissingTarget)?;
        let target_table = UnboundTable::from_range_var(target);

        let mut ctes = CteRegistry::new();
        for (name, refs) in &self.ctes {
            let cte = ResolvedCte {
                name: name.clone(),
                tables: refs.tables.iter().map(UnboundTable::from_range_var).collect(),
                columns: resolve_columns(&refs.columns)?,
            };
            if !ctes.register(cte) {
                return Err(BindError::UnsupportedCte {
                    name: name.clone(),
                    reason: "defined more than once".into(),
                });
            }
        }

        // Bodies are resolved eagerly, so a body cannot see any CTE.
        for cte in ctes.iter() {
            if let Some(nested) = cte
                .tables
                .iter()
                .find(|t| t.is_unqualified() && ctes.contains(t.name()))
            {
                return Err(BindError::UnsupportedCte {
                    name: cte.name.clone(),
                    reason: format!("references common table expression '{}'", nested.name()),
                });
            }
        }

        let source_tables = self
            .source_tables
            .iter()
            .map(UnboundTable::from_range_var)
            .map(|table| {
                if table.is_unqualified() && ctes.contains(table.name()) {
                    trace!("Substituting common table expression {}", table.name());
                    SourceRef::Cte {
                        name: table.name().to_string(),
                        alias: table.alias().map(String::from),
                    }
                } else {
                    SourceRef::Table(table)
                }
            })
            .collect();
        let source_columns = resolve_columns(&self.source_columns)?;

        Ok(ResolvedBinder {
            name: self.name,
            kind: self.kind,
            target_table,
            target_columns: self.target_columns,
            source_tables,
            source_columns,
            ctes,
        })
    }
}

fn resolve_columns(columns: &[ColumnRef]) -> Result<Vec<UnboundColumn>, BindError> {
    columns.iter().map(UnboundColumn::from_column_ref).collect()
}

/// A source-table entry after CTE substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceRef {
    /// A table to look up in the catalog.
    Table(UnboundTable),
    /// A reference to a CTE of the same statement; expands to the tables
    /// of the CTE body.
    Cte { name: String, alias: Option<String> },
}

/// References resolved without the catalog, ready to bind.
#[derive(Debug, Clone)]
pub struct ResolvedBinder {
    name: String,
    kind: DmlKind,
    target_table: UnboundTable,
    target_columns: Vec<String>,
    source_tables: Vec<SourceRef>,
    source_columns: Vec<UnboundColumn>,
    ctes: CteRegistry,
}

impl ResolvedBinder {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn kind(&self) -> DmlKind {
        self.kind
    }

    #[must_use]
    pub fn target_table(&self) -> &UnboundTable {
        &self.target_table
    }

    #[must_use]
    pub fn target_columns(&self) -> &[String] {
        &self.target_columns
    }

    #[must_use]
    pub fn source_tables(&self) -> &[SourceRef] {
        &self.source_tables
    }

    #[must_use]
    pub fn source_columns(&self) -> &[UnboundColumn] {
        &self.source_columns
    }

    #[must_use]
    pub fn ctes(&self) -> &CteRegistry {
        &self.ctes
    }

    /// Binds against `catalog` with the default configuration.
    ///
    /// # Errors
    ///
    /// See [`ResolvedBinder::bind_with_config`].
    pub fn bind<C>(&self, catalog: &C) -> Result<BindingResult, BindError>
    where
        C: MetadataCatalog + ?Sized,
    {
        self.bind_with_config(catalog, &BinderConfig::default())
    }

    /// Binds every reference against `catalog`.
    ///
    /// The binder itself is not consumed: binding twice against an
    /// unchanged catalog yields equal results.
    ///
    /// # Errors
    ///
    /// Returns the first [`BindError`] met; there is no partial result.
    pub fn bind_with_config<C>(
        &self,
        catalog: &C,
        config: &BinderConfig,
    ) -> Result<BindingResult, BindError>
    where
        C: MetadataCatalog + ?Sized,
    {
        let target_keys = config.apply_defaults(&self.target_table.search_keys());
        debug!("Searching for: {target_keys}");
        let target_table = catalog
            .search_table(&target_keys)
            .map_err(BindError::for_target)?;
        debug!("Bound target table: {target_table}");

        let target_columns = if self.target_columns.is_empty() {
            let columns = catalog.get_columns_for_table(&target_table, None)?;
            debug!("Bound all columns in {target_table}");
            columns
        } else {
            let columns = bind_target_columns(catalog, &target_table, &self.target_columns)?;
            debug!("Bound {} target columns", columns.len());
            columns
        };

        let no_ctes = HashMap::new();
        let mut bound_ctes = HashMap::new();
        for cte in self.ctes.iter() {
            let body = ScopeBinder {
                catalog,
                config,
                ctes: &no_ctes,
            };
            let sources: Vec<SourceRef> = cte.tables.iter().cloned().map(SourceRef::Table).collect();
            let scope = body.bind_sources(&sources)?;
            let columns = body.bind_columns(&scope, &cte.columns)?;
            debug!(
                "Bound common table expression {}: {} tables, {} columns",
                cte.name,
                scope.tables.len(),
                columns.len()
            );
            bound_ctes.insert(
                cte.name.clone(),
                BoundCte {
                    tables: scope.tables,
                    columns,
                },
            );
        }

        let outer = ScopeBinder {
            catalog,
            config,
            ctes: &bound_ctes,
        };
        let sources = outer.bind_sources(&self.source_tables)?;
        let source_columns = outer.bind_columns(&sources, &self.source_columns)?;

        Ok(BindingResult::new(
            target_table,
            target_columns,
            sources.tables,
            source_columns,
        ))
    }
}

/// Binds explicit target columns in the order they were written.
fn bind_target_columns<C>(
    catalog: &C,
    table: &CatalogTable,
    names: &[String],
) -> Result<Vec<CatalogColumn>, BindError>
where
    C: MetadataCatalog + ?Sized,
{
    let mut available = catalog.get_columns_for_table(table, Some(names))?;
    let mut bound = Vec::with_capacity(names.len());
    for name in names {
        match available.iter().position(|c| c.name == *name) {
            Some(index) => bound.push(available.remove(index)),
            None => {
                return Err(BindError::MissingTargetColumn {
                    table: table.to_string(),
                    column: name.clone(),
                })
            }
        }
    }
    Ok(bound)
}

/// Something an unqualified or qualified column can be looked up in.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ScopeEntry {
    Table(CatalogTable),
    Cte(String),
}

impl fmt::Display for ScopeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeEntry::Table(table) => write!(f, "{table}"),
            ScopeEntry::Cte(name) => write!(f, "{name}"),
        }
    }
}

/// Source tables of one scope after catalog lookup.
#[derive(Debug, Default)]
struct BoundSources {
    /// Deduplicated catalog tables, CTE tables included.
    tables: Vec<CatalogTable>,
    /// Lookup order for unqualified columns, deduplicated.
    entries: Vec<ScopeEntry>,
    aliases: AliasMap,
}

impl BoundSources {
    fn push_table(&mut self, table: &CatalogTable) {
        if !self.tables.contains(table) {
            self.tables.push(table.clone());
        }
    }

    fn push_entry(&mut self, entry: ScopeEntry) {
        if !self.entries.contains(&entry) {
            self.entries.push(entry);
        }
    }

    fn define_alias(&mut self, alias: &str, target: AliasTarget) -> Result<(), BindError> {
        if self.aliases.insert(alias, target) {
            Ok(())
        } else {
            Err(BindError::DuplicateAlias(alias.to_string()))
        }
    }

    fn tables_named(&self, name: &str) -> Vec<&CatalogTable> {
        self.entries
            .iter()
            .filter_map(|entry| match entry {
                ScopeEntry::Table(table) if table.name == name => Some(table),
                _ => None,
            })
            .collect()
    }

    fn traces(&self, entry: &ScopeEntry) -> bool {
        match entry {
            ScopeEntry::Table(table) => self.tables.contains(table),
            ScopeEntry::Cte(_) => self.entries.contains(entry),
        }
    }
}

/// Catalog-backed resolution within one scope (the outer statement or one
/// CTE body).
struct ScopeBinder<'a, C: ?Sized> {
    catalog: &'a C,
    config: &'a BinderConfig,
    ctes: &'a HashMap<String, BoundCte>,
}

impl<C> ScopeBinder<'_, C>
where
    C: MetadataCatalog + ?Sized,
{
    fn search_source(&self, keys: &SearchKeys) -> Result<CatalogTable, BindError> {
        let keys = self.config.apply_defaults(keys);
        debug!("Searching for: {keys}");
        self.catalog
            .search_table(&keys)
            .map_err(BindError::for_source)
    }

    fn bound_cte(&self, name: &str) -> Result<&BoundCte, BindError> {
        self.ctes.get(name).ok_or_else(|| BindError::UnsupportedCte {
            name: name.to_string(),
            reason: "is not visible in this scope".into(),
        })
    }

    fn bind_sources(&self, sources: &[SourceRef]) -> Result<BoundSources, BindError> {
        let mut bound = BoundSources::default();
        for source in sources {
            match source {
                SourceRef::Table(table) => {
                    let keys = table.search_keys();
                    if let Some(alias) = table.alias() {
                        bound.define_alias(alias, AliasTarget::Table(keys.clone()))?;
                    }
                    let candidate = self.search_source(&keys)?;
                    debug!("Bound source table: {candidate}");
                    bound.push_table(&candidate);
                    bound.push_entry(ScopeEntry::Table(candidate));
                }
                SourceRef::Cte { name, alias } => {
                    let cte = self.bound_cte(name)?;
                    if let Some(alias) = alias {
                        bound.define_alias(alias, AliasTarget::Cte(name.clone()))?;
                    }
                    for table in &cte.tables {
                        bound.push_table(table);
                    }
                    bound.push_entry(ScopeEntry::Cte(name.clone()));
                }
            }
        }
        Ok(bound)
    }

    fn bind_columns(
        &self,
        sources: &BoundSources,
        columns: &[UnboundColumn],
    ) -> Result<Vec<CatalogColumn>, BindError> {
        let mut bound = Vec::new();
        for column in columns {
            match (column.is_qualified(), column.target()) {
                (true, ColumnTarget::Star) => {
                    let entry = self.qualified_entry(sources, column)?;
                    bound.extend(self.all_columns(&entry)?);
                    debug!("Bound all source columns in {entry}");
                }
                (true, ColumnTarget::Named(name)) => {
                    let entry = self.qualified_entry(sources, column)?;
                    let found = self.columns_named(&entry, name)?;
                    let column = exactly_one(column, Some(&entry), found)?;
                    debug!("Bound source column: {column}");
                    bound.push(column);
                }
                (false, ColumnTarget::Star) => {
                    for entry in &sources.entries {
                        bound.extend(self.all_columns(entry)?);
                        debug!("Bound all source columns in {entry}");
                    }
                }
                (false, ColumnTarget::Named(name)) => {
                    let column = self.resolve_unqualified(sources, column, name)?;
                    debug!("Bound source column: {column}");
                    bound.push(column);
                }
            }
        }
        Ok(bound)
    }

    /// Finds the table or CTE a qualified column points at.
    fn qualified_entry(
        &self,
        sources: &BoundSources,
        column: &UnboundColumn,
    ) -> Result<ScopeEntry, BindError> {
        let entry = match column.qualifier() {
            [qualifier] => match sources.aliases.lookup(qualifier) {
                Some(AliasTarget::Table(keys)) => ScopeEntry::Table(self.search_source(keys)?),
                Some(AliasTarget::Cte(name)) => ScopeEntry::Cte(name.clone()),
                None if self.ctes.contains_key(qualifier.as_str()) => {
                    ScopeEntry::Cte(qualifier.clone())
                }
                None => self.table_by_name(sources, qualifier)?,
            },
            [schema, table] => ScopeEntry::Table(
                self.search_source(&SearchKeys::table(table.as_str()).with_schema(schema.as_str()))?,
            ),
            [database, schema, table] => ScopeEntry::Table(
                self.search_source(
                    &SearchKeys::table(table.as_str())
                        .with_schema(schema.as_str())
                        .with_database(database.as_str()),
                )?,
            ),
            _ => return Err(BindError::InvalidColumnReference(column.to_string())),
        };

        if !sources.traces(&entry) {
            return Err(BindError::UntracedSourceColumn {
                column: column.to_string(),
                table: entry.to_string(),
            });
        }
        Ok(entry)
    }

    /// A bare qualifier that is not an alias names a table: prefer a source
    /// table of that name, else ask the catalog.
    fn table_by_name(&self, sources: &BoundSources, name: &str) -> Result<ScopeEntry, BindError> {
        match sources.tables_named(name).as_slice() {
            [table] => Ok(ScopeEntry::Table((*table).clone())),
            [] => Ok(ScopeEntry::Table(self.search_source(&SearchKeys::table(name))?)),
            several => Err(BindError::AmbiguousSourceTable {
                keys: SearchKeys::table(name),
                matches: several.len(),
            }),
        }
    }

    fn all_columns(&self, entry: &ScopeEntry) -> Result<Vec<CatalogColumn>, BindError> {
        match entry {
            ScopeEntry::Table(table) => Ok(self.catalog.get_columns_for_table(table, None)?),
            ScopeEntry::Cte(name) => Ok(self.bound_cte(name)?.columns.clone()),
        }
    }

    fn columns_named(&self, entry: &ScopeEntry, name: &str) -> Result<Vec<CatalogColumn>, BindError> {
        match entry {
            ScopeEntry::Table(table) => {
                let names = [name.to_string()];
                Ok(self
                    .catalog
                    .get_columns_for_table(table, Some(names.as_slice()))?)
            }
            ScopeEntry::Cte(cte) => Ok(self
                .bound_cte(cte)?
                .columns
                .iter()
                .filter(|c| c.name == name)
                .cloned()
                .collect()),
        }
    }

    /// Searches every source in order. The first source with a match is
    /// tentatively accepted; any further match is an ambiguity.
    fn resolve_unqualified(
        &self,
        sources: &BoundSources,
        column: &UnboundColumn,
        name: &str,
    ) -> Result<CatalogColumn, BindError> {
        let mut matches = Vec::new();
        for entry in &sources.entries {
            let found = self.columns_named(entry, name)?;
            if found.is_empty() {
                continue;
            }
            matches.extend(found);
            if matches.len() > 1 && self.config.ambiguity_check == AmbiguityCheck::FirstDuplicate {
                break;
            }
        }
        exactly_one(column, None, matches)
    }
}

fn exactly_one(
    column: &UnboundColumn,
    scope: Option<&ScopeEntry>,
    mut found: Vec<CatalogColumn>,
) -> Result<CatalogColumn, BindError> {
    if found.len() > 1 {
        return Err(BindError::AmbiguousSourceColumn {
            column: column.to_string(),
            candidates: found.iter().map(ToString::to_string).collect(),
        });
    }
    found.pop().ok_or_else(|| BindError::SourceColumnNotFound {
        column: column.to_string(),
        table: scope.map(ToString::to_string),
    })
}
