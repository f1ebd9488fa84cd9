//! Versioned schema declarations.
//!
//! Every version declares the full set of tables. Each table carries an index
//! specifier list in the compact `"++id, welder_id, article"` notation (the
//! first entry is the auto-incremented primary key, the rest are indexed
//! lookup fields) plus the column list used to build the SQLite table.
//!
//! Versions only ever add: new tables, new columns, new indexes. The registry
//! refuses declarations that drop or repurpose anything an earlier version
//! declared, which is what lets the migration runner upgrade in place
//! without touching existing rows.

use crate::errors::{AppError, AppResult};
use std::collections::BTreeMap;

pub const WELDERS: &str = "welders";
pub const PLANS: &str = "plans";
pub const RECORDS: &str = "records";
pub const NORMS: &str = "norms";
pub const DAILIES: &str = "dailies";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Real,
    Text,
    /// Stored as INTEGER 0/1
    Boolean,
}

impl ColumnType {
    pub fn sql(&self) -> &'static str {
        match self {
            ColumnType::Integer | ColumnType::Boolean => "INTEGER",
            ColumnType::Real => "REAL",
            ColumnType::Text => "TEXT",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDecl {
    pub name: String,
    pub kind: ColumnType,
    pub nullable: bool,
    /// SQL literal used as DEFAULT (e.g. `0`, `''`)
    pub default: Option<String>,
}

impl ColumnDecl {
    /// NOT NULL column without default: only valid in the version that
    /// introduces the table.
    pub fn required(name: &str, kind: ColumnType) -> Self {
        Self {
            name: name.to_string(),
            kind,
            nullable: false,
            default: None,
        }
    }

    /// Nullable column; old rows read it back as absent.
    pub fn optional(name: &str, kind: ColumnType) -> Self {
        Self {
            name: name.to_string(),
            kind,
            nullable: true,
            default: None,
        }
    }

    /// NOT NULL column with a default literal; old rows read the default.
    pub fn with_default(name: &str, kind: ColumnType, default: &str) -> Self {
        Self {
            name: name.to_string(),
            kind,
            nullable: false,
            default: Some(default.to_string()),
        }
    }

    /// Column definition as used in CREATE TABLE / ALTER TABLE ADD COLUMN.
    pub fn to_sql(&self) -> String {
        let mut out = format!("{} {}", self.name, self.kind.sql());
        if !self.nullable {
            out.push_str(" NOT NULL");
        }
        if let Some(d) = &self.default {
            out.push_str(" DEFAULT ");
            out.push_str(d);
        }
        out
    }

    fn can_be_added_later(&self) -> bool {
        self.nullable || self.default.is_some()
    }
}

/// Parsed index specifier list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSpec {
    pub primary: String,
    /// Secondary indexed fields, in declaration order.
    pub fields: Vec<String>,
}

impl IndexSpec {
    pub fn parse(spec: &str) -> AppResult<Self> {
        let parts: Vec<&str> = spec
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();

        let Some((first, rest)) = parts.split_first() else {
            return Err(AppError::Schema(format!("empty index spec '{}'", spec)));
        };

        let primary = first.strip_prefix("++").ok_or_else(|| {
            AppError::Schema(format!(
                "primary key '{}' must be auto-incremented ('++{}')",
                first, first
            ))
        })?;
        check_field_name(primary, spec)?;

        let mut fields: Vec<String> = Vec::with_capacity(rest.len());
        for raw in rest {
            if raw.starts_with("++") {
                return Err(AppError::Schema(format!(
                    "only the primary key may be auto-incremented: '{}' in '{}'",
                    raw, spec
                )));
            }
            check_field_name(raw, spec)?;
            if *raw == primary || fields.iter().any(|f| f == raw) {
                return Err(AppError::Schema(format!(
                    "duplicate field '{}' in '{}'",
                    raw, spec
                )));
            }
            fields.push(raw.to_string());
        }

        Ok(Self {
            primary: primary.to_string(),
            fields,
        })
    }

    pub fn contains(&self, field: &str) -> bool {
        self.primary == field || self.fields.iter().any(|f| f == field)
    }
}

fn check_field_name(name: &str, spec: &str) -> AppResult<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !name.starts_with(|c: char| c.is_ascii_digit());

    if valid {
        Ok(())
    } else {
        // also rejects compound "[a+b]" and multi-entry "*tags" forms
        Err(AppError::Schema(format!(
            "unsupported field specifier '{}' in '{}'",
            name, spec
        )))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub name: String,
    pub index: IndexSpec,
    /// Non-primary columns.
    pub columns: Vec<ColumnDecl>,
}

impl TableSchema {
    pub fn column(&self, name: &str) -> Option<&ColumnDecl> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn create_sql(&self) -> String {
        let mut defs = vec![format!(
            "{} INTEGER PRIMARY KEY AUTOINCREMENT",
            self.index.primary
        )];
        defs.extend(self.columns.iter().map(ColumnDecl::to_sql));
        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n    {}\n)",
            self.name,
            defs.join(",\n    ")
        )
    }
}

pub fn index_name(table: &str, field: &str) -> String {
    format!("idx_{}_{}", table, field)
}

/// Unvalidated declaration of one schema version.
#[derive(Debug, Clone)]
pub struct SchemaVersion {
    pub version: u32,
    tables: Vec<(String, String, Vec<ColumnDecl>)>,
}

impl SchemaVersion {
    pub fn new(version: u32) -> Self {
        Self {
            version,
            tables: Vec::new(),
        }
    }

    pub fn table(mut self, name: &str, indexes: &str, columns: Vec<ColumnDecl>) -> Self {
        self.tables
            .push((name.to_string(), indexes.to_string(), columns));
        self
    }
}

/// A validated schema version.
#[derive(Debug, Clone)]
pub struct VersionSchema {
    pub version: u32,
    pub tables: BTreeMap<String, TableSchema>,
}

/// Additive changes needed to go from the previous version to `version`.
#[derive(Debug, Clone, Default)]
pub struct MigrationStep {
    pub version: u32,
    pub new_tables: Vec<TableSchema>,
    /// (table, column)
    pub new_columns: Vec<(String, ColumnDecl)>,
    /// (table, field)
    pub new_indexes: Vec<(String, String)>,
}

impl MigrationStep {
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        for t in &self.new_tables {
            parts.push(format!("create table {}", t.name));
        }
        for (t, c) in &self.new_columns {
            parts.push(format!("add column {}.{}", t, c.name));
        }
        if parts.is_empty() && !self.new_indexes.is_empty() {
            parts.push(format!("{} new index(es)", self.new_indexes.len()));
        }
        if parts.is_empty() {
            "no schema changes".to_string()
        } else {
            parts.join(", ")
        }
    }
}

#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    versions: Vec<VersionSchema>,
}

impl SchemaRegistry {
    pub fn new(declared: Vec<SchemaVersion>) -> AppResult<Self> {
        if declared.is_empty() {
            return Err(AppError::Schema("no schema versions declared".into()));
        }

        let mut versions: Vec<VersionSchema> = Vec::with_capacity(declared.len());

        for decl in declared {
            if versions.is_empty() && decl.version != 1 {
                return Err(AppError::Schema(format!(
                    "schema versions start at 1, first declared is {}",
                    decl.version
                )));
            }
            if let Some(prev) = versions.last()
                && decl.version <= prev.version
            {
                return Err(AppError::Schema(format!(
                    "version {} declared after version {}",
                    decl.version, prev.version
                )));
            }

            let mut tables = BTreeMap::new();
            for (name, indexes, columns) in decl.tables {
                let table = build_table(&name, &indexes, columns)?;
                if tables.insert(name.clone(), table).is_some() {
                    return Err(AppError::Schema(format!(
                        "table '{}' declared twice in version {}",
                        name, decl.version
                    )));
                }
            }

            let current = VersionSchema {
                version: decl.version,
                tables,
            };
            if let Some(prev) = versions.last() {
                check_additive(prev, &current)?;
            }
            versions.push(current);
        }

        Ok(Self { versions })
    }

    /// The schema history shipped with this build.
    pub fn latest() -> AppResult<Self> {
        Self::new(builtin_versions())
    }

    pub fn latest_version(&self) -> u32 {
        self.versions.last().map(|v| v.version).unwrap_or(0)
    }

    pub fn versions(&self) -> impl Iterator<Item = u32> + '_ {
        self.versions.iter().map(|v| v.version)
    }

    pub fn version(&self, version: u32) -> Option<&VersionSchema> {
        self.versions.iter().find(|v| v.version == version)
    }

    /// Latest declaration of `name`.
    pub fn table(&self, name: &str) -> Option<&TableSchema> {
        self.versions.last().and_then(|v| v.tables.get(name))
    }

    pub fn is_indexed(&self, table: &str, field: &str) -> bool {
        self.table(table)
            .map(|t| t.index.contains(field))
            .unwrap_or(false)
    }

    /// The newest declared version not above `version`.
    fn schema_at(&self, version: u32) -> Option<&VersionSchema> {
        self.versions.iter().rev().find(|v| v.version <= version)
    }

    /// Ordered steps that bring a store at `from` up to the latest version.
    pub fn steps_from(&self, from: u32) -> Vec<MigrationStep> {
        let mut prev = self.schema_at(from);
        let mut steps = Vec::new();

        for target in self.versions.iter().filter(|v| v.version > from) {
            steps.push(diff(prev, target));
            prev = Some(target);
        }

        steps
    }
}

fn build_table(name: &str, indexes: &str, columns: Vec<ColumnDecl>) -> AppResult<TableSchema> {
    let index = IndexSpec::parse(indexes)?;

    for (i, c) in columns.iter().enumerate() {
        if c.name == index.primary {
            return Err(AppError::Schema(format!(
                "{}: column '{}' shadows the primary key",
                name, c.name
            )));
        }
        if columns[..i].iter().any(|o| o.name == c.name) {
            return Err(AppError::Schema(format!(
                "{}: column '{}' declared twice",
                name, c.name
            )));
        }
    }

    for field in &index.fields {
        if !columns.iter().any(|c| &c.name == field) {
            return Err(AppError::Schema(format!(
                "{}: indexed field '{}' has no column",
                name, field
            )));
        }
    }

    Ok(TableSchema {
        name: name.to_string(),
        index,
        columns,
    })
}

fn check_additive(prev: &VersionSchema, next: &VersionSchema) -> AppResult<()> {
    let v = next.version;

    for (name, old) in &prev.tables {
        let new = next.tables.get(name).ok_or_else(|| {
            AppError::Schema(format!("version {} drops table '{}'", v, name))
        })?;

        if new.index.primary != old.index.primary {
            return Err(AppError::Schema(format!(
                "version {} changes the primary key of '{}'",
                v, name
            )));
        }

        for col in &old.columns {
            match new.column(&col.name) {
                None => {
                    return Err(AppError::Schema(format!(
                        "version {} drops column '{}.{}'",
                        v, name, col.name
                    )));
                }
                Some(c) if c != col => {
                    return Err(AppError::Schema(format!(
                        "version {} redefines column '{}.{}'",
                        v, name, col.name
                    )));
                }
                Some(_) => {}
            }
        }

        for field in &old.index.fields {
            if !new.index.contains(field) {
                return Err(AppError::Schema(format!(
                    "version {} drops index '{}.{}'",
                    v, name, field
                )));
            }
        }

        for col in &new.columns {
            if old.column(&col.name).is_none() && !col.can_be_added_later() {
                return Err(AppError::Schema(format!(
                    "version {} adds '{}.{}' as NOT NULL without a default",
                    v, name, col.name
                )));
            }
        }
    }

    Ok(())
}

fn diff(prev: Option<&VersionSchema>, next: &VersionSchema) -> MigrationStep {
    let mut step = MigrationStep {
        version: next.version,
        ..Default::default()
    };

    for (name, table) in &next.tables {
        match prev.and_then(|p| p.tables.get(name)) {
            None => {
                step.new_tables.push(table.clone());
                for f in &table.index.fields {
                    step.new_indexes.push((name.clone(), f.clone()));
                }
            }
            Some(old) => {
                for col in &table.columns {
                    if old.column(&col.name).is_none() {
                        step.new_columns.push((name.clone(), col.clone()));
                    }
                }
                for f in &table.index.fields {
                    if !old.index.contains(f) {
                        step.new_indexes.push((name.clone(), f.clone()));
                    }
                }
            }
        }
    }

    step
}

fn builtin_versions() -> Vec<SchemaVersion> {
    use ColumnType::*;

    let welders = vec![ColumnDecl::required("name", Text)];
    let plans = vec![
        ColumnDecl::required("article", Text),
        ColumnDecl::required("quantity", Integer),
        ColumnDecl::with_default("completed", Integer, "0"),
        ColumnDecl::with_default("is_unlimited", Boolean, "0"),
    ];
    let norms = vec![
        ColumnDecl::required("article", Text),
        ColumnDecl::required("time", Real),
    ];

    let records_v1 = vec![
        ColumnDecl::required("welder_id", Integer),
        ColumnDecl::required("article", Text),
        ColumnDecl::required("quantity", Integer),
        ColumnDecl::required("date", Text),
        ColumnDecl::with_default("history", Text, "''"),
    ];
    let mut records_v3 = records_v1.clone();
    records_v3.push(ColumnDecl::optional("last_updated", Text));
    records_v3.push(ColumnDecl::with_default("total_hours", Real, "0"));

    let dailies_v2 = vec![
        ColumnDecl::required("welder_id", Integer),
        ColumnDecl::required("article", Text),
        ColumnDecl::required("date_str", Text),
        ColumnDecl::required("hours", Real),
    ];
    let mut dailies_v4 = dailies_v2.clone();
    dailies_v4.push(ColumnDecl::optional("record_id", Integer));

    const WELDERS_IDX: &str = "++id, name";
    const PLANS_IDX: &str = "++id, article, quantity, completed, is_unlimited";
    const NORMS_IDX: &str = "++id, article, time";
    const RECORDS_IDX_V1: &str = "++id, welder_id, article, quantity, date";
    const RECORDS_IDX_V3: &str = "++id, welder_id, article, quantity, date, last_updated, total_hours";
    const DAILIES_IDX_V2: &str = "++id, welder_id, article, date_str, hours";
    const DAILIES_IDX_V4: &str = "++id, welder_id, record_id, article, date_str, hours";

    vec![
        SchemaVersion::new(1)
            .table(WELDERS, WELDERS_IDX, welders.clone())
            .table(PLANS, PLANS_IDX, plans.clone())
            .table(RECORDS, RECORDS_IDX_V1, records_v1.clone())
            .table(NORMS, NORMS_IDX, norms.clone()),
        SchemaVersion::new(2)
            .table(WELDERS, WELDERS_IDX, welders.clone())
            .table(PLANS, PLANS_IDX, plans.clone())
            .table(RECORDS, RECORDS_IDX_V1, records_v1)
            .table(NORMS, NORMS_IDX, norms.clone())
            .table(DAILIES, DAILIES_IDX_V2, dailies_v2.clone()),
        SchemaVersion::new(3)
            .table(WELDERS, WELDERS_IDX, welders.clone())
            .table(PLANS, PLANS_IDX, plans.clone())
            .table(RECORDS, RECORDS_IDX_V3, records_v3.clone())
            .table(NORMS, NORMS_IDX, norms.clone())
            .table(DAILIES, DAILIES_IDX_V2, dailies_v2),
        SchemaVersion::new(4)
            .table(WELDERS, WELDERS_IDX, welders)
            .table(PLANS, PLANS_IDX, plans)
            .table(RECORDS, RECORDS_IDX_V3, records_v3)
            .table(NORMS, NORMS_IDX, norms)
            .table(DAILIES, DAILIES_IDX_V4, dailies_v4),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_index_spec() {
        let spec = IndexSpec::parse("++id, welder_id,article ,  date_str").unwrap();
        assert_eq!(spec.primary, "id");
        assert_eq!(spec.fields, vec!["welder_id", "article", "date_str"]);
        assert!(spec.contains("id"));
        assert!(spec.contains("article"));
        assert!(!spec.contains("hours"));
    }

    #[test]
    fn rejects_bad_index_specs() {
        assert!(IndexSpec::parse("").is_err());
        assert!(IndexSpec::parse("id, name").is_err());
        assert!(IndexSpec::parse("++id, ++name").is_err());
        assert!(IndexSpec::parse("++id, name, name").is_err());
        assert!(IndexSpec::parse("++id, [a+b]").is_err());
        assert!(IndexSpec::parse("++id, *tags").is_err());
    }

    #[test]
    fn builtin_registry_is_valid() {
        let reg = SchemaRegistry::latest().unwrap();
        assert_eq!(reg.latest_version(), 4);
        assert_eq!(reg.versions().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
        assert!(reg.is_indexed(DAILIES, "record_id"));
        assert!(reg.is_indexed(RECORDS, "total_hours"));
        assert!(!reg.is_indexed(RECORDS, "history"));
        assert!(reg.version(1).unwrap().tables.get(DAILIES).is_none());
    }

    #[test]
    fn steps_from_zero_create_everything() {
        let reg = SchemaRegistry::latest().unwrap();
        let steps = reg.steps_from(0);
        assert_eq!(steps.len(), 4);
        assert_eq!(steps[0].new_tables.len(), 4);
        assert_eq!(steps[1].new_tables.len(), 1);
        assert_eq!(steps[1].new_tables[0].name, DAILIES);

        let v3: Vec<&str> = steps[2]
            .new_columns
            .iter()
            .map(|(_, c)| c.name.as_str())
            .collect();
        assert_eq!(v3, vec!["last_updated", "total_hours"]);

        assert_eq!(steps[3].new_columns.len(), 1);
        assert_eq!(steps[3].new_columns[0].1.name, "record_id");
        assert_eq!(
            steps[3].new_indexes,
            vec![(DAILIES.to_string(), "record_id".to_string())]
        );
    }

    #[test]
    fn steps_from_latest_is_empty() {
        let reg = SchemaRegistry::latest().unwrap();
        assert!(reg.steps_from(4).is_empty());
        assert_eq!(reg.steps_from(3).len(), 1);
    }

    #[test]
    fn rejects_dropped_column() {
        let res = SchemaRegistry::new(vec![
            SchemaVersion::new(1).table(
                "t",
                "++id, a",
                vec![
                    ColumnDecl::required("a", ColumnType::Text),
                    ColumnDecl::required("b", ColumnType::Text),
                ],
            ),
            SchemaVersion::new(2).table(
                "t",
                "++id, a",
                vec![ColumnDecl::required("a", ColumnType::Text)],
            ),
        ]);
        assert!(matches!(res, Err(AppError::Schema(_))));
    }

    #[test]
    fn rejects_late_not_null_column_without_default() {
        let res = SchemaRegistry::new(vec![
            SchemaVersion::new(1).table("t", "++id", vec![]),
            SchemaVersion::new(2).table(
                "t",
                "++id",
                vec![ColumnDecl::required("a", ColumnType::Integer)],
            ),
        ]);
        assert!(matches!(res, Err(AppError::Schema(_))));
    }

    #[test]
    fn rejects_non_increasing_versions_and_unknown_index_fields() {
        let dup = SchemaRegistry::new(vec![
            SchemaVersion::new(1).table("t", "++id", vec![]),
            SchemaVersion::new(1).table("t", "++id", vec![]),
        ]);
        assert!(dup.is_err());

        let missing = SchemaRegistry::new(vec![SchemaVersion::new(1).table(
            "t",
            "++id, ghost",
            vec![],
        )]);
        assert!(missing.is_err());
    }

    #[test]
    fn first_version_must_be_one() {
        for first in [0, 2] {
            let res = SchemaRegistry::new(vec![
                SchemaVersion::new(first).table("t", "++id", vec![]),
                SchemaVersion::new(first + 1).table("t", "++id", vec![]),
            ]);
            assert!(matches!(res, Err(AppError::Schema(_))), "first = {}", first);
        }
    }

    #[test]
    fn create_sql_lists_all_columns() {
        let reg = SchemaRegistry::latest().unwrap();
        let sql = reg.table(PLANS).unwrap().create_sql();
        assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS plans"));
        assert!(sql.contains("id INTEGER PRIMARY KEY AUTOINCREMENT"));
        assert!(sql.contains("is_unlimited INTEGER NOT NULL DEFAULT 0"));
    }
}
