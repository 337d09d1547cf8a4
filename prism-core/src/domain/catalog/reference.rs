// prism-core/src/domain/catalog/reference.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::catalog::table::Catalog;
use crate::domain::error::DomainError;

/// `table#column`, as written by authors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IndicatorRef {
    pub table: String,
    pub column: String,
}

impl IndicatorRef {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
        }
    }
}

impl FromStr for IndicatorRef {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || DomainError::MalformedReference(s.to_string());
        let (table, column) = s.split_once('#').ok_or_else(malformed)?;
        let (table, column) = (table.trim(), column.trim());
        if table.is_empty() || column.is_empty() || column.contains('#') {
            return Err(malformed());
        }
        Ok(Self::new(table, column))
    }
}

impl TryFrom<String> for IndicatorRef {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<IndicatorRef> for String {
    fn from(value: IndicatorRef) -> Self {
        value.to_string()
    }
}

impl fmt::Display for IndicatorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.table, self.column)
    }
}

/// A reference checked against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIndicator {
    pub reference: IndicatorRef,
    /// `<catalog_path>#<column>`
    pub catalog_path: String,
}

/// Validates indicator references against an in-memory catalog. No I/O.
pub struct ReferenceResolver<'a> {
    catalog: &'a Catalog,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    pub fn resolve(&self, raw: &str) -> Result<ResolvedIndicator, DomainError> {
        let reference: IndicatorRef = raw.parse()?;
        let table = self.catalog.find_table(&reference.table)?;
        if !table.has_column(&reference.column) {
            return Err(DomainError::UnknownColumn {
                table: table.catalog_path().to_string(),
                column: reference.column,
            });
        }
        Ok(ResolvedIndicator {
            catalog_path: table.qualify(&reference.column),
            reference,
        })
    }

    /// Shortcut returning the qualified path only.
    pub fn qualify(&self, raw: &str) -> Result<String, DomainError> {
        self.resolve(raw).map(|r| r.catalog_path)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::catalog::table::TableDescriptor;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            TableDescriptor::new("cases_deaths", "grapher/covid/latest/cases_deaths/cases_deaths")
                .with_columns(["total_cases", "weekly_deaths"]),
        ])
    }

    #[test]
    fn test_parse_reference() {
        let r: IndicatorRef = "cases_deaths#total_cases".parse().unwrap();
        assert_eq!(r, IndicatorRef::new("cases_deaths", "total_cases"));
        assert_eq!(r.to_string(), "cases_deaths#total_cases");
    }

    #[test]
    fn test_malformed_references() {
        for raw in ["cases_deaths", "#total_cases", "cases_deaths#", "a#b#c"] {
            assert_eq!(
                raw.parse::<IndicatorRef>().unwrap_err(),
                DomainError::MalformedReference(raw.to_string()),
                "input: {}",
                raw
            );
        }
    }

    #[test]
    fn test_resolve_known_reference() -> anyhow::Result<()> {
        let catalog = catalog();
        let resolver = ReferenceResolver::new(&catalog);
        let resolved = resolver.resolve("cases_deaths#total_cases")?;
        assert_eq!(
            resolved.catalog_path,
            "grapher/covid/latest/cases_deaths/cases_deaths#total_cases"
        );
        assert_eq!(resolved.reference.column, "total_cases");
        Ok(())
    }

    #[test]
    fn test_resolve_unknown_table_and_column() {
        let catalog = catalog();
        let resolver = ReferenceResolver::new(&catalog);
        assert_eq!(
            resolver.resolve("bogus#col").unwrap_err(),
            DomainError::UnknownTable("bogus".to_string())
        );
        assert!(matches!(
            resolver.resolve("cases_deaths#bogus"),
            Err(DomainError::UnknownColumn { .. })
        ));
    }

    #[test]
    fn test_resolve_fully_qualified_reference() {
        let catalog = catalog();
        let resolver = ReferenceResolver::new(&catalog);
        let path = "grapher/covid/latest/cases_deaths/cases_deaths#weekly_deaths";
        assert_eq!(resolver.qualify(path).unwrap(), path);
    }

    #[test]
    fn test_reference_serde_round_trip_through_string() {
        let r: IndicatorRef = serde_json::from_str(r#""a#b""#).unwrap();
        assert_eq!(serde_json::to_string(&r).unwrap(), r#""a#b""#);
        assert!(serde_json::from_str::<IndicatorRef>(r#""ab""#).is_err());
    }
}
