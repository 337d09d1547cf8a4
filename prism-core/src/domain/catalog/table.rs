// prism-core/src/domain/catalog/table.rs

use serde::{Deserialize, Serialize};

use crate::domain::collection::DimensionValues;
use crate::domain::error::DomainError;

#[derive(Deserialize)]
#[serde(untagged)]
enum ColumnRepr {
    Name(String),
    Full {
        name: String,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        unit: Option<String>,
        #[serde(default)]
        dimensions: DimensionValues,
    },
}

impl From<ColumnRepr> for ColumnDescriptor {
    fn from(repr: ColumnRepr) -> Self {
        match repr {
            ColumnRepr::Name(name) => ColumnDescriptor::new(name),
            ColumnRepr::Full {
                name,
                title,
                unit,
                dimensions,
            } => ColumnDescriptor {
                name,
                title,
                unit,
                dimensions,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ColumnRepr")]
pub struct ColumnDescriptor {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Dimension tuple this column represents, when the dataset declares one.
    #[serde(skip_serializing_if = "DimensionValues::is_empty")]
    pub dimensions: DimensionValues,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: None,
            unit: None,
            dimensions: DimensionValues::new(),
        }
    }

    pub fn with_dimensions(mut self, dimensions: DimensionValues) -> Self {
        self.dimensions = dimensions;
        self
    }
}

/// A loaded data table: short name, stable catalog path and its columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDescriptor {
    pub name: String,

    /// e.g. `grapher/covid/latest/cases_deaths/cases_deaths`. Defaults to the name.
    #[serde(default, alias = "path")]
    pub catalog_path: String,

    #[serde(default)]
    pub columns: Vec<ColumnDescriptor>,
}

impl TableDescriptor {
    pub fn new(name: impl Into<String>, catalog_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            catalog_path: catalog_path.into(),
            columns: Vec::new(),
        }
    }

    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns
            .extend(columns.into_iter().map(ColumnDescriptor::new));
        self
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn catalog_path(&self) -> &str {
        if self.catalog_path.is_empty() {
            &self.name
        } else {
            &self.catalog_path
        }
    }

    /// Fully qualified indicator path: `<catalog_path>#<column>`.
    pub fn qualify(&self, column: &str) -> String {
        format!("{}#{}", self.catalog_path(), column)
    }

    fn answers_to(&self, table: &str) -> bool {
        let path = self.catalog_path();
        self.name == table || path == table || path.ends_with(&format!("/{}", table))
    }
}

/// The set of known tables, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub tables: Vec<TableDescriptor>,
}

impl Catalog {
    pub fn new(tables: Vec<TableDescriptor>) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &[TableDescriptor] {
        &self.tables
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Finds a table by short name, full catalog path or a `/`-suffix of it.
    pub fn find_table(&self, table: &str) -> Result<&TableDescriptor, DomainError> {
        let matches: Vec<&TableDescriptor> =
            self.tables.iter().filter(|t| t.answers_to(table)).collect();

        match matches.as_slice() {
            [] => Err(DomainError::UnknownTable(table.to_string())),
            [only] => Ok(*only),
            many => {
                // An exact path match beats suffix matches.
                if let Some(exact) = many.iter().find(|t| t.catalog_path() == table) {
                    return Ok(*exact);
                }
                Err(DomainError::AmbiguousIndicator {
                    target: format!("table '{}'", table),
                    candidates: many.iter().map(|t| t.catalog_path().to_string()).collect(),
                })
            }
        }
    }

    /// Tables restricted to the given names. Empty selection means all tables.
    pub fn select(&self, names: &[String]) -> Result<Vec<&TableDescriptor>, DomainError> {
        if names.is_empty() {
            return Ok(self.tables.iter().collect());
        }
        names.iter().map(|n| self.find_table(n)).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            TableDescriptor::new("cases_deaths", "grapher/covid/latest/cases_deaths/cases_deaths")
                .with_columns(["total_cases", "weekly_deaths"]),
            TableDescriptor::new("population", "garden/demography/2024/population/population")
                .with_columns(["population"]),
        ])
    }

    #[test]
    fn test_find_table_by_name_path_and_suffix() -> anyhow::Result<()> {
        let catalog = catalog();
        assert_eq!(catalog.find_table("cases_deaths")?.name, "cases_deaths");
        assert_eq!(
            catalog
                .find_table("grapher/covid/latest/cases_deaths/cases_deaths")?
                .name,
            "cases_deaths"
        );
        assert_eq!(catalog.find_table("population/population")?.name, "population");
        assert!(matches!(
            catalog.find_table("bogus"),
            Err(DomainError::UnknownTable(_))
        ));
        Ok(())
    }

    #[test]
    fn test_find_table_ambiguous_short_name() {
        let catalog = Catalog::new(vec![
            TableDescriptor::new("deaths", "garden/who/2024/mortality/deaths"),
            TableDescriptor::new("deaths", "garden/un/2024/mortality/deaths"),
        ]);
        match catalog.find_table("deaths") {
            Err(DomainError::AmbiguousIndicator { candidates, .. }) => {
                assert_eq!(candidates.len(), 2)
            }
            other => panic!("Expected AmbiguousIndicator, got {:?}", other),
        }
        assert!(catalog.find_table("garden/un/2024/mortality/deaths").is_ok());
    }

    #[test]
    fn test_catalog_yaml_accepts_column_shorthand() {
        let yaml = r#"
tables:
  - name: cases_deaths
    catalog_path: grapher/covid/latest/cases_deaths/cases_deaths
    columns:
      - total_cases
      - name: weekly_deaths_per_million
        unit: deaths per million
        dimensions:
          period: weekly
          metric: per_capita
  - name: local
    columns: [a]
"#;
        let catalog: Catalog = serde_yaml::from_str(yaml).unwrap();
        let table = &catalog.tables[0];
        assert!(table.has_column("total_cases"));
        let col = table.column("weekly_deaths_per_million").unwrap();
        assert_eq!(col.dimensions["metric"], "per_capita");
        assert_eq!(catalog.tables[1].qualify("a"), "local#a");
    }
}
