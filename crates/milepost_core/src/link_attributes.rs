use std::collections::BTreeSet;

use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::{error::GraphLoadError, network::LinkRecord};

/// One value per link, in forward-star order. Links lacking the attribute hold NaN,
/// and an explicit NaN value counts as missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct AttributeColumn {
    name: String,
    values: Vec<f64>,
    first_missing: Option<usize>,
}

impl AttributeColumn {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Position of the first link without a value for this attribute.
    pub fn first_missing(&self) -> Option<usize> {
        self.first_missing
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct LinkAttributes {
    columns: Vec<AttributeColumn>,
    by_name: FxHashMap<String, usize>,
}

impl LinkAttributes {
    pub fn from_records(records: &[&LinkRecord]) -> Self {
        let names: BTreeSet<&str> = records
            .iter()
            .flat_map(|record| record.attributes.keys().map(String::as_str))
            .collect();

        let mut columns = Vec::with_capacity(names.len());
        let mut by_name = FxHashMap::default();

        for name in names {
            let mut first_missing = None;
            let values: Vec<f64> = records
                .iter()
                .enumerate()
                .map(|(position, record)| match record.attribute(name) {
                    Some(value) if !value.is_nan() => value,
                    _ => {
                        first_missing.get_or_insert(position);
                        f64::NAN
                    }
                })
                .collect();

            by_name.insert(name.to_string(), columns.len());
            columns.push(AttributeColumn {
                name: name.to_string(),
                values,
                first_missing,
            });
        }

        LinkAttributes { columns, by_name }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn column(&self, index: usize) -> &AttributeColumn {
        &self.columns[index]
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(AttributeColumn::name)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Checks that every column holds `link_count` values and agrees with the name index.
    pub fn validate(&self, link_count: usize) -> Result<(), GraphLoadError> {
        if self.by_name.len() != self.columns.len() {
            return Err(GraphLoadError::Corrupted("attribute index size"));
        }

        for (index, column) in self.columns.iter().enumerate() {
            if self.by_name.get(&column.name) != Some(&index) {
                return Err(GraphLoadError::Corrupted("attribute index entry"));
            }
            if column.values.len() != link_count {
                return Err(GraphLoadError::Corrupted("attribute column length"));
            }
            if column.values.iter().position(|value| value.is_nan()) != column.first_missing {
                return Err(GraphLoadError::Corrupted("attribute missing value marker"));
            }
        }

        Ok(())
    }
}
