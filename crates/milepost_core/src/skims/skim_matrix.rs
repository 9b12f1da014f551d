use std::fmt;

use serde::Serialize;

use crate::types::{Cost, NodeId};

/// Cost and skim totals of the least-cost path between one origin and one destination.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SkimEntry {
    pub cost: Cost,
    pub skims: Vec<f64>,
}

/// Origin by destination table of [`SkimEntry`], `None` where no path exists.
#[derive(Clone, Debug, Serialize)]
pub struct SkimMatrix {
    cost_field: String,
    skim_fields: Vec<String>,
    origins: Vec<NodeId>,
    destinations: Vec<NodeId>,
    entries: Vec<Vec<Option<SkimEntry>>>,
}

impl SkimMatrix {
    pub(crate) fn new(
        cost_field: &str,
        skim_fields: &[String],
        origins: &[NodeId],
        destinations: &[NodeId],
        entries: Vec<Vec<Option<SkimEntry>>>,
    ) -> Self {
        SkimMatrix {
            cost_field: cost_field.to_string(),
            skim_fields: skim_fields.to_vec(),
            origins: origins.to_vec(),
            destinations: destinations.to_vec(),
            entries,
        }
    }

    pub fn cost_field(&self) -> &str {
        &self.cost_field
    }

    pub fn skim_fields(&self) -> &[String] {
        &self.skim_fields
    }

    pub fn origins(&self) -> &[NodeId] {
        &self.origins
    }

    pub fn destinations(&self) -> &[NodeId] {
        &self.destinations
    }

    /// Entry at the given origin and destination positions, `None` when
    /// unreachable or out of range.
    pub fn entry(&self, origin_index: usize, destination_index: usize) -> Option<&SkimEntry> {
        self.entries
            .get(origin_index)?
            .get(destination_index)?
            .as_ref()
    }

    pub fn cost(&self, origin_index: usize, destination_index: usize) -> Option<Cost> {
        self.entry(origin_index, destination_index)
            .map(|entry| entry.cost)
    }

    pub fn skim(&self, origin_index: usize, destination_index: usize, field: &str) -> Option<f64> {
        let skim = self.skim_fields.iter().position(|name| name == field)?;
        self.entry(origin_index, destination_index)?
            .skims
            .get(skim)
            .copied()
    }

    /// Looks an entry up by node ids, using the first occurrence of each id.
    pub fn get(&self, origin: NodeId, destination: NodeId) -> Option<&SkimEntry> {
        let origin_index = self.origins.iter().position(|&node| node == origin)?;
        let destination_index = self
            .destinations
            .iter()
            .position(|&node| node == destination)?;
        self.entry(origin_index, destination_index)
    }

    pub fn reachable_pairs(&self) -> usize {
        self.entries
            .iter()
            .map(|row| row.iter().filter(|entry| entry.is_some()).count())
            .sum()
    }
}

impl fmt::Display for SkimMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (origin, row) in self.origins.iter().zip(&self.entries) {
            write!(f, "{origin}:")?;
            for entry in row {
                match entry {
                    Some(entry) => write!(f, " {}", entry.cost)?,
                    None => write!(f, " -")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
