//! Accumulates, per structural signature, the union of property names seen
//! across both documents in a diff call, and flattens a node's raw
//! properties into a schema-aligned vector.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::bigram::Bigram;
use crate::counter::Counter;

/// One structural position class: a dotted signature plus the union of
/// property names observed there, across either document.
#[derive(Debug, Clone)]
pub struct Schema {
    pub id: i64,
    pub signature: String,
    property_names: BTreeSet<String>,
}

/// Shared between the two documents being compared so that matching
/// structural signatures resolve to identical schema ids.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    signature_to_id: HashMap<String, usize>,
    schemas: Vec<Schema>,
    ids: Counter,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of distinct signatures registered so far. Also the
    /// exclusive upper bound of valid schema ids.
    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }

    /// Create the schema on first sight of `signature` (allocating a fresh
    /// id), then union `names` into its property-name set.
    pub fn add_property_names<I>(&mut self, signature: &str, names: I)
    where
        I: IntoIterator<Item = String>,
    {
        let idx = match self.signature_to_id.get(signature) {
            Some(&idx) => idx,
            None => {
                let id = self.ids.next();
                self.signature_to_id.insert(signature.to_string(), idx_for(id));
                self.schemas.push(Schema {
                    id: id as i64,
                    signature: signature.to_string(),
                    property_names: BTreeSet::new(),
                });
                idx_for(id)
            }
        };
        self.schemas[idx].property_names.extend(names);
    }

    /// Flatten `properties` against the accumulated schema for `signature`,
    /// in the schema's stable (alphabetical) property-name order. Missing
    /// properties become the empty [`Bigram`]. Returns `(-1, [])` if
    /// `signature` was never registered — callers always register both
    /// documents' signatures before formatting either.
    pub fn format(
        &self,
        signature: &str,
        properties: &BTreeMap<String, Bigram>,
    ) -> (i64, Vec<Bigram>) {
        let Some(&idx) = self.signature_to_id.get(signature) else {
            return (-1, Vec::new());
        };
        let schema = &self.schemas[idx];
        let vector = schema
            .property_names
            .iter()
            .map(|name| properties.get(name).cloned().unwrap_or_default())
            .collect();
        (schema.id, vector)
    }

    pub fn schema(&self, id: i64) -> Option<&Schema> {
        if id < 0 {
            return None;
        }
        self.schemas.get(id as usize)
    }
}

/// Schema ids are dispensed densely from 0, so the id doubles as its own
/// index into `schemas`.
fn idx_for(id: usize) -> usize {
    id
}
