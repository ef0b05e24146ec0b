//! Label ↔ dense id bijection produced by the ingestor.
//!
//! Persisted as a JSON object `{"label": id, ...}` written in id order, so the
//! artifact is readable by any consumer that only wants to translate ids back.

use crate::{Error, NodeId, Result, UNSET};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdMapping {
    ids: HashMap<String, NodeId>,
    labels: Vec<String>,
}

impl IdMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of `label`, assigning the next dense id on first sight.
    pub fn get_or_insert(&mut self, label: &str) -> Result<NodeId> {
        if let Some(&id) = self.ids.get(label) {
            return Ok(id);
        }
        let id = next_id(self.labels.len())?;
        self.ids.insert(label.to_owned(), id);
        self.labels.push(label.to_owned());
        Ok(id)
    }

    pub fn id(&self, label: &str) -> Option<NodeId> {
        self.ids.get(label).copied()
    }

    pub fn label(&self, id: NodeId) -> Option<&str> {
        self.labels.get(id as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Labels in id order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Rebuild from a label → id table, checking the ids are exactly `0..n`.
    pub fn from_table(table: HashMap<String, NodeId>) -> Result<Self> {
        let n = table.len();
        let mut slots: Vec<Option<String>> = vec![None; n];
        for (label, &id) in &table {
            let slot = slots.get_mut(id as usize).ok_or_else(|| {
                Error::InvalidMapping(format!("id {id} for {label:?} out of range 0..{n}"))
            })?;
            if let Some(prev) = slot.replace(label.clone()) {
                return Err(Error::InvalidMapping(format!(
                    "id {id} assigned to both {prev:?} and {label:?}"
                )));
            }
        }
        // n distinct in-range ids over n slots fills every slot.
        let labels = slots.into_iter().flatten().collect();
        Ok(Self { ids: table, labels })
    }

    pub fn write_json<W: Write>(&self, mut writer: W) -> Result<()> {
        serde_json::to_writer(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    pub fn read_json<R: Read>(reader: R) -> Result<Self> {
        let table: HashMap<String, NodeId> = serde_json::from_reader(reader)?;
        Self::from_table(table)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.write_json(BufWriter::new(File::create(path)?))?;
        debug!(path = %path.display(), labels = self.len(), "mapping.save");
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::read_json(BufReader::new(File::open(path)?))
    }
}

/// Dense id for the `len`-th label; [`UNSET`] is reserved for walk padding.
fn next_id(len: usize) -> Result<NodeId> {
    NodeId::try_from(len)
        .ok()
        .filter(|&id| id < UNSET)
        .ok_or_else(|| Error::InvalidMapping(format!("more than {UNSET} distinct labels")))
}

impl Serialize for IdMapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.labels.len()))?;
        for (id, label) in self.labels.iter().enumerate() {
            map.serialize_entry(label, &id)?;
        }
        map.end()
    }
}
