//! Statistic column schema, discovered at runtime from the stats endpoint.

use serde::Serialize;

/// Storage type of a statistic column. Every stat is stored as a float.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Float,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatField {
    pub name: String,
    pub kind: ColumnType,
}

/// Ordered set of statistic columns shared by every row of a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatSchema {
    fields: Vec<StatField>,
}

impl StatSchema {
    /// Build a schema from stat names, keeping first-seen order and dropping repeats.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut schema = Self::default();
        for name in names {
            schema.push(name.into());
        }
        schema
    }

    /// Add a float column unless one with that name already exists.
    /// Returns true if the column was new.
    pub fn push(&mut self, name: String) -> bool {
        if self.contains(&name) {
            return false;
        }
        self.fields.push(StatField {
            name,
            kind: ColumnType::Float,
        });
        true
    }

    /// Append every column of `other` not already present.
    pub fn union(&mut self, other: &StatSchema) {
        for field in &other.fields {
            self.push(field.name.clone());
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn fields(&self) -> &[StatField] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
