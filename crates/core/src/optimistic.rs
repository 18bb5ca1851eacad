//! Optimistic list updates for newly created records.
//!
//! A create form inserts a placeholder row immediately; once the server
//! answers, the placeholder is either replaced by the saved record or rolled
//! back with an error message.

use uuid::Uuid;

use crate::error::CoreError;

/// A row in an optimistic list.
#[derive(Debug, Clone, PartialEq)]
pub enum ListEntry<T, D> {
    /// A record the server has confirmed.
    Saved(T),
    /// A submitted draft awaiting the server's answer.
    Pending { temp_id: Uuid, draft: D },
}

impl<T, D> ListEntry<T, D> {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }

    pub fn saved(&self) -> Option<&T> {
        match self {
            Self::Saved(record) => Some(record),
            Self::Pending { .. } => None,
        }
    }
}

/// A list of saved records plus in-flight placeholders.
#[derive(Debug, Clone)]
pub struct OptimisticList<T, D> {
    entries: Vec<ListEntry<T, D>>,
    last_error: Option<String>,
}

impl<T, D> Default for OptimisticList<T, D> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            last_error: None,
        }
    }
}

impl<T, D> OptimisticList<T, D> {
    pub fn from_records(records: Vec<T>) -> Self {
        Self {
            entries: records.into_iter().map(ListEntry::Saved).collect(),
            last_error: None,
        }
    }

    pub fn entries(&self) -> &[ListEntry<T, D>] {
        &self.entries
    }

    pub fn saved(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().filter_map(ListEntry::saved)
    }

    pub fn pending_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_pending()).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Show a draft at the top of the list and return its temporary id.
    pub fn insert_pending(&mut self, draft: D) -> Uuid {
        let temp_id = Uuid::new_v4();
        self.entries.insert(0, ListEntry::Pending { temp_id, draft });
        self.last_error = None;
        temp_id
    }

    /// Replace a placeholder with the record the server saved.
    pub fn resolve(&mut self, temp_id: Uuid, record: T) -> Result<(), CoreError> {
        let slot = self
            .position(temp_id)
            .ok_or_else(|| CoreError::NotFound {
                entity: "pending row",
                id: temp_id.to_string(),
            })?;
        self.entries[slot] = ListEntry::Saved(record);
        Ok(())
    }

    /// Roll a placeholder back after a failed create, returning its draft so
    /// the form can be re-populated.
    pub fn reject(&mut self, temp_id: Uuid, message: impl Into<String>) -> Option<D> {
        self.last_error = Some(message.into());
        let slot = self.position(temp_id)?;
        match self.entries.remove(slot) {
            ListEntry::Pending { draft, .. } => Some(draft),
            ListEntry::Saved(_) => None,
        }
    }

    /// Swap in a freshly fetched list. Placeholders still in flight stay on
    /// top.
    pub fn replace_saved(&mut self, records: Vec<T>) {
        self.entries.retain(ListEntry::is_pending);
        self.entries
            .extend(records.into_iter().map(ListEntry::Saved));
    }

    fn position(&self, temp_id: Uuid) -> Option<usize> {
        self.entries.iter().position(|e| {
            matches!(e, ListEntry::Pending { temp_id: id, .. } if *id == temp_id)
        })
    }
}
