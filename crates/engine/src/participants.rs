//! The fixed set of people a ledger is kept for.

use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

/// Real participants in canonical order, plus the label of the split target.
///
/// The split target is a selection, never a stored entry name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participants {
    names: Vec<String>,
    split_label: String,
}

impl Participants {
    pub fn new<I, S>(names: I, split_label: &str) -> ResultEngine<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names
            .into_iter()
            .map(|n| n.into().trim().to_string())
            .collect();
        let split_label = split_label.trim().to_string();

        if names.len() < 2 {
            return Err(EngineError::InvalidParticipants(
                "at least two participants are required".to_string(),
            ));
        }
        if names.iter().any(String::is_empty) || split_label.is_empty() {
            return Err(EngineError::InvalidParticipants(
                "names must not be empty".to_string(),
            ));
        }
        for (idx, name) in names.iter().enumerate() {
            if names[..idx].contains(name) {
                return Err(EngineError::InvalidParticipants(format!(
                    "duplicate participant: {name}"
                )));
            }
        }
        if names.contains(&split_label) {
            return Err(EngineError::InvalidParticipants(format!(
                "split label collides with a participant: {split_label}"
            )));
        }

        Ok(Self { names, split_label })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn split_label(&self) -> &str {
        &self.split_label
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }
}
