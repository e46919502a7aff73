use crate::date_key::DateKey;
use crate::mood::MoodGrade;
use crate::storage::{json_kind, load_object, persist_object, Backend, Record};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, error, warn};

pub type Moods = BTreeMap<DateKey, MoodGrade>;
pub type Notes = BTreeMap<DateKey, String>;

/// Sole owner of the mood and note mappings.
///
/// Every mutation updates memory first and then writes the affected record
/// through to the backend. Write failures are logged and otherwise ignored.
#[derive(Debug)]
pub struct EntryStore<B> {
    backend: B,
    moods: Moods,
    notes: Notes,
}

impl<B: Backend> EntryStore<B> {
    /// Loads both records. Anything unreadable comes back as an empty mapping.
    pub fn load(backend: B) -> Self {
        let mut store = Self {
            backend,
            moods: Moods::new(),
            notes: Notes::new(),
        };
        store.reload();
        store
    }

    pub fn reload(&mut self) {
        self.moods = load_moods(&mut self.backend);
        self.notes = load_notes(&mut self.backend);
        debug!(
            moods = self.moods.len(),
            notes = self.notes.len(),
            "entry store loaded"
        );
    }

    pub fn get_mood(&self, key: DateKey) -> Option<MoodGrade> {
        self.moods.get(&key).copied()
    }

    /// Sets the mood unconditionally; `None` clears it.
    pub fn set_mood(&mut self, key: DateKey, grade: Option<MoodGrade>) {
        match grade {
            Some(grade) => {
                self.moods.insert(key, grade);
            }
            None => {
                self.moods.remove(&key);
            }
        }
        debug!(%key, grade = ?grade, "mood set");
        self.persist_moods();
    }

    pub fn clear_mood(&mut self, key: DateKey) {
        self.set_mood(key, None);
    }

    /// Selecting the grade already recorded for `key` clears it; any other
    /// grade replaces it. Returns the resulting state.
    pub fn toggle_mood(&mut self, key: DateKey, grade: MoodGrade) -> Option<MoodGrade> {
        let next = if self.get_mood(key) == Some(grade) {
            None
        } else {
            Some(grade)
        };
        self.set_mood(key, next);
        next
    }

    pub fn get_note(&self, key: DateKey) -> Option<&str> {
        self.notes.get(&key).map(String::as_str)
    }

    /// Stores the trimmed text, or deletes the note when nothing is left.
    pub fn set_note(&mut self, key: DateKey, text: &str) -> Option<&str> {
        match normalize_note(text) {
            Some(note) => {
                self.notes.insert(key, note);
            }
            None => {
                self.notes.remove(&key);
            }
        }
        debug!(%key, "note set");
        self.persist_notes();
        self.get_note(key)
    }

    pub fn has_note(&self, key: DateKey) -> bool {
        self.notes.contains_key(&key)
    }

    pub fn moods(&self) -> &Moods {
        &self.moods
    }

    pub fn notes(&self) -> &Notes {
        &self.notes
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn persist(&mut self) {
        self.persist_moods();
        self.persist_notes();
    }

    /// Overwrites matching keys and keeps the rest, then persists both records.
    pub(crate) fn merge(&mut self, moods: Moods, notes: Vec<(DateKey, Option<String>)>) {
        self.moods.extend(moods);
        for (key, note) in notes {
            match note {
                Some(note) => {
                    self.notes.insert(key, note);
                }
                None => {
                    self.notes.remove(&key);
                }
            }
        }
        self.persist();
    }

    fn persist_moods(&mut self) {
        if let Err(err) = persist_object(&mut self.backend, Record::Moods, &self.moods) {
            error!("{err}");
        }
    }

    fn persist_notes(&mut self) {
        if let Err(err) = persist_object(&mut self.backend, Record::Notes, &self.notes) {
            error!("{err}");
        }
    }
}

pub fn normalize_note(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

pub(crate) fn decode_mood(key: &str, value: &Value) -> Result<(DateKey, MoodGrade), String> {
    let date_key = key.parse::<DateKey>().map_err(|err| err.to_string())?;
    let grade = value
        .as_str()
        .and_then(MoodGrade::parse)
        .ok_or_else(|| match value {
            Value::String(raw) => format!("unknown mood grade `{raw}` for {key}"),
            other => format!("mood for {key} must be a string, found {}", json_kind(other)),
        })?;
    Ok((date_key, grade))
}

/// Returns the normalized note; `None` means the entry is blank.
pub(crate) fn decode_note(key: &str, value: &Value) -> Result<(DateKey, Option<String>), String> {
    let date_key = key.parse::<DateKey>().map_err(|err| err.to_string())?;
    let Value::String(text) = value else {
        return Err(format!(
            "note for {key} must be a string, found {}",
            json_kind(value)
        ));
    };
    Ok((date_key, normalize_note(text)))
}

fn load_moods<B: Backend + ?Sized>(backend: &mut B) -> Moods {
    load_object(backend, Record::Moods)
        .iter()
        .filter_map(|(key, value)| match decode_mood(key, value) {
            Ok(entry) => Some(entry),
            Err(reason) => {
                warn!("skipping stored mood: {reason}");
                None
            }
        })
        .collect()
}

fn load_notes<B: Backend + ?Sized>(backend: &mut B) -> Notes {
    load_object(backend, Record::Notes)
        .iter()
        .filter_map(|(key, value)| match decode_note(key, value) {
            Ok((key, Some(note))) => Some((key, note)),
            Ok((key, None)) => {
                warn!("skipping blank stored note for {key}");
                None
            }
            Err(reason) => {
                warn!("skipping stored note: {reason}");
                None
            }
        })
        .collect()
}
