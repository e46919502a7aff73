use crate::date_key::DateKey;
use crate::errors::ImportError;
use crate::storage::{json_kind, Backend};
use crate::store::{decode_mood, decode_note, EntryStore, Moods, Notes};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportFormat {
    /// `{ "moods": {...}, "notes": {...} }`
    Current,
    /// A bare `{ "<DateKey>": "<MoodGrade>" }` object.
    Legacy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportOutcome {
    pub format: ImportFormat,
    pub moods: usize,
    pub notes: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportSnapshot<'a> {
    pub moods: &'a Moods,
    pub notes: &'a Notes,
}

/// Everything validated up front so a rejected payload touches nothing.
struct Staged {
    format: ImportFormat,
    moods: Moods,
    notes: Vec<(DateKey, Option<String>)>,
}

/// Merges an exported snapshot into `store`: imported keys overwrite, all
/// other keys are kept. Both records are persisted afterwards.
///
/// A blank imported note removes the note at that key, matching `set_note`.
pub fn reconcile<B: Backend>(
    store: &mut EntryStore<B>,
    payload: &[u8],
) -> Result<ImportOutcome, ImportError> {
    let staged = stage(payload)?;
    let outcome = ImportOutcome {
        format: staged.format,
        moods: staged.moods.len(),
        notes: staged.notes.len(),
    };

    store.merge(staged.moods, staged.notes);
    info!(
        format = ?outcome.format,
        moods = outcome.moods,
        notes = outcome.notes,
        "import merged"
    );
    Ok(outcome)
}

pub fn export_snapshot<B: Backend>(store: &EntryStore<B>) -> ExportSnapshot<'_> {
    ExportSnapshot {
        moods: store.moods(),
        notes: store.notes(),
    }
}

pub fn export_json<B: Backend>(store: &EntryStore<B>) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec_pretty(&export_snapshot(store))
}

pub fn export_file_name(today: NaiveDate) -> String {
    format!("mood-tracker-{}.json", today.format("%Y-%m-%d"))
}

fn stage(payload: &[u8]) -> Result<Staged, ImportError> {
    let root = match serde_json::from_slice::<Value>(payload)? {
        Value::Object(root) => root,
        other => {
            return Err(ImportError::Validation(format!(
                "expected a JSON object, found {}",
                json_kind(&other)
            )));
        }
    };

    let moods = match root.get("moods") {
        None => {
            return Ok(Staged {
                format: ImportFormat::Legacy,
                moods: stage_moods(&root)?,
                notes: Vec::new(),
            });
        }
        Some(Value::Object(moods)) => stage_moods(moods)?,
        Some(other) => {
            return Err(ImportError::Validation(format!(
                "`moods` must be an object, found {}",
                json_kind(other)
            )));
        }
    };
    let notes = match root.get("notes") {
        Some(Value::Object(notes)) => stage_notes(notes)?,
        None | Some(Value::Null) => Vec::new(),
        Some(other) => {
            return Err(ImportError::Validation(format!(
                "`notes` must be an object, found {}",
                json_kind(other)
            )));
        }
    };

    Ok(Staged {
        format: ImportFormat::Current,
        moods,
        notes,
    })
}

fn stage_moods(entries: &Map<String, Value>) -> Result<Moods, ImportError> {
    entries
        .iter()
        .map(|(key, value)| decode_mood(key, value).map_err(ImportError::Validation))
        .collect()
}

fn stage_notes(
    entries: &Map<String, Value>,
) -> Result<Vec<(DateKey, Option<String>)>, ImportError> {
    entries
        .iter()
        .map(|(key, value)| decode_note(key, value).map_err(ImportError::Validation))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mood::MoodGrade;
    use crate::storage::{MemoryBackend, Record};

    fn key(raw: &str) -> DateKey {
        raw.parse().unwrap()
    }

    fn seeded() -> EntryStore<MemoryBackend> {
        let mut store = EntryStore::load(MemoryBackend::new());
        store.set_mood(key("2024-01-01"), Some(MoodGrade::F));
        store.set_mood(key("2024-01-02"), Some(MoodGrade::A));
        store.set_note(key("2024-01-02"), "existing");
        store
    }

    fn snapshot(store: &EntryStore<MemoryBackend>) -> (Vec<u8>, Vec<u8>) {
        (
            store.backend().get(Record::Moods).unwrap().to_vec(),
            store.backend().get(Record::Notes).unwrap().to_vec(),
        )
    }

    #[test]
    fn legacy_payload_overwrites_only_matching_keys() {
        let mut store = seeded();
        let outcome = reconcile(&mut store, br#"{"2024-01-01":"B"}"#).unwrap();

        assert_eq!(outcome.format, ImportFormat::Legacy);
        assert_eq!(outcome.moods, 1);
        assert_eq!(store.get_mood(key("2024-01-01")), Some(MoodGrade::B));
        assert_eq!(store.get_mood(key("2024-01-02")), Some(MoodGrade::A));
        assert_eq!(store.notes().len(), 1);
        assert_eq!(store.get_note(key("2024-01-02")), Some("existing"));
    }

    #[test]
    fn current_payload_merges_moods_and_notes() {
        let mut store = seeded();
        let payload = br#"{
            "moods": {"2024-01-03": "A+"},
            "notes": {"2024-01-02": "  replaced  ", "2024-01-05": "new"}
        }"#;
        let outcome = reconcile(&mut store, payload).unwrap();

        assert_eq!(outcome.format, ImportFormat::Current);
        assert_eq!(store.moods().len(), 3);
        assert_eq!(store.get_mood(key("2024-01-03")), Some(MoodGrade::APlus));
        assert_eq!(store.get_note(key("2024-01-02")), Some("replaced"));
        assert_eq!(store.get_note(key("2024-01-05")), Some("new"));

        let persisted: Value =
            serde_json::from_slice(store.backend().get(Record::Notes).unwrap()).unwrap();
        assert_eq!(persisted["2024-01-05"], "new");
    }

    #[test]
    fn current_payload_without_notes_leaves_notes_alone() {
        let mut store = seeded();
        reconcile(&mut store, br#"{"moods": {}, "notes": null}"#).unwrap();
        assert_eq!(store.get_note(key("2024-01-02")), Some("existing"));
        assert_eq!(store.moods().len(), 2);
    }

    #[test]
    fn blank_imported_note_removes_existing_note() {
        let mut store = seeded();
        reconcile(&mut store, br#"{"moods": {}, "notes": {"2024-01-02": "  "}}"#).unwrap();
        assert_eq!(store.get_note(key("2024-01-02")), None);
    }

    #[test]
    fn rejected_payloads_leave_store_untouched() {
        let payloads: [&[u8]; 8] = [
            b"not json at all",
            b"[1, 2]",
            br#""2024-01-01""#,
            br#"{"2024-01-01":"B","2024-01-02":"Q"}"#,
            br#"{"2024-1-1":"B"}"#,
            br#"{"moods": null}"#,
            br#"{"moods": {"2024-01-01": "A"}, "notes": {"2024-01-01": 42}}"#,
            br#"{"moods": {"2024-01-01": "A"}, "notes": ["x"]}"#,
        ];
        for payload in payloads {
            let mut store = seeded();
            let before_moods = store.moods().clone();
            let before_notes = store.notes().clone();
            let before_bytes = snapshot(&store);

            assert!(reconcile(&mut store, payload).is_err());
            assert_eq!(store.moods(), &before_moods);
            assert_eq!(store.notes(), &before_notes);
            assert_eq!(snapshot(&store), before_bytes);
        }
    }

    #[test]
    fn unparsable_payload_is_a_parse_error() {
        let mut store = seeded();
        assert!(matches!(
            reconcile(&mut store, b"{oops"),
            Err(ImportError::Parse(_))
        ));
        assert!(matches!(
            reconcile(&mut store, b"[]"),
            Err(ImportError::Validation(_))
        ));
    }

    #[test]
    fn export_then_import_into_empty_store_reproduces_data() {
        let source = seeded();
        let exported = export_json(&source).unwrap();

        let mut target = EntryStore::load(MemoryBackend::new());
        let outcome = reconcile(&mut target, &exported).unwrap();
        assert_eq!(outcome.format, ImportFormat::Current);
        assert_eq!(target.moods(), source.moods());
        assert_eq!(target.notes(), source.notes());
    }

    #[test]
    fn export_file_name_uses_date() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 3).unwrap();
        assert_eq!(export_file_name(today), "mood-tracker-2024-05-03.json");
    }
}
