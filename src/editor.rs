use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::{Context, Result, bail};
use serde_json::{Map, Value};
use tempfile::Builder;

use crate::dao::Dao;

/// How the pipeline decides whether the editor actually changed anything.
/// `RawText` compares bytes against the drafted text; `Semantic` compares
/// the parsed documents, so formatting-only edits count as unchanged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChangeDetection {
    #[default]
    RawText,
    Semantic,
}

/// Terminal state of one edit session.
#[derive(Clone, Debug, PartialEq)]
pub enum EditOutcome {
    /// The parsed document was handed to the Dao.
    Committed { id: Value },
    /// Editor output matched the draft; nothing was written.
    Unchanged,
    /// Editor failed or produced invalid output; original left untouched.
    Rejected(String),
}

/// Blocking foreign-call boundary around the external editor. The caller
/// suspends the terminal UI before `launch` and resumes after it returns;
/// stdin/stdout/stderr are handed to the child for the duration.
pub trait EditorLauncher {
    fn launch(&self, path: &Path) -> Result<()>;
}

/// Spawns the configured line editor against the draft file.
pub struct ExternalEditor {
    program: String,
}

impl ExternalEditor {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl EditorLauncher for ExternalEditor {
    fn launch(&self, path: &Path) -> Result<()> {
        let status = Command::new(&self.program)
            .arg(path)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .with_context(|| format!("running editor {}", self.program))?;
        if !status.success() {
            bail!("editor {} exited with {status}", self.program);
        }
        Ok(())
    }
}

enum EditorRun {
    /// Editor exited cleanly; the draft as written and the re-read content.
    Finished { draft: String, edited: String },
    /// Editor could not run or exited non-zero.
    Failed(String),
}

/// Drives one document through draft -> external editor -> validate ->
/// commit/reject. The draft lives in a uniquely named temp file that is
/// removed on every exit path.
pub struct DocEditor<'a> {
    dao: &'a dyn Dao,
    launcher: &'a dyn EditorLauncher,
    change_detection: ChangeDetection,
}

impl<'a> DocEditor<'a> {
    pub fn new(dao: &'a dyn Dao, launcher: &'a dyn EditorLauncher) -> Self {
        Self {
            dao,
            launcher,
            change_detection: ChangeDetection::default(),
        }
    }

    pub fn with_change_detection(mut self, change_detection: ChangeDetection) -> Self {
        self.change_detection = change_detection;
        self
    }

    /// Opens the editor on an empty document and inserts the result.
    pub fn insert(&self, db: &str, coll: &str) -> Result<EditOutcome> {
        self.insert_draft(db, coll, "{}")
    }

    /// Opens the editor on an existing document and updates it in place.
    /// The `_id` is the update target and is stripped from the payload.
    pub fn edit(&self, db: &str, coll: &str, raw_document: &str) -> Result<EditOutcome> {
        let run = self.round_trip(raw_document)?;
        let (draft, edited) = match run {
            EditorRun::Failed(reason) => return Ok(EditOutcome::Rejected(reason)),
            EditorRun::Finished { draft, edited } => (draft, edited),
        };

        let mut fields = match self.validate(&draft, &edited) {
            Validated::Unchanged => return Ok(EditOutcome::Unchanged),
            Validated::Invalid(reason) => return Ok(EditOutcome::Rejected(reason)),
            Validated::Document(fields) => fields,
        };
        let Some(id) = fields.remove("_id") else {
            return Ok(EditOutcome::Rejected(
                "edited document has no _id field".to_string(),
            ));
        };

        self.dao
            .update_document(db, coll, &id, Value::Object(fields))?;
        tracing::info!(db, coll, %id, "document updated");
        Ok(EditOutcome::Committed { id })
    }

    /// Insert with the `_id` removed from the drafted text before the
    /// editor opens.
    pub fn duplicate(&self, db: &str, coll: &str, raw_document: &str) -> Result<EditOutcome> {
        let mut fields = parse_document(raw_document)
            .with_context(|| "parsing document to duplicate")?;
        fields.remove("_id");
        let draft = Value::Object(fields).to_string();
        self.insert_draft(db, coll, &draft)
    }

    fn insert_draft(&self, db: &str, coll: &str, draft: &str) -> Result<EditOutcome> {
        let run = self.round_trip(draft)?;
        let (draft, edited) = match run {
            EditorRun::Failed(reason) => return Ok(EditOutcome::Rejected(reason)),
            EditorRun::Finished { draft, edited } => (draft, edited),
        };

        let mut fields = match self.validate(&draft, &edited) {
            Validated::Unchanged => return Ok(EditOutcome::Unchanged),
            Validated::Invalid(reason) => return Ok(EditOutcome::Rejected(reason)),
            Validated::Document(fields) => fields,
        };
        fields.remove("_id");

        let id = self.dao.insert_document(db, coll, Value::Object(fields))?;
        tracing::info!(db, coll, %id, "document inserted");
        Ok(EditOutcome::Committed { id })
    }

    /// Drafting and AwaitingEditor. The temp file is dropped (and so
    /// deleted) before this function returns, commit or not.
    fn round_trip(&self, draft: &str) -> Result<EditorRun> {
        let value: Value =
            serde_json::from_str(draft).with_context(|| "drafted document is not valid JSON")?;
        let pretty = format!("{}\n", serde_json::to_string_pretty(&value)?);

        let mut tmp = Builder::new()
            .prefix("doc-")
            .suffix(".json")
            .tempfile()
            .context("creating draft file")?;
        tmp.write_all(pretty.as_bytes())
            .context("writing draft file")?;
        tmp.flush().context("flushing draft file")?;
        tracing::debug!(path = %tmp.path().display(), "draft written, awaiting editor");

        let run = match self.launcher.launch(tmp.path()) {
            Ok(()) => {
                let edited =
                    fs::read_to_string(tmp.path()).context("reading edited draft")?;
                EditorRun::Finished {
                    draft: pretty,
                    edited,
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "editor run failed");
                EditorRun::Failed(err.to_string())
            }
        };
        Ok(run)
    }

    fn validate(&self, draft: &str, edited: &str) -> Validated {
        match self.change_detection {
            ChangeDetection::RawText => {
                if edited == draft {
                    return Validated::Unchanged;
                }
                match parse_document(edited) {
                    Ok(fields) => Validated::Document(fields),
                    Err(err) => Validated::Invalid(err.to_string()),
                }
            }
            ChangeDetection::Semantic => {
                let fields = match parse_document(edited) {
                    Ok(fields) => fields,
                    Err(err) => return Validated::Invalid(err.to_string()),
                };
                let drafted: Value = serde_json::from_str(draft).unwrap_or(Value::Null);
                if drafted == Value::Object(fields.clone()) {
                    return Validated::Unchanged;
                }
                Validated::Document(fields)
            }
        }
    }
}

enum Validated {
    Unchanged,
    Document(Map<String, Value>),
    Invalid(String),
}

fn parse_document(raw: &str) -> Result<Map<String, Value>> {
    let value: Value =
        serde_json::from_str(raw).with_context(|| "edited document is not valid JSON")?;
    match value {
        Value::Object(fields) => Ok(fields),
        other => bail!("edited document must be a JSON object, got {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browse::CollectionState;
    use crate::dao::MemoryDao;
    use serde_json::json;
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// Test double standing in for the external process: records the draft
    /// path and rewrites the file through a closure.
    struct ScriptedEditor<F: Fn(&Path) -> Result<()>> {
        script: F,
        seen_path: Mutex<Option<PathBuf>>,
    }

    impl<F: Fn(&Path) -> Result<()>> ScriptedEditor<F> {
        fn new(script: F) -> Self {
            Self {
                script,
                seen_path: Mutex::new(None),
            }
        }

        fn draft_path(&self) -> PathBuf {
            self.seen_path.lock().unwrap().clone().expect("editor never ran")
        }
    }

    impl<F: Fn(&Path) -> Result<()>> EditorLauncher for ScriptedEditor<F> {
        fn launch(&self, path: &Path) -> Result<()> {
            *self.seen_path.lock().unwrap() = Some(path.to_path_buf());
            (self.script)(path)
        }
    }

    fn seeded_dao() -> (MemoryDao, Value, String) {
        let dao = MemoryDao::new();
        dao.add_collection("shop", "products").unwrap();
        let id = dao
            .insert_document("shop", "products", json!({ "name": "mouse", "price": 19 }))
            .unwrap();
        let raw = dao
            .get_document("shop", "products", &id)
            .unwrap()
            .to_string();
        (dao, id, raw)
    }

    fn count(dao: &MemoryDao) -> u64 {
        let state = CollectionState::new("shop", "products");
        dao.list_documents(&state).unwrap().1
    }

    #[test]
    fn test_untouched_draft_is_unchanged_and_writes_nothing() {
        let (dao, _id, raw) = seeded_dao();
        let editor = ScriptedEditor::new(|_| Ok(()));
        let outcome = DocEditor::new(&dao, &editor)
            .edit("shop", "products", &raw)
            .unwrap();

        assert_eq!(outcome, EditOutcome::Unchanged);
        assert_eq!(count(&dao), 1);
        assert!(!editor.draft_path().exists());
    }

    #[test]
    fn test_edit_commits_and_strips_id_from_payload() {
        let (dao, id, raw) = seeded_dao();
        let expected_id = id.clone();
        let editor = ScriptedEditor::new(move |path| {
            let contents = json!({ "_id": expected_id, "name": "mouse", "price": 25 });
            fs::write(path, serde_json::to_string_pretty(&contents)?)?;
            Ok(())
        });

        let outcome = DocEditor::new(&dao, &editor)
            .edit("shop", "products", &raw)
            .unwrap();
        assert_eq!(outcome, EditOutcome::Committed { id: id.clone() });

        let updated = dao.get_document("shop", "products", &id).unwrap();
        assert_eq!(updated["price"], 25);
        assert_eq!(updated["_id"], id);
        assert!(!editor.draft_path().exists());
    }

    #[test]
    fn test_edit_without_id_is_rejected() {
        let (dao, id, raw) = seeded_dao();
        let editor = ScriptedEditor::new(|path| {
            fs::write(path, r#"{ "name": "mouse", "price": 25 }"#)?;
            Ok(())
        });

        let outcome = DocEditor::new(&dao, &editor)
            .edit("shop", "products", &raw)
            .unwrap();
        assert!(matches!(outcome, EditOutcome::Rejected(reason) if reason.contains("_id")));
        // Original untouched.
        assert_eq!(
            dao.get_document("shop", "products", &id).unwrap()["price"],
            19
        );
    }

    #[test]
    fn test_invalid_output_is_rejected_and_cleaned_up() {
        let (dao, id, raw) = seeded_dao();
        let editor = ScriptedEditor::new(|path| {
            fs::write(path, "{ not json")?;
            Ok(())
        });

        let outcome = DocEditor::new(&dao, &editor)
            .edit("shop", "products", &raw)
            .unwrap();
        assert!(matches!(outcome, EditOutcome::Rejected(_)));
        assert_eq!(
            dao.get_document("shop", "products", &id).unwrap()["price"],
            19
        );
        assert!(!editor.draft_path().exists());
    }

    #[test]
    fn test_editor_failure_is_rejected_not_fatal() {
        let (dao, _id, raw) = seeded_dao();
        let editor = ScriptedEditor::new(|_| bail!("editor crashed"));

        let outcome = DocEditor::new(&dao, &editor)
            .edit("shop", "products", &raw)
            .unwrap();
        assert!(matches!(outcome, EditOutcome::Rejected(reason) if reason.contains("crashed")));
        assert_eq!(count(&dao), 1);
        assert!(!editor.draft_path().exists());
    }

    #[test]
    fn test_insert_strips_id_and_commits() {
        let (dao, _id, _raw) = seeded_dao();
        let editor = ScriptedEditor::new(|path| {
            fs::write(path, r#"{ "_id": "chosen", "name": "cable", "price": 5 }"#)?;
            Ok(())
        });

        let outcome = DocEditor::new(&dao, &editor)
            .insert("shop", "products")
            .unwrap();
        let EditOutcome::Committed { id } = outcome else {
            panic!("expected commit");
        };
        // The id came from the Dao, not from the edited text.
        assert_ne!(id, json!("chosen"));
        assert_eq!(count(&dao), 2);
    }

    #[test]
    fn test_insert_left_empty_is_unchanged() {
        let (dao, _id, _raw) = seeded_dao();
        let editor = ScriptedEditor::new(|_| Ok(()));
        let outcome = DocEditor::new(&dao, &editor)
            .insert("shop", "products")
            .unwrap();
        assert_eq!(outcome, EditOutcome::Unchanged);
        assert_eq!(count(&dao), 1);
    }

    #[test]
    fn test_duplicate_drops_id_before_drafting() {
        let (dao, id, raw) = seeded_dao();
        let editor = ScriptedEditor::new(|path| {
            // Simulate the user tweaking the duplicated document.
            let mut fields: Value = serde_json::from_str(&fs::read_to_string(path)?)?;
            assert!(fields.get("_id").is_none(), "draft must not carry _id");
            fields["name"] = json!("mouse copy");
            fs::write(path, serde_json::to_string_pretty(&fields)?)?;
            Ok(())
        });

        let outcome = DocEditor::new(&dao, &editor)
            .duplicate("shop", "products", &raw)
            .unwrap();
        let EditOutcome::Committed { id: new_id } = outcome else {
            panic!("expected commit");
        };
        assert_ne!(new_id, id);
        assert_eq!(count(&dao), 2);
    }

    #[test]
    fn test_whitespace_only_edit_raw_text_counts_as_changed() {
        let (dao, id, raw) = seeded_dao();
        let editor = ScriptedEditor::new(|path| {
            // Re-serialize compactly: same document, different bytes.
            let value: Value = serde_json::from_str(&fs::read_to_string(path)?)?;
            fs::write(path, value.to_string())?;
            Ok(())
        });

        let outcome = DocEditor::new(&dao, &editor)
            .edit("shop", "products", &raw)
            .unwrap();
        assert_eq!(outcome, EditOutcome::Committed { id });
    }

    #[test]
    fn test_whitespace_only_edit_semantic_counts_as_unchanged() {
        let (dao, _id, raw) = seeded_dao();
        let editor = ScriptedEditor::new(|path| {
            let value: Value = serde_json::from_str(&fs::read_to_string(path)?)?;
            fs::write(path, value.to_string())?;
            Ok(())
        });

        let outcome = DocEditor::new(&dao, &editor)
            .with_change_detection(ChangeDetection::Semantic)
            .edit("shop", "products", &raw)
            .unwrap();
        assert_eq!(outcome, EditOutcome::Unchanged);
    }
}
