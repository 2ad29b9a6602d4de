use crate::model::{
    BoardSettings, Note, NoteColor, NoteIcon, NoteId, Position, StoreError,
    BOARD_DESCRIPTION_MAX, BOARD_TITLE_MAX, NOTE_TITLE_MAX,
};
use chrono::Utc;
use directories::ProjectDirs;
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// One field of a note, carrying its new value. Every write through the
/// store touches exactly one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteField {
    Title(String),
    Text(String),
    Icon(NoteIcon),
    Position(Position),
}

impl NoteField {
    pub fn name(&self) -> &'static str {
        match self {
            NoteField::Title(_) => "title",
            NoteField::Text(_) => "text",
            NoteField::Icon(_) => "icon",
            NoteField::Position(_) => "position",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardField {
    Title(String),
    Description(String),
    CanvasColor(crate::model::CanvasColor),
}

impl BoardField {
    pub fn name(&self) -> &'static str {
        match self {
            BoardField::Title(_) => "title",
            BoardField::Description(_) => "description",
            BoardField::CanvasColor(_) => "canvas_color",
        }
    }
}

/// On-disk shape of one owner's board: the settings record plus the note
/// map, serialized as a single YAML document.
#[derive(Debug, Serialize, Deserialize)]
struct BoardFile {
    settings: BoardSettings,
    notes: HashMap<NoteId, Note>,
}

impl BoardFile {
    fn default_for(owner: &str) -> Self {
        BoardFile {
            settings: BoardSettings::default_for(owner),
            notes: HashMap::new(),
        }
    }
}

/// Canonical store for notes and board settings, one YAML file per owner.
/// Writes are synchronous: each call fully applies (and is durable) or
/// fails, so per-note write ordering follows call order.
#[derive(Debug, Clone)]
pub struct Store {
    root: PathBuf,
}

impl Store {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Store { root: root.into() }
    }

    pub fn open_default() -> Result<Self, StoreError> {
        let dirs = ProjectDirs::from("", "", "corkboard")
            .ok_or_else(|| StoreError::Storage("could not locate data directory".to_string()))?;
        Ok(Store::new(dirs.data_dir()))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the owner's board settings, creating and persisting the
    /// defaults if no board exists yet.
    pub fn load_board(&self, owner: &str) -> Result<BoardSettings, StoreError> {
        Ok(self.load_or_init(owner)?.settings)
    }

    /// All notes for the owner, in no particular order.
    pub fn load_notes(&self, owner: &str) -> Result<Vec<Note>, StoreError> {
        let file = self.load_or_init(owner)?;
        Ok(file.notes.into_values().collect())
    }

    pub fn create_note(
        &self,
        owner: &str,
        position: Position,
        color: NoteColor,
    ) -> Result<Note, StoreError> {
        let mut file = self.load_or_init(owner)?;
        let mut id = generate_id();
        while file.notes.contains_key(&id) {
            id = generate_id();
        }
        let note = Note::new(id.clone(), owner, position, color);
        file.notes.insert(id, note.clone());
        self.save(owner, &file)?;
        Ok(note)
    }

    /// Updates exactly one field of one note. A note id owned by someone
    /// else is indistinguishable from a nonexistent one.
    pub fn update_note_field(
        &self,
        owner: &str,
        note_id: &str,
        field: NoteField,
    ) -> Result<(), StoreError> {
        validate_note_field(&field)?;
        let mut file = self.load_or_init(owner)?;
        let note = file
            .notes
            .get_mut(note_id)
            .ok_or_else(|| StoreError::NoteNotFound(note_id.to_string()))?;
        match field {
            NoteField::Title(title) => note.title = title,
            NoteField::Text(text) => note.text = text,
            NoteField::Icon(icon) => note.icon = icon,
            NoteField::Position(position) => note.position = position,
        }
        note.updated_at = Utc::now();
        self.save(owner, &file)
    }

    /// Idempotent: deleting a note that is already gone is not an error.
    pub fn delete_note(&self, owner: &str, note_id: &str) -> Result<(), StoreError> {
        let mut file = self.load_or_init(owner)?;
        if file.notes.remove(note_id).is_some() {
            self.save(owner, &file)?;
        }
        Ok(())
    }

    /// Deletes every note the owner has; returns how many were removed.
    pub fn clear_all_notes(&self, owner: &str) -> Result<usize, StoreError> {
        let mut file = self.load_or_init(owner)?;
        let count = file.notes.len();
        if count > 0 {
            file.notes.clear();
            self.save(owner, &file)?;
        }
        Ok(count)
    }

    /// Upserts one board setting, creating the settings record if absent.
    pub fn update_board_setting(&self, owner: &str, field: BoardField) -> Result<(), StoreError> {
        validate_board_field(&field)?;
        let mut file = self.load_or_init(owner)?;
        match field {
            BoardField::Title(title) => file.settings.title = title,
            BoardField::Description(description) => file.settings.description = description,
            BoardField::CanvasColor(color) => file.settings.canvas_color = color,
        }
        file.settings.updated_at = Utc::now();
        self.save(owner, &file)
    }

    fn load_or_init(&self, owner: &str) -> Result<BoardFile, StoreError> {
        validate_owner(owner)?;
        let path = self.board_path(owner);
        if path.exists() {
            let data = fs::read_to_string(&path)?;
            Ok(serde_yaml::from_str(&data)?)
        } else {
            let file = BoardFile::default_for(owner);
            self.save(owner, &file)?;
            Ok(file)
        }
    }

    fn save(&self, owner: &str, file: &BoardFile) -> Result<(), StoreError> {
        let path = self.board_path(owner);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let serialized = serde_yaml::to_string(file)?;
        fs::write(&path, serialized)?;
        Ok(())
    }

    fn board_path(&self, owner: &str) -> PathBuf {
        self.root.join("boards").join(format!("{}.yml", owner))
    }
}

// Owner names become file names.
fn validate_owner(owner: &str) -> Result<(), StoreError> {
    if owner.is_empty()
        || !owner
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(StoreError::Validation {
            field: "owner",
            message: format!("owner must be [A-Za-z0-9_-]+, got {:?}", owner),
        });
    }
    Ok(())
}

fn validate_note_field(field: &NoteField) -> Result<(), StoreError> {
    if let NoteField::Title(title) = field {
        if title.chars().count() > NOTE_TITLE_MAX {
            return Err(StoreError::Validation {
                field: "title",
                message: format!("title exceeds {} characters", NOTE_TITLE_MAX),
            });
        }
    }
    Ok(())
}

fn validate_board_field(field: &BoardField) -> Result<(), StoreError> {
    match field {
        BoardField::Title(title) if title.chars().count() > BOARD_TITLE_MAX => {
            Err(StoreError::Validation {
                field: "title",
                message: format!("board title exceeds {} characters", BOARD_TITLE_MAX),
            })
        }
        BoardField::Description(description)
            if description.chars().count() > BOARD_DESCRIPTION_MAX =>
        {
            Err(StoreError::Validation {
                field: "description",
                message: format!(
                    "board description exceeds {} characters",
                    BOARD_DESCRIPTION_MAX
                ),
            })
        }
        _ => Ok(()),
    }
}

fn generate_id() -> NoteId {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CanvasColor;
    use tempfile::TempDir;

    fn store() -> (TempDir, Store) {
        let tmp = TempDir::new().unwrap();
        let store = Store::new(tmp.path());
        (tmp, store)
    }

    #[test]
    fn first_load_creates_default_board() {
        let (_tmp, store) = store();
        let settings = store.load_board("ana").unwrap();
        assert_eq!(settings.title, "Sticky Notes Board");
        assert_eq!(
            settings.description,
            "Click anywhere on the canvas to add a note"
        );
        assert_eq!(settings.canvas_color, CanvasColor::White);
        // Created atomically: the file is now on disk.
        assert!(store.root().join("boards/ana.yml").exists());
    }

    #[test]
    fn created_note_round_trips_through_load() {
        let (_tmp, store) = store();
        let note = store
            .create_note("ana", Position::new(12, 34), NoteColor::Blue)
            .unwrap();
        let notes = store.load_notes("ana").unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].id, note.id);
        assert_eq!(notes[0].position, Position::new(12, 34));
        assert_eq!(notes[0].color, NoteColor::Blue);
        assert_eq!(notes[0].icon, NoteIcon::Cupcake);
    }

    #[test]
    fn update_touches_exactly_one_field() {
        let (_tmp, store) = store();
        let note = store
            .create_note("ana", Position::default(), NoteColor::Yellow)
            .unwrap();
        store
            .update_note_field("ana", &note.id, NoteField::Title("groceries".into()))
            .unwrap();
        let notes = store.load_notes("ana").unwrap();
        assert_eq!(notes[0].title, "groceries");
        assert_eq!(notes[0].text, "");
        assert_eq!(notes[0].position, Position::default());
    }

    #[test]
    fn foreign_note_id_behaves_as_nonexistent() {
        let (_tmp, store) = store();
        let note = store
            .create_note("ana", Position::new(5, 5), NoteColor::Green)
            .unwrap();
        let err = store
            .update_note_field("ben", &note.id, NoteField::Text("sneaky".into()))
            .unwrap_err();
        assert!(matches!(err, StoreError::NoteNotFound(_)));
        // Ana's note is untouched.
        let notes = store.load_notes("ana").unwrap();
        assert_eq!(notes[0].text, "");
    }

    #[test]
    fn delete_is_idempotent() {
        let (_tmp, store) = store();
        let note = store
            .create_note("ana", Position::default(), NoteColor::Pink)
            .unwrap();
        store.delete_note("ana", &note.id).unwrap();
        store.delete_note("ana", &note.id).unwrap();
        store.delete_note("ana", "nosuch").unwrap();
        assert!(store.load_notes("ana").unwrap().is_empty());
    }

    #[test]
    fn clear_all_empties_the_board() {
        let (_tmp, store) = store();
        for _ in 0..3 {
            store
                .create_note("ana", Position::default(), NoteColor::Orange)
                .unwrap();
        }
        assert_eq!(store.clear_all_notes("ana").unwrap(), 3);
        assert!(store.load_notes("ana").unwrap().is_empty());
        // Clearing an already-empty board is fine too.
        assert_eq!(store.clear_all_notes("ana").unwrap(), 0);
    }

    #[test]
    fn board_setting_upsert_leaves_other_fields_alone() {
        let (_tmp, store) = store();
        store
            .update_board_setting("ana", BoardField::CanvasColor(CanvasColor::Blue))
            .unwrap();
        let settings = store.load_board("ana").unwrap();
        assert_eq!(settings.canvas_color, CanvasColor::Blue);
        assert_eq!(settings.title, "Sticky Notes Board");
        assert_eq!(
            settings.description,
            "Click anywhere on the canvas to add a note"
        );
    }

    #[test]
    fn overlong_titles_are_rejected() {
        let (_tmp, store) = store();
        let note = store
            .create_note("ana", Position::default(), NoteColor::Yellow)
            .unwrap();
        let err = store
            .update_note_field("ana", &note.id, NoteField::Title("x".repeat(31)))
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation { field: "title", .. }));
        let err = store
            .update_board_setting("ana", BoardField::Title("x".repeat(51)))
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation { field: "title", .. }));
    }

    #[test]
    fn owners_must_be_filename_safe() {
        let (_tmp, store) = store();
        let err = store.load_board("../escape").unwrap_err();
        assert!(matches!(err, StoreError::Validation { field: "owner", .. }));
        let err = store.load_board("").unwrap_err();
        assert!(matches!(err, StoreError::Validation { field: "owner", .. }));
    }

    #[test]
    fn notes_are_isolated_per_owner() {
        let (_tmp, store) = store();
        store
            .create_note("ana", Position::default(), NoteColor::Blue)
            .unwrap();
        store
            .create_note("ben", Position::default(), NoteColor::Pink)
            .unwrap();
        assert_eq!(store.load_notes("ana").unwrap().len(), 1);
        assert_eq!(store.load_notes("ben").unwrap().len(), 1);
        store.clear_all_notes("ben").unwrap();
        assert_eq!(store.load_notes("ana").unwrap().len(), 1);
    }
}
