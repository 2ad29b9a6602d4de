use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type NoteId = String;

/// Fixed rendered size of a note on the canvas, in pixels.
pub const NOTE_WIDTH: i32 = 256;
pub const NOTE_HEIGHT: i32 = 256;

pub const NOTE_TITLE_MAX: usize = 30;
pub const BOARD_TITLE_MAX: usize = 50;
pub const BOARD_DESCRIPTION_MAX: usize = 100;

pub const DEFAULT_BOARD_TITLE: &str = "Sticky Notes Board";
pub const DEFAULT_BOARD_DESCRIPTION: &str = "Click anywhere on the canvas to add a note";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteColor {
    Yellow,
    Pink,
    Blue,
    Green,
    Purple,
    Orange,
}

impl NoteColor {
    pub const ALL: [NoteColor; 6] = [
        NoteColor::Yellow,
        NoteColor::Pink,
        NoteColor::Blue,
        NoteColor::Green,
        NoteColor::Purple,
        NoteColor::Orange,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            NoteColor::Yellow => "yellow",
            NoteColor::Pink => "pink",
            NoteColor::Blue => "blue",
            NoteColor::Green => "green",
            NoteColor::Purple => "purple",
            NoteColor::Orange => "orange",
        }
    }
}

impl FromStr for NoteColor {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NoteColor::ALL
            .iter()
            .copied()
            .find(|c| c.name() == s)
            .ok_or_else(|| StoreError::Validation {
                field: "color",
                message: format!("unknown note color: {}", s),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteIcon {
    #[default]
    Cupcake,
    Sparkles,
    Star,
    Heart,
    Flag,
    Bookmark,
    Lightbulb,
    Fire,
    Bell,
    Check,
    Pin,
}

impl NoteIcon {
    pub const ALL: [NoteIcon; 11] = [
        NoteIcon::Cupcake,
        NoteIcon::Sparkles,
        NoteIcon::Star,
        NoteIcon::Heart,
        NoteIcon::Flag,
        NoteIcon::Bookmark,
        NoteIcon::Lightbulb,
        NoteIcon::Fire,
        NoteIcon::Bell,
        NoteIcon::Check,
        NoteIcon::Pin,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            NoteIcon::Cupcake => "cupcake",
            NoteIcon::Sparkles => "sparkles",
            NoteIcon::Star => "star",
            NoteIcon::Heart => "heart",
            NoteIcon::Flag => "flag",
            NoteIcon::Bookmark => "bookmark",
            NoteIcon::Lightbulb => "lightbulb",
            NoteIcon::Fire => "fire",
            NoteIcon::Bell => "bell",
            NoteIcon::Check => "check",
            NoteIcon::Pin => "pin",
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            NoteIcon::Cupcake => "🧁",
            NoteIcon::Sparkles => "✨",
            NoteIcon::Star => "⭐",
            NoteIcon::Heart => "❤",
            NoteIcon::Flag => "🚩",
            NoteIcon::Bookmark => "🔖",
            NoteIcon::Lightbulb => "💡",
            NoteIcon::Fire => "🔥",
            NoteIcon::Bell => "🔔",
            NoteIcon::Check => "✅",
            NoteIcon::Pin => "📌",
        }
    }
}

impl FromStr for NoteIcon {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NoteIcon::ALL
            .iter()
            .copied()
            .find(|i| i.name() == s)
            .ok_or_else(|| StoreError::Validation {
                field: "icon",
                message: format!("unknown icon: {}", s),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CanvasColor {
    #[default]
    White,
    Slate,
    Blue,
    Purple,
    Pink,
    Green,
}

impl CanvasColor {
    pub const ALL: [CanvasColor; 6] = [
        CanvasColor::White,
        CanvasColor::Slate,
        CanvasColor::Blue,
        CanvasColor::Purple,
        CanvasColor::Pink,
        CanvasColor::Green,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CanvasColor::White => "white",
            CanvasColor::Slate => "slate",
            CanvasColor::Blue => "blue",
            CanvasColor::Purple => "purple",
            CanvasColor::Pink => "pink",
            CanvasColor::Green => "green",
        }
    }
}

impl FromStr for CanvasColor {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CanvasColor::ALL
            .iter()
            .copied()
            .find(|c| c.name() == s)
            .ok_or_else(|| StoreError::Validation {
                field: "canvas_color",
                message: format!("unknown canvas color: {}", s),
            })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub owner: String,
    pub title: String,
    pub text: String,
    pub color: NoteColor,
    pub icon: NoteIcon,
    pub position: Position,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    pub fn new(id: NoteId, owner: impl Into<String>, position: Position, color: NoteColor) -> Self {
        let now = Utc::now();
        Note {
            id,
            owner: owner.into(),
            title: String::new(),
            text: String::new(),
            color,
            icon: NoteIcon::default(),
            position,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardSettings {
    pub owner: String,
    pub title: String,
    pub description: String,
    pub canvas_color: CanvasColor,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BoardSettings {
    pub fn default_for(owner: impl Into<String>) -> Self {
        let now = Utc::now();
        BoardSettings {
            owner: owner.into(),
            title: DEFAULT_BOARD_TITLE.to_string(),
            description: DEFAULT_BOARD_DESCRIPTION.to_string(),
            canvas_color: CanvasColor::default(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },
    #[error("note not found: {0}")]
    NoteNotFound(NoteId),
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Storage(err.to_string())
    }
}

impl From<serde_yaml::Error> for StoreError {
    fn from(err: serde_yaml::Error) -> Self {
        StoreError::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_defaults_to_cupcake_icon_and_given_position() {
        let note = Note::new("abc123".into(), "ana", Position::new(40, 80), NoteColor::Pink);
        assert_eq!(note.icon, NoteIcon::Cupcake);
        assert_eq!(note.position, Position::new(40, 80));
        assert_eq!(note.color, NoteColor::Pink);
        assert!(note.title.is_empty());
        assert!(note.text.is_empty());
    }

    #[test]
    fn board_settings_defaults() {
        let settings = BoardSettings::default_for("ana");
        assert_eq!(settings.title, "Sticky Notes Board");
        assert_eq!(
            settings.description,
            "Click anywhere on the canvas to add a note"
        );
        assert_eq!(settings.canvas_color, CanvasColor::White);
    }

    #[test]
    fn color_names_round_trip() {
        for color in NoteColor::ALL {
            assert_eq!(color.name().parse::<NoteColor>().unwrap(), color);
        }
        for color in CanvasColor::ALL {
            assert_eq!(color.name().parse::<CanvasColor>().unwrap(), color);
        }
        for icon in NoteIcon::ALL {
            assert_eq!(icon.name().parse::<NoteIcon>().unwrap(), icon);
        }
    }

    #[test]
    fn unknown_color_is_a_validation_error() {
        let err = "chartreuse".parse::<NoteColor>().unwrap_err();
        assert!(matches!(err, StoreError::Validation { field: "color", .. }));
    }
}
