use crate::interaction::{DeleteGate, DeleteTarget};
use crate::model::{CanvasColor, Note, NoteColor, NoteIcon, Position};
use crate::store::{BoardField, NoteField, Store};
use crate::ui;
use anyhow::{bail, Context, Result};
use std::io::{self, Write};

pub fn list(store: &Store, owner: &str) -> Result<()> {
    let settings = store.load_board(owner)?;
    let mut notes = store.load_notes(owner)?;
    notes.sort_by(|a, b| a.id.cmp(&b.id));
    println!(
        "{} — {} (canvas: {})",
        settings.title,
        settings.description,
        settings.canvas_color.name()
    );
    if notes.is_empty() {
        println!("  (no notes)");
    }
    for note in &notes {
        print_note(note);
    }
    Ok(())
}

pub fn add(store: &Store, owner: &str, color: String, x: i32, y: i32) -> Result<()> {
    let color: NoteColor = color.parse()?;
    let note = store
        .create_note(owner, Position::new(x, y), color)
        .context("creating note")?;
    println!(
        "Added {} note {} at {}",
        color.name(),
        note.id,
        note.position
    );
    Ok(())
}

pub fn edit(
    store: &Store,
    owner: &str,
    note_id: String,
    title: Option<String>,
    text: Option<String>,
    icon: Option<String>,
) -> Result<()> {
    if title.is_none() && text.is_none() && icon.is_none() {
        bail!("nothing to edit: pass --title, --text, or --icon");
    }
    if let Some(title) = title {
        store
            .update_note_field(owner, &note_id, NoteField::Title(title))
            .with_context(|| format!("updating title of {}", note_id))?;
    }
    if let Some(text) = text {
        store
            .update_note_field(owner, &note_id, NoteField::Text(text))
            .with_context(|| format!("updating text of {}", note_id))?;
    }
    if let Some(icon) = icon {
        let icon: NoteIcon = icon.parse()?;
        store
            .update_note_field(owner, &note_id, NoteField::Icon(icon))
            .with_context(|| format!("updating icon of {}", note_id))?;
    }
    println!("Updated note {}", note_id);
    Ok(())
}

pub fn move_note(store: &Store, owner: &str, note_id: String, x: i32, y: i32) -> Result<()> {
    store
        .update_note_field(owner, &note_id, NoteField::Position(Position::new(x, y)))
        .with_context(|| format!("moving note {}", note_id))?;
    println!("Moved note {} to ({}, {})", note_id, x, y);
    Ok(())
}

pub fn delete(store: &Store, owner: &str, note_id: String, yes: bool) -> Result<()> {
    let mut gate = DeleteGate::default();
    gate.request(DeleteTarget::Note(note_id.clone()));
    if !yes && !prompt(&format!("Delete note {}? [y/N] ", note_id))? {
        gate.cancel();
        println!("Canceled");
        return Ok(());
    }
    if let Some(DeleteTarget::Note(id)) = gate.confirm() {
        store.delete_note(owner, &id)?;
        println!("Deleted note {}", id);
    }
    Ok(())
}

pub fn clear(store: &Store, owner: &str, yes: bool) -> Result<()> {
    let mut gate = DeleteGate::default();
    gate.request(DeleteTarget::All);
    if !yes && !prompt("Delete ALL notes on the board? [y/N] ")? {
        gate.cancel();
        println!("Canceled");
        return Ok(());
    }
    if gate.confirm().is_some() {
        let count = store.clear_all_notes(owner)?;
        println!("Deleted {} note(s)", count);
    }
    Ok(())
}

pub fn board(
    store: &Store,
    owner: &str,
    title: Option<String>,
    description: Option<String>,
    canvas_color: Option<String>,
) -> Result<()> {
    if title.is_none() && description.is_none() && canvas_color.is_none() {
        let settings = store.load_board(owner)?;
        println!("Title:        {}", settings.title);
        println!("Description:  {}", settings.description);
        println!("Canvas color: {}", settings.canvas_color.name());
        return Ok(());
    }
    if let Some(title) = title {
        store
            .update_board_setting(owner, BoardField::Title(title))
            .context("updating board title")?;
    }
    if let Some(description) = description {
        store
            .update_board_setting(owner, BoardField::Description(description))
            .context("updating board description")?;
    }
    if let Some(color) = canvas_color {
        let color: CanvasColor = color.parse()?;
        store
            .update_board_setting(owner, BoardField::CanvasColor(color))
            .context("updating canvas color")?;
    }
    println!("Updated board settings");
    Ok(())
}

pub fn tui(store: Store, owner: String) -> Result<()> {
    ui::run(store, owner)
}

fn prompt(question: &str) -> Result<bool> {
    print!("{}", question);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    let answer = answer.trim();
    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}

fn print_note(note: &Note) {
    println!(
        "  - {} [{} {}] at {}",
        note.id,
        note.color.name(),
        note.icon.name(),
        note.position
    );
    if !note.title.is_empty() {
        println!("    {}", note.title);
    }
    for line in note.text.lines() {
        println!("    {}", line);
    }
}
