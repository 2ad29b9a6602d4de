use crate::interaction::{
    CanvasBounds, DeleteGate, DeleteTarget, DragCommit, DragController, EditSession, EditTarget,
};
use crate::model::{
    BoardSettings, CanvasColor, Note, NoteColor, NoteId, Position, BOARD_DESCRIPTION_MAX,
    BOARD_TITLE_MAX, NOTE_HEIGHT, NOTE_TITLE_MAX, NOTE_WIDTH,
};
use crate::store::{BoardField, NoteField, Store};
use anyhow::Result;
use crossterm::event::{
    self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, Event,
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::{Alignment, Color, Modifier, Rect, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Terminal;
use std::collections::HashMap;
use std::io::{stdout, Stdout};
use std::time::Duration;

// One terminal cell covers this many canvas pixels.
const PX_PER_COL: i32 = 8;
const PX_PER_ROW: i32 = 16;

const NOTE_COLS: u16 = (NOTE_WIDTH / PX_PER_COL) as u16;
const NOTE_ROWS: u16 = (NOTE_HEIGHT / PX_PER_ROW) as u16;

// Cells on either end of the header row reserved for the icon button and
// the delete button; the stretch between them is the drag handle.
const HEADER_BUTTON_COLS: u16 = 3;

pub fn run(store: Store, owner: String) -> Result<()> {
    let settings = store.load_board(&owner)?;
    let notes = store
        .load_notes(&owner)?
        .into_iter()
        .map(|note| (note.id.clone(), note))
        .collect();
    let mut terminal = setup_terminal()?;
    let mut app = App::new(store, owner, settings, notes);
    let result = app.event_loop(&mut terminal);
    teardown_terminal(&mut terminal)?;
    result
}

struct App {
    store: Store,
    owner: String,
    settings: BoardSettings,
    notes: HashMap<NoteId, Note>,
    drags: DragController,
    gate: DeleteGate,
    edits: EditSession,
    mode: Mode,
    status: String,
    canvas_area: Rect,
}

enum Mode {
    Normal,
    EditingField {
        buffer: FieldValue,
        max_chars: Option<usize>,
    },
    ColorPicker {
        spawn: Position,
        selected: usize,
    },
    IconPicker {
        note_id: NoteId,
        selected: usize,
    },
    ConfirmDelete,
}

impl App {
    fn new(
        store: Store,
        owner: String,
        settings: BoardSettings,
        notes: HashMap<NoteId, Note>,
    ) -> Self {
        let status = format!("Loaded {} note(s) for {}", notes.len(), owner);
        App {
            store,
            owner,
            settings,
            notes,
            drags: DragController::new(),
            gate: DeleteGate::default(),
            edits: EditSession::default(),
            mode: Mode::Normal,
            status,
            canvas_area: Rect::default(),
        }
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|f| self.draw(f))?;
            if event::poll(Duration::from_millis(200))? {
                match event::read()? {
                    Event::Key(key) => {
                        if key.kind != KeyEventKind::Press {
                            continue;
                        }
                        if self.handle_key(key) {
                            break;
                        }
                    }
                    Event::Mouse(mouse) => self.handle_mouse(mouse),
                    Event::FocusLost => self.cancel_active_drags(),
                    _ => {}
                }
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        match &mut self.mode {
            Mode::Normal => return self.handle_normal_key(key),
            Mode::EditingField { .. } => self.handle_edit_key(key),
            Mode::ColorPicker { .. } => self.handle_color_picker_key(key),
            Mode::IconPicker { .. } => self.handle_icon_picker_key(key),
            Mode::ConfirmDelete => self.handle_confirm_key(key),
        }
        false
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') => {
                self.cancel_active_drags();
                return true;
            }
            KeyCode::Char('n') => {
                let bounds = self.canvas_bounds();
                let spawn = bounds.clamp(Position::new(
                    bounds.width / 2 - NOTE_WIDTH / 2,
                    bounds.height / 2 - NOTE_HEIGHT / 2,
                ));
                self.mode = Mode::ColorPicker { spawn, selected: 0 };
                self.status = "Pick a color (arrows + Enter, 1-6, Esc cancels)".into();
            }
            KeyCode::Char('t') => self.begin_edit(
                EditTarget::BoardTitle,
                self.settings.title.clone(),
                Some(BOARD_TITLE_MAX),
            ),
            KeyCode::Char('d') => self.begin_edit(
                EditTarget::BoardDescription,
                self.settings.description.clone(),
                Some(BOARD_DESCRIPTION_MAX),
            ),
            KeyCode::Char('c') => self.cycle_canvas_color(),
            KeyCode::Char('x') => {
                if self.notes.is_empty() {
                    self.status = "Board is already empty".into();
                } else {
                    self.gate.request(DeleteTarget::All);
                    self.mode = Mode::ConfirmDelete;
                }
            }
            _ => {}
        }
        false
    }

    fn handle_edit_key(&mut self, key: KeyEvent) {
        let (buffer, max_chars) = match &mut self.mode {
            Mode::EditingField { buffer, max_chars } => (buffer, *max_chars),
            _ => return,
        };
        match key.code {
            KeyCode::Esc => self.cancel_edit(),
            KeyCode::Enter => {
                let multiline = matches!(self.edits.target(), Some(EditTarget::NoteText(_)));
                if multiline && !key.modifiers.contains(KeyModifiers::CONTROL) {
                    buffer.insert_char('\n');
                } else {
                    let value = buffer.value.clone();
                    self.commit_edit(value);
                }
            }
            KeyCode::Left => buffer.move_left(),
            KeyCode::Right => buffer.move_right(),
            KeyCode::Up => buffer.move_up(),
            KeyCode::Down => buffer.move_down(),
            KeyCode::Backspace => buffer.backspace(),
            KeyCode::Char(c) => {
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
                {
                    let at_limit = max_chars
                        .map(|max| buffer.value.chars().count() >= max)
                        .unwrap_or(false);
                    if !at_limit {
                        buffer.insert_char(c);
                    }
                }
            }
            _ => {}
        }
    }

    fn handle_color_picker_key(&mut self, key: KeyEvent) {
        let (spawn, selected) = match &mut self.mode {
            Mode::ColorPicker { spawn, selected } => (*spawn, selected),
            _ => return,
        };
        match key.code {
            KeyCode::Esc => {
                self.mode = Mode::Normal;
                self.status = "Canceled".into();
            }
            KeyCode::Left | KeyCode::Up => {
                *selected = (*selected + NoteColor::ALL.len() - 1) % NoteColor::ALL.len();
            }
            KeyCode::Right | KeyCode::Down | KeyCode::Tab => {
                *selected = (*selected + 1) % NoteColor::ALL.len();
            }
            KeyCode::Enter => {
                let color = NoteColor::ALL[*selected];
                self.mode = Mode::Normal;
                self.create_note_at(spawn, color);
            }
            KeyCode::Char(c @ '1'..='6') => {
                let idx = (c as usize) - ('1' as usize);
                self.mode = Mode::Normal;
                self.create_note_at(spawn, NoteColor::ALL[idx]);
            }
            _ => {}
        }
    }

    fn handle_icon_picker_key(&mut self, key: KeyEvent) {
        use crate::model::NoteIcon;
        let (note_id, selected) = match &mut self.mode {
            Mode::IconPicker { note_id, selected } => (note_id.clone(), selected),
            _ => return,
        };
        match key.code {
            KeyCode::Esc => {
                self.mode = Mode::Normal;
                self.status = "Canceled".into();
            }
            KeyCode::Left | KeyCode::Up => {
                *selected = (*selected + NoteIcon::ALL.len() - 1) % NoteIcon::ALL.len();
            }
            KeyCode::Right | KeyCode::Down | KeyCode::Tab => {
                *selected = (*selected + 1) % NoteIcon::ALL.len();
            }
            KeyCode::Enter => {
                let icon = NoteIcon::ALL[*selected];
                self.mode = Mode::Normal;
                match self
                    .store
                    .update_note_field(&self.owner, &note_id, NoteField::Icon(icon))
                {
                    Ok(()) => {
                        if let Some(note) = self.notes.get_mut(&note_id) {
                            note.icon = icon;
                        }
                        self.status = format!("Set icon of {} to {}", note_id, icon.name());
                    }
                    Err(err) => self.status = format!("Icon change failed: {}", err),
                }
            }
            _ => {}
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                self.mode = Mode::Normal;
                self.confirm_pending_delete();
            }
            KeyCode::Char('n') | KeyCode::Esc => {
                self.gate.cancel();
                self.mode = Mode::Normal;
                self.status = "Delete canceled".into();
            }
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        match self.mode {
            Mode::Normal => {}
            Mode::EditingField { .. } => {
                // Clicking away is a blur: commit with the latest value,
                // then let the click act on the canvas.
                if matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) {
                    let value = match &self.mode {
                        Mode::EditingField { buffer, .. } => buffer.value.clone(),
                        _ => String::new(),
                    };
                    self.commit_edit(value);
                } else {
                    return;
                }
            }
            Mode::ColorPicker { .. } | Mode::IconPicker { .. } | Mode::ConfirmDelete => {
                // Pickers and the confirm dialog are keyboard-driven; a
                // click outside them cancels.
                if matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) {
                    self.gate.cancel();
                    self.mode = Mode::Normal;
                    self.status = "Canceled".into();
                }
                return;
            }
        }

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.mouse_down(mouse.column, mouse.row),
            MouseEventKind::Drag(MouseButton::Left) => self.mouse_drag(mouse.column, mouse.row),
            MouseEventKind::Up(MouseButton::Left) => self.mouse_up(mouse.column, mouse.row),
            // A bare move with a session still live means the release was
            // never delivered; resolve the drag rather than leaving it open.
            MouseEventKind::Moved => {
                if self.drags.active_note().is_some() {
                    self.cancel_active_drags();
                }
            }
            _ => {}
        }
    }

    fn mouse_down(&mut self, column: u16, row: u16) {
        if !rect_contains(self.canvas_area, column, row) {
            return;
        }
        let pointer = self.cell_to_px(column, row);
        let hit = self.note_at_cell(column, row);
        let Some(note_id) = hit else {
            // Empty canvas: offer a new note centered on the click.
            let spawn = self.canvas_bounds().clamp(Position::new(
                pointer.x - NOTE_WIDTH / 2,
                pointer.y - NOTE_HEIGHT / 2,
            ));
            self.mode = Mode::ColorPicker { spawn, selected: 0 };
            self.status = "Pick a color (arrows + Enter, 1-6, Esc cancels)".into();
            return;
        };
        let Some(rect) = self.note_rect(&note_id) else {
            return;
        };
        let rel_col = column - rect.x;
        let rel_row = row - rect.y;
        if rel_row == 0 {
            if rel_col < HEADER_BUTTON_COLS {
                let selected = self
                    .notes
                    .get(&note_id)
                    .map(|n| {
                        crate::model::NoteIcon::ALL
                            .iter()
                            .position(|i| *i == n.icon)
                            .unwrap_or(0)
                    })
                    .unwrap_or(0);
                self.mode = Mode::IconPicker { note_id, selected };
                self.status = "Pick an icon (arrows + Enter, Esc cancels)".into();
            } else if rel_col >= NOTE_COLS - HEADER_BUTTON_COLS {
                self.gate.request(DeleteTarget::Note(note_id));
                self.mode = Mode::ConfirmDelete;
            } else if let Some(origin) = self.notes.get(&note_id).map(|n| n.position) {
                // Re-entrant downs on an already-dragging note are ignored.
                self.drags.begin(&note_id, origin, pointer);
            }
        } else if rel_row == 1 {
            let current = self
                .notes
                .get(&note_id)
                .map(|n| n.title.clone())
                .unwrap_or_default();
            self.begin_edit(EditTarget::NoteTitle(note_id), current, Some(NOTE_TITLE_MAX));
        } else {
            let current = self
                .notes
                .get(&note_id)
                .map(|n| n.text.clone())
                .unwrap_or_default();
            self.begin_edit(EditTarget::NoteText(note_id), current, None);
        }
    }

    fn mouse_drag(&mut self, column: u16, row: u16) {
        let Some(note_id) = self.drags.active_note().cloned() else {
            return;
        };
        let pointer = self.cell_to_px(column, row);
        let bounds = self.canvas_bounds();
        if let Some(position) = self.drags.update(&note_id, pointer, bounds) {
            // Transient visual position only; nothing is written yet.
            if let Some(note) = self.notes.get_mut(&note_id) {
                note.position = position;
            }
        }
    }

    fn mouse_up(&mut self, column: u16, row: u16) {
        let Some(note_id) = self.drags.active_note().cloned() else {
            return;
        };
        let pointer = self.cell_to_px(column, row);
        let bounds = self.canvas_bounds();
        let commit = self.drags.release(&note_id, pointer, bounds);
        self.apply_drag_commit(&note_id, commit);
    }

    fn cancel_active_drags(&mut self) {
        while let Some(note_id) = self.drags.active_note().cloned() {
            let commit = self.drags.cancel(&note_id);
            self.apply_drag_commit(&note_id, commit);
        }
    }

    fn apply_drag_commit(&mut self, note_id: &str, commit: Option<DragCommit>) {
        let Some(commit) = commit else {
            // No write owed; the visual position already equals the origin.
            return;
        };
        match self.store.update_note_field(
            &self.owner,
            note_id,
            NoteField::Position(commit.position),
        ) {
            Ok(()) => {
                if let Some(note) = self.notes.get_mut(note_id) {
                    note.position = commit.position;
                }
                self.status = format!("Moved note {} to {}", note_id, commit.position);
            }
            Err(err) => {
                // Roll the optimistic position back to the last confirmed one.
                if let Some(note) = self.notes.get_mut(note_id) {
                    note.position = commit.origin;
                }
                self.status = format!("Move failed: {}", err);
            }
        }
    }

    fn begin_edit(&mut self, target: EditTarget, current: String, max_chars: Option<usize>) {
        self.edits.begin(target, &current);
        self.mode = Mode::EditingField {
            buffer: FieldValue::new(&current),
            max_chars,
        };
    }

    fn commit_edit(&mut self, value: String) {
        self.mode = Mode::Normal;
        let Some(commit) = self.edits.commit(value) else {
            return;
        };
        let result = match &commit.target {
            EditTarget::NoteTitle(id) => {
                self.store
                    .update_note_field(&self.owner, id, NoteField::Title(commit.value.clone()))
            }
            EditTarget::NoteText(id) => {
                self.store
                    .update_note_field(&self.owner, id, NoteField::Text(commit.value.clone()))
            }
            EditTarget::BoardTitle => self
                .store
                .update_board_setting(&self.owner, BoardField::Title(commit.value.clone())),
            EditTarget::BoardDescription => self
                .store
                .update_board_setting(&self.owner, BoardField::Description(commit.value.clone())),
        };
        match result {
            Ok(()) => {
                match &commit.target {
                    EditTarget::NoteTitle(id) => {
                        if let Some(note) = self.notes.get_mut(id) {
                            note.title = commit.value;
                        }
                        self.status = format!("Saved title of {}", id);
                    }
                    EditTarget::NoteText(id) => {
                        if let Some(note) = self.notes.get_mut(id) {
                            note.text = commit.value;
                        }
                        self.status = format!("Saved note {}", id);
                    }
                    EditTarget::BoardTitle => {
                        self.settings.title = commit.value;
                        self.status = "Saved board title".into();
                    }
                    EditTarget::BoardDescription => {
                        self.settings.description = commit.value;
                        self.status = "Saved board description".into();
                    }
                };
            }
            Err(err) => self.status = format!("Save failed: {}", err),
        }
    }

    fn cancel_edit(&mut self) {
        self.mode = Mode::Normal;
        if self.edits.cancel().is_some() {
            self.status = "Edit canceled".into();
        }
    }

    fn cycle_canvas_color(&mut self) {
        let idx = CanvasColor::ALL
            .iter()
            .position(|c| *c == self.settings.canvas_color)
            .unwrap_or(0);
        let next = CanvasColor::ALL[(idx + 1) % CanvasColor::ALL.len()];
        match self
            .store
            .update_board_setting(&self.owner, BoardField::CanvasColor(next))
        {
            Ok(()) => {
                self.settings.canvas_color = next;
                self.status = format!("Canvas color: {}", next.name());
            }
            Err(err) => self.status = format!("Canvas color change failed: {}", err),
        }
    }

    fn create_note_at(&mut self, spawn: Position, color: NoteColor) {
        match self.store.create_note(&self.owner, spawn, color) {
            Ok(note) => {
                self.status = format!("Added {} note {}", color.name(), note.id);
                self.notes.insert(note.id.clone(), note);
            }
            Err(err) => self.status = format!("Could not add note: {}", err),
        }
    }

    fn confirm_pending_delete(&mut self) {
        match self.gate.confirm() {
            Some(DeleteTarget::Note(id)) => match self.store.delete_note(&self.owner, &id) {
                Ok(()) => {
                    self.notes.remove(&id);
                    self.status = format!("Deleted note {}", id);
                }
                Err(err) => self.status = format!("Delete failed: {}", err),
            },
            Some(DeleteTarget::All) => match self.store.clear_all_notes(&self.owner) {
                Ok(count) => {
                    self.notes.clear();
                    self.status = format!("Deleted {} note(s)", count);
                }
                Err(err) => self.status = format!("Clear failed: {}", err),
            },
            None => {}
        }
    }

    // --- geometry ---

    fn canvas_bounds(&self) -> CanvasBounds {
        CanvasBounds::new(
            self.canvas_area.width as i32 * PX_PER_COL,
            self.canvas_area.height as i32 * PX_PER_ROW,
        )
    }

    fn cell_to_px(&self, column: u16, row: u16) -> Position {
        Position::new(
            (column.saturating_sub(self.canvas_area.x)) as i32 * PX_PER_COL,
            (row.saturating_sub(self.canvas_area.y)) as i32 * PX_PER_ROW,
        )
    }

    fn note_rect(&self, note_id: &str) -> Option<Rect> {
        let note = self.notes.get(note_id)?;
        let x = self.canvas_area.x as i32 + note.position.x / PX_PER_COL;
        let y = self.canvas_area.y as i32 + note.position.y / PX_PER_ROW;
        Some(Rect {
            x: x.max(0) as u16,
            y: y.max(0) as u16,
            width: NOTE_COLS,
            height: NOTE_ROWS,
        })
    }

    fn z_order(&self) -> Vec<NoteId> {
        let mut ids: Vec<NoteId> = self.notes.keys().cloned().collect();
        ids.sort();
        // The dragged note rides on top.
        if let Some(active) = self.drags.active_note() {
            if let Some(idx) = ids.iter().position(|id| id == active) {
                let id = ids.remove(idx);
                ids.push(id);
            }
        }
        ids
    }

    fn note_at_cell(&self, column: u16, row: u16) -> Option<NoteId> {
        for id in self.z_order().into_iter().rev() {
            if let Some(rect) = self.note_rect(&id) {
                if rect_contains(rect, column, row) {
                    return Some(id);
                }
            }
        }
        None
    }

    // --- drawing ---

    fn draw(&mut self, f: &mut ratatui::Frame<'_>) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(NOTE_ROWS + 2),
                Constraint::Length(3),
            ])
            .split(f.size());

        self.draw_header(f, layout[0]);
        self.draw_canvas(f, layout[1]);
        self.draw_footer(f, layout[2]);

        match &self.mode {
            Mode::EditingField { buffer, max_chars } => {
                self.draw_edit_dialog(f, buffer, *max_chars)
            }
            Mode::ColorPicker { selected, .. } => draw_color_picker(f, *selected),
            Mode::IconPicker { selected, .. } => draw_icon_picker(f, *selected),
            Mode::ConfirmDelete => self.draw_confirm(f),
            Mode::Normal => {}
        }
    }

    fn draw_header(&self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let title = Line::from(vec![
            Span::styled(
                "corkboard ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                &self.settings.title,
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("  •  "),
            Span::styled(&self.owner, Style::default().fg(Color::Green)),
            Span::raw("  •  "),
            Span::styled(
                format!("canvas {}", self.settings.canvas_color.name()),
                Style::default().fg(Color::Magenta),
            ),
            Span::raw("  •  "),
            Span::styled(
                format!("{} note(s)", self.notes.len()),
                Style::default().fg(Color::Gray),
            ),
        ]);
        let description = Line::from(Span::styled(
            self.settings.description.clone(),
            Style::default().fg(Color::DarkGray),
        ));

        let block = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray));
        let paragraph = Paragraph::new(vec![title, description])
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(paragraph, area);
    }

    fn draw_canvas(&mut self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let bg = canvas_bg(self.settings.canvas_color);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .style(Style::default().bg(bg));
        let inner = block.inner(area);
        f.render_widget(block, area);
        self.canvas_area = inner;

        if self.notes.is_empty() {
            let empty = Paragraph::new(vec![
                Line::from(""),
                Line::from("No notes yet"),
                Line::from("Click anywhere on the canvas to add a sticky note"),
            ])
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray).bg(bg));
            f.render_widget(empty, inner);
            return;
        }

        for id in self.z_order() {
            let Some(note) = self.notes.get(&id) else {
                continue;
            };
            let Some(rect) = self.note_rect(&id) else {
                continue;
            };
            let rect = rect.intersection(inner);
            if rect.width == 0 || rect.height == 0 {
                continue;
            }
            let dragging = self.drags.is_dragging(&id);
            f.render_widget(Clear, rect);
            f.render_widget(note_widget(note, dragging), rect);
        }
    }

    fn draw_footer(&self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Length(1)])
            .split(area);

        let help = Line::from(vec![
            Span::styled("click", Style::default().fg(Color::LightCyan)),
            Span::raw(" empty canvas: new note  "),
            Span::styled("drag", Style::default().fg(Color::LightCyan)),
            Span::raw(" header: move  "),
            Span::styled("t", Style::default().fg(Color::LightCyan)),
            Span::raw(" board title  "),
            Span::styled("d", Style::default().fg(Color::LightCyan)),
            Span::raw(" description  "),
            Span::styled("c", Style::default().fg(Color::LightCyan)),
            Span::raw(" canvas color  "),
            Span::styled("x", Style::default().fg(Color::LightCyan)),
            Span::raw(" clear all  "),
            Span::styled("q", Style::default().fg(Color::LightCyan)),
            Span::raw(" quit"),
        ]);
        let help_bar = Paragraph::new(help).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        f.render_widget(help_bar, rows[0]);

        let status = Paragraph::new(self.status.clone()).wrap(Wrap { trim: true });
        f.render_widget(status, rows[1]);
    }

    fn draw_edit_dialog(&self, f: &mut ratatui::Frame<'_>, buffer: &FieldValue, max: Option<usize>) {
        let (label, multiline) = match self.edits.target() {
            Some(EditTarget::NoteTitle(id)) => (format!("Note {} title", id), false),
            Some(EditTarget::NoteText(id)) => (format!("Note {} text", id), true),
            Some(EditTarget::BoardTitle) => ("Board title".to_string(), false),
            Some(EditTarget::BoardDescription) => ("Board description".to_string(), false),
            None => return,
        };
        let area = centered_rect(60, if multiline { 50 } else { 25 }, f.size());
        let mut lines: Vec<Line> = buffer
            .with_caret()
            .split('\n')
            .map(|l| Line::from(l.to_string()))
            .collect();
        lines.push(Line::from(""));
        let hint = if multiline {
            "Ctrl+Enter to save • Enter adds newline • Esc to cancel".to_string()
        } else if let Some(max) = max {
            format!(
                "Enter to save • Esc to cancel • {}/{} chars",
                buffer.value.chars().count(),
                max
            )
        } else {
            "Enter to save • Esc to cancel".to_string()
        };
        lines.push(Line::from(Span::styled(
            hint,
            Style::default().fg(Color::Gray),
        )));
        let dialog = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title(Span::styled(
                        label,
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    ))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            );
        f.render_widget(Clear, area);
        f.render_widget(dialog, area);
    }

    fn draw_confirm(&self, f: &mut ratatui::Frame<'_>) {
        let area = centered_rect(50, 30, f.size());
        let message = match self.gate.pending() {
            Some(DeleteTarget::Note(id)) => format!("Delete note {}?", id),
            Some(DeleteTarget::All) => {
                format!("Delete all {} sticky notes?", self.notes.len())
            }
            None => return,
        };
        let body = vec![
            Line::from(Span::styled(
                message,
                Style::default()
                    .fg(Color::LightRed)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from("This action cannot be undone."),
            Line::from(""),
            Line::from("Press y to confirm, n or Esc to cancel"),
        ];
        let dialog = Paragraph::new(body).alignment(Alignment::Center).block(
            Block::default()
                .title(Span::styled(
                    "Confirm Delete",
                    Style::default()
                        .fg(Color::LightRed)
                        .add_modifier(Modifier::BOLD),
                ))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::LightRed)),
        );
        f.render_widget(Clear, area);
        f.render_widget(dialog, area);
    }
}

#[derive(Clone)]
struct FieldValue {
    value: String,
    cursor: usize,
}

impl FieldValue {
    fn new(value: &str) -> Self {
        FieldValue {
            value: value.to_string(),
            cursor: value.len(),
        }
    }

    fn move_left(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor = prev_grapheme(self.cursor, &self.value);
    }

    fn move_right(&mut self) {
        if self.cursor >= self.value.len() {
            return;
        }
        self.cursor = next_grapheme(self.cursor, &self.value);
    }

    fn move_up(&mut self) {
        let (line_starts, line_idx, col) = line_state(&self.value, self.cursor);
        if line_idx == 0 {
            return;
        }
        let target_start = line_starts[line_idx - 1];
        self.cursor = index_at_col(&self.value, target_start, col);
    }

    fn move_down(&mut self) {
        let (line_starts, line_idx, col) = line_state(&self.value, self.cursor);
        if line_idx + 1 >= line_starts.len() {
            return;
        }
        let target_start = line_starts[line_idx + 1];
        self.cursor = index_at_col(&self.value, target_start, col);
    }

    fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let prev = prev_grapheme(self.cursor, &self.value);
        self.value.drain(prev..self.cursor);
        self.cursor = prev;
    }

    fn insert_char(&mut self, ch: char) {
        self.value.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    fn with_caret(&self) -> String {
        let mut text = self.value.clone();
        text.insert_str(self.cursor, "▌");
        text
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange
    )?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn teardown_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableFocusChange
    )?;
    terminal.show_cursor()?;
    Ok(())
}

fn rect_contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x
        && column < area.x + area.width
        && row >= area.y
        && row < area.y + area.height
}

fn note_widget(note: &Note, dragging: bool) -> Paragraph<'static> {
    let width = NOTE_COLS as usize;
    let fg = Color::Rgb(30, 41, 59);
    let mut style = Style::default().bg(note_bg(note.color)).fg(fg);
    if dragging {
        style = style.add_modifier(Modifier::BOLD);
    }

    let mut header = String::new();
    header.push_str(note.icon.glyph());
    header.push(' ');
    let fill = if dragging { '═' } else { '─' };
    while header.chars().count() < width.saturating_sub(2) {
        header.push(fill);
    }
    header.push_str(" ✕");

    let title_line = if note.title.is_empty() {
        Line::from(Span::styled(
            "Click to add title...",
            Style::default().fg(Color::Rgb(100, 116, 139)).bg(note_bg(note.color)),
        ))
    } else {
        Line::from(Span::styled(
            note.title.clone(),
            style.add_modifier(Modifier::BOLD),
        ))
    };

    let mut lines = vec![Line::from(header), title_line];
    if note.text.is_empty() {
        lines.push(Line::from(Span::styled(
            "Click to write...",
            Style::default().fg(Color::Rgb(100, 116, 139)).bg(note_bg(note.color)),
        )));
    } else {
        for text_line in note.text.split('\n') {
            lines.push(Line::from(text_line.to_string()));
        }
    }

    Paragraph::new(lines).style(style).wrap(Wrap { trim: false })
}

fn draw_color_picker(f: &mut ratatui::Frame<'_>, selected: usize) {
    let area = centered_rect(30, 40, f.size());
    let mut lines = vec![Line::from(Span::styled(
        "Choose a color",
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    for (idx, color) in NoteColor::ALL.iter().enumerate() {
        let marker = if idx == selected { "▶" } else { " " };
        lines.push(Line::from(vec![
            Span::raw(format!("{} {}. ", marker, idx + 1)),
            Span::styled("  ", Style::default().bg(note_bg(*color))),
            Span::raw(format!(" {}", color.name())),
        ]));
    }
    let dialog = Paragraph::new(lines).block(
        Block::default()
            .title("New Note")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(Clear, area);
    f.render_widget(dialog, area);
}

fn draw_icon_picker(f: &mut ratatui::Frame<'_>, selected: usize) {
    use crate::model::NoteIcon;
    let area = centered_rect(34, 50, f.size());
    let mut lines = vec![Line::from(Span::styled(
        "Choose an icon",
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    for (idx, icon) in NoteIcon::ALL.iter().enumerate() {
        let marker = if idx == selected { "▶" } else { " " };
        lines.push(Line::from(format!(
            "{} {} {}",
            marker,
            icon.glyph(),
            icon.name()
        )));
    }
    let dialog = Paragraph::new(lines).block(
        Block::default()
            .title("Note Icon")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(Clear, area);
    f.render_widget(dialog, area);
}

fn note_bg(color: NoteColor) -> Color {
    match color {
        NoteColor::Yellow => Color::Rgb(254, 240, 138),
        NoteColor::Pink => Color::Rgb(251, 207, 232),
        NoteColor::Blue => Color::Rgb(191, 219, 254),
        NoteColor::Green => Color::Rgb(187, 247, 208),
        NoteColor::Purple => Color::Rgb(233, 213, 255),
        NoteColor::Orange => Color::Rgb(254, 215, 170),
    }
}

fn canvas_bg(color: CanvasColor) -> Color {
    match color {
        CanvasColor::White => Color::Rgb(248, 250, 252),
        CanvasColor::Slate => Color::Rgb(226, 232, 240),
        CanvasColor::Blue => Color::Rgb(219, 234, 254),
        CanvasColor::Purple => Color::Rgb(243, 232, 255),
        CanvasColor::Pink => Color::Rgb(252, 231, 243),
        CanvasColor::Green => Color::Rgb(220, 252, 231),
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Percentage((100 - percent_y) / 2),
                Constraint::Percentage(percent_y),
                Constraint::Percentage((100 - percent_y) / 2),
            ]
            .as_ref(),
        )
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ]
            .as_ref(),
        )
        .split(popup_layout[1])[1]
}

fn prev_grapheme(cursor: usize, text: &str) -> usize {
    if cursor == 0 {
        return 0;
    }
    let mut prev = 0;
    for (idx, _) in text.char_indices() {
        if idx >= cursor {
            break;
        }
        prev = idx;
    }
    prev
}

fn next_grapheme(cursor: usize, text: &str) -> usize {
    for (idx, ch) in text.char_indices() {
        if idx > cursor {
            return idx;
        }
        if idx == cursor {
            return cursor + ch.len_utf8();
        }
    }
    text.len()
}

fn line_state(text: &str, cursor: usize) -> (Vec<usize>, usize, usize) {
    let mut starts = vec![0];
    for (idx, ch) in text.char_indices() {
        if ch == '\n' {
            starts.push(idx + 1);
        }
    }
    let mut line_idx = 0;
    for (i, start) in starts.iter().enumerate() {
        if *start <= cursor {
            line_idx = i;
        } else {
            break;
        }
    }
    let col = text[start_of_line(line_idx, &starts)..cursor]
        .chars()
        .count();
    (starts, line_idx, col)
}

fn start_of_line(line_idx: usize, starts: &[usize]) -> usize {
    *starts.get(line_idx).unwrap_or(&0)
}

fn index_at_col(text: &str, start: usize, target_col: usize) -> usize {
    let slice = &text[start..];
    let limit = slice.find('\n').unwrap_or(slice.len());
    let mut col = 0;
    for (idx, _) in slice[..limit].char_indices() {
        if col == target_col {
            return start + idx;
        }
        col += 1;
    }
    start + limit
}
