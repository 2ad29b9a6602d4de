use crate::model::{NoteId, Position, NOTE_HEIGHT, NOTE_WIDTH};
use std::collections::HashMap;

/// Canvas extents in pixels. Candidate positions are clamped so the whole
/// note stays inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasBounds {
    pub width: i32,
    pub height: i32,
}

impl CanvasBounds {
    pub fn new(width: i32, height: i32) -> Self {
        CanvasBounds { width, height }
    }

    pub fn clamp(&self, candidate: Position) -> Position {
        Position {
            x: candidate.x.clamp(0, (self.width - NOTE_WIDTH).max(0)),
            y: candidate.y.clamp(0, (self.height - NOTE_HEIGHT).max(0)),
        }
    }
}

/// A position write owed to the store after a gesture completes. `origin`
/// is the last confirmed position, kept so the caller can roll the visual
/// state back if the write fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragCommit {
    pub note_id: NoteId,
    pub position: Position,
    pub origin: Position,
}

#[derive(Debug, Clone)]
struct DragSession {
    origin: Position,
    start_pointer: Position,
    last: Position,
}

/// Per-note Idle -> Dragging -> Idle machine. While a session is live the
/// clamped candidate is purely visual; nothing is persisted until release
/// (or cancellation) hands back a single `DragCommit`.
#[derive(Debug, Default)]
pub struct DragController {
    sessions: HashMap<NoteId, DragSession>,
}

impl DragController {
    pub fn new() -> Self {
        DragController::default()
    }

    /// Starts a drag for the note. Returns false (and changes nothing) if
    /// that note is already mid-drag.
    pub fn begin(&mut self, note_id: &str, origin: Position, pointer: Position) -> bool {
        if self.sessions.contains_key(note_id) {
            return false;
        }
        self.sessions.insert(
            note_id.to_string(),
            DragSession {
                origin,
                start_pointer: pointer,
                last: origin,
            },
        );
        true
    }

    pub fn is_dragging(&self, note_id: &str) -> bool {
        self.sessions.contains_key(note_id)
    }

    pub fn active_note(&self) -> Option<&NoteId> {
        self.sessions.keys().next()
    }

    /// Advances the drag to a new pointer location and returns the clamped
    /// candidate position, or None when the note is not being dragged.
    pub fn update(
        &mut self,
        note_id: &str,
        pointer: Position,
        bounds: CanvasBounds,
    ) -> Option<Position> {
        let session = self.sessions.get_mut(note_id)?;
        let candidate = Position {
            x: session.origin.x + (pointer.x - session.start_pointer.x),
            y: session.origin.y + (pointer.y - session.start_pointer.y),
        };
        let clamped = bounds.clamp(candidate);
        session.last = clamped;
        Some(clamped)
    }

    /// Ends the drag. Returns the single position write to issue, or None
    /// if the note was not dragging or the gesture had no net movement.
    pub fn release(
        &mut self,
        note_id: &str,
        pointer: Position,
        bounds: CanvasBounds,
    ) -> Option<DragCommit> {
        self.update(note_id, pointer, bounds);
        self.finish(note_id)
    }

    /// Aborts the session without a release event, committing the last
    /// clamped candidate so no transient position is left unresolved.
    pub fn cancel(&mut self, note_id: &str) -> Option<DragCommit> {
        self.finish(note_id)
    }

    fn finish(&mut self, note_id: &str) -> Option<DragCommit> {
        let session = self.sessions.remove(note_id)?;
        if session.last == session.origin {
            // No net movement: skip the no-op write.
            return None;
        }
        Some(DragCommit {
            note_id: note_id.to_string(),
            position: session.last,
            origin: session.origin,
        })
    }
}

/// What a text edit session is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditTarget {
    NoteTitle(NoteId),
    NoteText(NoteId),
    BoardTitle,
    BoardDescription,
}

/// The single write owed when an edit session exits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditCommit {
    pub target: EditTarget,
    pub value: String,
    pub previous: String,
}

/// Two-phase field editing: entering edit mode is local-only; exiting it
/// produces exactly one write carrying the value at exit time.
#[derive(Debug, Default)]
pub struct EditSession {
    active: Option<(EditTarget, String)>,
}

impl EditSession {
    pub fn begin(&mut self, target: EditTarget, current: &str) {
        self.active = Some((target, current.to_string()));
    }

    pub fn target(&self) -> Option<&EditTarget> {
        self.active.as_ref().map(|(target, _)| target)
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn commit(&mut self, value: String) -> Option<EditCommit> {
        let (target, previous) = self.active.take()?;
        Some(EditCommit {
            target,
            value,
            previous,
        })
    }

    /// Leaves edit mode without a write; returns the original value so the
    /// caller can restore its display state.
    pub fn cancel(&mut self) -> Option<(EditTarget, String)> {
        self.active.take()
    }
}

/// Pending deletion target awaiting explicit confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteTarget {
    Note(NoteId),
    All,
}

/// Confirmation gate for destructive actions. The pending target is
/// cleared on confirm and on cancel, so a stale target can never be
/// picked up by a later confirmation.
#[derive(Debug, Default)]
pub struct DeleteGate {
    pending: Option<DeleteTarget>,
}

impl DeleteGate {
    pub fn request(&mut self, target: DeleteTarget) {
        self.pending = Some(target);
    }

    pub fn pending(&self) -> Option<&DeleteTarget> {
        self.pending.as_ref()
    }

    pub fn confirm(&mut self) -> Option<DeleteTarget> {
        self.pending.take()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANVAS: CanvasBounds = CanvasBounds {
        width: 800,
        height: 600,
    };

    #[test]
    fn drag_clamps_to_canvas_minus_note() {
        let mut drags = DragController::new();
        assert!(drags.begin("n1", Position::new(50, 50), Position::new(60, 60)));
        // Pointer delta (+1000, +1000) would land way outside.
        let commit = drags
            .release("n1", Position::new(1060, 1060), CANVAS)
            .unwrap();
        assert_eq!(commit.position, Position::new(544, 344));
        assert_eq!(commit.origin, Position::new(50, 50));
    }

    #[test]
    fn drag_clamps_at_zero() {
        let mut drags = DragController::new();
        drags.begin("n1", Position::new(10, 10), Position::new(0, 0));
        let pos = drags
            .update("n1", Position::new(-500, -500), CANVAS)
            .unwrap();
        assert_eq!(pos, Position::new(0, 0));
    }

    #[test]
    fn intermediate_moves_are_transient_and_release_commits_once() {
        let mut drags = DragController::new();
        drags.begin("n1", Position::new(0, 0), Position::new(5, 5));
        drags.update("n1", Position::new(100, 5), CANVAS);
        drags.update("n1", Position::new(200, 5), CANVAS);
        let commit = drags.release("n1", Position::new(305, 5), CANVAS).unwrap();
        assert_eq!(commit.position, Position::new(300, 0));
        assert!(!drags.is_dragging("n1"));
        // Releasing again yields nothing; the machine is back at Idle.
        assert!(drags.release("n1", Position::new(305, 5), CANVAS).is_none());
    }

    #[test]
    fn reentrant_begin_is_ignored() {
        let mut drags = DragController::new();
        assert!(drags.begin("n1", Position::new(0, 0), Position::new(0, 0)));
        assert!(!drags.begin("n1", Position::new(99, 99), Position::new(99, 99)));
        // The original session still governs the gesture.
        let pos = drags.update("n1", Position::new(10, 10), CANVAS).unwrap();
        assert_eq!(pos, Position::new(10, 10));
    }

    #[test]
    fn no_net_movement_skips_the_write() {
        let mut drags = DragController::new();
        drags.begin("n1", Position::new(40, 40), Position::new(50, 50));
        drags.update("n1", Position::new(80, 80), CANVAS);
        assert!(drags.release("n1", Position::new(50, 50), CANVAS).is_none());
    }

    #[test]
    fn cancel_commits_last_clamped_candidate() {
        let mut drags = DragController::new();
        drags.begin("n1", Position::new(40, 40), Position::new(50, 50));
        drags.update("n1", Position::new(150, 150), CANVAS);
        let commit = drags.cancel("n1").unwrap();
        assert_eq!(commit.position, Position::new(140, 140));
        assert!(!drags.is_dragging("n1"));
    }

    #[test]
    fn cancel_without_movement_is_a_noop() {
        let mut drags = DragController::new();
        drags.begin("n1", Position::new(40, 40), Position::new(50, 50));
        assert!(drags.cancel("n1").is_none());
        assert!(!drags.is_dragging("n1"));
    }

    #[test]
    fn notes_drag_independently() {
        let mut drags = DragController::new();
        assert!(drags.begin("n1", Position::new(0, 0), Position::new(0, 0)));
        assert!(drags.begin("n2", Position::new(100, 100), Position::new(0, 0)));
        drags.update("n1", Position::new(20, 0), CANVAS);
        let commit = drags.release("n2", Position::new(0, 30), CANVAS).unwrap();
        assert_eq!(commit.position, Position::new(100, 130));
        assert!(drags.is_dragging("n1"));
    }

    #[test]
    fn tiny_canvas_clamps_to_origin_corner() {
        let mut drags = DragController::new();
        let bounds = CanvasBounds::new(100, 100);
        drags.begin("n1", Position::new(0, 0), Position::new(0, 0));
        let pos = drags.update("n1", Position::new(50, 50), bounds).unwrap();
        assert_eq!(pos, Position::new(0, 0));
    }

    #[test]
    fn edit_commit_carries_latest_value_and_previous() {
        let mut edit = EditSession::default();
        edit.begin(EditTarget::NoteTitle("n1".into()), "old");
        assert!(edit.is_active());
        let commit = edit.commit("new title".into()).unwrap();
        assert_eq!(commit.target, EditTarget::NoteTitle("n1".into()));
        assert_eq!(commit.value, "new title");
        assert_eq!(commit.previous, "old");
        assert!(!edit.is_active());
        assert!(edit.commit("again".into()).is_none());
    }

    #[test]
    fn edit_cancel_restores_without_write() {
        let mut edit = EditSession::default();
        edit.begin(EditTarget::BoardTitle, "My Board");
        let (target, original) = edit.cancel().unwrap();
        assert_eq!(target, EditTarget::BoardTitle);
        assert_eq!(original, "My Board");
        assert!(!edit.is_active());
    }

    #[test]
    fn delete_gate_resets_after_confirm_and_cancel() {
        let mut gate = DeleteGate::default();
        gate.request(DeleteTarget::Note("n1".into()));
        assert_eq!(gate.confirm(), Some(DeleteTarget::Note("n1".into())));
        // A second confirmation fires nothing.
        assert_eq!(gate.confirm(), None);

        gate.request(DeleteTarget::All);
        gate.cancel();
        assert_eq!(gate.pending(), None);
        assert_eq!(gate.confirm(), None);
    }

    #[test]
    fn delete_gate_tracks_latest_target() {
        let mut gate = DeleteGate::default();
        gate.request(DeleteTarget::Note("n1".into()));
        gate.request(DeleteTarget::All);
        assert_eq!(gate.confirm(), Some(DeleteTarget::All));
    }
}
