use std::process::Command;
use tempfile::TempDir;

fn corkboard(tmp: &TempDir, user: &str) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_corkboard"));
    cmd.args(["--data-dir", tmp.path().to_str().unwrap(), "--user", user]);
    cmd
}

fn stdout_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// "Added blue note Ab3dEf at (12, 34)" -> "Ab3dEf"
fn note_id_from_add(stdout: &str) -> String {
    stdout
        .split_whitespace()
        .nth(3)
        .expect("add output should contain a note id")
        .to_string()
}

#[test]
fn board_is_created_with_defaults_on_first_access() {
    let tmp = TempDir::new().unwrap();
    let output = corkboard(&tmp, "ana").arg("board").output().unwrap();
    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.contains("Sticky Notes Board"));
    assert!(stdout.contains("Click anywhere on the canvas to add a note"));
    assert!(stdout.contains("white"));
}

#[test]
fn add_then_list_shows_the_note() {
    let tmp = TempDir::new().unwrap();
    let output = corkboard(&tmp, "ana")
        .args(["add", "blue", "--x", "12", "--y", "34"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let id = note_id_from_add(&stdout_of(&output));

    let output = corkboard(&tmp, "ana").arg("list").output().unwrap();
    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.contains(&id));
    assert!(stdout.contains("blue"));
    assert!(stdout.contains("(12, 34)"));
    // New notes carry the default icon.
    assert!(stdout.contains("cupcake"));
}

#[test]
fn add_rejects_unknown_color() {
    let tmp = TempDir::new().unwrap();
    let output = corkboard(&tmp, "ana")
        .args(["add", "chartreuse"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("unknown note color"));
}

#[test]
fn edit_updates_title_text_and_icon() {
    let tmp = TempDir::new().unwrap();
    let output = corkboard(&tmp, "ana")
        .args(["add", "yellow"])
        .output()
        .unwrap();
    let id = note_id_from_add(&stdout_of(&output));

    let output = corkboard(&tmp, "ana")
        .args(["edit", &id, "--title", "groceries", "--text", "milk", "--icon", "star"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = stdout_of(&corkboard(&tmp, "ana").arg("list").output().unwrap());
    assert!(stdout.contains("groceries"));
    assert!(stdout.contains("milk"));
    assert!(stdout.contains("star"));
}

#[test]
fn foreign_owner_cannot_touch_a_note() {
    let tmp = TempDir::new().unwrap();
    let output = corkboard(&tmp, "ana")
        .args(["add", "green"])
        .output()
        .unwrap();
    let id = note_id_from_add(&stdout_of(&output));

    let output = corkboard(&tmp, "ben")
        .args(["edit", &id, "--title", "hijacked"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("note not found"));

    // Ana's note is untouched.
    let stdout = stdout_of(&corkboard(&tmp, "ana").arg("list").output().unwrap());
    assert!(!stdout.contains("hijacked"));
}

#[test]
fn move_updates_position() {
    let tmp = TempDir::new().unwrap();
    let output = corkboard(&tmp, "ana")
        .args(["add", "pink"])
        .output()
        .unwrap();
    let id = note_id_from_add(&stdout_of(&output));

    let output = corkboard(&tmp, "ana")
        .args(["move", &id, "300", "150"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = stdout_of(&corkboard(&tmp, "ana").arg("list").output().unwrap());
    assert!(stdout.contains("(300, 150)"));
}

#[test]
fn delete_is_idempotent() {
    let tmp = TempDir::new().unwrap();
    let output = corkboard(&tmp, "ana")
        .args(["add", "purple"])
        .output()
        .unwrap();
    let id = note_id_from_add(&stdout_of(&output));

    for _ in 0..2 {
        let output = corkboard(&tmp, "ana")
            .args(["delete", &id, "--yes"])
            .output()
            .unwrap();
        assert!(output.status.success());
    }

    let stdout = stdout_of(&corkboard(&tmp, "ana").arg("list").output().unwrap());
    assert!(stdout.contains("(no notes)"));
}

#[test]
fn clear_empties_the_board() {
    let tmp = TempDir::new().unwrap();
    corkboard(&tmp, "ana").args(["add", "orange"]).output().unwrap();
    corkboard(&tmp, "ana").args(["add", "yellow"]).output().unwrap();

    let output = corkboard(&tmp, "ana")
        .args(["clear", "--yes"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(stdout_of(&output).contains("Deleted 2"));

    let stdout = stdout_of(&corkboard(&tmp, "ana").arg("list").output().unwrap());
    assert!(stdout.contains("(no notes)"));

    // Clearing an empty board also succeeds.
    let output = corkboard(&tmp, "ana")
        .args(["clear", "--yes"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(stdout_of(&output).contains("Deleted 0"));
}

#[test]
fn canvas_color_update_keeps_other_settings() {
    let tmp = TempDir::new().unwrap();
    let output = corkboard(&tmp, "ana")
        .args(["board", "--canvas-color", "blue"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = stdout_of(&corkboard(&tmp, "ana").arg("board").output().unwrap());
    assert!(stdout.contains("blue"));
    assert!(stdout.contains("Sticky Notes Board"));
    assert!(stdout.contains("Click anywhere on the canvas to add a note"));
}

#[test]
fn boards_are_isolated_per_owner() {
    let tmp = TempDir::new().unwrap();
    corkboard(&tmp, "ana").args(["add", "blue"]).output().unwrap();
    corkboard(&tmp, "ben").args(["add", "pink"]).output().unwrap();
    corkboard(&tmp, "ben").args(["clear", "--yes"]).output().unwrap();

    let stdout = stdout_of(&corkboard(&tmp, "ana").arg("list").output().unwrap());
    assert!(stdout.contains("blue"));
    let stdout = stdout_of(&corkboard(&tmp, "ben").arg("list").output().unwrap());
    assert!(stdout.contains("(no notes)"));
}
