use chrono::Utc;
use pretty_assertions::assert_eq;
use redline::buffer::LineBuffer;
use redline::diff::{ChangeId, ChangeKind, Status};
use redline::error::{OverlayWarning, RedlineError, SessionError};
use redline::persist::MemoryPersister;
use redline::preview::{InlineOverlay, OverlayRole};
use redline::session::{SessionController, SessionState};

const ORIGINAL: &str = r#"use std::env;

fn main() {
    let name = env::args().nth(1);
    println!("hello {:?}", name);
}"#;

const PROPOSED: &str = r#"use std::env;

fn main() {
    let name = env::args().nth(1).unwrap_or_default();
    println!("hello {}", name);
}
"#;

fn controller() -> SessionController<LineBuffer, InlineOverlay, MemoryPersister> {
    SessionController::new(
        LineBuffer::from_text(ORIGINAL),
        InlineOverlay::default(),
        MemoryPersister::new(),
    )
}

#[test]
fn test_full_review_workflow() -> anyhow::Result<()> {
    let mut controller = controller();
    let summary = controller.start_session(ORIGINAL, PROPOSED, "src/main.rs")?;
    assert_eq!(summary.total, 3);

    let views = controller.views();
    let kinds: Vec<ChangeKind> = views.iter().map(|view| view.kind).collect();
    assert_eq!(kinds, vec![ChangeKind::Modify, ChangeKind::Modify, ChangeKind::Add]);

    // Both versions of each modified line are visible while pending.
    let text = controller.text();
    assert!(text.contains("env::args().nth(1);\n    let name = env::args().nth(1).unwrap_or_default();"));

    controller.accept(views[0].id)?;
    controller.reject(views[1].id)?;
    assert_eq!(controller.state(), SessionState::Resolving);

    let done = controller.accept(views[2].id)?;
    assert!(done.closed);

    let expected = r#"use std::env;

fn main() {
    let name = env::args().nth(1).unwrap_or_default();
    println!("hello {:?}", name);
}
"#;
    assert_eq!(controller.text(), expected);
    assert_eq!(controller.persister().writes.len(), 1);
    assert_eq!(controller.summary().map(|s| s.to_string()), Some("2 accepted, 1 rejected".to_string()));

    Ok(())
}

#[test]
fn test_preview_lines_follow_earlier_decisions() -> anyhow::Result<()> {
    let original = "a\nb\nc\nd";
    let proposed = "A\nb\nC";
    let mut controller = SessionController::new(
        LineBuffer::from_text(original),
        InlineOverlay::default(),
        MemoryPersister::new(),
    );
    controller.start_session(original, proposed, "letters.txt")?;
    assert_eq!(controller.text(), "a\nA\nb\nc\nC\nd\n// [DELETED] d");

    controller.accept(ChangeId(0))?;
    assert_eq!(controller.text(), "A\nb\nc\nC\nd\n// [DELETED] d");

    let views = controller.views();
    assert_eq!(views[1].buffer_line, Some(4));
    assert_eq!(views[2].buffer_line, Some(5));

    controller.accept(ChangeId(2))?;
    assert_eq!(controller.text(), "A\nb\nc\nC");

    controller.reject(ChangeId(1))?;
    assert_eq!(controller.text(), "A\nb\nc");
    assert_eq!(controller.persister().last().map(|(_, text)| text.as_str()), Some("A\nb\nc"));

    Ok(())
}

#[test]
fn test_repeated_decisions_are_ignored() -> anyhow::Result<()> {
    let mut controller = controller();
    controller.start_session(ORIGINAL, PROPOSED, "src/main.rs")?;

    assert!(controller.accept(ChangeId(0))?.transitioned);
    let before = controller.text();

    assert!(!controller.accept(ChangeId(0))?.transitioned);
    assert!(!controller.reject(ChangeId(0))?.transitioned);
    assert_eq!(controller.text(), before);
    assert_eq!(controller.views()[0].status, Status::Accepted);

    Ok(())
}

#[test]
fn test_unknown_change_leaves_session_untouched() -> anyhow::Result<()> {
    let mut controller = controller();
    controller.start_session(ORIGINAL, PROPOSED, "src/main.rs")?;
    let before = controller.text();

    let err = controller.accept(ChangeId(42)).unwrap_err();

    assert!(matches!(
        err,
        RedlineError::Session(SessionError::UnknownChange { id: ChangeId(42) })
    ));
    assert_eq!(controller.text(), before);
    assert_eq!(controller.state(), SessionState::PreviewShown);
    Ok(())
}

#[test]
fn test_entries_track_roles() -> anyhow::Result<()> {
    let mut controller = controller();
    controller.start_session(ORIGINAL, PROPOSED, "src/main.rs")?;

    let roles: Vec<OverlayRole> = controller.entries().iter().map(|entry| entry.role).collect();
    assert_eq!(
        roles,
        vec![
            OverlayRole::ModifyOld,
            OverlayRole::ModifyNew,
            OverlayRole::ModifyOld,
            OverlayRole::ModifyNew,
            OverlayRole::AddMarker,
        ]
    );

    controller.reject_all()?;
    assert!(controller.entries().is_empty());
    assert_eq!(controller.text(), ORIGINAL);
    Ok(())
}

#[test]
fn test_new_session_after_close() -> anyhow::Result<()> {
    let mut controller = controller();
    controller.start_session(ORIGINAL, PROPOSED, "src/main.rs")?;
    controller.accept_all()?;

    let current = controller.text();
    let summary = controller.start_session(&current, ORIGINAL, "src/main.rs")?;
    assert_eq!(summary.total, 3);
    assert_eq!(controller.session().map(|s| s.id.to_string()), Some("session-2".to_string()));

    controller.accept_all()?;
    assert_eq!(controller.text(), ORIGINAL);
    assert!(controller.warnings().iter().all(|w| !matches!(w, OverlayWarning::MissingLine { .. })));
    Ok(())
}

#[test]
fn test_session_start_time_is_fixed() -> anyhow::Result<()> {
    let before = Utc::now();
    let mut controller = controller();
    controller.start_session(ORIGINAL, PROPOSED, "src/main.rs")?;
    let started_at = controller.session().map(|s| s.started_at).unwrap();
    assert!(started_at >= before && started_at <= Utc::now());

    controller.accept_all()?;
    assert_eq!(controller.session().map(|s| s.started_at), Some(started_at));
    Ok(())
}
