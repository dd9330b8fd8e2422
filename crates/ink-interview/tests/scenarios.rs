//! End-to-end interview scenarios against a temporary story root.

use std::fs;
use std::sync::Arc;
use std::thread;

use ink_core::ScriptRegistry;
use ink_interview::tracker::TodoStatus;
use ink_interview::{
    ArtifactWriter, Cursor, EngineConfig, InterviewError, InterviewSession, SessionState,
    SessionStatus,
};
use proptest::prelude::*;
use tempfile::TempDir;

fn session(dir: &TempDir, script: &str) -> InterviewSession {
    let registry = Arc::new(ScriptRegistry::builtin().unwrap());
    let config = EngineConfig::default().with_root(dir.path());
    InterviewSession::new(registry, script, &config).unwrap()
}

#[test]
fn character_interview_exports_continuous_and_summary() {
    let dir = TempDir::new().unwrap();
    let mut s = session(&dir, "character_development");
    s.process("skip").unwrap();
    s.process("Elena Vasquez").unwrap();
    s.process("The rival who becomes an ally").unwrap();

    let reply = s.process("export").unwrap();
    let continuous = fs::read_to_string(&reply.paths[0]).unwrap();
    let summary = fs::read_to_string(&reply.paths[1]).unwrap();

    assert!(continuous.contains("Elena Vasquez"));
    assert!(continuous.contains("The rival who becomes an ally"));
    assert!(summary.contains("Character: Elena Vasquez"));
    assert!(summary.contains("Role: The rival who becomes an ally"));

    let progress =
        fs::read_to_string(dir.path().join("book-memory-bank/Core/progress.md")).unwrap();
    assert!(progress.contains("[character_development] exported"));
}

#[test]
fn repeated_menu_bundles_each_time() {
    let dir = TempDir::new().unwrap();
    let mut s = session(&dir, "style");
    s.process("Close third person").unwrap();

    s.process("menu").unwrap();
    s.process("1").unwrap();
    s.process("menu").unwrap();

    assert_eq!(s.state().bundle_version, 2);
    let versions: Vec<u32> = s.history().all().iter().map(|b| b.version).collect();
    assert_eq!(versions, vec![1, 2]);
    assert!(dir.path().join("Versions/style_v1.md").exists());
    assert!(dir.path().join("Versions/style_v2.md").exists());
    assert_eq!(s.state().answers().len(), 1);
    assert_eq!(s.state().answers()[0].text, "Close third person");
}

#[test]
fn bundle_file_records_transcript() {
    let dir = TempDir::new().unwrap();
    let mut s = session(&dir, "style");
    s.process("Close third person").unwrap();
    let reply = s.process("bundle").unwrap();

    let text = fs::read_to_string(&reply.paths[0]).unwrap();
    assert!(text.starts_with("# style v1"));
    assert!(text.contains("Close third person"));
}

#[test]
fn bundles_from_two_sessions_never_overwrite() {
    let dir = TempDir::new().unwrap();
    let mut first = session(&dir, "style");
    let mut second = session(&dir, "style");
    first.process("First voice").unwrap();
    second.process("Second voice").unwrap();

    let a = first.process("bundle").unwrap();
    let b = second.process("bundle").unwrap();

    assert_ne!(a.paths[0], b.paths[0]);
    assert!(fs::read_to_string(&a.paths[0]).unwrap().contains("First voice"));
    assert!(fs::read_to_string(&b.paths[0]).unwrap().contains("Second voice"));
    assert!(
        b.paths[0]
            .to_string_lossy()
            .contains(&second.state().short_id())
    );
}

#[test]
fn resolving_unknown_todo_leaves_list_alone() {
    let dir = TempDir::new().unwrap();
    let mut s = session(&dir, "editing");
    s.process("todo 3 Use stronger delivery").unwrap();

    let err = s.process("resolve 3A").unwrap_err();
    assert!(matches!(err, InterviewError::UnknownTodo(ref id) if id == "3A"));
    assert_eq!(s.todos().get("3.1").unwrap().status, TodoStatus::Open);
    assert!(
        !dir.path()
            .join("book-memory-bank/Core/progress.md")
            .exists()
    );
}

#[test]
fn resolving_twice_is_rejected() {
    let dir = TempDir::new().unwrap();
    let mut s = session(&dir, "editing");
    s.process("todo 3 Use stronger delivery").unwrap();
    s.process("resolve 3.1").unwrap();

    let err = s.process("resolve 3.1").unwrap_err();
    assert!(matches!(err, InterviewError::AlreadyResolved(_)));
    assert_eq!(s.todos().open_count(), 0);

    let progress =
        fs::read_to_string(dir.path().join("book-memory-bank/Core/progress.md")).unwrap();
    assert_eq!(progress.lines().count(), 1);
    assert!(progress.contains("resolved todo 3.1: Use stronger delivery"));
}

#[test]
fn todo_ids_count_per_chapter() {
    let dir = TempDir::new().unwrap();
    let mut s = session(&dir, "editing");
    s.process("todo 3 One").unwrap();
    s.process("todo 4 Two").unwrap();
    s.process("todo 3 Three").unwrap();

    let ids: Vec<&str> = s.todos().all().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["3.1", "4.1", "3.2"]);
}

#[test]
fn reset_keeps_identity_and_import() {
    let dir = TempDir::new().unwrap();
    let mut s = session(&dir, "character_development");
    s.process("Character: Elena Vasquez").unwrap();
    let session_id = s.state().session_id;

    s.process("reset").unwrap();
    assert!(s.state().answers().is_empty());
    assert_eq!(s.state().script_id, "character_development");
    assert_eq!(s.state().session_id, session_id);
    assert_eq!(
        s.state().imported_text.as_deref(),
        Some("Character: Elena Vasquez")
    );
    assert_eq!(s.state().cursor, Cursor::START);
    assert_eq!(s.state().status, SessionStatus::Active);
}

#[test]
fn failed_bundle_blocks_destructive_commands() {
    let dir = TempDir::new().unwrap();
    let mut s = session(&dir, "editing");
    s.process("3").unwrap();
    let cursor = s.state().cursor;

    // A plain file where the bundle directory should go.
    fs::write(dir.path().join("Versions"), "not a directory").unwrap();

    for command in ["menu", "reload", "start over"] {
        let err = s.process(command).unwrap_err();
        assert!(
            matches!(err, InterviewError::Persistence { .. }),
            "{command}: {err}"
        );
        assert_eq!(s.state().cursor, cursor);
        assert_eq!(s.state().answers().len(), 1);
        assert_eq!(s.state().bundle_version, 0);
        assert!(s.history().is_empty());
    }
}

#[test]
fn failed_todo_write_adds_nothing() {
    let dir = TempDir::new().unwrap();
    let mut s = session(&dir, "editing");
    let bank = dir.path().join("book-memory-bank");
    fs::create_dir_all(&bank).unwrap();
    fs::write(bank.join("Chapter_Todos"), "not a directory").unwrap();

    let err = s.process("todo 3 Use stronger delivery").unwrap_err();
    assert!(matches!(err, InterviewError::Persistence { .. }));
    assert!(s.todos().is_empty());
    assert!(matches!(
        s.process("resolve 3.1").unwrap_err(),
        InterviewError::UnknownTodo(_)
    ));

    fs::remove_file(bank.join("Chapter_Todos")).unwrap();
    s.process("todo 3 Use stronger delivery").unwrap();
    let ids: Vec<&str> = s.todos().all().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["3.1"]);
}

#[test]
fn sessions_sharing_a_chapter_get_distinct_todo_ids() {
    let dir = TempDir::new().unwrap();
    let mut first = session(&dir, "editing");
    let mut second = session(&dir, "editing");

    first.process("todo 3 Fix the opening").unwrap();
    second.process("todo 3 Cut the flashback").unwrap();
    assert_eq!(first.todos().all()[0].id, "3.1");
    assert_eq!(second.todos().all()[0].id, "3.2");

    second.process("resolve 3.2").unwrap();
    assert!(matches!(
        second.process("resolve 3.1").unwrap_err(),
        InterviewError::UnknownTodo(_)
    ));

    let file =
        fs::read_to_string(dir.path().join("book-memory-bank/Chapter_Todos/3.md")).unwrap();
    assert_eq!(
        file.lines().collect::<Vec<_>>(),
        vec![
            "- [ ] 3.1: Fix the opening",
            "- [ ] 3.2: Cut the flashback",
            "- [x] 3.2: Cut the flashback (resolved)",
        ]
    );
}

#[test]
fn export_continues_or_ends_by_script() {
    let dir = TempDir::new().unwrap();

    let mut style = session(&dir, "style");
    style.process("Close third").unwrap();
    assert!(!style.process("export").unwrap().is_ended());
    assert!(style.process("Past tense").is_ok());

    let mut scene = session(&dir, "scene");
    scene.process("Mara").unwrap();
    assert!(scene.process("export").unwrap().is_ended());
    assert!(matches!(
        scene.process("status").unwrap_err(),
        InterviewError::SessionEnded
    ));
}

#[test]
fn concurrent_progress_appends_stay_whole() {
    let dir = TempDir::new().unwrap();
    let registry = ScriptRegistry::builtin().unwrap();
    let script = registry.load("editing").unwrap();

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let writer = ArtifactWriter::new(dir.path());
            let script = script.clone();
            thread::spawn(move || {
                let state = SessionState::new(&script.id, SessionStatus::Active);
                for n in 0..25 {
                    writer
                        .append_progress(&script, &state, &format!("worker {worker} entry {n}"))
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let log = fs::read_to_string(dir.path().join("book-memory-bank/Core/progress.md")).unwrap();
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines.len(), 200);
    for line in lines {
        assert!(line.starts_with("- "), "{line}");
        assert!(line.contains("[editing] worker "), "{line}");
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn bundle_versions_strictly_increase(ops in prop::collection::vec(0u8..3, 1..8)) {
        let dir = TempDir::new().unwrap();
        let mut s = session(&dir, "style");
        s.process("Close third person").unwrap();

        for op in &ops {
            let command = match op {
                0 => "bundle",
                1 => "menu",
                _ => "reload",
            };
            s.process(command).unwrap();
        }

        let versions: Vec<u32> = s.history().all().iter().map(|b| b.version).collect();
        let expected: Vec<u32> = (1..=ops.len() as u32).collect();
        prop_assert_eq!(versions, expected);
        prop_assert_eq!(s.state().bundle_version, ops.len() as u32);
        prop_assert_eq!(s.state().answers().len(), 1);
    }
}
