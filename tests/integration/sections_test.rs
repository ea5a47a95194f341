//! Section collection behavior through a session.

use abloop::engine::ScriptedEngine;
use abloop::sections::{ImportError, ImportOutcome};
use abloop::storage::{FileStore, MemoryStore};
use abloop::{Bounds, Session};
use tempfile::TempDir;

use crate::helpers::{ready_session, session_with_store, OTHER_VIDEO, VIDEO};

fn save(s: &mut Session<ScriptedEngine>, name: &str, a: f64, b: f64) -> String {
    s.set_a(Some(0.0));
    s.set_b(Some(b));
    s.set_a(Some(a));
    s.save_section(Some(name)).unwrap().id
}

fn names(s: &Session<ScriptedEngine>) -> Vec<String> {
    s.sections()
        .sections()
        .iter()
        .map(|sec| sec.name.clone())
        .collect()
}

// ============================================================================
// Ordering and selection
// ============================================================================

#[test]
fn reorder_first_to_last() {
    let mut s = ready_session(ScriptedEngine::with_duration(100.0));
    save(&mut s, "A", 0.0, 10.0);
    save(&mut s, "B", 10.0, 20.0);
    save(&mut s, "C", 20.0, 30.0);

    assert!(s.move_section(0, 2));
    assert_eq!(names(&s), ["B", "C", "A"]);
    assert!(!s.move_section(1, 1));
    assert_eq!(names(&s), ["B", "C", "A"]);
}

#[test]
fn deleting_active_section_keeps_the_rest() {
    let mut s = ready_session(ScriptedEngine::with_duration(100.0));
    save(&mut s, "A", 0.0, 10.0);
    let b = save(&mut s, "B", 10.0, 20.0);
    save(&mut s, "C", 20.0, 30.0);
    let before = s.sections().sections().to_vec();

    s.play_section(&b).unwrap();
    s.delete_section(&b).unwrap();

    assert_eq!(s.sections().active_id(), None);
    assert_eq!(s.sections().sections(), &[before[0].clone(), before[2].clone()]);
}

#[test]
fn section_saved_on_longer_upload_is_clamped() {
    let mut s = ready_session(ScriptedEngine::with_duration(100.0));
    let json = format!(
        r#"{{"videoId":"{}","sections":[{{"id":"long","name":"Outro","startTime":95,"endTime":130}}]}}"#,
        VIDEO
    );
    s.import_sections(&json).unwrap();
    let applied = s.play_section("long").unwrap();
    assert_eq!(applied, Bounds::new(95.0, 100.0));
}

// ============================================================================
// Export / import
// ============================================================================

#[test]
fn export_then_reimport_same_video_is_idempotent() {
    let mut s = ready_session(ScriptedEngine::with_duration(100.0));
    save(&mut s, "Intro", 0.0, 8.0);
    save(&mut s, "Solo", 60.0, 75.0);
    let exported = s.export_sections().unwrap().to_json();

    // Unrelated entry present before the import
    save(&mut s, "Bridge", 40.0, 50.0);

    let outcome = s.import_sections(&exported).unwrap();
    assert_eq!(outcome, ImportOutcome::Merged { added: 0, skipped: 2 });
    let outcome = s.import_sections(&exported).unwrap();
    assert_eq!(outcome, ImportOutcome::Merged { added: 0, skipped: 2 });
    assert_eq!(names(&s), ["Intro", "Solo", "Bridge"]);
}

#[test]
fn import_merges_only_new_entries() {
    let mut s = ready_session(ScriptedEngine::with_duration(100.0));
    save(&mut s, "Intro", 0.0, 8.0);
    let json = format!(
        r#"{{"videoId":"{}","sections":[
            {{"name":"Intro","startTime":0.3,"endTime":7.8}},
            {{"name":"Intro","startTime":1.0,"endTime":8.0}},
            {{"name":"Verse","startTime":8,"endTime":20}}
        ]}}"#,
        VIDEO
    );
    let outcome = s.import_sections(&json).unwrap();
    assert_eq!(outcome, ImportOutcome::Merged { added: 2, skipped: 1 });
    assert_eq!(names(&s), ["Intro", "Intro", "Verse"]);

    let ids: std::collections::HashSet<_> =
        s.sections().sections().iter().map(|sec| sec.id.clone()).collect();
    assert_eq!(ids.len(), 3);
}

#[test]
fn invalid_import_leaves_collection_untouched() {
    let mut s = ready_session(ScriptedEngine::with_duration(100.0));
    save(&mut s, "Keep", 1.0, 2.0);
    let before = s.sections().sections().to_vec();

    let json = format!(
        r#"{{"videoId":"{}","sections":[
            {{"name":"Good","startTime":3,"endTime":4}},
            {{"name":"Flat","startTime":5,"endTime":5}}
        ]}}"#,
        VIDEO
    );
    let err = s.import_sections(&json).unwrap_err();
    assert!(matches!(err, ImportError::InvalidSection { index: 1, .. }));
    assert!(matches!(
        s.import_sections("{ nope").unwrap_err(),
        ImportError::Malformed(_)
    ));
    assert!(matches!(
        s.import_sections(r#"{"videoId":"x"}"#).unwrap_err(),
        ImportError::InvalidFormat
    ));
    assert_eq!(s.sections().sections(), before.as_slice());
}

#[test]
fn import_for_other_video_switches_player_too() {
    let mut s = ready_session(ScriptedEngine::with_duration(100.0));
    save(&mut s, "Mine", 1.0, 2.0);
    let json = format!(
        r#"{{"videoId":"{}","sections":[{{"name":"Theirs","startTime":3,"endTime":4}}]}}"#,
        OTHER_VIDEO
    );
    let outcome = s.import_sections(&json).unwrap();
    assert!(matches!(outcome, ImportOutcome::Replaced { count: 1, switched_to: Some(_) }));
    assert_eq!(s.video_id().unwrap().as_str(), OTHER_VIDEO);
    assert_eq!(s.engine().unwrap().loaded().unwrap().as_str(), OTHER_VIDEO);
    assert_eq!(names(&s), ["Theirs"]);

    // The first video's list is still stored
    s.load_video(VIDEO).unwrap();
    assert_eq!(names(&s), ["Mine"]);
}

#[test]
fn export_is_none_without_sections() {
    let s = ready_session(ScriptedEngine::with_duration(100.0));
    assert!(s.export_sections().is_none());
}

// ============================================================================
// Persistence
// ============================================================================

#[test]
fn sections_survive_a_new_session_on_disk() {
    let temp = TempDir::new().unwrap();
    {
        let mut s = session_with_store(FileStore::new(temp.path()));
        s.bind_engine(ScriptedEngine::with_duration(100.0));
        s.load_video(VIDEO).unwrap();
        s.handle(abloop::Event::Engine(abloop::engine::EngineEvent::Ready));
        save(&mut s, "Kept", 5.0, 9.0);
        s.teardown();
    }
    let mut s = session_with_store(FileStore::new(temp.path()));
    s.load_video(&format!("https://www.youtube.com/watch?v={}", VIDEO))
        .unwrap();
    assert_eq!(names(&s), ["Kept"]);
    assert_eq!(s.sections().sections()[0].bounds(), Bounds::new(5.0, 9.0));
}

#[test]
fn full_store_warns_but_keeps_sections() {
    let mut s = session_with_store(MemoryStore::with_quota(10));
    s.bind_engine(ScriptedEngine::with_duration(100.0));
    s.load_video(VIDEO).unwrap();
    s.handle(abloop::Event::Engine(abloop::engine::EngineEvent::Ready));

    save(&mut s, "Volatile", 1.0, 2.0);
    assert_eq!(s.sections().len(), 1);
    assert!(s.durability_warning().is_some());
}
