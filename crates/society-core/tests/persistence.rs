//! Save and load round trips.

use std::fs;

use society_core::components::SADNESS;
use society_core::output::{read_document, SaveDocument};
use society_core::{SocietyController, SocietyError, World};
use society_events::ControlRequest;

fn busy_world() -> World {
    let mut world = World::with_seed(17, 10);
    for _ in 0..40 {
        world.step();
    }
    world.add_rule("share the harvest");
    world
}

#[test]
fn test_full_round_trip() {
    let world = busy_world();
    let json = world.to_document().to_json().unwrap();

    let mut restored = World::with_seed(99, 2);
    restored.load_snapshot(&json).unwrap();

    assert_eq!(
        serde_json::to_value(world.snapshot()).unwrap(),
        serde_json::to_value(restored.snapshot()).unwrap()
    );
    assert_eq!(restored.relationships(), world.relationships());
    for (a, b) in world.agents().iter().zip(restored.agents()) {
        assert_eq!(a.id, b.id);
        assert_eq!(a.memory, b.memory);
        assert_eq!(a.diary, b.diary);
        assert_eq!(a.emotions, b.emotions);
        assert_eq!(a.artifacts.len(), b.artifacts.len());
    }
    assert_eq!(restored.run_id(), world.run_id());
}

#[test]
fn test_ids_stay_unique_after_load() {
    let mut world = World::with_seed(3, 4);
    world.agent_mut("agent_3").unwrap().emotions.set(SADNESS, 1.0);
    world.step();
    let json = world.to_document().to_json().unwrap();

    let mut restored = World::with_seed(3, 0);
    restored.load_snapshot(&json).unwrap();
    let child = restored.inherit_experience("agent_0").unwrap();
    assert_eq!(child, "agent_4");
}

#[test]
fn test_invalid_documents_rejected_without_side_effects() {
    let world = busy_world();
    let mut target = World::with_seed(1, 3);
    let before = serde_json::to_value(target.snapshot()).unwrap();

    let mut duplicate = world.to_document();
    if let Some(first) = duplicate.agents.first().cloned() {
        duplicate.agents.push(first);
    }
    assert!(matches!(
        target.load_document(duplicate),
        Err(SocietyError::MalformedState(_))
    ));

    let mut bad_event = world.to_document();
    bad_event.environment.recent_events.push("meteor".to_string());
    assert!(target.load_document(bad_event).is_err());

    let mut missing = serde_json::to_value(world.to_document()).unwrap();
    missing.as_object_mut().unwrap().remove("environment");
    assert!(target.load_snapshot(&missing.to_string()).is_err());

    assert_eq!(serde_json::to_value(target.snapshot()).unwrap(), before);
    target.step();
    assert_eq!(target.tick(), 1);
}

#[test]
fn test_save_and_load_through_controller() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("society.json");

    let mut controller = SocietyController::new(busy_world()).with_save_path(&path);
    assert!(controller.handle(ControlRequest::Save { path: None }).is_ok());
    let saved_tick = controller.world().tick();

    for _ in 0..5 {
        controller.handle(ControlRequest::Step);
    }
    assert!(controller.handle(ControlRequest::Load { path: None }).is_ok());
    assert_eq!(controller.world().tick(), saved_tick);

    let document: SaveDocument = read_document(&path).unwrap();
    assert_eq!(document.tick, saved_tick);
    assert!(document.rules.contains(&"share the harvest".to_string()));
}

#[test]
fn test_load_of_corrupt_file_reports_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{\"version\": 1, \"run_id\": ").unwrap();

    let mut controller = SocietyController::new(World::with_seed(2, 3));
    let response = controller.handle(ControlRequest::Load { path: Some(path) });
    assert!(response.reason().unwrap().starts_with("malformed state"));
    assert!(controller.handle(ControlRequest::Step).is_ok());
}
