use std::fs;
use std::path::Path;

use skirmish_content::{ContentFactory, StatusLoader};
use skirmish_core::{AiControl, Controller, DamageFlags, Entity, EntityId, EntityStats, Faction};

fn bundled() -> ContentFactory {
    ContentFactory::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("data"))
}

#[test]
fn test_bundled_content_loads() {
    let content = bundled().load_all().expect("bundled data is valid");

    assert_eq!(content.config.fixed_timestep, 0.05);
    assert!(content.statuses.contains("burn"));
    assert!(content.abilities.get("aegis").is_some());

    for name in content.abilities.names() {
        content
            .abilities
            .instantiate(name, &content.statuses)
            .expect("every bundled ability builds");
    }
}

#[test]
fn test_bundled_statuses_behave() {
    let content = bundled().load_all().expect("bundled data is valid");
    let mut target = Entity::new(
        EntityId(1),
        EntityStats::builder().health(100.0).shield(40.0).build(),
    );

    let burn = || content.statuses.instantiate("burn").expect("burn builds");
    target.add_status(burn()).expect("applies");
    target.add_status(burn()).expect("stacks");

    // Two stacks at 3/s ignore the shield.
    target.tick(0.5);
    assert_eq!(target.stats().health(), 97.0);
    assert_eq!(target.stats().shield(), 40.0);

    target
        .add_status(content.statuses.instantiate("last_stand").expect("builds"))
        .expect("applies");
    let snapshot = target.take_damage(500.0, DamageFlags::IGNORE_SHIELD);
    assert!(!snapshot.victim_died);
    assert!(target.is_alive());
}

#[test]
fn test_bundled_channel_ability() {
    let content = bundled().load_all().expect("bundled data is valid");
    let aegis = content
        .abilities
        .instantiate("aegis", &content.statuses)
        .expect("aegis builds")
        .with_cooldown_completed()
        .with_control(AiControl::new());

    let mut hero = Controller::new(Entity::new(
        EntityId(0),
        EntityStats::builder().affiliation(Faction::PLAYER).build(),
    ))
    .with_ability(aegis)
    .expect("slot available");

    hero.control_mut("aegis").expect("has control").press();
    hero.tick(0.05);
    assert!(hero.entity().is_invincible());

    hero.control_mut("aegis").expect("has control").release();
    hero.tick(0.05);
    assert!(!hero.entity().is_invincible());
}

#[test]
fn test_catalog_files_round_trip_through_disk() {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::write(
        dir.path().join("statuses.ron"),
        r#"(statuses: [(name: "slow", duration: 1.0, components: [Movespeed(factor: 0.5)])])"#,
    )
    .expect("write statuses");
    fs::write(
        dir.path().join("abilities.ron"),
        r#"(abilities: [(name: "frost", cooldown: 3.0, behavior: Channel(status: "slow"))])"#,
    )
    .expect("write abilities");
    fs::write(dir.path().join("config.toml"), "max_steps_per_frame = 2\n").expect("write config");

    let content = ContentFactory::new(dir.path()).load_all().expect("valid content");
    assert_eq!(content.config.max_steps_per_frame, 2);
    assert_eq!(content.statuses.len(), 1);
    assert_eq!(content.abilities.len(), 1);

    let broken = dir.path().join("broken.ron");
    fs::write(&broken, "(statuses: [").expect("write broken file");
    let err = StatusLoader::load(&broken).unwrap_err();
    assert!(err.to_string().contains("Failed to parse status catalog RON"));

    let missing = StatusLoader::load(&dir.path().join("missing.ron")).unwrap_err();
    assert!(missing.to_string().contains("Failed to read file"));
}
