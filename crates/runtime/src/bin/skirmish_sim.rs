//! Headless skirmish harness.
//!
//! Loads content, pits a player against two training dummies and plays it out for
//! `SKIRMISH_DURATION` seconds. Every bullet in flight is relayed as a collision
//! with the first dummy still standing, which stands in for real collision
//! detection.
//!
//! ```bash
//! SKIRMISH_DURATION=5 RUST_LOG=debug cargo run -p skirmish-runtime --bin skirmish-sim
//! ```

use anyhow::{Context, Result};
use skirmish_content::{Content, ContentFactory};
use skirmish_core::{Controller, Entity, EntityEvent, EntityId, EntityStats, EventLog, Faction};
use skirmish_runtime::{BulletId, RuntimeConfig, Simulation, setup_logging};

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let runtime_config = RuntimeConfig::from_env();
    let _guard = setup_logging(runtime_config.log_dir.as_deref())?;

    let content = ContentFactory::new(runtime_config.content_dir.clone())
        .load_all()
        .with_context(|| {
            format!(
                "loading content from {}",
                runtime_config.content_dir.display()
            )
        })?;
    let config = runtime_config.apply(content.config.clone());
    tracing::info!(
        timestep = config.fixed_timestep,
        duration = runtime_config.duration,
        "starting skirmish"
    );

    let mut sim = Simulation::new(config.clone());
    let player = sim.spawn_controller(player(&content, EntityId(0))?)?;
    let log = EventLog::new();
    let mut dummies = Vec::new();
    for _ in 0..2 {
        let id = sim.spawn(
            EntityStats::builder()
                .affiliation(Faction::ENEMY)
                .health(120.0)
                .shield(30.0)
                .shield_regen(10.0, 2.0)
                .config(&config)
                .build(),
        );
        if let Some(entity) = sim.entity_mut(id) {
            entity.register_listener(log.clone());
            entity.add_status(content.statuses.instantiate_from("burn", Some(player))?)?;
        }
        dummies.push(id);
    }

    while sim.elapsed() < runtime_config.duration {
        if let Some(controller) = sim.controller_mut(player) {
            controller.use_ability_by_name("firebolt")?;
        }

        sim.advance(config.fixed_timestep);

        let target = dummies
            .iter()
            .copied()
            .find(|id| sim.entity(*id).is_some_and(Entity::is_alive));
        let Some(target) = target else {
            tracing::info!(elapsed = sim.elapsed(), "every dummy is down");
            break;
        };
        let in_flight: Vec<BulletId> = sim.bullets().map(|(id, _)| id).collect();
        for snapshot in sim.relay_collisions(in_flight.into_iter().map(|id| (id, target))) {
            tracing::debug!(
                victim = %snapshot.victim,
                health_damage = snapshot.health_damage,
                shield_damage = snapshot.shield_damage,
                "bolt hit"
            );
        }
    }

    for id in dummies {
        if let Some(entity) = sim.entity(id) {
            tracing::info!(
                entity = %id,
                health = entity.stats().health(),
                shield = entity.stats().shield(),
                alive = entity.is_alive(),
                "dummy"
            );
        }
    }
    tracing::info!(
        steps = sim.steps(),
        elapsed = sim.elapsed(),
        hits = log.count(|e| matches!(e, EntityEvent::DamageTaken(_))),
        deaths = log.count(|e| matches!(e, EntityEvent::Died { .. })),
        "skirmish finished"
    );
    Ok(())
}

fn player(content: &Content, id: EntityId) -> Result<Controller> {
    let entity = Entity::new(
        id,
        EntityStats::builder()
            .affiliation(Faction::PLAYER)
            .health(100.0)
            .config(&content.config)
            .build(),
    );
    let mut controller = Controller::new(entity);
    controller.add_ability(content.abilities.instantiate("firebolt", &content.statuses)?)?;
    controller
        .entity_mut()
        .add_status(content.statuses.instantiate("bloodthirst")?)?;
    Ok(controller)
}
