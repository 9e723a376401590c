//! Headless run of a level driven by a fixed input script.

use std::fmt;

use snack_attack_core::{Command, Direction, EnemyKind, Event, LevelLayout, Steering};
use snack_attack_world::{self as world, query, World, WorldConfig};

use crate::settings::Settings;

/// Ticks between two player turns in the scripted input.
const TURN_INTERVAL: u64 = 240;
/// Ticks between two projectile launches.
const LAUNCH_INTERVAL: u64 = 360;
const TURN_ORDER: [Direction; 4] = [
    Direction::East,
    Direction::South,
    Direction::West,
    Direction::North,
];

/// Totals gathered from the event stream of one run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Summary {
    pub(crate) ticks: u64,
    pub(crate) moves: u64,
    pub(crate) flow_rebuilds: u64,
    pub(crate) deflections: u64,
    pub(crate) projectiles: u64,
    pub(crate) hits: u64,
    pub(crate) destroyed: u64,
    pub(crate) catches: u64,
    pub(crate) enemies_left: usize,
}

impl Summary {
    fn record(&mut self, event: &Event) {
        match event {
            Event::TimeAdvanced { .. } => self.ticks += 1,
            Event::ActorMoved { .. } => self.moves += 1,
            Event::FlowFieldRebuilt { .. } => self.flow_rebuilds += 1,
            Event::EnemyDeflected { .. } => self.deflections += 1,
            Event::ProjectileLaunched { .. } => self.projectiles += 1,
            Event::EnemyHit { destroyed, .. } => {
                self.hits += 1;
                if *destroyed {
                    self.destroyed += 1;
                }
            }
            Event::PlayerCaught { .. } => self.catches += 1,
            Event::ActorStopped { .. }
            | Event::EnemySpawned { .. }
            | Event::ProjectileSpent { .. }
            | Event::BarrierPlaced { .. }
            | Event::ActorsRespawned => {}
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ticks:          {}", self.ticks)?;
        writeln!(f, "moves:          {}", self.moves)?;
        writeln!(f, "flow rebuilds:  {}", self.flow_rebuilds)?;
        writeln!(f, "deflections:    {}", self.deflections)?;
        writeln!(f, "projectiles:    {}", self.projectiles)?;
        writeln!(f, "hits:           {} ({} destroyed)", self.hits, self.destroyed)?;
        writeln!(f, "player caught:  {}", self.catches)?;
        write!(f, "enemies left:   {}", self.enemies_left)
    }
}

/// Builds a world on `layout`, populates it from the settings and runs it.
pub(crate) fn simulate(layout: LevelLayout, settings: &Settings, ticks: u64) -> Summary {
    let config = WorldConfig::for_layout(&layout, settings.speed(), settings.seed);
    let mut world = World::new(layout, config);
    let mut summary = Summary::default();
    let mut events = Vec::new();

    populate(&mut world, settings, &mut events);
    drain(&mut summary, &mut events);

    let dt = settings.tick_duration();
    for tick in 0..ticks {
        if tick % TURN_INTERVAL == 0 {
            let turn = (tick / TURN_INTERVAL) as usize % TURN_ORDER.len();
            let steering = Steering::Toward(TURN_ORDER[turn]);
            world::apply(&mut world, Command::SteerPlayer { steering }, &mut events);
        }
        if tick % LAUNCH_INTERVAL == LAUNCH_INTERVAL - 1 {
            world::apply(&mut world, Command::LaunchProjectile, &mut events);
        }

        world::apply(&mut world, Command::Tick { dt }, &mut events);
        let caught = events
            .iter()
            .any(|event| matches!(event, Event::PlayerCaught { .. }));
        if caught {
            tracing::info!(tick, "player caught; respawning actors");
            world::apply(&mut world, Command::RespawnActors, &mut events);
        }
        drain(&mut summary, &mut events);
    }

    summary.enemies_left = query::enemy_view(&world).len();
    summary
}

/// Spawns the configured enemies spread along the path and drops a barrier
/// halfway along it.
fn populate(world: &mut World, settings: &Settings, events: &mut Vec<Event>) {
    let path = query::layout(world).path().to_vec();
    let counts = settings.enemies;
    let kinds = std::iter::repeat(EnemyKind::Wanderer)
        .take(counts.wanderer as usize)
        .chain(std::iter::repeat(EnemyKind::Tracker).take(counts.tracker as usize))
        .chain(std::iter::repeat(EnemyKind::Invincible).take(counts.invincible as usize));

    // Spawn points walk backwards from the far end of the path.
    let stride = (path.len() / 8).max(1);
    for (index, kind) in kinds.enumerate() {
        let slot = path.len() - 1 - (index * stride) % path.len();
        let at = path[slot];
        world::apply(world, Command::SpawnEnemy { kind, at }, events);
    }

    let at = path[path.len() / 2];
    world::apply(world, Command::PlaceBarrier { at }, events);
}

fn drain(summary: &mut Summary, events: &mut Vec<Event>) {
    for event in events.drain(..) {
        tracing::trace!(?event, "world event");
        summary.record(&event);
    }
}
