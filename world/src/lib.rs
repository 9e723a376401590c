#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative level state for Snack Attack.
//!
//! Adapters mutate the world only through [`apply`], which consumes a
//! [`Command`] and appends the resulting [`Event`] values. Read access goes
//! through the [`query`] module. All randomness comes from a ChaCha8 stream
//! seeded by [`WorldConfig::seed`], so a command script always replays to the
//! same event log.

use std::time::Duration;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use snack_attack_core::{
    Actor, BarrierId, Command, Direction, EnemyId, EnemyKind, Event, LevelLayout, OccupancyGrid,
    ScaledCoord, Steering, TileRect,
};
use snack_attack_system_movement::{Mover, Step};
use snack_attack_system_navigation::{Enemy, Surroundings};
use snack_attack_system_pathfinding::{compute_flow_field, FlowField, NavGraph};

/// Tunables fixed for the lifetime of a world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldConfig {
    /// Where the player starts and respawns.
    pub player_spawn: ScaledCoord,
    /// Speed of the player and enemies in grid units per second.
    pub speed: f64,
    /// Side of the hit box shared by the player and enemies.
    pub hit_width: u32,
    /// Seed of the random stream driving enemy decisions.
    pub seed: u64,
}

impl WorldConfig {
    /// Configuration that spawns the player on the first painted tile.
    #[must_use]
    pub fn for_layout(layout: &LevelLayout, speed: f64, seed: u64) -> Self {
        Self {
            player_spawn: layout.path()[0],
            speed,
            hit_width: layout.tile_width(),
            seed,
        }
    }
}

/// Barrier item that hides the player and turns enemies around.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Barrier {
    id: BarrierId,
    rect: TileRect,
}

impl Barrier {
    /// Identifier assigned when the barrier was placed.
    #[must_use]
    pub const fn id(&self) -> BarrierId {
        self.id
    }

    /// Area covered by the barrier.
    #[must_use]
    pub const fn rect(&self) -> TileRect {
        self.rect
    }
}

#[derive(Clone, Debug)]
struct EnemySlot {
    id: EnemyId,
    spawn: ScaledCoord,
    enemy: Enemy,
}

/// Represents the authoritative state of one level.
#[derive(Debug)]
pub struct World {
    layout: LevelLayout,
    grid: OccupancyGrid,
    graph: NavGraph,
    flow: Option<FlowField>,
    config: WorldConfig,
    player: Mover,
    projectile: Option<Mover>,
    enemies: Vec<EnemySlot>,
    barriers: Vec<Barrier>,
    next_enemy: u32,
    next_barrier: u32,
    rng: ChaCha8Rng,
    tick_index: u64,
}

impl World {
    /// Creates a world for the layout with the player at its spawn point.
    #[must_use]
    pub fn new(layout: LevelLayout, config: WorldConfig) -> Self {
        let grid = layout.grid();
        let graph = NavGraph::build(layout.path(), layout.tile_width());
        let player = Mover::new(
            config.player_spawn,
            layout.tile_width(),
            config.hit_width,
            config.speed,
        );

        Self {
            grid,
            graph,
            flow: None,
            player,
            projectile: None,
            enemies: Vec::new(),
            barriers: Vec::new(),
            next_enemy: 0,
            next_barrier: 0,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            tick_index: 0,
            layout,
            config,
        }
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        self.tick_index = self.tick_index.saturating_add(1);
        out_events.push(Event::TimeAdvanced { dt });

        self.tick_player(dt, out_events);
        self.tick_projectile(dt, out_events);
        self.tick_enemies(dt, out_events);

        if let Some(slot) = self
            .enemies
            .iter()
            .find(|slot| slot.enemy.mover().collides_with(&self.player))
        {
            out_events.push(Event::PlayerCaught { enemy: slot.id });
        }
    }

    fn tick_player(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let from = self.player.center();
        let step = self.player.tick(&self.grid, dt);
        report_step(Actor::Player, from, &self.player, step, out_events);

        let landed = self.player.center();
        if step.moved == 0 || !self.graph.contains(landed) {
            return;
        }
        if self.flow.as_ref().is_some_and(|flow| flow.goal() == landed) {
            return;
        }

        self.flow = compute_flow_field(&self.graph, landed);
        if self.flow.is_some() {
            tracing::debug!(x = landed.x(), y = landed.y(), "flow field rebuilt");
            out_events.push(Event::FlowFieldRebuilt { goal: landed });
        }
    }

    fn tick_projectile(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let Some(projectile) = self.projectile.as_mut() else {
            return;
        };

        let from = projectile.center();
        let step = projectile.tick(&self.grid, dt);
        report_step(Actor::Projectile, from, projectile, step, out_events);

        let struck = self
            .enemies
            .iter()
            .position(|slot| slot.enemy.mover().collides_with(projectile));
        if !step.stopped && struck.is_none() {
            return;
        }

        let at = projectile.center();
        self.projectile = None;
        if let Some(index) = struck {
            let slot = &self.enemies[index];
            let destroyed = slot.enemy.profile().can_be_damaged;
            out_events.push(Event::EnemyHit {
                enemy: slot.id,
                destroyed,
            });
            if destroyed {
                let _ = self.enemies.remove(index);
            }
        }
        out_events.push(Event::ProjectileSpent { at });
    }

    fn tick_enemies(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let barrier_rects: Vec<TileRect> = self.barriers.iter().map(Barrier::rect).collect();
        let surroundings = Surroundings {
            grid: &self.grid,
            target: Some(&self.player),
            barriers: &barrier_rects,
            flow: self.flow.as_ref(),
        };

        for slot in &mut self.enemies {
            let hit = slot.enemy.mover().hit_rect();
            let blocking = self
                .barriers
                .iter()
                .find(|barrier| barrier.rect.intersects(&hit));
            match blocking {
                None => slot.enemy.clear_deflection(),
                Some(barrier) => {
                    // Deflect on the tick the enemy would step further in.
                    let imminent = slot.enemy.mover().is_step_imminent(dt);
                    if imminent && slot.enemy.deflect() {
                        tracing::debug!(
                            enemy = slot.id.get(),
                            barrier = barrier.id.get(),
                            "enemy deflected"
                        );
                        out_events.push(Event::EnemyDeflected {
                            enemy: slot.id,
                            barrier: barrier.id,
                        });
                    }
                }
            }

            let decision = slot.enemy.plan(&surroundings, dt, &mut self.rng);
            tracing::trace!(enemy = slot.id.get(), ?decision, "enemy planned");

            let from = slot.enemy.mover().center();
            let step = slot.enemy.mover_mut().tick(&self.grid, dt);
            report_step(Actor::Enemy(slot.id), from, slot.enemy.mover(), step, out_events);
        }
    }

    fn launch_projectile(&mut self, out_events: &mut Vec<Event>) {
        if self.projectile.is_some() {
            return;
        }

        let direction = self
            .player
            .motion()
            .or(self.player.heading())
            .unwrap_or(Direction::East);
        let width = (self.layout.tile_width() / 4).max(1);
        let at = self.player.center().offset(direction, width as i32);

        let mut projectile = Mover::new(at, width, width, self.config.speed * 2.0);
        projectile.steer(Steering::Toward(direction));
        self.projectile = Some(projectile);
        out_events.push(Event::ProjectileLaunched { at, direction });
    }

    fn spawn_enemy(&mut self, kind: EnemyKind, at: ScaledCoord, out_events: &mut Vec<Event>) {
        let id = EnemyId::new(self.next_enemy);
        self.next_enemy = self.next_enemy.saturating_add(1);

        let mover = Mover::new(
            at,
            self.layout.tile_width(),
            self.config.hit_width,
            self.config.speed,
        );
        self.enemies.push(EnemySlot {
            id,
            spawn: at,
            enemy: Enemy::new(kind, mover),
        });
        out_events.push(Event::EnemySpawned { enemy: id, kind, at });
    }

    fn place_barrier(&mut self, at: ScaledCoord, out_events: &mut Vec<Event>) {
        let id = BarrierId::new(self.next_barrier);
        self.next_barrier = self.next_barrier.saturating_add(1);
        self.barriers.push(Barrier {
            id,
            rect: TileRect::centered(at, self.layout.tile_width()),
        });
        out_events.push(Event::BarrierPlaced { barrier: id, at });
    }

    fn respawn_actors(&mut self, out_events: &mut Vec<Event>) {
        self.player.place(self.config.player_spawn);
        for slot in &mut self.enemies {
            slot.enemy.respawn(slot.spawn);
        }
        self.projectile = None;
        self.flow = None;
        out_events.push(Event::ActorsRespawned);
    }
}

fn report_step(
    actor: Actor,
    from: ScaledCoord,
    mover: &Mover,
    step: Step,
    out_events: &mut Vec<Event>,
) {
    if step.moved > 0 {
        out_events.push(Event::ActorMoved {
            actor,
            from,
            to: mover.center(),
        });
    }
    if step.stopped {
        out_events.push(Event::ActorStopped { actor });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::SteerPlayer { steering } => world.player.steer(steering),
        Command::Tick { dt } => world.tick(dt, out_events),
        Command::LaunchProjectile => world.launch_projectile(out_events),
        Command::RespawnActors => world.respawn_actors(out_events),
        Command::SpawnEnemy { kind, at } => world.spawn_enemy(kind, at, out_events),
        Command::PlaceBarrier { at } => world.place_barrier(at, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use snack_attack_core::{EnemyId, EnemyKind, LevelLayout, OccupancyGrid, ScaledCoord};
    use snack_attack_system_movement::Mover;
    use snack_attack_system_navigation::Enemy;
    use snack_attack_system_pathfinding::{FlowField, NavGraph};

    use super::{Barrier, World};

    /// Layout the world was built from.
    #[must_use]
    pub fn layout(world: &World) -> &LevelLayout {
        &world.layout
    }

    /// Occupancy grid shared by every entity.
    #[must_use]
    pub fn grid(world: &World) -> &OccupancyGrid {
        &world.grid
    }

    /// Navigation graph built from the painted path.
    #[must_use]
    pub fn nav_graph(world: &World) -> &NavGraph {
        &world.graph
    }

    /// Flow field toward the player's last node, once one has been reached.
    #[must_use]
    pub fn flow_field(world: &World) -> Option<&FlowField> {
        world.flow.as_ref()
    }

    /// Player kinematics.
    #[must_use]
    pub fn player(world: &World) -> &Mover {
        &world.player
    }

    /// Projectile kinematics while one is in flight.
    #[must_use]
    pub fn projectile(world: &World) -> Option<&Mover> {
        world.projectile.as_ref()
    }

    /// Enemy with the provided identifier, if it is still in play.
    #[must_use]
    pub fn enemy(world: &World, id: EnemyId) -> Option<&Enemy> {
        world
            .enemies
            .iter()
            .find(|slot| slot.id == id)
            .map(|slot| &slot.enemy)
    }

    /// Barriers in placement order.
    #[must_use]
    pub fn barriers(world: &World) -> &[Barrier] {
        &world.barriers
    }

    /// Number of ticks processed so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Captures a read-only view of the enemies in play.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        let mut snapshots: Vec<EnemySnapshot> = world
            .enemies
            .iter()
            .map(|slot| EnemySnapshot {
                id: slot.id,
                kind: slot.enemy.kind(),
                center: slot.enemy.mover().center(),
                has_seen_target: slot.enemy.has_seen_target(),
                path_finding: slot.enemy.is_path_finding(),
            })
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        EnemyView { snapshots }
    }

    /// Read-only snapshot describing all enemies in play.
    #[derive(Clone, Debug)]
    pub struct EnemyView {
        snapshots: Vec<EnemySnapshot>,
    }

    impl EnemyView {
        /// Iterator over the captured snapshots in identifier order.
        pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
            self.snapshots.iter()
        }

        /// Number of enemies in play.
        #[must_use]
        pub fn len(&self) -> usize {
            self.snapshots.len()
        }

        /// Reports whether no enemy is in play.
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.snapshots.is_empty()
        }

        /// Consumes the view, yielding the underlying snapshots.
        pub fn into_vec(self) -> Vec<EnemySnapshot> {
            self.snapshots
        }
    }

    /// Immutable representation of a single enemy used for queries.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct EnemySnapshot {
        /// Identifier assigned at spawn.
        pub id: EnemyId,
        /// Enemy variant.
        pub kind: EnemyKind,
        /// Current centre.
        pub center: ScaledCoord,
        /// Whether the enemy has spotted the player since its last reset.
        pub has_seen_target: bool,
        /// Whether the enemy is steering by the flow field.
        pub path_finding: bool,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corridor_world() -> World {
        let path = (0..8).map(|step| ScaledCoord::new(2 + 4 * step, 2)).collect();
        let layout = LevelLayout::new(32, 4, 4, path).expect("corridor fits");
        let config = WorldConfig::for_layout(&layout, 8.0, 17);
        World::new(layout, config)
    }

    #[test]
    fn config_spawns_player_on_first_tile() {
        let world = corridor_world();
        assert_eq!(query::player(&world).center(), ScaledCoord::new(2, 2));
        assert_eq!(query::nav_graph(&world).len(), 8);
    }

    #[test]
    fn steering_takes_effect_on_the_next_tick() {
        let mut world = corridor_world();
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::SteerPlayer {
                steering: Steering::Toward(Direction::East),
            },
            &mut events,
        );
        assert!(events.is_empty());

        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(125),
            },
            &mut events,
        );
        assert_eq!(
            events,
            vec![
                Event::TimeAdvanced {
                    dt: Duration::from_millis(125)
                },
                Event::ActorMoved {
                    actor: Actor::Player,
                    from: ScaledCoord::new(2, 2),
                    to: ScaledCoord::new(3, 2),
                },
            ]
        );
        assert_eq!(query::tick_index(&world), 1);
    }

    #[test]
    fn second_projectile_waits_for_the_first() {
        let mut world = corridor_world();
        let mut events = Vec::new();

        apply(&mut world, Command::LaunchProjectile, &mut events);
        apply(&mut world, Command::LaunchProjectile, &mut events);

        assert_eq!(
            events,
            vec![Event::ProjectileLaunched {
                at: ScaledCoord::new(3, 2),
                direction: Direction::East,
            }]
        );
    }
}
