use crate::config::Settings;
use crate::entity::{Entity, EntityId, Kind, HITBOX_SIZE};
use crate::spatial::SpatialIndex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

//////////////////////////////////////////////////////////////////////////////
// Simulation Constants
//////////////////////////////////////////////////////////////////////////////

/// Width and height of the visible arena
pub const ARENA_SIZE: f32 = 500.0;
/// Sprites spawn with their top-left corner inside this range on both axes
const SPAWN_MIN: u32 = 10;
const SPAWN_MAX: u32 = 490;
/// Broad-phase radius around a hunter's center. Two 20x20 boxes can only
/// overlap when their centers are closer than the box diagonal.
const CONTACT_RADIUS: f32 = HITBOX_SIZE * std::f32::consts::SQRT_2 + 1.0;

//////////////////////////////////////////////////////////////////////////////
// Movement
//////////////////////////////////////////////////////////////////////////////

/// Displacement of length `speed` from `from` toward `to`.
/// `None` when the two points coincide and there is no direction.
#[inline]
pub fn step_toward(from: [f32; 2], to: [f32; 2], speed: f32) -> Option<[f32; 2]> {
    let dx = to[0] - from[0];
    let dy = to[1] - from[1];
    let dist_sq = dx * dx + dy * dy;

    if dist_sq > 0.0 {
        let scale = speed / dist_sq.sqrt();
        Some([dx * scale, dy * scale])
    } else {
        None
    }
}

/// Where `entity` goes this tick: one step toward the nearest member of its
/// prey group. Sprites only chase; predators are never avoided, and nothing
/// keeps a sprite inside the arena.
pub fn chase(entity: &Entity, prey: &SpatialIndex, speed: f32) -> Option<[f32; 2]> {
    let target = prey.nearest(entity.center())?;
    let [dx, dy] = step_toward(entity.center(), target.position, speed)?;
    Some([entity.x + dx, entity.y + dy])
}

//////////////////////////////////////////////////////////////////////////////
// Collisions
//////////////////////////////////////////////////////////////////////////////

/// One prey sprite taken over by a hunter
#[derive(Clone, Debug, PartialEq)]
pub struct Conversion {
    pub hunter: EntityId,
    pub prey: EntityId,
    /// Id of the entity that replaces the prey in the hunter's group
    pub replacement: EntityId,
    pub kind: Kind,
    pub x: f32,
    pub y: f32,
}

/// Convert every prey overlapped by a hunter into a new member of `kind`.
///
/// Hunters are visited in group order and each one takes every still-free
/// prey it touches, in prey-group order. Replacements join `hunters` after
/// the pass, so they do not hunt until the next tick. `prey_index` must have
/// been built from `prey` as it is now.
fn resolve_pair(
    hunters: &mut Vec<Entity>,
    prey: &mut Vec<Entity>,
    prey_index: &SpatialIndex,
    kind: Kind,
    next_id: &mut EntityId,
) -> Vec<Conversion> {
    debug_assert_eq!(prey_index.len(), prey.len());

    let mut taken = vec![false; prey.len()];
    let mut born = Vec::new();
    let mut conversions = Vec::new();

    for hunter in hunters.iter() {
        for slot in prey_index.within(hunter.center(), CONTACT_RADIUS) {
            if taken[slot] || !hunter.overlaps(&prey[slot]) {
                continue;
            }
            taken[slot] = true;

            let victim = &prey[slot];
            let replacement = Entity::new(*next_id, kind, victim.x, victim.y);
            *next_id += 1;

            conversions.push(Conversion {
                hunter: hunter.id,
                prey: victim.id,
                replacement: replacement.id,
                kind,
                x: victim.x,
                y: victim.y,
            });
            born.push(replacement);
        }
    }

    if !born.is_empty() {
        hunters.extend(born);
        let mut slot = 0;
        prey.retain(|_| {
            let keep = !taken[slot];
            slot += 1;
            keep
        });
    }

    conversions
}

//////////////////////////////////////////////////////////////////////////////
// World Implementation
//////////////////////////////////////////////////////////////////////////////

/// All live sprites of one round, grouped by kind
pub struct World {
    settings: Settings,
    groups: [Vec<Entity>; 3],
    snapshots: [SpatialIndex; 3],
    next_id: EntityId,
    rng: StdRng,
    tick: u64,
}

impl World {
    /// Creates a round with `settings.population()` sprites of each kind at
    /// random positions
    pub fn new(settings: Settings) -> Self {
        let rng = match settings.seed() {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut world = World {
            settings,
            groups: Default::default(),
            snapshots: Default::default(),
            next_id: 0,
            rng,
            tick: 0,
        };

        for kind in Kind::ALL {
            world.spawn(kind, settings.population());
        }
        world.rebuild_snapshots();
        world
    }

    fn spawn(&mut self, kind: Kind, count: u32) {
        let group = &mut self.groups[kind.index()];
        group.reserve(count as usize);

        for _ in 0..count {
            let x = self.rng.gen_range(SPAWN_MIN..=SPAWN_MAX) as f32;
            let y = self.rng.gen_range(SPAWN_MIN..=SPAWN_MAX) as f32;
            group.push(Entity::new(self.next_id, kind, x, y));
            self.next_id += 1;
        }
    }

    #[inline]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Ticks simulated so far
    #[inline]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    #[inline]
    pub fn group(&self, kind: Kind) -> &[Entity] {
        &self.groups[kind.index()]
    }

    #[inline]
    pub fn count(&self, kind: Kind) -> usize {
        self.groups[kind.index()].len()
    }

    /// Live sprites across all groups
    pub fn population(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.groups.iter().flatten()
    }

    pub fn rebuild_snapshots(&mut self) {
        for kind in Kind::ALL {
            self.rebuild_snapshot(kind);
        }
    }

    #[inline]
    fn rebuild_snapshot(&mut self, kind: Kind) {
        self.snapshots[kind.index()] = SpatialIndex::from_entities(&self.groups[kind.index()]);
    }

    /// Moves every sprite one step toward its nearest prey. Targets come from
    /// the current snapshots, so every sprite aims at where its prey stood
    /// before anyone moved.
    pub fn move_entities(&mut self) {
        let speed = self.settings.speed() as f32;

        for kind in Kind::ALL {
            let prey_index = &self.snapshots[kind.prey().index()];
            for entity in self.groups[kind.index()].iter_mut() {
                if let Some([x, y]) = chase(entity, prey_index, speed) {
                    entity.x = x;
                    entity.y = y;
                }
            }
        }
    }

    /// Runs the three hunts in fixed order: rock on scissors, scissors on
    /// paper, paper on rock. Snapshots of both groups involved are refreshed
    /// after each hunt.
    pub fn resolve_collisions(&mut self) -> Vec<Conversion> {
        let mut conversions = Vec::new();

        for hunter_kind in Kind::HUNT_ORDER {
            let prey_kind = hunter_kind.prey();
            let mut hunters = std::mem::take(&mut self.groups[hunter_kind.index()]);
            let mut prey = std::mem::take(&mut self.groups[prey_kind.index()]);

            let found = resolve_pair(
                &mut hunters,
                &mut prey,
                &self.snapshots[prey_kind.index()],
                hunter_kind,
                &mut self.next_id,
            );

            self.groups[hunter_kind.index()] = hunters;
            self.groups[prey_kind.index()] = prey;

            if !found.is_empty() {
                self.rebuild_snapshot(hunter_kind);
                self.rebuild_snapshot(prey_kind);
                conversions.extend(found);
            }
        }

        conversions
    }

    /// The kind that holds every sprite, if any
    pub fn winner(&self) -> Option<Kind> {
        let total = self.settings.total();
        Kind::ALL.into_iter().find(|&kind| self.count(kind) == total)
    }

    /// Advances the round by one tick and reports the winner once there is one
    pub fn update(&mut self) -> Option<Kind> {
        self.rebuild_snapshots();
        self.move_entities();
        self.rebuild_snapshots();
        let conversions = self.resolve_collisions();
        self.tick += 1;

        if !conversions.is_empty() {
            trace!(
                tick = self.tick,
                conversions = conversions.len(),
                rock = self.count(Kind::Rock),
                paper = self.count(Kind::Paper),
                scissors = self.count(Kind::Scissors),
                "resolved collisions"
            );
        }

        self.winner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn settings(population: u32, speed: u32) -> Settings {
        Settings::new(population, speed).unwrap().with_seed(Some(1))
    }

    /// A world with hand-placed groups instead of random ones
    fn world_with(settings: Settings, groups: [Vec<Entity>; 3]) -> World {
        let mut world = World::new(settings);
        world.next_id = groups.iter().flatten().map(|e| e.id + 1).max().unwrap_or(0);
        world.groups = groups;
        world.rebuild_snapshots();
        world
    }

    /// `count` sprites of `kind` on a 60px lattice row, far from other rows
    fn row(kind: Kind, first_id: EntityId, count: u32, y: f32) -> Vec<Entity> {
        (0..count)
            .map(|i| Entity::new(first_id + i, kind, 10.0 + (i % 8) as f32 * 60.0, y + (i / 8) as f32 * 40.0))
            .collect()
    }

    fn assert_consistent(world: &World) {
        assert_eq!(world.population(), world.settings().total());
        let mut ids = HashSet::new();
        for kind in Kind::ALL {
            for entity in world.group(kind) {
                assert_eq!(entity.kind, kind);
                assert!(ids.insert(entity.id), "entity {} owned twice", entity.id);
            }
        }
    }

    #[test]
    fn new_world_spawns_each_group_inside_arena() {
        let world = World::new(settings(50, 2));
        for kind in Kind::ALL {
            assert_eq!(world.count(kind), 50);
            assert_eq!(world.snapshots[kind.index()].len(), 50);
        }
        for entity in world.entities() {
            assert!((10.0..=490.0).contains(&entity.x));
            assert!((10.0..=490.0).contains(&entity.y));
        }
        assert_consistent(&world);
        assert_eq!(world.winner(), None);
    }

    #[test]
    fn same_seed_spawns_same_round() {
        let a = World::new(settings(20, 3));
        let b = World::new(settings(20, 3));
        assert!(a.entities().eq(b.entities()));
    }

    #[test]
    fn step_has_exact_speed_magnitude() {
        let [dx, dy] = step_toward([0.0, 0.0], [30.0, 40.0], 5.0).unwrap();
        assert!((dx - 3.0).abs() < 1e-6);
        assert!((dy - 4.0).abs() < 1e-6);

        // never shortened near the target
        let [dx, dy] = step_toward([0.0, 0.0], [0.5, 0.0], 3.0).unwrap();
        assert!((dx - 3.0).abs() < 1e-6);
        assert_eq!(dy, 0.0);

        assert_eq!(step_toward([7.0, 7.0], [7.0, 7.0], 2.0), None);
    }

    #[test]
    fn sprites_chase_start_of_tick_position() {
        let rock = Entity::new(0, Kind::Rock, 0.0, 100.0);
        let scissors = Entity::new(1, Kind::Scissors, 100.0, 100.0);
        let paper = Entity::new(2, Kind::Paper, 100.0, 400.0);
        let mut world = world_with(settings(1, 4), [vec![rock], vec![paper], vec![scissors]]);

        world.move_entities();

        // rock aimed at scissors' old center even though scissors moved down
        let rock = &world.group(Kind::Rock)[0];
        assert!((rock.x - 4.0).abs() < 1e-5);
        assert!((rock.y - 100.0).abs() < 1e-5);

        let scissors = &world.group(Kind::Scissors)[0];
        assert!((scissors.x - 100.0).abs() < 1e-5);
        assert!((scissors.y - 104.0).abs() < 1e-5);

        // paper heads for the rock at (0, 100)
        let paper = &world.group(Kind::Paper)[0];
        let moved = ((paper.x - 100.0).powi(2) + (paper.y - 400.0).powi(2)).sqrt();
        assert!((moved - 4.0).abs() < 1e-4);
        assert!(paper.x < 100.0 && paper.y < 400.0);
    }

    #[test]
    fn sprites_without_prey_stay_put() {
        let rock = Entity::new(0, Kind::Rock, 50.0, 50.0);
        let paper = Entity::new(1, Kind::Paper, 300.0, 300.0);
        let mut world = world_with(settings(1, 10), [vec![rock.clone()], vec![paper], vec![]]);

        world.move_entities();

        assert_eq!(world.group(Kind::Rock)[0], rock);
        let paper = &world.group(Kind::Paper)[0];
        assert!(paper.x < 300.0);
    }

    #[test]
    fn sprites_may_leave_the_arena() {
        let scissors = Entity::new(0, Kind::Scissors, 5.0, 250.0);
        let paper = Entity::new(1, Kind::Paper, -200.0, 250.0);
        let mut world = world_with(settings(1, 10), [vec![], vec![paper], vec![scissors]]);

        world.move_entities();

        assert!((world.group(Kind::Scissors)[0].x + 5.0).abs() < 1e-5);
    }

    #[test]
    fn overlapping_prey_is_converted() {
        let mut rocks = row(Kind::Rock, 0, 10, 10.0);
        let papers = row(Kind::Paper, 100, 10, 150.0);
        let scissors = row(Kind::Scissors, 200, 10, 300.0);
        // park the first rock exactly on the first scissors
        rocks[0].x = scissors[0].x;
        rocks[0].y = scissors[0].y;
        let (prey_id, prey_x, prey_y) = (scissors[0].id, scissors[0].x, scissors[0].y);

        let mut world = world_with(settings(10, 2), [rocks, papers, scissors]);
        let conversions = world.resolve_collisions();

        assert_eq!(conversions.len(), 1);
        let conversion = &conversions[0];
        assert_eq!(conversion.hunter, 0);
        assert_eq!(conversion.prey, prey_id);
        assert_eq!(conversion.kind, Kind::Rock);

        assert_eq!(world.count(Kind::Rock), 11);
        assert_eq!(world.count(Kind::Scissors), 9);
        assert_eq!(world.count(Kind::Paper), 10);
        assert_eq!(world.population(), 30);
        assert!(world.group(Kind::Scissors).iter().all(|e| e.id != prey_id));

        let born = world.group(Kind::Rock).last().unwrap();
        assert_eq!(born.id, conversion.replacement);
        assert_eq!((born.x, born.y), (prey_x, prey_y));
        assert_eq!(world.snapshots[Kind::Rock.index()].len(), 11);
        assert_eq!(world.snapshots[Kind::Scissors.index()].len(), 9);
        assert_consistent(&world);
    }

    #[test]
    fn contested_prey_goes_to_first_hunter() {
        let scissors = vec![Entity::new(10, Kind::Scissors, 100.0, 100.0)];
        let rocks = vec![
            Entity::new(1, Kind::Rock, 90.0, 100.0),
            Entity::new(2, Kind::Rock, 110.0, 100.0),
        ];
        let papers = vec![Entity::new(20, Kind::Paper, 400.0, 400.0)];

        for _ in 0..3 {
            let mut world = world_with(
                Settings::new(1, 1).unwrap(),
                [rocks.clone(), papers.clone(), scissors.clone()],
            );
            let conversions = world.resolve_collisions();
            assert_eq!(conversions.len(), 1);
            assert_eq!(conversions[0].hunter, 1);
            assert_eq!(world.count(Kind::Rock), 3);
            assert_eq!(world.count(Kind::Scissors), 0);
        }

        let swapped = vec![rocks[1].clone(), rocks[0].clone()];
        let mut world = world_with(Settings::new(1, 1).unwrap(), [swapped, papers, scissors]);
        assert_eq!(world.resolve_collisions()[0].hunter, 2);
    }

    #[test]
    fn one_hunter_takes_every_prey_it_touches() {
        let rocks = vec![Entity::new(1, Kind::Rock, 100.0, 100.0)];
        let scissors = vec![
            Entity::new(10, Kind::Scissors, 110.0, 100.0),
            Entity::new(11, Kind::Scissors, 300.0, 300.0),
            Entity::new(12, Kind::Scissors, 95.0, 115.0),
        ];
        let mut world = world_with(Settings::new(1, 1).unwrap(), [rocks, vec![], scissors]);

        let conversions = world.resolve_collisions();
        let eaten: Vec<_> = conversions.iter().map(|c| c.prey).collect();
        assert_eq!(eaten, vec![10, 12]);
        assert_eq!(world.group(Kind::Scissors).len(), 1);
        assert_eq!(world.group(Kind::Scissors)[0].id, 11);
    }

    #[test]
    fn hunts_run_in_fixed_order() {
        // a scissors sits on a paper and a rock sits on the scissors:
        // rock hunts first, so the scissors is gone before it can eat the paper
        let rocks = vec![Entity::new(1, Kind::Rock, 205.0, 200.0)];
        let papers = vec![Entity::new(2, Kind::Paper, 190.0, 200.0)];
        let scissors = vec![Entity::new(3, Kind::Scissors, 200.0, 200.0)];
        let mut world = world_with(Settings::new(1, 1).unwrap(), [rocks, papers, scissors]);

        let conversions = world.resolve_collisions();
        let kinds: Vec<_> = conversions.iter().map(|c| c.kind).collect();
        // rock eats scissors, then paper eats both rocks (the original and the convert)
        assert_eq!(kinds, vec![Kind::Rock, Kind::Paper, Kind::Paper]);
        assert_eq!(world.count(Kind::Paper), 3);
        assert_eq!(world.winner(), Some(Kind::Paper));
        assert_consistent(&world);
    }

    #[test]
    fn fresh_converts_do_not_hunt_in_same_pass() {
        // scissors converts paper 2, whose replacement would touch paper 3
        let papers = vec![
            Entity::new(2, Kind::Paper, 110.0, 100.0),
            Entity::new(3, Kind::Paper, 125.0, 100.0),
        ];
        let scissors = vec![Entity::new(1, Kind::Scissors, 100.0, 100.0)];
        let rocks = vec![Entity::new(4, Kind::Rock, 400.0, 400.0)];
        let mut world = world_with(Settings::new(1, 1).unwrap(), [rocks, papers, scissors]);

        let conversions = world.resolve_collisions();
        assert_eq!(conversions.len(), 1);
        assert_eq!(conversions[0].prey, 2);
        assert_eq!(world.count(Kind::Paper), 1);
    }

    #[test]
    fn full_group_wins() {
        let rocks = row(Kind::Rock, 0, 6, 10.0);
        let mut world = world_with(Settings::new(2, 1).unwrap(), [rocks, vec![], vec![]]);
        assert_eq!(world.winner(), Some(Kind::Rock));
        assert_eq!(world.update(), Some(Kind::Rock));
        assert_eq!(world.tick(), 1);
    }

    #[test]
    fn small_round_runs_to_a_winner() {
        let rocks = vec![Entity::new(0, Kind::Rock, 20.0, 20.0)];
        let papers = vec![Entity::new(1, Kind::Paper, 400.0, 400.0)];
        let scissors = vec![Entity::new(2, Kind::Scissors, 120.0, 20.0)];
        let mut world = world_with(Settings::new(1, 2).unwrap(), [rocks, papers, scissors]);

        let mut winner = None;
        for _ in 0..10_000 {
            winner = world.update();
            assert_consistent(&world);
            if winner.is_some() {
                break;
            }
        }
        assert!(winner.is_some());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn conversions_conserve_population(
            seed in any::<u64>(),
            population in 1u32..40,
            speed in 1u32..=10,
        ) {
            let mut world = World::new(Settings::new(population, speed).unwrap().with_seed(Some(seed)));
            for _ in 0..200 {
                let winner = world.update();
                prop_assert_eq!(world.population(), population as usize * 3);

                let mut ids = HashSet::new();
                for kind in Kind::ALL {
                    for entity in world.group(kind) {
                        prop_assert_eq!(entity.kind, kind);
                        prop_assert!(ids.insert(entity.id));
                    }
                }
                if winner.is_some() {
                    break;
                }
            }
        }
    }
}
