#![cfg_attr(not(feature = "std"), no_std)]

//! Flocking simulation core: vector math, birds, steering forces and the
//! two-phase step that advances a population through one time increment.

extern crate alloc;

use alloc::vec::Vec;

#[cfg(feature = "std")]
use rand::{rngs::StdRng, Rng, SeedableRng};

/// A 2D vector used for position, velocity and force
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2D {
    pub x: f64,
    pub y: f64,
}

impl Vector2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Componentwise sum, returning a new value.
    pub fn add(self, other: Self) -> Self {
        self + other
    }

    /// Componentwise multiply by a scalar, returning a new value.
    pub fn scale(self, scalar: f64) -> Self {
        self * scalar
    }

    /// In-place `self += other`.
    pub fn accumulate(&mut self, other: Self) {
        *self += other;
    }

    /// In-place `self *= scalar`.
    pub fn scale_in_place(&mut self, scalar: f64) {
        *self *= scalar;
    }

    pub fn magnitude(&self) -> f64 {
        #[cfg(feature = "std")]
        {
            (self.x * self.x + self.y * self.y).sqrt()
        }
        #[cfg(not(feature = "std"))]
        {
            libm::sqrt(self.x * self.x + self.y * self.y)
        }
    }

    pub fn distance(&self, other: &Vector2D) -> f64 {
        (*self - *other).magnitude()
    }
}

impl core::ops::Add for Vector2D {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl core::ops::Sub for Vector2D {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl core::ops::Neg for Vector2D {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }
}

impl core::ops::Mul<f64> for Vector2D {
    type Output = Self;

    fn mul(self, scalar: f64) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

impl core::ops::Div<f64> for Vector2D {
    type Output = Self;

    fn div(self, scalar: f64) -> Self {
        Self {
            x: self.x / scalar,
            y: self.y / scalar,
        }
    }
}

impl core::ops::AddAssign for Vector2D {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl core::ops::SubAssign for Vector2D {
    fn sub_assign(&mut self, other: Self) {
        self.x -= other.x;
        self.y -= other.y;
    }
}

impl core::ops::MulAssign<f64> for Vector2D {
    fn mul_assign(&mut self, scalar: f64) {
        self.x *= scalar;
        self.y *= scalar;
    }
}

/// A single bird.
///
/// `id` is the bird's index in its population. It is fixed at creation and
/// only used to keep a bird out of its own neighbor sets.
#[derive(Debug, Clone, PartialEq)]
pub struct Bird {
    pub position: Vector2D,
    pub velocity: Vector2D,
    id: usize,
}

impl Bird {
    pub fn new(id: usize, position: Vector2D, velocity: Vector2D) -> Self {
        Self {
            position,
            velocity,
            id,
        }
    }

    /// Position and velocity drawn uniformly from `[0, 1)` on each axis,
    /// in the order `pos.x, pos.y, vel.x, vel.y`.
    #[cfg(feature = "std")]
    pub fn random<R: Rng + ?Sized>(id: usize, rng: &mut R) -> Self {
        let position = Vector2D::new(rng.gen::<f64>(), rng.gen::<f64>());
        let velocity = Vector2D::new(rng.gen::<f64>(), rng.gen::<f64>());
        Self::new(id, position, velocity)
    }

    pub fn id(&self) -> usize {
        self.id
    }
}

/// How the y component of the separation term is formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeparationMode {
    /// Push directly away from each neighbor: `-(n - self)` on both axes.
    #[default]
    Standard,
    /// Form the y term from the neighbor's x coordinate, `-(n.x - self.y)`.
    /// Matches position dumps produced with that formula.
    CrossAxis,
}

/// Configuration for the flock simulation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlockConfig {
    pub bird_count: usize,
    pub time_step: f64,
    pub total_steps: usize,
    /// Side length of the square arena, anchored at the origin.
    pub box_length: f64,
    /// Exclusive radius for cohesion and alignment neighbors.
    pub close_distance: f64,
    /// Exclusive radius for separation neighbors. Expected to be below `close_distance`.
    pub repel_distance: f64,
    /// Width of the margin along each wall where the wall force applies.
    pub wall_distance: f64,
    pub force_to_center_scale: f64,
    pub force_repel_scale: f64,
    pub force_align_scale: f64,
    pub force_wall_scale: f64,
    pub separation_mode: SeparationMode,
    /// Seed for the initial placement. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for FlockConfig {
    fn default() -> Self {
        Self {
            bird_count: 200,
            time_step: 0.005,
            total_steps: 1000,
            box_length: 1.0,
            close_distance: 0.1,
            repel_distance: 0.05,
            wall_distance: 0.1,
            force_to_center_scale: 0.5,
            force_repel_scale: 0.5,
            force_align_scale: 0.5,
            force_wall_scale: 2.0,
            separation_mode: SeparationMode::Standard,
            seed: None,
        }
    }
}

/// Neighbors of one bird against one population snapshot.
#[derive(Debug, Clone, Default)]
pub struct NeighborSets<'a> {
    pub close: Vec<&'a Bird>,
    pub repel: Vec<&'a Bird>,
}

/// Steering forces and integration for a single bird
pub mod behavior {
    use super::*;

    /// Splits `population` into close and repel neighbors of `bird`.
    ///
    /// Self is skipped by id, not by distance. Both radii are strict upper
    /// bounds on the same Euclidean distance, so with `repel_distance <
    /// close_distance` every repel neighbor is also a close neighbor.
    pub fn classify<'a>(
        bird: &Bird,
        population: &'a [Bird],
        config: &FlockConfig,
    ) -> NeighborSets<'a> {
        let mut sets = NeighborSets::default();

        for other in population.iter().filter(|other| other.id != bird.id) {
            let distance = bird.position.distance(&other.position);
            if distance < config.close_distance {
                sets.close.push(other);
            }
            if distance < config.repel_distance {
                sets.repel.push(other);
            }
        }

        sets
    }

    /// Cohesion: pull toward the mean position of the close neighbors.
    pub fn force_to_center(bird: &Bird, close: &[&Bird], config: &FlockConfig) -> Vector2D {
        if close.is_empty() {
            return Vector2D::zero();
        }

        let mut center = Vector2D::zero();
        for other in close {
            center.accumulate(other.position);
        }
        let mut force = center / close.len() as f64 - bird.position;
        force.scale_in_place(config.force_to_center_scale);
        force
    }

    /// Separation: push away from each repel neighbor, averaged.
    pub fn force_repel(bird: &Bird, repel: &[&Bird], config: &FlockConfig) -> Vector2D {
        if repel.is_empty() {
            return Vector2D::zero();
        }

        let mut force = Vector2D::zero();
        for other in repel {
            let offset = match config.separation_mode {
                SeparationMode::Standard => other.position - bird.position,
                SeparationMode::CrossAxis => Vector2D::new(
                    other.position.x - bird.position.x,
                    other.position.x - bird.position.y,
                ),
            };
            force -= offset;
        }
        let mut force = force / repel.len() as f64;
        force.scale_in_place(config.force_repel_scale);
        force
    }

    /// Alignment: steer toward the mean velocity of the close neighbors.
    pub fn force_align(bird: &Bird, close: &[&Bird], config: &FlockConfig) -> Vector2D {
        if close.is_empty() {
            return Vector2D::zero();
        }

        let mut heading = Vector2D::zero();
        for other in close {
            heading.accumulate(other.velocity);
        }
        let mut force = heading / close.len() as f64 - bird.velocity;
        force.scale_in_place(config.force_align_scale);
        force
    }

    /// Fixed push back into the arena for each wall margin the bird is inside.
    /// Corners get both pushes; there is no falloff with depth.
    pub fn force_wall(bird: &Bird, config: &FlockConfig) -> Vector2D {
        let mut force = Vector2D::zero();
        let far = config.box_length - config.wall_distance;

        if bird.position.x < config.wall_distance {
            force.x += config.force_wall_scale;
        }
        if bird.position.y < config.wall_distance {
            force.y += config.force_wall_scale;
        }
        if bird.position.y > far {
            force.y -= config.force_wall_scale;
        }
        if bird.position.x > far {
            force.x -= config.force_wall_scale;
        }

        force
    }

    /// Sum of cohesion, separation, alignment and wall forces on `bird`.
    pub fn net_force(bird: &Bird, population: &[Bird], config: &FlockConfig) -> Vector2D {
        let neighbors = classify(bird, population, config);

        let mut force = Vector2D::zero();
        force.accumulate(force_to_center(bird, &neighbors.close, config));
        force.accumulate(force_repel(bird, &neighbors.repel, config));
        force.accumulate(force_align(bird, &neighbors.close, config));
        force.accumulate(force_wall(bird, config));
        force
    }

    /// The velocity `bird` has after one step against `population`.
    pub fn next_velocity(bird: &Bird, population: &[Bird], config: &FlockConfig) -> Vector2D {
        let mut force = net_force(bird, population, config);
        force.scale_in_place(config.time_step);
        let mut velocity = bird.velocity;
        velocity.accumulate(force);
        velocity
    }

    /// Applies one step of steering to `bird` in place.
    ///
    /// `population` must be a snapshot taken before any bird in the current
    /// step was updated.
    pub fn velocity_update(bird: &mut Bird, population: &[Bird], config: &FlockConfig) {
        bird.velocity = next_velocity(bird, population, config);
    }

    /// Explicit Euler position update: `position += velocity * time_step`.
    pub fn position_tick(bird: &mut Bird, config: &FlockConfig) {
        bird.position.accumulate(bird.velocity.scale(config.time_step));
    }
}

/// A fixed-size flock whose population size is a compile-time constant
pub struct Flock<const N: usize> {
    pub birds: heapless::Vec<Bird, N>,
    pub config: FlockConfig,
}

impl<const N: usize> Flock<N> {
    /// Builds exactly `N` birds; `init` returns `(position, velocity)` for each id.
    pub fn from_fn<F>(config: FlockConfig, mut init: F) -> Self
    where
        F: FnMut(usize) -> (Vector2D, Vector2D),
    {
        let mut birds = heapless::Vec::new();
        for id in 0..N {
            let (position, velocity) = init(id);
            let _ = birds.push(Bird::new(id, position, velocity));
        }

        Self { birds, config }
    }

    #[cfg(feature = "std")]
    pub fn random<R: Rng + ?Sized>(config: FlockConfig, rng: &mut R) -> Self {
        let mut birds = heapless::Vec::new();
        for id in 0..N {
            let _ = birds.push(Bird::random(id, rng));
        }

        Self { birds, config }
    }

    /// Advances every bird by one time step.
    pub fn step(&mut self) {
        // Velocities are computed from the unmutated population first
        let mut velocities = heapless::Vec::<Vector2D, N>::new();
        for bird in self.birds.iter() {
            let _ = velocities.push(behavior::next_velocity(bird, &self.birds, &self.config));
        }

        for (bird, velocity) in self.birds.iter_mut().zip(velocities) {
            bird.velocity = velocity;
        }
        for bird in self.birds.iter_mut() {
            behavior::position_tick(bird, &self.config);
        }
    }

    /// Positions in id order.
    pub fn positions(&self) -> heapless::Vec<Vector2D, N> {
        self.birds.iter().map(|bird| bird.position).collect()
    }
}

/// A flock whose population size is read from `FlockConfig::bird_count`
#[cfg(feature = "std")]
pub struct FlockStd {
    birds: Vec<Bird>,
    pub config: FlockConfig,
    steps_taken: usize,
}

#[cfg(feature = "std")]
impl FlockStd {
    /// Places `config.bird_count` birds at random, seeded from `config.seed` when set.
    pub fn new(config: FlockConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let birds = (0..config.bird_count)
            .map(|id| Bird::random(id, &mut rng))
            .collect();

        Self {
            birds,
            config,
            steps_taken: 0,
        }
    }

    /// Uses the given initial states. Ids are reassigned to match each bird's index,
    /// and `config.bird_count` is set to the number of birds.
    pub fn from_birds<I>(birds: I, mut config: FlockConfig) -> Self
    where
        I: IntoIterator<Item = Bird>,
    {
        let birds: Vec<Bird> = birds
            .into_iter()
            .enumerate()
            .map(|(id, bird)| Bird::new(id, bird.position, bird.velocity))
            .collect();
        config.bird_count = birds.len();

        Self {
            birds,
            config,
            steps_taken: 0,
        }
    }

    pub fn birds(&self) -> &[Bird] {
        &self.birds
    }

    pub fn steps_taken(&self) -> usize {
        self.steps_taken
    }

    /// Advances every bird by one time step.
    ///
    /// All new velocities are collected before any are written back, and
    /// positions only move once every velocity is in place.
    pub fn step(&mut self) {
        let velocities = self.next_velocities();

        for (bird, velocity) in self.birds.iter_mut().zip(velocities) {
            bird.velocity = velocity;
        }
        for bird in self.birds.iter_mut() {
            behavior::position_tick(bird, &self.config);
        }

        self.steps_taken += 1;
    }

    #[cfg(feature = "parallel")]
    fn next_velocities(&self) -> Vec<Vector2D> {
        use rayon::prelude::*;

        self.birds
            .par_iter()
            .map(|bird| behavior::next_velocity(bird, &self.birds, &self.config))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn next_velocities(&self) -> Vec<Vector2D> {
        self.birds
            .iter()
            .map(|bird| behavior::next_velocity(bird, &self.birds, &self.config))
            .collect()
    }

    /// Positions in id order.
    pub fn positions(&self) -> Vec<Vector2D> {
        self.birds.iter().map(|bird| bird.position).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn bird(id: usize, x: f64, y: f64) -> Bird {
        Bird::new(id, Vector2D::new(x, y), Vector2D::zero())
    }

    fn four_birds() -> Vec<Bird> {
        vec![
            bird(0, 0.0, 0.0),
            bird(1, 0.02, 0.02),
            bird(2, 0.5, 0.5),
            bird(3, 0.99, 0.99),
        ]
    }

    #[test]
    fn test_vector2d_operations() {
        let v1 = Vector2D::new(1.0, 2.0);
        let v2 = Vector2D::new(3.0, 4.0);

        let sum = v1.add(v2);
        assert_eq!(sum, Vector2D::new(4.0, 6.0));

        let scaled = v1.scale(2.0);
        assert_eq!(scaled, Vector2D::new(2.0, 4.0));

        // Originals are untouched
        assert_eq!(v1, Vector2D::new(1.0, 2.0));
        assert_eq!(v2.distance(&v1), (8.0f64).sqrt());
    }

    #[test]
    fn test_vector2d_in_place() {
        let mut v = Vector2D::new(1.0, -1.0);
        v.accumulate(Vector2D::new(0.5, 0.5));
        assert_eq!(v, Vector2D::new(1.5, -0.5));

        v.scale_in_place(2.0);
        assert_eq!(v, Vector2D::new(3.0, -1.0));
    }

    #[test]
    fn test_vector2d_nan_propagates() {
        let v = Vector2D::new(f64::NAN, 1.0) + Vector2D::new(1.0, 1.0);
        assert!(v.x.is_nan());
        assert_eq!(v.y, 2.0);
    }

    #[test]
    fn test_classify_excludes_self() {
        let config = FlockConfig::default();
        // Two birds stacked on the same spot are still neighbors of each other
        let population = vec![bird(0, 0.5, 0.5), bird(1, 0.5, 0.5)];

        let sets = behavior::classify(&population[0], &population, &config);
        assert_eq!(sets.close.len(), 1);
        assert_eq!(sets.repel.len(), 1);
        assert!(sets.close.iter().all(|b| b.id() != 0));
        assert!(sets.repel.iter().all(|b| b.id() != 0));
    }

    #[test]
    fn test_classify_thresholds_are_strict() {
        let config = FlockConfig {
            close_distance: 0.5,
            repel_distance: 0.25,
            ..FlockConfig::default()
        };
        let population = vec![
            bird(0, 0.0, 0.0),
            bird(1, 0.5, 0.0),
            bird(2, 0.25, 0.0),
            bird(3, 0.0, 0.1),
        ];

        let sets = behavior::classify(&population[0], &population, &config);
        let close: Vec<usize> = sets.close.iter().map(|b| b.id()).collect();
        let repel: Vec<usize> = sets.repel.iter().map(|b| b.id()).collect();
        assert_eq!(close, vec![2, 3]);
        assert_eq!(repel, vec![3]);
    }

    #[test]
    fn test_repel_set_within_close_set() {
        let config = FlockConfig {
            seed: Some(7),
            bird_count: 300,
            ..FlockConfig::default()
        };
        let flock = FlockStd::new(config);

        for bird in flock.birds() {
            let sets = behavior::classify(bird, flock.birds(), &config);
            for repel in &sets.repel {
                assert!(sets.close.iter().any(|close| close.id() == repel.id()));
            }
        }
    }

    #[test]
    fn test_forces_zero_without_neighbors() {
        let config = FlockConfig::default();
        let lonely = Bird::new(0, Vector2D::new(0.5, 0.5), Vector2D::new(0.3, -0.2));

        assert_eq!(behavior::force_to_center(&lonely, &[], &config), Vector2D::zero());
        assert_eq!(behavior::force_align(&lonely, &[], &config), Vector2D::zero());
        assert_eq!(behavior::force_repel(&lonely, &[], &config), Vector2D::zero());
    }

    #[test]
    fn test_force_to_center_points_at_centroid() {
        let config = FlockConfig::default();
        let me = bird(0, 0.5, 0.5);
        let a = bird(1, 0.54, 0.5);
        let b = bird(2, 0.5, 0.54);

        let force = behavior::force_to_center(&me, &[&a, &b], &config);
        assert!(approx(force.x, 0.01));
        assert!(approx(force.y, 0.01));
    }

    #[test]
    fn test_force_align_matches_mean_velocity() {
        let config = FlockConfig::default();
        let me = Bird::new(0, Vector2D::new(0.5, 0.5), Vector2D::new(0.1, 0.0));
        let a = Bird::new(1, Vector2D::new(0.51, 0.5), Vector2D::new(0.3, 0.2));
        let b = Bird::new(2, Vector2D::new(0.49, 0.5), Vector2D::new(0.1, 0.0));

        let force = behavior::force_align(&me, &[&a, &b], &config);
        assert!(approx(force.x, 0.05));
        assert!(approx(force.y, 0.05));
    }

    #[test]
    fn test_force_repel_pushes_away() {
        let config = FlockConfig::default();
        let me = bird(0, 0.5, 0.5);
        let other = bird(1, 0.52, 0.49);

        let force = behavior::force_repel(&me, &[&other], &config);
        assert!(approx(force.x, -0.01));
        assert!(approx(force.y, 0.005));
    }

    #[test]
    fn test_force_repel_cross_axis() {
        let config = FlockConfig {
            separation_mode: SeparationMode::CrossAxis,
            ..FlockConfig::default()
        };
        let me = bird(0, 0.5, 0.3);
        let other = bird(1, 0.52, 0.31);

        // y term is built from the neighbor's x: -(0.52 - 0.3) * 0.5
        let force = behavior::force_repel(&me, &[&other], &config);
        assert!(approx(force.x, -0.01));
        assert!(approx(force.y, -0.11));
    }

    #[test]
    fn test_force_wall_single_axis() {
        let config = FlockConfig::default();
        let force = behavior::force_wall(&bird(0, 0.05, 0.5), &config);
        assert_eq!(force, Vector2D::new(2.0, 0.0));
    }

    #[test]
    fn test_force_wall_corners_add() {
        let config = FlockConfig::default();
        assert_eq!(
            behavior::force_wall(&bird(0, 0.0, 0.0), &config),
            Vector2D::new(2.0, 2.0)
        );
        assert_eq!(
            behavior::force_wall(&bird(0, 0.95, 0.95), &config),
            Vector2D::new(-2.0, -2.0)
        );
        assert_eq!(
            behavior::force_wall(&bird(0, 0.5, 0.5), &config),
            Vector2D::zero()
        );
        // Far outside the box the push has the same magnitude
        assert_eq!(
            behavior::force_wall(&bird(0, -3.0, 0.5), &config),
            Vector2D::new(2.0, 0.0)
        );
    }

    #[test]
    fn test_velocity_update_and_position_tick() {
        let config = FlockConfig::default();
        let population = vec![bird(0, 0.05, 0.5)];
        let mut me = population[0].clone();

        behavior::velocity_update(&mut me, &population, &config);
        assert!(approx(me.velocity.x, 0.01));
        assert_eq!(me.velocity.y, 0.0);

        behavior::position_tick(&mut me, &config);
        assert!(approx(me.position.x, 0.05 + 0.01 * 0.005));
        assert_eq!(me.position.y, 0.5);
    }

    #[test]
    fn test_four_bird_first_step() {
        let config = FlockConfig::default();
        let population = four_birds();

        let sets = behavior::classify(&population[0], &population, &config);
        assert_eq!(sets.close.len(), 1);
        assert_eq!(sets.close[0].id(), 1);
        assert_eq!(sets.repel.len(), 1);

        let center = behavior::force_to_center(&population[0], &sets.close, &config);
        let repel = behavior::force_repel(&population[0], &sets.repel, &config);
        assert!(center.magnitude() > 0.0);
        assert!(repel.magnitude() > 0.0);

        let walls: Vec<Vector2D> = population
            .iter()
            .map(|b| behavior::force_wall(b, &config))
            .collect();
        assert_eq!(walls[0], Vector2D::new(2.0, 2.0));
        assert_eq!(walls[1], Vector2D::new(2.0, 2.0));
        assert_eq!(walls[2], Vector2D::zero());
        assert_eq!(walls[3], Vector2D::new(-2.0, -2.0));

        let mut flock = FlockStd::from_birds(population, config);
        flock.step();
        let birds = flock.birds();
        assert!(approx(birds[0].velocity.x, 0.01));
        assert!(approx(birds[1].velocity.y, 0.01));
        assert_eq!(birds[2].velocity, Vector2D::zero());
        assert!(approx(birds[3].velocity.x, -0.01));
        assert!(birds[0].position.x > 0.0);
    }

    #[test]
    fn test_four_birds_stay_bounded() {
        let config = FlockConfig::default();
        let mut flock = FlockStd::from_birds(four_birds(), config);

        for _ in 0..config.total_steps {
            flock.step();
        }

        for position in flock.positions() {
            assert!(position.x.is_finite() && position.y.is_finite());
            assert!(position.x > -0.5 && position.x < 1.5, "x = {}", position.x);
            assert!(position.y > -0.5 && position.y < 1.5, "y = {}", position.y);
        }
    }

    #[test]
    fn test_velocity_update_order_independent() {
        let config = FlockConfig {
            seed: Some(3),
            bird_count: 120,
            ..FlockConfig::default()
        };
        let flock = FlockStd::new(config);
        let snapshot = flock.birds().to_vec();

        let forward: Vec<Vector2D> = snapshot
            .iter()
            .map(|b| behavior::next_velocity(b, &snapshot, &config))
            .collect();
        let mut reverse: Vec<Vector2D> = snapshot
            .iter()
            .rev()
            .map(|b| behavior::next_velocity(b, &snapshot, &config))
            .collect();
        reverse.reverse();
        assert_eq!(forward, reverse);

        let mut stepped = FlockStd::new(config);
        stepped.step();
        let stepped_velocities: Vec<Vector2D> =
            stepped.birds().iter().map(|b| b.velocity).collect();
        assert_eq!(forward, stepped_velocities);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_step_matches_sequential() {
        let config = FlockConfig {
            seed: Some(21),
            bird_count: 400,
            ..FlockConfig::default()
        };
        let mut flock = FlockStd::new(config);

        for _ in 0..10 {
            let snapshot = flock.birds().to_vec();
            let mut expected: Vec<Bird> = snapshot.clone();
            for (bird, before) in expected.iter_mut().zip(&snapshot) {
                bird.velocity = behavior::next_velocity(before, &snapshot, &config);
            }
            for bird in expected.iter_mut() {
                behavior::position_tick(bird, &config);
            }

            flock.step();
            assert_eq!(flock.birds(), expected.as_slice());
        }
    }

    #[test]
    fn test_seeded_runs_identical() {
        let config = FlockConfig {
            seed: Some(42),
            bird_count: 50,
            ..FlockConfig::default()
        };
        let mut a = FlockStd::new(config);
        let mut b = FlockStd::new(config);

        for _ in 0..100 {
            a.step();
            b.step();
        }
        assert_eq!(a.positions(), b.positions());
    }

    #[test]
    fn test_flock_creation() {
        let config = FlockConfig {
            seed: Some(1),
            ..FlockConfig::default()
        };
        let flock = FlockStd::new(config);
        assert_eq!(flock.birds().len(), 200);

        for (index, bird) in flock.birds().iter().enumerate() {
            assert_eq!(bird.id(), index);
            assert!((0.0..1.0).contains(&bird.position.x));
            assert!((0.0..1.0).contains(&bird.position.y));
            assert!((0.0..1.0).contains(&bird.velocity.x));
            assert!((0.0..1.0).contains(&bird.velocity.y));
        }
    }

    #[test]
    fn test_from_birds_reassigns_ids() {
        let birds = vec![bird(9, 0.1, 0.1), bird(9, 0.2, 0.2)];
        let flock = FlockStd::from_birds(birds, FlockConfig::default());

        assert_eq!(flock.config.bird_count, 2);
        assert_eq!(flock.birds()[0].id(), 0);
        assert_eq!(flock.birds()[1].id(), 1);
    }

    #[test]
    fn test_fixed_flock_matches_std_flock() {
        let config = FlockConfig::default();
        let start = four_birds();
        let mut fixed = Flock::<4>::from_fn(config, |id| (start[id].position, start[id].velocity));
        let mut dynamic = FlockStd::from_birds(start.clone(), config);

        for _ in 0..25 {
            fixed.step();
            dynamic.step();
        }

        let fixed_positions: Vec<Vector2D> = fixed.positions().into_iter().collect();
        assert_eq!(fixed_positions, dynamic.positions());
        assert_eq!(dynamic.steps_taken(), 25);
    }

    #[test]
    fn test_fixed_flock_random() {
        let mut rng = StdRng::seed_from_u64(5);
        let flock = Flock::<16>::random(FlockConfig::default(), &mut rng);
        assert_eq!(flock.birds.len(), 16);
        assert_eq!(flock.birds[15].id(), 15);
    }
}
