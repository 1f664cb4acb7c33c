//! Physics world - main simulation container

use crate::body::{BodyRef, RigidBodyDesc, RigidBodyHandle};
use crate::collider::{ColliderDesc, ColliderHandle, ColliderShape};
use crate::config::PhysicsConfig;
use crate::error::{PhysicsError, Result};
use crate::events::{CollisionEvent, CollisionEventType, EventBuffer};
use crate::layers::CollisionGroups;
use crate::query::{GroundProbe, PhysicsQuery};
use glam::Vec2;
use rapier2d::prelude as rapier;
use std::num::NonZeroUsize;

/// The physics world containing all simulation state
pub struct PhysicsWorld {
    /// Configuration
    config: PhysicsConfig,

    /// Rapier physics pipeline
    pipeline: rapier::PhysicsPipeline,

    /// Gravity
    gravity: rapier::Vector<f32>,

    /// Integration parameters
    integration_params: rapier::IntegrationParameters,

    /// Island manager
    islands: rapier::IslandManager,

    /// Broad phase
    broad_phase: rapier::DefaultBroadPhase,

    /// Narrow phase
    narrow_phase: rapier::NarrowPhase,

    /// Impulse joint set
    impulse_joints: rapier::ImpulseJointSet,

    /// Multibody joint set
    multibody_joints: rapier::MultibodyJointSet,

    /// CCD solver
    ccd_solver: rapier::CCDSolver,

    /// Query pipeline
    query_pipeline: rapier::QueryPipeline,

    /// Rigid body set
    bodies: rapier::RigidBodySet,

    /// Collider set
    colliders: rapier::ColliderSet,

    /// Events gathered since the last drain
    events: EventBuffer,

    /// Accumulated time for fixed timestep
    accumulated_time: f32,
}

impl PhysicsWorld {
    /// Create a new physics world
    ///
    /// The configuration is validated here, once. A world that was built
    /// successfully never fails a step because of its configuration.
    pub fn new(config: PhysicsConfig) -> Result<Self> {
        config.validate()?;

        let gravity = rapier::Vector::new(config.gravity[0], config.gravity[1]);

        let mut integration_params = rapier::IntegrationParameters::default();
        integration_params.dt = config.timestep;
        integration_params.num_solver_iterations = NonZeroUsize::new(config.solver_iterations)
            .ok_or_else(|| {
                PhysicsError::InvalidConfig("solver_iterations must be at least 1".to_string())
            })?;

        log::debug!(
            "Physics world created: dt={:.4}, substeps<={}, gravity=({}, {})",
            config.timestep,
            config.max_substeps,
            config.gravity[0],
            config.gravity[1]
        );

        Ok(Self {
            config,
            pipeline: rapier::PhysicsPipeline::new(),
            gravity,
            integration_params,
            islands: rapier::IslandManager::new(),
            broad_phase: rapier::DefaultBroadPhase::new(),
            narrow_phase: rapier::NarrowPhase::new(),
            impulse_joints: rapier::ImpulseJointSet::new(),
            multibody_joints: rapier::MultibodyJointSet::new(),
            ccd_solver: rapier::CCDSolver::new(),
            query_pipeline: rapier::QueryPipeline::new(),
            bodies: rapier::RigidBodySet::new(),
            colliders: rapier::ColliderSet::new(),
            events: EventBuffer::default(),
            accumulated_time: 0.0,
        })
    }

    /// Get the physics configuration
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Set gravity
    pub fn set_gravity(&mut self, x: f32, y: f32) {
        self.gravity = rapier::Vector::new(x, y);
    }

    /// Get gravity
    pub fn gravity(&self) -> Vec2 {
        Vec2::new(self.gravity.x, self.gravity.y)
    }

    // ==================== Rigid Bodies ====================

    /// Create a rigid body without colliders
    pub fn create_rigid_body(&mut self, desc: RigidBodyDesc) -> RigidBodyHandle {
        let mut desc = desc;
        desc.ccd_enabled |= self.config.ccd_enabled
            && desc.body_type == crate::body::RigidBodyType::Dynamic;
        RigidBodyHandle(self.bodies.insert(desc.to_rapier_builder()))
    }

    /// Create a rigid body with its primary collider
    pub fn create_body(&mut self, body: RigidBodyDesc, collider: ColliderDesc) -> BodyRef {
        let body = self.create_rigid_body(body);
        let builder = collider.to_rapier_builder();
        let collider = ColliderHandle(self.colliders.insert_with_parent(
            builder,
            body.0,
            &mut self.bodies,
        ));
        self.sync_query_pipeline();
        BodyRef { body, collider }
    }

    /// Attach an extra collider (feet sensor, hurtbox) to an existing body
    pub fn attach_collider(
        &mut self,
        desc: ColliderDesc,
        body: RigidBodyHandle,
    ) -> Result<ColliderHandle> {
        if !self.bodies.contains(body.0) {
            return Err(PhysicsError::BodyNotFound(body));
        }
        let handle = ColliderHandle(self.colliders.insert_with_parent(
            desc.to_rapier_builder(),
            body.0,
            &mut self.bodies,
        ));
        self.sync_query_pipeline();
        Ok(handle)
    }

    /// Create a parentless collider; it behaves as fixed level geometry.
    /// `desc.position_offset` is its world position.
    pub fn create_static_collider(&mut self, desc: ColliderDesc) -> ColliderHandle {
        let handle = ColliderHandle(self.colliders.insert(desc.to_rapier_builder()));
        self.sync_query_pipeline();
        handle
    }

    /// Remove a rigid body and every collider attached to it
    pub fn remove_body(&mut self, handle: RigidBodyHandle) {
        let removed = self.bodies.remove(
            handle.0,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
        if removed.is_some() {
            self.sync_query_pipeline();
        }
    }

    /// Remove a single collider
    pub fn remove_collider(&mut self, handle: ColliderHandle) {
        let removed = self
            .colliders
            .remove(handle.0, &mut self.islands, &mut self.bodies, true);
        if removed.is_some() {
            self.sync_query_pipeline();
        }
    }

    /// Whether the body still exists
    pub fn contains_body(&self, handle: RigidBodyHandle) -> bool {
        self.bodies.contains(handle.0)
    }

    /// Whether the collider still exists
    pub fn contains_collider(&self, handle: ColliderHandle) -> bool {
        self.colliders.contains(handle.0)
    }

    /// Get body position
    pub fn body_position(&self, handle: RigidBodyHandle) -> Result<Vec2> {
        self.bodies
            .get(handle.0)
            .map(|b| {
                let pos = b.translation();
                Vec2::new(pos.x, pos.y)
            })
            .ok_or(PhysicsError::BodyNotFound(handle))
    }

    /// Get body linear velocity
    pub fn body_velocity(&self, handle: RigidBodyHandle) -> Result<Vec2> {
        self.bodies
            .get(handle.0)
            .map(|b| {
                let vel = b.linvel();
                Vec2::new(vel.x, vel.y)
            })
            .ok_or(PhysicsError::BodyNotFound(handle))
    }

    /// Get body mass
    pub fn body_mass(&self, handle: RigidBodyHandle) -> Result<f32> {
        self.bodies
            .get(handle.0)
            .map(|b| b.mass())
            .ok_or(PhysicsError::BodyNotFound(handle))
    }

    /// Move a body to `position`, keeping its velocity
    pub fn set_body_position(&mut self, handle: RigidBodyHandle, position: Vec2) -> Result<()> {
        self.bodies
            .get_mut(handle.0)
            .map(|b| {
                let translation = rapier::Vector::new(position.x, position.y);
                if b.body_type() == rapier::RigidBodyType::KinematicPositionBased {
                    b.set_next_kinematic_translation(translation);
                } else {
                    b.set_translation(translation, true);
                }
            })
            .ok_or(PhysicsError::BodyNotFound(handle))
    }

    /// Move a body to `position` and stop it
    pub fn teleport(&mut self, handle: RigidBodyHandle, position: Vec2) -> Result<()> {
        self.set_body_position(handle, position)?;
        self.set_velocity(handle, Vec2::ZERO)
    }

    /// Set body linear velocity
    pub fn set_velocity(&mut self, handle: RigidBodyHandle, velocity: Vec2) -> Result<()> {
        self.bodies
            .get_mut(handle.0)
            .map(|b| b.set_linvel(rapier::Vector::new(velocity.x, velocity.y), true))
            .ok_or(PhysicsError::BodyNotFound(handle))
    }

    /// Set only the horizontal velocity
    pub fn set_velocity_x(&mut self, handle: RigidBodyHandle, vx: f32) -> Result<()> {
        let vel = self.body_velocity(handle)?;
        self.set_velocity(handle, Vec2::new(vx, vel.y))
    }

    /// Set only the vertical velocity
    pub fn set_velocity_y(&mut self, handle: RigidBodyHandle, vy: f32) -> Result<()> {
        let vel = self.body_velocity(handle)?;
        self.set_velocity(handle, Vec2::new(vel.x, vy))
    }

    /// Apply a force for the next step. Forces are cleared after each `step`.
    pub fn apply_force(&mut self, handle: RigidBodyHandle, force: Vec2) -> Result<()> {
        self.bodies
            .get_mut(handle.0)
            .map(|b| b.add_force(rapier::Vector::new(force.x, force.y), true))
            .ok_or(PhysicsError::BodyNotFound(handle))
    }

    /// Apply an instantaneous impulse
    pub fn apply_impulse(&mut self, handle: RigidBodyHandle, impulse: Vec2) -> Result<()> {
        self.bodies
            .get_mut(handle.0)
            .map(|b| b.apply_impulse(rapier::Vector::new(impulse.x, impulse.y), true))
            .ok_or(PhysicsError::BodyNotFound(handle))
    }

    // ==================== Colliders ====================

    /// Body a collider is attached to
    pub fn collider_body(&self, handle: ColliderHandle) -> Option<RigidBodyHandle> {
        self.colliders
            .get(handle.0)
            .and_then(|c| c.parent())
            .map(RigidBodyHandle)
    }

    /// User data stored on a collider
    pub fn collider_user_data(&self, handle: ColliderHandle) -> Option<u128> {
        self.colliders.get(handle.0).map(|c| c.user_data)
    }

    /// World position of a collider
    pub fn collider_position(&self, handle: ColliderHandle) -> Result<Vec2> {
        self.colliders
            .get(handle.0)
            .map(|c| {
                let t = c.translation();
                Vec2::new(t.x, t.y)
            })
            .ok_or(PhysicsError::ColliderNotFound(handle))
    }

    // ==================== Queries ====================

    /// Whether a solid collider matching the probe's groups overlaps the
    /// probe box under `body`. The body's own colliders and all sensors are
    /// ignored.
    pub fn is_grounded(&self, body: RigidBodyHandle, probe: &GroundProbe) -> Result<bool> {
        let position = self.body_position(body)? + probe.offset;
        let shape = ColliderShape::Cuboid {
            half_extents: probe.half_extents,
        };
        Ok(!self
            .query()
            .overlap_shape(&shape, position, probe.groups, Some(body))
            .is_empty())
    }

    /// Solid colliders overlapping a box
    pub fn overlap_box(
        &self,
        center: Vec2,
        half_extents: Vec2,
        groups: CollisionGroups,
    ) -> Vec<ColliderHandle> {
        let shape = ColliderShape::Cuboid { half_extents };
        self.query().overlap_shape(&shape, center, groups, None)
    }

    /// First collider containing a point
    pub fn point_inside(&self, point: Vec2, groups: CollisionGroups) -> Option<ColliderHandle> {
        self.query().point_inside(point, groups)
    }

    fn query(&self) -> PhysicsQuery<'_> {
        PhysicsQuery {
            query_pipeline: &self.query_pipeline,
            colliders: &self.colliders,
            bodies: &self.bodies,
        }
    }

    /// Sync the query pipeline with the current colliders
    pub fn sync_query_pipeline(&mut self) {
        self.query_pipeline.update(&self.colliders);
    }

    // ==================== Simulation ====================

    /// Advance the simulation by `delta_time` using the fixed timestep.
    ///
    /// At most `max_substeps` internal steps run; time beyond that is
    /// discarded rather than carried into the next call. Returns the number
    /// of internal steps taken. Forces applied before the call are cleared
    /// afterwards.
    pub fn step(&mut self, delta_time: f32) -> u32 {
        let timestep = self.config.timestep;
        let max_delta = timestep * self.config.max_substeps as f32;
        self.accumulated_time += delta_time.clamp(0.0, max_delta);

        let mut steps = 0;
        while self.accumulated_time + f32::EPSILON >= timestep && steps < self.config.max_substeps {
            self.step_internal();
            self.accumulated_time -= timestep;
            steps += 1;
        }
        self.accumulated_time = self.accumulated_time.clamp(0.0, timestep);

        for (_, body) in self.bodies.iter_mut() {
            body.reset_forces(false);
        }

        self.query_pipeline.update(&self.colliders);
        steps
    }

    /// Internal fixed timestep
    fn step_internal(&mut self) {
        let (collision_send, collision_recv) = crossbeam_channel::unbounded();
        let event_handler = ChannelEventCollector {
            collision_events: collision_send,
        };

        self.pipeline.step(
            &self.gravity,
            &self.integration_params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &(),
            &event_handler,
        );

        while let Ok(event) = collision_recv.try_recv() {
            let (h1, h2, started) = match event {
                rapier::CollisionEvent::Started(h1, h2, _) => (h1, h2, true),
                rapier::CollisionEvent::Stopped(h1, h2, _) => (h1, h2, false),
            };

            let c1 = self.colliders.get(h1);
            let c2 = self.colliders.get(h2);

            self.events.push(CollisionEvent {
                collider1: ColliderHandle(h1),
                collider2: ColliderHandle(h2),
                event_type: if started {
                    CollisionEventType::Started
                } else {
                    CollisionEventType::Stopped
                },
                is_sensor: event.sensor(),
                user_data1: c1.map(|c| c.user_data).unwrap_or(0),
                user_data2: c2.map(|c| c.user_data).unwrap_or(0),
            });
        }
    }

    // ==================== Events ====================

    /// Take every collision event since the last drain, in a deterministic
    /// order. Events from all substeps are included.
    pub fn drain_collision_events(&mut self) -> Vec<CollisionEvent> {
        self.events.drain_sorted()
    }

    /// Number of events waiting to be drained
    pub fn pending_event_count(&self) -> usize {
        self.events.len()
    }

    // ==================== Teardown ====================

    /// Remove every body, collider and pending event
    pub fn clear(&mut self) {
        self.pipeline = rapier::PhysicsPipeline::new();
        self.islands = rapier::IslandManager::new();
        self.broad_phase = rapier::DefaultBroadPhase::new();
        self.narrow_phase = rapier::NarrowPhase::new();
        self.impulse_joints = rapier::ImpulseJointSet::new();
        self.multibody_joints = rapier::MultibodyJointSet::new();
        self.ccd_solver = rapier::CCDSolver::new();
        self.query_pipeline = rapier::QueryPipeline::new();
        self.bodies = rapier::RigidBodySet::new();
        self.colliders = rapier::ColliderSet::new();
        self.events.clear();
        self.accumulated_time = 0.0;
        log::debug!("Physics world cleared");
    }

    // ==================== Debug ====================

    /// Get number of rigid bodies
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Get number of colliders
    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }
}

/// Channel-based event collector for Rapier
struct ChannelEventCollector {
    collision_events: crossbeam_channel::Sender<rapier::CollisionEvent>,
}

impl rapier::EventHandler for ChannelEventCollector {
    fn handle_collision_event(
        &self,
        _bodies: &rapier::RigidBodySet,
        _colliders: &rapier::ColliderSet,
        event: rapier::CollisionEvent,
        _contact_pair: Option<&rapier::ContactPair>,
    ) {
        let _ = self.collision_events.send(event);
    }

    fn handle_contact_force_event(
        &self,
        _dt: f32,
        _bodies: &rapier::RigidBodySet,
        _colliders: &rapier::ColliderSet,
        _contact_pair: &rapier::ContactPair,
        _total_force_magnitude: f32,
    ) {
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::{CollisionLayer, CollisionMatrix};
    use approx::assert_relative_eq;

    const DT: f32 = 1.0 / 60.0;

    fn world() -> PhysicsWorld {
        PhysicsWorld::new(PhysicsConfig::default()).unwrap()
    }

    fn ground(world: &mut PhysicsWorld) -> ColliderHandle {
        let matrix = CollisionMatrix::default();
        world.create_static_collider(
            ColliderDesc::new(ColliderShape::cuboid(10.0, 0.5))
                .with_offset(0.0, -0.5)
                .with_collision_groups(matrix.groups(CollisionLayer::WORLD)),
        )
    }

    #[test]
    fn test_create_world() {
        let world = world();
        assert_eq!(world.body_count(), 0);
        assert_eq!(world.collider_count(), 0);
    }

    #[test]
    fn test_invalid_config_fails_once_at_construction() {
        let result = PhysicsWorld::new(PhysicsConfig::default().with_timestep(-1.0));
        assert!(matches!(result, Err(PhysicsError::InvalidConfig(_))));
    }

    #[test]
    fn test_create_and_remove_body() {
        let mut world = world();
        let body = world.create_body(
            RigidBodyDesc::dynamic().with_position(0.0, 10.0),
            ColliderDesc::new(ColliderShape::ball(0.5)),
        );
        assert_eq!(world.body_count(), 1);
        assert_eq!(world.collider_count(), 1);
        assert_eq!(world.collider_body(body.collider), Some(body.body));

        world.remove_body(body.body);
        assert_eq!(world.body_count(), 0);
        assert_eq!(world.collider_count(), 0);
        assert!(world.body_position(body.body).is_err());
    }

    #[test]
    fn test_gravity_fall() {
        let mut world = world();
        let body = world.create_body(
            RigidBodyDesc::dynamic().with_position(0.0, 10.0),
            ColliderDesc::new(ColliderShape::ball(0.5)),
        );

        let initial_y = world.body_position(body.body).unwrap().y;
        for _ in 0..60 {
            world.step(DT);
        }
        let final_y = world.body_position(body.body).unwrap().y;
        assert!(final_y < initial_y, "Body should fall due to gravity");
    }

    #[test]
    fn test_step_caps_substeps() {
        let mut world = world();
        assert_eq!(world.step(DT), 1);
        // A huge frame is clamped to max_substeps, leftover time is dropped
        assert_eq!(world.step(10.0), 4);
        assert_eq!(world.step(0.0), 0);
    }

    #[test]
    fn test_forces_are_cleared_after_step() {
        let mut world = world();
        world.set_gravity(0.0, 0.0);
        let body = world.create_body(
            RigidBodyDesc::dynamic(),
            ColliderDesc::new(ColliderShape::ball(0.5)),
        );

        world.apply_force(body.body, Vec2::new(100.0, 0.0)).unwrap();
        world.step(DT);
        let v1 = world.body_velocity(body.body).unwrap().x;
        world.step(DT);
        let v2 = world.body_velocity(body.body).unwrap().x;

        assert!(v1 > 0.0);
        assert_relative_eq!(v1, v2, epsilon = 1e-4);
    }

    #[test]
    fn test_grounded_query() {
        let mut world = world();
        ground(&mut world);

        let half = Vec2::new(0.4, 0.5);
        let probe = GroundProbe::below(half, 0.1);

        let standing = world.create_body(
            RigidBodyDesc::character().with_position(0.0, 0.5),
            ColliderDesc::new(ColliderShape::cuboid(half.x, half.y)),
        );
        let flying = world.create_body(
            RigidBodyDesc::character().with_position(3.0, 5.0),
            ColliderDesc::new(ColliderShape::cuboid(half.x, half.y)),
        );

        assert!(world.is_grounded(standing.body, &probe).unwrap());
        assert!(!world.is_grounded(flying.body, &probe).unwrap());
    }

    #[test]
    fn test_sensor_events_are_drained_once() {
        let mut world = world();
        world.set_gravity(0.0, 0.0);
        let matrix = CollisionMatrix::default();

        let player = world.create_body(
            RigidBodyDesc::character(),
            ColliderDesc::new(ColliderShape::cuboid(0.5, 0.5))
                .with_collision_groups(matrix.groups(CollisionLayer::PLAYER)),
        );
        let hazard = world.create_static_collider(
            ColliderDesc::sensor(ColliderShape::cuboid(1.0, 1.0))
                .with_collision_groups(matrix.groups(CollisionLayer::HAZARD)),
        );

        world.step(DT);
        let events = world.drain_collision_events();
        assert_eq!(events.len(), 1);
        assert!(events[0].is_started());
        assert!(events[0].is_sensor);
        assert!(events[0].involves(hazard));
        assert_eq!(events[0].other(hazard), Some(player.collider));

        assert!(world.drain_collision_events().is_empty());
    }

    #[test]
    fn test_clear_removes_everything() {
        let mut world = world();
        ground(&mut world);
        world.create_body(
            RigidBodyDesc::dynamic(),
            ColliderDesc::new(ColliderShape::ball(0.5)),
        );
        world.step(DT);
        world.clear();
        assert_eq!(world.body_count(), 0);
        assert_eq!(world.collider_count(), 0);
        assert_eq!(world.pending_event_count(), 0);
    }
}
