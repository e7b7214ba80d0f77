//! Stride Physics - Static collision world and collide-and-slide using rapier3d
//!
//! Provides the static world the character moves through, the capsule shape
//! cast it is queried with, the collide-and-slide solver and velocity friction.

mod collide_and_slide;
mod friction;
mod shape_cast;

pub use collide_and_slide::{
    project_and_scale, slope_angle, CollideAndSlide, GroundContact, SlideOutcome, SlidePass,
    SlideRequest, MAX_SLIDE_DEPTH,
};
pub use friction::{apply_friction, apply_friction_scalar, REST_SPEED};
pub use shape_cast::{
    CapsuleDimensions, CapsuleShape, ShapeCaster, ShapeError, ShapeHit, DEFAULT_SKIN_WIDTH,
};

use glam::Vec3;
use nalgebra::Unit;
use rapier3d::parry::query::ShapeCastOptions;
use rapier3d::parry::shape::Capsule;
use rapier3d::prelude::*;
use tracing::debug;

/// Collision group every static collider belongs to unless told otherwise
pub const DEFAULT_COLLISION_GROUP: u32 = 1;

/// Static collision world the character controller queries
pub struct PhysicsWorld {
    /// Rigid body storage (stays empty; required by the query API)
    pub rigid_body_set: RigidBodySet,
    /// Collider storage
    pub collider_set: ColliderSet,

    /// Island manager, needed for collider removal
    island_manager: IslandManager,
    /// Query pipeline for raycasts and shape casts
    query_pipeline: QueryPipeline,
}

impl PhysicsWorld {
    /// Create an empty world
    pub fn new() -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            island_manager: IslandManager::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    /// Rebuild the query acceleration structure after colliders change
    fn refresh_queries(&mut self) {
        self.query_pipeline.update(&self.collider_set);
    }

    /// Add a static collider (ground, walls, etc.)
    pub fn add_static_collider(&mut self, collider: Collider) -> ColliderHandle {
        let handle = self.collider_set.insert(collider);
        self.refresh_queries();
        debug!(?handle, "Added static collider");
        handle
    }

    /// Remove a collider
    pub fn remove_collider(&mut self, handle: ColliderHandle) {
        self.collider_set
            .remove(handle, &mut self.island_manager, &mut self.rigid_body_set, true);
        self.refresh_queries();
    }

    /// Get a collider by handle
    pub fn get_collider(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.collider_set.get(handle)
    }

    /// Number of colliders in the world
    pub fn collider_count(&self) -> usize {
        self.collider_set.len()
    }

    /// Distance along a ray to the first collider in `collision_mask`
    pub fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        collision_mask: u32,
    ) -> Option<(ColliderHandle, f32)> {
        let direction = direction.try_normalize()?;
        let ray = Ray::new(
            point![origin.x, origin.y, origin.z],
            vector![direction.x, direction.y, direction.z],
        );

        self.query_pipeline.cast_ray(
            &self.rigid_body_set,
            &self.collider_set,
            &ray,
            max_distance,
            true,
            Self::query_filter(collision_mask),
        )
    }

    /// Create a ground plane collider
    pub fn create_ground(&mut self, y: f32) -> ColliderHandle {
        let normal = Unit::new_normalize(vector![0.0, 1.0, 0.0]);
        let ground = ColliderBuilder::halfspace(normal)
            .translation(vector![0.0, y, 0.0])
            .collision_groups(Self::groups(DEFAULT_COLLISION_GROUP))
            .build();
        self.add_static_collider(ground)
    }

    /// Create a static box collider
    pub fn create_static_box(&mut self, half_extents: Vec3, position: Vec3) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .translation(vector![position.x, position.y, position.z])
            .collision_groups(Self::groups(DEFAULT_COLLISION_GROUP))
            .build();
        self.add_static_collider(collider)
    }

    /// Create a slab tilted by `slope_degrees` around the Z axis.
    ///
    /// Its top face rises toward -X, so its normal leans toward +X.
    pub fn create_ramp(
        &mut self,
        half_extents: Vec3,
        position: Vec3,
        slope_degrees: f32,
    ) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .translation(vector![position.x, position.y, position.z])
            .rotation(vector![0.0, 0.0, -slope_degrees.to_radians()])
            .collision_groups(Self::groups(DEFAULT_COLLISION_GROUP))
            .build();
        self.add_static_collider(collider)
    }

    /// Interaction groups for a static collider in the given membership bits
    pub fn groups(membership: u32) -> InteractionGroups {
        InteractionGroups::new(Group::from_bits_truncate(membership), Group::ALL)
    }

    /// Query filter that only sees colliders whose membership intersects `collision_mask`
    fn query_filter(collision_mask: u32) -> QueryFilter<'static> {
        QueryFilter::default().groups(InteractionGroups::new(
            Group::ALL,
            Group::from_bits_truncate(collision_mask),
        ))
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapeCaster for PhysicsWorld {
    fn cast_capsule(
        &self,
        bottom_center: Vec3,
        top_center: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
        collision_mask: u32,
    ) -> Option<ShapeHit> {
        let capsule = Capsule::new(
            point![bottom_center.x, bottom_center.y, bottom_center.z],
            point![top_center.x, top_center.y, top_center.z],
            radius,
        );
        let filter = Self::query_filter(collision_mask);
        let options = ShapeCastOptions {
            max_time_of_impact: max_distance,
            stop_at_penetration: false,
            ..ShapeCastOptions::default()
        };

        self.query_pipeline
            .cast_shape(
                &self.rigid_body_set,
                &self.collider_set,
                &Isometry::identity(),
                &vector![direction.x, direction.y, direction.z],
                &capsule,
                options,
                filter,
            )
            .map(|(_handle, hit)| ShapeHit {
                distance: hit.time_of_impact,
                normal: Vec3::new(hit.normal1.x, hit.normal1.y, hit.normal1.z),
            })
    }
}
