//! Collide-and-slide displacement solver
//!
//! Sweeps the character capsule along a desired displacement, stops it a skin
//! width short of the first obstruction and redirects whatever is left along
//! the obstruction's surface. Walkable slopes are climbed, walls and steep
//! slopes are slid along, and passes driven by gravity report whether the
//! capsule came to rest on walkable ground.

use glam::Vec3;
use stride_core::WORLD_UP;
use tracing::{trace, warn};

use crate::shape_cast::{CapsuleShape, ShapeCaster, ShapeHit};

/// Maximum number of sweeps for a single pass
pub const MAX_SLIDE_DEPTH: u32 = 3;

/// Slack, in degrees, when comparing a slope against the walkable limit
const SLOPE_ANGLE_TOLERANCE: f32 = 1.0e-3;

/// Projections shorter than this have no usable direction
const MIN_PROJECTED_LENGTH: f32 = 1.0e-5;

/// What drives the displacement being resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlidePass {
    /// Locomotion along the ground plane
    Horizontal,
    /// Vertical motion from gravity or a jump; decides ground contact
    Gravity,
}

/// Ground contact change observed during a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroundContact {
    /// Nothing conclusive about the ground was observed
    Unchanged,
    /// Came to rest on a walkable surface
    Landed,
    /// Swept freely without touching anything
    Lost,
}

/// One displacement to resolve
#[derive(Debug, Clone, Copy)]
pub struct SlideRequest {
    /// Displacement attempted this pass
    pub velocity: Vec3,
    /// Capsule base position the sweep starts from
    pub position: Vec3,
    pub pass: SlidePass,
    /// Whether the character was grounded before this pass
    pub grounded: bool,
}

/// Result of resolving a [`SlideRequest`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideOutcome {
    /// Obstruction-respecting displacement to apply
    pub displacement: Vec3,
    pub ground: GroundContact,
    /// Number of shape casts performed
    pub casts: u32,
}

/// Collide-and-slide solver for one capsule
#[derive(Debug, Clone, Copy)]
pub struct CollideAndSlide {
    capsule: CapsuleShape,
    /// Steepest walkable slope in degrees
    max_slope_angle: f32,
    collision_mask: u32,
}

impl CollideAndSlide {
    pub fn new(capsule: CapsuleShape, max_slope_angle: f32, collision_mask: u32) -> Self {
        Self {
            capsule,
            max_slope_angle,
            collision_mask,
        }
    }

    pub fn capsule(&self) -> &CapsuleShape {
        &self.capsule
    }

    pub fn max_slope_angle(&self) -> f32 {
        self.max_slope_angle
    }

    pub fn collision_mask(&self) -> u32 {
        self.collision_mask
    }

    /// Whether a surface with this normal can be stood on (limit inclusive)
    pub fn is_walkable(&self, normal: Vec3) -> bool {
        slope_angle(normal) <= self.max_slope_angle + SLOPE_ANGLE_TOLERANCE
    }

    /// Resolve a desired displacement against the world.
    ///
    /// Each iteration sweeps the remaining displacement, keeps the part up to
    /// the surface and turns the part past it into the next remainder. The
    /// remainder is dropped once [`MAX_SLIDE_DEPTH`] sweeps have been made.
    pub fn resolve<C>(&self, caster: &C, request: SlideRequest) -> SlideOutcome
    where
        C: ShapeCaster + ?Sized,
    {
        let skin = self.capsule.skin_width();
        let mut outcome = SlideOutcome {
            displacement: Vec3::ZERO,
            ground: GroundContact::Unchanged,
            casts: 0,
        };
        let mut position = request.position;
        let mut remaining = request.velocity;

        for depth in 0..MAX_SLIDE_DEPTH {
            let Some(direction) = remaining.try_normalize() else {
                break;
            };
            let distance = remaining.length();

            outcome.casts += 1;
            let hit = self.sweep(caster, position, direction, distance + skin);

            let Some(hit) = hit else {
                if request.pass == SlidePass::Gravity {
                    outcome.ground = GroundContact::Lost;
                }
                outcome.displacement += remaining;
                trace!(depth, ?remaining, "slide: free");
                return outcome;
            };

            // Already within the skin: hold position instead of pushing into the surface
            let to_surface = direction * (hit.distance - skin).max(0.0);
            let mut past_surface = remaining - to_surface;

            if self.is_walkable(hit.normal) {
                match request.pass {
                    SlidePass::Gravity => {
                        outcome.ground = GroundContact::Landed;
                        outcome.displacement += to_surface;
                        trace!(depth, ?to_surface, "slide: landed");
                        return outcome;
                    }
                    SlidePass::Horizontal => {
                        past_surface = project_and_scale(past_surface, hit.normal);
                    }
                }
            } else {
                match request.pass {
                    SlidePass::Horizontal if request.grounded => {
                        // Stay on the ground plane and pick a side of the wall
                        past_surface =
                            project_and_scale(flatten(past_surface), flatten(hit.normal));
                    }
                    SlidePass::Horizontal => {}
                    SlidePass::Gravity => {
                        past_surface = project_and_scale(past_surface, hit.normal);
                    }
                }
            }

            trace!(
                depth,
                distance = hit.distance,
                normal = ?hit.normal,
                ?to_surface,
                ?past_surface,
                "slide: hit"
            );

            outcome.displacement += to_surface;
            position += to_surface;
            remaining = past_surface;
        }

        outcome
    }

    fn sweep<C>(
        &self,
        caster: &C,
        position: Vec3,
        direction: Vec3,
        max_distance: f32,
    ) -> Option<ShapeHit>
    where
        C: ShapeCaster + ?Sized,
    {
        let hit = caster.cast_capsule(
            self.capsule.bottom_center(position),
            self.capsule.top_center(position),
            self.capsule.radius(),
            direction,
            max_distance,
            self.collision_mask,
        )?;

        if !hit.is_well_formed() {
            warn!(
                distance = hit.distance,
                normal = ?hit.normal,
                "Shape caster returned a malformed hit, treating it as no hit"
            );
            return None;
        }

        Some(ShapeHit {
            distance: hit.distance,
            normal: hit.normal.normalize(),
        })
    }
}

/// Angle in degrees between the world up axis and a surface normal
pub fn slope_angle(normal: Vec3) -> f32 {
    let cos = normal.normalize_or_zero().dot(WORLD_UP).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

/// Project `vector` onto the plane with the given normal, keeping its length.
///
/// A projection with no usable direction yields zero. A degenerate normal
/// leaves the vector untouched.
pub fn project_and_scale(vector: Vec3, normal: Vec3) -> Vec3 {
    let magnitude = vector.length();
    let projected = project_on_plane(vector, normal);
    let length = projected.length();
    if length <= MIN_PROJECTED_LENGTH {
        Vec3::ZERO
    } else {
        projected * (magnitude / length)
    }
}

fn project_on_plane(vector: Vec3, normal: Vec3) -> Vec3 {
    let normal_sq = normal.length_squared();
    if normal_sq < f32::EPSILON {
        return vector;
    }
    vector - normal * (vector.dot(normal) / normal_sq)
}

fn flatten(v: Vec3) -> Vec3 {
    v - WORLD_UP * v.dot(WORLD_UP)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    /// Infinite planes swept analytically against the capsule
    #[derive(Default)]
    struct PlaneWorld {
        planes: Vec<(Vec3, Vec3)>,
    }

    impl PlaneWorld {
        fn with_plane(mut self, point: Vec3, normal: Vec3) -> Self {
            self.planes.push((point, normal.normalize()));
            self
        }
    }

    impl ShapeCaster for PlaneWorld {
        fn cast_capsule(
            &self,
            bottom_center: Vec3,
            top_center: Vec3,
            radius: f32,
            direction: Vec3,
            max_distance: f32,
            _collision_mask: u32,
        ) -> Option<ShapeHit> {
            self.planes
                .iter()
                .filter_map(|&(point, normal)| {
                    let approach = -direction.dot(normal);
                    if approach <= 1.0e-6 {
                        return None;
                    }
                    let gap = (bottom_center - point)
                        .dot(normal)
                        .min((top_center - point).dot(normal))
                        - radius;
                    let distance = gap.max(0.0) / approach;
                    (distance <= max_distance).then_some(ShapeHit { distance, normal })
                })
                .min_by(|a, b| a.distance.total_cmp(&b.distance))
        }
    }

    /// Returns a fixed result and counts how often it is asked
    struct FixedCaster {
        hit: Option<ShapeHit>,
        calls: Cell<u32>,
    }

    impl ShapeCaster for FixedCaster {
        fn cast_capsule(
            &self,
            _: Vec3,
            _: Vec3,
            _: f32,
            _: Vec3,
            _: f32,
            _: u32,
        ) -> Option<ShapeHit> {
            self.calls.set(self.calls.get() + 1);
            self.hit
        }
    }

    fn solver() -> CollideAndSlide {
        CollideAndSlide::new(CapsuleShape::default(), 55.0, u32::MAX)
    }

    fn request(velocity: Vec3, position: Vec3, pass: SlidePass, grounded: bool) -> SlideRequest {
        SlideRequest {
            velocity,
            position,
            pass,
            grounded,
        }
    }

    fn slope_normal(degrees: f32) -> Vec3 {
        let angle = degrees.to_radians();
        Vec3::new(angle.sin(), angle.cos(), 0.0)
    }

    #[test]
    fn test_free_path_returns_remaining() {
        let world = PlaneWorld::default();
        let velocity = Vec3::new(1.0, 2.0, -3.0);

        let horizontal = solver().resolve(
            &world,
            request(velocity, Vec3::ZERO, SlidePass::Horizontal, true),
        );
        assert_eq!(horizontal.displacement, velocity);
        assert_eq!(horizontal.ground, GroundContact::Unchanged);
        assert_eq!(horizontal.casts, 1);

        let gravity =
            solver().resolve(&world, request(velocity, Vec3::ZERO, SlidePass::Gravity, true));
        assert_eq!(gravity.displacement, velocity);
        assert_eq!(gravity.ground, GroundContact::Lost);
    }

    #[test]
    fn test_zero_displacement_skips_cast() {
        let caster = FixedCaster {
            hit: None,
            calls: Cell::new(0),
        };
        let outcome = solver().resolve(
            &caster,
            request(Vec3::ZERO, Vec3::ZERO, SlidePass::Gravity, true),
        );
        assert_eq!(outcome.displacement, Vec3::ZERO);
        assert_eq!(outcome.ground, GroundContact::Unchanged);
        assert_eq!(outcome.casts, 0);
        assert_eq!(caster.calls.get(), 0);

        let nan = solver().resolve(
            &caster,
            request(Vec3::NAN, Vec3::ZERO, SlidePass::Horizontal, true),
        );
        assert_eq!(nan.displacement, Vec3::ZERO);
        assert_eq!(caster.calls.get(), 0);
    }

    #[test]
    fn test_depth_is_bounded() {
        // A wall right in front that never lets anything through
        let caster = FixedCaster {
            hit: Some(ShapeHit {
                distance: 0.0,
                normal: Vec3::NEG_X,
            }),
            calls: Cell::new(0),
        };
        let outcome = solver().resolve(
            &caster,
            request(Vec3::new(0.5, 0.0, 0.0), Vec3::ZERO, SlidePass::Horizontal, false),
        );
        assert_eq!(outcome.casts, MAX_SLIDE_DEPTH);
        assert_eq!(caster.calls.get(), MAX_SLIDE_DEPTH);
        assert_eq!(outcome.displacement, Vec3::ZERO);
    }

    #[test]
    fn test_gravity_lands_on_flat_floor() {
        let world = PlaneWorld::default().with_plane(Vec3::ZERO, Vec3::Y);
        let outcome = solver().resolve(
            &world,
            request(Vec3::new(0.0, -1.0, 0.0), Vec3::new(0.0, 0.5, 0.0), SlidePass::Gravity, false),
        );
        assert_eq!(outcome.ground, GroundContact::Landed);
        assert_eq!(outcome.casts, 1);
        // Comes to rest one skin width above the floor
        assert!((outcome.displacement.y + 0.485).abs() < 1e-5);
    }

    #[test]
    fn test_resting_within_skin_does_not_move() {
        let world = PlaneWorld::default().with_plane(Vec3::ZERO, Vec3::Y);
        let outcome = solver().resolve(
            &world,
            request(
                Vec3::new(0.0, -0.005, 0.0),
                Vec3::new(0.0, 0.015, 0.0),
                SlidePass::Gravity,
                true,
            ),
        );
        assert_eq!(outcome.ground, GroundContact::Landed);
        assert_eq!(outcome.displacement, Vec3::ZERO);
    }

    #[test]
    fn test_grounded_wall_slides_along_tangent() {
        let world = PlaneWorld::default()
            .with_plane(Vec3::ZERO, Vec3::Y)
            .with_plane(Vec3::new(1.0, 0.0, 0.0), Vec3::NEG_X);
        let velocity = Vec3::new(1.0, 0.0, 1.0);
        let outcome = solver().resolve(
            &world,
            request(velocity, Vec3::new(0.0, 0.015, 0.0), SlidePass::Horizontal, true),
        );

        let capsule = CapsuleShape::default();
        // Never penetrates the wall and stays on the ground plane
        assert!(outcome.displacement.x + capsule.radius() < 1.0);
        assert!(outcome.displacement.y.abs() < 1e-6);
        // The blocked part of the motion turns into motion along the wall
        assert!(outcome.displacement.z > outcome.displacement.x);
        assert!(outcome.displacement.length() <= velocity.length() + 1e-5);
        assert!((outcome.displacement.z - 1.108).abs() < 0.01);
    }

    #[test]
    fn test_airborne_wall_is_not_slid_along() {
        let world = PlaneWorld::default().with_plane(Vec3::new(1.0, 0.0, 0.0), Vec3::NEG_X);
        let outcome = solver().resolve(
            &world,
            request(Vec3::new(1.0, 0.0, 1.0), Vec3::ZERO, SlidePass::Horizontal, false),
        );
        assert_eq!(outcome.casts, MAX_SLIDE_DEPTH);
        // Only the approach to the wall survives
        assert!((outcome.displacement.x - outcome.displacement.z).abs() < 1e-5);
        assert!(outcome.displacement.x + 0.25 < 1.0);
    }

    #[test]
    fn test_walkable_ramp_is_climbed() {
        let world = PlaneWorld::default()
            .with_plane(Vec3::new(0.5, 0.0, 0.0), Vec3::new(-0.5, 0.866, 0.0));
        let outcome = solver().resolve(
            &world,
            request(
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 0.1, 0.0),
                SlidePass::Horizontal,
                true,
            ),
        );
        assert!(outcome.displacement.y > 0.15);
        assert!(outcome.displacement.length() <= 1.0 + 1e-5);
        assert_eq!(outcome.ground, GroundContact::Unchanged);
    }

    #[test]
    fn test_slope_limit_is_inclusive() {
        let solver = solver();
        let fall = Vec3::new(0.0, -3.0, 0.0);
        let start = Vec3::new(0.0, 2.0, 0.0);

        let at_limit = PlaneWorld::default().with_plane(Vec3::ZERO, slope_normal(55.0));
        let outcome = solver.resolve(&at_limit, request(fall, start, SlidePass::Gravity, false));
        assert_eq!(outcome.ground, GroundContact::Landed);

        let too_steep = PlaneWorld::default().with_plane(Vec3::ZERO, slope_normal(56.0));
        let outcome = solver.resolve(&too_steep, request(fall, start, SlidePass::Gravity, false));
        assert_ne!(outcome.ground, GroundContact::Landed);
        // Slides down the face instead of stopping on it
        assert!(outcome.displacement.x > 0.0);
    }

    #[test]
    fn test_small_displacements_never_overshoot() {
        let world = PlaneWorld::default()
            .with_plane(Vec3::ZERO, Vec3::Y)
            .with_plane(Vec3::new(0.26, 0.0, 0.0), Vec3::NEG_X);
        let solver = solver();
        let skin = solver.capsule().skin_width();
        let start = Vec3::new(0.0, 0.01, 0.0);

        for i in 0..24 {
            let angle = i as f32 * std::f32::consts::TAU / 24.0;
            for scale in [0.1, 0.5, 1.0] {
                let velocity =
                    Vec3::new(angle.cos(), (angle * 0.5).sin() - 0.5, angle.sin()) * skin * scale;
                let velocity = velocity.clamp_length_max(skin);
                for (pass, grounded) in [
                    (SlidePass::Horizontal, true),
                    (SlidePass::Horizontal, false),
                    (SlidePass::Gravity, true),
                ] {
                    let outcome = solver.resolve(&world, request(velocity, start, pass, grounded));
                    assert!(outcome.displacement.length() <= velocity.length() + 1e-6);
                }
            }
        }
    }

    #[test]
    fn test_malformed_hit_is_treated_as_free() {
        let caster = FixedCaster {
            hit: Some(ShapeHit {
                distance: f32::NAN,
                normal: Vec3::Y,
            }),
            calls: Cell::new(0),
        };
        let velocity = Vec3::new(0.0, -0.2, 0.0);
        let outcome =
            solver().resolve(&caster, request(velocity, Vec3::ZERO, SlidePass::Gravity, true));
        assert_eq!(outcome.displacement, velocity);
        assert_eq!(outcome.ground, GroundContact::Lost);
    }

    #[test]
    fn test_projection_preserves_magnitude() {
        let cases = [
            (Vec3::new(1.0, -2.0, 0.5), Vec3::Y),
            (Vec3::new(0.3, 0.0, 0.0), Vec3::new(-1.0, 1.0, 0.0)),
            (Vec3::new(-4.0, 1.0, 2.0), slope_normal(70.0)),
        ];
        for (vector, normal) in cases {
            let projected = project_and_scale(vector, normal);
            assert!(projected.length() <= vector.length() + 1e-5);
            assert!((projected.length() - vector.length()).abs() < 1e-4);
            assert!(projected.dot(normal.normalize()).abs() < 1e-4);
        }

        // Head-on: nothing left to slide with
        assert_eq!(project_and_scale(Vec3::new(2.0, 0.0, 0.0), Vec3::NEG_X), Vec3::ZERO);
        // Degenerate normal: unchanged
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(project_and_scale(v, Vec3::ZERO), v);
    }

    #[test]
    fn test_slope_angle() {
        assert!(slope_angle(Vec3::Y).abs() < 1e-3);
        assert!((slope_angle(Vec3::X) - 90.0).abs() < 1e-3);
        assert!((slope_angle(slope_normal(30.0)) - 30.0).abs() < 1e-3);
    }
}
