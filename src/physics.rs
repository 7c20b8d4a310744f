use avian3d::prelude::*;
use bevy::prelude::*;

use crate::{PhysicsQuery, RayFilter, RayHit};

/// Gap kept between the capsule and whatever it slides along.
const SKIN_WIDTH: f32 = 0.02;

const MAX_SLIDE_ITERATIONS: usize = 4;

/// Collision layers of the level. Only [`GameLayer::Hookable`] surfaces catch the hook.
#[derive(PhysicsLayer, Clone, Copy, Debug, Default)]
pub enum GameLayer {
    #[default]
    Default,
    Hookable,
}

/// Capsule with its feet at the entity origin.
pub fn player_collider(radius: f32, height: f32, center: f32) -> Collider {
    let length = (height - 2.0 * radius).max(0.0);
    Collider::compound(vec![(
        Position(Vec3::Y * center),
        Rotation::default(),
        Collider::capsule(radius, length),
    )])
}

/// [`PhysicsQuery`] over avian's spatial query pipeline for one kinematic body.
///
/// Moves are resolved with shape casts against everything except the body
/// itself and written straight to its `Transform`.
pub struct AvianPhysics<'a> {
    pipeline: &'a SpatialQueryPipeline,
    entity: Entity,
    transform: &'a mut Transform,
    collider: &'a Collider,
    grounded_distance: f32,
    traction_normal_cutoff: f32,
}

impl<'a> AvianPhysics<'a> {
    pub fn new(
        pipeline: &'a SpatialQueryPipeline,
        entity: Entity,
        transform: &'a mut Transform,
        collider: &'a Collider,
        grounded_distance: f32,
        traction_normal_cutoff: f32,
    ) -> Self {
        Self {
            pipeline,
            entity,
            transform,
            collider,
            grounded_distance,
            traction_normal_cutoff,
        }
    }

    fn filter(&self) -> SpatialQueryFilter {
        SpatialQueryFilter::default().with_excluded_entities([self.entity])
    }

    /// Short downward cast; only surfaces flat enough to stand on count.
    pub fn probe_ground(&self) -> bool {
        self.pipeline
            .cast_shape(
                self.collider,
                self.transform.translation,
                self.transform.rotation,
                Dir3::NEG_Y,
                &ShapeCastConfig::from_max_distance(self.grounded_distance + SKIN_WIDTH),
                &self.filter(),
            )
            .is_some_and(|hit| {
                facing(hit.normal1, Vec3::NEG_Y).y > self.traction_normal_cutoff
            })
    }
}

impl PhysicsQuery for AvianPhysics<'_> {
    fn position(&self) -> Vec3 {
        self.transform.translation
    }

    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: RayFilter,
    ) -> Option<RayHit> {
        let direction = Dir3::new(direction).ok()?;
        let filter = match filter {
            RayFilter::Any => self.filter(),
            RayFilter::Hookable => self.filter().with_mask(GameLayer::Hookable),
        };
        self.pipeline
            .cast_ray(origin, direction, max_distance, true, &filter)
            .map(|hit| RayHit {
                point: origin + direction * hit.distance,
                normal: hit.normal,
                distance: hit.distance,
            })
    }

    /// Collide and slide: travel up to the first contact, then project the
    /// rest of the displacement onto the contact plane and try again.
    fn move_capsule(&mut self, displacement: Vec3) -> bool {
        let filter = self.filter();
        let mut remaining = displacement;

        for _ in 0..MAX_SLIDE_ITERATIONS {
            let Ok((direction, length)) = Dir3::new_and_length(remaining) else {
                break;
            };
            let Some(hit) = self.pipeline.cast_shape(
                self.collider,
                self.transform.translation,
                self.transform.rotation,
                direction,
                &ShapeCastConfig::from_max_distance(length + SKIN_WIDTH),
                &filter,
            ) else {
                self.transform.translation += remaining;
                break;
            };

            let travel = (hit.distance - SKIN_WIDTH).clamp(0.0, length);
            self.transform.translation += direction * travel;

            let normal = facing(hit.normal1, *direction);
            let leftover = remaining - direction * travel;
            remaining = leftover - normal * leftover.dot(normal);
        }

        self.probe_ground()
    }
}

/// Orients a contact normal against the direction of travel.
fn facing(normal: Vec3, travel: Vec3) -> Vec3 {
    if normal.dot(travel) > 0.0 { -normal } else { normal }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facing_flips_normals_that_point_along_travel() {
        assert_eq!(facing(Vec3::NEG_Y, Vec3::NEG_Y), Vec3::Y);
        assert_eq!(facing(Vec3::Y, Vec3::NEG_Y), Vec3::Y);
    }
}
