use crate::math::Real;
use crate::query::{Ray, RayCast, RayIntersection};
use crate::shape::CollisionPolytope;

impl RayCast for CollisionPolytope {
    fn test_ray(&self, ray: &Ray, max_time_of_impact: Real) -> Option<RayIntersection> {
        // Parameter and index of the last plane the ray crosses to get in.
        let mut enter: Option<(Real, usize)> = None;
        let mut exit = max_time_of_impact;

        for (i, plane) in self.planes.iter().enumerate() {
            let dist = plane.signed_distance(&ray.origin);
            let denom = plane.normal.dot(&ray.dir);

            if dist >= 0.0 {
                // Outside of this plane and not moving toward it: the ray never gets in.
                if denom >= 0.0 {
                    return None;
                }

                let t = -dist / denom;

                if enter.map(|(best, _)| t > best).unwrap_or(true) {
                    enter = Some((t, i));
                }
            } else if denom > 0.0 {
                exit = exit.min(-dist / denom);
            }
        }

        // `None` here means the origin is behind every plane, i.e. it starts inside.
        let (toi, plane_id) = enter?;

        if toi > exit {
            None
        } else {
            Some(RayIntersection::new(toi, self.planes[plane_id]))
        }
    }
}
