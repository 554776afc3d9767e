use crate::math::Real;
use crate::query::{Ray, RayCast, RayIntersection};
use crate::shape::CollisionModel;

impl RayCast for CollisionModel {
    fn test_ray(&self, ray: &Ray, max_time_of_impact: Real) -> Option<RayIntersection> {
        let mut result: Option<RayIntersection> = None;
        let mut max_toi = max_time_of_impact;

        for polytope in &self.polytopes {
            if let Some(hit) = polytope.test_ray(ray, max_toi) {
                if result.map(|best| hit.time_of_impact < best.time_of_impact) != Some(false) {
                    max_toi = hit.time_of_impact;
                    result = Some(hit);
                }
            }
        }

        result
    }
}

#[cfg(test)]
mod test {
    use crate::bounding_volume::Aabb;
    use crate::math::{Point, Vector};
    use crate::query::{Ray, RayCast};
    use crate::shape::{CollisionModel, CollisionPolytope};

    #[test]
    fn closest_polytope_wins() {
        let model: CollisionModel = [
            Aabb::new(Point::new(5.0, -1.0, -1.0), Point::new(6.0, 1.0, 1.0)),
            Aabb::new(Point::new(2.0, -1.0, -1.0), Point::new(3.0, 1.0, 1.0)),
            Aabb::new(Point::new(-4.0, -1.0, -1.0), Point::new(-3.0, 1.0, 1.0)),
        ]
        .iter()
        .map(|aabb| CollisionPolytope::from_aabb("box", aabb))
        .collect();

        let ray = Ray::new(Point::origin(), Vector::x());
        let hit = model.test_ray(&ray, 100.0).unwrap();
        assert_relative_eq!(hit.time_of_impact, 2.0);
        assert_eq!(*hit.plane.normal, -Vector::x());

        assert!(model.test_ray(&ray, 1.5).is_none());
        assert!(CollisionModel::new().test_ray(&ray, 100.0).is_none());
    }
}
