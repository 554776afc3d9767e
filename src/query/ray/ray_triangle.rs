use crate::math::{Point, Real, Vector};
use crate::query::Ray;

/// Computes the intersection between a triangle and a ray.
///
/// Both faces of the triangle are considered. If an intersection is found with a parameter in
/// `[0, max_time_of_impact]`, the parameter and the barycentric coordinates of the
/// intersection point wrt. `a`, `b` and `c` are returned.
///
/// Rays parallel to the triangle plane, including rays with a zero direction, never hit.
pub fn local_ray_intersection_with_triangle(
    a: &Point<Real>,
    b: &Point<Real>,
    c: &Point<Real>,
    ray: &Ray,
    max_time_of_impact: Real,
) -> Option<(Real, Vector<Real>)> {
    let edge_b = *b - *a;
    let edge_c = *c - *a;
    let p = ray.dir.cross(&edge_c);
    let mut det = edge_b.dot(&p);

    if det == 0.0 || det.is_nan() {
        return None;
    }

    let mut s = ray.origin - *a;

    // Work with a positive determinant so the barycentric bounds are tested before dividing.
    if det < 0.0 {
        det = -det;
        s = -s;
    }

    let u = s.dot(&p);

    if !(0.0..=det).contains(&u) {
        return None;
    }

    let q = s.cross(&edge_b);
    let v = ray.dir.dot(&q);

    if v < 0.0 || u + v > det {
        return None;
    }

    let inv_det = 1.0 / det;
    let toi = edge_c.dot(&q) * inv_det;

    // NaN inputs end up here.
    if !(0.0..=max_time_of_impact).contains(&toi) {
        return None;
    }

    let (u, v) = (u * inv_det, v * inv_det);
    Some((toi, Vector::new(1.0 - u - v, u, v)))
}

#[cfg(test)]
mod test {
    use super::local_ray_intersection_with_triangle;
    use crate::math::{Point, Vector};
    use crate::query::Ray;

    #[test]
    fn segment_hits_both_faces() {
        let a = Point::new(0.0, 0.0, 0.0);
        let b = Point::new(1.0, 0.0, 0.0);
        let c = Point::new(0.0, 1.0, 0.0);

        let down = Ray::from_segment(Point::new(0.25, 0.25, 1.0), Point::new(0.25, 0.25, -1.0));
        let up = Ray::from_segment(Point::new(0.25, 0.25, -1.0), Point::new(0.25, 0.25, 1.0));

        for ray in [down, up] {
            let (toi, bcoords) = local_ray_intersection_with_triangle(&a, &b, &c, &ray, 1.0)
                .expect("the segment crosses the triangle");
            assert_relative_eq!(toi, 0.5);
            assert_relative_eq!(bcoords, Vector::new(0.5, 0.25, 0.25));
        }
    }

    #[test]
    fn segment_too_short_or_parallel() {
        let a = Point::new(0.0, 0.0, 0.0);
        let b = Point::new(1.0, 0.0, 0.0);
        let c = Point::new(0.0, 1.0, 0.0);

        let short = Ray::from_segment(Point::new(0.25, 0.25, 2.0), Point::new(0.25, 0.25, 1.0));
        assert!(local_ray_intersection_with_triangle(&a, &b, &c, &short, 1.0).is_none());

        let parallel = Ray::from_segment(Point::new(-1.0, 0.25, 0.0), Point::new(2.0, 0.25, 0.0));
        assert!(local_ray_intersection_with_triangle(&a, &b, &c, &parallel, 1.0).is_none());

        let degenerate = Ray::new(Point::new(0.25, 0.25, 0.0), Vector::zeros());
        assert!(local_ray_intersection_with_triangle(&a, &b, &c, &degenerate, 1.0).is_none());
    }

    #[test]
    fn segment_through_shared_edge_hits_both_triangles() {
        let quad = [
            Point::new(0.0, 0.0, 0.0),
            Point::new(1.0, 0.0, 0.0),
            Point::new(1.0, 1.0, 0.0),
            Point::new(0.0, 1.0, 0.0),
        ];
        let ray = Ray::from_segment(Point::new(0.5, 0.5, 1.0), Point::new(0.5, 0.5, -1.0));

        let (toi, bcoords) =
            local_ray_intersection_with_triangle(&quad[0], &quad[1], &quad[2], &ray, 1.0).unwrap();
        assert_eq!(toi, 0.5);
        assert_relative_eq!(bcoords, Vector::new(0.5, 0.0, 0.5));

        let (toi, bcoords) =
            local_ray_intersection_with_triangle(&quad[0], &quad[2], &quad[3], &ray, 1.0).unwrap();
        assert_eq!(toi, 0.5);
        assert_relative_eq!(bcoords, Vector::new(0.5, 0.5, 0.0));
    }
}
