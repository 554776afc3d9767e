use na::{Point3, Vector3};
use walkthrough3d::bounding_volume::Aabb;
use walkthrough3d::query::{PointQuery, Ray, RayCast, POP_OUT_EPSILON};
use walkthrough3d::shape::{CollisionModel, CollisionPolytope, Plane};

fn unit_cube() -> CollisionPolytope {
    let mut cube = CollisionPolytope::new("cube");

    for normal in [
        Vector3::x(),
        -Vector3::x(),
        Vector3::y(),
        -Vector3::y(),
        Vector3::z(),
        -Vector3::z(),
    ] {
        cube.add(Plane::try_new(normal, -1.0).unwrap());
    }

    cube
}

#[test]
fn cube_point_and_ray_queries() {
    let cube = unit_cube();

    assert!(cube.test_point(&Point3::origin()));
    assert!(!cube.test_point(&Point3::new(2.0, 0.0, 0.0)));
    assert!(!cube.test_point(&Point3::new(1.0, 0.0, 0.0)));

    let ray = Ray::new(Point3::new(-2.0, 0.0, 0.0), Vector3::x());
    let mut length = 10.0;
    assert!(cube.clip_ray(&ray, &mut length));
    assert_relative_eq!(length, 1.0);

    let hit = cube.test_ray(&ray, 10.0).unwrap();
    assert_relative_eq!(*hit.plane.normal, -Vector3::x());
    assert_relative_eq!(hit.plane.signed_distance(&ray.point_at(length)), 0.0);
}

#[test]
fn pop_out_uses_least_penetration() {
    let cube = unit_cube();
    let mut rng = oorandom::Rand32::new(0);

    for _ in 0..1000 {
        let inside = Point3::new(
            rng.rand_float() * 1.8 - 0.9,
            rng.rand_float() * 1.8 - 0.9,
            rng.rand_float() * 1.8 - 0.9,
        );
        let penetration = 1.0 - inside.coords.amax();

        let mut pt = inside;
        assert!(cube.pop_out(&mut pt));
        assert!(!cube.test_point(&pt));
        assert_relative_eq!(
            (pt - inside).norm(),
            penetration + POP_OUT_EPSILON,
            epsilon = 1.0e-5
        );

        // Already outside.
        let mut again = pt;
        assert!(!cube.pop_out(&mut again));
        assert_eq!(again, pt);
    }
}

#[test]
fn model_union_semantics() {
    let model: CollisionModel = [
        Aabb::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0)),
        Aabb::new(Point3::new(4.0, -1.0, -1.0), Point3::new(6.0, 1.0, 1.0)),
    ]
    .iter()
    .map(|aabb| CollisionPolytope::from_aabb("crate", aabb))
    .collect();

    assert_eq!(model.len(), 2);
    assert!(model.test_point(&Point3::origin()));
    assert!(model.test_point(&Point3::new(5.0, 0.0, 0.0)));
    assert!(!model.test_point(&Point3::new(2.5, 0.0, 0.0)));

    let ray = Ray::new(Point3::new(10.0, 0.0, 0.0), -Vector3::x());
    let mut length = 100.0;
    assert!(model.clip_ray(&ray, &mut length));
    assert_relative_eq!(length, 4.0);

    let mut pt = Point3::new(5.8, 0.0, 0.0);
    assert!(model.pop_out(&mut pt));
    assert!(!model.test_point(&pt));
    assert_relative_eq!(pt.x, 6.0 + POP_OUT_EPSILON, epsilon = 1.0e-5);

    let mut outside = Point3::new(2.5, 0.0, 0.0);
    assert!(!model.pop_out(&mut outside));
}
