use na::{Point3, Vector3};
use walkthrough3d::bounding_volume::Aabb;
use walkthrough3d::control::slide_move;
use walkthrough3d::query::PointQuery;
use walkthrough3d::shape::{CollisionModel, CollisionPolytope, Plane};

fn wall() -> CollisionModel {
    // Solid on the positive x side of the plane x = 0.
    let plane = Plane::try_new(-Vector3::x(), 0.0).unwrap();
    std::iter::once(CollisionPolytope::from_planes("wall", vec![plane])).collect()
}

fn floor() -> CollisionModel {
    let aabb = Aabb::new(
        Point3::new(-100.0, -1.0, -100.0),
        Point3::new(100.0, 0.0, 100.0),
    );
    std::iter::once(CollisionPolytope::from_aabb("floor", &aabb)).collect()
}

#[test]
fn never_walk_through_wall() {
    let walls = wall();
    let ground = floor();
    let mut rng = oorandom::Rand32::new(1);

    for _ in 0..500 {
        let foot = Point3::new(-rng.rand_float() * 5.0, 0.0, rng.rand_float() * 10.0 - 5.0);
        let dir = Vector3::new(rng.rand_float() * 2.0 - 1.0, 0.0, rng.rand_float() * 2.0 - 1.0);
        let distance = rng.rand_float() * 10.0;

        let end = slide_move(&foot, 1.7, &dir, distance, &walls, &ground);

        assert!(end.x <= 1.0e-4, "walked through the wall to {:?}", end);
        assert!(!walls.test_point(&end));
        assert_relative_eq!(end.y, 0.0, epsilon = 1.0e-4);
    }
}

#[test]
fn slide_along_wall() {
    let end = slide_move(
        &Point3::new(-1.0, 0.0, 0.0),
        1.7,
        &Vector3::new(1.0, 0.0, 1.0),
        4.0,
        &wall(),
        &floor(),
    );

    assert!(end.x <= 0.0);
    assert!(end.x > -0.01);
    // The part of the move blocked by the wall is redirected along +z.
    assert!(end.z > 2.0 && end.z <= 4.0);
}
