use na::{Point2, Point3, Vector3};
use walkthrough3d::partitioning::{KdTree, KdTreeBuildOptions};
use walkthrough3d::shape::TriMesh;

fn random_point(rng: &mut oorandom::Rand32, scale: f32) -> Point3<f32> {
    Point3::new(
        rng.rand_float() - 0.5,
        rng.rand_float() - 0.5,
        rng.rand_float() - 0.5,
    ) * scale
}

fn random_soup(rng: &mut oorandom::Rand32, num_triangles: u32) -> TriMesh {
    let mut vertices = vec![];
    let mut uvs = vec![];
    let mut indices = vec![];

    for i in 0..num_triangles {
        let center = random_point(rng, 20.0);

        for _ in 0..3 {
            vertices.push(center + random_point(rng, 3.0).coords);
            uvs.push(Point2::new(rng.rand_float(), rng.rand_float()));
        }

        indices.push([i * 3, i * 3 + 1, i * 3 + 2]);
    }

    TriMesh::new(vertices, uvs, indices).unwrap()
}

/// The 12 triangles of the box `[-1, 1]^3`, wound counter-clockwise seen from outside.
fn box_mesh() -> TriMesh {
    let vertices = (0..8)
        .map(|i| {
            Point3::new(
                if i & 1 == 0 { -1.0 } else { 1.0 },
                if i & 2 == 0 { -1.0 } else { 1.0 },
                if i & 4 == 0 { -1.0 } else { 1.0 },
            )
        })
        .collect();
    let indices = vec![
        [0, 2, 3],
        [0, 3, 1], // -z
        [4, 5, 7],
        [4, 7, 6], // +z
        [0, 4, 6],
        [0, 6, 2], // -x
        [1, 3, 7],
        [1, 7, 5], // +x
        [0, 1, 5],
        [0, 5, 4], // -y
        [2, 6, 7],
        [2, 7, 3], // +y
    ];

    TriMesh::new(vertices, vec![], indices).unwrap()
}

/// Axis-aligned unit quads lying on the even integer planes of `[0, 6]^3`, with every third
/// quad left out so that segments can travel through the lattice.
fn lattice_mesh() -> TriMesh {
    let mut vertices = vec![];
    let mut indices = vec![];

    for axis in 0..3 {
        let (u, v) = ((axis + 1) % 3, (axis + 2) % 3);

        for k in [0, 2, 4, 6] {
            for i in 0..6 {
                for j in 0..6 {
                    if (i + j + k + axis) % 3 == 0 {
                        continue;
                    }

                    let base = vertices.len() as u32;

                    for (di, dj) in [(0, 0), (1, 0), (1, 1), (0, 1)] {
                        let mut pt = Point3::origin();
                        pt[axis] = k as f32;
                        pt[u] = (i + di) as f32;
                        pt[v] = (j + dj) as f32;
                        vertices.push(pt);
                    }

                    indices.push([base, base + 1, base + 2]);
                    indices.push([base, base + 2, base + 3]);
                }
            }
        }
    }

    TriMesh::new(vertices, vec![], indices).unwrap()
}

/// A point of `[-0.5, 6.5]^3` with integer or half-integer coordinates.
fn lattice_point(rng: &mut oorandom::Rand32) -> Point3<f32> {
    let mut coord = || rng.rand_range(0..15) as f32 * 0.5 - 0.5;
    Point3::new(coord(), coord(), coord())
}

fn assert_trace_agrees_on_lattice(tree: &KdTree, seed: u64) {
    let mut rng = oorandom::Rand32::new(seed);
    let mut num_hits = 0;

    for i in 0..5000 {
        let start = lattice_point(&mut rng);
        let mut end = lattice_point(&mut rng);

        // Keep many segments inside of a grid plane, or along a grid line.
        if i % 2 == 0 {
            let axis = rng.rand_range(0..3) as usize;
            end[axis] = start[axis];

            if i % 4 == 0 {
                let other = (axis + 1) % 3;
                end[other] = start[other];
            }
        }

        let fast = tree.trace(&start, &end);
        let slow = tree.trace_exhaustive(&start, &end);

        assert_eq!(
            fast.triangle, slow.triangle,
            "mismatch tracing {:?} -> {:?}",
            start, end
        );
        assert_relative_eq!(fast.fraction, slow.fraction, epsilon = 1.0e-6);

        num_hits += fast.is_hit() as usize;
    }

    assert!(num_hits > 0);
}

#[test]
fn trace_along_cell_faces_matches_exhaustive_trace() {
    let tree = KdTree::new(lattice_mesh());
    assert!(tree.validate(true));
    assert_trace_agrees_on_lattice(&tree, 11);

    // Segments lying in a grid plane, touching quad edges.
    for (start, end) in [
        ([3.0, 2.5, 3.0], [3.0, 2.5, 1.5]),
        ([4.5, 3.5, 3.0], [1.5, 4.5, 3.0]),
        ([2.0, 2.0, 6.5], [2.0, 2.0, -0.5]),
        ([-0.5, 4.0, 4.0], [6.5, 4.0, 4.0]),
    ] {
        let (start, end) = (Point3::from(start), Point3::from(end));
        let fast = tree.trace(&start, &end);
        let slow = tree.trace_exhaustive(&start, &end);
        assert_eq!(fast.triangle, slow.triangle);
        assert_eq!(fast.fraction, slow.fraction);
    }

    // Fine cells put many more splitting planes on the lattice.
    let options = KdTreeBuildOptions {
        leaf_size: 1,
        num_bins: 12,
        ..KdTreeBuildOptions::default()
    };
    let tree = KdTree::with_options(lattice_mesh(), &options);
    assert!(tree.validate(true));
    assert_trace_agrees_on_lattice(&tree, 12);
}

#[test]
fn trace_matches_exhaustive_trace() {
    let mut rng = oorandom::Rand32::new(42);

    for num_triangles in [1, 10, 100, 500] {
        let tree = KdTree::new(random_soup(&mut rng, num_triangles));
        assert!(tree.validate(true));

        let mut num_hits = 0;

        for _ in 0..500 {
            let start = random_point(&mut rng, 30.0);
            let end = random_point(&mut rng, 30.0);

            let fast = tree.trace(&start, &end);
            let slow = tree.trace_exhaustive(&start, &end);

            assert_eq!(
                fast.triangle, slow.triangle,
                "mismatch tracing {:?} -> {:?}",
                start, end
            );
            assert_relative_eq!(fast.fraction, slow.fraction, epsilon = 1.0e-5);
            assert_relative_eq!(fast.uv, slow.uv, epsilon = 1.0e-5);
            assert_relative_eq!(fast.normal, slow.normal, epsilon = 1.0e-5);

            num_hits += fast.is_hit() as usize;
        }

        if num_triangles >= 100 {
            assert!(num_hits > 0);
        }
    }
}

#[test]
fn trace_with_custom_options() {
    let mut rng = oorandom::Rand32::new(7);
    let mesh = random_soup(&mut rng, 200);
    let options = KdTreeBuildOptions {
        leaf_size: 1,
        num_bins: 4,
        ..KdTreeBuildOptions::default()
    };
    let tree = KdTree::with_options(mesh, &options);
    assert!(tree.validate(true));

    for _ in 0..500 {
        let start = random_point(&mut rng, 30.0);
        let end = random_point(&mut rng, 30.0);
        assert_eq!(
            tree.trace(&start, &end).triangle,
            tree.trace_exhaustive(&start, &end).triangle
        );
    }
}

#[test]
fn segment_outside_bounds_misses() {
    let mut rng = oorandom::Rand32::new(3);
    let tree = KdTree::new(random_soup(&mut rng, 100));
    let bounds = *tree.bounds();

    let start = bounds.maxs + Vector3::new(1.0, 1.0, 1.0);
    let end = start + Vector3::new(10.0, 5.0, 0.0);
    let result = tree.trace(&start, &end);

    assert!(!result.is_hit());
    assert_eq!(result.fraction, 1.0);
    assert_eq!(result.uv, Point2::origin());
    assert_eq!(result.normal, Vector3::zeros());

    // Degenerate segments never hit.
    let center = bounds.center();
    assert!(!tree.trace(&center, &center).is_hit());
    assert!(!tree.trace_exhaustive(&center, &center).is_hit());
}

#[test]
fn trace_out_of_box() {
    let tree = KdTree::new(box_mesh());
    assert!(tree.validate(true));

    let result = tree.trace(&Point3::origin(), &Point3::new(3.0, 0.1, 0.2));
    let tri = result.triangle.unwrap();
    assert!(tri == 6 || tri == 7);
    assert_relative_eq!(result.fraction, 1.0 / 3.0, epsilon = 1.0e-6);
    assert_relative_eq!(result.normal, Vector3::x(), epsilon = 1.0e-6);

    // Closest of the two walls crossed.
    let result = tree.trace(&Point3::new(0.2, -3.0, 0.1), &Point3::new(0.2, 3.0, 0.1));
    let tri = result.triangle.unwrap();
    assert!(tri == 8 || tri == 9);
    assert_relative_eq!(result.fraction, 1.0 / 3.0, epsilon = 1.0e-6);
    assert_relative_eq!(result.normal, -Vector3::y(), epsilon = 1.0e-6);

    // Inside without reaching a wall.
    let result = tree.trace(&Point3::new(-0.5, 0.0, 0.0), &Point3::new(0.5, 0.2, 0.0));
    assert!(!result.is_hit());
}

#[test]
fn trace_interpolates_uvs() {
    let vertices = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(4.0, 0.0, 0.0),
        Point3::new(4.0, 0.0, 4.0),
        Point3::new(0.0, 0.0, 4.0),
    ];
    let uvs = vec![
        Point2::new(0.0, 0.0),
        Point2::new(1.0, 0.0),
        Point2::new(1.0, 1.0),
        Point2::new(0.0, 1.0),
    ];
    let tree = KdTree::from_buffers(vertices, uvs, &[0, 2, 1, 0, 3, 2]).unwrap();

    let result = tree.trace(&Point3::new(3.0, 1.0, 1.0), &Point3::new(3.0, -1.0, 1.0));
    assert_eq!(result.triangle, Some(0));
    assert_relative_eq!(result.fraction, 0.5);
    assert_relative_eq!(result.uv, Point2::new(0.75, 0.25), epsilon = 1.0e-6);
    assert_relative_eq!(result.normal, Vector3::y(), epsilon = 1.0e-6);
}
