use crate::math::{Point, Real, Vector};
use crate::partitioning::KdTree;
use crate::query::details::local_ray_intersection_with_triangle;
use crate::query::{Ray, TraceResult};

#[derive(Copy, Clone)]
struct TriangleHit {
    toi: Real,
    triangle: u32,
    bcoords: Vector<Real>,
}

impl KdTree {
    /// Traces the segment `[start, end]` through the mesh and returns its closest hit.
    ///
    /// The traversal descends from the root to the leaf containing the point where the segment
    /// enters the tree bounds, then walks from leaf to leaf through their ropes until a hit
    /// closer than the exit of the current leaf is found or the segment ends.
    ///
    /// Triangles are hit from both sides. If two triangles are hit at the same fraction, the
    /// one with the smallest index is reported. A zero-length segment hits nothing.
    pub fn trace(&self, start: &Point<Real>, end: &Point<Real>) -> TraceResult {
        let ray = Ray::from_segment(*start, *end);

        if ray.dir == Vector::zeros() {
            return TraceResult::miss();
        }

        let Some((t_enter, t_leave)) = self
            .header()
            .bounds
            .clip_segment_parameters(&ray.origin, &ray.dir)
        else {
            return TraceResult::miss();
        };

        let Some(mut leaf_id) = self.descend(0, &ray.point_at(t_enter), &ray.dir) else {
            return TraceResult::miss();
        };

        let leaves = self.leaves();
        let mut best = None;
        let mut num_steps = 0;

        while let Some(leaf) = leaves.get(leaf_id as usize) {
            for tri in leaf.triangles(self.overflow()) {
                self.test_triangle(tri, &ray, &mut best);
            }

            let Some((t_exit, face)) = leaf.bounds.exit_parameter(&ray.origin, &ray.dir) else {
                break;
            };

            // Hits closer than the exit of this leaf cannot be beaten by the next leaves.
            if best.is_some_and(|hit: TriangleHit| hit.toi < t_exit) || t_exit >= t_leave {
                break;
            }

            let Some(rope) = leaf.ropes[face] else {
                break;
            };

            let Some(next_leaf) = self.descend(rope, &ray.point_at(t_exit), &ray.dir) else {
                break;
            };

            num_steps += 1;
            if next_leaf == leaf_id || num_steps > leaves.len() {
                log::debug!(
                    "KD-tree trace stuck at leaf {} after {} steps.",
                    leaf_id,
                    num_steps
                );
                break;
            }

            leaf_id = next_leaf;
        }

        self.trace_result(best)
    }

    /// Traces the segment `[start, end]` by testing every triangle of the mesh.
    ///
    /// This follows the same contract as [`KdTree::trace`], including the tie-breaking rule,
    /// and serves as a reference to check it against.
    pub fn trace_exhaustive(&self, start: &Point<Real>, end: &Point<Real>) -> TraceResult {
        let ray = Ray::from_segment(*start, *end);
        let mut best = None;

        for tri in 0..self.mesh().num_triangles() {
            self.test_triangle(tri, &ray, &mut best);
        }

        self.trace_result(best)
    }

    fn test_triangle(&self, tri: u32, ray: &Ray, best: &mut Option<TriangleHit>) {
        let [a, b, c] = self.mesh().triangle(tri);
        let max_toi = best.map(|hit| hit.toi).unwrap_or(1.0);

        if let Some((toi, bcoords)) = local_ray_intersection_with_triangle(&a, &b, &c, ray, max_toi)
        {
            let closer = match best {
                Some(hit) => toi < hit.toi || (toi == hit.toi && tri < hit.triangle),
                None => true,
            };

            if closer {
                *best = Some(TriangleHit {
                    toi,
                    triangle: tri,
                    bcoords,
                });
            }
        }
    }

    fn trace_result(&self, hit: Option<TriangleHit>) -> TraceResult {
        let Some(hit) = hit else {
            return TraceResult::miss();
        };

        let mesh = self.mesh();
        TraceResult {
            triangle: Some(hit.triangle),
            fraction: hit.toi,
            uv: mesh.interpolate_uv(hit.triangle, &hit.bcoords),
            normal: mesh
                .triangle_normal(hit.triangle)
                .unwrap_or_else(Vector::zeros),
        }
    }
}
