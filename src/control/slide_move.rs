use crate::math::{Point, Real, UnitVector, Vector, DEFAULT_EPSILON};
use crate::query::{PointQuery, Ray, RayCast};
use arrayvec::ArrayVec;

/// The maximum number of blocking planes remembered during one move.
const MAX_CLIP_PLANES: usize = 5;

/// Parameters of [`slide_move_with_config`].
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SlideMoveConfig {
    /// The maximum number of wall contacts resolved during one move.
    pub max_iterations: usize,
    /// The distance the foot is kept away from the walls it touches.
    pub skin: Real,
    /// How far below the foot the ground is searched for.
    ///
    /// If `None`, the ground is searched up to one eye height below the foot.
    pub ground_probe_distance: Option<Real>,
    /// The up direction of the world.
    pub up: UnitVector<Real>,
}

impl Default for SlideMoveConfig {
    fn default() -> Self {
        Self {
            max_iterations: 4,
            skin: 1.0e-3,
            ground_probe_distance: None,
            up: Vector::y_axis(),
        }
    }
}

/// Removes from `v` its component going through the plane with normal `normal`.
///
/// Components leaving the plane are kept.
#[inline]
pub fn clip_to_plane(v: &Vector<Real>, normal: &UnitVector<Real>) -> Vector<Real> {
    let into = v.dot(normal);

    if into < 0.0 {
        v - **normal * into
    } else {
        *v
    }
}

/// Moves a character standing at `foot` by `move_distance` along `move_dir`, with the default
/// [`SlideMoveConfig`].
///
/// See [`slide_move_with_config`].
pub fn slide_move(
    foot: &Point<Real>,
    eye_height: Real,
    move_dir: &Vector<Real>,
    move_distance: Real,
    walls: &(impl RayCast + PointQuery),
    ground: &impl RayCast,
) -> Point<Real> {
    slide_move_with_config(
        foot,
        eye_height,
        move_dir,
        move_distance,
        walls,
        ground,
        &SlideMoveConfig::default(),
    )
}

/// Moves a character standing at `foot` by `move_distance` along `move_dir`, and returns its
/// new foot position.
///
/// The move goes in three steps:
/// 1. The foot walks toward its target. Whenever it enters the `walls`, it stops at the
///    contact, a skin width away from the blocking plane, and the rest of the move is
///    redirected along the plane (or along the crease of two planes in a corner). At most
///    `config.max_iterations` contacts are resolved.
/// 2. The foot snaps to the ground: a ray is cast downward from the eye, `eye_height` above
///    the foot, against the `ground`. If it enters the ground within the probe distance below
///    the foot, the foot is moved where it entered, so the character climbs up and down steps.
/// 3. The foot is popped out of the walls if it still ended inside of them.
///
/// A zero direction or a non-positive distance skips the first step. The move never fails:
/// at worst the foot does not advance.
pub fn slide_move_with_config(
    foot: &Point<Real>,
    eye_height: Real,
    move_dir: &Vector<Real>,
    move_distance: Real,
    walls: &(impl RayCast + PointQuery),
    ground: &impl RayCast,
    config: &SlideMoveConfig,
) -> Point<Real> {
    let mut foot = walls.popped_out(foot);

    if let Some(dir) = move_dir.try_normalize(DEFAULT_EPSILON) {
        if move_distance > 0.0 {
            walk(&mut foot, dir * move_distance, walls, config);
        }
    }

    snap_to_ground(&mut foot, eye_height, ground, config);
    let _ = walls.pop_out(&mut foot);
    foot
}

fn walk(
    foot: &mut Point<Real>,
    mut remaining: Vector<Real>,
    walls: &impl RayCast,
    config: &SlideMoveConfig,
) {
    let desired = remaining;
    let mut planes: ArrayVec<UnitVector<Real>, MAX_CLIP_PLANES> = ArrayVec::new();

    for _ in 0..config.max_iterations {
        let Some((dir, length)) = UnitVector::try_new_and_get(remaining, DEFAULT_EPSILON) else {
            return;
        };

        let ray = Ray::new(*foot, *dir);
        let Some(hit) = walls.test_ray(&ray, length) else {
            *foot += remaining;
            return;
        };

        let normal = hit.plane.normal;
        *foot = ray.point_at(hit.time_of_impact) + *normal * config.skin;
        remaining = *dir * (length - hit.time_of_impact);

        if planes.is_full() {
            return;
        }
        planes.push(normal);

        remaining = clip_to_plane(&remaining, &normal);

        // In a corner, sliding along the last plane may go back through a previous one.
        if let Some(blocking) = planes
            .iter()
            .rev()
            .skip(1)
            .find(|other| remaining.dot(other) < -DEFAULT_EPSILON)
        {
            let Some(crease) = normal.cross(blocking).try_normalize(DEFAULT_EPSILON) else {
                return;
            };

            remaining = crease * remaining.dot(&crease);

            if planes.iter().any(|p| remaining.dot(p) < -DEFAULT_EPSILON) {
                return;
            }
        }

        // Never turn back against the requested move.
        if remaining.dot(&desired) <= 0.0 {
            return;
        }
    }
}

fn snap_to_ground(
    foot: &mut Point<Real>,
    eye_height: Real,
    ground: &impl RayCast,
    config: &SlideMoveConfig,
) {
    let probe = config.ground_probe_distance.unwrap_or(eye_height);
    let length = eye_height + probe;

    if !(length > 0.0) {
        return;
    }

    let eye = *foot + *config.up * eye_height;
    let ray = Ray::new(eye, -*config.up);

    if let Some(hit) = ground.test_ray(&ray, length) {
        *foot = ray.point_at(hit.time_of_impact);
    }
}
