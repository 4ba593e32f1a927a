//! Picking engine: resolves a pointer position to the nearest pickable
//! cell by casting a ray through the camera and intersecting spheres.
//! Pure with respect to the current frame; no network involvement.

use glam::Vec3;
use std::cmp::Ordering;

use crate::scene::builder::CellEntity;
use crate::scene::camera::{Camera, Orientation};

/// Nearest positive hit of a ray against a sphere, as a distance along
/// the ray. Grazing starts inside the sphere fall back to the far root.
fn ray_sphere(origin: Vec3, dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = origin - center;
    let b = oc.dot(dir);
    let c = oc.length_squared() - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sq = disc.sqrt();
    let near = -b - sq;
    if near > 1e-3 {
        return Some(near);
    }
    let far = -b + sq;
    (far > 1e-3).then_some(far)
}

/// Resolves the topmost empty cell under the pointer, if any. Occupied
/// cells never enter the candidate set, so a marker sitting in front of
/// an empty cell does not shadow it.
pub fn pick<'a>(
    pointer: (f64, f64),
    viewport: (f64, f64),
    camera: &Camera,
    orientation: &Orientation,
    entities: &'a [CellEntity],
) -> Option<&'a CellEntity> {
    let (origin, dir) = camera.ray(orientation, pointer.0, pointer.1, viewport.0, viewport.1);
    entities
        .iter()
        .filter(|e| e.pickable)
        .filter_map(|e| ray_sphere(origin, dir, e.position, e.radius).map(|t| (e, t)))
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
        .map(|(e, _)| e)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Coord, Symbol};

    const VIEW: (f64, f64) = (640.0, 480.0);
    const CENTER: (f64, f64) = (320.0, 240.0);

    fn cell(x: u32, z_world: f32, symbol: Symbol) -> CellEntity {
        CellEntity {
            coord: Coord { x, y: 0, z: 0 },
            symbol,
            pickable: symbol == Symbol::Empty,
            position: Vec3::new(0.0, 0.0, z_world),
            radius: 0.4,
        }
    }

    #[test]
    fn picks_the_cell_under_the_center_pixel() {
        let cam = Camera::default();
        let o = Orientation::default();
        let entities = vec![cell(0, 0.0, Symbol::Empty)];
        let hit = pick(CENTER, VIEW, &cam, &o, &entities).expect("hit");
        assert_eq!(hit.coord, Coord { x: 0, y: 0, z: 0 });
    }

    #[test]
    fn nearest_empty_wins_when_several_line_up() {
        let cam = Camera::default();
        let o = Orientation::default();
        // Camera sits at +Z, so the entity at z=2 is closer than z=-2.
        let entities = vec![cell(0, -2.0, Symbol::Empty), cell(1, 2.0, Symbol::Empty)];
        let hit = pick(CENTER, VIEW, &cam, &o, &entities).expect("hit");
        assert_eq!(hit.coord.x, 1);
    }

    #[test]
    fn occupied_cell_in_front_does_not_shadow_an_empty_one() {
        let cam = Camera::default();
        let o = Orientation::default();
        let entities = vec![cell(0, 2.0, Symbol::X), cell(1, -2.0, Symbol::Empty)];
        let hit = pick(CENTER, VIEW, &cam, &o, &entities).expect("hit");
        assert_eq!(hit.coord.x, 1);
    }

    #[test]
    fn never_returns_an_occupied_cell_regardless_of_view_angle() {
        let cam = Camera::default();
        let entities = vec![cell(0, 0.0, Symbol::X), cell(1, 1.0, Symbol::O)];
        let mut o = Orientation::default();
        for step in 0..48 {
            o.apply_delta(37.0 * (step % 5) as f64, -23.0 * (step % 7) as f64);
            assert!(pick(CENTER, VIEW, &cam, &o, &entities).is_none());
        }
    }

    #[test]
    fn pointer_off_every_sphere_misses() {
        let cam = Camera::default();
        let o = Orientation::default();
        let entities = vec![cell(0, 0.0, Symbol::Empty)];
        assert!(pick((4.0, 4.0), VIEW, &cam, &o, &entities).is_none());
    }

    #[test]
    fn ray_sphere_reports_the_near_surface() {
        let t = ray_sphere(
            Vec3::new(0.0, 0.0, 10.0),
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::ZERO,
            0.5,
        )
        .expect("intersects");
        assert!((t - 9.5).abs() < 1e-4);
    }
}
