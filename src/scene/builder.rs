//! Scene builder: turns a board snapshot into the batch of cell entities
//! the render loop and picking engine consume. The whole batch is
//! replaced on every rebuild; there is no incremental diffing.

use glam::Vec3;

use crate::model::{BoardSnapshot, Coord, Dimensions, Symbol};

/// World units between neighboring cells at small board sizes.
pub const SPACING_CAP: f32 = 1.0;
/// Widest extent the grid may span so it stays inside the viewing volume.
pub const GRID_EXTENT: f32 = 6.0;

/// One visual cell at a grid coordinate. `pickable` is derived once at
/// build time and is true only for empty cells.
#[derive(Clone, Debug, PartialEq)]
pub struct CellEntity {
    pub coord: Coord,
    pub symbol: Symbol,
    pub pickable: bool,
    pub position: Vec3,
    pub radius: f32,
}

/// Scales with the largest extent so any board fits the same volume.
pub fn spacing(dims: &Dimensions) -> f32 {
    let largest = dims.width.max(dims.height).max(dims.depth).max(1) as f32;
    (GRID_EXTENT / largest).min(SPACING_CAP)
}

fn centered(index: u32, extent: u32, step: f32) -> f32 {
    (index as f32 - (extent.saturating_sub(1)) as f32 / 2.0) * step
}

/// Builds the full entity batch for a snapshot. Deterministic: the same
/// snapshot always yields the same placements.
pub fn build(snapshot: &BoardSnapshot, dims: &Dimensions) -> Vec<CellEntity> {
    let step = spacing(dims);
    let radius = 0.4 * step;
    let mut entities = Vec::with_capacity((dims.width * dims.height * dims.depth) as usize);
    for z in 0..dims.depth {
        for y in 0..dims.height {
            for x in 0..dims.width {
                let coord = Coord { x, y, z };
                let symbol = snapshot.symbol_at(coord);
                entities.push(CellEntity {
                    coord,
                    symbol,
                    pickable: symbol == Symbol::Empty,
                    position: Vec3::new(
                        centered(x, dims.width, step),
                        // Row 0 renders as the top layer.
                        -centered(y, dims.height, step),
                        centered(z, dims.depth, step),
                    ),
                    radius,
                });
            }
        }
    }
    entities
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn dims(w: u32, h: u32, d: u32) -> Dimensions {
        Dimensions {
            width: w,
            height: h,
            depth: d,
            ..Dimensions::default()
        }
    }

    fn snapshot(dims: &Dimensions, occupied: &[(Coord, Symbol)]) -> BoardSnapshot {
        let row = vec![Symbol::Empty; dims.width as usize];
        let plane = vec![row; dims.height as usize];
        let mut board = vec![plane; dims.depth as usize];
        for (c, s) in occupied {
            board[c.z as usize][c.y as usize][c.x as usize] = *s;
        }
        BoardSnapshot {
            board,
            player: Symbol::X,
        }
    }

    #[test]
    fn one_entity_per_cell_with_unique_coords() {
        for (w, h, d) in [(3, 3, 3), (4, 2, 5), (1, 1, 1), (6, 1, 2)] {
            let dims = dims(w, h, d);
            let snap = snapshot(&dims, &[]);
            let entities = build(&snap, &dims);
            assert_eq!(entities.len(), (w * h * d) as usize);
            let coords: HashSet<_> = entities.iter().map(|e| e.coord).collect();
            assert_eq!(coords.len(), entities.len());
        }
    }

    #[test]
    fn pickable_tracks_the_snapshot_symbol() {
        let dims = dims(3, 3, 3);
        let x_at = Coord { x: 1, y: 2, z: 0 };
        let o_at = Coord { x: 0, y: 0, z: 2 };
        let snap = snapshot(&dims, &[(x_at, Symbol::X), (o_at, Symbol::O)]);
        for e in build(&snap, &dims) {
            if e.coord == x_at {
                assert_eq!(e.symbol, Symbol::X);
                assert!(!e.pickable);
            } else if e.coord == o_at {
                assert_eq!(e.symbol, Symbol::O);
                assert!(!e.pickable);
            } else {
                assert!(e.pickable);
            }
        }
    }

    #[test]
    fn placement_is_centered_on_the_origin() {
        let dims = dims(4, 2, 5);
        let snap = snapshot(&dims, &[]);
        let entities = build(&snap, &dims);
        let sum: Vec3 = entities.iter().map(|e| e.position).sum();
        let centroid = sum / entities.len() as f32;
        assert!(centroid.length() < 1e-4, "centroid = {:?}", centroid);
    }

    #[test]
    fn rebuild_is_deterministic() {
        let dims = dims(3, 4, 3);
        let snap = snapshot(&dims, &[(Coord { x: 2, y: 1, z: 1 }, Symbol::X)]);
        assert_eq!(build(&snap, &dims), build(&snap, &dims));
    }

    #[test]
    fn spacing_shrinks_to_fit_large_boards() {
        assert_eq!(spacing(&dims(3, 3, 3)), 1.0);
        assert_eq!(spacing(&dims(12, 3, 3)), 0.5);
        assert_eq!(spacing(&dims(2, 24, 2)), 0.25);
    }

    #[test]
    fn row_zero_sits_on_top() {
        let dims = dims(3, 3, 3);
        let snap = snapshot(&dims, &[]);
        let entities = build(&snap, &dims);
        let top = entities
            .iter()
            .filter(|e| e.coord.y == 0)
            .map(|e| e.position.y)
            .fold(f32::MIN, f32::max);
        let bottom = entities
            .iter()
            .filter(|e| e.coord.y == 2)
            .map(|e| e.position.y)
            .fold(f32::MAX, f32::min);
        assert!(top > bottom);
    }
}
