//! Canvas drawing for the 3D board and the rotation-handle gizmo.
//! Reads only what the other components produced before this frame;
//! never touches the network.

use web_sys::CanvasRenderingContext2d;

use glam::Vec3;

use crate::model::{Coord, Dimensions, Symbol};
use crate::scene::builder::{self, CellEntity};
use crate::scene::camera::{Camera, Orientation};

const BACKGROUND: &str = "#f4f4f4";
const X_COLOR: (u8, u8, u8) = (25, 118, 210);
const O_COLOR: (u8, u8, u8) = (211, 47, 47);

/// Draws one frame. An empty entity batch yields a cleared view, which
/// is what the render loop shows while no game is active.
pub fn draw_board(
    ctx: &CanvasRenderingContext2d,
    width: f64,
    height: f64,
    camera: &Camera,
    orientation: &Orientation,
    entities: &[CellEntity],
    hover: Option<Coord>,
    dims: &Dimensions,
) {
    ctx.set_fill_style_str(BACKGROUND);
    ctx.fill_rect(0.0, 0.0, width, height);
    if entities.is_empty() {
        return;
    }

    draw_ground_grid(ctx, width, height, camera, orientation, dims);

    // Painter's order: farthest view-space depth first.
    let mut order: Vec<(usize, f32)> = entities
        .iter()
        .enumerate()
        .map(|(i, e)| (i, camera.to_view(orientation, e.position).z))
        .collect();
    order.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    for (i, _) in order {
        let e = &entities[i];
        let v = camera.to_view(orientation, e.position);
        let Some((sx, sy, scale)) = camera.project(v, width, height) else {
            continue;
        };
        let r = e.radius as f64 * scale;
        match e.symbol {
            Symbol::Empty => draw_placeholder(ctx, sx, sy, r),
            Symbol::X => draw_sphere(ctx, sx, sy, r, X_COLOR),
            Symbol::O => draw_diamond(ctx, sx, sy, r, O_COLOR),
        }
        if hover == Some(e.coord) && e.pickable {
            ctx.begin_path();
            ctx.set_stroke_style_str("#2ea043");
            ctx.set_line_width(2.0);
            let _ = ctx.arc(sx, sy, r + 3.0, 0.0, std::f64::consts::TAU);
            ctx.stroke();
        }
    }
}

fn draw_ground_grid(
    ctx: &CanvasRenderingContext2d,
    width: f64,
    height: f64,
    camera: &Camera,
    orientation: &Orientation,
    dims: &Dimensions,
) {
    let step = builder::spacing(dims);
    let n = dims.width.max(dims.depth) + 1;
    let half = n as f32 * step / 2.0;
    let y = -((dims.height.saturating_sub(1)) as f32 / 2.0 * step + 0.7 * step);

    ctx.set_stroke_style_str("#c9c9c9");
    ctx.set_line_width(1.0);
    let mut line = |a: Vec3, b: Vec3| {
        let pa = camera.project(camera.to_view(orientation, a), width, height);
        let pb = camera.project(camera.to_view(orientation, b), width, height);
        if let (Some((ax, ay, _)), Some((bx, by, _))) = (pa, pb) {
            ctx.begin_path();
            ctx.move_to(ax, ay);
            ctx.line_to(bx, by);
            ctx.stroke();
        }
    };
    for i in 0..=n {
        let offset = -half + i as f32 * step;
        line(Vec3::new(-half, y, offset), Vec3::new(half, y, offset));
        line(Vec3::new(offset, y, -half), Vec3::new(offset, y, half));
    }
}

fn draw_placeholder(ctx: &CanvasRenderingContext2d, sx: f64, sy: f64, r: f64) {
    ctx.begin_path();
    ctx.set_fill_style_str("rgba(255,255,255,0.25)");
    let _ = ctx.arc(sx, sy, r, 0.0, std::f64::consts::TAU);
    ctx.fill();
    ctx.set_stroke_style_str("rgba(110,110,110,0.35)");
    ctx.set_line_width(1.0);
    ctx.stroke();
}

/// Layered circles fake a lit sphere well enough at this scale.
fn draw_sphere(ctx: &CanvasRenderingContext2d, sx: f64, sy: f64, r: f64, base: (u8, u8, u8)) {
    for i in 0..3 {
        let t = i as f64 / 2.0;
        let layer_r = r * (1.0 - t * 0.18);
        let lift = (t * 28.0) as u8;
        let color = format!(
            "rgb({},{},{})",
            base.0.saturating_add(lift),
            base.1.saturating_add(lift),
            base.2.saturating_add(lift)
        );
        ctx.begin_path();
        ctx.set_fill_style_str(&color);
        let _ = ctx.arc(sx - t * r * 0.12, sy - t * r * 0.12, layer_r, 0.0, std::f64::consts::TAU);
        ctx.fill();
    }
}

fn draw_diamond(ctx: &CanvasRenderingContext2d, sx: f64, sy: f64, r: f64, base: (u8, u8, u8)) {
    ctx.begin_path();
    ctx.set_fill_style_str(&format!("rgb({},{},{})", base.0, base.1, base.2));
    ctx.move_to(sx, sy - r);
    ctx.line_to(sx + r, sy);
    ctx.line_to(sx, sy + r);
    ctx.line_to(sx - r, sy);
    ctx.close_path();
    ctx.fill();
    ctx.set_stroke_style_str("rgba(0,0,0,0.25)");
    ctx.set_line_width(1.0);
    ctx.stroke();
}

/// The decorative gizmo on the rotation handle: three rotated axis arms
/// around a ring, back arms dimmed.
pub fn draw_handle(ctx: &CanvasRenderingContext2d, size: f64, orientation: &Orientation) {
    ctx.clear_rect(0.0, 0.0, size, size);
    let c = size / 2.0;
    ctx.begin_path();
    ctx.set_fill_style_str(BACKGROUND);
    let _ = ctx.arc(c, c, c - 1.0, 0.0, std::f64::consts::TAU);
    ctx.fill();
    ctx.set_stroke_style_str("#b9b9b9");
    ctx.set_line_width(1.0);
    ctx.stroke();

    let rot = orientation.rotation();
    let len = size * 0.34;
    let mut arms = [
        (rot * Vec3::X, "#d32f2f"),
        (rot * Vec3::Y, "#2ea043"),
        (rot * Vec3::Z, "#1976d2"),
    ];
    arms.sort_by(|a, b| a.0.z.partial_cmp(&b.0.z).unwrap_or(std::cmp::Ordering::Equal));
    for (v, color) in arms {
        let ex = c + v.x as f64 * len;
        let ey = c - v.y as f64 * len;
        ctx.set_global_alpha(if v.z < 0.0 { 0.45 } else { 1.0 });
        ctx.begin_path();
        ctx.set_stroke_style_str(color);
        ctx.set_line_width(2.0);
        ctx.move_to(c, c);
        ctx.line_to(ex, ey);
        ctx.stroke();
        ctx.begin_path();
        ctx.set_fill_style_str(color);
        let _ = ctx.arc(ex, ey, 3.0, 0.0, std::f64::consts::TAU);
        ctx.fill();
    }
    ctx.set_global_alpha(1.0);
}
