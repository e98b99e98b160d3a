use std::path::Path as FsPath;

use scrib_geom::{Point, Pose};
use scrib_script::Command;
use svg::node::element::{path::Data, Circle, Path};
use svg::Document;

// Multiply all dimensions by 10 because firefox doesn't like to see small svgs.
const SCALE: f64 = 10.0;

/// The points the pen visits, in order, starting from the origin.
fn pen_path(cmds: &[Command]) -> Vec<Point> {
    let mut pose = Pose::default();
    let mut points = vec![pose.position];
    for cmd in cmds {
        let d = pose.displacement(cmd);
        pose.advance(&d);
        points.push(pose.position);
    }
    points
}

/// Renders the path a script will draw. Paper y points up and svg y
/// points down, so the drawing is flipped vertically.
pub fn document(cmds: &[Command]) -> Document {
    let points = pen_path(cmds);

    let mut data = Data::new().move_to((points[0].x * SCALE, -points[0].y * SCALE));
    for p in &points[1..] {
        data = data.line_to((p.x * SCALE, -p.y * SCALE));
    }
    let line = Path::new()
        .set("fill", "none")
        .set("stroke", "black")
        .set("stroke-width", 1)
        .set("d", data);
    let start = Circle::new()
        .set("cx", points[0].x * SCALE)
        .set("cy", -points[0].y * SCALE)
        .set("r", 2.0)
        .set("fill", "blue");

    let (mut min_x, mut min_y, mut max_x, mut max_y) = (0.0f64, 0.0f64, 0.0f64, 0.0f64);
    for p in &points {
        min_x = min_x.min(p.x * SCALE);
        max_x = max_x.max(p.x * SCALE);
        min_y = min_y.min(-p.y * SCALE);
        max_y = max_y.max(-p.y * SCALE);
    }
    let margin = 10.0;
    Document::new()
        .set(
            "viewBox",
            (
                min_x - margin,
                min_y - margin,
                max_x - min_x + 2.0 * margin,
                max_y - min_y + 2.0 * margin,
            ),
        )
        .add(start)
        .add(line)
}

pub fn write(cmds: &[Command], out: &FsPath) -> anyhow::Result<()> {
    svg::save(out, &document(cmds))?;
    Ok(())
}
