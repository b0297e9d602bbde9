//////////////////////////////////////////////////////////////////////
// seam allowances, notches, grainlines and dimension labels.
//
// everything here returns geometry for the render layer to draw;
// nothing touches a drawing surface.

use std::f64::consts::{FRAC_PI_2, PI};

use tracing::debug;

use crate::{Point2d, Vec2d};
use crate::geometry::{midpoint, offset_bezier, orientation_sign};
use crate::piece::Edge;

// edges shorter than this get no allowance and no label
const EDGE_EPS: f64 = 1e-9;

//////////////////////////////////////////////////////////////////////
// text placed in piece coordinates, angle in radians counter-clockwise

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub position: Point2d,
    pub text: String,
    pub angle: f64,
}

pub fn format_inches(length: f64) -> String {
    format!("{:.2}\"", length)
}

// keep text readable: fold the angle into (-pi/2, pi/2]
fn upright(angle: f64) -> f64 {
    if angle > FRAC_PI_2 {
        angle - PI
    } else if angle <= -FRAC_PI_2 {
        angle + PI
    } else {
        angle
    }
}

//////////////////////////////////////////////////////////////////////
// seam allowances

// segment parallel to p1-p2, shifted by offset along the edge direction
// rotated -90 degrees. None for a zero-length edge.
pub fn straight_seam_allowance(p1: &Point2d, p2: &Point2d, offset: f64) -> Option<(Point2d, Point2d)> {

    let d = p2 - p1;
    let len = d.norm();

    if len < EDGE_EPS {
        debug!("no seam allowance for zero-length edge at {:?}", p1);
        return None;
    }

    let n = offset * Vec2d::new(d.y, -d.x) / len;

    Some((p1 + n, p2 + n))

}

pub fn bezier_seam_allowance(p0: &Point2d, p1: &Point2d, p2: &Point2d,
                             offset: f64, n: usize) -> Vec<Point2d> {
    offset_bezier(p0, p1, p2, offset, n)
}

//////////////////////////////////////////////////////////////////////
// construction marks

// vertical shaft plus an arrowhead at each end, barbs pointing back
// toward the middle of the shaft
pub fn grainline(x: f64, y_start: f64, y_end: f64, arrow_size: f64) -> Vec<Vec<Point2d>> {

    let dir = if y_end >= y_start { 1.0 } else { -1.0 };

    let start = Point2d::new(x, y_start);
    let end = Point2d::new(x, y_end);

    let head = |tip: Point2d, back: f64| {
        vec![
            Point2d::new(x - arrow_size, tip.y + back * arrow_size),
            tip,
            Point2d::new(x + arrow_size, tip.y + back * arrow_size),
        ]
    };

    vec![
        vec![start, end],
        head(end, -dir),
        head(start, dir),
    ]

}

// short mark from point along direction. None if direction is zero.
pub fn notch(point: &Point2d, direction: &Vec2d, length: f64) -> Option<(Point2d, Point2d)> {

    let len = direction.norm();

    if len < EDGE_EPS {
        return None;
    }

    Some((*point, point + length * direction / len))

}

//////////////////////////////////////////////////////////////////////
// dimension labels

// outward side of the ring the edges form, judged from their control
// polygons
fn chain_orientation(edges: &[Edge]) -> f64 {

    let mut ring = Vec::new();

    for edge in edges {
        let mut pts = edge.control_polygon();
        pts.pop();
        ring.extend(pts);
    }

    orientation_sign(&ring)

}

// length label for every straight edge, centered on the edge, pushed
// outward by label_offset and rotated along the edge. curves are
// skipped.
pub fn annotate_straight_edges(edges: &[Edge],
                               offset_x: f64,
                               offset_y: f64,
                               label_offset: f64) -> Vec<Label> {

    let sign = chain_orientation(edges);
    let shift = Vec2d::new(offset_x, offset_y);

    let mut labels = Vec::new();

    for edge in edges {

        if let Edge::Straight { p0, p1 } = *edge {

            let d = p1 - p0;
            let len = d.norm();

            if len < EDGE_EPS {
                continue;
            }

            let normal = sign * Vec2d::new(d.y, -d.x) / len;

            labels.push(Label {
                position: midpoint(&p0, &p1) + label_offset * normal + shift,
                text: format_inches(len),
                angle: upright(d.y.atan2(d.x)),
            });

        }

    }

    labels

}

// width centered below, height centered to the left and turned 90 degrees
pub fn annotate_rectangle(x: f64, y: f64, w: f64, h: f64, label_offset: f64) -> Vec<Label> {

    vec![
        Label {
            position: Point2d::new(x + 0.5 * w, y - label_offset),
            text: format_inches(w),
            angle: 0.0,
        },
        Label {
            position: Point2d::new(x - label_offset, y + 0.5 * h),
            text: format_inches(h),
            angle: FRAC_PI_2,
        },
    ]

}

//////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {

    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn straight_allowance_uses_right_hand_side() {

        let (a, b) = straight_seam_allowance(&Point2d::new(0.0, 0.0),
                                             &Point2d::new(4.0, 0.0), 0.5).unwrap();

        assert_eq!(a, Point2d::new(0.0, -0.5));
        assert_eq!(b, Point2d::new(4.0, -0.5));

    }

    #[test]
    fn zero_length_edge_has_no_allowance() {
        let p = Point2d::new(1.0, 2.0);
        assert!(straight_seam_allowance(&p, &p, 0.5).is_none());
    }

    #[test]
    fn grainline_has_shaft_and_two_heads() {

        let lines = grainline(2.0, 1.0, 9.0, 0.25);

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], vec![Point2d::new(2.0, 1.0), Point2d::new(2.0, 9.0)]);

        // top head barbs sit below the tip, bottom head barbs above
        assert_abs_diff_eq!(lines[1][0].y, 8.75);
        assert_eq!(lines[1][1], Point2d::new(2.0, 9.0));
        assert_abs_diff_eq!(lines[2][2].y, 1.25);

    }

    #[test]
    fn notch_is_normalized() {

        let (a, b) = notch(&Point2d::new(1.0, 1.0), &Vec2d::new(0.0, 10.0), 0.25).unwrap();

        assert_eq!(a, Point2d::new(1.0, 1.0));
        assert_abs_diff_eq!(b.y, 1.25, epsilon = 1e-12);
        assert!(notch(&a, &Vec2d::zeros(), 0.25).is_none());

    }

    #[test]
    fn labels_skip_curves_and_sit_outside() {

        let a = Point2d::new(0.0, 0.0);
        let b = Point2d::new(4.0, 0.0);
        let c = Point2d::new(4.0, 3.0);

        let edges = vec![
            Edge::straight(a, b),
            Edge::straight(b, c),
            Edge::bezier(c, Point2d::new(1.0, 3.0), a),
        ];

        let labels = annotate_straight_edges(&edges, 10.0, 0.0, 0.5);

        assert_eq!(labels.len(), 2);

        assert_eq!(labels[0].text, "4.00\"");
        assert_abs_diff_eq!(labels[0].position.x, 12.0, epsilon = 1e-12);
        assert_abs_diff_eq!(labels[0].position.y, -0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(labels[0].angle, 0.0);

        assert_eq!(labels[1].text, "3.00\"");
        assert_abs_diff_eq!(labels[1].position.x, 14.5, epsilon = 1e-12);
        assert_abs_diff_eq!(labels[1].angle, FRAC_PI_2, epsilon = 1e-12);

    }

    #[test]
    fn labels_stay_upright() {

        // top edge of a ccw square runs right to left
        let edges = crate::piece::PieceGeometry::rectangle_edges(Point2d::origin(), 2.0, 2.0);
        let labels = annotate_straight_edges(&edges, 0.0, 0.0, 0.25);

        assert_eq!(labels.len(), 4);

        for label in &labels {
            assert!(label.angle > -FRAC_PI_2 - 1e-12 && label.angle <= FRAC_PI_2 + 1e-12);
        }

        assert_abs_diff_eq!(labels[2].position.y, 2.25, epsilon = 1e-12);

    }

    #[test]
    fn rectangle_labels() {

        let labels = annotate_rectangle(1.0, 1.0, 15.0, 3.0, 0.4);

        assert_eq!(labels[0].text, "15.00\"");
        assert_abs_diff_eq!(labels[0].position.x, 8.5, epsilon = 1e-12);
        assert_abs_diff_eq!(labels[0].position.y, 0.6, epsilon = 1e-12);
        assert_eq!(labels[1].text, "3.00\"");
        assert_abs_diff_eq!(labels[1].angle, FRAC_PI_2);

    }

}
