//////////////////////////////////////////////////////////////////////
// plane geometry for drafting: distances, quadratic Bezier curves,
// curve offsetting, bounding rects and page transforms.
//
// all coordinates are inches in a piece-local frame with y up.

use tracing::debug;

use crate::{Matrix3d, Point2d, Transform2d, Translation2d, Vec2d};

// tangents shorter than this are treated as zero
const TANGENT_EPS: f64 = 1e-12;

//////////////////////////////////////////////////////////////////////
// distances

pub fn distance(p1: &Point2d, p2: &Point2d) -> f64 {
    (p2 - p1).norm()
}

// sum of consecutive distances, 0 for fewer than two points
pub fn path_length(points: &[Point2d]) -> f64 {
    points.windows(2).map(|w| distance(&w[0], &w[1])).sum()
}

//////////////////////////////////////////////////////////////////////
// quadratic Bezier with start p0, single control point p1, end p2

pub fn bezier_point(p0: &Point2d, p1: &Point2d, p2: &Point2d, t: f64) -> Point2d {

    let u = 1.0 - t;

    Point2d::from(p0.coords * (u * u) +
                  p1.coords * (2.0 * u * t) +
                  p2.coords * (t * t))

}

// analytic derivative dB/dt
pub fn bezier_tangent(p0: &Point2d, p1: &Point2d, p2: &Point2d, t: f64) -> Vec2d {
    2.0 * (1.0 - t) * (p1 - p0) + 2.0 * t * (p2 - p1)
}

// parameter value for sample i of n; last one is exactly 1
fn sample_t(i: usize, n: usize) -> f64 {
    if n == 0 { 0.0 } else { i as f64 / n as f64 }
}

// n+1 points at uniform t from 0 to 1 inclusive
pub fn sample_bezier(p0: &Point2d, p1: &Point2d, p2: &Point2d, n: usize) -> Vec<Point2d> {
    (0..=n).map(|i| bezier_point(p0, p1, p2, sample_t(i, n))).collect()
}

// displace each sample by offset along the tangent rotated -90 degrees
// (the outward side of a counter-clockwise ring). samples whose tangent
// vanishes are dropped.
pub fn offset_bezier(p0: &Point2d, p1: &Point2d, p2: &Point2d,
                     offset: f64, n: usize) -> Vec<Point2d> {

    let mut rval = Vec::with_capacity(n + 1);

    for i in 0..=n {

        let t = sample_t(i, n);

        let tangent = bezier_tangent(p0, p1, p2, t);
        let len = tangent.norm();

        if len < TANGENT_EPS {
            debug!("skipping degenerate curve sample at t={:}", t);
            continue;
        }

        let normal = Vec2d::new(tangent.y, -tangent.x) / len;

        rval.push(bezier_point(p0, p1, p2, t) + offset * normal);

    }

    rval

}

// highest sample of the curve; the first maximum wins ties
pub fn max_y_point(p0: &Point2d, p1: &Point2d, p2: &Point2d, n: usize) -> Point2d {

    let mut best = *p0;

    for p in sample_bezier(p0, p1, p2, n) {
        if p.y > best.y {
            best = p;
        }
    }

    best

}

//////////////////////////////////////////////////////////////////////
// misc helpers on point sequences

// reflect across the vertical axis x = 0
pub fn mirror_x(p: &Point2d) -> Point2d {
    Point2d::new(-p.x, p.y)
}

// shoelace area, positive for counter-clockwise rings
pub fn signed_area(points: &[Point2d]) -> f64 {

    let n = points.len();

    if n < 3 {
        return 0.0;
    }

    let mut area = 0.0;

    for (idx, p0) in points.iter().enumerate() {
        let p1 = &points[(idx + 1) % n];
        area += p0.x * p1.y - p1.x * p0.y;
    }

    0.5 * area

}

// +1 for counter-clockwise rings, -1 for clockwise ones. multiplying an
// offset by this makes it point away from the interior.
pub fn orientation_sign(points: &[Point2d]) -> f64 {
    if signed_area(points) < 0.0 { -1.0 } else { 1.0 }
}

// midpoint of a segment
pub fn midpoint(p1: &Point2d, p2: &Point2d) -> Point2d {
    p1 + 0.5 * (p2 - p1)
}

//////////////////////////////////////////////////////////////////////
// Rect2d type has lower-left p0 and upper-right p1

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect2d {

    pub p0: Point2d,
    pub p1: Point2d

}

impl Rect2d {

    // empty rectangle has p0 > p1
    pub fn empty() -> Self {

        let p0 = Point2d::new(f64::MAX, f64::MAX);
        let p1 = -p0;

        Rect2d { p0, p1 }

    }

    // new rect from points
    pub fn new(p0: Point2d, p1: Point2d) -> Self {
        Rect2d { p0, p1 }
    }

    // rect from lower-left corner and dimensions
    pub fn from_origin_dims(origin: Point2d, width: f64, height: f64) -> Self {
        Rect2d { p0: origin, p1: origin + Vec2d::new(width, height) }
    }

    pub fn is_empty(&self) -> bool {
        self.p0.x > self.p1.x || self.p0.y > self.p1.y
    }

    // expand this rect to include the given point
    pub fn expand(&mut self, p: &Point2d) {
        self.p0 = self.p0.inf(p);
        self.p1 = self.p1.sup(p);
    }

    // expand this rect to include another one
    pub fn expand_rect(&mut self, other: &Rect2d) {
        if !other.is_empty() {
            self.expand(&other.p0);
            self.expand(&other.p1);
        }
    }

    // grow by margin on every side
    pub fn inflate(&self, margin: f64) -> Self {
        let m = Vec2d::repeat(margin);
        Rect2d { p0: self.p0 - m, p1: self.p1 + m }
    }

    // dimensions of this rect
    pub fn dims(&self) -> Vec2d {
        self.p1 - self.p0
    }

    // center of this rect
    pub fn center(&self) -> Point2d {
        self.p0 + 0.5*(self.p1 - self.p0)
    }

    pub fn contains(&self, p: &Point2d) -> bool {
        p.x >= self.p0.x && p.x <= self.p1.x &&
            p.y >= self.p0.y && p.y <= self.p1.y
    }

    // do the interiors overlap?
    pub fn overlaps(&self, other: &Rect2d) -> bool {
        self.p0.x < other.p1.x && other.p0.x < self.p1.x &&
            self.p0.y < other.p1.y && other.p0.y < self.p1.y
    }

}

//////////////////////////////////////////////////////////////////////
//
// make a Transform2d that will translate and scale the given
// contents_rect (input) to the given page_rect (output), preserving
// aspect ratio.
//
// always includes vertical flip because graphics coordinate system
// is left-handed (y increases going down)
//
// optionally include horizontal flip too
//

#[derive(Debug,PartialEq,Clone,Copy)]
pub enum HFlip {
    Yes,
    No
}

pub fn get_page_transform(contents_rect: &Rect2d,
                          page_rect: &Rect2d,
                          hflip: HFlip) -> (Transform2d, f64) {

    let cdims = contents_rect.dims();
    let pdims = page_rect.dims();

    let scl = (pdims.component_div(&cdims)).min();

    let vmid = contents_rect.center();
    let pmid = page_rect.center();

    let translate_page = Translation2d::new(pmid[0], pmid[1]);

    let hsign = if hflip == HFlip::Yes { -1.0 } else { 1.0 };

    let scale = Transform2d::from_matrix_unchecked(
        Matrix3d::new(
            scl*hsign, 0.0, 0.0,
            0.0, -scl, 0.0,
            0.0, 0.0, 1.0
        )
    );

    let translate_points = Translation2d::new(-vmid[0], -vmid[1]);

    let transform = translate_page * scale * translate_points;

    (transform, scl)

}

//////////////////////////////////////////////////////////////////////
