//////////////////////////////////////////////////////////////////////
// pattern pieces: classified boundary edges, outline geometry,
// interior markings, and the one-way drafting lifecycle
//
//   Undrafted -> BoundaryComputed -> Annotated -> PatternPiece

use std::fmt;

use tracing::debug;

use crate::Point2d;
use crate::annotate::{self, Label};
use crate::geometry::{Rect2d, distance, mirror_x, orientation_sign, path_length, sample_bezier};
use crate::measurements::MeasurementKey;

// endpoints closer than this are considered shared
pub const JOIN_TOLERANCE: f64 = 1e-9;

//////////////////////////////////////////////////////////////////////
// boundary edges

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Edge {
    Straight { p0: Point2d, p1: Point2d },
    Bezier { p0: Point2d, ctrl: Point2d, p2: Point2d },
}

impl Edge {

    pub fn straight(p0: Point2d, p1: Point2d) -> Self {
        Edge::Straight { p0, p1 }
    }

    pub fn bezier(p0: Point2d, ctrl: Point2d, p2: Point2d) -> Self {
        Edge::Bezier { p0, ctrl, p2 }
    }

    pub fn start(&self) -> Point2d {
        match *self {
            Edge::Straight { p0, .. } => p0,
            Edge::Bezier { p0, .. } => p0,
        }
    }

    pub fn end(&self) -> Point2d {
        match *self {
            Edge::Straight { p1, .. } => p1,
            Edge::Bezier { p2, .. } => p2,
        }
    }

    // same edge walked the other way
    pub fn reversed(&self) -> Self {
        match *self {
            Edge::Straight { p0, p1 } => Edge::Straight { p0: p1, p1: p0 },
            Edge::Bezier { p0, ctrl, p2 } => Edge::Bezier { p0: p2, ctrl, p2: p0 },
        }
    }

    // reflection across x = 0, direction preserved
    pub fn mirrored(&self) -> Self {
        match *self {
            Edge::Straight { p0, p1 } =>
                Edge::Straight { p0: mirror_x(&p0), p1: mirror_x(&p1) },
            Edge::Bezier { p0, ctrl, p2 } =>
                Edge::Bezier { p0: mirror_x(&p0), ctrl: mirror_x(&ctrl), p2: mirror_x(&p2) },
        }
    }

    pub fn control_polygon(&self) -> Vec<Point2d> {
        match *self {
            Edge::Straight { p0, p1 } => vec![p0, p1],
            Edge::Bezier { p0, ctrl, p2 } => vec![p0, ctrl, p2],
        }
    }

    // length of the control polygon; exact for straight edges and a
    // chord approximation for curves
    pub fn chord_length(&self) -> f64 {
        path_length(&self.control_polygon())
    }

    // polyline including both endpoints
    pub fn flatten(&self, samples: usize) -> Vec<Point2d> {
        match *self {
            Edge::Straight { p0, p1 } => vec![p0, p1],
            Edge::Bezier { p0, ctrl, p2 } => sample_bezier(&p0, &ctrl, &p2, samples),
        }
    }

}

// concatenate edges into one ring of points. shared endpoints appear
// once and the closing point is not repeated.
pub fn flatten_edges(edges: &[Edge], samples: usize) -> Vec<Point2d> {

    let mut rval = Vec::new();

    for edge in edges {
        let mut points = edge.flatten(samples);
        points.pop();
        rval.extend(points);
    }

    if let (Some(first), Some(last)) = (edges.first(), edges.last()) {
        if distance(&first.start(), &last.end()) > JOIN_TOLERANCE {
            rval.push(last.end());
        }
    }

    rval

}

// each edge starts where the previous one ended
pub fn is_connected(edges: &[Edge]) -> bool {
    edges.windows(2).all(|w| distance(&w[0].end(), &w[1].start()) <= JOIN_TOLERANCE)
}

// connected and returns to its starting point
pub fn is_closed(edges: &[Edge]) -> bool {
    match (edges.first(), edges.last()) {
        (Some(first), Some(last)) =>
            is_connected(edges) && distance(&last.end(), &first.start()) <= JOIN_TOLERANCE,
        _ => false
    }
}

//////////////////////////////////////////////////////////////////////
// outline geometry

#[derive(Debug, Clone, PartialEq)]
pub enum PieceGeometry {
    Polygon(Vec<Point2d>),
    Rectangle { origin: Point2d, width: f64, height: f64 },
    Circle { center: Point2d, radius: f64 },
}

impl PieceGeometry {

    pub fn bounding_box(&self) -> Rect2d {

        match self {

            PieceGeometry::Polygon(points) => {
                let mut rect = Rect2d::empty();
                for p in points {
                    rect.expand(p);
                }
                rect
            },

            PieceGeometry::Rectangle { origin, width, height } => {
                Rect2d::from_origin_dims(*origin, *width, *height)
            },

            PieceGeometry::Circle { center, radius } => {
                Rect2d::new(*center, *center).inflate(*radius)
            }

        }

    }

    // counter-clockwise corners starting lower left
    pub fn rectangle_edges(origin: Point2d, width: f64, height: f64) -> Vec<Edge> {

        let p0 = origin;
        let p1 = Point2d::new(origin.x + width, origin.y);
        let p2 = Point2d::new(origin.x + width, origin.y + height);
        let p3 = Point2d::new(origin.x, origin.y + height);

        vec![
            Edge::straight(p0, p1),
            Edge::straight(p1, p2),
            Edge::straight(p2, p3),
            Edge::straight(p3, p0),
        ]

    }

}

//////////////////////////////////////////////////////////////////////
// interior markings

#[derive(Debug, Clone, PartialEq)]
pub enum Marking {
    FoldLine { p0: Point2d, p1: Point2d },
    PlacketIndicator(PieceGeometry),
    Notch { p0: Point2d, p1: Point2d },
    Grainline(Vec<Vec<Point2d>>),
    Button(PieceGeometry),
}

impl Marking {

    pub fn bounding_box(&self) -> Rect2d {

        let mut rect = Rect2d::empty();

        match self {
            Marking::FoldLine { p0, p1 } | Marking::Notch { p0, p1 } => {
                rect.expand(p0);
                rect.expand(p1);
            },
            Marking::PlacketIndicator(geom) | Marking::Button(geom) => {
                rect.expand_rect(&geom.bounding_box());
            },
            Marking::Grainline(lines) => {
                for p in lines.iter().flatten() {
                    rect.expand(p);
                }
            }
        }

        rect

    }

}

//////////////////////////////////////////////////////////////////////
// the garment components

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub enum PieceKind {
    FrontBody,
    BackBody,
    Sleeve,
    Collar,
    CollarInterfacing,
    PlacketButtonSide,
    PlacketButtonholeSide,
    PlacketInterfacing,
}

pub const ALL_PIECES: [PieceKind; 8] = [
    PieceKind::FrontBody,
    PieceKind::BackBody,
    PieceKind::Sleeve,
    PieceKind::Collar,
    PieceKind::CollarInterfacing,
    PieceKind::PlacketButtonSide,
    PieceKind::PlacketButtonholeSide,
    PieceKind::PlacketInterfacing,
];

impl PieceKind {

    pub fn title(self) -> &'static str {
        match self {
            PieceKind::FrontBody => "Front Body",
            PieceKind::BackBody => "Back Body",
            PieceKind::Sleeve => "Sleeve",
            PieceKind::Collar => "Collar",
            PieceKind::CollarInterfacing => "Collar Interfacing",
            PieceKind::PlacketButtonSide => "Placket (Button Side)",
            PieceKind::PlacketButtonholeSide => "Placket (Buttonhole Side)",
            PieceKind::PlacketInterfacing => "Placket Interfacing",
        }
    }

    pub fn cut_note(self) -> &'static str {
        match self {
            PieceKind::FrontBody => "Cut 1",
            PieceKind::BackBody => "Cut 1 on fold",
            PieceKind::Sleeve => "Cut 2",
            PieceKind::Collar => "Cut 2",
            PieceKind::CollarInterfacing => "Cut 1 in interfacing",
            PieceKind::PlacketButtonSide => "Cut 1",
            PieceKind::PlacketButtonholeSide => "Cut 1",
            PieceKind::PlacketInterfacing => "Cut 2 in interfacing",
        }
    }

    pub fn is_interfacing(self) -> bool {
        matches!(self, PieceKind::CollarInterfacing | PieceKind::PlacketInterfacing)
    }

    pub fn required_measurements(self) -> &'static [MeasurementKey] {

        use MeasurementKey::*;

        match self {
            PieceKind::FrontBody => &[HalfChest, GarmentLength, NeckWidthHalf, FrontNeckDrop,
                                      ShoulderWidth, ShoulderSlope, ArmholeDepth,
                                      PlacketWidth, PlacketLength],
            PieceKind::BackBody => &[HalfChest, GarmentLength, NeckWidthHalf, BackNeckDrop,
                                     ShoulderWidth, ShoulderSlope, ArmholeDepth],
            PieceKind::Sleeve => &[SleeveLength, SleeveBicep, SleeveCuff],
            PieceKind::Collar | PieceKind::CollarInterfacing => &[CollarHeight],
            PieceKind::PlacketButtonSide |
            PieceKind::PlacketButtonholeSide |
            PieceKind::PlacketInterfacing => &[PlacketWidth, PlacketLength],
        }

    }

}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.title())
    }
}

//////////////////////////////////////////////////////////////////////
// a supplied measurement that drafting had to change

#[derive(Debug, Clone, PartialEq)]
pub struct Adjustment {
    pub piece: PieceKind,
    pub measurement: MeasurementKey,
    pub supplied: f64,
    pub used: f64,
    pub reason: &'static str,
}

impl fmt::Display for Adjustment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:}: {:} clamped from {:.3} to {:.3} ({:})",
               self.piece, self.measurement, self.supplied, self.used, self.reason)
    }
}

//////////////////////////////////////////////////////////////////////
// finished piece, immutable once produced

#[derive(Debug, Clone, PartialEq)]
pub struct PatternPiece {

    pub kind: PieceKind,
    pub edges: Vec<Edge>,              // ordered seam edges
    pub fold: Option<Edge>,            // closes cut-on-fold pieces
    pub neckline: Option<Edge>,        // half neck, HPS -> control -> center
    pub outline: PieceGeometry,
    pub boundary: Vec<Point2d>,        // flattened edges
    pub markings: Vec<Marking>,
    pub seam_allowance: Vec<Vec<Point2d>>,
    pub labels: Vec<Label>,
    pub adjustments: Vec<Adjustment>,

}

impl PatternPiece {

    pub fn title(&self) -> &'static str {
        self.kind.title()
    }

    pub fn cut_note(&self) -> &'static str {
        self.kind.cut_note()
    }

    pub fn is_interfacing(&self) -> bool {
        self.kind.is_interfacing()
    }

    // closed by its own edges, or by the fold for cut-on-fold pieces
    pub fn is_closed(&self) -> bool {
        match &self.fold {
            None => is_closed(&self.edges),
            Some(fold) => {
                let mut ring = self.edges.clone();
                ring.push(*fold);
                is_closed(&ring)
            }
        }
    }

    // finished size (no seam allowance)
    pub fn bounds(&self) -> Rect2d {
        self.outline.bounding_box()
    }

    pub fn width(&self) -> f64 {
        self.bounds().dims().x
    }

    pub fn height(&self) -> f64 {
        self.bounds().dims().y
    }

}

//////////////////////////////////////////////////////////////////////
// lifecycle stages. each transition consumes the previous stage so a
// piece can't go backwards or be annotated twice.

#[derive(Debug)]
pub struct Undrafted {
    kind: PieceKind
}

#[derive(Debug)]
pub struct BoundaryComputed {
    kind: PieceKind,
    edges: Vec<Edge>,
    fold: Option<Edge>,
    neckline: Option<Edge>,
    outline: PieceGeometry,
    boundary: Vec<Point2d>,
    markings: Vec<Marking>,
    adjustments: Vec<Adjustment>,
}

#[derive(Debug)]
pub struct Annotated {
    drafted: BoundaryComputed,
    seam_allowance: Vec<Vec<Point2d>>,
    labels: Vec<Label>,
}

impl Undrafted {

    pub fn new(kind: PieceKind) -> Self {
        Undrafted { kind }
    }

    // polygon piece from an edge chain
    pub fn with_edges(self, edges: Vec<Edge>, samples: usize) -> BoundaryComputed {

        let boundary = flatten_edges(&edges, samples);

        BoundaryComputed {
            kind: self.kind,
            outline: PieceGeometry::Polygon(boundary.clone()),
            boundary,
            edges,
            fold: None,
            neckline: None,
            markings: Vec::new(),
            adjustments: Vec::new(),
        }

    }

    // rectangular piece
    pub fn with_rectangle(self, origin: Point2d, width: f64, height: f64) -> BoundaryComputed {

        let edges = PieceGeometry::rectangle_edges(origin, width, height);
        let boundary = flatten_edges(&edges, 1);

        BoundaryComputed {
            kind: self.kind,
            outline: PieceGeometry::Rectangle { origin, width, height },
            boundary,
            edges,
            fold: None,
            neckline: None,
            markings: Vec::new(),
            adjustments: Vec::new(),
        }

    }

}

impl BoundaryComputed {

    // the fold closes the ring; it also gets a fold line marking
    pub fn with_fold(mut self, fold: Edge) -> Self {
        self.markings.push(Marking::FoldLine { p0: fold.start(), p1: fold.end() });
        self.fold = Some(fold);
        self
    }

    pub fn with_neckline(mut self, neckline: Edge) -> Self {
        self.neckline = Some(neckline);
        self
    }

    pub fn mark(mut self, marking: Marking) -> Self {
        self.markings.push(marking);
        self
    }

    pub fn adjusted(mut self, adjustment: Adjustment) -> Self {
        self.adjustments.push(adjustment);
        self
    }

    // +1 if the ring runs counter-clockwise
    pub fn orientation(&self) -> f64 {
        orientation_sign(&self.boundary)
    }

    // seam allowance outlines and dimension labels
    pub fn annotate(self, seam_allowance: f64, label_offset: f64, samples: usize) -> Annotated {

        let sign = self.orientation();

        let mut offsets = Vec::new();

        if !self.kind.is_interfacing() && seam_allowance > 0.0 {

            for edge in &self.edges {

                match *edge {

                    Edge::Straight { p0, p1 } => {
                        if let Some((q0, q1)) = annotate::straight_seam_allowance(&p0, &p1, sign * seam_allowance) {
                            offsets.push(vec![q0, q1]);
                        }
                    },

                    Edge::Bezier { p0, ctrl, p2 } => {
                        let curve = annotate::bezier_seam_allowance(&p0, &ctrl, &p2, sign * seam_allowance, samples);
                        if curve.len() > 1 {
                            offsets.push(curve);
                        }
                    }

                }

            }

        }

        let labels = match &self.outline {
            PieceGeometry::Rectangle { origin, width, height } =>
                annotate::annotate_rectangle(origin.x, origin.y, *width, *height, label_offset),
            _ =>
                annotate::annotate_straight_edges(&self.edges, 0.0, 0.0, label_offset),
        };

        debug!("annotated {:}: {:} seam allowance runs, {:} labels",
               self.kind, offsets.len(), labels.len());

        Annotated { drafted: self, seam_allowance: offsets, labels }

    }

}

impl Annotated {

    pub fn finalize(self) -> PatternPiece {

        let d = self.drafted;

        PatternPiece {
            kind: d.kind,
            edges: d.edges,
            fold: d.fold,
            neckline: d.neckline,
            outline: d.outline,
            boundary: d.boundary,
            markings: d.markings,
            seam_allowance: self.seam_allowance,
            labels: self.labels,
            adjustments: d.adjustments,
        }

    }

}

//////////////////////////////////////////////////////////////////////
