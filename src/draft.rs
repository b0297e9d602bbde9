//////////////////////////////////////////////////////////////////////
// drafting engine: measurement set -> pattern pieces
//
// pieces are drafted in two phases. the body pieces come first and
// yield the neckline lengths; the collar length derived from them is
// recorded once and only then can the collar be drafted.

use tracing::{debug, info, warn};

use crate::{Point2d, Vec2d};
use crate::annotate::{grainline, notch};
use crate::derived::NecklineLengths;
use crate::errors::*;
use crate::geometry::{bezier_point, bezier_tangent, max_y_point, mirror_x};
use crate::measurements::{MeasurementKey, MeasurementSet, COLLAR_LENGTH};
use crate::piece::{ALL_PIECES, Adjustment, BoundaryComputed, Edge, Marking,
                   PatternPiece, PieceGeometry, PieceKind, Undrafted};

//////////////////////////////////////////////////////////////////////
// curve control placement, tuned by eye

const ARMHOLE_CONTROL_X: f64 = 0.2;    // fraction of underarm/shoulder gap
const ARMHOLE_CONTROL_Y: f64 = 0.15;   // fraction of armhole depth above underarm
const NECK_CONTROL_X: f64 = 0.85;      // fraction of neck width from center
const SLEEVE_CAP_CONTROL_X: f64 = 0.5; // fraction of half bicep

// cap height is a fixed share of sleeve length
const SLEEVE_CAP_FRACTION: f64 = 0.25;

// slope is forced below width by this factor when it would reach it
const SHOULDER_SLOPE_CLAMP: f64 = 0.98;

const BUTTON_RADIUS: f64 = 0.15;

// option limits
pub const MAX_CURVE_SAMPLES: usize = 10_000;
pub const MAX_BUTTONS: usize = 12;

// grainline span as fractions of piece height
const GRAIN_START: f64 = 0.2;
const GRAIN_END: f64 = 0.6;

//////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, PartialEq)]
pub struct DraftOptions {
    pub seam_allowance: f64,  // inches, 0 disables
    pub curve_samples: usize, // samples per Bezier edge
    pub label_offset: f64,    // distance of dimension labels from edges
    pub buttons: usize,       // on the button-side placket
    pub notch_length: f64,
    pub arrow_size: f64,      // grainline arrowheads
}

impl Default for DraftOptions {
    fn default() -> Self {
        DraftOptions {
            seam_allowance: 0.5,
            curve_samples: 24,
            label_offset: 0.35,
            buttons: 3,
            notch_length: 0.25,
            arrow_size: 0.3,
        }
    }
}

impl DraftOptions {

    pub fn validate(&self) -> Result<()> {

        if !(self.seam_allowance.is_finite() && self.seam_allowance >= 0.0) {
            bail!("seam allowance must be zero or positive, got {:}", self.seam_allowance);
        }

        if self.curve_samples == 0 || self.curve_samples > MAX_CURVE_SAMPLES {
            bail!("curve_samples must be between 1 and {:}, got {:}",
                  MAX_CURVE_SAMPLES, self.curve_samples);
        }

        if self.buttons > MAX_BUTTONS {
            bail!("buttons must be at most {:}, got {:}", MAX_BUTTONS, self.buttons);
        }

        for &(name, value) in &[("label offset", self.label_offset),
                                ("notch length", self.notch_length),
                                ("arrow size", self.arrow_size)] {
            if !(value.is_finite() && value >= 0.0) {
                bail!("{:} must be zero or positive, got {:}", name, value);
            }
        }

        Ok(())

    }

}

//////////////////////////////////////////////////////////////////////
// shoulder tip offset from HPS

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShoulderGeometry {
    pub dx: f64,       // horizontal run of the shoulder seam
    pub slope: f64,    // drop actually used
    pub clamped: bool, // slope was reduced
}

pub fn shoulder_geometry(width: f64, slope: f64) -> ShoulderGeometry {

    let (slope, clamped) = if slope >= width {
        (SHOULDER_SLOPE_CLAMP * width, true)
    } else {
        (slope, false)
    };

    let dx = (width * width - slope * slope).max(0.0).sqrt();

    ShoulderGeometry { dx, slope, clamped }

}

//////////////////////////////////////////////////////////////////////
// landmarks shared by the front and back body

struct BodyFrame {
    width: f64,       // center line to side seam
    length: f64,      // HPS to hem
    hps: Point2d,
    shoulder: Point2d,
    arm_ctrl: Point2d,
    underarm: Point2d,
    adjustment: Option<Adjustment>,
}

fn body_frame(kind: PieceKind, ms: &MeasurementSet) -> Result<BodyFrame> {

    use MeasurementKey::*;

    let half_chest = ms.get(HalfChest)?;
    let length = ms.get(GarmentLength)?;
    let neck = ms.get(NeckWidthHalf)?;
    let shoulder_width = ms.get(ShoulderWidth)?;
    let shoulder_slope = ms.get(ShoulderSlope)?;
    let armhole_depth = ms.get(ArmholeDepth)?;

    let sg = shoulder_geometry(shoulder_width, shoulder_slope);

    let adjustment = if sg.clamped {
        let adj = Adjustment {
            piece: kind,
            measurement: ShoulderSlope,
            supplied: shoulder_slope,
            used: sg.slope,
            reason: "shoulder slope must be less than shoulder width",
        };
        warn!("{:}", adj);
        Some(adj)
    } else {
        None
    };

    if armhole_depth >= length - sg.slope {
        bail!("{:}: armhole_depth {:} must be less than garment_length {:} minus shoulder drop {:}",
              kind, armhole_depth, length, sg.slope);
    }

    let width = 0.5 * half_chest;

    if neck >= width {
        bail!("{:}: neck_width_half {:} must be less than the side seam at {:} (half of half_chest {:})",
              kind, neck, width, half_chest);
    }

    let hps = Point2d::new(neck, length);
    let shoulder = Point2d::new(neck + sg.dx, length - sg.slope);
    let underarm = Point2d::new(width, length - armhole_depth);

    if shoulder.x >= underarm.x {
        bail!("{:}: neck_width_half {:} plus shoulder_width {:} reaches {:}, past the side seam at {:} (half of half_chest {:})",
              kind, neck, shoulder_width, shoulder.x, width, half_chest);
    }

    let gap = underarm.x - shoulder.x;

    let arm_ctrl = Point2d::new(shoulder.x + ARMHOLE_CONTROL_X * gap,
                                underarm.y + ARMHOLE_CONTROL_Y * armhole_depth);

    Ok(BodyFrame { width, length, hps, shoulder, arm_ctrl, underarm, adjustment })

}

fn neck_center(kind: PieceKind, frame: &BodyFrame, drop: f64) -> Result<Point2d> {

    if drop >= frame.length {
        bail!("{:}: neck drop {:} must be less than garment_length {:}", kind, drop, frame.length);
    }

    Ok(Point2d::new(0.0, frame.length - drop))

}

// notch pointing out of the piece at parameter t along a curve
fn curve_notch(edge: &Edge, t: f64, orientation: f64, length: f64) -> Option<Marking> {

    match *edge {

        Edge::Bezier { p0, ctrl, p2 } => {
            let tangent = bezier_tangent(&p0, &ctrl, &p2, t);
            let outward = orientation * Vec2d::new(tangent.y, -tangent.x);
            notch(&bezier_point(&p0, &ctrl, &p2, t), &outward, length)
                .map(|(p0, p1)| Marking::Notch { p0, p1 })
        },

        Edge::Straight { .. } => None

    }

}

fn with_notches(mut drafted: BoundaryComputed, edge: &Edge, ts: &[f64], opts: &DraftOptions) -> BoundaryComputed {

    let orientation = drafted.orientation();

    for &t in ts {
        if let Some(marking) = curve_notch(edge, t, orientation, opts.notch_length) {
            drafted = drafted.mark(marking);
        }
    }

    drafted

}

fn finish(drafted: BoundaryComputed, opts: &DraftOptions) -> PatternPiece {
    drafted.annotate(opts.seam_allowance, opts.label_offset, opts.curve_samples)
        .finalize()
}

//////////////////////////////////////////////////////////////////////
// back body: half piece, cut on fold along center back

fn draft_back_body(ms: &MeasurementSet, opts: &DraftOptions) -> Result<PatternPiece> {

    let kind = PieceKind::BackBody;
    let f = body_frame(kind, ms)?;

    let cb_hem = Point2d::origin();
    let side_hem = Point2d::new(f.width, 0.0);
    let cb_neck = neck_center(kind, &f, ms.get(MeasurementKey::BackNeckDrop)?)?;

    let neck_ctrl = Point2d::new(NECK_CONTROL_X * f.hps.x, cb_neck.y);

    let armhole = Edge::bezier(f.underarm, f.arm_ctrl, f.shoulder);
    let neckline = Edge::bezier(f.hps, neck_ctrl, cb_neck);

    let edges = vec![
        Edge::straight(cb_hem, side_hem),
        Edge::straight(side_hem, f.underarm),
        armhole,
        Edge::straight(f.shoulder, f.hps),
        neckline,
    ];

    let mut drafted = Undrafted::new(kind)
        .with_edges(edges, opts.curve_samples)
        .with_fold(Edge::straight(cb_neck, cb_hem))
        .with_neckline(neckline);

    // back armholes get a double notch
    drafted = with_notches(drafted, &armhole, &[0.45, 0.55], opts);

    drafted = drafted.mark(Marking::Grainline(grainline(0.5 * f.width,
                                                        GRAIN_START * f.length,
                                                        GRAIN_END * f.length,
                                                        opts.arrow_size)));

    if let Some(adj) = f.adjustment {
        drafted = drafted.adjusted(adj);
    }

    Ok(finish(drafted, opts))

}

//////////////////////////////////////////////////////////////////////
// front body: right half chain mirrored across center front

fn draft_front_body(ms: &MeasurementSet, opts: &DraftOptions) -> Result<PatternPiece> {

    let kind = PieceKind::FrontBody;
    let f = body_frame(kind, ms)?;

    let cf_neck = neck_center(kind, &f, ms.get(MeasurementKey::FrontNeckDrop)?)?;
    let side_hem = Point2d::new(f.width, 0.0);

    let neck_ctrl = Point2d::new(NECK_CONTROL_X * f.hps.x, cf_neck.y);

    let right = vec![
        Edge::bezier(cf_neck, neck_ctrl, f.hps),
        Edge::straight(f.hps, f.shoulder),
        Edge::bezier(f.shoulder, f.arm_ctrl, f.underarm),
        Edge::straight(f.underarm, side_hem),
    ];

    let mut edges = right.clone();
    edges.push(Edge::straight(side_hem, mirror_x(&side_hem)));
    edges.extend(right.iter().rev().map(|e| e.reversed().mirrored()));

    let placket_width = ms.get(MeasurementKey::PlacketWidth)?;
    let placket_length = ms.get(MeasurementKey::PlacketLength)?;

    if placket_length >= cf_neck.y {
        bail!("{:}: placket_length {:} must be less than the center front height {:}",
              kind, placket_length, cf_neck.y);
    }

    let placket = PieceGeometry::Rectangle {
        origin: Point2d::new(-0.5 * placket_width, cf_neck.y - placket_length),
        width: placket_width,
        height: placket_length,
    };

    let right_armhole = right[2];
    let left_armhole = right_armhole.reversed().mirrored();

    let mut drafted = Undrafted::new(kind)
        .with_edges(edges, opts.curve_samples)
        .with_neckline(Edge::bezier(f.hps, neck_ctrl, cf_neck))
        .mark(Marking::PlacketIndicator(placket));

    drafted = with_notches(drafted, &right_armhole, &[0.5], opts);
    drafted = with_notches(drafted, &left_armhole, &[0.5], opts);

    drafted = drafted.mark(Marking::Grainline(grainline(0.5 * f.width,
                                                        GRAIN_START * f.length,
                                                        GRAIN_END * f.length,
                                                        opts.arrow_size)));

    if let Some(adj) = f.adjustment {
        drafted = drafted.adjusted(adj);
    }

    Ok(finish(drafted, opts))

}

//////////////////////////////////////////////////////////////////////
// sleeve: cuff at the bottom, cap peak at the top, centered on x = 0

fn draft_sleeve(ms: &MeasurementSet, opts: &DraftOptions) -> Result<PatternPiece> {

    let kind = PieceKind::Sleeve;

    let length = ms.get(MeasurementKey::SleeveLength)?;
    let bicep = ms.get(MeasurementKey::SleeveBicep)?;
    let cuff_supplied = ms.get(MeasurementKey::SleeveCuff)?;

    let mut adjustment = None;

    let cuff = if cuff_supplied > bicep {
        let adj = Adjustment {
            piece: kind,
            measurement: MeasurementKey::SleeveCuff,
            supplied: cuff_supplied,
            used: bicep,
            reason: "cuff can't be wider than the bicep",
        };
        warn!("{:}", adj);
        adjustment = Some(adj);
        bicep
    } else {
        cuff_supplied
    };

    let cap = SLEEVE_CAP_FRACTION * length;

    let hb = 0.5 * bicep;
    let hc = 0.5 * cuff;

    let cuff_left = Point2d::new(-hc, 0.0);
    let cuff_right = Point2d::new(hc, 0.0);
    let underarm_right = Point2d::new(hb, length - cap);
    let underarm_left = Point2d::new(-hb, length - cap);
    let peak = Point2d::new(0.0, length);

    let ctrl_right = Point2d::new(SLEEVE_CAP_CONTROL_X * hb, length);
    let ctrl_left = mirror_x(&ctrl_right);

    let edges = vec![
        Edge::straight(cuff_left, cuff_right),
        Edge::straight(cuff_right, underarm_right),
        Edge::bezier(underarm_right, ctrl_right, peak),
        Edge::bezier(peak, ctrl_left, underarm_left),
        Edge::straight(underarm_left, cuff_left),
    ];

    let mut drafted = Undrafted::new(kind).with_edges(edges, opts.curve_samples);

    // shoulder notch at the top of the cap
    let top = max_y_point(&underarm_right, &ctrl_right, &peak, opts.curve_samples);

    if let Some((p0, p1)) = notch(&top, &Vec2d::new(0.0, 1.0), opts.notch_length) {
        drafted = drafted.mark(Marking::Notch { p0, p1 });
    }

    drafted = drafted.mark(Marking::Grainline(grainline(0.0,
                                                        GRAIN_START * length,
                                                        GRAIN_END * length,
                                                        opts.arrow_size)));

    if let Some(adj) = adjustment {
        drafted = drafted.adjusted(adj);
    }

    Ok(finish(drafted, opts))

}

//////////////////////////////////////////////////////////////////////
// rectangular pieces

fn collar_piece(kind: PieceKind, length: f64, ms: &MeasurementSet, opts: &DraftOptions) -> Result<PatternPiece> {

    let height = ms.get(MeasurementKey::CollarHeight)?;

    let mut drafted = Undrafted::new(kind).with_rectangle(Point2d::origin(), length, height);

    if kind == PieceKind::Collar {
        drafted = drafted.mark(Marking::FoldLine {
            p0: Point2d::new(0.0, 0.5 * height),
            p1: Point2d::new(length, 0.5 * height),
        });
    }

    Ok(finish(drafted, opts))

}

fn draft_placket(kind: PieceKind, ms: &MeasurementSet, opts: &DraftOptions) -> Result<PatternPiece> {

    let width = ms.get(MeasurementKey::PlacketWidth)?;
    let length = ms.get(MeasurementKey::PlacketLength)?;

    let mut drafted = Undrafted::new(kind).with_rectangle(Point2d::origin(), width, length);

    if kind == PieceKind::PlacketButtonSide {

        let spacing = length / (opts.buttons + 1) as f64;
        let radius = BUTTON_RADIUS.min(0.25 * width);

        if opts.buttons > 0 && spacing <= 2.0 * radius {
            bail!("{:}: {:} buttons don't fit on placket_length {:}", kind, opts.buttons, length);
        }

        for i in 1..=opts.buttons {
            drafted = drafted.mark(Marking::Button(PieceGeometry::Circle {
                center: Point2d::new(0.5 * width, spacing * i as f64),
                radius,
            }));
        }

    }

    Ok(finish(drafted, opts))

}

//////////////////////////////////////////////////////////////////////
// public entry points

// draft one piece. collar pieces need the derived collar length to be
// recorded in the measurement set first.
pub fn draft(kind: PieceKind, ms: &MeasurementSet, opts: &DraftOptions) -> Result<PatternPiece> {

    opts.validate()?;
    ms.validate_keys(kind.required_measurements())?;

    debug!("drafting {:}", kind);

    match kind {

        PieceKind::BackBody => draft_back_body(ms, opts),

        PieceKind::FrontBody => draft_front_body(ms, opts),

        PieceKind::Sleeve => draft_sleeve(ms, opts),

        PieceKind::Collar | PieceKind::CollarInterfacing => {
            match ms.collar_length() {
                Some(length) => collar_piece(kind, length, ms, opts),
                None => Err(ErrorKind::OrderingViolation(kind.to_string(),
                                                         COLLAR_LENGTH.to_string()).into())
            }
        },

        PieceKind::PlacketButtonSide |
        PieceKind::PlacketButtonholeSide |
        PieceKind::PlacketInterfacing => draft_placket(kind, ms, opts),

    }

}

// phase one: both body pieces plus the neckline lengths they yield
#[derive(Debug, Clone, PartialEq)]
pub struct BodyDraftResult {
    pub back: PatternPiece,
    pub front: PatternPiece,
    pub necklines: NecklineLengths,
}

pub fn draft_body(ms: &MeasurementSet, opts: &DraftOptions) -> Result<BodyDraftResult> {

    let back = draft(PieceKind::BackBody, ms, opts)?;
    let front = draft(PieceKind::FrontBody, ms, opts)?;

    let necklines = NecklineLengths::measure(&back, &front)?;

    debug!("half necklines: back {:.3}, front {:.3}", necklines.back_half, necklines.front_half);

    Ok(BodyDraftResult { back, front, necklines })

}

// phase two: collar from the body result
pub fn draft_collar(ms: &MeasurementSet, necklines: &NecklineLengths, opts: &DraftOptions) -> Result<PatternPiece> {

    opts.validate()?;
    ms.validate_keys(PieceKind::Collar.required_measurements())?;

    collar_piece(PieceKind::Collar, necklines.collar_length(), ms, opts)

}

//////////////////////////////////////////////////////////////////////
// a full drafting run

#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    pub measurements: MeasurementSet, // includes the derived collar length
    pub necklines: NecklineLengths,
    pub pieces: Vec<PatternPiece>,    // in ALL_PIECES order
}

impl Pattern {

    pub fn size_name(&self) -> Option<&str> {
        self.measurements.size_name()
    }

    pub fn piece(&self, kind: PieceKind) -> Option<&PatternPiece> {
        self.pieces.iter().find(|p| p.kind == kind)
    }

    pub fn adjustments(&self) -> impl Iterator<Item = &Adjustment> {
        self.pieces.iter().flat_map(|p| p.adjustments.iter())
    }

}

// validate everything, draft the body, record the collar length once,
// then draft the rest. the caller's set is left untouched; the run works
// on its own copy so a second run starts clean.
pub fn draft_all(ms: &MeasurementSet, opts: &DraftOptions) -> Result<Pattern> {

    opts.validate()?;
    ms.validate()?;

    let mut run = ms.clone();

    info!("drafting size {:}", run.size_name().unwrap_or("custom"));

    let body = draft_body(&run, opts)?;

    run.record_collar_length(body.necklines.collar_length())?;

    info!("collar length {:.3}\"", body.necklines.collar_length());

    let mut pieces = Vec::with_capacity(ALL_PIECES.len());

    for &kind in ALL_PIECES.iter() {
        match kind {
            PieceKind::FrontBody => pieces.push(body.front.clone()),
            PieceKind::BackBody => pieces.push(body.back.clone()),
            _ => pieces.push(draft(kind, &run, opts)?)
        }
    }

    Ok(Pattern { measurements: run, necklines: body.necklines, pieces })

}

//////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {

    use super::*;
    use approx::assert_abs_diff_eq;
    use crate::geometry::orientation_sign;

    #[test]
    fn shoulder_without_clamp() {

        let sg = shoulder_geometry(4.5, 1.5);

        assert!(!sg.clamped);
        assert_abs_diff_eq!(sg.dx, (4.5f64 * 4.5 - 1.5 * 1.5).sqrt(), epsilon = 1e-12);

    }

    #[test]
    fn shoulder_slope_clamped_below_width() {

        let sg = shoulder_geometry(1.0, 2.0);

        assert!(sg.clamped);
        assert_abs_diff_eq!(sg.slope, 0.98, epsilon = 1e-12);
        assert!(sg.dx.is_finite() && sg.dx >= 0.0);
        assert_abs_diff_eq!(sg.dx, (1.0f64 - 0.98 * 0.98).sqrt(), epsilon = 1e-12);

        // equal slope and width clamps too
        assert!(shoulder_geometry(2.0, 2.0).clamped);

    }

    #[test]
    fn clamped_slope_is_reported() {

        let mut ms = MeasurementSet::size_s();
        ms.set(MeasurementKey::ShoulderWidth, 1.0);
        ms.set(MeasurementKey::ShoulderSlope, 2.0);

        let back = draft(PieceKind::BackBody, &ms, &DraftOptions::default()).unwrap();

        assert_eq!(back.adjustments.len(), 1);
        assert_eq!(back.adjustments[0].measurement, MeasurementKey::ShoulderSlope);
        assert_abs_diff_eq!(back.adjustments[0].used, 0.98, epsilon = 1e-12);

    }

    #[test]
    fn back_body_closes_along_fold() {

        let back = draft(PieceKind::BackBody, &MeasurementSet::size_s(), &DraftOptions::default()).unwrap();

        assert_eq!(back.edges.len(), 5);
        assert!(back.fold.is_some());
        assert!(back.is_closed());
        assert_abs_diff_eq!(back.width(), 9.0, epsilon = 1e-12);
        assert_abs_diff_eq!(back.height(), 24.5, epsilon = 1e-12);

        // no allowance along the fold
        assert_eq!(back.seam_allowance.len(), back.edges.len());

        let folds = back.markings.iter().filter(|m| matches!(m, Marking::FoldLine { .. })).count();
        assert_eq!(folds, 1);

    }

    #[test]
    fn button_spacing() {

        let opts = DraftOptions { buttons: 4, ..Default::default() };
        let placket = draft(PieceKind::PlacketButtonSide, &MeasurementSet::size_s(), &opts).unwrap();

        let centers: Vec<f64> = placket.markings.iter().filter_map(|m| match m {
            Marking::Button(PieceGeometry::Circle { center, .. }) => Some(center.y),
            _ => None
        }).collect();

        assert_eq!(centers.len(), 4);

        for (i, y) in centers.iter().enumerate() {
            assert_abs_diff_eq!(*y, (i + 1) as f64, epsilon = 1e-12);
        }

        let other = draft(PieceKind::PlacketButtonholeSide, &MeasurementSet::size_s(), &opts).unwrap();
        assert!(other.markings.is_empty());

    }

    #[test]
    fn collar_requires_derived_length() {

        let ms = MeasurementSet::size_s();

        for &kind in &[PieceKind::Collar, PieceKind::CollarInterfacing] {
            match draft(kind, &ms, &DraftOptions::default()).unwrap_err().kind() {
                ErrorKind::OrderingViolation(piece, dependency) => {
                    assert_eq!(piece, kind.title());
                    assert_eq!(dependency, COLLAR_LENGTH);
                },
                other => panic!("unexpected error {:?}", other),
            }
        }

    }

    #[test]
    fn bad_options_are_rejected() {

        let ms = MeasurementSet::size_s();

        let opts = DraftOptions { curve_samples: 0, ..Default::default() };
        assert!(draft(PieceKind::Sleeve, &ms, &opts).is_err());

        let opts = DraftOptions { seam_allowance: -0.5, ..Default::default() };
        assert!(draft(PieceKind::Sleeve, &ms, &opts).is_err());

    }

    #[test]
    fn armhole_deeper_than_body_fails() {

        let mut ms = MeasurementSet::size_s();
        ms.set(MeasurementKey::ArmholeDepth, 30.0);

        let err = draft(PieceKind::FrontBody, &ms, &DraftOptions::default()).unwrap_err();
        assert!(err.to_string().contains("armhole_depth"));

    }

    #[test]
    fn option_limits_are_enforced() {

        let ms = MeasurementSet::size_s();

        for opts in &[DraftOptions { curve_samples: usize::MAX, ..Default::default() },
                      DraftOptions { curve_samples: MAX_CURVE_SAMPLES + 1, ..Default::default() },
                      DraftOptions { buttons: usize::MAX, ..Default::default() },
                      DraftOptions { buttons: MAX_BUTTONS + 1, ..Default::default() }] {
            assert!(opts.validate().is_err());
            assert!(draft(PieceKind::PlacketButtonSide, &ms, opts).is_err());
            assert!(draft_all(&ms, opts).is_err());
        }

        let opts = DraftOptions { buttons: MAX_BUTTONS, ..Default::default() };
        assert!(draft(PieceKind::PlacketButtonSide, &ms, &opts).is_ok());

    }

    #[test]
    fn buttons_must_fit_on_placket() {

        let mut ms = MeasurementSet::size_s();
        ms.set(MeasurementKey::PlacketLength, 1.0);

        let opts = DraftOptions { buttons: 4, ..Default::default() };
        let err = draft(PieceKind::PlacketButtonSide, &ms, &opts).unwrap_err();
        assert!(err.to_string().contains("placket_length"));

        // no buttons means nothing to fit
        let opts = DraftOptions { buttons: 0, ..Default::default() };
        assert!(draft(PieceKind::PlacketButtonSide, &ms, &opts).is_ok());

    }

    #[test]
    fn neck_past_side_seam_fails() {

        let mut ms = MeasurementSet::size_s();
        ms.set(MeasurementKey::NeckWidthHalf, 12.0);

        for &kind in &[PieceKind::BackBody, PieceKind::FrontBody] {
            let err = draft(kind, &ms, &DraftOptions::default()).unwrap_err();
            assert!(err.to_string().contains("neck_width_half"));
            assert!(err.to_string().contains("half_chest"));
        }

    }

    #[test]
    fn shoulder_past_side_seam_fails() {

        // 3" neck + ~6.8" of shoulder run passes the 9" side seam
        let mut ms = MeasurementSet::size_s();
        ms.set(MeasurementKey::ShoulderWidth, 7.0);

        let err = draft(PieceKind::BackBody, &ms, &DraftOptions::default()).unwrap_err();
        assert!(err.to_string().contains("shoulder_width"));

        assert!(draft_all(&ms, &DraftOptions::default()).is_err());

    }

    // crossing number of a closed ring
    fn inside(ring: &[Point2d], p: &Point2d) -> bool {

        let mut crossings = 0;

        for (i, a) in ring.iter().enumerate() {
            let b = &ring[(i + 1) % ring.len()];
            if (a.y > p.y) != (b.y > p.y) {
                let x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if x > p.x {
                    crossings += 1;
                }
            }
        }

        crossings % 2 == 1

    }

    fn notches(piece: &PatternPiece) -> Vec<(Point2d, Point2d)> {
        piece.markings.iter().filter_map(|m| match m {
            Marking::Notch { p0, p1 } => Some((*p0, *p1)),
            _ => None
        }).collect()
    }

    #[test]
    fn armhole_notches_point_outward() {

        let ms = MeasurementSet::size_s();
        let opts = DraftOptions::default();

        let back = draft(PieceKind::BackBody, &ms, &opts).unwrap();
        let front = draft(PieceKind::FrontBody, &ms, &opts).unwrap();

        // double notch on the back, one per armhole on the front
        assert_eq!(notches(&back).len(), 2);
        assert_eq!(notches(&front).len(), 2);

        // the front ring runs clockwise
        assert!(orientation_sign(&front.boundary) < 0.0);

        for piece in &[&back, &front] {
            for (p0, p1) in notches(piece) {
                assert_abs_diff_eq!((p1 - p0).norm(), opts.notch_length, epsilon = 1e-9);
                assert!(!inside(&piece.boundary, &p1));
                assert!(inside(&piece.boundary, &(p0 - 0.1 * (p1 - p0))));
            }
        }

        // front notches mirror each other across center front
        let front_notches = notches(&front);
        assert_abs_diff_eq!(front_notches[0].1.x, -front_notches[1].1.x, epsilon = 1e-9);
        assert_abs_diff_eq!(front_notches[0].1.y, front_notches[1].1.y, epsilon = 1e-9);

        // back notches sit at different heights along the armhole
        let back_notches = notches(&back);
        assert!(back_notches[0].0.y < back_notches[1].0.y);

    }

    #[test]
    fn draft_all_leaves_input_untouched() {

        let ms = MeasurementSet::size_m();
        let pattern = draft_all(&ms, &DraftOptions::default()).unwrap();

        assert!(ms.collar_length().is_none());
        assert_eq!(pattern.measurements.collar_length(), Some(pattern.necklines.collar_length()));
        assert_eq!(pattern.pieces.len(), ALL_PIECES.len());

        for (piece, &kind) in pattern.pieces.iter().zip(ALL_PIECES.iter()) {
            assert_eq!(piece.kind, kind);
            assert!(piece.is_closed());
        }

        // a set that already carries a collar length can't start a run
        assert!(draft_all(&pattern.measurements, &DraftOptions::default()).is_err());

    }

}
