// end-to-end drafting properties over the public API

use approx::assert_abs_diff_eq;

use polo_pattern::derived::{neckline_half_length, NecklineLengths};
use polo_pattern::draft::{draft, draft_all, draft_body, draft_collar, DraftOptions};
use polo_pattern::errors::*;
use polo_pattern::geometry::path_length;
use polo_pattern::measurements::{MeasurementKey, MeasurementSet, COLLAR_LENGTH};
use polo_pattern::piece::{Edge, Marking, PieceGeometry, PieceKind, ALL_PIECES};
use polo_pattern::session::{Event, Session};
use polo_pattern::Point2d;

const TOL: f64 = 1e-9;

fn opts() -> DraftOptions {
    DraftOptions::default()
}

#[test]
fn front_body_is_symmetric() {

    for ms in &[MeasurementSet::size_xs(), MeasurementSet::size_s(), MeasurementSet::size_xl()] {

        let front = draft(PieceKind::FrontBody, ms, &opts()).unwrap();

        assert!(front.is_closed());

        for p in &front.boundary {
            let found = front.boundary.iter()
                .any(|q| (q.x + p.x).abs() < TOL && (q.y - p.y).abs() < TOL);
            assert!(found, "no mirror image for {:?}", p);
        }

    }

}

#[test]
fn front_placket_sits_under_center_neck() {

    let ms = MeasurementSet::size_s();
    let front = draft(PieceKind::FrontBody, &ms, &opts()).unwrap();

    let placket = front.markings.iter().find_map(|m| match m {
        Marking::PlacketIndicator(PieceGeometry::Rectangle { origin, width, height }) =>
            Some((*origin, *width, *height)),
        _ => None
    }).unwrap();

    // center front neck sits front_neck_drop below HPS
    let cf_neck_y = 24.5 - 2.75;

    assert_abs_diff_eq!(placket.0.x, -0.75, epsilon = TOL);
    assert_abs_diff_eq!(placket.0.y + placket.2, cf_neck_y, epsilon = TOL);
    assert_abs_diff_eq!(placket.1, 1.5, epsilon = TOL);

}

#[test]
fn sleeve_cuff_never_wider_than_bicep() {

    let mut ms = MeasurementSet::size_s();
    ms.set(MeasurementKey::SleeveCuff, 9.0);

    let sleeve = draft(PieceKind::Sleeve, &ms, &opts()).unwrap();

    let cuff = match sleeve.edges[0] {
        Edge::Straight { p0, p1 } => (p1 - p0).norm(),
        _ => panic!("cuff should be straight"),
    };

    assert_abs_diff_eq!(cuff, 7.0, epsilon = TOL);
    assert!(sleeve.width() <= 7.0 + TOL);

    assert_eq!(sleeve.adjustments.len(), 1);
    assert_eq!(sleeve.adjustments[0].measurement, MeasurementKey::SleeveCuff);
    assert_eq!(sleeve.adjustments[0].supplied, 9.0);

    // narrower cuff passes through untouched
    let sleeve = draft(PieceKind::Sleeve, &MeasurementSet::size_s(), &opts()).unwrap();
    assert!(sleeve.adjustments.is_empty());

}

#[test]
fn sleeve_cap_notch_at_peak() {

    let sleeve = draft(PieceKind::Sleeve, &MeasurementSet::size_s(), &opts()).unwrap();

    let notch = sleeve.markings.iter().find_map(|m| match m {
        Marking::Notch { p0, p1 } => Some((*p0, *p1)),
        _ => None
    }).unwrap();

    assert_abs_diff_eq!(notch.0.x, 0.0, epsilon = TOL);
    assert_abs_diff_eq!(notch.0.y, 7.0, epsilon = TOL);
    assert!(notch.1.y > notch.0.y);

}

#[test]
fn collar_length_matches_drafted_necklines() {

    let ms = MeasurementSet::size_s();
    let pattern = draft_all(&ms, &opts()).unwrap();

    let back = draft(PieceKind::BackBody, &ms, &opts()).unwrap();
    let front = draft(PieceKind::FrontBody, &ms, &opts()).unwrap();

    // control polygon of each neck sub-edge, HPS -> control -> center
    let back_half = path_length(&back.neckline.unwrap().control_polygon());
    let front_half = path_length(&front.neckline.unwrap().control_polygon());

    let expected = 2.0 * back_half + 2.0 * front_half;

    assert_abs_diff_eq!(pattern.necklines.collar_length(), expected, epsilon = TOL);
    assert_abs_diff_eq!(pattern.measurements.collar_length().unwrap(), expected, epsilon = TOL);

    let collar = pattern.piece(PieceKind::Collar).unwrap();
    assert_abs_diff_eq!(collar.width(), expected, epsilon = TOL);
    assert_abs_diff_eq!(collar.height(), 3.0, epsilon = TOL);

    // hand check: back neck 3 -> 2.55 -> 0 at 0.75 drop, front at 2.75 drop
    let by_hand = 2.0 * ((0.45f64.powi(2) + 0.75f64.powi(2)).sqrt() + 2.55)
        + 2.0 * ((0.45f64.powi(2) + 2.75f64.powi(2)).sqrt() + 2.55);

    assert_abs_diff_eq!(expected, by_hand, epsilon = TOL);

}

#[test]
fn two_phase_collar() {

    let ms = MeasurementSet::size_m();

    let body = draft_body(&ms, &opts()).unwrap();

    assert_eq!(body.back.kind, PieceKind::BackBody);
    assert_eq!(body.front.kind, PieceKind::FrontBody);

    let lengths = NecklineLengths::measure(&body.back, &body.front).unwrap();
    assert_eq!(lengths, body.necklines);
    assert_abs_diff_eq!(neckline_half_length(&body.back).unwrap(), lengths.back_half);

    let collar = draft_collar(&ms, &body.necklines, &opts()).unwrap();

    assert_abs_diff_eq!(collar.width(), body.necklines.collar_length(), epsilon = TOL);

    let folds: Vec<f64> = collar.markings.iter().filter_map(|m| match m {
        Marking::FoldLine { p0, p1 } => {
            assert_abs_diff_eq!(p0.y, p1.y);
            Some(p0.y)
        },
        _ => None
    }).collect();

    assert_eq!(folds.len(), 1);
    assert_abs_diff_eq!(folds[0], 0.5 * collar.height(), epsilon = TOL);

}

#[test]
fn clamped_shoulder_slope_drafts_cleanly() {

    let mut ms = MeasurementSet::size_s();
    ms.set(MeasurementKey::ShoulderWidth, 1.0);
    ms.set(MeasurementKey::ShoulderSlope, 2.0);

    let pattern = draft_all(&ms, &opts()).unwrap();

    for piece in &pattern.pieces {
        for p in &piece.boundary {
            assert!(p.x.is_finite() && p.y.is_finite());
        }
    }

    let adjustments: Vec<_> = pattern.adjustments().collect();

    // one per body piece
    assert_eq!(adjustments.len(), 2);

    for adj in adjustments {
        assert_eq!(adj.measurement, MeasurementKey::ShoulderSlope);
        assert_abs_diff_eq!(adj.used, 0.98, epsilon = TOL);
    }

    // shoulder seam runs from HPS at neck width to a tip 0.98 lower
    let back = pattern.piece(PieceKind::BackBody).unwrap();

    let shoulder = back.edges.iter().find_map(|e| match *e {
        Edge::Straight { p0, p1 } if p1 == Point2d::new(3.0, 24.5) => Some(p0),
        _ => None
    }).unwrap();

    assert_abs_diff_eq!(shoulder.y, 24.5 - 0.98, epsilon = TOL);
    assert_abs_diff_eq!(shoulder.x, 3.0 + (1.0f64 - 0.98 * 0.98).sqrt(), epsilon = TOL);

}

#[test]
fn non_positive_measurements_rejected_before_drafting() {

    for &key in MeasurementKey::ALL.iter() {

        for &bad in &[0.0, -1.5] {

            let mut ms = MeasurementSet::size_s();
            ms.set(key, bad);

            let err = draft_all(&ms, &opts()).unwrap_err();

            match err.kind() {
                ErrorKind::InvalidMeasurement(name, value) => {
                    assert_eq!(name, key.name());
                    assert_eq!(*value, bad);
                },
                other => panic!("unexpected error {:?}", other),
            }

        }

    }

    // single pieces check only what they use, but still before geometry
    let mut ms = MeasurementSet::size_s();
    ms.set(MeasurementKey::SleeveBicep, -7.0);

    assert!(draft(PieceKind::Sleeve, &ms, &opts()).is_err());
    assert!(draft(PieceKind::PlacketButtonSide, &ms, &opts()).is_ok());

}

#[test]
fn missing_measurement_is_reported_by_name() {

    let ms = MeasurementSet::from_pairs(&[
        (MeasurementKey::PlacketWidth, 1.5),
    ]);

    match draft(PieceKind::PlacketInterfacing, &ms, &opts()).unwrap_err().kind() {
        ErrorKind::MissingMeasurement(key) => assert_eq!(key, "placket_length"),
        other => panic!("unexpected error {:?}", other),
    }

}

#[test]
fn collar_before_body_is_an_ordering_violation() {

    let err = draft(PieceKind::Collar, &MeasurementSet::size_s(), &opts()).unwrap_err();

    match err.kind() {
        ErrorKind::OrderingViolation(_, dependency) => assert_eq!(dependency, COLLAR_LENGTH),
        other => panic!("unexpected error {:?}", other),
    }

}

#[test]
fn drafting_is_idempotent() {

    let ms = MeasurementSet::size_l();

    for &kind in &[PieceKind::FrontBody, PieceKind::BackBody, PieceKind::Sleeve,
                   PieceKind::PlacketButtonSide] {
        let a = draft(kind, &ms, &opts()).unwrap();
        let b = draft(kind, &ms, &opts()).unwrap();
        assert_eq!(a.boundary, b.boundary);
        assert_eq!(a, b);
    }

    let a = draft_all(&ms, &opts()).unwrap();
    let b = draft_all(&ms, &opts()).unwrap();

    assert_eq!(a, b);

}

#[test]
fn every_piece_closed_and_interfacing_plain() {

    let pattern = draft_all(&MeasurementSet::size_s(), &opts()).unwrap();

    assert_eq!(pattern.pieces.len(), ALL_PIECES.len());

    for piece in &pattern.pieces {

        assert!(piece.is_closed(), "{:} is open", piece.title());

        if piece.is_interfacing() {
            assert!(piece.seam_allowance.is_empty());
        } else {
            assert!(!piece.seam_allowance.is_empty());
        }

    }

    let collar = pattern.piece(PieceKind::Collar).unwrap();
    let interfacing = pattern.piece(PieceKind::CollarInterfacing).unwrap();
    assert_eq!(collar.bounds(), interfacing.bounds());

    let placket = pattern.piece(PieceKind::PlacketButtonSide).unwrap();
    let interfacing = pattern.piece(PieceKind::PlacketInterfacing).unwrap();
    assert_eq!(placket.bounds(), interfacing.bounds());

}

#[test]
fn zero_seam_allowance_disables_offsets() {

    let options = DraftOptions { seam_allowance: 0.0, ..DraftOptions::default() };
    let pattern = draft_all(&MeasurementSet::size_s(), &options).unwrap();

    for piece in &pattern.pieces {
        assert!(piece.seam_allowance.is_empty());
    }

}

#[test]
fn session_feeds_drafting() {

    let session = Session::run(vec![
        Event::SelectSize("s".to_string()),
        Event::SetMeasurement(MeasurementKey::HalfChest, 20.0),
        Event::Confirm,
    ]).unwrap();

    let ms = session.into_confirmed().unwrap();
    let pattern = draft_all(&ms, &opts()).unwrap();

    // front is a full piece, back a half
    assert_abs_diff_eq!(pattern.piece(PieceKind::FrontBody).unwrap().width(), 20.0, epsilon = TOL);
    assert_abs_diff_eq!(pattern.piece(PieceKind::BackBody).unwrap().width(), 10.0, epsilon = TOL);

}

#[test]
fn demo_pattern_files_draft() {

    use polo_pattern::config::PatternFile;

    let stock = PatternFile::parse("size_s.pattern",
                                   &mut include_str!("../demos/size_s.pattern").as_bytes()).unwrap();

    assert_eq!(stock.measurements, MeasurementSet::size_s());
    assert_eq!(stock.options, DraftOptions::default());
    assert!(draft_all(&stock.measurements, &stock.options).unwrap().adjustments().next().is_none());

    let custom = PatternFile::parse("custom_fit.pattern",
                                    &mut include_str!("../demos/custom_fit.pattern").as_bytes()).unwrap();

    assert_eq!(custom.options.buttons, 4);

    let pattern = draft_all(&custom.measurements, &custom.options).unwrap();
    let adjusted: Vec<_> = pattern.adjustments().map(|a| a.measurement).collect();

    assert_eq!(adjusted, vec![MeasurementKey::SleeveCuff]);

}
