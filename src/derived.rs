//////////////////////////////////////////////////////////////////////
// quantities computed from drafted pieces and fed into later ones.
//
// the neckline is measured along the control polygon of its curve
// (HPS -> control -> center), which is close enough at garment scale.

use crate::errors::*;
use crate::piece::{PatternPiece, PieceKind};

pub fn neckline_half_length(piece: &PatternPiece) -> Result<f64> {

    match &piece.neckline {
        Some(edge) => Ok(edge.chord_length()),
        None => bail!("{:} has no neckline to measure", piece.kind)
    }

}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NecklineLengths {
    pub back_half: f64,
    pub front_half: f64,
}

impl NecklineLengths {

    // back and front body pieces, in that order
    pub fn measure(back: &PatternPiece, front: &PatternPiece) -> Result<Self> {

        if back.kind != PieceKind::BackBody || front.kind != PieceKind::FrontBody {
            bail!("necklines are measured on the back and front body, got {:} and {:}",
                  back.kind, front.kind);
        }

        Ok(NecklineLengths {
            back_half: neckline_half_length(back)?,
            front_half: neckline_half_length(front)?,
        })

    }

    pub fn collar_length(&self) -> f64 {
        2.0 * self.back_half + 2.0 * self.front_half
    }

}

//////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {

    use super::*;
    use approx::assert_abs_diff_eq;
    use crate::Point2d;
    use crate::piece::{Edge, Undrafted};

    fn body_piece(kind: PieceKind, neck: Option<Edge>) -> PatternPiece {

        let drafted = Undrafted::new(kind).with_rectangle(Point2d::origin(), 9.0, 24.5);

        let drafted = match neck {
            Some(edge) => drafted.with_neckline(edge),
            None => drafted
        };

        drafted.annotate(0.0, 0.3, 4).finalize()

    }

    #[test]
    fn collar_is_twice_both_halves() {

        // 3-4-5 legs: control polygon length 5 + 4
        let back_neck = Edge::bezier(Point2d::new(3.0, 4.0), Point2d::new(0.0, 0.0), Point2d::new(-4.0, 0.0));
        let front_neck = Edge::straight(Point2d::new(0.0, 0.0), Point2d::new(0.0, 2.5));

        let back = body_piece(PieceKind::BackBody, Some(back_neck));
        let front = body_piece(PieceKind::FrontBody, Some(front_neck));

        let lengths = NecklineLengths::measure(&back, &front).unwrap();

        assert_abs_diff_eq!(lengths.back_half, 9.0, epsilon = 1e-12);
        assert_abs_diff_eq!(lengths.front_half, 2.5, epsilon = 1e-12);
        assert_abs_diff_eq!(lengths.collar_length(), 23.0, epsilon = 1e-12);

    }

    #[test]
    fn missing_neckline_is_an_error() {

        let back = body_piece(PieceKind::BackBody, None);
        assert!(neckline_half_length(&back).is_err());

    }

    #[test]
    fn pieces_must_be_back_then_front() {

        let neck = Edge::straight(Point2d::new(0.0, 0.0), Point2d::new(1.0, 0.0));
        let back = body_piece(PieceKind::BackBody, Some(neck));
        let front = body_piece(PieceKind::FrontBody, Some(neck));

        assert!(NecklineLengths::measure(&front, &back).is_err());

    }

}
