/*

Parametric drafting of polo shirt pattern pieces.

measurements -> drafted pieces -> derived collar length -> collar ->
annotated, offset geometry -> pages

 */

//////////////////////////////////////////////////////////////////////
// use error chain so we can use Result<> everywhere
// for error handling

#[macro_use]
extern crate error_chain;

pub mod errors {

    error_chain!{

        errors {

            InvalidMeasurement(key: String, value: f64) {
                description("invalid measurement")
                display("measurement {:} must be a positive number of inches, got {:}", key, value)
            }

            MissingMeasurement(key: String) {
                description("missing measurement")
                display("required measurement {:} is not set", key)
            }

            OrderingViolation(piece: String, dependency: String) {
                description("piece drafted before its dependency")
                display("can't draft {:} before {:} has been computed", piece, dependency)
            }

            DerivedAlreadySet(key: String) {
                description("derived measurement written twice")
                display("derived measurement {:} was already computed for this run", key)
            }

            InvalidTransition(state: String, event: String) {
                description("invalid session transition")
                display("can't apply {:} while {:}", event, state)
            }

        }

        foreign_links {
            Fmt(::std::fmt::Error);
            Io(::std::io::Error);
            Cairo(::cairo::Error) #[cfg(feature = "render")];
        }

    }

}

//////////////////////////////////////////////////////////////////////
// pull in some types from nalgebra

pub type Vec2d = nalgebra::Vector2<f64>;
pub type Point2d = nalgebra::geometry::Point2<f64>;
pub type Transform2d = nalgebra::Transform2<f64>;
pub type Translation2d = nalgebra::Translation2<f64>;
pub type Matrix3d = nalgebra::Matrix3<f64>;

pub mod geometry;
pub mod annotate;
pub mod measurements;
pub mod piece;
pub mod derived;
pub mod draft;
pub mod session;
pub mod config;
pub mod layout;

#[cfg(feature = "render")]
pub mod render;

pub use draft::{draft, draft_all, DraftOptions, Pattern};
pub use measurements::{MeasurementKey, MeasurementSet};
pub use piece::{PatternPiece, PieceKind};
