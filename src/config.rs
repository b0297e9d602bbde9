//////////////////////////////////////////////////////////////////////
// pattern files: one keyword per line. '#' starts a comment at the
// start of a line or when it stands alone between spaces, so text like
// "title Polo #2" keeps its '#'.
//
//   size s
//   set half_chest 18.5   # roomier
//   seam_allowance 0.5
//   title Women's Polo T-Shirt
//
// size/set lines drive a measurement session; end of file confirms it.

use std::fs::File;
use std::io::{BufRead, BufReader};

use tracing::debug;

use crate::draft::DraftOptions;
use crate::errors::*;
use crate::measurements::{MeasurementSet, MEASUREMENT_KEYS, COLLAR_LENGTH};
use crate::session::{Event, Session};

//////////////////////////////////////////////////////////////////////
// macro for pulling typed values out of a token list

macro_rules! parse_tokens {

    // finalizer - no more input to match, just error if remaining
    // input or return collected outputs
    ($it:ident { } -> { $($tuple:ident,)* } ) => (
        match $it.next() {
            Some(value) => Err(format!("found extra token(s) starting with \"{:}\"", value)),
            None => Ok(($($tuple),*))
        }
    );

    // string map
    ($it:ident { $name:ident from $map:expr, $($ts:tt)* } -> { $($tuple:ident,)* } ) => (
        match $it.next() {
            None => Err(format!("missing token for {:}", stringify!($name)) ),
            Some(&value) => {
                if let Some(&k) = $map.get(value) {
                    let $name = k;
                    parse_tokens!( $it { $($ts)* } -> { $($tuple,)* $name, } )
                } else {
                    let mut names: Vec<&str> = Vec::new();
                    names.extend($map.keys());
                    names.sort();
                    Err(format!("unexpected value \"{:}\" for {:}, expected one of: {:}",
                                value, stringify!($name), names.join(", ")))
                }
            }
        }
    );

    // name, type pair
    ($it:ident { $name:ident : $type:ident, $($ts:tt)* } -> { $($tuple:ident,)* } ) => (
        match $it.next() {
            None => Err(format!("missing token for {:}", stringify!($name)) ),
            Some(value) => if let Ok($name) = value.parse::<$type>() {
                parse_tokens!( $it { $($ts)* } -> { $($tuple,)* $name, } )
            } else {
                Err(format!("error parsing {:} as {:} for {:}",
                            value, stringify!($type), stringify!($name)))
            }
        }
    );

    // Entry point
    ($a:expr, { $($ts:tt)+ }) => (
        {
            let mut it = $a.iter();
            parse_tokens!( it { $($ts)* , } -> { } )
        }
    );

}

// move a setting from one update into the accumulated settings,
// refusing to set anything twice
macro_rules! copy_field {

    ($dst:ident, $src:ident, $field:ident) => (
        if $src.$field.is_some() {
            if $dst.$field.is_some() {
                bail!("{:} is already set", stringify!($field));
            }
            $dst.$field = $src.$field;
        }
    )

}

//////////////////////////////////////////////////////////////////////
// non-measurement lines

#[derive(Debug, Clone, Default, PartialEq)]
struct Settings {
    seam_allowance: Option<f64>,
    buttons: Option<usize>,
    curve_samples: Option<usize>,
    label_offset: Option<f64>,
    notch_length: Option<f64>,
    title: Option<String>,
    fabric: Option<String>,
}

impl Settings {

    fn update(&mut self, other: Settings) -> Result<()> {

        copy_field!(self, other, seam_allowance);
        copy_field!(self, other, buttons);
        copy_field!(self, other, curve_samples);
        copy_field!(self, other, label_offset);
        copy_field!(self, other, notch_length);
        copy_field!(self, other, title);
        copy_field!(self, other, fabric);

        Ok(())

    }

    fn draft_options(&self) -> DraftOptions {

        let defaults = DraftOptions::default();

        DraftOptions {
            seam_allowance: self.seam_allowance.unwrap_or(defaults.seam_allowance),
            buttons: self.buttons.unwrap_or(defaults.buttons),
            curve_samples: self.curve_samples.unwrap_or(defaults.curve_samples),
            label_offset: self.label_offset.unwrap_or(defaults.label_offset),
            notch_length: self.notch_length.unwrap_or(defaults.notch_length),
            ..defaults
        }

    }

}

#[derive(Debug)]
enum Directive {
    Session(Event),
    Settings(Settings),
}

fn parse_text(keyword: &str, rest: &[&str]) -> Result<String> {
    if rest.is_empty() {
        bail!("missing text for {:}", keyword);
    }
    Ok(rest.join(" "))
}

fn parse_keyword(keyword: &str, rest: &[&str]) -> Result<Directive> {

    let mut update = Settings::default();

    match keyword {

        "size" => {
            let size = parse_tokens!(rest, { size: String })?;
            return Ok(Directive::Session(Event::SelectSize(size)));
        },

        "set" => {

            if let Some(&name) = rest.first() {
                if name == "collar_length" || name == COLLAR_LENGTH {
                    bail!("collar length is computed from the necklines and can't be set");
                }
            }

            let (key, value) = parse_tokens!(rest, { measurement from MEASUREMENT_KEYS, value: f64 })?;

            return Ok(Directive::Session(Event::SetMeasurement(key, value)));

        },

        "seam_allowance" => {
            update.seam_allowance = Some(parse_tokens!(rest, { seam_allowance: f64 })?);
        },

        "buttons" => {
            update.buttons = Some(parse_tokens!(rest, { buttons: usize })?);
        },

        "curve_samples" => {
            update.curve_samples = Some(parse_tokens!(rest, { curve_samples: usize })?);
        },

        "label_offset" => {
            update.label_offset = Some(parse_tokens!(rest, { label_offset: f64 })?);
        },

        "notch_length" => {
            update.notch_length = Some(parse_tokens!(rest, { notch_length: f64 })?);
        },

        "title" => {
            update.title = Some(parse_text(keyword, rest)?);
        },

        "fabric" => {
            update.fabric = Some(parse_text(keyword, rest)?);
        },

        _ => {
            bail!("unrecognized keyword");
        }

    }

    Ok(Directive::Settings(update))

}

//////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, PartialEq)]
pub struct PatternFile {
    pub measurements: MeasurementSet, // confirmed
    pub options: DraftOptions,
    pub title: Option<String>,
    pub fabric: Option<String>,
}

// '#' at the start of a line, or "# " after whitespace
fn strip_comment(line: &str) -> &str {

    let mut prev_space = true;
    let mut chars = line.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {

        if c == '#' && prev_space {
            let at_start = line[..pos].trim().is_empty();
            let standalone = chars.peek().map_or(true, |&(_, next)| next.is_whitespace());
            if at_start || standalone {
                return &line[..pos];
            }
        }

        prev_space = c.is_whitespace();

    }

    line

}

struct Parser {
    session: Session,
    settings: Settings,
}

impl Parser {

    fn update_from(&mut self, line: &str) -> Result<()> {

        let trimmed = strip_comment(line.trim());

        let tokens: Vec<&str> = trimmed.split_whitespace().collect();

        let (keyword, rest) = match tokens.split_first() {
            Some((&keyword, rest)) => (keyword, rest),
            None => return Ok(())
        };

        let directive = parse_keyword(keyword, rest).chain_err(
            || format!("while parsing keyword {:}", keyword))?;

        match directive {
            Directive::Session(event) => {
                self.session = self.session.apply(event)?;
            },
            Directive::Settings(update) => {
                self.settings.update(update)?;
            }
        }

        Ok(())

    }

}

impl PatternFile {

    pub fn parse(filename: &str, istr: &mut impl BufRead) -> Result<PatternFile> {

        let mut parser = Parser {
            session: Session::new(),
            settings: Settings::default(),
        };

        let mut lineno = 0;

        loop {

            let mut line = String::new();

            lineno += 1;

            let len = istr.read_line(&mut line).chain_err(|| format!("{:}:{:}: read error", filename, lineno))?;

            if len == 0 {
                break;
            }

            parser.update_from(line.as_str()).chain_err(|| format!("{:}:{:}: parse error", filename, lineno))?;

        }

        if parser.session == Session::SelectingSize {
            bail!("{:}: no size selected", filename);
        }

        let measurements = parser.session.apply(Event::Confirm)
            .and_then(Session::into_confirmed)
            .chain_err(|| format!("{:}: invalid measurements", filename))?;

        let options = parser.settings.draft_options();
        options.validate().chain_err(|| format!("{:}: invalid options", filename))?;

        debug!("parsed {:} with size {:}", filename, measurements.size_name().unwrap_or("custom"));

        Ok(PatternFile {
            measurements,
            options,
            title: parser.settings.title,
            fabric: parser.settings.fabric,
        })

    }

    pub fn open(filename: &str) -> Result<PatternFile> {

        let f = File::open(filename).chain_err(|| format!("opening {:}", filename))?;
        let mut reader = BufReader::new(f);

        Self::parse(filename, &mut reader)

    }

}

//////////////////////////////////////////////////////////////////////
