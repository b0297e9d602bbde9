//////////////////////////////////////////////////////////////////////
// page layout planning and summary text. no drawing happens here; the
// render module turns plans into pages.

use crate::{Point2d, Vec2d};
use crate::draft::Pattern;
use crate::geometry::Rect2d;
use crate::piece::PatternPiece;

// inches to centimeters, for presentation only
pub const IN_TO_CM: f64 = 2.54;

pub const INCH: f64 = 72.0;
pub const PAGE_SHORT_EDGE: f64 = 8.5 * INCH;
pub const PAGE_LONG_EDGE: f64 = 11.0 * INCH;
pub const MARGIN: f64 = 0.5 * INCH;

pub const DEFAULT_TITLE: &str = "Polo Shirt";

//////////////////////////////////////////////////////////////////////
// row flow

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayoutItem {
    LineBreak,
    Box(Vec2d),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub index: usize,      // into the item list
    pub top_left: Point2d, // page coordinates, y down
    pub dims: Vec2d,
}

impl Placement {
    pub fn rect(&self) -> Rect2d {
        Rect2d::new(self.top_left, self.top_left + self.dims)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Page {
    pub placements: Vec<Placement>,
}

// flow boxes left to right into rows, bottom-aligned within each row,
// starting a new row when the next box won't fit and a new page when
// the next row won't. a box wider than the page sits alone in its row.
pub fn plan_rows(items: &[LayoutItem], rect: &Rect2d, spacing: f64) -> Vec<Page> {

    let rect_dims = rect.dims();

    let mut pages = Vec::new();
    let mut page = Page::default();

    let mut cur_top_left = rect.p0;
    let mut start = 0;

    while start < items.len() {

        let mut total_width = 0.0;
        let mut max_height: f64 = 0.0;

        let mut end = start;
        let mut have_break = false;

        while end < items.len() {

            match items[end] {

                LayoutItem::LineBreak => {
                    have_break = true;
                    break;
                },

                LayoutItem::Box(dims) => {

                    let advance = dims.x + spacing;

                    let bust = total_width + advance > rect_dims.x + spacing;

                    if bust && end > start {
                        break;
                    }

                    total_width += advance;
                    max_height = max_height.max(dims.y);

                    end += 1;

                }

            }

        }

        if cur_top_left.y + max_height > rect.p1.y && !page.placements.is_empty() {
            pages.push(std::mem::take(&mut page));
            cur_top_left = rect.p0;
        }

        for (index, item) in items.iter().enumerate().take(end).skip(start) {

            if let LayoutItem::Box(dims) = *item {

                page.placements.push(Placement {
                    index,
                    top_left: Point2d::new(cur_top_left.x, cur_top_left.y + max_height - dims.y),
                    dims,
                });

                cur_top_left.x += dims.x + spacing;

            }

        }

        cur_top_left.x = rect.p0.x;
        cur_top_left.y += max_height + spacing;

        if have_break {
            end += 1;
        }

        start = end;

    }

    if !page.placements.is_empty() || pages.is_empty() {
        pages.push(page);
    }

    pages

}

//////////////////////////////////////////////////////////////////////
// piece extents

// everything drawn for a piece: outline, seam allowance, markings and
// label anchors padded by pad
pub fn piece_bounds(piece: &PatternPiece, pad: f64) -> Rect2d {

    let mut rect = piece.outline.bounding_box();

    for run in &piece.seam_allowance {
        for p in run {
            rect.expand(p);
        }
    }

    for marking in &piece.markings {
        rect.expand_rect(&marking.bounding_box());
    }

    for label in &piece.labels {
        rect.expand_rect(&Rect2d::new(label.position, label.position).inflate(pad));
    }

    rect

}

// uniform scale that fits dims inside max_dims
pub fn fit_scale(dims: &Vec2d, max_dims: &Vec2d) -> f64 {
    (max_dims.x / dims.x).min(max_dims.y / dims.y)
}

//////////////////////////////////////////////////////////////////////
// summary text

pub fn format_dims(width: f64, height: f64) -> String {
    format!("{:}\" x {:}\" ({:.1} cm x {:.1} cm)",
            trim_inches(width), trim_inches(height),
            width * IN_TO_CM, height * IN_TO_CM)
}

// 2 decimals at most, no trailing zeros
fn trim_inches(value: f64) -> String {
    let s = format!("{:.2}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    s.to_string()
}

pub fn heading(pattern: &Pattern, title: Option<&str>) -> String {
    let title = title.unwrap_or(DEFAULT_TITLE);
    match pattern.size_name() {
        Some(size) => format!("Pattern Pieces for {:} (Size {:})", title, size),
        None => format!("Pattern Pieces for {:}", title)
    }
}

pub fn piece_summary(piece: &PatternPiece) -> String {
    format!("{:}: {:}, {:}", piece.title(),
            format_dims(piece.width(), piece.height()), piece.cut_note())
}

pub fn summary_lines(pattern: &Pattern, title: Option<&str>, fabric: Option<&str>) -> Vec<String> {

    let mut lines = vec![heading(pattern, title)];

    if let Some(fabric) = fabric {
        lines.push(format!("Fabric: {:}", fabric));
    }

    lines.push(String::new());

    for piece in &pattern.pieces {
        lines.push(piece_summary(piece));
    }

    let collar = pattern.necklines.collar_length();

    lines.push(String::new());
    lines.push(format!("Collar length from neckline: {:}\" ({:.1} cm)",
                       trim_inches(collar), collar * IN_TO_CM));

    for adj in pattern.adjustments() {
        lines.push(format!("Note: {:}", adj));
    }

    lines

}

//////////////////////////////////////////////////////////////////////
