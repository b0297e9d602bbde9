//////////////////////////////////////////////////////////////////////
// cairo PDF output: a summary block, then every piece auto-fitted into
// cells flowed two per row onto letter portrait pages

use std::path::Path;

use cairo::{FontSlant, FontWeight};
use tracing::{debug, info};

use crate::{Point2d, Transform2d, Vec2d};
use crate::draft::Pattern;
use crate::errors::*;
use crate::geometry::{HFlip, Rect2d, get_page_transform};
use crate::layout::{self, LayoutItem, INCH, MARGIN, PAGE_LONG_EDGE, PAGE_SHORT_EDGE};
use crate::piece::{Marking, PatternPiece, PieceGeometry};

type Vec3d = nalgebra::Vector3<f64>;

const SPACING: f64 = 18.0;

const TITLE_FONT: f64 = 12.0;
const NOTE_FONT: f64 = 9.0;
const LABEL_FONT: f64 = 6.0;
const SUMMARY_FONT: f64 = 10.0;

// room around label anchors, inches
const LABEL_PAD: f64 = 0.25;

const CIRCLE_SEGMENTS: usize = 32;

fn page_rect() -> Rect2d {
    let mm = Vec2d::repeat(MARGIN);
    Rect2d::new(Point2d::origin() + mm,
                Point2d::new(PAGE_SHORT_EDGE, PAGE_LONG_EDGE) - mm)
}

// two cells side by side, a bit under half the printable height
fn max_cell_dims() -> Vec2d {
    let dims = page_rect().dims();
    Vec2d::new(0.999 * 0.5 * (dims.x - SPACING), 0.4 * dims.y)
}

//////////////////////////////////////////////////////////////////////

trait CairoVecOps {

    fn moveto(&self, p: &Point2d);
    fn lineto(&self, p: &Point2d);
    fn setcolor(&self, v: &Vec3d);
    fn drawpoly(&self, poly: &[Point2d]);
    fn drawpolyline(&self, poly: &[Point2d]);
    fn centertext(&self, p: &Point2d, text: &str);

}

impl CairoVecOps for cairo::Context {

    fn moveto(&self, p: &Point2d) {
        self.move_to(p.x, p.y);
    }

    fn lineto(&self, p: &Point2d) {
        self.line_to(p.x, p.y);
    }

    fn setcolor(&self, v: &Vec3d) {
        self.set_source_rgb(v[0], v[1], v[2]);
    }

    fn drawpoly(&self, poly: &[Point2d]) {
        self.drawpolyline(poly);
        self.close_path();
    }

    fn drawpolyline(&self, poly: &[Point2d]) {
        for (i, p) in poly.iter().enumerate() {
            if i == 0 {
                self.moveto(p);
            } else {
                self.lineto(p);
            }
        }
    }

    fn centertext(&self, p: &Point2d, text: &str) {

        let extents = self.text_extents(text);

        let offset = 0.5 * Vec2d::new(extents.width + 2.0 * extents.x_bearing,
                                      extents.height + 2.0 * extents.y_bearing);

        self.moveto(&(p - offset));
        self.show_text(text);

    }

}

macro_rules! with_save_restore {

    ($ctx:ident, { $($tree:tt)* }) => {

        $ctx.save();

        {

            $($tree)*

        }

        $ctx.restore();

    }

}

//////////////////////////////////////////////////////////////////////
// boxes with known size that know how to draw themselves at the origin

enum Drawable<'a> {
    LineBreak,
    Box {
        dims: Vec2d,
        drawfunc: Box<dyn Fn(&cairo::Context) -> Result<()> + 'a>
    }
}

impl<'a> Drawable<'a> {

    fn layout_item(&self) -> LayoutItem {
        match self {
            Drawable::LineBreak => LayoutItem::LineBreak,
            Drawable::Box { dims, .. } => LayoutItem::Box(*dims),
        }
    }

}

fn vstack<'a>(dvec: Vec<Drawable<'a>>,
              spacing: f64) -> Drawable<'a> {

    let mut output_dims = Vec2d::new(0.0, 0.0);

    for (i, d) in dvec.iter().enumerate() {
        if let Drawable::Box { dims, .. } = d {
            output_dims.x = output_dims.x.max(dims.x);
            output_dims.y += dims.y;
            if i > 0 { output_dims.y += spacing; }
        }
    }

    let drawfunc = move |ctx: &cairo::Context| {
        let mut ty = 0.0;
        for d in dvec.iter() {
            if let Drawable::Box { dims, drawfunc } = d {
                with_save_restore!(ctx, {
                    ctx.translate(0.0, ty);
                    drawfunc(ctx)?;
                });
                ty += dims.y + spacing;
            }
        }
        Ok(())
    };

    Drawable::Box { dims: output_dims,
                    drawfunc: Box::new(drawfunc) }

}

fn label_drawable<'a>(ctx: &cairo::Context,
                      font_size: f64,
                      text: String,
                      bottom_margin: f64) -> Drawable<'a> {

    ctx.save();
    ctx.set_font_size(font_size);
    let width = ctx.text_extents(text.as_str()).x_advance;
    ctx.restore();

    let f = move |ctx: &cairo::Context| {
        with_save_restore!(ctx, {
            ctx.set_font_size(font_size);
            ctx.set_source_rgb(0.0, 0.0, 0.0);
            ctx.move_to(0.0, font_size);
            ctx.show_text(text.as_str());
        });
        Ok(())
    };

    Drawable::Box { dims: Vec2d::new(width, font_size + bottom_margin),
                    drawfunc: Box::new(f) }

}

//////////////////////////////////////////////////////////////////////
// pieces

struct StyledPath {
    color: Vec3d,
    line_width: f64,
    dash: f64,
    closed: bool,
    points: Vec<Point2d>
}

impl StyledPath {

    fn solid(points: Vec<Point2d>, closed: bool) -> Self {
        StyledPath { color: Vec3d::zeros(), line_width: 0.75, dash: 0.0, closed, points }
    }

    fn dashed(points: Vec<Point2d>, closed: bool, dash: f64, gray: f64) -> Self {
        StyledPath { color: Vec3d::repeat(gray), line_width: 0.75, dash, closed, points }
    }

}

fn geometry_points(geom: &PieceGeometry) -> Vec<Point2d> {

    match geom {

        PieceGeometry::Polygon(points) => points.clone(),

        PieceGeometry::Rectangle { origin, width, height } => {
            PieceGeometry::rectangle_edges(*origin, *width, *height)
                .iter().map(|e| e.start()).collect()
        },

        PieceGeometry::Circle { center, radius } => {
            (0..CIRCLE_SEGMENTS).map(|i| {
                let theta = 2.0 * std::f64::consts::PI * i as f64 / CIRCLE_SEGMENTS as f64;
                center + *radius * Vec2d::new(theta.cos(), theta.sin())
            }).collect()
        }

    }

}

// everything but the outline itself, in piece coordinates
fn piece_paths(piece: &PatternPiece) -> Vec<StyledPath> {

    let mut paths = Vec::new();

    for run in &piece.seam_allowance {
        paths.push(StyledPath::dashed(run.clone(), false, 3.0, 0.4));
    }

    for marking in &piece.markings {

        match marking {

            Marking::FoldLine { p0, p1 } => {
                paths.push(StyledPath::dashed(vec![*p0, *p1], false, 6.0, 0.2));
            },

            Marking::PlacketIndicator(geom) => {
                paths.push(StyledPath::dashed(geometry_points(geom), true, 2.0, 0.3));
            },

            Marking::Notch { p0, p1 } => {
                paths.push(StyledPath::solid(vec![*p0, *p1], false));
            },

            Marking::Grainline(lines) => {
                for line in lines {
                    paths.push(StyledPath::solid(line.clone(), false));
                }
            },

            Marking::Button(geom) => {
                paths.push(StyledPath::solid(geometry_points(geom), true));
            }

        }

    }

    paths

}

fn draw_piece(ctx: &cairo::Context,
              piece: &PatternPiece,
              transform: &Transform2d) -> Result<()> {

    let xform = |points: &[Point2d]| -> Vec<Point2d> {
        points.iter().map(|p| transform * p).collect()
    };

    // outline, closed along the fold for cut-on-fold pieces
    let outline = xform(&piece.boundary);

    with_save_restore!(ctx, {

        ctx.drawpoly(&outline);

        if piece.is_interfacing() {
            ctx.set_source_rgba(0.6, 0.6, 0.6, 0.5);
        } else {
            ctx.set_source_rgb(0.93, 0.95, 1.0);
        }

        ctx.fill_preserve();
        ctx.set_line_width(1.0);
        ctx.set_source_rgb(0.0, 0.0, 0.0);
        ctx.stroke();

    });

    for path in piece_paths(piece) {

        let points = xform(&path.points);

        with_save_restore!(ctx, {

            if path.dash != 0.0 {
                ctx.set_dash(&[path.dash, path.dash], 0.5 * path.dash);
            }

            ctx.set_line_width(path.line_width);
            ctx.setcolor(&path.color);

            if path.closed {
                ctx.drawpoly(&points);
            } else {
                ctx.drawpolyline(&points);
            }

            ctx.stroke();

        });

    }

    with_save_restore!(ctx, {

        ctx.set_font_size(LABEL_FONT);
        ctx.set_source_rgb(0.0, 0.0, 0.0);

        for label in &piece.labels {

            let p = transform * label.position;

            with_save_restore!(ctx, {
                ctx.translate(p.x, p.y);
                // page y runs down, so angles flip
                ctx.rotate(-label.angle);
                ctx.centertext(&Point2d::origin(), label.text.as_str());
            });

        }

    });

    Ok(())

}

fn piece_drawable<'a>(piece: &'a PatternPiece) -> Drawable<'a> {

    let contents = piece_contents(piece);

    let max_dims = max_cell_dims();

    // never larger than life size
    let scl = layout::fit_scale(&contents.dims(), &max_dims).min(INCH);

    let dims = contents.dims() * scl;

    debug!("{:} drawn at {:.1}% scale", piece.title(), 100.0 * scl / INCH);

    let f = move |ctx: &cairo::Context| {
        let cell = Rect2d::new(Point2d::origin(), Point2d::origin() + dims);
        let (transform, _) = get_page_transform(&contents, &cell, HFlip::No);
        draw_piece(ctx, piece, &transform)
    };

    Drawable::Box { dims, drawfunc: Box::new(f) }

}

fn piece_contents(piece: &PatternPiece) -> Rect2d {
    layout::piece_bounds(piece, LABEL_PAD)
}

//////////////////////////////////////////////////////////////////////

fn summary_drawable<'a>(ctx: &cairo::Context,
                        pattern: &Pattern,
                        title: Option<&str>,
                        fabric: Option<&str>) -> Drawable<'a> {

    let lines = layout::summary_lines(pattern, title, fabric);

    let mut dvec = Vec::new();

    for (i, line) in lines.into_iter().enumerate() {
        let size = if i == 0 { TITLE_FONT } else { SUMMARY_FONT };
        dvec.push(label_drawable(ctx, size, line, 2.0));
    }

    vstack(dvec, 2.0)

}

pub fn render_pdf(pattern: &Pattern,
                  path: &Path,
                  title: Option<&str>,
                  fabric: Option<&str>) -> Result<()> {

    let surface = cairo::PdfSurface::new(PAGE_SHORT_EDGE, PAGE_LONG_EDGE, path)?;

    let ctx = cairo::Context::new(&surface);

    ctx.select_font_face("Sans", FontSlant::Normal, FontWeight::Normal);

    let mut drawables = vec![
        summary_drawable(&ctx, pattern, title, fabric),
        Drawable::LineBreak,
    ];

    for piece in &pattern.pieces {

        drawables.push(vstack(vec![
            label_drawable(&ctx, TITLE_FONT, piece.title().to_string(), 0.0),
            label_drawable(&ctx, NOTE_FONT, piece.cut_note().to_string(), 2.0),
            piece_drawable(piece),
        ], 2.0));

    }

    let items: Vec<LayoutItem> = drawables.iter().map(|d| d.layout_item()).collect();

    let pages = layout::plan_rows(&items, &page_rect(), SPACING);

    for page in &pages {

        for placement in &page.placements {

            if let Drawable::Box { drawfunc, .. } = &drawables[placement.index] {

                with_save_restore!(ctx, {
                    ctx.translate(placement.top_left.x, placement.top_left.y);
                    drawfunc(&ctx)?;
                });

            }

        }

        ctx.show_page();

    }

    surface.finish();

    info!("wrote {:} page(s) to {:}", pages.len(), path.display());

    Ok(())

}
