/*

Draft a polo shirt pattern from a pattern file and write it to PDF.

usage: polo_pattern PATTERNFILE

 */

#[macro_use]
extern crate error_chain;

use std::path::Path;

use tracing::{info, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use polo_pattern::config::PatternFile;
use polo_pattern::draft::draft_all;
use polo_pattern::errors::*;
use polo_pattern::render::render_pdf;

//////////////////////////////////////////////////////////////////////

fn init_logging() {

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

}

fn run() -> Result<()> {

    init_logging();

    let args: Vec<String> = std::env::args().collect();

    if args.len() != 2 {
        eprintln!("usage: {:?} PATTERNFILE", args[0]);
        std::process::exit(1);
    }

    let filename = Path::new(&args[1]);

    let basename = match filename.file_stem() {
        None => "output",
        Some(os_str) => os_str.to_str().unwrap_or("output")
    };

    let pdffile = basename.to_owned() + ".pdf";

    let pf = PatternFile::open(&args[1])?;

    let pattern = draft_all(&pf.measurements, &pf.options)
        .chain_err(|| format!("drafting {:}", args[1]))?;

    let adjusted = pattern.adjustments().count();

    if adjusted > 0 {
        warn!("{:} measurement(s) adjusted, see the summary page", adjusted);
    }

    info!("drafted {:} pieces", pattern.pieces.len());

    render_pdf(&pattern, Path::new(&pdffile),
               pf.title.as_deref(), pf.fabric.as_deref())?;

    println!("wrote {:}", pdffile);

    Ok(())

}

quick_main!(run);
