//! 子命令实现

use anyhow::{Context, Result};
use foilcad_core::math::BoundingBox2;
use foilcad_core::profile::AerofoilProfile;
use foilcad_host::{DxfHost, ImportSession, RetryingHost, TargetListing};
use serde::Serialize;

use crate::cli::{Command, ImportArgs, InfoArgs, TargetsArgs};
use crate::settings;

/// 首尾点重合判定容差（文件单位）
const CLOSED_TOLERANCE: f64 = 1e-6;

pub fn run(command: Command) -> Result<()> {
    match command {
        Command::Info(args) => info(args),
        Command::Targets(args) => targets(args),
        Command::Import(args) => import(args),
    }
}

/// 翼型摘要
#[derive(Debug, Serialize)]
struct ProfileSummary<'a> {
    name: Option<&'a str>,
    points: usize,
    closed: bool,
    bounds: Option<BoundingBox2>,
}

impl<'a> ProfileSummary<'a> {
    fn new(profile: &'a AerofoilProfile) -> Self {
        Self {
            name: profile.name(),
            points: profile.len(),
            closed: profile.is_closed(CLOSED_TOLERANCE),
            bounds: (!profile.is_empty()).then(|| profile.bounding_box()),
        }
    }

    fn print(&self) {
        println!("Name:    {}", self.name.unwrap_or("-"));
        println!("Points:  {}", self.points);
        println!("Curve:   {}", if self.closed { "closed" } else { "open" });
        if let Some(b) = &self.bounds {
            println!(
                "Bounds:  x {:.6} .. {:.6}, y {:.6} .. {:.6}",
                b.min.x, b.max.x, b.min.y, b.max.y
            );
        }
    }
}

fn info(args: InfoArgs) -> Result<()> {
    let mut session = ImportSession::default();
    let profile = session.load_profile(&args.dat)?;
    let summary = ProfileSummary::new(profile);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        summary.print();
    }
    Ok(())
}

fn targets(args: TargetsArgs) -> Result<()> {
    let host = DxfHost::open(&args.document)
        .with_context(|| format!("Failed to open {}", args.document.display()))?;
    let mut host = RetryingHost::new(host);
    let listing = ImportSession::default().list_targets(&mut host)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
    } else {
        print_targets(&listing);
    }
    Ok(())
}

fn print_targets(listing: &TargetListing) {
    println!("Document: {} ({:?})", listing.document.name, listing.document.kind);
    println!("Reference planes:");
    for plane in &listing.planes {
        println!("  {}", plane.name);
    }
    println!("Sketches:");
    if listing.sketches.is_empty() {
        println!("  (none)");
    }
    for sketch in &listing.sketches {
        let plane = listing
            .planes
            .iter()
            .find(|p| p.id == sketch.plane)
            .map(|p| p.name.as_str())
            .unwrap_or("?");
        println!("  {} on {}", sketch.name, plane);
    }
}

fn import(args: ImportArgs) -> Result<()> {
    let settings = settings::resolve(&args)?;
    let mut session = ImportSession::new(settings);
    session.load_profile(&args.dat)?;

    if args.dry_run {
        let preview = session.preview()?;
        println!("Dry run, {} not modified", args.document.display());
        ProfileSummary::new(&preview).print();
        return Ok(());
    }

    let host = DxfHost::open(&args.document)
        .with_context(|| format!("Failed to open {}", args.document.display()))?;
    let mut host = RetryingHost::new(host);

    let report = session.import(&mut host)?;
    let saved = host
        .get_mut()
        .save()
        .with_context(|| format!("Failed to save {}", args.document.display()))?;

    println!(
        "Added spline ({} points) to {} sketch '{}' in {}",
        report.point_count,
        if report.created_sketch { "new" } else { "existing" },
        report.sketch_name,
        saved.display()
    );
    let b = report.bounding_box;
    println!(
        "Bounds (m): x {:.6} .. {:.6}, y {:.6} .. {:.6}",
        b.min.x, b.max.x, b.min.y, b.max.y
    );
    Ok(())
}
