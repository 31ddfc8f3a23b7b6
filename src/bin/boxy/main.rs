//! Boxy CLI - cuboid inference and anchor queries on JSON geometry.

use anyhow::{bail, Context, Result};
use boxy::anchor::{Anchor, AnchorComponents};
use boxy::boxy::BoxyData;
use boxy::config::Settings;
use boxy::core::{Axis, Bounds};
use boxy::cuboid::{find_cuboid, get_bounds, CuboidFinder, Geometry};
use boxy::geom::{FaceFinder, Mesh, SurfaceDirection};
use boxy::util::DVec3;
use serde::de::DeserializeOwned;
use std::env;
use std::path::Path;
use tracing::{debug, info};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Verbosity from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verbosity {
    Quiet,
    Info,
    Debug,
    Trace,
}

impl Verbosity {
    fn directive(self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Info => "info",
            Verbosity::Debug => "debug",
            Verbosity::Trace => "trace",
        }
    }
}

/// Install a stderr subscriber. RUST_LOG overrides the flag level.
fn init_tracing(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(verbosity.directive()));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);
    let subscriber = tracing_subscriber::registry().with(filter).with(fmt_layer);
    // A subscriber may already be installed when embedded
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn main() {
    let args: Vec<String> = env::args().collect();

    // Parse global flags
    let mut verbosity = Verbosity::Info;
    let mut json_mode = false;
    let mut filtered_args: Vec<&str> = Vec::new();
    for arg in &args[1..] {
        match arg.as_str() {
            "-v" | "--verbose" => verbosity = Verbosity::Debug,
            "-vv" | "--trace" => verbosity = Verbosity::Trace,
            "-q" | "--quiet" => verbosity = Verbosity::Quiet,
            "-j" | "--json" => json_mode = true,
            other => filtered_args.push(other),
        }
    }
    if json_mode && verbosity == Verbosity::Info {
        verbosity = Verbosity::Quiet;
    }
    init_tracing(verbosity);

    if filtered_args.is_empty() {
        print_help();
        return;
    }

    let settings = Settings::load();
    debug!(?settings, "loaded settings");

    let result = match filtered_args[0] {
        "infer" | "i" => cmd_infer(&filtered_args[1..], &settings, json_mode),
        "bounds" | "b" => cmd_bounds(&filtered_args[1..], json_mode),
        "anchors" | "a" => cmd_anchors(&filtered_args[1..], json_mode),
        "opposite" | "o" => cmd_opposite(&filtered_args[1..], &settings, json_mode),
        "pivot" | "p" => cmd_pivot(&filtered_args[1..], json_mode),
        "reorient" | "r" => cmd_reorient(&filtered_args[1..], json_mode),
        "polycube" | "pc" => cmd_polycube(&filtered_args[1..], &settings, json_mode),
        "config" => cmd_config(json_mode),
        "version" | "-V" | "--version" => {
            print_version();
            Ok(())
        }
        "help" | "h" | "-h" | "--help" => {
            print_help();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {}", other);
            eprintln!();
            print_help();
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn print_version() {
    println!(
        "boxy-cli {} (built {} {})",
        env!("CARGO_PKG_VERSION"),
        option_env!("BOXY_BUILD_DATE").unwrap_or("unknown"),
        option_env!("BOXY_BUILD_TIME").unwrap_or("unknown"),
    );
}

fn print_help() {
    println!("boxy-cli - cuboid inference and pivot anchor toolkit");
    println!();
    println!("USAGE:");
    println!("    boxy-cli [OPTIONS] <COMMAND> [ARGS]");
    println!();
    println!("COMMANDS:");
    println!("    i, infer    <geometry.json> [--scale]           Recover an oriented cuboid");
    println!("    b, bounds   <geometry.json> [--rotation] [--scale]  Axis-aligned bounds");
    println!("    a, anchors  <sx> <sy> <sz> [pivot]              List the 27 anchor keypoints");
    println!("    o, opposite <mesh.json> <face>... [--concave]   Find opposite faces");
    println!("    p, pivot    <boxy.json> <anchor>                Move a boxy's pivot");
    println!("    r, reorient <boxy.json> <degrees> <axis>        Turn a boxy's frame by 90 degree steps");
    println!("    pc, polycube <boxy.json|mesh.json> [--scale]    Toggle boxy and polycube");
    println!("    config                                          Show settings and their path");
    println!("    version                                         Show version and build date");
    println!("    h, help                                         Show this help");
    println!();
    println!("OPTIONS:");
    println!("    -v, --verbose    Show debug output");
    println!("    -vv, --trace     Show trace output (very verbose)");
    println!("    -q, --quiet      Suppress all output");
    println!("    -j, --json       Machine-readable output");
    println!();
    println!("GEOMETRY:");
    println!("    A JSON array of 5-8 [x, y, z] points, or a mesh object:");
    println!("    {{ \"positions\": [[x, y, z], ...], \"faces\": [[0, 1, 3, 2], ...],");
    println!("      \"transform\": {{ \"translation\": [..], \"rotation\": [..], \"scale\": [..], \"pivot\": [..] }} }}");
    println!();
    println!("EXAMPLES:");
    println!("    boxy-cli infer corners.json               # Center, size and rotation");
    println!("    boxy-cli anchors 2 4 6 f2 --json          # Keypoints relative to a bottom pivot");
    println!("    boxy-cli opposite room.json 3 --concave   # Wall facing face 3");
    println!();
    println!("NOTES:");
    println!("    - RUST_LOG overrides the verbosity flags");
}

// ============================================================================
// Input
// ============================================================================

/// Points or a mesh read from a JSON file.
enum Source {
    Points(Vec<DVec3>),
    Mesh(Mesh),
}

impl Source {
    fn geometry(&self) -> Geometry<'_> {
        match self {
            Source::Points(points) => Geometry::Locators(points),
            Source::Mesh(mesh) => Geometry::Mesh(mesh),
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &str) -> Result<T> {
    let text = std::fs::read_to_string(Path::new(path)).with_context(|| format!("Failed to read {}", path))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path))
}

fn read_source(path: &str) -> Result<Source> {
    let value: serde_json::Value = read_json(path)?;
    if value.is_array() {
        let points: Vec<DVec3> = serde_json::from_value(value).context("Expected an array of [x, y, z] points")?;
        info!("Read {} points from {}", points.len(), path);
        Ok(Source::Points(points))
    } else {
        let mesh: Mesh = serde_json::from_value(value).context("Expected a mesh object")?;
        info!("Read mesh '{}' ({} vertices, {} faces) from {}", mesh.name, mesh.vertex_count(), mesh.face_count(), path);
        Ok(Source::Mesh(mesh))
    }
}

fn has_flag(args: &[&str], flag: &str) -> bool {
    args.iter().any(|&a| a == flag)
}

fn positional<'a>(args: &[&'a str]) -> Vec<&'a str> {
    args.iter().copied().filter(|a| !a.starts_with("--")).collect()
}

// ============================================================================
// Output
// ============================================================================

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn fmt3(v: DVec3) -> String {
    format!("({:.4}, {:.4}, {:.4})", v.x, v.y, v.z)
}

fn print_bounds(bounds: &Bounds) {
    println!("  center:   {}", fmt3(bounds.position));
    println!("  size:     {}", fmt3(bounds.size));
    println!("  rotation: {}", fmt3(bounds.rotation));
    if bounds.scale != DVec3::ONE {
        println!("  scale:    {}", fmt3(bounds.scale));
    }
}

fn print_boxy(boxy: &BoxyData) {
    println!("  pivot:       {} (index {})", boxy.pivot_anchor, boxy.pivot_anchor.index());
    println!("  translation: {}", fmt3(boxy.translation));
    println!("  center:      {}", fmt3(boxy.center()));
    println!("  size:        {}", fmt3(boxy.size));
    println!("  rotation:    {}", fmt3(boxy.rotation));
    println!("  scale:       {}", fmt3(boxy.scale));
    println!("  color:       {}", boxy.color);
}

// ============================================================================
// Commands
// ============================================================================

fn cmd_infer(args: &[&str], settings: &Settings, json_mode: bool) -> Result<()> {
    let args_pos = positional(args);
    let Some(path) = args_pos.first() else {
        bail!("missing geometry file\nUsage: boxy-cli infer <geometry.json> [--scale]");
    };
    let inherit_scale = has_flag(args, "--scale");
    let source = read_source(path)?;

    let finder = CuboidFinder::new(settings);
    let bounds = find_cuboid(&source.geometry(), inherit_scale, &finder)?;

    if json_mode {
        print_json(&serde_json::json!({
            "bounds": bounds,
            "vertices": bounds.vertices().map(|v| v.to_array()),
        }))
    } else {
        println!("Cuboid:");
        print_bounds(&bounds);
        println!("  vertices:");
        for (anchor, v) in Anchor::VERTICES.iter().zip(bounds.vertices()) {
            println!("    {}: {}", anchor, fmt3(v));
        }
        Ok(())
    }
}

fn cmd_bounds(args: &[&str], json_mode: bool) -> Result<()> {
    let args_pos = positional(args);
    let Some(path) = args_pos.first() else {
        bail!("missing geometry file\nUsage: boxy-cli bounds <geometry.json> [--rotation] [--scale]");
    };
    let source = read_source(path)?;
    let bounds = get_bounds(&source.geometry(), has_flag(args, "--rotation"), has_flag(args, "--scale"))?;

    if json_mode {
        print_json(&bounds)
    } else {
        println!("Bounds:");
        print_bounds(&bounds);
        Ok(())
    }
}

fn cmd_anchors(args: &[&str], json_mode: bool) -> Result<()> {
    if args.len() < 3 {
        bail!("missing size\nUsage: boxy-cli anchors <sx> <sy> <sz> [pivot]");
    }
    let mut size = [0.0; 3];
    for (value, arg) in size.iter_mut().zip(args) {
        *value = arg.parse::<f64>().with_context(|| format!("Invalid size component: {}", arg))?;
    }
    let pivot: Anchor = match args.get(3) {
        Some(name) => name.parse()?,
        None => Anchor::C,
    };
    let components = AnchorComponents::new(DVec3::from_array(size), pivot);
    let labels = components.labels();

    if json_mode {
        print_json(&labels)
    } else {
        println!("Anchors (pivot {}):", pivot);
        for label in &labels {
            println!("  {:>4}  {}  {}", label.anchor.name(), fmt3(label.position), label.color);
        }
        Ok(())
    }
}

fn cmd_opposite(args: &[&str], settings: &Settings, json_mode: bool) -> Result<()> {
    let args_pos = positional(args);
    if args_pos.len() < 2 {
        bail!("missing arguments\nUsage: boxy-cli opposite <mesh.json> <face>... [--concave]");
    }
    let mesh: Mesh = read_json(args_pos[0])?;
    let faces = args_pos[1..]
        .iter()
        .map(|arg| arg.parse::<usize>().with_context(|| format!("Invalid face index: {arg}")))
        .collect::<Result<Vec<_>>>()?;

    let mut options = settings.face_finder_options();
    if has_flag(args, "--concave") {
        options.direction = SurfaceDirection::Concave;
    } else if has_flag(args, "--convex") {
        options.direction = SurfaceDirection::Convex;
    }
    let finder = FaceFinder::new(&mesh, options);

    if let [face] = faces[..] {
        let pair = finder.find(face);
        if json_mode {
            return print_json(&pair);
        }
        match pair {
            Some(pair) => println!("Face {} -> {} (distance {:.4})", pair.face, pair.opposite, pair.distance),
            None => println!("Face {}: no opposite face", face),
        }
        return Ok(());
    }

    let pairs = finder.find_group(&faces);
    if json_mode {
        return print_json(&pairs);
    }
    for pair in &pairs {
        println!("Face {} -> {} (distance {:.4})", pair.face, pair.opposite, pair.distance);
    }
    let unmatched: Vec<usize> = faces.iter().copied().filter(|f| !pairs.iter().any(|p| p.face == *f)).collect();
    if !unmatched.is_empty() {
        println!("No opposite face: {unmatched:?}");
    }
    Ok(())
}

fn cmd_pivot(args: &[&str], json_mode: bool) -> Result<()> {
    if args.len() < 2 {
        bail!("missing arguments\nUsage: boxy-cli pivot <boxy.json> <anchor>");
    }
    let boxy: BoxyData = read_json(args[0])?;
    let anchor: Anchor = args[1].parse()?;
    let moved = boxy.with_pivot(anchor);
    info!("Moved pivot {} -> {}", boxy.pivot_anchor, anchor);

    if json_mode {
        print_json(&moved.record())
    } else {
        println!("Boxy:");
        print_boxy(&moved);
        Ok(())
    }
}

fn cmd_reorient(args: &[&str], json_mode: bool) -> Result<()> {
    if args.len() < 3 {
        bail!("missing arguments\nUsage: boxy-cli reorient <boxy.json> <degrees> <axis>");
    }
    let boxy: BoxyData = read_json(args[0])?;
    let degrees: f64 = args[1].parse().with_context(|| format!("Invalid angle: {}", args[1]))?;
    let axis: Axis = args[2].parse()?;
    let turned = boxy.reorient(degrees, axis)?;

    if json_mode {
        print_json(&turned.record())
    } else {
        println!("Boxy:");
        print_boxy(&turned);
        Ok(())
    }
}

fn cmd_polycube(args: &[&str], settings: &Settings, json_mode: bool) -> Result<()> {
    let args_pos = positional(args);
    let Some(path) = args_pos.first() else {
        bail!("missing file\nUsage: boxy-cli polycube <boxy.json|mesh.json> [--scale]");
    };
    let inherit_scale = has_flag(args, "--scale") || settings.inherit_scale;
    let value: serde_json::Value = read_json(path)?;

    if value.get("positions").is_some() {
        let mesh: Mesh = serde_json::from_value(value)?;
        let boxy = BoxyData::from_polycube_with(&mesh, None, settings.default_color, inherit_scale, settings)?;
        if json_mode {
            return print_json(&boxy);
        }
        println!("Boxy:");
        print_boxy(&boxy);
    } else {
        let boxy: BoxyData = serde_json::from_value(value)?;
        let mesh = boxy.to_polycube(inherit_scale);
        if json_mode {
            return print_json(&mesh);
        }
        println!("Polycube '{}':", mesh.name);
        println!("  pivot:       {}", mesh.pivot_anchor.unwrap_or_default());
        println!("  translation: {}", fmt3(mesh.transform.translation));
        println!("  world pivot: {}", fmt3(mesh.transform.world_pivot()));
        for (i, p) in mesh.world_positions().into_iter().enumerate() {
            println!("  vtx[{}]: {}", i, fmt3(p));
        }
    }
    Ok(())
}

fn cmd_config(json_mode: bool) -> Result<()> {
    let settings = Settings::load();
    if json_mode {
        return print_json(&settings);
    }
    match Settings::path() {
        Some(path) => println!("Settings: {}{}", path.display(), if path.exists() { "" } else { " (defaults)" }),
        None => println!("Settings: no config directory (defaults)"),
    }
    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(())
}
