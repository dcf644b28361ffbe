//! Boxmodel CLI - quad box-modeling command-line tool.
//!
//! Usage: boxmodel [-v] <COMMAND> [OPTIONS] ...
//!
//! Run `boxmodel --help` for available commands.

use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use boxmodel::algo::{find_neighbor, subdivide_mesh_with_progress, Progress, SubdivideOptions};
use boxmodel::io;
use boxmodel::mask::{build_mask, build_scene_with_progress, MaskParams, SceneParams};
use boxmodel::mesh::{create_box, QuadMesh};

#[derive(Parser)]
#[command(name = "boxmodel")]
#[command(author, version, about = "Quad box-modeling CLI", long_about = None)]
struct Cli {
    /// Print debug logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a box and optionally subdivide it
    Box {
        /// Output mesh file
        output: PathBuf,

        /// Extent along X
        #[arg(long, default_value = "1.0")]
        width: f64,

        /// Extent along Y
        #[arg(long, default_value = "1.0")]
        height: f64,

        /// Extent along Z
        #[arg(long, default_value = "1.0")]
        depth: f64,

        /// Number of Catmull-Clark iterations (0 keeps the raw box)
        #[arg(short, long, default_value = "0")]
        subdivisions: usize,

        /// Keep quads instead of triangulating the subdivided result
        #[arg(long)]
        quads: bool,
    },

    /// Build the mask, optionally with its body
    Mask {
        /// Output mesh file
        output: PathBuf,

        /// Number of Catmull-Clark iterations (0 keeps the raw cage)
        #[arg(short, long, default_value = "2")]
        subdivisions: usize,

        /// Build the whole scene: mask stacked on its body
        #[arg(long, conflicts_with = "quads")]
        body: bool,

        /// Keep quads instead of triangulating the subdivided result
        #[arg(long)]
        quads: bool,
    },

    /// Subdivide a quad mesh
    Subdivide {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file
        output: PathBuf,

        /// Number of subdivision iterations
        #[arg(short, long, default_value = "1")]
        iterations: usize,

        /// Keep quads instead of triangulating the result
        #[arg(long)]
        quads: bool,
    },

    /// Display mesh information
    Info {
        /// Input mesh file
        input: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Install the fmt subscriber. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "boxmodel=debug" } else { "boxmodel=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Box {
            output,
            width,
            height,
            depth,
            subdivisions,
            quads,
        } => {
            cmd_box(&output, width, height, depth, subdivisions, quads)?;
        }

        Commands::Mask {
            output,
            subdivisions,
            body,
            quads,
        } => {
            cmd_mask(&output, subdivisions, body, quads)?;
        }

        Commands::Subdivide {
            input,
            output,
            iterations,
            quads,
        } => {
            cmd_subdivide(&input, &output, iterations, quads)?;
        }

        Commands::Info { input } => {
            cmd_info(&input)?;
        }
    }

    Ok(())
}

/// Create a progress reporter that displays a progress bar on the terminal.
fn create_progress() -> Progress {
    let max_percent = Arc::new(AtomicUsize::new(0)); // Track highest percent seen (monotonic)

    Progress::new(move |current, total, message| {
        if total == 0 {
            return;
        }

        let raw_percent = if current >= total {
            100
        } else {
            ((current * 100) + (total / 2)) / total
        };

        let (percent, increased) = loop {
            let old_max = max_percent.load(Ordering::Relaxed);
            let new_max = old_max.max(raw_percent);
            if new_max == old_max {
                break (old_max, false);
            }
            match max_percent.compare_exchange_weak(
                old_max,
                new_max,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break (new_max, true),
                Err(_) => continue,
            }
        };

        // Only redraw when the bar moves
        if !increased && percent != 100 {
            return;
        }

        let bar_width = 30;
        let filled = (percent * bar_width) / 100;
        let bar = "=".repeat(filled);
        let space = " ".repeat(bar_width - filled);

        eprint!("\r[{}{}] {:3}% {}", bar, space, percent, message);
        let _ = std::io::stderr().flush();

        if current >= total {
            eprintln!();
        }
    })
}

/// Subdivide `mesh` and save it, or save it untouched when `iterations` is 0.
fn subdivide_and_save(
    mesh: &QuadMesh,
    output: &PathBuf,
    iterations: usize,
    quads: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();

    if iterations == 0 {
        io::save(mesh, output)?;
        println!("Saved: {} ({:.2?})", output.display(), start.elapsed());
        return Ok(());
    }

    let options = SubdivideOptions::new(iterations).with_triangles(!quads);
    println!("Applying Catmull-Clark subdivision ({} iterations)...", iterations);
    let result = subdivide_mesh_with_progress(mesh, &options, &create_progress())?;
    let elapsed = start.elapsed();

    println!(
        "Result: {} positions, {} cells",
        result.positions().len(),
        result.num_cells()
    );
    io::save(&result, output)?;
    println!("Saved: {} ({:.2?})", output.display(), elapsed);

    Ok(())
}

fn cmd_box(
    output: &PathBuf,
    width: f64,
    height: f64,
    depth: f64,
    subdivisions: usize,
    quads: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    for (name, value) in [("width", width), ("height", height), ("depth", depth)] {
        if value.is_nan() || value <= 0.0 {
            return Err(format!("{} must be positive, got {}", name, value).into());
        }
    }

    let mesh = create_box(width, height, depth);
    println!("Box: {} positions, {} cells", mesh.num_positions(), mesh.num_cells());

    subdivide_and_save(&mesh, output, subdivisions, quads)
}

fn cmd_mask(
    output: &PathBuf,
    subdivisions: usize,
    body: bool,
    quads: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !body {
        let mesh = build_mask(&MaskParams::default())?;
        println!("Mask: {} positions, {} cells", mesh.num_positions(), mesh.num_cells());
        return subdivide_and_save(&mesh, output, subdivisions, quads);
    }

    let params = SceneParams::default().with_subdivisions(subdivisions);
    println!("Building mask scene ({} iterations)...", subdivisions);

    let start = Instant::now();
    let scene = build_scene_with_progress(&params, &create_progress())?;
    let elapsed = start.elapsed();

    println!(
        "Result: {} positions, {} triangles",
        scene.num_positions(),
        scene.num_cells()
    );
    io::save(&scene, output)?;
    println!("Saved: {} ({:.2?})", output.display(), elapsed);

    Ok(())
}

fn cmd_subdivide(
    input: &PathBuf,
    output: &PathBuf,
    iterations: usize,
    quads: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mesh = io::load(input)?;
    println!("Loaded: {} positions, {} cells", mesh.num_positions(), mesh.num_cells());

    if iterations == 0 {
        return Err("iterations must be >= 1".into());
    }
    subdivide_and_save(&mesh, output, iterations, quads)
}

fn cmd_info(input: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let mesh = io::load(input)?;

    println!("File: {}", input.display());
    println!("Positions: {}", mesh.num_positions());
    println!("Cells: {}", mesh.num_cells());

    let mut total_area = 0.0;
    let mut min_area = f64::MAX;
    let mut max_area = 0.0_f64;
    for id in mesh.cell_ids() {
        let area = mesh.cell_area(id);
        total_area += area;
        min_area = min_area.min(area);
        max_area = max_area.max(area);
    }

    println!("Surface area: {:.6}", total_area);
    if mesh.num_cells() > 0 {
        println!("Cell area range: [{:.6}, {:.6}]", min_area, max_area);
    }

    if let Some((min, max)) = mesh.bounding_box() {
        println!(
            "Bounding box: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
        let diag = max - min;
        println!("Dimensions: {:.3} x {:.3} x {:.3}", diag.x, diag.y, diag.z);
    }

    // An edge is open when no cell holds it in the opposite direction.
    let open_edges = mesh
        .cells
        .iter()
        .flat_map(|cell| (0..4).map(move |k| (cell[k], cell[(k + 1) % 4])))
        .filter(|&(from, to)| find_neighbor(&mesh, from, to).is_none())
        .count();
    if open_edges == 0 {
        println!("Topology: Closed (no boundary)");
    } else {
        println!("Topology: Open ({} boundary edges)", open_edges);
    }

    match mesh.validate() {
        Ok(()) => println!("Validation: OK"),
        Err(e) => println!("Validation: {}", e),
    }

    Ok(())
}
