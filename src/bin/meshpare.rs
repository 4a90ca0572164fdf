//! Command-line batch mesh simplifier.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use meshpare::io::{read_mesh, write_mesh};
use meshpare::simplify::QemSimplifier;

/// Simplify a Wavefront OBJ mesh with quadric-error-metric edge collapse.
#[derive(Parser, Debug)]
#[clap(group(
    clap::ArgGroup::new("target")
        .required(true)
        .args(&["faces", "ratio"]),
))]
struct Args {
    /// Input OBJ file.
    #[arg(short, long)]
    input: String,

    /// Output OBJ file.
    #[arg(short, long)]
    output: String,

    /// Target number of output faces.
    #[arg(short, long, group = "target")]
    faces: Option<usize>,

    /// Approximate ratio of output/input faces.
    #[arg(short, long, group = "target")]
    ratio: Option<f64>,
}

fn run(args: &Args) -> meshpare::Result<()> {
    let mesh = read_mesh(&args.input)?;

    let target_faces = match (args.faces, args.ratio) {
        (Some(n), _) => n,
        (None, Some(r)) => (mesh.face_count() as f64 * r) as usize,
        (None, None) => unreachable!("clap enforces the target group"),
    };

    let outcome = QemSimplifier::new().simplify_to_face_count(&mesh, target_faces)?;
    write_mesh(&outcome.mesh, &args.output)?;

    println!("{outcome}");
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    if let Err(err) = run(&args) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
