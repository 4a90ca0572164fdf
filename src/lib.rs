//! # meshpare
//!
//! Batch mesh simplification for Wavefront OBJ files, built on quadric
//! error metrics.
//!
//! This is the umbrella crate that ties the workspace together. You can use
//! it to get everything in one place, or depend on the individual crates for
//! more granular control:
//!
//! - **meshpare-core**: mesh and error types
//! - **meshpare-io**: OBJ reading and writing
//! - **meshpare-simplify**: the QEM edge-collapse simplifier
//!
//! ## Quick start
//!
//! ```no_run
//! use meshpare::simplify_obj_file;
//!
//! let outcome = simplify_obj_file("bunny.obj", "bunny_small.obj", 1000)?;
//! println!("{outcome}");
//! # Ok::<(), meshpare::Error>(())
//! ```

// Re-export core functionality
pub use meshpare_core::*;

// Re-export sub-crates
pub use meshpare_io as io;
pub use meshpare_simplify as simplify;

use std::path::Path;

use meshpare_io::{read_mesh, write_mesh};
use meshpare_simplify::{QemSimplifier, SimplifyOutcome};
use tracing::info;

/// Convenient imports for common use cases
pub mod prelude {
    pub use meshpare_core::*;
    pub use meshpare_io::*;
    pub use meshpare_simplify::*;
}

/// Load an OBJ file, simplify it to at most `target_faces` faces, and write
/// the result.
///
/// I/O failures on either path surface as [`Error::Io`](meshpare_core::Error).
/// If the simplifier runs out of collapsible edges before the target is
/// reached, the output holds whatever face count remains and the returned
/// outcome reports it.
pub fn simplify_obj_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    target_faces: usize,
) -> Result<SimplifyOutcome> {
    let mesh = read_mesh(input.as_ref())?;
    info!(
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        "loaded mesh"
    );

    let outcome = QemSimplifier::new().simplify_to_face_count(&mesh, target_faces)?;
    write_mesh(&outcome.mesh, output.as_ref())?;

    Ok(outcome)
}
