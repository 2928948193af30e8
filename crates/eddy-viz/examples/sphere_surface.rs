//! Parametric surface demo.
//!
//! Switches the simulation to the sphere preset (surface mode) and exports
//! the sampled grid as a PNG.
//!
//! Run with: `cargo run --example sphere_surface`

use std::path::Path;

use eddy_expr_std::std_registry;
use eddy_sim::{SimConfig, Simulation};
use eddy_viz::{FrameInput, PointRenderer, SplatRenderer, Viewer};

fn main() {
    let sim = match Simulation::new(SimConfig::default(), std_registry()) {
        Ok(sim) => sim,
        Err(e) => {
            eprintln!("failed to start simulation: {e}");
            return;
        }
    };

    let renderer = SplatRenderer::new(1024, 1024).with_extent(60.0);
    let mut viewer = Viewer::new(sim, renderer);

    let Some(mode) = viewer.load_preset("sphere") else {
        return;
    };
    println!("Loaded sphere preset in {:?} mode", mode);

    if let Err(e) = viewer.run(10, |_| FrameInput::default()) {
        eprintln!("simulation error: {e}");
        return;
    }

    let output_path = "sphere_surface.png";
    match viewer.renderer().export_png(Path::new(output_path)) {
        Ok(()) => println!("Wrote {}", output_path),
        Err(e) => eprintln!("Failed to write PNG: {}", e),
    }
}
