//! Lorenz flow demo.
//!
//! Advects the default particle cloud through the lorenz preset for 600
//! frames and exports the final frame as a PNG.
//!
//! Run with: `cargo run --example lorenz_flow`

use std::path::Path;

use eddy_expr_std::std_registry;
use eddy_sim::{SimConfig, Simulation};
use eddy_viz::{FrameInput, PointRenderer, SplatRenderer, Viewer};

fn main() {
    println!("Simulating lorenz flow...");

    let sim = match Simulation::new(SimConfig::default(), std_registry()) {
        Ok(sim) => sim.with_seed(42),
        Err(e) => {
            eprintln!("failed to start simulation: {e}");
            return;
        }
    };

    let renderer = SplatRenderer::new(1024, 1024).with_extent(40.0);
    let mut viewer = Viewer::new(sim, renderer);

    if let Err(e) = viewer.run(600, |_| FrameInput::default()) {
        eprintln!("simulation error: {e}");
        return;
    }

    let clock = viewer.sim().clock();
    println!(
        "Ran {} frames, t = {:.2}",
        clock.frame, clock.time
    );

    let output_path = "lorenz_flow.png";
    match viewer.renderer().export_png(Path::new(output_path)) {
        Ok(()) => println!("Wrote {}", output_path),
        Err(e) => eprintln!("Failed to write PNG: {}", e),
    }
}
