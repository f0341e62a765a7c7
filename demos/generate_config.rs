//! Generate the default analyzer configuration file
//!
//! Creates a JSON config with all default thresholds

use iconscan::AnalyzerConfig;
use std::{env, path::Path, process};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <output_config.json>", args[0]);
        eprintln!();
        eprintln!("Example:");
        eprintln!("  {} config/iconscan.json", args[0]);
        process::exit(1);
    }

    let output_path = Path::new(&args[1]);

    // Create parent directory if needed
    if let Some(parent) = output_path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            eprintln!("Error creating directory: {}", e);
            process::exit(1);
        }
    }

    let config = AnalyzerConfig::default();

    match config.to_json_file(output_path) {
        Ok(_) => {
            eprintln!("Configuration saved to {}", output_path.display());
            eprintln!();
            eprintln!("Config summary:");
            eprintln!("  Sample: {}x{}", config.sample_width, config.sample_height);
            eprintln!("  Opaque: alpha > {}", config.alpha_threshold);
            eprintln!("  Similar: RGB distance < {:.0}", config.color_distance_threshold);
            eprintln!("  Flat icon: similarity > {:.0}%, transparency > {:.0}%",
                     config.similarity_threshold * 100.0,
                     config.transparency_threshold * 100.0);
            eprintln!("  Dark: luminance < {:.2}", config.dark_luminance_threshold);
        }
        Err(e) => {
            eprintln!("Error saving config: {}", e);
            process::exit(1);
        }
    }
}
