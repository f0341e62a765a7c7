//! Command-line interface for iconscan
//!
//! Analyzes one or more icon references and prints the verdicts as JSON

use iconscan::{analyze_icon, AnalyzerConfig, BuildMode, IconColorAnalyzer, SourceResolver};
use std::{env, path::PathBuf, process};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,iconscan=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    let mut app_root = PathBuf::from(".");
    let mut mode = BuildMode::Production;
    let mut config_path = None;
    let mut references = Vec::new();

    // Parse arguments
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--dev" => mode = BuildMode::Development,
            "--root" | "--config" if i + 1 >= args.len() => {
                eprintln!("Error: {} requires a value", args[i]);
                process::exit(1);
            }
            "--root" => {
                app_root = PathBuf::from(&args[i + 1]);
                i += 1;
            }
            "--config" => {
                config_path = Some(PathBuf::from(&args[i + 1]));
                i += 1;
            }
            "--help" | "-h" => {
                print_help(&args[0]);
                process::exit(0);
            }
            arg if !arg.starts_with("--") => references.push(arg.to_string()),
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                eprintln!("Use --help for usage information");
                process::exit(1);
            }
        }
        i += 1;
    }

    if references.is_empty() {
        print_help(&args[0]);
        process::exit(1);
    }

    let config = match config_path {
        Some(path) => match AnalyzerConfig::from_json_file(&path) {
            Ok(config) => config,
            Err(error) => {
                eprintln!("Error: {}", error);
                process::exit(1);
            }
        },
        None => AnalyzerConfig::default(),
    };

    let analyzer = match IconColorAnalyzer::with_config(config) {
        Ok(analyzer) => analyzer,
        Err(error) => {
            eprintln!("Error: {}", error);
            eprintln!("{}", error.user_message());
            process::exit(1);
        }
    };
    let resolver = SourceResolver::new(app_root).with_mode(mode);

    for reference in &references {
        let result = analyze_icon(reference, &resolver, &analyzer);
        match serde_json::to_string(&result) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Error serializing result for {}: {}", reference, e),
        }
    }
}

fn print_help(program_name: &str) {
    eprintln!("Usage: {} [OPTIONS] <reference>...", program_name);
    eprintln!();
    eprintln!("Classify icons as flat single-color and report their main color.");
    eprintln!("A reference is a file path, file: URL, bundled asset path or data: URI.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --root DIR       Application root for relative and asset paths (default: .)");
    eprintln!("  --dev            Resolve ./assets/ against the source tree when not built");
    eprintln!("  --config FILE    Load analyzer thresholds from a JSON file");
    eprintln!("  --help, -h       Show this help message");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} icon.png", program_name);
    eprintln!("  {} --root /opt/launcher ./assets/default.png", program_name);
    eprintln!("  RUST_LOG=iconscan=trace {} file:///tmp/my%20icon.png", program_name);
}
