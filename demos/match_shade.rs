//! Command-line interface for shade_match
//!
//! Matches a hex color or a photo against a JSON shade catalog

use shade_match::image_loader::{load_image, ImageFormat};
use shade_match::{
    EngineConfig, EngineError, MatchResult, MatchingEngine, ShadeCatalog, UndertoneCategory,
};
use std::{env, path::Path, process};

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut limit = None;
    let mut hint = None;
    let mut config_path = None;
    let mut json_output = false;
    let mut positional = Vec::new();

    // Parse arguments
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--limit" | "-n" => {
                i += 1;
                limit = match args.get(i).and_then(|v| v.parse::<usize>().ok()) {
                    Some(n) => Some(n),
                    None => fail("--limit needs a number"),
                };
            }
            "--undertone" => {
                i += 1;
                hint = match args.get(i).map(|v| v.to_lowercase()).as_deref() {
                    Some("warm") => Some(UndertoneCategory::Warm),
                    Some("cool") => Some(UndertoneCategory::Cool),
                    Some("neutral") => Some(UndertoneCategory::Neutral),
                    Some("olive") => Some(UndertoneCategory::Olive),
                    _ => fail("--undertone must be warm, cool, neutral or olive"),
                };
            }
            "--config" => {
                i += 1;
                config_path = args.get(i).cloned();
            }
            "--json" => json_output = true,
            "--help" | "-h" => {
                print_help(&args[0]);
                process::exit(0);
            }
            arg if !arg.starts_with("--") => positional.push(arg.to_string()),
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                eprintln!("Use --help for usage information");
                process::exit(1);
            }
        }
        i += 1;
    }

    let (catalog_path, target) = match positional.as_slice() {
        [catalog, target] => (catalog.clone(), target.clone()),
        _ => {
            print_help(&args[0]);
            process::exit(1);
        }
    };

    let config_path = config_path.as_deref();
    if let Err(error) = run(&catalog_path, &target, config_path, limit, hint, json_output) {
        eprintln!("Matching failed: {}", error);
        if error.is_recoverable() {
            eprintln!("Suggestion: {}", error.user_message());
        }
        process::exit(1);
    }
}

fn run(
    catalog_path: &str,
    target: &str,
    config_path: Option<&str>,
    limit: Option<usize>,
    hint: Option<UndertoneCategory>,
    json_output: bool,
) -> Result<(), EngineError> {
    let config = match config_path {
        Some(path) => EngineConfig::from_json_file(Path::new(path))?,
        None => EngineConfig::default(),
    };
    let catalog = ShadeCatalog::from_json_file(Path::new(catalog_path))?;
    if catalog.rejected() > 0 {
        eprintln!("Warning: skipped {} invalid catalog records", catalog.rejected());
    }
    let engine = MatchingEngine::new(catalog, config)?;

    let target_path = Path::new(target);
    if ImageFormat::from_extension(target_path).is_some() {
        let frame = load_image(target_path)?;
        let recommendation = engine.recommend_with_hint(&frame, limit, hint)?;
        if json_output {
            print_json(&recommendation);
        } else {
            let dominant = &recommendation.analysis.dominant;
            println!("Skin tone:");
            println!("  Hex:        {}", dominant.hex);
            let lab = &dominant.lab;
            println!("  Lab:        L={:.2}, a={:.2}, b={:.2}", lab.l(), lab.a(), lab.b());
            println!("  Depth:      {} (level {})", dominant.depth.label(), dominant.depth_level);
            let undertone = &dominant.undertone;
            println!("  Undertone:  {} ({})", undertone.category, undertone.descriptor);
            println!("  Confidence: {:.1}%", dominant.confidence * 100.0);
            if let Some(secondary) = &recommendation.analysis.secondary {
                println!("  Secondary:  {}", secondary.hex);
            }
            println!();
            print_matches(&recommendation.matches);
        }
    } else {
        let matches = engine.match_hex(target, limit, hint)?;
        if json_output {
            print_json(&matches);
        } else {
            print_matches(&matches);
        }
    }
    Ok(())
}

fn print_matches(matches: &[MatchResult<'_>]) {
    if matches.is_empty() {
        println!("No matches (empty catalog)");
        return;
    }
    println!("Matches:");
    for (rank, m) in matches.iter().enumerate() {
        println!(
            "  {}. {} {} {} {}  ΔE {:.2}  {:.0}%{}",
            rank + 1,
            m.shade.brand(),
            m.shade.product_name(),
            m.shade.shade_name(),
            m.shade.hex(),
            m.delta_e,
            m.match_percentage,
            if m.undertone_compatible { "" } else { "  (undertone mismatch)" }
        );
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => fail(&format!("Failed to serialize output: {}", e)),
    }
}

fn fail(message: &str) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

fn print_help(program_name: &str) {
    eprintln!("Usage: {} [OPTIONS] <catalog.json> <#RRGGBB | image_path>", program_name);
    eprintln!();
    eprintln!("Match a skin tone color or a photo against a foundation shade catalog.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --limit, -n N       Number of matches to return (default: 5)");
    eprintln!("  --undertone NAME    Undertone hint: warm, cool, neutral, olive");
    eprintln!("                      (images default to the detected undertone)");
    eprintln!("  --config FILE       Engine configuration JSON");
    eprintln!("  --json              Print results as JSON");
    eprintln!("  --help, -h          Show this help message");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} catalog.json '#D4A574'", program_name);
    eprintln!("  {} --undertone warm -n 3 catalog.json D4A574", program_name);
    eprintln!("  {} --json catalog.json selfie.jpg", program_name);
}
