use beholdscan::args::{Args, Mode};
use beholdscan::behold::BeholdAnalyzer;
use beholdscan::voyage::VoyageAnalyzer;
use beholdscan::ScanResult;

use image::DynamicImage;
use serde::Serialize;

fn main() {
    env_logger::init();

    let Some(args) = Args::parse() else {
        return;
    };

    match args.mode {
        Mode::Train => {
            let mut analyzer = BeholdAnalyzer::new(&args.base_path);
            match analyzer.reinitialize(args.force_train) {
                Ok(()) => println!("✅ Symbol catalog rebuilt"),
                Err(e) => eprintln!("❌ Training failed: {e}"),
            }
        }
        Mode::Behold => run_behold(&args),
        Mode::Voyage => run_voyage(&args),
    }
}

fn run_behold(args: &Args) {
    let Some(input) = &args.input else {
        eprintln!("❌ Missing screenshot path or URL");
        return;
    };
    let mut analyzer = BeholdAnalyzer::new(&args.base_path);
    if let Err(e) = analyzer.reinitialize(args.force_train) {
        eprintln!("❌ Initialization failed: {e}");
        return;
    }
    let result = if is_url(input) {
        analyzer.analyze_url(input)
    } else {
        match load_local(input) {
            Ok((image, file_size)) => analyzer.analyze(&image, file_size),
            Err(e) => {
                eprintln!("❌ {e}");
                return;
            }
        }
    };
    print_json(&result);
}

fn run_voyage(args: &Args) {
    let Some(input) = &args.input else {
        eprintln!("❌ Missing screenshot path or URL");
        return;
    };
    let mut analyzer = VoyageAnalyzer::new(&args.base_path);
    if let Err(e) = analyzer.reinitialize() {
        eprintln!("❌ Initialization failed: {e}");
        return;
    }
    let result = if is_url(input) {
        analyzer.analyze_url(input)
    } else {
        match load_local(input) {
            Ok((image, file_size)) => analyzer.analyze(&image, file_size),
            Err(e) => {
                eprintln!("❌ {e}");
                return;
            }
        }
    };
    print_json(&result);
}

fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

fn load_local(path: &str) -> ScanResult<(DynamicImage, u64)> {
    let bytes = std::fs::read(path)?;
    let image = image::load_from_memory(&bytes)?;
    Ok((image, bytes.len() as u64))
}

fn print_json<T: Serialize>(result: &T) {
    match serde_json::to_string_pretty(result) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("❌ Could not serialize result: {e}"),
    }
}
