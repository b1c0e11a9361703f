use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Behold,
    Voyage,
    Train,
}

#[derive(Debug)]
pub struct Args {
    pub mode: Mode,
    /// Local path or URL of the screenshot to analyze.
    pub input: Option<String>,
    /// Asset base directory holding `data/` and `train/`.
    pub base_path: String,
    /// Retrain descriptor caches even when records already exist.
    pub force_train: bool,
}

impl Args {
    pub fn parse() -> Option<Self> {
        let args: Vec<String> = env::args().collect();

        let mut mode: Option<Mode> = None;
        let mut input: Option<String> = None;
        let mut base_path = ".".to_string();
        let mut force_train = false;

        for arg in args.iter().skip(1) {
            if arg == "--help" || arg == "-h" {
                print_help();
                return None;
            } else if arg == "--version" || arg == "-v" {
                println!("beholdscan v{}", env!("APP_VERSION_DISPLAY"));
                return None;
            } else if arg == "--behold" || arg == "-b" {
                mode = Some(Mode::Behold);
            } else if arg == "--voyage" {
                mode = Some(Mode::Voyage);
            } else if arg == "--train" {
                mode = Some(Mode::Train);
            } else if arg == "--force" {
                force_train = true;
            } else if let Some(path) = arg.strip_prefix("--base=") {
                base_path = path.to_string();
            } else if !arg.starts_with('-') {
                input = Some(arg.clone());
            } else {
                eprintln!("❌ Unknown argument: {}", arg);
                print_help();
                return None;
            }
        }

        let Some(mode) = mode else {
            print_help();
            return None;
        };

        Some(Args {
            mode,
            input,
            base_path,
            force_train,
        })
    }
}

fn print_help() {
    println!("🔭 Behold / Voyage Screenshot Scanner");
    println!();
    println!("USAGE:");
    println!("    beholdscan [FLAGS] <IMAGE PATH OR URL>");
    println!();
    println!("FLAGS:");
    println!("    --behold, -b        Analyze a behold (reward reveal) screenshot");
    println!("    --voyage            Analyze a voyage status screenshot");
    println!("    --train             Rebuild the symbol catalog, then exit");
    println!("    --base=PATH         Asset base directory (default: current directory)");
    println!("    --force             Retrain cached descriptors from scratch");
    println!("    --help, -h          Show this help message");
    println!("    --version, -v       Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    beholdscan --train --base=/var/lib/beholdscan");
    println!("    beholdscan --behold screenshot.png");
    println!("    beholdscan --voyage https://example.com/voyage.png");
}
