use clap::Parser;
use spritestrip::passes::{self, Pass, PassError};
use spritestrip::{config, output};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "spritestrip")]
#[command(about = "Batch image prep for sprite-strip composites")]
#[command(long_about = "\
Batch image prep for sprite-strip composites

Processes every PNG/JPEG in FOLDER (sorted by file name) with one pass:

  Pass 1: Remove the background color (taken from the top left pixel) from
          all images in FOLDER and write PNGs to the OUTPUT folder
  Pass 2: Trim transparent area on the edges of all images in FOLDER and
          write PNGs to the OUTPUT folder
  Pass 3: Assemble images in FOLDER into a single OUTPUT file (a PNG with
          transparent background), each image overlapping the previous one

A config.toml in FOLDER tunes the passes. Run 'spritestrip --gen-config' to
print a documented one.")]
#[command(version)]
struct Cli {
    /// Folder containing the input images
    #[arg(required_unless_present = "gen_config")]
    folder: Option<PathBuf>,

    /// Output folder (passes 1, 2) or output file (pass 3)
    #[arg(required_unless_present = "gen_config")]
    output: Option<PathBuf>,

    /// Select which pass to run: 1, 2 or 3
    #[arg(short, long)]
    pass: Option<String>,

    /// Print a stock config.toml with all options documented
    #[arg(long)]
    gen_config: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    if cli.gen_config {
        print!("{}", config::stock_config_toml());
        return ExitCode::SUCCESS;
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> Result<(), PassError> {
    let pass: Pass = cli.pass.as_deref().unwrap_or("none").parse()?;
    // clap guarantees both are present unless --gen-config was given
    let folder = cli.folder.unwrap_or_default();
    let output_path = cli.output.unwrap_or_default();

    let tool_config = config::load_config(&folder)?;
    init_thread_pool(&tool_config.processing);

    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_pass_event(&event) {
                println!("{}", line);
            }
        }
    });
    let result = passes::run(pass, &folder, &output_path, &tool_config, Some(tx));
    printer.join().ok();

    output::print_summary(&result?);
    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores — user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
