use anyhow::Result;
use clap::{Parser, Subcommand};
use showtracker_assets::{
    background::{self, BackgroundConfig, DEFAULT_FONT},
    icon::{self, IconConfig},
    report::Reporter,
    BACKGROUND_FILENAME, ICNS_FILENAME, ICON_DIR,
};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[clap(
    name = "asset-gen",
    about = "Generate the ShowTracker app icon set and DMG installer background"
)]
struct Args {
    #[clap(subcommand)]
    command: Option<Command>,

    /// Build directory that receives the generated assets.
    #[clap(short, long, value_name = "DIR", default_value = "build", global = true)]
    output: PathBuf,

    /// Preferred TrueType font for the installer hint. Falls back to a built-in bitmap font.
    #[clap(long, value_name = "PATH", default_value = DEFAULT_FONT, global = true)]
    font: PathBuf,

    /// Also pack the icon sizes into icon.icns in the build directory
    #[clap(long, global = true)]
    icns: bool,

    /// Suppress progress output
    #[clap(short, long, global = true)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, Subcommand)]
enum Command {
    /// Generate only the DMG installer background
    Background,
    /// Generate only the app icon set
    Icon,
    /// Generate both (the default)
    All,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let reporter = Reporter::new(args.quiet);
    let command = args.command.unwrap_or(Command::All);

    if matches!(command, Command::Background | Command::All) {
        let cfg = BackgroundConfig {
            font_path: args.font.clone(),
            ..BackgroundConfig::default()
        };
        background::generate_background(&args.output.join(BACKGROUND_FILENAME), &cfg, &reporter)?;
    }

    if matches!(command, Command::Icon | Command::All) {
        let icns_path = args.icns.then(|| args.output.join(ICNS_FILENAME));
        icon::generate_icon(
            &args.output.join(ICON_DIR),
            &IconConfig::default(),
            icns_path.as_deref(),
            &reporter,
        )?;
    }

    Ok(())
}
