use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use colored::Colorize;
use log::LevelFilter;
use vrindex::{parse_extension_list, Indexer, ScreenType, Settings, StereoMode};

const CLI_AFTER_HELP: &str = "Examples:\n  vrindex /srv/videos\n  vrindex /srv/videos --base-url https://media.example.com/vr --interval 0\n  vrindex /srv/videos --ext mp4,mkv --min-size 50 --min-duration 120 --verbose\n  vrindex --completions zsh > _vrindex\n\nEvery flag can also be set through its VRINDEX_* environment variable.";

#[derive(Debug, Parser)]
#[command(
    name = "vrindex",
    version,
    about = "Index a VR video library into a DeoVR-compatible JSON manifest",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    /// Root directory of the video library.
    #[arg(env = "VRINDEX_DIR", value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Manifest filename (DeoVR fetches a file literally named "deovr").
    #[arg(long, env = "VRINDEX_OUT", default_value = "deovr", value_name = "NAME")]
    out: String,

    /// Write the manifest into this directory instead of the library root.
    #[arg(long, env = "VRINDEX_OUT_DIR", value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Comma-separated extension allowlist (default: common video formats).
    #[arg(short, long, env = "VRINDEX_EXT", value_name = "LIST")]
    ext: Option<String>,

    /// URL prefix for generated video URLs; omit for relative paths.
    #[arg(long, env = "VRINDEX_BASE_URL", value_name = "URL")]
    base_url: Option<String>,

    /// Thumbnail URL stamped on every scene; omit to leave thumbnails out.
    #[arg(long, env = "VRINDEX_THUMBNAIL_URL", value_name = "URL")]
    thumbnail_url: Option<String>,

    /// Minimum file size in megabytes (0 disables the filter).
    #[arg(long, env = "VRINDEX_MIN_SIZE", default_value_t = 10, value_name = "MB")]
    min_size: u64,

    /// Minimum duration in seconds (0 disables the filter).
    #[arg(long, env = "VRINDEX_MIN_DURATION", default_value_t = 60.0, value_name = "SECONDS")]
    min_duration: f64,

    /// Seconds between rescans; 0 scans once and exits.
    #[arg(
        short = 'l',
        long,
        alias = "loop",
        env = "VRINDEX_INTERVAL",
        default_value_t = 60,
        value_name = "SECONDS"
    )]
    interval: u64,

    /// Stereo layout for every scene (off, sbs, tb, cuv).
    #[arg(long, env = "VRINDEX_STEREO_MODE", default_value = "sbs", value_name = "MODE")]
    stereo_mode: String,

    /// Projection for every scene (flat, dome, sphere, fisheye, rf52, mkx200).
    #[arg(long, env = "VRINDEX_SCREEN_TYPE", default_value = "dome", value_name = "TYPE")]
    screen_type: String,

    /// Show additional logging output.
    #[arg(short, long, env = "VRINDEX_VERBOSE")]
    verbose: bool,

    /// Generate a shell completion script and exit.
    #[arg(long, value_enum, value_name = "SHELL")]
    completions: Option<Shell>,
}

fn parse_stereo_mode(value: &str) -> Option<StereoMode> {
    match value.to_ascii_lowercase().as_str() {
        "off" | "mono" => Some(StereoMode::Monoscopic),
        "sbs" => Some(StereoMode::SideBySide),
        "tb" => Some(StereoMode::TopBottom),
        "cuv" => Some(StereoMode::CustomUv),
        _ => None,
    }
}

fn parse_screen_type(value: &str) -> Option<ScreenType> {
    match value.to_ascii_lowercase().as_str() {
        "flat" => Some(ScreenType::Flat),
        "dome" | "180" => Some(ScreenType::Dome),
        "sphere" | "360" => Some(ScreenType::Sphere),
        "fisheye" => Some(ScreenType::Fisheye),
        "rf52" => Some(ScreenType::Fisheye190),
        "mkx200" => Some(ScreenType::Fisheye200),
        _ => None,
    }
}

fn settings_from(cli: &Cli) -> Result<Settings, Box<dyn std::error::Error>> {
    let dir = cli
        .dir
        .clone()
        .ok_or("no library directory provided (positional argument or VRINDEX_DIR)")?;

    let stereo_mode = parse_stereo_mode(&cli.stereo_mode)
        .ok_or_else(|| format!("unsupported --stereo-mode: {}", cli.stereo_mode))?;
    let screen_type = parse_screen_type(&cli.screen_type)
        .ok_or_else(|| format!("unsupported --screen-type: {}", cli.screen_type))?;

    let mut settings = Settings::new(dir)
        .with_output_name(&cli.out)
        .with_min_size_mb(cli.min_size)
        .with_min_duration_secs(cli.min_duration)
        .with_interval_secs(cli.interval)
        .with_stereo_mode(stereo_mode)
        .with_screen_type(screen_type);

    if let Some(dir) = &cli.out_dir {
        settings = settings.with_output_dir(dir);
    }
    if let Some(ext) = &cli.ext {
        let extensions = parse_extension_list(ext);
        if extensions.is_empty() {
            return Err(format!("--ext contains no usable extensions: {ext}").into());
        }
        settings = settings.with_extensions(extensions);
    }
    if let Some(url) = &cli.base_url {
        settings = settings.with_base_url(url);
    }
    if let Some(url) = &cli.thumbnail_url {
        settings = settings.with_thumbnail_url(url);
    }

    Ok(settings)
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        let mut command = Cli::command();
        clap_complete::generate(shell, &mut command, "vrindex", &mut std::io::stdout());
        return Ok(());
    }

    env_logger::Builder::from_default_env()
        .filter_level(if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .init();

    let settings = settings_from(&cli)?;
    let one_shot = settings.interval_secs == 0;
    let indexer = Indexer::new(settings)?;
    indexer.run()?;

    if one_shot {
        println!(
            "{} {}",
            "success:".green().bold(),
            format!(
                "manifest written to {}",
                indexer.settings().output_path().display()
            )
            .green()
        );
    }
    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("{} {error}", "error:".red().bold());
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_screen_type, parse_stereo_mode};

    #[test]
    fn parse_stereo_mode_aliases() {
        assert!(parse_stereo_mode("sbs").is_some());
        assert!(parse_stereo_mode("OFF").is_some());
        assert!(parse_stereo_mode("mono").is_some());
        assert!(parse_stereo_mode("tb").is_some());
        assert!(parse_stereo_mode("sideways").is_none());
    }

    #[test]
    fn parse_screen_type_aliases() {
        assert!(parse_screen_type("dome").is_some());
        assert!(parse_screen_type("180").is_some());
        assert!(parse_screen_type("SPHERE").is_some());
        assert!(parse_screen_type("mkx200").is_some());
        assert!(parse_screen_type("imax").is_none());
    }
}
