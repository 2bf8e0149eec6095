//! The command line front end: filters in, paired devices out.

use anyhow::{Context, Result};
use clap::Parser;
use regex::Regex;
use std::path::PathBuf;
use v4l2_pair::video_devices::{
    BufType,
    FourCc,
    MediaDeviceResolver,
    VideoDevice,
    VideoDeviceProber
};

/// Find a V4L2 video device and the media controller that owns it
#[derive(Parser)]
#[command(name = "v4l2-pair")]
#[command(version)]
struct Cli {
    /// Directory holding the video* and media* device nodes
    #[arg(long, default_value = "/dev")]
    dev_dir: PathBuf,

    /// Sysfs mount, used to name the video interfaces of the media device
    #[arg(long, default_value = "/sys")]
    sys_dir: PathBuf,

    /// Only accept devices whose driver name matches this regex
    #[arg(long)]
    driver: Option<Regex>,

    /// Only accept devices whose card name matches this regex
    #[arg(long)]
    card: Option<Regex>,

    /// Only accept video capture devices
    #[arg(long, conflicts_with = "m2m")]
    capture: bool,

    /// Only accept memory-to-memory devices (codecs, scalers)
    #[arg(long)]
    m2m: bool,

    /// Only accept devices offering this pixel format, e.g. NV12 or H264
    #[arg(long)]
    format: Option<FourCc>,

    /// Enable verbose logging (use RUST_LOG=debug for more)
    #[arg(short, long)]
    verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let prober = VideoDeviceProber::new(&cli.dev_dir);
    let video = prober.probe(|device| accepts(&cli, device))
        .context("no video device matched the filters")?;

    let resolver = MediaDeviceResolver::new(&cli.dev_dir);
    let media = resolver.resolve(&video)
        .with_context(|| format!("no media device owns {}", video.path().display()))?;

    let cap = video.capability();
    println!("video: {}", video.path().display());
    println!("  driver: {}", cap.driver);
    println!("  card: {}", cap.card);
    println!("  bus info: {}", cap.bus_info);
    println!("  device number: {}", resolver.device_number(&video)?);
    if let Some(fourcc) = cli.format {
        for buf_type in BufType::ALL {
            for fmt in video.formats(buf_type)?.iter().filter(|fmt| fmt.fourcc == fourcc) {
                println!("  {:?}: {} ({})", buf_type, fmt.fourcc, fmt.description);
            }
        }
    }

    let info = media.info();
    println!("media: {}", media.path().display());
    println!("  driver: {}", info.driver);
    println!("  model: {}", info.model);
    println!("  bus info: {}", info.bus_info);
    let (major, minor, patch) = info.media_version();
    println!("  media version: {major}.{minor}.{patch}");
    for intf in resolver.video_interfaces(&media)? {
        let devnum = intf.devnode();
        let node = devnum.devnode_path(&cli.sys_dir, &cli.dev_dir)
            .map(|path| path.display().to_string())
            .unwrap_or_else(|err| {
                log::debug!("{err}");
                String::from("?")
            });
        println!("  video interface {}: {} ({})", intf.id(), devnum, node);
    }
    Ok(())
}

/// The acceptance predicate built from the command line filters.
fn accepts(cli: &Cli, device: &VideoDevice) -> bool {
    let cap = device.capability();
    if cli.capture && !cap.is_capture() {
        return false;
    }
    if cli.m2m && !cap.is_m2m() {
        return false;
    }
    if cli.driver.as_ref().is_some_and(|re| !re.is_match(&cap.driver)) {
        return false;
    }
    if cli.card.as_ref().is_some_and(|re| !re.is_match(&cap.card)) {
        return false;
    }
    match cli.format {
        Some(fourcc) => device.supports_format(fourcc).unwrap_or_else(|err| {
            log::warn!("{err}");
            false
        }),
        None => true
    }
}

/// Initialize env_logger based on verbosity flags
fn init_logging(verbose: bool, quiet: bool) {
    let env = env_logger::Env::default();

    let env = if quiet {
        env.default_filter_or("error")
    } else if verbose {
        env.default_filter_or("debug")
    } else {
        env.default_filter_or("warn")
    };

    env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_target(false)
        .init();

    log::debug!("Logging initialized");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_parse_from_the_command_line() {
        let cli = Cli::try_parse_from([
            "v4l2-pair", "--m2m", "--driver", "^hantro", "--format", "H264", "--dev-dir", "/tmp/dev"
        ]).unwrap();
        assert!(cli.m2m);
        assert!(!cli.capture);
        assert!(cli.driver.unwrap().is_match("hantro-vpu"));
        assert_eq!(cli.format, Some(FourCc::new(b"H264")));
        assert_eq!(cli.dev_dir, PathBuf::from("/tmp/dev"));
        assert_eq!(cli.sys_dir, PathBuf::from("/sys"));
    }

    #[test]
    fn capture_and_m2m_are_exclusive() {
        assert!(Cli::try_parse_from(["v4l2-pair", "--capture", "--m2m"]).is_err());
    }

    #[test]
    fn bad_regex_and_fourcc_are_rejected() {
        assert!(Cli::try_parse_from(["v4l2-pair", "--card", "("]).is_err());
        assert!(Cli::try_parse_from(["v4l2-pair", "--format", "TOOLONG"]).is_err());
    }
}
