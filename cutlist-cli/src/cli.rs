// cutlist-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Args, Parser, Subcommand};
use cutlist_core::{Resolution, TimelineFps};
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "Cutlist: shot list to editing timeline compiler",
    long_about = "Validates a shot list against a folder of source videos, helps fix rows \
                  that need attention, and writes an xmeml timeline editors can import."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug output on the console
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Optional: Directory for log files; enables file logging
    #[arg(long, global = true, value_name = "LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validates every row of the shot list and rewrites the store
    Scan(ScanArgs),
    /// Re-validates, gaps or copies the media of a single row
    Fix(FixArgs),
    /// Re-validates every row and writes the timeline document
    Generate(GenerateArgs),
}

/// Where the shot list and its media live; shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    /// Shot list CSV (also the store that fixes are written back to)
    #[arg(short = 's', long = "shots", required = true, value_name = "CSV")]
    pub shot_list: PathBuf,

    /// Folder containing the source videos and their _Proxy.mp4 stand-ins.
    /// Can also be set via the CUTLIST_VIDEO_DIR environment variable.
    #[arg(long = "videos", value_name = "DIR", env = "CUTLIST_VIDEO_DIR")]
    pub video_dir: PathBuf,

    /// Optional: ffprobe program to run instead of the one on PATH
    #[arg(long, value_name = "PROGRAM", env = "CUTLIST_FFPROBE")]
    pub ffprobe: Option<String>,
}

#[derive(Args, Debug)]
pub struct ScanArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Timeline frame rate: auto, 24, 25, 29.97, 30, 59.94 or 60
    #[arg(long, value_name = "FPS", default_value = "auto")]
    pub timeline_fps: TimelineFps,

    /// Validate rows in parallel
    #[arg(long, default_value_t = false)]
    pub parallel: bool,

    /// Convert every row that still needs attention to a gap before saving
    #[arg(long, default_value_t = false)]
    pub gap_errors: bool,

    /// Print events and rows as JSON lines instead of the table
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug)]
#[command(group(
    clap::ArgGroup::new("action")
        .required(true)
        .multiple(true)
        .args(["filename", "range", "gap", "copy_from"]),
))]
pub struct FixArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Row to fix, as numbered in the scan table (starting at 1)
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub row: u64,

    /// New file name for the row (keeps the stored one when omitted)
    #[arg(long, value_name = "FILE", conflicts_with_all = ["gap", "copy_from"])]
    pub filename: Option<String>,

    /// New "<in> - <out>" range for the row (keeps the stored one when omitted)
    #[arg(long, value_name = "RANGE", conflicts_with_all = ["gap", "copy_from"])]
    pub range: Option<String>,

    /// Turn the row into a gap of its range's duration
    #[arg(long, default_value_t = false, conflicts_with = "copy_from")]
    pub gap: bool,

    /// Copy this file into the video folder, then re-validate the row
    #[arg(long, value_name = "PATH")]
    pub copy_from: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Optional: Output document (defaults to <shot list stem>_Final.xml)
    #[arg(short = 'o', long = "output", value_name = "XML")]
    pub output: Option<PathBuf>,

    /// Sequence frame size: 1080p, 2k, 4k or WxH
    #[arg(long, value_name = "RES", default_value = "1080p")]
    pub resolution: Resolution,

    /// Timeline frame rate: auto, 24, 25, 29.97, 30, 59.94 or 60
    #[arg(long, value_name = "FPS", default_value = "auto")]
    pub timeline_fps: TimelineFps,

    /// Optional: Sequence name (defaults to <shot list stem>_FinalSequence)
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,

    /// Validate rows in parallel
    #[arg(long, default_value_t = false)]
    pub parallel: bool,

    /// Print events as JSON lines instead of the summary
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

impl Commands {
    /// Name used for the log file of this run.
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Scan(_) => "scan",
            Commands::Fix(_) => "fix",
            Commands::Generate(_) => "generate",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cutlist_core::FrameRate;

    #[test]
    fn test_parse_scan_args() {
        let cli = Cli::parse_from([
            "cutlist",
            "scan",
            "--shots",
            "promo.csv",
            "--videos",
            "footage",
            "--timeline-fps",
            "29.97",
            "--gap-errors",
        ]);

        match cli.command {
            Commands::Scan(args) => {
                assert_eq!(args.project.shot_list, PathBuf::from("promo.csv"));
                assert_eq!(args.project.video_dir, PathBuf::from("footage"));
                assert_eq!(
                    args.timeline_fps,
                    TimelineFps::Fixed(FrameRate::from_fps(29.97).unwrap())
                );
                assert!(args.gap_errors);
                assert!(!args.parallel);
                assert!(!args.json);
            }
            other => panic!("Expected scan command, got {other:?}"),
        }
        assert!(!cli.verbose);
        assert!(cli.log_dir.is_none());
    }

    #[test]
    fn test_parse_generate_defaults() {
        let cli = Cli::parse_from([
            "cutlist",
            "generate",
            "--shots",
            "promo.csv",
            "--videos",
            "footage",
            "--log-dir",
            "logs",
        ]);

        match cli.command {
            Commands::Generate(args) => {
                assert_eq!(args.resolution, Resolution::HD_1080P);
                assert_eq!(args.timeline_fps, TimelineFps::Auto);
                assert!(args.output.is_none());
                assert!(args.name.is_none());
            }
            other => panic!("Expected generate command, got {other:?}"),
        }
        assert_eq!(cli.log_dir, Some(PathBuf::from("logs")));
    }

    #[test]
    fn test_fix_requires_one_action() {
        let missing = Cli::try_parse_from([
            "cutlist", "fix", "--shots", "a.csv", "--videos", "v", "--row", "2",
        ]);
        assert!(missing.is_err());

        let mixed = Cli::try_parse_from([
            "cutlist", "fix", "--shots", "a.csv", "--videos", "v", "--row", "2", "--gap", "--range",
            "00:01 - 00:02",
        ]);
        assert!(mixed.is_err());

        let zero = Cli::try_parse_from([
            "cutlist", "fix", "--shots", "a.csv", "--videos", "v", "--row", "0", "--gap",
        ]);
        assert!(zero.is_err());

        let ok = Cli::try_parse_from([
            "cutlist", "fix", "--shots", "a.csv", "--videos", "v", "--row", "2", "--filename",
            "b.mov", "--range", "00:01 - 00:02",
        ]);
        assert!(ok.is_ok());
    }
}
