use crate::export::ExportFormat;
use clap::{Parser, Subcommand, ValueEnum};

/// Command-line interface definition for rsensorlog
#[derive(Parser)]
#[command(
    name = "rsensorlog",
    version = env!("CARGO_PKG_VERSION"),
    about = "Label wearable recordings with activity segments and track file sync",
    long_about = None
)]
pub struct Cli {
    /// Override the data directory (raw files, sidecars, session checkpoint)
    #[arg(global = true, long = "dir")]
    pub dir: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the configuration and data directory
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Start a recording session (restarts it if one is running)
    Start,

    /// Start or stop an activity label in the running session
    Toggle {
        /// Activity label, e.g. "Walking"
        label: String,

        /// Raw data file the segments belong to (default: newest raw file)
        #[arg(long = "file", conflicts_with = "no_file")]
        file: Option<String>,

        /// Only log the event, do not write segments
        #[arg(long = "no-file")]
        no_file: bool,
    },

    /// Stop the running session, closing every open activity
    Stop {
        /// Raw data file the segments belong to (default: newest raw file)
        #[arg(long = "file", conflicts_with = "no_file")]
        file: Option<String>,

        /// Do not write segments
        #[arg(long = "no-file")]
        no_file: bool,
    },

    /// Show the running session
    Status,

    /// Inspect or edit the segments of a raw data file
    Segments {
        #[command(subcommand)]
        action: SegmentAction,
    },

    /// Export segments
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        /// Output file path
        #[arg(long, value_name = "FILE")]
        file: String,

        /// Export only this raw file's segments (default: every sidecar)
        #[arg(long, value_name = "RAW_FILE")]
        source: Option<String>,

        /// Overwrite output file without confirmation
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// List raw files with their sync state
    Files {
        /// JSON manifest with the files the device still holds
        #[arg(long, value_name = "MANIFEST")]
        manifest: Option<String>,

        /// Request these pending files from the device before listing
        #[arg(long = "request", value_name = "NAME")]
        request: Vec<String>,
    },

    /// Send a command to the device
    Device {
        /// JSON manifest describing the device link
        #[arg(long, value_name = "MANIFEST")]
        manifest: String,

        #[arg(value_enum)]
        action: DeviceAction,
    },

    /// Delete local raw files and their sidecars
    Cleanup {
        /// Raw files to delete
        #[arg(long = "file", value_name = "NAME", conflicts_with = "all")]
        files: Vec<String>,

        /// Delete every synced raw file
        #[arg(long)]
        all: bool,

        /// Do not ask for confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum SegmentAction {
    /// List segments, optionally filtered by tag or time range
    List {
        /// Raw data file name
        file: String,

        #[arg(long, help = "Only segments carrying this tag (case-sensitive)")]
        tag: Option<String>,

        #[arg(long, help = "Only segments overlapping START:END (seconds)")]
        range: Option<String>,

        #[arg(long, help = "Show labelled time per tag")]
        totals: bool,
    },

    /// Add a segment by hand
    Add {
        file: String,

        #[arg(long)]
        start: String,

        #[arg(long)]
        end: String,

        #[arg(long = "tag", required = true)]
        tags: Vec<String>,
    },

    /// Update start, end or tags of a segment
    Update {
        file: String,

        #[arg(long)]
        id: String,

        #[arg(long)]
        start: Option<String>,

        #[arg(long)]
        end: Option<String>,

        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// Delete one segment
    Delete {
        file: String,

        #[arg(long)]
        id: String,
    },

    /// Delete the whole sidecar of a raw file
    Clear { file: String },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum DeviceAction {
    /// Ask the device to send every pending file
    Sync,
    /// Ask the device to refresh its pending file list
    Metadata,
    /// Delete files on the device that are already synced
    DeleteSynced,
    /// Delete every file on the device
    DeleteAll,
    /// Turn data collection on
    CollectOn,
    /// Turn data collection off
    CollectOff,
}
