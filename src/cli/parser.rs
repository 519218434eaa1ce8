use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for zkexport
/// Pull attendance from a biometric terminal, export it and keep an audit history
#[derive(Parser)]
#[command(
    name = "zkexport",
    version = env!("CARGO_PKG_VERSION"),
    about = "Export attendance from biometric terminals to Excel/CSV/JSON with an SQLite audit history",
    long_about = None
)]
pub struct Cli {
    /// Override audit database path (useful for tests or a shared DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Use a configuration file other than ~/.zkexport/zkexport.conf
    #[arg(global = true, long = "config", value_name = "PATH")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the configuration file and the audit database
    Init,

    /// Manage the configuration file
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(long = "editor", help = "Editor to use with --edit")]
        editor: Option<String>,

        #[arg(
            long = "use",
            value_name = "INDEX",
            help = "Select the active device by its index in `devices`"
        )]
        use_device: Option<usize>,
    },

    /// Talk to the active device
    Device {
        #[command(subcommand)]
        action: DeviceAction,
    },

    /// Pull attendance from the active device and write it to a file
    Export {
        #[arg(long = "from", value_name = "DATETIME", help = "Range start (YYYY-MM-DD[ HH:MM[:SS]])")]
        from: Option<String>,

        #[arg(long = "to", value_name = "DATETIME", help = "Range end; a bare date means end of day")]
        to: Option<String>,

        #[arg(long = "name", help = "Keep only users whose name contains this text")]
        name: Option<String>,

        #[arg(long = "format", value_enum, help = "Override the configured file format")]
        format: Option<ExportFormat>,

        #[arg(long = "raw", help = "Export raw punches (id, timestamp, punch) without user names")]
        raw: bool,

        #[arg(long = "no-details", help = "Log the export but do not store its records")]
        no_details: bool,
    },

    /// Browse, re-export or delete past exports
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },
}

#[derive(Subcommand)]
pub enum DeviceAction {
    /// Connect and report the device state
    Status,

    /// List the users enrolled on the device
    Users {
        #[arg(long = "export", help = "Also write the users (id, name) to a file")]
        export: bool,

        #[arg(long = "format", value_enum, help = "Override the configured file format")]
        format: Option<ExportFormat>,
    },
}

#[derive(Subcommand)]
pub enum HistoryAction {
    /// List past exports, newest first
    List,

    /// Show the records stored for one export
    Show {
        id: i64,

        #[arg(long = "name", help = "Keep only users whose name contains this text")]
        name: Option<String>,
    },

    /// Delete one export and its stored records
    Delete {
        id: i64,

        #[arg(long, short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },

    /// Write the stored records of one export to a new file
    Export {
        id: i64,

        #[arg(long = "format", value_enum, help = "Override the configured file format")]
        format: Option<ExportFormat>,
    },
}
