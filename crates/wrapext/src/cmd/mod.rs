use clap::{Args, Subcommand};
use wrapext_dispatch::DEFAULT_COMPONENT_ID;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod info;
pub mod send;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load the extension in a simulated host and deliver one message.
    Send(SendArgs),
    /// Show SDK version, action table, and wire layout.
    Info(InfoArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Send(args) => send::run(args, format),
        Command::Info(args) => info::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Message identifier to deliver (e.g. "sample").
    pub message_id: String,
    /// Positional parameter as a JSON scalar (null, bool, number, string). Repeatable.
    #[arg(long = "param", short = 'p', value_name = "JSON")]
    pub params: Vec<String>,
    /// Correlation token; -1 sends fire-and-forget.
    #[arg(long, default_value = "-1", allow_negative_numbers = true)]
    pub async_id: f64,
    /// Component identifier registered with the host.
    #[arg(long, env = "WRAPEXT_COMPONENT_ID", default_value = DEFAULT_COMPONENT_ID)]
    pub component_id: String,
    /// Show native dialogs instead of logging notifications.
    #[arg(long)]
    pub dialogs: bool,
}

#[derive(Args, Debug, Default)]
pub struct InfoArgs {}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
