mod cmd;
mod exit;
mod logging;
mod output;
mod sim;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "wrapext", version, about = "Host wrapper extension developer CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_send_subcommand() {
        let cli = Cli::try_parse_from([
            "wrapext",
            "send",
            "sample",
            "--param",
            "true",
            "-p",
            "\"text\"",
            "--async-id",
            "4",
        ])
        .expect("send args should parse");

        match cli.command {
            Command::Send(args) => {
                assert_eq!(args.message_id, "sample");
                assert_eq!(args.params, vec!["true".to_string(), "\"text\"".to_string()]);
                assert_eq!(args.async_id, 4.0);
                assert!(!args.dialogs);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn send_defaults_to_fire_and_forget() {
        let cli = Cli::try_parse_from(["wrapext", "send", "sample"]).expect("send should parse");
        match cli.command {
            Command::Send(args) => assert_eq!(args.async_id, -1.0),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn accepts_negative_async_id() {
        let cli = Cli::try_parse_from(["wrapext", "send", "sample", "--async-id", "-1"])
            .expect("negative async id should parse");
        assert!(matches!(cli.command, Command::Send(_)));
    }

    #[test]
    fn send_requires_message_id() {
        let err = Cli::try_parse_from(["wrapext", "send"]).expect_err("missing id should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn parses_info_subcommand() {
        let cli = Cli::try_parse_from(["wrapext", "--format", "json", "info"])
            .expect("info args should parse");
        assert!(matches!(cli.command, Command::Info(_)));
        assert!(matches!(cli.format, Some(OutputFormat::Json)));
    }
}
