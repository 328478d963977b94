use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{trigger, url};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "checkhook")]
#[command(version = VERSION)]
#[command(about = "Trigger Concourse resource check webhooks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve inputs, build the webhook URL, and send the check request
    Trigger(trigger::TriggerArgs),
    /// Print the webhook URL without sending anything
    Url(url::UrlArgs),
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let (json_result, exit_code) = commands::run_json(cli.command);

    if output::print_json_result(json_result).is_err() {
        return std::process::ExitCode::from(1);
    }

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
