use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use smsnet::config::{ClientConfig, DEFAULT_CONFIG_FILE};
use smsnet::console::render_response;
use smsnet::logging::{Level, set_up_logging};
use smsnet::net::client::Client;
use smsnet::sms::SmsMessage;

/// CLI for sending SMS
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Sender phone number
    #[clap(long)]
    sender: String,

    /// Recipient phone number
    #[clap(long)]
    recipient: String,

    /// SMS message text
    #[clap(long)]
    message: String,

    #[clap(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Overrides the level from the config file
    #[clap(long)]
    log_level: Option<Level>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error);
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = ClientConfig::from_file(&args.config)?;
    set_up_logging(
        args.log_level.unwrap_or(config.log_level),
        config.log_file.as_deref(),
    )?;

    let message = SmsMessage::new(&args.sender, &args.recipient, &args.message)?;
    let client = Client::new(config);
    let response = async_std::task::block_on(client.send_sms(&message))?;

    print!("{}", render_response("SMS Response", &response));
    Ok(())
}
