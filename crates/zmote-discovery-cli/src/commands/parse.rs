//! Parse command implementation.

use tokio::io::AsyncReadExt;
use zmote_discovery_core::protocol::parse_beacon;

use crate::cli::ParseArgs;
use crate::error::CliError;
use crate::output::get_formatter;

/// Run the beacon parser over the given text or stdin
pub async fn run_parse(args: ParseArgs, json: bool) -> Result<(), CliError> {
    let formatter = get_formatter(json);

    let text = match args.text {
        Some(text) => text,
        None => {
            let mut buf = String::new();
            tokio::io::stdin().read_to_string(&mut buf).await?;
            buf
        }
    };

    match parse_beacon(text.as_bytes()) {
        Ok(Some(zmote)) => {
            println!("{}", formatter.format_zmote(&zmote));
            Ok(())
        }
        Ok(None) => {
            println!("{}", formatter.format_not_a_beacon());
            Err(CliError::InvalidArgument("input is not a discovery response".to_string()))
        }
        Err(e) => {
            println!("{}", formatter.format_parse_error(&e));
            Err(e.into())
        }
    }
}
