use clap::Args;
use serde::Serialize;

use checkhook::webhook;

use super::{CmdResult, InputOverrides};

#[derive(Args)]
pub struct TriggerArgs {
    #[command(flatten)]
    pub inputs: InputOverrides,

    /// Build and report the webhook URL without sending the request
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerOutput {
    /// Redacted form of the POST target; the token is masked, never raw.
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub delivered: bool,
}

pub fn run(args: TriggerArgs) -> CmdResult<TriggerOutput> {
    let inputs = super::resolve_inputs(&args.inputs)?;
    let url = webhook::build_webhook_url(&inputs)?;
    let display = webhook::redacted_url(&url, &inputs.webhook_token);

    if args.dry_run {
        return Ok((
            TriggerOutput {
                url: display.to_string(),
                status: None,
                delivered: false,
            },
            0,
        ));
    }

    let status = webhook::trigger(&url, &inputs.webhook_token)?;

    Ok((
        TriggerOutput {
            url: display.to_string(),
            status: Some(status),
            delivered: true,
        },
        0,
    ))
}
