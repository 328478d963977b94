use clap::Args;
use serde::Serialize;

use checkhook::webhook;

use super::{CmdResult, InputOverrides};

#[derive(Args)]
pub struct UrlArgs {
    #[command(flatten)]
    pub inputs: InputOverrides,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlOutput {
    /// Unauthenticated webhook URL; the token is not part of it.
    pub url: String,
}

pub fn run(args: UrlArgs) -> CmdResult<UrlOutput> {
    let inputs = super::resolve_inputs(&args.inputs)?;
    let url = webhook::build_webhook_url(&inputs)?;

    Ok((
        UrlOutput {
            url: url.to_string(),
        },
        0,
    ))
}
