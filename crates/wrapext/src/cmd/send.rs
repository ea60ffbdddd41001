use tracing::info;
use wrapext_dispatch::{AsyncId, ExtensionConfig, ExtensionParameter};

use crate::cmd::SendArgs;
use crate::exit::{json_error, param_error, CliResult, SUCCESS};
use crate::output::{print_transcript, OutputFormat};
use crate::sim::HostSession;

pub fn run(args: SendArgs, format: OutputFormat) -> CliResult<i32> {
    let params = parse_params(&args.params)?;
    let async_id = AsyncId::new(args.async_id);
    let config = ExtensionConfig::default()
        .with_component_id(args.component_id.as_str())
        .with_native_dialogs(args.dialogs);

    let session = HostSession::start(config)?;
    info!(message_id = %args.message_id, params = params.len(), async_id = args.async_id, "delivering message");
    session.deliver(&args.message_id, &params, async_id)?;
    let transcript = session.finish();

    print_transcript(&args.message_id, args.async_id, &transcript, format);
    Ok(SUCCESS)
}

fn parse_params(raw: &[String]) -> CliResult<Vec<ExtensionParameter>> {
    raw.iter()
        .enumerate()
        .map(|(index, text)| {
            let value: serde_json::Value = serde_json::from_str(text)
                .map_err(|err| json_error(&format!("--param #{} is not valid JSON", index + 1), err))?;
            ExtensionParameter::try_from(value)
                .map_err(|err| param_error(&format!("--param #{}", index + 1), err))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exit::DATA_INVALID;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn parses_scalar_params_in_order() {
        let params = parse_params(&strings(&["true", "2.5", "\"hi\"", "null"])).unwrap();
        assert_eq!(
            params,
            vec![
                ExtensionParameter::Boolean(true),
                ExtensionParameter::Number(2.5),
                ExtensionParameter::from("hi"),
                ExtensionParameter::Null,
            ]
        );
    }

    #[test]
    fn rejects_invalid_json() {
        let err = parse_params(&strings(&["{not json"])).unwrap_err();
        assert_eq!(err.code, DATA_INVALID);
    }

    #[test]
    fn rejects_non_scalar_json() {
        let err = parse_params(&strings(&["1", "[1, 2]"])).unwrap_err();
        assert_eq!(err.code, DATA_INVALID);
        assert!(err.message.contains("#2"));
    }
}
