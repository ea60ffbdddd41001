use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use wrapext_dispatch::{ParamMap, Reply};

use crate::sim::Transcript;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct SessionOutput<'a> {
    message_id: &'a str,
    async_id: f64,
    sdk_version: Option<i32>,
    component_id: Option<&'a str>,
    replies: &'a [Reply],
}

pub fn print_transcript(
    message_id: &str,
    async_id: f64,
    transcript: &Transcript,
    format: OutputFormat,
) {
    match format {
        OutputFormat::Json => {
            let out = SessionOutput {
                message_id,
                async_id,
                sdk_version: transcript.sdk_versions.last().copied(),
                component_id: transcript.component_ids.last().map(String::as_str),
                replies: &transcript.messages,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["ID", "ASYNC ID", "PARAMS"]);
            for reply in &transcript.messages {
                table.add_row(vec![
                    display_id(&reply.id).to_string(),
                    reply.async_id.value().to_string(),
                    params_preview(&reply.params),
                ]);
            }
            print_registration(transcript);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            print_registration(transcript);
            if transcript.messages.is_empty() {
                println!("no messages sent for {message_id:?}");
            }
            for reply in &transcript.messages {
                println!(
                    "id={} async_id={} params={}",
                    display_id(&reply.id),
                    reply.async_id.value(),
                    params_preview(&reply.params)
                );
            }
        }
    }
}

fn print_registration(transcript: &Transcript) {
    let sdk = transcript
        .sdk_versions
        .last()
        .map(ToString::to_string)
        .unwrap_or_else(|| "unset".to_string());
    let component = transcript
        .component_ids
        .last()
        .map(String::as_str)
        .unwrap_or("unset");
    println!("sdk_version={sdk} component_id={component}");
}

fn display_id(id: &str) -> &str {
    if id.is_empty() {
        "<reply>"
    } else {
        id
    }
}

pub fn params_preview(params: &ParamMap) -> String {
    params
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use wrapext_dispatch::ExtensionParameter;

    #[test]
    fn preview_lists_params_in_name_order() {
        let mut params = ParamMap::new();
        params.insert("b".to_string(), ExtensionParameter::from(2.0));
        params.insert("a".to_string(), ExtensionParameter::from("x"));
        let preview = params_preview(&params);
        assert!(preview.starts_with("a="));
        assert!(preview.contains(", b="));
    }

    #[test]
    fn empty_id_is_shown_as_reply() {
        assert_eq!(display_id(""), "<reply>");
        assert_eq!(display_id("event"), "event");
    }
}
