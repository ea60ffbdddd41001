use std::mem::size_of;

use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use wrapext_dispatch::{DEFAULT_ACTIONS, DEFAULT_COMPONENT_ID, SDK_VERSION};
use wrapext_param::{ExtensionParameterPod, NamedExtensionParameterPod, ParamType, WireText};

use crate::cmd::InfoArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::OutputFormat;

#[derive(Serialize)]
struct ParamKind {
    discriminant: u8,
    name: &'static str,
}

#[derive(Serialize)]
struct RecordSizes {
    text: usize,
    parameter: usize,
    named_parameter: usize,
}

#[derive(Serialize)]
struct InfoOutput {
    sdk_version: i32,
    default_component_id: &'static str,
    actions: Vec<&'static str>,
    param_kinds: Vec<ParamKind>,
    record_sizes: RecordSizes,
}

pub fn run(_args: InfoArgs, format: OutputFormat) -> CliResult<i32> {
    let out = InfoOutput {
        sdk_version: SDK_VERSION,
        default_component_id: DEFAULT_COMPONENT_ID,
        actions: DEFAULT_ACTIONS.iter().map(|action| action.id).collect(),
        param_kinds: [
            ParamType::Null,
            ParamType::Boolean,
            ParamType::Number,
            ParamType::Text,
        ]
        .into_iter()
        .map(|kind| ParamKind {
            discriminant: kind.as_raw(),
            name: kind.name(),
        })
        .collect(),
        record_sizes: RecordSizes {
            text: size_of::<WireText>(),
            parameter: size_of::<ExtensionParameterPod>(),
            named_parameter: size_of::<NamedExtensionParameterPod>(),
        },
    };

    print_info(&out, format);
    Ok(SUCCESS)
}

fn print_info(out: &InfoOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            println!("SDK version:  {}", out.sdk_version);
            println!("Component id: {}", out.default_component_id);
            println!("Actions:      {}", out.actions.join(", "));

            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["DISCRIMINANT", "TYPE"]);
            for kind in &out.param_kinds {
                table.add_row(vec![kind.discriminant.to_string(), kind.name.to_string()]);
            }
            println!("{table}");
            print_sizes(&out.record_sizes);
        }
        OutputFormat::Pretty => {
            println!("Extension Info:");
            println!("  SDK version:      {}", out.sdk_version);
            println!("  Component id:     {}", out.default_component_id);
            println!("  Actions:          {}", out.actions.join(", "));
            let kinds = out
                .param_kinds
                .iter()
                .map(|k| format!("{}={}", k.discriminant, k.name))
                .collect::<Vec<_>>()
                .join(", ");
            println!("  Parameter types:  {kinds}");
            print_sizes(&out.record_sizes);
        }
    }
}

fn print_sizes(sizes: &RecordSizes) {
    println!(
        "Record sizes: text={} parameter={} named_parameter={}",
        sizes.text, sizes.parameter, sizes.named_parameter
    );
}
