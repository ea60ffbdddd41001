use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("wrapext {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: wrapext");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!("sdk_version: {}", wrapext_dispatch::SDK_VERSION);
    println!(
        "build_target: {}",
        option_env!("WRAPEXT_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!(
        "rustc: {}",
        option_env!("RUSTC_VERSION").unwrap_or("unknown")
    );
    println!("git_hash: {}", option_env!("GIT_HASH").unwrap_or("unknown"));
    println!("features: cli=true, native_dialogs={}", cfg!(windows));

    Ok(SUCCESS)
}
