use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    println!("navlink {}", env!("CARGO_PKG_VERSION"));
    if !args.extended {
        return Ok(SUCCESS);
    }

    println!("target: {}", option_env!("NAVLINK_BUILD_TARGET").unwrap_or("unknown"));
    println!("profile: {}", option_env!("NAVLINK_BUILD_PROFILE").unwrap_or("unknown"));
    println!("os: {}", std::env::consts::OS);
    println!("arch: {}", std::env::consts::ARCH);
    println!("subprotocol: {}", navlink_client::FOXGLOVE_SUBPROTOCOL);
    let topics: Vec<&str> = navlink_client::WATCHED_TOPICS
        .iter()
        .map(|topic| topic.as_str())
        .collect();
    println!("topics: {}", topics.join(", "));

    Ok(SUCCESS)
}
