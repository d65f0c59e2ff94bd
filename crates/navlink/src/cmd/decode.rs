use bytes::Bytes;
use navlink_cdr::{decode_diagnostic_map, decode_geo_fix, decode_orientation, MessageKind};
use navlink_client::WatchedTopic;
use navlink_frame::BinaryFrame;
use serde::Serialize;

use crate::cmd::DecodeArgs;
use crate::exit::{cdr_error, frame_error, CliError, CliResult, NO_INPUT, SUCCESS, USAGE};
use crate::output::{print_value, OutputFormat};

#[derive(Serialize)]
struct FrameInfo {
    subscription_id: u32,
    timestamp_nanos: u64,
    payload_size: usize,
}

#[derive(Serialize)]
struct Decoded<T> {
    topic: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    frame: Option<FrameInfo>,
    message: T,
}

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let topic = WatchedTopic::from_topic(&args.topic)
        .ok_or_else(|| CliError::new(USAGE, format!("not a decodable topic: {}", args.topic)))?;

    let data = std::fs::read(&args.path).map_err(|err| {
        CliError::new(NO_INPUT, format!("read {} failed: {err}", args.path.display()))
    })?;

    let (frame, payload) = if args.frame {
        let frame = BinaryFrame::parse(Bytes::from(data)).map_err(|err| frame_error("frame", err))?;
        let info = FrameInfo {
            subscription_id: frame.subscription_id,
            timestamp_nanos: frame.timestamp_nanos,
            payload_size: frame.payload.len(),
        };
        (Some(info), frame.payload)
    } else {
        (None, Bytes::from(data))
    };

    let topic_name = topic.as_str();
    match topic.message_kind() {
        MessageKind::Orientation => {
            let message = decode_orientation(&payload).map_err(|err| cdr_error(topic_name, err))?;
            print_value(&Decoded { topic: topic_name, frame, message }, format);
        }
        MessageKind::GeoFix => {
            let message = decode_geo_fix(&payload).map_err(|err| cdr_error(topic_name, err))?;
            print_value(&Decoded { topic: topic_name, frame, message }, format);
        }
        MessageKind::DiagnosticMap => {
            let message = decode_diagnostic_map(&payload).map_err(|err| cdr_error(topic_name, err))?;
            print_value(&Decoded { topic: topic_name, frame, message }, format);
        }
    }

    Ok(SUCCESS)
}
