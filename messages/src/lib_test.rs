use super::*;

#[test]
fn default_command_encodes_to_exact_wire_string() {
    let command = DriveCommand::default();
    assert_eq!(
        encode_command(&command),
        r#"{"angle":0.0,"throttle":0.2,"drive_mode":"user","recording":false}"#
    );
}

#[test]
fn stop_command_is_all_zero() {
    let command = DriveCommand::stop();
    assert_eq!(
        encode_command(&command),
        r#"{"angle":0.0,"throttle":0.0,"drive_mode":"user","recording":false}"#
    );
}

#[test]
fn whole_number_fields_keep_a_decimal_point() {
    let command = DriveCommand {
        angle: -1.0,
        throttle: 1.0,
        drive_mode: DriveMode::User,
        recording: true,
    };
    let text = encode_command(&command);
    assert!(text.contains("\"angle\":-1.0"));
    assert!(text.contains("\"throttle\":1.0"));
}

#[test]
fn drive_mode_serializes_as_snake_case() {
    assert_eq!(
        serde_json::to_string(&DriveMode::User).expect("serialize"),
        "\"user\""
    );
    assert_eq!(
        serde_json::to_string(&DriveMode::LocalAngle).expect("serialize"),
        "\"local_angle\""
    );
    assert_eq!(
        serde_json::to_string(&DriveMode::Local).expect("serialize"),
        "\"local\""
    );
}

#[test]
fn drive_mode_deserializes_from_wire_names() {
    assert_eq!(
        serde_json::from_str::<DriveMode>("\"local_angle\"").expect("deserialize"),
        DriveMode::LocalAngle
    );
}

#[test]
fn drive_mode_rejects_unknown_wire_name() {
    assert!(serde_json::from_str::<DriveMode>("\"Autopilot\"").is_err());
}

#[test]
fn drive_mode_parses_from_cli_text() {
    assert_eq!("user".parse::<DriveMode>().expect("parse"), DriveMode::User);
    assert_eq!(
        "local".parse::<DriveMode>().expect("parse"),
        DriveMode::Local
    );
}

#[test]
fn drive_mode_parse_error_names_the_input() {
    let err = "turbo".parse::<DriveMode>().expect_err("mode should be invalid");
    assert!(err.contains("turbo"));
}

#[test]
fn command_round_trips_through_json() {
    let command = DriveCommand {
        angle: 0.25,
        throttle: -0.5,
        drive_mode: DriveMode::Local,
        recording: true,
    };
    let decoded =
        serde_json::from_str::<DriveCommand>(&encode_command(&command)).expect("decode");
    assert_eq!(decoded, command);
}

#[test]
fn decode_message_reads_typed_fields() {
    let message = decode_message(
        r#"{"angle":0.5,"throttle":0.2,"drive_mode":"local_angle","recording":false}"#,
    )
    .expect("decode");

    assert_eq!(message.angle(), Some(0.5));
    assert_eq!(message.throttle(), Some(0.2));
    assert_eq!(message.drive_mode(), Some(DriveMode::LocalAngle));
}

#[test]
fn decode_message_tolerates_integer_numbers() {
    let message = decode_message(r#"{"angle":1,"throttle":0}"#).expect("decode");
    assert_eq!(message.angle(), Some(1.0));
    assert_eq!(message.throttle(), Some(0.0));
}

#[test]
fn decode_message_keeps_unknown_fields() {
    let message = decode_message(r#"{"num_records":120,"angle":0.0}"#).expect("decode");
    assert_eq!(
        message.get("num_records"),
        Some(&serde_json::json!(120))
    );
}

#[test]
fn decode_message_missing_fields_are_none() {
    let message = decode_message("{}").expect("decode");
    assert_eq!(message.angle(), None);
    assert_eq!(message.throttle(), None);
    assert_eq!(message.drive_mode(), None);
}

#[test]
fn decode_message_ignores_unrecognized_drive_mode() {
    let message = decode_message(r#"{"drive_mode":"turbo"}"#).expect("decode");
    assert_eq!(message.drive_mode(), None);
}

#[test]
fn decode_message_rejects_malformed_json() {
    let err = decode_message("{not json").expect_err("text should fail");
    assert!(matches!(err, CodecError::Parse(_)));
}

#[test]
fn decode_message_rejects_non_object_json() {
    let err = decode_message("[1, 2, 3]").expect_err("array should fail");
    assert!(matches!(err, CodecError::NotAnObject));
}

#[test]
fn message_displays_as_compact_json() {
    let message = decode_message(r#"{"angle":0.5}"#).expect("decode");
    assert_eq!(message.to_string(), r#"{"angle":0.5}"#);
}
