use messages::DriveMode;

use super::*;

#[test]
fn constant_pilot_ignores_frame_content() {
    let command = DriveCommand {
        angle: 0.1,
        throttle: 0.3,
        drive_mode: DriveMode::User,
        recording: false,
    };
    let mut pilot = ConstantPilot::new(command);

    assert_eq!(pilot.command(b""), command);
    assert_eq!(pilot.command(b"jpeg bytes"), command);
    assert_eq!(pilot.command(&[0xFF, 0xD8]), command);
}

#[test]
fn constant_pilot_is_usable_as_trait_object() {
    let mut pilot: Box<dyn Pilot> = Box::new(ConstantPilot::new(DriveCommand::default()));
    assert_eq!(pilot.command(b"frame"), DriveCommand::default());
}

#[test]
fn drive_options_default_to_unbounded_quiet_run() {
    let options = DriveOptions::default();
    assert_eq!(options.max_frames, None);
    assert_eq!(options.progress_every, 0);
}
