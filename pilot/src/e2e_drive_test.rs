use messages::{DriveCommand, DriveMode};

use super::*;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
#[ignore = "live vehicle test; run manually with DONKEY_BASE_URL and --ignored"]
async fn drives_a_live_vehicle_for_a_few_frames() -> Result<(), PilotError> {
    let config = PilotConfig::from_env();
    let pilot = ConstantPilot::new(DriveCommand {
        angle: 0.0,
        throttle: 0.0,
        drive_mode: DriveMode::User,
        recording: false,
    });
    let options = DriveOptions {
        max_frames: Some(10),
        progress_every: 5,
    };

    let report = run_drive(&config, pilot, options).await?;
    assert_eq!(report.frames, 10);
    assert!(report.width.is_some());
    assert!(report.height.is_some());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
#[ignore = "live vehicle test; run manually with DONKEY_BASE_URL and --ignored"]
async fn video_stream_serves_parseable_jpeg_frames() -> Result<(), PilotError> {
    let config = PilotConfig::from_env();
    let mut video = VideoStream::open(&config).await?;

    for _ in 0..5 {
        let frame = video.next_frame().await?;
        assert!(!frame.is_empty());
        assert_eq!(&frame[..2], &[0xFF, 0xD8]);
    }
    Ok(())
}
