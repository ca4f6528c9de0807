use super::*;

#[test]
fn control_url_maps_http_to_ws() {
    let config = PilotConfig::new("http://donkeycar:8887");
    assert_eq!(
        config.control_url().expect("url"),
        "ws://donkeycar:8887/wsDrive"
    );
}

#[test]
fn control_url_maps_https_to_wss() {
    let config = PilotConfig::new("https://vehicle.example.com");
    assert_eq!(
        config.control_url().expect("url"),
        "wss://vehicle.example.com/wsDrive"
    );
}

#[test]
fn control_url_rejects_unknown_scheme() {
    let config = PilotConfig::new("ftp://donkeycar:8887");
    let err = config.control_url().expect_err("scheme should fail");
    assert!(matches!(err, PilotError::InvalidBaseUrl(url) if url == "ftp://donkeycar:8887"));
}

#[test]
fn trailing_slash_does_not_double_up() {
    let config = PilotConfig::new("http://donkeycar:8887/");
    assert_eq!(
        config.control_url().expect("url"),
        "ws://donkeycar:8887/wsDrive"
    );
    assert_eq!(config.video_url(), "http://donkeycar:8887/video");
}

#[test]
fn video_url_appends_video_path() {
    let config = PilotConfig::new("http://10.0.0.7:8887");
    assert_eq!(config.video_url(), "http://10.0.0.7:8887/video");
}
