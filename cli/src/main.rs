use clap::{Args, Parser, Subcommand};
use messages::{DriveCommand, DriveMode};
use pilot::{ConstantPilot, DriveOptions, DriveSocket, PilotConfig, PilotError, run_drive};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Pilot(#[from] PilotError),
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("vehicle returned HTTP {0}")]
    BadStatus(u16),
}

#[derive(Parser, Debug)]
#[command(name = "donkey-cli", about = "Remote pilot CLI for a camera-equipped vehicle")]
struct Cli {
    /// HTTP base URL of the vehicle's web controller.
    #[arg(long, env = "DONKEY_BASE_URL", default_value = "http://donkeycar:8887")]
    base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the vehicle's web controller is reachable.
    Ping,
    /// Send one steering/throttle command per captured video frame.
    Drive(DriveArgs),
    /// Connect the drive socket and print everything the vehicle sends.
    Watch,
}

#[derive(Args, Debug)]
struct DriveArgs {
    /// Steering angle, -1.0 (full left) to 1.0 (full right).
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    angle: f64,

    /// Throttle, -1.0 (full reverse) to 1.0 (full forward).
    #[arg(long, default_value_t = 0.2, allow_hyphen_values = true)]
    throttle: f64,

    /// Drive mode: user, local_angle, or local.
    #[arg(long, default_value_t = DriveMode::User)]
    drive_mode: DriveMode,

    /// Ask the vehicle to record captured frames.
    #[arg(long, default_value_t = false)]
    recording: bool,

    /// Stop after this many frames (an all-stop command is sent at the end).
    #[arg(long)]
    max_frames: Option<usize>,

    /// Log progress every N frames.
    #[arg(long, default_value_t = 100)]
    progress_every: usize,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = PilotConfig::new(cli.base_url);

    match cli.command {
        Command::Ping => run_ping(&config).await,
        Command::Drive(args) => run_drive_command(&config, args).await,
        Command::Watch => run_watch(&config).await,
    }
}

async fn run_ping(config: &PilotConfig) -> Result<(), CliError> {
    let response = reqwest::Client::new()
        .get(config.base_url.trim_end_matches('/'))
        .send()
        .await?;
    let status = response.status();
    if !status.is_success() {
        return Err(CliError::BadStatus(status.as_u16()));
    }
    println!("ok");
    Ok(())
}

async fn run_drive_command(config: &PilotConfig, args: DriveArgs) -> Result<(), CliError> {
    let command = DriveCommand {
        angle: args.angle,
        throttle: args.throttle,
        drive_mode: args.drive_mode,
        recording: args.recording,
    };
    let options = DriveOptions {
        max_frames: args.max_frames,
        progress_every: args.progress_every,
    };

    let report = run_drive(config, ConstantPilot::new(command), options).await?;

    let geometry = match (report.width, report.height) {
        (Some(width), Some(height)) => format!("{width}x{height}"),
        _ => "unknown".to_owned(),
    };
    eprintln!(
        "drive complete: frames={} geometry={geometry}",
        report.frames
    );
    Ok(())
}

async fn run_watch(config: &PilotConfig) -> Result<(), CliError> {
    let mut socket = DriveSocket::connect(config).await?;
    while let Some(message) = socket.next_message().await? {
        println!("{message}");
    }
    Ok(())
}
