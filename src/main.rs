mod assemble;
mod combine;
mod download;
mod error;
mod options;
mod pipeline;
mod prompt;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use assemble::ffmpeg::Ffmpeg;
use assemble::MediaAssembler;
use download::DownloadClient;
use error::{Error, Result};
use options::{Layout, Options};
use pipeline::{Pipeline, RunReport};
use prompt::Console;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    #[clap(long)]
    /// base URL of the video segments, asked for interactively when omitted
    video_url: Option<String>,

    #[clap(long)]
    /// base URL of the audio segments, asked for interactively when omitted
    audio_url: Option<String>,

    #[clap(short, long, default_value = ".")]
    /// directory that holds the Video, Audio and Output folders
    dir: PathBuf,

    #[clap(long)]
    /// path to the ffmpeg executable (defaults to the one on PATH)
    ffmpeg: Option<PathBuf>,

    #[clap(long)]
    /// exit without waiting for a key press
    no_wait: bool,

    #[clap(short, long)]
    /// log debug output
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("segment_muxer=debug")
        } else {
            EnvFilter::new("segment_muxer=info")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(options: &Options) -> Result<RunReport> {
    let ffmpeg = Ffmpeg::locate(options.ffmpeg.as_deref())?;
    tracing::debug!("Using ffmpeg at {}", ffmpeg.program().display());

    let assembler = MediaAssembler::new(ffmpeg.clone(), ffmpeg);
    let client = DownloadClient::new()?;
    let mut console = Console::new(options.video_url.clone(), options.audio_url.clone());

    Pipeline::new(&client, &assembler, &options.layout)
        .run(&mut console)
        .await
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let options = Options {
        layout: Layout::new(args.dir),
        video_url: args.video_url,
        audio_url: args.audio_url,
        ffmpeg: args.ffmpeg,
        wait_for_key: !args.no_wait,
    };

    tracing::debug!("Options: {:?}", options);

    // A blank URL exits straight away; everything else pauses before exiting.
    let (code, pause) = match run(&options).await {
        Ok(report) => {
            tracing::debug!(
                "Combined {} segments ({} bytes) into {} and {} segments ({} bytes) into {}",
                report.combined_video.segments,
                report.combined_video.bytes,
                report.combined_video.path.display(),
                report.combined_audio.segments,
                report.combined_audio.bytes,
                report.combined_audio.path.display()
            );
            println!(
                "Done! {} {} and {} {} segments combined into {}",
                report.video.segments,
                report.video.kind,
                report.audio.segments,
                report.audio.kind,
                report.output.display()
            );
            (ExitCode::SUCCESS, true)
        }
        Err(Error::BlankInput { kind }) => {
            println!("The {} URL must not be empty. Exiting.", kind);
            (ExitCode::FAILURE, false)
        }
        Err(err) => {
            tracing::error!("Run failed: {}", err);
            eprintln!("Error: {}", err);
            (ExitCode::FAILURE, true)
        }
    };

    if pause && options.wait_for_key {
        if let Err(err) = Console::wait_for_key() {
            tracing::warn!("Error waiting for key press: {}", err);
        }
    }

    code
}
