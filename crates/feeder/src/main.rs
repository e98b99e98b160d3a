use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use scrib_driver::{run_with, Channel, RunOutcome, Session};
use scrib_script::Command;

mod channel;
mod preview;

use channel::{SimulatorChannel, TcpChannel};

/// Feeds a drawing script to the plotter robot.
#[derive(Parser)]
struct Args {
    /// Script file: one `<x> <y> <lineto|rlineto|rlinerot>` per line.
    path: PathBuf,
    /// Robot address, e.g. 192.168.4.1:81. Without this, frames only go
    /// to a simulator.
    #[arg(long)]
    connect: Option<String>,
    /// Write an SVG preview of the pen path here and exit.
    #[arg(long)]
    preview: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    pretty_env_logger::init();
    let args = Args::parse();

    let text = std::fs::read_to_string(&args.path)?;
    let cmds = match scrib_script::parse(&text) {
        Ok(cmds) => cmds,
        Err(e) => {
            error!("script rejected: {e}");
            return Ok(ExitCode::FAILURE);
        }
    };
    info!("script ready: {} commands", cmds.len());

    if let Some(out) = &args.preview {
        preview::write(&cmds, out)?;
        info!("preview written to {}", out.display());
        return Ok(ExitCode::SUCCESS);
    }

    match &args.connect {
        Some(addr) => draw(Session::new(TcpChannel::connect(addr).await?), &cmds).await?,
        None => draw(Session::new(SimulatorChannel::new()), &cmds).await?,
    }
    Ok(ExitCode::SUCCESS)
}

async fn draw<C: Channel>(mut session: Session<C>, cmds: &[Command]) -> Result<()> {
    let handle = session.abort_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("stop requested; stopping at the next command");
            handle.abort();
        }
    });

    info!("starting to draw");
    let bar = ProgressBar::new(cmds.len() as u64)
        .with_style(ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")?);
    let outcome = run_with(&mut session, cmds, |done, pose| {
        bar.set_position(done as u64);
        bar.set_message(format!(
            "pen at ({:.1}, {:.1})",
            pose.position.x, pose.position.y
        ));
    })
    .await?;
    bar.finish_and_clear();

    match outcome {
        RunOutcome::Completed => info!("drawing finished"),
        RunOutcome::Cancelled => warn!("drawing aborted; load the script again to start over"),
    }
    Ok(())
}
