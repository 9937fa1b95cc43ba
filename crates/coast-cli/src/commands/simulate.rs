use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Args;
use tokio::time::{sleep, Instant};

use coast_core::{spawn_view, AppConfig, ChannelSurface, ConfigStore, ScrollSurface};

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Number of wheel notches in the burst
    #[arg(short, long, default_value_t = 5)]
    notches: u32,
    /// Signed wheel delta of each notch
    #[arg(short, long, default_value_t = 1.0, allow_negative_numbers = true)]
    delta: f64,
    /// Lines per notch
    #[arg(short, long, default_value_t = 3.0)]
    amount: f64,
    /// Time between notches in milliseconds
    #[arg(short, long, default_value_t = 30)]
    gap_ms: u64,
    /// Reverse direction for the last N notches
    #[arg(short, long, default_value_t = 0)]
    reverse: u32,
    /// Starting offset
    #[arg(short, long, default_value_t = 0)]
    start: i64,
    /// How long to keep ticking after the burst, in milliseconds
    #[arg(long, default_value_t = 3000)]
    coast_ms: u64,
}

pub async fn run(config: Arc<AppConfig>, args: SimulateArgs) -> Result<()> {
    let store = ConfigStore::new(config.kinetic.clone());
    let kinetic = store.current();
    println!(
        "Simulating {} notch(es) of {:+} x {} lines, {} ms apart (frame {} ms, settle {} ms)\n",
        args.notches, args.delta, args.amount, args.gap_ms, kinetic.frame_interval_ms, kinetic.settle_window_ms
    );

    let (surface, mut offsets) = ChannelSurface::new(args.start);
    let view = spawn_view(store.handle(), surface);
    let started = Instant::now();

    let printer = tokio::spawn(async move {
        let mut last = args.start;
        let mut moves = 0u32;
        while let Some(offset) = offsets.recv().await {
            if offset != last {
                println!(
                    "{:>6} ms  offset {:>7}  ({:+})",
                    started.elapsed().as_millis(),
                    offset,
                    offset - last
                );
                last = offset;
                moves += 1;
            }
        }
        moves
    });

    let forward = args.notches.saturating_sub(args.reverse);
    for i in 0..args.notches {
        let delta = if i < forward { args.delta } else { -args.delta };
        view.wheel(delta, args.amount)?;
        sleep(Duration::from_millis(args.gap_ms)).await;
    }
    sleep(Duration::from_millis(args.coast_ms)).await;

    let surface = view.detach().await?;
    let final_offset = surface.offset();
    // Dropping the surface closes the offset channel and ends the printer
    drop(surface);
    let moves = printer.await?;

    println!(
        "\nTravelled {} lines in {} moves, final offset {}",
        final_offset - args.start,
        moves,
        final_offset
    );
    tracing::debug!(final_offset, moves, "Simulation finished");
    Ok(())
}
