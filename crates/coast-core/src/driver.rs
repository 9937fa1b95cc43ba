//! Per-view tokio task driving a kinetic engine
//!
//! Wheel events and lifecycle commands are posted into one unbounded queue per
//! view; the task also owns the fixed-rate interval and the settle timer, so
//! every mutation of the engine happens on that single task in arrival order.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::kinetic::{KineticScroller, ScrollSurface, TickOutcome};
use crate::settings::ConfigHandle;
use crate::{Error, Result};

/// Commands accepted by a view task
#[derive(Debug, Clone, PartialEq)]
pub enum ViewCommand {
    Wheel { delta: f64, amount: f64 },
    Start,
    Stop,
    Detach,
}

/// Scroll surface that reports every requested offset over a channel
#[derive(Debug)]
pub struct ChannelSurface {
    offset: i64,
    tx: mpsc::UnboundedSender<i64>,
}

impl ChannelSurface {
    pub fn new(offset: i64) -> (Self, mpsc::UnboundedReceiver<i64>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { offset, tx }, rx)
    }
}

impl ScrollSurface for ChannelSurface {
    fn offset(&self) -> i64 {
        self.offset
    }

    fn set_offset(&mut self, offset: i64) {
        self.offset = offset;
        if self.tx.send(offset).is_err() {
            warn!("Failed to send offset update: receiver dropped");
        }
    }
}

/// Handle to a running view task
#[derive(Debug)]
pub struct ViewHandle<S> {
    tx: mpsc::UnboundedSender<ViewCommand>,
    task: JoinHandle<S>,
}

/// Spawn a view task; the engine starts animating immediately
pub fn spawn_view<S>(config: ConfigHandle, surface: S) -> ViewHandle<S>
where
    S: ScrollSurface + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    let engine = KineticScroller::new(config, surface);
    let task = tokio::spawn(run_view(engine, rx));
    ViewHandle { tx, task }
}

impl<S> ViewHandle<S> {
    fn send(&self, command: ViewCommand) -> Result<()> {
        self.tx.send(command).map_err(|_| Error::DriverClosed)
    }

    pub fn wheel(&self, delta: f64, amount: f64) -> Result<()> {
        self.send(ViewCommand::Wheel { delta, amount })
    }

    pub fn start(&self) -> Result<()> {
        self.send(ViewCommand::Start)
    }

    pub fn stop(&self) -> Result<()> {
        self.send(ViewCommand::Stop)
    }

    /// Stop the task and get the surface back
    pub async fn detach(self) -> Result<S> {
        // The task may already be gone if every sender was dropped
        let _ = self.tx.send(ViewCommand::Detach);
        self.task.await.map_err(|_| Error::DriverClosed)
    }
}

fn frame_interval(period: Duration) -> Interval {
    // First tick completes immediately and serves as the sync tick
    let mut interval = time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}

async fn next_tick(ticker: &mut Option<Interval>) -> Instant {
    match ticker {
        Some(interval) => interval.tick().await,
        None => std::future::pending().await,
    }
}

async fn run_view<S: ScrollSurface>(
    mut engine: KineticScroller<S>,
    mut rx: mpsc::UnboundedReceiver<ViewCommand>,
) -> S {
    engine.start_animating();
    let mut ticker = Some(frame_interval(engine.frame_interval()));

    let settle = time::sleep(Duration::ZERO);
    tokio::pin!(settle);
    let mut settle_armed = false;

    info!("Kinetic view task started");

    loop {
        tokio::select! {
            biased;

            command = rx.recv() => match command {
                Some(ViewCommand::Wheel { delta, amount }) => {
                    engine.on_wheel_event(delta, amount, Instant::now().into_std());
                    if let Some(deadline) = engine.settle_deadline() {
                        settle.as_mut().reset(Instant::from_std(deadline));
                        settle_armed = true;
                    }
                }
                Some(ViewCommand::Start) => {
                    engine.start_animating();
                    if ticker.is_none() {
                        ticker = Some(frame_interval(engine.frame_interval()));
                    }
                }
                Some(ViewCommand::Stop) => {
                    engine.stop_animating();
                    ticker = None;
                }
                Some(ViewCommand::Detach) | None => break,
            },

            () = &mut settle, if settle_armed => {
                settle_armed = false;
                engine.on_settle();
            }

            now = next_tick(&mut ticker) => {
                if engine.on_tick(now.into_std()) == TickOutcome::Stopped {
                    debug!(offset = engine.surface().offset(), "View at rest");
                }

                // Pick up a changed frame interval at the tick boundary
                let period = engine.frame_interval();
                if ticker.as_ref().is_some_and(|t| t.period() != period) {
                    let mut interval = frame_interval(period);
                    interval.reset();
                    ticker = Some(interval);
                }
            }
        }
    }

    engine.stop_animating();
    info!("Kinetic view task stopped");
    engine.into_surface()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KineticConfig;
    use crate::kinetic::MemorySurface;

    fn drain(rx: &mut mpsc::UnboundedReceiver<i64>) -> Vec<i64> {
        let mut out = Vec::new();
        while let Ok(offset) = rx.try_recv() {
            out.push(offset);
        }
        out
    }

    #[tokio::test(start_paused = true)]
    async fn test_wheel_burst_scrolls_forward() {
        let (surface, mut rx) = ChannelSurface::new(0);
        let view = spawn_view(ConfigHandle::fixed(KineticConfig::default()), surface);

        view.wheel(1.0, 3.0).unwrap();
        view.wheel(1.0, 3.0).unwrap();
        time::sleep(Duration::from_millis(500)).await;

        let offsets = drain(&mut rx);
        assert!(!offsets.is_empty());
        assert!(offsets.windows(2).all(|w| w[0] <= w[1]));

        let surface = view.detach().await.unwrap();
        assert_eq!(surface.offset(), *offsets.last().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_scroll_after_stop() {
        let (surface, mut rx) = ChannelSurface::new(0);
        let view = spawn_view(ConfigHandle::fixed(KineticConfig::default()), surface);

        view.wheel(1.0, 10.0).unwrap();
        time::sleep(Duration::from_millis(120)).await;
        assert!(!drain(&mut rx).is_empty());

        view.stop().unwrap();
        time::sleep(Duration::from_millis(1)).await;
        drain(&mut rx);

        time::sleep(Duration::from_secs(2)).await;
        assert!(drain(&mut rx).is_empty());

        // Restarting resumes the remaining momentum
        view.start().unwrap();
        time::sleep(Duration::from_millis(200)).await;
        assert!(!drain(&mut rx).is_empty());

        view.detach().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_reversal_stops_motion() {
        let view = spawn_view(
            ConfigHandle::fixed(KineticConfig::default()),
            MemorySurface::at(100),
        );

        view.wheel(1.0, 3.0).unwrap();
        view.wheel(-1.0, 3.0).unwrap();
        time::sleep(Duration::from_millis(500)).await;

        let surface = view.detach().await.unwrap();
        assert_eq!(surface.offset, 100);
    }

    #[tokio::test(start_paused = true)]
    async fn test_motion_decays_to_rest() {
        let (surface, mut rx) = ChannelSurface::new(0);
        let view = spawn_view(ConfigHandle::fixed(KineticConfig::default()), surface);

        view.wheel(1.0, 3.0).unwrap();
        time::sleep(Duration::from_secs(5)).await;
        let moved = drain(&mut rx);
        assert!(!moved.is_empty());

        time::sleep(Duration::from_secs(5)).await;
        assert!(drain(&mut rx).is_empty());

        view.detach().await.unwrap();
    }

    fn steps(offsets: &[i64]) -> Vec<i64> {
        offsets.windows(2).map(|w| w[1] - w[0]).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_decay_waits_for_settle_window() {
        let (surface, mut rx) = ChannelSurface::new(0);
        let view = spawn_view(ConfigHandle::fixed(KineticConfig::default()), surface);

        // 3 lines per notch over a 50 ms frame: 0.06 lines/ms, 3 lines per tick
        view.wheel(1.0, 3.0).unwrap();
        time::sleep(Duration::from_millis(400)).await;

        let mut offsets = vec![0];
        offsets.extend(drain(&mut rx));
        let steps = steps(&offsets);

        // Three undecayed ticks inside the 150 ms window
        assert_eq!(&steps[..3], &[3, 3, 3]);

        // Then friction shrinks every step
        let decayed = &steps[3..];
        assert!(!decayed.is_empty());
        assert!(decayed.iter().all(|&s| s < 3));
        assert!(decayed.windows(2).all(|w| w[1] <= w[0]));

        view.detach().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_input_inside_window_postpones_decay() {
        let (surface, mut rx) = ChannelSurface::new(0);
        let view = spawn_view(ConfigHandle::fixed(KineticConfig::default()), surface);

        view.wheel(1.0, 3.0).unwrap();
        // Zero-delta events leave the velocity alone but re-arm the window
        for _ in 0..6 {
            time::sleep(Duration::from_millis(100)).await;
            view.wheel(0.0, 3.0).unwrap();
        }

        let mut offsets = vec![0];
        offsets.extend(drain(&mut rx));
        let active = steps(&offsets);
        assert!(active.len() >= 10);
        assert!(active.iter().all(|&s| s == 3));

        // Once input stops, the window expires and decay begins
        time::sleep(Duration::from_millis(400)).await;
        let mut tail = vec![*offsets.last().unwrap()];
        tail.extend(drain(&mut rx));
        assert!(steps(&tail).iter().any(|&s| s < 3));

        view.detach().await.unwrap();
    }

    #[tokio::test]
    async fn test_commands_fail_after_detach() {
        let view = spawn_view(
            ConfigHandle::fixed(KineticConfig::default()),
            MemorySurface::default(),
        );
        let tx = view.tx.clone();
        view.detach().await.unwrap();
        assert!(tx.send(ViewCommand::Start).is_err());
    }
}
