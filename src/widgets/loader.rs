//! Spinner overlay for a single asynchronous unit of work.
//!
//! The overlay owns one terminal line. A ticker flips the pulse dot on a fixed interval and
//! redraws the elapsed time; once the work settles the ticker is stopped and the line is replaced
//! by a completion line (success) or erased (failure).

use std::future::Future;
use std::time::Duration;

use tokio::time::{self, Instant, Interval, MissedTickBehavior};

use crate::config::{EnvConfig, DEFAULT_TICK_MS};
use crate::core::style::{done_bullet, gray, pulse_dot};
use crate::core::terminal::Terminal;
use crate::render::{Frame, RedrawController};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OverlayOptions {
    pub tick_interval: Duration,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(DEFAULT_TICK_MS),
        }
    }
}

impl OverlayOptions {
    /// Tick interval from `REENTER_TICK_MS`, 400ms when unset.
    pub fn from_env() -> Self {
        Self {
            tick_interval: EnvConfig::from_env().tick_interval(),
        }
    }

    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval.max(Duration::from_millis(1));
        self
    }
}

/// Bookkeeping of one overlay run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OverlayStats {
    /// Frames written, including the first one.
    pub redraws: usize,
    /// Ticker firings that reached the screen.
    pub ticks: usize,
    /// Times the ticker was actually stopped. Always 1 once the overlay returns.
    pub ticker_stops: usize,
    /// Final token count (streaming overlays only).
    pub tokens: u64,
}

/// `Ns` below a minute, `Mm Ss` from then on.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    if secs < 60 {
        format!("{secs}s")
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

/// Fixed-rate ticker with an explicit, idempotent stop.
///
/// The first tick fires one full period after start. Dropping the ticker stops it.
pub(crate) struct Ticker {
    interval: Option<Interval>,
    stops: usize,
}

impl Ticker {
    pub(crate) fn start(period: Duration) -> Self {
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self {
            interval: Some(interval),
            stops: 0,
        }
    }

    /// Wait for the next tick. A stopped ticker never fires.
    pub(crate) async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }

    pub(crate) fn stop(&mut self) {
        if self.interval.take().is_some() {
            self.stops += 1;
        }
    }

    pub(crate) fn stops(&self) -> usize {
        self.stops
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}

/// The single progress line shared by the spinner and the streaming overlay.
pub(crate) struct OverlayLine {
    label: String,
    started: Instant,
    bright: bool,
    redraw: RedrawController,
    ticks: usize,
}

impl OverlayLine {
    pub(crate) fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            started: Instant::now(),
            bright: true,
            redraw: RedrawController::new(),
            ticks: 0,
        }
    }

    pub(crate) fn label(&self) -> &str {
        &self.label
    }

    pub(crate) fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Draw the line, with a token count when `tokens` is set.
    pub(crate) fn draw<T: Terminal + ?Sized>(&mut self, term: &mut T, tokens: Option<u64>) {
        let frame = render_overlay_line(&self.label, self.elapsed(), tokens, self.bright);
        if let Err(err) = self.redraw.redraw(term, &frame) {
            tracing::warn!(error = %err, label = %self.label, "overlay redraw failed");
        }
    }

    /// Flip the pulse and redraw.
    pub(crate) fn tick<T: Terminal + ?Sized>(&mut self, term: &mut T, tokens: Option<u64>) {
        self.bright = !self.bright;
        self.ticks += 1;
        self.draw(term, tokens);
    }

    /// Replace the line with the completion summary.
    pub(crate) fn succeed<T: Terminal + ?Sized>(&mut self, term: &mut T, summary: &str) {
        if let Err(err) = self.redraw.finish(term, summary) {
            tracing::warn!(error = %err, label = %self.label, "overlay summary failed");
        }
    }

    /// Erase the line and leave the cursor on a blank line.
    pub(crate) fn fail<T: Terminal + ?Sized>(&mut self, term: &mut T) {
        if let Err(err) = self.redraw.abandon(term) {
            tracing::warn!(error = %err, label = %self.label, "overlay clear failed");
        }
    }

    pub(crate) fn stats(&self, ticker: &Ticker, tokens: u64) -> OverlayStats {
        OverlayStats {
            redraws: self.redraw.redraws(),
            ticks: self.ticks,
            ticker_stops: ticker.stops(),
            tokens,
        }
    }
}

/// `● (label  · 3s)` or `● (label  12 tokens · 3s)`, the text gray.
pub(crate) fn render_overlay_line(
    label: &str,
    elapsed: Duration,
    tokens: Option<u64>,
    bright: bool,
) -> Frame {
    let elapsed = format_elapsed(elapsed);
    let body = match tokens {
        Some(tokens) => format!("({label}  {tokens} tokens · {elapsed})"),
        None => format!("({label}  · {elapsed})"),
    };
    Frame::new(format!("{} {}", pulse_dot(bright), gray(&body)))
}

/// A spinner around one future.
pub struct Spinner {
    label: String,
    done_label: String,
    options: OverlayOptions,
}

impl Spinner {
    pub fn new(label: impl Into<String>, done_label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            done_label: done_label.into(),
            options: OverlayOptions::from_env(),
        }
    }

    pub fn with_options(mut self, options: OverlayOptions) -> Self {
        self.options = options;
        self
    }

    /// Await `work` under the spinner and return its result unchanged.
    pub async fn run<T, R, E, F>(self, term: &mut T, work: F) -> Result<R, E>
    where
        T: Terminal + ?Sized,
        F: Future<Output = Result<R, E>>,
    {
        self.run_with_stats(term, work).await.0
    }

    /// Like [`Spinner::run`], also reporting tick and redraw counts.
    pub async fn run_with_stats<T, R, E, F>(
        self,
        term: &mut T,
        work: F,
    ) -> (Result<R, E>, OverlayStats)
    where
        T: Terminal + ?Sized,
        F: Future<Output = Result<R, E>>,
    {
        let mut line = OverlayLine::new(self.label);
        let mut ticker = Ticker::start(self.options.tick_interval);
        tokio::pin!(work);

        line.draw(term, None);
        let result = loop {
            tokio::select! {
                biased;
                result = &mut work => break result,
                _ = ticker.tick() => line.tick(term, None),
            }
        };
        ticker.stop();

        match &result {
            Ok(_) => {
                let summary = format!("{} {}", done_bullet(), self.done_label);
                line.succeed(term, &summary);
            }
            Err(_) => line.fail(term),
        }
        tracing::debug!(
            label = %line.label(),
            ok = result.is_ok(),
            elapsed_ms = line.elapsed().as_millis() as u64,
            "spinner settled"
        );

        let stats = line.stats(&ticker, 0);
        (result, stats)
    }
}

/// Show a pulsing spinner with elapsed time while `work` runs.
///
/// On success the line becomes `● done_label` in green and the value is returned. On failure the
/// line is erased and the original error is returned untouched.
pub async fn with_spinner<T, R, E, F>(
    term: &mut T,
    label: &str,
    done_label: &str,
    work: F,
) -> Result<R, E>
where
    T: Terminal + ?Sized,
    F: Future<Output = Result<R, E>>,
{
    Spinner::new(label, done_label).run(term, work).await
}
