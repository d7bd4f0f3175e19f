//! Playback Session - owns one clock and its tick driver
//!
//! The clock and the ticker registration live behind a single mutex, so
//! `is_playing` and "a tick task is registered" always change together:
//!
//! ```text
//!   apply(play)  ──► clock.play()  + TickerGuard::spawn(gen + 1)
//!   apply(pause) ──► clock.pause() + drop TickerGuard (abort)
//!   apply(stop)  ──► clock.pause() + drop TickerGuard + closed
//!   end of window──► clock.pause() + drop TickerGuard + `complete`
//!   tick failure ──► clock.pause() + drop TickerGuard + `error`
//!   drop session ──► state dropped ──► TickerGuard dropped
//! ```

use std::sync::{Arc, Weak};
use tokio::sync::{Mutex, broadcast};
use tokio::time::{Instant, MissedTickBehavior};
use wardops_clock::{ClockState, PlaybackClock};
use wardops_core::{PlaybackSpeed, SessionId, SimTime, TimeWindow, ZoomLevel};
use wardops_ports::{ClockError, ClockResult};

use crate::{
    command::PlaybackCommand,
    config::{ConfigError, SessionConfig},
    delta::ReplayDelta,
    frame::PlaybackFrame,
    markers::{EventMarker, MarkerTrack},
    ticker::TickerGuard,
};

/// Mutable session state, always accessed under one lock
struct SessionState {
    clock: PlaybackClock,
    /// Registered tick task; `Some` iff the clock is playing
    ticker: Option<TickerGuard>,
    /// Bumped every time a ticker is spawned
    generation: u64,
    closed: bool,
}

/// Everything a tick task needs, without keeping the session alive
struct TickContext {
    session_id: SessionId,
    state: Weak<Mutex<SessionState>>,
    markers: Arc<MarkerTrack>,
    frame_tx: broadcast::Sender<PlaybackFrame>,
    interval: std::time::Duration,
    replay_end: SimTime,
    stop_at_end: bool,
}

/// One replay session over a fixed window of simulated time
pub struct PlaybackSession {
    id: SessionId,
    config: SessionConfig,
    replay_window: TimeWindow,
    state: Arc<Mutex<SessionState>>,
    markers: Arc<MarkerTrack>,
    frame_tx: broadcast::Sender<PlaybackFrame>,
}

impl PlaybackSession {
    /// Create a paused session positioned at `config.replay_start`
    pub fn new(config: SessionConfig, markers: MarkerTrack) -> Result<Self, ConfigError> {
        config.validate()?;
        let replay_window = config.replay_window()?;

        let clock = PlaybackClock::with_settings(
            config.replay_start,
            config.initial_speed,
            config.zoom_level,
        );
        let (frame_tx, _) = broadcast::channel(config.frame_capacity);
        let id = SessionId::new();

        log::info!(
            "Created playback session {} over {} .. {} at {} with {} markers",
            id,
            replay_window.start,
            replay_window.end,
            config.initial_speed,
            markers.len()
        );

        Ok(Self {
            id,
            config,
            replay_window,
            state: Arc::new(Mutex::new(SessionState {
                clock,
                ticker: None,
                generation: 0,
                closed: false,
            })),
            markers: Arc::new(markers),
            frame_tx,
        })
    }

    /// Create a session without event markers
    pub fn with_config(config: SessionConfig) -> Result<Self, ConfigError> {
        Self::new(config, MarkerTrack::default())
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn replay_window(&self) -> TimeWindow {
        self.replay_window
    }

    pub fn markers(&self) -> &MarkerTrack {
        &self.markers
    }

    /// Subscribe to tick, state and completion frames
    pub fn subscribe(&self) -> broadcast::Receiver<PlaybackFrame> {
        self.frame_tx.subscribe()
    }

    pub async fn snapshot(&self) -> ClockState {
        self.state.lock().await.clock.snapshot()
    }

    /// Whether a tick task is currently registered
    pub async fn is_ticking(&self) -> bool {
        self.state
            .lock()
            .await
            .ticker
            .as_ref()
            .is_some_and(|ticker| !ticker.is_finished())
    }

    pub async fn is_closed(&self) -> bool {
        self.state.lock().await.closed
    }

    /// Display window for the current zoom level
    pub async fn visible_window(&self) -> ClockResult<TimeWindow> {
        self.state.lock().await.clock.visible_window()
    }

    /// Markers inside the current display window
    pub async fn visible_markers(&self) -> ClockResult<Vec<EventMarker>> {
        let window = self.visible_window().await?;
        Ok(self.markers.visible(window).to_vec())
    }

    /// Up to `limit` markers still ahead of the current time
    pub async fn upcoming_markers(&self, limit: usize) -> Vec<EventMarker> {
        let state = self.state.lock().await;
        self.markers.upcoming(&state.clock, limit).to_vec()
    }

    /// Apply one control command and return the resulting state
    ///
    /// Rejected commands leave the state untouched and emit no frame.
    pub async fn apply(&self, command: PlaybackCommand) -> ClockResult<ClockState> {
        let mut state = self.state.lock().await;
        if state.closed {
            log::warn!(
                "Session {} rejected {}: session is closed",
                self.id,
                command.action()
            );
            return Err(ClockError::SessionClosed);
        }

        log::debug!("Session {} applying {:?}", self.id, command);

        let result = match &command {
            PlaybackCommand::Play => {
                state.clock.play();
                self.ensure_ticker(&mut state);
                Ok(())
            }
            PlaybackCommand::Pause => {
                state.clock.pause();
                if state.ticker.take().is_some() {
                    log::info!(
                        "Session {} paused at {}",
                        self.id,
                        state.clock.current_time()
                    );
                }
                Ok(())
            }
            PlaybackCommand::Seek { time } => {
                state.clock.set_current_time(*time);
                Ok(())
            }
            PlaybackCommand::Speed { value } => PlaybackSpeed::new(*value)
                .map(|speed| {
                    if !speed.is_preset() {
                        log::debug!("Session {} using custom speed {}", self.id, speed);
                    }
                    state.clock.set_playback_speed(speed)
                })
                .ok_or_else(|| ClockError::InvalidSpeed(value.to_string())),
            PlaybackCommand::CycleSpeed => {
                let next = state.clock.playback_speed().next_preset();
                state.clock.set_playback_speed(next);
                Ok(())
            }
            PlaybackCommand::Zoom { level } => {
                state.clock.set_zoom_level(*level);
                Ok(())
            }
            PlaybackCommand::StepForward => state.clock.step_forward().map(|_| ()),
            PlaybackCommand::StepBackward => state.clock.step_backward().map(|_| ()),
            PlaybackCommand::Scrub { fraction } => {
                state.clock.scrub_to_fraction(*fraction).map(|_| ())
            }
            PlaybackCommand::Stop => {
                state.clock.pause();
                state.ticker = None;
                state.closed = true;
                log::info!(
                    "Session {} stopped at {}",
                    self.id,
                    state.clock.current_time()
                );
                Ok(())
            }
        };

        if let Err(err) = &result {
            log::warn!("Session {} rejected {}: {}", self.id, command.action(), err);
        }
        result?;

        let snapshot = state.clock.snapshot();
        // No subscribers is fine
        let _ = self.frame_tx.send(PlaybackFrame::state(self.id, snapshot));
        if command == PlaybackCommand::Stop {
            let _ = self
                .frame_tx
                .send(PlaybackFrame::complete(self.id, "Replay stopped"));
        }

        Ok(snapshot)
    }

    pub async fn play(&self) -> ClockResult<ClockState> {
        self.apply(PlaybackCommand::Play).await
    }

    pub async fn pause(&self) -> ClockResult<ClockState> {
        self.apply(PlaybackCommand::Pause).await
    }

    pub async fn set_current_time(&self, time: SimTime) -> ClockResult<ClockState> {
        self.apply(PlaybackCommand::Seek { time }).await
    }

    pub async fn set_playback_speed(&self, speed: PlaybackSpeed) -> ClockResult<ClockState> {
        self.apply(PlaybackCommand::Speed {
            value: speed.value(),
        })
        .await
    }

    pub async fn set_zoom_level(&self, level: ZoomLevel) -> ClockResult<ClockState> {
        self.apply(PlaybackCommand::Zoom { level }).await
    }

    pub async fn step_forward(&self) -> ClockResult<ClockState> {
        self.apply(PlaybackCommand::StepForward).await
    }

    pub async fn step_backward(&self) -> ClockResult<ClockState> {
        self.apply(PlaybackCommand::StepBackward).await
    }

    pub async fn scrub_to_fraction(&self, fraction: f64) -> ClockResult<ClockState> {
        self.apply(PlaybackCommand::Scrub { fraction }).await
    }

    /// End the session; later commands fail with [`ClockError::SessionClosed`]
    pub async fn stop(&self) -> ClockResult<ClockState> {
        self.apply(PlaybackCommand::Stop).await
    }

    fn ensure_ticker(&self, state: &mut SessionState) {
        if let Some(ticker) = &state.ticker {
            if !ticker.is_finished() {
                return;
            }
            log::warn!(
                "Session {} replacing finished ticker {}",
                self.id,
                ticker.generation()
            );
        }

        state.generation += 1;
        let context = TickContext {
            session_id: self.id,
            state: Arc::downgrade(&self.state),
            markers: self.markers.clone(),
            frame_tx: self.frame_tx.clone(),
            interval: self.config.tick_interval(),
            replay_end: self.replay_window.end,
            stop_at_end: self.config.stop_at_end,
        };
        state.ticker = Some(TickerGuard::spawn(
            state.generation,
            context.run(state.generation),
        ));

        log::info!(
            "Session {} playing from {} at {}",
            self.id,
            state.clock.current_time(),
            state.clock.playback_speed()
        );
    }
}

impl TickContext {
    /// Tick once per interval until paused, stopped or the session is gone
    async fn run(self, generation: u64) {
        let mut interval = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;

            let Some(shared) = self.state.upgrade() else {
                break;
            };
            let mut state = shared.lock().await;
            if state.generation != generation || !state.clock.is_playing() {
                break;
            }
            if !self.advance(&mut state) {
                break;
            }
        }
    }

    /// Apply one tick; returns false once this ticker has released itself
    fn advance(&self, state: &mut SessionState) -> bool {
        let previous = state.clock.current_time();
        let now = match state.clock.tick() {
            Ok(now) => now,
            Err(err) => {
                log::warn!("Session {} tick failed: {}", self.session_id, err);
                let _ = self
                    .frame_tx
                    .send(PlaybackFrame::error(self.session_id, err.to_string()));
                self.release(state);
                return false;
            }
        };

        let delta = ReplayDelta::from_markers(self.markers.between(previous, now));
        log::debug!(
            "Session {} tick {} -> {} ({} markers, {} bed changes)",
            self.session_id,
            previous,
            now,
            delta.event_markers.len(),
            delta.bed_changes.len()
        );
        let _ = self
            .frame_tx
            .send(PlaybackFrame::tick(self.session_id, now, delta));

        if self.stop_at_end && now >= self.replay_end {
            log::info!(
                "Session {} reached end of replay at {}",
                self.session_id,
                now
            );
            self.release(state);
            let _ = self
                .frame_tx
                .send(PlaybackFrame::complete(self.session_id, "Replay finished"));
            return false;
        }

        true
    }

    /// Pause and drop this ticker's own registration
    fn release(&self, state: &mut SessionState) {
        state.clock.pause();
        state.ticker = None;
        let _ = self.frame_tx.send(PlaybackFrame::state(
            self.session_id,
            state.clock.snapshot(),
        ));
    }
}
