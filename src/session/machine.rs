use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{
    capture::{CapturedImage, DataUri},
    config::SessionConfig,
    error::SessionError,
    gateway::{prompts::CUSTOM_PROMPT_PREFIX, AnimateRequest, TransformRequest},
    session::{
        progress::{ProgressKind, ProgressTicker, IDLE_MESSAGE},
        state::{Job, Session, Step, StepKind},
    },
    share::DeepLink,
    styles::StylePreset,
};

/// Error shown on the review screen after a failed transformation
pub const TRANSFORM_FAILED: &str = "Transformation failed. Try again.";

/// Error shown on the result screen after a failed video generation
pub const ANIMATE_FAILED: &str = "Video generation failed. Please use a paid API key.";

/// Style name sent for video generation when no preset is selected
pub const CUSTOM_STYLE_NAME: &str = "Custom Style";

type Transition<T> = std::result::Result<T, SessionError>;

/// Token handed out when an async operation begins
///
/// Completions presenting a ticket from before a reset, or for an operation
/// that is no longer the one in flight, are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    epoch: u64,
    op: u64,
}

/// The view state machine
///
/// Holds the [`Session`] and is the only thing that mutates it. Async work
/// is split into a `begin_*` handler that moves to the waiting state and
/// returns a [`Ticket`], and a `complete_*` handler that applies the outcome
/// if the ticket is still current.
pub struct SessionMachine {
    session: Session,
    config: SessionConfig,
    epoch: u64,
    next_op: u64,
    analysis_op: Option<u64>,
    in_flight: Option<u64>,
    feed: Arc<watch::Sender<String>>,
    ticker: Option<ProgressTicker>,
}

impl SessionMachine {
    pub fn new(config: SessionConfig) -> Self {
        let (feed, _) = watch::channel(IDLE_MESSAGE.to_string());
        Self {
            session: Session::default(),
            config,
            epoch: 0,
            next_op: 0,
            analysis_op: None,
            in_flight: None,
            feed: Arc::new(feed),
            ticker: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn kind(&self) -> StepKind {
        self.session.kind()
    }

    /// Subscribe to the progress message shown while transforming
    pub fn progress(&self) -> watch::Receiver<String> {
        self.feed.subscribe()
    }

    pub fn progress_message(&self) -> String {
        self.feed.borrow().clone()
    }

    pub fn ticker_active(&self) -> bool {
        self.ticker.is_some()
    }

    // ==========================================
    // NAVIGATION
    // ==========================================

    /// `welcome -> camera`
    pub fn start(&mut self) -> Transition<()> {
        if self.kind() != StepKind::Welcome {
            return Err(self.invalid("start capture"));
        }
        self.session.step = Step::Camera { device_error: None };
        Ok(())
    }

    /// Record a camera failure; capture stays disabled until the user leaves
    pub fn camera_failed<S: Into<String>>(&mut self, message: S) {
        if let Step::Camera { device_error } = &mut self.session.step {
            *device_error = Some(message.into());
        }
    }

    /// `camera -> welcome`, a full reset
    pub fn cancel_camera(&mut self) -> Transition<()> {
        if self.kind() != StepKind::Camera {
            return Err(self.invalid("cancel the camera"));
        }
        self.reset();
        Ok(())
    }

    /// Leave the current screen
    ///
    /// From a video result this only drops the video and shows the image
    /// again; from an image result it returns to review.
    pub fn back(&mut self) -> Transition<()> {
        match std::mem::take(&mut self.session.step) {
            Step::Camera { .. } => {
                self.reset();
            }
            Step::Result { capture, image, video: Some(_), error } => {
                self.session.step = Step::Result { capture, image, video: None, error };
            }
            Step::Result { capture, video: None, .. } => {
                self.session.step = Step::Review { capture, error: None };
            }
            other => {
                self.session.step = other;
                return Err(self.invalid("go back"));
            }
        }
        Ok(())
    }

    /// Return to the initial session from any step
    pub fn reset(&mut self) {
        self.stop_ticker();
        self.session = Session::default();
        self.epoch += 1;
        self.analysis_op = None;
        self.in_flight = None;
        debug!("Session reset (epoch {})", self.epoch);
    }

    // ==========================================
    // CAPTURE & ANALYSIS
    // ==========================================

    /// `camera -> review` with the captured still; analysis starts
    pub fn capture(&mut self, captured: CapturedImage) -> Transition<(Ticket, DataUri)> {
        match &self.session.step {
            Step::Camera { device_error: Some(message) } => {
                return Err(SessionError::CameraBlocked { message: message.clone() });
            }
            Step::Camera { device_error: None } => {}
            _ => return Err(self.invalid("capture")),
        }

        let image = captured.image.clone();
        self.session.step = Step::Review { capture: captured, error: None };
        self.session.drafts.is_analyzing = true;

        let ticket = self.issue();
        self.analysis_op = Some(ticket.op);
        info!("📸 Photo captured, analyzing outfit");
        Ok((ticket, image))
    }

    /// Apply the outfit analysis; failures fall back to the default description
    ///
    /// Returns `false` when the ticket is stale.
    pub fn complete_analysis(&mut self, ticket: Ticket, outcome: crate::error::Result<String>) -> bool {
        if ticket.epoch != self.epoch || self.analysis_op != Some(ticket.op) {
            debug!("Ignoring stale analysis result");
            return false;
        }
        let Step::Review { capture, .. } = &mut self.session.step else {
            return false;
        };

        self.analysis_op = None;
        self.session.drafts.is_analyzing = false;
        match outcome {
            Ok(description) => {
                debug!("Detected outfit: {}", description);
                capture.analysis = Some(description.clone());
                self.session.drafts.base_description = description;
            }
            Err(e) => {
                debug!("Outfit analysis failed, using default: {}", e);
                self.session.drafts.base_description = self.config.default_description.clone();
            }
        }
        true
    }

    // ==========================================
    // TRANSFORMATION
    // ==========================================

    /// The instruction in effect: the custom prompt if any, else the preset's
    pub fn active_prompt(&self) -> Option<String> {
        let custom = self.session.drafts.custom_prompt.trim();
        if !custom.is_empty() {
            return Some(format!("{}{}", CUSTOM_PROMPT_PREFIX, custom));
        }
        self.session
            .selected_style
            .as_ref()
            .map(|s| s.prompt.clone())
            .filter(|p| !p.trim().is_empty())
    }

    /// Whether the transform button is enabled
    pub fn is_ready_to_transform(&self) -> bool {
        self.session.selected_style.is_some()
            || self.session.drafts.custom_prompt.trim().chars().count() > 3
    }

    /// `review -> transforming`
    pub fn begin_transform(&mut self) -> Transition<(Ticket, TransformRequest)> {
        let Step::Review { capture, .. } = &self.session.step else {
            return Err(match self.kind() {
                StepKind::Welcome | StepKind::Camera => SessionError::MissingCapture,
                _ => self.invalid("transform"),
            });
        };
        if self.session.drafts.is_analyzing {
            return Err(SessionError::AnalysisPending);
        }
        let prompt = self.active_prompt().ok_or(SessionError::EmptyPrompt)?;

        let base_description = match self.session.drafts.base_description.trim() {
            "" => self.config.default_description.clone(),
            described => described.to_string(),
        };
        let request = TransformRequest {
            image: capture.image.clone(),
            prompt,
            base_description,
            blur_background: self.session.drafts.blur_background,
        };

        if let Step::Review { capture, .. } = std::mem::take(&mut self.session.step) {
            self.session.step = Step::Transforming { capture, job: Job::Image };
        }
        let ticket = self.issue();
        self.in_flight = Some(ticket.op);
        self.start_ticker(ProgressKind::Image);

        info!("🧵 Transforming with: {}", request.prompt);
        Ok((ticket, request))
    }

    /// `transforming -> result` on success, back to `review` on failure
    pub fn complete_transform(&mut self, ticket: Ticket, outcome: crate::error::Result<DataUri>) -> bool {
        if !self.is_current(ticket) {
            debug!("Ignoring stale transform result");
            return false;
        }

        match std::mem::take(&mut self.session.step) {
            Step::Transforming { capture, job: Job::Image } => {
                self.finish_flight();
                match outcome {
                    Ok(image) => {
                        info!("   ✅ New look ready");
                        self.session.step = Step::Result { capture, image, video: None, error: None };
                        self.session.drafts.intensity = 100;
                        self.session.drafts.show_original = false;
                    }
                    Err(e) => {
                        warn!("Transformation failed: {}", e);
                        self.session.step = Step::Review {
                            capture,
                            error: Some(TRANSFORM_FAILED.to_string()),
                        };
                    }
                }
                true
            }
            other => {
                self.session.step = other;
                false
            }
        }
    }

    // ==========================================
    // ANIMATION
    // ==========================================

    /// Whether a video can be requested: an image result without a video
    pub fn can_animate(&self) -> Transition<()> {
        match &self.session.step {
            Step::Result { video: None, .. } => Ok(()),
            _ => Err(self.invalid("animate")),
        }
    }

    /// `result -> transforming` for video generation
    pub fn begin_animate(&mut self) -> Transition<(Ticket, AnimateRequest)> {
        self.can_animate()?;
        let image = match &self.session.step {
            Step::Result { image, .. } => image.clone(),
            _ => return Err(self.invalid("animate")),
        };

        let style_name = self
            .session
            .selected_style
            .as_ref()
            .map(|s| s.name.clone())
            .unwrap_or_else(|| CUSTOM_STYLE_NAME.to_string());

        if let Step::Result { capture, image, .. } = std::mem::take(&mut self.session.step) {
            self.session.step = Step::Transforming { capture, job: Job::Video { image } };
        }
        let ticket = self.issue();
        self.in_flight = Some(ticket.op);
        self.start_ticker(ProgressKind::Video);

        info!("🎬 Animating look ({})", style_name);
        Ok((ticket, AnimateRequest { image, style_name }))
    }

    /// `transforming -> result`, with the video on success or an error on failure
    pub fn complete_animate(&mut self, ticket: Ticket, outcome: crate::error::Result<DataUri>) -> bool {
        if !self.is_current(ticket) {
            debug!("Ignoring stale video result");
            return false;
        }

        match std::mem::take(&mut self.session.step) {
            Step::Transforming { capture, job: Job::Video { image } } => {
                self.finish_flight();
                self.session.step = match outcome {
                    Ok(video) => {
                        info!("   ✅ Video ready");
                        Step::Result { capture, image, video: Some(video), error: None }
                    }
                    Err(e) => {
                        warn!("Video generation failed: {}", e);
                        Step::Result {
                            capture,
                            image,
                            video: None,
                            error: Some(ANIMATE_FAILED.to_string()),
                        }
                    }
                };
                true
            }
            other => {
                self.session.step = other;
                false
            }
        }
    }

    // ==========================================
    // SELECTION & DRAFTS
    // ==========================================

    /// Select a preset; clears the custom prompt
    pub fn select_style(&mut self, style: StylePreset) {
        self.session.selected_style = Some(style);
        self.session.drafts.custom_prompt.clear();
    }

    /// Edit the custom prompt; non-blank text clears the selected preset
    pub fn set_custom_prompt<S: Into<String>>(&mut self, text: S) {
        let text = text.into();
        if !text.trim().is_empty() {
            self.session.selected_style = None;
        }
        self.session.drafts.custom_prompt = text;
    }

    /// Drop the selection if it is the given style
    pub fn clear_selection_if(&mut self, id: &str) -> bool {
        if self.session.selected_style.as_ref().is_some_and(|s| s.id == id) {
            self.session.selected_style = None;
            return true;
        }
        false
    }

    pub fn set_base_description<S: Into<String>>(&mut self, text: S) {
        self.session.drafts.base_description = text.into();
    }

    pub fn toggle_blur(&mut self) -> bool {
        self.session.drafts.blur_background = !self.session.drafts.blur_background;
        self.session.drafts.blur_background
    }

    pub fn set_intensity(&mut self, value: u8) {
        self.session.drafts.intensity = value.min(100);
    }

    pub fn set_show_original(&mut self, show: bool) {
        self.session.drafts.show_original = show;
    }

    pub fn set_show_only_favorites(&mut self, only: bool) {
        self.session.drafts.show_only_favorites = only;
    }

    /// Open the "save style" dialog
    pub fn open_naming(&mut self) {
        self.session.drafts.naming = Some(String::new());
    }

    pub fn set_naming_name<S: Into<String>>(&mut self, name: S) {
        self.session.drafts.naming = Some(name.into());
    }

    pub fn close_naming(&mut self) {
        self.session.drafts.naming = None;
    }

    pub fn set_toast<S: Into<String>>(&mut self, message: S) {
        self.session.drafts.toast = Some(message.into());
    }

    pub fn clear_toast(&mut self) {
        self.session.drafts.toast = None;
    }

    /// Apply a decoded share link to the transient selection
    pub fn apply_deep_link(&mut self, link: DeepLink) {
        match link {
            DeepLink::Style(style) => {
                let toast = format!("Imported {} style!", style.name);
                self.select_style(style);
                self.set_toast(toast);
            }
            DeepLink::Custom(prompt) => {
                self.set_custom_prompt(prompt);
                self.set_toast("Imported custom shared style!");
            }
            DeepLink::None => {}
        }
    }

    /// Title and style label for the result screen
    pub fn headline(&self) -> (&'static str, &str) {
        let title = if self.session.step.video().is_some() { "Cinematic" } else { "Result" };
        (title, self.session.style_label())
    }

    // ==========================================
    // INTERNALS
    // ==========================================

    fn issue(&mut self) -> Ticket {
        self.next_op += 1;
        Ticket { epoch: self.epoch, op: self.next_op }
    }

    fn is_current(&self, ticket: Ticket) -> bool {
        ticket.epoch == self.epoch && self.in_flight == Some(ticket.op)
    }

    fn finish_flight(&mut self) {
        self.in_flight = None;
        self.stop_ticker();
    }

    fn start_ticker(&mut self, kind: ProgressKind) {
        self.stop_ticker();
        let period = Duration::from_millis(self.config.progress_interval_ms);
        self.ticker = Some(ProgressTicker::start(kind, period, self.feed.clone()));
    }

    fn stop_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.cancel();
        }
    }

    fn invalid(&self, action: &str) -> SessionError {
        SessionError::InvalidTransition {
            action: action.to_string(),
            step: self.kind().to_string(),
        }
    }
}
