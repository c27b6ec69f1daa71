use std::fmt;

use crate::{
    capture::{CapturedImage, DataUri},
    styles::StylePreset,
};

/// The five screens, without their data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    Welcome,
    Camera,
    Review,
    Transforming,
    Result,
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StepKind::Welcome => "welcome",
            StepKind::Camera => "camera",
            StepKind::Review => "review",
            StepKind::Transforming => "transforming",
            StepKind::Result => "result",
        };
        f.write_str(name)
    }
}

/// What the `Transforming` step is waiting on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Job {
    /// Outfit transformation of the captured photo
    Image,
    /// Video generation from an existing result image
    Video { image: DataUri },
}

/// Active screen, carrying only the data valid on that screen
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Step {
    #[default]
    Welcome,
    Camera {
        device_error: Option<String>,
    },
    Review {
        capture: CapturedImage,
        error: Option<String>,
    },
    Transforming {
        capture: CapturedImage,
        job: Job,
    },
    Result {
        capture: CapturedImage,
        image: DataUri,
        video: Option<DataUri>,
        error: Option<String>,
    },
}

impl Step {
    pub fn kind(&self) -> StepKind {
        match self {
            Step::Welcome => StepKind::Welcome,
            Step::Camera { .. } => StepKind::Camera,
            Step::Review { .. } => StepKind::Review,
            Step::Transforming { .. } => StepKind::Transforming,
            Step::Result { .. } => StepKind::Result,
        }
    }

    pub fn capture(&self) -> Option<&CapturedImage> {
        match self {
            Step::Review { capture, .. }
            | Step::Transforming { capture, .. }
            | Step::Result { capture, .. } => Some(capture),
            Step::Welcome | Step::Camera { .. } => None,
        }
    }

    pub fn result_image(&self) -> Option<&DataUri> {
        match self {
            Step::Result { image, .. } => Some(image),
            _ => None,
        }
    }

    pub fn video(&self) -> Option<&DataUri> {
        match self {
            Step::Result { video, .. } => video.as_ref(),
            _ => None,
        }
    }

    /// Error to show on the current screen
    pub fn error(&self) -> Option<&str> {
        match self {
            Step::Camera { device_error } => device_error.as_deref(),
            Step::Review { error, .. } | Step::Result { error, .. } => error.as_deref(),
            Step::Welcome | Step::Transforming { .. } => None,
        }
    }
}

/// Transient UI-only fields, all cleared by reset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drafts {
    /// Free-text custom prompt
    pub custom_prompt: String,

    /// Editable description of the outfit currently worn
    pub base_description: String,

    /// Outfit analysis still running
    pub is_analyzing: bool,

    /// Ask for a blurred portrait background
    pub blur_background: bool,

    /// "Hold to compare" is pressed
    pub show_original: bool,

    /// Result opacity over the original, 0-100
    pub intensity: u8,

    /// Style grid filtered to favorites
    pub show_only_favorites: bool,

    /// Name typed into the "save style" dialog, when the dialog is open
    pub naming: Option<String>,

    /// Short notification
    pub toast: Option<String>,
}

impl Default for Drafts {
    fn default() -> Self {
        Self {
            custom_prompt: String::new(),
            base_description: String::new(),
            is_analyzing: false,
            blur_background: false,
            show_original: false,
            intensity: 100,
            show_only_favorites: false,
            naming: None,
            toast: None,
        }
    }
}

/// Everything the front-end renders from
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    pub(crate) step: Step,
    pub(crate) selected_style: Option<StylePreset>,
    pub(crate) drafts: Drafts,
}

impl Session {
    pub fn step(&self) -> &Step {
        &self.step
    }

    pub fn kind(&self) -> StepKind {
        self.step.kind()
    }

    pub fn selected_style(&self) -> Option<&StylePreset> {
        self.selected_style.as_ref()
    }

    pub fn drafts(&self) -> &Drafts {
        &self.drafts
    }

    pub fn error(&self) -> Option<&str> {
        self.step.error()
    }

    /// Label of the style in effect on the result screen
    pub fn style_label(&self) -> &str {
        self.selected_style.as_ref().map(|s| s.name.as_str()).unwrap_or("Custom")
    }
}
