//! Render descriptions for the preview controls.
//!
//! The UI never decides which button looks pressed; it asks
//! [`describe`] and renders whatever comes back.

use crate::intake::format_file_size;
use crate::session::Status;
use crate::types::{Dimensions, UploadedImage};
use crate::variant::ModelVariant;
use crate::view::{ContentMode, Layout, ViewState};

/// A button in a segmented control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toggle<T> {
    /// The value selecting this button dispatches.
    pub value: T,
    /// Button text.
    pub label: &'static str,
    /// Whether the button is drawn as selected.
    pub pressed: bool,
}

/// An entry in the model selector: one variant, or both side by side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelChoice {
    /// Show one variant.
    Single(ModelVariant),
    /// Show both variants.
    Compare,
}

impl ModelChoice {
    /// Selector entries in button order.
    pub const ALL: [Self; 3] = [
        Self::Single(ModelVariant::BaseUnet),
        Self::Single(ModelVariant::CbamNet),
        Self::Compare,
    ];

    /// Button label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Single(variant) => variant.label(),
            Self::Compare => "Compare",
        }
    }
}

/// Everything the controls and preview frame need to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlsModel {
    /// Original / Segmented / Overlay.
    pub content: [Toggle<ContentMode>; 3],
    /// Variant A / Variant B / Compare.
    pub models: [Toggle<ModelChoice>; 3],
    /// The model selector is only offered once generation has started
    /// producing results.
    pub models_visible: bool,
    /// Current opacity, e.g. `"50%"`.
    pub opacity_label: String,
    /// The opacity slider only affects the Overlay view.
    pub opacity_active: bool,
    /// One caption per preview slot.
    pub slot_titles: Vec<&'static str>,
    /// Progress text while something is running.
    pub progress_label: Option<String>,
}

/// Build the render description for `view` given the session's status.
#[must_use]
pub fn describe(view: &ViewState, status: Status) -> ControlsModel {
    let content = ContentMode::ALL.map(|mode| Toggle {
        value: mode,
        label: mode.label(),
        pressed: view.content == mode,
    });

    let models = ModelChoice::ALL.map(|choice| Toggle {
        value: choice,
        label: choice.label(),
        pressed: match (choice, view.layout) {
            (ModelChoice::Single(variant), Layout::Single) => variant == view.selected,
            (ModelChoice::Compare, Layout::Compare) => true,
            _ => false,
        },
    });

    let slot_titles = match view.layout {
        Layout::Single if view.content == ContentMode::Original => {
            vec![ContentMode::Original.label()]
        }
        Layout::Single => vec![view.selected.label()],
        Layout::Compare => ModelVariant::ALL.iter().map(|v| v.label()).collect(),
    };

    let progress_label = match status {
        Status::Decoding => Some("Loading image...".to_string()),
        Status::Processing { done, total } => Some(format!("Processing {done}/{total}")),
        Status::Empty | Status::Ready => None,
    };

    ControlsModel {
        content,
        models,
        models_visible: matches!(status, Status::Processing { done, .. } if done > 0)
            || status == Status::Ready,
        opacity_label: view.opacity.to_string(),
        opacity_active: view.content == ContentMode::Overlay,
        slot_titles,
        progress_label,
    }
}

/// The file information card's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSummary {
    /// File name.
    pub name: String,
    /// Human-readable size, e.g. `"1.50 KB"`.
    pub size: String,
    /// Pixel dimensions, e.g. `"640 x 480"`.
    pub dimensions: String,
}

impl FileSummary {
    /// Summarize a published upload.
    #[must_use]
    pub fn of(image: &UploadedImage) -> Self {
        let Dimensions { width, height } = image.dimensions();
        Self {
            name: image.meta().name.clone(),
            size: format_file_size(image.meta().size),
            dimensions: format!("{width} x {height}"),
        }
    }
}
