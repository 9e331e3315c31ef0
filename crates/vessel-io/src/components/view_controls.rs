//! Content, model, and opacity controls for the preview.
//!
//! Purely a renderer for [`ControlsModel`]: which buttons are pressed
//! and whether the slider applies are decided by
//! [`vessel_pipeline::presentation::describe`].

use dioxus::prelude::*;
use vessel_pipeline::presentation::{ControlsModel, ModelChoice, Toggle};
use vessel_pipeline::{ContentMode, Opacity};

/// Props for the [`ViewControls`] component.
#[derive(Props, Clone, PartialEq)]
pub struct ViewControlsProps {
    /// Render description for the current view.
    model: ControlsModel,
    /// Current slider position.
    opacity: Opacity,
    /// Fired when a content button is clicked.
    on_content: EventHandler<ContentMode>,
    /// Fired when a model button is clicked.
    on_model: EventHandler<ModelChoice>,
    /// Fired while the slider moves.
    on_opacity: EventHandler<Opacity>,
}

/// Segmented buttons for content and model plus the opacity slider.
#[component]
pub fn ViewControls(props: ViewControlsProps) -> Element {
    let model = &props.model;
    let on_opacity = props.on_opacity;
    let min = Opacity::MIN.percent();
    let max = Opacity::MAX.percent();
    let value = props.opacity.percent();
    let slider_class = if model.opacity_active {
        ""
    } else {
        "opacity-50"
    };

    rsx! {
        div { class: "flex flex-col gap-4",
            div { class: "flex flex-wrap items-center gap-4",
                {render_group("View", &model.content, props.on_content)}
                if model.models_visible {
                    {render_group("Model", &model.models, props.on_model)}
                }
            }

            div { class: "flex flex-col gap-1 max-w-xs {slider_class}",
                div { class: "flex justify-between text-sm",
                    label { r#for: "overlay-opacity",
                        class: "text-[var(--text-heading)] font-medium",
                        "Overlay opacity"
                    }
                    span { class: "text-[var(--text-secondary)] tabular-nums",
                        "{model.opacity_label}"
                    }
                }
                input {
                    r#type: "range",
                    id: "overlay-opacity",
                    min: "{min}",
                    max: "{max}",
                    step: "1",
                    value: "{value}",
                    disabled: !model.opacity_active,
                    class: "w-full accent-[var(--accent)]",
                    oninput: move |e| {
                        match e.value().parse::<u8>() {
                            Ok(v) => on_opacity.call(Opacity::new(v)),
                            Err(err) => {
                                web_sys::console::warn_1(
                                    &format!("slider parse failure: {err:?} from {:?}", e.value())
                                        .into(),
                                );
                            }
                        }
                    },
                }
            }
        }
    }
}

/// Render a labeled row of mutually exclusive buttons.
fn render_group<T>(label: &str, toggles: &[Toggle<T>], on_click: EventHandler<T>) -> Element
where
    T: Copy + 'static,
{
    let label = label.to_string();

    rsx! {
        div { class: "flex items-center gap-2",
            span { class: "text-sm text-[var(--text-secondary)]", "{label}" }
            div {
                class: "inline-flex rounded-lg bg-[var(--surface-active)] p-1",
                role: "group",
                aria_label: "{label}",
                for toggle in toggles.iter().copied() {
                    {render_toggle_button(toggle, on_click)}
                }
            }
        }
    }
}

fn render_toggle_button<T>(toggle: Toggle<T>, on_click: EventHandler<T>) -> Element
where
    T: Copy + 'static,
{
    let class = if toggle.pressed {
        "bg-[var(--surface)] text-[var(--text)] shadow-sm"
    } else {
        "text-[var(--text-secondary)] hover:text-[var(--text)]"
    };
    let value = toggle.value;

    rsx! {
        button {
            class: "px-3 py-1 rounded-md text-sm font-medium cursor-pointer transition-colors {class}",
            "aria-pressed": "{toggle.pressed}",
            onclick: move |_| on_click.call(value),
            "{toggle.label}"
        }
    }
}
