//! Card showing the published upload's name, size, and dimensions.

use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::{LdImage, LdX};
use vessel_pipeline::presentation::FileSummary;

/// Props for the [`FileInfo`] component.
#[derive(Props, Clone, PartialEq)]
pub struct FileInfoProps {
    /// Text for the card.
    summary: FileSummary,
    /// Called when the remove button is clicked.
    on_remove: EventHandler<()>,
}

/// File name and size with a remove button.
#[component]
pub fn FileInfo(props: FileInfoProps) -> Element {
    let FileSummary {
        name,
        size,
        dimensions,
    } = &props.summary;

    rsx! {
        div { class: "flex items-center gap-3 p-3 mt-4 rounded-lg bg-[var(--surface)] border border-[var(--border)]",
            div { class: "text-[var(--accent)]",
                Icon { icon: LdImage, width: 24, height: 24 }
            }
            div { class: "flex-1 min-w-0",
                p { class: "text-sm font-medium text-[var(--text)] truncate", title: "{name}",
                    "{name}"
                }
                p { class: "text-xs text-[var(--muted)] tabular-nums",
                    "{size} \u{b7} {dimensions}"
                }
            }
            button {
                class: "p-1 rounded text-[var(--muted)] hover:text-[var(--text-error)] hover:bg-[var(--surface-active)] cursor-pointer transition-colors",
                title: "Remove file",
                aria_label: "Remove file",
                onclick: move |_| props.on_remove.call(()),
                Icon { icon: LdX, width: 18, height: 18 }
            }
        }
    }
}
