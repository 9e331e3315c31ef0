//! Blocking error notice.

use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::LdInfo;

/// Props for the [`Notice`] component.
#[derive(Props, Clone, PartialEq)]
pub struct NoticeProps {
    /// The message to show.
    message: String,
    /// Called when the user acknowledges the notice.
    on_dismiss: EventHandler<()>,
}

/// Modal dialog that must be acknowledged before the page is usable
/// again.
#[component]
pub fn Notice(props: NoticeProps) -> Element {
    rsx! {
        div {
            class: "fixed inset-0 z-50 flex items-center justify-center bg-black/40",
            role: "alertdialog",
            aria_modal: "true",
            aria_labelledby: "notice-title",
            div { class: "max-w-sm w-full mx-4 p-5 rounded-xl bg-[var(--surface)] shadow-lg",
                div { class: "flex items-center gap-2 mb-2 text-[var(--text-error)]",
                    Icon { icon: LdInfo, width: 20, height: 20 }
                    h2 { id: "notice-title", class: "font-semibold", "Something went wrong" }
                }
                p { class: "text-sm text-[var(--text)] mb-4", "{props.message}" }
                div { class: "flex justify-end",
                    button {
                        class: "px-4 py-2 rounded bg-[var(--accent)] hover:opacity-90 text-white text-sm font-medium cursor-pointer",
                        autofocus: true,
                        onclick: move |_| props.on_dismiss.call(()),
                        "OK"
                    }
                }
            }
        }
    }
}
