//! File upload component with drag-and-drop and file picker.

use dioxus::html::{FileData, HasFileData};
use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::LdUpload;
use vessel_pipeline::FileMeta;

/// A file the user dropped or picked, before its bytes are read.
///
/// Intake validation only needs [`meta`](Self::meta); the bytes are read
/// from [`file`](Self::file) once the file is accepted.
#[derive(Clone)]
pub struct PickedFile {
    /// Name, reported media type, and size.
    pub meta: FileMeta,
    /// Handle for reading the bytes.
    pub file: FileData,
}

impl PickedFile {
    fn new(file: FileData) -> Self {
        let meta = FileMeta {
            name: file.name(),
            media_type: file.content_type().unwrap_or_default(),
            size: file.size(),
        };
        Self { meta, file }
    }
}

/// Props for the [`FileUpload`] component.
#[derive(Props, Clone, PartialEq)]
pub struct FileUploadProps {
    /// Called with the first file of a drop or picker selection.
    on_pick: EventHandler<PickedFile>,
}

/// A drag-and-drop zone that also opens the file picker when clicked.
///
/// Only the first file of a multi-file drop is used. Validation happens
/// in the caller, which owns the notice shown for rejected files.
#[component]
pub fn FileUpload(props: FileUploadProps) -> Element {
    let mut dragging = use_signal(|| false);

    let pick_first = move |files: Vec<FileData>| {
        if let Some(file) = files.into_iter().next() {
            props.on_pick.call(PickedFile::new(file));
        }
    };

    let handle_files = move |evt: FormEvent| {
        pick_first(evt.files());
    };

    let handle_drop = move |evt: DragEvent| {
        evt.prevent_default();
        dragging.set(false);
        pick_first(evt.files());
    };

    let border_class = if dragging() {
        "border-[var(--accent)] bg-[var(--surface-active)]"
    } else {
        "border-[var(--border-muted)] bg-[var(--surface)]"
    };

    rsx! {
        label {
            class: "block border-2 border-dashed rounded-xl p-8 text-center cursor-pointer transition-colors {border_class}",
            ondragenter: move |evt| {
                evt.prevent_default();
                dragging.set(true);
            },
            ondragover: move |evt| {
                evt.prevent_default();
                dragging.set(true);
            },
            ondragleave: move |_| {
                dragging.set(false);
            },
            ondrop: handle_drop,

            input {
                r#type: "file",
                accept: "image/*",
                class: "hidden",
                onchange: handle_files,
            }

            div { class: "flex justify-center mb-3 text-[var(--accent)]",
                Icon { icon: LdUpload, width: 32, height: 32 }
            }
            p { class: "text-[var(--text)] font-medium mb-1",
                "Drop a fundus image here or click to browse"
            }
            p { class: "text-[var(--muted)] text-sm",
                "PNG, JPEG, BMP, WebP, GIF up to 5 MB"
            }
        }
    }
}
