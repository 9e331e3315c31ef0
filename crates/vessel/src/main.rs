use std::rc::Rc;

use dioxus::prelude::*;
use vessel_io::{Charts, FileInfo, FileUpload, Notice, PickedFile, Preview, ViewControls};
use vessel_pipeline::presentation::{self, FileSummary, ModelChoice};
use vessel_pipeline::{
    Action, ContentMode, FileCandidate, Generation, ModelVariant, Opacity, Outcome,
    PipelineConfig, PipelineError, SegmentationSource, Session, intake, segment,
};

/// Optional JSON overrides for [`PipelineConfig`], baked in at build time,
/// e.g. `VESSEL_CONFIG_JSON='{"segmentation_source":{"kind":"remote","endpoint":"..."}}'`.
const CONFIG_JSON: Option<&str> = option_env!("VESSEL_CONFIG_JSON");

fn main() {
    dioxus::launch(app);
}

fn load_config() -> PipelineConfig {
    let Some(json) = CONFIG_JSON else {
        return PipelineConfig::default();
    };
    serde_json::from_str(json).unwrap_or_else(|e| {
        web_sys::console::warn_1(&format!("ignoring VESSEL_CONFIG_JSON: {e}").into());
        PipelineConfig::default()
    })
}

/// Root application component.
///
/// Owns the [`Session`] signal. Every UI event and every async
/// completion goes through [`Session::dispatch`]; the components only
/// render what the session and the presentation model say.
#[allow(clippy::too_many_lines)]
fn app() -> Element {
    let mut session = use_signal(|| Session::new(load_config()));

    // --- Upload handler ---
    // Validation happens synchronously so a rejected file never touches
    // the published state. Accepted files are decoded and segmented in
    // a spawned task carrying the generation token.
    let on_pick = move |picked: PickedFile| {
        let outcome = session.write().dispatch(Action::Submit(picked.meta.clone()));
        let Outcome::Accepted(token) = outcome else {
            return;
        };

        spawn(async move {
            // Yield to the browser event loop so it can paint the
            // "Loading image..." state before decoding blocks the thread.
            gloo_timers::future::TimeoutFuture::new(0).await;

            let bytes = match picked.file.read_bytes().await {
                Ok(bytes) => bytes.to_vec(),
                Err(e) => {
                    let error = PipelineError::DecodeFailure(format!("failed to read file: {e}"));
                    let _ = session.write().dispatch(Action::DecodeFailed { token, error });
                    return;
                }
            };

            let action = match intake::decode(FileCandidate {
                meta: picked.meta,
                bytes,
            }) {
                Ok(image) => Action::ImageDecoded { token, image },
                Err(error) => Action::DecodeFailed { token, error },
            };
            if session.write().dispatch(action) == Outcome::Published {
                run_segmentation(session, token).await;
            }
        });
    };

    // --- View handlers ---
    let on_content = move |content: ContentMode| {
        let _ = session.write().dispatch(Action::SetContent(content));
    };
    let on_model = move |choice: ModelChoice| {
        let action = match choice {
            ModelChoice::Single(variant) => Action::SelectVariant(variant),
            ModelChoice::Compare => Action::Compare,
        };
        let _ = session.write().dispatch(action);
    };
    let on_opacity = move |opacity: Opacity| {
        let _ = session.write().dispatch(Action::SetOpacity(opacity));
    };
    let on_remove = move |()| {
        let _ = session.write().dispatch(Action::RemoveFile);
    };
    let on_dismiss = move |()| {
        let _ = session.write().dispatch(Action::DismissNotice);
    };

    // Recomposed only when the session changes.
    let composition = use_memo(move || session.read().compose().map(Rc::new));

    let state = session.read();
    let view = *state.view();
    let controls = presentation::describe(&view, state.status());
    let summary = state.image().map(|image| FileSummary::of(image));
    let notice = state.notice().map(ToString::to_string);
    drop(state);

    // --- Layout ---
    rsx! {
        // Tailwind utilities are generated in the browser from the class
        // names in the DOM.
        script { src: "https://cdn.jsdelivr.net/npm/@tailwindcss/browser@4" }
        style { dangerous_inner_html: include_str!("../assets/theme.css") }

        div { class: "min-h-screen flex flex-col",
            header { class: "sticky top-0 z-40 backdrop-blur bg-[var(--bg)]/80 border-b border-[var(--border)]",
                nav { class: "max-w-6xl mx-auto px-6 py-3 flex items-center justify-between",
                    span { class: "text-lg font-semibold text-[var(--text-heading)]", "VesselSeg" }
                    div { class: "flex gap-6 text-sm text-[var(--text-secondary)]",
                        a { href: "#demo", class: "hover:text-[var(--text)]", "Demo" }
                        a { href: "#results", class: "hover:text-[var(--text)]", "Results" }
                    }
                }
            }

            section { class: "max-w-6xl mx-auto px-6 pt-16 pb-10 text-center",
                h1 { class: "text-4xl md:text-5xl font-semibold text-[var(--text-heading)] mb-4",
                    "Retinal vessel segmentation"
                }
                p { class: "text-lg text-[var(--text-secondary)] max-w-2xl mx-auto",
                    "Upload a fundus image and compare how a baseline U-Net and an \
                     attention-augmented CBAM-Net trace the vessel tree."
                }
            }

            section { id: "demo", class: "max-w-6xl w-full mx-auto px-6 py-10",
                div { class: "grid grid-cols-1 lg:grid-cols-3 gap-8",
                    div { class: "flex flex-col",
                        FileUpload { on_pick: on_pick }
                        if let Some(summary) = summary {
                            FileInfo { summary: summary, on_remove: on_remove }
                        }
                    }

                    div { class: "lg:col-span-2 flex flex-col gap-4",
                        Preview {
                            composition: composition(),
                            titles: controls.slot_titles.clone(),
                            progress: controls.progress_label.clone(),
                        }
                        if composition().is_some() {
                            ViewControls {
                                model: controls,
                                opacity: view.opacity,
                                on_content: on_content,
                                on_model: on_model,
                                on_opacity: on_opacity,
                            }
                        }
                    }
                }
                p { class: "mt-6 text-xs text-[var(--muted)]",
                    "The preview is a client-side luminance threshold for illustration; \
                     no image leaves the browser unless a segmentation endpoint is configured."
                }
            }

            section { id: "results", class: "max-w-6xl w-full mx-auto px-6 py-10",
                h2 { class: "text-2xl font-semibold text-[var(--text-heading)] mb-6",
                    "Benchmark results"
                }
                Charts {}
            }

            footer { class: "mt-auto px-6 py-6 text-center text-xs text-[var(--muted)] border-t border-[var(--border)]",
                "Retinal vessel segmentation showcase"
            }

            if let Some(message) = notice {
                Notice { message: message, on_dismiss: on_dismiss }
            }
        }
    }
}

/// Generate every pending variant for the image published under `token`,
/// A first, then B.
///
/// Yields to the event loop before each variant so progress repaints.
/// Stops as soon as the session has moved on to another upload; the task
/// spawned for that upload owns its jobs.
#[allow(clippy::future_not_send)] // WASM is single-threaded; Signal and fetch are !Send
async fn run_segmentation(mut session: Signal<Session>, token: Generation) {
    loop {
        gloo_timers::future::TimeoutFuture::new(0).await;

        let (job, source) = {
            let state = session.peek();
            let Some(job) = state.next_job() else {
                return;
            };
            (job, state.config().segmentation_source.clone())
        };
        if job.token != token {
            return;
        }

        let result = match (&source, job.variant) {
            (SegmentationSource::Remote { endpoint }, ModelVariant::BaseUnet) => {
                match vessel_io::remote::request_segmentation(endpoint, &job.image, job.variant)
                    .await
                {
                    Ok(result) => result,
                    Err(e) => {
                        web_sys::console::warn_1(&format!("remote segmentation failed: {e}").into());
                        if session.peek().current_token() == Some(token) {
                            let _ = session.write().dispatch(Action::Report(e.into()));
                        }
                        segment::generate(&job.image, job.variant)
                    }
                }
            }
            _ => segment::generate(&job.image, job.variant),
        };

        let outcome = session.write().dispatch(Action::SegmentationDone {
            token: job.token,
            result,
        });
        if outcome == Outcome::Discarded {
            return;
        }
    }
}
