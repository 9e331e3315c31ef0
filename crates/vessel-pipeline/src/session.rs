//! The page's state as one explicit value.
//!
//! UI event handlers and async task completions do not mutate shared
//! globals; they [`dispatch`](Session::dispatch) an [`Action`]. Every
//! accepted upload is issued a [`Generation`] token, and completions
//! carry the token they were started with, so a decode or segmentation
//! that finishes after the user moved on is discarded instead of
//! clobbering newer state.

use std::rc::Rc;

use crate::compose::{Composition, compose};
use crate::intake;
use crate::segment::VariantResults;
use crate::types::{FileMeta, PipelineConfig, PipelineError, SegmentationResult, UploadedImage};
use crate::variant::ModelVariant;
use crate::view::{ContentMode, Layout, Opacity, ViewState};

/// Token identifying one accepted upload.
///
/// Tokens increase monotonically within a session; removing the file
/// also advances the counter so nothing in flight can match afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    #[must_use]
    const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// A state transition request.
#[derive(Debug, Clone)]
pub enum Action {
    /// A file was dropped or picked. Validated immediately.
    Submit(FileMeta),
    /// Decoding for `token` finished.
    ImageDecoded {
        /// Token returned when the file was submitted.
        token: Generation,
        /// The decoded upload.
        image: UploadedImage,
    },
    /// Decoding for `token` failed.
    DecodeFailed {
        /// Token returned when the file was submitted.
        token: Generation,
        /// Why decoding failed.
        error: PipelineError,
    },
    /// A variant's result for the image published under `token` is ready.
    SegmentationDone {
        /// Token of the image the result was computed from.
        token: Generation,
        /// The result.
        result: SegmentationResult,
    },
    /// Show an error without changing anything else (e.g. a remote
    /// failure that fell back to local generation).
    Report(PipelineError),
    /// Dismiss the current notice.
    DismissNotice,
    /// Forget the file, its image, and its results; reset the view.
    RemoveFile,
    /// Switch content mode.
    SetContent(ContentMode),
    /// Show a single variant.
    SelectVariant(ModelVariant),
    /// Show both variants side by side.
    Compare,
    /// Change overlay opacity.
    SetOpacity(Opacity),
}

/// What [`Session::dispatch`] did with an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "an Accepted outcome carries the token the decode task must use"]
pub enum Outcome {
    /// The file passed intake; decode it and report back with this token.
    Accepted(Generation),
    /// The action failed; the error is available via [`Session::notice`].
    /// Nothing else changed.
    Rejected,
    /// An image or result was stored.
    Published,
    /// A completion arrived for a superseded token and was dropped.
    Discarded,
    /// View or file state changed.
    Updated,
}

/// A segmentation the session is waiting for.
#[derive(Debug, Clone)]
pub struct Job {
    /// Token the result must be reported with.
    pub token: Generation,
    /// The image to segment.
    pub image: Rc<UploadedImage>,
    /// The variant to generate.
    pub variant: ModelVariant,
}

/// Coarse progress of the current upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// No file.
    Empty,
    /// A file was accepted and is being decoded.
    Decoding,
    /// The image is published; `done` of `total` variants are generated.
    Processing {
        /// Variants with a result.
        done: usize,
        /// Variants in total.
        total: usize,
    },
    /// Every variant has a result.
    Ready,
}

#[derive(Debug, Clone)]
struct Current {
    token: Generation,
    image: Rc<UploadedImage>,
    results: VariantResults,
}

/// All page state: configuration, the published upload and its results,
/// the view selection, and the last error.
#[derive(Debug, Clone)]
pub struct Session {
    config: PipelineConfig,
    latest: Generation,
    decoding: Option<Generation>,
    current: Option<Current>,
    view: ViewState,
    notice: Option<PipelineError>,
}

impl Session {
    /// A fresh session with no file.
    #[must_use]
    pub fn new(config: PipelineConfig) -> Self {
        let view = ViewState::with_opacity(Opacity::new(config.default_opacity));
        Self {
            config,
            latest: Generation::default(),
            decoding: None,
            current: None,
            view,
            notice: None,
        }
    }

    /// Apply one action.
    pub fn dispatch(&mut self, action: Action) -> Outcome {
        match action {
            Action::Submit(meta) => self.submit(&meta),
            Action::ImageDecoded { token, image } => self.publish_image(token, image),
            Action::DecodeFailed { token, error } => self.decode_failed(token, error),
            Action::SegmentationDone { token, result } => self.publish_result(token, result),
            Action::Report(error) => {
                tracing::warn!(%error, "reported");
                self.notice = Some(error);
                Outcome::Updated
            }
            Action::DismissNotice => {
                self.notice = None;
                Outcome::Updated
            }
            Action::RemoveFile => {
                self.latest = self.latest.next();
                self.decoding = None;
                self.current = None;
                self.view = ViewState::with_opacity(Opacity::new(self.config.default_opacity));
                Outcome::Updated
            }
            Action::SetContent(content) => {
                self.view.content = content;
                Outcome::Updated
            }
            Action::SelectVariant(variant) => {
                self.view.selected = variant;
                self.view.layout = Layout::Single;
                Outcome::Updated
            }
            Action::Compare => {
                self.view.layout = Layout::Compare;
                Outcome::Updated
            }
            Action::SetOpacity(opacity) => {
                self.view.opacity = opacity;
                Outcome::Updated
            }
        }
    }

    fn submit(&mut self, meta: &FileMeta) -> Outcome {
        match intake::validate(meta, &self.config) {
            Ok(()) => {
                self.latest = self.latest.next();
                self.decoding = Some(self.latest);
                self.notice = None;
                tracing::debug!(name = %meta.name, token = self.latest.0, "accepted upload");
                Outcome::Accepted(self.latest)
            }
            Err(error) => {
                tracing::debug!(name = %meta.name, %error, "rejected upload");
                self.notice = Some(error);
                Outcome::Rejected
            }
        }
    }

    fn publish_image(&mut self, token: Generation, image: UploadedImage) -> Outcome {
        if self.decoding != Some(token) {
            tracing::debug!(token = token.0, "discarding stale decode");
            return Outcome::Discarded;
        }
        self.decoding = None;
        self.current = Some(Current {
            token,
            image: Rc::new(image),
            results: VariantResults::new(),
        });
        Outcome::Published
    }

    fn decode_failed(&mut self, token: Generation, error: PipelineError) -> Outcome {
        if self.decoding != Some(token) {
            return Outcome::Discarded;
        }
        self.decoding = None;
        self.notice = Some(error);
        Outcome::Rejected
    }

    fn publish_result(&mut self, token: Generation, result: SegmentationResult) -> Outcome {
        match self.current.as_mut() {
            Some(current) if current.token == token => {
                current.results.insert(result);
                Outcome::Published
            }
            _ => {
                tracing::debug!(
                    token = token.0,
                    variant = %result.variant(),
                    "discarding stale segmentation result"
                );
                Outcome::Discarded
            }
        }
    }

    /// The configuration the session was created with.
    #[must_use]
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// The current view selection.
    #[must_use]
    pub const fn view(&self) -> &ViewState {
        &self.view
    }

    /// The published upload, if any.
    #[must_use]
    pub fn image(&self) -> Option<&Rc<UploadedImage>> {
        self.current.as_ref().map(|c| &c.image)
    }

    /// Token of the published upload, if any.
    #[must_use]
    pub fn current_token(&self) -> Option<Generation> {
        self.current.as_ref().map(|c| c.token)
    }

    /// Results generated so far for the published upload.
    #[must_use]
    pub fn results(&self) -> Option<&VariantResults> {
        self.current.as_ref().map(|c| &c.results)
    }

    /// The last error to show the user.
    #[must_use]
    pub const fn notice(&self) -> Option<&PipelineError> {
        self.notice.as_ref()
    }

    /// The next segmentation to run: variant A first, then B once A's
    /// result is stored. `None` when nothing is published or all
    /// variants are done.
    #[must_use]
    pub fn next_job(&self) -> Option<Job> {
        let current = self.current.as_ref()?;
        let variant = current.results.first_missing()?;
        Some(Job {
            token: current.token,
            image: Rc::clone(&current.image),
            variant,
        })
    }

    /// Coarse progress for the UI.
    #[must_use]
    pub fn status(&self) -> Status {
        if self.decoding.is_some() {
            return Status::Decoding;
        }
        match &self.current {
            None => Status::Empty,
            Some(current) if current.results.is_complete() => Status::Ready,
            Some(current) => Status::Processing {
                done: current.results.len(),
                total: ModelVariant::ALL.len(),
            },
        }
    }

    /// Compose the current view, if an image is published.
    #[must_use]
    pub fn compose(&self) -> Option<Composition> {
        self.current
            .as_ref()
            .map(|c| compose(&self.view, &c.image, &c.results))
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::segment::generate;
    use crate::types::RgbaImage;

    fn meta(name: &str, media_type: &str, size: u64) -> FileMeta {
        FileMeta {
            name: name.to_string(),
            media_type: media_type.to_string(),
            size,
        }
    }

    fn image(name: &str, w: u32, h: u32, gray: u8) -> UploadedImage {
        UploadedImage::new(
            meta(name, "image/png", 100),
            Vec::new(),
            RgbaImage::from_pixel(w, h, image::Rgba([gray, gray, gray, 255])),
        )
    }

    fn accept(session: &mut Session, name: &str) -> Generation {
        match session.dispatch(Action::Submit(meta(name, "image/png", 100))) {
            Outcome::Accepted(token) => token,
            other => panic!("expected Accepted, got {other:?}"),
        }
    }

    /// Submit and publish an image; return its token.
    fn upload(session: &mut Session, img: UploadedImage) -> Generation {
        let token = accept(session, &img.meta().name.clone());
        assert_eq!(
            session.dispatch(Action::ImageDecoded { token, image: img }),
            Outcome::Published
        );
        token
    }

    /// Run every pending job synchronously.
    fn drain_jobs(session: &mut Session) {
        while let Some(job) = session.next_job() {
            let result = generate(&job.image, job.variant);
            assert_eq!(
                session.dispatch(Action::SegmentationDone {
                    token: job.token,
                    result
                }),
                Outcome::Published
            );
        }
    }

    #[test]
    fn new_session_is_empty() {
        let session = Session::default();
        assert_eq!(session.status(), Status::Empty);
        assert!(session.image().is_none());
        assert!(session.compose().is_none());
        assert!(session.next_job().is_none());
    }

    #[test]
    fn rejected_upload_leaves_state_unchanged() {
        let mut session = Session::default();
        upload(&mut session, image("first.png", 2, 2, 0));
        drain_jobs(&mut session);
        let token_before = session.current_token();

        let outcome = session.dispatch(Action::Submit(meta("huge.png", "image/png", 6 * 1024 * 1024)));
        assert_eq!(outcome, Outcome::Rejected);
        assert!(matches!(
            session.notice(),
            Some(PipelineError::FileTooLarge { .. })
        ));
        assert_eq!(session.current_token(), token_before);
        assert_eq!(session.image().unwrap().meta().name, "first.png");
        assert_eq!(session.status(), Status::Ready);

        let outcome = session.dispatch(Action::Submit(meta("doc.txt", "text/plain", 10)));
        assert_eq!(outcome, Outcome::Rejected);
        assert!(matches!(
            session.notice(),
            Some(PipelineError::InvalidFileType { .. })
        ));
        assert_eq!(session.image().unwrap().meta().name, "first.png");
    }

    #[test]
    fn decode_failure_leaves_previous_image() {
        let mut session = Session::default();
        upload(&mut session, image("first.png", 2, 2, 0));
        let token = accept(&mut session, "broken.png");
        assert_eq!(session.status(), Status::Decoding);

        let outcome = session.dispatch(Action::DecodeFailed {
            token,
            error: PipelineError::DecodeFailure("corrupt".into()),
        });
        assert_eq!(outcome, Outcome::Rejected);
        assert_eq!(session.image().unwrap().meta().name, "first.png");
        assert!(matches!(
            session.notice(),
            Some(PipelineError::DecodeFailure(_))
        ));
    }

    #[test]
    fn jobs_run_a_then_b() {
        let mut session = Session::default();
        let token = upload(&mut session, image("a.png", 2, 2, 0));
        assert_eq!(
            session.status(),
            Status::Processing { done: 0, total: 2 }
        );

        let job = session.next_job().unwrap();
        assert_eq!(job.variant, ModelVariant::BaseUnet);
        assert_eq!(job.token, token);
        // Asking again before A is stored still yields A, never B.
        assert_eq!(session.next_job().unwrap().variant, ModelVariant::BaseUnet);

        let result = generate(&job.image, job.variant);
        let _ = session.dispatch(Action::SegmentationDone { token, result });
        assert_eq!(
            session.status(),
            Status::Processing { done: 1, total: 2 }
        );
        assert_eq!(session.next_job().unwrap().variant, ModelVariant::CbamNet);

        drain_jobs(&mut session);
        assert_eq!(session.status(), Status::Ready);
        assert!(session.next_job().is_none());
    }

    #[test]
    fn replacing_image_discards_pending_variant_b() {
        let mut session = Session::default();
        let old_token = upload(&mut session, image("old.png", 2, 2, 0));

        // A finishes, B starts.
        let job_a = session.next_job().unwrap();
        let _ = session.dispatch(Action::SegmentationDone {
            token: old_token,
            result: generate(&job_a.image, job_a.variant),
        });
        let job_b = session.next_job().unwrap();
        assert_eq!(job_b.variant, ModelVariant::CbamNet);

        // A new image replaces the old one while B is in flight.
        let new_token = upload(&mut session, image("new.png", 3, 3, 255));
        assert_ne!(new_token, old_token);

        // B for the old image resolves late.
        let stale = generate(&job_b.image, job_b.variant);
        let outcome = session.dispatch(Action::SegmentationDone {
            token: job_b.token,
            result: stale,
        });
        assert_eq!(outcome, Outcome::Discarded);

        let results = session.results().unwrap();
        assert!(results.is_empty(), "new image must start with no results");
        assert_eq!(session.image().unwrap().meta().name, "new.png");

        // The new image's own jobs proceed normally.
        drain_jobs(&mut session);
        let results = session.results().unwrap();
        for variant in ModelVariant::ALL {
            let r = results.get(variant).unwrap();
            assert_eq!(r.dimensions(), session.image().unwrap().dimensions());
            for p in r.pixels().pixels() {
                assert_eq!(p.0, [255, 255, 255, 255]);
            }
        }
    }

    #[test]
    fn slower_earlier_decode_is_discarded() {
        let mut session = Session::default();
        let first = accept(&mut session, "slow.png");
        let second = accept(&mut session, "fast.png");

        let outcome = session.dispatch(Action::ImageDecoded {
            token: second,
            image: image("fast.png", 1, 1, 0),
        });
        assert_eq!(outcome, Outcome::Published);

        let outcome = session.dispatch(Action::ImageDecoded {
            token: first,
            image: image("slow.png", 1, 1, 0),
        });
        assert_eq!(outcome, Outcome::Discarded);
        assert_eq!(session.image().unwrap().meta().name, "fast.png");
    }

    #[test]
    fn remove_file_resets_and_invalidates() {
        let config = PipelineConfig {
            default_opacity: 70,
            ..PipelineConfig::default()
        };
        let mut session = Session::new(config);
        let token = upload(&mut session, image("a.png", 2, 2, 0));
        let job = session.next_job().unwrap();
        let _ = session.dispatch(Action::Compare);
        let _ = session.dispatch(Action::SetContent(ContentMode::Overlay));
        let _ = session.dispatch(Action::SetOpacity(Opacity::new(10)));

        assert_eq!(session.dispatch(Action::RemoveFile), Outcome::Updated);
        assert_eq!(session.status(), Status::Empty);
        assert_eq!(*session.view(), ViewState::with_opacity(Opacity::new(70)));

        let outcome = session.dispatch(Action::SegmentationDone {
            token,
            result: generate(&job.image, job.variant),
        });
        assert_eq!(outcome, Outcome::Discarded);
        assert!(session.results().is_none());
    }

    #[test]
    fn remove_file_invalidates_pending_decode() {
        let mut session = Session::default();
        let token = accept(&mut session, "a.png");
        let _ = session.dispatch(Action::RemoveFile);
        let outcome = session.dispatch(Action::ImageDecoded {
            token,
            image: image("a.png", 1, 1, 0),
        });
        assert_eq!(outcome, Outcome::Discarded);
        assert_eq!(session.status(), Status::Empty);
    }

    #[test]
    fn view_actions() {
        let mut session = Session::default();
        let _ = session.dispatch(Action::Compare);
        assert_eq!(session.view().layout, Layout::Compare);

        let _ = session.dispatch(Action::SelectVariant(ModelVariant::CbamNet));
        assert_eq!(session.view().layout, Layout::Single);
        assert_eq!(session.view().selected, ModelVariant::CbamNet);

        let _ = session.dispatch(Action::SetContent(ContentMode::Segmented));
        assert_eq!(session.view().content, ContentMode::Segmented);

        let _ = session.dispatch(Action::SetOpacity(Opacity::new(200)));
        assert_eq!(session.view().opacity, Opacity::MAX);
    }

    #[test]
    fn view_survives_new_upload() {
        let mut session = Session::default();
        let _ = session.dispatch(Action::SetContent(ContentMode::Overlay));
        upload(&mut session, image("a.png", 1, 1, 0));
        upload(&mut session, image("b.png", 1, 1, 0));
        assert_eq!(session.view().content, ContentMode::Overlay);
    }

    #[test]
    fn compose_pending_until_results_arrive() {
        let mut session = Session::default();
        upload(&mut session, image("a.png", 2, 2, 0));
        let _ = session.dispatch(Action::SetContent(ContentMode::Segmented));
        assert!(!session.compose().unwrap().is_ready());
        drain_jobs(&mut session);
        let composition = session.compose().unwrap();
        assert!(composition.is_ready());
        assert_eq!(
            composition.slots[0].frame.image().unwrap().get_pixel(0, 0).0,
            [255, 0, 0, 255]
        );
    }

    #[test]
    fn report_and_dismiss_notice() {
        let mut session = Session::default();
        let _ = session.dispatch(Action::Report(PipelineError::RemoteApiFailure(
            "503".into(),
        )));
        assert!(matches!(
            session.notice(),
            Some(PipelineError::RemoteApiFailure(_))
        ));
        let _ = session.dispatch(Action::DismissNotice);
        assert!(session.notice().is_none());
    }

    #[test]
    fn accepted_submit_clears_old_notice() {
        let mut session = Session::default();
        let _ = session.dispatch(Action::Submit(meta("x.txt", "text/plain", 1)));
        assert!(session.notice().is_some());
        accept(&mut session, "ok.png");
        assert!(session.notice().is_none());
    }
}
