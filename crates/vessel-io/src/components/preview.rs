//! Preview frame: one slot in Single layout, two side by side in
//! Compare layout.
//!
//! Each ready slot is shown through a PNG Blob URL. The URLs for the
//! composition on screen are cached so re-renders that keep the same
//! composition (progress text changes) reuse them, and they are revoked
//! once the composition is replaced, the image is removed, or the
//! component is destroyed.

use std::rc::Rc;

use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::{LdImage, LdLoader};
use vessel_pipeline::{Composition, Frame, Layout};

use crate::raster;

/// Props for the [`Preview`] component.
#[derive(Props, Clone)]
pub struct PreviewProps {
    /// Composed slots, or `None` when no image is published.
    composition: Option<Rc<Composition>>,
    /// One caption per slot.
    titles: Vec<&'static str>,
    /// Progress text shown over the frame while work is running.
    progress: Option<String>,
}

impl PartialEq for PreviewProps {
    fn eq(&self, other: &Self) -> bool {
        let same_composition = match (&self.composition, &other.composition) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        same_composition && self.titles == other.titles && self.progress == other.progress
    }
}

/// Blob URLs for the slots of the composition currently on screen.
///
/// Holding the composition keeps its allocation alive, so `Rc::ptr_eq`
/// can't match a newer composition that reused the address.
#[derive(Default)]
struct SlotUrls {
    source: Option<Rc<Composition>>,
    urls: Vec<Option<String>>,
}

impl SlotUrls {
    /// Whether the cached URLs were made for `composition`.
    fn is_for(&self, composition: &Rc<Composition>) -> bool {
        self.source
            .as_ref()
            .is_some_and(|source| Rc::ptr_eq(source, composition))
    }

    /// URL for slot `index`, if that slot has one.
    fn get(&self, index: usize) -> Option<&str> {
        self.urls.get(index).and_then(Option::as_deref)
    }

    /// Cache `urls` for `composition`, returning the URLs it replaces.
    fn replace(&mut self, composition: Rc<Composition>, urls: Vec<Option<String>>) -> Vec<String> {
        self.source = Some(composition);
        std::mem::replace(&mut self.urls, urls)
            .into_iter()
            .flatten()
            .collect()
    }

    /// Forget everything, returning the URLs to revoke.
    fn clear(&mut self) -> Vec<String> {
        self.source = None;
        std::mem::take(&mut self.urls).into_iter().flatten().collect()
    }

    fn is_empty(&self) -> bool {
        self.source.is_none() && self.urls.is_empty()
    }
}

fn revoke_all(urls: Vec<String>) {
    for url in urls {
        raster::revoke_blob_url(&url);
    }
}

/// Encode a ready slot to a Blob URL. Pending slots and encode failures
/// have none.
fn slot_url(frame: &Frame) -> Option<String> {
    let Frame::Ready(image) = frame else {
        return None;
    };
    match raster::rgba_image_to_blob_url(image) {
        Ok(url) => Some(url),
        Err(e) => {
            web_sys::console::warn_1(&format!("preview encode failed: {e}").into());
            None
        }
    }
}

/// Renders the composed slots as PNG Blob URLs.
#[component]
pub fn Preview(props: PreviewProps) -> Element {
    let mut slot_urls: Signal<SlotUrls> = use_signal(SlotUrls::default);

    use_drop(move || {
        for url in slot_urls.peek().urls.iter().flatten() {
            raster::revoke_blob_url(url);
        }
    });

    let Some(composition) = props.composition.as_ref() else {
        if !slot_urls.peek().is_empty() {
            revoke_all(slot_urls.write().clear());
        }
        return rsx! {
            div { class: "relative flex flex-col items-center justify-center gap-2 aspect-[4/3] rounded-xl bg-[var(--preview-bg)] text-[var(--muted)]",
                Icon { icon: LdImage, width: 40, height: 40 }
                p { class: "text-sm", "Upload an image to see the segmentation preview" }
                {render_progress(props.progress.as_deref())}
            }
        };
    };

    if !slot_urls.peek().is_for(composition) {
        let urls = composition
            .slots
            .iter()
            .map(|slot| slot_url(&slot.frame))
            .collect();
        revoke_all(slot_urls.write().replace(Rc::clone(composition), urls));
    }

    let frames: Vec<Element> = {
        let cached = slot_urls.peek();
        composition
            .slots
            .iter()
            .enumerate()
            .map(|(i, slot)| {
                render_frame(
                    &slot.frame,
                    cached.get(i),
                    props.titles.get(i).copied().unwrap_or_default(),
                )
            })
            .collect()
    };

    let grid = match composition.layout {
        Layout::Single => "grid-cols-1",
        Layout::Compare => "grid-cols-1 md:grid-cols-2",
    };

    rsx! {
        div { class: "relative grid {grid} gap-4",
            for (i, frame) in frames.into_iter().enumerate() {
                figure { class: "flex flex-col gap-2",
                    div { class: "aspect-[4/3] rounded-xl overflow-hidden bg-[var(--preview-bg)] flex items-center justify-center",
                        {frame}
                    }
                    if let Some(title) = props.titles.get(i) {
                        figcaption { class: "text-sm text-center text-[var(--text-secondary)]",
                            "{title}"
                        }
                    }
                }
            }
            {render_progress(props.progress.as_deref())}
        }
    }
}

/// Render one slot's pixels, or a placeholder while its result is pending.
fn render_frame(frame: &Frame, url: Option<&str>, title: &str) -> Element {
    match (frame, url) {
        (Frame::Ready(_), Some(url)) => {
            let url = url.to_string();
            rsx! {
                img {
                    src: "{url}",
                    class: "w-full h-full object-contain",
                    alt: "{title} preview",
                }
            }
        }
        (Frame::Ready(_), None) => rsx! {
            p { class: "text-sm text-[var(--text-error)]", "Could not render preview" }
        },
        (Frame::Pending, _) => rsx! {
            div { class: "flex flex-col items-center gap-2 text-[var(--muted)]",
                div { class: "animate-spin",
                    Icon { icon: LdLoader, width: 28, height: 28 }
                }
                p { class: "text-sm", "Generating..." }
            }
        },
    }
}

fn render_progress(progress: Option<&str>) -> Element {
    let Some(text) = progress else {
        return rsx! {};
    };
    rsx! {
        div { class: "absolute top-2 right-2 px-2 py-1 rounded-md text-xs bg-[var(--surface)] text-[var(--text-secondary)] shadow-sm",
            "{text}"
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use vessel_pipeline::{ContentMode, ModelVariant, Slot};

    use super::*;

    fn composition(layout: Layout) -> Rc<Composition> {
        let slots = match layout {
            Layout::Single => vec![ModelVariant::BaseUnet],
            Layout::Compare => ModelVariant::ALL.to_vec(),
        }
        .into_iter()
        .map(|variant| Slot {
            variant,
            frame: Frame::Pending,
        })
        .collect();
        Rc::new(Composition {
            layout,
            content: ContentMode::Overlay,
            slots,
        })
    }

    fn urls(names: &[Option<&str>]) -> Vec<Option<String>> {
        names.iter().map(|n| n.map(ToString::to_string)).collect()
    }

    #[test]
    fn starts_empty() {
        let cache = SlotUrls::default();
        assert!(cache.is_empty());
        assert!(!cache.is_for(&composition(Layout::Single)));
        assert_eq!(cache.get(0), None);
    }

    #[test]
    fn same_composition_keeps_its_urls() {
        let first = composition(Layout::Compare);
        let mut cache = SlotUrls::default();
        let revoked = cache.replace(Rc::clone(&first), urls(&[Some("blob:a"), Some("blob:b")]));
        assert!(revoked.is_empty());
        assert!(cache.is_for(&first));
        assert!(cache.is_for(&Rc::clone(&first)));
        assert_eq!(cache.get(1), Some("blob:b"));
    }

    #[test]
    fn equal_but_distinct_composition_is_not_cached() {
        let first = composition(Layout::Single);
        let twin = Rc::new((*first).clone());
        let mut cache = SlotUrls::default();
        let _ = cache.replace(first, urls(&[Some("blob:a")]));
        assert!(!cache.is_for(&twin));
    }

    #[test]
    fn replacing_returns_every_previous_url() {
        let mut cache = SlotUrls::default();
        let _ = cache.replace(
            composition(Layout::Compare),
            urls(&[Some("blob:a"), Some("blob:b")]),
        );

        // Compare -> Single: both old slot URLs go, including the one
        // whose slot no longer exists.
        let single = composition(Layout::Single);
        let revoked = cache.replace(Rc::clone(&single), urls(&[Some("blob:c")]));
        assert_eq!(revoked, vec!["blob:a".to_string(), "blob:b".to_string()]);
        assert_eq!(cache.get(0), Some("blob:c"));
        assert_eq!(cache.get(1), None);
    }

    #[test]
    fn pending_slots_have_nothing_to_revoke() {
        let mut cache = SlotUrls::default();
        let _ = cache.replace(composition(Layout::Compare), urls(&[Some("blob:a"), None]));
        let revoked = cache.replace(composition(Layout::Compare), urls(&[None, None]));
        assert_eq!(revoked, vec!["blob:a".to_string()]);
    }

    #[test]
    fn clear_returns_everything_and_forgets_the_source() {
        let single = composition(Layout::Single);
        let mut cache = SlotUrls::default();
        let _ = cache.replace(Rc::clone(&single), urls(&[Some("blob:a")]));
        assert_eq!(cache.clear(), vec!["blob:a".to_string()]);
        assert!(cache.is_empty());
        assert!(!cache.is_for(&single));
        assert!(cache.clear().is_empty());
    }
}
