//! vessel-io: Browser I/O and Dioxus component library.
//!
//! Handles file uploads, raster image encoding to Blob URLs, the remote
//! segmentation request, and provides the UI components for the vessel
//! web application.

pub mod components;
pub mod raster;
pub mod remote;

pub use components::{Charts, FileInfo, FileUpload, Notice, PickedFile, Preview, ViewControls};
