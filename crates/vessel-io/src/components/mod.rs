//! Dioxus UI components for the vessel showcase.
//!
//! Provides the upload drop zone, file info card, view controls,
//! preview frame, static charts, and the error notice.

mod charts;
mod file_info;
mod notice;
mod preview;
mod upload;
mod view_controls;

pub use charts::Charts;
pub use file_info::FileInfo;
pub use notice::Notice;
pub use preview::Preview;
pub use upload::{FileUpload, PickedFile};
pub use view_controls::ViewControls;
