//! Rendering pipeline: frames, pagination, and in-place redraw.

pub mod frame;
pub mod pagination;
pub mod redraw;

pub use frame::Frame;
pub use pagination::{page_window, DEFAULT_PAGE_SIZE};
pub use redraw::RedrawController;
