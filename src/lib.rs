//! Pairs V4L2 video nodes with the media controller that owns them.

// Media controllers only exist on Linux.
#[cfg(target_os = "linux")]
pub mod video_devices;
