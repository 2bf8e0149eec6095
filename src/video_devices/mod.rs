//! Discovery of V4L2 video nodes and the media controllers that publish them.
//!
//! [`VideoDeviceProber`] walks `video*` entries and keeps the first node an
//! acceptance predicate likes. [`MediaDeviceResolver`] takes such a node and
//! walks `media*` entries until one controller's topology lists a video
//! interface with the node's device number. The two never call each other;
//! the caller chains them:
//!
//! ```no_run
//! use v4l2_pair::video_devices::{MediaDeviceResolver, VideoDeviceProber};
//!
//! let decoder = VideoDeviceProber::default().probe(|dev| dev.capability().is_m2m())?;
//! let media = MediaDeviceResolver::default().resolve(&decoder)?;
//! println!("{} -> {}", decoder.path().display(), media.path().display());
//! # Ok::<(), v4l2_pair::video_devices::Error>(())
//! ```

mod backend;
mod device;
mod error;
#[cfg(target_os = "linux")]
mod linux;
mod prober;
mod resolver;
mod topology;

#[cfg(test)]
mod fake;

pub use backend::{DeviceIo, DeviceLister};
pub use device::{
    kernel_version, BufType, Capability, DeviceNumber, FourCc, MediaDevice, MediaInfo, PixelFormat,
    VideoDevice
};
pub use error::{Error, Result};
#[cfg(target_os = "linux")]
pub use linux::{Dev, Kernel};
pub use prober::{VideoDeviceProber, DEFAULT_DEV_DIR, VIDEO_PREFIX};
pub use resolver::{MediaDeviceResolver, MEDIA_PREFIX};
pub use topology::{InterfaceType, TopologyInterface};
