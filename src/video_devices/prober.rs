use std::path::{Path, PathBuf};
use super::{
    backend::{has_prefix, DeviceIo, DeviceLister},
    linux::{Dev, Kernel},
    Error,
    Result,
    VideoDevice
};

pub const VIDEO_PREFIX: &str = "video";
pub const DEFAULT_DEV_DIR: &str = "/dev";

/// Finds the first video node that a caller-supplied predicate accepts.
///
/// ```no_run
/// use v4l2_pair::video_devices::VideoDeviceProber;
///
/// let camera = VideoDeviceProber::default().probe(|dev| dev.capability().is_capture())?;
/// println!("{}", camera.path().display());
/// # Ok::<(), v4l2_pair::video_devices::Error>(())
/// ```
pub struct VideoDeviceProber<L = Dev, I = Kernel> {
    dir: PathBuf,
    lister: L,
    io: I
}

impl VideoDeviceProber {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self::with_backend(dir, Dev, Kernel)
    }
}

impl Default for VideoDeviceProber {
    fn default() -> Self {
        Self::new(DEFAULT_DEV_DIR)
    }
}

impl<L: DeviceLister, I: DeviceIo> VideoDeviceProber<L, I> {
    pub fn with_backend<P: Into<PathBuf>>(dir: P, lister: L, io: I) -> Self {
        VideoDeviceProber { dir: dir.into(), lister, io }
    }

    /// Opens `video*` entries in directory order and returns the first one
    /// `accept` says yes to, with its descriptor still open.
    ///
    /// Entries that fail to open or to answer `VIDIOC_QUERYCAP` are logged and
    /// skipped. Rejected entries are closed before the next one is tried. The
    /// directory order is whatever the OS returns; nothing is sorted.
    ///
    /// `accept` may be called any number of times, including zero.
    pub fn probe<F>(&self, mut accept: F) -> Result<VideoDevice<I::Fd>>
    where
        F: FnMut(&VideoDevice<I::Fd>) -> bool
    {
        let entries = self.lister.entries(&self.dir)
            .map_err(|source| Error::DirectoryUnreadable { dir: self.dir.clone(), source })?;

        for name in entries.iter().filter(|name| has_prefix(name, VIDEO_PREFIX)) {
            let path = self.dir.join(name);
            log::info!("Probing device {}", path.display());

            let device = match self.open(&path) {
                Ok(device) => device,
                Err(err) => {
                    log::warn!("{err}");
                    continue;
                }
            };

            if accept(&device) {
                log::info!("Using video device {}", device.path().display());
                return Ok(device);
            }
            log::debug!("{} ({}) rejected", device.path().display(), device.capability().card);
        }

        log::error!("Could not find a valid video device");
        Err(Error::NoSuitableDevice { dir: self.dir.clone() })
    }

    /// Opens a single video node and queries its capabilities.
    pub fn open(&self, path: &Path) -> Result<VideoDevice<I::Fd>> {
        let fd = self.io.open_video(path)
            .map_err(|source| Error::OsOpenFailed { path: path.to_path_buf(), source })?;
        let capability = self.io.query_capability(&fd)
            .map_err(|source| Error::CapabilityQueryFailed { path: path.to_path_buf(), source })?;
        Ok(VideoDevice::new(path.to_path_buf(), fd, capability))
    }
}
