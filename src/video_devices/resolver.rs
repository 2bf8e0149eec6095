use std::path::{Path, PathBuf};
use super::{
    backend::{has_prefix, DeviceIo, DeviceLister},
    linux::{Dev, Kernel},
    prober::DEFAULT_DEV_DIR,
    topology::read_interfaces,
    DeviceNumber,
    Error,
    MediaDevice,
    Result,
    TopologyInterface,
    VideoDevice
};

pub const MEDIA_PREFIX: &str = "media";

/// Finds the media controller that publishes a given video node.
///
/// Controllers are matched on the device number of the video node, never on
/// names. If more than one controller claims the same number (a driver bug),
/// the first one in directory order wins, and that order is up to the OS.
pub struct MediaDeviceResolver<L = Dev, I = Kernel> {
    dir: PathBuf,
    lister: L,
    io: I
}

impl MediaDeviceResolver {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self::with_backend(dir, Dev, Kernel)
    }
}

impl Default for MediaDeviceResolver {
    fn default() -> Self {
        Self::new(DEFAULT_DEV_DIR)
    }
}

impl<L: DeviceLister, I: DeviceIo> MediaDeviceResolver<L, I> {
    pub fn with_backend<P: Into<PathBuf>>(dir: P, lister: L, io: I) -> Self {
        MediaDeviceResolver { dir: dir.into(), lister, io }
    }

    /// Device number of the node behind `video`.
    pub fn device_number(&self, video: &VideoDevice<I::Fd>) -> Result<DeviceNumber> {
        self.io.device_number(video.fd())
            .map_err(|source| Error::IdentityQueryFailed { path: video.path().to_path_buf(), source })
    }

    /// Returns the first `media*` controller whose topology has a video
    /// interface with the device number of `video`, left open.
    ///
    /// Failing to read the device number of `video`, the directory, or to
    /// allocate the interface list aborts the search. Controllers that fail to
    /// open or to answer a query, and controllers without interfaces, are
    /// logged and skipped.
    pub fn resolve(&self, video: &VideoDevice<I::Fd>) -> Result<MediaDevice<I::Fd>> {
        let devnum = self.device_number(video)?;
        log::info!("video device number {devnum}");

        let entries = self.lister.entries(&self.dir)
            .map_err(|source| Error::DirectoryUnreadable { dir: self.dir.clone(), source })?;

        for name in entries.iter().filter(|name| has_prefix(name, MEDIA_PREFIX)) {
            let path = self.dir.join(name);
            log::info!("Probing device {}", path.display());

            let media = match self.open(&path) {
                Ok(media) => media,
                Err(err) => {
                    log::warn!("{err}");
                    continue;
                }
            };

            match self.publishes(&media, devnum) {
                Ok(true) => {
                    log::info!("Using media device {}", media.path().display());
                    return Ok(media);
                }
                Ok(false) => log::debug!("{} does not publish {devnum}", media.path().display()),
                Err(err @ Error::AllocationFailed { .. }) => return Err(err),
                Err(err) => log::warn!("{err}")
            }
        }

        log::error!("Could not find a valid media device");
        Err(Error::NoMatchingMediaDevice { dir: self.dir.clone(), devnum })
    }

    /// Opens a single media node and queries its device info.
    pub fn open(&self, path: &Path) -> Result<MediaDevice<I::Fd>> {
        let fd = self.io.open_media(path)
            .map_err(|source| Error::OsOpenFailed { path: path.to_path_buf(), source })?;
        let info = self.io.query_media_info(&fd)
            .map_err(|source| Error::MediaInfoQueryFailed { path: path.to_path_buf(), source })?;
        Ok(MediaDevice::new(path.to_path_buf(), fd, info))
    }

    /// The video interfaces currently published by `media`.
    pub fn video_interfaces(&self, media: &MediaDevice<I::Fd>) -> Result<Vec<TopologyInterface>> {
        let mut interfaces = read_interfaces(&self.io, media.path(), media.fd())?;
        interfaces.retain(TopologyInterface::is_video);
        Ok(interfaces)
    }

    fn publishes(&self, media: &MediaDevice<I::Fd>, devnum: DeviceNumber) -> Result<bool> {
        let interfaces = read_interfaces(&self.io, media.path(), media.fd())?;
        Ok(interfaces
            .iter()
            .filter(|intf| intf.is_video())
            .inspect(|intf| log::info!("media device number {}", intf.devnode()))
            .any(|intf| intf.devnode() == devnum))
    }
}
