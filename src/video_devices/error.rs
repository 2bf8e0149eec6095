use nix::errno::Errno;
use std::{
    collections::TryReserveError,
    io,
    path::PathBuf
};
use thiserror::Error;
use super::DeviceNumber;

/// Errors raised while probing video nodes and resolving their media controller.
///
/// The per-node kinds (`OsOpenFailed`, the `*QueryFailed` kinds and
/// `EmptyTopology`) are logged and skipped during enumeration; they only reach
/// the caller from the single-node helpers.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot open {}: {source}", path.display())]
    OsOpenFailed {
        path: PathBuf,
        #[source]
        source: Errno
    },

    #[error("VIDIOC_QUERYCAP on {} failed: {source}", path.display())]
    CapabilityQueryFailed {
        path: PathBuf,
        #[source]
        source: Errno
    },

    #[error("format enumeration on {} failed: {source}", path.display())]
    FormatQueryFailed {
        path: PathBuf,
        #[source]
        source: Errno
    },

    #[error("MEDIA_IOC_DEVICE_INFO on {} failed: {source}", path.display())]
    MediaInfoQueryFailed {
        path: PathBuf,
        #[source]
        source: Errno
    },

    #[error("cannot stat video device {}: {source}", path.display())]
    IdentityQueryFailed {
        path: PathBuf,
        #[source]
        source: Errno
    },

    #[error("MEDIA_IOC_G_TOPOLOGY on {} failed: {source}", path.display())]
    TopologyQueryFailed {
        path: PathBuf,
        #[source]
        source: Errno
    },

    #[error("cannot allocate {count} media interfaces")]
    AllocationFailed {
        count: u32,
        #[source]
        source: TryReserveError
    },

    #[error("media device {} has no interfaces", path.display())]
    EmptyTopology { path: PathBuf },

    #[error("could not find a valid video device in {}", dir.display())]
    NoSuitableDevice { dir: PathBuf },

    #[error("could not find a media device for video device number {devnum} in {}", dir.display())]
    NoMatchingMediaDevice { dir: PathBuf, devnum: DeviceNumber },

    #[error("cannot read device directory {}: {source}", dir.display())]
    DirectoryUnreadable {
        dir: PathBuf,
        #[source]
        source: io::Error
    },

    #[error("cannot find device node for {devnum} via {}: {source}", uevent.display())]
    DevnodeLookupFailed {
        devnum: DeviceNumber,
        uevent: PathBuf,
        #[source]
        source: io::Error
    },

    #[error("invalid pixel format code {value:?}")]
    InvalidFourCc { value: String }
}

pub type Result<T> = std::result::Result<T, Error>;
