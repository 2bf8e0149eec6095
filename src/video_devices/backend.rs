//! Directory listing and per-node OS calls, behind traits so tests can script them.

use nix::errno::Errno;
use std::{
    ffi::{OsStr, OsString},
    io,
    os::unix::ffi::OsStrExt,
    path::Path
};
use super::{Capability, DeviceNumber, MediaInfo, TopologyInterface};

pub trait DeviceLister {
    // Directory order, unsorted
    fn entries(&self, dir: &Path) -> io::Result<Vec<OsString>>;
}

/// `Fd` owns the open node; dropping it must close the node.
pub trait DeviceIo {
    type Fd;

    // O_RDWR | O_NONBLOCK
    fn open_video(&self, path: &Path) -> Result<Self::Fd, Errno>;

    // O_RDWR
    fn open_media(&self, path: &Path) -> Result<Self::Fd, Errno>;

    fn query_capability(&self, fd: &Self::Fd) -> Result<Capability, Errno>;

    fn query_media_info(&self, fd: &Self::Fd) -> Result<MediaInfo, Errno>;

    fn device_number(&self, fd: &Self::Fd) -> Result<DeviceNumber, Errno>;

    fn interface_count(&self, fd: &Self::Fd) -> Result<u32, Errno>;

    /// Returns how many records were written.
    fn fill_interfaces(&self, fd: &Self::Fd, interfaces: &mut [TopologyInterface]) -> Result<usize, Errno>;
}

pub(crate) fn has_prefix(name: &OsStr, prefix: &str) -> bool {
    name.as_bytes().starts_with(prefix.as_bytes())
}
