//! The Linux side of discovery: `/dev` listings, `open(2)`, the V4L2 and
//! media controller ioctls, and `fstat(2)` for device numbers.

use nix::{
    errno::Errno,
    fcntl::{open, OFlag},
    sys::stat::{fstat, major, minor, Mode}
};
use std::{
    ffi::{CStr, OsString},
    fs::read_dir,
    io,
    os::fd::{AsRawFd, FromRawFd, OwnedFd},
    path::Path
};
use super::{
    backend::{DeviceIo, DeviceLister},
    Capability,
    DeviceNumber,
    MediaInfo,
    TopologyInterface
};

mod media;
mod v4l2;

/// Lists a real device directory with `read_dir`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dev;

impl DeviceLister for Dev {
    fn entries(&self, dir: &Path) -> io::Result<Vec<OsString>> {
        let mut names = Vec::new();
        for dir_entry_result in read_dir(dir)? {
            names.push(dir_entry_result?.file_name());
        }
        Ok(names)
    }
}

/// Talks to the kernel through real descriptors.
#[derive(Debug, Clone, Copy, Default)]
pub struct Kernel;

impl Kernel {
    fn open_node(path: &Path, flags: OFlag) -> Result<OwnedFd, Errno> {
        let fd = open(path, flags | OFlag::O_CLOEXEC, Mode::empty())?;
        // SAFETY: `open` just returned this descriptor and nothing else owns it.
        Ok(unsafe { OwnedFd::from_raw_fd(fd) })
    }
}

impl DeviceIo for Kernel {
    type Fd = OwnedFd;

    fn open_video(&self, path: &Path) -> Result<OwnedFd, Errno> {
        Self::open_node(path, OFlag::O_RDWR | OFlag::O_NONBLOCK)
    }

    fn open_media(&self, path: &Path) -> Result<OwnedFd, Errno> {
        Self::open_node(path, OFlag::O_RDWR)
    }

    fn query_capability(&self, fd: &OwnedFd) -> Result<Capability, Errno> {
        v4l2::query_capabilities(fd.as_raw_fd())
    }

    fn query_media_info(&self, fd: &OwnedFd) -> Result<MediaInfo, Errno> {
        media::query_device_info(fd.as_raw_fd())
    }

    fn device_number(&self, fd: &OwnedFd) -> Result<DeviceNumber, Errno> {
        let stat = fstat(fd.as_raw_fd())?;
        Ok(DeviceNumber::new(major(stat.st_rdev) as u32, minor(stat.st_rdev) as u32))
    }

    fn interface_count(&self, fd: &OwnedFd) -> Result<u32, Errno> {
        media::query_interface_count(fd.as_raw_fd())
    }

    fn fill_interfaces(&self, fd: &OwnedFd, interfaces: &mut [TopologyInterface]) -> Result<usize, Errno> {
        media::query_interfaces(fd.as_raw_fd(), interfaces)
    }
}

/// A fixed-size, NUL-padded kernel string.
fn c_string(bytes: &[u8]) -> String {
    match CStr::from_bytes_until_nul(bytes) {
        Ok(s) => s.to_string_lossy().trim().to_string(),
        Err(_) => String::from_utf8_lossy(bytes).trim().to_string()
    }
}
