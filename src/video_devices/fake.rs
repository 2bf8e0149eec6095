//! In-memory device tree for tests.

use nix::errno::Errno;
use std::{
    cell::Cell,
    collections::HashMap,
    ffi::OsString,
    io,
    path::{Path, PathBuf},
    rc::Rc
};
use super::{
    backend::{DeviceIo, DeviceLister},
    Capability,
    DeviceNumber,
    MediaInfo,
    TopologyInterface
};

/// Directory listing that yields a fixed set of names in the given order.
pub struct FakeLister {
    entries: Option<Vec<OsString>>
}

impl FakeLister {
    pub fn new(entries: &[&str]) -> Self {
        FakeLister {
            entries: Some(entries.iter().map(OsString::from).collect())
        }
    }

    /// A directory that cannot be read.
    pub fn unreadable() -> Self {
        FakeLister { entries: None }
    }
}

impl DeviceLister for FakeLister {
    fn entries(&self, _dir: &Path) -> io::Result<Vec<OsString>> {
        self.entries
            .clone()
            .ok_or_else(|| io::Error::from(io::ErrorKind::PermissionDenied))
    }
}

enum FakeNode {
    Video { capability: Option<Capability>, devnum: Option<DeviceNumber> },
    Media { info: Option<MediaInfo>, interfaces: Option<Vec<TopologyInterface>>, count: Option<u32> }
}

/// Scripted nodes keyed by path. Paths without a node fail to open.
#[derive(Default)]
pub struct FakeIo {
    nodes: HashMap<PathBuf, FakeNode>,
    open: Rc<Cell<usize>>,
    opened: Rc<Cell<usize>>,
    topology_queries: Cell<usize>
}

/// Descriptor of a scripted node; counts itself closed when dropped.
#[derive(Debug)]
pub struct FakeFd {
    path: PathBuf,
    open: Rc<Cell<usize>>
}

impl Drop for FakeFd {
    fn drop(&mut self) {
        self.open.set(self.open.get() - 1);
    }
}

pub fn capability(driver: &str, caps: u32) -> Capability {
    Capability {
        driver: driver.to_string(),
        card: format!("{driver} card"),
        bus_info: format!("platform:{driver}"),
        version: 0x0006_0100,
        capabilities: caps | Capability::DEVICE_CAPS,
        device_caps: caps
    }
}

pub fn media_info(driver: &str) -> MediaInfo {
    MediaInfo {
        driver: driver.to_string(),
        model: format!("{driver} model"),
        bus_info: format!("platform:{driver}"),
        ..MediaInfo::default()
    }
}

impl FakeIo {
    pub fn new() -> Self {
        FakeIo::default()
    }

    pub fn video(mut self, path: &str, capability: Capability, devnum: DeviceNumber) -> Self {
        self.nodes.insert(path.into(), FakeNode::Video {
            capability: Some(capability),
            devnum: Some(devnum)
        });
        self
    }

    /// A video node that opens but rejects `VIDIOC_QUERYCAP`.
    pub fn video_without_caps(mut self, path: &str) -> Self {
        self.nodes.insert(path.into(), FakeNode::Video { capability: None, devnum: None });
        self
    }

    /// A video node whose device number cannot be read.
    pub fn video_without_devnum(mut self, path: &str, capability: Capability) -> Self {
        self.nodes.insert(path.into(), FakeNode::Video { capability: Some(capability), devnum: None });
        self
    }

    pub fn media(mut self, path: &str, interfaces: Vec<TopologyInterface>) -> Self {
        let driver = path.rsplit('/').next().unwrap_or(path);
        self.nodes.insert(path.into(), FakeNode::Media {
            info: Some(media_info(driver)),
            interfaces: Some(interfaces),
            count: None
        });
        self
    }

    /// A media node whose topology claims `count` interfaces, whatever it holds.
    pub fn media_with_count(mut self, path: &str, count: u32) -> Self {
        let driver = path.rsplit('/').next().unwrap_or(path);
        self.nodes.insert(path.into(), FakeNode::Media {
            info: Some(media_info(driver)),
            interfaces: Some(Vec::new()),
            count: Some(count)
        });
        self
    }

    /// A media node that opens but rejects `MEDIA_IOC_DEVICE_INFO`.
    pub fn media_without_info(mut self, path: &str) -> Self {
        self.nodes.insert(path.into(), FakeNode::Media { info: None, interfaces: None, count: None });
        self
    }

    /// A media node whose topology cannot be read.
    pub fn media_without_topology(mut self, path: &str) -> Self {
        let driver = path.rsplit('/').next().unwrap_or(path);
        self.nodes.insert(path.into(), FakeNode::Media {
            info: Some(media_info(driver)),
            interfaces: None,
            count: None
        });
        self
    }

    /// Descriptors currently held open.
    pub fn open_count(&self) -> usize {
        self.open.get()
    }

    /// Successful opens so far.
    pub fn opened_count(&self) -> usize {
        self.opened.get()
    }

    pub fn topology_queries(&self) -> usize {
        self.topology_queries.get()
    }

    fn open(&self, path: &Path, video: bool) -> Result<FakeFd, Errno> {
        match self.nodes.get(path) {
            Some(FakeNode::Video { .. }) if !video => Err(Errno::ENOTTY),
            Some(FakeNode::Media { .. }) if video => Err(Errno::ENOTTY),
            Some(_) => {
                self.open.set(self.open.get() + 1);
                self.opened.set(self.opened.get() + 1);
                Ok(FakeFd { path: path.to_path_buf(), open: self.open.clone() })
            }
            None => Err(Errno::ENOENT)
        }
    }

    fn topology(&self, fd: &FakeFd) -> Result<&[TopologyInterface], Errno> {
        self.topology_queries.set(self.topology_queries.get() + 1);
        match self.nodes.get(&fd.path) {
            Some(FakeNode::Media { interfaces: Some(interfaces), .. }) => Ok(interfaces.as_slice()),
            _ => Err(Errno::ENOTTY)
        }
    }
}

impl DeviceIo for FakeIo {
    type Fd = FakeFd;

    fn open_video(&self, path: &Path) -> Result<FakeFd, Errno> {
        self.open(path, true)
    }

    fn open_media(&self, path: &Path) -> Result<FakeFd, Errno> {
        self.open(path, false)
    }

    fn query_capability(&self, fd: &FakeFd) -> Result<Capability, Errno> {
        match self.nodes.get(&fd.path) {
            Some(FakeNode::Video { capability: Some(capability), .. }) => Ok(capability.clone()),
            _ => Err(Errno::ENOTTY)
        }
    }

    fn query_media_info(&self, fd: &FakeFd) -> Result<MediaInfo, Errno> {
        match self.nodes.get(&fd.path) {
            Some(FakeNode::Media { info: Some(info), .. }) => Ok(info.clone()),
            _ => Err(Errno::ENOTTY)
        }
    }

    fn device_number(&self, fd: &FakeFd) -> Result<DeviceNumber, Errno> {
        match self.nodes.get(&fd.path) {
            Some(FakeNode::Video { devnum: Some(devnum), .. }) => Ok(*devnum),
            _ => Err(Errno::EBADF)
        }
    }

    fn interface_count(&self, fd: &FakeFd) -> Result<u32, Errno> {
        let interfaces = self.topology(fd)?;
        match self.nodes.get(&fd.path) {
            Some(FakeNode::Media { count: Some(count), .. }) => Ok(*count),
            _ => Ok(interfaces.len() as u32)
        }
    }

    fn fill_interfaces(&self, fd: &FakeFd, buf: &mut [TopologyInterface]) -> Result<usize, Errno> {
        let interfaces = self.topology(fd)?;
        if buf.len() < interfaces.len() {
            return Err(Errno::ENOSPC);
        }
        buf[..interfaces.len()].copy_from_slice(interfaces);
        Ok(interfaces.len())
    }
}
