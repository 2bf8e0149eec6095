//! Interface records of a media controller's topology graph.
//!
//! Only interfaces are read; entities, pads and links are left alone.

use lazy_static::lazy_static;
use regex::Regex;
use std::{
    fs,
    io,
    mem,
    path::{Path, PathBuf}
};
use super::{backend::DeviceIo, DeviceNumber, Error, Result};

const MEDIA_INTF_T_DVB_BASE: u32 = 0x0000_0100;
const MEDIA_INTF_T_V4L_BASE: u32 = 0x0000_0200;
const MEDIA_INTF_T_ALSA_BASE: u32 = 0x0000_0300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterfaceType {
    DvbFrontend,
    DvbDemux,
    DvbDvr,
    DvbCa,
    DvbNet,
    // The only kind used for pairing
    V4lVideo,
    V4lVbi,
    V4lRadio,
    V4lSubdev,
    V4lSwradio,
    V4lTouch,
    AlsaPcmCapture,
    AlsaPcmPlayback,
    AlsaControl,
    Other(u32)
}

impl From<u32> for InterfaceType {
    fn from(raw: u32) -> Self {
        match raw {
            x if x == MEDIA_INTF_T_DVB_BASE => InterfaceType::DvbFrontend,
            x if x == MEDIA_INTF_T_DVB_BASE + 1 => InterfaceType::DvbDemux,
            x if x == MEDIA_INTF_T_DVB_BASE + 2 => InterfaceType::DvbDvr,
            x if x == MEDIA_INTF_T_DVB_BASE + 3 => InterfaceType::DvbCa,
            x if x == MEDIA_INTF_T_DVB_BASE + 4 => InterfaceType::DvbNet,
            x if x == MEDIA_INTF_T_V4L_BASE => InterfaceType::V4lVideo,
            x if x == MEDIA_INTF_T_V4L_BASE + 1 => InterfaceType::V4lVbi,
            x if x == MEDIA_INTF_T_V4L_BASE + 2 => InterfaceType::V4lRadio,
            x if x == MEDIA_INTF_T_V4L_BASE + 3 => InterfaceType::V4lSubdev,
            x if x == MEDIA_INTF_T_V4L_BASE + 4 => InterfaceType::V4lSwradio,
            x if x == MEDIA_INTF_T_V4L_BASE + 5 => InterfaceType::V4lTouch,
            x if x == MEDIA_INTF_T_ALSA_BASE => InterfaceType::AlsaPcmCapture,
            x if x == MEDIA_INTF_T_ALSA_BASE + 1 => InterfaceType::AlsaPcmPlayback,
            x if x == MEDIA_INTF_T_ALSA_BASE + 2 => InterfaceType::AlsaControl,
            other => InterfaceType::Other(other)
        }
    }
}

impl From<InterfaceType> for u32 {
    fn from(ty: InterfaceType) -> u32 {
        match ty {
            InterfaceType::DvbFrontend => MEDIA_INTF_T_DVB_BASE,
            InterfaceType::DvbDemux => MEDIA_INTF_T_DVB_BASE + 1,
            InterfaceType::DvbDvr => MEDIA_INTF_T_DVB_BASE + 2,
            InterfaceType::DvbCa => MEDIA_INTF_T_DVB_BASE + 3,
            InterfaceType::DvbNet => MEDIA_INTF_T_DVB_BASE + 4,
            InterfaceType::V4lVideo => MEDIA_INTF_T_V4L_BASE,
            InterfaceType::V4lVbi => MEDIA_INTF_T_V4L_BASE + 1,
            InterfaceType::V4lRadio => MEDIA_INTF_T_V4L_BASE + 2,
            InterfaceType::V4lSubdev => MEDIA_INTF_T_V4L_BASE + 3,
            InterfaceType::V4lSwradio => MEDIA_INTF_T_V4L_BASE + 4,
            InterfaceType::V4lTouch => MEDIA_INTF_T_V4L_BASE + 5,
            InterfaceType::AlsaPcmCapture => MEDIA_INTF_T_ALSA_BASE,
            InterfaceType::AlsaPcmPlayback => MEDIA_INTF_T_ALSA_BASE + 1,
            InterfaceType::AlsaControl => MEDIA_INTF_T_ALSA_BASE + 2,
            InterfaceType::Other(raw) => raw
        }
    }
}

/// One `struct media_v2_interface`, laid out as the kernel expects it.
/// The devnode union is kept raw; its first two words are major and minor.
// https://www.kernel.org/doc/html/latest/userspace-api/media/mediactl/media-ioc-g-topology.html
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TopologyInterface {
    id: u32,
    intf_type: u32,
    flags: u32,
    reserved: [u32; 9],
    raw: [u32; 16]
}

const _: () = assert!(mem::size_of::<TopologyInterface>() == 112);

impl TopologyInterface {
    pub fn new(id: u32, interface_type: InterfaceType, devnode: DeviceNumber) -> Self {
        let mut raw = [0; 16];
        raw[0] = devnode.major;
        raw[1] = devnode.minor;
        TopologyInterface {
            id,
            intf_type: interface_type.into(),
            flags: 0,
            reserved: [0; 9],
            raw
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn interface_type(&self) -> InterfaceType {
        InterfaceType::from(self.intf_type)
    }

    pub fn flags(&self) -> u32 {
        self.flags
    }

    pub fn devnode(&self) -> DeviceNumber {
        DeviceNumber::new(self.raw[0], self.raw[1])
    }

    pub fn is_video(&self) -> bool {
        self.interface_type() == InterfaceType::V4lVideo
    }
}

/// Reads every interface of the topology behind `fd`.
///
/// The kernel cannot be asked for the records without a buffer sized for
/// them, so the topology is queried twice: once for the count, once to fill.
/// A graph without interfaces yields `EmptyTopology`.
pub(crate) fn read_interfaces<I: DeviceIo>(io: &I, path: &Path, fd: &I::Fd) -> Result<Vec<TopologyInterface>> {
    let topology_error = |source| Error::TopologyQueryFailed { path: path.to_path_buf(), source };

    let count = io.interface_count(fd).map_err(topology_error)?;
    if count == 0 {
        return Err(Error::EmptyTopology { path: path.to_path_buf() });
    }

    let mut interfaces = Vec::new();
    interfaces
        .try_reserve_exact(count as usize)
        .map_err(|source| Error::AllocationFailed { count, source })?;
    interfaces.resize(count as usize, TopologyInterface::default());

    let filled = io.fill_interfaces(fd, &mut interfaces).map_err(topology_error)?;
    interfaces.truncate(filled);
    Ok(interfaces)
}

lazy_static! {
    static ref DEVNAME_REGEX: Regex = Regex::new(r"(?m)^DEVNAME=(.+)$").unwrap();
}

pub(crate) fn parse_devname(uevent: &str) -> Option<&str> {
    DEVNAME_REGEX
        .captures(uevent)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|name| !name.is_empty())
}

impl DeviceNumber {
    /// Joins the `DEVNAME` from `<sys_dir>/dev/char/<major>:<minor>/uevent`
    /// onto `dev_dir`.
    pub fn devnode_path(&self, sys_dir: &Path, dev_dir: &Path) -> Result<PathBuf> {
        let uevent = sys_dir.join(format!("dev/char/{}/uevent", self));
        let lookup_error = |source| Error::DevnodeLookupFailed {
            devnum: *self,
            uevent: uevent.clone(),
            source
        };

        let contents = fs::read_to_string(&uevent).map_err(lookup_error)?;
        let devname = parse_devname(&contents).ok_or_else(|| {
            lookup_error(io::Error::new(io::ErrorKind::InvalidData, "no DEVNAME entry"))
        })?;

        Ok(dev_dir.join(devname))
    }
}
