//! Media controller queries on an open `/dev/mediaN` node.

use nix::errno::Errno;
use std::{
    mem,
    os::fd::RawFd
};
use super::c_string;
use super::super::{MediaInfo, TopologyInterface};

mod ioctl;
use ioctl::*;

pub fn query_device_info(fd: RawFd) -> Result<MediaInfo, Errno> {
    unsafe {
        let mut info: MediaDeviceInfo = mem::zeroed();
        media_ioc_device_info(fd, &mut info)?;
        Ok(to_media_info(&info))
    }
}

fn to_media_info(info: &MediaDeviceInfo) -> MediaInfo {
    MediaInfo {
        driver: c_string(&info.driver),
        model: c_string(&info.model),
        serial: c_string(&info.serial),
        bus_info: c_string(&info.bus_info),
        media_version: info.media_version,
        hw_revision: info.hw_revision,
        driver_version: info.driver_version
    }
}

/// `MEDIA_IOC_G_TOPOLOGY` with every array pointer left null.
pub fn query_interface_count(fd: RawFd) -> Result<u32, Errno> {
    unsafe {
        let mut topology: MediaV2Topology = mem::zeroed();
        media_ioc_g_topology(fd, &mut topology)?;
        Ok(topology.num_interfaces)
    }
}

/// `MEDIA_IOC_G_TOPOLOGY` with `interfaces` as the interface array.
///
/// The kernel fails with `ENOSPC` if the graph grew past `interfaces.len()`
/// since the count was read.
pub fn query_interfaces(fd: RawFd, interfaces: &mut [TopologyInterface]) -> Result<usize, Errno> {
    let capacity = u32::try_from(interfaces.len()).map_err(|_| Errno::EINVAL)?;
    unsafe {
        let mut topology: MediaV2Topology = mem::zeroed();
        topology.num_interfaces = capacity;
        topology.ptr_interfaces = interfaces.as_mut_ptr() as u64;
        media_ioc_g_topology(fd, &mut topology)?;
        Ok((topology.num_interfaces as usize).min(interfaces.len()))
    }
}
