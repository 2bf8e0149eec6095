//! The media controller ioctl functions and the structs they use.
//!
//! Only the parts of `linux/media.h` needed to read device info and the
//! interface list of the topology are mirrored here.

const MEDIA_IOC: u8 = b'|';
const MEDIA_IOC_DEVICE_INFO: u8 = 0x00;
const MEDIA_IOC_G_TOPOLOGY: u8 = 0x04;

// https://www.kernel.org/doc/html/latest/userspace-api/media/mediactl/media-ioc-device-info.html

#[repr(C)]
pub struct MediaDeviceInfo {
    pub driver: [u8; 16],
    pub model: [u8; 32],
    pub serial: [u8; 40],
    pub bus_info: [u8; 32],
    pub media_version: u32,
    pub hw_revision: u32,
    pub driver_version: u32,
    pub reserved: [u32; 31]
}

nix::ioctl_readwrite!(media_ioc_device_info, MEDIA_IOC, MEDIA_IOC_DEVICE_INFO, MediaDeviceInfo);

// https://www.kernel.org/doc/html/latest/userspace-api/media/mediactl/media-ioc-g-topology.html
//
// Each `ptr_*` field is either zero, in which case the kernel only reports the
// matching `num_*` count, or the address of an array of at least `num_*` records.

#[repr(C)]
pub struct MediaV2Topology {
    pub topology_version: u64,
    pub num_entities: u32,
    pub reserved1: u32,
    pub ptr_entities: u64,
    pub num_interfaces: u32,
    pub reserved2: u32,
    pub ptr_interfaces: u64,
    pub num_pads: u32,
    pub reserved3: u32,
    pub ptr_pads: u64,
    pub num_links: u32,
    pub reserved4: u32,
    pub ptr_links: u64
}

nix::ioctl_readwrite!(media_ioc_g_topology, MEDIA_IOC, MEDIA_IOC_G_TOPOLOGY, MediaV2Topology);
