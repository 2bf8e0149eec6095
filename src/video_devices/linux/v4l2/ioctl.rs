//! The V4L2 ioctls issued on candidate video nodes and the structs they fill.

pub const V4L2_BUF_TYPE_VIDEO_CAPTURE: u32 = 1;
pub const V4L2_BUF_TYPE_VIDEO_OUTPUT: u32 = 2;
pub const V4L2_BUF_TYPE_VIDEO_CAPTURE_MPLANE: u32 = 9;
pub const V4L2_BUF_TYPE_VIDEO_OUTPUT_MPLANE: u32 = 10;

// https://www.kernel.org/doc/html/latest/userspace-api/media/v4l/vidioc-querycap.html

#[repr(C)]
pub struct V4l2Capability {
    pub driver: [u8; 16],
    pub card: [u8; 32],
    pub bus_info: [u8; 32],
    /// KERNEL_VERSION() of the driver
    pub version: u32,
    /// Whole physical device
    pub capabilities: u32,
    /// This node only, valid when `capabilities` has V4L2_CAP_DEVICE_CAPS
    pub device_caps: u32,
    pub reserved: [u32; 3]
}

nix::ioctl_read!(vidioc_querycap, b'V', 0, V4l2Capability);

const _: () = assert!(std::mem::size_of::<V4l2Capability>() == 104);

// https://www.kernel.org/doc/html/latest/userspace-api/media/v4l/vidioc-enum-fmt.html

#[repr(C)]
pub struct V4l2Fmtdesc {
    pub index: u32,
    pub buf_type: u32,
    /// V4L2_FMT_FLAG_*, e.g. compressed or emulated
    pub flags: u32,
    pub description: [u8; 32],
    pub pixel_format: u32,
    pub mbus_code: u32,
    pub reserved: [u32; 3]
}

nix::ioctl_readwrite!(vidioc_enum_fmt, b'V', 2, V4l2Fmtdesc);

const _: () = assert!(std::mem::size_of::<V4l2Fmtdesc>() == 64);
