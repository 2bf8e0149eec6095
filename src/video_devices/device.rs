use std::{
    fmt,
    os::fd::OwnedFd,
    path::{Path, PathBuf},
    str::FromStr
};
use super::Error;

// The descriptor is closed when the handle is dropped.
#[derive(Debug)]
pub struct VideoDevice<D = OwnedFd> {
    path: PathBuf,
    fd: D,
    capability: Capability
}

impl<D> VideoDevice<D> {
    pub(crate) fn new(path: PathBuf, fd: D, capability: Capability) -> Self {
        VideoDevice { path, fd, capability }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn fd(&self) -> &D {
        &self.fd
    }

    pub fn capability(&self) -> &Capability {
        &self.capability
    }

    pub fn into_fd(self) -> D {
        self.fd
    }
}

#[derive(Debug)]
pub struct MediaDevice<D = OwnedFd> {
    path: PathBuf,
    fd: D,
    info: MediaInfo
}

impl<D> MediaDevice<D> {
    pub(crate) fn new(path: PathBuf, fd: D, info: MediaInfo) -> Self {
        MediaDevice { path, fd, info }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn fd(&self) -> &D {
        &self.fd
    }

    pub fn info(&self) -> &MediaInfo {
        &self.info
    }

    pub fn into_fd(self) -> D {
        self.fd
    }
}

/// Parsed reply to `VIDIOC_QUERYCAP`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Capability {
    pub driver: String,
    pub card: String,
    pub bus_info: String,
    pub version: u32,
    pub capabilities: u32,
    pub device_caps: u32
}

impl Capability {
    pub const VIDEO_CAPTURE: u32 = 0x0000_0001;
    pub const VIDEO_OUTPUT: u32 = 0x0000_0002;
    pub const VIDEO_CAPTURE_MPLANE: u32 = 0x0000_1000;
    pub const VIDEO_OUTPUT_MPLANE: u32 = 0x0000_2000;
    pub const VIDEO_M2M_MPLANE: u32 = 0x0000_4000;
    pub const VIDEO_M2M: u32 = 0x0000_8000;
    pub const STREAMING: u32 = 0x0400_0000;
    pub const DEVICE_CAPS: u32 = 0x8000_0000;

    // `capabilities` covers the whole physical device
    pub fn node_caps(&self) -> u32 {
        if self.capabilities & Self::DEVICE_CAPS != 0 {
            self.device_caps
        } else {
            self.capabilities
        }
    }

    pub fn has(&self, flags: u32) -> bool {
        self.node_caps() & flags == flags
    }

    pub fn is_capture(&self) -> bool {
        self.node_caps() & (Self::VIDEO_CAPTURE | Self::VIDEO_CAPTURE_MPLANE) != 0
    }

    pub fn is_m2m(&self) -> bool {
        self.node_caps() & (Self::VIDEO_M2M | Self::VIDEO_M2M_MPLANE) != 0
    }

    pub fn kernel_version(&self) -> (u8, u8, u8) {
        kernel_version(self.version)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaInfo {
    pub driver: String,
    pub model: String,
    pub serial: String,
    pub bus_info: String,
    pub media_version: u32,
    pub hw_revision: u32,
    pub driver_version: u32
}

impl MediaInfo {
    pub fn media_version(&self) -> (u8, u8, u8) {
        kernel_version(self.media_version)
    }

    pub fn driver_version(&self) -> (u8, u8, u8) {
        kernel_version(self.driver_version)
    }
}

/// Splits a `KERNEL_VERSION(a, b, c)` encoded value.
pub fn kernel_version(v: u32) -> (u8, u8, u8) {
    let major = ((v >> 16) & 0xff) as u8;
    let minor = ((v >> 8) & 0xff) as u8;
    let patch = (v & 0xff) as u8;
    (major, minor, patch)
}

/// The `(major, minor)` number of a character device. Video nodes are paired
/// with media interfaces on this, never on names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DeviceNumber {
    pub major: u32,
    pub minor: u32
}

impl DeviceNumber {
    pub const fn new(major: u32, minor: u32) -> Self {
        DeviceNumber { major, minor }
    }
}

impl fmt::Display for DeviceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.major, self.minor)
    }
}

/// A V4L2 pixel format code such as `YUYV` or `H264`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FourCc(pub [u8; 4]);

impl FourCc {
    pub const fn new(code: &[u8; 4]) -> Self {
        FourCc(*code)
    }

    pub fn from_u32(code: u32) -> Self {
        FourCc(code.to_le_bytes())
    }

    pub fn to_u32(self) -> u32 {
        u32::from_le_bytes(self.0)
    }
}

impl fmt::Display for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            let c = if b.is_ascii_graphic() || b == b' ' { b as char } else { '.' };
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

impl FromStr for FourCc {
    type Err = Error;

    /// Accepts up to four ASCII characters; short codes are padded with spaces.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.is_empty() || bytes.len() > 4 || !s.is_ascii() {
            return Err(Error::InvalidFourCc { value: s.to_string() });
        }
        let mut code = [b' '; 4];
        code[..bytes.len()].copy_from_slice(bytes);
        Ok(FourCc(code))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufType {
    VideoCapture,
    VideoCaptureMplane,
    VideoOutput,
    VideoOutputMplane
}

impl BufType {
    pub const ALL: [BufType; 4] = [
        BufType::VideoCapture,
        BufType::VideoCaptureMplane,
        BufType::VideoOutput,
        BufType::VideoOutputMplane
    ];
}

#[derive(Debug, Clone, PartialEq)]
pub struct PixelFormat {
    pub fourcc: FourCc,
    pub description: String,
    pub flags: u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_caps_prefers_device_caps_when_flagged() {
        let cap = Capability {
            capabilities: Capability::DEVICE_CAPS | Capability::VIDEO_CAPTURE | Capability::VIDEO_M2M,
            device_caps: Capability::VIDEO_M2M_MPLANE | Capability::STREAMING,
            ..Capability::default()
        };
        assert!(cap.is_m2m());
        assert!(!cap.is_capture());
        assert!(cap.has(Capability::STREAMING));
    }

    #[test]
    fn node_caps_falls_back_to_capabilities() {
        let cap = Capability {
            capabilities: Capability::VIDEO_CAPTURE | Capability::STREAMING,
            device_caps: 0,
            ..Capability::default()
        };
        assert!(cap.is_capture());
        assert!(cap.has(Capability::VIDEO_CAPTURE | Capability::STREAMING));
        assert!(!cap.has(Capability::VIDEO_CAPTURE | Capability::VIDEO_OUTPUT));
    }

    #[test]
    fn kernel_version_splits_bytes() {
        assert_eq!(kernel_version(0x0006_0102), (6, 1, 2));
    }

    #[test]
    fn device_number_displays_as_major_minor() {
        assert_eq!(DeviceNumber::new(81, 3).to_string(), "81:3");
    }

    #[test]
    fn fourcc_parses_and_pads() {
        let h264: FourCc = "H264".parse().unwrap();
        assert_eq!(h264, FourCc::new(b"H264"));
        assert_eq!(FourCc::from_u32(h264.to_u32()), h264);

        let grey: FourCc = "Y8".parse().unwrap();
        assert_eq!(grey.to_string(), "Y8  ");

        assert!("TOOLONG".parse::<FourCc>().is_err());
        assert!("".parse::<FourCc>().is_err());
    }
}
