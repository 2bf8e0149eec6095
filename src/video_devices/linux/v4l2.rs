//! V4L2 queries on an open video node.
/*
 * VIDIOC_QUERYCAP is all discovery needs; the format enumeration is there so
 * acceptance predicates can look at what a node actually offers before it is
 * picked.
 *
 * https://docs.kernel.org/userspace-api/media/v4l/vidioc-querycap.html
 * https://docs.kernel.org/userspace-api/media/v4l/vidioc-enum-fmt.html
 */
use nix::errno::Errno;
use std::{
    mem,
    os::fd::{
        AsFd,
        AsRawFd,
        RawFd
    },
    vec::Vec
};
use super::c_string;
use super::super::{
    BufType,
    Capability,
    Error,
    FourCc,
    PixelFormat,
    Result,
    VideoDevice
};

mod ioctl;
use ioctl::*;

impl<D: AsFd> VideoDevice<D> {
    /// Pixel formats the node offers on queue `buf_type`.
    ///
    /// A queue the node does not have yields an empty list.
    pub fn formats(&self, buf_type: BufType) -> Result<Vec<PixelFormat>> {
        find_formats(self.fd().as_fd().as_raw_fd(), buf_type)
            .map_err(|source| Error::FormatQueryFailed { path: self.path().to_path_buf(), source })
    }

    /// True when `fourcc` is offered on any capture or output queue.
    pub fn supports_format(&self, fourcc: FourCc) -> Result<bool> {
        for buf_type in BufType::ALL {
            if self.formats(buf_type)?.iter().any(|fmt| fmt.fourcc == fourcc) {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

pub fn query_capabilities(fd: RawFd) -> std::result::Result<Capability, Errno> {
    unsafe {
        let mut cap: V4l2Capability = mem::zeroed();
        vidioc_querycap(fd, &mut cap)?;
        Ok(to_capability(&cap))
    }
}

fn to_capability(cap: &V4l2Capability) -> Capability {
    Capability {
        driver: c_string(&cap.driver),
        card: c_string(&cap.card),
        bus_info: c_string(&cap.bus_info),
        version: cap.version,
        capabilities: cap.capabilities,
        device_caps: cap.device_caps
    }
}

fn raw_buf_type(buf_type: BufType) -> u32 {
    match buf_type {
        BufType::VideoCapture => V4L2_BUF_TYPE_VIDEO_CAPTURE,
        BufType::VideoCaptureMplane => V4L2_BUF_TYPE_VIDEO_CAPTURE_MPLANE,
        BufType::VideoOutput => V4L2_BUF_TYPE_VIDEO_OUTPUT,
        BufType::VideoOutputMplane => V4L2_BUF_TYPE_VIDEO_OUTPUT_MPLANE
    }
}

fn find_formats(fd: RawFd, buf_type: BufType) -> std::result::Result<Vec<PixelFormat>, Errno> {
    let mut formats = Vec::<PixelFormat>::new();

    for format_index in 0.. {
        match query_format(fd, raw_buf_type(buf_type), format_index) {
            Ok(fmt) => formats.push(PixelFormat {
                fourcc: FourCc::from_u32(fmt.pixel_format),
                description: c_string(&fmt.description),
                flags: fmt.flags
            }),
            // EINVAL returned after last index, or for a queue the node lacks
            Err(Errno::EINVAL) => break,
            Err(errno) => Err(errno)?
        }
    }
    Ok(formats)
}

fn query_format(fd: RawFd, fmt_type: u32, index: u32) -> std::result::Result<V4l2Fmtdesc, Errno> {
    unsafe {
        let mut fmt: V4l2Fmtdesc = mem::zeroed();
        fmt.index = index;
        fmt.buf_type = fmt_type;
        vidioc_enum_fmt(fd, &mut fmt)?;
        Ok(fmt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn padded<const N: usize>(s: &str) -> [u8; N] {
        let mut out = [0u8; N];
        out[..s.len()].copy_from_slice(s.as_bytes());
        out
    }

    #[test]
    fn capability_strings_are_trimmed_at_nul() {
        let raw = V4l2Capability {
            driver: padded("uvcvideo"),
            card: padded("HD Webcam"),
            bus_info: padded("usb-0000:00:14.0-1"),
            version: 0x0006_0100,
            capabilities: Capability::DEVICE_CAPS | Capability::VIDEO_CAPTURE,
            device_caps: Capability::VIDEO_CAPTURE | Capability::STREAMING,
            reserved: [0; 3]
        };
        let cap = to_capability(&raw);
        assert_eq!(cap.driver, "uvcvideo");
        assert_eq!(cap.card, "HD Webcam");
        assert_eq!(cap.bus_info, "usb-0000:00:14.0-1");
        assert_eq!(cap.kernel_version(), (6, 1, 0));
        assert!(cap.is_capture());
    }
}
