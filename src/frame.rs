//! Wire framing: sync bytes, header, payload, running-sum checksum.
//!
//! Layout, fixed and exact: `B5 62 | class | id | len_lo len_hi | payload
//! | ck_a ck_b`. The checksum runs over every byte after the sync pair and
//! before the checksum itself. This is the canonical framing and is not
//! configurable.

pub const SYNC_1: u8 = 0xB5;
pub const SYNC_2: u8 = 0x62;

/// Header (class, id, length) plus checksum overhead around a payload.
pub const FRAME_OVERHEAD: usize = 8;

/// Two-byte running-sum checksum over `[class, id, len_lo, len_hi,
/// payload...]`: ck_a accumulates bytes, ck_b accumulates ck_a, both
/// mod 256.
pub fn checksum(bytes: &[u8]) -> (u8, u8) {
    let mut ck_a: u8 = 0;
    let mut ck_b: u8 = 0;
    for &b in bytes {
        ck_a = ck_a.wrapping_add(b);
        ck_b = ck_b.wrapping_add(ck_a);
    }
    (ck_a, ck_b)
}

/// Build a complete frame around a payload.
pub fn build_frame(class_id: u8, msg_id: u8, payload: &[u8]) -> Vec<u8> {
    let len = (payload.len() as u16).to_le_bytes();
    let mut frame = Vec::with_capacity(FRAME_OVERHEAD + payload.len());
    frame.push(SYNC_1);
    frame.push(SYNC_2);
    frame.push(class_id);
    frame.push(msg_id);
    frame.extend_from_slice(&len);
    frame.extend_from_slice(payload);
    let (ck_a, ck_b) = checksum(&frame[2..]);
    frame.push(ck_a);
    frame.push(ck_b);
    frame
}

/// One frame recovered from a byte stream.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub class_id: u8,
    pub msg_id: u8,
    pub payload: Vec<u8>,
    pub byte_range: (usize, usize),
}

/// A frame candidate that failed validation. The bytes are still consumed
/// so scanning continues past it.
#[derive(Debug, Clone)]
pub struct RejectedFrame {
    pub byte_range: (usize, usize),
    pub reason: String,
}

/// Result of scanning a byte stream: recovered frames and rejected
/// candidates, in stream order.
#[derive(Debug, Default)]
pub struct FrameScan {
    pub frames: Vec<Frame>,
    pub rejected: Vec<RejectedFrame>,
}

/// Scan a byte stream for frames. Bytes outside a sync pair are skipped;
/// a sync pair with a bad checksum is rejected with a reason; a sync pair
/// whose declared length runs past the end of input is rejected as
/// truncated and ends the scan.
pub fn scan_frames(bytes: &[u8]) -> FrameScan {
    let mut out = FrameScan::default();
    let mut offset = 0usize;
    while offset + 1 < bytes.len() {
        if bytes[offset] != SYNC_1 || bytes[offset + 1] != SYNC_2 {
            offset += 1;
            continue;
        }
        if offset + 6 > bytes.len() {
            out.rejected.push(RejectedFrame {
                byte_range: (offset, bytes.len()),
                reason: "truncated header".to_string(),
            });
            break;
        }
        let len = u16::from_le_bytes([bytes[offset + 4], bytes[offset + 5]]) as usize;
        let end = offset + FRAME_OVERHEAD + len;
        if end > bytes.len() {
            out.rejected.push(RejectedFrame {
                byte_range: (offset, bytes.len()),
                reason: format!("truncated frame: need {} bytes", end - offset),
            });
            break;
        }
        let body = &bytes[offset + 2..end - 2];
        let (ck_a, ck_b) = checksum(body);
        let (got_a, got_b) = (bytes[end - 2], bytes[end - 1]);
        if (ck_a, ck_b) == (got_a, got_b) {
            out.frames.push(Frame {
                class_id: bytes[offset + 2],
                msg_id: bytes[offset + 3],
                payload: bytes[offset + 6..end - 2].to_vec(),
                byte_range: (offset, end),
            });
        } else {
            out.rejected.push(RejectedFrame {
                byte_range: (offset, end),
                reason: format!(
                    "checksum mismatch: computed ({:#04x}, {:#04x}), found ({:#04x}, {:#04x})",
                    ck_a, ck_b, got_a, got_b
                ),
            });
        }
        offset = end;
    }
    out
}
