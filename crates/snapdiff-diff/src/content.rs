//! Chunked stream equality.

use std::path::Path;

use snapdiff_core::{ReadError, StreamKind, StreamReader};

/// Read granularity for content comparison.
const CHUNK_SIZE: u64 = 64 * 1024;

/// Compare two equal-length streams chunk by chunk, stopping at the first
/// differing chunk. Nothing is held open between calls; each chunk read is
/// self-contained.
pub(crate) fn streams_equal<R: StreamReader>(
    reader: &R,
    left: &Path,
    right: &Path,
    stream: StreamKind,
    len: u64,
    bytes_read: &mut u64,
) -> Result<bool, ReadError> {
    let buf_len = len.min(CHUNK_SIZE) as usize;
    let mut left_buf = vec![0u8; buf_len];
    let mut right_buf = vec![0u8; buf_len];
    let mut offset = 0u64;

    while offset < len {
        let want = (len - offset).min(CHUNK_SIZE) as usize;
        read_exact(reader, left, stream, offset, &mut left_buf[..want], len)?;
        read_exact(reader, right, stream, offset, &mut right_buf[..want], len)?;
        *bytes_read += 2 * want as u64;
        if left_buf[..want] != right_buf[..want] {
            return Ok(false);
        }
        offset += want as u64;
    }
    Ok(true)
}

/// Fill `buf` from the stream, failing with `Truncated` if the stream ends
/// before its snapshot-recorded length.
fn read_exact<R: StreamReader>(
    reader: &R,
    path: &Path,
    stream: StreamKind,
    offset: u64,
    buf: &mut [u8],
    stream_len: u64,
) -> Result<(), ReadError> {
    let mut filled = 0usize;
    while filled < buf.len() {
        let n = reader.read_chunk(path, stream, offset + filled as u64, &mut buf[filled..])?;
        if n == 0 {
            return Err(ReadError::Truncated {
                path: path.to_path_buf(),
                expected: stream_len,
                actual: offset + filled as u64,
            });
        }
        filled += n;
    }
    Ok(())
}
