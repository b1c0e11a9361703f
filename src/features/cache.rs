//! On-disk descriptor cache, one small binary record per trained symbol.
//!
//! Record layout: four little-endian 32-bit header fields (row count, column
//! count, element type, channel count) followed by raw row-major descriptor
//! bytes. `read_descriptors` is the exact inverse of `write_descriptors`.

use std::path::Path;

use crate::error::{ScanError, ScanResult};
use crate::features::extractor::{Descriptor, DESCRIPTOR_LEN};

const HEADER_LEN: usize = 16;
/// Element type tag for unsigned 8-bit data.
const ELEM_TYPE_U8: u32 = 0;
const CHANNELS: u32 = 1;

pub fn write_descriptors(path: &Path, descriptors: &[Descriptor]) -> ScanResult<()> {
    let mut buffer = Vec::with_capacity(HEADER_LEN + descriptors.len() * DESCRIPTOR_LEN);
    buffer.extend_from_slice(&(descriptors.len() as u32).to_le_bytes());
    buffer.extend_from_slice(&(DESCRIPTOR_LEN as u32).to_le_bytes());
    buffer.extend_from_slice(&ELEM_TYPE_U8.to_le_bytes());
    buffer.extend_from_slice(&CHANNELS.to_le_bytes());
    for descriptor in descriptors {
        buffer.extend_from_slice(descriptor);
    }
    std::fs::write(path, buffer)?;
    Ok(())
}

pub fn read_descriptors(path: &Path) -> ScanResult<Vec<Descriptor>> {
    let data = std::fs::read(path)?;
    let malformed = |reason: &str| ScanError::DescriptorCache {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };

    if data.len() < HEADER_LEN {
        return Err(malformed("truncated header"));
    }
    let field =
        |i: usize| u32::from_le_bytes([data[i * 4], data[i * 4 + 1], data[i * 4 + 2], data[i * 4 + 3]]);
    let rows = field(0) as usize;
    let cols = field(1) as usize;
    let elem_type = field(2);
    let channels = field(3);

    if cols != DESCRIPTOR_LEN || elem_type != ELEM_TYPE_U8 || channels != CHANNELS {
        return Err(malformed("unexpected descriptor shape"));
    }
    if data.len() != HEADER_LEN + rows * cols {
        return Err(malformed("payload length does not match header"));
    }

    let mut descriptors = Vec::with_capacity(rows);
    for row in 0..rows {
        let start = HEADER_LEN + row * DESCRIPTOR_LEN;
        let mut descriptor: Descriptor = [0; DESCRIPTOR_LEN];
        descriptor.copy_from_slice(&data[start..start + DESCRIPTOR_LEN]);
        descriptors.push(descriptor);
    }
    Ok(descriptors)
}
