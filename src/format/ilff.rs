use std::mem::size_of;

use zerocopy::{AsBytes, FromBytes, FromZeroes, LittleEndian, Unaligned, U32};

use crate::{error::FormatError, format::FourCC};

// Container signature
pub const K_FORM_ILFF: FourCC = FourCC(*b"ILFF");

/// Fixed 20-byte header at the start of every container.
#[derive(Clone, Debug, FromBytes, FromZeroes, AsBytes, Unaligned)]
#[repr(C, packed)]
pub struct IlffHeader {
    pub magic: FourCC,
    pub size: U32<LittleEndian>,
    pub align: U32<LittleEndian>,
    pub skip: U32<LittleEndian>,
    pub format_tag: FourCC,
}

/// 16-byte header preceding each chunk payload.
#[derive(Clone, Debug, FromBytes, FromZeroes, AsBytes, Unaligned)]
#[repr(C, packed)]
pub struct ChunkDescriptor {
    pub tag: FourCC,
    pub size: U32<LittleEndian>,
    pub align: U32<LittleEndian>,
    pub skip: U32<LittleEndian>,
}

/// Index entry for one chunk.
///
/// `skip` is the distance from this chunk's header to the next one; 0 marks
/// the final chunk. Tags may repeat within a container.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ChunkInfo {
    pub tag: FourCC,
    pub size: u32,
    pub align: u32,
    pub skip: u32,
    pub start: usize,
    pub data_offset: usize,
}

/// Chunk index over an ILFF container.
///
/// Construction validates the container header and walks the whole skip
/// chain once; lookups afterwards are linear scans over the index in file
/// order.
#[derive(Debug)]
pub struct IlffReader<'a> {
    data: &'a [u8],
    format_tag: FourCC,
    chunks: Vec<ChunkInfo>,
}

impl<'a> IlffReader<'a> {
    pub fn new(data: &'a [u8]) -> Result<Self, FormatError> {
        let header = IlffHeader::ref_from_prefix(data)
            .ok_or(FormatError::Truncated { what: "container header", offset: 0 })?;
        if header.magic != K_FORM_ILFF {
            return Err(FormatError::InvalidHeader {
                field: "signature",
                expected: u32::from_le_bytes(K_FORM_ILFF.0) as u64,
                found: u32::from_le_bytes(header.magic.0) as u64,
            });
        }
        if header.size.get() as usize != data.len() {
            return Err(FormatError::InvalidHeader {
                field: "total size",
                expected: data.len() as u64,
                found: header.size.get() as u64,
            });
        }
        if header.align.get() != 4 {
            return Err(FormatError::InvalidHeader {
                field: "alignment",
                expected: 4,
                found: header.align.get() as u64,
            });
        }
        if header.skip.get() != 0 {
            return Err(FormatError::InvalidHeader {
                field: "skip",
                expected: 0,
                found: header.skip.get() as u64,
            });
        }

        let mut chunks = Vec::new();
        let mut pos = size_of::<IlffHeader>();
        loop {
            let desc = data
                .get(pos..)
                .and_then(ChunkDescriptor::ref_from_prefix)
                .ok_or(FormatError::Truncated { what: "chunk header", offset: pos })?;
            if desc.align.get() != 4 {
                return Err(FormatError::InvalidHeader {
                    field: "chunk alignment",
                    expected: 4,
                    found: desc.align.get() as u64,
                });
            }
            let size = desc.size.get() as usize;
            let data_offset = pos + size_of::<ChunkDescriptor>();
            if data.len() - data_offset < size {
                return Err(FormatError::Truncated { what: "chunk data", offset: data_offset });
            }
            let skip = desc.skip.get();
            log::trace!("chunk {:?} at {pos:#x}, size {size:#x}, skip {skip:#x}", desc.tag);
            chunks.push(ChunkInfo {
                tag: desc.tag,
                size: desc.size.get(),
                align: desc.align.get(),
                skip,
                start: pos,
                data_offset,
            });
            if skip == 0 {
                let end = data_offset + size;
                if end != data.len() {
                    return Err(FormatError::TrailingData { remaining: data.len() - end });
                }
                break;
            }
            // The skip of each chunk is relative to its own header, not to
            // the end of its payload.
            pos += skip as usize;
        }

        Ok(Self { data, format_tag: header.format_tag, chunks })
    }

    /// Tag trailing the container header, e.g. `MEF ` for model files.
    pub fn format_tag(&self) -> FourCC { self.format_tag }

    /// All indexed chunks in file order.
    pub fn chunks(&self) -> &[ChunkInfo] { &self.chunks }

    pub fn find(&self, tag: FourCC) -> bool { self.chunks.iter().any(|chunk| chunk.tag == tag) }

    /// First chunk with `tag` in file order, or the second when
    /// `skip_first_match` is set (for containers that repeat a tag).
    pub fn locate(&self, tag: FourCC, skip_first_match: bool) -> Option<ChunkInfo> {
        let mut matches = self.chunks.iter().filter(|chunk| chunk.tag == tag);
        if skip_first_match {
            matches.nth(1).copied()
        } else {
            matches.next().copied()
        }
    }

    /// Payload bytes of the located chunk. Absence is not an error; callers
    /// use it to pick between record families.
    pub fn read(&self, tag: FourCC, skip_first_match: bool) -> Option<&'a [u8]> {
        self.locate(tag, skip_first_match)
            .map(|chunk| &self.data[chunk.data_offset..chunk.data_offset + chunk.size as usize])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(tag: &[u8; 4], data: &[u8], last: bool) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(tag);
        out.extend_from_slice(&(data.len() as u32).to_le_bytes());
        out.extend_from_slice(&4u32.to_le_bytes());
        let skip =
            if last { 0 } else { (size_of::<ChunkDescriptor>() + data.len() + 3) & !3 };
        out.extend_from_slice(&(skip as u32).to_le_bytes());
        out.extend_from_slice(data);
        if !last {
            out.resize(skip, 0);
        }
        out
    }

    fn container(chunks: &[(&[u8; 4], &[u8])]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(b"ILFF");
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&4u32.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(b"MEF ");
        for (i, (tag, data)) in chunks.iter().enumerate() {
            out.extend_from_slice(&chunk(tag, data, i == chunks.len() - 1));
        }
        let total = out.len() as u32;
        out[4..8].copy_from_slice(&total.to_le_bytes());
        out
    }

    #[test]
    fn builds_chunk_index() {
        let data = container(&[
            (b"HSEM", &[1, 2, 3, 4, 5]),
            (b"XTRV", &[6; 8]),
            (b"ECAF", &[7; 6]),
        ]);
        let reader = IlffReader::new(&data).unwrap();

        assert_eq!(reader.format_tag(), *b"MEF ");
        let chunks = reader.chunks();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].tag, *b"HSEM");
        assert_eq!(chunks[0].size, 5);
        assert_eq!(chunks[0].start, 20);
        assert_eq!(chunks[0].data_offset, 36);
        // 16-byte header plus 5 payload bytes, padded to the 4-byte grid
        assert_eq!(chunks[1].start, 44);
        assert_eq!(chunks[2].tag, *b"ECAF");
        assert_eq!(chunks[2].skip, 0);

        assert_eq!(reader.read(FourCC(*b"HSEM"), false), Some(&[1, 2, 3, 4, 5][..]));
        assert_eq!(reader.read(FourCC(*b"XTRV"), false), Some(&[6; 8][..]));
        assert!(reader.find(FourCC(*b"ECAF")));
        assert!(!reader.find(FourCC(*b"XTVC")));
        assert_eq!(reader.read(FourCC(*b"XTVC"), false), None);
    }

    #[test]
    fn locates_repeated_tags() {
        let data = container(&[
            (b"XTRV", &[1; 4]),
            (b"HSEM", &[2; 4]),
            (b"XTRV", &[3; 4]),
        ]);
        let reader = IlffReader::new(&data).unwrap();

        let first = reader.locate(FourCC(*b"XTRV"), false).unwrap();
        let second = reader.locate(FourCC(*b"XTRV"), true).unwrap();
        assert!(first.start < second.start);
        assert_eq!(reader.read(FourCC(*b"XTRV"), false), Some(&[1; 4][..]));
        assert_eq!(reader.read(FourCC(*b"XTRV"), true), Some(&[3; 4][..]));
        // Only one HSEM exists, so there is no second match to return.
        assert_eq!(reader.locate(FourCC(*b"HSEM"), true), None);
    }

    #[test]
    fn rejects_bad_signature() {
        let mut data = container(&[(b"HSEM", &[0; 4])]);
        data[..4].copy_from_slice(b"FFLI");
        let err = IlffReader::new(&data).unwrap_err();
        assert!(matches!(err, FormatError::InvalidHeader { field: "signature", .. }));
    }

    #[test]
    fn rejects_declared_size_mismatch() {
        let mut data = container(&[(b"HSEM", &[0; 4])]);
        let bad = (data.len() as u32 + 1).to_le_bytes();
        data[4..8].copy_from_slice(&bad);
        let err = IlffReader::new(&data).unwrap_err();
        assert!(matches!(err, FormatError::InvalidHeader { field: "total size", .. }));
    }

    #[test]
    fn rejects_bad_alignment_and_skip() {
        let mut data = container(&[(b"HSEM", &[0; 4])]);
        data[8..12].copy_from_slice(&8u32.to_le_bytes());
        let err = IlffReader::new(&data).unwrap_err();
        assert!(matches!(err, FormatError::InvalidHeader { field: "alignment", .. }));

        let mut data = container(&[(b"HSEM", &[0; 4])]);
        data[12..16].copy_from_slice(&4u32.to_le_bytes());
        let err = IlffReader::new(&data).unwrap_err();
        assert!(matches!(err, FormatError::InvalidHeader { field: "skip", .. }));

        let mut data = container(&[(b"HSEM", &[0; 4])]);
        // chunk alignment field of the first chunk
        data[28..32].copy_from_slice(&2u32.to_le_bytes());
        let err = IlffReader::new(&data).unwrap_err();
        assert!(matches!(err, FormatError::InvalidHeader { field: "chunk alignment", .. }));
    }

    #[test]
    fn rejects_trailing_data() {
        let mut data = container(&[(b"HSEM", &[0; 4])]);
        data.extend_from_slice(&[0xAA; 3]);
        let total = (data.len() as u32).to_le_bytes();
        data[4..8].copy_from_slice(&total);
        let err = IlffReader::new(&data).unwrap_err();
        assert!(matches!(err, FormatError::TrailingData { remaining: 3 }));
    }

    #[test]
    fn rejects_truncated_chunk_data() {
        let mut data = container(&[(b"HSEM", &[0; 4])]);
        // Declare a payload larger than what remains in the stream.
        data[24..28].copy_from_slice(&64u32.to_le_bytes());
        let err = IlffReader::new(&data).unwrap_err();
        assert!(matches!(err, FormatError::Truncated { what: "chunk data", .. }));
    }

    #[test]
    fn rejects_skip_chain_past_end() {
        let mut data = container(&[(b"HSEM", &[0; 4])]);
        let skip = (data.len() as u32).to_le_bytes();
        data[32..36].copy_from_slice(&skip);
        let err = IlffReader::new(&data).unwrap_err();
        assert!(matches!(err, FormatError::Truncated { what: "chunk header", .. }));
    }

    #[test]
    fn rejects_empty_container() {
        let data = container(&[]);
        let err = IlffReader::new(&data).unwrap_err();
        assert!(matches!(err, FormatError::Truncated { what: "chunk header", .. }));
    }
}
