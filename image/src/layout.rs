use scratchtex_core::{align_up_64, Format, ImageMetadata};
use smallvec::SmallVec;

use crate::error::AllocationError;

/// Byte placement of one (mip, array) subresource within the store buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubresourceLayout {
    pub offset: usize,
    pub width: u32,
    pub height: u32,
    pub row_pitch: usize,
    pub slice_pitch: usize,
}

/// Row and slice pitch in bytes. For block compressed formats a row covers
/// one row of blocks, not one row of pixels. Returns None on overflow.
pub fn compute_pitch(format: Format, width: u32, height: u32) -> Option<(usize, usize)> {
    let (block_width, block_height) = format.block_extent();
    let blocks_x = align_up_64(width as u64, block_width as u64) / block_width as u64;
    let blocks_y = align_up_64(height as u64, block_height as u64) / block_height as u64;
    let row_pitch = blocks_x.checked_mul(format.element_size() as u64)?;
    let slice_pitch = row_pitch.checked_mul(blocks_y)?;
    Some((
        usize::try_from(row_pitch).ok()?,
        usize::try_from(slice_pitch).ok()?,
    ))
}

/// Precomputed subresource table, array major with mips contiguous per slice.
/// Built once per store; sub image lookups are plain indexing afterwards.
#[derive(Debug, Clone)]
pub struct ImageLayout {
    subresources: SmallVec<[SubresourceLayout; 16]>,
    total_size: usize,
}

impl ImageLayout {
    pub fn new(metadata: &ImageMetadata) -> Result<Self, AllocationError> {
        metadata.validate().map_err(AllocationError::InvalidMetadata)?;

        let mut subresources =
            SmallVec::<[SubresourceLayout; 16]>::with_capacity(metadata.subresource_count() as usize);
        let mut offset = 0usize;
        for _array_index in 0..metadata.array_length {
            for mip in 0..metadata.mip_levels {
                let (width, height) = metadata.mip_extent(mip);
                let (row_pitch, slice_pitch) = compute_pitch(metadata.format, width, height)
                    .ok_or(AllocationError::SizeOverflow)?;
                subresources.push(SubresourceLayout {
                    offset,
                    width,
                    height,
                    row_pitch,
                    slice_pitch,
                });
                offset = offset
                    .checked_add(slice_pitch)
                    .ok_or(AllocationError::SizeOverflow)?;
            }
        }

        Ok(Self {
            subresources,
            total_size: offset,
        })
    }

    pub fn subresource(&self, index: u32) -> &SubresourceLayout {
        &self.subresources[index as usize]
    }

    pub fn subresources(&self) -> &[SubresourceLayout] {
        &self.subresources
    }

    pub fn total_size(&self) -> usize {
        self.total_size
    }
}
