use log::trace;

use scratchtex_core::{CubeFace, Format, ImageMetadata, CUBE_FACE_COUNT};

use crate::error::{AllocationError, ImageError};
use crate::layout::{ImageLayout, SubresourceLayout};

/// Borrowed view of one (mip, array) subresource. Never owns memory.
#[derive(Debug)]
pub struct SubImage<'a> {
    pub width: u32,
    pub height: u32,
    pub format: Format,
    pub row_pitch: usize,
    pub slice_pitch: usize,
    pub data: &'a [u8],
}

#[derive(Debug)]
pub struct SubImageMut<'a> {
    pub width: u32,
    pub height: u32,
    pub format: Format,
    pub row_pitch: usize,
    pub slice_pitch: usize,
    pub data: &'a mut [u8],
}

impl<'a> SubImageMut<'a> {
    pub fn zero_fill(&mut self) {
        self.data.fill(0);
    }

    /// Straight byte copy. Source and destination must describe the same
    /// format and extents.
    pub fn copy_from(&mut self, src: &SubImage) -> Result<(), ImageError> {
        if self.format != src.format
            || self.width != src.width
            || self.height != src.height
            || self.row_pitch != src.row_pitch
            || self.slice_pitch != src.slice_pitch
        {
            return Err(ImageError::CopyMismatch);
        }
        self.data.copy_from_slice(src.data);
        Ok(())
    }

    pub fn as_const(&self) -> SubImage<'_> {
        SubImage {
            width: self.width,
            height: self.height,
            format: self.format,
            row_pitch: self.row_pitch,
            slice_pitch: self.slice_pitch,
            data: &*self.data,
        }
    }
}

/// One contiguous pixel buffer plus the metadata and layout table describing
/// how it splits into (mip, array) subresources.
///
/// The shape of a live store never changes in place. Operations that change
/// the shape build a whole new store and replace the old one on success.
#[derive(Clone)]
pub struct ImageStore {
    metadata: ImageMetadata,
    layout: ImageLayout,
    data: Box<[u8]>,
}

impl ImageStore {
    /// Zero initialized store for the given metadata.
    pub fn new(metadata: ImageMetadata) -> Result<Self, AllocationError> {
        let layout = ImageLayout::new(&metadata)?;
        let data = vec![0u8; layout.total_size()].into_boxed_slice();
        trace!(
            "Allocated image store: {}x{} {:?}, {} mips, {} slices, {} bytes",
            metadata.width,
            metadata.height,
            metadata.format,
            metadata.mip_levels,
            metadata.array_length,
            layout.total_size()
        );
        Ok(Self {
            metadata,
            layout,
            data,
        })
    }

    /// Single level, single slice store built from externally decoded pixel
    /// rows. `src_row_pitch` is the byte stride between rows in `pixels` and
    /// may exceed the packed row size; padding bytes are not copied.
    pub fn from_base_pixels(
        width: u32,
        height: u32,
        format: Format,
        pixels: &[u8],
        src_row_pitch: usize,
    ) -> Result<Self, AllocationError> {
        let metadata = ImageMetadata::new_2d(width, height, format);
        let layout = ImageLayout::new(&metadata)?;
        let sub = *layout.subresource(0);

        if src_row_pitch < sub.row_pitch {
            return Err(AllocationError::SourcePitchTooSmall {
                minimum: sub.row_pitch,
                actual: src_row_pitch,
            });
        }
        let rows = sub.slice_pitch / sub.row_pitch;
        let expected = (rows - 1)
            .checked_mul(src_row_pitch)
            .and_then(|span| span.checked_add(sub.row_pitch))
            .ok_or(AllocationError::SizeOverflow)?;
        if pixels.len() < expected {
            return Err(AllocationError::SourceTooSmall {
                expected,
                actual: pixels.len(),
            });
        }

        let mut data = vec![0u8; layout.total_size()].into_boxed_slice();
        for row in 0..rows {
            let src_start = row * src_row_pitch;
            let dst_start = sub.offset + row * sub.row_pitch;
            data[dst_start..dst_start + sub.row_pitch]
                .copy_from_slice(&pixels[src_start..src_start + sub.row_pitch]);
        }

        Ok(Self {
            metadata,
            layout,
            data,
        })
    }

    pub fn metadata(&self) -> &ImageMetadata {
        &self.metadata
    }

    pub fn layout(&self) -> &ImageLayout {
        &self.layout
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    fn checked_subresource(&self, mip: u32, array_index: u32) -> Result<SubresourceLayout, ImageError> {
        if mip >= self.metadata.mip_levels || array_index >= self.metadata.array_length {
            return Err(ImageError::OutOfRange { mip, array_index });
        }
        let index = self.metadata.subresource_index(mip, array_index);
        Ok(*self.layout.subresource(index))
    }

    pub fn sub_image(&self, mip: u32, array_index: u32) -> Result<SubImage<'_>, ImageError> {
        let sub = self.checked_subresource(mip, array_index)?;
        Ok(sub_image_view(&sub, self.metadata.format, &self.data))
    }

    pub fn sub_image_mut(&mut self, mip: u32, array_index: u32) -> Result<SubImageMut<'_>, ImageError> {
        let sub = self.checked_subresource(mip, array_index)?;
        Ok(SubImageMut {
            width: sub.width,
            height: sub.height,
            format: self.metadata.format,
            row_pitch: sub.row_pitch,
            slice_pitch: sub.slice_pitch,
            data: &mut self.data[sub.offset..sub.offset + sub.slice_pitch],
        })
    }

    /// Simultaneous read view of one subresource and write view of another,
    /// for resampling within a single store. The two must not be the same
    /// subresource.
    pub fn sub_image_pair_mut(
        &mut self,
        src_mip: u32,
        dst_mip: u32,
        array_index: u32,
    ) -> Result<(SubImage<'_>, SubImageMut<'_>), ImageError> {
        if src_mip == dst_mip {
            return Err(ImageError::CopyMismatch);
        }
        let src = self.checked_subresource(src_mip, array_index)?;
        let dst = self.checked_subresource(dst_mip, array_index)?;
        let format = self.metadata.format;

        let (src_data, dst_data) = if src.offset < dst.offset {
            let (head, tail) = self.data.split_at_mut(dst.offset);
            (
                &head[src.offset..src.offset + src.slice_pitch],
                &mut tail[..dst.slice_pitch],
            )
        } else {
            let (head, tail) = self.data.split_at_mut(src.offset);
            (
                &tail[..src.slice_pitch],
                &mut head[dst.offset..dst.offset + dst.slice_pitch],
            )
        };

        Ok((
            SubImage {
                width: src.width,
                height: src.height,
                format,
                row_pitch: src.row_pitch,
                slice_pitch: src.slice_pitch,
                data: src_data,
            },
            SubImageMut {
                width: dst.width,
                height: dst.height,
                format,
                row_pitch: dst.row_pitch,
                slice_pitch: dst.slice_pitch,
                data: dst_data,
            },
        ))
    }

    pub fn cube_face(&self, mip: u32, cube_index: u32, face: CubeFace) -> Result<SubImage<'_>, ImageError> {
        let array_index = self.cube_array_index(mip, cube_index, face)?;
        self.sub_image(mip, array_index)
    }

    pub fn cube_face_mut(
        &mut self,
        mip: u32,
        cube_index: u32,
        face: CubeFace,
    ) -> Result<SubImageMut<'_>, ImageError> {
        let array_index = self.cube_array_index(mip, cube_index, face)?;
        self.sub_image_mut(mip, array_index)
    }

    fn cube_array_index(&self, mip: u32, cube_index: u32, face: CubeFace) -> Result<u32, ImageError> {
        if !self.metadata.is_cube() {
            return Err(ImageError::NotACubeMap);
        }
        cube_index
            .checked_mul(CUBE_FACE_COUNT)
            .and_then(|base| base.checked_add(face.index()))
            .ok_or(ImageError::OutOfRange {
                mip,
                array_index: cube_index,
            })
    }

    /// All subresource views in upload order: array major, mips contiguous
    /// per slice, matching `ImageMetadata::subresource_index`.
    pub fn images(&self) -> impl Iterator<Item = SubImage<'_>> {
        let format = self.metadata.format;
        self.layout
            .subresources()
            .iter()
            .map(move |sub| sub_image_view(sub, format, &self.data))
    }
}

fn sub_image_view<'a>(sub: &SubresourceLayout, format: Format, data: &'a [u8]) -> SubImage<'a> {
    SubImage {
        width: sub.width,
        height: sub.height,
        format,
        row_pitch: sub.row_pitch,
        slice_pitch: sub.slice_pitch,
        data: &data[sub.offset..sub.offset + sub.slice_pitch],
    }
}
