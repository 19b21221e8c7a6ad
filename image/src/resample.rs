use serde::{Deserialize, Serialize};

use scratchtex_core::Format;

use crate::error::ResampleError;
use crate::store::{SubImage, SubImageMut};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterKind {
    Box,
    Point,
}

impl Default for FilterKind {
    fn default() -> Self {
        FilterKind::Box
    }
}

/// External resampling boundary. Implementations are handed a source view
/// and a destination view of half (rounded down, minimum 1) extents in the
/// same format, and populate every destination pixel.
pub trait Resampler {
    fn resample(
        &self,
        src: &SubImage,
        dst: &mut SubImageMut,
        filter: FilterKind,
    ) -> Result<(), ResampleError>;
}

/// Software resampler for 8 bit per channel formats.
pub struct CpuResampler;

impl Resampler for CpuResampler {
    fn resample(
        &self,
        src: &SubImage,
        dst: &mut SubImageMut,
        filter: FilterKind,
    ) -> Result<(), ResampleError> {
        if src.format != dst.format
            || dst.width != (src.width / 2).max(1)
            || dst.height != (src.height / 2).max(1)
        {
            return Err(ResampleError::SubImageMismatch);
        }
        let channels = match src.format {
            Format::R8UNorm => 1usize,
            Format::RG8UNorm => 2,
            Format::RGBA8UNorm | Format::RGBA8Srgb | Format::BGRA8UNorm => 4,
            format => return Err(ResampleError::UnsupportedFormat(format)),
        };

        match filter {
            FilterKind::Box => box_downsample(src, dst, channels),
            FilterKind::Point => point_downsample(src, dst, channels),
        }
        Ok(())
    }
}

/// 2x2 box average per destination pixel. The window clamps at the edges of
/// degenerate levels (1xN, Nx1), which weights the remaining samples like an
/// edge extend.
fn box_downsample(src: &SubImage, dst: &mut SubImageMut, channels: usize) {
    for y in 0..dst.height {
        let sy0 = (y * 2).min(src.height - 1) as usize;
        let sy1 = (y * 2 + 1).min(src.height - 1) as usize;
        for x in 0..dst.width {
            let sx0 = (x * 2).min(src.width - 1) as usize;
            let sx1 = (x * 2 + 1).min(src.width - 1) as usize;
            for channel in 0..channels {
                let sum = src.data[sy0 * src.row_pitch + sx0 * channels + channel] as u16
                    + src.data[sy0 * src.row_pitch + sx1 * channels + channel] as u16
                    + src.data[sy1 * src.row_pitch + sx0 * channels + channel] as u16
                    + src.data[sy1 * src.row_pitch + sx1 * channels + channel] as u16;
                dst.data[y as usize * dst.row_pitch + x as usize * channels + channel] =
                    (sum / 4) as u8;
            }
        }
    }
}

fn point_downsample(src: &SubImage, dst: &mut SubImageMut, channels: usize) {
    for y in 0..dst.height {
        let sy = (y * 2).min(src.height - 1) as usize;
        for x in 0..dst.width {
            let sx = (x * 2).min(src.width - 1) as usize;
            let src_start = sy * src.row_pitch + sx * channels;
            let dst_start = y as usize * dst.row_pitch + x as usize * channels;
            dst.data[dst_start..dst_start + channels]
                .copy_from_slice(&src.data[src_start..src_start + channels]);
        }
    }
}
