use log::trace;
use serde::{Deserialize, Serialize};

use scratchtex_core::ImageMetadata;

use crate::error::ImageError;
use crate::resample::{FilterKind, Resampler};
use crate::store::ImageStore;

/// How to treat the mip chain when preparing a decoded image for upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MipGenerationMode {
    /// Keep the image as is.
    None,
    /// Generate a full chain with resampled content.
    Full,
    /// Create the chain, but don't put any data in it.
    CreateOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    AlreadyHasMips,
    CompressedFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MipChainSupport {
    Supported { target_levels: u32 },
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MipChainOutcome {
    Built { levels: u32 },
    Skipped(SkipReason),
    NotRequested,
}

pub struct MipChainPolicy;

impl MipChainPolicy {
    /// Deterministic applicability check. The single gate both build modes
    /// consult before touching any storage. Compressed formats can never be
    /// filtered in place, so that check comes first; after that the level
    /// count is checked, not the subresource count, so a multi slice image
    /// with one level is still eligible.
    pub fn evaluate(metadata: &ImageMetadata) -> MipChainSupport {
        if metadata.format.is_compressed() {
            return MipChainSupport::Skipped(SkipReason::CompressedFormat);
        }
        if metadata.mip_levels > 1 {
            return MipChainSupport::Skipped(SkipReason::AlreadyHasMips);
        }
        MipChainSupport::Supported {
            target_levels: metadata.full_mip_count(),
        }
    }
}

impl ImageStore {
    pub fn create_mip_chain<R: Resampler + ?Sized>(
        &mut self,
        mode: MipGenerationMode,
        resampler: &R,
        filter: FilterKind,
    ) -> Result<MipChainOutcome, ImageError> {
        match mode {
            MipGenerationMode::None => Ok(MipChainOutcome::NotRequested),
            MipGenerationMode::Full => self.generate_mip_maps(resampler, filter),
            MipGenerationMode::CreateOnly => self.create_empty_mip_chain(),
        }
    }

    /// Replaces this store with one carrying a full, resampled mip chain.
    /// Level 0 of every slice is copied byte for byte; each further level is
    /// resampled from the level above it. The live store only changes once
    /// every subresource of the candidate succeeded.
    pub fn generate_mip_maps<R: Resampler + ?Sized>(
        &mut self,
        resampler: &R,
        filter: FilterKind,
    ) -> Result<MipChainOutcome, ImageError> {
        let target_levels = match MipChainPolicy::evaluate(self.metadata()) {
            MipChainSupport::Skipped(reason) => {
                trace!("Skipping mip generation: {:?}", reason);
                return Ok(MipChainOutcome::Skipped(reason));
            }
            MipChainSupport::Supported { target_levels } => target_levels,
        };

        let mut candidate = self.allocate_chain_candidate(target_levels)?;
        for array_index in 0..self.metadata().array_length {
            let base = self.sub_image(0, array_index)?;
            candidate.sub_image_mut(0, array_index)?.copy_from(&base)?;
            for mip in 1..target_levels {
                let (src, mut dst) = candidate.sub_image_pair_mut(mip - 1, mip, array_index)?;
                resampler
                    .resample(&src, &mut dst, filter)
                    .map_err(ImageError::Resample)?;
            }
        }

        *self = candidate;
        Ok(MipChainOutcome::Built {
            levels: target_levels,
        })
    }

    /// Replaces this store with one sized for a full mip chain where only
    /// level 0 carries content and every further level is zeroed. Used when
    /// mip storage must exist before a later fill step.
    pub fn create_empty_mip_chain(&mut self) -> Result<MipChainOutcome, ImageError> {
        let target_levels = match MipChainPolicy::evaluate(self.metadata()) {
            MipChainSupport::Skipped(reason) => {
                trace!("Skipping empty mip chain creation: {:?}", reason);
                return Ok(MipChainOutcome::Skipped(reason));
            }
            MipChainSupport::Supported { target_levels } => target_levels,
        };

        let mut candidate = self.allocate_chain_candidate(target_levels)?;
        for array_index in 0..self.metadata().array_length {
            let base = self.sub_image(0, array_index)?;
            candidate.sub_image_mut(0, array_index)?.copy_from(&base)?;
            // Tail levels must be zero regardless of how the candidate
            // buffer was obtained.
            for mip in 1..target_levels {
                candidate.sub_image_mut(mip, array_index)?.zero_fill();
            }
        }

        *self = candidate;
        Ok(MipChainOutcome::Built {
            levels: target_levels,
        })
    }

    /// The candidate keeps format, array length and cube flags; only the
    /// level count changes. Shape is fixed here, before any allocation.
    fn allocate_chain_candidate(&self, target_levels: u32) -> Result<ImageStore, ImageError> {
        let metadata = ImageMetadata {
            mip_levels: target_levels,
            ..*self.metadata()
        };
        trace!(
            "Building {} level mip chain for {}x{} {:?}, {} slices",
            target_levels,
            metadata.width,
            metadata.height,
            metadata.format,
            metadata.array_length
        );
        ImageStore::new(metadata).map_err(ImageError::Allocation)
    }
}
