use scratchtex_core::{Format, MetadataError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllocationError {
    SizeOverflow,
    InvalidMetadata(MetadataError),
    SourceTooSmall { expected: usize, actual: usize },
    SourcePitchTooSmall { minimum: usize, actual: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResampleError {
    UnsupportedFormat(Format),
    SubImageMismatch,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    Allocation(AllocationError),
    OutOfRange { mip: u32, array_index: u32 },
    NotACubeMap,
    CopyMismatch,
    Resample(ResampleError),
}
