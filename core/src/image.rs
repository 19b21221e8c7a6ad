use serde::{Deserialize, Serialize};

use crate::Format;

pub const CUBE_FACE_COUNT: u32 = 6;

bitflags! {
  #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
  pub struct ImageFlags: u32 {
    const CUBE_MAP = 0b1;
  }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum TextureDimension {
  Dim2D,
  Dim2DArray,
  DimCube,
  DimCubeArray
}

/// Face order matches the D3D cube map convention.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum CubeFace {
  PositiveX,
  NegativeX,
  PositiveY,
  NegativeY,
  PositiveZ,
  NegativeZ
}

impl CubeFace {
  pub const ALL: [CubeFace; CUBE_FACE_COUNT as usize] = [
    CubeFace::PositiveX,
    CubeFace::NegativeX,
    CubeFace::PositiveY,
    CubeFace::NegativeY,
    CubeFace::PositiveZ,
    CubeFace::NegativeZ
  ];

  pub fn index(&self) -> u32 {
    match self {
      CubeFace::PositiveX => 0,
      CubeFace::NegativeX => 1,
      CubeFace::PositiveY => 2,
      CubeFace::NegativeY => 3,
      CubeFace::PositiveZ => 4,
      CubeFace::NegativeZ => 5
    }
  }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MetadataError {
  ZeroExtent,
  ZeroMipLevels,
  ZeroArrayLength,
  ExcessiveMipLevels,
  InvalidCubeFaceCount,
  TooManySubresources
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ImageMetadata {
  pub width: u32,
  pub height: u32,
  pub format: Format,
  pub mip_levels: u32,
  pub array_length: u32,
  pub flags: ImageFlags
}

impl ImageMetadata {
  pub fn new_2d(width: u32, height: u32, format: Format) -> Self {
    Self {
      width,
      height,
      format,
      mip_levels: 1,
      array_length: 1,
      flags: ImageFlags::empty()
    }
  }

  pub fn new_cube(width: u32, height: u32, format: Format) -> Self {
    Self {
      width,
      height,
      format,
      mip_levels: 1,
      array_length: CUBE_FACE_COUNT,
      flags: ImageFlags::CUBE_MAP
    }
  }

  pub fn is_cube(&self) -> bool {
    self.flags.contains(ImageFlags::CUBE_MAP)
  }

  pub fn dimension(&self) -> TextureDimension {
    if self.is_cube() {
      if self.array_length > CUBE_FACE_COUNT {
        TextureDimension::DimCubeArray
      } else {
        TextureDimension::DimCube
      }
    } else if self.array_length > 1 {
      TextureDimension::Dim2DArray
    } else {
      TextureDimension::Dim2D
    }
  }

  /// Extent of the given mip level, successive halving clamped to 1.
  pub fn mip_extent(&self, mip: u32) -> (u32, u32) {
    ((self.width >> mip).max(1), (self.height >> mip).max(1))
  }

  /// Level count of a full chain down to 1x1: floor(log2(max(w, h))) + 1.
  pub fn full_mip_count(&self) -> u32 {
    self.width.max(self.height).max(1).ilog2() + 1
  }

  pub fn subresource_index(&self, mip: u32, array_index: u32) -> u32 {
    array_index * self.mip_levels + mip
  }

  pub fn subresource_count(&self) -> u32 {
    self.mip_levels * self.array_length
  }

  pub fn validate(&self) -> Result<(), MetadataError> {
    if self.width == 0 || self.height == 0 {
      return Err(MetadataError::ZeroExtent);
    }
    if self.mip_levels == 0 {
      return Err(MetadataError::ZeroMipLevels);
    }
    if self.array_length == 0 {
      return Err(MetadataError::ZeroArrayLength);
    }
    if self.mip_levels > self.full_mip_count() {
      return Err(MetadataError::ExcessiveMipLevels);
    }
    if self.is_cube()
      && (self.array_length < CUBE_FACE_COUNT || self.array_length % CUBE_FACE_COUNT != 0) {
      return Err(MetadataError::InvalidCubeFaceCount);
    }
    if self.mip_levels.checked_mul(self.array_length).is_none() {
      return Err(MetadataError::TooManySubresources);
    }
    Ok(())
  }
}
