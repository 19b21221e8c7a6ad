use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Format {
  R8UNorm,
  RG8UNorm,
  RGBA8UNorm,
  RGBA8Srgb,
  BGRA8UNorm,
  R16UNorm,
  RG16UNorm,
  R16Float,
  RG16Float,
  RGBA16Float,
  R32UInt,
  R32Float,
  RG32Float,
  RGBA32Float,
  BC1,
  BC1Alpha,
  BC2,
  BC3
}

impl Format {
  pub fn is_compressed(&self) -> bool {
    matches!(self,
      Format::BC1
      | Format::BC1Alpha
      | Format::BC2
      | Format::BC3)
  }

  /// Bytes per pixel for plain formats, bytes per block for compressed ones.
  pub fn element_size(&self) -> u32 {
    match self {
      Format::R8UNorm => 1,
      Format::RG8UNorm => 2,
      Format::RGBA8UNorm => 4,
      Format::RGBA8Srgb => 4,
      Format::BGRA8UNorm => 4,
      Format::R16UNorm => 2,
      Format::RG16UNorm => 4,
      Format::R16Float => 2,
      Format::RG16Float => 4,
      Format::RGBA16Float => 8,
      Format::R32UInt => 4,
      Format::R32Float => 4,
      Format::RG32Float => 8,
      Format::RGBA32Float => 16,

      Format::BC1 => 8,
      Format::BC1Alpha => 8,
      Format::BC2 => 16,
      Format::BC3 => 16
    }
  }

  pub fn block_extent(&self) -> (u32, u32) {
    match self {
      Format::BC1
        | Format::BC1Alpha
        | Format::BC2
        | Format::BC3 => (4, 4),

      _ => (1, 1)
    }
  }
}
