#[macro_use]
extern crate bitflags;

pub use self::align::*;
pub use self::format::*;
pub use self::image::*;

mod align;
mod format;
mod image;
