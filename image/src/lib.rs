pub use self::error::*;
pub use self::layout::*;
pub use self::mip::*;
pub use self::resample::*;
pub use self::store::*;

mod error;
mod layout;
mod mip;
mod resample;
mod store;
