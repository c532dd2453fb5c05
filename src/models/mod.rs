pub mod common;
pub mod image;
pub mod operation;
pub mod request;

pub use self::common::*;
pub use self::image::*;
pub use self::operation::*;
pub use self::request::*;
