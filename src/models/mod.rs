mod category;
mod collection;
mod image;
mod newsletter;
mod product;
mod review;

pub use category::*;
pub use collection::*;
pub use image::*;
pub use newsletter::*;
pub use product::*;
pub use review::*;
