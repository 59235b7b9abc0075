mod de;
pub mod field;
pub mod integration;
pub mod issue;
pub mod meta;
pub mod user;

pub use field::*;
pub use integration::*;
pub use issue::*;
pub use meta::*;
pub use user::*;
