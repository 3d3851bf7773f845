mod serde;

pub use self::serde::*;
