pub mod domain;
pub mod error;
pub mod particles;
pub mod protocol;
