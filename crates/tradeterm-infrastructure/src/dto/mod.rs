//! On-disk representations mapped into core domain types.

pub mod persona;

pub use persona::PersonaFileDto;
