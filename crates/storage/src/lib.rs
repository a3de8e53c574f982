#![forbid(unsafe_code)]

pub mod repository;
pub mod session_codec;
pub mod sqlite;
