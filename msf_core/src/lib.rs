// msf_core/src/lib.rs

// This file defines the public modules of your library.
pub mod error;
pub mod layout;
pub mod modules;
pub mod prelude;
pub mod state;
pub mod storage;
pub mod types;
