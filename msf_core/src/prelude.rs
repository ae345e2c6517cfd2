// msf_core/src/prelude.rs

// --- Core Abstractions (The main contracts of the library) ---
pub use crate::modules::{validate_modules, ModuleDescriptor, SensorModule};

// --- Core Data Structures (The "nouns" of the library) ---
pub use crate::layout::{CoreState, StateSchema, ERROR_CORE_DIM, NOMINAL_CORE_DIM};
pub use crate::state::FilterState;
pub use crate::storage::ModuleStorage;
pub use crate::types::{Block, ModuleId, StateKind, StateSpace};

// --- Errors ---
pub use crate::error::{ConfigError, LookupError};
