// msf_core/src/error.rs

use crate::types::{ModuleId, StateKind};
use thiserror::Error;

/// Errors detected once, while a configuration is being turned into a
/// schema/storage pair. A configuration that produces one of these never
/// yields a schema; any previously active schema is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("no sensor modules configured; a filter needs at least one")]
    NoModules,

    #[error("duplicate sensor module '{0}' in configuration")]
    DuplicateModule(ModuleId),

    #[error("sensor module '{0}' declares a zero-sized measurement")]
    ZeroMeasurementSize(ModuleId),

    #[error("state vector size overflows while adding module '{0}'")]
    SizeOverflow(ModuleId),

    #[error(
        "module storage does not match the schema: expected module '{expected}' \
         at position {position}, found '{found}'"
    )]
    StorageMismatch {
        position: usize,
        expected: ModuleId,
        found: ModuleId,
    },

    #[error("module storage holds {found} instances but the schema has {expected} modules")]
    StorageLengthMismatch { expected: usize, found: usize },
}

/// Errors detected at query time. These never corrupt the schema or the
/// storage they were asked about.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("sensor module '{0}' is not part of this configuration")]
    UnknownModule(ModuleId),

    #[error("sensor module '{id}' declares no {kind:?} states")]
    KindNotDeclared { id: ModuleId, kind: StateKind },
}
