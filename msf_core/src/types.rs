// msf_core/src/types.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

// --- Core Identifier ---
// A sensor module is named, not typed. Configuration files refer to modules
// by string, and two filters agree on a layout only if they agree on the
// ordered list of these names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleId(pub String);

impl ModuleId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModuleId {
    fn from(name: &str) -> Self {
        Self(name.to_owned())
    }
}

/// Which of the two state vectors an offset refers to.
///
/// The nominal state stores rotations redundantly (unit quaternions, 4
/// scalars); the error state stores them minimally (tangent vectors, 3
/// scalars). The same configuration therefore has two different layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateSpace {
    Nominal,
    Error,
}

/// The kind of extra state a sensor module can contribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateKind {
    /// Additive states: same number of scalars in both spaces.
    Linear,
    /// Rotational states: one quaternion (4) per block in the nominal
    /// space, one tangent vector (3) per block in the error space.
    Rotational,
}

/// A contiguous slice of a flat state vector: `[offset, offset + len)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub offset: usize,
    pub len: usize,
}

impl Block {
    pub const fn new(offset: usize, len: usize) -> Self {
        Self { offset, len }
    }

    /// The half-open index range this block occupies.
    pub fn as_range(&self) -> Range<usize> {
        self.offset..self.offset + self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
