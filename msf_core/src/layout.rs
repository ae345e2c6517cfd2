// msf_core/src/layout.rs

use crate::error::{ConfigError, LookupError};
use crate::modules::{validate_modules, ModuleDescriptor};
use crate::types::{Block, ModuleId, StateKind, StateSpace};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Dimension of the core nominal state (quaternion attitude).
pub const NOMINAL_CORE_DIM: usize = 16;
/// Dimension of the core error state (tangent-space attitude).
pub const ERROR_CORE_DIM: usize = 15;

/// The named quantities of the fixed 16/15-state INS core.
///
/// The core is composed of:
/// - Position (3) in World Frame
/// - Velocity (3) in World Frame
/// - Attitude (4 nominal / 3 error) from World to Body Frame
/// - Accelerometer Bias (3) in Body Frame
/// - Gyroscope Bias (3) in Body Frame
///
/// This is a closed enumeration, so resolving a core label never fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoreState {
    Position,
    Velocity,
    Attitude,
    AccelBias,
    GyroBias,
}

impl CoreState {
    /// All core labels, in state-vector order.
    pub const ALL: [CoreState; 5] = [
        CoreState::Position,
        CoreState::Velocity,
        CoreState::Attitude,
        CoreState::AccelBias,
        CoreState::GyroBias,
    ];

    /// The fixed slice this quantity occupies in the requested space.
    pub const fn block(self, space: StateSpace) -> Block {
        match space {
            StateSpace::Nominal => match self {
                CoreState::Position => Block::new(0, 3),
                CoreState::Velocity => Block::new(3, 3),
                CoreState::Attitude => Block::new(6, 4),
                CoreState::AccelBias => Block::new(10, 3),
                CoreState::GyroBias => Block::new(13, 3),
            },
            StateSpace::Error => match self {
                CoreState::Position => Block::new(0, 3),
                CoreState::Velocity => Block::new(3, 3),
                CoreState::Attitude => Block::new(6, 3),
                CoreState::AccelBias => Block::new(9, 3),
                CoreState::GyroBias => Block::new(12, 3),
            },
        }
    }
}

/// Where one module's extra states landed, in both spaces.
///
/// Within a module's slice the linear states come first, then the
/// rotational blocks, so the module's whole contribution is contiguous.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleLayout {
    pub descriptor: ModuleDescriptor,
    nominal_linear: Block,
    error_linear: Block,
    nominal_rotational: Block,
    error_rotational: Block,
}

impl ModuleLayout {
    fn block(&self, kind: StateKind, space: StateSpace) -> Block {
        match (kind, space) {
            (StateKind::Linear, StateSpace::Nominal) => self.nominal_linear,
            (StateKind::Linear, StateSpace::Error) => self.error_linear,
            (StateKind::Rotational, StateSpace::Nominal) => self.nominal_rotational,
            (StateKind::Rotational, StateSpace::Error) => self.error_rotational,
        }
    }

    /// The module's whole contiguous slice in the requested space.
    fn span(&self, space: StateSpace) -> Block {
        let linear = self.block(StateKind::Linear, space);
        let rotational = self.block(StateKind::Rotational, space);
        Block::new(linear.offset, linear.len + rotational.len)
    }
}

/// The derived, immutable layout of one filter configuration.
///
/// Composed once from an ordered list of [`ModuleDescriptor`]s: the core
/// block comes first, then each module's slice in declaration order, with
/// no gaps and no overlap in either space. Declaration order is part of the
/// contract — two filters configured with the same modules in different
/// orders are not layout-compatible.
///
/// A schema is read-only after composition and safe to share across
/// threads; reconfiguring a filter means composing a brand-new schema.
#[derive(Debug, Clone, PartialEq)]
pub struct StateSchema {
    nominal_dim: usize,
    error_dim: usize,
    entries: Vec<ModuleLayout>,
    // Name -> position in `entries`, for O(1) resolution.
    index: HashMap<ModuleId, usize>,
}

impl StateSchema {
    /// Validates the configuration and lays out every module.
    ///
    /// A single forward pass: two cursors start just past the core block
    /// (16 nominal, 15 error) and advance by each module's contribution —
    /// `num_linear` scalars in both spaces, plus 4 (nominal) or 3 (error)
    /// scalars per rotational block. All size arithmetic is checked;
    /// pathological configurations fail with [`ConfigError::SizeOverflow`]
    /// instead of wrapping.
    pub fn compose(descriptors: &[ModuleDescriptor]) -> Result<Self, ConfigError> {
        validate_modules(descriptors)?;

        let mut entries = Vec::with_capacity(descriptors.len());
        let mut index = HashMap::with_capacity(descriptors.len());

        let mut nominal_cursor = NOMINAL_CORE_DIM;
        let mut error_cursor = ERROR_CORE_DIM;

        for desc in descriptors {
            let overflow = || ConfigError::SizeOverflow(desc.id.clone());

            let nominal_rot_len = desc
                .num_rotational
                .checked_mul(4)
                .ok_or_else(overflow)?;
            let error_rot_len = desc
                .num_rotational
                .checked_mul(3)
                .ok_or_else(overflow)?;

            let nominal_linear = Block::new(nominal_cursor, desc.num_linear);
            let error_linear = Block::new(error_cursor, desc.num_linear);

            nominal_cursor = nominal_cursor
                .checked_add(desc.num_linear)
                .ok_or_else(overflow)?;
            error_cursor = error_cursor
                .checked_add(desc.num_linear)
                .ok_or_else(overflow)?;

            let nominal_rotational = Block::new(nominal_cursor, nominal_rot_len);
            let error_rotational = Block::new(error_cursor, error_rot_len);

            nominal_cursor = nominal_cursor
                .checked_add(nominal_rot_len)
                .ok_or_else(overflow)?;
            error_cursor = error_cursor
                .checked_add(error_rot_len)
                .ok_or_else(overflow)?;

            index.insert(desc.id.clone(), entries.len());
            entries.push(ModuleLayout {
                descriptor: desc.clone(),
                nominal_linear,
                error_linear,
                nominal_rotational,
                error_rotational,
            });
        }

        Ok(Self {
            nominal_dim: nominal_cursor,
            error_dim: error_cursor,
            entries,
            index,
        })
    }

    /// Total dimension of the nominal state vector.
    pub fn nominal_dim(&self) -> usize {
        self.nominal_dim
    }

    /// Total dimension of the error state vector (and covariance).
    pub fn error_dim(&self) -> usize {
        self.error_dim
    }

    /// Dimension of the requested space.
    pub fn dim(&self, space: StateSpace) -> usize {
        match space {
            StateSpace::Nominal => self.nominal_dim,
            StateSpace::Error => self.error_dim,
        }
    }

    /// Number of configured modules.
    pub fn num_modules(&self) -> usize {
        self.entries.len()
    }

    /// The module layouts, in declaration order.
    pub fn modules(&self) -> impl Iterator<Item = &ModuleLayout> {
        self.entries.iter()
    }

    /// The descriptors this schema was composed from, in declaration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &ModuleDescriptor> {
        self.entries.iter().map(|e| &e.descriptor)
    }

    pub fn contains(&self, id: &ModuleId) -> bool {
        self.index.contains_key(id)
    }

    /// Resolves a core-state label. Core offsets are fixed constants, so
    /// this always succeeds.
    pub fn resolve_core(&self, label: CoreState, space: StateSpace) -> Block {
        label.block(space)
    }

    /// Resolves one kind of a module's extra states.
    ///
    /// Fails if the module is not part of this configuration, or if the
    /// module's *descriptor* declares zero states of the requested kind.
    /// The declared count is what is checked, so a module with
    /// `num_linear = 0` is rejected for `StateKind::Linear` even though it
    /// is a perfectly valid module otherwise.
    pub fn resolve_module(
        &self,
        id: &ModuleId,
        kind: StateKind,
        space: StateSpace,
    ) -> Result<Block, LookupError> {
        let entry = self.entry(id)?;
        let declared = match kind {
            StateKind::Linear => entry.descriptor.num_linear,
            StateKind::Rotational => entry.descriptor.num_rotational,
        };
        if declared == 0 {
            return Err(LookupError::KindNotDeclared {
                id: id.clone(),
                kind,
            });
        }
        Ok(entry.block(kind, space))
    }

    /// The module's whole contiguous slice (linear and rotational states
    /// together) in the requested space. The slice may be empty for a
    /// module that contributes no extra states.
    pub fn module_span(&self, id: &ModuleId, space: StateSpace) -> Result<Block, LookupError> {
        Ok(self.entry(id)?.span(space))
    }

    fn entry(&self, id: &ModuleId) -> Result<&ModuleLayout, LookupError> {
        self.index
            .get(id)
            .map(|&i| &self.entries[i])
            .ok_or_else(|| LookupError::UnknownModule(id.clone()))
    }
}
