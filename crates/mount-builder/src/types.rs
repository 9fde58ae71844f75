use mount_kernel::{KernelError, KernelSolidHandle};
use mount_types::{DerivedDimensions, Side};

/// Stage of construction an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    LipClamp,
    Cradle,
    Assembly,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::LipClamp => write!(f, "lip clamp"),
            Stage::Cradle => write!(f, "cradle"),
            Stage::Assembly => write!(f, "assembly"),
        }
    }
}

/// A kernel failure, tagged with the construction stage that hit it.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{stage} construction failed: {source}")]
pub struct BuildError {
    pub stage: Stage,
    #[source]
    pub source: KernelError,
}

impl BuildError {
    pub(crate) fn at(stage: Stage) -> impl FnOnce(KernelError) -> BuildError {
        move |source| BuildError { stage, source }
    }
}

/// The combined mount and its two placed copies.
#[derive(Debug, Clone)]
pub struct MountPair {
    /// Lip clamp ∪ cradle at the construction origin.
    pub base: KernelSolidHandle,
    /// `base` shifted toward -X.
    pub left: KernelSolidHandle,
    /// `base` mirrored across YZ, then shifted toward +X.
    pub right: KernelSolidHandle,
    /// Dimensions the pair was built from.
    pub dims: DerivedDimensions,
}

impl MountPair {
    pub fn get(&self, side: Side) -> &KernelSolidHandle {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }
}
