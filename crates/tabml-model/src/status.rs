//! Pipeline lifecycle state and the operator-facing status indicator.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle of an inference pipeline.
///
/// `Unloaded -> Loading -> Ready <-> Inferring`, with `LoadError` reachable
/// from `Loading` and left only by another load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    #[default]
    Unloaded,
    Loading,
    Ready,
    Inferring,
    LoadError,
}

impl PipelineState {
    /// Whether a load may start from this state.
    pub fn can_load(self) -> bool {
        matches!(self, Self::Unloaded | Self::LoadError | Self::Ready)
    }

    /// Whether requests are accepted in this state.
    pub fn accepts_requests(self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// Indicator colour shown by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusColor {
    Grey,
    Yellow,
    Green,
    Blue,
    Red,
}

/// Indicator shape shown by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusShape {
    Dot,
    Ring,
}

/// Discrete status published on the host's status channel.
///
/// Unlike [`PipelineState`], `Error` only reflects the last request: the
/// pipeline itself stays ready after a failed inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStatus {
    NotReady,
    Loading,
    Ready,
    Inferring,
    Error,
    LoadError,
}

impl PipelineStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::NotReady => "Not Ready",
            Self::Loading => "Loading...",
            Self::Ready => "Ready",
            Self::Inferring => "Inferring...",
            Self::Error => "Error",
            Self::LoadError => "Load Error",
        }
    }

    pub fn color(self) -> StatusColor {
        match self {
            Self::NotReady => StatusColor::Grey,
            Self::Loading => StatusColor::Yellow,
            Self::Ready => StatusColor::Green,
            Self::Inferring => StatusColor::Blue,
            Self::Error | Self::LoadError => StatusColor::Red,
        }
    }

    pub fn shape(self) -> StatusShape {
        match self {
            Self::Ready | Self::Inferring | Self::Error => StatusShape::Dot,
            Self::NotReady | Self::Loading | Self::LoadError => StatusShape::Ring,
        }
    }
}

impl From<PipelineState> for PipelineStatus {
    fn from(state: PipelineState) -> Self {
        match state {
            PipelineState::Unloaded => Self::NotReady,
            PipelineState::Loading => Self::Loading,
            PipelineState::Ready => Self::Ready,
            PipelineState::Inferring => Self::Inferring,
            PipelineState::LoadError => Self::LoadError,
        }
    }
}

impl fmt::Display for PipelineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
