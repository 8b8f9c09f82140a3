use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColourStrategyKind {
    #[default]
    Smooth,
    Iteration,
    Wavelength,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown colour strategy '{0}' (expected smooth, iter or wave)")]
pub struct ParseColourStrategyKindError(pub String);

impl ColourStrategyKind {
    pub const ALL: &'static [Self] = &[Self::Smooth, Self::Iteration, Self::Wavelength];

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Smooth => "Smooth",
            Self::Iteration => "Iteration",
            Self::Wavelength => "Wavelength",
        }
    }

    /// Short name accepted on the command line.
    #[must_use]
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::Smooth => "smooth",
            Self::Iteration => "iter",
            Self::Wavelength => "wave",
        }
    }
}

impl std::fmt::Display for ColourStrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).display_name())
    }
}

impl FromStr for ColourStrategyKind {
    type Err = ParseColourStrategyKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();

        Self::ALL
            .iter()
            .copied()
            .find(|kind| {
                kind.short_name() == lowered || kind.display_name().eq_ignore_ascii_case(&lowered)
            })
            .ok_or_else(|| ParseColourStrategyKindError(s.to_string()))
    }
}
