//! Operating mode owned by the controller.
//!
//! Cyclic ordering `Idle → Active → Diag → Idle`.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Mode {
    Idle = 0,
    Active = 1,
    Diag = 2,
}

impl Mode {
    /// Number of valid modes; any numeric value at or above this is invalid.
    pub const COUNT: u32 = 3;

    /// Decode a numeric mode value.  Out-of-range values yield `None`.
    pub const fn from_u32(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(Self::Idle),
            1 => Some(Self::Active),
            2 => Some(Self::Diag),
            _ => None,
        }
    }

    /// Next mode in the cycle, `(current + 1) mod COUNT`.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Idle => Self::Active,
            Self::Active => Self::Diag,
            Self::Diag => Self::Idle,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Active => "Active",
            Self::Diag => "Diag",
        }
    }
}
