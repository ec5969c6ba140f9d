//! Resolution of recorded aircraft types to types with known limits.
use crate::{Error, Limits};

/// Unsupported types and the supported type flown in their place.
static FALLBACKS: &[(&str, &str)] = &[
    // regional jet -> narrow-body analog
    ("E195", "B737"),
    ("A20N", "A319"),
    ("B734", "B738"),
    ("B772", "B77W"),
];

/// The aircraft type used to compute a mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Airframe<'a> {
    /// The recorded type has known limits
    Supported(&'a str),
    /// The recorded type has no limits and `substitute` is used instead
    Substituted {
        requested: &'a str,
        substitute: &'static str,
    },
}

impl<'a> Airframe<'a> {
    /// Resolves `type_code` against `limits`, falling back to the fixed substitution table.
    /// # Error
    /// [`Error::UnsupportedAirframe`] when neither knows the type.
    pub fn resolve(type_code: &'a str, limits: &Limits) -> Result<Self, Error> {
        if limits.contains_key(type_code) {
            return Ok(Self::Supported(type_code));
        }
        match fallback(type_code) {
            Some(substitute) if limits.contains_key(substitute) => {
                log::warn!(
                    "{type_code} not supported, selecting {substitute} as fallback airframe"
                );
                Ok(Self::Substituted {
                    requested: type_code,
                    substitute,
                })
            }
            _ => Err(Error::UnsupportedAirframe(type_code.to_string())),
        }
    }

    /// The type whose limits and models are used
    pub fn type_code(&self) -> &'a str {
        match self {
            Self::Supported(type_code) => *type_code,
            Self::Substituted { substitute, .. } => *substitute,
        }
    }

    /// The recorded type, when it was replaced
    pub fn substituted_from(&self) -> Option<&'a str> {
        match self {
            Self::Supported(_) => None,
            Self::Substituted { requested, .. } => Some(*requested),
        }
    }
}

/// Returns the substitute of an unsupported type, if any
pub fn fallback(type_code: &str) -> Option<&'static str> {
    FALLBACKS
        .iter()
        .find(|(unsupported, _)| *unsupported == type_code)
        .map(|(_, substitute)| *substitute)
}
