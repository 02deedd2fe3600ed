//! Entity Identifiers
//!
//! Two id shapes live here:
//! - human-readable ids `prefix-NNN-xxxxxxxx` for users and clinic records
//! - typed UUID wrappers for records that are never read aloud (predictions)

use std::fmt;
use std::marker::PhantomData;
use std::sync::{LazyLock, Mutex, PoisonError};

use rand::distr::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Serialize, Serializer};
use uuid::Uuid;

/// Length of the random tail of a human-readable id
pub const SUFFIX_LENGTH: usize = 8;

/// Process-wide suffix generator, seeded once from the OS.
static SUFFIX_RNG: LazyLock<Mutex<StdRng>> = LazyLock::new(|| Mutex::new(StdRng::from_os_rng()));

/// Build a human-readable id: `{prefix}-{sequence:03}-{8 alphanumerics}`.
///
/// The sequence is zero-padded to at least three digits and printed in full
/// beyond that (`patient-1234-...`). Uniqueness comes from the caller's
/// sequence, which must be drawn from a store-side counter.
///
/// ```
/// let id = kernel::id::generate("patient", 5);
/// assert!(id.starts_with("patient-005-"));
/// assert_eq!(id.len(), "patient-005-".len() + 8);
/// ```
pub fn generate(prefix: &str, sequence: i64) -> String {
    format!("{prefix}-{sequence:03}-{}", random_suffix())
}

fn random_suffix() -> String {
    let mut rng = SUFFIX_RNG.lock().unwrap_or_else(PoisonError::into_inner);
    (&mut *rng)
        .sample_iter(Alphanumeric)
        .take(SUFFIX_LENGTH)
        .map(char::from)
        .collect()
}

/// Generic typed ID wrapper
///
/// Usage:
/// ```
/// use kernel::id::{Id, markers};
/// type PredictionId = Id<markers::Prediction>;
/// let id = PredictionId::new();
/// assert_eq!(id.to_string().len(), 36);
/// ```
pub struct Id<T> {
    value: Uuid,
    _marker: PhantomData<T>,
}

impl<T> Id<T> {
    /// Create a new random ID (UUID v4)
    pub fn new() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self {
            value: uuid,
            _marker: PhantomData,
        }
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.value
    }
}

// Manual impls: derives would put bounds on the marker type.
impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Id<T> {}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Id<T> {}

impl<T> std::hash::Hash for Id<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> Default for Id<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.value)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

impl<T> From<Uuid> for Id<T> {
    fn from(uuid: Uuid) -> Self {
        Self::from_uuid(uuid)
    }
}

/// Marker types for different entity IDs
pub mod markers {
    /// Marker for Prediction IDs
    pub struct Prediction;
}

pub type PredictionId = Id<markers::Prediction>;
