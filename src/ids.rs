//! Typed identifiers for actors, tasks, and workers.
//!
//! All three wrap an opaque owned string assigned by the caller (or by the
//! cluster directory, for [`WorkerId`]). They are only ever compared, hashed,
//! and printed; the submitter never inspects their contents.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies a remote actor for the lifetime of the actor handle.
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(String);

/// Identifies a single submitted invocation; unique across all submissions.
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

/// Identifies the concrete remote process currently hosting an actor.
///
/// Changes on every actor restart, which is what lets a stale reply be told
/// apart from one sent by the current incarnation.
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkerId(String);

macro_rules! impl_opaque_id {
    ($T:ident) => {
        impl $T {
            /// Wraps a caller-provided identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// The identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $T {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl fmt::Debug for $T {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($T), "({})"), self.0)
            }
        }

        impl From<&str> for $T {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
}

impl_opaque_id!(ActorId);
impl_opaque_id!(TaskId);
impl_opaque_id!(WorkerId);
