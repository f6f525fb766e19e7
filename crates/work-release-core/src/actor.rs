//! Opaque references into the identity directory.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The user who approved, verified or created something. The engine never
/// resolves it; it is stored for audit only.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ActorId(pub Uuid);

impl fmt::Display for ActorId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.fmt(f)
  }
}

impl From<Uuid> for ActorId {
  fn from(id: Uuid) -> Self { Self(id) }
}
