// ── Domain model ──
//
// The shapes the engine reconciles and validates: interface facts from
// the network facts provider, field descriptors the screens render,
// and repository entries in their two encodings.

pub mod common;
pub mod facts;
pub mod field;
pub mod repo;

// ── Re-exports ──────────────────────────────────────────────────────

pub use common::{DeploymentMode, Flavor};
pub use facts::{BootProtocol, InterfaceFacts, LinkState};
pub use field::{FieldDescriptor, FieldValue, SubField, WidgetKind};
pub use repo::{ParsedRepoLine, RepoEntryStorage, RepoEntryUi};
