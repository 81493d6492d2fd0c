// bootforge-core: settings reconciliation and validation engine for the
// appliance setup screens. Rendering, interface enumeration, and the
// probe implementations live elsewhere -- this crate merges defaults,
// persisted settings, and in-progress edits into one coherent view,
// validates it, and writes accepted values back through the settings
// store.

pub mod error;
pub mod feedback;
pub mod keys;
pub mod model;
pub mod net;
pub mod probe;
pub mod reconcile;
pub mod screen;
pub mod timeout;
pub mod validate;

// ── Primary re-exports ──────────────────────────────────────────────
pub use error::CoreError;
pub use feedback::{Feedback, SilentFeedback};
pub use reconcile::{Edits, ReconciledDefaults, reconcile, visible_fields};
pub use screen::{BootstrapImage, PxeSetup};
pub use validate::{Responses, ResponseValue, ValidationResult};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    // Interface facts
    BootProtocol, InterfaceFacts, LinkState,
    // Screen-wide flags
    DeploymentMode, Flavor,
    // Fields
    FieldDescriptor, FieldValue, SubField, WidgetKind,
    // Repositories
    ParsedRepoLine, RepoEntryStorage, RepoEntryUi,
};

pub use probe::{
    DhcpOffer, DhcpProbe, DuplicateAddressProbe, NetworkFactsSource, ProbeError, Proxies, UrlProbe,
};
