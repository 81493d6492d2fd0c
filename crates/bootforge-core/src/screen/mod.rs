// ── Setup screens ──
//
// One type per configuration screen, each with the same lifecycle:
// `reconcile` for redraws, `check` for a validation pass, `apply` for
// check-then-save. A save merges only the accepted response keys into a
// copy of the last-saved document, so sections owned by other screens
// ride along untouched.

pub mod bootstrap;
pub mod pxe;

pub use bootstrap::BootstrapImage;
pub use pxe::PxeSetup;
