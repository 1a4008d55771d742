// crates/respond-broker/src/lib.rs
// ============================================================================
// Module: Respond Broker Library
// Description: External collaborators for the respond command surface.
// Purpose: Publish response reports and run executable responses.
// Dependencies: reqwest, tokio, url
// ============================================================================

//! ## Overview
//! The broker holds everything respond talks to outside its own store: text
//! publishers that turn a report into a shareable URL and the shell runner
//! that turns an executable response into reply lines.
//! Invariants:
//! - Publishers reject empty text before any network call.
//! - Redirects and non-success statuses fail closed.
//! - Commands are killed when they exceed their timeout.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod exec;
pub mod publish;


// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use exec::CommandRunner;
pub use exec::ExecError;
pub use exec::ShellRunner;
pub use publish::DisabledPublisher;
pub use publish::HastePublisher;
pub use publish::MAX_PUBLISH_RESPONSE_BYTES;
pub use publish::PastebinPublisher;
pub use publish::PublishError;
pub use publish::TextPublisher;
pub use publish::report_title;
