pub mod api;
pub mod cli;
pub mod engine;
pub mod error;
pub mod identity;
pub mod profile;
pub mod tags;
pub mod types;

pub use api::Anonymizer;
pub use cli::report::TextReport;
pub use engine::{ActionEntry, AnonymizationReport, ElementDisposition};
pub use error::{DeidentError, Result};
pub use identity::{BatchIdentity, IdentitySlot, UidRoot};
pub use profile::{Profile, ProfileBuilder, Rule};
pub use types::*;
