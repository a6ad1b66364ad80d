//! Card system: definitions, instances, and registry.
//!
//! ## Key Types
//!
//! - `CardDefinition`: Immutable catalog record, shared by all copies
//! - `CardRegistry`: Card definition lookup by code
//! - `BaseCard` / `Card`: Identity, face state and the ability registration contract
//! - `DrawCard`: Characters, locations, attachments and events
//! - `PlotCard`: Plots, with the per-round stats
//! - `CardSummary`: What one viewer can see of one card

pub mod base;
pub mod definition;
pub mod draw;
pub mod keyword;
pub mod plot;
pub mod registry;
pub mod summary;

pub use base::{BaseCard, Card};
pub use definition::{CardDefinition, CardType, PlotStat};
pub use draw::DrawCard;
pub use keyword::has_keyword;
pub use plot::PlotCard;
pub use registry::CardRegistry;
pub use summary::CardSummary;
