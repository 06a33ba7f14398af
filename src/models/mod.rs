//! Domain models for project scoping.
//!
//! # Core Concepts
//!
//! ## Stage Outputs
//!
//! Each pipeline stage produces one collection, threaded into the next stage:
//!
//! - [`Feature`]: A buildable capability extracted from the transcript and documents.
//! - [`Priority`]: Business priority for a feature, referencing it by title.
//! - [`Risk`]: A technical, timeline, or resource risk with a mitigation.
//! - [`PocVersion`]: One of three proof-of-concept strategies with a cost estimate.
//! - [`Deliverable`]: A line item of the MVP plan built from the selected POC.
//!
//! ## Wizard Data
//!
//! - [`ProjectInputs`]: What the user typed and uploaded.
//! - [`ProjectResults`]: Every stage output gathered so far.
//!
//! ## Wire Inputs
//!
//! Request bodies of the `/api/ai/*` routes ([`ExtractFeaturesInput`] and friends)
//! are shared by the HTTP handlers, the pipeline, and the backend client.
//!
//! Cross references between entities are by name, never by id:
//! `Priority::feature` and `PocVersion::features` hold feature titles.

mod deliverable;
mod feature;
mod level;
mod poc;
mod priority;
mod project;
mod risk;
mod stage;
mod wire;

pub use deliverable::*;
pub use feature::*;
pub use level::*;
pub use poc::*;
pub use priority::*;
pub use project::*;
pub use risk::*;
pub use stage::*;
pub use wire::*;
