//! Rebuttal handling: installing oracle-found rebuttals and proposing new ones

mod annotation;
mod expansion;
mod item;
mod proposal;

pub use annotation::Annotation;
pub use expansion::{ExpansionConfig, ExpansionEngine, ExpansionReport};
pub use item::RebuttalItem;
pub use proposal::{ProposalAggregator, ProposalReport, RebuttalProposal};
