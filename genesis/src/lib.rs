//! Provisions accounts in NEAR-style genesis files while keeping total supply
//! constant.

pub mod balance;
pub mod document;
pub mod error;
pub mod patcher;
pub mod record;

pub use crate::{
    balance::Balance,
    document::GenesisDocument,
    error::{GenesisError, Result},
    patcher::{GenesisPatcher, PatchOutcome, PatchReport, PatchSummary, TreasuryAdjustment},
};
