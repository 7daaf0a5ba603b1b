use crate::balance::Balance;
use crate::document::GenesisDocument;
use crate::error::{GenesisError, Result};
use crate::record::Record;
use blockchain_clap_utils::input_parsers::{parse_account_id, parse_public_key};
use blockchain_cli_config::{Config, NewAccount};
use log::{debug, error, info, warn};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// What happened to the treasury account in one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreasuryAdjustment {
    Adjusted { new_amount: Balance },
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchSummary {
    pub added: Vec<String>,
    /// Ids that were already provisioned.
    pub skipped: Vec<String>,
    pub deducted: Balance,
    pub treasury: TreasuryAdjustment,
}

impl PatchSummary {
    /// False when balance was handed out but nothing was deducted for it.
    pub fn conserves_supply(&self) -> bool {
        self.deducted.is_zero() || self.treasury != TreasuryAdjustment::NotFound
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
    Patched(PatchSummary),
    /// The path does not point to a file.
    Skipped,
}

/// Per-path results of a run, in the order the paths were given.
#[derive(Debug, Default)]
pub struct PatchReport {
    pub outcomes: Vec<(PathBuf, Result<PatchOutcome>)>,
}

impl PatchReport {
    pub fn failures(&self) -> impl Iterator<Item = (&Path, &GenesisError)> {
        self.outcomes
            .iter()
            .filter_map(|(path, outcome)| outcome.as_ref().err().map(|err| (path.as_path(), err)))
    }

    pub fn summaries(&self) -> impl Iterator<Item = (&Path, &PatchSummary)> {
        self.outcomes
            .iter()
            .filter_map(|(path, outcome)| match outcome {
                Ok(PatchOutcome::Patched(summary)) => Some((path.as_path(), summary)),
                _ => None,
            })
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    pub fn conserves_supply(&self) -> bool {
        self.summaries().all(|(_, summary)| summary.conserves_supply())
    }
}

/// Provisions a fixed set of accounts in genesis files, funding them from a
/// treasury account so total supply is unchanged.
#[derive(Debug, Clone)]
pub struct GenesisPatcher {
    new_accounts: Vec<NewAccount>,
    initial_balance: Balance,
    treasury_account: String,
    dry_run: bool,
}

impl GenesisPatcher {
    pub fn new(
        new_accounts: Vec<NewAccount>,
        initial_balance: Balance,
        treasury_account: impl Into<String>,
    ) -> Self {
        Self {
            new_accounts,
            initial_balance,
            treasury_account: treasury_account.into(),
            dry_run: false,
        }
    }

    /// Runs the transform without writing files back.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Adds missing accounts to `document` and charges the treasury for them.
    pub fn apply(&self, document: &mut GenesisDocument) -> PatchSummary {
        let mut existing: HashSet<String> =
            document.account_ids().into_iter().map(str::to_owned).collect();
        let mut added = Vec::new();
        let mut skipped = Vec::new();
        let mut deducted = Balance::zero();

        for new_account in &self.new_accounts {
            let account_id = &new_account.account_id;
            if !existing.insert(account_id.clone()) {
                info!("account {account_id} already exists, skipping");
                skipped.push(account_id.clone());
                continue;
            }

            info!("adding {account_id}");
            document
                .records
                .push(Record::new_account(account_id, self.initial_balance.clone()));
            document
                .records
                .push(Record::new_full_access_key(account_id, &new_account.public_key));
            deducted += &self.initial_balance;
            added.push(account_id.clone());
        }

        let treasury = match document.find_account_mut(&self.treasury_account) {
            Some(treasury) => {
                treasury.account.amount -= &deducted;
                let new_amount = treasury.account.amount.clone();
                info!(
                    "deducted {deducted} from '{}' account",
                    self.treasury_account
                );
                if new_amount.is_negative() {
                    warn!(
                        "treasury account '{}' balance is negative: {new_amount}",
                        self.treasury_account
                    );
                }
                TreasuryAdjustment::Adjusted { new_amount }
            }
            None => {
                warn!(
                    "treasury account '{}' not found, {deducted} was not deducted",
                    self.treasury_account
                );
                TreasuryAdjustment::NotFound
            }
        };
        debug!("total account balance: {}", document.total_balance());

        PatchSummary {
            added,
            skipped,
            deducted,
            treasury,
        }
    }

    /// Patches one genesis file in place. A missing file is skipped.
    pub fn patch(&self, path: &Path) -> Result<PatchOutcome> {
        if !path.is_file() {
            info!("skipping {} (not found)", path.display());
            return Ok(PatchOutcome::Skipped);
        }

        info!("updating {}...", path.display());
        let mut document = GenesisDocument::load(path)?;
        let summary = self.apply(&mut document);
        if self.dry_run {
            info!("dry run, not writing {}", path.display());
        } else {
            document.write(path)?;
        }
        info!("done.");

        Ok(PatchOutcome::Patched(summary))
    }

    /// Patches every path in order. A failure on one path is logged and
    /// recorded, and the remaining paths are still processed.
    pub fn patch_all<P: AsRef<Path>>(&self, paths: &[P]) -> PatchReport {
        let mut report = PatchReport::default();
        for path in paths {
            let path = path.as_ref();
            let outcome = self.patch(path);
            if let Err(err) = &outcome {
                error!("failed to patch {}: {err}", path.display());
            }
            report.outcomes.push((path.to_path_buf(), outcome));
        }
        report
    }
}

impl TryFrom<&Config> for GenesisPatcher {
    type Error = GenesisError;

    fn try_from(config: &Config) -> Result<Self> {
        let initial_balance = Balance::from_str(&config.initial_balance)?;
        if initial_balance.is_negative() {
            return Err(GenesisError::InvalidConfig(format!(
                "initial balance {initial_balance} is negative"
            )));
        }
        parse_account_id(&config.treasury_account).map_err(GenesisError::InvalidConfig)?;
        for new_account in &config.new_accounts {
            parse_account_id(&new_account.account_id).map_err(GenesisError::InvalidConfig)?;
            parse_public_key(&new_account.public_key).map_err(GenesisError::InvalidConfig)?;
        }

        Ok(Self::new(
            config.new_accounts.clone(),
            initial_balance,
            config.treasury_account.clone(),
        ))
    }
}
