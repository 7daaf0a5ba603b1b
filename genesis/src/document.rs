use crate::balance::Balance;
use crate::error::{GenesisError, Result};
use crate::record::{AccountRecord, Record};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fs;
use std::mem;
use std::path::Path;
use std::str::FromStr;

pub const RECORDS_KEY: &str = "records";

/// A parsed genesis file.
///
/// Top-level fields other than `records` are opaque and written back
/// untouched, in their original order.
#[derive(Debug, Clone, PartialEq)]
pub struct GenesisDocument {
    // `records` keeps its slot here (emptied) so it is written back in place.
    fields: Map<String, Value>,
    pub records: Vec<Record>,
}

impl GenesisDocument {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_str(&contents)
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_string_pretty()?)?;
        Ok(())
    }

    /// Two-space indented JSON.
    pub fn to_string_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Ids of all `Account` records.
    pub fn account_ids(&self) -> HashSet<&str> {
        self.accounts()
            .map(|record| record.account_id.as_str())
            .collect()
    }

    pub fn accounts(&self) -> impl Iterator<Item = &AccountRecord> {
        self.records.iter().filter_map(|record| match record {
            Record::Account(account) => Some(account),
            _ => None,
        })
    }

    /// The first `Account` record for `account_id`.
    pub fn find_account_mut(&mut self, account_id: &str) -> Option<&mut AccountRecord> {
        self.records.iter_mut().find_map(|record| match record {
            Record::Account(account) if account.account_id == account_id => Some(account),
            _ => None,
        })
    }

    /// Sum of `amount` over all accounts, locked stake excluded.
    pub fn total_balance(&self) -> Balance {
        self.accounts().map(|record| &record.account.amount).sum()
    }
}

impl FromStr for GenesisDocument {
    type Err = GenesisError;

    fn from_str(s: &str) -> Result<Self> {
        let mut fields = match serde_json::from_str::<Value>(s)? {
            Value::Object(fields) => fields,
            _ => {
                return Err(GenesisError::MalformedInput(
                    "top level is not a JSON object".to_string(),
                ))
            }
        };
        let records = match fields.get_mut(RECORDS_KEY) {
            Some(Value::Array(records)) => mem::take(records),
            Some(_) => {
                return Err(GenesisError::MalformedInput(format!(
                    "`{RECORDS_KEY}` is not an array"
                )))
            }
            None => {
                return Err(GenesisError::MalformedInput(format!(
                    "missing `{RECORDS_KEY}` key"
                )))
            }
        };
        let records = records
            .into_iter()
            .map(Record::from_value)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { fields, records })
    }
}

impl Serialize for GenesisDocument {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            if key == RECORDS_KEY {
                map.serialize_entry(key, &self.records)?;
            } else {
                map.serialize_entry(key, value)?;
            }
        }
        map.end()
    }
}
