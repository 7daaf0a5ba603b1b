//! Genesis state records.
//!
//! Records are externally tagged JSON objects such as `{"Account": {...}}`.
//! Only the kinds the patcher touches are typed; every other record is carried
//! through as raw JSON so the file round-trips without loss.
//!
//! Typed bodies keep the keys they do not know about in `extra`. Their serde
//! impls go through a JSON map directly so numbers of any size in those keys
//! are kept exactly.
use crate::balance::Balance;
use crate::error::GenesisError;
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const ACCOUNT_TAG: &str = "Account";
pub const ACCESS_KEY_TAG: &str = "AccessKey";

/// Base58 of 32 zero bytes: no contract deployed.
pub const EMPTY_CODE_HASH: &str = "11111111111111111111111111111111";
pub const ACCOUNT_VERSION: &str = "V1";
pub const FULL_ACCESS_PERMISSION: &str = "FullAccess";

#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub amount: Balance,
    pub locked: Balance,
    pub code_hash: String,
    pub storage_usage: u64,
    pub version: Option<String>,
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AccountRecord {
    pub account_id: String,
    pub account: Account,
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AccessKey {
    pub nonce: u64,
    /// `"FullAccess"` or a `{"FunctionCall": {...}}` object.
    pub permission: Value,
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AccessKeyRecord {
    pub account_id: String,
    pub public_key: String,
    pub access_key: AccessKey,
    pub extra: Map<String, Value>,
}

fn take_field<T, E>(object: &mut Map<String, Value>, key: &'static str) -> Result<T, E>
where
    T: DeserializeOwned,
    E: de::Error,
{
    let value = object
        .shift_remove(key)
        .ok_or_else(|| E::missing_field(key))?;
    serde_json::from_value(value).map_err(E::custom)
}

fn take_optional_field<T, E>(object: &mut Map<String, Value>, key: &str) -> Result<Option<T>, E>
where
    T: DeserializeOwned,
    E: de::Error,
{
    match object.shift_remove(key) {
        Some(value) => serde_json::from_value(value).map_err(E::custom),
        None => Ok(None),
    }
}

fn serialize_extra<M: SerializeMap>(map: &mut M, extra: &Map<String, Value>) -> Result<(), M::Error> {
    for (key, value) in extra {
        map.serialize_entry(key, value)?;
    }
    Ok(())
}

impl<'de> Deserialize<'de> for Account {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut extra = Map::deserialize(deserializer)?;
        Ok(Account {
            amount: take_field(&mut extra, "amount")?,
            locked: take_field(&mut extra, "locked")?,
            code_hash: take_field(&mut extra, "code_hash")?,
            storage_usage: take_field(&mut extra, "storage_usage")?,
            version: take_optional_field(&mut extra, "version")?,
            extra,
        })
    }
}

impl Serialize for Account {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("amount", &self.amount)?;
        map.serialize_entry("locked", &self.locked)?;
        map.serialize_entry("code_hash", &self.code_hash)?;
        map.serialize_entry("storage_usage", &self.storage_usage)?;
        if let Some(version) = &self.version {
            map.serialize_entry("version", version)?;
        }
        serialize_extra(&mut map, &self.extra)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for AccountRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut extra = Map::deserialize(deserializer)?;
        Ok(AccountRecord {
            account_id: take_field(&mut extra, "account_id")?,
            account: take_field(&mut extra, "account")?,
            extra,
        })
    }
}

impl Serialize for AccountRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("account_id", &self.account_id)?;
        map.serialize_entry("account", &self.account)?;
        serialize_extra(&mut map, &self.extra)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for AccessKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut extra = Map::deserialize(deserializer)?;
        Ok(AccessKey {
            nonce: take_field(&mut extra, "nonce")?,
            permission: take_field(&mut extra, "permission")?,
            extra,
        })
    }
}

impl Serialize for AccessKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("nonce", &self.nonce)?;
        map.serialize_entry("permission", &self.permission)?;
        serialize_extra(&mut map, &self.extra)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for AccessKeyRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut extra = Map::deserialize(deserializer)?;
        Ok(AccessKeyRecord {
            account_id: take_field(&mut extra, "account_id")?,
            public_key: take_field(&mut extra, "public_key")?,
            access_key: take_field(&mut extra, "access_key")?,
            extra,
        })
    }
}

impl Serialize for AccessKeyRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("account_id", &self.account_id)?;
        map.serialize_entry("public_key", &self.public_key)?;
        map.serialize_entry("access_key", &self.access_key)?;
        serialize_extra(&mut map, &self.extra)?;
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Account(AccountRecord),
    AccessKey(AccessKeyRecord),
    /// Any other record kind, kept verbatim.
    Other(Value),
}

impl Record {
    /// A fresh account with no contract and no locked stake.
    pub fn new_account(account_id: &str, amount: Balance) -> Self {
        Record::Account(AccountRecord {
            account_id: account_id.to_string(),
            account: Account {
                amount,
                locked: Balance::zero(),
                code_hash: EMPTY_CODE_HASH.to_string(),
                storage_usage: 0,
                version: Some(ACCOUNT_VERSION.to_string()),
                extra: Map::new(),
            },
            extra: Map::new(),
        })
    }

    pub fn new_full_access_key(account_id: &str, public_key: &str) -> Self {
        Record::AccessKey(AccessKeyRecord {
            account_id: account_id.to_string(),
            public_key: public_key.to_string(),
            access_key: AccessKey {
                nonce: 0,
                permission: Value::String(FULL_ACCESS_PERMISSION.to_string()),
                extra: Map::new(),
            },
            extra: Map::new(),
        })
    }

    /// Classifies a raw JSON record.
    ///
    /// Fails when the record carries a known tag but is not a single-tag
    /// object of that kind's shape.
    pub fn from_value(value: Value) -> Result<Self, GenesisError> {
        let mut object = match value {
            Value::Object(object) => object,
            other => return Ok(Record::Other(other)),
        };
        let known_tag = [ACCOUNT_TAG, ACCESS_KEY_TAG]
            .into_iter()
            .find(|tag| object.contains_key(*tag));
        let Some(tag) = known_tag else {
            return Ok(Record::Other(Value::Object(object)));
        };
        if object.len() != 1 {
            let keys: Vec<&str> = object.keys().map(String::as_str).collect();
            return Err(GenesisError::MalformedInput(format!(
                "{tag} record has extra keys: {}",
                keys.join(", ")
            )));
        }

        let body = object.shift_remove(tag).unwrap_or_default();
        if tag == ACCOUNT_TAG {
            parse_body(tag, body).map(Record::Account)
        } else {
            parse_body(tag, body).map(Record::AccessKey)
        }
    }
}

fn parse_body<T: DeserializeOwned>(tag: &str, body: Value) -> Result<T, GenesisError> {
    let account_id = body
        .get("account_id")
        .and_then(Value::as_str)
        .unwrap_or("<unknown>")
        .to_string();
    serde_json::from_value(body).map_err(|err| {
        GenesisError::MalformedInput(format!("{tag} record for '{account_id}': {err}"))
    })
}

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Record::Account(record) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(ACCOUNT_TAG, record)?;
                map.end()
            }
            Record::AccessKey(record) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(ACCESS_KEY_TAG, record)?;
                map.end()
            }
            Record::Other(value) => value.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Record::from_value(value).map_err(de::Error::custom)
    }
}
