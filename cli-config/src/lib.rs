use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io;
use std::path::PathBuf;

/// Account that funds newly provisioned accounts.
pub const DEFAULT_TREASURY_ACCOUNT: &str = "near";

/// 10 NEAR in yoctoNEAR.
pub const DEFAULT_INITIAL_BALANCE: &str = "10000000000000000000000000";

/// Number of nodes in the default localnet layout.
pub const DEFAULT_LOCALNET_NODES: usize = 4;

/// An account to provision in every genesis file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAccount {
    pub account_id: String,
    /// Public key in `ed25519:<base58>` form, granted full access.
    pub public_key: String,
}

impl NewAccount {
    pub fn new(account_id: impl Into<String>, public_key: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            public_key: public_key.into(),
        }
    }
}

/// The genesis patch configuration.
///
/// Every field is optional in the YAML file; missing ones take the localnet
/// defaults returned by [`Config::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Genesis files to patch, processed in order.
    pub genesis_paths: Vec<PathBuf>,
    /// Accounts to ensure exist in each genesis file.
    pub new_accounts: Vec<NewAccount>,
    /// Balance given to every new account, as a decimal string in the
    /// chain's smallest unit.
    pub initial_balance: String,
    /// Account whose balance is reduced by the total handed out.
    pub treasury_account: String,
}

impl Default for Config {
    fn default() -> Self {
        let localnet_dir = {
            let mut localnet_dir = dirs_next::home_dir().unwrap_or_default();
            localnet_dir.extend([".near", "localnet"]);
            localnet_dir
        };
        let genesis_paths = (0..DEFAULT_LOCALNET_NODES)
            .map(|node| localnet_dir.join(format!("node{node}")).join("genesis.json"))
            .collect();

        Self {
            genesis_paths,
            new_accounts: vec![
                NewAccount::new(
                    "mpc-node-0.node0",
                    "ed25519:69CETJnEyCTaQ7B3PxEWrsMWpoufayKFhHWN15HQ8smR",
                ),
                NewAccount::new(
                    "mpc-node-1.node0",
                    "ed25519:93pcUSau23m7imF94gny2R9c8UDvGHGmiVFKr7j4pkjP",
                ),
                NewAccount::new(
                    "mpc-node-2.node0",
                    "ed25519:5CJ4d6byRNacX5QNaASHGXmURtWE48xARnNGWAwKRiWg",
                ),
            ],
            initial_balance: DEFAULT_INITIAL_BALANCE.to_string(),
            treasury_account: DEFAULT_TREASURY_ACCOUNT.to_string(),
        }
    }
}

impl Config {
    /// Loads a configuration from file.
    pub fn load(config_file: &str) -> Result<Self, io::Error> {
        let file = File::open(config_file)?;
        let config =
            serde_yaml_ng::from_reader(file).map_err(|err| io::Error::other(format!("{err:?}")))?;
        Ok(config)
    }

    /// Saves the configuration to file, mostly useful to produce a template.
    pub fn save(&self, config_file: &str) -> Result<(), io::Error> {
        let file = File::create(config_file)?;
        serde_yaml_ng::to_writer(file, self).map_err(|err| io::Error::other(format!("{err:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.genesis_paths.len(), DEFAULT_LOCALNET_NODES);
        assert!(config.genesis_paths[2].ends_with(".near/localnet/node2/genesis.json"));
        assert_eq!(config.new_accounts.len(), 3);
        assert_eq!(config.new_accounts[1].account_id, "mpc-node-1.node0");
        assert_eq!(config.initial_balance, DEFAULT_INITIAL_BALANCE);
        assert_eq!(config.treasury_account, "near");
    }

    #[test]
    fn test_load_partial_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "genesis_paths:\n  - /tmp/a/genesis.json\nnew_accounts:\n  - account_id: alice.node0\n    public_key: ed25519:69CETJnEyCTaQ7B3PxEWrsMWpoufayKFhHWN15HQ8smR\n"
        )
        .unwrap();

        let config = Config::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(
            config.genesis_paths,
            vec![PathBuf::from("/tmp/a/genesis.json")]
        );
        assert_eq!(
            config.new_accounts,
            vec![NewAccount::new(
                "alice.node0",
                "ed25519:69CETJnEyCTaQ7B3PxEWrsMWpoufayKFhHWN15HQ8smR"
            )]
        );
        assert_eq!(config.initial_balance, DEFAULT_INITIAL_BALANCE);
        assert_eq!(config.treasury_account, DEFAULT_TREASURY_ACCOUNT);
    }

    #[test]
    fn test_save_and_load() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap();
        let config = Config {
            treasury_account: "treasury.node0".to_string(),
            ..Config::default()
        };
        config.save(path).unwrap();
        assert_eq!(Config::load(path).unwrap(), config);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.yml");
        let err = Config::load(path.to_str().unwrap()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_load_invalid_yaml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "genesis_paths: 42").unwrap();
        let err = Config::load(file.path().to_str().unwrap()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Other);
    }
}
