use blockchain_clap_utils::input_parsers::{parse_account_id, parse_amount, parse_new_account};
use blockchain_cli_config::{Config, NewAccount};
use blockchain_genesis::{GenesisPatcher, PatchOutcome};
use clap::{crate_description, crate_name, crate_version, Arg, ArgAction, Command};
use log::{error, info};
use solana_logger::setup_with_default;
use std::error;
use std::path::PathBuf;
use std::process;

pub const DEFAULT_FILTER: &str = "blockchain=info";

fn main() -> Result<(), Box<dyn error::Error>> {
    let matches = Command::new(crate_name!())
        .about(crate_description!())
        .version(crate_version!())
        .arg(
            Arg::new("config_file")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("YAML file with genesis_paths, new_accounts, initial_balance and treasury_account"),
        )
        .arg(
            Arg::new("genesis_path")
                .short('g')
                .long("genesis-path")
                .value_name("PATH")
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Append)
                .help("Genesis file to patch, may be repeated [default: the localnet node files]"),
        )
        .arg(
            Arg::new("account")
                .short('a')
                .long("account")
                .value_name("ACCOUNT_ID=PUBLIC_KEY")
                .value_parser(parse_new_account)
                .action(ArgAction::Append)
                .help("Account to provision with a full access ed25519 key, may be repeated"),
        )
        .arg(
            Arg::new("initial_balance")
                .long("initial-balance")
                .value_name("AMOUNT")
                .value_parser(parse_amount)
                .help("Balance of each new account in the smallest token unit"),
        )
        .arg(
            Arg::new("treasury_account")
                .long("treasury-account")
                .value_name("ACCOUNT_ID")
                .value_parser(parse_account_id)
                .help("Account that funds the new accounts"),
        )
        .arg(
            Arg::new("write_config")
                .long("write-config")
                .value_name("FILE")
                .help(
                    "Write the effective configuration, after command line overrides, \
                     to FILE as YAML and exit without patching",
                ),
        )
        .arg(
            Arg::new("dry_run")
                .long("dry-run")
                .action(ArgAction::SetTrue)
                .help("Report what would change without writing any file"),
        )
        .arg(
            Arg::new("strict")
                .long("strict")
                .action(ArgAction::SetTrue)
                .help(
                    "Exit with a non-zero status if any file failed to patch \
                     or had no treasury account to deduct from",
                ),
        )
        .try_get_matches()
        .unwrap_or_else(|e| e.exit());

    setup_with_default(DEFAULT_FILTER);

    let mut config = match matches.try_get_one::<String>("config_file")? {
        Some(config_file) => Config::load(config_file)
            .map_err(|err| format!("unable to load config file '{config_file}': {err}"))?,
        None => Config::default(),
    };
    if let Some(genesis_paths) = matches.try_get_many::<PathBuf>("genesis_path")? {
        config.genesis_paths = genesis_paths.cloned().collect();
    }
    if let Some(new_accounts) = matches.try_get_many::<NewAccount>("account")? {
        config.new_accounts = new_accounts.cloned().collect();
    }
    if let Some(initial_balance) = matches.try_get_one::<String>("initial_balance")? {
        config.initial_balance = initial_balance.clone();
    }
    if let Some(treasury_account) = matches.try_get_one::<String>("treasury_account")? {
        config.treasury_account = treasury_account.clone();
    }

    let patcher = GenesisPatcher::try_from(&config)?.with_dry_run(matches.get_flag("dry_run"));
    if let Some(config_file) = matches.try_get_one::<String>("write_config")? {
        config
            .save(config_file)
            .map_err(|err| format!("unable to write config file '{config_file}': {err}"))?;
        info!("wrote config to {config_file}");
        return Ok(());
    }
    let report = patcher.patch_all(&config.genesis_paths);

    let patched = report.summaries().count();
    let skipped = report
        .outcomes
        .iter()
        .filter(|(_, outcome)| matches!(outcome, Ok(PatchOutcome::Skipped)))
        .count();
    let failed = report.failures().count();
    info!("patched {patched}, skipped {skipped}, failed {failed}");

    if matches.get_flag("strict") && (report.has_failures() || !report.conserves_supply()) {
        error!("genesis patch incomplete");
        process::exit(1);
    }
    Ok(())
}
