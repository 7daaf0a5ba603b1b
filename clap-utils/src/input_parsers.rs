use blockchain_cli_config::NewAccount;
use num_bigint::BigUint;
use std::str::FromStr;

pub const ED25519_KEY_PREFIX: &str = "ed25519:";
pub const ED25519_PUBLIC_KEY_LENGTH: usize = 32;

const MIN_ACCOUNT_ID_LEN: usize = 2;
const MAX_ACCOUNT_ID_LEN: usize = 64;

fn is_separator(c: u8) -> bool {
    matches!(c, b'-' | b'_' | b'.')
}

/// Validates a named account id: 2 to 64 characters of `[a-z0-9]` split by
/// single `-`, `_` or `.` separators.
pub fn parse_account_id(account_id: &str) -> Result<String, String> {
    let len = account_id.len();
    if !(MIN_ACCOUNT_ID_LEN..=MAX_ACCOUNT_ID_LEN).contains(&len) {
        return Err(format!(
            "account id '{account_id}' must be {MIN_ACCOUNT_ID_LEN} to {MAX_ACCOUNT_ID_LEN} characters long"
        ));
    }
    let mut last_was_separator = true;
    for c in account_id.bytes() {
        if is_separator(c) {
            if last_was_separator {
                return Err(format!(
                    "account id '{account_id}' has a misplaced separator"
                ));
            }
            last_was_separator = true;
        } else if c.is_ascii_lowercase() || c.is_ascii_digit() {
            last_was_separator = false;
        } else {
            return Err(format!(
                "account id '{account_id}' contains invalid character '{}'",
                c as char
            ));
        }
    }
    if last_was_separator {
        return Err(format!(
            "account id '{account_id}' has a misplaced separator"
        ));
    }
    Ok(account_id.to_string())
}

/// Validates an `ed25519:<base58>` public key.
pub fn parse_public_key(public_key: &str) -> Result<String, String> {
    let data = public_key
        .strip_prefix(ED25519_KEY_PREFIX)
        .ok_or_else(|| format!("public key '{public_key}' must start with '{ED25519_KEY_PREFIX}'"))?;
    let bytes = bs58::decode(data)
        .into_vec()
        .map_err(|err| format!("invalid base58 in public key '{public_key}': {err}"))?;
    if bytes.len() != ED25519_PUBLIC_KEY_LENGTH {
        return Err(format!(
            "public key '{public_key}' decodes to {} bytes, expected {ED25519_PUBLIC_KEY_LENGTH}",
            bytes.len()
        ));
    }
    Ok(public_key.to_string())
}

/// Validates a non-negative decimal amount of any size and returns it without
/// leading zeros.
pub fn parse_amount(amount: &str) -> Result<String, String> {
    if amount.is_empty() || !amount.bytes().all(|c| c.is_ascii_digit()) {
        return Err(format!("amount '{amount}' is not a decimal number"));
    }
    BigUint::from_str(amount)
        .map(|amount| amount.to_string())
        .map_err(|err| format!("unable to parse amount '{amount}': {err}"))
}

/// Parses an `ACCOUNT_ID=PUBLIC_KEY` pair.
pub fn parse_new_account(arg: &str) -> Result<NewAccount, String> {
    let (account_id, public_key) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected ACCOUNT_ID=PUBLIC_KEY, got '{arg}'"))?;
    Ok(NewAccount::new(
        parse_account_id(account_id)?,
        parse_public_key(public_key)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    const PK: &str = "ed25519:69CETJnEyCTaQ7B3PxEWrsMWpoufayKFhHWN15HQ8smR";

    #[test_case("near" ; "top level")]
    #[test_case("mpc-node-0.node0" ; "sub account")]
    #[test_case("a_b.c-d" ; "all separators")]
    #[test_case("42" ; "digits only")]
    fn test_parse_account_id_valid(account_id: &str) {
        assert_eq!(parse_account_id(account_id).unwrap(), account_id);
    }

    #[test_case("a" ; "too short")]
    #[test_case("Near" ; "upper case")]
    #[test_case(".near" ; "leading separator")]
    #[test_case("near." ; "trailing separator")]
    #[test_case("ne..ar" ; "double separator")]
    #[test_case("ne ar" ; "space")]
    fn test_parse_account_id_invalid(account_id: &str) {
        parse_account_id(account_id).unwrap_err();
    }

    #[test]
    fn test_parse_account_id_too_long() {
        parse_account_id(&"a".repeat(MAX_ACCOUNT_ID_LEN)).unwrap();
        parse_account_id(&"a".repeat(MAX_ACCOUNT_ID_LEN + 1)).unwrap_err();
    }

    #[test]
    fn test_parse_public_key() {
        assert_eq!(parse_public_key(PK).unwrap(), PK);
        assert_eq!(
            parse_public_key("69CETJnEyCTaQ7B3PxEWrsMWpoufayKFhHWN15HQ8smR").unwrap_err(),
            "public key '69CETJnEyCTaQ7B3PxEWrsMWpoufayKFhHWN15HQ8smR' must start with 'ed25519:'"
        );
        assert_eq!(
            parse_public_key("ed25519:abc").unwrap_err(),
            "public key 'ed25519:abc' decodes to 3 bytes, expected 32"
        );
        // '0' is not in the base58 alphabet
        parse_public_key("ed25519:0CETJnEyCTaQ7B3PxEWrsMWpoufayKFhHWN15HQ8smR").unwrap_err();
    }

    #[test_case("0", "0")]
    #[test_case("10000000000000000000000000", "10000000000000000000000000")]
    #[test_case("007", "7")]
    fn test_parse_amount(input: &str, expected: &str) {
        assert_eq!(parse_amount(input).unwrap(), expected);
    }

    #[test_case("" ; "empty")]
    #[test_case("-1" ; "negative")]
    #[test_case("+1" ; "explicit sign")]
    #[test_case("1_000" ; "underscore")]
    #[test_case("1.5" ; "fraction")]
    fn test_parse_amount_invalid(input: &str) {
        parse_amount(input).unwrap_err();
    }

    #[test]
    fn test_parse_new_account() {
        assert_eq!(
            parse_new_account(&format!("alice.node0={PK}")).unwrap(),
            NewAccount::new("alice.node0", PK)
        );
        assert_eq!(
            parse_new_account("alice.node0").unwrap_err(),
            "expected ACCOUNT_ID=PUBLIC_KEY, got 'alice.node0'"
        );
        parse_new_account(&format!("Alice={PK}")).unwrap_err();
        parse_new_account("alice.node0=ed25519:abc").unwrap_err();
    }
}
