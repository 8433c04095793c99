// Copyright (c) 2024 Botho Foundation

//! Address command

use anyhow::{bail, Result};
use mixin_account_keys::{AccountKey, Address, MixAddress};
use mixin_crypto_keys::Key;

/// What to build an address from
pub enum AddressSource {
    /// A private spend key; the view key is derived from it.
    PrivateSpend(Key),
    /// A public spend key of a public address.
    PublicSpend(Key),
    /// Members of a MIX address, user ids or XIN addresses.
    Members { members: Vec<String>, threshold: u8 },
}

/// Render the address for `source`
pub fn render(source: &AddressSource) -> Result<String> {
    let lines = match source {
        AddressSource::PrivateSpend(spend) => {
            let account = AccountKey::from_spend_private(spend)?;
            describe_xin(account.address())
        }
        AddressSource::PublicSpend(spend) => describe_xin(&Address::from_public_spend(*spend)?),
        AddressSource::Members { members, threshold } => {
            if members.is_empty() {
                bail!("at least one member is required");
            }
            let address = MixAddress::new(members, *threshold)?;
            format!(
                "{}\n  Threshold: {}/{}",
                address,
                address.threshold(),
                address.members_len()
            )
        }
    };
    Ok(lines)
}

fn describe_xin(address: &Address) -> String {
    format!(
        "{}\n  View:  {}\n  Spend: {}",
        address,
        address.public_view(),
        address.public_spend()
    )
}

/// Run the address command
pub fn run(source: AddressSource) -> Result<()> {
    println!();
    println!("{}", render(&source)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_private_and_public_spend_agree() {
        let spend = Key::from_ed25519_seed(&[7; 32]);
        let from_private = render(&AddressSource::PrivateSpend(spend)).unwrap();
        let from_public =
            render(&AddressSource::PublicSpend(spend.public_key().unwrap())).unwrap();
        assert_eq!(from_private, from_public);
        assert!(from_private.starts_with("XIN"));
    }

    #[test]
    fn test_members_address() {
        let rendered = render(&AddressSource::Members {
            members: vec![
                "6ba7b810-9dad-11d1-80b4-00c04fd430c8".to_string(),
                "6ba7b811-9dad-11d1-80b4-00c04fd430c8".to_string(),
            ],
            threshold: 2,
        })
        .unwrap();
        assert!(rendered.starts_with("MIX"));
        assert!(rendered.ends_with("Threshold: 2/2"));

        assert!(render(&AddressSource::Members {
            members: vec![],
            threshold: 1,
        })
        .is_err());
    }
}
