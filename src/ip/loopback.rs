//! Loopback addresses.
//!
//! Loopbacks live outside the link base prefix: `2000::<id>` in the simple
//! format, `2000:2:<AS>::<id>` when qualified with the AS. The group `2`
//! keeps them apart from the physical links, which usually sit in `2000:1`.

use super::encoding::{mnemonic_group, AddressingError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv6Addr;

/// Loopbacks are host routes
pub const LOOPBACK_PREFIX_LEN: u8 = 128;
/// Interface name carrying the loopback address
pub const LOOPBACK_INTERFACE: &str = "Loopback0";

const LOOPBACK_BLOCK: u16 = 0x2000;
const AS_QUALIFIED_GROUP: u16 = 0x2;

/// How loopback addresses are laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum LoopbackFormat {
    /// `2000::<id>`
    #[default]
    Simple,
    /// `2000:2:<AS>::<id>`
    #[serde(alias = "with_as")]
    AsQualified,
}

impl fmt::Display for LoopbackFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple => write!(f, "simple"),
            Self::AsQualified => write!(f, "as-qualified"),
        }
    }
}

/// Loopback address of a router.
///
/// In the AS-qualified format a router outside every AS falls back to
/// `2000::2:<id>`.
///
/// # Examples
/// ```
/// use topoplan::ip::loopback::{loopback_address, LoopbackFormat};
///
/// let simple = loopback_address(5, Some(200), LoopbackFormat::Simple).unwrap();
/// assert_eq!(simple.to_string(), "2000::5");
///
/// let qualified = loopback_address(5, Some(200), LoopbackFormat::AsQualified).unwrap();
/// assert_eq!(qualified.to_string(), "2000:2:200::5");
/// ```
pub fn loopback_address(
    router_id: u64,
    as_number: Option<u32>,
    format: LoopbackFormat,
) -> Result<Ipv6Addr, AddressingError> {
    let host = mnemonic_group("router ID", router_id)?;

    let address = match (format, as_number.filter(|n| *n != 0)) {
        (LoopbackFormat::Simple, _) => Ipv6Addr::new(LOOPBACK_BLOCK, 0, 0, 0, 0, 0, 0, host),
        (LoopbackFormat::AsQualified, Some(as_number)) => {
            let as_group = mnemonic_group("AS number", u64::from(as_number))?;
            Ipv6Addr::new(LOOPBACK_BLOCK, AS_QUALIFIED_GROUP, as_group, 0, 0, 0, 0, host)
        }
        (LoopbackFormat::AsQualified, None) => {
            Ipv6Addr::new(LOOPBACK_BLOCK, 0, 0, 0, 0, 0, AS_QUALIFIED_GROUP, host)
        }
    };

    Ok(address)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_loopback() {
        let address = loopback_address(5, None, LoopbackFormat::Simple).unwrap();
        assert_eq!(address.to_string(), "2000::5");

        // the AS never shows up in the simple format
        let address = loopback_address(12, Some(300), LoopbackFormat::Simple).unwrap();
        assert_eq!(address.to_string(), "2000::12");
    }

    #[test]
    fn test_as_qualified_loopback() {
        let address = loopback_address(5, Some(200), LoopbackFormat::AsQualified).unwrap();
        assert_eq!(address.to_string(), "2000:2:200::5");
    }

    #[test]
    fn test_as_qualified_without_as() {
        let address = loopback_address(7, None, LoopbackFormat::AsQualified).unwrap();
        assert_eq!(address.to_string(), "2000::2:7");
    }

    #[test]
    fn test_loopback_overflow() {
        assert!(loopback_address(10000, None, LoopbackFormat::Simple).is_err());
        assert!(loopback_address(1, Some(12000), LoopbackFormat::AsQualified).is_err());
    }

    #[test]
    fn test_format_serde_names() {
        let parsed: LoopbackFormat = serde_yaml::from_str("as-qualified").unwrap();
        assert_eq!(parsed, LoopbackFormat::AsQualified);
        let legacy: LoopbackFormat = serde_yaml::from_str("with_as").unwrap();
        assert_eq!(legacy, LoopbackFormat::AsQualified);
        assert_eq!(serde_json::to_string(&LoopbackFormat::Simple).unwrap(), "\"simple\"");
    }
}
