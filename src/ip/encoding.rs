//! Mnemonic address encoding.
//!
//! AS numbers and router IDs are written into IPv6 groups with their decimal
//! digits used as the hexadecimal group text: AS 100 becomes the group `100`
//! (0x0100), router 12 the group `12` (0x0012). Addresses then read back as
//! the decimal values they were built from. A group holds at most four
//! digits, anything larger is refused.

use ipnetwork::Ipv6Network;
use std::fmt;
use std::net::Ipv6Addr;
use std::str::FromStr;
use thiserror::Error;

/// Largest value that fits a mnemonic group
pub const MAX_GROUP_VALUE: u64 = 9999;

/// Errors raised while building addresses
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressingError {
    #[error("{field} {value} does not fit a 16-bit address group (maximum {max})", max = MAX_GROUP_VALUE)]
    FieldOverflow { field: &'static str, value: u64 },
    #[error("Invalid base prefix '{prefix}': {reason}")]
    InvalidBasePrefix { prefix: String, reason: String },
}

/// Encode `value` as a mnemonic group
///
/// # Examples
/// ```
/// use topoplan::ip::encoding::mnemonic_group;
///
/// assert_eq!(mnemonic_group("AS number", 100), Ok(0x0100));
/// assert_eq!(mnemonic_group("router ID", 12), Ok(0x0012));
/// assert!(mnemonic_group("router ID", 10000).is_err());
/// ```
pub fn mnemonic_group(field: &'static str, value: u64) -> Result<u16, AddressingError> {
    if value > MAX_GROUP_VALUE {
        return Err(AddressingError::FieldOverflow { field, value });
    }

    let mut remaining = value;
    let mut group: u16 = 0;
    let mut shift = 0;
    while remaining > 0 {
        group |= ((remaining % 10) as u16) << shift;
        remaining /= 10;
        shift += 4;
    }
    Ok(group)
}

/// Base prefix of the link address plan.
///
/// Only the first two groups carry information (`2000:1::/64` -> `2000:1`);
/// the AS and router fields follow right after them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BasePrefix {
    address: Ipv6Addr,
    prefix_len: u8,
}

impl BasePrefix {
    /// Groups prepended to every link address
    pub fn groups(&self) -> [u16; 2] {
        let segments = self.address.segments();
        [segments[0], segments[1]]
    }

    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }
}

impl Default for BasePrefix {
    fn default() -> Self {
        Self {
            address: Ipv6Addr::new(0x2000, 1, 0, 0, 0, 0, 0, 0),
            prefix_len: 64,
        }
    }
}

impl FromStr for BasePrefix {
    type Err = AddressingError;

    fn from_str(prefix: &str) -> Result<Self, Self::Err> {
        let network = Ipv6Network::from_str(prefix.trim()).map_err(|e| AddressingError::InvalidBasePrefix {
            prefix: prefix.to_string(),
            reason: e.to_string(),
        })?;

        let address = network.network();
        if address.segments()[2..].iter().any(|segment| *segment != 0) {
            return Err(AddressingError::InvalidBasePrefix {
                prefix: prefix.to_string(),
                reason: "only the first two groups may be set".to_string(),
            });
        }

        Ok(Self {
            address,
            prefix_len: network.prefix(),
        })
    }
}

impl fmt::Display for BasePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.address, self.prefix_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mnemonic_group_reads_as_decimal() {
        assert_eq!(mnemonic_group("x", 0), Ok(0));
        assert_eq!(mnemonic_group("x", 5), Ok(0x5));
        assert_eq!(mnemonic_group("x", 10), Ok(0x10));
        assert_eq!(mnemonic_group("x", 200), Ok(0x200));
        assert_eq!(mnemonic_group("x", 9999), Ok(0x9999));
    }

    #[test]
    fn test_mnemonic_group_overflow() {
        assert_eq!(
            mnemonic_group("AS number", 10000),
            Err(AddressingError::FieldOverflow { field: "AS number", value: 10000 })
        );
        assert!(mnemonic_group("router ID", u64::MAX).is_err());
    }

    #[test]
    fn test_base_prefix_default() {
        let base = BasePrefix::default();
        assert_eq!(base.groups(), [0x2000, 0x1]);
        assert_eq!(base.to_string(), "2000:1::/64");
        assert_eq!("2000:1::/64".parse::<BasePrefix>().unwrap(), base);
    }

    #[test]
    fn test_base_prefix_masks_host_bits() {
        let base: BasePrefix = "fd00:42::1/32".parse().unwrap();
        assert_eq!(base.groups(), [0xfd00, 0x42]);
    }

    #[test]
    fn test_base_prefix_rejects_extra_groups() {
        assert!("2000:1:5::/48".parse::<BasePrefix>().is_err());
        assert!("not-a-prefix".parse::<BasePrefix>().is_err());
        assert!("10.0.0.0/8".parse::<BasePrefix>().is_err());
    }
}
