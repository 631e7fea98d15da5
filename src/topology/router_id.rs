//! Router identifiers.
//!
//! Every router gets a numeric ID taken from its display name. The ID is what
//! ends up inside link and loopback addresses, so it must depend on nothing
//! but the name.

use regex::Regex;
use std::net::Ipv4Addr;
use std::sync::LazyLock;

static DIGIT_RUN: LazyLock<Regex> = LazyLock::new(||
    Regex::new(r"[0-9]+").expect("Invalid digit run regex")
);

/// Extract the router number from its name.
///
/// Uses the LAST run of decimal digits: "R1" -> 1, "AS100_R2" -> 2,
/// "Router-5" -> 5. Names without digits get 1. A run too large for a u64
/// saturates to `u64::MAX` so the address planner reports it as an overflow.
///
/// # Examples
/// ```
/// use topoplan::topology::router_id::router_number;
///
/// assert_eq!(router_number("R12"), 12);
/// assert_eq!(router_number("AS100_R2"), 2);
/// assert_eq!(router_number("core"), 1);
/// ```
pub fn router_number(router_name: &str) -> u64 {
    match DIGIT_RUN.find_iter(router_name).last() {
        Some(run) => run.as_str().parse::<u64>().unwrap_or(u64::MAX),
        None => 1,
    }
}

/// BGP router-id in dotted form: R1 -> 1.1.1.1, R15 -> 15.15.15.15.
///
/// Numbers above 255 are folded with `% 255` so every octet stays valid.
pub fn bgp_router_id(router_name: &str) -> Ipv4Addr {
    let num = router_number(router_name);
    let octet = if num > 255 { (num % 255) as u8 } else { num as u8 };
    Ipv4Addr::new(octet, octet, octet, octet)
}
