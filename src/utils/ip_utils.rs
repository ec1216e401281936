//! IPv4 CIDR block parsing and comparison.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

/// An IPv4 address block in `a.b.c.d/n` notation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ipv4Cidr {
    address: Ipv4Addr,
    prefix_len: u8,
}

impl Ipv4Cidr {
    /// Network address of the block
    pub fn address(&self) -> Ipv4Addr {
        self.address
    }

    /// Prefix length in bits (0-32)
    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    fn mask(&self) -> u32 {
        if self.prefix_len == 0 {
            0
        } else {
            u32::MAX << (32 - u32::from(self.prefix_len))
        }
    }

    /// First address of the block with host bits cleared
    pub fn network(&self) -> Ipv4Addr {
        Ipv4Addr::from(u32::from(self.address) & self.mask())
    }

    /// Whether the block was written with host bits set (e.g. `10.0.1.5/24`)
    pub fn has_host_bits(&self) -> bool {
        self.network() != self.address
    }

    /// The same block with host bits cleared
    pub fn normalized(&self) -> Ipv4Cidr {
        Ipv4Cidr {
            address: self.network(),
            prefix_len: self.prefix_len,
        }
    }

    /// Whether `other` lies entirely inside this block
    pub fn contains(&self, other: &Ipv4Cidr) -> bool {
        other.prefix_len >= self.prefix_len
            && (u32::from(other.address) & self.mask()) == u32::from(self.network())
    }

    /// Whether the two blocks share at least one address
    pub fn overlaps(&self, other: &Ipv4Cidr) -> bool {
        self.contains(other) || other.contains(self)
    }
}

impl FromStr for Ipv4Cidr {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("CIDR block cannot be empty".to_string());
        }

        let (addr, prefix) = s
            .split_once('/')
            .ok_or_else(|| format!("'{}' is missing a '/prefix' length", s))?;

        let address = addr
            .parse::<Ipv4Addr>()
            .map_err(|_| format!("'{}' is not a valid IPv4 address", addr))?;

        let prefix_len = prefix
            .parse::<u8>()
            .map_err(|_| format!("'{}' is not a valid prefix length", prefix))?;
        if prefix_len > 32 {
            return Err(format!("prefix length {} exceeds 32", prefix_len));
        }

        Ok(Ipv4Cidr { address, prefix_len })
    }
}

impl fmt::Display for Ipv4Cidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.address, self.prefix_len)
    }
}

/// Check if a string is a valid IPv4 CIDR block
pub fn is_valid_cidr(cidr: &str) -> bool {
    cidr.parse::<Ipv4Cidr>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_cidrs() {
        let cidr: Ipv4Cidr = "10.0.0.0/16".parse().unwrap();
        assert_eq!(cidr.address(), Ipv4Addr::new(10, 0, 0, 0));
        assert_eq!(cidr.prefix_len(), 16);
        assert_eq!(cidr.to_string(), "10.0.0.0/16");

        assert!(is_valid_cidr("0.0.0.0/0"));
        assert!(is_valid_cidr("192.168.1.1/32"));
        assert!(is_valid_cidr(" 172.16.0.0/12 "));
    }

    #[test]
    fn test_parse_invalid_cidrs() {
        assert!(!is_valid_cidr(""));
        assert!(!is_valid_cidr("10.0.0.0"));
        assert!(!is_valid_cidr("10.0.0/16"));
        assert!(!is_valid_cidr("10.0.0.0/33"));
        assert!(!is_valid_cidr("10.0.0.0/abc"));
        assert!(!is_valid_cidr("2001:db8::/32"));
    }

    #[test]
    fn test_containment() {
        let vpc: Ipv4Cidr = "10.0.0.0/16".parse().unwrap();
        let inside: Ipv4Cidr = "10.0.1.0/24".parse().unwrap();
        let outside: Ipv4Cidr = "10.1.0.0/24".parse().unwrap();
        let wider: Ipv4Cidr = "10.0.0.0/8".parse().unwrap();

        assert!(vpc.contains(&inside));
        assert!(!vpc.contains(&outside));
        assert!(!vpc.contains(&wider));
        assert!(wider.contains(&vpc));
        assert!("0.0.0.0/0".parse::<Ipv4Cidr>().unwrap().contains(&outside));
    }

    #[test]
    fn test_overlap_and_host_bits() {
        let a: Ipv4Cidr = "10.0.1.0/24".parse().unwrap();
        let b: Ipv4Cidr = "10.0.1.128/25".parse().unwrap();
        let c: Ipv4Cidr = "10.0.2.0/24".parse().unwrap();

        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));

        assert!(!a.has_host_bits());
        assert!("10.0.1.5/24".parse::<Ipv4Cidr>().unwrap().has_host_bits());
    }

    #[test]
    fn test_normalized_block() {
        let written: Ipv4Cidr = "10.0.1.7/24".parse().unwrap();
        let clean: Ipv4Cidr = "10.0.1.0/24".parse().unwrap();

        assert_ne!(written, clean);
        assert_eq!(written.normalized(), clean);
        assert_eq!(written.normalized().to_string(), "10.0.1.0/24");
    }
}
