use crate::dto::prelude::*;
use std::{
    fmt::{self, Display},
    net::{Ipv4Addr, Ipv6Addr},
};

///
/// Ip
///
/// Network address of a node. Any combination may be set; a usable record
/// carries at least one.
///

#[derive(CandidType, Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Ip {
    pub ipv4: Option<u32>,
    pub ipv6: Option<u128>,
    pub domain: Option<Vec<u8>>,
}

impl Ip {
    #[must_use]
    pub fn v4(addr: Ipv4Addr) -> Self {
        Self {
            ipv4: Some(addr.to_bits()),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn v6(addr: Ipv6Addr) -> Self {
        Self {
            ipv6: Some(addr.to_bits()),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn domain(name: &str) -> Self {
        Self {
            domain: Some(name.as_bytes().to_vec()),
            ..Default::default()
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.ipv4.is_none() && self.ipv6.is_none() && self.domain.is_none()
    }
}

impl Display for Ip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(domain) = &self.domain {
            return write!(f, "{}", String::from_utf8_lossy(domain));
        }
        if let Some(v4) = self.ipv4 {
            return write!(f, "{}", Ipv4Addr::from_bits(v4));
        }
        if let Some(v6) = self.ipv6 {
            return write!(f, "[{}]", Ipv6Addr::from_bits(v6));
        }

        f.write_str("-")
    }
}

///
/// Endpoint
///

#[derive(CandidType, Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Endpoint {
    pub ip: Ip,
    pub port: u32,
}

impl Endpoint {
    #[must_use]
    pub const fn new(ip: Ip, port: u32) -> Self {
        Self { ip, port }
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.ip, self.port)
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ipv4_uses_network_byte_order_integer() {
        let ip = Ip::v4(Ipv4Addr::new(192, 168, 110, 205));

        assert_eq!(ip.ipv4, Some(3_232_263_885));
        assert_eq!(Endpoint::new(ip, 30110).to_string(), "192.168.110.205:30110");
    }

    #[test]
    fn domain_takes_display_precedence() {
        let mut ip = Ip::domain("node.example.org");
        ip.ipv4 = Some(1);

        assert_eq!(ip.to_string(), "node.example.org");
        assert!(!ip.is_empty());
        assert!(Ip::default().is_empty());
    }
}
