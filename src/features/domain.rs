//! Registrable-domain splitting against the public suffix list.

use serde::{Deserialize, Serialize};
use url::Host;

/// A host split into subdomain, registrable label and public suffix.
///
/// For `login.secure.example.co.uk` this is `("login.secure", "example", "co.uk")`.
/// IP literals and hosts without a registrable domain keep the whole host in
/// `domain` and leave the other parts empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainParts {
    pub subdomain: String,
    pub domain: String,
    pub suffix: String,
}

impl DomainParts {
    /// Split a parsed host.
    pub fn from_host(host: &Host<&str>) -> Self {
        match host {
            Host::Domain(name) => Self::from_domain(name),
            Host::Ipv4(addr) => Self {
                domain: addr.to_string(),
                ..Self::default()
            },
            Host::Ipv6(addr) => Self {
                domain: addr.to_string(),
                ..Self::default()
            },
        }
    }

    /// Split a domain name (lowercase, as produced by the URL parser).
    pub fn from_domain(name: &str) -> Self {
        let name = name.trim_end_matches('.');
        let suffix = psl::suffix_str(name).unwrap_or_default();

        let Some(registrable) = psl::domain_str(name) else {
            // The whole name is a public suffix (or unknown single label).
            return Self {
                suffix: suffix.to_string(),
                ..Self::default()
            };
        };

        let domain = registrable
            .strip_suffix(suffix)
            .map(|d| d.trim_end_matches('.'))
            .unwrap_or(registrable);

        let subdomain = name
            .strip_suffix(registrable)
            .map(|s| s.trim_end_matches('.'))
            .unwrap_or_default();

        Self {
            subdomain: subdomain.to_string(),
            domain: domain.to_string(),
            suffix: suffix.to_string(),
        }
    }

    /// Number of dot-separated labels in the subdomain, 0 when there is none.
    pub fn subdomain_depth(&self) -> usize {
        if self.subdomain.is_empty() {
            0
        } else {
            self.subdomain.split('.').count()
        }
    }

    /// `domain.suffix`, or the bare domain when no suffix applies.
    pub fn registered_domain(&self) -> String {
        match (self.domain.is_empty(), self.suffix.is_empty()) {
            (false, false) => format!("{}.{}", self.domain, self.suffix),
            (false, true) => self.domain.clone(),
            _ => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multi_label_suffix() {
        let parts = DomainParts::from_domain("login.secure.example.co.uk");
        assert_eq!(parts.subdomain, "login.secure");
        assert_eq!(parts.domain, "example");
        assert_eq!(parts.suffix, "co.uk");
        assert_eq!(parts.subdomain_depth(), 2);
        assert_eq!(parts.registered_domain(), "example.co.uk");
    }

    #[test]
    fn test_www_is_one_subdomain_level() {
        let parts = DomainParts::from_domain("www.wikipedia.org");
        assert_eq!(parts.subdomain, "www");
        assert_eq!(parts.subdomain_depth(), 1);
    }

    #[test]
    fn test_no_subdomain() {
        let parts = DomainParts::from_domain("example.com");
        assert_eq!(parts.subdomain, "");
        assert_eq!(parts.domain, "example");
        assert_eq!(parts.subdomain_depth(), 0);
    }

    #[test]
    fn test_ip_host_has_no_subdomain() {
        let host = Host::Ipv4("192.168.1.1".parse().unwrap());
        let parts = DomainParts::from_host(&host);
        assert_eq!(parts.domain, "192.168.1.1");
        assert_eq!(parts.subdomain_depth(), 0);
    }
}
