//! Accepted forge hosts.

/// The public forge host accepted by default.
pub const DEFAULT_HOST: &str = "github.com";

/// Set of forge hostnames the tool will talk to.
///
/// Comparison is case-insensitive. The public [`DEFAULT_HOST`] is always a
/// member; enterprise hosts can be added from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedHosts {
    hosts: Vec<String>,
}

impl AcceptedHosts {
    /// Builds the accepted set from additional enterprise hosts.
    ///
    /// Blank entries are dropped; [`DEFAULT_HOST`] is always included.
    #[must_use]
    pub fn with_extra<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut hosts = vec![DEFAULT_HOST.to_owned()];
        for host in extra {
            let trimmed = host.as_ref().trim();
            if !trimmed.is_empty() && !hosts.iter().any(|known| known.eq_ignore_ascii_case(trimmed))
            {
                hosts.push(trimmed.to_owned());
            }
        }
        Self { hosts }
    }

    /// Returns true when `host` is a member of the accepted set.
    #[must_use]
    pub fn contains(&self, host: &str) -> bool {
        self.hosts
            .iter()
            .any(|known| known.eq_ignore_ascii_case(host))
    }
}

impl Default for AcceptedHosts {
    fn default() -> Self {
        Self {
            hosts: vec![DEFAULT_HOST.to_owned()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AcceptedHosts;

    #[test]
    fn default_accepts_public_host_case_insensitively() {
        let hosts = AcceptedHosts::default();
        assert!(hosts.contains("github.com"));
        assert!(hosts.contains("GitHub.COM"));
        assert!(!hosts.contains("gitlab.com"));
    }

    #[test]
    fn extra_hosts_extend_the_set() {
        let hosts = AcceptedHosts::with_extra(["ghe.example.com", "  ", "GHE.example.com"]);
        assert!(hosts.contains("github.com"));
        assert!(hosts.contains("ghe.example.com"));
        assert!(hosts.contains("GHE.EXAMPLE.COM"));
        assert!(!hosts.contains("other.example.com"));
    }
}
