//! Native parser for the repository configuration file.
//!
//! Handles the INI-like syntax of `.git/config`: `[section]` and
//! `[section "subsection"]` headers, `key = value` entries, and `#`/`;`
//! comments. Section and key names are case-normalised while subsection
//! names keep their case, matching git's own comparison rules. Unknown
//! directives are ignored rather than rejected.

use super::error::DiscoveryError;
use super::gitdir::GitDir;

/// Parsed repository configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitConfig {
    sections: Vec<Section>,
}

/// One `[name]` or `[name "subsection"]` block with its entries.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Section {
    /// Section name, lower-cased.
    name: String,
    /// Subsection name with original case, when present.
    subsection: Option<String>,
    /// Key/value entries in declaration order; keys are lower-cased.
    entries: Vec<(String, String)>,
}

impl GitConfig {
    /// Loads and parses the `config` file of a metadata directory.
    ///
    /// A missing configuration file yields an empty configuration, which
    /// downstream resolution reports as having no remotes.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::ConfigParsing`] when the file exists but
    /// cannot be read or contains an invalid section header.
    pub fn load(git_dir: &GitDir) -> Result<Self, DiscoveryError> {
        let path = git_dir.metadata_file("config");
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|error| {
            DiscoveryError::ConfigParsing {
                message: format!("could not read '{}': {error}", path.display()),
            }
        })?;

        Self::parse(&content)
    }

    /// Parses configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::ConfigParsing`] when a section header is
    /// malformed. Entries that are not assignments, and entries appearing
    /// before any section header, are skipped.
    pub fn parse(content: &str) -> Result<Self, DiscoveryError> {
        let mut sections: Vec<Section> = Vec::new();

        for (index, raw_line) in content.lines().enumerate() {
            let line = strip_comment(raw_line).trim();
            if line.is_empty() {
                continue;
            }

            if line.starts_with('[') {
                let (name, subsection) =
                    parse_section_header(line).ok_or_else(|| DiscoveryError::ConfigParsing {
                        message: format!("invalid section header on line {}", index + 1),
                    })?;
                sections.push(Section {
                    name,
                    subsection,
                    entries: Vec::new(),
                });
            } else if let Some(section) = sections.last_mut()
                && let Some(entry) = parse_entry(line)
            {
                section.entries.push(entry);
            }
        }

        Ok(Self { sections })
    }

    /// Looks up a value; the last assignment wins when a key repeats.
    #[must_use]
    pub fn value(&self, name: &str, subsection: Option<&str>, key: &str) -> Option<&str> {
        let wanted_name = name.to_lowercase();
        let wanted_key = key.to_lowercase();

        self.sections
            .iter()
            .filter(|section| {
                section.name == wanted_name && section.subsection.as_deref() == subsection
            })
            .flat_map(|section| section.entries.iter())
            .filter(|(entry_key, _)| *entry_key == wanted_key)
            .map(|(_, entry_value)| entry_value.as_str())
            .last()
    }

    /// Remote names in declaration order.
    #[must_use]
    pub fn remote_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for section in &self.sections {
            if section.name == "remote"
                && let Some(subsection) = section.subsection.as_deref()
                && !names.contains(&subsection)
            {
                names.push(subsection);
            }
        }
        names
    }

    /// URL configured for the named remote.
    #[must_use]
    pub fn remote_url(&self, remote: &str) -> Option<&str> {
        self.value("remote", Some(remote), "url")
    }

    /// Remote configured for the named branch.
    #[must_use]
    pub fn branch_remote(&self, branch: &str) -> Option<&str> {
        self.value("branch", Some(branch), "remote")
    }
}

/// Cuts a trailing `#` or `;` comment, respecting double quotes.
fn strip_comment(line: &str) -> &str {
    let mut in_quotes = false;
    for (position, character) in line.char_indices() {
        match character {
            '"' => in_quotes = !in_quotes,
            '#' | ';' if !in_quotes => return line.get(..position).unwrap_or(line),
            _ => {}
        }
    }
    line
}

/// Parses `[name]` or `[name "subsection"]` into its components.
fn parse_section_header(line: &str) -> Option<(String, Option<String>)> {
    let inner = line.strip_prefix('[')?.strip_suffix(']')?.trim();

    if let Some((name_part, rest)) = inner.split_once('"') {
        let name = name_part.trim().to_lowercase();
        let subsection = rest.strip_suffix('"')?;
        if name.is_empty() {
            return None;
        }
        return Some((name, Some(subsection.to_owned())));
    }

    if inner.is_empty() || inner.contains(char::is_whitespace) {
        return None;
    }
    Some((inner.to_lowercase(), None))
}

/// Parses a `key = value` entry; a bare key means boolean true.
fn parse_entry(line: &str) -> Option<(String, String)> {
    match line.split_once('=') {
        Some((raw_key, raw_value)) => {
            let key = raw_key.trim().to_lowercase();
            if key.is_empty() {
                return None;
            }
            Some((key, unquote(raw_value.trim())))
        }
        None => Some((line.trim().to_lowercase(), "true".to_owned())),
    }
}

/// Removes one pair of surrounding double quotes, when present.
fn unquote(value: &str) -> String {
    value
        .strip_prefix('"')
        .and_then(|stripped| stripped.strip_suffix('"'))
        .unwrap_or(value)
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::{DiscoveryError, GitConfig};

    const SAMPLE: &str = r#"
[core]
    repositoryformatversion = 0
    bare = false
[remote "origin"]
    url = https://github.com/octocat/Hello-World.git
    fetch = +refs/heads/*:refs/remotes/origin/*
[remote "upstream"]
    url = git@github.com:upstream/Hello-World.git
[branch "feature-x"]
    remote = upstream
    merge = refs/heads/feature-x
"#;

    #[test]
    fn parse_reads_remote_urls() {
        let config = GitConfig::parse(SAMPLE).expect("parse should succeed");
        assert_eq!(
            config.remote_url("origin"),
            Some("https://github.com/octocat/Hello-World.git")
        );
        assert_eq!(
            config.remote_url("upstream"),
            Some("git@github.com:upstream/Hello-World.git")
        );
        assert_eq!(config.remote_url("missing"), None);
    }

    #[test]
    fn parse_reads_branch_remote() {
        let config = GitConfig::parse(SAMPLE).expect("parse should succeed");
        assert_eq!(config.branch_remote("feature-x"), Some("upstream"));
        assert_eq!(config.branch_remote("main"), None);
    }

    #[test]
    fn remote_names_preserve_declaration_order() {
        let config = GitConfig::parse(SAMPLE).expect("parse should succeed");
        assert_eq!(config.remote_names(), vec!["origin", "upstream"]);
    }

    #[test]
    fn section_names_are_case_insensitive() {
        let config = GitConfig::parse("[Remote \"origin\"]\n\tURL = https://example\n")
            .expect("parse should succeed");
        assert_eq!(config.remote_url("origin"), Some("https://example"));
    }

    #[test]
    fn subsection_names_are_case_sensitive() {
        let config = GitConfig::parse("[branch \"Feature\"]\n\tremote = origin\n")
            .expect("parse should succeed");
        assert_eq!(config.branch_remote("Feature"), Some("origin"));
        assert_eq!(config.branch_remote("feature"), None);
    }

    #[test]
    fn unknown_directives_are_ignored() {
        let content = "[remote \"origin\"]\n\turl = https://example\n\tsomefuturekey = zap\nstray line\n";
        let config = GitConfig::parse(content).expect("parse should succeed");
        assert_eq!(config.remote_url("origin"), Some("https://example"));
    }

    #[test]
    fn comments_are_stripped() {
        let content = "# leading comment\n[remote \"origin\"] ; trailing\n\turl = https://example # not this\n";
        let config = GitConfig::parse(content).expect("parse should succeed");
        assert_eq!(config.remote_url("origin"), Some("https://example"));
    }

    #[test]
    fn quoted_values_are_unwrapped() {
        let config = GitConfig::parse("[remote \"origin\"]\n\turl = \"https://example\"\n")
            .expect("parse should succeed");
        assert_eq!(config.remote_url("origin"), Some("https://example"));
    }

    #[test]
    fn malformed_section_header_is_rejected() {
        let result = GitConfig::parse("[remote \"origin\"\nurl = x\n");
        assert!(matches!(
            result,
            Err(DiscoveryError::ConfigParsing { .. })
        ));
    }

    #[test]
    fn last_assignment_wins_for_repeated_keys() {
        let content = "[remote \"origin\"]\n\turl = https://first\n\turl = https://second\n";
        let config = GitConfig::parse(content).expect("parse should succeed");
        assert_eq!(config.remote_url("origin"), Some("https://second"));
    }
}
