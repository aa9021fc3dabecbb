use fancy_regex::Regex;
use ingress_dns_domain::{HostPattern, HostRule, WildcardMatch};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// Compiled wildcard patterns kept across queries in regex mode. Cleared
/// wholesale once full, since the inventory may churn hosts over time.
const MAX_CACHED_PATTERNS: usize = 1024;

type PatternCache = HashMap<Box<str>, Option<Arc<Regex>>>;

/// Decides whether a query name is covered by an inventory listing.
///
/// Clones share the compiled-pattern cache.
#[derive(Debug, Clone, Default)]
pub struct HostMatcher {
    wildcard_match: WildcardMatch,
    patterns: Arc<Mutex<PatternCache>>,
}

impl HostMatcher {
    pub fn new(wildcard_match: WildcardMatch) -> Self {
        Self {
            wildcard_match,
            patterns: Arc::default(),
        }
    }

    pub fn wildcard_match(&self) -> WildcardMatch {
        self.wildcard_match
    }

    /// `name` must already have its trailing dot removed.
    pub fn matches(&self, rules: &[HostRule], name: &str) -> bool {
        rules.iter().any(|rule| self.rule_matches(rule, name))
    }

    pub fn matching_rules<'a>(&self, rules: &'a [HostRule], name: &str) -> Vec<&'a HostRule> {
        rules
            .iter()
            .filter(|rule| self.rule_matches(rule, name))
            .collect()
    }

    pub fn rule_matches(&self, rule: &HostRule, name: &str) -> bool {
        match rule.pattern() {
            HostPattern::Exact(host) => host == name,
            HostPattern::Wildcard(suffix) => match self.wildcard_match {
                WildcardMatch::Suffix => suffix_matches(suffix, name),
                WildcardMatch::Regex => self.regex_matches(suffix, name),
            },
            HostPattern::Malformed => {
                debug!(host = %rule.host, "Skipping malformed host rule");
                false
            }
        }
    }

    // Unanchored search, so `example.com` also matches `example.com.evil.test`
    // and `exampleXcom`.
    fn regex_matches(&self, pattern: &str, name: &str) -> bool {
        match self.compiled(pattern) {
            Some(re) => re.is_match(name).unwrap_or(false),
            None => false,
        }
    }

    fn compiled(&self, pattern: &str) -> Option<Arc<Regex>> {
        let mut cache = self.cache();
        if let Some(entry) = cache.get(pattern) {
            return entry.clone();
        }

        if cache.len() >= MAX_CACHED_PATTERNS {
            debug!(entries = cache.len(), "Wildcard pattern cache full, clearing");
            cache.clear();
        }

        let entry = match Regex::new(pattern) {
            Ok(re) => Some(Arc::new(re)),
            Err(e) => {
                debug!(pattern = %pattern, error = %e, "Wildcard suffix is not a valid pattern");
                None
            }
        };
        cache.insert(pattern.into(), entry.clone());
        entry
    }

    fn cache(&self) -> MutexGuard<'_, PatternCache> {
        self.patterns
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn suffix_matches(suffix: &str, name: &str) -> bool {
    if name == suffix {
        return true;
    }

    name.len() > suffix.len()
        && name.ends_with(suffix)
        && name.as_bytes()[name.len() - suffix.len() - 1] == b'.'
}
