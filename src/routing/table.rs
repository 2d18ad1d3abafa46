//! Route classification table.
//!
//! # Responsibilities
//! - Store compiled protected, public and excluded matchers
//! - Classify a normalized path
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) prefix scan (acceptable for typical route counts)
//! - Exclusion is a scope filter for assets and API routes, not a
//!   security boundary; API routes authorize themselves
//! - Excluded prefixes apply everywhere, asset extensions only outside
//!   protected routes (`/quotes/42.txt` is still a protected page)

use std::fmt;

use crate::config::RoutesConfig;
use crate::routing::matcher::{AnyMatcher, ExtensionMatcher, Matcher, SegmentPrefixMatcher};

/// Classification of a path that passed the exclusion filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteClass {
    /// Requires a valid session.
    Protected,
    /// Meant only for anonymous callers.
    Public,
    /// Neither; the gateway forwards regardless of session state.
    Unclassified,
}

impl RouteClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteClass::Protected => "protected",
            RouteClass::Public => "public",
            RouteClass::Unclassified => "unclassified",
        }
    }
}

/// Outcome of looking a path up in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteMatch {
    /// Skipped before classification (static asset or API route).
    Excluded,
    Classified(RouteClass),
}

impl RouteMatch {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteMatch::Excluded => "excluded",
            RouteMatch::Classified(class) => class.as_str(),
        }
    }
}

impl fmt::Display for RouteMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compiled, immutable path classification.
#[derive(Debug)]
pub struct RouteTable {
    protected: Vec<SegmentPrefixMatcher>,
    public: Vec<SegmentPrefixMatcher>,
    excluded_prefixes: AnyMatcher,
    asset_extensions: ExtensionMatcher,
}

impl RouteTable {
    /// Compile the table from configuration.
    ///
    /// Disjointness of the protected and public sets is checked by
    /// [`crate::config::validate_config`], not here.
    pub fn from_config(config: &RoutesConfig) -> Self {
        let mut excluded_prefixes = AnyMatcher::default();
        for prefix in &config.excluded_prefixes {
            excluded_prefixes.push(SegmentPrefixMatcher::new(prefix.as_str()));
        }

        Self {
            protected: compile(&config.protected),
            public: compile(&config.public),
            excluded_prefixes,
            asset_extensions: ExtensionMatcher::new(&config.excluded_extensions),
        }
    }

    /// True if the path skips classification entirely.
    pub fn is_excluded(&self, path: &str) -> bool {
        self.lookup(path) == RouteMatch::Excluded
    }

    /// Classify a path that already passed the exclusion filter.
    pub fn classify(&self, path: &str) -> RouteClass {
        if self.protected.iter().any(|m| m.matches(path)) {
            RouteClass::Protected
        } else if self.public.iter().any(|m| m.matches(path)) {
            RouteClass::Public
        } else {
            RouteClass::Unclassified
        }
    }

    /// Exclusion filter followed by classification.
    pub fn lookup(&self, path: &str) -> RouteMatch {
        if self.excluded_prefixes.matches(path) {
            return RouteMatch::Excluded;
        }
        match self.classify(path) {
            RouteClass::Protected => RouteMatch::Classified(RouteClass::Protected),
            _ if self.asset_extensions.matches(path) => RouteMatch::Excluded,
            class => RouteMatch::Classified(class),
        }
    }
}

fn compile(entries: &[String]) -> Vec<SegmentPrefixMatcher> {
    entries
        .iter()
        .map(|e| SegmentPrefixMatcher::new(e.as_str()))
        .collect()
}
