//! Robots.txt parser
//!
//! Only the wildcard (`User-agent: *`) group is honored. Rules addressed to
//! named crawlers are skipped entirely.

/// Disallowed path prefixes for one domain
///
/// Prefixes are kept as raw strings and matched by substring containment
/// against the full site URL, not compiled into a path-matching grammar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisallowList {
    prefixes: Vec<String>,
}

impl DisallowList {
    /// A permissive list that blocks nothing
    ///
    /// This is the decision whenever robots.txt cannot be obtained.
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Parses robots.txt content into the wildcard group's disallowed paths
    ///
    /// # Parsing Rules
    ///
    /// - Lines are trimmed; blank lines and `#` comments are skipped
    /// - Directive names are case-insensitive
    /// - The active agent starts as `*`, so rules before any `User-agent`
    ///   line apply to everyone
    /// - `Disallow` values are recorded only while the active agent is `*`
    /// - An empty `Disallow:` value permits everything and is not recorded
    pub fn from_content(content: &str) -> Self {
        let mut active_agent = String::from("*");
        let mut prefixes = Vec::new();

        for line in content.lines() {
            let trimmed = line.trim();

            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let Some((key, value)) = trimmed.split_once(':') else {
                continue;
            };

            // Inline comments: "Disallow: /tmp # scratch space"
            let value = value.split('#').next().unwrap_or("").trim();

            match key.trim().to_lowercase().as_str() {
                "user-agent" => active_agent = value.to_string(),
                "disallow" if active_agent == "*" && !value.is_empty() => {
                    prefixes.push(value.to_string());
                }
                _ => {}
            }
        }

        Self { prefixes }
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    /// Returns the first prefix contained in `url`, if any
    pub fn matching_prefix(&self, url: &str) -> Option<&str> {
        self.prefixes
            .iter()
            .find(|prefix| url.contains(prefix.as_str()))
            .map(String::as_str)
    }

    /// True if any disallowed prefix is a substring of `url`
    pub fn blocks(&self, url: &str) -> bool {
        self.matching_prefix(url).is_some()
    }

    /// Comma-separated prefixes, or `None` for an empty list
    pub fn describe(&self) -> String {
        if self.prefixes.is_empty() {
            "None".to_string()
        } else {
            self.prefixes.join(", ")
        }
    }
}
