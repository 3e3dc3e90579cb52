//! Built-in catalog of sites the agent can be pointed at, each with a
//! couple of tasks known to be achievable there.

pub struct Site {
    pub name: &'static str,
    pub url: &'static str,
    pub category: &'static str,
    pub sample_tasks: &'static [&'static str],
}

pub const BUILTIN_SITES: &[Site] = &[
    Site {
        name: "Amazon",
        url: "https://www.amazon.com",
        category: "shopping",
        sample_tasks: &[
            "Search for wireless mouse",
            "Navigate to Electronics category",
        ],
    },
    Site {
        name: "Kelbillet",
        url: "https://www.kelbillet.com/",
        category: "ticket_booking",
        sample_tasks: &[
            "Click on the search box to look for an event",
            "Find and click on a concert ticket",
        ],
    },
    Site {
        name: "Wikipedia",
        url: "https://www.wikipedia.org",
        category: "info_search",
        sample_tasks: &[
            "Search for Artificial Intelligence",
            "Click on the English Wikipedia",
        ],
    },
    Site {
        name: "Google",
        url: "https://www.google.com",
        category: "info_search",
        sample_tasks: &["Search for Python tutorial"],
    },
    Site {
        name: "Example",
        url: "https://example.com",
        category: "demo",
        sample_tasks: &["Find the 'More information' link"],
    },
];

/// Case-insensitive lookup by site name.
pub fn find_site(name: &str) -> Option<&'static Site> {
    BUILTIN_SITES
        .iter()
        .find(|site| site.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(find_site("wikipedia").unwrap().name, "Wikipedia");
        assert_eq!(find_site("GOOGLE").unwrap().name, "Google");
        assert!(find_site("myspace").is_none());
    }

    #[test]
    fn every_site_has_a_sample_task() {
        for site in BUILTIN_SITES {
            assert!(!site.sample_tasks.is_empty(), "{}", site.name);
            assert!(site.url.starts_with("https://"), "{}", site.name);
        }
    }
}
