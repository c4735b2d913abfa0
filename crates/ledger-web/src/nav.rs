//! Dashboard navigation.

/// A navigation entry as rendered in the layout.
pub struct NavLink {
    pub label: &'static str,
    pub href: &'static str,
    pub active: bool,
}

const NAV_ITEMS: [(&str, &str); 4] = [
    ("Dashboard", "/dashboard"),
    ("Decisions", "/dashboard/decisions"),
    ("Search", "/dashboard/search"),
    ("Settings", "/dashboard/settings"),
];

/// `/dashboard` only matches exactly; the others match as a prefix.
pub fn is_active(href: &str, current_path: &str) -> bool {
    if href == "/dashboard" {
        current_path == href
    } else {
        current_path.starts_with(href)
    }
}

/// Navigation entries for a page at `current_path`.
pub fn nav_links(current_path: &str) -> Vec<NavLink> {
    NAV_ITEMS
        .iter()
        .map(|&(label, href)| NavLink {
            label,
            href,
            active: is_active(href, current_path),
        })
        .collect()
}
