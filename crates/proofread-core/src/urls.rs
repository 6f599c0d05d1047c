//! Base URLs and slug rules of the PlanB Network sites.

/// Public website.
pub const PLANB_BASE_URL: &str = "https://planb.network";

/// Content repository on GitHub.
pub const GITHUB_BASE_URL: &str = "https://github.com/PlanB-Network/bitcoin-educational-content";

/// Weblate project of the website strings.
pub const WEBLATE_BASE_URL: &str =
    "https://weblate.planb.network/projects/planb-network-website/website-elements";

/// URL slug of a title as the website builds it.
///
/// Lowercases, drops everything but word characters, whitespace and `-`,
/// then collapses each run of whitespace and hyphens into one `-`.
///
/// ```
/// assert_eq!(proofread_core::urls::slugify("Bitcoin: A Journey!"), "bitcoin-a-journey");
/// ```
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.to_lowercase().chars() {
        if c.is_whitespace() || c == '-' {
            pending_dash = true;
        } else if c.is_alphanumeric() || c == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        }
    }
    slug
}
