//! The `radio` domain: naming conventions and polling cadence shared by the
//! component and every radio platform.

use std::time::Duration;

/// Domain name under which radios and their services are registered.
pub const DOMAIN: &str = "radio";

/// Entity id of the group holding every radio.
pub const ENTITY_ID_ALL_RADIOS: &str = "group.all_radios";

/// Display name of the group holding every radio.
pub const GROUP_NAME_ALL_RADIOS: &str = "all radios";

/// How often the host polls radios that ask to be polled.
pub const SCAN_INTERVAL: Duration = Duration::from_secs(30);

/// Lower bound between two unforced polls of the same radio.
pub const MIN_TIME_BETWEEN_SCANS: Duration = Duration::from_secs(10);

/// Build the `radio.<object_id>` entity id for a display name.
#[must_use]
pub fn entity_id_for(name: &str) -> String {
    format!("{DOMAIN}.{}", slugify(name))
}

/// Lowercase `name` and collapse every run of non-alphanumeric characters
/// into a single underscore.
///
/// Returns `"unnamed"` when nothing usable is left.
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('_') {
            slug.push('_');
        }
    }
    while slug.ends_with('_') {
        slug.pop();
    }
    if slug.is_empty() {
        "unnamed".to_string()
    } else {
        slug
    }
}
