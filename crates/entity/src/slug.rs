//! Slug derivation
//!
//! Slugs are deterministically derived from a source field and never
//! client-supplied: lowercase, runs of non-alphanumeric characters collapse
//! to a single `-`, leading and trailing `-` trimmed.

/// Derive a URL-safe slug from an arbitrary string.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_separator = false;

    for c in input.chars() {
        if c.is_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.extend(c.to_lowercase());
        }
        else {
            pending_separator = true;
        }
    }

    slug
}

/// Capability for models addressed by a derived slug.
pub trait Sluggable {
    /// The stored slug.
    fn slug(&self) -> &str;

    /// The field the slug is derived from.
    fn slug_source(&self) -> &str;

    /// Whether the stored slug still matches its source field.
    fn is_slug_current(&self) -> bool { self.slug() == slugify(self.slug_source()) }
}
