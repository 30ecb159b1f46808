//! Image upload rules: type filter and stored-name scheme.

/// Substrings accepted in both the extension and the declared MIME type.
const ALLOWED_TYPES: [&str; 3] = ["jpeg", "jpg", "png"];

/// Returns true when the lowercased extension of `original_name` and the MIME type
/// both contain one of `jpeg`, `jpg` or `png` (unanchored, so `image/png` passes).
pub fn file_type_allowed(original_name: &str, mime_type: &str) -> bool {
    let extension = extension_of(original_name).to_lowercase();
    let matches = |s: &str| ALLOWED_TYPES.iter().any(|t| s.contains(t));

    matches(&extension) && matches(mime_type)
}

/// Extension including the leading dot, or `""`. A leading dot alone
/// (`.png`) is a hidden file name, not an extension.
fn extension_of(name: &str) -> &str {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    match base.rfind('.') {
        Some(0) | None => "",
        Some(idx) => &base[idx..],
    }
}

/// Reduces a client-supplied file name to its final path component.
///
/// Both `/` and `\` count as separators. Returns `None` when nothing usable is
/// left (`""`, `.`, `..`).
pub fn sanitize_file_name(original_name: &str) -> Option<&str> {
    let base = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original_name);

    match base {
        "" | "." | ".." => None,
        name => Some(name),
    }
}

/// `<epoch-ms>-<name>`
pub fn stored_file_name(epoch_millis: i64, name: &str) -> String {
    format!("{}-{}", epoch_millis, name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_images_with_matching_mime() {
        assert!(file_type_allowed("cat.png", "image/png"));
        assert!(file_type_allowed("cat.JPG", "image/jpeg"));
        assert!(file_type_allowed("cat.jpeg", "image/jpeg"));
    }

    #[test]
    fn rejects_mismatched_extension_or_mime() {
        assert!(!file_type_allowed("cat.gif", "image/gif"));
        assert!(!file_type_allowed("cat.png", "text/plain"));
        assert!(!file_type_allowed("cat.txt", "image/png"));
        assert!(!file_type_allowed("png", "image/png"));
        assert!(!file_type_allowed(".png", "image/png"));
    }

    #[test]
    fn extension_ignores_dots_in_directories() {
        assert_eq!(extension_of("photos.png/cat"), "");
        assert_eq!(extension_of("a/b.c/cat.png"), ".png");
    }

    #[test]
    fn sanitize_strips_directories() {
        assert_eq!(sanitize_file_name("cat.png"), Some("cat.png"));
        assert_eq!(sanitize_file_name("../../etc/cat.png"), Some("cat.png"));
        assert_eq!(sanitize_file_name("C:\\Users\\me\\cat.png"), Some("cat.png"));
        assert_eq!(sanitize_file_name("dir/"), None);
        assert_eq!(sanitize_file_name(".."), None);
        assert_eq!(sanitize_file_name(""), None);
    }

    #[test]
    fn stored_name_prefixes_timestamp() {
        assert_eq!(stored_file_name(1700000000000, "cat.png"), "1700000000000-cat.png");
    }
}
