//! MIME type resolution for shared files.

/// Fallback for unknown or missing extensions.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Resolves the content type of the file at `index` in a request.
///
/// An explicit type always wins. Otherwise the positional list is consulted,
/// falling back to [`DEFAULT_CONTENT_TYPE`] when it is too short. With no
/// override at all the type is inferred from the filename's extension.
pub fn resolve(
    filename: &str,
    explicit: Option<&str>,
    positional: Option<&[String]>,
    index: usize,
) -> String {
    if let Some(explicit) = explicit.filter(|t| !t.is_empty()) {
        return explicit.to_owned();
    }
    if let Some(types) = positional {
        return types
            .get(index)
            .filter(|t| !t.is_empty())
            .cloned()
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_owned());
    }
    infer(filename).to_owned()
}

/// Infers a content type from the extension of `filename`, ignoring case.
pub fn infer(filename: &str) -> &'static str {
    let extension = match filename.rsplit_once('.') {
        Some((_, ext)) => ext.to_ascii_lowercase(),
        None => return DEFAULT_CONTENT_TYPE,
    };
    match extension.as_str() {
        "pdf" => "application/pdf",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "txt" => "text/plain",
        "json" => "application/json",
        _ => DEFAULT_CONTENT_TYPE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_from_extension_case_insensitively() {
        assert_eq!(resolve("a.PDF", None, None, 0), "application/pdf");
        assert_eq!(resolve("photo.JpEg", None, None, 0), "image/jpeg");
        assert_eq!(resolve("notes.txt", None, None, 0), "text/plain");
        assert_eq!(resolve("data.json", None, None, 0), "application/json");
    }

    #[test]
    fn unknown_or_missing_extension_is_octet_stream() {
        assert_eq!(resolve("a.unknown", None, None, 0), DEFAULT_CONTENT_TYPE);
        assert_eq!(resolve("README", None, None, 0), DEFAULT_CONTENT_TYPE);
    }

    #[test]
    fn explicit_type_wins() {
        let positional = vec!["image/png".to_owned()];
        assert_eq!(
            resolve("a.pdf", Some("text/csv"), Some(positional.as_slice()), 0),
            "text/csv"
        );
    }

    #[test]
    fn positional_types_fall_back_to_default_when_short() {
        let positional = vec!["image/png".to_owned()];
        assert_eq!(resolve("a.pdf", None, Some(positional.as_slice()), 0), "image/png");
        assert_eq!(
            resolve("b.pdf", None, Some(positional.as_slice()), 1),
            DEFAULT_CONTENT_TYPE
        );
    }
}
