use util::tokens::INPUT_DATA;

/// Version string used when a step doesn't report one.
pub const UNKNOWN_VERSION: &str = "unknown";

/// True for values graph stores use to mean "no value".
fn is_blank(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.eq_ignore_ascii_case("null")
}

/// Map a step's raw tool id and display name to its canonical tool token.
///
/// A usable `tool_name` wins. Otherwise a missing tool id means the step is a
/// workflow input ([`INPUT_DATA`]), and a repository-style id such as
/// `toolshed.g2.bx.psu.edu/repos/devteam/bwa/bwa/1.2.3` is reduced to its
/// second-to-last segment.
pub fn normalize(tool_id: Option<&str>, tool_name: Option<&str>) -> String {
    if let Some(name) = tool_name.filter(|n| !is_blank(n)) {
        return name.trim().to_owned();
    }

    let id = match tool_id {
        Some(id) if !is_blank(id) => id.trim(),
        _ => return INPUT_DATA.to_owned(),
    };

    let mut segments = id.rsplit('/');
    match (segments.next(), segments.next(), segments.next()) {
        (Some(_), Some(tool), Some(_)) => tool.to_owned(),
        _ => id.to_owned(),
    }
}

/// Trimmed version string, or [`UNKNOWN_VERSION`] if there isn't one.
pub fn normalize_version(version: Option<&str>) -> String {
    match version {
        Some(v) if !is_blank(v) && !v.trim().eq_ignore_ascii_case("none") => v.trim().to_owned(),
        _ => UNKNOWN_VERSION.to_owned(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_toolshed_id() {
        let id = "toolshed.g2.bx.psu.edu/repos/devteam/bwa/bwa/1.2.3";
        assert_eq!(normalize(Some(id), None), "bwa");
    }

    #[test]
    fn test_name_wins() {
        assert_eq!(normalize(Some("upload1"), Some("Input dataset")), "Input dataset");
        assert_eq!(normalize(Some("upload1"), Some("  padded  ")), "padded");
    }

    #[test]
    fn test_input_data() {
        assert_eq!(normalize(None, None), INPUT_DATA);
        assert_eq!(normalize(Some("null"), None), INPUT_DATA);
        assert_eq!(normalize(Some("NULL"), Some("Null")), INPUT_DATA);
        assert_eq!(normalize(Some("   "), Some("")), INPUT_DATA);
    }

    #[test]
    fn test_plain_id() {
        assert_eq!(normalize(Some(" cat1 "), None), "cat1");
        assert_eq!(normalize(Some("owner/tool"), None), "owner/tool");
        assert_eq!(normalize(Some("a/b/c"), Some("null")), "b");
    }

    #[test]
    fn test_version() {
        assert_eq!(normalize_version(Some(" 1.2.3 ")), "1.2.3");
        assert_eq!(normalize_version(None), UNKNOWN_VERSION);
        assert_eq!(normalize_version(Some("None")), UNKNOWN_VERSION);
        assert_eq!(normalize_version(Some("null")), UNKNOWN_VERSION);
        assert_eq!(normalize_version(Some("")), UNKNOWN_VERSION);
    }
}
