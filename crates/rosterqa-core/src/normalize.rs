use crate::table::Snapshot;

/// Known legacy headers and the canonical names they map to. Each rename is
/// independently conditional on the legacy name being present; a snapshot
/// already using canonical names passes through untouched.
const HEADER_RENAMES: [(&str, &str); 2] = [
    (
        "Agent Writing Contract Start Date (Carrier appointment start date)",
        "Agent Writing Contract Start Date",
    ),
    (
        "Agent Writing Contract Status (actually active and cancelled's should come in two different files)",
        "Agent Writing Contract Status",
    ),
];

pub fn canonicalize_headers(snap: &Snapshot) -> Snapshot {
    let mut out = snap.clone();
    for (legacy, canonical) in HEADER_RENAMES {
        out = out.rename_column(legacy, canonical);
    }
    out
}

/// Trim every cell and collapse interior whitespace runs to one space.
/// Every column in a snapshot is text, so the pass covers the whole table;
/// it is total and idempotent.
pub fn normalize_whitespace(snap: &Snapshot) -> Snapshot {
    snap.map_cells(collapse_whitespace)
}

pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renames_legacy_headers() {
        let snap = Snapshot::new(
            vec![
                "Agent Id".into(),
                "Agent Writing Contract Start Date (Carrier appointment start date)".into(),
            ],
            vec![],
        );
        let out = canonicalize_headers(&snap);
        assert!(out.has_column("Agent Writing Contract Start Date"));
        assert!(!out.has_column(
            "Agent Writing Contract Start Date (Carrier appointment start date)"
        ));
    }

    #[test]
    fn canonical_headers_pass_through() {
        let snap = Snapshot::new(
            vec!["Agent Id".into(), "Agent Writing Contract Status".into()],
            vec![],
        );
        let out = canonicalize_headers(&snap);
        assert_eq!(out.headers(), snap.headers());
    }

    #[test]
    fn canonicalization_is_idempotent() {
        let snap = Snapshot::new(
            vec![
                "Agent Writing Contract Start Date (Carrier appointment start date)".into(),
            ],
            vec![],
        );
        let once = canonicalize_headers(&snap);
        let twice = canonicalize_headers(&once);
        assert_eq!(once.headers(), twice.headers());
    }

    #[test]
    fn collapses_and_trims_whitespace() {
        assert_eq!(collapse_whitespace("  a   b  "), "a b");
        assert_eq!(collapse_whitespace("a b"), "a b");
        assert_eq!(collapse_whitespace("   "), "");
        assert_eq!(collapse_whitespace("a\t\tb\n c"), "a b c");
    }

    #[test]
    fn whitespace_normalization_is_idempotent() {
        let snap = Snapshot::new(
            vec!["n".into()],
            vec![vec!["  a   b  ".into()], vec!["c".into()]],
        );
        let once = normalize_whitespace(&snap);
        assert_eq!(once.cell(0, "n"), Some("a b"));
        let twice = normalize_whitespace(&once);
        assert_eq!(twice.cell(0, "n"), Some("a b"));
    }
}
