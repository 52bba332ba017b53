use crate::clients::emailbison::Workspace;

/// Normalizes a workspace name into its URL slug: lowercase, ASCII
/// alphanumerics kept, every other run of characters collapsed into a single
/// dash, no leading or trailing dash.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Resolves a path segment against the upstream workspace list. Matching is
/// by slugified name; when two names collapse to the same slug the lowest id
/// wins so resolution stays deterministic. An all-digit segment that matches
/// no name is treated as a raw workspace id.
pub fn match_workspace(workspaces: &[Workspace], segment: &str) -> Option<Workspace> {
    let wanted = slugify(segment);

    if !wanted.is_empty() {
        let named = workspaces
            .iter()
            .filter(|ws| slugify(&ws.name) == wanted)
            .min_by_key(|ws| ws.id);
        if let Some(ws) = named {
            return Some(ws.clone());
        }
    }

    if !segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit()) {
        if let Ok(id) = segment.parse::<i64>() {
            return workspaces.iter().find(|ws| ws.id == id).cloned();
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn ws(id: i64, name: &str) -> Workspace {
        Workspace {
            id,
            name: name.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_slugify_lowercases_and_dashes() {
        assert_eq!(slugify("Acme Corp"), "acme-corp");
    }

    #[test]
    fn test_slugify_collapses_punctuation_runs() {
        assert_eq!(slugify("ACME!!  Corp & Sons"), "acme-corp-sons");
    }

    #[test]
    fn test_slugify_trims_edge_dashes() {
        assert_eq!(slugify(" --Acme-- "), "acme");
    }

    #[test]
    fn test_slugify_keeps_digits() {
        assert_eq!(slugify("Q3 2025 Outbound"), "q3-2025-outbound");
    }

    #[test]
    fn test_slugify_drops_non_ascii() {
        assert_eq!(slugify("Café Östlich"), "caf-stlich");
    }

    #[test]
    fn test_match_by_slug() {
        let list = vec![ws(3, "Acme Corp"), ws(7, "Beta Inc")];
        let found = match_workspace(&list, "beta-inc").unwrap();
        assert_eq!(found.id, 7);
    }

    #[test]
    fn test_match_normalizes_the_segment_too() {
        let list = vec![ws(3, "Acme Corp")];
        let found = match_workspace(&list, "Acme Corp").unwrap();
        assert_eq!(found.id, 3);
    }

    #[test]
    fn test_match_collision_prefers_lowest_id() {
        // "Acme Corp" and "acme? corp!" share the slug "acme-corp".
        let list = vec![ws(9, "acme? corp!"), ws(4, "Acme Corp")];
        let found = match_workspace(&list, "acme-corp").unwrap();
        assert_eq!(found.id, 4);
    }

    #[test]
    fn test_match_falls_back_to_raw_id() {
        let list = vec![ws(42, "Acme Corp")];
        let found = match_workspace(&list, "42").unwrap();
        assert_eq!(found.id, 42);
    }

    #[test]
    fn test_match_prefers_name_over_id() {
        // A workspace literally named "7" shadows workspace id 7.
        let list = vec![ws(7, "Acme Corp"), ws(12, "7")];
        let found = match_workspace(&list, "7").unwrap();
        assert_eq!(found.id, 12);
    }

    #[test]
    fn test_match_unknown_segment_is_none() {
        let list = vec![ws(3, "Acme Corp")];
        assert!(match_workspace(&list, "zeta").is_none());
        assert!(match_workspace(&list, "99").is_none());
    }

    #[test]
    fn test_match_all_punctuation_segment_is_none() {
        // Must not match a workspace whose name also slugifies to "".
        let list = vec![ws(3, "???")];
        assert!(match_workspace(&list, "---").is_none());
    }
}
