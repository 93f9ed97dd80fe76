/// Lowercased alphanumerics only, so `getWebset`, `get-webset` and
/// `get_webset` compare equal.
fn fold(value: &str) -> String {
    value
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let above = row[j + 1];
            let cost = usize::from(ca != cb);
            row[j + 1] = (above + 1).min(row[j] + 1).min(diagonal + cost);
            diagonal = above;
        }
    }
    row[b.len()]
}

fn tolerance(folded_len: usize) -> usize {
    match folded_len {
        0 => 0,
        1..=4 => 1,
        5..=8 => 2,
        n => (n * 35 / 100).max(3),
    }
}

/// Up to `limit` candidates close to `input`, best first. Containment in
/// either direction counts as a near match.
pub fn suggest(input: &str, candidates: &[String], limit: usize) -> Vec<String> {
    let needle = fold(input);
    if needle.is_empty() || limit == 0 {
        return Vec::new();
    }
    let allowed = tolerance(needle.len());

    let mut scored: Vec<(usize, &String)> = candidates
        .iter()
        .filter_map(|candidate| {
            let folded = fold(candidate);
            if folded.is_empty() {
                return None;
            }
            let score = if folded == needle {
                0
            } else if folded.contains(&needle) || needle.contains(&folded) {
                1
            } else {
                edit_distance(&needle, &folded)
            };
            (score <= allowed).then_some((score, candidate))
        })
        .collect();
    scored.sort_by(|a, b| {
        a.0.cmp(&b.0)
            .then_with(|| a.1.len().cmp(&b.1.len()))
            .then_with(|| a.1.cmp(b.1))
    });

    let mut out: Vec<String> = Vec::new();
    for (_, candidate) in scored {
        if !out.contains(candidate) {
            out.push(candidate.clone());
        }
        if out.len() == limit {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn typo_in_operation_name_is_suggested() {
        let candidates = names(&["get_webset", "list_websets", "delete_webset"]);
        assert_eq!(suggest("get_webst", &candidates, 3)[0], "get_webset");
    }

    #[test]
    fn separators_and_case_are_ignored() {
        let candidates = names(&["list_websets"]);
        assert_eq!(suggest("ListWebsets", &candidates, 3), names(&["list_websets"]));
    }

    #[test]
    fn distant_names_are_not_suggested() {
        let candidates = names(&["create_webhook"]);
        assert!(suggest("xyz", &candidates, 3).is_empty());
        assert!(suggest("", &candidates, 3).is_empty());
    }

    #[test]
    fn edit_distance_counts_single_edits() {
        assert_eq!(edit_distance("limt", "limit"), 1);
        assert_eq!(edit_distance("kitten", "sitting"), 3);
    }
}
