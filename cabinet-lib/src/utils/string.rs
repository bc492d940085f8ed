use std::collections::HashSet;

/// Turn raw header cell texts into unique column names
///
/// Blank headers become `Unnamed: <col>` (0-based column). A name seen before
/// gets the first free `.1`, `.2`, ... suffix. Names are otherwise kept
/// byte-for-byte: no trimming and no case folding.
pub fn unique_header_names(raw: &[String]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut names = Vec::with_capacity(raw.len());

    for (col_idx, header) in raw.iter().enumerate() {
        let base = if header.is_empty() {
            format!("Unnamed: {col_idx}")
        } else {
            header.clone()
        };

        let mut name = base.clone();
        let mut suffix = 1;
        while seen.contains(&name) {
            name = format!("{base}.{suffix}");
            suffix += 1;
        }

        seen.insert(name.clone());
        names.push(name);
    }

    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(headers: &[&str]) -> Vec<String> {
        headers.iter().map(|h| h.to_string()).collect()
    }

    #[test]
    fn test_unique_headers_unchanged() {
        let headers = owned(&["No", "Owner", "U"]);
        assert_eq!(unique_header_names(&headers), headers);
    }

    #[test]
    fn test_duplicate_headers_get_suffix() {
        let headers = owned(&["Serial", "Serial", "Serial"]);
        assert_eq!(
            unique_header_names(&headers),
            owned(&["Serial", "Serial.1", "Serial.2"])
        );
    }

    #[test]
    fn test_suffix_skips_existing_name() {
        let headers = owned(&["U", "U.1", "U"]);
        assert_eq!(unique_header_names(&headers), owned(&["U", "U.1", "U.2"]));
    }

    #[test]
    fn test_blank_headers_are_named_by_position() {
        let headers = owned(&["No", "", "Rack"]);
        assert_eq!(
            unique_header_names(&headers),
            owned(&["No", "Unnamed: 1", "Rack"])
        );
    }

    #[test]
    fn test_headers_are_case_sensitive() {
        let headers = owned(&["rack", "Rack", " Rack"]);
        assert_eq!(unique_header_names(&headers), headers);
    }
}
