//! Search query construction.
//!
//! The Freshdesk filter endpoints cap the query string at 512 characters
//! including the surrounding double quotes, which leaves 510 for the
//! expression itself. Lookup values are packed greedily into as few
//! queries as possible.

/// Maximum length of one query expression, excluding the wrapping quotes.
const MAX_QUERY_LEN: usize = 510;

const JOIN: &str = " OR ";

/// Build `field:'value'` filter queries for a set of lookup values,
/// chunked to respect the service's query length cap.
///
/// Values are packed in input order. A single value whose term alone
/// exceeds the cap still produces its own query; the service rejects it
/// and the caller surfaces that as an API error.
#[must_use]
pub fn build_search_queries(field: &str, values: &[String]) -> Vec<String> {
    let mut queries = Vec::new();
    let mut current = String::new();

    for value in values {
        let term = format!("{field}:'{value}'");
        if current.is_empty() {
            current = term;
            continue;
        }
        if current.len() + JOIN.len() + term.len() <= MAX_QUERY_LEN {
            current.push_str(JOIN);
            current.push_str(&term);
        } else {
            queries.push(current);
            current = term;
        }
    }

    if !current.is_empty() {
        queries.push(current);
    }
    queries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_values_produce_no_queries() {
        assert!(build_search_queries("email", &[]).is_empty());
    }

    #[test]
    fn test_single_value() {
        let queries = build_search_queries("email", &["jane@hull.io".to_string()]);
        assert_eq!(queries, vec!["email:'jane@hull.io'".to_string()]);
    }

    #[test]
    fn test_values_join_with_or() {
        let queries = build_search_queries(
            "domain",
            &["hull.io".to_string(), "hull.com".to_string()],
        );
        assert_eq!(
            queries,
            vec!["domain:'hull.io' OR domain:'hull.com'".to_string()]
        );
    }

    #[test]
    fn test_chunks_respect_length_cap() {
        let values: Vec<String> = (0..200).map(|i| format!("user{i:04}@hull.io")).collect();
        let queries = build_search_queries("email", &values);

        assert!(queries.len() > 1);
        for query in &queries {
            assert!(query.len() <= MAX_QUERY_LEN);
        }

        // No value is lost or reordered across chunks.
        let rejoined = queries.join(JOIN);
        let terms: Vec<&str> = rejoined.split(JOIN).collect();
        assert_eq!(terms.len(), values.len());
        assert_eq!(terms[0], "email:'user0000@hull.io'");
        assert_eq!(terms[199], "email:'user0199@hull.io'");
    }
}
