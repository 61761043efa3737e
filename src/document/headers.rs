//! `Link` and `Updates-Via` response headers

use once_cell::sync::Lazy;
use oxiri::Iri;
use regex::Regex;
use tracing::warn;

/// One `<target>; param=value; ...` entry of a `Link` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkValue {
    pub target: String,
    pub params: Vec<(String, String)>,
}

impl LinkValue {
    /// Relation types, which may be space-separated inside a single `rel`
    pub fn rels(&self) -> impl Iterator<Item = &str> {
        self.params
            .iter()
            .filter(|(name, _)| name.eq_ignore_ascii_case("rel"))
            .flat_map(|(_, value)| value.split_whitespace())
    }

    pub fn has_rel(&self, rel: &str) -> bool {
        self.rels().any(|r| r.eq_ignore_ascii_case(rel))
    }
}

static LINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<([^>]*)>((?:\s*;\s*[^;,=\s]+\s*(?:=\s*(?:"[^"]*"|[^;,\s]*))?)*)"#)
        .expect("valid regex")
});

static PARAM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#";\s*([^;,=\s]+)\s*(?:=\s*(?:"([^"]*)"|([^;,\s]*)))?"#).expect("valid regex")
});

/// Parse every entry of a `Link` header value
///
/// Entries that do not start with `<target>` are skipped.
pub fn parse_link_header(header: &str) -> Vec<LinkValue> {
    LINK_RE
        .captures_iter(header)
        .map(|caps| {
            let target = caps[1].trim().to_string();
            let params = PARAM_RE
                .captures_iter(caps.get(2).map_or("", |m| m.as_str()))
                .map(|p| {
                    let value = p
                        .get(2)
                        .or_else(|| p.get(3))
                        .map_or("", |m| m.as_str());
                    (p[1].to_ascii_lowercase(), value.to_string())
                })
                .collect();
            LinkValue { target, params }
        })
        .collect()
}

/// Resolve `target` against the document URL
///
/// Hierarchical URLs with an empty path get `/` as their path, so that
/// `https://example.com` and `https://example.com/` compare equal.
pub fn resolve_reference(base: &str, target: &str) -> Option<String> {
    let base = match Iri::parse(base) {
        Ok(base) => base,
        Err(e) => {
            warn!(base = %base, error = %e, "cannot resolve against invalid base");
            return None;
        }
    };
    let resolved = match base.resolve(target) {
        Ok(resolved) => resolved,
        Err(e) => {
            warn!(target = %target, error = %e, "ignoring unresolvable link target");
            return None;
        }
    };
    match resolved.authority() {
        Some(authority) if resolved.path().is_empty() => {
            let mut normalized = format!("{}://{}/", resolved.scheme(), authority);
            if let Some(query) = resolved.query() {
                normalized.push('?');
                normalized.push_str(query);
            }
            if let Some(fragment) = resolved.fragment() {
                normalized.push('#');
                normalized.push_str(fragment);
            }
            Some(normalized)
        }
        _ => Some(resolved.into_inner()),
    }
}

/// The ACL of a document, if the `Link` header names exactly one
pub fn acl_from_link_header(header: Option<&str>, document: &str) -> Option<String> {
    let links = parse_link_header(header?);
    let mut acls = links.iter().filter(|link| link.has_rel("acl"));
    match (acls.next(), acls.next()) {
        (Some(acl), None) => resolve_reference(document, &acl.target),
        _ => None,
    }
}

/// The realtime update channel announced through `Updates-Via`
pub fn updates_via(header: Option<&str>, document: &str) -> Option<String> {
    let value = header?.split(',').next()?.trim();
    if value.is_empty() {
        return None;
    }
    resolve_reference(document, value)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "https://some-doc.example/relative-path.ttl";

    #[test]
    fn test_parse_link_header() {
        let links = parse_link_header(
            r#"<https://mock-acl.com>; rel="acl"; title="Mock ACL", <meta.ttl>; rel=describedBy"#,
        );
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].target, "https://mock-acl.com");
        assert!(links[0].has_rel("acl"));
        assert_eq!(
            links[0].params,
            vec![
                ("rel".to_string(), "acl".to_string()),
                ("title".to_string(), "Mock ACL".to_string()),
            ]
        );
        assert!(links[1].has_rel("describedby"));
    }

    #[test]
    fn test_space_separated_rels() {
        let links = parse_link_header(r#"<x.acl>; rel="type acl""#);
        assert_eq!(links[0].rels().collect::<Vec<_>>(), vec!["type", "acl"]);
        assert!(links[0].has_rel("ACL"));
    }

    #[test]
    fn test_single_acl() {
        assert_eq!(
            acl_from_link_header(Some(r#"<https://mock-acl.com>; rel="acl"; title="Mock ACL", "#), DOC),
            Some("https://mock-acl.com/".to_string())
        );
    }

    #[test]
    fn test_relative_acl() {
        assert_eq!(
            acl_from_link_header(Some(r#"<relative-path.ttl.acl>; rel="acl""#), DOC),
            Some("https://some-doc.example/relative-path.ttl.acl".to_string())
        );
    }

    #[test]
    fn test_zero_or_many_acls() {
        assert_eq!(acl_from_link_header(None, DOC), None);
        assert_eq!(acl_from_link_header(Some(r#"<meta>; rel="describedBy""#), DOC), None);
        assert_eq!(
            acl_from_link_header(
                Some(
                    r#"<https://mock-acl.com>; rel="acl"; title="Mock ACL", <https://mock-acl-2.com>; rel="acl"; title="Mock ACL 2", "#
                ),
                DOC
            ),
            None
        );
    }

    #[test]
    fn test_updates_via() {
        assert_eq!(
            updates_via(Some("wss://some-doc.example"), DOC),
            Some("wss://some-doc.example/".to_string())
        );
        assert_eq!(updates_via(Some(""), DOC), None);
        assert_eq!(updates_via(None, DOC), None);
    }
}
