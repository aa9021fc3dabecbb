use ingress_dns_domain::{DnsQuery, HostPattern, HostRule, RecordType};

#[test]
fn test_literal_host_is_exact() {
    let rule = HostRule::new("app.example.com");
    assert_eq!(rule.pattern(), HostPattern::Exact("app.example.com"));
    assert!(!rule.is_wildcard());
}

#[test]
fn test_leading_star_is_wildcard() {
    let rule = HostRule::new("*.example.com");
    assert_eq!(rule.pattern(), HostPattern::Wildcard("example.com"));
    assert!(rule.is_wildcard());
}

#[test]
fn test_bare_star_prefix_is_malformed() {
    assert_eq!(HostRule::new("*.").pattern(), HostPattern::Malformed);
}

#[test]
fn test_nested_star_is_malformed() {
    assert_eq!(HostRule::new("*.*.example.com").pattern(), HostPattern::Malformed);
    assert_eq!(HostRule::new("app.*.example.com").pattern(), HostPattern::Malformed);
    assert_eq!(HostRule::new("*example.com").pattern(), HostPattern::Malformed);
}

#[test]
fn test_empty_host_is_malformed() {
    assert_eq!(HostRule::new("").pattern(), HostPattern::Malformed);
}

#[test]
fn test_display_includes_source() {
    let rule = HostRule::new("app.example.com").with_source("default/web");
    assert_eq!(rule.to_string(), "app.example.com (default/web)");
    assert_eq!(HostRule::from("plain.test").to_string(), "plain.test");
}

#[test]
fn test_query_bare_name_strips_one_dot() {
    let query = DnsQuery::new("app.example.com.", RecordType::A);
    assert_eq!(query.bare_name(), "app.example.com");

    let undotted = DnsQuery::new("app.example.com", RecordType::A);
    assert_eq!(undotted.bare_name(), "app.example.com");

    let root = DnsQuery::new(".", RecordType::A);
    assert_eq!(root.bare_name(), "");
}

#[test]
fn test_query_address_classification() {
    assert!(DnsQuery::new("a.test.", RecordType::A).is_address_query());
    assert!(!DnsQuery::new("a.test.", RecordType::AAAA).is_address_query());
    assert!(!DnsQuery::new("a.test.", RecordType::Other(99)).is_address_query());
}
