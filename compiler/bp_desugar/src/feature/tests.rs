use super::*;

#[test]
fn parse_versions() {
    assert_eq!(Version::parse("2.7"), Some(Version::new(2, 7, 0)));
    assert_eq!(Version::parse("3.1.4"), Some(Version::new(3, 1, 4)));
    assert_eq!(Version::parse("3.x"), None);
    assert_eq!(Version::parse("1.2.3.4"), None);
    assert_eq!(Version::new(2, 6, 10).to_string(), "2.6.10");
}

#[test]
fn gating_threshold() {
    let feature = Feature::PatternMatching;
    assert!(!feature.is_native(Version::new(2, 6, 9)));
    assert!(feature.is_native(Version::new(2, 7, 0)));
    assert!(feature.is_native(Version::new(3, 0, 0)));
    assert_eq!(feature.to_string(), "pattern-matching");
}
