use proptest::prelude::*;
use apex_ls_mcp::probe::{RuntimeVersionInfo, parse_java_version};

proptest! {
    #[test]
    fn direct_scheme_major_is_first_component(
        major in 2u32..=99,
        minor in 0u32..=50,
        patch in 0u32..=50,
        vendor in prop::sample::select(vec!["openjdk", "java"]),
    ) {
        let output = format!(
            "{vendor} version \"{major}.{minor}.{patch}\" 2024-01-16\nOpenJDK Runtime Environment (build {major}.{minor}.{patch}+9)"
        );
        let parsed = parse_java_version(&output).expect("version should parse");
        prop_assert_eq!(parsed.major, major);
        prop_assert_eq!(parsed.token, major.to_string());
    }

    #[test]
    fn legacy_scheme_major_is_second_component(
        major in 2u32..=9,
        update in 0u32..=400,
    ) {
        let output = format!("java version \"1.{major}.0_{update}\"\nJava(TM) SE Runtime Environment");
        let parsed = parse_java_version(&output).expect("version should parse");
        prop_assert_eq!(parsed.major, major);
        prop_assert_eq!(parsed.token, "1");
    }

    #[test]
    fn compatibility_is_a_threshold(major in 2u32..=40, min in 1u32..=40) {
        let output = format!("openjdk version \"{major}.0.1\"");
        let info = RuntimeVersionInfo::from_output(true, &output, min);
        prop_assert!(info.available);
        prop_assert_eq!(info.is_compatible, Some(major >= min));
    }

    #[test]
    fn text_without_quoted_version_never_parses(text in "[a-zA-Z0-9 .\n]{0,80}") {
        prop_assert!(parse_java_version(&text).is_none());
    }
}
