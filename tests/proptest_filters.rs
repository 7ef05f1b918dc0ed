//! Property-based tests using proptest
//!
//! These tests verify identifier composition, list filtering, set
//! semantics and input validation using randomized inputs.

mod common;

use buddy_datasources::buddy::models::Project;
use buddy_datasources::filter::ListFilter;
use buddy_datasources::framework::{ReadContext, StateValue, Value};
use buddy_datasources::ids;
use buddy_datasources::validators::{is_valid_domain, is_valid_slug};
use common::{config, provider, set_attr, str_attr, FakeApi};
use proptest::prelude::*;
use regex::Regex;
use serde_json::json;

/// Identifier components: what the domain and slug validators let
/// through, plus the empty string
fn arb_component() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), "[a-z0-9][a-z0-9_-]{0,20}"]
}

fn arb_project() -> impl Strategy<Value = Project> {
    (
        "[a-z][a-z0-9-]{0,15}",
        "[A-Z][a-z ]{0,15}",
        prop_oneof!["ACTIVE", "CLOSED"],
    )
        .prop_map(|(name, display_name, status)| Project {
            name,
            display_name,
            status: status.to_string(),
            ..Default::default()
        })
}

/// Projects with unique names, as the API guarantees
fn arb_project_list() -> impl Strategy<Value = Vec<Project>> {
    prop::collection::vec(arb_project(), 0..40).prop_map(|mut projects| {
        let mut seen = std::collections::HashSet::new();
        projects.retain(|p| seen.insert(p.name.clone()));
        projects
    })
}

/// Small patterns that are always valid regular expressions
fn arb_pattern() -> impl Strategy<Value = String> {
    prop_oneof!["[a-z]{1,3}", "\\^[a-z]{1,2}", "[a-z]{1,2}\\$", Just("-".to_string())]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn test_double_id_round_trips(a in arb_component(), b in arb_component()) {
        let id = ids::compose_double(&a, &b);
        prop_assert_eq!(ids::decompose_double(&id).unwrap(), (a, b));
    }

    #[test]
    fn test_triple_id_round_trips(a in arb_component(), b in arb_component(), c in arb_component()) {
        let id = ids::compose_triple(&a, &b, &c);
        prop_assert_eq!(ids::decompose_triple(&id).unwrap(), (a, b, c));
    }

    #[test]
    fn test_triple_id_is_deterministic(a in arb_component(), b in arb_component(), c in arb_component()) {
        let id = ids::compose_triple(&a, &b, &c);
        prop_assert_eq!(&id, &ids::compose_triple(&a, &b, &c));
        prop_assert_eq!(id.matches(ids::SEPARATOR).count(), 2);
        prop_assert!(ids::decompose_double(&id).is_err());
    }

    #[test]
    fn test_unique_strings_have_a_letter_prefix(_n in 0u8..10) {
        let id = ids::unique_string();
        let shape = Regex::new(r"^[a-z]{5}-?\d+$").unwrap();
        prop_assert!(shape.is_match(&id), "unexpected synthetic id {}", id);
    }

    #[test]
    fn test_regex_filter_agrees_with_is_match(projects in arb_project_list(), pattern in arb_pattern()) {
        let re = Regex::new(&pattern).unwrap();
        let expected: Vec<Project> = projects.iter().filter(|p| re.is_match(&p.name)).cloned().collect();

        let filter = ListFilter::new()
            .regex(&Value::Known(pattern.clone()), "name_regex", |p: &Project| p.name.as_str())
            .unwrap();
        prop_assert_eq!(filter.apply(projects), expected);
    }

    #[test]
    fn test_unset_filters_accept_everything(projects in arb_project_list()) {
        let filter = ListFilter::new()
            .regex(&Value::Null, "name_regex", |p: &Project| p.name.as_str())
            .unwrap()
            .equals(&Value::Unknown, |p: &Project| p.status.as_str());
        prop_assert_eq!(filter.apply(projects.clone()), projects);
    }

    #[test]
    fn test_valid_domains_are_accepted(domain in "[a-z0-9][a-z0-9_-]{2,40}[a-z0-9]") {
        prop_assert!(is_valid_domain(&domain));
    }

    #[test]
    fn test_uppercase_domains_are_rejected(domain in "[a-z0-9]{1,10}[A-Z][a-z0-9]{1,10}") {
        prop_assert!(!is_valid_domain(&domain));
    }

    #[test]
    fn test_short_domains_are_rejected(domain in "[a-z0-9]{0,3}") {
        prop_assert!(!is_valid_domain(&domain));
    }

    #[test]
    fn test_slugs_never_start_with_a_dash(slug in "-[a-z0-9]{0,10}") {
        prop_assert!(!is_valid_slug(&slug));
    }

    #[test]
    fn test_sets_drop_duplicates(items in prop::collection::vec("[a-c]", 0..20)) {
        let set = StateValue::set(items.iter().map(|s| StateValue::String(s.clone())).collect());
        let mut unique = items.clone();
        unique.sort();
        unique.dedup();

        let elements = set.as_set().unwrap();
        prop_assert_eq!(elements.len(), unique.len());
        prop_assert_eq!(StateValue::set(elements.to_vec()), set.clone());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// A list read returns exactly the remote items the filter keeps
    #[test]
    fn test_projects_read_matches_local_filter(projects in arb_project_list(), pattern in arb_pattern()) {
        let re = Regex::new(&pattern).unwrap();
        let mut expected: Vec<String> = projects
            .iter()
            .filter(|p| re.is_match(&p.name))
            .map(|p| p.name.clone())
            .collect();
        expected.sort();

        let (provider, api) = provider(FakeApi { projects, ..Default::default() });
        let ds = provider.get("buddy_projects").unwrap();
        let config = config(ds, json!({"domain": "acme", "name_regex": pattern}));
        let response = tokio_test::block_on(provider.read(&ReadContext::new(), "buddy_projects", &config));

        let state = response.state.unwrap();
        let mut names: Vec<String> = set_attr(&state, "projects")
            .iter()
            .filter_map(|p| str_attr(p, "name").map(str::to_string))
            .collect();
        names.sort();
        prop_assert_eq!(names, expected);
        prop_assert_eq!(api.call_count(), 1);
    }
}
