use super::*;
use crate::instruction::TreeBuilder;
use crate::position::LineColumn;

fn compare(text: &str, build: impl FnOnce(&mut TreeBuilder)) -> DifferenceDescription {
    compare_with(text, CompareOptions::default(), build)
}

fn compare_with(
    text: &str,
    options: CompareOptions,
    build: impl FnOnce(&mut TreeBuilder),
) -> DifferenceDescription {
    let mut b = TreeBuilder::new();
    build(&mut b);
    let tree = b.finish();
    Matcher::new(text, options).run(&tree)
}

fn literal(text: &'static str) -> impl FnOnce(&mut TreeBuilder) {
    move |b| {
        b.literal(text);
    }
}

fn year() -> VariableRule {
    VariableRule::new("YEAR", "[0-9]{4}", "2024").unwrap()
}

// --- text_equivalent ---

#[test]
fn test_text_equivalent_advances_cursor() {
    let m = Matcher::new("one two three", CompareOptions::default());
    assert_eq!(m.text_equivalent(0, &tokenize("one two")), Ok(2));
    assert_eq!(m.text_equivalent(1, &tokenize("two three")), Ok(3));
}

#[test]
fn test_text_equivalent_reports_failure_position() {
    let m = Matcher::new("one two three", CompareOptions::default());
    assert_eq!(m.text_equivalent(0, &tokenize("one three")), Err(1));
}

#[test]
fn test_text_equivalent_at_end_of_stream() {
    let m = Matcher::new("one", CompareOptions::default());
    assert_eq!(m.text_equivalent(1, &tokenize(", *")), Ok(1));
    assert_eq!(m.text_equivalent(1, &tokenize("two")), Err(1));
}

#[test]
fn test_text_equivalent_empty_text() {
    let m = Matcher::new("one", CompareOptions::default());
    assert_eq!(m.text_equivalent(0, &[]), Ok(0));
}

// --- Literal text ---

#[test]
fn test_literal_ignores_whitespace_and_case() {
    let d = compare(
        "MIT   License\n\n  PERMISSION is hereby granted",
        literal("mit license permission is hereby granted"),
    );
    assert!(d.matched(), "{}", d.message);
}

#[test]
fn test_stray_comma_in_compare_text() {
    let d = compare("Redistribution, and use", literal("Redistribution and use"));
    assert!(d.matched(), "{}", d.message);
}

#[test]
fn test_stray_comma_in_template() {
    let d = compare("Redistribution and use", literal("Redistribution, and use"));
    assert!(d.matched(), "{}", d.message);
}

#[test]
fn test_template_ending_in_skippable_token() {
    let d = compare("granted provided", |b| {
        b.literal("granted,");
        b.literal("provided");
    });
    assert!(d.matched(), "{}", d.message);
}

#[test]
fn test_literal_mismatch_location() {
    let d = compare(
        "Permission is not granted",
        literal("Permission is hereby granted"),
    );
    assert!(!d.matched());
    assert_eq!(
        d.message,
        "Difference found in normal text starting at line #1 column #14 \"not\"."
    );
    assert_eq!(d.differences, vec![LineColumn::new(1, 14, 3)]);
}

#[test]
fn test_literal_mismatch_on_later_line() {
    let d = compare("line one\nline 2", literal("line one line two"));
    assert_eq!(d.differences, vec![LineColumn::new(2, 5, 1)]);
}

#[test]
fn test_compare_text_ends_early() {
    let d = compare("Permission is", literal("Permission is hereby granted"));
    assert!(!d.matched());
    assert_eq!(
        d.message,
        "End of compare text encountered before the end of the license template at end of text"
    );
    assert_eq!(d.differences, vec![LineColumn::new(1, 13, 0)]);
}

#[test]
fn test_trailing_text_is_a_difference() {
    let d = compare("MIT License", literal("MIT"));
    assert!(!d.matched());
    assert!(d.message.starts_with("Additional text found"));
    assert_eq!(d.differences, vec![LineColumn::new(1, 4, 7)]);
}

#[test]
fn test_trailing_skippable_tokens_are_fine() {
    let d = compare("MIT --", literal("MIT"));
    assert!(d.matched(), "{}", d.message);
}

#[test]
fn test_trailing_text_allowed_by_option() {
    let options = CompareOptions::new().with_trailing_text(true);
    let d = compare_with("MIT License", options, literal("MIT"));
    assert!(d.matched(), "{}", d.message);
}

#[test]
fn test_spelling_equivalence() {
    let d = compare("This Licence", literal("this license"));
    assert!(d.matched(), "{}", d.message);

    let strict = CompareOptions::new().with_equivalent_words(false);
    let d = compare_with("This Licence", strict, literal("this license"));
    assert!(!d.matched());
}

#[test]
fn test_empty_template_and_text() {
    assert!(compare("", |_| {}).matched());
    assert!(!compare("text", |_| {}).matched());
}

// --- Variable rules ---

#[test]
fn test_variable_between_literals() {
    let d = compare("Copyright 2024 ACME", |b| {
        b.literal("Copyright ");
        b.variable(year());
        b.literal(" ACME");
    });
    assert!(d.matched(), "{}", d.message);
}

#[test]
fn test_variable_missing_text() {
    let d = compare("Copyright ACME", |b| {
        b.literal("Copyright ");
        b.variable(year());
        b.literal(" ACME");
    });
    assert!(!d.matched());
    assert!(d.message.starts_with("Variable text rule YEAR did not match"));
    assert_eq!(d.differences, vec![LineColumn::new(1, 10, 4)]);
}

#[test]
fn test_variable_at_end_of_template() {
    let d = compare("Copyright ACME Corp.", |b| {
        b.literal("Copyright");
        b.variable(VariableRule::new("HOLDER", ".+", "Someone").unwrap());
    });
    assert!(d.matched(), "{}", d.message);
}

#[test]
fn test_variable_following_text_not_found() {
    let d = compare("Copyright 2024 Other", |b| {
        b.literal("Copyright ");
        b.variable(year());
        b.literal("ACME");
    });
    assert!(!d.matched());
    assert!(
        d.message
            .starts_with("Unable to find the text following a variable template rule 'ACME'")
    );
    assert_eq!(d.differences, vec![LineColumn::new(1, 10, 4)]);
}

#[test]
fn test_variable_matches_prefix_only() {
    // The year takes "2024"; the literal must then line up with "2025".
    let d = compare("Copyright 2024 2025 ACME", |b| {
        b.literal("Copyright ");
        b.variable(year());
        b.literal(" ACME");
    });
    assert!(!d.matched());
    assert_eq!(d.differences, vec![LineColumn::new(1, 15, 4)]);
}

#[test]
fn test_variable_pattern_is_case_insensitive() {
    let d = compare("Licensed by ACME INC here", |b| {
        b.literal("Licensed by");
        b.variable(VariableRule::new("ORG", "acme inc", "ACME Inc").unwrap());
        b.literal("here");
    });
    assert!(d.matched(), "{}", d.message);
}

#[test]
fn test_variable_looks_past_optional_for_next_literal() {
    let d = compare("Copyright 2024, ACME", |b| {
        b.literal("Copyright");
        b.variable(year());
        b.begin_optional();
        b.literal(",");
        b.end_optional();
        b.literal("ACME");
    });
    assert!(d.matched(), "{}", d.message);
}

// --- Optional blocks ---

fn notice(b: &mut TreeBuilder) {
    b.literal("Licensed");
    b.begin_optional();
    b.literal(" (see NOTICE)");
    b.end_optional();
    b.literal(".");
}

#[test]
fn test_optional_present() {
    assert!(compare("Licensed (see NOTICE).", notice).matched());
}

#[test]
fn test_optional_absent() {
    assert!(compare("Licensed.", notice).matched());
}

#[test]
fn test_optional_wrong_content() {
    let d = compare("Licensed (wrong).", notice);
    assert!(!d.matched());
    assert_eq!(d.differences, vec![LineColumn::new(1, 9, 1)]);
}

#[test]
fn test_empty_optional() {
    let d = compare("Licensed.", |b| {
        b.literal("Licensed");
        b.begin_optional();
        b.end_optional();
        b.literal(".");
    });
    assert!(d.matched(), "{}", d.message);
}

#[test]
fn test_nested_optional_is_unsupported() {
    let d = compare("a b c", |b| {
        b.literal("a");
        b.begin_optional();
        b.begin_optional();
        b.literal("b");
        b.end_optional();
        b.end_optional();
        b.literal("c");
    });
    assert!(!d.matched());
    assert_eq!(d.message, UNSUPPORTED_NESTING);
    assert!(d.differences.is_empty());
}

#[test]
fn test_variable_in_optional_is_unsupported() {
    for text in ["Copyright 2024", "Copyright", ""] {
        let d = compare(text, |b| {
            b.literal("Copyright");
            b.begin_optional();
            b.variable(year());
            b.end_optional();
        });
        assert!(!d.matched(), "{text}");
        assert_eq!(d.message, UNSUPPORTED_NESTING);
    }
}

// --- Fused optional text ---

fn contributors(b: &mut TreeBuilder) {
    b.literal("each Contributor");
    b.begin_optional();
    b.literal("s");
    b.end_optional();
    b.literal(" hereby grants");
}

#[test]
fn test_fused_optional_present() {
    let d = compare("each Contributors hereby grants", contributors);
    assert!(d.matched(), "{}", d.message);
}

#[test]
fn test_fused_optional_absent() {
    let d = compare("each Contributor hereby grants", contributors);
    assert!(d.matched(), "{}", d.message);
}

#[test]
fn test_fused_optional_ignores_case() {
    for text in ["each contributors hereby grants", "EACH CONTRIBUTORS HEREBY GRANTS"] {
        let d = compare(text, contributors);
        assert!(d.matched(), "{text}: {}", d.message);
    }
}

#[test]
fn test_fused_optional_needs_earlier_words() {
    let d = compare("Contributors hereby grants", contributors);
    assert!(!d.matched());
    assert_eq!(
        d.message,
        "Difference found in normal text starting at line #1 column #0 \"Contributors\"."
    );
    assert_eq!(d.differences, vec![LineColumn::new(1, 0, 12)]);
}

#[test]
fn test_fused_optional_after_skippable_token() {
    let d = compare("each -- Contributors hereby grants", contributors);
    assert!(d.matched(), "{}", d.message);
}

#[test]
fn test_fused_into_following_literal() {
    let d = compare("the Workshop is fun", |b| {
        b.literal("the Work");
        b.begin_optional();
        b.literal("s");
        b.end_optional();
        b.literal("hop is fun");
    });
    assert!(d.matched(), "{}", d.message);
}

#[test]
fn test_fused_repair_does_not_hide_later_difference() {
    let d = compare("each Contributors hereby revokes", contributors);
    assert!(!d.matched());
    assert_eq!(d.differences, vec![LineColumn::new(1, 25, 7)]);
}

// --- Whole runs ---

#[test]
fn test_repeated_runs_agree() {
    let build = |b: &mut TreeBuilder| {
        b.literal("Copyright ");
        b.variable(year());
        b.literal(" ACME. All rights reserved.");
    };
    for text in ["Copyright 2020 ACME. All rights reserved.", "Copyright 2020 ACME. No rights."] {
        let first = compare(text, build);
        let second = compare(text, build);
        assert_eq!(first, second);
    }
}

#[test]
fn test_matcher_can_run_more_than_one_tree() {
    let m = Matcher::new("Licensed.", CompareOptions::default());
    let mut b = TreeBuilder::new();
    notice(&mut b);
    let tree = b.finish();
    assert_eq!(m.run(&tree), m.run(&tree));
    assert!(m.run(&tree).matched());
}
