//! Glossary linking over converted Markdown.

use leetdown::markdown::{
    ConvertOptions, GlossaryPair, LabelAllocator, NoFetch, append_glossary, assign_labels,
    build_section, convert_html, inject_anchors,
};

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn two_sum_markdown() -> String {
    let html = std::fs::read_to_string(format!("{FIXTURES_DIR}/two_sum.html"))
        .expect("Failed to read fixture");
    convert_html(&html, &ConvertOptions::default(), &mut NoFetch).markdown
}

#[test]
fn test_links_term_in_emphasis() {
    let mut labels = LabelAllocator::new();
    let pairs = vec![GlossaryPair::new("indices", "Positions in an array.", &mut labels)];
    let md = inject_anchors(&two_sum_markdown(), &pairs);
    assert!(md.contains("return *[indices](#glossary-indices) of the two numbers"));
}

#[test]
fn test_code_only_term_is_not_linked() {
    let mut labels = LabelAllocator::new();
    let pairs = vec![GlossaryPair::new("nums", "The input array.", &mut labels)];
    let original = two_sum_markdown();
    let md = append_glossary(&original, &pairs);

    assert!(!md.contains("[nums]"));
    assert!(md.starts_with(&original));
    assert!(md.ends_with("<a id=\"glossary-nums\"></a>\n**nums**  \nThe input array.\n"));
}

#[test]
fn test_fenced_code_is_byte_identical() {
    let mut labels = LabelAllocator::new();
    let pairs = vec![
        GlossaryPair::new("Input", "", &mut labels),
        GlossaryPair::new("Output", "", &mut labels),
    ];
    let md = "```\nInput: x\nOutput: y\n```\n\nInput and Output are shown above.";
    assert_eq!(
        inject_anchors(md, &pairs),
        "```\nInput: x\nOutput: y\n```\n\n\
         [Input](#glossary-input) and [Output](#glossary-output) are shown above."
    );
}

#[test]
fn test_earliest_prose_segment_wins() {
    let mut labels = LabelAllocator::new();
    let pairs = vec![GlossaryPair::new("heap", "", &mut labels)];
    let md = "A heap.\n\n~~~\nheap\n~~~\n\nAnother heap.";
    assert_eq!(
        inject_anchors(md, &pairs),
        "A [heap](#glossary-heap).\n\n~~~\nheap\n~~~\n\nAnother heap."
    );
}

#[test]
fn test_section_layout() {
    let mut labels = LabelAllocator::new();
    let pairs = vec![
        GlossaryPair::new("Subarray", "A contiguous\nnon-empty sequence.", &mut labels),
        GlossaryPair::new("subarray", "Duplicate term.", &mut labels),
    ];
    assert_eq!(
        build_section(&pairs),
        "## Glossary\n\n\
         <a id=\"glossary-subarray\"></a>\n**Subarray**  \nA contiguous  \nnon-empty sequence.\n\n\
         <a id=\"glossary-subarray-2\"></a>\n**subarray**  \nDuplicate term.\n"
    );
}

#[test]
fn test_pairs_from_json() {
    let mut pairs: Vec<GlossaryPair> = serde_json::from_str(
        r#"[{"term": "Binary Search", "body": "Halve the range."},
            {"term": "Two Pointers", "label": "tp", "markdown": "Walk inward."}]"#,
    )
    .unwrap();
    assign_labels(&mut pairs);
    assert_eq!(pairs[0].label, "binary-search");
    assert_eq!(pairs[0].markdown, "Halve the range.");
    assert_eq!(pairs[1].label, "tp");
}
