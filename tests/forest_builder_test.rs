//! Integration tests for rebuilding forests from flat records.

use rstest::rstest;

use spedtree::domain::{
    build_forest, records, DomainError, Forest, ForestBuilder, LineFormat, Record, RelationTable,
};

fn rec(line: &str) -> Record {
    Record::parse(line, &LineFormat::default()).unwrap()
}

fn ab_relations() -> RelationTable {
    [("A", None), ("B", Some("A"))].into_iter().collect()
}

fn sped_relations() -> RelationTable {
    [
        ("0000", None),
        ("C001", None),
        ("C100", Some("C001")),
        ("C170", Some("C100")),
        ("C990", None),
    ]
    .into_iter()
    .collect()
}

// ============================================================
// Attachment
// ============================================================

#[test]
fn given_two_roots_of_same_type_when_building_then_child_attaches_to_preceding_root() {
    let input = vec![
        Record::new(["A", "1"]).unwrap(),
        Record::new(["B", "2"]).unwrap(),
        Record::new(["A", "3"]).unwrap(),
    ];

    let forest = build_forest(input, &ab_relations()).unwrap();

    let mut expected = Forest::new();
    let first = expected.push_root(Record::new(["A", "1"]).unwrap());
    expected
        .append_child(first, Record::new(["B", "2"]).unwrap())
        .unwrap();
    expected.push_root(Record::new(["A", "3"]).unwrap());
    assert_eq!(forest, expected);
    assert_eq!(forest.render(), "|A|1|\n|B|2|\n|A|3|\n");
}

#[test]
fn given_child_after_second_parent_when_building_then_attaches_to_most_recent_parent() {
    let input = ["|C001|0|", "|C100|1|", "|C170|a|", "|C100|2|", "|C170|b|", "|C170|c|"]
        .map(rec);

    let forest = build_forest(input, &sped_relations()).unwrap();

    let c100: Vec<_> = forest.nodes_of_type("C100").collect();
    assert_eq!(c100.len(), 2);
    assert_eq!(c100[0].children().count(), 1);
    assert_eq!(c100[1].children().count(), 2);
    assert_eq!(forest.roots().len(), 1);
}

#[test]
fn given_child_whose_parent_type_was_never_seen_when_building_then_it_becomes_a_root() {
    let input = ["|0000|x|", "|C170|orphan|", "|C001|0|"].map(rec);

    let forest = build_forest(input, &sped_relations()).unwrap();

    let root_tags: Vec<_> = forest.root_refs().map(|r| r.type_tag()).collect();
    assert_eq!(root_tags, vec!["0000", "C170", "C001"]);
}

#[test]
fn given_unknown_record_type_when_building_then_fails_without_forest() {
    let input = ["|0000|x|", "|Z999|?|"].map(rec);

    let result = build_forest(input, &sped_relations());

    assert_eq!(
        result.unwrap_err(),
        DomainError::UnknownRecordType("Z999".to_string())
    );
}

#[test]
fn given_blank_line_mid_file_when_building_then_records_after_it_are_ignored() {
    let relations: RelationTable = [("0000", None), ("0001", Some("0000"))]
        .into_iter()
        .collect();

    let forest = build_forest(records("|0000|a|\n\n|0001|b|\n".lines()), &relations).unwrap();

    assert_eq!(forest.size(), 1);
    assert_eq!(forest.render(), "|0000|a|\n");
}

#[test]
fn given_children_out_of_tag_order_when_building_then_file_order_is_kept() {
    let input = ["|C001|0|", "|C990|2|", "|C001|1|", "|C170|z|"].map(rec);
    let relations: RelationTable = [("C001", None), ("C990", None), ("C170", Some("C001"))]
        .into_iter()
        .collect();

    let forest = build_forest(input, &relations).unwrap();

    assert_eq!(
        forest.render(),
        "|C001|0|\n|C990|2|\n|C001|1|\n|C170|z|\n"
    );
}

// ============================================================
// Round trip
// ============================================================

#[rstest]
#[case("|0000|a|\n")]
#[case("|0000|a|\n|C001|0|\n|C100|1|\n|C170|x|\n|C170|y|\n|C990|4|\n")]
#[case("|C001|0|\n|C100|1|\n|C100|2|\n|C170|z|\n")]
fn given_well_ordered_file_when_building_and_rendering_then_text_is_unchanged(
    #[case] text: &str,
) {
    let forest = build_forest(records(text.lines()), &sped_relations()).unwrap();

    assert_eq!(forest.render(), text);
}

#[test]
fn given_custom_delimiter_when_building_then_renders_with_it() {
    let format = LineFormat {
        delimiter: ';',
        type_tag_width: 4,
    };
    let text = ";C001;0;\n;C100;1;\n";
    let input = text.lines().map(|l| Record::parse(l, &format).unwrap());

    let forest = ForestBuilder::new(&sped_relations())
        .with_format(format)
        .build(input)
        .unwrap();

    assert_eq!(forest.render(), text);
}
