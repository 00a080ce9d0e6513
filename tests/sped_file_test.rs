//! Tests against the latin-1 SPED sample in tests/resources.

use std::fs;
use std::path::Path;

use rstest::{fixture, rstest};
use tempfile::TempDir;

use spedtree::application::{check_round_trip, load_forest};
use spedtree::config::Settings;
use spedtree::domain::{Forest, LineFormat, RelationTable};
use spedtree::infrastructure::{load_relations, read_text, write_text, Encoding};
use spedtree::util::testing;

const SAMPLE: &str = "tests/resources/sped_sample.txt";
const RELATIONS: &str = "tests/resources/relations.json";

#[fixture]
fn relations() -> RelationTable {
    testing::init_test_setup();
    load_relations(Path::new(RELATIONS)).unwrap()
}

#[fixture]
fn forest(relations: RelationTable) -> Forest {
    load_forest(Path::new(SAMPLE), &relations, &Settings::default()).unwrap()
}

#[rstest]
fn given_sample_when_loading_then_signature_block_is_ignored(forest: Forest) {
    assert_eq!(forest.size(), 21);
    let root_tags: Vec<_> = forest.root_refs().map(|r| r.type_tag()).collect();
    assert_eq!(
        root_tags,
        vec!["0000", "0001", "0990", "C001", "C990", "9001", "9990", "9999"]
    );
    assert_eq!(&forest.first_node_of_type("9999").unwrap().record()[1], "21");
}

#[rstest]
fn given_sample_when_checking_round_trip_then_record_lines_match(relations: RelationTable) {
    let text = read_text(Path::new(SAMPLE), Encoding::Latin1).unwrap();

    let report = check_round_trip(&text, &relations, LineFormat::default()).unwrap();

    assert!(report.is_ok(), "{:?}", report.mismatch);
    assert_eq!(report.records, 21);
    assert_eq!(report.ignored_lines, 2);
}

#[rstest]
#[case("C", 8)]
#[case("0", 8)]
#[case("9", 5)]
#[case("C1", 0)]
fn given_sample_when_sizing_by_block_prefix_then_counts_block_records(
    forest: Forest,
    #[case] prefix: &str,
    #[case] expected: usize,
) {
    assert_eq!(forest.size_by_type_prefix(prefix), expected);
}

#[rstest]
fn given_sample_when_finding_first_c100_then_subtree_holds_its_items(forest: Forest) {
    let c100 = forest.first_node_of_type("C100").unwrap();

    assert_eq!(
        c100.render(),
        "|C100|0|1|P001|55|00|1|1001|\n|C170|1|ITEM01|10,00|\n|C170|2|ITEM02|5,00|\n"
    );
    assert_eq!(forest.nodes_of_type("C170").count(), 3);

    let item = c100.children().next().unwrap();
    let chain: Vec<_> = item.ancestors().map(|n| n.type_tag()).collect();
    assert_eq!(chain, vec!["C170", "C100", "C010", "C001"]);
}

#[rstest]
fn given_sample_when_dropping_items_then_documents_survive(mut forest: Forest) {
    forest.retain(|n| n.type_tag() != "C170");

    assert_eq!(forest.size(), 18);
    assert_eq!(forest.nodes_of_type("C100").count(), 2);
    assert!(forest.first_node_of_type("C170").is_err());
}

#[rstest]
fn given_latin1_names_when_writing_back_then_bytes_are_latin1(forest: Forest) {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out.txt");

    write_text(&out, &forest.render(), Encoding::Latin1).unwrap();

    let bytes = fs::read(&out).unwrap();
    let first_line: Vec<u8> = bytes.iter().copied().take_while(|&b| b != b'\n').collect();
    assert!(first_line.ends_with(b"EMPRESA A\xC7\xC3O LTDA|12345678000190|SP|"));
    assert_eq!(bytes.iter().filter(|&&b| b == b'\n').count(), 21);
    assert_eq!(read_text(&out, Encoding::Latin1).unwrap(), forest.render());
}

#[rstest]
fn given_latin1_file_when_read_as_utf8_then_decode_fails(relations: RelationTable) {
    let settings = Settings {
        encoding: Encoding::Utf8,
        ..Settings::default()
    };

    let result = load_forest(Path::new(SAMPLE), &relations, &settings);

    assert!(result.is_err());
}
