//! Tests for the shared domain types.

use hexrecon_core::types::*;
use proptest::prelude::*;

#[test]
fn locator_display_and_parse() {
    let loc = Locator::new(1, 33);
    assert_eq!(loc.to_string(), "1,33");
    assert_eq!("1,33".parse::<Locator>().unwrap(), loc);
    assert!("1;33".parse::<Locator>().is_err());
    assert!("a,3".parse::<Locator>().is_err());
}

#[test]
fn locators_order_by_source_then_image() {
    let mut locs = vec![Locator::new(1, 0), Locator::new(0, 32), Locator::new(0, 16)];
    locs.sort();
    assert_eq!(
        locs,
        vec![Locator::new(0, 16), Locator::new(0, 32), Locator::new(1, 0)]
    );
}

#[test]
fn address_formats_as_four_uppercase_digits() {
    assert_eq!(Address(0x1a).to_string(), "001A");
    assert_eq!("1001".parse::<Address>().unwrap(), Address(0x1001));
    assert_eq!(Address(0xFFFE).offset(2), None);
    assert_eq!(Address(0x1000).offset(0x10), Some(Address(0x1010)));
}

#[test]
fn image_id_filters_on_substrings() {
    let id = ImageId::new("./APL/set1/0000_0_1.png");
    assert!(id.matches_any(&["set2", "set1"]));
    assert!(!id.matches_any(&["BASIC"]));
    assert!(!id.matches_any::<&str>(&[]));
}

proptest! {
    #[test]
    fn prop_label_from_word_round_trips(word in any::<u16>()) {
        let label = Label::from_word(word);
        prop_assert_eq!(label.word(), Some(word));
        prop_assert_eq!(label.to_be_bytes(), Some(word.to_be_bytes()));
        prop_assert_eq!(Label::parse(&label.to_string()).unwrap(), label);
    }

    #[test]
    fn prop_coordinate_rebuilds_its_own_path(
        stem in "[a-z0-9/]{0,12}",
        row in 0u8..2,
        col in 0u8..9,
    ) {
        let path = format!("{stem}{row}_{col}.png");
        let coord = ImageCoordinate::parse(&path).unwrap();
        prop_assert_eq!(coord.row, row);
        prop_assert_eq!(coord.col, col);
        prop_assert_eq!(coord.frame.path_of(row, col), path);
    }
}
