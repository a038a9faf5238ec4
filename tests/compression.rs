use asset_sync::compress::{is_gzip_variant, savings_percent, select, Selection, VariantSizes};

fn sizes(plain: u64, gzipped: Option<u64>) -> VariantSizes {
    VariantSizes { plain, gzipped }
}

#[test]
fn gzip_mode_substitutes_smaller_twin_under_plain_key() {
    let selection = select(true, false, sizes(1000, Some(400)));
    assert_eq!(selection, Selection::GzipUnderPlainKey);
    assert_eq!(savings_percent(1000, 400), "60.00");
}

#[test]
fn gzip_mode_keeps_plain_bytes_when_twin_is_not_smaller() {
    assert_eq!(select(true, false, sizes(400, Some(400))), Selection::Plain);
    assert_eq!(select(true, false, sizes(400, Some(900))), Selection::Plain);
}

#[test]
fn gzip_mode_skips_the_twin_itself() {
    assert_eq!(select(true, true, sizes(400, None)), Selection::SkipGzipTwin);
}

#[test]
fn gzip_mode_without_twin_uploads_plain() {
    assert_eq!(select(true, false, sizes(1000, None)), Selection::Plain);
}

#[test]
fn plain_mode_keeps_both_representations_addressable() {
    assert_eq!(
        select(false, true, sizes(400, None)),
        Selection::GzipAddressable
    );
    assert_eq!(select(false, false, sizes(1000, Some(400))), Selection::Plain);
}

#[test]
fn selection_is_deterministic() {
    for _ in 0..3 {
        assert_eq!(
            select(true, false, sizes(1000, Some(400))),
            Selection::GzipUnderPlainKey
        );
    }
}

#[test]
fn gzip_variant_detection() {
    assert!(is_gzip_variant("css/app.css.gz"));
    assert!(!is_gzip_variant("css/app.css"));
    assert!(!is_gzip_variant("css/gz"));
}

#[test]
fn savings_precision_is_two_decimals() {
    assert_eq!(savings_percent(3, 1), "66.67");
    assert_eq!(savings_percent(1000, 0), "100.00");
    assert_eq!(savings_percent(0, 0), "0.00");
}
