#![no_main]
use libfuzzer_sys::fuzz_target;
use seqdiff::align::{InsertDeleteAligner, ReplaceInsertDeleteAligner};
use seqdiff::compare::DefaultComparer;
use seqdiff::merge::{TakeLeftThenRight, merge_all};
use seqdiff::options::DiffOptions;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    // First byte selects the aligner; the rest is split into three parts.
    let replace = data[0] & 1 != 0;
    let payload = &data[1..];
    let third = payload.len() / 3;
    let (base, rest) = payload.split_at(third);
    let (left, right) = rest.split_at(third);

    let options = DiffOptions::default();
    let merge = |base: &[u8], left: &[u8], right: &[u8], replace: bool| {
        if replace {
            let aligner = ReplaceInsertDeleteAligner;
            merge_all(base, left, right, &options, aligner, TakeLeftThenRight, DefaultComparer)
        } else {
            let aligner = InsertDeleteAligner;
            merge_all(base, left, right, &options, aligner, TakeLeftThenRight, DefaultComparer)
        }
    };

    let merged = merge(base, left, right, replace);
    // Structural conflicts are allowed; a successful merge only holds input bytes.
    if let Ok(merged) = merged {
        assert!(merged.iter().all(|b| base.contains(b) || left.contains(b) || right.contains(b)));
    }

    let same = merge(base, base, base, false)
        .expect("identical sides never conflict");
    assert_eq!(same, base);

    let left_only = merge(base, left, base, replace)
        .expect("an unchanged side never conflicts");
    assert_eq!(left_only, left);
});
