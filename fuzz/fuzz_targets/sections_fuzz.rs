#![no_main]
use libfuzzer_sys::fuzz_target;
use seqdiff::align::{self, SimilarityAligner};
use seqdiff::compare::DefaultComparer;
use seqdiff::options::DiffOptions;
use seqdiff::sections::compute_sections;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    // First byte: patience flag and context size.
    let flags = data[0];
    let options = DiffOptions::default()
        .with_patience(flags & 1 != 0)
        .with_context_size(1 + ((flags >> 1) & 3) as usize);

    let payload = &data[1..];
    let split = payload.len() / 2;
    let (a, b) = payload.split_at(split);

    let sections: Vec<_> = compute_sections(a, b, &options, DefaultComparer)
        .expect("valid options")
        .collect();
    let total1: usize = sections.iter().map(|s| s.length1).sum();
    let total2: usize = sections.iter().map(|s| s.length2).sum();
    assert_eq!(total1, a.len());
    assert_eq!(total2, b.len());

    let (mut i, mut j) = (0, 0);
    for s in &sections {
        if s.is_match {
            assert_eq!(s.length1, s.length2);
            assert_eq!(a[i..i + s.length1], b[j..j + s.length2]);
        }
        i += s.length1;
        j += s.length2;
    }

    let aligner = SimilarityAligner::new(|x: &u8, y: &u8| {
        if x == y {
            1.0
        } else if x.eq_ignore_ascii_case(y) {
            0.5
        } else {
            0.0
        }
    });
    let elements = align::diff(a, b, &options, DefaultComparer, aligner).expect("alignment");
    let firsts: Vec<usize> = elements.iter().filter_map(|e| e.index1).collect();
    let seconds: Vec<usize> = elements.iter().filter_map(|e| e.index2).collect();
    assert_eq!(firsts, (0..a.len()).collect::<Vec<_>>());
    assert_eq!(seconds, (0..b.len()).collect::<Vec<_>>());
});
