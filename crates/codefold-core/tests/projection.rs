use codefold_core::{Bias, Document};
use codefold_lang::Language;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const LINES: &[&str] = &["fn() {", "  a();", "}", "  if (b) {", "    }", "", "x = [", "];"];

fn random_program(rng: &mut StdRng) -> String {
    let count = rng.gen_range(1..40);
    (0..count)
        .map(|_| LINES[rng.gen_range(0..LINES.len())])
        .collect::<Vec<_>>()
        .join("\n")
}

fn fold_random(doc: &mut Document, rng: &mut StdRng) {
    let starts: Vec<usize> = doc.folds().ranges().keys().copied().collect();
    for line in starts {
        if rng.gen_bool(0.5) {
            doc.update_folds(|folds| folds.fold(line));
        }
    }
}

#[test]
fn test_no_folds_means_identity_projection() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        let text = random_program(&mut rng);
        let doc = Document::new(&text, Language::JavaScript);
        assert_eq!(doc.display_text(), text);

        let line_count = text.split('\n').count();
        let identity: Vec<usize> = (0..line_count).collect();
        assert_eq!(doc.projection().display_to_real_line_map(), identity);
    }
}

#[test]
fn test_line_map_matches_display_lines() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..200 {
        let text = random_program(&mut rng);
        let mut doc = Document::new(&text, Language::JavaScript);
        fold_random(&mut doc, &mut rng);

        let map = doc.projection().display_to_real_line_map();
        assert_eq!(map.len(), doc.display_text().split('\n').count(), "{text:?}");
        assert!(map.windows(2).all(|w| w[0] < w[1]), "{map:?}");
        assert_eq!(doc.text(), text);
    }
}

#[test]
fn test_unfold_all_restores_real_text() {
    let mut rng = StdRng::seed_from_u64(1234);
    for _ in 0..100 {
        let text = random_program(&mut rng);
        let mut doc = Document::new(&text, Language::JavaScript);
        fold_random(&mut doc, &mut rng);
        doc.update_folds(|folds| {
            folds.unfold_all();
            true
        });
        assert_eq!(doc.display_text(), text);
    }
}

#[test]
fn test_visible_carets_round_trip() {
    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..100 {
        let text = random_program(&mut rng);
        let mut doc = Document::new(&text, Language::JavaScript);
        fold_random(&mut doc, &mut rng);

        let mapper = doc.mapper();
        for line in doc.projection().lines() {
            let visible = if line.is_folded() {
                line.prefix_len
            } else {
                line.len
            };
            for column in 0..=visible {
                let offset = line.start + column;
                let real = mapper.to_real(offset, Bias::Caret);
                assert_eq!(mapper.to_display(real), offset, "{text:?} at {offset}");
            }
        }
    }
}
