use tastematch_core::error::Error;
use tastematch_core::types::EntityProfile;
use tastematch_text::TfidfVectorizer;

fn profile(id: &str, text: &str) -> EntityProfile {
    EntityProfile { entity_id: id.to_string(), characteristic_text: text.to_string() }
}

const CORPUS: [&str; 5] = ["vegan | cheap", "spicy", "vegan | cheap", "spicy | cheap", "luxury"];

#[test]
fn idf_is_smoothed_over_the_combined_corpus() {
    let space = TfidfVectorizer::new().fit(&CORPUS).expect("fit");
    assert_eq!(space.len(), 4);
    assert_eq!(space.documents(), 5);
    let terms: Vec<&str> = space.terms().collect();
    assert_eq!(terms, ["cheap", "luxury", "spicy", "vegan"], "vocabulary in sorted order");

    let expect = |df: f64| ((1.0 + 5.0) / (1.0 + df)).ln() + 1.0;
    assert!((space.idf("cheap").unwrap() - expect(3.0)).abs() < 1e-12);
    assert!((space.idf("vegan").unwrap() - expect(2.0)).abs() < 1e-12);
    assert!((space.idf("luxury").unwrap() - expect(1.0)).abs() < 1e-12);
}

#[test]
fn vectors_are_unit_length_or_zero() {
    let space = TfidfVectorizer::new().fit(&CORPUS).expect("fit");
    for text in CORPUS {
        let v = space.transform(text);
        assert!((v.norm() - 1.0).abs() < 1e-9, "norm of {text:?} = {}", v.norm());
    }
    let oov = space.transform("sushi | ramen");
    assert!(oov.is_zero());
    assert_eq!(oov.norm(), 0.0);
}

#[test]
fn fit_is_independent_of_corpus_order() {
    let mut reversed = CORPUS;
    reversed.reverse();
    let a = TfidfVectorizer::new().fit(&CORPUS).expect("fit");
    let b = TfidfVectorizer::new().fit(&reversed).expect("fit");
    assert_eq!(a.fingerprint(), b.fingerprint());
    assert_eq!(a.transform("spicy | cheap"), b.transform("spicy | cheap"));
}

#[test]
fn empty_or_single_term_corpus_is_insufficient() {
    let empty: [&str; 0] = [];
    let err = TfidfVectorizer::new().fit(&empty).unwrap_err();
    assert!(matches!(err, Error::InsufficientVocabulary { terms: 0 }));

    let err = TfidfVectorizer::new().fit(&["pizza", "pizza | pizza", "Pizza"]).unwrap_err();
    assert!(matches!(err, Error::InsufficientVocabulary { terms: 1 }));
}

#[test]
fn project_keeps_profile_order_and_space() {
    let space = TfidfVectorizer::new().fit(&CORPUS).expect("fit");
    let set = space.project(&[profile("b", "spicy"), profile("a", "vegan | cheap")]);
    assert_eq!(set.ids().to_vec(), vec!["b".to_string(), "a".to_string()]);
    assert_eq!(set.space(), space.fingerprint());
    let (_, first) = set.iter().next().unwrap();
    assert_eq!(first.nnz(), 1);
}

#[test]
fn shared_terms_give_partial_similarity() {
    let space = TfidfVectorizer::new().fit(&CORPUS).expect("fit");
    let user = space.transform("vegan | cheap");
    let same = space.transform("vegan | cheap");
    let partial = space.transform("spicy | cheap");
    let none = space.transform("luxury");
    assert!((user.dot(&same) - 1.0).abs() < 1e-9);
    let p = user.dot(&partial);
    assert!(p > 0.0 && p < 1.0, "partial overlap = {p}");
    assert_eq!(user.dot(&none), 0.0);
}
