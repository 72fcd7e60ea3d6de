// Unit tests for preprocessing and topic modeling.
//
// Tests the real Spanish stop-word set end to end through the Preprocessor,
// corpus construction from preprocessed text, and LDA model invariants.

use topicscope::model::{Corpus, EmptyCorpus, GibbsLda, LdaParams, TopicModeler};
use topicscope::text::stopwords::CUSTOM_STOP_WORDS;
use topicscope::text::Preprocessor;

fn spanish() -> Preprocessor {
    Preprocessor::new("spanish", &[]).unwrap()
}

fn docs(texts: &[&str]) -> Vec<String> {
    texts.iter().map(|s| s.to_string()).collect()
}

// ============================================================
// Preprocessor with the Spanish list
// ============================================================

#[test]
fn spanish_filler_is_removed() {
    let p = spanish();
    let tokens = p.tokenize("Hola, ¿me puedes dar dos ejemplos de funciones recursivas en Python?");
    assert!(tokens.contains(&"funciones".to_string()));
    assert!(tokens.contains(&"recursivas".to_string()));
    assert!(tokens.contains(&"python".to_string()));
    for filler in ["hola", "puedes", "dos", "ejemplos", "de", "en", "me"] {
        assert!(!tokens.contains(&filler.to_string()), "{filler} should be filtered");
    }
}

#[test]
fn every_custom_stop_word_is_filtered() {
    let p = spanish();
    for word in CUSTOM_STOP_WORDS {
        assert!(p.is_stop_word(word), "{word} missing from stop set");
        assert!(p.tokenize(word).is_empty());
    }
}

#[test]
fn extra_stop_words_apply() {
    let p = Preprocessor::new("spanish", &["python".to_string()]).unwrap();
    assert_eq!(p.tokenize("python tutorial"), vec!["tutorial"]);
}

#[test]
fn case_and_accents_are_normalized_to_lowercase() {
    let p = spanish();
    assert_eq!(p.tokenize("ECUACIÓN Cuadrática"), vec!["ecuación", "cuadrática"]);
}

// ============================================================
// Corpus + LDA
// ============================================================

fn survey() -> Vec<String> {
    docs(&[
        "¿Cómo ordenar una lista en Python?",
        "Explica las listas y diccionarios de Python",
        "Error de sintaxis en mi función de Python",
        "Receta de arroz con pollo al horno",
        "¿Cuánto tiempo se cocina el arroz?",
        "Ideas de receta con pollo y verduras",
        "Hola",
    ])
}

#[test]
fn corpus_keeps_one_bow_per_document() {
    let texts = spanish().preprocess(&survey());
    let corpus = Corpus::from_texts(&texts);
    assert_eq!(corpus.num_documents(), 7);
    assert!(corpus.documents[6].is_empty(), "'Hola' filters to nothing");
    assert!(corpus.dictionary.id("python").is_some());
    assert!(corpus.dictionary.id("hola").is_none());
}

#[test]
fn model_covers_every_document_and_topic() {
    let texts = spanish().preprocess(&survey());
    let corpus = Corpus::from_texts(&texts);
    let model = GibbsLda::new(LdaParams {
        num_topics: 3,
        iterations: 50,
        ..LdaParams::default()
    })
    .fit(&corpus)
    .unwrap();

    assert_eq!(model.num_topics(), 3);
    assert_eq!(model.num_documents(), 7);
    for d in 0..7 {
        let (topic, prob) = model.dominant_topic(d).unwrap();
        assert!(topic < 3);
        let row = model.document_topics(d);
        assert!(row.iter().all(|&p| p <= prob + 1e-12));
    }
    for t in 0..3 {
        let top = model.show_topic(t, 5);
        assert_eq!(top.len(), 5);
        assert!(top.iter().all(|(w, _)| corpus.dictionary.id(w).is_some()));
    }
}

#[test]
fn all_filler_corpus_is_empty_corpus() {
    let texts = spanish().preprocess(&docs(&["hola", "Hola, dame un ejemplo", "test"]));
    let corpus = Corpus::from_texts(&texts);
    let err = GibbsLda::new(LdaParams::default()).fit(&corpus).unwrap_err();
    let empty = err.downcast_ref::<EmptyCorpus>().expect("typed error");
    assert_eq!(empty.documents, 3);
}
