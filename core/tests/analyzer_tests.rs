use fts_core::analyzer::analyze;

#[test]
fn it_normalizes_and_stems() {
    let words = analyze("Running Runners RUN! The menu's prices.");
    // Stemming to "run" should appear
    assert!(words.contains(&"run".to_string()));
    assert!(words.contains(&"price".to_string()));
    assert!(!words.iter().any(|w| w.chars().any(|c| c.is_uppercase())));
}

#[test]
fn it_filters_stopwords() {
    let words = analyze("The quick brown fox and the lazy dog");
    assert!(!words.contains(&"the".to_string()));
    assert!(!words.contains(&"and".to_string()));
    assert_eq!(words, vec!["quick", "brown", "fox", "lazi", "dog"]);
}

#[test]
fn it_keeps_digits_and_duplicates() {
    let words = analyze("HTTP/2 and HTTP/3, http 2");
    assert_eq!(words, vec!["http", "2", "http", "3", "http", "2"]);
}

#[test]
fn it_folds_compatibility_forms() {
    // fullwidth letters normalize to ASCII before splitting
    assert_eq!(analyze("ＲＵＳＴ"), analyze("rust"));
}

#[test]
fn it_splits_expanded_compatibility_forms() {
    assert_eq!(analyze("¼ cup"), vec!["1", "4", "cup"]);
    assert_eq!(analyze("\u{FDFA}").len(), 4);
}

#[test]
fn every_token_is_alphanumeric() {
    let samples = ["¼ cup", "\u{FDFA}", "ＲＵＳＴ", "x² + ½", "ﬁle ﬂow", "HTTP/2 café's menu", "①②③"];
    for text in samples {
        for token in analyze(text) {
            assert!(!token.is_empty(), "{text:?} produced an empty token");
            assert!(token.chars().all(char::is_alphanumeric), "{text:?} produced {token:?}");
        }
    }
}

#[test]
fn it_is_deterministic() {
    let text = "Programming languages: programmers program programmatically.";
    assert_eq!(analyze(text), analyze(text));
    assert_eq!(analyze("programming"), analyze("PROGRAMMING"));
}

#[test]
fn it_never_fails_on_odd_input() {
    assert!(analyze("").is_empty());
    assert!(analyze("   \t\n").is_empty());
    assert!(analyze("!!! --- ### 🙂").is_empty());
    assert!(analyze("the a is of").is_empty());
}
