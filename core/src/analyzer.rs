use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref RE: Regex = Regex::new(r"[\p{L}\p{N}]+").expect("valid regex");
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","about","above","after","again","against","all","am","an","and","any","are","as","at",
            "be","because","been","before","being","below","between","both","but","by",
            "can","cannot","could",
            "did","do","does","doing","down","during",
            "each","few","for","from","further",
            "had","has","have","having","he","her","here","hers","herself","him","himself","his","how",
            "i","if","in","into","is","it","its","itself",
            "me","more","most","my","myself",
            "no","nor","not","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
            "same","she","should","so","some","such",
            "than","that","the","their","theirs","them","themselves","then","there","these","they","this","those","through","to","too",
            "under","until","up","very",
            "was","we","were","what","when","where","which","while","who","whom","why","with","would",
            "you","your","yours","yourself","yourselves"
        ];
        words.iter().copied().collect()
    };
}

/// Run the full analysis pipeline: normalize, tokenize, lowercase, drop
/// stopwords, stem.
///
/// Indexed text and query text go through this same function, so a query
/// term matches exactly when it normalizes to an indexed token. Any input,
/// including the empty string, yields a (possibly empty) token list.
pub fn analyze(text: &str) -> Vec<String> {
    let normalized = normalize(text);
    let tokens = tokenize(&normalized);
    let tokens = lowercase_filter(tokens);
    let tokens = stopword_filter(tokens);
    stemmer_filter(tokens)
}

/// NFKC compatibility normalization of the raw text. Runs before splitting
/// because a compatibility form can expand into separators (`¼` -> `1⁄4`).
pub fn normalize(text: &str) -> String {
    text.nfkc().collect()
}

/// Split text into maximal runs of letters and digits, keeping their order.
pub fn tokenize(text: &str) -> Vec<String> {
    RE.find_iter(text).map(|m| m.as_str().to_string()).collect()
}

pub fn lowercase_filter(tokens: Vec<String>) -> Vec<String> {
    tokens.into_iter().map(|t| t.to_lowercase()).collect()
}

pub fn stopword_filter(tokens: Vec<String>) -> Vec<String> {
    tokens.into_iter().filter(|t| !is_stopword(t)).collect()
}

pub fn stemmer_filter(tokens: Vec<String>) -> Vec<String> {
    tokens.into_iter().map(|t| STEMMER.stem(&t).into_owned()).collect()
}

pub fn is_stopword(token: &str) -> bool { STOPWORDS.contains(token) }
