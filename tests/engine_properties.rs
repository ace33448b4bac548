// tests/engine_properties.rs
// End-to-end properties of the statistics engine through the public API.

use chrono::DateTime;
use slack_stats::classifier::categories_of;
use slack_stats::rank::rank_counts;
use slack_stats::stats::AnalyzedMessage;
use slack_stats::tokenize::{tokenize, tokenize_with_emoji};
use slack_stats::{
    rank, top_n, AnalysisMode, AnalysisOptions, Analyzer, BucketKey, CategoryCache, Grouping,
    Lexicon, Message, Scorer, StatBucket, StatsError, WordCount,
};
use std::collections::HashMap;

fn lexicon() -> Lexicon {
    Lexicon::embedded().expect("embedded lexicon loads")
}

fn bucket_of(texts: &[&str]) -> StatBucket {
    let mut b = StatBucket::new();
    for t in texts {
        let m = Message::new("U1", *t, "0");
        let a = AnalyzedMessage {
            words: tokenize(t, true, true),
            ..Default::default()
        };
        b.fold(&m, &a).unwrap();
    }
    b
}

#[test]
fn tokenizer_examples() {
    assert_eq!(
        tokenize("Hello, world!  I'm here.", true, true),
        vec!["hello", "world", "i'm", "here"]
    );
    let (words, emojis) = tokenize_with_emoji("feeling :smile: today :wave:", false);
    assert_eq!(words, vec!["feeling", "today"]);
    assert_eq!(emojis, vec![":smile:", ":wave:"]);
}

#[test]
fn scoring_is_deterministic() {
    let lex = lexicon();
    let scorer = Scorer::new(&lex);
    assert_eq!(scorer.analytic(&["the", "i", "run"]), 30);

    let tokens = tokenize("We love you, but I hate the rain and never walk.", true, true);
    let first = scorer.score(&tokens);
    let second = scorer.score(&tokens);
    assert_eq!(first, second);
    assert_eq!(first.clout, scorer.clout(&tokens));
    assert_eq!(first.tone, scorer.tone(&tokens));
    assert_eq!(first.analytic, scorer.analytic(&tokens));
}

#[test]
fn bucket_counts_and_word_length() {
    let lex = lexicon();
    let mut cache = CategoryCache::new();
    let mut b = bucket_of(&["a b", "b c c"]);

    let expected: HashMap<String, u64> = [("a", 1), ("b", 2), ("c", 2)]
        .into_iter()
        .map(|(w, c)| (w.to_string(), c))
        .collect();
    assert_eq!(b.word_counts(), &expected);
    assert_eq!(b.totals().words, 5);

    let avg = *b.finalize(&lex, &mut cache).unwrap();
    assert!((avg.word_length - 1.0).abs() < f64::EPSILON);
    assert!((avg.words_per_message - 2.5).abs() < f64::EPSILON);
}

#[test]
fn ranking_and_stoplist() {
    let lex = lexicon();
    let counts: HashMap<String, u64> = [("a", 3), ("b", 5), ("c", 1)]
        .into_iter()
        .map(|(w, c)| (w.to_string(), c))
        .collect();
    let ranked = rank_counts(&counts);
    let order: Vec<&str> = ranked.iter().map(|w| w.word.as_str()).collect();
    assert_eq!(order, vec!["b", "a", "c"]);
    assert_eq!(
        top_n(&ranked, 2, false, &lex),
        vec![WordCount::new("b", 5), WordCount::new("c", 1)]
    );
}

#[test]
fn empty_bucket_is_never_divided_or_ranked() {
    let lex = lexicon();
    let mut cache = CategoryCache::new();
    let mut b = bucket_of(&["?!", "..."]);
    assert_eq!(b.totals().messages, 2);
    assert_eq!(b.finalize(&lex, &mut cache), Err(StatsError::EmptyBucket));
    assert!(b.averages().is_none());
    assert!(rank(&b).is_empty());
}

#[test]
fn double_finalize_keeps_first_averages() {
    let lex = lexicon();
    let mut cache = CategoryCache::new();
    let mut b = bucket_of(&["we love rust", "you and i"]);
    let first = *b.finalize(&lex, &mut cache).unwrap();
    assert_eq!(
        b.finalize(&lex, &mut cache),
        Err(StatsError::AlreadyFinalized)
    );
    assert_eq!(b.averages(), Some(&first));
}

#[test]
fn category_counts_are_per_occurrence() {
    let lex = lexicon();
    let mut cache = CategoryCache::new();
    let mut b = bucket_of(&["the the the cat"]);
    b.finalize(&lex, &mut cache).unwrap();
    assert!(categories_of(&lex, "the").contains("article"));
    assert_eq!(b.category_counts().get("article"), Some(&3));
    assert_eq!(b.category_counts().get("funct"), Some(&3));
}

#[test]
fn averages_divide_scores_by_message_count() {
    let lex = lexicon();
    let an = Analyzer::new(&lex, AnalysisOptions::for_mode(AnalysisMode::Messages));
    let msgs = vec![
        Message::new("U1", "love love love", "1514764800"),
        Message::new("U1", "plain words", "1514764900"),
    ];
    let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
    let run = an.run_messages_at(&msgs, now).unwrap();
    let user = run.stats.bucket(&BucketKey::User("U1".into())).unwrap();
    // tone sum 3 over 2 messages, not over 5 words
    assert!((user.averages().unwrap().tone_per_message - 1.5).abs() < f64::EPSILON);
    assert_eq!(run.stats.buckets(Grouping::ByDay).count(), 1);
}
