//! # Scorer
//! Coarse lexicon-membership heuristics over a token sequence:
//! - clout:    -1 per first-person-singular pronoun, else +1 per second-person
//!   or first-person-plural pronoun
//! - tone:     +1 per positive-emotion word, else -1 per negative-emotion word
//! - analytic: baseline 30, +1 per article/preposition, else -1 per
//!   pronoun/auxiliary/conjunction/adverb/negation
//!
//! Every rule is first-match-wins per token. Tokens are case-folded before
//! lookup. All functions are pure; the only state is the borrowed lexicon.

use crate::lexicon::{Lexicon, WordClass};
use serde::Serialize;

/// Starting value of the analytic score before any token is seen.
pub const ANALYTIC_BASELINE: i64 = 30;

const ANALYTIC_MINUS: [WordClass; 6] = [
    WordClass::PersonalPronoun,
    WordClass::ImpersonalPronoun,
    WordClass::AuxiliaryVerb,
    WordClass::Conjunction,
    WordClass::Adverb,
    WordClass::Negation,
];

/// Per-message scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Scores {
    pub clout: i64,
    pub tone: i64,
    pub analytic: i64,
}

#[derive(Debug, Clone, Copy)]
pub struct Scorer<'a> {
    lexicon: &'a Lexicon,
}

impl<'a> Scorer<'a> {
    pub fn new(lexicon: &'a Lexicon) -> Self {
        Self { lexicon }
    }

    pub fn clout<S: AsRef<str>>(&self, tokens: &[S]) -> i64 {
        tokens
            .iter()
            .map(|t| self.clout_of(&t.as_ref().to_lowercase()))
            .sum()
    }

    pub fn tone<S: AsRef<str>>(&self, tokens: &[S]) -> i64 {
        tokens
            .iter()
            .map(|t| self.tone_of(&t.as_ref().to_lowercase()))
            .sum()
    }

    pub fn analytic<S: AsRef<str>>(&self, tokens: &[S]) -> i64 {
        ANALYTIC_BASELINE
            + tokens
                .iter()
                .map(|t| self.analytic_of(&t.as_ref().to_lowercase()))
                .sum::<i64>()
    }

    /// All three scores in one pass; folds each token once.
    pub fn score<S: AsRef<str>>(&self, tokens: &[S]) -> Scores {
        let mut out = Scores {
            clout: 0,
            tone: 0,
            analytic: ANALYTIC_BASELINE,
        };
        for t in tokens {
            let w = t.as_ref().to_lowercase();
            out.clout += self.clout_of(&w);
            out.tone += self.tone_of(&w);
            out.analytic += self.analytic_of(&w);
        }
        out
    }

    #[inline]
    fn clout_of(&self, w: &str) -> i64 {
        let lex = self.lexicon;
        if lex.is(WordClass::FirstPersonSingular, w) {
            -1
        } else if lex.is(WordClass::SecondPerson, w) || lex.is(WordClass::FirstPersonPlural, w) {
            1
        } else {
            0
        }
    }

    #[inline]
    fn tone_of(&self, w: &str) -> i64 {
        let lex = self.lexicon;
        if lex.is(WordClass::PositiveEmotion, w) {
            1
        } else if lex.is(WordClass::NegativeEmotion, w) {
            -1
        } else {
            0
        }
    }

    #[inline]
    fn analytic_of(&self, w: &str) -> i64 {
        let lex = self.lexicon;
        if lex.is(WordClass::Article, w) || lex.is(WordClass::Preposition, w) {
            1
        } else if ANALYTIC_MINUS.iter().any(|&c| lex.is(c, w)) {
            -1
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex() -> Lexicon {
        Lexicon::embedded().expect("embedded lexicon")
    }

    #[test]
    fn analytic_baseline_plus_and_minus() {
        let lex = lex();
        let s = Scorer::new(&lex);
        assert_eq!(s.analytic(&["the", "i", "run"]), 30);
        assert_eq!(s.analytic::<&str>(&[]), 30);
        assert_eq!(s.analytic(&["of", "the", "in"]), 33);
    }

    #[test]
    fn clout_first_person_wins_over_plural() {
        let lex = lex();
        let s = Scorer::new(&lex);
        // "i" is also a personal pronoun but only the I-list counts for clout
        assert_eq!(s.clout(&["I", "think", "you", "and", "we"]), 1);
        assert_eq!(s.clout(&["me", "myself", "I"]), -3);
    }

    #[test]
    fn tone_counts_each_side_once() {
        let lex = lex();
        let s = Scorer::new(&lex);
        assert_eq!(s.tone(&["Happy", "sad", "great", "meh"]), 1);
        assert_eq!(s.tone(&["awful", "terrible"]), -2);
    }

    #[test]
    fn plus_branch_shadows_minus_branch() {
        let lex = lex();
        let s = Scorer::new(&lex);
        // preposition + conj, preposition + negate
        assert_eq!(s.analytic(&["since", "without"]), 32);
        assert_eq!(s.score(&["Since", "WITHOUT"]).analytic, 32);
    }

    #[test]
    fn fused_pass_matches_independent_functions() {
        let lex = lex();
        let s = Scorer::new(&lex);
        let samples: [&[&str]; 4] = [
            &["i", "love", "the", "way", "you", "never", "stop"],
            &["WE", "won", "!", "and", "it", "was", "great"],
            &[],
            &["nothing", "but", "sad", "news", "from", "them"],
        ];
        for toks in samples {
            let fused = s.score(toks);
            assert_eq!(fused.clout, s.clout(toks));
            assert_eq!(fused.tone, s.tone(toks));
            assert_eq!(fused.analytic, s.analytic(toks));
            // same input, same output
            assert_eq!(fused, s.score(toks));
        }
    }
}
