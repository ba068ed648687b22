use crate::data::*;
use crate::dictionary::{reverse, Dictionary};
use crate::engine::{extend, Guesser, PathEnd};
use crate::results::Move;
use log::debug;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

/// Finds the longest move by searching the whole board again on every turn.
///
/// For every insertion candidate and every letter of the alphabet, the placed letter is grown
/// into chains of filled cells from both ends, depth first. A chain is only grown while it is
/// part of some word, and while the longest word containing it could beat the best move found so
/// far.
///
/// Ties go to the first move found: candidates are tried row by row, letters in alphabet order.
///
/// This keeps no state between turns, which makes it a good reference for
/// [`IncrementalSearch`](crate::IncrementalSearch).
pub struct ExhaustiveSearch<D> {
    dictionary: D,
    alphabet: Alphabet,
    dictionary_checks: usize,
}

impl<D: Dictionary> ExhaustiveSearch<D> {
    /// Creates a search over the given dictionary, trying the letters of `alphabet`.
    ///
    /// ```
    /// use rs_balda_solver::{Alphabet, Board, ExactDictionary, ExhaustiveSearch, Guesser, WordBank};
    ///
    /// let bank = WordBank::from_iterator(["кот"]);
    /// let dictionary = ExactDictionary::new(&bank);
    /// let mut search = ExhaustiveSearch::new(&dictionary, Alphabet::from_words(&bank));
    ///
    /// let board = Board::from_rows(&["К.Т"]).unwrap();
    /// let found = search.guess_next(&board).unwrap();
    ///
    /// assert_eq!(&*found.word, "КОТ");
    /// ```
    pub fn new(dictionary: D, alphabet: Alphabet) -> ExhaustiveSearch<D> {
        ExhaustiveSearch {
            dictionary,
            alphabet,
            dictionary_checks: 0,
        }
    }

    /// The number of dictionary lookups made by the last call to `guess_next`.
    pub fn dictionary_checks(&self) -> usize {
        self.dictionary_checks
    }
}

impl<D: Dictionary> Guesser for ExhaustiveSearch<D> {
    fn guess_next(&mut self, board: &Board) -> Option<Move> {
        let start = Instant::now();
        let candidates = board.insertion_candidates();
        let mut best = None;
        let mut checks = 0;
        for &cell in &candidates {
            for &letter in self.alphabet.letters() {
                let mut seed = Seed {
                    dictionary: &self.dictionary,
                    board,
                    cell,
                    letter,
                    visited: HashSet::new(),
                    checks: 0,
                };
                seed.evaluate(&mut best, letter.to_string(), vec![cell]);
                checks += seed.checks;
            }
        }
        self.dictionary_checks = checks;
        debug!(
            "Exhaustive search over {} candidates made {} dictionary checks in {:.3}s",
            candidates.len(),
            checks,
            start.elapsed().as_secs_f64()
        );
        best
    }
}

/// The search from one placed letter.
struct Seed<'s, D> {
    dictionary: &'s D,
    board: &'s Board,
    cell: Cell,
    letter: char,
    /// Paths already evaluated from this seed. The same path can be grown in several orders.
    visited: HashSet<Vec<Cell>>,
    checks: usize,
}

impl<'s, D: Dictionary> Seed<'s, D> {
    fn evaluate(&mut self, best: &mut Option<Move>, word: String, path: Vec<Cell>) {
        if !self.visited.insert(path.clone()) {
            return;
        }
        let result = self.dictionary.check(&word);
        self.checks += 1;

        if result.is_complete_forward() && !self.board.is_used(&word) {
            self.consider(best, &word, || path.clone());
        }
        if result.is_complete_backward() {
            let backward = reverse(&word);
            if !self.board.is_used(&backward) {
                self.consider(best, &backward, || path.iter().rev().copied().collect());
            }
        }

        let best_length = best.as_ref().map_or(0, Move::score);
        if !result.may_exceed(best_length) {
            return;
        }
        for &end in PathEnd::for_path_len(path.len()) {
            for next in self.board.neighbors(end.cell_of(&path)) {
                if path.contains(&next) {
                    continue;
                }
                if let Some(letter) = self.board.get(next) {
                    let (next_word, next_path) = extend(&word, &path, end, next, letter);
                    self.evaluate(best, next_word, next_path);
                }
            }
        }
    }

    /// Keeps the word if it is strictly longer than the best so far.
    fn consider(&self, best: &mut Option<Move>, word: &str, path: impl FnOnce() -> Vec<Cell>) {
        let length = word.chars().count();
        if best.as_ref().map_or(true, |found| length > found.score()) {
            *best = Some(Move {
                cell: self.cell,
                letter: self.letter,
                word: Arc::from(word),
                path: path(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::ExactDictionary;

    fn search(words: &[&str]) -> ExhaustiveSearch<ExactDictionary> {
        let bank = WordBank::from_iterator(words.iter().copied());
        ExhaustiveSearch::new(ExactDictionary::new(&bank), Alphabet::from_words(&bank))
    }

    #[test]
    fn finds_word_through_placed_letter() {
        let mut search = search(&["кот", "ток"]);
        let board = Board::from_rows(&["К.Т"]).unwrap();

        let found = search.guess_next(&board).unwrap();

        assert_eq!(found.cell, Cell::new(0, 1));
        assert_eq!(found.letter, 'О');
        assert_eq!(&*found.word, "КОТ");
        assert_eq!(
            found.path,
            vec![Cell::new(0, 0), Cell::new(0, 1), Cell::new(0, 2)]
        );
    }

    #[test]
    fn reads_backwards_when_forward_is_used() {
        let mut search = search(&["кот", "ток"]);
        let mut board = Board::from_rows(&["К.Т"]).unwrap();
        board.mark_used("КОТ");

        let found = search.guess_next(&board).unwrap();

        assert_eq!(&*found.word, "ТОК");
        assert_eq!(
            found.path,
            vec![Cell::new(0, 2), Cell::new(0, 1), Cell::new(0, 0)]
        );
    }

    #[test]
    fn prefers_longer_words() {
        let mut search = search(&["кот", "котел"]);
        let board = Board::from_rows(&["КОТ.Л"]).unwrap();

        let found = search.guess_next(&board).unwrap();

        assert_eq!(&*found.word, "КОТЕЛ");
        assert_eq!(found.cell, Cell::new(0, 3));
    }

    #[test]
    fn bends_around_corners() {
        let mut search = search(&["лото"]);
        let board = Board::from_rows(&["ЛО", "О."]).unwrap();

        let found = search.guess_next(&board).unwrap();

        assert_eq!(&*found.word, "ЛОТО");
        assert_eq!(found.cell, Cell::new(1, 1));
        assert_eq!(found.letter, 'Т');
    }

    #[test]
    fn passes_when_nothing_fits() {
        let mut search = search(&["кот"]);
        let board = Board::from_rows(&["К..", "...", "..Т"]).unwrap();

        assert_eq!(search.guess_next(&board), None);
        assert!(search.dictionary_checks() > 0);
    }
}
