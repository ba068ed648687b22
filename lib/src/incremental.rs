use crate::data::*;
use crate::dictionary::{reverse, Dictionary};
use crate::engine::{extend, Guesser, PathEnd};
use crate::results::Move;
use log::{debug, warn};
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

/// An insertion cell together with the letter placed there.
pub type Root = (Cell, char);

/// A chain that was paused because the next cell at one of its ends was still empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    /// The letters along `path`, with the root's letter in place.
    pub word: String,
    pub path: Vec<Cell>,
    /// The end of the path that waits for the empty cell.
    pub end: PathEnd,
}

/// A word known to be formed by placing a root's letter, read along `path`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Completion {
    pub word: Arc<str>,
    pub path: Vec<Cell>,
}

/// Finds the longest move while keeping its search state from one turn to the next.
///
/// The first call searches from every insertion candidate, like
/// [`ExhaustiveSearch`](crate::ExhaustiveSearch), but without pruning by the best word so far.
/// Every word found is kept, grouped by insertion cell and letter. Whenever a chain reaches an
/// empty cell, it is kept as a [`Route`] waiting on that cell, rather than dropped.
///
/// Later calls only do new work:
///
/// * cells that became filled stop being insertion cells, and everything rooted there is dropped;
/// * empty cells next to the newly filled cells are searched from scratch;
/// * routes waiting on a newly filled cell are grown through it and searched further.
///
/// The answer is then the longest kept word that is not used yet. Ties go to the first word
/// found for the earliest insertion cell (row by row) and letter (in alphabet order).
///
/// One instance follows one game. If cells are emptied or the board changes size, everything is
/// recomputed.
pub struct IncrementalSearch<D> {
    dictionary: D,
    alphabet: Alphabet,
    dimensions: (usize, usize),
    /// The filled cells seen by the last call.
    filled: BTreeSet<Cell>,
    /// Empty cells that have already been searched from.
    roots: BTreeSet<Cell>,
    completions: BTreeMap<Cell, BTreeMap<char, Vec<Completion>>>,
    /// Routes grouped by the empty cell they wait on, then by their root.
    frontier: BTreeMap<Cell, BTreeMap<Root, Vec<Route>>>,
    dictionary_checks: usize,
}

impl<D: Dictionary> IncrementalSearch<D> {
    /// Creates a search over the given dictionary, trying the letters of `alphabet`.
    pub fn new(dictionary: D, alphabet: Alphabet) -> IncrementalSearch<D> {
        IncrementalSearch {
            dictionary,
            alphabet,
            dimensions: (0, 0),
            filled: BTreeSet::new(),
            roots: BTreeSet::new(),
            completions: BTreeMap::new(),
            frontier: BTreeMap::new(),
            dictionary_checks: 0,
        }
    }

    /// The number of dictionary lookups made by the last call to `guess_next`.
    pub fn dictionary_checks(&self) -> usize {
        self.dictionary_checks
    }

    /// The number of routes currently waiting on an empty cell.
    pub fn num_routes(&self) -> usize {
        self.frontier
            .values()
            .flat_map(|by_root| by_root.values())
            .map(Vec::len)
            .sum()
    }

    /// The number of words currently kept.
    pub fn num_completions(&self) -> usize {
        self.completions
            .values()
            .flat_map(|by_letter| by_letter.values())
            .map(Vec::len)
            .sum()
    }

    /// The words kept for the given insertion cell and letter.
    pub fn completions(&self, cell: Cell, letter: char) -> &[Completion] {
        self.completions
            .get(&cell)
            .and_then(|by_letter| by_letter.get(&letter))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The cells that routes are currently waiting on.
    pub fn waiting_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.frontier.keys().copied()
    }

    /// Forgets everything, so that the next call searches the whole board again.
    pub fn reset(&mut self) {
        self.dimensions = (0, 0);
        self.filled.clear();
        self.roots.clear();
        self.completions.clear();
        self.frontier.clear();
    }

    /// Drops roots, words and routes rooted at cells that are now filled.
    fn purge_filled(&mut self, board: &Board) {
        self.roots.retain(|cell| !board.is_filled(*cell));
        self.completions.retain(|cell, _| !board.is_filled(*cell));
        for by_root in self.frontier.values_mut() {
            by_root.retain(|(cell, _), _| !board.is_filled(*cell));
        }
        self.frontier.retain(|_, by_root| !by_root.is_empty());
    }

    /// Drops words that have been used, then picks the longest remaining one.
    fn longest_available(&mut self, board: &Board) -> Option<Move> {
        let mut best: Option<Move> = None;
        for (cell, by_letter) in self.completions.iter_mut() {
            for (letter, found) in by_letter.iter_mut() {
                // Used words never become available again.
                found.retain(|completion| !board.is_used(&completion.word));
                for completion in found.iter() {
                    if best
                        .as_ref()
                        .map_or(true, |best| completion.path.len() > best.score())
                    {
                        best = Some(Move {
                            cell: *cell,
                            letter: *letter,
                            word: Arc::clone(&completion.word),
                            path: completion.path.clone(),
                        });
                    }
                }
            }
            by_letter.retain(|_, found| !found.is_empty());
        }
        self.completions.retain(|_, by_letter| !by_letter.is_empty());
        best
    }
}

impl<D: Dictionary> Guesser for IncrementalSearch<D> {
    fn guess_next(&mut self, board: &Board) -> Option<Move> {
        let start = Instant::now();
        let filled = board.filled_cells();
        let dimensions = (board.rows(), board.cols());
        if dimensions != self.dimensions || !self.filled.is_subset(&filled) {
            if self.dimensions != (0, 0) {
                warn!("The board no longer extends the previous one; searching it again");
            }
            self.reset();
            self.dimensions = dimensions;
        }

        let newly_filled: Vec<Cell> = filled.difference(&self.filled).copied().collect();
        self.purge_filled(board);

        let new_roots: BTreeSet<Cell> = newly_filled
            .iter()
            .flat_map(|cell| board.neighbors(*cell))
            .filter(|cell| !board.is_filled(*cell) && !self.roots.contains(cell))
            .collect();
        let ready: Vec<Cell> = self
            .frontier
            .keys()
            .filter(|cell| board.is_filled(**cell))
            .copied()
            .collect();

        let mut builder = RouteBuilder {
            dictionary: &self.dictionary,
            board,
            completions: &mut self.completions,
            frontier: &mut self.frontier,
            visited: HashMap::new(),
            checks: 0,
        };
        for &cell in &new_roots {
            for &letter in self.alphabet.letters() {
                builder.build_route((cell, letter), letter.to_string(), vec![cell]);
            }
        }
        let mut resumed = 0;
        for cell in ready {
            let letter = match board.get(cell) {
                Some(letter) => letter,
                None => continue,
            };
            for (root, routes) in builder.frontier.remove(&cell).unwrap_or_default() {
                for route in routes {
                    let (word, path) = extend(&route.word, &route.path, route.end, cell, letter);
                    builder.build_route(root, word, path);
                    resumed += 1;
                }
            }
        }
        self.dictionary_checks = builder.checks;

        self.roots.extend(new_roots.iter().copied());
        self.filled = filled;
        let best = self.longest_available(board);
        debug!(
            "Incremental search seeded {} cells and resumed {} routes with {} dictionary checks \
             in {:.3}s; {} routes waiting, {} words kept",
            new_roots.len(),
            resumed,
            self.dictionary_checks,
            start.elapsed().as_secs_f64(),
            self.num_routes(),
            self.num_completions()
        );
        best
    }
}

/// Grows chains for one call to `guess_next`, writing into the persistent indexes.
struct RouteBuilder<'s, D> {
    dictionary: &'s D,
    board: &'s Board,
    completions: &'s mut BTreeMap<Cell, BTreeMap<char, Vec<Completion>>>,
    frontier: &'s mut BTreeMap<Cell, BTreeMap<Root, Vec<Route>>>,
    /// Paths already grown during this call, per root. Roots never share paths.
    visited: HashMap<Root, HashSet<Vec<Cell>>>,
    checks: usize,
}

impl<'s, D: Dictionary> RouteBuilder<'s, D> {
    fn build_route(&mut self, root: Root, word: String, path: Vec<Cell>) {
        if !self.visited.entry(root).or_default().insert(path.clone()) {
            return;
        }
        let result = self.dictionary.check(&word);
        self.checks += 1;

        if result.is_complete_forward() {
            self.complete(root, Arc::from(word.as_str()), path.clone());
        }
        if result.is_complete_backward() {
            let backward_path = path.iter().rev().copied().collect();
            self.complete(root, Arc::from(reverse(&word)), backward_path);
        }
        if !result.is_part() {
            return;
        }

        for &end in PathEnd::for_path_len(path.len()) {
            for next in self.board.neighbors(end.cell_of(&path)) {
                if path.contains(&next) {
                    continue;
                }
                match self.board.get(next) {
                    Some(letter) => {
                        let (next_word, next_path) = extend(&word, &path, end, next, letter);
                        self.build_route(root, next_word, next_path);
                    }
                    None => self
                        .frontier
                        .entry(next)
                        .or_default()
                        .entry(root)
                        .or_default()
                        .push(Route {
                            word: word.clone(),
                            path: path.clone(),
                            end,
                        }),
                }
            }
        }
    }

    /// Keeps the word, unless the same word along the same path is already kept. A path and its
    /// reversal both find it.
    fn complete(&mut self, (cell, letter): Root, word: Arc<str>, path: Vec<Cell>) {
        let found = self
            .completions
            .entry(cell)
            .or_default()
            .entry(letter)
            .or_default();
        let completion = Completion { word, path };
        if !found.contains(&completion) {
            found.push(completion);
        }
    }
}
