use crate::results::*;
use std::collections::BTreeSet;
use std::collections::HashSet;
use std::fmt;
use std::io::BufRead;
use std::ops::Deref;
use std::sync::Arc;

/// The letters of the Russian alphabet, in alphabetical order.
pub const RUSSIAN_LETTERS: &str = "АБВГДЕЁЖЗИЙКЛМНОПРСТУФХЦЧШЩЪЫЬЭЮЯ";

/// Trims the word and converts it to upper case, or returns `None` if nothing is left.
pub(crate) fn normalize_word(word: &str) -> Option<String> {
    let trimmed = word.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_uppercase())
}

fn normalize_letter(letter: char) -> char {
    letter.to_uppercase().next().unwrap_or(letter)
}

/// Contains all the words of a dictionary, normalized to upper case.
///
/// Words are sorted and deduplicated, so two banks built from the same words in any order are
/// equal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordBank {
    all_words: Arc<[Arc<str>]>,
}

impl WordBank {
    /// Constructs a new `WordBank` struct by reading words from the given reader.
    ///
    /// The reader should provide one word per line. Each word is trimmed and converted to upper
    /// case. Blank lines are skipped.
    pub fn from_reader<R: BufRead>(word_reader: R) -> Result<Self, BaldaError> {
        let words = word_reader
            .lines()
            .collect::<std::io::Result<Vec<String>>>()?;
        Ok(Self::from_iterator(words))
    }

    /// Constructs a new `WordBank` struct using the words from the given iterator.
    ///
    /// Each word is trimmed and converted to upper case. Empty words are skipped.
    pub fn from_iterator<S>(words: impl IntoIterator<Item = S>) -> Self
    where
        S: AsRef<str>,
    {
        let mut all_words: Vec<String> = words
            .into_iter()
            .filter_map(|word| normalize_word(word.as_ref()))
            .collect();
        all_words.sort_unstable();
        all_words.dedup();
        WordBank {
            all_words: all_words.into_iter().map(Arc::from).collect(),
        }
    }
}

impl Deref for WordBank {
    type Target = [Arc<str>];

    fn deref(&self) -> &Self::Target {
        &self.all_words
    }
}

/// The letters a strategy may place on the board, in the order they are tried.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alphabet {
    letters: Vec<char>,
}

impl Alphabet {
    /// Creates an alphabet from the given letters, keeping their order and dropping duplicates.
    pub fn new(letters: &str) -> Alphabet {
        let mut seen = HashSet::new();
        Alphabet {
            letters: letters
                .chars()
                .filter(|letter| !letter.is_whitespace())
                .map(normalize_letter)
                .filter(|letter| seen.insert(*letter))
                .collect(),
        }
    }

    /// The Russian alphabet, including `Ё`.
    pub fn russian() -> Alphabet {
        Alphabet::new(RUSSIAN_LETTERS)
    }

    /// Creates an alphabet from every letter used by the given words, in sorted order.
    ///
    /// This is handy for small dictionaries, where trying letters that appear in no word is
    /// wasted work.
    pub fn from_words<S: AsRef<str>>(words: &[S]) -> Alphabet {
        let letters: BTreeSet<char> = words
            .iter()
            .flat_map(|word| word.as_ref().chars())
            .map(normalize_letter)
            .collect();
        Alphabet {
            letters: letters.into_iter().collect(),
        }
    }

    pub fn letters(&self) -> &[char] {
        &self.letters
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Alphabet::russian()
    }
}

/// A cell on the board. Cells are ordered row by row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Cell {
        Cell { row, col }
    }

    /// Returns `true` iff the two cells share a side.
    pub fn is_adjacent(&self, other: &Cell) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }
}

impl From<(usize, usize)> for Cell {
    fn from((row, col): (usize, usize)) -> Self {
        Cell::new(row, col)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// The game board: a rectangular grid of optional letters, plus the words used so far.
///
/// Strategies only ever see a shared reference to the board. The game loop is the only code that
/// mutates it, between turns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    rows: usize,
    cols: usize,
    letters: Vec<Option<char>>,
    used_words: HashSet<Arc<str>>,
}

impl Board {
    /// Creates an empty board.
    pub fn new(rows: usize, cols: usize) -> Result<Board, BaldaError> {
        if rows == 0 || cols == 0 {
            return Err(BaldaError::EmptyBoard);
        }
        Ok(Board {
            rows,
            cols,
            letters: vec![None; rows * cols],
            used_words: HashSet::new(),
        })
    }

    /// Creates a board from text rows, where `.` or a space marks an empty cell.
    ///
    /// ```
    /// use rs_balda_solver::{Board, Cell};
    ///
    /// let board = Board::from_rows(&["с..", "л..", ".в."]).unwrap();
    ///
    /// assert_eq!(board.get(Cell::new(0, 0)), Some('С'));
    /// assert_eq!(board.get(Cell::new(2, 0)), None);
    /// ```
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Board, BaldaError> {
        let cols = rows.first().map_or(0, |row| row.as_ref().chars().count());
        let mut board = Board::new(rows.len(), cols)?;
        for (row_index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.chars().count() != cols {
                return Err(BaldaError::RaggedBoard(row_index));
            }
            for (col_index, letter) in row.chars().enumerate() {
                if letter != '.' && letter != ' ' {
                    board.set(Cell::new(row_index, col_index), letter);
                }
            }
        }
        Ok(board)
    }

    /// Creates an empty board with `word` written across the middle row.
    ///
    /// The word must be exactly as long as the board is wide. It is marked as used.
    pub fn with_initial_word(rows: usize, cols: usize, word: &str) -> Result<Board, BaldaError> {
        let mut board = Board::new(rows, cols)?;
        let word = normalize_word(word).unwrap_or_default();
        let length = word.chars().count();
        if length != cols {
            return Err(BaldaError::WordLength { length, width: cols });
        }
        let row = rows / 2;
        for (col, letter) in word.chars().enumerate() {
            board.set(Cell::new(row, col), letter);
        }
        board.mark_used(&word);
        Ok(board)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns `true` iff the cell lies on the board.
    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }

    fn index(&self, cell: Cell) -> usize {
        assert!(self.contains(cell), "cell {} is outside the board", cell);
        cell.row * self.cols + cell.col
    }

    /// Returns the letter at the given cell, if any.
    ///
    /// Panics if the cell is outside the board.
    pub fn get(&self, cell: Cell) -> Option<char> {
        self.letters[self.index(cell)]
    }

    pub fn is_filled(&self, cell: Cell) -> bool {
        self.get(cell).is_some()
    }

    /// Places a letter, without any of the checks performed by [`Board::apply_move`].
    pub fn set(&mut self, cell: Cell, letter: char) {
        let index = self.index(cell);
        self.letters[index] = Some(normalize_letter(letter));
    }

    /// Iterates over all cells, row by row.
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        let cols = self.cols;
        (0..self.rows).flat_map(move |row| (0..cols).map(move |col| Cell::new(row, col)))
    }

    pub fn filled_cells(&self) -> BTreeSet<Cell> {
        self.cells().filter(|cell| self.is_filled(*cell)).collect()
    }

    pub fn empty_count(&self) -> usize {
        self.letters.iter().filter(|letter| letter.is_none()).count()
    }

    /// Yields the neighbors of the cell that lie on the board, in the order east, west, south,
    /// north.
    pub fn neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> {
        let Cell { row, col } = cell;
        [
            (col + 1 < self.cols).then(|| Cell::new(row, col + 1)),
            (col > 0).then(|| Cell::new(row, col - 1)),
            (row + 1 < self.rows).then(|| Cell::new(row + 1, col)),
            (row > 0).then(|| Cell::new(row - 1, col)),
        ]
        .into_iter()
        .flatten()
    }

    /// Returns `true` iff the cell is empty and next to at least one filled cell.
    pub fn is_insertion_candidate(&self, cell: Cell) -> bool {
        !self.is_filled(cell) && self.neighbors(cell).any(|other| self.is_filled(other))
    }

    /// Returns every insertion candidate, row by row.
    pub fn insertion_candidates(&self) -> Vec<Cell> {
        self.cells()
            .filter(|cell| self.is_insertion_candidate(*cell))
            .collect()
    }

    pub fn used_words(&self) -> &HashSet<Arc<str>> {
        &self.used_words
    }

    pub fn is_used(&self, word: &str) -> bool {
        self.used_words.contains(word)
    }

    pub fn mark_used(&mut self, word: &str) {
        if let Some(word) = normalize_word(word) {
            self.used_words.insert(Arc::from(word));
        }
    }

    /// Reads the letters along the path, using `letter` for `cell`.
    ///
    /// Returns `None` if any other cell on the path is empty.
    pub fn read_path(&self, path: &[Cell], cell: Cell, letter: char) -> Option<String> {
        path.iter()
            .map(|other| {
                if *other == cell {
                    Some(letter)
                } else {
                    self.get(*other)
                }
            })
            .collect()
    }

    /// Checks that the move is legal, then places its letter and marks its word as used.
    pub fn apply_move(&mut self, played: &Move) -> Result<(), BaldaError> {
        let cell = played.cell;
        if !self.contains(cell) {
            return Err(BaldaError::OutOfBounds(cell));
        }
        if self.is_filled(cell) {
            return Err(BaldaError::CellOccupied(cell));
        }
        if !self.is_insertion_candidate(cell) {
            return Err(BaldaError::NotAdjacent(cell));
        }
        if let Some(outside) = played.path.iter().find(|other| !self.contains(**other)) {
            return Err(BaldaError::OutOfBounds(*outside));
        }
        let is_chain = played
            .path
            .windows(2)
            .all(|pair| pair[0].is_adjacent(&pair[1]));
        let distinct: HashSet<&Cell> = played.path.iter().collect();
        let letter = normalize_letter(played.letter);
        if !is_chain
            || distinct.len() != played.path.len()
            || !distinct.contains(&cell)
            || self.read_path(&played.path, cell, letter).as_deref() != Some(&*played.word)
        {
            return Err(BaldaError::PathMismatch(Arc::clone(&played.word)));
        }
        if self.is_used(&played.word) {
            return Err(BaldaError::WordUsed(Arc::clone(&played.word)));
        }
        self.set(cell, letter);
        self.used_words.insert(Arc::clone(&played.word));
        Ok(())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            let line: Vec<String> = (0..self.cols)
                .map(|col| format!(" {} ", self.get(Cell::new(row, col)).unwrap_or(' ')))
                .collect();
            writeln!(f, "{}", line.join("|"))?;
            writeln!(f, "{}", vec!["---"; self.cols].join("+"))?;
        }
        Ok(())
    }
}
