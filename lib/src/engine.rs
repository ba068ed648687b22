use crate::data::*;
use crate::results::*;
use log::{debug, info};

/// A strategy that proposes moves, one turn at a time.
pub trait Guesser {
    /// Proposes the longest move it can find on the board, or `None` to pass.
    ///
    /// The board is only read. The caller applies the move, if any, before asking again.
    fn guess_next(&mut self, board: &Board) -> Option<Move>;
}

impl<G: Guesser + ?Sized> Guesser for Box<G> {
    fn guess_next(&mut self, board: &Board) -> Option<Move> {
        (**self).guess_next(board)
    }
}

/// One of the two ends of a path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathEnd {
    /// The first cell; extending here prepends a letter.
    Head,
    /// The last cell; extending here appends a letter.
    Tail,
}

impl PathEnd {
    /// The ends worth extending for a path of the given length.
    ///
    /// A single cell is both head and tail. Growing it only from the tail still reaches every
    /// path, since each word is also checked backwards.
    pub(crate) fn for_path_len(length: usize) -> &'static [PathEnd] {
        if length == 1 {
            &[PathEnd::Tail]
        } else {
            &[PathEnd::Tail, PathEnd::Head]
        }
    }

    pub(crate) fn cell_of(self, path: &[Cell]) -> Cell {
        match self {
            PathEnd::Head => path[0],
            PathEnd::Tail => path[path.len() - 1],
        }
    }
}

/// Returns the word and path grown by one cell at the given end.
pub(crate) fn extend(
    word: &str,
    path: &[Cell],
    end: PathEnd,
    cell: Cell,
    letter: char,
) -> (String, Vec<Cell>) {
    let mut next_word = String::with_capacity(word.len() + letter.len_utf8());
    let mut next_path = Vec::with_capacity(path.len() + 1);
    match end {
        PathEnd::Head => {
            next_word.push(letter);
            next_word.push_str(word);
            next_path.push(cell);
            next_path.extend_from_slice(path);
        }
        PathEnd::Tail => {
            next_word.push_str(word);
            next_word.push(letter);
            next_path.extend_from_slice(path);
            next_path.push(cell);
        }
    }
    (next_word, next_path)
}

/// Plays a game between the given players on the given board, until every player passes in a row
/// or the board is nearly full.
///
/// Players move in order. Each move is checked and applied to the board, and scores the length of
/// its word. After each full round, the game ends if fewer empty cells remain than there are
/// players.
pub fn play_game<G: Guesser>(
    board: &mut Board,
    players: &mut [G],
) -> Result<GameResult, BaldaError> {
    let num_players = players.len();
    let mut scores = vec![0; num_players];
    let mut moves: Vec<PlayedMove> = Vec::new();
    if num_players == 0 {
        return Ok(GameResult {
            scores,
            moves,
            end: GameEnd::AllPassed,
        });
    }

    let mut passes = 0;
    loop {
        for (player, guesser) in players.iter_mut().enumerate() {
            match guesser.guess_next(board) {
                None => {
                    debug!("Player {} passes", player);
                    passes += 1;
                    if passes == num_players {
                        return Ok(GameResult {
                            scores,
                            moves,
                            end: GameEnd::AllPassed,
                        });
                    }
                }
                Some(played) => {
                    board.apply_move(&played)?;
                    scores[player] += played.score();
                    passes = 0;
                    info!(
                        "Player {} places {} at {} for {}",
                        player, played.letter, played.cell, played.word
                    );
                    moves.push(PlayedMove { player, played });
                }
            }
        }
        if board.empty_count() < num_players {
            return Ok(GameResult {
                scores,
                moves,
                end: GameEnd::BoardFull,
            });
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn extend_at_both_ends() {
        let path = [Cell::new(1, 1), Cell::new(1, 2)];

        assert_eq!(
            extend("ОТ", &path, PathEnd::Head, Cell::new(1, 0), 'К'),
            (
                "КОТ".to_string(),
                vec![Cell::new(1, 0), Cell::new(1, 1), Cell::new(1, 2)]
            )
        );
        assert_eq!(
            extend("ОТ", &path, PathEnd::Tail, Cell::new(2, 2), 'А'),
            (
                "ОТА".to_string(),
                vec![Cell::new(1, 1), Cell::new(1, 2), Cell::new(2, 2)]
            )
        );
    }

    #[test]
    fn ends_of_a_path() {
        let path = [Cell::new(0, 0), Cell::new(0, 1), Cell::new(1, 1)];

        assert_eq!(PathEnd::Head.cell_of(&path), Cell::new(0, 0));
        assert_eq!(PathEnd::Tail.cell_of(&path), Cell::new(1, 1));
        assert_eq!(PathEnd::for_path_len(1), &[PathEnd::Tail]);
        assert_eq!(PathEnd::for_path_len(3).len(), 2);
    }

    struct Passer;

    impl Guesser for Passer {
        fn guess_next(&mut self, _board: &Board) -> Option<Move> {
            None
        }
    }

    #[test]
    fn play_game_ends_when_everyone_passes() {
        let mut board = Board::with_initial_word(3, 3, "кот").unwrap();

        let result = play_game(&mut board, &mut [Passer, Passer]).unwrap();

        assert_eq!(result.end, GameEnd::AllPassed);
        assert_eq!(result.scores, vec![0, 0]);
        assert!(result.moves.is_empty());
    }
}
