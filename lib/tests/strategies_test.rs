use rs_balda_solver::*;

const WORDS: &[&str] = &[
    "ад", "бал", "балда", "бар", "дар", "дом", "дол", "код", "кот", "кол", "лад", "лак", "лом",
    "мода", "мол", "нора", "оклад", "рак", "рама", "сад", "слово", "сода", "сон", "ток", "удар",
];

fn create_word_bank(words: &[&str]) -> WordBank {
    WordBank::from_iterator(words.iter().copied())
}

fn exhaustive(bank: &WordBank) -> ExhaustiveSearch<ExactDictionary> {
    ExhaustiveSearch::new(ExactDictionary::new(bank), Alphabet::from_words(bank))
}

fn incremental(bank: &WordBank) -> IncrementalSearch<ExactDictionary> {
    IncrementalSearch::new(ExactDictionary::new(bank), Alphabet::from_words(bank))
}

fn both(words: &[&str]) -> Vec<Box<dyn Guesser>> {
    let bank = create_word_bank(words);
    vec![
        Box::new(exhaustive(&bank)) as Box<dyn Guesser>,
        Box::new(incremental(&bank)),
    ]
}

#[test]
fn guess_next_completes_word_with_last_letter() {
    let board = Board::from_rows(&["С..", "Л..", "ОВ."]).unwrap();

    for mut strategy in both(&["слово"]) {
        let found = strategy.guess_next(&board).unwrap();

        assert_eq!(&*found.word, "СЛОВО");
        assert_eq!(found.score(), 5);
        // (2, 2) spells it too, but (1, 1) comes first.
        assert_eq!(found.cell, Cell::new(1, 1));
        assert_eq!(found.letter, 'О');
        assert_eq!(
            found.path,
            vec![
                Cell::new(0, 0),
                Cell::new(1, 0),
                Cell::new(2, 0),
                Cell::new(2, 1),
                Cell::new(1, 1)
            ]
        );
    }
}

#[test]
fn guess_next_finds_word_once_letter_is_placed() {
    let mut board = Board::from_rows(&["С..", "Л..", ".В."]).unwrap();

    for mut strategy in both(&["слово"]) {
        assert_eq!(strategy.guess_next(&board), None);
    }

    board.set(Cell::new(2, 2), 'О');
    for mut strategy in both(&["слово"]) {
        let found = strategy.guess_next(&board).unwrap();

        assert_eq!(&*found.word, "СЛОВО");
        assert_eq!(found.score(), 5);
        assert!(found.cell == Cell::new(1, 1) || found.cell == Cell::new(2, 0));
    }
}

#[test]
fn guess_next_empty_dictionary_passes() {
    let boards = [
        Board::from_rows(&["К.Т"]).unwrap(),
        Board::with_initial_word(5, 5, "балда").unwrap(),
        Board::new(2, 2).unwrap(),
    ];

    for board in &boards {
        for mut strategy in both(&[]) {
            assert_eq!(strategy.guess_next(board), None);
        }
    }
}

#[test]
fn guess_next_same_board_same_move() {
    let board = Board::with_initial_word(5, 5, "балда").unwrap();

    for mut strategy in both(WORDS) {
        let first = strategy.guess_next(&board);
        let second = strategy.guess_next(&board);

        assert!(first.is_some());
        assert_eq!(first, second);
    }
}

#[test]
fn guess_next_offers_reversal_after_word_is_used() {
    for mut strategy in both(&["кот", "ток"]) {
        let mut board = Board::from_rows(&["К.Т"]).unwrap();
        let first = strategy.guess_next(&board).unwrap();
        assert_eq!(&*first.word, "КОТ");

        board.mark_used("КОТ");
        let second = strategy.guess_next(&board).unwrap();
        assert_eq!(&*second.word, "ТОК");
        assert_eq!(second.cell, Cell::new(0, 1));

        board.mark_used("ТОК");
        assert_eq!(strategy.guess_next(&board), None);
    }
}

#[test]
fn guess_next_never_repeats_used_words() {
    for mut strategy in both(WORDS) {
        let mut board = Board::with_initial_word(5, 5, "балда").unwrap();

        while let Some(found) = strategy.guess_next(&board) {
            assert!(!board.is_used(&found.word), "{} was already used", found.word);
            board.apply_move(&found).unwrap();
        }
        assert!(board.used_words().len() > 1);
    }
}

#[test]
fn strategies_agree_on_best_length_over_a_game() {
    let bank = create_word_bank(WORDS);
    let mut board = Board::with_initial_word(5, 5, "балда").unwrap();
    let mut reference = exhaustive(&bank);
    let mut search = incremental(&bank);
    let mut turns = 0;

    loop {
        let expected = reference.guess_next(&board);
        let found = search.guess_next(&board);
        assert_eq!(
            found.as_ref().map(Move::score),
            expected.as_ref().map(Move::score),
            "turn {}:\n{}",
            turns,
            board
        );
        match found {
            Some(found) => {
                board.apply_move(&found).unwrap();
                turns += 1;
            }
            None => break,
        }
    }
    assert!(turns > 0);
}

#[test]
fn incremental_search_resumes_on_later_turns() {
    let bank = create_word_bank(WORDS);
    let mut board = Board::with_initial_word(5, 5, "балда").unwrap();
    let mut search = incremental(&bank);

    let first = search.guess_next(&board).unwrap();
    let first_checks = search.dictionary_checks();
    board.apply_move(&first).unwrap();
    search.guess_next(&board);

    assert!(search.dictionary_checks() < first_checks);
}

#[test]
fn approximate_dictionary_finds_the_same_word() {
    let bank = create_word_bank(&["слово"]);
    let dictionary = ApproximateDictionary::new(&bank, FilterConfig::default());
    let mut search = ExhaustiveSearch::new(&dictionary, Alphabet::russian());
    let board = Board::from_rows(&["С..", "Л..", "ОВ."]).unwrap();

    let found = search.guess_next(&board).unwrap();

    assert_eq!(&*found.word, "СЛОВО");
}
