use rand::rngs::StdRng;
use rand::SeedableRng;
use rs_balda_solver::*;

fn create_word_bank(words: &[&str]) -> WordBank {
    WordBank::from_iterator(words.iter().copied())
}

fn substrings(word: &str) -> Vec<String> {
    let letters: Vec<char> = word.chars().collect();
    let mut parts = Vec::new();
    for start in 0..letters.len() {
        for end in start + 1..=letters.len() {
            parts.push(letters[start..end].iter().collect());
            parts.push(letters[start..end].iter().rev().collect());
        }
    }
    parts
}

#[test]
fn exact_check_every_substring_is_part() {
    let bank = create_word_bank(&["слово", "кот"]);
    let dictionary = ExactDictionary::new(&bank);

    for part in substrings("СЛОВО") {
        let result = dictionary.check(&part);
        assert!(result.is_part(), "{} should be part of a word", part);
        assert_eq!(result.potential, Some(5), "{}", part);
    }
    for part in substrings("КОТ") {
        assert!(dictionary.check(&part).is_part(), "{}", part);
    }
}

#[test]
fn exact_check_shared_part_reports_longest_word() {
    let bank = create_word_bank(&["кот", "котел"]);
    let dictionary = ExactDictionary::new(&bank);

    assert_eq!(dictionary.check("КО").potential, Some(5));
    assert_eq!(dictionary.check("ЛЕ").potential, Some(5));
    assert_eq!(dictionary.check("КОТ").potential, Some(5));
}

#[test]
fn exact_check_words_in_both_directions() {
    let bank = create_word_bank(&["кот", "ток", "сон"]);
    let dictionary = ExactDictionary::new(&bank);

    let result = dictionary.check("КОТ");
    assert!(result.is_complete_forward());
    assert!(result.is_complete_backward());

    let result = dictionary.check("НОС");
    assert!(!result.is_complete_forward());
    assert!(result.is_complete_backward());
    assert!(result.is_part());
    assert_eq!(
        result.membership,
        Membership::PART | Membership::COMPLETE_BACKWARD
    );
}

#[test]
fn exact_check_missing() {
    let bank = create_word_bank(&["кот"]);
    let dictionary = ExactDictionary::new(&bank);

    let result = dictionary.check("КТ");

    assert!(result.membership.is_missing());
    assert_eq!(result.potential, None);
    assert!(!result.may_exceed(0));
}

#[test]
fn exact_check_empty_dictionary() {
    let dictionary = ExactDictionary::new(&create_word_bank(&[]));

    assert!(dictionary.check("А").membership.is_missing());
    assert_eq!(dictionary.num_words(), 0);
    assert_eq!(dictionary.num_parts(), 0);
}

#[test]
fn approximate_check_has_no_false_negatives() {
    let words = ["слово", "балда", "кот", "котел", "лото"];
    let bank = create_word_bank(&words);
    let dictionary = ApproximateDictionary::new(
        &bank,
        FilterConfig {
            expected_words: 100,
            expected_parts: 1000,
            error_rate: 0.001,
        },
    );

    for word in bank.iter() {
        let result = dictionary.check(word);
        assert!(result.is_complete_forward(), "{}", word);
        assert_eq!(result.potential, None);
        for part in substrings(word) {
            assert!(dictionary.check(&part).is_part(), "{}", part);
        }
    }
    assert!(dictionary.check("АДЛАБ").is_complete_backward());
}

#[test]
fn approximate_check_unknown_part_may_exceed_any_length() {
    let bank = create_word_bank(&["кот"]);
    let dictionary = ApproximateDictionary::new(&bank, FilterConfig::default());

    assert!(dictionary.check("КО").may_exceed(100));
}

#[test]
fn get_word_with_matching_length() {
    let bank = create_word_bank(&["кот", "слово", "балда", "лото"]);
    let exact = ExactDictionary::new(&bank);
    let approximate = ApproximateDictionary::new(&bank, FilterConfig::default());
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..10 {
        let word = exact.get_word(5, &mut rng).unwrap();
        assert!(&*word == "СЛОВО" || &*word == "БАЛДА");
        assert_eq!(&*approximate.get_word(4, &mut rng).unwrap(), "ЛОТО");
    }
    assert_eq!(exact.get_word(6, &mut rng), None);
    assert_eq!(approximate.get_word(2, &mut rng), None);
}

#[test]
fn get_word_same_seed_same_word() {
    let bank = create_word_bank(&["кот", "сон", "нос", "ток", "лес"]);
    let dictionary = ExactDictionary::new(&bank);

    let first = dictionary.get_word(3, &mut StdRng::seed_from_u64(42));
    let second = dictionary.get_word(3, &mut StdRng::seed_from_u64(42));

    assert_eq!(first, second);
}
