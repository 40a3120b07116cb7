use std::io::{BufRead, Write};

use log::{debug, info};
use unicode_general_category::{get_general_category, GeneralCategory};

use crate::error::{ConcordanceError, HashTableError};
use crate::hash::word_hash;
use crate::hash_table::HashTable;

pub type StopWords = HashTable<String, ()>;
pub type Concordance = HashTable<String, Vec<usize>>;

pub const CONCORDANCE_CAPACITY: usize = 10;

#[allow(clippy::ptr_arg)]
fn hash_word(word: &String) -> u64 {
    word_hash(word)
}

/// Reads one stop word per line. Only the line terminator is stripped.
///
/// Trailing spaces and tabs are kept as part of the key, so a padded line
/// such as `"the "` will not filter `the`.
pub fn build_stop_words_table<R: BufRead>(reader: R) -> Result<StopWords, ConcordanceError> {
    let mut table: StopWords = HashTable::new();
    for line in reader.lines() {
        table.insert(line?, ());
    }
    debug!("loaded {} stop words", table.size());
    Ok(table)
}

/// A letter in the Unicode sense: general category Lu, Ll, Lt, Lm or Lo.
/// Letter numbers (Nl) and combining marks are not letters.
fn is_letter(c: char) -> bool {
    matches!(
        get_general_category(c),
        GeneralCategory::UppercaseLetter
            | GeneralCategory::LowercaseLetter
            | GeneralCategory::TitlecaseLetter
            | GeneralCategory::ModifierLetter
            | GeneralCategory::OtherLetter
    )
}

/// Whitespace plus the ASCII file, group, record and unit separators
/// (U+001C..=U+001F).
fn is_separator(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

/// Splits a line into candidate words.
///
/// The line is lowercased, apostrophes are dropped, every other ASCII
/// punctuation character becomes a space, and only tokens made purely of
/// letters survive.
pub fn tokenize(line: &str) -> Vec<String> {
    let clean: String = line
        .to_lowercase()
        .chars()
        .filter(|&c| c != '\'')
        .map(|c| if c.is_ascii_punctuation() { ' ' } else { c })
        .collect();
    clean
        .split(is_separator)
        .filter(|token| !token.is_empty() && token.chars().all(is_letter))
        .map(str::to_owned)
        .collect()
}

/// Maps every retained word of `reader` to the ascending 1-based line numbers
/// it occurs on. A line is recorded at most once per word.
pub fn build_concordance_table<R: BufRead>(
    reader: R,
    stop_words: &StopWords,
) -> Result<Concordance, ConcordanceError> {
    let mut table: Concordance = HashTable::with_hasher(CONCORDANCE_CAPACITY, hash_word);
    let mut line_count: usize = 0;
    for line in reader.lines() {
        let line: String = line?;
        line_count += 1;
        for word in tokenize(&line) {
            if stop_words.contains(&word) {
                continue;
            }
            let recorded = table.update(&word, |lines| {
                if lines.last() != Some(&line_count) {
                    lines.push(line_count);
                }
            });
            if let Err(HashTableError::KeyNotFound) = recorded {
                table.insert(word, vec![line_count]);
            }
        }
    }
    info!(
        "indexed {} lines, {} distinct words, load factor {:.2}",
        line_count,
        table.size(),
        table.load_factor()
    );
    Ok(table)
}

/// Writes `word: n1 n2 ...` lines in ascending word order.
pub fn write_concordance_table<W: Write>(
    mut writer: W,
    table: &Concordance,
) -> Result<(), ConcordanceError> {
    let mut words: Vec<&String> = table.keys();
    words.sort();
    for word in words {
        write!(writer, "{}:", word)?;
        for line in table.get_item(word)? {
            write!(writer, " {}", line)?;
        }
        writeln!(writer)?;
    }
    writer.flush()?;
    Ok(())
}

/// Reads the stop words, indexes `text` and writes the report to `writer`.
pub fn build_report<S, T, W>(
    stop_words: S,
    text: T,
    writer: W,
) -> Result<Concordance, ConcordanceError>
where
    S: BufRead,
    T: BufRead,
    W: Write,
{
    let stop_table: StopWords = build_stop_words_table(stop_words)?;
    let table: Concordance = build_concordance_table(text, &stop_table)?;
    write_concordance_table(writer, &table)?;
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop_words(words: &str) -> StopWords {
        build_stop_words_table(words.as_bytes()).unwrap()
    }

    fn report(table: &Concordance) -> String {
        let mut out: Vec<u8> = Vec::new();
        write_concordance_table(&mut out, table).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn stop_words_are_keys() {
        let table = stop_words("the\na\r\nof\n");
        assert_eq!(table.size(), 3);
        for word in ["the", "a", "of"] {
            assert!(table.contains(&word.to_string()));
        }
        assert!(!table.contains(&"and".to_string()));
    }

    #[test]
    fn stop_words_keep_inner_content() {
        let table = stop_words("  spaced \n");
        assert!(table.contains(&"  spaced ".to_string()));
    }

    #[test]
    fn padded_stop_word_does_not_match() {
        let stop = stop_words("the \n");
        let table = build_concordance_table("the end\n".as_bytes(), &stop).unwrap();
        assert_eq!(table.get_item(&"the".to_string()), Ok(&vec![1]));
    }

    #[test]
    fn tokenize_rejects_letter_numbers_and_marks() {
        // U+093F and U+0902 are combining marks, U+216B is a letter number
        assert!(tokenize("\u{939}\u{93f}\u{902}\u{926}\u{940}").is_empty());
        assert!(tokenize("\u{216b}").is_empty());
        assert_eq!(tokenize("ok \u{216b} fine"), vec!["ok", "fine"]);
    }

    #[test]
    fn tokenize_keeps_modifier_and_other_letters() {
        assert_eq!(tokenize("\u{5e9}\u{5dc}\u{5d5}\u{5dd}"), vec!["\u{5e9}\u{5dc}\u{5d5}\u{5dd}"]);
        assert_eq!(tokenize("\u{2b0}a"), vec!["\u{2b0}a"]);
    }

    #[test]
    fn tokenize_splits_on_information_separators() {
        assert_eq!(tokenize("a\u{1c}b\u{1d}c\u{1e}d\u{1f}e"), vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn recurring_word_keeps_every_line_through_growth() {
        let stop = stop_words("");
        let text: String = (0..30u8)
            .map(|i| format!("common word{} common\n", (b'a' + i % 26) as char))
            .collect();
        let table = build_concordance_table(text.as_bytes(), &stop).unwrap();
        assert_eq!(table.size(), 27);
        assert_eq!(
            table.get_item(&"common".to_string()),
            Ok(&(1..=30).collect::<Vec<usize>>())
        );
        assert_eq!(table.get_item(&"worda".to_string()), Ok(&vec![1, 27]));
    }

    #[test]
    fn build_report_runs_the_whole_pipeline() {
        let mut out: Vec<u8> = Vec::new();
        let table = build_report(
            "the\na\n".as_bytes(),
            "The cat sat.\nA cat ran away.\n".as_bytes(),
            &mut out,
        )
        .unwrap();
        assert_eq!(table.size(), 4);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "away: 2\ncat: 1 2\nran: 2\nsat: 1\n"
        );
    }

    #[test]
    fn tokenize_strips_apostrophes_and_punctuation() {
        assert_eq!(tokenize("Don't stop-me, NOW!"), vec!["dont", "stop", "me", "now"]);
    }

    #[test]
    fn tokenize_drops_non_alphabetic_tokens() {
        assert_eq!(tokenize("route 66 is r2d2's road"), vec!["route", "is", "road"]);
        assert!(tokenize("   \t").is_empty());
        assert!(tokenize("...!!!").is_empty());
    }

    #[test]
    fn tokenize_keeps_unicode_letters() {
        assert_eq!(tokenize("Crème Brûlée"), vec!["crème", "brûlée"]);
    }

    #[test]
    fn end_to_end_scenario() {
        let stop = stop_words("the\na\n");
        let text = "The cat sat.\nA cat ran away.\n";
        let table = build_concordance_table(text.as_bytes(), &stop).unwrap();

        assert_eq!(table.size(), 4);
        assert_eq!(table.get_item(&"cat".to_string()), Ok(&vec![1, 2]));
        assert_eq!(table.get_item(&"sat".to_string()), Ok(&vec![1]));
        assert_eq!(table.get_item(&"ran".to_string()), Ok(&vec![2]));
        assert_eq!(table.get_item(&"away".to_string()), Ok(&vec![2]));
        assert!(!table.contains(&"the".to_string()));

        assert_eq!(report(&table), "away: 2\ncat: 1 2\nran: 2\nsat: 1\n");
    }

    #[test]
    fn duplicate_words_on_one_line_are_recorded_once() {
        let stop = stop_words("");
        let text = "echo echo echo\n\necho\n";
        let table = build_concordance_table(text.as_bytes(), &stop).unwrap();
        assert_eq!(table.get_item(&"echo".to_string()), Ok(&vec![1, 3]));
    }

    #[test]
    fn blank_lines_still_count() {
        let stop = stop_words("");
        let text = "\n\n\nlate\n";
        let table = build_concordance_table(text.as_bytes(), &stop).unwrap();
        assert_eq!(table.get_item(&"late".to_string()), Ok(&vec![4]));
    }

    #[test]
    fn concordance_grows_past_initial_capacity() {
        let stop = stop_words("");
        let text: String = (0..26u8)
            .map(|i| format!("word{}\n", (b'a' + i) as char))
            .collect();
        let table = build_concordance_table(text.as_bytes(), &stop).unwrap();
        assert_eq!(table.size(), 26);
        assert!(table.capacity() > CONCORDANCE_CAPACITY);
        assert!(table.size() <= table.capacity());
        assert_eq!(table.get_item(&"wordz".to_string()), Ok(&vec![26]));
    }

    #[test]
    fn empty_table_writes_nothing() {
        let table: Concordance = HashTable::with_hasher(CONCORDANCE_CAPACITY, hash_word);
        assert_eq!(report(&table), "");
    }

    #[test]
    fn invalid_utf8_is_an_error() {
        let stop = stop_words("");
        let bytes: &[u8] = &[b'o', b'k', b'\n', 0xff, 0xfe, b'\n'];
        let result = build_concordance_table(bytes, &stop);
        assert!(matches!(result, Err(ConcordanceError::Io(_))));
    }
}
