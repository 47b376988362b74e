//! # Merge File IO
//!
//! Line-oriented text format:
//!
//! ```text
//! #bytepair merges v1
//! base_alphabet_size 256
//! merge_count 3
//! 97 97 256
//! 97 98 257
//! 256 257 258
//! ```
//!
//! Records are ``left right token`` in creation order. Loading replays each
//! record into a fresh [`BpeModel`], so a file that breaks monotonic id growth
//! or references a token before it exists is rejected.

use crate::errors::{BpeError, BpeResult};
use crate::model::BpeModel;
use crate::types::TokenType;
use crate::util::validators::U8_SIZE;
use crate::vocab::merge_table::{MergeRule, MergeTable};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

/// The first line of every merge file.
pub const MERGE_FILE_MAGIC: &str = "#bytepair merges v1";

const BASE_ALPHABET_KEY: &str = "base_alphabet_size";
const MERGE_COUNT_KEY: &str = "merge_count";

/// Save a [`MergeTable`] to a merge file.
///
/// # Arguments
/// * `merges` - the merge rules to save.
/// * `path` - the path to save the merges to.
pub fn save_merges_to_path<T: TokenType, P: AsRef<Path>>(
    merges: &MergeTable<T>,
    path: P,
) -> BpeResult<()> {
    let file = std::fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    save_merges_to_writer(merges, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Save a [`MergeTable`] to a [`Write`] writer.
pub fn save_merges_to_writer<T, W>(
    merges: &MergeTable<T>,
    writer: &mut W,
) -> BpeResult<()>
where
    T: TokenType,
    W: Write,
{
    writeln!(writer, "{MERGE_FILE_MAGIC}")?;
    writeln!(writer, "{BASE_ALPHABET_KEY} {U8_SIZE}")?;
    writeln!(writer, "{MERGE_COUNT_KEY} {}", merges.len())?;
    for MergeRule {
        pair: (left, right),
        token,
    } in merges
    {
        writeln!(writer, "{left} {right} {token}")?;
    }
    Ok(())
}

/// Load a [`BpeModel`] from a merge file.
///
/// # Arguments
/// * `path` - the path to the merge file.
pub fn load_model_from_path<T, P>(path: P) -> BpeResult<BpeModel<T>>
where
    T: TokenType,
    P: AsRef<Path>,
{
    let file = std::fs::File::open(path)?;
    load_model_from_reader(BufReader::new(file))
}

/// Load a [`BpeModel`] from a merge file [`BufRead`] stream.
pub fn load_model_from_reader<T, R>(reader: R) -> BpeResult<BpeModel<T>>
where
    T: TokenType,
    R: BufRead,
{
    load_model_from_iter(reader.lines())
}

/// Load a [`BpeModel`] from a merge file line iterator.
pub fn load_model_from_iter<T>(
    stream: impl Iterator<Item = std::io::Result<String>>,
) -> BpeResult<BpeModel<T>>
where
    T: TokenType,
{
    let mut lines = stream
        .enumerate()
        .map(|(idx, line)| match line {
            Ok(l) => Ok((idx + 1, l)),
            Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                Err(BpeError::corrupt(idx + 1, "invalid UTF-8"))
            }
            Err(e) => Err(BpeError::from(e)),
        })
        .filter(|line| !matches!(line, Ok((_, l)) if l.trim().is_empty()));

    let mut next_line = |what: &str| -> BpeResult<(usize, String)> {
        match lines.next() {
            Some(line) => line,
            None => Err(BpeError::corrupt(0, format!("missing {what}"))),
        }
    };

    let (line_no, magic) = next_line("header")?;
    if magic.trim() != MERGE_FILE_MAGIC {
        return Err(BpeError::corrupt(
            line_no,
            format!("expected {MERGE_FILE_MAGIC:?}, found {:?}", magic.trim()),
        ));
    }

    let (line_no, line) = next_line(BASE_ALPHABET_KEY)?;
    let base: usize = parse_header_value(line_no, &line, BASE_ALPHABET_KEY)?;
    if base != U8_SIZE {
        return Err(BpeError::corrupt(
            line_no,
            format!("unsupported {BASE_ALPHABET_KEY} {base}; expected {U8_SIZE}"),
        ));
    }

    let (line_no, line) = next_line(MERGE_COUNT_KEY)?;
    let merge_count: usize = parse_header_value(line_no, &line, MERGE_COUNT_KEY)?;

    let mut model: BpeModel<T> = BpeModel::new();
    for _ in 0..merge_count {
        let (line_no, line) = next_line("merge record")?;
        let rule = parse_rule::<T>(line_no, &line)?;
        model
            .push_rule(rule)
            .map_err(|e| BpeError::corrupt(line_no, e.to_string()))?;
    }

    if let Some(extra) = lines.next() {
        let (line_no, _) = extra?;
        return Err(BpeError::corrupt(
            line_no,
            format!("more than {merge_count} merge records"),
        ));
    }

    Ok(model)
}

/// Load only the [`MergeTable`] from a merge file; the table is validated.
pub fn load_merges_from_path<T, P>(path: P) -> BpeResult<MergeTable<T>>
where
    T: TokenType,
    P: AsRef<Path>,
{
    load_model_from_path(path).map(|model: BpeModel<T>| model.merges().clone())
}

/// Load only the [`MergeTable`] from a merge file [`BufRead`] stream.
pub fn load_merges_from_reader<T, R>(reader: R) -> BpeResult<MergeTable<T>>
where
    T: TokenType,
    R: BufRead,
{
    load_model_from_reader(reader).map(|model: BpeModel<T>| model.merges().clone())
}

fn parse_header_value<V: FromStr>(
    line_no: usize,
    line: &str,
    key: &str,
) -> BpeResult<V> {
    let mut parts = line.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(k), Some(v), None) if k == key => v
            .parse()
            .map_err(|_| BpeError::corrupt(line_no, format!("invalid {key} value {v:?}"))),
        _ => Err(BpeError::corrupt(
            line_no,
            format!("expected \"{key} <value>\", found {line:?}"),
        )),
    }
}

fn parse_rule<T: TokenType>(
    line_no: usize,
    line: &str,
) -> BpeResult<MergeRule<T>> {
    let fields = line
        .split_whitespace()
        .map(|f| {
            f.parse::<u64>()
                .ok()
                .and_then(T::from_u64)
                .ok_or_else(|| BpeError::corrupt(line_no, format!("invalid token {f:?}")))
        })
        .collect::<BpeResult<Vec<T>>>()?;

    match fields.as_slice() {
        &[left, right, token] => Ok(MergeRule::new((left, right), token)),
        _ => Err(BpeError::corrupt(
            line_no,
            format!(
                "expected \"<left> <right> <token>\", found {} fields",
                fields.len()
            ),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::trainer::BytePairTrainer;

    fn load_str<T: TokenType>(text: impl AsRef<[u8]>) -> BpeResult<BpeModel<T>> {
        load_model_from_reader(text.as_ref())
    }

    #[test]
    fn test_save_format() {
        type T = u32;
        let model: BpeModel<T> = BytePairTrainer::new_with_vocab_size(259)
            .train_bytes::<T>(b"aaabdaaabac")
            .unwrap()
            .into();

        let mut buf = Vec::new();
        save_merges_to_writer(model.merges(), &mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "#bytepair merges v1\n\
             base_alphabet_size 256\n\
             merge_count 3\n\
             97 97 256\n\
             97 98 257\n\
             256 257 258\n"
        );
    }

    #[test]
    fn test_save_load_path() {
        type T = u16;
        let model: BpeModel<T> = BytePairTrainer::new_with_vocab_size(320)
            .train_bytes::<T>(b"hello world, hello san francisco, it's the salt")
            .unwrap()
            .into();

        tempdir::TempDir::new("merges_test")
            .and_then(|dir| {
                let path = dir.path().join("model.merges");

                save_merges_to_path(model.merges(), &path).expect("Failed to save merges");

                let loaded: BpeModel<T> =
                    load_model_from_path(&path).expect("Failed to load merges");
                assert_eq!(&loaded, &model);

                let merges: MergeTable<T> =
                    load_merges_from_path(&path).expect("Failed to load merges");
                assert_eq!(&merges, model.merges());

                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn test_load_empty_table() {
        let model: BpeModel<u32> =
            load_str("#bytepair merges v1\nbase_alphabet_size 256\nmerge_count 0\n").unwrap();
        assert_eq!(model.vocab_size(), 256);
    }

    #[test]
    fn test_load_ignores_blank_lines() {
        let text = "#bytepair merges v1\n\nbase_alphabet_size 256\nmerge_count 1\n\n97 98 256\n\n";
        let model: BpeModel<u32> = load_str(text).unwrap();
        assert_eq!(model.vocab().get(256), Some(b"ab".as_slice()));

        let merges: MergeTable<u32> = load_merges_from_reader(text.as_bytes()).unwrap();
        assert_eq!(merges.rules(), &[MergeRule::new((97, 98), 256)]);
    }

    fn assert_corrupt(
        text: impl AsRef<[u8]>,
        expected_line: usize,
    ) {
        match load_str::<u32>(text) {
            Err(BpeError::CorruptVocabulary { line, .. }) => assert_eq!(line, expected_line),
            other => panic!("expected CorruptVocabulary, got {other:?}"),
        }
    }

    #[test]
    fn test_load_rejects_bad_headers() {
        assert_corrupt("", 0);
        assert_corrupt("#tiktoken\n", 1);
        assert_corrupt("#bytepair merges v1\nbase_alphabet_size 512\nmerge_count 0\n", 2);
        assert_corrupt("#bytepair merges v1\nbase_alphabet_size\nmerge_count 0\n", 2);
        assert_corrupt("#bytepair merges v1\nbase_alphabet_size 256\nmerges 0\n", 3);
        assert_corrupt("#bytepair merges v1\nbase_alphabet_size 256\nmerge_count -1\n", 3);
    }

    #[test]
    fn test_load_rejects_bad_records() {
        let header = "#bytepair merges v1\nbase_alphabet_size 256\n";

        // Non-monotonic ids.
        assert_corrupt(&format!("{header}merge_count 2\n97 97 256\n97 98 258\n"), 5);
        assert_corrupt(&format!("{header}merge_count 1\n97 97 300\n"), 4);

        // Forward reference.
        assert_corrupt(&format!("{header}merge_count 1\n256 97 256\n"), 4);

        // Malformed records.
        assert_corrupt(&format!("{header}merge_count 1\n97 97\n"), 4);
        assert_corrupt(&format!("{header}merge_count 1\n97 x 256\n"), 4);

        // Count mismatch.
        assert_corrupt(&format!("{header}merge_count 2\n97 97 256\n"), 0);
        assert_corrupt(&format!("{header}merge_count 1\n97 97 256\n97 98 257\n"), 5);

        // Not UTF-8.
        assert_corrupt(
            b"#bytepair merges v1\nbase_alphabet_size 256\nmerge_count 1\n97 9\xff 256\n",
            4,
        );
        assert_corrupt(b"#bytepair\xfe merges v1\n", 1);
    }

    #[test]
    fn test_load_surfaces_read_failures() {
        let lines = vec![
            Ok(MERGE_FILE_MAGIC.to_string()),
            Err(std::io::Error::other("disk gone")),
        ];
        assert!(matches!(
            load_model_from_iter::<u32>(lines.into_iter()),
            Err(BpeError::Io(_))
        ));
    }

    #[test]
    fn test_load_rejects_out_of_range_tokens() {
        let text = "#bytepair merges v1\nbase_alphabet_size 256\nmerge_count 1\n97 97 70000\n";
        assert!(matches!(
            load_str::<u16>(text),
            Err(BpeError::CorruptVocabulary { line: 4, .. })
        ));
    }
}
