use anyhow::{bail, Context, Result};
use clap::Parser;
use libfox_core::TableFile;
use std::fs;
use std::path::{Path, PathBuf};

// Glossary export layout (tab-separated, one sheet row per line)
const NAME_ROW: usize = 0;
const NAME_COL: usize = 2;
const FIRST_DATA_ROW: usize = 3;
const DESCRIPTION_COL: usize = 2;
const PHRASE_COL: usize = 3;

/// Marks glossary rows with no word in the language.
const MISSING_MARKER: &str = "無此詞彙";

/// Glossary files are numbered from 02; table TW_01 comes from glossary -02.
const BATCH_TABLES: std::ops::Range<u32> = 1..44;

#[derive(Parser)]
#[command(about = "Convert tab-separated glossary exports into phrase table JSON")]
struct Args {
    /// Glossary export, or a directory of them with --batch
    input: PathBuf,

    /// Output file; a directory when --index or --batch is given
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Table number; the output is named TW_<index>.json
    #[arg(long)]
    index: Option<u32>,

    /// Convert every numbered glossary in the input directory
    #[arg(long, conflicts_with = "index")]
    batch: bool,
}

fn cell<'a>(row: &[&'a str], col: usize) -> &'a str {
    row.get(col).copied().unwrap_or("")
}

/// Build a table from a glossary export.
///
/// Phrase cells may hold several `/`-separated variants; each becomes its own
/// entry with the row's description. Entries are sorted by phrase.
fn parse_glossary(text: &str) -> TableFile {
    let rows: Vec<Vec<&str>> = text
        .lines()
        .map(|line| line.trim_end_matches('\r').split('\t').collect())
        .collect();

    let name = rows
        .get(NAME_ROW)
        .map(|row| cell(row, NAME_COL).trim().to_string())
        .unwrap_or_default();

    let mut data = Vec::new();
    for row in rows.iter().skip(FIRST_DATA_ROW) {
        let description = cell(row, DESCRIPTION_COL);
        let phrases = cell(row, PHRASE_COL);
        if phrases.contains(MISSING_MARKER) || description.is_empty() || phrases.is_empty() {
            continue;
        }
        for phrase in phrases.split('/').map(str::trim).filter(|p| !p.is_empty()) {
            data.push((phrase.to_string(), description.to_string()));
        }
    }
    data.sort_by(|a, b| a.0.cmp(&b.0));

    TableFile { name, data }
}

fn table_file_name(index: u32) -> String {
    format!("TW_{:02}.json", index)
}

fn convert_file(input: &Path, output: &Path) -> Result<usize> {
    let text = fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))?;
    let table = parse_glossary(&text);
    let json = serde_json::to_string_pretty(&table)?;
    fs::write(output, json).with_context(|| format!("writing {}", output.display()))?;
    Ok(table.data.len())
}

/// The glossary file for table `index` in `dir`, matched by its `-NN` number.
fn find_glossary(dir: &Path, index: u32) -> Result<Option<PathBuf>> {
    let needle = format!("-{:02}", index + 1);
    let mut matches: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("listing {}", dir.display()))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.contains(&needle))
        })
        .collect();
    matches.sort();
    Ok(matches.into_iter().next())
}

fn run_batch(input_dir: &Path, output_dir: &Path) -> Result<()> {
    fs::create_dir_all(output_dir)?;
    let mut failures = 0;
    for index in BATCH_TABLES {
        let result = find_glossary(input_dir, index).and_then(|found| match found {
            Some(path) => {
                let output = output_dir.join(table_file_name(index));
                let count = convert_file(&path, &output)?;
                println!("{} -> {} ({} entries)", path.display(), output.display(), count);
                Ok(())
            }
            None => bail!("no glossary numbered -{:02}", index + 1),
        });
        if let Err(e) = result {
            eprintln!("error processing table {}: {:#}", index, e);
            failures += 1;
        }
    }
    if failures > 0 {
        eprintln!("{} table(s) not converted", failures);
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.batch {
        let output_dir = args.output.unwrap_or_else(|| PathBuf::from("."));
        return run_batch(&args.input, &output_dir);
    }

    let output = match args.index {
        Some(index) => {
            let dir = args.output.unwrap_or_else(|| PathBuf::from("."));
            fs::create_dir_all(&dir)?;
            dir.join(table_file_name(index))
        }
        None => args
            .output
            .unwrap_or_else(|| args.input.with_extension("json")),
    };
    let count = convert_file(&args.input, &output)?;
    println!("Wrote {} entries to {}", count, output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use libfox_core::{LoadStrictness, PhraseTable};

    const EXPORT: &str = "\
\t\t阿美語\t
\t\t\t
編號\t分類\t華語\t族語
1\t親屬\t媽媽\tina
2\t親屬\t爸爸\tama / wama
3\t數字\t零\t無此詞彙
4\t數字\t一\t
5\t問候\t你好\tnga'ay ho\r
";

    #[test]
    fn parses_name_and_splits_variants() {
        let table = parse_glossary(EXPORT);
        assert_eq!(table.name, "阿美語");
        assert_eq!(
            table.data,
            vec![
                ("ama".to_string(), "爸爸".to_string()),
                ("ina".to_string(), "媽媽".to_string()),
                ("nga'ay ho".to_string(), "你好".to_string()),
                ("wama".to_string(), "爸爸".to_string()),
            ]
        );
    }

    #[test]
    fn output_loads_as_phrase_table() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("glossary-02.tsv");
        fs::write(&input, EXPORT).unwrap();

        assert_eq!(find_glossary(dir.path(), 1).unwrap(), Some(input.clone()));
        assert_eq!(find_glossary(dir.path(), 2).unwrap(), None);

        let output = dir.path().join(table_file_name(1));
        assert_eq!(convert_file(&input, &output).unwrap(), 4);

        let table = PhraseTable::load(&output, LoadStrictness::Strict).unwrap();
        assert_eq!(table.name(), "阿美語");
        assert_eq!(table.len(), 4);
        assert_eq!(table.get_exact("wama")[0].description, "爸爸");
    }

    #[test]
    fn file_names_are_zero_padded() {
        assert_eq!(table_file_name(3), "TW_03.json");
        assert_eq!(table_file_name(42), "TW_42.json");
    }
}
