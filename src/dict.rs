//! Word category seed dictionary
//!
//! categorized_words.csv is both an output and, on the next run, an input:
//! the analyst hand-tags the surfaced words and the tags come back through
//! here. Consulted read-only while the graph is built.
use std::io::Read;
use std::path::Path;
use csv::RowReader;
use farm::{self, FarmMap};
use stream::LineStreamer;

/// The category literal meaning nobody has tagged this word yet
pub const UNCATEGORIZED: &'static str = "uncategorized";

/// Load the word -> category seed map
///
/// A missing or unreadable seed file is a normal first run, not an error.
/// Rows tagged `uncategorized` are dropped so untagged words fall through to
/// the default at lookup time instead of being pinned here.
pub fn load_categories<P: AsRef<Path>>(path: P) -> FarmMap<String, String> {
    let streamer = match LineStreamer::open(path.as_ref(), "category seed file") {
        Ok(streamer) => streamer,
        Err(_) => {
            info!("No category seed at {}; starting uncategorized", path.as_ref().display());
            return farm::new_farm();
        }
    };
    match RowReader::new(streamer) {
        Ok(reader) => {
            let categories = collect_categories(reader);
            info!("Loaded {} seeded word categories", categories.len());
            categories
        }
        Err(_) => farm::new_farm(),
    }
}

fn collect_categories<R: Read>(reader: RowReader<R>) -> FarmMap<String, String> {
    let mut categories = farm::new_farm();
    for row in reader {
        let word = match row.get("word") {
            Some(word) => word.to_string(),
            None => continue,
        };
        let category = match row.get("category") {
            Some(category) => category,
            None => continue,
        };
        if category == UNCATEGORIZED {
            continue;
        }
        categories.insert(word, category.to_string());
    }
    categories
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use csv::RowReader;
    use stream::LineStreamer;

    fn from_doc(doc: &str) -> FarmMap<String, String> {
        let lines = LineStreamer::new(Cursor::new(doc.as_bytes().to_vec()), b'\n');
        collect_categories(RowReader::new(lines).unwrap())
    }

    #[test]
    fn keeps_real_categories() {
        let categories = from_doc("word,category\nnato,politics\nlol,garbage\n");
        assert_eq!(categories.len(), 2);
        assert_eq!(categories.get("nato").map(|c| c.as_str()), Some("politics"));
        assert_eq!(categories.get("lol").map(|c| c.as_str()), Some("garbage"));
    }

    #[test]
    fn drops_uncategorized_rows() {
        let categories = from_doc("word,category\nmaybe,uncategorized\nnato,politics\n");
        assert_eq!(categories.len(), 1);
        assert!(categories.get("maybe").is_none());
    }

    #[test]
    fn skips_rows_missing_a_category() {
        assert!(from_doc("word,category\nalone\n").is_empty());
    }

    #[test]
    fn missing_file_is_an_empty_seed() {
        assert!(load_categories("definitely/not/here.csv").is_empty());
    }
}
