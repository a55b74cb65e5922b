//! Build a word cooccurrence graph from a tweet word dump
//!
//! The dump is a CSV with one row per word occurrence, carrying the tweet id
//! and the tweet's favorite and retweet counts. One forward pass builds the
//! graph, then three CSVs come out: Gephi-ready node and edge tables next to
//! the input, and categorized_words.csv in the working directory with the
//! most promising untagged words on top, ready for hand triage before the
//! next run.

// argument parsing
#[macro_use] extern crate clap;
// logging
#[macro_use] extern crate log;
extern crate env_logger;
// lastly, this library
extern crate tweetgraph;

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tweetgraph::csv::RowReader;
use tweetgraph::dict;
use tweetgraph::errors::*;
use tweetgraph::graph::GraphBuilder;
use tweetgraph::stream::LineStreamer;

pub fn main() {
    // Main can't return a Result, and the ? operator needs the enclosing function to return Result
    inner_main().expect("Could not recover. Exiting.");
}
pub fn inner_main() -> Result<()> {
    env_logger::init().unwrap();
    let args = app_from_crate!()
        .arg_from_usage("<words> 'tweet word dump: one CSV row per word occurrence'")
        .arg_from_usage("[categories] 'word category seed CSV (default: categorized_words.csv)'")
        .get_matches();
    let words_path = args.value_of("words").unwrap();
    let seed_path = args.value_of("categories").unwrap_or("categorized_words.csv");

    let mut graph = GraphBuilder::new(dict::load_categories(seed_path));

    let streamer = LineStreamer::open(words_path, "tweet word dump")?;
    let mut row_count = 0usize;
    for row in RowReader::new(streamer)? {
        graph.add_nodes_and_edges(&row);
        row_count += 1;
        if row_count % 250_000 == 0 {
            info!("Finished {} rows", row_count);
        }
    }
    info!("{} rows in: {} categorized nodes, {} edges",
        row_count, graph.categorized_count(), graph.edge_count());

    let stem = Path::new(words_path).with_extension("");
    write_csv(&format!("{}_nodes.csv", stem.display()), &graph.nodes_csv())?;
    write_csv(&format!("{}_edges.csv", stem.display()), &graph.edges_csv())?;
    // Always lands in the working directory so the next run picks it up again
    write_csv("categorized_words.csv", &graph.categorized_words_csv())?;
    Ok(())
}

fn write_csv(path: &str, content: &str) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    println!("Wrote {}", path);
    Ok(())
}
