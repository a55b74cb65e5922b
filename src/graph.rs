//! Incremental cooccurrence graph construction
//!
//! One forward pass over the word dump. Each accepted row lands in exactly
//! one node's aggregates; categorized words additionally feed the edge table
//! through a transient tweet index. Nothing here touches the filesystem: the
//! three serializers hand back finished CSV text and the binary writes it.
use std::cmp::Ordering;
use csv::Row;
use dict;
use farm::{self, FarmMap, FarmSet, IntMap, IntSet};

/// The category literal that drops a word from the run entirely
pub const GARBAGE: &'static str = "garbage";

// Hand-tuned blend for surfacing the words most worth tagging next
const FAVORITE_WEIGHT: f64 = 0.000048;
const RETWEET_WEIGHT: f64 = 0.00045;
const FREQUENCY_WEIGHT: f64 = 1000.0;

/// How a word is classified, fixed the first time the word is seen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Category {
    /// No seed entry yet: kept out of the graph, but ranked for triage
    Uncategorized,
    /// Seeded as noise: dropped entirely
    Garbage,
    /// Any analyst-assigned label
    Other(String),
}

impl Category {
    pub fn from_seed(label: &str) -> Category {
        if label == GARBAGE {
            Category::Garbage
        } else if label == dict::UNCATEGORIZED {
            // A stray uncategorized row that survived loading still means untagged
            Category::Uncategorized
        } else {
            Category::Other(label.to_string())
        }
    }

    /// Discardable words stay out of the edge graph
    pub fn is_discardable(&self) -> bool {
        match *self {
            Category::Other(_) => false,
            _ => true,
        }
    }

    /// The string that lands in the nodes CSV
    pub fn label(&self) -> &str {
        match *self {
            Category::Uncategorized => dict::UNCATEGORIZED,
            Category::Garbage => GARBAGE,
            Category::Other(ref name) => name,
        }
    }
}

/// Aggregate record for one word's appearances across the dataset
#[derive(Debug, Clone)]
pub struct Node {
    pub id: u32,
    pub word: String,
    /// Favorite/retweet sums over every distinct tweet mentioning the word
    pub favorite_count: u64,
    pub retweet_count: u64,
    /// Accepted rows for this word, kept separate from the tweet set
    pub word_count: u64,
    pub tweet_ids: IntSet<u64>,
    pub category: Category,
}

impl Node {
    fn favorite_rate(&self) -> f64 {
        self.favorite_count as f64 / self.tweet_ids.len() as f64
    }

    fn retweet_rate(&self) -> f64 {
        self.retweet_count as f64 / self.tweet_ids.len() as f64
    }
}

/// Single-pass cooccurrence graph builder
///
/// Owns every table. One instance is threaded through the ingest loop and
/// serialized once the stream is exhausted. Nodes live in one arena indexed
/// by id; the two word tables only map back into it.
pub struct GraphBuilder {
    dictionary: FarmMap<String, String>,
    nodes: Vec<Node>,
    categorized: FarmMap<String, u32>,
    uncategorized: FarmMap<String, u32>,
    /// Words already ruled garbage, so they are not re-resolved on every row
    garbage: FarmSet<String>,
    edges: IntMap<(u32, u32), u64>,
    /// Tweet id -> categorized node ids already attributed to that tweet
    tweet_index: IntMap<u64, IntSet<u32>>,
    /// Accepted rows over non-discardable words
    categorized_occurrences: u64,
    /// Accepted rows over all words, garbage included
    total_occurrences: u64,
}

impl GraphBuilder {
    pub fn new(dictionary: FarmMap<String, String>) -> GraphBuilder {
        GraphBuilder {
            dictionary: dictionary,
            nodes: vec![],
            categorized: farm::new_farm(),
            uncategorized: farm::new_farm(),
            garbage: farm::new_farm_set(),
            edges: IntMap::default(),
            tweet_index: IntMap::default(),
            categorized_occurrences: 0,
            total_occurrences: 0,
        }
    }

    /// Fold one row into the graph
    ///
    /// Rows missing a required field, or failing to parse a numeric one, are
    /// dropped without complaint, as is a repeat of a (word, tweet) pair the
    /// word's node has already absorbed.
    pub fn add_nodes_and_edges(&mut self, row: &Row) {
        let word = match row.get("word") {
            Some(word) => word,
            None => return,
        };
        let favorites = match numeric(row, "favoriteCount") {
            Some(count) => count,
            None => {
                debug!("Dropping a row for {}: unusable favoriteCount", word);
                return;
            }
        };
        let retweets = match numeric(row, "retweetCount") {
            Some(count) => count,
            None => {
                debug!("Dropping a row for {}: unusable retweetCount", word);
                return;
            }
        };
        let tweet = match numeric(row, "id") {
            Some(id) => id,
            None => {
                debug!("Dropping a row for {}: unusable tweet id", word);
                return;
            }
        };

        let existing = self.categorized.get(word)
            .or_else(|| self.uncategorized.get(word))
            .cloned();
        let id = match existing {
            Some(id) => {
                {
                    let node = &mut self.nodes[id as usize];
                    if node.tweet_ids.contains(&tweet) {
                        // Same word twice in one tweet: already absorbed
                        return;
                    }
                    node.favorite_count += favorites;
                    node.retweet_count += retweets;
                    node.word_count += 1;
                    node.tweet_ids.insert(tweet);
                }
                id
            }
            None => {
                if self.garbage.contains(word) {
                    // Still part of the stream volume, nothing else survives
                    self.total_occurrences += 1;
                    return;
                }
                let category = match self.dictionary.get(word) {
                    Some(label) => Category::from_seed(label),
                    None => Category::Uncategorized,
                };
                if category == Category::Garbage {
                    debug!("Ruling {} garbage", word);
                    self.garbage.insert(word.to_string());
                    self.total_occurrences += 1;
                    return;
                }
                // Ids are creation-ordered over every node that persists
                let id = self.nodes.len() as u32;
                if category.is_discardable() {
                    self.uncategorized.insert(word.to_string(), id);
                } else {
                    self.categorized.insert(word.to_string(), id);
                }
                let mut tweet_ids = IntSet::default();
                tweet_ids.insert(tweet);
                self.nodes.push(Node {
                    id: id,
                    word: word.to_string(),
                    favorite_count: favorites,
                    retweet_count: retweets,
                    word_count: 1,
                    tweet_ids: tweet_ids,
                    category: category,
                });
                id
            }
        };

        self.total_occurrences += 1;
        if self.nodes[id as usize].category.is_discardable() {
            return;
        }

        // Everything already indexed under this tweet cooccurs with this word
        let peers = self.tweet_index.entry(tweet).or_insert_with(IntSet::default);
        for &peer in peers.iter() {
            *self.edges.entry((id, peer)).or_insert(0) += 1;
        }
        peers.insert(id);
        self.categorized_occurrences += 1;
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn categorized_count(&self) -> usize {
        self.categorized.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// The Gephi node table: every non-discardable word with its metrics
    pub fn nodes_csv(&self) -> String {
        let mut out = String::from(
            "Id,Label,favoriteRate,retweetRate,wordCount,wordFrequency,popularity,polemicity,category\n");
        for node in self.nodes.iter().filter(|node| !node.category.is_discardable()) {
            let favorite_rate = node.favorite_rate();
            let retweet_rate = node.retweet_rate();
            let word_frequency = node.word_count as f64 / self.categorized_occurrences as f64;
            let popularity = retweet_rate / word_frequency;
            let polemicity = if favorite_rate == 0.0 { 0.0 } else { retweet_rate / favorite_rate };
            out.push_str(&format!("{},{},{},{},{},{},{},{},{}\n",
                node.id, node.word, favorite_rate, retweet_rate, node.word_count,
                word_frequency, popularity, polemicity, node.category.label()));
        }
        out
    }

    /// The Gephi edge table; Id is just the emission index
    pub fn edges_csv(&self) -> String {
        let mut out = String::from("Source,Target,Type,Id,Weight\n");
        for (index, (&(source, target), &weight)) in self.edges.iter().enumerate() {
            out.push_str(&format!("{},{},Undirected,{},{}\n", source, target, index, weight));
        }
        out
    }

    /// The seed file for the next run: everything already tagged, verbatim,
    /// then every untagged word, most promising first
    pub fn categorized_words_csv(&self) -> String {
        let mut out = String::from("word,category\n");
        for (word, category) in self.dictionary.iter() {
            out.push_str(&format!("{},{}\n", word, category));
        }
        let mut untagged: Vec<(f64, &Node)> = self.nodes.iter()
            .filter(|node| node.category == Category::Uncategorized)
            .map(|node| (self.relevance(node), node))
            .collect();
        // Stable sort, so equally relevant words keep creation order
        untagged.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
        for (_, node) in untagged {
            out.push_str(&format!("{},{}\n", node.word, dict::UNCATEGORIZED));
        }
        out
    }

    /// How worthwhile hand-tagging this word would be
    fn relevance(&self, node: &Node) -> f64 {
        // Frequency here is over the whole stream, garbage included
        let word_frequency = node.word_count as f64 / self.total_occurrences as f64;
        (node.favorite_rate() * FAVORITE_WEIGHT
            + node.retweet_rate() * RETWEET_WEIGHT
            + word_frequency * FREQUENCY_WEIGHT) / 3.0
    }
}

fn numeric(row: &Row, name: &str) -> Option<u64> {
    match row.get(name) {
        Some(value) => value.parse().ok(),
        None => None,
    }
}
