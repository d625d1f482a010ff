use clap::ValueEnum;
use include_dir::{include_dir, Dir};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use serde_json::from_str;
use std::error::Error;
use std::fs;
use std::path::Path;

static WORDS_DIR: Dir = include_dir!("src/words");

/// A French term paired with its English gloss.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct WordEntry {
    pub french: String,
    pub english: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct WordList {
    pub name: String,
    pub size: u32,
    pub words: Vec<WordEntry>,
}

/// CEFR levels of the embedded word lists, in ascending order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, strum_macros::Display)]
pub enum Difficulty {
    A1,
    A2,
    B1,
    B2,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::A1,
        Difficulty::A2,
        Difficulty::B1,
        Difficulty::B2,
    ];

    fn file_name(&self) -> String {
        format!("{}.json", self.to_string().to_lowercase())
    }
}

impl WordList {
    /// Load the embedded list for one difficulty level.
    pub fn load(difficulty: Difficulty) -> Self {
        read_list_from_dir(&difficulty.file_name()).expect("embedded word list")
    }

    /// Load a custom list from a JSON file on disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let contents = fs::read_to_string(path)?;
        let list = from_str(&contents)?;
        Ok(list)
    }

    /// Every entry from A1 up to and including the given level.
    pub fn pool_through(difficulty: Difficulty) -> Vec<WordEntry> {
        Difficulty::ALL
            .iter()
            .filter(|level| **level <= difficulty)
            .flat_map(|level| WordList::load(*level).words)
            .collect()
    }

    /// Pick one entry with the caller's random source.
    pub fn pick<'a, R: Rng>(&'a self, rng: &mut R) -> Option<&'a WordEntry> {
        self.words.choose(rng)
    }

    /// Pick one entry with thread-local randomness.
    pub fn pick_random(&self) -> Option<&WordEntry> {
        self.pick(&mut rand::thread_rng())
    }
}

fn read_list_from_dir(file_name: &str) -> Result<WordList, Box<dyn Error>> {
    let file = WORDS_DIR
        .get_file(file_name)
        .ok_or_else(|| format!("word list not found: {file_name}"))?;

    let file_as_str = file
        .contents_utf8()
        .ok_or("unable to interpret word list as a string")?;

    let list = from_str(file_as_str)?;
    Ok(list)
}
