use crate::entropy::Dice;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Puzzle {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(skip)]
    pub solution: &'static str,
    pub hint: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolKind {
    Cryptographic,
    Coding,
}

impl PoolKind {
    pub fn label(self) -> &'static str {
        match self {
            PoolKind::Cryptographic => "cryptographic",
            PoolKind::Coding => "coding",
        }
    }

    pub fn pool(self) -> &'static [Puzzle] {
        match self {
            PoolKind::Cryptographic => CRYPTOGRAPHIC,
            PoolKind::Coding => CODING,
        }
    }
}

pub const CRYPTOGRAPHIC: &[Puzzle] = &[
    Puzzle {
        name: "Blockchain Basics",
        description: "What consensus mechanism does Bitcoin use to validate transactions and create new blocks?",
        solution: "proof of work",
        hint: "It involves miners solving complex mathematical problems.",
    },
    Puzzle {
        name: "Smart Contracts",
        description: "Which blockchain platform first introduced smart contracts?",
        solution: "ethereum",
        hint: "Vitalik Buterin created this platform.",
    },
    Puzzle {
        name: "Web3 Knowledge",
        description: "What type of token standard is commonly used for NFTs on Ethereum?",
        solution: "erc721",
        hint: "It's a non-fungible token standard.",
    },
    Puzzle {
        name: "Cicada 3301 #1",
        description: "In one of the famous Cicada 3301 puzzles, participants encountered cryptographic references to prime numbers and steganography.\n\
                      This puzzle asks: \"What large, commercially used cipher has a 128-bit block size and various key lengths from 128 to 256 bits?\"\n\
                      (Hint: It's often used in secure HTTPS connections.)",
        solution: "aes",
        hint: "It replaced DES officially.",
    },
];

pub const CODING: &[Puzzle] = &[
    Puzzle {
        name: "Anime Trivia",
        description: "In \"Ghost in the Shell\", what is the name of the cyber-brain virus that allows hackers to take over minds?",
        solution: "puppet master",
        hint: "It's also known as Project 2501.",
    },
    Puzzle {
        name: "Matrix Knowledge",
        description: "What is the name of the last human city in The Matrix?",
        solution: "zion",
        hint: "Located near the Earth's core.",
    },
    Puzzle {
        name: "Cyberpunk Anime",
        description: "In \"Akira\", what is the name of the powerful psychic force that Tetsuo awakens?",
        solution: "akira",
        hint: "The film shares its name with this power.",
    },
    Puzzle {
        name: "Cicada 3301 #2",
        description: "Cicada 3301 famously posted images with hidden messages. One method to find them is to look at the least significant bits of an image or to extract text from the image file.\n\
                      What is this general technique called?",
        solution: "steganography",
        hint: "Hiding messages in plain sight.",
    },
];

/// Coin flip for the pool, then a uniform pick inside it.
pub fn draw(dice: &mut dyn Dice) -> (PoolKind, Puzzle) {
    let kind = if dice.roll() > 0.5 {
        PoolKind::Cryptographic
    } else {
        PoolKind::Coding
    };
    let pool = kind.pool();
    let puzzle = pool[dice.pick(pool.len())];
    log::debug!("drew {} puzzle '{}'", kind.label(), puzzle.name);
    (kind, puzzle)
}

fn normalize(answer: &str) -> String {
    answer
        .trim()
        .trim_end_matches(['.', '!', '?'])
        .trim_end()
        .to_lowercase()
}

/// Exact match after trimming, case folding and dropping trailing sentence
/// punctuation. No partial credit.
pub fn check(candidate: &str, solution: &str) -> bool {
    normalize(candidate) == normalize(solution)
}

/// `Cicada 3301 #1` -> `cicada_3301_#1`
pub fn slug(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}
