use std::{collections::VecDeque, fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
    seq::SliceRandom,
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::PieceKind;

/// How the next piece kind is drawn.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Randomizer {
    /// Every group of seven consecutive pieces contains each kind exactly once.
    #[default]
    SevenBag,
    /// Each piece is an independent uniform draw.
    Uniform,
}

/// Seed for a reproducible piece sequence.
///
/// A 128-bit value that initializes the PCG generator. It serializes as a
/// 32-character hexadecimal string and parses from one on the command line.
///
/// # Example
///
/// ```
/// use neontris_engine::{PieceGenerator, PieceSeed, Randomizer};
/// use rand::Rng as _;
///
/// let seed: PieceSeed = rand::rng().random();
/// let a: Vec<_> = PieceGenerator::with_seed(seed, Randomizer::SevenBag).take(14).collect();
/// let b: Vec<_> = PieceGenerator::with_seed(seed, Randomizer::SevenBag).take(14).collect();
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

impl PieceSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn to_bytes(self) -> [u8; 16] {
        self.0
    }
}

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

/// A seed string that is not 32 hexadecimal digits.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid hex seed {input:?}: expected 32 hexadecimal characters")]
pub struct ParseSeedError {
    input: String,
}

impl FromStr for PieceSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = || ParseSeedError {
            input: s.to_owned(),
        };
        if s.len() != 32 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(error());
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| error())?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows `rng.random::<PieceSeed>()`.
impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

/// Lazy, infinite, seeded sequence of piece kinds.
///
/// The generator keeps a queue of upcoming kinds so the UI can preview them; the queue
/// is topped up whenever it drops to seven entries or fewer. [`Self::restart`] rewinds
/// to the first piece of the same seed.
#[derive(Debug, Clone)]
pub struct PieceGenerator {
    seed: PieceSeed,
    randomizer: Randomizer,
    rng: Pcg32,
    queue: VecDeque<PieceKind>,
}

impl Default for PieceGenerator {
    fn default() -> Self {
        Self::new(Randomizer::default())
    }
}

impl PieceGenerator {
    /// Creates a generator with a fresh random seed.
    #[must_use]
    pub fn new(randomizer: Randomizer) -> Self {
        Self::with_seed(rand::rng().random(), randomizer)
    }

    #[must_use]
    pub fn with_seed(seed: PieceSeed, randomizer: Randomizer) -> Self {
        let mut this = Self {
            seed,
            randomizer,
            rng: Pcg32::from_seed(seed.0),
            queue: VecDeque::with_capacity(PieceKind::LEN * 2),
        };
        this.fill_queue();
        this
    }

    #[must_use]
    pub fn seed(&self) -> PieceSeed {
        self.seed
    }

    #[must_use]
    pub fn randomizer(&self) -> Randomizer {
        self.randomizer
    }

    /// Rewinds to the beginning of the sequence for the same seed.
    pub fn restart(&mut self) {
        *self = Self::with_seed(self.seed, self.randomizer);
    }

    fn fill_queue(&mut self) {
        while self.queue.len() <= PieceKind::LEN {
            match self.randomizer {
                Randomizer::SevenBag => {
                    let mut bag = PieceKind::ALL;
                    bag.shuffle(&mut self.rng);
                    self.queue.extend(bag);
                }
                Randomizer::Uniform => {
                    let kind = self.rng.random();
                    self.queue.push_back(kind);
                }
            }
        }
    }

    /// Draws the next kind.
    pub fn pop_next(&mut self) -> PieceKind {
        self.fill_queue();
        let kind = self
            .queue
            .pop_front()
            .expect("piece queue is refilled before every draw");
        self.fill_queue();
        kind
    }

    /// Upcoming kinds, next first. Always yields at least seven.
    pub fn next_pieces(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.queue.iter().copied()
    }
}

impl Iterator for PieceGenerator {
    type Item = PieceKind;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.pop_next())
    }
}
