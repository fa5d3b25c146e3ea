use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub type ItemId = u32;
pub type Utility = i64;

static ITEM_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)\[(-?\d+)\]$").unwrap());

const SEQUENCE_UTILITY_PREFIX: &str = "SUtility:";

/// One element of a sequence together with its internal utility.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Item {
    pub id: ItemId,
    pub internal_utility: Utility,
}

impl Item {
    pub fn new(id: ItemId, internal_utility: Utility) -> Self {
        Self {
            id,
            internal_utility,
        }
    }
}

/// A parsed input line: the ordered items and the utility the dataset assigns
/// to the whole sequence.
///
/// The sequence utility is taken from the `SUtility:` token as given, it is
/// never recomputed from the items.
///
/// # Example:
/// ```rust
/// # use sequential_utility_rules::{Item, Sequence};
/// let sequence: Sequence = "1[5] 2[3] -1 SUtility:20".parse().unwrap();
///
/// assert_eq!(sequence.items(), &[Item::new(1, 5), Item::new(2, 3)]);
/// assert_eq!(sequence.utility(), 20);
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Sequence {
    items: Vec<Item>,
    utility: Utility,
}

impl Sequence {
    pub fn new(items: Vec<Item>, utility: Utility) -> Self {
        Self { items, utility }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn utility(&self) -> Utility {
        self.utility
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum ParseError {
    #[error("malformed item token `{0}`, expected `<id>[<utility>]`")]
    MalformedItem(String),

    #[error("invalid sequence utility token `{0}`")]
    InvalidSequenceUtility(String),

    #[error("sequence has no `SUtility:` token")]
    MissingSequenceUtility,
}

impl FromStr for Sequence {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut items = Vec::new();
        let mut utility = None;

        for token in line.split_whitespace() {
            if token == "-1" || token == "-2" {
                continue;
            }

            if let Some(value) = token.strip_prefix(SEQUENCE_UTILITY_PREFIX) {
                let value = value
                    .parse()
                    .map_err(|_| ParseError::InvalidSequenceUtility(token.to_string()))?;
                utility = Some(value);
                continue;
            }

            items.push(parse_item(token)?);
        }

        match utility {
            Some(utility) => Ok(Sequence { items, utility }),
            None => Err(ParseError::MissingSequenceUtility),
        }
    }
}

fn parse_item(token: &str) -> Result<Item, ParseError> {
    let malformed = || ParseError::MalformedItem(token.to_string());

    let captures = ITEM_TOKEN.captures(token).ok_or_else(malformed)?;
    // Digit runs can still overflow
    let id = captures[1].parse().map_err(|_| malformed())?;
    let internal_utility = captures[2].parse().map_err(|_| malformed())?;

    Ok(Item::new(id, internal_utility))
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for item in &self.items {
            write!(f, "{}[{}] ", item.id, item.internal_utility)?;
        }
        write!(f, "-1 {}{}", SEQUENCE_UTILITY_PREFIX, self.utility)
    }
}
