use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash, Default, EnumIter, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum Element {
    Fire,
    Water,
    Electric,
    Nature,
    Wind,
    Light,
    Dark,
    Corrupted,
    #[default]
    Unknown,
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// How an attacking element fares against a defending one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Matchup {
    Advantage,
    Neutral,
    Disadvantage,
}

impl Element {
    /// Elements this one deals bonus damage to.
    ///
    /// The five natural elements form a cycle
    /// (Fire > Nature > Wind > Electric > Water > Fire). Light and Dark are
    /// mutual banes, and Light and Corrupted are mutual banes as well, so both
    /// sides of those pairs get the advantage.
    pub fn strong_against(self) -> &'static [Element] {
        use Element::*;

        match self {
            Fire => &[Nature],
            Nature => &[Wind],
            Wind => &[Electric],
            Electric => &[Water],
            Water => &[Fire],
            Light => &[Dark, Corrupted],
            Dark => &[Light],
            Corrupted => &[Light, Dark],
            Unknown => &[],
        }
    }

    /// Matchup of `attacking` against `defending`. `Unknown` on either side is
    /// always neutral.
    pub fn matchup(attacking: Element, defending: Element) -> Matchup {
        if attacking == Element::Unknown || defending == Element::Unknown {
            return Matchup::Neutral;
        }
        if attacking.strong_against().contains(&defending) {
            Matchup::Advantage
        } else if defending.strong_against().contains(&attacking) {
            Matchup::Disadvantage
        } else {
            Matchup::Neutral
        }
    }
}
