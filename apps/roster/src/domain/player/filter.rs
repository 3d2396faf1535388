use super::player::Player;
use super::value_objects::Position;

/// Catalog filter applied to the player list
///
/// A player matches when its position equals `position` (if set) and its
/// name, club or nationality contains `search` ignoring case (if not blank).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerFilter {
    pub position: Option<Position>,
    pub search: Option<String>,
}

impl PlayerFilter {
    pub fn position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    pub fn matches(&self, player: &Player) -> bool {
        if let Some(position) = self.position {
            if player.position != position {
                return false;
            }
        }

        match self.search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => {
                let needle = needle.to_lowercase();
                [&player.name, &player.club, &player.nationality]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            }
            _ => true,
        }
    }

    /// Returns the matching players, keeping catalog order
    pub fn apply<'a>(&self, players: &'a [Player]) -> Vec<&'a Player> {
        players.iter().filter(|p| self.matches(p)).collect()
    }
}
