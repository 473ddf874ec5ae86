//! Topology module - the fixed bracket structure the diagram must honor
//!
//! The engine never owns the bracket definition; it only asks, per game, where
//! the two teams come from and which game consumes the winner.

use crate::types::{GameId, GameNum, Slot};

/// Where a team in a game comes from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Source {
    /// A fixed label such as a seed or team name.
    Fixed(String),
    /// The winner of another game. Winners are drawn as connected feeders.
    Winner(GameId),
    /// The loser of another game. Losers are labels, never connector lines.
    Loser(GameId),
}

impl Source {
    /// Game whose outgoing feeder should geometrically reach this slot.
    pub fn feeding_game(&self) -> Option<GameId> {
        match self {
            Source::Winner(id) => Some(*id),
            Source::Fixed(_) | Source::Loser(_) => None,
        }
    }
}

/// Topology entry for one game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameTopology {
    pub top: Source,
    pub bottom: Source,
    pub winner_target: Option<GameId>,
}

impl GameTopology {
    pub fn new(top: Source, bottom: Source, winner_target: Option<GameId>) -> Self {
        Self {
            top,
            bottom,
            winner_target,
        }
    }

    pub fn source(&self, slot: Slot) -> &Source {
        match slot {
            Slot::Top => &self.top,
            Slot::Bottom => &self.bottom,
        }
    }

    /// A game whose winner goes nowhere is the last game of its bracket.
    pub fn is_championship(&self) -> bool {
        self.winner_target.is_none()
    }

    /// Slot of this game fed by the winner of `feeder`, if any.
    pub fn slot_fed_by(&self, feeder: GameId) -> Option<Slot> {
        Slot::BOTH
            .into_iter()
            .find(|slot| self.source(*slot).feeding_game() == Some(feeder))
    }

    /// Games whose winners feed this one, with the slot they feed.
    pub fn feeders(&self) -> impl Iterator<Item = (Slot, GameId)> + '_ {
        Slot::BOTH
            .into_iter()
            .filter_map(|slot| self.source(slot).feeding_game().map(|id| (slot, id)))
    }
}

/// Read-only access to the bracket topology
///
/// Implementations are indexed by [`GameNum`]; the provided methods translate
/// from the public [`GameId`].
pub trait Topology {
    fn entry(&self, num: GameNum) -> Option<&GameTopology>;

    fn game(&self, id: GameId) -> Option<&GameTopology> {
        self.entry(id.num())
    }

    fn winner_target(&self, id: GameId) -> Option<GameId> {
        self.game(id).and_then(|g| g.winner_target)
    }

    /// Unknown games are treated as non-championship.
    fn is_championship(&self, id: GameId) -> bool {
        self.game(id).map(GameTopology::is_championship).unwrap_or(false)
    }
}

/// In-memory topology table indexed by game number
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopologyTable {
    entries: Vec<GameTopology>,
}

impl TopologyTable {
    pub fn new(entries: Vec<GameTopology>) -> Self {
        Self { entries }
    }

    pub fn push(&mut self, entry: GameTopology) -> GameId {
        self.entries.push(entry);
        GameNum::new((self.entries.len() - 1) as u32).id()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[GameTopology] {
        &self.entries
    }
}

impl Topology for TopologyTable {
    fn entry(&self, num: GameNum) -> Option<&GameTopology> {
        self.entries.get(num.index())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> TopologyTable {
        let g3 = GameId::new(3);
        TopologyTable::new(vec![
            GameTopology::new(Source::Fixed("A".into()), Source::Fixed("B".into()), Some(g3)),
            GameTopology::new(Source::Fixed("C".into()), Source::Fixed("D".into()), Some(g3)),
            GameTopology::new(
                Source::Winner(GameId::new(1)),
                Source::Winner(GameId::new(2)),
                None,
            ),
        ])
    }

    #[test]
    fn test_lookup_by_id_uses_game_num() {
        let t = table();
        assert_eq!(t.winner_target(GameId::new(1)), Some(GameId::new(3)));
        assert!(t.is_championship(GameId::new(3)));
        assert!(!t.is_championship(GameId::new(2)));
        assert!(t.game(GameId::new(4)).is_none());
    }

    #[test]
    fn test_slot_fed_by() {
        let t = table();
        let final_game = t.game(GameId::new(3)).unwrap();
        assert_eq!(final_game.slot_fed_by(GameId::new(1)), Some(Slot::Top));
        assert_eq!(final_game.slot_fed_by(GameId::new(2)), Some(Slot::Bottom));
        assert_eq!(final_game.slot_fed_by(GameId::new(3)), None);
        assert_eq!(final_game.feeders().count(), 2);
    }

    #[test]
    fn test_loser_sources_are_not_feeders() {
        let entry = GameTopology::new(
            Source::Loser(GameId::new(1)),
            Source::Winner(GameId::new(2)),
            None,
        );
        assert_eq!(entry.slot_fed_by(GameId::new(1)), None);
        assert_eq!(entry.feeders().collect::<Vec<_>>(), vec![(Slot::Bottom, GameId::new(2))]);
    }

    #[test]
    fn test_push_returns_next_id() {
        let mut t = TopologyTable::default();
        let entry = GameTopology::new(Source::Fixed("x".into()), Source::Fixed("y".into()), None);
        let id = t.push(entry);
        assert_eq!(id, GameId::new(1));
        assert_eq!(t.len(), 1);
    }
}
