use glam::Vec2;

use super::protocol::{FIELD_HEIGHT, FIELD_WIDTH, MAX_PLAYERS, PLAYER_SIZE, PlayerId};

/// One entry in the player table.
#[derive(Debug, Clone, Copy, Default)]
struct PlayerSlot {
    /// True if the slot holds a live player. The position of an inactive
    /// slot is stale and never surfaced.
    active: bool,
    /// Last known location on the field.
    position: Vec2,
}

/// Fixed-capacity table of player slots, indexed by [`PlayerId`].
///
/// This is the local simulation state: the local player's authoritative
/// position plus the last known positions of everyone else. Every accessor
/// bounds-checks the id, so a malformed packet naming a bad slot is a no-op
/// rather than a wild index.
#[derive(Debug, Default)]
pub struct PlayerRegistry {
    slots: [PlayerSlot; MAX_PLAYERS],
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a slot live at the given position.
    pub fn activate(&mut self, id: PlayerId, position: Vec2) {
        if let Some(slot) = self.slots.get_mut(id.index()) {
            slot.active = true;
            slot.position = position;
        }
    }

    /// Clear a slot. Only the id is needed; the stale position stays behind.
    pub fn deactivate(&mut self, id: PlayerId) {
        if let Some(slot) = self.slots.get_mut(id.index()) {
            slot.active = false;
        }
    }

    pub fn is_active(&self, id: PlayerId) -> bool {
        self.slots.get(id.index()).is_some_and(|slot| slot.active)
    }

    /// Last known position, or `None` if the id is out of range or the slot
    /// is not live.
    pub fn position(&self, id: PlayerId) -> Option<Vec2> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.active)
            .map(|slot| slot.position)
    }

    /// Overwrite the position of a live slot. Inactive slots are left alone:
    /// an update must not implicitly add a player.
    pub fn set_position(&mut self, id: PlayerId, position: Vec2) {
        if let Some(slot) = self.slots.get_mut(id.index()) {
            if slot.active {
                slot.position = position;
            }
        }
    }

    /// Add a movement delta to a live slot and clamp the result onto the
    /// field, each axis independently.
    pub fn apply_movement(&mut self, id: PlayerId, delta: Vec2) {
        let Some(slot) = self.slots.get_mut(id.index()) else {
            return;
        };
        if !slot.active {
            return;
        }

        let moved = slot.position + delta;
        slot.position = Vec2::new(
            moved.x.clamp(0.0, FIELD_WIDTH - PLAYER_SIZE),
            moved.y.clamp(0.0, FIELD_HEIGHT - PLAYER_SIZE),
        );
    }

    /// Live slots and their positions, for the drawing side.
    pub fn iter_active(&self) -> impl Iterator<Item = (PlayerId, Vec2)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.active)
            .map(|(index, slot)| (PlayerId(index as u8), slot.position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inactive_slot_has_no_position() {
        let mut registry = PlayerRegistry::new();
        assert_eq!(registry.position(PlayerId(0)), None);

        registry.activate(PlayerId(0), Vec2::new(5.0, 6.0));
        assert_eq!(registry.position(PlayerId(0)), Some(Vec2::new(5.0, 6.0)));

        registry.deactivate(PlayerId(0));
        assert_eq!(registry.position(PlayerId(0)), None);
    }

    #[test]
    fn test_out_of_range_ids_are_no_ops() {
        let mut registry = PlayerRegistry::new();
        let bad = PlayerId(MAX_PLAYERS as u8);

        registry.activate(bad, Vec2::ONE);
        registry.set_position(bad, Vec2::ONE);
        registry.apply_movement(bad, Vec2::ONE);
        assert_eq!(registry.position(bad), None);
        assert!(!registry.is_active(bad));
    }

    #[test]
    fn test_set_position_requires_active_slot() {
        let mut registry = PlayerRegistry::new();
        registry.set_position(PlayerId(2), Vec2::new(9.0, 9.0));
        assert_eq!(registry.position(PlayerId(2)), None);
    }

    #[test]
    fn test_movement_clamps_to_field() {
        let mut registry = PlayerRegistry::new();
        let id = PlayerId(1);
        registry.activate(id, Vec2::new(FIELD_WIDTH - PLAYER_SIZE - 1.0, 5.0));

        registry.apply_movement(id, Vec2::new(50.0, -50.0));
        assert_eq!(
            registry.position(id),
            Some(Vec2::new(FIELD_WIDTH - PLAYER_SIZE, 0.0))
        );

        registry.apply_movement(id, Vec2::new(0.0, FIELD_HEIGHT * 2.0));
        assert_eq!(
            registry.position(id),
            Some(Vec2::new(FIELD_WIDTH - PLAYER_SIZE, FIELD_HEIGHT - PLAYER_SIZE))
        );
    }

    #[test]
    fn test_iter_active() {
        let mut registry = PlayerRegistry::new();
        registry.activate(PlayerId(1), Vec2::new(1.0, 1.0));
        registry.activate(PlayerId(4), Vec2::new(4.0, 4.0));

        let live: Vec<_> = registry.iter_active().collect();
        assert_eq!(live.len(), 2);
        assert_eq!(live[0], (PlayerId(1), Vec2::new(1.0, 1.0)));
        assert_eq!(live[1], (PlayerId(4), Vec2::new(4.0, 4.0)));
    }
}
