//! Boundary detectors that consume falling ingredients.
//!
//! The cauldron and the trash pipe are the only places where a live
//! ingredient leaves play. Both remove the instance from the registry before
//! reporting it, so a second contact for the same handle finds nothing and is
//! dropped.

use cauldron_core::{Event, IngredientId, Receiver};

use crate::World;

/// Consumes `ingredient` through `receiver`, emitting the matching event.
pub(crate) fn resolve(
    world: &mut World,
    ingredient: IngredientId,
    receiver: Receiver,
    out_events: &mut Vec<Event>,
) {
    let Some(live) = world.take_ingredient(ingredient) else {
        log::debug!(
            "ignoring {receiver:?} contact for ingredient {} which is no longer live",
            ingredient.get()
        );
        return;
    };

    match receiver {
        Receiver::Cauldron => {
            log::debug!("caught {} worth {}", live.kind, live.score_value);
            out_events.push(Event::IngredientCaught {
                ingredient,
                kind: live.kind,
                score_value: live.score_value,
            });
        }
        Receiver::TrashPipe => {
            log::debug!("trashed {}", live.kind);
            out_events.push(Event::IngredientDiscarded {
                ingredient,
                kind: live.kind,
            });
        }
    }
}
