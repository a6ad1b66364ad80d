//! The capability set abilities act through, and event dispatch.

use tracing::trace;

use crate::core::{EntityId, PlayerId};
use crate::player::Player;
use crate::triggers::{EventBus, GameEvent};

/// What a running game exposes to card abilities.
///
/// `Game` implements this; tests can stub it.
pub trait GameContext {
    fn event_bus(&self) -> &EventBus;

    fn event_bus_mut(&mut self) -> &mut EventBus;

    /// Is this card (draw card, attachment or active plot) in play anywhere?
    fn is_in_play(&self, card: EntityId) -> bool;

    fn player(&self, id: PlayerId) -> &Player;

    fn other_player(&self, id: PlayerId) -> &Player {
        self.player(id.opponent())
    }

    /// Append a line to the game log.
    fn add_message(&mut self, message: String);

    /// Put power on a player's faction card.
    fn add_power(&mut self, player: PlayerId, amount: u32);

    /// Move up to `amount` faction power. Returns how much moved.
    fn transfer_power(&mut self, from: PlayerId, to: PlayerId, amount: u32) -> u32;

    /// A card of `player`'s left play.
    fn notify_leaving_play(&mut self, player: PlayerId, card: EntityId);
}

/// Run every listener for `event`, in registration order.
///
/// The listener list is taken up front. Before each call the listener must
/// still be registered and its host still in play, so a handler that
/// removes a card from play also silences that card for the rest of this
/// dispatch. Handlers may dispatch further events.
///
/// Returns the number of handlers that ran.
pub fn dispatch(ctx: &mut dyn GameContext, event: &GameEvent) -> usize {
    let listeners = ctx.event_bus().listeners(event.name);
    let mut invoked = 0;

    for listener in listeners {
        if !ctx.event_bus().is_registered(listener.id) {
            trace!(listener = %listener.id, event = %event.name, "skipping removed listener");
            continue;
        }
        if !ctx.is_in_play(listener.host.card) {
            trace!(listener = %listener.id, card = %listener.host.card, "skipping listener of card out of play");
            continue;
        }

        (listener.handler)(&listener.host, event, ctx);
        invoked += 1;
    }

    invoked
}
