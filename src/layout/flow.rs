//! Flow layout: delegate placement to the zone's container.
//!
//! No coordinates are computed. Each member is re-parented into the zone's
//! container (if it isn't there already) and switched into flow mode, and
//! the container's own layout rules take over from there.

use crate::core::ids::{TokenId, ZoneId};
use crate::tokens::{Parent, TokenPool};

pub(super) fn layout(zone: ZoneId, items: &[TokenId], pool: &mut TokenPool) {
    for &id in items {
        let Some(token) = pool.get_mut(id) else {
            tracing::trace!(token = %id, "skipping layout of dead token");
            continue;
        };
        token.set_parent(Parent::Container(zone));
        token.set_flow_mode(true);
    }
}
