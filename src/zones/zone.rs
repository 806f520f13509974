//! Zone - an ordered grouping of tokens under one anchor and strategy.
//!
//! A token belongs to at most one zone at a time; the zone's item list is
//! the model's source of truth for "where the card is". Every mutation
//! re-runs the zone's layout so the list and the members' visual state
//! never diverge.
//!
//! Zones are created through the stage (`Stage::create_zone`) and mutated
//! through stage methods, which supply the pool and layout context.

use kurbo::Rect;
use smallvec::SmallVec;

use crate::core::ids::{TokenId, ZoneId};
use crate::layout::{LayoutCtx, Strategy, StrategyKind};
use crate::tokens::TokenPool;

/// An ordered collection of tokens bound to one anchor and one strategy.
#[derive(Debug)]
pub struct Zone {
    id: ZoneId,
    anchor: Rect,
    strategy: Strategy,
    /// SmallVec keeps typical hand/pile sizes off the heap.
    items: SmallVec<[TokenId; 8]>,
}

impl Zone {
    pub(crate) fn new(id: ZoneId, anchor: Rect, strategy: Strategy) -> Self {
        Self {
            id,
            anchor,
            strategy,
            items: SmallVec::new(),
        }
    }

    /// This zone's handle.
    #[must_use]
    pub fn id(&self) -> ZoneId {
        self.id
    }

    /// The anchor rectangle layout runs against.
    #[must_use]
    pub fn anchor(&self) -> Rect {
        self.anchor
    }

    /// The zone's layout strategy.
    #[must_use]
    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    /// Strategy discriminant.
    #[must_use]
    pub fn kind(&self) -> StrategyKind {
        self.strategy.kind()
    }

    /// Whether members are laid out by the zone's container.
    #[must_use]
    pub fn is_flow(&self) -> bool {
        self.strategy.is_flow()
    }

    /// Member tokens in order.
    #[must_use]
    pub fn items(&self) -> &[TokenId] {
        &self.items
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the zone has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether `token` is a member.
    #[must_use]
    pub fn contains(&self, token: TokenId) -> bool {
        self.items.contains(&token)
    }

    pub(crate) fn set_anchor(&mut self, anchor: Rect) {
        self.anchor = anchor;
    }

    /// Append a token and re-layout.
    pub(crate) fn add(&mut self, token: TokenId, pool: &mut TokenPool, ctx: &LayoutCtx<'_>) {
        self.items.push(token);
        self.render(pool, ctx);
    }

    /// Remove items at the given positions and re-layout.
    ///
    /// Indices are applied in descending order so earlier removals don't
    /// shift later ones; out-of-range indices are ignored. Returns the
    /// removed tokens in the order they were removed.
    pub(crate) fn remove_indices(
        &mut self,
        indices: &[usize],
        pool: &mut TokenPool,
        ctx: &LayoutCtx<'_>,
    ) -> Vec<TokenId> {
        let mut sorted: Vec<usize> = indices.to_vec();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        sorted.dedup();

        let mut removed = Vec::new();
        for idx in sorted {
            if idx < self.items.len() {
                removed.push(self.items.remove(idx));
            }
        }
        if !removed.is_empty() {
            self.render(pool, ctx);
        }
        removed
    }

    /// Remove the first occurrence of `token`; re-layout when found.
    pub(crate) fn remove_token(
        &mut self,
        token: TokenId,
        pool: &mut TokenPool,
        ctx: &LayoutCtx<'_>,
    ) -> bool {
        match self.items.iter().position(|&t| t == token) {
            Some(idx) => {
                self.items.remove(idx);
                self.render(pool, ctx);
                true
            }
            None => false,
        }
    }

    /// Remove and return every member, then re-layout (a no-op on empty).
    pub(crate) fn clear(&mut self, pool: &mut TokenPool, ctx: &LayoutCtx<'_>) -> Vec<TokenId> {
        let removed: Vec<TokenId> = self.items.drain(..).collect();
        self.render(pool, ctx);
        removed
    }

    /// Run the strategy over the current members.
    pub(crate) fn render(&self, pool: &mut TokenPool, ctx: &LayoutCtx<'_>) {
        self.strategy
            .layout(self.id, &self.items, self.anchor, pool, ctx);
    }
}
