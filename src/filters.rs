//! Wildcard-aware zone and card-type predicates.
//!
//! Target resolvers, restriction checks, and cost-adjuster scopes all
//! need to ask "does this zone / card type satisfy this filter?".
//! The wildcard variants (`Any`, `AnyArena`) make "anywhere in play"
//! style filters explicit instead of enumerating zones at every call
//! site.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::CardType;
use crate::zones::ZoneKind;

/// Filter over zone kinds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoneFilter {
    /// Matches every zone.
    Any,
    /// Matches the ground and space arenas.
    AnyArena,
    /// Matches exactly one zone kind.
    One(ZoneKind),
    /// Matches any of the listed zone kinds.
    AnyOf(SmallVec<[ZoneKind; 4]>),
}

impl ZoneFilter {
    /// Does the zone satisfy this filter?
    #[must_use]
    pub fn matches(&self, zone: ZoneKind) -> bool {
        match self {
            ZoneFilter::Any => true,
            ZoneFilter::AnyArena => zone.is_arena(),
            ZoneFilter::One(z) => *z == zone,
            ZoneFilter::AnyOf(zs) => zs.contains(&zone),
        }
    }

    /// Convenience constructor for a list filter.
    pub fn any_of(zones: impl IntoIterator<Item = ZoneKind>) -> Self {
        ZoneFilter::AnyOf(zones.into_iter().collect())
    }
}

/// Filter over card types.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardTypeFilter {
    /// Matches every card type.
    Any,
    /// Matches exactly one type.
    One(CardType),
    /// Matches any of the listed types.
    AnyOf(SmallVec<[CardType; 3]>),
}

impl CardTypeFilter {
    /// Does the card type satisfy this filter?
    #[must_use]
    pub fn matches(&self, card_type: CardType) -> bool {
        match self {
            CardTypeFilter::Any => true,
            CardTypeFilter::One(t) => *t == card_type,
            CardTypeFilter::AnyOf(ts) => ts.contains(&card_type),
        }
    }

    /// Convenience constructor for a list filter.
    pub fn any_of(types: impl IntoIterator<Item = CardType>) -> Self {
        CardTypeFilter::AnyOf(types.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_wildcards() {
        assert!(ZoneFilter::Any.matches(ZoneKind::Hand));
        assert!(ZoneFilter::Any.matches(ZoneKind::SpaceArena));

        assert!(ZoneFilter::AnyArena.matches(ZoneKind::GroundArena));
        assert!(ZoneFilter::AnyArena.matches(ZoneKind::SpaceArena));
        assert!(!ZoneFilter::AnyArena.matches(ZoneKind::Discard));
    }

    #[test]
    fn test_zone_exact_and_list() {
        assert!(ZoneFilter::One(ZoneKind::Hand).matches(ZoneKind::Hand));
        assert!(!ZoneFilter::One(ZoneKind::Hand).matches(ZoneKind::Deck));

        let filter = ZoneFilter::any_of([ZoneKind::Hand, ZoneKind::Discard]);
        assert!(filter.matches(ZoneKind::Discard));
        assert!(!filter.matches(ZoneKind::Resource));
    }

    #[test]
    fn test_card_type_filters() {
        assert!(CardTypeFilter::Any.matches(CardType::Event));
        assert!(CardTypeFilter::One(CardType::Unit).matches(CardType::Unit));
        assert!(!CardTypeFilter::One(CardType::Unit).matches(CardType::Upgrade));

        let filter = CardTypeFilter::any_of([CardType::Unit, CardType::Base]);
        assert!(filter.matches(CardType::Base));
        assert!(!filter.matches(CardType::Event));
    }

    #[test]
    fn test_serialization() {
        let filter = ZoneFilter::AnyArena;
        let json = serde_json::to_string(&filter).unwrap();
        let back: ZoneFilter = serde_json::from_str(&json).unwrap();
        assert_eq!(filter, back);
    }
}
