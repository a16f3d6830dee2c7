//! Damage kinds and resistance tables (spec §3 "Damage Kind", §4.4).

use serde::{Deserialize, Serialize};

use crate::ship::component::ComponentKindTag;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageKind {
    CannonBall,
    Ramming,
    Collision,
    Reef,
    Fire,
    Storm,
    Lightning,
    Explosion,
    Fatigue,
    Corrosion,
    Rot,
    Magic,
    Curse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HullMaterial {
    Oak,
    Ironclad,
    Enchanted,
}

impl HullMaterial {
    /// Multiplier folded into hull volume (spec §4.4 "buoyancyFactor(material)").
    pub fn buoyancy_factor(self) -> f32 {
        match self {
            HullMaterial::Oak => 1.0,
            HullMaterial::Ironclad => 0.8,
            HullMaterial::Enchanted => 1.15,
        }
    }

    /// Per-material resistance to a damage kind, in [0, 1) — fraction of
    /// incoming magnitude absorbed before it reaches health.
    pub fn resistance(self, kind: DamageKind) -> f32 {
        match (self, kind) {
            (HullMaterial::Ironclad, DamageKind::CannonBall) => 0.35,
            (HullMaterial::Ironclad, DamageKind::Ramming) => 0.2,
            (HullMaterial::Ironclad, DamageKind::Corrosion) => -0.5, // iron rusts faster
            (HullMaterial::Ironclad, DamageKind::Rot) => 0.9,
            (HullMaterial::Oak, DamageKind::Rot) => 0.0,
            (HullMaterial::Oak, DamageKind::Fire) => -0.2,
            (HullMaterial::Enchanted, DamageKind::Magic) => 0.5,
            (HullMaterial::Enchanted, DamageKind::Curse) => 0.3,
            (HullMaterial::Enchanted, DamageKind::Lightning) => 0.2,
            _ => 0.0,
        }
    }
}

/// Per-component-kind resistance, independent of hull material (applies to
/// sails/cannons/engines/etc., which have no `HullMaterial`).
pub fn component_kind_resistance(kind_tag: ComponentKindTag, damage: DamageKind) -> f32 {
    match (kind_tag, damage) {
        (ComponentKindTag::Sail, DamageKind::CannonBall) => -0.2, // cloth tears easily
        (ComponentKindTag::Sail, DamageKind::Fire) => -0.5,
        (ComponentKindTag::Cannon, DamageKind::CannonBall) => 0.1,
        (ComponentKindTag::Rudder, DamageKind::Reef) => -0.3,
        (ComponentKindTag::Anchor, DamageKind::Corrosion) => -0.3,
        (ComponentKindTag::Decoration, _) => 0.0,
        _ => 0.0,
    }
}

/// Applies a resistance fraction to an incoming magnitude. Negative
/// resistance (vulnerability) amplifies rather than reduces.
pub fn apply_resistance(magnitude: f32, resistance: f32) -> f32 {
    (magnitude * (1.0 - resistance)).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resistance_reduces_damage() {
        let dmg = apply_resistance(100.0, 0.35);
        assert!((dmg - 65.0).abs() < 1e-6);
    }

    #[test]
    fn negative_resistance_amplifies_damage() {
        let dmg = apply_resistance(100.0, -0.2);
        assert!((dmg - 120.0).abs() < 1e-6);
    }

    #[test]
    fn damage_never_goes_negative() {
        let dmg = apply_resistance(10.0, 5.0);
        assert_eq!(dmg, 0.0);
    }
}
