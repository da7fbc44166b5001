//! ACMG five-tier pathogenicity ordering.

use medifuse_common::AcmgClassification;

/// Severity tier: PATHOGENIC = 5 down to BENIGN = 1.
pub fn acmg_tier(classification: AcmgClassification) -> u8 {
    match classification {
        AcmgClassification::Pathogenic       => 5,
        AcmgClassification::LikelyPathogenic => 4,
        AcmgClassification::Vus              => 3,
        AcmgClassification::LikelyBenign     => 2,
        AcmgClassification::Benign           => 1,
    }
}

/// Tiers that warrant clinical action (Pathogenic, Likely-Pathogenic).
pub fn is_actionable_tier(classification: AcmgClassification) -> bool {
    acmg_tier(classification) >= 4
}
