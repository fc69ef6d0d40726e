use crate::rfm::types::RfmScores;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Segment {
    Champions,
    VipCustomers,
    LoyalCustomers,
    PotentialLoyalists,
    RecentCustomers,
    Promising,
    CustomersNeedingAttention,
    AboutToSleep,
    CannotLoseThem,
    AtRisk,
    LostCustomers,
    Hibernating,
    PriceSensitive,
    BargainHunters,
    Other,
}

impl Segment {
    pub const ALL: [Segment; 15] = [
        Self::Champions,
        Self::VipCustomers,
        Self::LoyalCustomers,
        Self::PotentialLoyalists,
        Self::RecentCustomers,
        Self::Promising,
        Self::CustomersNeedingAttention,
        Self::AboutToSleep,
        Self::CannotLoseThem,
        Self::AtRisk,
        Self::LostCustomers,
        Self::Hibernating,
        Self::PriceSensitive,
        Self::BargainHunters,
        Self::Other,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Champions => "Champions",
            Self::VipCustomers => "VIP Customers",
            Self::LoyalCustomers => "Loyal Customers",
            Self::PotentialLoyalists => "Potential Loyalists",
            Self::RecentCustomers => "Recent Customers",
            Self::Promising => "Promising",
            Self::CustomersNeedingAttention => "Customers Needing Attention",
            Self::AboutToSleep => "About to Sleep",
            Self::CannotLoseThem => "Cannot Lose Them",
            Self::AtRisk => "At Risk",
            Self::LostCustomers => "Lost Customers",
            Self::Hibernating => "Hibernating",
            Self::PriceSensitive => "Price Sensitive",
            Self::BargainHunters => "Bargain Hunters",
            Self::Other => "Other",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|segment| segment.as_str() == label)
    }

    pub const fn priority(self) -> &'static str {
        match self {
            Self::Champions | Self::VipCustomers | Self::LoyalCustomers | Self::AtRisk => "High",
            Self::PotentialLoyalists | Self::Promising | Self::AboutToSleep => "Medium-High",
            Self::RecentCustomers | Self::CustomersNeedingAttention | Self::PriceSensitive => {
                "Medium"
            }
            Self::CannotLoseThem => "Critical",
            Self::LostCustomers | Self::BargainHunters => "Low-Medium",
            Self::Hibernating => "Low",
            Self::Other => "Variable",
        }
    }

    pub const fn risk_level(self) -> &'static str {
        match self {
            Self::Champions
            | Self::VipCustomers
            | Self::LoyalCustomers
            | Self::LostCustomers
            | Self::Hibernating
            | Self::PriceSensitive
            | Self::BargainHunters => "Low",
            Self::PotentialLoyalists | Self::RecentCustomers | Self::Promising => "Medium",
            Self::CustomersNeedingAttention => "Medium-High",
            Self::AboutToSleep | Self::AtRisk => "High",
            Self::CannotLoseThem => "Critical",
            Self::Other => "Variable",
        }
    }

    pub const fn recommended_action(self) -> &'static str {
        match self {
            Self::Champions => "Retain & Upsell",
            Self::VipCustomers => "Nurture to Champions",
            Self::LoyalCustomers => "Maintain Engagement",
            Self::PotentialLoyalists => "Build Relationship",
            Self::RecentCustomers => "Onboard & Educate",
            Self::Promising => "Premium Targeting",
            Self::CustomersNeedingAttention => "Re-engage",
            Self::AboutToSleep => "Win-back Campaign",
            Self::CannotLoseThem => "Emergency Win-back",
            Self::AtRisk => "Immediate Intervention",
            Self::LostCustomers => "Long-term Win-back",
            Self::Hibernating => "Low-cost Automation",
            Self::PriceSensitive => "Volume Discounts",
            Self::BargainHunters => "Deal Campaigns",
            Self::Other => "Individual Analysis",
        }
    }

    pub fn is_high_priority(self) -> bool {
        matches!(self.priority(), "High" | "Critical")
    }

    pub fn is_high_risk(self) -> bool {
        matches!(self.risk_level(), "High" | "Critical")
    }
}

#[derive(Clone, Copy)]
struct SegmentRule {
    segment: Segment,
    matches: fn(RfmScores) -> bool,
}

/// Evaluated top to bottom; several predicates overlap, so order decides.
const SEGMENT_RULES: [SegmentRule; 14] = [
    SegmentRule {
        segment: Segment::Champions,
        matches: is_champion,
    },
    SegmentRule {
        segment: Segment::VipCustomers,
        matches: is_vip,
    },
    SegmentRule {
        segment: Segment::LoyalCustomers,
        matches: is_loyal,
    },
    SegmentRule {
        segment: Segment::PotentialLoyalists,
        matches: is_potential_loyalist,
    },
    SegmentRule {
        segment: Segment::RecentCustomers,
        matches: is_recent,
    },
    SegmentRule {
        segment: Segment::Promising,
        matches: is_promising,
    },
    SegmentRule {
        segment: Segment::CustomersNeedingAttention,
        matches: needs_attention,
    },
    SegmentRule {
        segment: Segment::AboutToSleep,
        matches: is_about_to_sleep,
    },
    SegmentRule {
        segment: Segment::CannotLoseThem,
        matches: cannot_lose,
    },
    SegmentRule {
        segment: Segment::AtRisk,
        matches: is_at_risk,
    },
    SegmentRule {
        segment: Segment::LostCustomers,
        matches: is_lost,
    },
    SegmentRule {
        segment: Segment::Hibernating,
        matches: is_hibernating,
    },
    SegmentRule {
        segment: Segment::PriceSensitive,
        matches: is_price_sensitive,
    },
    SegmentRule {
        segment: Segment::BargainHunters,
        matches: is_bargain_hunter,
    },
];

pub fn classify(scores: RfmScores) -> Segment {
    SEGMENT_RULES
        .iter()
        .find(|rule| (rule.matches)(scores))
        .map_or(Segment::Other, |rule| rule.segment)
}

fn is_champion(s: RfmScores) -> bool {
    s.recency == 5 && s.frequency == 5 && s.monetary == 5
}

fn is_vip(s: RfmScores) -> bool {
    s.recency == 5 && s.frequency >= 4 && s.monetary >= 4
}

fn is_loyal(s: RfmScores) -> bool {
    s.recency >= 3 && s.frequency >= 4 && s.monetary >= 3
}

fn is_potential_loyalist(s: RfmScores) -> bool {
    s.recency >= 4
        && s.frequency >= 2
        && s.monetary >= 2
        && !(s.frequency >= 4 && s.monetary >= 4)
}

fn is_recent(s: RfmScores) -> bool {
    s.recency >= 4 && s.frequency <= 2 && s.monetary <= 2
}

fn is_promising(s: RfmScores) -> bool {
    s.recency >= 3 && s.frequency <= 2 && s.monetary >= 4
}

fn needs_attention(s: RfmScores) -> bool {
    s.recency >= 3 && s.frequency <= 2 && (2..=3).contains(&s.monetary)
}

fn is_about_to_sleep(s: RfmScores) -> bool {
    s.recency <= 3 && s.frequency <= 2 && s.monetary >= 3
}

fn cannot_lose(s: RfmScores) -> bool {
    s.recency <= 2 && s.frequency >= 4 && s.monetary >= 4
}

fn is_at_risk(s: RfmScores) -> bool {
    s.recency <= 2 && s.frequency >= 3 && s.monetary >= 4
}

fn is_lost(s: RfmScores) -> bool {
    s.recency == 1 && s.frequency >= 2 && s.monetary >= 2
}

fn is_hibernating(s: RfmScores) -> bool {
    s.recency <= 2 && s.frequency <= 2 && s.monetary <= 2
}

fn is_price_sensitive(s: RfmScores) -> bool {
    s.recency >= 3 && s.frequency >= 4 && s.monetary <= 2
}

fn is_bargain_hunter(s: RfmScores) -> bool {
    s.recency >= 3 && s.frequency >= 2 && s.monetary <= 2
}
