//! Upgrade plans offered when the free tier runs out. Purchasing is not wired up:
//! every upgrade request resolves to a "coming soon" notice.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanKind {
    Monthly,
    Yearly,
}

impl PlanKind {
    fn title(self) -> &'static str {
        match self {
            PlanKind::Monthly => "Monthly",
            PlanKind::Yearly => "Yearly",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    pub kind: PlanKind,
    pub title: &'static str,
    pub price: &'static str,
    pub period: &'static str,
    pub badge: Option<&'static str>,
    pub features: &'static [&'static str],
}

pub fn plans() -> Vec<Plan> {
    vec![
        Plan {
            kind: PlanKind::Monthly,
            title: PlanKind::Monthly.title(),
            price: "$9.99",
            period: "month",
            badge: None,
            features: &[
                "Unlimited generations",
                "Priority support",
                "Download in high resolution",
            ],
        },
        Plan {
            kind: PlanKind::Yearly,
            title: PlanKind::Yearly.title(),
            price: "$99.99",
            period: "year",
            badge: Some("Save 17%"),
            features: &["All monthly features", "2 months free", "Bulk generation"],
        },
    ]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub status: &'static str,
    pub title: &'static str,
    pub description: String,
}

pub fn upgrade_notice(kind: PlanKind) -> Notice {
    Notice {
        status: "info",
        title: "Coming Soon",
        description: format!("{} plan upgrade will be available soon!", kind.title()),
    }
}
