#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    Flat,
}

impl Trend {
    fn from_delta(delta_pct: f64) -> Self {
        if delta_pct > 0.0 {
            Self::Up
        } else if delta_pct < 0.0 {
            Self::Down
        } else {
            Self::Flat
        }
    }

    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            Self::Up => "trend-up",
            Self::Down => "trend-down",
            Self::Flat => "trend-flat",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct KpiVm {
    pub id: &'static str,
    pub label: &'static str,
    pub value_str: String,
    pub delta_str: String,
    pub trend: Trend,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CampaignRowVm {
    pub name: &'static str,
    pub channel: &'static str,
    pub status: &'static str,
    pub leads: u32,
    pub conversion_str: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetentionAlertVm {
    pub id: &'static str,
    pub member: &'static str,
    pub plan: &'static str,
    pub last_visit_str: String,
    pub risk: &'static str,
    pub suggestion: &'static str,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DashboardVm {
    pub revenue: KpiVm,
    pub kpis: Vec<KpiVm>,
    pub campaigns: Vec<CampaignRowVm>,
    pub retention: Vec<RetentionAlertVm>,
}

struct Kpi {
    id: &'static str,
    label: &'static str,
    value: KpiValue,
    delta_pct: f64,
}

enum KpiValue {
    Euros(u64),
    Count(u64),
    Percent(f64),
}

struct Campaign {
    name: &'static str,
    channel: &'static str,
    status: &'static str,
    leads: u32,
    conversions: u32,
}

struct AtRiskMember {
    id: &'static str,
    member: &'static str,
    plan: &'static str,
    days_since_visit: u32,
    suggestion: &'static str,
}

const REVENUE: Kpi = Kpi {
    id: "kpi-revenue",
    label: "Revenue this month",
    value: KpiValue::Euros(48_250),
    delta_pct: 6.4,
};

const KPIS: [Kpi; 3] = [
    Kpi {
        id: "kpi-active-members",
        label: "Active members",
        value: KpiValue::Count(1_284),
        delta_pct: 2.1,
    },
    Kpi {
        id: "kpi-new-leads",
        label: "New leads",
        value: KpiValue::Count(312),
        delta_pct: -4.8,
    },
    Kpi {
        id: "kpi-attendance",
        label: "Class attendance",
        value: KpiValue::Percent(73.5),
        delta_pct: 0.0,
    },
];

const CAMPAIGNS: [Campaign; 4] = [
    Campaign {
        name: "Spring challenge",
        channel: "Email",
        status: "Running",
        leads: 148,
        conversions: 31,
    },
    Campaign {
        name: "Bring a friend",
        channel: "WhatsApp",
        status: "Running",
        leads: 92,
        conversions: 27,
    },
    Campaign {
        name: "Win-back 60 days",
        channel: "SMS",
        status: "Scheduled",
        leads: 0,
        conversions: 0,
    },
    Campaign {
        name: "Corporate wellness",
        channel: "LinkedIn",
        status: "Paused",
        leads: 41,
        conversions: 4,
    },
];

const AT_RISK: [AtRiskMember; 4] = [
    AtRiskMember {
        id: "member-104",
        member: "Laura Gómez",
        plan: "Premium annual",
        days_since_visit: 21,
        suggestion: "Offer a free session with her previous coach.",
    },
    AtRiskMember {
        id: "member-217",
        member: "Carlos Ruiz",
        plan: "Monthly",
        days_since_visit: 14,
        suggestion: "Send the new evening class schedule.",
    },
    AtRiskMember {
        id: "member-388",
        member: "Marta Sanz",
        plan: "Quarterly",
        days_since_visit: 9,
        suggestion: "Check in after the missed assessment.",
    },
    AtRiskMember {
        id: "member-452",
        member: "Javier León",
        plan: "Monthly",
        days_since_visit: 33,
        suggestion: "Renewal is due in 5 days; call before it lapses.",
    },
];

/// Sample numbers for the dashboard until a reporting backend exists.
#[must_use]
pub fn load_dashboard() -> DashboardVm {
    DashboardVm {
        revenue: map_kpi(&REVENUE),
        kpis: KPIS.iter().map(map_kpi).collect(),
        campaigns: CAMPAIGNS.iter().map(map_campaign).collect(),
        retention: AT_RISK.iter().map(map_member).collect(),
    }
}

fn map_kpi(kpi: &Kpi) -> KpiVm {
    let value_str = match kpi.value {
        KpiValue::Euros(amount) => format!("€{}", group_thousands(amount)),
        KpiValue::Count(count) => group_thousands(count),
        KpiValue::Percent(pct) => format!("{pct:.1}%"),
    };
    KpiVm {
        id: kpi.id,
        label: kpi.label,
        value_str,
        delta_str: format_delta(kpi.delta_pct),
        trend: Trend::from_delta(kpi.delta_pct),
    }
}

fn map_campaign(campaign: &Campaign) -> CampaignRowVm {
    let conversion_str = if campaign.leads == 0 {
        "—".to_string()
    } else {
        let pct = f64::from(campaign.conversions) * 100.0 / f64::from(campaign.leads);
        format!("{pct:.1}%")
    };
    CampaignRowVm {
        name: campaign.name,
        channel: campaign.channel,
        status: campaign.status,
        leads: campaign.leads,
        conversion_str,
    }
}

fn map_member(member: &AtRiskMember) -> RetentionAlertVm {
    RetentionAlertVm {
        id: member.id,
        member: member.member,
        plan: member.plan,
        last_visit_str: format!("{} days ago", member.days_since_visit),
        risk: risk_label(member.days_since_visit),
        suggestion: member.suggestion,
    }
}

fn risk_label(days_since_visit: u32) -> &'static str {
    match days_since_visit {
        0..=10 => "Low",
        11..=20 => "Medium",
        _ => "High",
    }
}

fn format_delta(delta_pct: f64) -> String {
    if delta_pct > 0.0 {
        format!("+{delta_pct:.1}%")
    } else {
        format!("{delta_pct:.1}%")
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_are_grouped() {
        assert_eq!(group_thousands(7), "7");
        assert_eq!(group_thousands(1_284), "1,284");
        assert_eq!(group_thousands(48_250), "48,250");
        assert_eq!(group_thousands(1_000_000), "1,000,000");
    }

    #[test]
    fn revenue_kpi_is_formatted() {
        let vm = load_dashboard();
        assert_eq!(vm.revenue.id, "kpi-revenue");
        assert_eq!(vm.revenue.value_str, "€48,250");
        assert_eq!(vm.revenue.delta_str, "+6.4%");
        assert_eq!(vm.revenue.trend, Trend::Up);
    }

    #[test]
    fn campaign_without_leads_has_no_conversion() {
        let vm = load_dashboard();
        let scheduled = vm.campaigns.iter().find(|c| c.leads == 0).unwrap();
        assert_eq!(scheduled.conversion_str, "—");
        assert_eq!(vm.campaigns[0].conversion_str, "20.9%");
    }

    #[test]
    fn risk_follows_days_since_visit() {
        assert_eq!(risk_label(9), "Low");
        assert_eq!(risk_label(14), "Medium");
        assert_eq!(risk_label(33), "High");
    }
}
