//! Demo catalog loaded at startup.

use crate::domain::foundation::{KpiId, KriId, RiskId, ValidationError};
use crate::domain::risk::{
    Kpi, KpiStatus, KpiTrend, Kri, KriTrend, NewKpi, NewKri, NewRisk, Risk, RiskStatus,
};

fn risk_inputs() -> Vec<NewRisk> {
    vec![
        NewRisk {
            title: "Data Breach Risk".to_string(),
            category: "Operational".to_string(),
            department: "IT".to_string(),
            owner: "John Smith".to_string(),
            likelihood: 4,
            impact: 5,
            control_effectiveness: 70.0,
            status: RiskStatus::Active,
            description: "Risk of unauthorized access to sensitive customer data".to_string(),
            mitigations: vec![
                "Implement multi-factor authentication".to_string(),
                "Regular security audits".to_string(),
                "Employee security training".to_string(),
            ],
        },
        NewRisk {
            title: "Market Volatility".to_string(),
            category: "Financial".to_string(),
            department: "Finance".to_string(),
            owner: "Jane Doe".to_string(),
            likelihood: 3,
            impact: 4,
            control_effectiveness: 60.0,
            status: RiskStatus::Monitored,
            description: "Risk of losses due to market fluctuations".to_string(),
            mitigations: vec![
                "Diversified investment portfolio".to_string(),
                "Regular market analysis".to_string(),
                "Hedging strategies".to_string(),
            ],
        },
        NewRisk {
            title: "Regulatory Compliance".to_string(),
            category: "Compliance".to_string(),
            department: "Legal".to_string(),
            owner: "Mike Johnson".to_string(),
            likelihood: 2,
            impact: 5,
            control_effectiveness: 85.0,
            status: RiskStatus::Controlled,
            description: "Risk of non-compliance with industry regulations".to_string(),
            mitigations: vec![
                "Regular compliance audits".to_string(),
                "Automated compliance monitoring".to_string(),
                "Staff training on regulations".to_string(),
            ],
        },
    ]
}

fn kpi(name: &str, category: &str, (current, target): (f64, f64), unit: &str) -> NewKpi {
    NewKpi {
        name: name.to_string(),
        category: category.to_string(),
        current,
        target,
        unit: unit.to_string(),
        trend: KpiTrend::Stable,
        status: KpiStatus::OnTrack,
    }
}

fn kri(name: &str, threshold: f64, current: f64, trend: KriTrend) -> NewKri {
    NewKri {
        name: name.to_string(),
        threshold,
        current,
        trend,
    }
}

pub fn demo_risks() -> Result<Vec<Risk>, ValidationError> {
    risk_inputs()
        .into_iter()
        .zip(1..)
        .map(|(input, n)| Risk::register(RiskId::from_sequence(n), input))
        .collect()
}

pub fn demo_kpis() -> Result<Vec<Kpi>, ValidationError> {
    [
        NewKpi {
            trend: KpiTrend::Up,
            ..kpi("Revenue Growth", "Financial", (12.5, 15.0), "%")
        },
        NewKpi {
            status: KpiStatus::Attention,
            ..kpi("Customer Satisfaction", "Customer", (4.2, 4.5), "score")
        },
        NewKpi {
            trend: KpiTrend::Up,
            ..kpi("Operational Efficiency", "Process", (87.0, 90.0), "%")
        },
    ]
    .into_iter()
    .zip(1..)
    .map(|(input, n)| Kpi::create(KpiId::from_sequence(n), input))
    .collect()
}

pub fn demo_kris() -> Result<Vec<Kri>, ValidationError> {
    [
        kri("Security Incidents", 5.0, 3.0, KriTrend::Improving),
        kri("Compliance Violations", 0.0, 0.0, KriTrend::Stable),
        kri("System Downtime (hours)", 4.0, 5.2, KriTrend::Worsening),
    ]
    .into_iter()
    .zip(1..)
    .map(|(input, n)| Kri::create(KriId::from_sequence(n), input))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::risk::KriStatus;

    #[test]
    fn demo_risks_have_derived_scores() {
        let risks = demo_risks().unwrap();

        assert_eq!(risks.len(), 3);
        assert_eq!(risks[0].id.as_str(), "R001");
        assert_eq!(risks[1].inherent_risk, 12);
        assert!((risks[1].residual_risk - 4.8).abs() < 1e-9);
        assert!((risks[2].residual_risk - 1.5).abs() < 1e-9);
    }

    #[test]
    fn demo_kri_statuses_are_derived() {
        let kris = demo_kris().unwrap();
        let statuses: Vec<_> = kris.iter().map(|k| k.status).collect();

        assert_eq!(statuses, vec![KriStatus::Green, KriStatus::Green, KriStatus::Red]);
        assert_eq!(kris[2].id.as_str(), "KRI003");
    }

    #[test]
    fn demo_kpis_are_numbered() {
        let kpis = demo_kpis().unwrap();
        assert_eq!(kpis[1].id.as_str(), "KPI002");
    }
}
